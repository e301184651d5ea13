use crate::ast::canonical::Root;
use crate::ast::source::Idl;

pub mod ast;
pub mod codegen;
pub mod error;
pub mod normalize;

/// Parse the given `str` into an [`Idl`].
pub fn parse(source: &str) -> Result<Idl, error::Error> {
    Ok(serde_json::from_str(source)?)
}

/// Parse and normalize an IDL into the [`Root`] node every renderer works on.
pub fn compile(source: &str) -> Result<Root, error::Error> {
    let idl = parse(source)?;
    normalize::normalize(&idl).map_err(error::Error::BadIdl)
}
