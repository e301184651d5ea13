//! Everything that can go wrong between reading an IDL and writing a client.
use itertools::Itertools;
use std::io;

pub mod normalize;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("the IDL is not a valid Anchor IDL document: {0}")]
    BadJson(#[from] serde_json::Error),
    #[error("the IDL could not be normalized: {}", .0.iter().join("; "))]
    BadIdl(Vec<normalize::Error>),
    #[error("could not write the generated client: {0}")]
    Io(#[from] io::Error),
    #[error("could not render a template: {0}")]
    Template(#[from] askama::Error),
}
