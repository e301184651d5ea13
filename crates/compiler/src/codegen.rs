use crate::ast::canonical::Root;
use crate::codegen::command::Command;
use crate::error::Error;

pub mod command;
pub mod fragment;
pub mod rust;
pub mod typescript;

/// Render the client selected by `command` and write it to its output path.
pub async fn generate(root: &Root, command: &Command) -> Result<(), Error> {
    match command {
        Command::Typescript(options) => typescript::generate_typescript_client(root, options).await,
        Command::Rust(options) => rust::generate_rust_client(root, options).await,
    }
}
