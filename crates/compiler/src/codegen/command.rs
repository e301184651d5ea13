use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Options {
    /// Print the rendered files to stdout instead of writing them.
    pub print: bool,
    /// The output path of the resulting files.
    pub output: PathBuf,
}

#[derive(Debug, Clone)]
pub enum Command {
    Typescript(Options),
    Rust(Options),
}

impl Command {
    pub fn options(&self) -> &Options {
        match self {
            Command::Typescript(options) => options,
            Command::Rust(options) => options,
        }
    }
}
