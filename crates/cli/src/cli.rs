use clap::Parser;
use compiler::ast::canonical::Root;
use compiler::codegen::{
    self,
    command::{Command, Options},
};
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// The client to generate: `typescript` or `rust`.
    #[arg()]
    pub lang: Option<String>,
    /// The Anchor IDL to generate the clients from.
    #[arg(long, env = "CLIENTGEN_IDL", default_value = "./idl/solana_pinocchio_starter.json")]
    pub idl: PathBuf,
    /// The output directory of the TypeScript client.
    #[arg(long, env = "CLIENTGEN_TS_OUTPUT", default_value = "./ts/generated")]
    pub ts_output: PathBuf,
    /// The output directory of the Rust client.
    #[arg(long, env = "CLIENTGEN_RUST_OUTPUT", default_value = "./rust/generated")]
    pub rust_output: PathBuf,
    /// Print the generated files instead of writing them.
    #[arg(long)]
    pub print: bool,
}

/// The client to generate. `all` is advertised by the usage message but is
/// not a language of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lang {
    Typescript,
    Rust,
}

impl FromStr for Lang {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "typescript" => Ok(Lang::Typescript),
            "rust" => Ok(Lang::Rust),
            other => Err(Error::UnknownLanguage(other.to_string())),
        }
    }
}

impl Lang {
    pub fn label(&self) -> &'static str {
        match self {
            Lang::Typescript => "TypeScript",
            Lang::Rust => "Rust",
        }
    }

    fn command(&self, cli: &Cli) -> Command {
        match self {
            Lang::Typescript => Command::Typescript(Options {
                print: cli.print,
                output: cli.ts_output.clone(),
            }),
            Lang::Rust => Command::Rust(Options {
                print: cli.print,
                output: cli.rust_output.clone(),
            }),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Usage: clientgen <typescript|rust|all>")]
    Usage,
    #[error("Unknown language: {0}")]
    UnknownLanguage(String),
    #[error("could not read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error(transparent)]
    Generation(#[from] compiler::error::Error),
}

/// The steps of generating a client, from reading the IDL to writing the
/// rendered files.
#[allow(async_fn_in_trait)]
pub trait Backend {
    async fn load(&self, path: &Path) -> Result<String, Error>;

    fn normalize(&self, source: &str) -> Result<Root, Error>;

    async fn render(&self, root: &Root, command: &Command) -> Result<(), Error>;
}

/// Reads from and writes to the file system.
pub struct Codegen;

impl Backend for Codegen {
    async fn load(&self, path: &Path) -> Result<String, Error> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|source| Error::Read {
                path: path.to_path_buf(),
                source,
            })
    }

    fn normalize(&self, source: &str) -> Result<Root, Error> {
        Ok(compiler::compile(source)?)
    }

    async fn render(&self, root: &Root, command: &Command) -> Result<(), Error> {
        Ok(codegen::generate(root, command).await?)
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub async fn run<B: Backend>(cli: &Cli, backend: &B) -> Result<(), Error> {
    let lang = cli.lang.as_deref().ok_or(Error::Usage)?.parse::<Lang>()?;

    tracing::info!(language = lang.label(), idl = %cli.idl.display(), "generating client");
    let source = backend.load(&cli.idl).await?;
    let root = backend.normalize(&source)?;
    let command = lang.command(cli);
    backend.render(&root, &command).await?;

    if !cli.print {
        let output = &command.options().output;
        println!("✅ {} client generated in {}!", lang.label(), output.display());
    }

    Ok(())
}
