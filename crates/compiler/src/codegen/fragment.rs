//! Plumbing shared by the renderers: collected imports and the set of
//! rendered files.
use crate::codegen::command::Options;
use itertools::Itertools;
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};

/// The files of a rendered client, keyed by their path relative to the
/// output directory.
#[derive(Debug, Default)]
pub struct RenderMap {
    files: BTreeMap<PathBuf, String>,
}

impl RenderMap {
    pub fn add<P: Into<PathBuf>>(&mut self, path: P, content: String) {
        self.files.insert(path.into(), content);
    }

    pub fn get<P: AsRef<Path>>(&self, path: P) -> Option<&str> {
        self.files.get(path.as_ref()).map(String::as_str)
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.keys().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Print or write the files, depending on `options`.
    pub async fn emit(&self, options: &Options) -> io::Result<()> {
        if options.print {
            self.print();
            Ok(())
        } else {
            self.write(&options.output).await
        }
    }

    pub fn print(&self) {
        for (path, content) in &self.files {
            println!("// {}\n{}", path.display(), content);
        }
    }

    /// Replace the content of `output` with the rendered files.
    pub async fn write(&self, output: &Path) -> io::Result<()> {
        if tokio::fs::try_exists(output).await? {
            tracing::debug!(output = %output.display(), "removing previous client");
            tokio::fs::remove_dir_all(output).await?;
        }

        for (path, content) in &self.files {
            let path = output.join(path);
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }

            tokio::fs::write(&path, content).await?;
            tracing::debug!(path = %path.display(), "wrote file");
        }

        tracing::info!(
            files = self.files.len(),
            output = %output.display(),
            "client written"
        );
        Ok(())
    }
}

/// Names to import, grouped by the module they come from.
#[derive(Debug, Default, Clone)]
pub struct ImportMap {
    modules: BTreeMap<String, BTreeSet<String>>,
}

impl ImportMap {
    pub fn add<M: Into<String>, N: Into<String>>(&mut self, module: M, name: N) -> &mut Self {
        self.modules
            .entry(module.into())
            .or_default()
            .insert(name.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// One `import { .. } from '..';` statement per module. Type-only
    /// imports are written as `type Name` and sorted by their name.
    pub fn to_typescript(&self) -> String {
        self.modules
            .iter()
            .map(|(module, names)| {
                let names = names
                    .iter()
                    .sorted_by_key(|name| name.trim_start_matches("type ").to_string())
                    .join(", ");
                format!("import {{ {names} }} from '{module}';")
            })
            .join("\n")
    }

    /// One `use` declaration per module.
    pub fn to_rust(&self) -> String {
        self.modules
            .iter()
            .map(|(module, names)| {
                if names.len() == 1 {
                    format!("use {module}::{};", names.iter().join(""))
                } else {
                    format!("use {module}::{{{}}};", names.iter().join(", "))
                }
            })
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::{ImportMap, RenderMap};
    use crate::codegen::command::Options;
    use pretty_assertions::assert_eq;

    #[test]
    fn typescript_imports_are_grouped_and_sorted() {
        let mut imports = ImportMap::default();
        imports
            .add("@solana/kit", "getU64Encoder")
            .add("@solana/kit", "type Address")
            .add("@solana/kit", "combineCodec")
            .add("../types", "type ProofPath");

        assert_eq!(
            imports.to_typescript(),
            "import { type ProofPath } from '../types';\n\
             import { type Address, combineCodec, getU64Encoder } from '@solana/kit';"
        );
    }

    #[test]
    fn rust_imports_use_braces_only_for_several_names() {
        let mut imports = ImportMap::default();
        imports
            .add("borsh", "BorshSerialize")
            .add("borsh", "BorshDeserialize")
            .add("solana_pubkey", "Pubkey");

        assert_eq!(
            imports.to_rust(),
            "use borsh::{BorshDeserialize, BorshSerialize};\nuse solana_pubkey::Pubkey;"
        );
    }

    #[tokio::test]
    async fn write_replaces_the_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("generated");
        std::fs::create_dir_all(output.join("stale")).unwrap();
        std::fs::write(output.join("stale").join("old.ts"), "old").unwrap();

        let mut files = RenderMap::default();
        files.add("index.ts", "export {};".to_string());
        files.add("types/proofPath.ts", "export type ProofPath = {};".to_string());
        let options = Options {
            print: false,
            output: output.clone(),
        };
        files.emit(&options).await.unwrap();

        assert!(!output.join("stale").exists());
        assert_eq!(
            std::fs::read_to_string(output.join("types").join("proofPath.ts")).unwrap(),
            "export type ProofPath = {};"
        );
    }
}
