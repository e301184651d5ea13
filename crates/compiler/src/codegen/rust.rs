//! Renders a Rust client on top of `borsh`, `solana-pubkey` and
//! `solana-instruction`. The output is meant to be mounted as
//! `crate::generated`.
use crate::ast::canonical::{
    Account, AccountDefault, Count, DefinedType, Field, Instruction, InstructionAccount,
    OptionPrefix, Root, Signer, Type, TypeDef, Variant,
};
use crate::ast::name::Name;
use crate::codegen::command::Options;
use crate::codegen::fragment::{ImportMap, RenderMap};
use crate::error::Error;
use askama::Template;
use itertools::Itertools;

const HEADER: &str = "//! This code was AUTOGENERATED using clientgen.
//! Please DO NOT EDIT THIS FILE, instead rerun clientgen
//! to update it.";

const GENERATED: &str = "crate::generated";

const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe",
    "unsized", "use", "virtual", "where", "while", "yield",
];

/// Render the client and print it or write it to `options.output`.
pub async fn generate_rust_client(root: &Root, options: &Options) -> Result<(), Error> {
    let files = render_rust_client(root)?;
    files.emit(options).await?;
    Ok(())
}

pub fn render_rust_client(root: &Root) -> Result<RenderMap, Error> {
    let program = &root.program;
    let mut files = RenderMap::default();
    let mut modules = vec![];

    if !program.accounts.is_empty() {
        for account in &program.accounts {
            let path = format!("accounts/{}.rs", account.name.snake());
            files.add(path, generate_account(root, account));
        }

        let names = program.accounts.iter().map(|account| &account.name);
        files.add("accounts/mod.rs", generate_mod(names));
        modules.push("accounts");
    }

    if !program.errors.is_empty() {
        let path = format!("errors/{}.rs", program.name.snake());
        files.add(path, generate_errors(root)?);
        files.add("errors/mod.rs", generate_mod([&program.name]));
        modules.push("errors");
    }

    if !program.instructions.is_empty() {
        for instruction in &program.instructions {
            let path = format!("instructions/{}.rs", instruction.name.snake());
            files.add(path, generate_instruction(root, instruction));
        }

        let names = program.instructions.iter().map(|instruction| &instruction.name);
        files.add("instructions/mod.rs", generate_mod(names));
        modules.push("instructions");
    }

    files.add("programs.rs", generate_program(root));
    modules.push("programs");
    files.add("shared.rs", format!("{HEADER}\n\n{}", SHARED.trim_start()));
    modules.push("shared");

    if !program.defined_types.is_empty() {
        for defined in &program.defined_types {
            let path = format!("types/{}.rs", defined.name.snake());
            files.add(path, generate_defined_type(root, defined));
        }

        let names = program.defined_types.iter().map(|defined| &defined.name);
        files.add("types/mod.rs", generate_mod(names));
        modules.push("types");
    }

    let declarations = modules
        .iter()
        .map(|module| format!("pub mod {module};"))
        .join("\n");
    files.add(
        "mod.rs",
        format!("{HEADER}\n\n{declarations}\n\n#[allow(unused_imports)]\npub(crate) use programs::*;\n"),
    );

    tracing::debug!(files = files.len(), "rendered rust client");
    Ok(files)
}

/// A name usable as an identifier, raw when it is a keyword.
fn identifier(name: String) -> String {
    match name.as_str() {
        "self" | "Self" | "super" | "crate" => format!("{name}_"),
        _ if KEYWORDS.contains(&name.as_str()) => format!("r#{name}"),
        _ => name,
    }
}

fn generate_mod<'a, I: IntoIterator<Item = &'a Name>>(names: I) -> String {
    let modules = names
        .into_iter()
        .map(|name| identifier(name.snake()))
        .collect::<Vec<String>>();
    let declarations = modules
        .iter()
        .map(|module| format!("pub mod {module};"))
        .join("\n");
    let exports = modules
        .iter()
        .map(|module| format!("pub use self::{module}::*;"))
        .join("\n");

    format!("{HEADER}\n\n{declarations}\n\n{exports}\n")
}

fn generate_doc_comment(indent: &str, docs: &[String]) -> String {
    if docs.is_empty() {
        return "".to_string();
    }

    let comment = docs
        .iter()
        .flat_map(|doc| doc.split('\n'))
        .map(|line| format!("{indent}/// {line}"))
        .collect::<Vec<String>>()
        .join("\n");

    format!("{comment}\n")
}

struct Scope<'a> {
    root: &'a Root,
    imports: ImportMap,
    current: Option<&'a Name>,
}

impl<'a> Scope<'a> {
    fn new(root: &'a Root) -> Self {
        Scope {
            root,
            imports: ImportMap::default(),
            current: None,
        }
    }

    fn for_defined_type(root: &'a Root, name: &'a Name) -> Self {
        Scope {
            current: Some(name),
            ..Scope::new(root)
        }
    }

    fn import(&mut self, module: &str, item: &str) -> String {
        self.imports.add(module, item);
        item.to_string()
    }

    fn borsh(&mut self) {
        self.imports.add("borsh", "BorshDeserialize");
        self.imports.add("borsh", "BorshSerialize");
    }

    fn defined(&mut self, name: &Name) -> String {
        let pascal = name.pascal();
        match self.current {
            Some(current) if current == name => pascal,
            _ => self.import(&format!("{GENERATED}::types"), &pascal),
        }
    }

    fn program_id(&mut self) -> String {
        let constant = program_id_constant(self.root);
        self.import(&format!("{GENERATED}::programs"), &constant)
    }

    fn render(self, body: String) -> String {
        if self.imports.is_empty() {
            format!("{HEADER}\n\n{body}\n")
        } else {
            format!("{HEADER}\n\n{}\n\n{body}\n", self.imports.to_rust())
        }
    }
}

fn program_id_constant(root: &Root) -> String {
    format!("{}_ID", root.program.name.screaming())
}

fn type_ref(scope: &mut Scope, type_: &Type) -> String {
    match type_ {
        Type::Number(format) => format.as_str().to_string(),
        Type::Boolean => "bool".to_string(),
        Type::String => "String".to_string(),
        Type::PublicKey => scope.import("solana_pubkey", "Pubkey"),
        Type::Bytes => "Vec<u8>".to_string(),
        Type::Array(item, Count::Fixed(size)) => format!("[{}; {size}]", type_ref(scope, item)),
        Type::Array(item, Count::Prefixed) => format!("Vec<{}>", type_ref(scope, item)),
        Type::Option(item, OptionPrefix::U8) => format!("Option<{}>", type_ref(scope, item)),
        Type::Option(item, OptionPrefix::U32) => {
            let item = type_ref(scope, item);
            let option = scope.import(&format!("{GENERATED}::shared"), "COption");
            format!("{option}<{item}>")
        }
        Type::Tuple(items) => {
            let types = items.iter().map(|item| type_ref(scope, item)).join(", ");
            if items.len() == 1 {
                format!("({types},)")
            } else {
                format!("({types})")
            }
        }
        Type::Defined(name) => scope.defined(name),
    }
}

/// The derives of a borsh type, `Eq` needs every float to be absent.
fn derives(has_float: bool, extra: &[&str]) -> String {
    let mut derives = vec!["BorshSerialize", "BorshDeserialize", "Clone", "Debug", "PartialEq"];
    if !has_float {
        derives.push("Eq");
    }

    derives.extend_from_slice(extra);
    format!("#[derive({})]", derives.join(", "))
}

fn struct_fields(scope: &mut Scope, fields: &[Field], indent: &str, visibility: &str) -> Vec<String> {
    fields
        .iter()
        .map(|field| {
            let docs = generate_doc_comment(indent, &field.docs);
            let name = identifier(field.name.snake());
            let type_ = type_ref(scope, &field.type_);
            format!("{docs}{indent}{visibility}{name}: {type_},")
        })
        .collect()
}

fn generate_struct(name: &str, derives: &str, docs: &str, fields: Vec<String>) -> String {
    if fields.is_empty() {
        format!("{docs}{derives}\npub struct {name} {{}}")
    } else {
        format!("{docs}{derives}\npub struct {name} {{\n{}\n}}", fields.join("\n"))
    }
}

fn generate_defined_type(root: &Root, defined: &DefinedType) -> String {
    let mut scope = Scope::for_defined_type(root, &defined.name);
    let name = defined.name.pascal();
    let docs = generate_doc_comment("", &defined.docs);
    let has_float = root.type_def_contains_float(&defined.type_);

    let body = match &defined.type_ {
        TypeDef::Struct(fields) => {
            scope.borsh();
            let fields = struct_fields(&mut scope, fields, "    ", "pub ");
            generate_struct(&name, &derives(has_float, &[]), &docs, fields)
        }
        TypeDef::Enum(variants) => {
            scope.borsh();
            let extra: &[&str] = if defined.type_.is_scalar_enum() {
                &["Copy", "Hash", "PartialOrd"]
            } else {
                &[]
            };
            let variants = variants
                .iter()
                .map(|variant| generate_variant(&mut scope, variant))
                .join("\n");
            format!(
                "{docs}{}\npub enum {name} {{\n{variants}\n}}",
                derives(has_float, extra)
            )
        }
        TypeDef::Alias(type_) => format!("{docs}pub type {name} = {};", type_ref(&mut scope, type_)),
    };

    scope.render(body)
}

fn generate_variant(scope: &mut Scope, variant: &Variant) -> String {
    let name = variant.name().pascal();
    match variant {
        Variant::Empty(_) => format!("    {name},"),
        Variant::Tuple(_, types) => {
            let types = types.iter().map(|type_| type_ref(scope, type_)).join(", ");
            format!("    {name}({types}),")
        }
        Variant::Struct(_, fields) => {
            let fields = struct_fields(scope, fields, "        ", "").join("\n");
            format!("    {name} {{\n{fields}\n    }},")
        }
    }
}

fn discriminator_constant(constant: &str, bytes: &[u8]) -> String {
    format!(
        "pub const {constant}: [u8; {}] = [{}];",
        bytes.len(),
        bytes.iter().join(", ")
    )
}

fn generate_account(root: &Root, account: &Account) -> String {
    let mut scope = Scope::new(root);
    scope.borsh();
    let name = account.name.pascal();
    let docs = generate_doc_comment("", &account.docs);
    let constant = format!("{}_DISCRIMINATOR", account.name.screaming());
    let mut sections = vec![];

    let mut fields = vec![];
    if let Some(bytes) = &account.discriminator {
        sections.push(discriminator_constant(&constant, bytes));
        fields.push(format!("    pub discriminator: [u8; {}],", bytes.len()));
    }

    fields.extend(struct_fields(&mut scope, &account.data, "    ", "pub "));
    let has_float = root.fields_contain_float(&account.data);
    sections.push(generate_struct(&name, &derives(has_float, &[]), &docs, fields));

    let mut methods = vec![];
    if let Some(size) = account.size(root) {
        methods.push(format!("    pub const LEN: usize = {size};"));
    }

    let check = if account.discriminator.is_some() {
        format!(
            "        if !data.starts_with(&{constant}) {{
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                \"invalid {name} discriminator\",
            ));
        }}

"
        )
    } else {
        "".to_string()
    };
    methods.push(format!(
        "    /// Decode the account from its raw data.
    pub fn from_bytes(data: &[u8]) -> std::io::Result<Self> {{
{check}        let mut data = data;
        Self::deserialize(&mut data)
    }}"
    ));
    sections.push(format!("impl {name} {{\n{}\n}}", methods.join("\n\n")));

    scope.render(sections.join("\n\n"))
}

/// Arguments and accounts share the builder, a clashing argument gets an
/// `_arg` suffix.
fn argument_key(instruction: &Instruction, argument: &Field) -> String {
    if instruction.get_account(&argument.name).is_some() {
        identifier(format!("{}_arg", argument.name.snake()))
    } else {
        identifier(argument.name.snake())
    }
}

fn account_type(scope: &mut Scope, account: &InstructionAccount) -> String {
    let pubkey = scope.import("solana_pubkey", "Pubkey");
    match account.is_signer {
        Signer::Either => format!("({pubkey}, bool)"),
        Signer::Yes | Signer::No => pubkey,
    }
}

fn account_meta(key: &str, signer: &str, writable: bool) -> String {
    if writable {
        format!("AccountMeta::new({key}, {signer})")
    } else {
        format!("AccountMeta::new_readonly({key}, {signer})")
    }
}

fn push_account_meta(scope: &mut Scope, account: &InstructionAccount) -> String {
    let key = identifier(account.name.snake());
    let writable = account.is_writable;
    if account.is_optional {
        let program_id = scope.program_id();
        let (pattern, meta) = match account.is_signer {
            Signer::Either => (
                format!("({key}, as_signer)"),
                account_meta(&key, "as_signer", writable),
            ),
            Signer::Yes => (key.clone(), account_meta(&key, "true", writable)),
            Signer::No => (key.clone(), account_meta(&key, "false", writable)),
        };

        format!(
            "        if let Some({pattern}) = self.{key} {{
            accounts.push({meta});
        }} else {{
            accounts.push(AccountMeta::new_readonly({program_id}, false));
        }}"
        )
    } else {
        let meta = match account.is_signer {
            Signer::Either => account_meta(&format!("self.{key}.0"), &format!("self.{key}.1"), writable),
            Signer::Yes => account_meta(&format!("self.{key}"), "true", writable),
            Signer::No => account_meta(&format!("self.{key}"), "false", writable),
        };
        format!("        accounts.push({meta});")
    }
}

fn generate_instruction(root: &Root, instruction: &Instruction) -> String {
    let mut scope = Scope::new(root);
    scope.borsh();
    scope.import("solana_instruction", "AccountMeta");
    scope.import("solana_instruction", "Instruction");

    let name = instruction.name.pascal();
    let constant = format!("{}_DISCRIMINATOR", instruction.name.screaming());
    let has_args = !instruction.arguments.is_empty();
    let mut sections = vec![];

    if let Some(bytes) = &instruction.discriminator {
        sections.push(discriminator_constant(&constant, bytes));
    }

    sections.push(generate_accounts_struct(&mut scope, instruction, &name));
    sections.push(generate_instruction_data(instruction, &name, &constant));

    if has_args {
        let fields = struct_fields(&mut scope, &instruction.arguments, "    ", "pub ");
        let has_float = root.fields_contain_float(&instruction.arguments);
        sections.push(generate_struct(
            &format!("{name}InstructionArgs"),
            &derives(has_float, &[]),
            "",
            fields,
        ));
    }

    sections.push(generate_builder(&mut scope, instruction, &name));
    scope.render(sections.join("\n\n"))
}

fn generate_accounts_struct(scope: &mut Scope, instruction: &Instruction, name: &str) -> String {
    let fields = instruction
        .accounts
        .iter()
        .map(|account| {
            let docs = generate_doc_comment("    ", &account.docs);
            let type_ = account_type(scope, account);
            let type_ = if account.is_optional {
                format!("Option<{type_}>")
            } else {
                type_
            };
            format!("{docs}    pub {}: {type_},", identifier(account.name.snake()))
        })
        .collect::<Vec<String>>();

    let pushes = instruction
        .accounts
        .iter()
        .map(|account| push_account_meta(scope, account))
        .join("\n");

    let (signature, forward, data) = if instruction.arguments.is_empty() {
        (
            "".to_string(),
            "",
            format!("        let data = borsh::to_vec(&{name}InstructionData::new())?;"),
        )
    } else {
        (
            format!(", args: {name}InstructionArgs"),
            "args, ",
            format!(
                "        let mut data = borsh::to_vec(&{name}InstructionData::new())?;\n        data.append(&mut borsh::to_vec(&args)?);"
            ),
        )
    };

    let program_id = scope.program_id();
    let docs = generate_doc_comment("", &instruction.docs);
    let struct_ = if fields.is_empty() {
        format!("{docs}#[derive(Clone, Debug)]\npub struct {name} {{}}")
    } else {
        format!("{docs}#[derive(Clone, Debug)]\npub struct {name} {{\n{}\n}}", fields.join("\n"))
    };

    format!(
        "/// Accounts.
{struct_}

impl {name} {{
    pub fn instruction(&self{signature}) -> std::io::Result<Instruction> {{
        self.instruction_with_remaining_accounts({forward}&[])
    }}

    #[allow(clippy::vec_init_then_push)]
    pub fn instruction_with_remaining_accounts(
        &self{signature},
        remaining_accounts: &[AccountMeta],
    ) -> std::io::Result<Instruction> {{
        let mut accounts = Vec::with_capacity({} + remaining_accounts.len());
{pushes}
        accounts.extend_from_slice(remaining_accounts);
{data}

        Ok(Instruction {{
            program_id: {program_id},
            accounts,
            data,
        }})
    }}
}}",
        instruction.accounts.len()
    )
}

fn generate_instruction_data(instruction: &Instruction, name: &str, constant: &str) -> String {
    let data = format!("{name}InstructionData");
    let (field, value) = match &instruction.discriminator {
        Some(bytes) => (
            format!("\n    discriminator: [u8; {}],\n", bytes.len()),
            format!(" discriminator: {constant} "),
        ),
        None => ("".to_string(), "".to_string()),
    };

    format!(
        "{}
pub struct {data} {{{field}}}

impl {data} {{
    pub fn new() -> Self {{
        Self {{{value}}}
    }}
}}

impl Default for {data} {{
    fn default() -> Self {{
        Self::new()
    }}
}}",
        derives(false, &[])
    )
}

fn generate_builder(scope: &mut Scope, instruction: &Instruction, name: &str) -> String {
    let builder = format!("{name}Builder");
    let pubkey = scope.import("solana_pubkey", "Pubkey");

    let mut fields = vec![];
    let mut setters = vec![];
    let mut accounts = vec![];
    let mut listing = vec![];

    for (index, account) in instruction.accounts.iter().enumerate() {
        let key = identifier(account.name.snake());
        let type_ = account_type(scope, account);
        fields.push(format!("    {key}: Option<{type_}>,"));

        let flags = [
            account.is_writable.then_some("writable"),
            match account.is_signer {
                Signer::Yes => Some("signer"),
                Signer::Either => Some("signer?"),
                Signer::No => None,
            },
            (account.is_optional || account.default_value.is_some()).then_some("optional"),
        ]
        .into_iter()
        .flatten()
        .join(", ");
        let default = match &account.default_value {
            Some(AccountDefault::Address(address)) => format!(" (default to `{address}`)"),
            _ => "".to_string(),
        };
        listing.push(format!("///   {index}. `[{flags}]` {}{default}", account.name.snake()));

        let docs = generate_doc_comment("    ", &account.docs);
        let setter = match (account.is_optional, account.is_signer) {
            (true, Signer::Either) => format!(
                "    pub fn {key}(&mut self, {key}: Option<{pubkey}>, as_signer: bool) -> &mut Self {{
        self.{key} = {key}.map(|{key}| ({key}, as_signer));
        self
    }}"
            ),
            (true, _) => format!(
                "    pub fn {key}(&mut self, {key}: Option<{pubkey}>) -> &mut Self {{
        self.{key} = {key};
        self
    }}"
            ),
            (false, Signer::Either) => format!(
                "    pub fn {key}(&mut self, {key}: {pubkey}, as_signer: bool) -> &mut Self {{
        self.{key} = Some(({key}, as_signer));
        self
    }}"
            ),
            (false, _) => format!(
                "    pub fn {key}(&mut self, {key}: {pubkey}) -> &mut Self {{
        self.{key} = Some({key});
        self
    }}"
            ),
        };
        setters.push(format!("{docs}    #[inline(always)]\n{setter}"));

        let value = match (&account.default_value, account.is_optional) {
            (_, true) => format!("self.{key}"),
            (Some(AccountDefault::Address(address)), false) => {
                let pubkey_macro = scope.import("solana_pubkey", "pubkey");
                let default = format!("{pubkey_macro}!(\"{address}\")");
                match account.is_signer {
                    Signer::Either => format!("self.{key}.unwrap_or(({default}, false))"),
                    Signer::Yes | Signer::No => format!("self.{key}.unwrap_or({default})"),
                }
            }
            _ => {
                let missing = scope.import(&format!("{GENERATED}::shared"), "missing_field");
                format!("self.{key}.ok_or_else(|| {missing}(\"{key}\"))?")
            }
        };
        accounts.push(format!("            {key}: {value},"));
    }

    let mut arguments = vec![];
    for argument in &instruction.arguments {
        let key = argument_key(instruction, argument);
        let field = identifier(argument.name.snake());
        let docs = generate_doc_comment("    ", &argument.docs);
        let (stored, value) = match &argument.type_ {
            Type::Option(item, OptionPrefix::U8) => {
                let item = type_ref(scope, item);
                (item, format!("self.{key}.clone()"))
            }
            type_ => {
                let missing = scope.import(&format!("{GENERATED}::shared"), "missing_field");
                (
                    type_ref(scope, type_),
                    format!("self.{key}.clone().ok_or_else(|| {missing}(\"{key}\"))?"),
                )
            }
        };

        fields.push(format!("    {key}: Option<{stored}>,"));
        setters.push(format!(
            "{docs}    #[inline(always)]
    pub fn {key}(&mut self, {key}: {stored}) -> &mut Self {{
        self.{key} = Some({key});
        self
    }}"
        ));
        arguments.push(format!("            {field}: {value},"));
    }

    fields.push("    __remaining_accounts: Vec<AccountMeta>,".to_string());
    setters.push(
        "    /// Add an additional account to the instruction.
    #[inline(always)]
    pub fn add_remaining_account(&mut self, account: AccountMeta) -> &mut Self {
        self.__remaining_accounts.push(account);
        self
    }

    /// Add additional accounts to the instruction.
    #[inline(always)]
    pub fn add_remaining_accounts(&mut self, accounts: &[AccountMeta]) -> &mut Self {
        self.__remaining_accounts.extend_from_slice(accounts);
        self
    }"
        .to_string(),
    );

    let accounts = if accounts.is_empty() {
        format!("        let accounts = {name} {{}};")
    } else {
        format!("        let accounts = {name} {{\n{}\n        }};", accounts.join("\n"))
    };
    let call = if arguments.is_empty() {
        format!("{accounts}\n\n        accounts.instruction_with_remaining_accounts(&self.__remaining_accounts)")
    } else {
        format!(
            "{accounts}\n        let args = {name}InstructionArgs {{\n{}\n        }};\n\n        accounts.instruction_with_remaining_accounts(args, &self.__remaining_accounts)",
            arguments.join("\n")
        )
    };

    let listing = if listing.is_empty() {
        "".to_string()
    } else {
        format!("///\n/// ### Accounts:\n///\n{}\n", listing.join("\n"))
    };

    format!(
        "/// Instruction builder for `{name}`.
{listing}#[derive(Clone, Debug, Default)]
pub struct {builder} {{
{}
}}

impl {builder} {{
    pub fn new() -> Self {{
        Self::default()
    }}

{}

    pub fn instruction(&self) -> std::io::Result<Instruction> {{
{call}
    }}
}}",
        fields.join("\n"),
        setters.join("\n\n")
    )
}

fn generate_program(root: &Root) -> String {
    let program = &root.program;
    let mut scope = Scope::new(root);
    let pubkey = scope.import("solana_pubkey", "Pubkey");
    let constant = program_id_constant(root);

    let value = if program.public_key.is_empty() {
        format!("{pubkey}::new_from_array([0; 32])")
    } else {
        let pubkey_macro = scope.import("solana_pubkey", "pubkey");
        format!("{pubkey_macro}!(\"{}\")", program.public_key)
    };

    scope.render(format!(
        "/// `{}` program ID.\npub const {constant}: {pubkey} = {value};",
        program.name.snake()
    ))
}

struct ErrorView {
    name: String,
    code: u32,
    hex: String,
    doc: String,
    message: String,
}

#[derive(Template)]
#[template(path = "rust/errors.rs", escape = "none")]
struct ErrorsTemplate<'a> {
    header: &'a str,
    program: String,
    errors: Vec<ErrorView>,
}

fn generate_errors(root: &Root) -> Result<String, Error> {
    let program = &root.program;
    let errors = program
        .errors
        .iter()
        .map(|error| ErrorView {
            name: error.name.pascal(),
            code: error.code,
            hex: format!("{:x}", error.code),
            doc: error.message.replace('\n', " "),
            message: error
                .message
                .replace('\\', "\\\\")
                .replace('"', "\\\"")
                .replace('{', "{{")
                .replace('}', "}}")
                .replace('\n', "\\n"),
        })
        .collect();

    let template = ErrorsTemplate {
        header: HEADER,
        program: program.name.pascal(),
        errors,
    };

    Ok(format!("{}\n", template.render()?.trim_end()))
}

const SHARED: &str = r#"
use borsh::{BorshDeserialize, BorshSerialize};
use std::io::{Error, ErrorKind, Read, Result, Write};

/// An optional value prefixed with a `u32` tag.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum COption<T> {
    None,
    Some(T),
}

impl<T> From<Option<T>> for COption<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => COption::Some(value),
            None => COption::None,
        }
    }
}

impl<T> From<COption<T>> for Option<T> {
    fn from(value: COption<T>) -> Self {
        match value {
            COption::Some(value) => Some(value),
            COption::None => None,
        }
    }
}

impl<T: BorshSerialize> BorshSerialize for COption<T> {
    fn serialize<W: Write>(&self, writer: &mut W) -> Result<()> {
        match self {
            COption::None => 0u32.serialize(writer),
            COption::Some(value) => {
                1u32.serialize(writer)?;
                value.serialize(writer)
            }
        }
    }
}

impl<T: BorshDeserialize> BorshDeserialize for COption<T> {
    fn deserialize_reader<R: Read>(reader: &mut R) -> Result<Self> {
        match u32::deserialize_reader(reader)? {
            0 => Ok(COption::None),
            1 => Ok(COption::Some(T::deserialize_reader(reader)?)),
            tag => Err(Error::new(
                ErrorKind::InvalidData,
                format!("invalid COption tag {tag}"),
            )),
        }
    }
}

/// The error of a builder missing a required value.
pub fn missing_field(name: &str) -> Error {
    Error::new(ErrorKind::InvalidInput, format!("{name} is not set"))
}
"#;
