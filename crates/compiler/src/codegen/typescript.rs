//! Renders a TypeScript client built on the codecs of `@solana/kit`.
use crate::ast::canonical::{
    Account, AccountDefault, Count, DefinedType, Field, Instruction, InstructionAccount,
    OptionPrefix, Root, Seed, Signer, Type, TypeDef, Variant,
};
use crate::ast::name::Name;
use crate::codegen::command::Options;
use crate::codegen::fragment::{ImportMap, RenderMap};
use crate::error::Error;
use askama::Template;
use itertools::Itertools;

const KIT: &str = "@solana/kit";

const HEADER: &str = "/**
 * This code was AUTOGENERATED using clientgen.
 * Please DO NOT EDIT THIS FILE, instead rerun clientgen
 * to update it.
 */";

/// Render the client and print it or write it to `options.output`.
pub async fn generate_typescript_client(root: &Root, options: &Options) -> Result<(), Error> {
    let files = render_typescript_client(root)?;
    files.emit(options).await?;
    Ok(())
}

pub fn render_typescript_client(root: &Root) -> Result<RenderMap, Error> {
    let program = &root.program;
    let mut files = RenderMap::default();
    let mut directories = vec![];

    if !program.accounts.is_empty() {
        for account in &program.accounts {
            let path = format!("accounts/{}.ts", account.name.camel());
            files.add(path, generate_account(root, account));
        }

        let names = program.accounts.iter().map(|account| &account.name);
        files.add("accounts/index.ts", generate_index(names));
        directories.push("accounts");
    }

    if !program.errors.is_empty() {
        let path = format!("errors/{}.ts", program.name.camel());
        files.add(path, generate_errors(root)?);
        files.add("errors/index.ts", generate_index([&program.name]));
        directories.push("errors");
    }

    if !program.instructions.is_empty() {
        for instruction in &program.instructions {
            let path = format!("instructions/{}.ts", instruction.name.camel());
            files.add(path, generate_instruction(root, instruction));
        }

        let names = program.instructions.iter().map(|instruction| &instruction.name);
        files.add("instructions/index.ts", generate_index(names));
        directories.push("instructions");
    }

    let path = format!("programs/{}.ts", program.name.camel());
    files.add(path, generate_program(root));
    files.add("programs/index.ts", generate_index([&program.name]));
    directories.push("programs");

    if !program.defined_types.is_empty() {
        for defined in &program.defined_types {
            let path = format!("types/{}.ts", defined.name.camel());
            files.add(path, generate_defined_type(root, defined));
        }

        let names = program.defined_types.iter().map(|defined| &defined.name);
        files.add("types/index.ts", generate_index(names));
        directories.push("types");
    }

    files.add("shared/index.ts", format!("{HEADER}\n\n{}", SHARED.trim_start()));

    let exports = directories
        .iter()
        .map(|directory| format!("export * from './{directory}';"))
        .join("\n");
    files.add("index.ts", format!("{HEADER}\n\n{exports}\n"));

    tracing::debug!(files = files.len(), "rendered typescript client");
    Ok(files)
}

#[derive(Clone, Copy)]
enum Side {
    Encoder,
    Decoder,
}

impl Side {
    fn as_str(self) -> &'static str {
        match self {
            Side::Encoder => "Encoder",
            Side::Decoder => "Decoder",
        }
    }
}

/// The imports of the file being rendered.
struct Scope<'a> {
    root: &'a Root,
    imports: ImportMap,
    /// Set while rendering `types/<name>.ts`, whose siblings are imported
    /// directly.
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

    /// Import `item` from `module` and return the name to use for it.
    fn import(&mut self, module: &str, item: &str) -> String {
        self.imports.add(module, item);
        item.trim_start_matches("type ").to_string()
    }

    fn kit(&mut self, item: &str) -> String {
        self.import(KIT, item)
    }

    fn kit_codec(&mut self, base: &str, side: Side) -> String {
        self.kit(&format!("{base}{}", side.as_str()))
    }

    fn defined(&mut self, name: &Name, item: &str) -> String {
        match self.current {
            Some(current) if current == name => item.trim_start_matches("type ").to_string(),
            Some(_) => self.import(&format!("./{}", name.camel()), item),
            None => self.import("../types", item),
        }
    }

    fn program_address(&mut self) -> String {
        let constant = program_address_constant(self.root);
        self.import("../programs", &constant)
    }

    fn render(self, body: String) -> String {
        if self.imports.is_empty() {
            format!("{HEADER}\n\n{body}\n")
        } else {
            format!("{HEADER}\n\n{}\n\n{body}\n", self.imports.to_typescript())
        }
    }
}

fn program_address_constant(root: &Root) -> String {
    format!("{}_PROGRAM_ADDRESS", root.program.name.screaming())
}

fn generate_index<'a, I: IntoIterator<Item = &'a Name>>(names: I) -> String {
    let exports = names
        .into_iter()
        .map(|name| format!("export * from './{}';", name.camel()))
        .join("\n");

    format!("{HEADER}\n\n{exports}\n")
}

fn generate_doc_comment(indent: &str, docs: &[String]) -> String {
    if docs.is_empty() {
        return "".to_string();
    }

    let content = docs
        .iter()
        .flat_map(|doc| doc.split('\n'))
        .map(|line| format!("{indent} * {}", line.replace("*/", "*\\/")))
        .collect::<Vec<String>>()
        .join("\n");

    format!("{indent}/**\n{content}\n{indent} */\n")
}

/// The TypeScript type of a value. Strict types are what decoders
/// produce, loose types are what encoders accept.
fn type_ref(scope: &mut Scope, type_: &Type, strict: bool) -> String {
    match type_ {
        Type::Number(format) if format.is_big() && strict => "bigint".to_string(),
        Type::Number(format) if format.is_big() => "number | bigint".to_string(),
        Type::Number(_) => "number".to_string(),
        Type::Boolean => "boolean".to_string(),
        Type::String => "string".to_string(),
        Type::PublicKey => scope.kit("type Address"),
        Type::Bytes => scope.kit("type ReadonlyUint8Array"),
        Type::Array(item, _) => format!("Array<{}>", type_ref(scope, item, strict)),
        Type::Option(item, _) => {
            let item = type_ref(scope, item, strict);
            let option = if strict {
                scope.kit("type Option")
            } else {
                scope.kit("type OptionOrNullable")
            };
            format!("{option}<{item}>")
        }
        Type::Tuple(items) => {
            let items = items
                .iter()
                .map(|item| type_ref(scope, item, strict))
                .join(", ");
            format!("readonly [{items}]")
        }
        Type::Defined(name) if strict => scope.defined(name, &format!("type {}", name.pascal())),
        Type::Defined(name) => scope.defined(name, &format!("type {}Args", name.pascal())),
    }
}

fn codec_ref(scope: &mut Scope, type_: &Type, side: Side) -> String {
    match type_ {
        Type::Number(format) => {
            let base = format!("get{}", format.as_str().to_uppercase());
            format!("{}()", scope.kit_codec(&base, side))
        }
        Type::Boolean => format!("{}()", scope.kit_codec("getBool", side)),
        Type::PublicKey => format!("{}()", scope.kit_codec("getAddress", side)),
        Type::String => size_prefixed(scope, "getUtf8", side),
        Type::Bytes => size_prefixed(scope, "getBytes", side),
        Type::Array(item, count) => {
            let item = codec_ref(scope, item, side);
            let array = scope.kit_codec("getArray", side);
            match count {
                Count::Fixed(size) => format!("{array}({item}, {{ size: {size} }})"),
                Count::Prefixed => format!("{array}({item})"),
            }
        }
        Type::Option(item, prefix) => {
            let item = codec_ref(scope, item, side);
            let option = scope.kit_codec("getOption", side);
            match prefix {
                OptionPrefix::U8 => format!("{option}({item})"),
                OptionPrefix::U32 => {
                    let u32 = scope.kit_codec("getU32", side);
                    format!("{option}({item}, {{ prefix: {u32}() }})")
                }
            }
        }
        Type::Tuple(items) => {
            let items = items.iter().map(|item| codec_ref(scope, item, side)).join(", ");
            let tuple = scope.kit_codec("getTuple", side);
            format!("{tuple}([{items}])")
        }
        Type::Defined(name) => {
            let function = format!("get{}{}", name.pascal(), side.as_str());
            format!("{}()", scope.defined(name, &function))
        }
    }
}

fn size_prefixed(scope: &mut Scope, base: &str, side: Side) -> String {
    let prefix = scope.kit(&format!("add{}SizePrefix", side.as_str()));
    let inner = scope.kit_codec(base, side);
    let u32 = scope.kit_codec("getU32", side);
    format!("{prefix}({inner}(), {u32}())")
}

fn fixed_bytes(scope: &mut Scope, side: Side, size: usize) -> String {
    let fix = scope.kit(&format!("fix{}Size", side.as_str()));
    let bytes = scope.kit_codec("getBytes", side);
    format!("{fix}({bytes}(), {size})")
}

/// Seeds are hashed as raw bytes, strings and byte vectors lose their
/// length prefix.
fn seed_codec(scope: &mut Scope, type_: &Type) -> String {
    match type_ {
        Type::String => format!("{}()", scope.kit("getUtf8Encoder")),
        Type::Bytes => format!("{}()", scope.kit("getBytesEncoder")),
        _ => codec_ref(scope, type_, Side::Encoder),
    }
}

fn object_type(scope: &mut Scope, fields: &[Field], strict: bool, leading: Option<String>) -> String {
    let mut lines = leading.into_iter().collect::<Vec<String>>();
    for field in fields {
        let docs = generate_doc_comment("  ", &field.docs);
        let type_ = type_ref(scope, &field.type_, strict);
        lines.push(format!("{docs}  {}: {type_};", field.name.camel()));
    }

    if lines.is_empty() {
        "{}".to_string()
    } else {
        format!("{{\n{}\n}}", lines.join("\n"))
    }
}

fn field_codecs(scope: &mut Scope, fields: &[Field], side: Side) -> Vec<(String, String)> {
    fields
        .iter()
        .map(|field| (field.name.camel(), codec_ref(scope, &field.type_, side)))
        .collect()
}

fn struct_codec(scope: &mut Scope, entries: Vec<(String, String)>, side: Side, indent: &str) -> String {
    let get = scope.kit_codec("getStruct", side);
    if entries.is_empty() {
        return format!("{get}([])");
    }

    let entries = entries
        .iter()
        .map(|(name, codec)| format!("{indent}  ['{name}', {codec}],"))
        .join("\n");

    format!("{get}([\n{entries}\n{indent}])")
}

/// Codec of a struct that starts with a constant discriminator, which the
/// encoder fills in.
fn discriminated_codec(
    scope: &mut Scope,
    fields: &[Field],
    discriminator: Option<(&str, usize)>,
    side: Side,
) -> String {
    let mut entries = field_codecs(scope, fields, side);
    match discriminator {
        None => struct_codec(scope, entries, side, "  "),
        Some((constant, size)) => {
            entries.insert(0, ("discriminator".to_string(), fixed_bytes(scope, side, size)));
            match side {
                Side::Decoder => struct_codec(scope, entries, side, "  "),
                Side::Encoder => {
                    let transform = scope.kit("transformEncoder");
                    let inner = struct_codec(scope, entries, side, "    ");
                    format!(
                        "{transform}(\n    {inner},\n    (value) => ({{ ...value, discriminator: {constant} }})\n  )"
                    )
                }
            }
        }
    }
}

fn codec_functions(
    scope: &mut Scope,
    prefix: &str,
    strict: &str,
    loose: &str,
    encoder: String,
    decoder: String,
) -> String {
    let encoder_type = scope.kit("type Encoder");
    let decoder_type = scope.kit("type Decoder");
    let codec_type = scope.kit("type Codec");
    let combine = scope.kit("combineCodec");

    format!(
        "export function get{prefix}Encoder(): {encoder_type}<{loose}> {{
  return {encoder};
}}

export function get{prefix}Decoder(): {decoder_type}<{strict}> {{
  return {decoder};
}}

export function get{prefix}Codec(): {codec_type}<{loose}, {strict}> {{
  return {combine}(get{prefix}Encoder(), get{prefix}Decoder());
}}"
    )
}

fn discriminator_constant(scope: &mut Scope, constant: &str, prefix: &str, bytes: &[u8]) -> String {
    let codec = fixed_bytes(scope, Side::Encoder, bytes.len());
    format!(
        "export const {constant} = new Uint8Array([{}]);

export function get{prefix}DiscriminatorBytes() {{
  return {codec}.encode({constant});
}}",
        bytes.iter().join(", ")
    )
}

fn generate_defined_type(root: &Root, defined: &DefinedType) -> String {
    let mut scope = Scope::for_defined_type(root, &defined.name);
    let name = defined.name.pascal();
    let args = format!("{name}Args");
    let docs = generate_doc_comment("", &defined.docs);

    let sections = match &defined.type_ {
        TypeDef::Enum(variants) if defined.type_.is_scalar_enum() => {
            let members = variants
                .iter()
                .map(|variant| format!("  {},", variant.name().pascal()))
                .join("\n");
            let encoder = format!("{}({name})", scope.kit_codec("getEnum", Side::Encoder));
            let decoder = format!("{}({name})", scope.kit_codec("getEnum", Side::Decoder));

            vec![
                format!("{docs}export enum {name} {{\n{members}\n}}"),
                format!("export type {args} = {name};"),
                codec_functions(&mut scope, &name, &name, &args, encoder, decoder),
            ]
        }
        TypeDef::Enum(variants) => {
            let strict = union_type(&mut scope, variants, true);
            let loose = union_type(&mut scope, variants, false);
            let encoder = union_codec(&mut scope, variants, Side::Encoder);
            let decoder = union_codec(&mut scope, variants, Side::Decoder);

            vec![
                format!("{docs}export type {name} ={strict};"),
                format!("export type {args} ={loose};"),
                codec_functions(&mut scope, &name, &name, &args, encoder, decoder),
                format!(
                    "export function is{name}<K extends {name}['__kind']>(
  kind: K,
  value: {name}
): value is {name} & {{ __kind: K }} {{
  return value.__kind === kind;
}}"
                ),
            ]
        }
        TypeDef::Struct(fields) => {
            let strict = object_type(&mut scope, fields, true, None);
            let loose = object_type(&mut scope, fields, false, None);
            let encoder = discriminated_codec(&mut scope, fields, None, Side::Encoder);
            let decoder = discriminated_codec(&mut scope, fields, None, Side::Decoder);

            vec![
                format!("{docs}export type {name} = {strict};"),
                format!("export type {args} = {loose};"),
                codec_functions(&mut scope, &name, &name, &args, encoder, decoder),
            ]
        }
        TypeDef::Alias(type_) => {
            let strict = type_ref(&mut scope, type_, true);
            let loose = type_ref(&mut scope, type_, false);
            let encoder = codec_ref(&mut scope, type_, Side::Encoder);
            let decoder = codec_ref(&mut scope, type_, Side::Decoder);

            vec![
                format!("{docs}export type {name} = {strict};"),
                format!("export type {args} = {loose};"),
                codec_functions(&mut scope, &name, &name, &args, encoder, decoder),
            ]
        }
    };

    scope.render(sections.join("\n\n"))
}

fn union_type(scope: &mut Scope, variants: &[Variant], strict: bool) -> String {
    variants
        .iter()
        .map(|variant| {
            let kind = variant.name().pascal();
            let member = match variant {
                Variant::Empty(_) => format!("{{ __kind: '{kind}' }}"),
                Variant::Tuple(_, types) => {
                    let types = types.iter().map(|type_| type_ref(scope, type_, strict)).join(", ");
                    format!("{{ __kind: '{kind}'; fields: readonly [{types}] }}")
                }
                Variant::Struct(_, fields) => {
                    let fields = fields
                        .iter()
                        .map(|field| format!("{}: {};", field.name.camel(), type_ref(scope, &field.type_, strict)))
                        .join(" ");
                    format!("{{ __kind: '{kind}'; {fields} }}")
                }
            };

            format!("\n  | {member}")
        })
        .join("")
}

fn union_codec(scope: &mut Scope, variants: &[Variant], side: Side) -> String {
    let union = scope.kit_codec("getDiscriminatedUnion", side);
    let variants = variants
        .iter()
        .map(|variant| {
            let codec = match variant {
                Variant::Empty(_) => format!("{}()", scope.kit_codec("getUnit", side)),
                Variant::Tuple(_, types) => {
                    let types = types.iter().map(|type_| codec_ref(scope, type_, side)).join(", ");
                    let tuple = scope.kit_codec("getTuple", side);
                    let entries = vec![("fields".to_string(), format!("{tuple}([{types}])"))];
                    struct_codec(scope, entries, side, "    ")
                }
                Variant::Struct(_, fields) => {
                    let entries = field_codecs(scope, fields, side);
                    struct_codec(scope, entries, side, "    ")
                }
            };

            format!("    ['{}', {codec}],", variant.name().pascal())
        })
        .join("\n");

    format!("{union}([\n{variants}\n  ])")
}

fn generate_account(root: &Root, account: &Account) -> String {
    let mut scope = Scope::new(root);
    let name = account.name.pascal();
    let args = format!("{name}Args");
    let docs = generate_doc_comment("", &account.docs);
    let constant = format!("{}_DISCRIMINATOR", account.name.screaming());
    let mut sections = vec![];

    let discriminator = account.discriminator.as_ref().map(|bytes| {
        sections.push(discriminator_constant(&mut scope, &constant, &name, bytes));
        (constant.as_str(), bytes.len())
    });

    let leading = discriminator
        .map(|_| format!("  discriminator: {};", scope.kit("type ReadonlyUint8Array")));
    let strict = object_type(&mut scope, &account.data, true, leading);
    let loose = object_type(&mut scope, &account.data, false, None);
    sections.push(format!("{docs}export type {name} = {strict};"));
    sections.push(format!("export type {args} = {loose};"));

    let encoder = discriminated_codec(&mut scope, &account.data, discriminator, Side::Encoder);
    let decoder = discriminated_codec(&mut scope, &account.data, discriminator, Side::Decoder);
    sections.push(codec_functions(&mut scope, &name, &name, &args, encoder, decoder));
    sections.push(account_fetchers(&mut scope, &name));

    if let Some(size) = account.size(root) {
        sections.push(format!(
            "export function get{name}Size(): number {{\n  return {size};\n}}"
        ));
    }

    scope.render(sections.join("\n\n"))
}

fn account_fetchers(scope: &mut Scope, name: &str) -> String {
    let account = scope.kit("type Account");
    let address = scope.kit("type Address");
    let encoded = scope.kit("type EncodedAccount");
    let config = scope.kit("type FetchAccountConfig");
    let maybe = scope.kit("type MaybeAccount");
    let maybe_encoded = scope.kit("type MaybeEncodedAccount");
    let assert_exists = scope.kit("assertAccountExists");
    let decode = scope.kit("decodeAccount");
    let fetch = scope.kit("fetchEncodedAccount");

    format!(
        "export function decode{name}<TAddress extends string = string>(
  encodedAccount: {encoded}<TAddress>
): {account}<{name}, TAddress>;
export function decode{name}<TAddress extends string = string>(
  encodedAccount: {maybe_encoded}<TAddress>
): {maybe}<{name}, TAddress>;
export function decode{name}<TAddress extends string = string>(
  encodedAccount: {encoded}<TAddress> | {maybe_encoded}<TAddress>
): {account}<{name}, TAddress> | {maybe}<{name}, TAddress> {{
  return {decode}(
    encodedAccount as {maybe_encoded}<TAddress>,
    get{name}Decoder()
  );
}}

export async function fetch{name}<TAddress extends string = string>(
  rpc: Parameters<typeof {fetch}>[0],
  address: {address}<TAddress>,
  config?: {config}
): Promise<{account}<{name}, TAddress>> {{
  const maybeAccount = await fetchMaybe{name}(rpc, address, config);
  {assert_exists}(maybeAccount);
  return maybeAccount;
}}

export async function fetchMaybe{name}<TAddress extends string = string>(
  rpc: Parameters<typeof {fetch}>[0],
  address: {address}<TAddress>,
  config?: {config}
): Promise<{maybe}<{name}, TAddress>> {{
  const maybeAccount = await {fetch}(rpc, address, config);
  return decode{name}(maybeAccount);
}}"
    )
}

/// Arguments share the input object with accounts, a clashing argument
/// gets an `Arg` suffix.
fn argument_key(instruction: &Instruction, argument: &Field) -> String {
    if instruction.get_account(&argument.name).is_some() {
        format!("{}Arg", argument.name.camel())
    } else {
        argument.name.camel()
    }
}

fn account_input_type(scope: &mut Scope, account: &InstructionAccount) -> String {
    match account.is_signer {
        Signer::Yes => scope.kit("type TransactionSigner"),
        Signer::No => scope.kit("type Address"),
        Signer::Either => {
            let address = scope.kit("type Address");
            let signer = scope.kit("type TransactionSigner");
            format!("{address} | {signer}")
        }
    }
}

fn address_literal(scope: &mut Scope, address: &str) -> String {
    format!("'{address}' as {}<'{address}'>", scope.kit("type Address"))
}

fn is_optional_input(account: &InstructionAccount) -> bool {
    account.is_optional || matches!(account.default_value, Some(AccountDefault::Address(_)))
}

fn generate_instruction(root: &Root, instruction: &Instruction) -> String {
    let mut scope = Scope::new(root);
    let name = instruction.name.pascal();
    let data = format!("{name}InstructionData");
    let data_args = format!("{name}InstructionDataArgs");
    let constant = format!("{}_DISCRIMINATOR", instruction.name.screaming());
    let mut sections = vec![];

    let discriminator = instruction.discriminator.as_ref().map(|bytes| {
        sections.push(discriminator_constant(&mut scope, &constant, &name, bytes));
        (constant.as_str(), bytes.len())
    });

    let leading = discriminator
        .map(|_| format!("  discriminator: {};", scope.kit("type ReadonlyUint8Array")));
    let strict = object_type(&mut scope, &instruction.arguments, true, leading);
    let loose = object_type(&mut scope, &instruction.arguments, false, None);
    sections.push(format!("export type {data} = {strict};"));
    sections.push(format!("export type {data_args} = {loose};"));

    let arguments = &instruction.arguments;
    let encoder = discriminated_codec(&mut scope, arguments, discriminator, Side::Encoder);
    let decoder = discriminated_codec(&mut scope, arguments, discriminator, Side::Decoder);
    sections.push(codec_functions(&mut scope, &data, &data, &data_args, encoder, decoder));

    sections.push(input_type(&mut scope, instruction, &format!("{name}Input"), &data_args));
    sections.push(sync_builder(&mut scope, instruction, &name, &data_args));

    if instruction.has_pda_defaults() {
        sections.push(async_input_type(&mut scope, instruction, &name));
        sections.push(async_builder(&mut scope, instruction, &name));
    }

    scope.render(sections.join("\n\n"))
}

fn input_type(scope: &mut Scope, instruction: &Instruction, input: &str, data_args: &str) -> String {
    let mut lines = vec![];
    for account in &instruction.accounts {
        let docs = generate_doc_comment("  ", &account.docs);
        let optional = if is_optional_input(account) { "?" } else { "" };
        let type_ = account_input_type(scope, account);
        lines.push(format!("{docs}  {}{optional}: {type_};", account.name.camel()));
    }

    for argument in &instruction.arguments {
        let docs = generate_doc_comment("  ", &argument.docs);
        let key = argument_key(instruction, argument);
        lines.push(format!("{docs}  {key}: {data_args}['{}'];", argument.name.camel()));
    }

    if lines.is_empty() {
        format!("export type {input} = {{}};")
    } else {
        format!("export type {input} = {{\n{}\n}};", lines.join("\n"))
    }
}

fn sync_builder(scope: &mut Scope, instruction: &Instruction, name: &str, data_args: &str) -> String {
    let address = scope.kit("type Address");
    let instruction_type = scope.kit("type Instruction");
    let to_account_meta = scope.import("../shared", "toAccountMeta");
    let program_address = scope.program_address();

    let metas = instruction
        .accounts
        .iter()
        .map(|account| {
            let key = account.name.camel();
            let writable = account.is_writable;
            match &account.default_value {
                Some(AccountDefault::Address(default)) => {
                    let default = address_literal(scope, default);
                    format!("      {to_account_meta}(input.{key} ?? ({default}), {writable}),")
                }
                _ if account.is_optional => format!(
                    "      input.{key}\n        ? {to_account_meta}(input.{key}, {writable})\n        : {to_account_meta}(programAddress, false),"
                ),
                _ => format!("      {to_account_meta}(input.{key}, {writable}),"),
            }
        })
        .join("\n");

    let args = instruction
        .arguments
        .iter()
        .map(|argument| {
            format!("    {}: input.{},", argument.name.camel(), argument_key(instruction, argument))
        })
        .join("\n");
    let args = if args.is_empty() {
        "{}".to_string()
    } else {
        format!("{{\n{args}\n  }}")
    };

    let docs = generate_doc_comment("", &instruction.docs);
    format!(
        "{docs}export function get{name}Instruction(
  input: {name}Input,
  config?: {{ programAddress?: {address} }}
): {instruction_type} {{
  const programAddress = config?.programAddress ?? {program_address};
  const args: {data_args} = {args};

  return {{
    programAddress,
    accounts: [
{metas}
    ],
    data: get{name}InstructionDataEncoder().encode(args),
  }};
}}"
    )
}

fn pda_accounts(instruction: &Instruction) -> impl Iterator<Item = (&InstructionAccount, &Vec<Seed>)> {
    instruction
        .accounts
        .iter()
        .filter_map(|account| match &account.default_value {
            Some(AccountDefault::Pda(seeds)) => Some((account, seeds)),
            _ => None,
        })
}

fn async_input_type(scope: &mut Scope, instruction: &Instruction, name: &str) -> String {
    let address = scope.kit("type Address");
    let omitted = pda_accounts(instruction)
        .map(|(account, _)| format!("'{}'", account.name.camel()))
        .join(" | ");
    let fields = pda_accounts(instruction)
        .map(|(account, _)| {
            let docs = generate_doc_comment("  ", &account.docs);
            format!("{docs}  {}?: {address};", account.name.camel())
        })
        .join("\n");

    format!("export type {name}AsyncInput = Omit<{name}Input, {omitted}> & {{\n{fields}\n}};")
}

/// The address expression of an account while deriving seeds.
fn seed_account_value(scope: &mut Scope, instruction: &Instruction, name: &Name, resolved: &[&Name]) -> String {
    if resolved.contains(&name) {
        return format!("{}Address", name.camel());
    }

    match instruction.get_account(name).and_then(|account| account.default_value.as_ref()) {
        Some(AccountDefault::Address(default)) => {
            let default = address_literal(scope, default);
            format!("input.{} ?? ({default})", name.camel())
        }
        _ => {
            let expect_address = scope.import("../shared", "expectAddress");
            format!("{expect_address}(input.{})", name.camel())
        }
    }
}

fn seed_expression(scope: &mut Scope, instruction: &Instruction, seed: &Seed, resolved: &[&Name]) -> String {
    match seed {
        Seed::Constant(bytes) => format!("new Uint8Array([{}])", bytes.iter().join(", ")),
        Seed::Account(name) => {
            let value = seed_account_value(scope, instruction, name, resolved);
            format!("{}().encode({value})", scope.kit("getAddressEncoder"))
        }
        Seed::Argument(name, type_) => {
            let key = instruction
                .get_argument(name)
                .map(|argument| argument_key(instruction, argument))
                .unwrap_or_else(|| name.camel());
            format!("{}.encode(input.{key})", seed_codec(scope, type_))
        }
    }
}

fn async_builder(scope: &mut Scope, instruction: &Instruction, name: &str) -> String {
    let address = scope.kit("type Address");
    let instruction_type = scope.kit("type Instruction");
    let derive = scope.kit("getProgramDerivedAddress");
    let program_address = scope.program_address();

    let mut resolved: Vec<&Name> = vec![];
    let mut derivations = vec![];
    for (account, seeds) in pda_accounts(instruction) {
        let seeds = seeds
            .iter()
            .map(|seed| format!("          {},", seed_expression(scope, instruction, seed, &resolved)))
            .join("\n");
        let key = account.name.camel();
        derivations.push(format!(
            "  const {key}Address =
    input.{key} ??
    (
      await {derive}({{
        programAddress,
        seeds: [
{seeds}
        ],
      }})
    )[0];"
        ));
        resolved.push(&account.name);
    }

    let overrides = resolved
        .iter()
        .map(|name| format!("{0}: {0}Address", name.camel()))
        .join(", ");
    let derivations = derivations.join("\n");

    let docs = generate_doc_comment("", &instruction.docs);
    format!(
        "{docs}export async function get{name}InstructionAsync(
  input: {name}AsyncInput,
  config?: {{ programAddress?: {address} }}
): Promise<{instruction_type}> {{
  const programAddress = config?.programAddress ?? {program_address};
{derivations}

  return get{name}Instruction({{ ...input, {overrides} }}, config);
}}"
    )
}

fn generate_program(root: &Root) -> String {
    let program = &root.program;
    let mut scope = Scope::new(root);
    let name = program.name.pascal();
    let address = scope.kit("type Address");
    let key = &program.public_key;
    let docs = generate_doc_comment("", &program.docs);

    let mut sections = vec![format!(
        "{docs}export const {} =\n  '{key}' as {address}<'{key}'>;",
        program_address_constant(root)
    )];

    let accounts = program
        .accounts
        .iter()
        .map(|account| (&account.name, account.discriminator.is_some()))
        .collect::<Vec<_>>();
    if !accounts.is_empty() {
        sections.push(identify(&mut scope, &name, "Account", "account", "../accounts", &accounts));
    }

    let instructions = program
        .instructions
        .iter()
        .map(|instruction| (&instruction.name, instruction.discriminator.is_some()))
        .collect::<Vec<_>>();
    if !instructions.is_empty() {
        sections.push(identify(
            &mut scope,
            &name,
            "Instruction",
            "instruction",
            "../instructions",
            &instructions,
        ));
    }

    scope.render(sections.join("\n\n"))
}

/// An enum of `items` and a function telling which one some data belongs
/// to, using the discriminators exported from `module`.
fn identify(
    scope: &mut Scope,
    program: &str,
    kind: &str,
    parameter: &str,
    module: &str,
    items: &[(&Name, bool)],
) -> String {
    let enum_name = format!("{program}{kind}");
    let members = items
        .iter()
        .map(|(name, _)| format!("  {},", name.pascal()))
        .join("\n");
    let enumeration = format!("export enum {enum_name} {{\n{members}\n}}");

    if !items.iter().any(|(_, discriminated)| *discriminated) {
        return enumeration;
    }

    let bytes = scope.kit("type ReadonlyUint8Array");
    let contains = scope.kit("containsBytes");
    let checks = items
        .iter()
        .filter(|(_, discriminated)| *discriminated)
        .map(|(name, _)| {
            let constant = scope.import(module, &format!("{}_DISCRIMINATOR", name.screaming()));
            format!(
                "  if ({contains}(data, {constant}, 0)) {{\n    return {enum_name}.{};\n  }}",
                name.pascal()
            )
        })
        .join("\n");

    format!(
        "{enumeration}

export function identify{enum_name}(
  {parameter}: {{ data: {bytes} }} | {bytes}
): {enum_name} {{
  const data = 'data' in {parameter} ? {parameter}.data : {parameter};
{checks}
  throw new Error(
    'The provided {parameter} could not be identified as a {} {parameter}.'
  );
}}",
        program.to_lowercase()
    )
}

struct ErrorView {
    name: String,
    constant: String,
    code: u32,
    hex: String,
    doc: String,
    literal: String,
}

#[derive(Template)]
#[template(path = "typescript/errors.ts", escape = "none")]
struct ErrorsTemplate<'a> {
    header: &'a str,
    program: String,
    program_camel: String,
    errors: Vec<ErrorView>,
}

fn generate_errors(root: &Root) -> Result<String, Error> {
    let program = &root.program;
    let errors = program
        .errors
        .iter()
        .map(|error| -> Result<ErrorView, Error> {
            Ok(ErrorView {
                name: error.name.pascal(),
                constant: format!("{}_ERROR__{}", program.name.screaming(), error.name.screaming()),
                code: error.code,
                hex: format!("{:x}", error.code),
                doc: error.message.replace("*/", "*\\/").replace('\n', " "),
                literal: serde_json::to_string(&error.message)?,
            })
        })
        .collect::<Result<Vec<ErrorView>, Error>>()?;

    let template = ErrorsTemplate {
        header: HEADER,
        program: program.name.pascal(),
        program_camel: program.name.camel(),
        errors,
    };

    Ok(format!("{}\n", template.render()?.trim_end()))
}

const SHARED: &str = r#"
import {
  AccountRole,
  isTransactionSigner,
  type AccountMeta,
  type AccountSignerMeta,
  type Address,
  type TransactionSigner,
} from '@solana/kit';

/**
 * An account given to an instruction builder, either as a plain address or
 * as a signer of the transaction.
 */
export type AccountValue = Address | TransactionSigner;

/**
 * Builds the meta of an instruction account. Accounts given as a
 * {@link TransactionSigner} sign the transaction.
 */
export function toAccountMeta(
  value: AccountValue,
  isWritable: boolean
): AccountMeta | AccountSignerMeta {
  if (typeof value === 'object' && isTransactionSigner(value)) {
    return {
      address: value.address,
      role: isWritable ? AccountRole.WRITABLE_SIGNER : AccountRole.READONLY_SIGNER,
      signer: value,
    };
  }

  return {
    address: value,
    role: isWritable ? AccountRole.WRITABLE : AccountRole.READONLY,
  };
}

/**
 * Returns the address of an account value, failing when it is missing.
 */
export function expectAddress(value: AccountValue | null | undefined): Address {
  if (!value) {
    throw new Error('Expected an Address.');
  }

  return typeof value === 'object' && 'address' in value ? value.address : value;
}
"#;

#[cfg(test)]
mod tests {
    use super::{generate_typescript_client, render_typescript_client};
    use crate::codegen::command::Options;
    use crate::compile;
    use pretty_assertions::assert_eq;

    const IDL: &str = include_str!("../../../../idl/solana_pinocchio_starter.json");

    fn file(path: &str) -> String {
        let root = compile(IDL).unwrap();
        let files = render_typescript_client(&root).unwrap();
        files.get(path).unwrap().to_string()
    }

    #[test]
    fn renders_one_file_per_node() {
        let root = compile(IDL).unwrap();
        let files = render_typescript_client(&root).unwrap();
        let paths = files
            .paths()
            .map(|path| path.display().to_string())
            .collect::<Vec<String>>();

        assert_eq!(
            paths,
            vec![
                "accounts/archive.ts",
                "accounts/index.ts",
                "accounts/miner.ts",
                "accounts/tape.ts",
                "accounts/writer.ts",
                "errors/index.ts",
                "errors/tape.ts",
                "index.ts",
                "instructions/airdrop.ts",
                "instructions/index.ts",
                "instructions/initialize.ts",
                "instructions/minerClaim.ts",
                "instructions/minerRegister.ts",
                "instructions/tapeCreate.ts",
                "instructions/tapeFinalize.ts",
                "instructions/tapeSetHeader.ts",
                "instructions/tapeUpdate.ts",
                "instructions/tapeWrite.ts",
                "programs/index.ts",
                "programs/tape.ts",
                "shared/index.ts",
                "types/index.ts",
                "types/proofPath.ts",
                "types/segmentChange.ts",
                "types/tapeState.ts",
                "types/writeEvent.ts",
            ]
        );
        assert_eq!(
            files.get("index.ts").unwrap().lines().skip(6).collect::<Vec<&str>>(),
            vec![
                "export * from './accounts';",
                "export * from './errors';",
                "export * from './instructions';",
                "export * from './programs';",
                "export * from './types';",
            ]
        );
    }

    #[test]
    fn accounts_carry_their_discriminator_and_size() {
        let tape = file("accounts/tape.ts");

        assert!(tape.contains("export const TAPE_DISCRIMINATOR = new Uint8Array([4, 0, 0, 0, 0, 0, 0, 0]);"));
        assert!(tape.contains("  discriminator: ReadonlyUint8Array;\n  number: bigint;"));
        assert!(tape.contains("export type TapeArgs = {\n  number: number | bigint;"));
        assert!(tape.contains("(value) => ({ ...value, discriminator: TAPE_DISCRIMINATOR })"));
        assert!(tape.contains("export function getTapeSize(): number {\n  return 320;\n}"));
        assert!(tape.contains("export async function fetchMaybeTape<"));
        assert!(tape.contains(" * A tape holds a sequence of segments committed under a merkle root"));
    }

    #[test]
    fn pda_accounts_are_resolved_by_an_async_builder() {
        let create = file("instructions/tapeCreate.ts");

        assert!(create.contains("export type TapeCreateAsyncInput = Omit<TapeCreateInput, 'tape' | 'writer'> & {"));
        assert!(create.contains("          new Uint8Array([116, 97, 112, 101]),"));
        assert!(create.contains("          getAddressEncoder().encode(expectAddress(input.signer)),"));
        assert!(create.contains("          getArrayEncoder(getU8Encoder(), { size: 32 }).encode(input.name),"));
        assert!(create.contains("          getAddressEncoder().encode(tapeAddress),"));
        assert!(create.contains("  return getTapeCreateInstruction({ ...input, tape: tapeAddress, writer: writerAddress }, config);"));
        assert!(create.contains("import { TAPE_PROGRAM_ADDRESS } from '../programs';"));
        assert!(create.contains("import { expectAddress, toAccountMeta } from '../shared';"));
    }

    #[test]
    fn seeds_from_defaulted_accounts_need_no_address_check() {
        let root = compile(
            r#"{
                "address": "tape9hFAE7jstfKB2QT1ovFNUZKKtDUyGZiGQpnBFdL",
                "metadata": { "name": "tape", "version": "0.1.0", "spec": "0.1.0" },
                "instructions": [{
                    "name": "vault_open",
                    "discriminator": [40],
                    "accounts": [
                        { "name": "system_program", "address": "11111111111111111111111111111111" },
                        {
                            "name": "vault",
                            "writable": true,
                            "pda": { "seeds": [{ "kind": "account", "path": "system_program" }] }
                        }
                    ],
                    "args": []
                }]
            }"#,
        )
        .unwrap();
        let files = render_typescript_client(&root).unwrap();
        let open = files.get("instructions/vaultOpen.ts").unwrap();

        assert!(open.contains("input.systemProgram ?? ("));
        assert!(open.contains("import { toAccountMeta } from '../shared';"));
        assert!(!open.contains("expectAddress"));
    }

    #[test]
    fn optional_and_defaulted_accounts() {
        let claim = file("instructions/minerClaim.ts");

        assert!(claim.contains("  referrer?: Address;"));
        assert!(claim.contains("  tokenProgram?: Address;"));
        assert!(claim.contains("  memo: MinerClaimInstructionDataArgs['memo'];"));
        assert!(claim.contains(
            "      input.referrer\n        ? toAccountMeta(input.referrer, true)\n        : toAccountMeta(programAddress, false),"
        ));
        assert!(claim.contains("['memo', getOptionEncoder(addEncoderSizePrefix(getUtf8Encoder(), getU32Encoder()))],"));
        assert!(!claim.contains("getMinerClaimInstructionAsync"));
    }

    #[test]
    fn enums_and_nested_types() {
        let state = file("types/tapeState.ts");
        assert!(state.contains("export enum TapeState {\n  Unknown,\n  Created,\n  Writing,\n  Finalized,\n}"));
        assert!(state.contains("return getEnumEncoder(TapeState);"));

        let change = file("types/segmentChange.ts");
        assert!(change.contains("  | { __kind: 'Appended'; fields: readonly [bigint] }"));
        assert!(change.contains("  | { __kind: 'Cleared' };"));
        assert!(change.contains("    ['Cleared', getUnitDecoder()],"));
        assert!(change.contains("export function isSegmentChange<K extends SegmentChange['__kind']>("));

        let event = file("types/writeEvent.ts");
        assert!(event.contains("import { type SegmentChange, type SegmentChangeArgs, getSegmentChangeDecoder, getSegmentChangeEncoder } from './segmentChange';"));
        assert!(event.contains("  label: Option<string>;"));
        assert!(event.contains("  label: OptionOrNullable<string>;"));
    }

    #[test]
    fn program_identifies_accounts_and_instructions() {
        let program = file("programs/tape.ts");

        assert!(program.contains(
            "export const TAPE_PROGRAM_ADDRESS =\n  'tape9hFAE7jstfKB2QT1ovFNUZKKtDUyGZiGQpnBFdL' as Address<'tape9hFAE7jstfKB2QT1ovFNUZKKtDUyGZiGQpnBFdL'>;"
        ));
        assert!(program.contains("  if (containsBytes(data, MINER_DISCRIMINATOR, 0)) {\n    return TapeAccount.Miner;\n  }"));
        assert!(program.contains("export function identifyTapeInstruction("));
        assert!(program.contains("  MinerClaim,\n}"));
    }

    #[test]
    fn errors_are_rendered_from_the_template() {
        let errors = file("errors/tape.ts");

        assert!(errors.contains("export const TAPE_ERROR__UNEXPECTED_TAPE = 0x21; // 33"));
        assert!(errors.contains("    [TAPE_ERROR__UNEXPECTED_TAPE]: \"The provided tape doesn't match the expected tape\","));
        assert!(errors.contains("export function getTapeErrorMessage(code: TapeError): string {"));
        assert!(errors.contains("  | typeof TAPE_ERROR__COMMITMENT_MISMATCH;"));
    }

    #[tokio::test]
    async fn writes_the_client() {
        let dir = tempfile::tempdir().unwrap();
        let root = compile(IDL).unwrap();
        let options = Options {
            print: false,
            output: dir.path().join("ts"),
        };

        generate_typescript_client(&root, &options).await.unwrap();

        let shared = std::fs::read_to_string(dir.path().join("ts/shared/index.ts")).unwrap();
        assert!(shared.contains("export function toAccountMeta("));
        assert!(dir.path().join("ts/instructions/tapeWrite.ts").exists());
    }
}
