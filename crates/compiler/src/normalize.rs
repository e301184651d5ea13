use crate::ast::canonical as can;
use crate::ast::name::Name;
use crate::ast::source::{self as src, Version};
use crate::error::normalize::{Error, Problem};
use itertools::Itertools;
use sha2::{Digest, Sha256};
use std::collections::HashSet;

/// Turn an Anchor IDL into a root node.
///
/// All problems of the IDL are collected before giving up, so a single run
/// reports every unsupported type or dangling reference at once.
pub fn normalize(idl: &src::Idl) -> Result<can::Root, Vec<Error>> {
    let version = idl.version();
    let origin = match idl.origin() {
        Some("shank") => can::Origin::Shank,
        _ => can::Origin::Anchor,
    };

    let mut errors = vec![];
    let name = match idl.program_name() {
        Some(name) => Name::new(name),
        None => {
            errors.push(Error::MissingProgramName);
            Name::new("program")
        }
    };

    let public_key = match idl.program_address() {
        Some(address) => address.to_string(),
        None => {
            tracing::warn!(program = %name, "the IDL does not declare a program address");
            String::new()
        }
    };

    let known = known_type_names(idl, version);
    let referenced = referenced_type_names(idl);

    let mut accounts = vec![];
    for account in &idl.accounts {
        match normalize_account(idl, version, origin, account, &known) {
            Ok(account) => accounts.push(account),
            Err(problems) => errors.extend(
                problems
                    .into_iter()
                    .map(|problem| Error::BadAccount(account.name.clone(), problem)),
            ),
        }
    }

    let mut instructions = vec![];
    for instruction in &idl.instructions {
        match normalize_instruction(version, origin, instruction, &known) {
            Ok(instruction) => instructions.push(instruction),
            Err(problems) => errors.extend(
                problems
                    .into_iter()
                    .map(|problem| Error::BadInstruction(instruction.name.clone(), problem)),
            ),
        }
    }

    let mut defined_types = vec![];
    for type_def in defined_type_sources(idl, version, &referenced) {
        match normalize_defined_type(&type_def, &known) {
            Ok(defined) => defined_types.push(defined),
            Err(problems) => errors.extend(
                problems
                    .into_iter()
                    .map(|problem| Error::BadType(type_def.name.clone(), problem)),
            ),
        }
    }

    let program_errors = idl
        .errors
        .iter()
        .map(|error| can::ProgramError {
            name: Name::new(&error.name),
            code: error.code,
            message: error.msg.clone().unwrap_or_else(|| error.name.clone()),
            docs: vec![],
        })
        .collect::<Vec<can::ProgramError>>();

    errors.extend(duplicates("account", accounts.iter().map(|a| &a.name)));
    errors.extend(duplicates("instruction", instructions.iter().map(|i| &i.name)));
    errors.extend(duplicates("type", defined_types.iter().map(|t| &t.name)));
    errors.extend(duplicates("error", program_errors.iter().map(|e| &e.name)));

    if !errors.is_empty() {
        return Err(errors);
    }

    let mut docs = idl.docs.clone();
    if docs.is_empty() {
        if let Some(description) = idl.metadata.as_ref().and_then(|m| m.description.clone()) {
            docs.push(description);
        }
    }

    tracing::debug!(
        program = %name,
        accounts = accounts.len(),
        instructions = instructions.len(),
        types = defined_types.len(),
        "normalized IDL"
    );

    Ok(can::Root {
        program: can::Program {
            name,
            public_key,
            version: idl.program_version().unwrap_or("0.0.0").to_string(),
            origin,
            docs,
            accounts,
            instructions,
            defined_types,
            errors: program_errors,
        },
    })
}

/// The first 8 bytes of `sha256("<namespace>:<name>")`, as Anchor derives
/// them.
pub fn anchor_discriminator(namespace: &str, name: &str) -> Vec<u8> {
    let digest = Sha256::digest(format!("{namespace}:{name}").as_bytes());
    digest[..8].to_vec()
}

/// Names a `defined` reference may point to.
fn known_type_names(idl: &src::Idl, version: Version) -> HashSet<String> {
    let mut known = idl
        .types
        .iter()
        .map(|type_def| type_def.name.clone())
        .collect::<HashSet<String>>();

    if version == Version::V00 {
        known.extend(
            idl.accounts
                .iter()
                .filter(|account| account.type_.is_some())
                .map(|account| account.name.clone()),
        );
    }

    known
}

/// Names used by a `defined` reference anywhere in the IDL.
fn referenced_type_names(idl: &src::Idl) -> HashSet<String> {
    let mut names = HashSet::new();
    for instruction in &idl.instructions {
        for arg in &instruction.args {
            collect_type_names(&mut names, &arg.type_);
        }
    }

    let bodies = idl
        .types
        .iter()
        .map(|type_def| &type_def.type_)
        .chain(idl.accounts.iter().filter_map(|account| account.type_.as_ref()));
    for body in bodies {
        match body {
            src::TypeDefTy::Struct { fields } => collect_fields_names(&mut names, fields),
            src::TypeDefTy::Enum { variants } => {
                for variant in variants {
                    collect_fields_names(&mut names, &variant.fields);
                }
            }
            src::TypeDefTy::Type { alias } => collect_type_names(&mut names, alias),
        }
    }

    names
}

fn collect_fields_names(names: &mut HashSet<String>, fields: &Option<src::DefinedFields>) {
    match fields {
        Some(src::DefinedFields::Named(fields)) => {
            for field in fields {
                collect_type_names(names, &field.type_);
            }
        }
        Some(src::DefinedFields::Tuple(types)) => {
            for type_ in types {
                collect_type_names(names, type_);
            }
        }
        None => {}
    }
}

fn collect_type_names(names: &mut HashSet<String>, type_: &src::Type) {
    match type_ {
        src::Type::Defined { defined } => {
            names.insert(defined.name().to_string());
        }
        src::Type::Option { option: inner }
        | src::Type::COption { coption: inner }
        | src::Type::Vec { vec: inner } => collect_type_names(names, inner),
        src::Type::Array { array: (inner, _) } => collect_type_names(names, inner),
        src::Type::Tuple { tuple } => {
            for type_ in tuple {
                collect_type_names(names, type_);
            }
        }
        src::Type::Primitive(_) | src::Type::Generic { .. } => {}
    }
}

/// The type definitions that become defined types of the root node.
///
/// In the current layout, account layouts live among the types and are only
/// kept there when something else refers to them. In the legacy layout
/// account layouts are inline, and are only added when referenced.
fn defined_type_sources(
    idl: &src::Idl,
    version: Version,
    referenced: &HashSet<String>,
) -> Vec<src::TypeDef> {
    match version {
        Version::V01 => {
            let account_names = idl
                .accounts
                .iter()
                .map(|account| account.name.as_str())
                .collect::<HashSet<&str>>();
            idl.types
                .iter()
                .filter(|type_def| {
                    !account_names.contains(type_def.name.as_str())
                        || referenced.contains(&type_def.name)
                })
                .cloned()
                .collect()
        }
        Version::V00 => {
            let accounts = idl.accounts.iter().filter_map(|account| {
                account
                    .type_
                    .as_ref()
                    .filter(|_| referenced.contains(&account.name))
                    .map(|type_| src::TypeDef {
                        name: account.name.clone(),
                        docs: account.docs.clone(),
                        generics: vec![],
                        serialization: None,
                        type_: type_.clone(),
                    })
            });
            idl.types.iter().cloned().chain(accounts).collect()
        }
    }
}

fn normalize_account(
    idl: &src::Idl,
    version: Version,
    origin: can::Origin,
    account: &src::Account,
    known: &HashSet<String>,
) -> Result<can::Account, Vec<Problem>> {
    let (layout, docs) = match version {
        Version::V01 => {
            let type_def = idl
                .types
                .iter()
                .find(|type_def| type_def.name == account.name)
                .ok_or_else(|| vec![Problem::MissingAccountType])?;
            check_type_def(type_def).map_err(|problem| vec![problem])?;
            // Account entries usually leave their docs on the layout.
            let docs = if account.docs.is_empty() {
                &type_def.docs
            } else {
                &account.docs
            };
            (&type_def.type_, docs)
        }
        Version::V00 => {
            let layout = account
                .type_
                .as_ref()
                .ok_or_else(|| vec![Problem::MissingAccountType])?;
            (layout, &account.docs)
        }
    };

    let data = match layout {
        src::TypeDefTy::Struct { fields: None } => vec![],
        src::TypeDefTy::Struct {
            fields: Some(src::DefinedFields::Named(fields)),
        } => normalize_fields(fields, known)?,
        _ => return Err(vec![Problem::MissingAccountType]),
    };

    let discriminator = match (&account.discriminator, version, origin) {
        (Some(discriminator), _, _) => Some(discriminator.clone()),
        (None, Version::V00, can::Origin::Anchor) => {
            Some(anchor_discriminator("account", &account.name))
        }
        (None, _, _) => None,
    };

    Ok(can::Account {
        name: Name::new(&account.name),
        docs: docs.clone(),
        data,
        discriminator,
    })
}

fn normalize_instruction(
    version: Version,
    origin: can::Origin,
    instruction: &src::Instruction,
    known: &HashSet<String>,
) -> Result<can::Instruction, Vec<Problem>> {
    let name = Name::new(&instruction.name);
    let arguments = normalize_fields(&instruction.args, known)?;

    let mut sources = vec![];
    flatten_accounts(&mut sources, &instruction.accounts);
    let account_names = sources
        .iter()
        .map(|account| Name::new(&account.name))
        .collect::<HashSet<Name>>();

    let (accounts, problems): (Vec<_>, Vec<_>) = sources
        .iter()
        .map(|account| normalize_instruction_account(&name, account, &account_names, &arguments))
        .partition_result();
    if !problems.is_empty() {
        return Err(problems);
    }

    let discriminator = match (&instruction.discriminator, &instruction.discriminant) {
        (Some(discriminator), _) => Some(discriminator.clone()),
        (None, Some(discriminant)) => {
            Some(discriminant_bytes(discriminant).map_err(|problem| vec![problem])?)
        }
        (None, None) if version == Version::V00 && origin == can::Origin::Anchor => {
            Some(anchor_discriminator("global", &name.snake()))
        }
        (None, None) => None,
    };

    Ok(can::Instruction {
        name,
        docs: instruction.docs.clone(),
        accounts,
        arguments,
        discriminator,
    })
}

fn flatten_accounts<'a>(
    accounts: &mut Vec<&'a src::InstructionAccount>,
    items: &'a [src::AccountItem],
) {
    for item in items {
        match item {
            src::AccountItem::Single(account) => accounts.push(account),
            src::AccountItem::Composite(group) => flatten_accounts(accounts, &group.accounts),
        }
    }
}

fn normalize_instruction_account(
    instruction: &Name,
    account: &src::InstructionAccount,
    account_names: &HashSet<Name>,
    arguments: &[can::Field],
) -> Result<can::InstructionAccount, Problem> {
    let is_signer = if account.optional_signer {
        can::Signer::Either
    } else if account.signer {
        can::Signer::Yes
    } else {
        can::Signer::No
    };

    let default_value = match (&account.address, &account.pda) {
        (Some(address), _) => Some(can::AccountDefault::Address(address.clone())),
        (None, Some(pda)) if pda.program.is_some() => {
            tracing::warn!(
                %instruction,
                account = %account.name,
                "PDAs derived from another program are not resolved"
            );
            None
        }
        (None, Some(pda)) => pda
            .seeds
            .iter()
            .map(|seed| normalize_seed(seed, account_names, arguments))
            .collect::<Result<Option<Vec<can::Seed>>, Problem>>()?
            .map(can::AccountDefault::Pda)
            .or_else(|| {
                tracing::warn!(
                    %instruction,
                    account = %account.name,
                    "PDA seeds referencing nested fields are not resolved"
                );
                None
            }),
        (None, None) => None,
    };

    Ok(can::InstructionAccount {
        name: Name::new(&account.name),
        docs: account.docs.clone(),
        is_writable: account.writable,
        is_signer,
        is_optional: account.optional,
        default_value,
    })
}

/// `Ok(None)` for seeds that point into the fields of an account or argument.
fn normalize_seed(
    seed: &src::Seed,
    account_names: &HashSet<Name>,
    arguments: &[can::Field],
) -> Result<Option<can::Seed>, Problem> {
    match seed {
        src::Seed::Const { value } => match value {
            serde_json::Value::String(value) => {
                Ok(Some(can::Seed::Constant(value.as_bytes().to_vec())))
            }
            value => serde_json::from_value::<Vec<u8>>(value.clone())
                .map(|bytes| Some(can::Seed::Constant(bytes)))
                .map_err(|_| Problem::BadConstantSeed),
        },
        src::Seed::Account { path, .. } if path.contains('.') => Ok(None),
        src::Seed::Account { path, .. } => {
            let name = Name::new(path);
            if account_names.contains(&name) {
                Ok(Some(can::Seed::Account(name)))
            } else {
                Err(Problem::UnknownSeedAccount(path.clone()))
            }
        }
        src::Seed::Arg { path } if path.contains('.') => Ok(None),
        src::Seed::Arg { path } => {
            let name = Name::new(path);
            arguments
                .iter()
                .find(|argument| argument.name == name)
                .map(|argument| Some(can::Seed::Argument(name, argument.type_.clone())))
                .ok_or_else(|| Problem::UnknownSeedArgument(path.clone()))
        }
    }
}

fn discriminant_bytes(discriminant: &src::Discriminant) -> Result<Vec<u8>, Problem> {
    match &discriminant.type_ {
        src::Type::Primitive(primitive) => match can::NumberFormat::parse(primitive) {
            Some(format) if !format.is_float() && format.size() <= 8 => {
                Ok(discriminant.value.to_le_bytes()[..format.size()].to_vec())
            }
            _ => Err(Problem::UnsupportedDiscriminant(primitive.clone())),
        },
        other => Err(Problem::UnsupportedDiscriminant(format!("{other:?}"))),
    }
}

fn check_type_def(type_def: &src::TypeDef) -> Result<(), Problem> {
    if !type_def.generics.is_empty() {
        return Err(Problem::Generic(type_def.name.clone()));
    }

    match type_def.serialization.as_deref() {
        None | Some("borsh") => Ok(()),
        Some(other) => Err(Problem::UnsupportedSerialization(other.to_string())),
    }
}

fn normalize_defined_type(
    type_def: &src::TypeDef,
    known: &HashSet<String>,
) -> Result<can::DefinedType, Vec<Problem>> {
    check_type_def(type_def).map_err(|problem| vec![problem])?;

    let type_ = match &type_def.type_ {
        src::TypeDefTy::Struct { fields: None } => can::TypeDef::Struct(vec![]),
        src::TypeDefTy::Struct {
            fields: Some(src::DefinedFields::Named(fields)),
        } => can::TypeDef::Struct(normalize_fields(fields, known)?),
        src::TypeDefTy::Struct {
            fields: Some(src::DefinedFields::Tuple(types)),
        } => can::TypeDef::Alias(can::Type::Tuple(normalize_types(types, known)?)),
        src::TypeDefTy::Enum { variants } => {
            let (variants, problems): (Vec<_>, Vec<Vec<Problem>>) = variants
                .iter()
                .map(|variant| normalize_variant(variant, known))
                .partition_result();
            if !problems.is_empty() {
                return Err(problems.into_iter().flatten().collect());
            }
            can::TypeDef::Enum(variants)
        }
        src::TypeDefTy::Type { alias } => {
            can::TypeDef::Alias(normalize_type(alias, known).map_err(|problem| vec![problem])?)
        }
    };

    Ok(can::DefinedType {
        name: Name::new(&type_def.name),
        docs: type_def.docs.clone(),
        type_,
    })
}

fn normalize_variant(
    variant: &src::EnumVariant,
    known: &HashSet<String>,
) -> Result<can::Variant, Vec<Problem>> {
    let name = Name::new(&variant.name);
    let variant = match &variant.fields {
        None => can::Variant::Empty(name),
        Some(src::DefinedFields::Named(fields)) => {
            can::Variant::Struct(name, normalize_fields(fields, known)?)
        }
        Some(src::DefinedFields::Tuple(types)) => {
            can::Variant::Tuple(name, normalize_types(types, known)?)
        }
    };

    Ok(variant)
}

fn normalize_fields(
    fields: &[src::Field],
    known: &HashSet<String>,
) -> Result<Vec<can::Field>, Vec<Problem>> {
    let (fields, problems): (Vec<_>, Vec<_>) = fields
        .iter()
        .map(|field| {
            normalize_type(&field.type_, known).map(|type_| can::Field {
                name: Name::new(&field.name),
                docs: field.docs.clone(),
                type_,
            })
        })
        .partition_result();

    if problems.is_empty() {
        Ok(fields)
    } else {
        Err(problems)
    }
}

fn normalize_types(
    types: &[src::Type],
    known: &HashSet<String>,
) -> Result<Vec<can::Type>, Vec<Problem>> {
    let (types, problems): (Vec<_>, Vec<_>) = types
        .iter()
        .map(|type_| normalize_type(type_, known))
        .partition_result();

    if problems.is_empty() {
        Ok(types)
    } else {
        Err(problems)
    }
}

fn normalize_type(type_: &src::Type, known: &HashSet<String>) -> Result<can::Type, Problem> {
    match type_ {
        src::Type::Primitive(primitive) => normalize_primitive(primitive),
        src::Type::Defined { defined } => match defined {
            src::Defined::Reference { name, generics } if !generics.is_empty() => {
                Err(Problem::Generic(name.clone()))
            }
            defined if known.contains(defined.name()) => {
                Ok(can::Type::Defined(Name::new(defined.name())))
            }
            defined => Err(Problem::UnknownDefinedType(defined.name().to_string())),
        },
        src::Type::Option { option } => Ok(can::Type::Option(
            Box::new(normalize_type(option, known)?),
            can::OptionPrefix::U8,
        )),
        src::Type::COption { coption } => Ok(can::Type::Option(
            Box::new(normalize_type(coption, known)?),
            can::OptionPrefix::U32,
        )),
        src::Type::Vec { vec } => Ok(can::Type::Array(
            Box::new(normalize_type(vec, known)?),
            can::Count::Prefixed,
        )),
        src::Type::Array {
            array: (item, src::ArrayLen::Value(count)),
        } => Ok(can::Type::Array(
            Box::new(normalize_type(item, known)?),
            can::Count::Fixed(*count),
        )),
        src::Type::Array {
            array: (_, src::ArrayLen::Generic { generic }),
        } => Err(Problem::Generic(generic.clone())),
        src::Type::Tuple { tuple } => Ok(can::Type::Tuple(
            tuple
                .iter()
                .map(|type_| normalize_type(type_, known))
                .collect::<Result<Vec<can::Type>, Problem>>()?,
        )),
        src::Type::Generic { generic } => Err(Problem::Generic(generic.clone())),
    }
}

fn normalize_primitive(primitive: &str) -> Result<can::Type, Problem> {
    if let Some(format) = can::NumberFormat::parse(primitive) {
        return Ok(can::Type::Number(format));
    }

    match primitive {
        "bool" => Ok(can::Type::Boolean),
        "string" => Ok(can::Type::String),
        "publicKey" | "pubkey" => Ok(can::Type::PublicKey),
        "bytes" => Ok(can::Type::Bytes),
        other => Err(Problem::UnsupportedType(other.to_string())),
    }
}

fn duplicates<'a>(kind: &'static str, names: impl Iterator<Item = &'a Name>) -> Vec<Error> {
    names
        .duplicates()
        .map(|name| Error::Duplicate {
            kind,
            name: name.value.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{anchor_discriminator, normalize};
    use crate::ast::canonical::{
        AccountDefault, Count, NumberFormat, OptionPrefix, Seed, Signer, Type, TypeDef, Variant,
    };
    use crate::ast::name::Name;
    use crate::ast::source::Idl;
    use crate::error::normalize::{Error, Problem};
    use pretty_assertions::assert_eq;

    const FIXTURE: &str = include_str!("../../../idl/solana_pinocchio_starter.json");

    fn idl(source: &str) -> Idl {
        serde_json::from_str(source).unwrap()
    }

    #[test]
    fn normalizes_the_current_layout() {
        let root = normalize(&idl(FIXTURE)).unwrap();
        let program = &root.program;

        assert_eq!(program.name, Name::new("tape"));
        assert_eq!(program.public_key, "tape9hFAE7jstfKB2QT1ovFNUZKKtDUyGZiGQpnBFdL");
        assert_eq!(program.docs, vec!["Tape storage program".to_string()]);
        assert_eq!(program.accounts.len(), 4);
        assert_eq!(program.instructions.len(), 9);
        assert_eq!(program.errors.len(), 11);

        let tape = &program.accounts[2];
        assert_eq!(tape.name.pascal(), "Tape");
        assert_eq!(tape.discriminator, Some(vec![4, 0, 0, 0, 0, 0, 0, 0]));
        assert_eq!(tape.size(&root), Some(8 + 16 + 32 + 32 * 3 + 128 + 40));
    }

    #[test]
    fn account_layouts_are_not_repeated_as_defined_types() {
        let root = normalize(&idl(FIXTURE)).unwrap();
        let names = root
            .program
            .defined_types
            .iter()
            .map(|defined| defined.name.pascal())
            .collect::<Vec<String>>();

        assert_eq!(
            names,
            vec!["ProofPath", "TapeState", "SegmentChange", "WriteEvent"]
        );
    }

    #[test]
    fn enum_variants_keep_their_shape() {
        let root = normalize(&idl(FIXTURE)).unwrap();
        let change = root
            .get_defined_type(&Name::new("SegmentChange"))
            .unwrap();

        match &change.type_ {
            TypeDef::Enum(variants) => {
                assert!(matches!(&variants[0], Variant::Tuple(_, types) if types == &vec![Type::Number(NumberFormat::U64)]));
                assert!(matches!(&variants[1], Variant::Struct(_, fields) if fields.len() == 2));
                assert!(matches!(&variants[2], Variant::Empty(_)));
            }
            other => panic!("expected an enum, found {other:?}"),
        }
        assert!(root
            .get_defined_type(&Name::new("TapeState"))
            .unwrap()
            .type_
            .is_scalar_enum());
    }

    #[test]
    fn instruction_accounts_carry_defaults() {
        let root = normalize(&idl(FIXTURE)).unwrap();
        let create = &root.program.instructions[2];
        assert_eq!(create.name.camel(), "tapeCreate");
        assert_eq!(create.discriminator, Some(vec![16]));

        let signer = create.get_account(&Name::new("signer")).unwrap();
        assert_eq!(signer.is_signer, Signer::Yes);
        assert!(signer.is_writable);

        let tape = create.get_account(&Name::new("tape")).unwrap();
        assert_eq!(
            tape.default_value,
            Some(AccountDefault::Pda(vec![
                Seed::Constant(b"tape".to_vec()),
                Seed::Account(Name::new("signer")),
                Seed::Argument(
                    Name::new("name"),
                    Type::Array(Box::new(Type::Number(NumberFormat::U8)), Count::Fixed(32))
                ),
            ]))
        );

        let system_program = create.get_account(&Name::new("system_program")).unwrap();
        assert_eq!(
            system_program.default_value,
            Some(AccountDefault::Address(
                "11111111111111111111111111111111".to_string()
            ))
        );
        assert!(create.has_pda_defaults());

        let claim = &root.program.instructions[8];
        let memo = claim.get_argument(&Name::new("memo")).unwrap();
        assert_eq!(
            memo.type_,
            Type::Option(Box::new(Type::String), OptionPrefix::U8)
        );
        assert!(claim.get_account(&Name::new("referrer")).unwrap().is_optional);
    }

    #[test]
    fn legacy_anchor_discriminators_are_derived_from_names() {
        let root = normalize(&idl(
            r#"{
                "version": "0.1.0",
                "name": "counter",
                "instructions": [{
                    "name": "incrementBy",
                    "accounts": [
                        { "name": "counter", "isMut": true, "isSigner": false },
                        { "name": "signers", "accounts": [
                            { "name": "authority", "isMut": false, "isSigner": true }
                        ] }
                    ],
                    "args": [{ "name": "step", "type": { "defined": "Counter" } }]
                }],
                "accounts": [{
                    "name": "Counter",
                    "type": { "kind": "struct", "fields": [{ "name": "count", "type": "u64" }] }
                }]
            }"#,
        ))
        .unwrap();

        let instruction = &root.program.instructions[0];
        assert_eq!(
            instruction.discriminator,
            Some(anchor_discriminator("global", "increment_by"))
        );
        assert_eq!(instruction.accounts.len(), 2);
        assert_eq!(instruction.accounts[1].name, Name::new("authority"));

        let account = &root.program.accounts[0];
        assert_eq!(
            account.discriminator,
            Some(anchor_discriminator("account", "Counter"))
        );
        assert_eq!(root.program.public_key, "");
        assert_eq!(root.program.defined_types.len(), 1);
    }

    #[test]
    fn anchor_discriminator_matches_known_values() {
        // `global:initialize`, as found in every Anchor program.
        assert_eq!(
            anchor_discriminator("global", "initialize"),
            vec![175, 175, 109, 31, 13, 152, 155, 237]
        );
    }

    #[test]
    fn shank_discriminants_become_single_bytes() {
        let root = normalize(&idl(
            r#"{
                "version": "0.1.0",
                "name": "tape",
                "metadata": { "origin": "shank", "address": "tape9hFAE7jstfKB2QT1ovFNUZKKtDUyGZiGQpnBFdL" },
                "instructions": [{
                    "name": "Initialize",
                    "accounts": [],
                    "args": [],
                    "discriminant": { "type": "u8", "value": 1 }
                }],
                "accounts": [{
                    "name": "Archive",
                    "type": { "kind": "struct", "fields": [] }
                }]
            }"#,
        ))
        .unwrap();

        assert_eq!(root.program.instructions[0].discriminator, Some(vec![1]));
        assert_eq!(root.program.accounts[0].discriminator, None);
    }

    #[test]
    fn account_docs_come_from_their_layout() {
        let root = normalize(&idl(
            r#"{
                "address": "tape9hFAE7jstfKB2QT1ovFNUZKKtDUyGZiGQpnBFdL",
                "metadata": { "name": "tape", "version": "0.1.0", "spec": "0.1.0" },
                "accounts": [
                    { "name": "Tape", "discriminator": [4] },
                    { "name": "Miner", "docs": ["Registered miner"], "discriminator": [5] }
                ],
                "types": [
                    {
                        "name": "Tape",
                        "docs": ["A tape"],
                        "type": { "kind": "struct", "fields": [{ "name": "number", "type": "u64" }] }
                    },
                    {
                        "name": "Miner",
                        "docs": ["Layout of a miner"],
                        "type": { "kind": "struct", "fields": [] }
                    }
                ]
            }"#,
        ))
        .unwrap();

        assert_eq!(root.program.accounts[0].docs, vec!["A tape".to_string()]);
        assert_eq!(root.program.accounts[1].docs, vec!["Registered miner".to_string()]);
    }

    #[test]
    fn fixture_account_docs_survive() {
        let root = normalize(&idl(FIXTURE)).unwrap();

        assert_eq!(
            root.program.accounts[2].docs,
            vec!["A tape holds a sequence of segments committed under a merkle root".to_string()]
        );
    }

    #[test]
    fn every_problem_is_reported() {
        let errors = normalize(&idl(
            r#"{
                "address": "tape9hFAE7jstfKB2QT1ovFNUZKKtDUyGZiGQpnBFdL",
                "metadata": { "name": "tape", "version": "0.1.0", "spec": "0.1.0" },
                "instructions": [{
                    "name": "write",
                    "discriminator": [17],
                    "accounts": [{
                        "name": "tape",
                        "pda": { "seeds": [{ "kind": "account", "path": "owner" }] }
                    }],
                    "args": [
                        { "name": "data", "type": { "defined": { "name": "Missing" } } },
                        { "name": "big", "type": "u256" }
                    ]
                }],
                "accounts": [{ "name": "Tape", "discriminator": [4] }],
                "types": [
                    { "name": "Segment", "type": { "kind": "struct", "fields": [] } },
                    { "name": "Segment", "type": { "kind": "struct", "fields": [] } }
                ]
            }"#,
        ))
        .unwrap_err();

        assert_eq!(
            errors,
            vec![
                Error::BadAccount("Tape".to_string(), Problem::MissingAccountType),
                Error::BadInstruction(
                    "write".to_string(),
                    Problem::UnknownDefinedType("Missing".to_string())
                ),
                Error::BadInstruction(
                    "write".to_string(),
                    Problem::UnsupportedType("u256".to_string())
                ),
                Error::Duplicate {
                    kind: "type",
                    name: "segment".to_string()
                },
            ]
        );
    }

    #[test]
    fn seeds_must_reference_declared_accounts() {
        let errors = normalize(&idl(
            r#"{
                "address": "tape9hFAE7jstfKB2QT1ovFNUZKKtDUyGZiGQpnBFdL",
                "metadata": { "name": "tape", "version": "0.1.0", "spec": "0.1.0" },
                "instructions": [{
                    "name": "write",
                    "discriminator": [17],
                    "accounts": [{
                        "name": "tape",
                        "pda": { "seeds": [{ "kind": "account", "path": "owner" }] }
                    }],
                    "args": []
                }]
            }"#,
        ))
        .unwrap_err();

        assert_eq!(
            errors,
            vec![Error::BadInstruction(
                "write".to_string(),
                Problem::UnknownSeedAccount("owner".to_string())
            )]
        );
    }
}
