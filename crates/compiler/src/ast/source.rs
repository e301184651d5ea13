//! The Anchor IDL, as it is found on disk.
//!
//! A single lenient model covers both the legacy layout (`isMut`, `publicKey`,
//! `{"defined": "Name"}`, inline account types) and the current one
//! (`writable`, `pubkey`, `{"defined": {"name": ..}}`, explicit
//! discriminators). [`Idl::version`] tells them apart.
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Idl {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub metadata: Option<Metadata>,
    #[serde(default)]
    pub docs: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<Instruction>,
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub types: Vec<TypeDef>,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub errors: Vec<ErrorCode>,
    #[serde(default)]
    pub constants: Vec<serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Metadata {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub spec: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub origin: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    /// Anchor < 0.30 and shank.
    V00,
    /// Anchor >= 0.30.
    V01,
}

impl Idl {
    pub fn version(&self) -> Version {
        let has_spec = self
            .metadata
            .as_ref()
            .is_some_and(|metadata| metadata.spec.is_some());
        if self.address.is_some() || has_spec {
            Version::V01
        } else {
            Version::V00
        }
    }

    pub fn program_name(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|metadata| metadata.name.as_deref())
            .or(self.name.as_deref())
    }

    pub fn program_version(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|metadata| metadata.version.as_deref())
            .or(self.version.as_deref())
    }

    pub fn program_address(&self) -> Option<&str> {
        self.address.as_deref().or(self
            .metadata
            .as_ref()
            .and_then(|metadata| metadata.address.as_deref()))
    }

    pub fn origin(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|metadata| metadata.origin.as_deref())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Instruction {
    pub name: String,
    #[serde(default)]
    pub docs: Vec<String>,
    #[serde(default)]
    pub discriminator: Option<Vec<u8>>,
    /// Shank's single-value discriminator.
    #[serde(default)]
    pub discriminant: Option<Discriminant>,
    #[serde(default)]
    pub accounts: Vec<AccountItem>,
    #[serde(default)]
    pub args: Vec<Field>,
    #[serde(default)]
    pub returns: Option<Type>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Discriminant {
    #[serde(rename = "type")]
    pub type_: Type,
    pub value: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(untagged)]
pub enum AccountItem {
    /// A nested group of accounts (legacy layout).
    Composite(CompositeAccounts),
    Single(InstructionAccount),
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CompositeAccounts {
    pub name: String,
    pub accounts: Vec<AccountItem>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct InstructionAccount {
    pub name: String,
    #[serde(default)]
    pub docs: Vec<String>,
    #[serde(default, alias = "isMut")]
    pub writable: bool,
    #[serde(default, alias = "isSigner")]
    pub signer: bool,
    #[serde(default, alias = "isOptionalSigner")]
    pub optional_signer: bool,
    #[serde(default, alias = "isOptional")]
    pub optional: bool,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub pda: Option<Pda>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Pda {
    pub seeds: Vec<Seed>,
    #[serde(default)]
    pub program: Option<Seed>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Seed {
    /// Either a byte array or, in the legacy layout, a typed literal.
    Const { value: serde_json::Value },
    Arg { path: String },
    Account {
        path: String,
        #[serde(default)]
        account: Option<String>,
    },
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Field {
    pub name: String,
    #[serde(default)]
    pub docs: Vec<String>,
    #[serde(rename = "type")]
    pub type_: Type,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum Type {
    Primitive(String),
    Defined { defined: Defined },
    Option { option: Box<Type> },
    COption { coption: Box<Type> },
    Vec { vec: Box<Type> },
    Array { array: (Box<Type>, ArrayLen) },
    Tuple { tuple: Vec<Type> },
    Generic { generic: String },
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum Defined {
    Name(String),
    Reference {
        name: String,
        #[serde(default)]
        generics: Vec<serde_json::Value>,
    },
}

impl Defined {
    pub fn name(&self) -> &str {
        match self {
            Defined::Name(name) => name,
            Defined::Reference { name, .. } => name,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum ArrayLen {
    Value(usize),
    Generic { generic: String },
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TypeDef {
    pub name: String,
    #[serde(default)]
    pub docs: Vec<String>,
    #[serde(default)]
    pub generics: Vec<serde_json::Value>,
    #[serde(default)]
    pub serialization: Option<String>,
    #[serde(rename = "type")]
    pub type_: TypeDefTy,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TypeDefTy {
    Struct {
        #[serde(default)]
        fields: Option<DefinedFields>,
    },
    Enum { variants: Vec<EnumVariant> },
    Type { alias: Type },
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(untagged)]
pub enum DefinedFields {
    Named(Vec<Field>),
    Tuple(Vec<Type>),
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EnumVariant {
    pub name: String,
    #[serde(default)]
    pub fields: Option<DefinedFields>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Account {
    pub name: String,
    #[serde(default)]
    pub docs: Vec<String>,
    #[serde(default)]
    pub discriminator: Option<Vec<u8>>,
    /// Inline account layout (legacy layout only).
    #[serde(default, rename = "type")]
    pub type_: Option<TypeDefTy>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Event {
    pub name: String,
    #[serde(default)]
    pub discriminator: Option<Vec<u8>>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ErrorCode {
    pub code: u32,
    pub name: String,
    #[serde(default)]
    pub msg: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{AccountItem, ArrayLen, DefinedFields, Idl, Seed, Type, TypeDefTy, Version};

    #[test]
    fn reads_the_current_layout() {
        let idl: Idl = serde_json::from_str(
            r#"{
                "address": "tape9hFAE7jstfKB2QT1ovFNUZKKtDUyGZiGQpnBFdL",
                "metadata": { "name": "tape", "version": "0.1.0", "spec": "0.1.0" },
                "instructions": [{
                    "name": "tape_create",
                    "discriminator": [16],
                    "accounts": [
                        { "name": "signer", "writable": true, "signer": true },
                        { "name": "tape", "pda": { "seeds": [
                            { "kind": "const", "value": [116, 97, 112, 101] },
                            { "kind": "arg", "path": "name" }
                        ] } }
                    ],
                    "args": [{ "name": "name", "type": { "array": ["u8", 32] } }]
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(idl.version(), Version::V01);
        assert_eq!(idl.program_name(), Some("tape"));
        let instruction = &idl.instructions[0];
        assert_eq!(instruction.discriminator, Some(vec![16]));
        match &instruction.accounts[1] {
            AccountItem::Single(account) => {
                let seeds = &account.pda.as_ref().unwrap().seeds;
                assert!(matches!(&seeds[1], Seed::Arg { path } if path == "name"));
            }
            AccountItem::Composite(_) => panic!("expected a single account"),
        }
        assert_eq!(
            instruction.args[0].type_,
            Type::Array {
                array: (Box::new(Type::Primitive("u8".to_string())), ArrayLen::Value(32))
            }
        );
    }

    #[test]
    fn reads_the_legacy_layout() {
        let idl: Idl = serde_json::from_str(
            r#"{
                "version": "0.1.0",
                "name": "counter",
                "instructions": [{
                    "name": "increment",
                    "accounts": [
                        { "name": "counter", "isMut": true, "isSigner": false },
                        { "name": "group", "accounts": [
                            { "name": "authority", "isMut": false, "isSigner": true }
                        ] }
                    ],
                    "args": [{ "name": "by", "type": { "defined": "Step" } }]
                }],
                "accounts": [{
                    "name": "Counter",
                    "type": { "kind": "struct", "fields": [{ "name": "count", "type": "u64" }] }
                }],
                "metadata": { "address": "Count3r1111111111111111111111111111111111111" }
            }"#,
        )
        .unwrap();

        assert_eq!(idl.version(), Version::V00);
        assert_eq!(
            idl.program_address(),
            Some("Count3r1111111111111111111111111111111111111")
        );
        let accounts = &idl.instructions[0].accounts;
        assert!(matches!(&accounts[0], AccountItem::Single(account) if account.writable));
        assert!(matches!(&accounts[1], AccountItem::Composite(group) if group.accounts.len() == 1));
        assert!(matches!(
            &idl.accounts[0].type_,
            Some(TypeDefTy::Struct { fields: Some(DefinedFields::Named(fields)) }) if fields.len() == 1
        ));
    }

    #[test]
    fn tuple_fields_are_not_mistaken_for_named_fields() {
        let variant: super::EnumVariant = serde_json::from_str(
            r#"{ "name": "Appended", "fields": ["u64", { "defined": { "name": "Segment" } }] }"#,
        )
        .unwrap();

        assert!(matches!(variant.fields, Some(DefinedFields::Tuple(types)) if types.len() == 2));
    }
}
