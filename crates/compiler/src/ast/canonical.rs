//! The root node: a normalized, generator-neutral view of a program.
use crate::ast::name::Name;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Nesting depth after which a type is considered unsized. Only reachable
/// through types that contain themselves without indirection.
const MAX_TYPE_DEPTH: usize = 64;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Root {
    pub program: Program,
}

impl Root {
    pub fn get_defined_type(&self, name: &Name) -> Option<&DefinedType> {
        self.program
            .defined_types
            .iter()
            .find(|defined| &defined.name == name)
    }

    /// The number of bytes `type_` always occupies, if it is the same for
    /// every value.
    pub fn fixed_size(&self, type_: &Type) -> Option<usize> {
        self.fixed_size_at(type_, 0)
    }

    pub fn fixed_size_of_fields(&self, fields: &[Field]) -> Option<usize> {
        fields
            .iter()
            .map(|field| self.fixed_size(&field.type_))
            .sum()
    }

    /// Check if `type_` contains a floating point number somewhere.
    pub fn contains_float(&self, type_: &Type) -> bool {
        self.contains_float_at(type_, 0)
    }

    pub fn fields_contain_float(&self, fields: &[Field]) -> bool {
        fields.iter().any(|field| self.contains_float(&field.type_))
    }

    pub fn type_def_contains_float(&self, type_def: &TypeDef) -> bool {
        self.type_def_contains_float_at(type_def, 0)
    }

    fn fixed_size_at(&self, type_: &Type, depth: usize) -> Option<usize> {
        if depth > MAX_TYPE_DEPTH {
            return None;
        }

        match type_ {
            Type::Number(format) => Some(format.size()),
            Type::Boolean => Some(1),
            Type::PublicKey => Some(32),
            Type::String | Type::Bytes => None,
            Type::Array(item, Count::Fixed(count)) => self
                .fixed_size_at(item, depth + 1)
                .map(|size| size * count),
            Type::Array(_, Count::Prefixed) => None,
            Type::Option(_, _) => None,
            Type::Tuple(items) => items
                .iter()
                .map(|item| self.fixed_size_at(item, depth + 1))
                .sum(),
            Type::Defined(name) => self
                .get_defined_type(name)
                .and_then(|defined| self.fixed_size_of_type_def(&defined.type_, depth + 1)),
        }
    }

    fn fixed_size_of_type_def(&self, type_def: &TypeDef, depth: usize) -> Option<usize> {
        match type_def {
            TypeDef::Struct(fields) => fields
                .iter()
                .map(|field| self.fixed_size_at(&field.type_, depth + 1))
                .sum(),
            TypeDef::Enum(variants) => {
                let sizes = variants
                    .iter()
                    .map(|variant| match variant {
                        Variant::Empty(_) => Some(0),
                        Variant::Tuple(_, types) => types
                            .iter()
                            .map(|type_| self.fixed_size_at(type_, depth + 1))
                            .sum(),
                        Variant::Struct(_, fields) => fields
                            .iter()
                            .map(|field| self.fixed_size_at(&field.type_, depth + 1))
                            .sum(),
                    })
                    .collect::<Option<Vec<usize>>>()?;

                match sizes.iter().all_equal_value() {
                    Ok(size) => Some(1 + size),
                    Err(None) => Some(1),
                    Err(Some(_)) => None,
                }
            }
            TypeDef::Alias(type_) => self.fixed_size_at(type_, depth + 1),
        }
    }

    fn contains_float_at(&self, type_: &Type, depth: usize) -> bool {
        if depth > MAX_TYPE_DEPTH {
            return false;
        }

        match type_ {
            Type::Number(format) => format.is_float(),
            Type::Boolean | Type::String | Type::PublicKey | Type::Bytes => false,
            Type::Array(item, _) | Type::Option(item, _) => self.contains_float_at(item, depth + 1),
            Type::Tuple(items) => items
                .iter()
                .any(|item| self.contains_float_at(item, depth + 1)),
            Type::Defined(name) => self
                .get_defined_type(name)
                .is_some_and(|defined| self.type_def_contains_float_at(&defined.type_, depth + 1)),
        }
    }

    fn type_def_contains_float_at(&self, type_def: &TypeDef, depth: usize) -> bool {
        match type_def {
            TypeDef::Struct(fields) => fields
                .iter()
                .any(|field| self.contains_float_at(&field.type_, depth + 1)),
            TypeDef::Enum(variants) => variants.iter().any(|variant| match variant {
                Variant::Empty(_) => false,
                Variant::Tuple(_, types) => types
                    .iter()
                    .any(|type_| self.contains_float_at(type_, depth + 1)),
                Variant::Struct(_, fields) => fields
                    .iter()
                    .any(|field| self.contains_float_at(&field.type_, depth + 1)),
            }),
            TypeDef::Alias(type_) => self.contains_float_at(type_, depth + 1),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Program {
    pub name: Name,
    /// Base58 address of the program, empty when the IDL does not know it.
    pub public_key: String,
    pub version: String,
    pub origin: Origin,
    pub docs: Vec<String>,
    pub accounts: Vec<Account>,
    pub instructions: Vec<Instruction>,
    pub defined_types: Vec<DefinedType>,
    pub errors: Vec<ProgramError>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Anchor,
    Shank,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Account {
    pub name: Name,
    pub docs: Vec<String>,
    pub data: Vec<Field>,
    pub discriminator: Option<Vec<u8>>,
}

impl Account {
    /// Size of the account data, discriminator included.
    pub fn size(&self, root: &Root) -> Option<usize> {
        let discriminator = self.discriminator.as_ref().map_or(0, Vec::len);
        root.fixed_size_of_fields(&self.data)
            .map(|size| size + discriminator)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Instruction {
    pub name: Name,
    pub docs: Vec<String>,
    pub accounts: Vec<InstructionAccount>,
    pub arguments: Vec<Field>,
    pub discriminator: Option<Vec<u8>>,
}

impl Instruction {
    pub fn get_argument(&self, name: &Name) -> Option<&Field> {
        self.arguments.iter().find(|argument| &argument.name == name)
    }

    pub fn get_account(&self, name: &Name) -> Option<&InstructionAccount> {
        self.accounts.iter().find(|account| &account.name == name)
    }

    pub fn has_pda_defaults(&self) -> bool {
        self.accounts
            .iter()
            .any(|account| matches!(account.default_value, Some(AccountDefault::Pda(_))))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct InstructionAccount {
    pub name: Name,
    pub docs: Vec<String>,
    pub is_writable: bool,
    pub is_signer: Signer,
    pub is_optional: bool,
    pub default_value: Option<AccountDefault>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum Signer {
    No,
    Yes,
    /// The account may or may not sign, decided by the caller.
    Either,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum AccountDefault {
    Address(String),
    Pda(Vec<Seed>),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum Seed {
    Constant(Vec<u8>),
    Account(Name),
    Argument(Name, Type),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DefinedType {
    pub name: Name,
    pub docs: Vec<String>,
    pub type_: TypeDef,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum TypeDef {
    Struct(Vec<Field>),
    Enum(Vec<Variant>),
    Alias(Type),
}

impl TypeDef {
    /// Check if no variant carries any data.
    pub fn is_scalar_enum(&self) -> bool {
        match self {
            TypeDef::Enum(variants) => variants
                .iter()
                .all(|variant| matches!(variant, Variant::Empty(_))),
            _ => false,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProgramError {
    pub name: Name,
    pub code: u32,
    pub message: String,
    pub docs: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Field {
    pub name: Name,
    pub docs: Vec<String>,
    pub type_: Type,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum Variant {
    Empty(Name),
    Tuple(Name, Vec<Type>),
    Struct(Name, Vec<Field>),
}

impl Variant {
    pub fn name(&self) -> &Name {
        match self {
            Variant::Empty(name) => name,
            Variant::Tuple(name, _) => name,
            Variant::Struct(name, _) => name,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum Type {
    Number(NumberFormat),
    Boolean,
    /// A UTF-8 string prefixed with its `u32` byte length.
    String,
    PublicKey,
    /// Bytes prefixed with their `u32` length.
    Bytes,
    Array(Box<Type>, Count),
    Option(Box<Type>, OptionPrefix),
    Tuple(Vec<Type>),
    Defined(Name),
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum Count {
    Fixed(usize),
    /// Prefixed with a `u32` item count.
    Prefixed,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum OptionPrefix {
    /// `Option<T>`
    U8,
    /// `COption<T>`
    U32,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum NumberFormat {
    U8,
    U16,
    U32,
    U64,
    U128,
    I8,
    I16,
    I32,
    I64,
    I128,
    F32,
    F64,
}

impl NumberFormat {
    pub fn parse(value: &str) -> Option<Self> {
        let format = match value {
            "u8" => NumberFormat::U8,
            "u16" => NumberFormat::U16,
            "u32" => NumberFormat::U32,
            "u64" => NumberFormat::U64,
            "u128" => NumberFormat::U128,
            "i8" => NumberFormat::I8,
            "i16" => NumberFormat::I16,
            "i32" => NumberFormat::I32,
            "i64" => NumberFormat::I64,
            "i128" => NumberFormat::I128,
            "f32" => NumberFormat::F32,
            "f64" => NumberFormat::F64,
            _ => return None,
        };

        Some(format)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NumberFormat::U8 => "u8",
            NumberFormat::U16 => "u16",
            NumberFormat::U32 => "u32",
            NumberFormat::U64 => "u64",
            NumberFormat::U128 => "u128",
            NumberFormat::I8 => "i8",
            NumberFormat::I16 => "i16",
            NumberFormat::I32 => "i32",
            NumberFormat::I64 => "i64",
            NumberFormat::I128 => "i128",
            NumberFormat::F32 => "f32",
            NumberFormat::F64 => "f64",
        }
    }

    pub fn size(&self) -> usize {
        match self {
            NumberFormat::U8 | NumberFormat::I8 => 1,
            NumberFormat::U16 | NumberFormat::I16 => 2,
            NumberFormat::U32 | NumberFormat::I32 | NumberFormat::F32 => 4,
            NumberFormat::U64 | NumberFormat::I64 | NumberFormat::F64 => 8,
            NumberFormat::U128 | NumberFormat::I128 => 16,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, NumberFormat::F32 | NumberFormat::F64)
    }

    /// Integers that do not fit into a JavaScript `number`.
    pub fn is_big(&self) -> bool {
        !self.is_float() && self.size() >= 8
    }
}
