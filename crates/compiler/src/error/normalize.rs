use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("the IDL does not name its program")]
    MissingProgramName,
    #[error("instruction `{0}`: {1}")]
    BadInstruction(String, Problem),
    #[error("account `{0}`: {1}")]
    BadAccount(String, Problem),
    #[error("type `{0}`: {1}")]
    BadType(String, Problem),
    #[error("{kind} `{name}` is declared more than once")]
    Duplicate { kind: &'static str, name: String },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Problem {
    #[error("unsupported type `{0}`")]
    UnsupportedType(String),
    #[error("generic type parameters are not supported (`{0}`)")]
    Generic(String),
    #[error("unknown defined type `{0}`")]
    UnknownDefinedType(String),
    #[error("no struct layout is declared for the account")]
    MissingAccountType,
    #[error("unsupported serialization `{0}`")]
    UnsupportedSerialization(String),
    #[error("unsupported discriminant type `{0}`")]
    UnsupportedDiscriminant(String),
    #[error("PDA seed references unknown account `{0}`")]
    UnknownSeedAccount(String),
    #[error("PDA seed references unknown argument `{0}`")]
    UnknownSeedArgument(String),
    #[error("constant PDA seed is neither bytes nor a string")]
    BadConstantSeed,
}
