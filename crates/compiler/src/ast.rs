pub mod canonical;
pub mod name;
pub mod source;
