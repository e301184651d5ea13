{{ header }}

use thiserror::Error;

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum {{ program }}Error {
{%- for error in errors %}
    /// {{ error.code }} - {{ error.doc }}
    #[error("{{ error.message }}")]
    {{ error.name }} = 0x{{ error.hex }},
{%- endfor %}
}

impl {{ program }}Error {
    /// The error behind a custom program error code.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
{%- for error in errors %}
            {{ error.code }} => Some(Self::{{ error.name }}),
{%- endfor %}
            _ => None,
        }
    }
}

impl From<{{ program }}Error> for solana_program_error::ProgramError {
    fn from(error: {{ program }}Error) -> Self {
        solana_program_error::ProgramError::Custom(error as u32)
    }
}
