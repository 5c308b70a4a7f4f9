use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("hex numbers must be full-byte chunks (ex: 0x00 instead of 0x0): {token}")]
    MalformedHex { token: String, script: String },

    #[error("error parsing script: {script}")]
    UnknownToken { token: String, script: String },

    #[error("wrong number of bytes being pushed. Expected:{expected} Pushed:{actual}")]
    PushSizeMismatch {
        expected: usize,
        actual: usize,
        script: String,
    },

    #[error("bad opcode")]
    BadOpcode,

    #[error("unexpected end of script")]
    UnexpectedEndOfScript,
}

impl ScriptError {
    /// The complete input of the failed assembly, if any.
    pub fn script(&self) -> Option<&str> {
        match self {
            ScriptError::MalformedHex { script, .. }
            | ScriptError::UnknownToken { script, .. }
            | ScriptError::PushSizeMismatch { script, .. } => Some(script),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("{name} must be hexadecimal string (not '{value}')")]
    NotHex { name: String, value: String },
}
