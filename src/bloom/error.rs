use thiserror::Error;

pub type BloomResult<T> = std::result::Result<T, BloomError>;

#[derive(Error, Debug)]
pub enum BloomError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Not a bloom filter file: unexpected magic {found:02x?}")]
    InvalidMagic { found: [u8; 4] },

    #[error("Format version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u16, found: u16 },

    #[error("Truncated input: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(
        "Failed to parse environment variable {var_name}: value '{value}' - {error}"
    )]
    EnvParseError {
        var_name: String,
        value: String,
        error: String,
    },
}
