use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid parameter {name}: {message}")]
    InvalidParameter { name: &'static str, message: String },

    #[error("Field evaluated at non-positive radial distance r={radial_distance}")]
    DomainViolation { radial_distance: f64 },

    #[error("Invalid voltage bracket [{low}, {high}]: {message}")]
    BracketInvalid { low: f64, high: f64, message: String },

    #[error("Integration did not terminate within {max_steps} steps (voltage={voltage})")]
    DidNotTerminate { max_steps: usize, voltage: f64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML write error: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    #[error("Binary encoding error: {0}")]
    Bincode(#[from] bincode::Error),
}

impl SimError {
    pub(crate) fn invalid(name: &'static str, message: impl Into<String>) -> Self {
        SimError::InvalidParameter {
            name,
            message: message.into(),
        }
    }
}

pub type SimResult<T> = Result<T, SimError>;
