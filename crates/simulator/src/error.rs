use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimulatorError {
    #[error("Unit '{unit}' is not offered for prices quoted per {base}")]
    UnsupportedUnit { unit: String, base: String },

    #[error("Unknown metal '{0}'")]
    UnknownMetal(String),

    #[error("The {0} is too large to compute")]
    Overflow(&'static str),
}
