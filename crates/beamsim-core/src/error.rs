use thiserror::Error;

pub type Result<T> = std::result::Result<T, BeamError>;

#[derive(Debug, Error)]
pub enum BeamError {
    #[error("beam angle {angle_deg} deg outside +/-{limit_deg} deg")]
    AngleOutOfRange { angle_deg: f64, limit_deg: f64 },

    #[error("unknown location: {0}")]
    UnknownLocation(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("adc conversion did not complete within {0:?}")]
    ConversionTimeout(std::time::Duration),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
