use thiserror::Error;

/// Field-level problems caught before anything reaches the network.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Latitude must be a finite number between -90 and 90, got {0}")]
    Latitude(f64),

    #[error("Longitude must be a finite number between -180 and 180, got {0}")]
    Longitude(f64),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Please select a location on the map")]
    MissingLocation,

    #[error("You can upload maximum {max} images")]
    TooManyImages { max: usize },

    #[error("Unknown status: {0}")]
    UnknownStatus(String),

    #[error("Unknown role: {0}")]
    UnknownRole(String),
}
