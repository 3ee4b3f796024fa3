use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AvatarError {
    #[error("Element not found: #{0}")]
    ElementNotFound(String),

    #[error("Element #{id} is not a {expected}")]
    WrongElementType { id: String, expected: &'static str },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Slider config must be an element id or an options object")]
    InvalidSliderConfig,

    #[error("No slider is bound")]
    NoSliderBound,

    #[error("Canvas has no 2d context")]
    NoContext,
}

pub type Result<T> = std::result::Result<T, AvatarError>;
