/// Raised while building a [`crate::trade::Trade`]. The only hard failure in the crate.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConstructionError {
    #[error("Trade is missing required field `{0}`")]
    MissingField(&'static str),
    #[error("Volume must be positive, got {0} kb")]
    InvalidVolume(i64),
    #[error("Differential must be a finite number, got {0}")]
    InvalidDifferential(f64),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Failed to generate a trade id: {0}")]
    IdGeneration(String),
    #[error("Unknown delivery terms '{0}', expected FOB, CIF or DAP")]
    UnknownTerms(String),
    #[error("Unknown buy/sell indicator '{0}', expected bid, offer, buy or sell")]
    UnknownIndicator(String),
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum MarketError {
    #[error("Grade '{0}' is already registered")]
    DuplicateGrade(String),
    #[error("No grade named '{0}' is registered")]
    UnknownGrade(String),
}
