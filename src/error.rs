// src/error.rs
use thiserror::Error;

/// Errors surfaced by the analysis pipeline and its collaborators. All four
/// variants are user-visible; none are swallowed internally.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Ragged or missing scraped statement columns, or a derived field whose
    /// denominator is zero.
    #[error("Malformed report: {0}")]
    MalformedReport(String),

    /// Non-numeric, missing, or out-of-range input caught before any rule or
    /// formula runs.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Too few report rows or price observations for the ratio math.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Network or parse failure from one of the external collaborators.
    #[error("Data source error: {0}")]
    DataSource(String),
}

impl From<reqwest::Error> for AnalysisError {
    fn from(err: reqwest::Error) -> Self {
        AnalysisError::DataSource(err.to_string())
    }
}
