use thiserror::Error;

/// Validation failures. The messages are shown to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalculationError {
    #[error("Por favor, preencha todos os campos obrigatórios.")]
    MissingFields,
    #[error("Por favor, insira uma idade válida (0-{max_age} anos).")]
    InvalidAge { age: i64, max_age: i64 },
}

impl CalculationError {
    /// Stable tag used on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            CalculationError::MissingFields => "missing-fields",
            CalculationError::InvalidAge { .. } => "invalid-age",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolicyError {
    #[error("deduction limit must be a finite amount >= 0, got {0}")]
    InvalidDeductionLimit(f64),
    #[error("majority age must be > 0")]
    InvalidMajorityAge,
    #[error("max age must be >= 0, got {0}")]
    InvalidMaxAge(i64),
}
