mod currency;
mod engine;
mod error;
mod types;

pub use currency::{
    format_brl, mask_currency_input, parse_currency, parse_decimal_field, parse_integer_field,
};
pub use engine::BenefitCalculator;
pub use error::{CalculationError, PolicyError};
pub use types::{
    CalculationForm, CalculationInput, CalculationResult, DEFAULT_DEDUCTION_LIMIT,
    DEFAULT_MAJORITY_AGE, DEFAULT_MAX_AGE, DEFAULT_RETROACTIVE_YEARS, DeductionPolicy,
    FormattedResult,
};
