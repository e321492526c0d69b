use serde::{Deserialize, Serialize};

use super::currency::{format_brl, parse_currency, parse_decimal_field, parse_integer_field};

/// Annual education-deduction ceiling for the 2024 tax year.
pub const DEFAULT_DEDUCTION_LIMIT: f64 = 3561.50;
pub const DEFAULT_RETROACTIVE_YEARS: u32 = 5;
pub const DEFAULT_MAJORITY_AGE: u32 = 18;
pub const DEFAULT_MAX_AGE: i64 = 25;

/// Policy values the calculator applies. These change with tax law, so they
/// are supplied at startup instead of being baked into the arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeductionPolicy {
    pub deduction_limit: f64,
    /// Years of past returns a refund can be claimed for.
    pub retroactive_years: u32,
    pub majority_age: u32,
    pub max_age: i64,
}

impl Default for DeductionPolicy {
    fn default() -> Self {
        Self {
            deduction_limit: DEFAULT_DEDUCTION_LIMIT,
            retroactive_years: DEFAULT_RETROACTIVE_YEARS,
            majority_age: DEFAULT_MAJORITY_AGE,
            max_age: DEFAULT_MAX_AGE,
        }
    }
}

/// Raw text of the five simulator fields, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalculationForm {
    pub taxable_income: String,
    pub annual_tuition: String,
    pub tax_rate: String,
    pub current_age: String,
    pub years_of_college: String,
}

impl CalculationForm {
    pub fn to_input(&self) -> CalculationInput {
        CalculationInput {
            taxable_income: parse_currency(&self.taxable_income),
            annual_tuition: parse_currency(&self.annual_tuition),
            tax_rate_percent: parse_decimal_field(&self.tax_rate),
            current_age: parse_integer_field(&self.current_age),
            years_of_college: parse_integer_field(&self.years_of_college),
        }
    }
}

/// Parsed but not yet validated input. `None` marks a field that was absent
/// or had no numeric content.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CalculationInput {
    pub taxable_income: Option<f64>,
    pub annual_tuition: Option<f64>,
    pub tax_rate_percent: Option<f64>,
    pub current_age: Option<i64>,
    pub years_of_college: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub deductible_excess: f64,
    pub annual_savings: f64,
    pub five_year_savings: f64,
    pub years_until_majority: u32,
    pub future_horizon: u32,
    pub future_benefit: f64,
    pub total_estimated_benefit: f64,
}

impl CalculationResult {
    pub fn formatted(&self) -> FormattedResult {
        FormattedResult {
            annual_savings: format_brl(self.annual_savings),
            five_year_savings: format_brl(self.five_year_savings),
            future_benefit: format_brl(self.future_benefit),
            total_estimated_benefit: format_brl(self.total_estimated_benefit),
        }
    }
}

/// The four display strings handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedResult {
    pub annual_savings: String,
    pub five_year_savings: String,
    pub future_benefit: String,
    pub total_estimated_benefit: String,
}
