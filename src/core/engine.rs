use tracing::debug;

use super::error::{CalculationError, PolicyError};
use super::types::{CalculationInput, CalculationResult, DeductionPolicy};

impl DeductionPolicy {
    pub fn validate(&self) -> Result<(), PolicyError> {
        if !self.deduction_limit.is_finite() || self.deduction_limit < 0.0 {
            return Err(PolicyError::InvalidDeductionLimit(self.deduction_limit));
        }
        if self.majority_age == 0 {
            return Err(PolicyError::InvalidMajorityAge);
        }
        if self.max_age < 0 {
            return Err(PolicyError::InvalidMaxAge(self.max_age));
        }
        Ok(())
    }
}

/// Inputs that passed validation.
#[derive(Debug, Clone, Copy)]
struct ValidatedInput {
    annual_tuition: f64,
    tax_rate: f64,
    current_age: i64,
    years_of_college: u32,
}

/// Estimates the tax benefit of deducting tuition above the statutory
/// education ceiling. Pure: the same input always yields the same result.
#[derive(Debug, Clone, Copy, Default)]
pub struct BenefitCalculator {
    policy: DeductionPolicy,
}

impl BenefitCalculator {
    pub fn new(policy: DeductionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &DeductionPolicy {
        &self.policy
    }

    pub fn compute(&self, input: &CalculationInput) -> Result<CalculationResult, CalculationError> {
        let validated = self.validate(input)?;
        let result = self.project(validated);
        debug!(
            annual_savings = result.annual_savings,
            future_horizon = result.future_horizon,
            total = result.total_estimated_benefit,
            "benefit computed"
        );
        Ok(result)
    }

    fn validate(&self, input: &CalculationInput) -> Result<ValidatedInput, CalculationError> {
        let (
            Some(taxable_income),
            Some(annual_tuition),
            Some(tax_rate),
            Some(current_age),
            Some(years_of_college),
        ) = (
            input.taxable_income,
            input.annual_tuition,
            input.tax_rate_percent,
            input.current_age,
            input.years_of_college,
        )
        else {
            return Err(CalculationError::MissingFields);
        };

        // Zero or non-finite values count as not filled in, age included.
        let filled = |v: f64| v.is_finite() && v != 0.0;
        if !filled(taxable_income)
            || !filled(annual_tuition)
            || !filled(tax_rate)
            || current_age == 0
        {
            return Err(CalculationError::MissingFields);
        }
        let Ok(years_of_college) = u32::try_from(years_of_college) else {
            return Err(CalculationError::MissingFields);
        };

        if !(0..=self.policy.max_age).contains(&current_age) {
            return Err(CalculationError::InvalidAge {
                age: current_age,
                max_age: self.policy.max_age,
            });
        }

        Ok(ValidatedInput {
            annual_tuition,
            tax_rate,
            current_age,
            years_of_college,
        })
    }

    fn project(&self, input: ValidatedInput) -> CalculationResult {
        let deductible_excess = (input.annual_tuition - self.policy.deduction_limit).max(0.0);
        let annual_savings = deductible_excess * (input.tax_rate / 100.0);
        let five_year_savings = annual_savings * f64::from(self.policy.retroactive_years);

        // current_age is within [0, max_age] here, so the difference fits.
        let years_until_majority =
            (i64::from(self.policy.majority_age) - input.current_age).max(0) as u32;
        let future_horizon = years_until_majority.saturating_add(input.years_of_college);
        let future_benefit = annual_savings * f64::from(future_horizon);

        CalculationResult {
            deductible_excess,
            annual_savings,
            five_year_savings,
            years_until_majority,
            future_horizon,
            future_benefit,
            total_estimated_benefit: five_year_savings + future_benefit,
        }
    }
}
