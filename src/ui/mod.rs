//! Headless controller for the simulator form.
//!
//! The presentation layer forwards user actions as [`FormEvent`]s and applies
//! the returned [`Effect`]s. All form state lives in [`FormController`]; the
//! calculator itself never sees it.

use tracing::{debug, info};

use crate::core::{
    BenefitCalculator, CalculationForm, FormattedResult, mask_currency_input,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Field {
    TaxableIncome,
    AnnualTuition,
    TaxRate,
    CurrentAge,
    YearsOfCollege,
}

impl Field {
    pub fn is_currency(self) -> bool {
        matches!(self, Field::TaxableIncome | Field::AnnualTuition)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Section {
    Simulator,
    Contact,
    Results,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FormEvent {
    /// Keystroke-level edit; currency fields are re-masked.
    Input { field: Field, text: String },
    /// A complete value (prefill, paste, command line), stored as given.
    Set { field: Field, text: String },
    Navigate(Section),
    Submit,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    SetFieldValue { field: Field, value: String },
    ScrollIntoView(Section),
    ShowResults(FormattedResult),
    Alert(String),
}

#[derive(Debug)]
pub struct FormController {
    calculator: BenefitCalculator,
    form: CalculationForm,
    displayed: Option<FormattedResult>,
}

impl FormController {
    pub fn new(calculator: BenefitCalculator) -> Self {
        Self {
            calculator,
            form: CalculationForm::default(),
            displayed: None,
        }
    }

    pub fn form(&self) -> &CalculationForm {
        &self.form
    }

    /// Results currently on screen, if any calculation has succeeded.
    pub fn displayed(&self) -> Option<&FormattedResult> {
        self.displayed.as_ref()
    }

    pub fn dispatch(&mut self, event: FormEvent) -> Vec<Effect> {
        match event {
            FormEvent::Input { field, text } => self.on_input(field, text),
            FormEvent::Set { field, text } => {
                *self.slot(field) = text;
                Vec::new()
            }
            FormEvent::Navigate(section) => vec![Effect::ScrollIntoView(section)],
            FormEvent::Submit => self.on_submit(),
        }
    }

    fn on_input(&mut self, field: Field, text: String) -> Vec<Effect> {
        if field.is_currency() {
            let masked = mask_currency_input(&text);
            *self.slot(field) = masked.clone();
            vec![Effect::SetFieldValue {
                field,
                value: masked,
            }]
        } else {
            *self.slot(field) = text;
            Vec::new()
        }
    }

    fn on_submit(&mut self) -> Vec<Effect> {
        let input = self.form.to_input();
        match self.calculator.compute(&input) {
            Ok(result) => {
                let formatted = result.formatted();
                info!(total = %formatted.total_estimated_benefit, "simulation displayed");
                self.displayed = Some(formatted.clone());
                vec![
                    Effect::ShowResults(formatted),
                    Effect::ScrollIntoView(Section::Results),
                ]
            }
            Err(err) => {
                debug!(kind = err.kind(), "simulation rejected");
                vec![Effect::Alert(err.to_string())]
            }
        }
    }

    fn slot(&mut self, field: Field) -> &mut String {
        match field {
            Field::TaxableIncome => &mut self.form.taxable_income,
            Field::AnnualTuition => &mut self.form.annual_tuition,
            Field::TaxRate => &mut self.form.tax_rate,
            Field::CurrentAge => &mut self.form.current_age,
            Field::YearsOfCollege => &mut self.form.years_of_college,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DeductionPolicy;

    fn controller() -> FormController {
        FormController::new(BenefitCalculator::new(DeductionPolicy::default()))
    }

    fn fill(controller: &mut FormController, fields: [(Field, &str); 5]) {
        for (field, text) in fields {
            controller.dispatch(FormEvent::Input {
                field,
                text: text.to_string(),
            });
        }
    }

    fn reference_fields() -> [(Field, &'static str); 5] {
        [
            (Field::TaxableIncome, "10000000"),
            (Field::AnnualTuition, "2000000"),
            (Field::TaxRate, "27.5"),
            (Field::CurrentAge, "10"),
            (Field::YearsOfCollege, "5"),
        ]
    }

    #[test]
    fn currency_input_is_masked_and_echoed() {
        let mut c = controller();
        let effects = c.dispatch(FormEvent::Input {
            field: Field::AnnualTuition,
            text: "2000000".to_string(),
        });
        assert_eq!(
            effects,
            vec![Effect::SetFieldValue {
                field: Field::AnnualTuition,
                value: "20.000,00".to_string(),
            }]
        );
        assert_eq!(c.form().annual_tuition, "20.000,00");
    }

    #[test]
    fn plain_input_is_stored_without_effects() {
        let mut c = controller();
        let effects = c.dispatch(FormEvent::Input {
            field: Field::CurrentAge,
            text: "7".to_string(),
        });
        assert!(effects.is_empty());
        assert_eq!(c.form().current_age, "7");
    }

    #[test]
    fn set_stores_currency_text_unmasked() {
        let mut c = controller();
        let effects = c.dispatch(FormEvent::Set {
            field: Field::TaxableIncome,
            text: "100.000,00".to_string(),
        });
        assert!(effects.is_empty());
        assert_eq!(c.form().taxable_income, "100.000,00");
        assert_eq!(c.form().to_input().taxable_income, Some(100_000.0));
    }

    #[test]
    fn navigation_scrolls_to_section() {
        let mut c = controller();
        assert_eq!(
            c.dispatch(FormEvent::Navigate(Section::Contact)),
            vec![Effect::ScrollIntoView(Section::Contact)]
        );
    }

    #[test]
    fn submit_shows_results_then_scrolls() {
        let mut c = controller();
        fill(&mut c, reference_fields());
        let effects = c.dispatch(FormEvent::Submit);

        assert_eq!(effects.len(), 2);
        let Effect::ShowResults(shown) = &effects[0] else {
            panic!("expected results first, got {:?}", effects[0]);
        };
        assert_eq!(shown.annual_savings, "R$\u{a0}4.520,59");
        assert_eq!(effects[1], Effect::ScrollIntoView(Section::Results));
        assert_eq!(c.displayed(), Some(shown));
    }

    #[test]
    fn failed_submit_alerts_and_keeps_previous_results() {
        let mut c = controller();
        fill(&mut c, reference_fields());
        c.dispatch(FormEvent::Submit);
        let before = c.displayed().cloned();

        c.dispatch(FormEvent::Input {
            field: Field::CurrentAge,
            text: "26".to_string(),
        });
        let effects = c.dispatch(FormEvent::Submit);
        assert_eq!(
            effects,
            vec![Effect::Alert(
                "Por favor, insira uma idade válida (0-25 anos).".to_string()
            )]
        );
        assert_eq!(c.displayed().cloned(), before);
    }

    #[test]
    fn empty_form_reports_missing_fields() {
        let mut c = controller();
        assert_eq!(
            c.dispatch(FormEvent::Submit),
            vec![Effect::Alert(
                "Por favor, preencha todos os campos obrigatórios.".to_string()
            )]
        );
        assert!(c.displayed().is_none());
    }
}
