//! Multi-step form wizard
//!
//! Advancing validates every field of the current step and blocks on the
//! first failure; going back never validates. Errors are kept per field and
//! cleared as soon as the field receives a valid value.

pub mod field;
pub mod publish;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use connectcargo_types::{Error, Result};
use serde::Serialize;

pub use field::{validate_field, FieldKind, FieldSpec};
pub use publish::{
    format_budget, format_currency, parse_budget, ConfirmationSummary, LoadDraft, PublishLoadForm,
};

#[derive(Debug, Clone, Serialize)]
pub struct Step {
    pub title: &'static str,
    pub fields: Vec<FieldSpec>,
}

/// How a step is drawn in the progress bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepState {
    Completed,
    Active,
    Upcoming,
}

#[derive(Debug, Clone)]
pub struct Wizard {
    steps: Vec<Step>,
    /// 1-based
    current: usize,
    values: BTreeMap<String, String>,
    errors: BTreeMap<String, String>,
    today: NaiveDate,
}

impl Wizard {
    pub fn new(steps: Vec<Step>, today: NaiveDate) -> Self {
        Self {
            steps,
            current: 1,
            values: BTreeMap::new(),
            errors: BTreeMap::new(),
            today,
        }
    }

    pub fn current_step(&self) -> usize {
        self.current
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn step_state(&self, step: usize) -> StepState {
        match step.cmp(&self.current) {
            std::cmp::Ordering::Less => StepState::Completed,
            std::cmp::Ordering::Equal => StepState::Active,
            std::cmp::Ordering::Greater => StepState::Upcoming,
        }
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.errors.get(name).map(String::as_str)
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    fn spec(&self, name: &str) -> Option<&FieldSpec> {
        self.steps
            .iter()
            .flat_map(|s| s.fields.iter())
            .find(|f| f.name == name)
    }

    fn check(&self, spec: &FieldSpec) -> std::result::Result<(), String> {
        let value = self.value(spec.name).unwrap_or("");
        validate_field(spec, value, self.today, |other| self.value(other))
    }

    /// Store a field value. A field already flagged is re-checked so its
    /// error disappears once the input is valid.
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        let spec = self
            .spec(name)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("field '{}'", name)))?;
        self.values.insert(name.to_string(), value.into());

        if self.errors.contains_key(name) && self.check(&spec).is_ok() {
            self.errors.remove(name);
        }
        Ok(())
    }

    /// Validate one field now (the "blur" check), recording or clearing its error
    pub fn touch(&mut self, name: &str) -> Result<bool> {
        let spec = self
            .spec(name)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("field '{}'", name)))?;
        Ok(self.record(&spec))
    }

    fn record(&mut self, spec: &FieldSpec) -> bool {
        match self.check(spec) {
            Ok(()) => {
                self.errors.remove(spec.name);
                true
            }
            Err(message) => {
                self.errors.insert(spec.name.to_string(), message);
                false
            }
        }
    }

    /// Validate every field of a step, returning the names that failed
    pub fn validate_step(&mut self, step: usize) -> Result<Vec<String>> {
        let fields = self
            .steps
            .get(step.wrapping_sub(1))
            .ok_or(Error::NoSuchStep(step))?
            .fields
            .clone();

        Ok(fields
            .iter()
            .filter(|spec| !self.record(spec))
            .map(|spec| spec.name.to_string())
            .collect())
    }

    pub fn next_step(&mut self, target: usize) -> Result<()> {
        if target == 0 || target > self.steps.len() {
            return Err(Error::NoSuchStep(target));
        }
        let invalid = self.validate_step(self.current)?;
        if !invalid.is_empty() {
            return Err(Error::StepInvalid {
                step: self.current,
                fields: invalid,
            });
        }
        self.current = target;
        Ok(())
    }

    pub fn previous_step(&mut self, target: usize) -> Result<()> {
        if target == 0 || target > self.steps.len() {
            return Err(Error::NoSuchStep(target));
        }
        self.current = target;
        Ok(())
    }

    /// Final submission. Without consent nothing is validated or changed.
    pub fn finish(&mut self, consent: bool) -> Result<&BTreeMap<String, String>> {
        if !consent {
            return Err(Error::ConsentRequired);
        }
        for step in 1..=self.steps.len() {
            let invalid = self.validate_step(step)?;
            if !invalid.is_empty() {
                return Err(Error::StepInvalid {
                    step,
                    fields: invalid,
                });
            }
        }
        Ok(&self.values)
    }
}
