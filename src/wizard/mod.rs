//! Multi-step validation wizard
//!
//! Sequences several schema validations across named steps over one
//! accumulated record. Each "advance" merges the step's patch into the
//! record and validates it against the current step's schema; the record
//! carries values across steps, so later steps can depend on earlier
//! answers.
//!
//! Construction problems (no steps, duplicate or missing ids) are
//! programmer errors and raise immediately; a failed step is a normal
//! outcome surfaced both as a distinguished error and through callbacks.

use std::collections::HashMap;
use std::fmt;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

use crate::schema::{FormSchema, ValidationReport};
use crate::validate::validate_data;

/// One wizard step: an identifier paired with the schema validated when the
/// step is advanced.
#[derive(Debug, Clone)]
pub struct WizardStep {
    pub id: String,
    pub schema: FormSchema,
}

impl WizardStep {
    pub fn new(id: impl Into<String>, schema: FormSchema) -> Self {
        Self {
            id: id.into(),
            schema,
        }
    }
}

type StepChangeHook = Box<dyn Fn(&str, usize, usize) + Send + Sync>;
type StepReportHook = Box<dyn Fn(&str, usize, &ValidationReport) + Send + Sync>;
type CompleteHook = Box<dyn Fn(&Map<String, Value>) + Send + Sync>;

/// Optional lifecycle callbacks, fired synchronously.
#[derive(Default)]
pub struct WizardCallbacks {
    on_step_change: Option<StepChangeHook>,
    on_validation_success: Option<StepReportHook>,
    on_validation_error: Option<StepReportHook>,
    on_complete: Option<CompleteHook>,
}

impl WizardCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fired with (step id, step index, total steps) whenever the current
    /// step changes, including once at construction.
    pub fn on_step_change(mut self, hook: impl Fn(&str, usize, usize) + Send + Sync + 'static) -> Self {
        self.on_step_change = Some(Box::new(hook));
        self
    }

    pub fn on_validation_success(
        mut self,
        hook: impl Fn(&str, usize, &ValidationReport) + Send + Sync + 'static,
    ) -> Self {
        self.on_validation_success = Some(Box::new(hook));
        self
    }

    pub fn on_validation_error(
        mut self,
        hook: impl Fn(&str, usize, &ValidationReport) + Send + Sync + 'static,
    ) -> Self {
        self.on_validation_error = Some(Box::new(hook));
        self
    }

    /// Fired with the final accumulated record when the last step passes.
    pub fn on_complete(mut self, hook: impl Fn(&Map<String, Value>) + Send + Sync + 'static) -> Self {
        self.on_complete = Some(Box::new(hook));
        self
    }
}

impl fmt::Debug for WizardCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WizardCallbacks")
            .field("on_step_change", &self.on_step_change.is_some())
            .field("on_validation_success", &self.on_validation_success.is_some())
            .field("on_validation_error", &self.on_validation_error.is_some())
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

/// Wizard errors.
#[derive(Debug, Error)]
pub enum WizardError {
    #[error("wizard requires at least one step")]
    EmptySteps,

    #[error("step at index {0} is missing an id")]
    MissingStepId(usize),

    #[error("duplicate step id '{0}'; step ids must be unique")]
    DuplicateStepId(String),

    #[error("validation failed for step '{id}'")]
    StepValidationFailed {
        id: String,
        report: ValidationReport,
    },
}

/// Multi-step validation state machine.
pub struct Wizard {
    steps: Vec<WizardStep>,
    current_step_index: usize,
    data: Map<String, Value>,
    step_results: Vec<Option<ValidationReport>>,
    completed_steps: Vec<bool>,
    step_index_by_id: HashMap<String, usize>,
    callbacks: WizardCallbacks,
}

impl Wizard {
    /// Builds a wizard over the given steps and initial record.
    ///
    /// Fires `on_step_change` once for the initial step.
    pub fn new(
        steps: Vec<WizardStep>,
        initial_data: Map<String, Value>,
        callbacks: WizardCallbacks,
    ) -> Result<Self, WizardError> {
        if steps.is_empty() {
            return Err(WizardError::EmptySteps);
        }
        let mut step_index_by_id = HashMap::new();
        for (index, step) in steps.iter().enumerate() {
            if step.id.is_empty() {
                return Err(WizardError::MissingStepId(index));
            }
            if step_index_by_id.insert(step.id.clone(), index).is_some() {
                return Err(WizardError::DuplicateStepId(step.id.clone()));
            }
        }
        let total = steps.len();
        let wizard = Self {
            steps,
            current_step_index: 0,
            data: initial_data,
            step_results: vec![None; total],
            completed_steps: vec![false; total],
            step_index_by_id,
            callbacks,
        };
        wizard.fire_step_change();
        Ok(wizard)
    }

    pub fn current_step_id(&self) -> &str {
        &self.steps[self.current_step_index].id
    }

    pub fn current_step_index(&self) -> usize {
        self.current_step_index
    }

    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    /// The accumulated cross-step record.
    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    pub fn completed_steps(&self) -> &[bool] {
        &self.completed_steps
    }

    /// Latest validation report per step, if the step has been validated.
    pub fn step_results(&self) -> &[Option<ValidationReport>] {
        &self.step_results
    }

    /// Rounded completion percentage based on the current position.
    pub fn progress(&self) -> u32 {
        let fraction = (self.current_step_index + 1) as f64 / self.steps.len() as f64;
        (fraction * 100.0).round() as u32
    }

    /// Validates the accumulated record against the current step's schema.
    ///
    /// Records the report and the step's completion flag, fires the
    /// matching callback, and raises `StepValidationFailed` on failure.
    pub async fn validate_current_step(&mut self) -> Result<ValidationReport, WizardError> {
        let index = self.current_step_index;
        let step = &self.steps[index];
        let report = validate_data(&step.schema, &self.data).await;
        self.step_results[index] = Some(report.clone());
        if report.success {
            self.completed_steps[index] = true;
            if let Some(hook) = &self.callbacks.on_validation_success {
                hook(&step.id, index, &report);
            }
            Ok(report)
        } else {
            self.completed_steps[index] = false;
            if let Some(hook) = &self.callbacks.on_validation_error {
                hook(&step.id, index, &report);
            }
            Err(WizardError::StepValidationFailed {
                id: step.id.clone(),
                report,
            })
        }
    }

    /// Merges `step_data` into the record and validates the current step.
    ///
    /// On success advances to the next step, or fires `on_complete` when
    /// the last step passes. Returns `Ok(true)` when the step passed,
    /// `Ok(false)` when validation failed.
    pub async fn next_step(&mut self, step_data: Map<String, Value>) -> Result<bool, WizardError> {
        for (key, value) in step_data {
            self.data.insert(key, value);
        }
        match self.validate_current_step().await {
            Ok(_) => {
                if self.current_step_index < self.steps.len() - 1 {
                    self.current_step_index += 1;
                    self.fire_step_change();
                } else if let Some(hook) = &self.callbacks.on_complete {
                    hook(&self.data);
                }
                Ok(true)
            }
            Err(WizardError::StepValidationFailed { .. }) => Ok(false),
            Err(other) => Err(other),
        }
    }

    /// Steps back one position; no-op on the first step.
    pub fn previous_step(&mut self) {
        if self.current_step_index > 0 {
            self.current_step_index -= 1;
            self.fire_step_change();
        }
    }

    /// Jumps to a step by id. Unknown ids are a diagnostic no-op.
    pub fn go_to_step(&mut self, step_id: &str) {
        match self.step_index_by_id.get(step_id) {
            Some(&index) => {
                self.current_step_index = index;
                self.fire_step_change();
            }
            None => warn!(step_id, "go_to_step: unknown step id"),
        }
    }

    /// Returns to the first step and clears the record and all results.
    pub fn reset(&mut self) {
        self.current_step_index = 0;
        self.data.clear();
        self.step_results.fill(None);
        self.completed_steps.fill(false);
        self.fire_step_change();
    }

    fn fire_step_change(&self) {
        if let Some(hook) = &self.callbacks.on_step_change {
            hook(
                &self.steps[self.current_step_index].id,
                self.current_step_index,
                self.steps.len(),
            );
        }
    }
}

impl fmt::Debug for Wizard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wizard")
            .field("current_step_index", &self.current_step_index)
            .field("total_steps", &self.steps.len())
            .field("completed_steps", &self.completed_steps)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldSchema;
    use serde_json::json;

    fn two_steps() -> Vec<WizardStep> {
        vec![
            WizardStep::new(
                "account",
                FormSchema::new().field(
                    "email",
                    FieldSchema::of(crate::schema::FieldType::Email)
                        .required()
                        .format("email"),
                ),
            ),
            WizardStep::new(
                "profile",
                FormSchema::new().field("name", FieldSchema::string().required().min_length(2)),
            ),
        ]
    }

    fn patch(value: serde_json::Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn construction_rejects_empty_and_duplicate_steps() {
        assert!(matches!(
            Wizard::new(vec![], Map::new(), WizardCallbacks::new()),
            Err(WizardError::EmptySteps)
        ));

        let duplicated = vec![
            WizardStep::new("a", FormSchema::new()),
            WizardStep::new("a", FormSchema::new()),
        ];
        assert!(matches!(
            Wizard::new(duplicated, Map::new(), WizardCallbacks::new()),
            Err(WizardError::DuplicateStepId(id)) if id == "a"
        ));

        let unnamed = vec![WizardStep::new("", FormSchema::new())];
        assert!(matches!(
            Wizard::new(unnamed, Map::new(), WizardCallbacks::new()),
            Err(WizardError::MissingStepId(0))
        ));
    }

    #[tokio::test]
    async fn advances_only_on_valid_step_data() {
        let mut wizard = Wizard::new(two_steps(), Map::new(), WizardCallbacks::new()).unwrap();
        assert_eq!(wizard.current_step_id(), "account");

        let advanced = wizard.next_step(patch(json!({"email": "bad"}))).await.unwrap();
        assert!(!advanced);
        assert_eq!(wizard.current_step_id(), "account");
        assert!(!wizard.completed_steps()[0]);

        let advanced = wizard
            .next_step(patch(json!({"email": "a@b.co"})))
            .await
            .unwrap();
        assert!(advanced);
        assert_eq!(wizard.current_step_id(), "profile");
        assert!(wizard.completed_steps()[0]);
    }

    #[tokio::test]
    async fn validate_current_step_raises_on_failure() {
        let mut wizard = Wizard::new(two_steps(), Map::new(), WizardCallbacks::new()).unwrap();
        let error = wizard.validate_current_step().await.unwrap_err();
        match error {
            WizardError::StepValidationFailed { id, report } => {
                assert_eq!(id, "account");
                assert!(report.error("email").is_some());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn data_accumulates_across_steps() {
        let mut wizard = Wizard::new(two_steps(), Map::new(), WizardCallbacks::new()).unwrap();
        wizard
            .next_step(patch(json!({"email": "a@b.co"})))
            .await
            .unwrap();
        wizard.next_step(patch(json!({"name": "Ada"}))).await.unwrap();
        assert_eq!(wizard.data().get("email").unwrap(), &json!("a@b.co"));
        assert_eq!(wizard.data().get("name").unwrap(), &json!("Ada"));
    }

    #[tokio::test]
    async fn navigation_and_progress() {
        let mut wizard = Wizard::new(two_steps(), Map::new(), WizardCallbacks::new()).unwrap();
        assert_eq!(wizard.progress(), 50);
        wizard
            .next_step(patch(json!({"email": "a@b.co"})))
            .await
            .unwrap();
        assert_eq!(wizard.progress(), 100);

        wizard.previous_step();
        assert_eq!(wizard.current_step_id(), "account");

        wizard.go_to_step("profile");
        assert_eq!(wizard.current_step_id(), "profile");

        // unknown id leaves the position unchanged
        wizard.go_to_step("missing");
        assert_eq!(wizard.current_step_id(), "profile");
    }

    #[tokio::test]
    async fn reset_clears_record_and_results() {
        let mut wizard = Wizard::new(two_steps(), Map::new(), WizardCallbacks::new()).unwrap();
        wizard
            .next_step(patch(json!({"email": "a@b.co"})))
            .await
            .unwrap();
        wizard.reset();
        assert_eq!(wizard.current_step_index(), 0);
        assert!(wizard.data().is_empty());
        assert!(wizard.step_results().iter().all(Option::is_none));
        assert!(wizard.completed_steps().iter().all(|&done| !done));
    }
}
