//! Contact form: field storage, validation and the timed submission cycle.
//!
//! ```text
//!            submit (valid)            delay elapsed
//!   Editing ───────────────► Submitting ─────────────► Submitted ──┐
//!      ▲                          │                                │
//!      │                          └── delay elapsed, failed ─► Failed
//!      └──────────────── success_display elapsed ──────────────────┘
//! ```
//!
//! Nothing is persisted or sent anywhere by default: [`SimulatedSubmitter`]
//! accepts every request. The [`Submitter`] trait is the seam where a real
//! transport would plug in.

use chrono::{DateTime, Local};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::time_source::TimeSource;

/// Address shape accepted by an HTML `type=email` input.
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Phone,
    Email,
    Message,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Name, Field::Phone, Field::Email, Field::Message];

    pub fn label(&self) -> &'static str {
        match self {
            Field::Name => "Nombre",
            Field::Phone => "Teléfono",
            Field::Email => "Email",
            Field::Message => "Mensaje",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("{0} is required")]
    Missing(Field),
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("a submission is already in progress")]
    Busy,
    #[error(transparent)]
    Invalid(#[from] FormError),
}

/// Raw field values as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    name: String,
    phone: String,
    email: String,
    message: String,
}

impl ContactForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        *self.slot_mut(field) = value.into();
    }

    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Phone => &self.phone,
            Field::Email => &self.email,
            Field::Message => &self.message,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_blank(&self) -> bool {
        Field::ALL.iter().all(|field| self.get(*field).trim().is_empty())
    }

    /// Check every field and build the request that would be sent.
    ///
    /// Fields are checked in form order; the first problem is reported.
    pub fn validate(&self, submitted_at: DateTime<Local>) -> Result<ContactRequest, FormError> {
        for field in Field::ALL {
            if self.get(field).trim().is_empty() {
                return Err(FormError::Missing(field));
            }
        }

        let email = self.email.trim();
        if !EMAIL_PATTERN.is_match(email) {
            return Err(FormError::InvalidEmail(email.to_string()));
        }

        Ok(ContactRequest {
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: email.to_string(),
            message: self.message.trim().to_string(),
            submitted_at,
        })
    }

    fn slot_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::Phone => &mut self.phone,
            Field::Email => &mut self.email,
            Field::Message => &mut self.message,
        }
    }
}

/// A validated submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactRequest {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub message: String,
    pub submitted_at: DateTime<Local>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmissionOutcome {
    Delivered,
    Failed { reason: String },
}

/// Delivery backend for validated requests.
#[cfg_attr(test, mockall::automock)]
pub trait Submitter: Send {
    fn deliver(&self, request: &ContactRequest) -> SubmissionOutcome;
}

/// Accepts everything and keeps nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimulatedSubmitter;

impl Submitter for SimulatedSubmitter {
    fn deliver(&self, _request: &ContactRequest) -> SubmissionOutcome {
        SubmissionOutcome::Delivered
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactSettings {
    /// Artificial latency between submit and result.
    pub submit_delay: Duration,
    /// How long the success (or failure) banner stays up.
    pub success_display: Duration,
}

impl Default for ContactSettings {
    fn default() -> Self {
        Self {
            submit_delay: Duration::from_millis(crate::constants::DEFAULT_SUBMIT_DELAY_MS),
            success_display: Duration::from_millis(crate::constants::DEFAULT_SUCCESS_DISPLAY_MS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormState {
    Editing,
    Submitting { until: Instant },
    Submitted { until: Instant },
    Failed { reason: String, until: Instant },
}

impl FormState {
    pub fn is_submitting(&self) -> bool {
        matches!(self, FormState::Submitting { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormState::Editing => "editing",
            FormState::Submitting { .. } => "submitting",
            FormState::Submitted { .. } => "submitted",
            FormState::Failed { .. } => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum FormEvent {
    SubmissionStarted { email: String },
    Delivered,
    Failed { reason: String },
    Reset,
}

/// Drives one [`ContactForm`] through the submission cycle.
pub struct FormMachine {
    form: ContactForm,
    state: FormState,
    settings: ContactSettings,
    clock: Arc<dyn TimeSource>,
    submitter: Box<dyn Submitter>,
    outcome: Option<SubmissionOutcome>,
}

impl FormMachine {
    pub fn new(
        settings: ContactSettings,
        clock: Arc<dyn TimeSource>,
        submitter: Box<dyn Submitter>,
    ) -> Self {
        Self {
            form: ContactForm::new(),
            state: FormState::Editing,
            settings,
            clock,
            submitter,
            outcome: None,
        }
    }

    pub fn form(&self) -> &ContactForm {
        &self.form
    }

    /// Edit a field. Ignored while a submission is in flight.
    pub fn set(&mut self, field: Field, value: impl Into<String>) -> bool {
        if self.state.is_submitting() {
            return false;
        }
        self.form.set(field, value);
        true
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    /// Validate and hand the form to the submitter.
    ///
    /// The outcome stays hidden until the configured delay has elapsed.
    pub fn submit(&mut self) -> Result<FormEvent, SubmitError> {
        if self.state.is_submitting() {
            return Err(SubmitError::Busy);
        }

        let request = self.form.validate(self.clock.now())?;
        self.outcome = Some(self.submitter.deliver(&request));
        self.state = FormState::Submitting {
            until: self.clock.instant() + self.settings.submit_delay,
        };

        Ok(FormEvent::SubmissionStarted {
            email: request.email,
        })
    }

    /// Advance the cycle; returns the transition that happened, if any.
    pub fn tick(&mut self) -> Option<FormEvent> {
        let now = self.clock.instant();

        match &self.state {
            FormState::Submitting { until } if now >= *until => {
                let display_until = *until + self.settings.success_display;
                match self.outcome.take().unwrap_or(SubmissionOutcome::Delivered) {
                    SubmissionOutcome::Delivered => {
                        self.form.clear();
                        self.state = FormState::Submitted {
                            until: display_until,
                        };
                        Some(FormEvent::Delivered)
                    }
                    SubmissionOutcome::Failed { reason } => {
                        self.state = FormState::Failed {
                            reason: reason.clone(),
                            until: display_until,
                        };
                        Some(FormEvent::Failed { reason })
                    }
                }
            }
            FormState::Submitted { until } | FormState::Failed { until, .. } if now >= *until => {
                self.state = FormState::Editing;
                Some(FormEvent::Reset)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time_source::ManualClock;

    fn filled() -> ContactForm {
        ContactForm::new()
            .with(Field::Name, "Lucía Pardo")
            .with(Field::Phone, "+34 600 000 000")
            .with(Field::Email, "lucia@example.es")
            .with(Field::Message, "Necesito un presupuesto")
    }

    fn machine(clock: Arc<ManualClock>, submitter: Box<dyn Submitter>) -> FormMachine {
        let mut machine = FormMachine::new(ContactSettings::default(), clock, submitter);
        for field in Field::ALL {
            machine.set(field, filled().get(field));
        }
        machine
    }

    #[test]
    fn test_all_fields_required() {
        let now = Local::now();
        for field in Field::ALL {
            let mut form = filled();
            form.set(field, "   ");
            assert_eq!(form.validate(now), Err(FormError::Missing(field)));
        }
    }

    #[test]
    fn test_email_shape() {
        let now = Local::now();
        for bad in ["lucia", "lucia@", "@example.es", "lu cia@example.es", "lucia@-bad.es"] {
            let form = filled().with(Field::Email, bad);
            assert!(matches!(form.validate(now), Err(FormError::InvalidEmail(_))), "{bad}");
        }
        for good in ["a@b", "first.last+tag@sub.example.com"] {
            let form = filled().with(Field::Email, good);
            assert!(form.validate(now).is_ok(), "{good}");
        }
    }

    #[test]
    fn test_validate_trims_values() {
        let form = filled().with(Field::Name, "  Lucía  ");
        let request = form.validate(Local::now()).unwrap();
        assert_eq!(request.name, "Lucía");
    }

    #[test]
    fn test_successful_cycle_clears_form() {
        let clock = ManualClock::new();
        let mut machine = machine(clock.clone(), Box::new(SimulatedSubmitter));

        assert_eq!(
            machine.submit(),
            Ok(FormEvent::SubmissionStarted {
                email: "lucia@example.es".to_string()
            })
        );
        assert!(machine.state().is_submitting());

        clock.advance_ms(1499);
        assert_eq!(machine.tick(), None);
        assert!(!machine.form().is_blank());

        clock.advance_ms(1);
        assert_eq!(machine.tick(), Some(FormEvent::Delivered));
        assert!(machine.form().is_blank());
        assert_eq!(machine.state().label(), "submitted");

        clock.advance_ms(3000);
        assert_eq!(machine.tick(), Some(FormEvent::Reset));
        assert_eq!(machine.state(), &FormState::Editing);
    }

    #[test]
    fn test_submit_while_submitting_is_busy() {
        let clock = ManualClock::new();
        let mut machine = machine(clock, Box::new(SimulatedSubmitter));
        machine.submit().unwrap();
        assert_eq!(machine.submit(), Err(SubmitError::Busy));
        assert!(!machine.set(Field::Name, "Otro"));
    }

    #[test]
    fn test_invalid_form_stays_editing() {
        let clock = ManualClock::new();
        let mut machine = FormMachine::new(
            ContactSettings::default(),
            clock,
            Box::new(SimulatedSubmitter),
        );
        assert_eq!(
            machine.submit(),
            Err(SubmitError::Invalid(FormError::Missing(Field::Name)))
        );
        assert_eq!(machine.state(), &FormState::Editing);
    }

    #[test]
    fn test_failed_delivery_keeps_fields() {
        let clock = ManualClock::new();
        let mut submitter = MockSubmitter::new();
        submitter
            .expect_deliver()
            .times(1)
            .returning(|_| SubmissionOutcome::Failed {
                reason: "smtp unavailable".to_string(),
            });

        let mut machine = machine(clock.clone(), Box::new(submitter));
        machine.submit().unwrap();

        clock.advance_ms(1500);
        assert_eq!(
            machine.tick(),
            Some(FormEvent::Failed {
                reason: "smtp unavailable".to_string()
            })
        );
        assert_eq!(machine.form().get(Field::Email), "lucia@example.es");

        clock.advance_ms(3000);
        assert_eq!(machine.tick(), Some(FormEvent::Reset));
    }

    #[test]
    fn test_submitter_sees_validated_request() {
        let clock = ManualClock::new();
        let mut submitter = MockSubmitter::new();
        submitter
            .expect_deliver()
            .withf(|request| request.email == "lucia@example.es" && request.name == "Lucía Pardo")
            .times(1)
            .return_const(SubmissionOutcome::Delivered);

        let mut machine = machine(clock, Box::new(submitter));
        assert!(machine.submit().is_ok());
    }

    #[test]
    fn test_errors_render_field_labels() {
        assert_eq!(FormError::Missing(Field::Phone).to_string(), "Teléfono is required");
        assert_eq!(SubmitError::Busy.to_string(), "a submission is already in progress");
    }
}
