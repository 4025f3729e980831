//! Implementation of the `contact` command.
//!
//! Runs one request through the same [`FormMachine`] the showcase uses,
//! including the configured submit delay, and reports the outcome.

use anyhow::Result;
use std::time::Duration;

use crate::config::Config;
use crate::contact::{
    Field, FormEvent, FormMachine, SimulatedSubmitter, SubmitError, Submitter,
};
use crate::time_source::{self, TimeSource};

/// Field values as given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactArgs {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

impl ContactArgs {
    fn value(&self, field: Field) -> Option<&str> {
        match field {
            Field::Name => self.name.as_deref(),
            Field::Phone => self.phone.as_deref(),
            Field::Email => self.email.as_deref(),
            Field::Message => self.message.as_deref(),
        }
    }
}

/// Fill a form machine from `args`, submit, and wait out the delay.
///
/// Returns the terminal event (`Delivered` or `Failed`).
pub fn submit_request(
    args: &ContactArgs,
    config: &Config,
    clock: std::sync::Arc<dyn TimeSource>,
    submitter: Box<dyn Submitter>,
) -> Result<FormEvent, SubmitError> {
    let mut machine = FormMachine::new(config.contact_settings(), clock.clone(), submitter);
    for field in Field::ALL {
        if let Some(value) = args.value(field) {
            machine.set(field, value);
        }
    }

    let started = machine.submit()?;
    log_decorated!("{}", describe(&started));

    let poll = Duration::from_millis(crate::constants::SIMULATION_STEP_MS);
    loop {
        clock.sleep(poll);
        match machine.tick() {
            Some(event @ (FormEvent::Delivered | FormEvent::Failed { .. })) => return Ok(event),
            Some(other) => log_debug!("{}", describe(&other)),
            None => {}
        }
    }
}

fn describe(event: &FormEvent) -> String {
    match event {
        FormEvent::SubmissionStarted { email } => format!("Sending request from {email}..."),
        FormEvent::Delivered => "¡Mensaje enviado! Te contactaremos pronto.".to_string(),
        FormEvent::Failed { reason } => format!("Error al enviar: {reason}"),
        FormEvent::Reset => "Form ready".to_string(),
    }
}

/// Handle `centinela contact`.
pub fn handle_contact_command(args: ContactArgs, debug_enabled: bool) -> Result<()> {
    log_version!();

    let config = Config::load()?;
    if debug_enabled {
        config.log_config();
    }

    log_block_start!("Contact request");
    match submit_request(&args, &config, time_source::current(), Box::new(SimulatedSubmitter)) {
        Ok(event @ FormEvent::Delivered) => {
            log_info!("{}", describe(&event));
            log_end!();
            Ok(())
        }
        Ok(event) => {
            log_error_exit!("{}", describe(&event));
            anyhow::bail!("contact request was not delivered")
        }
        Err(SubmitError::Invalid(e)) => {
            log_error_exit!("{e}");
            super::help::show_command_usage("contact");
            anyhow::bail!("invalid contact request: {e}")
        }
        Err(e) => Err(e.into()),
    }
}

pub fn display_help() {
    log_version!();
    log_block_start!("contact - Validate and submit a contact request");
    log_block_start!("Usage: centinela contact [OPTIONS]");
    log_block_start!("Options:");
    log_indented!("-n, --name <text>      Your name (required)");
    log_indented!("-p, --phone <text>     Phone number (required)");
    log_indented!("-e, --email <address>  Email address (required, must be well formed)");
    log_indented!("-m, --message <text>   What you need (required)");
    log_block_start!("Description:");
    log_indented!("Runs the request through the landing page's contact form: every");
    log_indented!("field is required and the email must look like an address. The");
    log_indented!("request is not sent anywhere; delivery is simulated after the");
    log_indented!("configured submit delay.");
    log_block_start!("Examples:");
    log_indented!("centinela contact -n \"Lucía Pardo\" -p \"+34 600 000 000\" \\");
    log_indented!("    -e lucia@example.es -m \"Presupuesto para CCTV\"");
    log_end!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::{FormError, MockSubmitter, SubmissionOutcome};
    use crate::time_source::ManualClock;

    fn complete() -> ContactArgs {
        ContactArgs {
            name: Some("Lucía Pardo".to_string()),
            phone: Some("+34 600 000 000".to_string()),
            email: Some("lucia@example.es".to_string()),
            message: Some("Presupuesto para CCTV".to_string()),
        }
    }

    #[test]
    fn test_delivers_after_configured_delay() {
        let clock = ManualClock::new();
        let event = submit_request(
            &complete(),
            &Config::default(),
            clock.clone(),
            Box::new(SimulatedSubmitter),
        )
        .unwrap();

        assert_eq!(event, FormEvent::Delivered);
        assert_eq!(clock.elapsed(), Duration::from_millis(1500));
    }

    #[test]
    fn test_missing_field_is_reported_before_delivery() {
        let clock = ManualClock::new();
        let mut submitter = MockSubmitter::new();
        submitter.expect_deliver().never();

        let args = ContactArgs {
            phone: None,
            ..complete()
        };
        let result = submit_request(&args, &Config::default(), clock.clone(), Box::new(submitter));

        assert_eq!(result, Err(SubmitError::Invalid(FormError::Missing(Field::Phone))));
        assert_eq!(clock.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_failed_delivery_is_returned() {
        let clock = ManualClock::new();
        let mut submitter = MockSubmitter::new();
        submitter
            .expect_deliver()
            .times(1)
            .returning(|_| SubmissionOutcome::Failed {
                reason: "timeout".to_string(),
            });

        let event =
            submit_request(&complete(), &Config::default(), clock, Box::new(submitter)).unwrap();
        assert_eq!(
            event,
            FormEvent::Failed {
                reason: "timeout".to_string()
            }
        );
    }
}
