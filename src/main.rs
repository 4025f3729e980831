//! Main application entry point.
//!
//! Parses the command line and dispatches to the showcase or to a one-shot
//! command. Everything else lives in the library so it can be tested:
//!
//! - Interactive showcase: `Showcase::new(debug_enabled).run()`
//! - Headless run: `commands::simulate::handle_simulate_command(..)`
//! - Contact request: `commands::contact::handle_contact_command(..)`

use anyhow::Result;

use centinela::args::{self, CliAction, ParsedArgs};
use centinela::commands;
use centinela::commands::contact::ContactArgs;
use centinela::config;
use centinela::{Showcase, log_block_start, log_end, log_version};

fn main() -> Result<()> {
    let parsed_args = ParsedArgs::from_env();

    match parsed_args.action {
        CliAction::ShowVersion => {
            args::display_version_info();
            Ok(())
        }
        CliAction::ShowHelp => {
            args::display_help();
            Ok(())
        }
        CliAction::ShowHelpDueToError => {
            log_version!();
            log_block_start!("Run 'centinela --help' for usage");
            log_end!();
            std::process::exit(centinela::constants::EXIT_FAILURE);
        }
        CliAction::Help { topic } => commands::help::run_help_command(topic.as_deref()),
        CliAction::Run {
            debug_enabled,
            config_dir,
        } => {
            apply_config_dir(config_dir)?;
            Showcase::new(debug_enabled).run()
        }
        CliAction::Simulate {
            debug_enabled,
            seconds,
            multiplier,
            log_file,
            json,
            config_dir,
        } => {
            apply_config_dir(config_dir)?;
            commands::simulate::handle_simulate_command(
                seconds,
                multiplier,
                log_file,
                json,
                debug_enabled,
            )
        }
        CliAction::Contact {
            debug_enabled,
            name,
            phone,
            email,
            message,
            config_dir,
        } => {
            apply_config_dir(config_dir)?;
            commands::contact::handle_contact_command(
                ContactArgs {
                    name,
                    phone,
                    email,
                    message,
                },
                debug_enabled,
            )
        }
    }
}

fn apply_config_dir(config_dir: Option<String>) -> Result<()> {
    if let Some(dir) = config_dir {
        config::set_config_dir(Some(dir))?;
    }
    Ok(())
}
