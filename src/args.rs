//! Command-line argument parsing.
//!
//! Global flags (`--debug`, `--config <dir>`, `--help`, `--version`) may appear
//! anywhere. The first bare word selects a subcommand; everything after it is
//! parsed as that subcommand's options. Unknown options never abort parsing
//! outright: they are reported and turned into [`CliAction::ShowHelpDueToError`].

use crate::constants::{DEFAULT_SIMULATION_MULTIPLIER, DEFAULT_SIMULATION_SECONDS};

/// What `main` should do.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Interactive terminal showcase.
    Run {
        debug_enabled: bool,
        config_dir: Option<String>,
    },
    /// Headless run against an accelerated clock.
    Simulate {
        debug_enabled: bool,
        seconds: u64,
        /// 0 = fast-forward.
        multiplier: f64,
        log_file: Option<String>,
        json: bool,
        config_dir: Option<String>,
    },
    /// Validate and submit one contact request.
    Contact {
        debug_enabled: bool,
        name: Option<String>,
        phone: Option<String>,
        email: Option<String>,
        message: Option<String>,
        config_dir: Option<String>,
    },
    /// `help [command]`
    Help { topic: Option<String> },

    ShowHelp,
    ShowVersion,
    ShowHelpDueToError,
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Simulate,
    Contact,
    Help,
}

impl Command {
    fn from_word(word: &str) -> Option<Self> {
        match word {
            "simulate" | "sim" => Some(Command::Simulate),
            "contact" | "c" => Some(Command::Contact),
            "help" => Some(Command::Help),
            _ => None,
        }
    }
}

/// Options collected for whichever subcommand was chosen.
#[derive(Default)]
struct Collected {
    seconds: Option<u64>,
    multiplier: Option<f64>,
    log_file: Option<String>,
    json: bool,
    name: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    message: Option<String>,
    topic: Option<String>,
}

impl ParsedArgs {
    /// Parse `args` (program name first, as from `std::env::args()`).
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ParsedArgs {
            action: parse_action(
                args.into_iter()
                    .skip(1)
                    .map(|s| s.as_ref().to_string())
                    .collect(),
            ),
        }
    }

    pub fn from_env() -> ParsedArgs {
        Self::parse(std::env::args())
    }
}

fn parse_action(args: Vec<String>) -> CliAction {
    let mut debug_enabled = false;
    let mut display_help = false;
    let mut display_version = false;
    let mut config_dir: Option<String> = None;
    let mut command: Option<Command> = None;
    let mut collected = Collected::default();
    let mut unknown_arg_found = false;

    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        let value = args.get(i + 1).filter(|next| !next.starts_with("--"));

        match arg {
            "--debug" | "-d" => debug_enabled = true,
            "--help" | "-h" => display_help = true,
            "--version" | "-V" | "-v" => display_version = true,
            "--config" => match value {
                Some(dir) => {
                    config_dir = Some(dir.clone());
                    i += 1;
                }
                None => {
                    log_warning!("--config requires a directory");
                    unknown_arg_found = true;
                }
            },
            _ if !arg.starts_with('-') && command.is_none() => match Command::from_word(arg) {
                Some(cmd) => command = Some(cmd),
                None => {
                    log_warning!("Unknown command: {arg}");
                    unknown_arg_found = true;
                }
            },
            _ => match command {
                Some(cmd) => match parse_command_option(cmd, arg, value, &mut collected) {
                    Ok(consumed) => i += consumed,
                    Err(message) => {
                        log_warning!("{message}");
                        unknown_arg_found = true;
                    }
                },
                None => {
                    log_warning!("Unknown option: {arg}");
                    unknown_arg_found = true;
                }
            },
        }
        i += 1;
    }

    if display_version {
        return CliAction::ShowVersion;
    }
    if unknown_arg_found {
        return CliAction::ShowHelpDueToError;
    }
    if display_help {
        // `centinela simulate --help` shows the subcommand's page.
        return match command {
            Some(Command::Simulate) => CliAction::Help {
                topic: Some("simulate".to_string()),
            },
            Some(Command::Contact) => CliAction::Help {
                topic: Some("contact".to_string()),
            },
            _ => CliAction::ShowHelp,
        };
    }

    match command {
        None => CliAction::Run {
            debug_enabled,
            config_dir,
        },
        Some(Command::Simulate) => CliAction::Simulate {
            debug_enabled,
            seconds: collected.seconds.unwrap_or(DEFAULT_SIMULATION_SECONDS),
            multiplier: collected
                .multiplier
                .unwrap_or(DEFAULT_SIMULATION_MULTIPLIER),
            log_file: collected.log_file,
            json: collected.json,
            config_dir,
        },
        Some(Command::Contact) => CliAction::Contact {
            debug_enabled,
            name: collected.name,
            phone: collected.phone,
            email: collected.email,
            message: collected.message,
            config_dir,
        },
        Some(Command::Help) => CliAction::Help {
            topic: collected.topic,
        },
    }
}

/// Handle one argument that follows a subcommand.
///
/// Returns how many extra arguments were consumed as the option's value.
fn parse_command_option(
    command: Command,
    arg: &str,
    value: Option<&String>,
    collected: &mut Collected,
) -> Result<usize, String> {
    let require = |flag: &str| -> Result<String, String> {
        value
            .cloned()
            .ok_or_else(|| format!("{flag} requires a value"))
    };

    match (command, arg) {
        (Command::Simulate, "--seconds" | "-s") => {
            let raw = require(arg)?;
            match raw.parse::<u64>() {
                Ok(seconds) if (1..=86_400).contains(&seconds) => {
                    collected.seconds = Some(seconds);
                    Ok(1)
                }
                _ => Err(format!(
                    "Invalid duration: '{raw}'. Must be between 1 and 86400 seconds."
                )),
            }
        }
        (Command::Simulate, "--multiplier" | "-m") => {
            let raw = require(arg)?;
            match raw.parse::<f64>() {
                Ok(mult) if mult == 0.0 || (0.1..=3600.0).contains(&mult) => {
                    collected.multiplier = Some(mult);
                    Ok(1)
                }
                _ => Err(format!(
                    "Invalid multiplier: '{raw}'. Must be 0 (fast-forward) or between 0.1 and 3600."
                )),
            }
        }
        (Command::Simulate, "--fast-forward" | "-f") => {
            collected.multiplier = Some(0.0);
            Ok(0)
        }
        (Command::Simulate, "--log" | "-l") => {
            collected.log_file = Some(require(arg)?);
            Ok(1)
        }
        (Command::Simulate, "--json") => {
            collected.json = true;
            Ok(0)
        }
        (Command::Contact, "--name" | "-n") => {
            collected.name = Some(require(arg)?);
            Ok(1)
        }
        (Command::Contact, "--phone" | "-p") => {
            collected.phone = Some(require(arg)?);
            Ok(1)
        }
        (Command::Contact, "--email" | "-e") => {
            collected.email = Some(require(arg)?);
            Ok(1)
        }
        (Command::Contact, "--message" | "-m") => {
            collected.message = Some(require(arg)?);
            Ok(1)
        }
        (Command::Help, topic) if !topic.starts_with('-') && collected.topic.is_none() => {
            collected.topic = Some(topic.to_string());
            Ok(0)
        }
        _ => Err(format!("Unknown option: {arg}")),
    }
}

/// Displays version information using custom logging style.
pub fn display_version_info() {
    log_version!();
    log_pipe!();
    crate::logger::write_output(&format!("┗ {}\n", env!("CARGO_PKG_DESCRIPTION")));
}

/// Displays custom help message using logger methods.
pub fn display_help() {
    log_version!();
    log_block_start!(env!("CARGO_PKG_DESCRIPTION"));
    log_block_start!("Usage:");
    log_indented!("centinela [OPTIONS] [COMMAND]");
    log_block_start!("Options:");
    log_indented!("--config <dir>         Use custom configuration directory");
    log_indented!("-d, --debug            Enable detailed debug output");
    log_indented!("-h, --help             Print help information");
    log_indented!("-V, --version          Print version information");
    log_block_start!("Commands:");
    log_indented!("(none)                 Run the interactive terminal showcase");
    log_indented!("simulate, sim          Run the carousels headless on a simulated clock");
    log_indented!("contact, c             Validate and submit a contact request");
    log_indented!("help [command]         Show detailed help for a command");
    log_end!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliAction {
        let mut full = vec!["centinela"];
        full.extend_from_slice(args);
        ParsedArgs::parse(full).action
    }

    #[test]
    fn test_parse_no_args() {
        assert_eq!(
            parse(&[]),
            CliAction::Run {
                debug_enabled: false,
                config_dir: None,
            }
        );
    }

    #[test]
    fn test_parse_debug_and_config() {
        assert_eq!(
            parse(&["-d", "--config", "/tmp/cfg"]),
            CliAction::Run {
                debug_enabled: true,
                config_dir: Some("/tmp/cfg".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_help_flag() {
        assert_eq!(parse(&["--help"]), CliAction::ShowHelp);
        assert_eq!(parse(&["-h"]), CliAction::ShowHelp);
    }

    #[test]
    fn test_parse_version_wins_over_everything() {
        assert_eq!(parse(&["--version"]), CliAction::ShowVersion);
        assert_eq!(parse(&["simulate", "--bogus", "-V"]), CliAction::ShowVersion);
    }

    #[test]
    fn test_parse_unknown_option() {
        assert_eq!(parse(&["--frobnicate"]), CliAction::ShowHelpDueToError);
        assert_eq!(parse(&["dance"]), CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_parse_config_without_value() {
        assert_eq!(parse(&["--config"]), CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_parse_simulate_defaults() {
        assert_eq!(
            parse(&["simulate"]),
            CliAction::Simulate {
                debug_enabled: false,
                seconds: DEFAULT_SIMULATION_SECONDS,
                multiplier: DEFAULT_SIMULATION_MULTIPLIER,
                log_file: None,
                json: false,
                config_dir: None,
            }
        );
    }

    #[test]
    fn test_parse_simulate_options() {
        assert_eq!(
            parse(&[
                "--debug",
                "sim",
                "--seconds",
                "30",
                "-m",
                "10",
                "--log",
                "run.log",
                "--json",
                "--config",
                "/etc/centinela",
            ]),
            CliAction::Simulate {
                debug_enabled: true,
                seconds: 30,
                multiplier: 10.0,
                log_file: Some("run.log".to_string()),
                json: true,
                config_dir: Some("/etc/centinela".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_simulate_fast_forward_overrides() {
        let action = parse(&["simulate", "-m", "5", "--fast-forward"]);
        assert!(matches!(action, CliAction::Simulate { multiplier, .. } if multiplier == 0.0));
    }

    #[test]
    fn test_parse_simulate_rejects_bad_values() {
        assert_eq!(parse(&["simulate", "--seconds", "0"]), CliAction::ShowHelpDueToError);
        assert_eq!(parse(&["simulate", "--seconds", "abc"]), CliAction::ShowHelpDueToError);
        assert_eq!(parse(&["simulate", "-m", "0.01"]), CliAction::ShowHelpDueToError);
        assert_eq!(parse(&["simulate", "-m", "5000"]), CliAction::ShowHelpDueToError);
        assert_eq!(parse(&["simulate", "--log"]), CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_parse_contact() {
        assert_eq!(
            parse(&[
                "contact",
                "--name",
                "Lucía",
                "--phone",
                "600000000",
                "--email",
                "lucia@example.es",
                "--message",
                "Hola",
            ]),
            CliAction::Contact {
                debug_enabled: false,
                name: Some("Lucía".to_string()),
                phone: Some("600000000".to_string()),
                email: Some("lucia@example.es".to_string()),
                message: Some("Hola".to_string()),
                config_dir: None,
            }
        );
    }

    #[test]
    fn test_parse_contact_partial_is_left_to_validation() {
        assert!(matches!(
            parse(&["contact", "--name", "Lucía"]),
            CliAction::Contact { email: None, .. }
        ));
    }

    #[test]
    fn test_contact_rejects_simulate_options() {
        assert_eq!(parse(&["contact", "--json"]), CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_parse_help_command() {
        assert_eq!(parse(&["help"]), CliAction::Help { topic: None });
        assert_eq!(
            parse(&["help", "simulate"]),
            CliAction::Help {
                topic: Some("simulate".to_string())
            }
        );
        assert_eq!(
            parse(&["simulate", "--help"]),
            CliAction::Help {
                topic: Some("simulate".to_string())
            }
        );
    }
}
