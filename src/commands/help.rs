//! Help command implementation for centinela.
//!
//! Dispatches `centinela help [command]` to the command's own help page.

use anyhow::Result;

/// Show brief usage for a command (used for error messages)
pub fn show_command_usage(command: &str) {
    match command {
        "simulate" | "sim" => log_block_start!("Usage: centinela simulate [OPTIONS]"),
        "contact" | "c" => log_block_start!("Usage: centinela contact [OPTIONS]"),
        _ => log_block_start!("Usage: centinela [OPTIONS] [COMMAND]"),
    }
}

/// Run the help command (dispatcher)
///
/// # Arguments
/// * `command` - Optional command name to get help for (None = general help)
pub fn run_help_command(command: Option<&str>) -> Result<()> {
    match command {
        None => display_general_help(),
        Some("simulate") | Some("sim") => super::simulate::display_help(),
        Some("contact") | Some("c") => super::contact::display_help(),
        Some("help") | Some("h") => display_help_help(),
        Some("keys") => display_keys_help(),
        Some(unknown) => {
            log_version!();
            log_warning!("Unknown command: {}", unknown);
            log_pipe!();
            display_command_list();
            log_end!();
        }
    }
    Ok(())
}

fn display_command_list() {
    log_block_start!("Available Commands:");
    log_indented!("simulate, sim           Run both carousels headless on a simulated clock");
    log_indented!("contact, c              Validate and submit a contact request");
    log_indented!("help [COMMAND]          Show detailed help for a command");
    log_indented!("help keys               Keyboard controls of the showcase");
}

/// Display general help focused on commands (for the help command)
fn display_general_help() {
    log_version!();
    display_command_list();
    log_pipe!();
    log_info!("Use 'centinela help <command>' to see detailed help for a specific command.");
    log_indented!("Use 'centinela --help' to see all options and general usage.");
    log_end!();
}

/// Display help for the help command itself
fn display_help_help() {
    log_version!();
    log_block_start!("help - Display help information");
    log_block_start!("Usage: centinela help [COMMAND]");
    log_block_start!("Arguments:");
    log_indented!("COMMAND  Optional command to get help for");
    log_indented!("         If omitted, shows general help");
    log_block_start!("Examples:");
    log_indented!("# Show general help");
    log_indented!("centinela help");
    log_pipe!();
    log_indented!("# Show help for specific commands");
    log_indented!("centinela help simulate");
    log_indented!("centinela help contact");
    log_end!();
}

fn display_keys_help() {
    log_version!();
    log_block_start!("Showcase keyboard controls");
    log_indented!("←, h        Previous slide of the focused carousel");
    log_indented!("→, l        Next slide of the focused carousel");
    log_indented!("1-9         Jump to a slide");
    log_indented!("Tab         Switch focus between services and testimonials");
    log_indented!("p, Space    Pause or resume autoplay");
    log_indented!("c           Send a demo contact request");
    log_indented!("q, Esc      Quit");
    log_block_start!("Behavior:");
    log_indented!("- Navigation is ignored while a transition is in progress");
    log_indented!("- Indices wrap around in both directions");
    log_end!();
}
