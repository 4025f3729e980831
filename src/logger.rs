//! Structured logging with box-drawing output.
//!
//! Every line centinela prints goes through the macros defined here so the
//! showcase, the simulator and the one-shot commands share one visual style:
//!
//! ```text
//! ┏ centinela v0.1.0 ━━╸
//! ┃
//! ┣ Loaded default configuration
//! ┃   Services: 4 slides, every 6000ms
//! ┣[INFO] Received interrupt signal, shutting down...
//! ╹
//! ```
//!
//! ## Conventions
//!
//! - `log_block_start!` opens a new conceptual block (adds a spacer pipe first).
//! - `log_decorated!` continues the current block.
//! - `log_indented!` lists details that belong to the previous line.
//! - `log_pipe!` inserts an empty spacer, typically before a semantic message.
//! - `log_info!`, `log_warning!`, `log_error!`, `log_debug!`, `log_critical!`
//!   carry a coloured `[LEVEL]` tag.
//! - `log_error_exit!` closes the log with an error corner.
//! - `log_version!` / `log_end!` open and close the whole session.
//!
//! Output can be silenced at runtime ([`Log::set_enabled`]) and redirected to a
//! file through a writer thread ([`Log::start_file_logging`]).

use once_cell::sync::Lazy;
use regex::Regex;
use std::io::Write;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Sender, channel};

static LOGGING_ENABLED: AtomicBool = AtomicBool::new(true);

// Set once when --log is active; never cleared because the process exits after.
static LOG_CHANNEL: OnceLock<Sender<LogMessage>> = OnceLock::new();

enum LogMessage {
    Formatted(String),
    Shutdown,
}

/// Line shape used by the logging macros.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Version,
    Block,
    Decorated,
    Indented,
    Pipe,
    End,
    Info,
    Debug,
    Warning,
    Error,
    ErrorExit,
    Critical,
}

/// Logging front-end used by the macros.
pub struct Log;

impl Log {
    /// Enable or disable all output.
    pub fn set_enabled(enabled: bool) {
        LOGGING_ENABLED.store(enabled, Ordering::SeqCst);
    }

    pub fn is_enabled() -> bool {
        LOGGING_ENABLED.load(Ordering::SeqCst)
    }

    /// Whether output is currently being routed to a log file.
    pub fn is_file_logging() -> bool {
        LOG_CHANNEL.get().is_some()
    }

    /// Route all further output to `file_path` through a writer thread.
    ///
    /// The returned guard flushes and joins the writer when dropped.
    pub fn start_file_logging(file_path: String) -> anyhow::Result<LoggerGuard> {
        let (tx, rx) = channel();

        LOG_CHANNEL
            .set(tx.clone())
            .map_err(|_| anyhow::anyhow!("Logger channel already initialized"))?;

        let handle = std::thread::spawn(move || {
            let mut file = std::fs::File::create(&file_path)?;

            loop {
                match rx.recv() {
                    Ok(LogMessage::Formatted(text)) => file.write_all(text.as_bytes())?,
                    Ok(LogMessage::Shutdown) | Err(_) => {
                        file.flush()?;
                        break;
                    }
                }
            }

            Ok::<(), anyhow::Error>(())
        });

        Ok(LoggerGuard {
            tx,
            handle: Some(handle),
        })
    }

    /// Timestamp prefix shown while a simulated clock is installed.
    pub fn timestamp_prefix() -> String {
        if crate::time_source::is_initialized() && crate::time_source::is_simulated() {
            format!("[{}] ", crate::time_source::now().format("%H:%M:%S%.3f"))
        } else {
            String::new()
        }
    }

    /// Format `message` with the given marker and write it out.
    pub fn emit(marker: Marker, message: &str) {
        if !Self::is_enabled() {
            return;
        }
        write_output(&render_line(&Self::timestamp_prefix(), marker, message));
    }
}

/// Build the full text (including trailing newline) for one log call.
pub(crate) fn render_line(prefix: &str, marker: Marker, message: &str) -> String {
    match marker {
        Marker::Version => format!(
            "{prefix}┏ centinela v{} ━━╸\n",
            env!("CARGO_PKG_VERSION")
        ),
        Marker::Block => format!("{prefix}┃\n{prefix}┣ {message}\n"),
        Marker::Decorated => format!("{prefix}┣ {message}\n"),
        Marker::Indented => format!("{prefix}┃   {message}\n"),
        Marker::Pipe => format!("{prefix}┃\n"),
        Marker::End => format!("{prefix}╹\n"),
        Marker::Info => format!("{prefix}┣[\x1b[32mINFO\x1b[0m] {message}\n"),
        Marker::Debug => format!("{prefix}┣[\x1b[32mDEBUG\x1b[0m] {message}\n"),
        Marker::Warning => format!("{prefix}┣[\x1b[33mWARNING\x1b[0m] {message}\n"),
        Marker::Error => format!("{prefix}┣[\x1b[31mERROR\x1b[0m] {message}\n"),
        Marker::ErrorExit => format!("{prefix}┃\n{prefix}┗[\x1b[31mERROR\x1b[0m] {message}\n"),
        Marker::Critical => format!("{prefix}┣[\x1b[31mCRITICAL\x1b[0m] {message}\n"),
    }
}

/// Flushes and joins the file writer thread on drop.
pub struct LoggerGuard {
    tx: Sender<LogMessage>,
    handle: Option<std::thread::JoinHandle<anyhow::Result<()>>>,
}

impl Drop for LoggerGuard {
    fn drop(&mut self) {
        let _ = self.tx.send(LogMessage::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

static ANSI_ESCAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\x1b\[[0-9;]*m").expect("ANSI escape pattern is valid"));

fn strip_ansi_codes(text: &str) -> String {
    ANSI_ESCAPE.replace_all(text, "").into_owned()
}

/// Write already formatted text to the log file or stdout.
pub fn write_output(text: &str) {
    if let Some(tx) = LOG_CHANNEL.get() {
        let _ = tx.send(LogMessage::Formatted(strip_ansi_codes(text)));
    } else {
        print!("{text}");
        let _ = std::io::stdout().flush();
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! __log_with_marker {
    ($marker:ident, $fmt:literal $($arg:tt)*) => {{
        use $crate::logger::{Log, Marker};
        if Log::is_enabled() {
            Log::emit(Marker::$marker, &format!($fmt $($arg)*));
        }
    }};
    ($marker:ident, $expr:expr) => {{
        use $crate::logger::{Log, Marker};
        if Log::is_enabled() {
            Log::emit(Marker::$marker, &$expr.to_string());
        }
    }};
}

/// Continue the current block: `┣ message`.
#[macro_export]
macro_rules! log_decorated {
    ($($arg:tt)+) => { $crate::__log_with_marker!(Decorated, $($arg)+) };
}

/// Detail line under the previous message: `┃   message`.
#[macro_export]
macro_rules! log_indented {
    ($($arg:tt)+) => { $crate::__log_with_marker!(Indented, $($arg)+) };
}

/// Open a new block: spacer pipe followed by `┣ message`.
#[macro_export]
macro_rules! log_block_start {
    ($($arg:tt)+) => { $crate::__log_with_marker!(Block, $($arg)+) };
}

/// Empty spacer line.
#[macro_export]
macro_rules! log_pipe {
    () => {
        $crate::__log_with_marker!(Pipe, "")
    };
}

/// Session header with the crate version.
#[macro_export]
macro_rules! log_version {
    () => {
        $crate::__log_with_marker!(Version, "")
    };
}

/// Session terminator.
#[macro_export]
macro_rules! log_end {
    () => {
        $crate::__log_with_marker!(End, "")
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)+) => { $crate::__log_with_marker!(Info, $($arg)+) };
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)+) => { $crate::__log_with_marker!(Debug, $($arg)+) };
}

#[macro_export]
macro_rules! log_warning {
    ($($arg:tt)+) => { $crate::__log_with_marker!(Warning, $($arg)+) };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)+) => { $crate::__log_with_marker!(Error, $($arg)+) };
}

/// Error that terminates the session: spacer pipe then `┗[ERROR] message`.
#[macro_export]
macro_rules! log_error_exit {
    ($($arg:tt)+) => { $crate::__log_with_marker!(ErrorExit, $($arg)+) };
}

#[macro_export]
macro_rules! log_critical {
    ($($arg:tt)+) => { $crate::__log_with_marker!(Critical, $($arg)+) };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_ansi_codes_removes_colour() {
        let coloured = "┣[\x1b[33mWARNING\x1b[0m] careful";
        assert_eq!(strip_ansi_codes(coloured), "┣[WARNING] careful");
    }

    #[test]
    fn test_strip_ansi_codes_keeps_plain_escape() {
        assert_eq!(strip_ansi_codes("a\x1bb"), "a\x1bb");
    }

    #[test]
    fn test_block_start_renders_spacer() {
        let line = render_line("", Marker::Block, "Loaded configuration");
        assert_eq!(line, "┃\n┣ Loaded configuration\n");
    }

    #[test]
    fn test_prefix_applies_to_every_row() {
        let line = render_line("[00:00:01.000] ", Marker::ErrorExit, "boom");
        assert_eq!(
            line,
            "[00:00:01.000] ┃\n[00:00:01.000] ┗[\x1b[31mERROR\x1b[0m] boom\n"
        );
    }

    #[test]
    fn test_version_header_contains_crate_version() {
        let line = render_line("", Marker::Version, "");
        assert!(line.contains(env!("CARGO_PKG_VERSION")));
        assert!(line.starts_with("┏ centinela v"));
    }
}
