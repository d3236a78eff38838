//! Terminal output utilities

use console::style;
use devstack_engine::InstallWarning;
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt;
use std::time::Duration;

pub fn success(msg: &str) {
    println!("{} {}", style("✓").green().bold(), msg);
}

pub fn error(msg: &str) {
    eprintln!("{} {}", style("✗").red().bold(), msg);
}

pub fn warning(msg: &str) {
    eprintln!("{} {}", style("⚠").yellow().bold(), msg);
}

pub fn info(msg: &str) {
    println!("{} {}", style("ℹ").blue().bold(), msg);
}

/// Section title above a table
pub fn header(msg: &str) {
    println!("\n{}", style(msg).bold().underlined());
}

/// Indented detail line under a status message
pub fn detail(key: &str, value: impl fmt::Display) {
    println!("  {}: {}", style(key).dim(), value);
}

/// Print the non-fatal conditions collected during an install
///
/// Installer exit codes are highlighted since the install still counts as
/// done even though the tool may be incomplete.
pub fn install_warnings(warnings: &[InstallWarning]) {
    for warning in warnings {
        match warning {
            InstallWarning::InstallerExit { .. } => {
                self::warning(&format!("{} (check the installed files)", warning))
            }
            other => self::warning(&other.to_string()),
        }
    }
}

/// Spinner shown while the engine talks to the network
///
/// Returns `None` when output is suppressed so callers can pass the result
/// straight to [`finish`].
pub fn spinner(show: bool, msg: &str) -> Option<ProgressBar> {
    if !show {
        return None;
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(spinner_style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

pub fn finish(spinner: Option<ProgressBar>) {
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
}
