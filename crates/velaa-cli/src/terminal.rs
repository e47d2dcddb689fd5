//! Terminal rendering of presentation events and prompts.

use crate::error::{AppError, AppResult};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use registration_flow::Confirm;
use secrecy::SecretString;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;
use velaa_client::{LoadingTracker, NotificationKind, PresentationSink};

/// Renders notifications as colored lines and loaders as spinners.
///
/// Spinners are only drawn when stderr is a terminal and `NO_COLOR` is
/// unset; notifications are always printed.
pub struct TerminalSink {
    loaders: LoadingTracker,
    spinners: Mutex<HashMap<String, ProgressBar>>,
    animate: bool,
}

impl TerminalSink {
    pub fn new() -> Self {
        let animate = Term::stderr().is_term() && std::env::var_os("NO_COLOR").is_none();
        Self {
            loaders: LoadingTracker::new(),
            spinners: Mutex::new(HashMap::new()),
            animate,
        }
    }

    fn spinner(label: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_strings(&[
                "⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✓",
            ])
            .template("{spinner} {msg}")
        {
            pb.set_style(style);
        }
        pb.set_message(label.to_string());
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    }

    fn spinners(&self) -> std::sync::MutexGuard<'_, HashMap<String, ProgressBar>> {
        self.spinners.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for TerminalSink {
    fn default() -> Self {
        Self::new()
    }
}

impl PresentationSink for TerminalSink {
    fn notify(&self, kind: NotificationKind, message: &str) {
        let line = format!("{} {}", kind.icon(), message);
        let styled = match kind {
            NotificationKind::Success => style(line).green(),
            NotificationKind::Error => style(line).red().bold(),
            NotificationKind::Warning => style(line).yellow(),
            NotificationKind::Info => style(line).cyan(),
        };

        // Keep the line from being overdrawn by a running spinner.
        let spinners = self.spinners();
        match spinners.values().next() {
            Some(pb) => pb.suspend(|| eprintln!("{}", styled)),
            None => eprintln!("{}", styled),
        }
    }

    fn set_loading(&self, id: &str, active: bool) {
        if self.loaders.set(id, active) {
            debug!(busy = self.loaders.is_busy(), "Interaction state changed");
        }
        if !self.animate {
            return;
        }

        let mut spinners = self.spinners();
        if active {
            spinners
                .entry(id.to_string())
                .or_insert_with(|| Self::spinner(&loader_label(id)));
        } else if let Some(pb) = spinners.remove(id) {
            pb.finish_and_clear();
        }
    }
}

impl Drop for TerminalSink {
    fn drop(&mut self) {
        self.loaders.hide_all();
        for (_, pb) in self.spinners().drain() {
            pb.finish_and_clear();
        }
    }
}

/// Text shown next to the spinner of loader `id`.
fn loader_label(id: &str) -> String {
    match id {
        "register" => "Creating your account...".into(),
        "verify-otp" | "verify-recovery-otp" => "Verifying code...".into(),
        "resend-otp" => "Sending a new code...".into(),
        "complete-registration" => "Setting your password...".into(),
        "login" => "Signing in...".into(),
        "forgot-password" => "Sending recovery code...".into(),
        "reset-password" => "Resetting your password...".into(),
        other => format!("{}...", other),
    }
}

/// y/N confirmation on the terminal. Anything but `y`/`yes` declines.
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        let term = Term::stderr();
        if term
            .write_str(&format!("{} [y/N] ", style(prompt).yellow()))
            .is_err()
        {
            return false;
        }
        term.read_line()
            .map(|answer| is_yes(&answer))
            .unwrap_or(false)
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Use `given`, or read a hidden value from the terminal.
pub fn secret_or_prompt(given: Option<String>, prompt: &str) -> AppResult<SecretString> {
    if let Some(value) = given {
        return Ok(SecretString::new(value));
    }

    let term = Term::stderr();
    term.write_str(&format!("{}: ", prompt))?;
    let value = term.read_secure_line()?;
    Ok(SecretString::new(value))
}

pub fn print_error(err: &AppError) {
    eprintln!(
        "{}",
        style(format!(
            "{} {}",
            NotificationKind::Error.icon(),
            err.user_message()
        ))
        .red()
        .bold()
    );
    if err.is_retryable() {
        eprintln!("{}", style("This may be temporary. Please try again.").dim());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes(""));
        assert!(!is_yes("n"));
        assert!(!is_yes("yep"));
    }

    #[test]
    fn test_loader_labels() {
        assert_eq!(loader_label("login"), "Signing in...");
        assert_eq!(loader_label("custom"), "custom...");
    }

    #[test]
    fn test_secret_from_argument() {
        use secrecy::ExposeSecret;

        let secret = secret_or_prompt(Some("secret1".into()), "Password").unwrap();
        assert_eq!(secret.expose_secret(), "secret1");
    }

    #[test]
    fn test_sink_tracks_loaders_without_terminal() {
        let sink = TerminalSink {
            loaders: LoadingTracker::new(),
            spinners: Mutex::new(HashMap::new()),
            animate: false,
        };

        sink.set_loading("login", true);
        assert!(sink.loaders.is_active("login"));
        sink.set_loading("login", false);
        assert!(!sink.loaders.is_busy());
        assert!(sink.spinners().is_empty());
    }
}
