//! Pages of the auth flow and the session state each one needs.

use crate::session::{FlowStep, SessionRecord};
use serde::{Deserialize, Serialize};

/// Number of steps shown by the registration progress indicator.
pub const TOTAL_REGISTRATION_STEPS: u8 = 4;

pub const REGISTRATION_RESTART_MESSAGE: &str =
    "Please start the registration process from the beginning.";
pub const RECOVERY_RESTART_MESSAGE: &str =
    "Please start the password recovery process from the beginning.";
pub const LOGIN_REQUIRED_MESSAGE: &str = "Please log in to continue.";
pub const ABANDON_REGISTRATION_PROMPT: &str =
    "Are you sure you want to go back? Your registration progress will be lost.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    Login,
    Signup,
    Otp,
    CreatePassword,
    ForgotPassword,
    RecoveryOtp,
    ResetPassword,
    ResetSuccess,
    Dashboard,
}

/// Result of checking whether a page may be shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageAccess {
    Allowed,
    Redirect { to: Page, message: &'static str },
}

/// Result of a back-navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackNavigation {
    Proceed,
    /// The user declined; the session is untouched.
    Cancelled,
}

/// Asks the user to confirm a destructive navigation.
#[cfg_attr(test, mockall::automock)]
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl Page {
    /// Page the session is currently on.
    pub fn current(record: &SessionRecord) -> Page {
        match record.step {
            FlowStep::Registered => Page::Otp,
            FlowStep::OtpVerified => Page::CreatePassword,
            FlowStep::RecoveryRequested => Page::RecoveryOtp,
            FlowStep::RecoveryVerified => Page::ResetPassword,
            FlowStep::Start if record.auth.is_some() => Page::Dashboard,
            FlowStep::Start => Page::Login,
        }
    }

    /// Whether `record` holds what this page needs.
    pub fn check_access(self, record: &SessionRecord) -> PageAccess {
        let allowed = match self {
            Page::Otp => record.step == FlowStep::Registered && record.pending_phone().is_some(),
            Page::CreatePassword => {
                record.step == FlowStep::OtpVerified && record.pending_phone().is_some()
            }
            Page::RecoveryOtp => {
                record.step == FlowStep::RecoveryRequested && record.recovery.is_some()
            }
            Page::ResetPassword => {
                record.step == FlowStep::RecoveryVerified
                    && record.recovery.as_ref().is_some_and(|r| r.otp.is_some())
            }
            Page::Dashboard => record.auth.is_some(),
            Page::Login | Page::Signup | Page::ForgotPassword | Page::ResetSuccess => true,
        };

        if allowed {
            PageAccess::Allowed
        } else {
            let (to, message) = self.restart_target();
            PageAccess::Redirect { to, message }
        }
    }

    /// Pages where going back abandons a registration in progress.
    pub fn guards_registration(self) -> bool {
        matches!(self, Page::Otp | Page::CreatePassword)
    }

    /// Step shown by the registration progress indicator, 1-based.
    pub fn registration_step(self, record: &SessionRecord) -> u8 {
        let pending = record.pending_phone().is_some();
        match self {
            Page::Signup => 1,
            Page::Otp if pending => 2,
            Page::CreatePassword if pending => 3,
            Page::ResetSuccess => 4,
            _ => 1,
        }
    }

    /// Progress bar fill for this page, 0-100.
    pub fn progress_percent(self, record: &SessionRecord) -> u8 {
        let step = self.registration_step(record);
        ((step - 1) as u16 * 100 / (TOTAL_REGISTRATION_STEPS - 1) as u16) as u8
    }

    fn restart_target(self) -> (Page, &'static str) {
        match self {
            Page::RecoveryOtp | Page::ResetPassword => {
                (Page::ForgotPassword, RECOVERY_RESTART_MESSAGE)
            }
            Page::Dashboard => (Page::Login, LOGIN_REQUIRED_MESSAGE),
            _ => (Page::Signup, REGISTRATION_RESTART_MESSAGE),
        }
    }
}
