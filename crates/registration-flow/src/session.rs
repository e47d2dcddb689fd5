//! Persisted session record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use velaa_client::{RegistrationState, UserProfile};

/// Position within the registration or recovery flow.
///
/// Reaching a terminal step wipes the flow data, so the persisted step is
/// always one of the non-terminal ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlowStep {
    #[default]
    Start,
    /// Registration submitted, phone pending OTP.
    Registered,
    OtpVerified,
    RecoveryRequested,
    RecoveryVerified,
}

impl FlowStep {
    pub fn is_registration(self) -> bool {
        matches!(self, FlowStep::Registered | FlowStep::OtpVerified)
    }

    pub fn is_recovery(self) -> bool {
        matches!(self, FlowStep::RecoveryRequested | FlowStep::RecoveryVerified)
    }
}

/// Terminal outcome of a completed flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
    PasswordSet,
    PasswordReset,
}

/// Password recovery progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryState {
    pub phone: String,
    #[serde(default)]
    pub otp: Option<String>,
    #[serde(default)]
    pub reset_token: Option<String>,
}

/// Signed-in account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user: UserProfile,
    pub signed_in_at: DateTime<Utc>,
}

impl AuthSession {
    pub fn new(token: String, user: UserProfile) -> Self {
        Self {
            token,
            user,
            signed_in_at: Utc::now(),
        }
    }
}

/// Everything kept between page loads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(default)]
    pub step: FlowStep,
    #[serde(default)]
    pub registration: Option<RegistrationState>,
    #[serde(default)]
    pub recovery: Option<RecoveryState>,
    #[serde(default)]
    pub auth: Option<AuthSession>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl SessionRecord {
    /// Phone number of the registration awaiting completion, if any.
    pub fn pending_phone(&self) -> Option<&str> {
        self.registration
            .as_ref()
            .map(|r| r.phone.as_str())
            .filter(|phone| !phone.is_empty())
    }

    pub fn recovery_phone(&self) -> Option<&str> {
        self.recovery.as_ref().map(|r| r.phone.as_str())
    }

    /// Drop registration and recovery progress, keeping the sign-in.
    pub fn clear_flow(&mut self) {
        self.step = FlowStep::Start;
        self.registration = None;
        self.recovery = None;
    }

    pub fn is_empty(&self) -> bool {
        self.step == FlowStep::Start
            && self.registration.is_none()
            && self.recovery.is_none()
            && self.auth.is_none()
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}
