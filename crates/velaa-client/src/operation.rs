//! Domain operations that fall back to the simulated backend.

use crate::error::ApiError;
use crate::transport::ApiRequest;
use crate::types::{
    CredentialsRequest, OtpRequest, PhoneRequest, RegisterRequest, ResetPasswordRequest,
};
use serde::Serialize;

/// One call against the auth API, with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Register(RegisterRequest),
    VerifyOtp(OtpRequest),
    CompleteRegistration(CredentialsRequest),
    Login(CredentialsRequest),
    ForgotPassword(PhoneRequest),
    VerifyRecoveryOtp(OtpRequest),
    ResetPassword(ResetPasswordRequest),
}

impl Operation {
    pub fn endpoint(&self) -> &'static str {
        match self {
            Operation::Register(_) => "/auth/register",
            Operation::VerifyOtp(_) => "/auth/verify-otp",
            Operation::CompleteRegistration(_) => "/auth/complete-registration",
            Operation::Login(_) => "/auth/login",
            Operation::ForgotPassword(_) => "/auth/forgot-password",
            Operation::VerifyRecoveryOtp(_) => "/auth/verify-recovery-otp",
            Operation::ResetPassword(_) => "/auth/reset-password",
        }
    }

    /// Short identifier used for logging and loading indicators.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Register(_) => "register",
            Operation::VerifyOtp(_) => "verify-otp",
            Operation::CompleteRegistration(_) => "complete-registration",
            Operation::Login(_) => "login",
            Operation::ForgotPassword(_) => "forgot-password",
            Operation::VerifyRecoveryOtp(_) => "verify-recovery-otp",
            Operation::ResetPassword(_) => "reset-password",
        }
    }

    /// Build the HTTP request for this operation.
    pub fn to_request(&self) -> Result<ApiRequest, ApiError> {
        let body = match self {
            Operation::Register(r) => to_json(r)?,
            Operation::VerifyOtp(r) | Operation::VerifyRecoveryOtp(r) => to_json(r)?,
            Operation::CompleteRegistration(r) | Operation::Login(r) => to_json(r)?,
            Operation::ForgotPassword(r) => to_json(r)?,
            Operation::ResetPassword(r) => to_json(r)?,
        };
        Ok(ApiRequest::post(self.endpoint(), body))
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(value)
        .map_err(|e| ApiError::new(format!("Failed to encode request: {}", e), 400))
}
