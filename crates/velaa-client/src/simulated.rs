//! Local stand-in for the backend, used in demo mode.
//!
//! Responses mirror the live payload shapes so callers cannot tell the two
//! apart, apart from the generated identifiers.

use crate::error::ApiError;
use crate::operation::Operation;
use crate::types::RegistrationState;
use chrono::Utc;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

/// The only OTP accepted in demo mode.
pub const DEMO_OTP: &str = "1234";

/// Shortest password accepted by the simulated login.
pub const DEMO_MIN_PASSWORD_LEN: usize = 6;

/// Default artificial latency of simulated calls.
pub const DEFAULT_SIMULATED_LATENCY: Duration = Duration::from_secs(1);

/// Simulated auth backend.
#[derive(Debug, Clone)]
pub struct SimulatedBackend {
    latency: Duration,
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new(DEFAULT_SIMULATED_LATENCY)
    }
}

impl SimulatedBackend {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    /// Answer `operation` after the configured latency.
    ///
    /// `registration` supplies the names echoed back on completion.
    pub async fn respond(
        &self,
        operation: &Operation,
        registration: &RegistrationState,
    ) -> Result<Value, ApiError> {
        debug!(operation = operation.name(), "Simulating API response");
        if !self.latency.is_zero() {
            sleep(self.latency).await;
        }

        let stamp = Utc::now().timestamp_millis();

        match operation {
            Operation::Register(request) => Ok(json!({
                "success": true,
                "data": {
                    "userId": format!("mock_user_{stamp}"),
                    "phone": request.phone,
                    "otpSent": true,
                    "nextStep": "verify-otp"
                }
            })),
            Operation::VerifyOtp(request) => {
                if request.otp != DEMO_OTP {
                    return Err(ApiError::new(
                        format!("Invalid OTP. Please use {DEMO_OTP} for demo mode."),
                        400,
                    ));
                }
                Ok(json!({
                    "success": true,
                    "data": {
                        "user": {
                            "status": "otp-verified",
                            "isOtpVerified": true,
                            "isPhoneVerified": true
                        },
                        "nextStep": "create-password"
                    }
                }))
            }
            Operation::CompleteRegistration(request) => Ok(json!({
                "success": true,
                "data": {
                    "token": format!("mock_jwt_token_{stamp}"),
                    "user": {
                        "status": "active",
                        "isPhoneVerified": true,
                        "isOtpVerified": true,
                        "ownerManagerName": registration.owner_manager_name,
                        "warehouseName": registration.warehouse_name,
                        "phone": request.phone,
                        "id": format!("mock_user_{stamp}")
                    }
                }
            })),
            Operation::Login(request) => {
                if request.password.chars().count() < DEMO_MIN_PASSWORD_LEN {
                    return Err(ApiError::new("Invalid password", 401));
                }
                Ok(json!({
                    "success": true,
                    "data": {
                        "token": format!("mock_login_token_{stamp}"),
                        "user": {
                            "id": "mock_user_login",
                            "phone": request.phone,
                            "ownerManagerName": "Mock User",
                            "warehouseName": "Mock Warehouse",
                            "status": "active"
                        }
                    }
                }))
            }
            Operation::ForgotPassword(request) => Ok(json!({
                "success": true,
                "data": {
                    "phone": request.phone,
                    "otpSent": true,
                    "message": "OTP sent to your phone number"
                }
            })),
            Operation::VerifyRecoveryOtp(request) => {
                if request.otp != DEMO_OTP {
                    return Err(ApiError::new(
                        format!("Invalid recovery code. Please use {DEMO_OTP} for demo mode."),
                        400,
                    ));
                }
                Ok(json!({
                    "success": true,
                    "data": {
                        "phone": request.phone,
                        "otpVerified": true,
                        "resetToken": format!("mock_reset_token_{stamp}")
                    }
                }))
            }
            Operation::ResetPassword(request) => Ok(json!({
                "success": true,
                "data": {
                    "message": "Password reset successfully",
                    "phone": request.phone
                }
            })),
        }
    }
}
