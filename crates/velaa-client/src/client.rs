//! Velaa API client with automatic demo-mode fallback.

use crate::error::ApiError;
use crate::operation::Operation;
use crate::presentation::{NotificationKind, PresentationSink, TracingSink};
use crate::simulated::{SimulatedBackend, DEFAULT_SIMULATED_LATENCY};
use crate::transport::{ApiRequest, HttpTransport, Transport, DEFAULT_TIMEOUT};
use crate::types::*;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Default backend location.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5001/api";

/// Shown once when the client degrades to the simulated backend.
pub const DEMO_MODE_WARNING: &str = "Backend server not available. Running in demo mode.";

/// Extra attempts made after a network failure, all against the simulation.
const MAX_FALLBACK_HOPS: u32 = 1;

/// Client construction settings.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    /// Artificial delay of simulated responses.
    pub simulated_latency: Duration,
    /// Start directly in simulated mode.
    pub demo_mode: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            timeout: DEFAULT_TIMEOUT,
            simulated_latency: DEFAULT_SIMULATED_LATENCY,
            demo_mode: false,
        }
    }
}

/// Velaa auth API client.
///
/// Clones share the mode flag and the registration data. Once a call fails
/// because the backend is unreachable, every later call of every clone is
/// answered by the [`SimulatedBackend`].
#[derive(Clone)]
pub struct VelaaClient {
    transport: Arc<dyn Transport>,
    simulated: SimulatedBackend,
    simulated_mode: Arc<AtomicBool>,
    registration: Arc<Mutex<RegistrationState>>,
    presentation: Arc<dyn PresentationSink>,
}

impl VelaaClient {
    /// Create a client talking HTTP to `config.base_url`.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let transport = HttpTransport::new(&config.base_url, config.timeout)?;
        debug!(
            base_url = transport.base_url(),
            timeout = ?config.timeout,
            "HTTP transport ready"
        );
        Ok(Self::with_transport(Arc::new(transport), config))
    }

    /// Create a client over an arbitrary transport.
    pub fn with_transport(transport: Arc<dyn Transport>, config: &ClientConfig) -> Self {
        Self {
            transport,
            simulated: SimulatedBackend::new(config.simulated_latency),
            simulated_mode: Arc::new(AtomicBool::new(config.demo_mode)),
            registration: Arc::new(Mutex::new(RegistrationState::default())),
            presentation: Arc::new(TracingSink),
        }
    }

    /// Route presentation events to `sink`.
    pub fn with_presentation(mut self, sink: Arc<dyn PresentationSink>) -> Self {
        self.presentation = sink;
        self
    }

    pub fn presentation(&self) -> &Arc<dyn PresentationSink> {
        &self.presentation
    }

    pub fn mode(&self) -> ClientMode {
        if self.simulated_mode.load(Ordering::SeqCst) {
            ClientMode::Simulated
        } else {
            ClientMode::Live
        }
    }

    pub fn is_simulated(&self) -> bool {
        self.mode() == ClientMode::Simulated
    }

    /// Snapshot of the data collected by the current registration.
    pub fn registration_data(&self) -> RegistrationState {
        self.registration().clone()
    }

    pub fn clear_registration_data(&self) {
        *self.registration() = RegistrationState::default();
    }

    /// Reinstate registration data saved by an earlier session.
    pub fn restore_registration_data(&self, state: RegistrationState) {
        *self.registration() = state;
    }

    /// Step 1 of registration. Stores the submitted data for later steps once
    /// the backend accepts it.
    #[instrument(skip(self, request), fields(phone = %request.phone))]
    pub async fn register(
        &self,
        request: RegisterRequest,
    ) -> Result<ApiResponse<RegisterData>, ApiError> {
        let operation = Operation::Register(request.clone());
        let response: ApiResponse<RegisterData> = self.execute(&operation).await?;

        if response.success {
            *self.registration() = RegistrationState {
                phone: request.phone,
                owner_manager_name: request.owner_manager_name,
                warehouse_name: request.warehouse_name,
                user_id: response.data.user_id.clone(),
            };
            info!("Registration submitted, awaiting OTP");
        }

        Ok(response)
    }

    /// Step 2 of registration.
    #[instrument(skip(self, otp))]
    pub async fn verify_otp(
        &self,
        phone: &str,
        otp: &str,
    ) -> Result<ApiResponse<VerifyOtpData>, ApiError> {
        let operation = Operation::VerifyOtp(OtpRequest {
            phone: phone.into(),
            otp: otp.into(),
        });
        self.execute(&operation).await
    }

    /// Step 3 of registration. Clears the registration data on success.
    #[instrument(skip(self, password))]
    pub async fn complete_registration(
        &self,
        phone: &str,
        password: &str,
    ) -> Result<ApiResponse<AuthData>, ApiError> {
        let operation = Operation::CompleteRegistration(CredentialsRequest {
            phone: phone.into(),
            password: password.into(),
        });
        let response: ApiResponse<AuthData> = self.execute(&operation).await?;

        if response.success {
            self.clear_registration_data();
            info!("Registration completed");
        }

        Ok(response)
    }

    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        phone: &str,
        password: &str,
    ) -> Result<ApiResponse<AuthData>, ApiError> {
        let operation = Operation::Login(CredentialsRequest {
            phone: phone.into(),
            password: password.into(),
        });
        self.execute(&operation).await
    }

    /// Ask for a recovery OTP.
    #[instrument(skip(self))]
    pub async fn forgot_password(
        &self,
        phone: &str,
    ) -> Result<ApiResponse<ForgotPasswordData>, ApiError> {
        let operation = Operation::ForgotPassword(PhoneRequest {
            phone: phone.into(),
        });
        self.execute(&operation).await
    }

    #[instrument(skip(self, otp))]
    pub async fn verify_recovery_otp(
        &self,
        phone: &str,
        otp: &str,
    ) -> Result<ApiResponse<RecoveryOtpData>, ApiError> {
        let operation = Operation::VerifyRecoveryOtp(OtpRequest {
            phone: phone.into(),
            otp: otp.into(),
        });
        self.execute(&operation).await
    }

    #[instrument(skip(self, otp, new_password))]
    pub async fn reset_password(
        &self,
        phone: &str,
        otp: &str,
        new_password: &str,
    ) -> Result<ApiResponse<ResetPasswordData>, ApiError> {
        let operation = Operation::ResetPassword(ResetPasswordRequest {
            phone: phone.into(),
            otp: otp.into(),
            new_password: new_password.into(),
        });
        self.execute(&operation).await
    }

    /// Ask the backend to send a new registration OTP.
    ///
    /// Re-posts the registration with the stored names. Unlike the other
    /// operations this never falls back to the simulation.
    #[instrument(skip(self))]
    pub async fn resend_otp(&self, phone: &str) -> Result<ApiResponse<RegisterData>, ApiError> {
        let registration = self.registration_data();
        let request = ApiRequest::post(
            "/auth/register",
            json!({
                "ownerManagerName": registration.owner_manager_name,
                "warehouseName": registration.warehouse_name,
                "phone": phone,
            }),
        );

        let value = self.transport.send(request).await.inspect_err(|e| {
            warn!("Resend OTP failed: {}", e);
        })?;
        parse(value)
    }

    async fn execute<T: DeserializeOwned + Default>(
        &self,
        operation: &Operation,
    ) -> Result<ApiResponse<T>, ApiError> {
        let value = self.dispatch(operation).await.inspect_err(|e| {
            warn!(operation = operation.name(), "API call failed: {}", e);
        })?;
        parse(value)
    }

    /// Run `operation` live, degrading to the simulation on a network failure.
    async fn dispatch(&self, operation: &Operation) -> Result<Value, ApiError> {
        let mut last_error = None;

        for attempt in 0..=MAX_FALLBACK_HOPS {
            if self.is_simulated() {
                debug!(
                    operation = operation.name(),
                    latency = ?self.simulated.latency(),
                    "Answering from demo backend"
                );
                let registration = self.registration_data();
                return self.simulated.respond(operation, &registration).await;
            }

            match self.transport.send(operation.to_request()?).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_network() => {
                    warn!(
                        operation = operation.name(),
                        attempt,
                        "Backend not available, switching to demo mode"
                    );
                    self.enter_simulated_mode();
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| ApiError::network("no attempt was made")))
    }

    /// Switch to the simulation. Only the first caller emits the warning.
    fn enter_simulated_mode(&self) -> bool {
        let switched = self
            .simulated_mode
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok();

        if switched {
            self.presentation
                .notify(NotificationKind::Warning, DEMO_MODE_WARNING);
        }
        switched
    }

    fn registration(&self) -> MutexGuard<'_, RegistrationState> {
        self.registration.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn parse<T: DeserializeOwned + Default>(value: Value) -> Result<ApiResponse<T>, ApiError> {
    debug!("Parsing API response");
    serde_json::from_value(value).map_err(ApiError::malformed_response)
}
