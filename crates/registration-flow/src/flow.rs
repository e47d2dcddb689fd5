//! Registration and password recovery state machine.

use crate::error::FlowError;
use crate::page::{BackNavigation, Confirm, Page, PageAccess, ABANDON_REGISTRATION_PROMPT};
use crate::session::{AuthSession, FlowOutcome, FlowStep, RecoveryState, SessionRecord};
use crate::store::SessionStore;
use crate::validation::{validate_new_password, validate_otp, validate_required, PhoneNumber};
use secrecy::{ExposeSecret, SecretString};
use std::future::Future;
use tracing::{debug, info, instrument};
use velaa_client::{
    ApiError, ApiResponse, AuthData, ForgotPasswordData, NotificationKind, RecoveryOtpData,
    RegisterData, RegisterRequest, ResetPasswordData, VelaaClient, VerifyOtpData,
};

/// Drives the multi-step auth flows and keeps their progress in a
/// [`SessionStore`].
///
/// State only advances when the backend (live or simulated) reports success;
/// a failed call leaves both the in-memory and the persisted record as they
/// were.
pub struct RegistrationFlow {
    client: VelaaClient,
    store: SessionStore,
    record: SessionRecord,
}

impl RegistrationFlow {
    /// Resume the session saved in `store`.
    pub async fn open(client: VelaaClient, store: SessionStore) -> Result<Self, FlowError> {
        let record = store.load().await?;

        match &record.registration {
            Some(registration) => client.restore_registration_data(registration.clone()),
            None => client.clear_registration_data(),
        }
        debug!(step = ?record.step, "Session loaded");

        Ok(Self {
            client,
            store,
            record,
        })
    }

    pub fn client(&self) -> &VelaaClient {
        &self.client
    }

    pub fn record(&self) -> &SessionRecord {
        &self.record
    }

    pub fn step(&self) -> FlowStep {
        self.record.step
    }

    /// Check whether `page` may be shown, warning the user when it may not.
    pub fn check_access(&self, page: Page) -> PageAccess {
        let access = page.check_access(&self.record);
        if let PageAccess::Redirect { to, message } = &access {
            info!(?page, redirect = ?to, "Page requires an earlier step");
            self.client
                .presentation()
                .notify(NotificationKind::Warning, message);
        }
        access
    }

    /// Leave `page` towards the previous one.
    ///
    /// Leaving the OTP or password page of a pending registration asks for
    /// confirmation and then discards the registration.
    pub async fn go_back(
        &mut self,
        page: Page,
        confirm: &dyn Confirm,
    ) -> Result<BackNavigation, FlowError> {
        if !page.guards_registration() || self.record.pending_phone().is_none() {
            return Ok(BackNavigation::Proceed);
        }

        if !confirm.confirm(ABANDON_REGISTRATION_PROMPT) {
            debug!("Back navigation cancelled");
            return Ok(BackNavigation::Cancelled);
        }

        self.cancel().await?;
        Ok(BackNavigation::Proceed)
    }

    /// Abandon any registration or recovery in progress.
    pub async fn cancel(&mut self) -> Result<(), FlowError> {
        let mut record = self.record.clone();
        record.clear_flow();
        self.commit(record).await?;
        self.client.clear_registration_data();
        info!("Flow progress cleared");
        Ok(())
    }

    /// Submit the signup form.
    #[instrument(skip(self, owner_manager_name, warehouse_name))]
    pub async fn register(
        &mut self,
        owner_manager_name: &str,
        warehouse_name: &str,
        phone: &str,
    ) -> Result<ApiResponse<RegisterData>, FlowError> {
        validate_required("Owner/manager name", owner_manager_name)?;
        validate_required("Warehouse name", warehouse_name)?;
        let phone = PhoneNumber::parse(phone)?.into_string();

        let request = RegisterRequest {
            owner_manager_name: owner_manager_name.trim().to_string(),
            warehouse_name: warehouse_name.trim().to_string(),
            phone,
        };
        let response = self.track("register", self.client.register(request)).await?;
        ensure_success(&response, "Registration failed. Please try again.")?;

        let mut record = self.record.clone();
        record.clear_flow();
        record.step = FlowStep::Registered;
        record.registration = Some(self.client.registration_data());
        self.commit(record).await?;

        self.notify(NotificationKind::Success, "Verification code sent to your phone.");
        Ok(response)
    }

    /// Submit the registration OTP.
    #[instrument(skip(self, otp))]
    pub async fn verify_otp(&mut self, otp: &str) -> Result<ApiResponse<VerifyOtpData>, FlowError> {
        let phone = self.require(Page::Otp)?;
        validate_otp(otp)?;

        let response = self
            .track("verify-otp", self.client.verify_otp(&phone, otp))
            .await?;
        ensure_success(&response, "Verification failed. Please try again.")?;

        let mut record = self.record.clone();
        record.step = FlowStep::OtpVerified;
        self.commit(record).await?;

        self.notify(NotificationKind::Success, "Phone number verified.");
        Ok(response)
    }

    /// Ask for a new registration OTP. Leaves the flow where it is.
    pub async fn resend_otp(&self) -> Result<ApiResponse<RegisterData>, FlowError> {
        let phone = self.require(Page::Otp)?;
        let response = self.track("resend-otp", self.client.resend_otp(&phone)).await?;
        self.notify(NotificationKind::Info, "A new verification code has been sent.");
        Ok(response)
    }

    /// Set the account password, finishing the registration.
    #[instrument(skip_all)]
    pub async fn complete_registration(
        &mut self,
        password: &SecretString,
        confirmation: &SecretString,
    ) -> Result<(FlowOutcome, AuthData), FlowError> {
        let phone = self.require(Page::CreatePassword)?;
        validate_new_password(password.expose_secret(), confirmation.expose_secret())?;

        let response = self
            .track(
                "complete-registration",
                self.client
                    .complete_registration(&phone, password.expose_secret()),
            )
            .await?;
        ensure_success(&response, "Could not create your account. Please try again.")?;

        let mut record = self.record.clone();
        record.clear_flow();
        record.auth = Some(AuthSession::new(
            response.data.token.clone(),
            response.data.user.clone(),
        ));
        self.commit(record).await?;

        self.notify(NotificationKind::Success, "Account created successfully.");
        Ok((FlowOutcome::PasswordSet, response.data))
    }

    #[instrument(skip(self, password))]
    pub async fn login(
        &mut self,
        phone: &str,
        password: &SecretString,
    ) -> Result<AuthData, FlowError> {
        let phone = PhoneNumber::parse(phone)?.into_string();
        validate_required("Password", password.expose_secret())?;

        let response = self
            .track("login", self.client.login(&phone, password.expose_secret()))
            .await?;
        ensure_success(&response, "Login failed. Please try again.")?;

        let mut record = self.record.clone();
        record.auth = Some(AuthSession::new(
            response.data.token.clone(),
            response.data.user.clone(),
        ));
        self.commit(record).await?;

        self.notify(NotificationKind::Success, "Welcome back!");
        Ok(response.data)
    }

    /// Forget the signed-in account.
    pub async fn logout(&mut self) -> Result<bool, FlowError> {
        if self.record.auth.is_none() {
            return Ok(false);
        }

        let mut record = self.record.clone();
        record.auth = None;
        self.commit(record).await?;
        info!("Signed out");
        Ok(true)
    }

    /// Start password recovery for `phone`.
    #[instrument(skip(self))]
    pub async fn forgot_password(
        &mut self,
        phone: &str,
    ) -> Result<ApiResponse<ForgotPasswordData>, FlowError> {
        let phone = PhoneNumber::parse(phone)?.into_string();

        let response = self
            .track("forgot-password", self.client.forgot_password(&phone))
            .await?;
        ensure_success(&response, "Could not send a recovery code. Please try again.")?;

        let mut record = self.record.clone();
        record.clear_flow();
        record.step = FlowStep::RecoveryRequested;
        record.recovery = Some(RecoveryState {
            phone,
            otp: None,
            reset_token: None,
        });
        self.commit(record).await?;
        self.client.clear_registration_data();

        self.notify(NotificationKind::Success, "Recovery code sent to your phone.");
        Ok(response)
    }

    /// Submit the recovery OTP.
    #[instrument(skip(self, otp))]
    pub async fn verify_recovery_otp(
        &mut self,
        otp: &str,
    ) -> Result<ApiResponse<RecoveryOtpData>, FlowError> {
        let phone = self.require(Page::RecoveryOtp)?;
        validate_otp(otp)?;

        let response = self
            .track(
                "verify-recovery-otp",
                self.client.verify_recovery_otp(&phone, otp),
            )
            .await?;
        ensure_success(&response, "Verification failed. Please try again.")?;

        let mut record = self.record.clone();
        record.step = FlowStep::RecoveryVerified;
        record.recovery = Some(RecoveryState {
            phone,
            otp: Some(otp.to_string()),
            reset_token: response.data.reset_token.clone(),
        });
        self.commit(record).await?;

        Ok(response)
    }

    /// Set a new password, finishing the recovery.
    #[instrument(skip_all)]
    pub async fn reset_password(
        &mut self,
        new_password: &SecretString,
        confirmation: &SecretString,
    ) -> Result<(FlowOutcome, ResetPasswordData), FlowError> {
        let phone = self.require(Page::ResetPassword)?;
        validate_new_password(new_password.expose_secret(), confirmation.expose_secret())?;
        let otp = self
            .record
            .recovery
            .as_ref()
            .and_then(|r| r.otp.clone())
            .unwrap_or_default();

        let response = self
            .track(
                "reset-password",
                self.client
                    .reset_password(&phone, &otp, new_password.expose_secret()),
            )
            .await?;
        ensure_success(&response, "Could not reset your password. Please try again.")?;

        let mut record = self.record.clone();
        record.clear_flow();
        self.commit(record).await?;

        self.notify(NotificationKind::Success, "Password reset successfully.");
        Ok((FlowOutcome::PasswordReset, response.data))
    }

    /// Phone number of the flow `page` belongs to, or the redirect error.
    fn require(&self, page: Page) -> Result<String, FlowError> {
        if let PageAccess::Redirect { to, message } = self.check_access(page) {
            return Err(FlowError::SessionRequired {
                redirect: to,
                message: message.to_string(),
            });
        }

        let phone = match page {
            Page::RecoveryOtp | Page::ResetPassword => self.record.recovery_phone(),
            _ => self.record.pending_phone(),
        };
        Ok(phone.unwrap_or_default().to_string())
    }

    /// Persist `record`, then adopt it. An empty record removes the session.
    async fn commit(&mut self, mut record: SessionRecord) -> Result<(), FlowError> {
        if record.is_empty() {
            self.store.clear().await?;
            debug!("Session cleared");
        } else {
            record.touch();
            self.store.save(&record).await?;
            debug!(step = ?record.step, "Session saved");
        }
        self.record = record;
        Ok(())
    }

    /// Run `call` with its loading indicator shown.
    async fn track<T>(
        &self,
        id: &str,
        call: impl Future<Output = Result<T, ApiError>>,
    ) -> Result<T, ApiError> {
        let presentation = self.client.presentation();
        presentation.set_loading(id, true);
        let result = call.await;
        presentation.set_loading(id, false);
        result
    }

    fn notify(&self, kind: NotificationKind, message: &str) {
        self.client.presentation().notify(kind, message);
    }
}

fn ensure_success<T>(response: &ApiResponse<T>, fallback: &str) -> Result<(), FlowError> {
    if response.success {
        Ok(())
    } else {
        Err(FlowError::Rejected(
            response
                .message
                .clone()
                .unwrap_or_else(|| fallback.to_string()),
        ))
    }
}
