//! CLI subcommands, one per page of the auth flow.

mod back;
mod login;
mod phone;
mod recovery;
mod signup;
mod status;

pub use back::BackArgs;
pub use login::LoginArgs;
pub use phone::PhoneArgs;
pub use recovery::{ForgotPasswordArgs, ResetPasswordArgs, VerifyRecoveryArgs};
pub use signup::{CreatePasswordArgs, SignupArgs, VerifyOtpArgs};

use crate::error::AppResult;
use registration_flow::RegistrationFlow;

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Check and normalize a Tanzanian phone number.
    Phone(PhoneArgs),
    /// Start a new warehouse registration.
    Signup(SignupArgs),
    /// Verify the code sent during registration.
    VerifyOtp(VerifyOtpArgs),
    /// Send a new registration code.
    ResendOtp,
    /// Choose the account password and finish registration.
    CreatePassword(CreatePasswordArgs),
    /// Sign in with phone number and password.
    Login(LoginArgs),
    /// Start password recovery.
    ForgotPassword(ForgotPasswordArgs),
    /// Verify the password recovery code.
    VerifyRecovery(VerifyRecoveryArgs),
    /// Choose a new password and finish recovery.
    ResetPassword(ResetPasswordArgs),
    /// Leave the current page, abandoning a pending registration.
    Back(BackArgs),
    /// Show flow progress and backend mode.
    Status,
    /// Sign out.
    Logout,
}

impl Commands {
    /// Whether the command works on the saved session.
    pub fn needs_session(&self) -> bool {
        !matches!(self, Commands::Phone(_))
    }
}

/// Run `command` against `flow`.
pub async fn execute(command: Commands, flow: &mut RegistrationFlow) -> AppResult<()> {
    match command {
        Commands::Phone(args) => phone::run(args),
        Commands::Signup(args) => signup::signup(flow, args).await,
        Commands::VerifyOtp(args) => signup::verify_otp(flow, args).await,
        Commands::ResendOtp => signup::resend_otp(flow).await,
        Commands::CreatePassword(args) => signup::create_password(flow, args).await,
        Commands::Login(args) => login::login(flow, args).await,
        Commands::ForgotPassword(args) => recovery::forgot_password(flow, args).await,
        Commands::VerifyRecovery(args) => recovery::verify_recovery(flow, args).await,
        Commands::ResetPassword(args) => recovery::reset_password(flow, args).await,
        Commands::Back(args) => back::run(flow, args).await,
        Commands::Status => status::run(flow),
        Commands::Logout => login::logout(flow).await,
    }
}
