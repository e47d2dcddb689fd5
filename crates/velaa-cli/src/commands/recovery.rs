use crate::error::AppResult;
use crate::terminal::secret_or_prompt;
use registration_flow::RegistrationFlow;

#[derive(clap::Args, Debug)]
pub struct ForgotPasswordArgs {
    #[arg(long)]
    pub phone: String,
}

#[derive(clap::Args, Debug)]
pub struct VerifyRecoveryArgs {
    /// Four-digit code sent by SMS
    pub code: String,
}

#[derive(clap::Args, Debug)]
pub struct ResetPasswordArgs {
    /// Prompted for when omitted
    #[arg(long)]
    pub password: Option<String>,

    /// Prompted for when omitted
    #[arg(long)]
    pub confirm: Option<String>,
}

pub async fn forgot_password(
    flow: &mut RegistrationFlow,
    args: ForgotPasswordArgs,
) -> AppResult<()> {
    flow.forgot_password(&args.phone).await?;
    if flow.client().is_simulated() {
        println!("Demo mode: use code {}", velaa_client::DEMO_OTP);
    }
    println!("Next: velaa verify-recovery <code>");
    Ok(())
}

pub async fn verify_recovery(
    flow: &mut RegistrationFlow,
    args: VerifyRecoveryArgs,
) -> AppResult<()> {
    flow.verify_recovery_otp(args.code.trim()).await?;
    println!("Code accepted. Next: velaa reset-password");
    Ok(())
}

pub async fn reset_password(
    flow: &mut RegistrationFlow,
    args: ResetPasswordArgs,
) -> AppResult<()> {
    let password = secret_or_prompt(args.password, "New password")?;
    let confirmation = secret_or_prompt(args.confirm, "Confirm password")?;

    flow.reset_password(&password, &confirmation).await?;
    println!("You can now sign in with: velaa login --phone <number>");
    Ok(())
}
