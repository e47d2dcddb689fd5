use crate::error::AppResult;
use crate::terminal::secret_or_prompt;
use console::style;
use registration_flow::{password_strength, RegistrationFlow};
use secrecy::ExposeSecret;

#[derive(clap::Args, Debug)]
pub struct SignupArgs {
    /// Name of the warehouse owner or manager
    #[arg(long)]
    pub owner: String,

    #[arg(long)]
    pub warehouse: String,

    #[arg(long)]
    pub phone: String,
}

#[derive(clap::Args, Debug)]
pub struct VerifyOtpArgs {
    /// Four-digit code sent by SMS
    pub code: String,
}

#[derive(clap::Args, Debug)]
pub struct CreatePasswordArgs {
    /// Prompted for when omitted
    #[arg(long)]
    pub password: Option<String>,

    /// Prompted for when omitted
    #[arg(long)]
    pub confirm: Option<String>,
}

pub async fn signup(flow: &mut RegistrationFlow, args: SignupArgs) -> AppResult<()> {
    let response = flow
        .register(&args.owner, &args.warehouse, &args.phone)
        .await?;

    println!(
        "Registration started for {}.",
        style(&flow.client().registration_data().phone).bold()
    );
    if flow.client().is_simulated() {
        println!("  demo mode: use code {}", velaa_client::DEMO_OTP);
    }
    if let Some(next) = response.data.next_step.as_deref() {
        println!("  next: velaa {}", next);
    }
    Ok(())
}

pub async fn verify_otp(flow: &mut RegistrationFlow, args: VerifyOtpArgs) -> AppResult<()> {
    flow.verify_otp(args.code.trim()).await?;
    println!("Next: velaa create-password");
    Ok(())
}

pub async fn resend_otp(flow: &mut RegistrationFlow) -> AppResult<()> {
    flow.resend_otp().await?;
    Ok(())
}

pub async fn create_password(
    flow: &mut RegistrationFlow,
    args: CreatePasswordArgs,
) -> AppResult<()> {
    let password = secret_or_prompt(args.password, "Password")?;
    let strength = password_strength(password.expose_secret());
    if let Some(level) = strength.level {
        println!("Password strength: {} ({}%)", level.label(), strength.fill_percent());
    }
    let confirmation = secret_or_prompt(args.confirm, "Confirm password")?;

    let (_, auth) = flow.complete_registration(&password, &confirmation).await?;
    let warehouse = auth.user.warehouse_name.as_deref().unwrap_or("your warehouse");
    println!("Welcome to Velaa, {}!", style(warehouse).bold());
    Ok(())
}
