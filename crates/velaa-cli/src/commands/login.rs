use crate::error::AppResult;
use crate::terminal::secret_or_prompt;
use console::style;
use registration_flow::RegistrationFlow;

#[derive(clap::Args, Debug)]
pub struct LoginArgs {
    #[arg(long)]
    pub phone: String,

    /// Prompted for when omitted
    #[arg(long)]
    pub password: Option<String>,
}

pub async fn login(flow: &mut RegistrationFlow, args: LoginArgs) -> AppResult<()> {
    let password = secret_or_prompt(args.password, "Password")?;
    let auth = flow.login(&args.phone, &password).await?;

    let name = auth
        .user
        .owner_manager_name
        .as_deref()
        .unwrap_or("your account");
    println!("Signed in as {}", style(name).bold());
    if let Some(warehouse) = auth.user.warehouse_name.as_deref() {
        println!("  warehouse: {}", warehouse);
    }
    Ok(())
}

pub async fn logout(flow: &mut RegistrationFlow) -> AppResult<()> {
    if flow.logout().await? {
        println!("Signed out.");
    } else {
        println!("Not signed in.");
    }
    Ok(())
}
