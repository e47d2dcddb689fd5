use crate::error::AppResult;
use crate::terminal::StdinConfirm;
use registration_flow::{BackNavigation, Page, RegistrationFlow};

#[derive(clap::Args, Debug)]
pub struct BackArgs {
    /// Abandon without asking
    #[arg(long, short)]
    pub yes: bool,
}

struct Always;

impl registration_flow::Confirm for Always {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

pub async fn run(flow: &mut RegistrationFlow, args: BackArgs) -> AppResult<()> {
    let page = Page::current(flow.record());
    let outcome = if args.yes {
        flow.go_back(page, &Always).await?
    } else {
        flow.go_back(page, &StdinConfirm).await?
    };

    match outcome {
        BackNavigation::Proceed if page.guards_registration() => {
            println!("Registration abandoned. Start again with: velaa signup");
        }
        BackNavigation::Proceed => println!("Nothing to go back from."),
        BackNavigation::Cancelled => println!("Staying on the current step."),
    }
    Ok(())
}
