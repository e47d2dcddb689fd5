use crate::error::AppResult;
use console::style;
use registration_flow::PhoneNumber;
use velaa_client::phone;

#[derive(clap::Args, Debug)]
pub struct PhoneArgs {
    /// Number in any common notation, e.g. 0712 345 678
    pub number: String,
}

pub fn run(args: PhoneArgs) -> AppResult<()> {
    match PhoneNumber::parse(&args.number) {
        Ok(number) => {
            println!("{} {}", style("✓").green(), number.display_format());
            println!("  normalized: {}", number);
            Ok(())
        }
        Err(e) => {
            println!("{} {}", style("✕").red(), phone::normalize(&args.number));
            Err(e.into())
        }
    }
}
