use crate::error::AppResult;
use console::style;
use registration_flow::page::TOTAL_REGISTRATION_STEPS;
use registration_flow::{Page, RegistrationFlow};
use velaa_client::ClientMode;

pub fn run(flow: &RegistrationFlow) -> AppResult<()> {
    let record = flow.record();
    let page = Page::current(record);

    println!("Page:     {:?}", page);
    println!("Step:     {:?}", record.step);
    if record.step.is_registration() {
        println!(
            "Progress: step {} of {} ({}%)",
            page.registration_step(record),
            TOTAL_REGISTRATION_STEPS,
            page.progress_percent(record)
        );
    }
    if record.step.is_recovery() {
        println!("Flow:     password recovery");
    }
    if let Some(phone) = record.pending_phone().or(record.recovery_phone()) {
        println!("Phone:    {}", velaa_client::phone::display_format(phone));
    }

    let mode = match flow.client().mode() {
        ClientMode::Live => style("live").green(),
        ClientMode::Simulated => style("demo").yellow(),
    };
    println!("Backend:  {}", mode);

    match &record.auth {
        Some(auth) => println!(
            "Account:  {} (since {})",
            auth.user.phone.as_deref().unwrap_or("signed in"),
            auth.signed_in_at.format("%Y-%m-%d %H:%M UTC")
        ),
        None => println!("Account:  not signed in"),
    }
    Ok(())
}
