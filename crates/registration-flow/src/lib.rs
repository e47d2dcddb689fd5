//! Registration and password recovery flows for Velaa.
//!
//! [`RegistrationFlow`] sequences the calls made through a
//! [`velaa_client::VelaaClient`], guards each page against missing state and
//! keeps the progress in a [`SessionStore`] so a flow survives restarts.

mod error;
mod flow;
pub mod page;
mod session;
mod store;
pub mod validation;

pub use error::{FlowError, SessionError};
pub use flow::RegistrationFlow;
pub use page::{BackNavigation, Confirm, Page, PageAccess};
pub use session::{AuthSession, FlowOutcome, FlowStep, RecoveryState, SessionRecord};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore};
pub use validation::{password_strength, PasswordStrength, PhoneNumber, StrengthLevel};
