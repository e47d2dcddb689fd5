//! End-to-end flow tests against the simulated backend and a mock server.

use registration_flow::{
    BackNavigation, Confirm, FlowError, FlowOutcome, FlowStep, Page, PageAccess,
    RegistrationFlow, SessionStore,
};
use secrecy::SecretString;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use velaa_client::{ClientConfig, ClientMode, NotificationKind, PresentationSink, VelaaClient};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<String>>,
}

impl RecordingSink {
    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl PresentationSink for RecordingSink {
    fn notify(&self, kind: NotificationKind, message: &str) {
        self.events
            .lock()
            .unwrap()
            .push(format!("{:?}: {}", kind, message));
    }

    fn set_loading(&self, id: &str, active: bool) {
        self.events
            .lock()
            .unwrap()
            .push(format!("loading {} {}", id, active));
    }
}

struct Answer(bool);

impl Confirm for Answer {
    fn confirm(&self, _prompt: &str) -> bool {
        self.0
    }
}

fn secret(value: &str) -> SecretString {
    SecretString::new(value.to_string())
}

fn demo_config() -> ClientConfig {
    ClientConfig {
        simulated_latency: Duration::ZERO,
        demo_mode: true,
        ..Default::default()
    }
}

fn demo_client() -> VelaaClient {
    VelaaClient::new(&demo_config()).unwrap()
}

#[tokio::test]
async fn test_full_registration_in_demo_mode() {
    let store = SessionStore::memory();
    let mut flow = RegistrationFlow::open(demo_client(), store.clone())
        .await
        .unwrap();

    flow.register("Alice", "Warehouse A", "0712 345 678")
        .await
        .unwrap();
    assert_eq!(flow.step(), FlowStep::Registered);
    assert_eq!(flow.record().pending_phone(), Some("+255712345678"));

    let err = flow.verify_otp("0000").await.unwrap_err();
    match &err {
        FlowError::Api(api) => assert_eq!(api.status_code(), 400),
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(flow.step(), FlowStep::Registered);

    flow.verify_otp("1234").await.unwrap();
    assert_eq!(flow.step(), FlowStep::OtpVerified);

    let (outcome, auth) = flow
        .complete_registration(&secret("secret1"), &secret("secret1"))
        .await
        .unwrap();

    assert_eq!(outcome, FlowOutcome::PasswordSet);
    assert!(auth.token.starts_with("mock_jwt_token_"));
    assert_eq!(auth.user.warehouse_name.as_deref(), Some("Warehouse A"));
    assert_eq!(flow.step(), FlowStep::Start);
    assert!(flow.record().registration.is_none());
    assert!(flow.client().registration_data().is_empty());

    let saved = store.load().await.unwrap();
    assert!(saved.registration.is_none());
    assert!(saved.auth.is_some());
}

#[tokio::test]
async fn test_progress_survives_reopening() {
    let store = SessionStore::memory();

    let mut flow = RegistrationFlow::open(demo_client(), store.clone())
        .await
        .unwrap();
    flow.register("Alice", "Warehouse A", "+255712345678")
        .await
        .unwrap();
    drop(flow);

    let client = demo_client();
    let reopened = RegistrationFlow::open(client.clone(), store).await.unwrap();

    assert_eq!(reopened.step(), FlowStep::Registered);
    assert_eq!(client.registration_data().owner_manager_name, "Alice");
    assert_eq!(reopened.check_access(Page::Otp), PageAccess::Allowed);
}

#[tokio::test]
async fn test_file_store_resumes_registration() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let mut flow = RegistrationFlow::open(demo_client(), SessionStore::file(&path))
        .await
        .unwrap();
    flow.register("Alice", "Warehouse A", "0712345678")
        .await
        .unwrap();
    flow.verify_otp("1234").await.unwrap();

    let mut resumed = RegistrationFlow::open(demo_client(), SessionStore::file(&path))
        .await
        .unwrap();
    assert_eq!(resumed.step(), FlowStep::OtpVerified);

    let (outcome, _) = resumed
        .complete_registration(&secret("secret1"), &secret("secret1"))
        .await
        .unwrap();
    assert_eq!(outcome, FlowOutcome::PasswordSet);
}

#[tokio::test]
async fn test_guarded_steps_require_earlier_steps() {
    let sink = Arc::new(RecordingSink::default());
    let client = demo_client().with_presentation(sink.clone());
    let mut flow = RegistrationFlow::open(client, SessionStore::memory())
        .await
        .unwrap();

    let err = flow.verify_otp("1234").await.unwrap_err();
    match err {
        FlowError::SessionRequired { redirect, message } => {
            assert_eq!(redirect, Page::Signup);
            assert_eq!(
                message,
                "Please start the registration process from the beginning."
            );
        }
        other => panic!("unexpected error: {:?}", other),
    }

    let err = flow
        .reset_password(&secret("secret1"), &secret("secret1"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        FlowError::SessionRequired {
            redirect: Page::ForgotPassword,
            ..
        }
    ));

    assert!(sink
        .events()
        .iter()
        .any(|e| e.starts_with("Warning: Please start the registration")));
}

#[tokio::test]
async fn test_invalid_phone_is_rejected_before_any_call() {
    let sink = Arc::new(RecordingSink::default());
    let client = demo_client().with_presentation(sink.clone());
    let mut flow = RegistrationFlow::open(client, SessionStore::memory())
        .await
        .unwrap();

    let err = flow
        .register("Alice", "Warehouse A", "12345")
        .await
        .unwrap_err();

    assert!(matches!(err, FlowError::InvalidPhoneNumber(_)));
    assert!(flow.record().is_empty());
    assert!(sink.events().is_empty());
}

#[tokio::test]
async fn test_calls_are_bracketed_by_loading_events() {
    let sink = Arc::new(RecordingSink::default());
    let client = demo_client().with_presentation(sink.clone());
    let mut flow = RegistrationFlow::open(client, SessionStore::memory())
        .await
        .unwrap();

    flow.register("Alice", "Warehouse A", "0712345678")
        .await
        .unwrap();

    let events = sink.events();
    assert_eq!(events[0], "loading register true");
    assert_eq!(events[1], "loading register false");
    assert_eq!(events[2], "Success: Verification code sent to your phone.");
}

#[tokio::test]
async fn test_back_navigation_with_confirmation() {
    let mut flow = RegistrationFlow::open(demo_client(), SessionStore::memory())
        .await
        .unwrap();
    flow.register("Alice", "Warehouse A", "0712345678")
        .await
        .unwrap();

    let kept = flow.go_back(Page::Otp, &Answer(false)).await.unwrap();
    assert_eq!(kept, BackNavigation::Cancelled);
    assert_eq!(flow.step(), FlowStep::Registered);

    let left = flow.go_back(Page::Otp, &Answer(true)).await.unwrap();
    assert_eq!(left, BackNavigation::Proceed);
    assert!(flow.record().is_empty());
}

#[tokio::test]
async fn test_password_recovery_in_demo_mode() {
    let mut flow = RegistrationFlow::open(demo_client(), SessionStore::memory())
        .await
        .unwrap();

    flow.forgot_password("0712345678").await.unwrap();
    assert_eq!(flow.step(), FlowStep::RecoveryRequested);
    assert_eq!(flow.record().recovery_phone(), Some("+255712345678"));

    assert!(flow.verify_recovery_otp("9999").await.is_err());
    assert_eq!(flow.step(), FlowStep::RecoveryRequested);

    let verified = flow.verify_recovery_otp("1234").await.unwrap();
    assert!(verified.data.reset_token.is_some());
    assert_eq!(flow.step(), FlowStep::RecoveryVerified);

    let (outcome, data) = flow
        .reset_password(&secret("newpass1"), &secret("newpass1"))
        .await
        .unwrap();
    assert_eq!(outcome, FlowOutcome::PasswordReset);
    assert_eq!(data.phone.as_deref(), Some("+255712345678"));
    assert!(flow.record().is_empty());
}

#[tokio::test]
async fn test_login_and_logout() {
    let mut flow = RegistrationFlow::open(demo_client(), SessionStore::memory())
        .await
        .unwrap();

    let err = flow
        .login("0712345678", &secret("abc"))
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Authentication failed. Please try again.");
    assert!(flow.record().auth.is_none());

    flow.login("0712345678", &secret("secret1")).await.unwrap();
    assert_eq!(flow.check_access(Page::Dashboard), PageAccess::Allowed);
    assert!(flow.client().registration_data().is_empty());

    assert!(flow.logout().await.unwrap());
    assert!(!flow.logout().await.unwrap());
    assert!(matches!(
        flow.check_access(Page::Dashboard),
        PageAccess::Redirect { to: Page::Login, .. }
    ));
}

#[tokio::test]
async fn test_live_rejection_does_not_advance() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": false,
            "message": "Phone number already registered"
        })))
        .mount(&server)
        .await;

    let config = ClientConfig {
        base_url: format!("{}/api", server.uri()),
        simulated_latency: Duration::ZERO,
        ..Default::default()
    };
    let client = VelaaClient::new(&config).unwrap();
    let mut flow = RegistrationFlow::open(client, SessionStore::memory())
        .await
        .unwrap();

    let err = flow
        .register("Alice", "Warehouse A", "0712345678")
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Phone number already registered");
    assert_eq!(flow.step(), FlowStep::Start);
    assert_eq!(flow.client().mode(), ClientMode::Live);
}

#[tokio::test]
async fn test_unreachable_backend_falls_back_once() {
    let sink = Arc::new(RecordingSink::default());
    let config = ClientConfig {
        base_url: "http://127.0.0.1:1/api".into(),
        timeout: Duration::from_secs(2),
        simulated_latency: Duration::ZERO,
        demo_mode: false,
    };
    let client = VelaaClient::new(&config)
        .unwrap()
        .with_presentation(sink.clone());
    let mut flow = RegistrationFlow::open(client, SessionStore::memory())
        .await
        .unwrap();

    flow.register("Alice", "Warehouse A", "0712345678")
        .await
        .unwrap();
    flow.verify_otp("1234").await.unwrap();

    assert_eq!(flow.client().mode(), ClientMode::Simulated);
    let warnings = sink
        .events()
        .into_iter()
        .filter(|e| e == "Warning: Backend server not available. Running in demo mode.")
        .count();
    assert_eq!(warnings, 1);
}

#[tokio::test]
async fn test_rejected_signup_keeps_pending_registration() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .and(body_partial_json(serde_json::json!({"phone": "+255712345678"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "data": {"userId": "u-alice", "nextStep": "verify-otp"}
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .and(body_partial_json(serde_json::json!({"phone": "+255754000111"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": false,
            "message": "Phone number already registered"
        })))
        .mount(&server)
        .await;

    let config = ClientConfig {
        base_url: format!("{}/api", server.uri()),
        simulated_latency: Duration::ZERO,
        ..Default::default()
    };
    let store = SessionStore::memory();
    let mut flow = RegistrationFlow::open(VelaaClient::new(&config).unwrap(), store.clone())
        .await
        .unwrap();

    flow.register("Alice", "Warehouse A", "0712345678")
        .await
        .unwrap();
    let err = flow
        .register("Bob", "Warehouse B", "0754000111")
        .await
        .unwrap_err();
    assert!(matches!(err, FlowError::Rejected(_)));

    let saved = store.load().await.unwrap();
    let pending = saved.registration.clone().unwrap();
    assert_eq!(saved.step, FlowStep::Registered);
    assert_eq!(pending.phone, "+255712345678");
    assert_eq!(pending.owner_manager_name, "Alice");
    assert_eq!(pending.user_id.as_deref(), Some("u-alice"));
    assert_eq!(flow.record().registration.as_ref(), Some(&pending));
    assert_eq!(flow.client().registration_data(), pending);
}

#[tokio::test]
async fn test_logout_of_last_state_removes_session_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let mut flow = RegistrationFlow::open(demo_client(), SessionStore::file(&path))
        .await
        .unwrap();
    flow.login("0712345678", &secret("secret1")).await.unwrap();
    assert!(path.exists());

    assert!(flow.logout().await.unwrap());
    assert!(!path.exists());
    assert!(flow.record().is_empty());
}
