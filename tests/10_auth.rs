mod common;

use anyhow::Result;
use ephis_admin::access::{get_current_user_profile, Role};
use ephis_admin::auth::{logout, require_login, AuthGate, LOGIN_PAGE};
use ephis_admin::client::memory::Operation;
use ephis_admin::client::{DataClient, MemoryClient};
use ephis_admin::ui::{Severity, ToastStack};
use serde_json::json;

#[tokio::test]
async fn gate_redirects_without_session() -> Result<()> {
    let client = common::backend(None);
    let gate = require_login(client.as_ref()).await;
    assert_eq!(gate, AuthGate::Redirect { to: LOGIN_PAGE });
    assert!(gate.user().is_none());
    Ok(())
}

#[tokio::test]
async fn sign_in_then_out_drives_the_gate() -> Result<()> {
    let client = MemoryClient::new();
    let officer = common::user("officer-1", json!({ "role": "officer" }));
    client.add_account("officer-1@ephis.test", "secret", officer.clone());

    assert!(client.sign_in("officer-1@ephis.test", "wrong").await.is_err());
    assert!(matches!(require_login(&client).await, AuthGate::Redirect { .. }));

    let session = client.sign_in("officer-1@ephis.test", "secret").await?;
    assert_eq!(session.user, officer);
    assert_eq!(require_login(&client).await, AuthGate::Authenticated(officer));

    client.sign_out().await?;
    assert!(matches!(require_login(&client).await, AuthGate::Redirect { .. }));
    Ok(())
}

#[tokio::test]
async fn profile_row_is_preferred() -> Result<()> {
    let client = common::backend(Some(common::user("u1", json!({ "role": "admin" }))));
    client.seed_json("profiles", vec![json!({ "id": "u1", "role": "inspector", "ward": "Kilimani", "phone": "0700" })]);

    let profile = get_current_user_profile(client.as_ref()).await.expect("profile");
    assert_eq!(profile.role, Role::Inspector);
    assert_eq!(profile.ward(), Some("Kilimani"));
    assert_eq!(profile.extra.get("phone"), Some(&json!("0700")));
    Ok(())
}

#[tokio::test]
async fn profile_falls_back_to_auth_metadata() -> Result<()> {
    let client = common::backend(Some(common::user("u2", json!({ "role": "officer", "county": "Kiambu" }))));

    let profile = get_current_user_profile(client.as_ref()).await.expect("profile");
    assert_eq!(profile.id, "u2");
    assert_eq!(profile.role, Role::Officer);
    assert_eq!(profile.county(), Some("Kiambu"));

    client.fail_next(Operation::Select, "relation \"profiles\" does not exist");
    let profile = get_current_user_profile(client.as_ref()).await.expect("profile");
    assert_eq!(profile.role, Role::Officer);
    Ok(())
}

#[tokio::test]
async fn no_profile_without_user() -> Result<()> {
    let client = common::backend(None);
    assert!(get_current_user_profile(client.as_ref()).await.is_none());
    Ok(())
}

#[tokio::test]
async fn failed_logout_keeps_session_and_shows_error() -> Result<()> {
    let client = common::backend(Some(common::user("u1", json!({}))));
    client.fail_next(Operation::SignOut, "network unreachable");
    let mut toasts = ToastStack::default();

    assert!(!logout(client.as_ref(), &mut toasts).await);
    let shown = toasts.drain();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].message, "Logout failed: network unreachable");
    assert_eq!(shown[0].severity, Severity::Error);
    assert!(require_login(client.as_ref()).await.user().is_some());

    assert!(logout(client.as_ref(), &mut toasts).await);
    let shown = toasts.drain();
    assert_eq!(shown[0].message, "Signed out");
    assert_eq!(shown[0].severity, Severity::Info);
    assert!(require_login(client.as_ref()).await.user().is_none());
    Ok(())
}
