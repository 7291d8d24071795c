mod common;

use anyhow::Result;
use common::stub::StubServer;
use ephis_admin::auth::Session;
use ephis_admin::client::{DataClient, RestClient};
use ephis_admin::config::BackendConfig;
use ephis_admin::error::ClientError;
use ephis_admin::filter::Filter;
use ephis_admin::record::Record;
use serde_json::json;

fn client(server: &StubServer) -> Result<RestClient> {
    let config = BackendConfig { url: server.url.clone(), anon_key: "anon-key".into(), request_timeout_secs: 5 };
    Ok(RestClient::new(&config)?)
}

fn signed_in(server: &StubServer) -> Result<RestClient> {
    let session = Session {
        access_token: "user-token".into(),
        refresh_token: String::new(),
        expires_at: None,
        user: common::user("u1", json!({})),
    };
    Ok(client(server)?.with_session(Some(session)))
}

#[tokio::test]
async fn password_sign_in_then_scoped_select() -> Result<()> {
    let server = StubServer::start(vec![
        (200, r#"{"access_token":"tok-1","refresh_token":"r-1","expires_at":2000000000,"user":{"id":"u1","email":"u1@ephis.test"}}"#),
        (200, r#"[{"id":"p-1","name":"Westlands Clinic"}]"#),
    ])
    .await?;
    let client = client(&server)?;

    let session = client.sign_in("u1@ephis.test", "secret").await?;
    assert_eq!(session.access_token, "tok-1");
    assert_eq!(session.user.id, "u1");

    let mut filter = Filter::new("premises")?;
    filter.eq("id", "p-1")?.limit(1)?;
    let rows = client.select(&filter).await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get_str("name"), Some("Westlands Clinic"));

    let requests = server.requests();
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].target, "/auth/v1/token?grant_type=password");
    assert_eq!(requests[0].header("apikey"), Some("anon-key"));
    assert_eq!(requests[0].json(), json!({ "email": "u1@ephis.test", "password": "secret" }));

    assert_eq!(requests[1].method, "GET");
    assert_eq!(requests[1].target, "/rest/v1/premises?select=*&id=eq.p-1&limit=1");
    assert_eq!(requests[1].header("apikey"), Some("anon-key"));
    assert_eq!(requests[1].header("authorization"), Some("Bearer tok-1"));
    Ok(())
}

#[tokio::test]
async fn mutations_shape_body_and_row_params() -> Result<()> {
    let server = StubServer::start(vec![(201, ""), (204, ""), (204, "")]).await?;
    let client = signed_in(&server)?;

    let mut payload = Record::new();
    payload.set("name", "Alpha Bakery");
    client.insert("premises", &payload).await?;
    client.update("premises", "p-1", &payload).await?;
    client.delete("premises", "p-1").await?;

    let requests = server.requests();
    assert_eq!(requests.len(), 3);
    for request in &requests {
        assert_eq!(request.header("apikey"), Some("anon-key"));
        assert_eq!(request.header("authorization"), Some("Bearer user-token"));
        assert_eq!(request.header("prefer"), Some("return=minimal"));
    }

    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].target, "/rest/v1/premises");
    assert_eq!(requests[0].json(), json!([{ "name": "Alpha Bakery" }]));

    assert_eq!(requests[1].method, "PATCH");
    assert_eq!(requests[1].target, "/rest/v1/premises?id=eq.p-1");
    assert_eq!(requests[1].json(), json!({ "name": "Alpha Bakery" }));

    assert_eq!(requests[2].method, "DELETE");
    assert_eq!(requests[2].target, "/rest/v1/premises?id=eq.p-1");
    assert!(requests[2].body.is_empty());
    Ok(())
}

#[tokio::test]
async fn error_bodies_map_to_client_errors() -> Result<()> {
    let server = StubServer::start(vec![
        (409, r#"{"code":"23505","message":"duplicate key value violates unique constraint"}"#),
        (500, r#"{"code":"XX000","message":"internal error"}"#),
        (400, r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#),
    ])
    .await?;
    let client = signed_in(&server)?;
    let payload = Record::new();

    let err = client.insert("premises", &payload).await.unwrap_err();
    assert!(matches!(&err, ClientError::Conflict(m) if m == "duplicate key value violates unique constraint"));

    let err = client.delete("premises", "p-1").await.unwrap_err();
    assert!(matches!(&err, ClientError::Backend { status: 500, code: Some(c), .. } if c == "XX000"));
    assert_eq!(err.to_string(), "internal error");

    let err = client.sign_in("u1@ephis.test", "wrong").await.unwrap_err();
    assert!(matches!(&err, ClientError::BadRequest(m) if m == "Invalid login credentials"));
    Ok(())
}

#[tokio::test]
async fn current_user_treats_rejected_token_as_signed_out() -> Result<()> {
    let server = StubServer::start(vec![
        (200, r#"{"id":"u1","email":"u1@ephis.test","user_metadata":{"role":"admin"}}"#),
        (401, r#"{"msg":"JWT expired"}"#),
    ])
    .await?;
    let client = signed_in(&server)?;

    let user = client.current_user().await?.expect("user");
    assert_eq!(user.id, "u1");
    assert!(client.current_user().await?.is_none());

    let requests = server.requests();
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].target, "/auth/v1/user");
    assert_eq!(requests[1].header("authorization"), Some("Bearer user-token"));
    Ok(())
}
