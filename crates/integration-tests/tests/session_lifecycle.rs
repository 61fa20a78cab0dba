//! Session store round trips and the login/logout flow over the shared in-memory store.

use std::sync::Arc;

use domains::{ClientError, Credentials, KeyValueStore, Method, UserId};
use integration_tests::{auth, client_with, script_login, ScriptedTransport};
use secrecy::ExposeSecret;
use services::SessionStore;
use storage_adapters::MemoryStore;
use tokio_test::{assert_err, assert_ok};

fn creds() -> Credentials {
    Credentials {
        username: "ana".into(),
        password: "pw".into(),
    }
}

#[test]
fn set_then_clear_round_trip() {
    let store = Arc::new(MemoryStore::new());
    let session = SessionStore::new(store.clone());

    session.set_session("t-1", UserId::from("u-1"));
    assert_eq!(session.token().unwrap().expose_secret(), "t-1");
    assert_eq!(session.user_id(), Some(UserId::from("u-1")));
    assert!(session.is_authenticated());

    session.clear_session();
    assert!(session.token().is_none());
    assert!(session.user_id().is_none());
    assert!(!session.is_authenticated());
    assert!(store.is_empty());
}

#[test]
fn every_handle_sees_the_same_session() {
    let store = Arc::new(MemoryStore::new());
    let writer = SessionStore::new(store.clone());
    let reader = SessionStore::new(store);

    writer.set_session("t-2", UserId::from(2));
    assert_eq!(reader.user_id(), Some(UserId::from(2)));

    reader.clear_session();
    assert!(!writer.is_authenticated());
}

#[test]
fn login_stores_token_and_user_id_together() {
    let transport = ScriptedTransport::new();
    script_login(&transport);
    let store = Arc::new(MemoryStore::new());
    let client = client_with(transport.clone(), store.clone());

    let login = tokio_test::block_on(client.auth().login(&creds()));
    let login = assert_ok!(login);
    assert_eq!(login.user_id, Some(UserId::from(7)));

    assert_eq!(store.get("token").as_deref(), Some("jwt-7"));
    assert_eq!(store.get("userId").as_deref(), Some("7"));
    assert_eq!(store.get("isAuthenticated").as_deref(), Some("true"));

    let sent = transport.requests();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].header("Authorization").is_none());
    assert_eq!(sent[0].body.as_ref().unwrap()["username"], "ana");
}

#[test]
fn rejected_login_leaves_previous_session_alone() {
    let transport = ScriptedTransport::new();
    transport.on(
        Method::Post,
        auth("/login"),
        400,
        r#"{"success":false,"message":"Identifiants invalides"}"#,
    );
    let store = Arc::new(MemoryStore::new());
    let client = client_with(transport, store);
    client.session().set_session("old", UserId::from(1));

    let err = assert_err!(tokio_test::block_on(client.auth().login(&creds())));
    assert_eq!(err, ClientError::LoginRejected("Identifiants invalides".into()));
    assert_eq!(client.session().token().unwrap().expose_secret(), "old");
}

#[tokio::test]
async fn logout_then_check_needs_no_network() {
    let transport = ScriptedTransport::new();
    script_login(&transport);
    let client = client_with(transport.clone(), Arc::new(MemoryStore::new()));

    client.auth().login(&creds()).await.unwrap();
    client.auth().logout();

    assert_eq!(client.auth().check_session().await, Err(ClientError::MissingIdentity));
    assert_eq!(transport.count(Method::Get, auth("/check")), 0);
}

#[tokio::test]
async fn check_sends_the_bearer_token() {
    let transport = ScriptedTransport::new();
    script_login(&transport);
    transport.on(Method::Get, auth("/check"), 200, "");
    let client = client_with(transport.clone(), Arc::new(MemoryStore::new()));

    client.auth().login(&creds()).await.unwrap();
    client.auth().check_session().await.unwrap();

    let check = transport.requests().pop().unwrap();
    assert_eq!(check.url, auth("/check"));
    assert_eq!(check.header("authorization"), Some("Bearer jwt-7"));
}
