// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the tokengate project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! End-to-end admission, refresh and logout scenarios

mod common;

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use tokengate::auth::jwt::verify;
use tokengate::auth::session::SessionStore;
use tokengate::auth::{
    AuthError, AuthGate, MemorySessionStore, SessionFlow, TokenKind, TokenLifecycle,
};
use tokengate::users::{MemoryUserStore, UserRecord};

struct Harness {
    store: Arc<MemorySessionStore>,
    users: Arc<MemoryUserStore>,
    gate: AuthGate,
    flow: SessionFlow,
}

fn harness() -> Harness {
    common::setup();
    let keys = common::test_keys();
    let store = Arc::new(MemorySessionStore::new());
    let users = Arc::new(MemoryUserStore::new());

    let lifecycle = TokenLifecycle::new(keys.clone(), store.clone(), common::test_policy());
    let gate = AuthGate::new(keys.clone(), store.clone(), users.clone());
    let flow = SessionFlow::new(keys, store.clone(), users.clone(), lifecycle);

    Harness {
        store,
        users,
        gate,
        flow,
    }
}

fn seed_user(users: &MemoryUserStore) -> UserRecord {
    let user = UserRecord {
        id: Uuid::new_v4(),
        email: "ada@example.com".to_string(),
        name: "Ada".to_string(),
        provider: None,
        provider_id: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    users.insert(user.clone());
    user
}

#[tokio::test]
async fn test_full_session_scenario() {
    let h = harness();
    let user = seed_user(&h.users);

    // Login: issue access + refresh.
    let session = h
        .flow
        .lifecycle()
        .issue(user.id, TokenKind::Both)
        .await
        .unwrap();
    let access = session.access.unwrap();
    let cookie = session.refresh_cookie.unwrap();

    // Admission with the access token.
    let principal = h
        .gate
        .authenticate(Some(&format!("Bearer {}", access.compact)))
        .await
        .unwrap();
    assert_eq!(principal.user_id, user.id);
    assert_eq!(principal.token_id, access.token_id);

    // Logout revokes both allow-list entries.
    let outcome = h.flow.logout(&principal, Some(&cookie.value)).await.unwrap();
    assert!(outcome.clear_cookies.contains(&"refresh_token"));
    assert!(h.store.is_empty());

    // The still cryptographically valid access token is now dead.
    let rejected = h
        .gate
        .authenticate(Some(&format!("Bearer {}", access.compact)))
        .await
        .unwrap_err();
    assert!(matches!(rejected, AuthError::SessionNotFound));

    // So is the refresh cookie.
    let rejected = h.flow.refresh(Some(&cookie.value)).await.unwrap_err();
    assert!(matches!(rejected, AuthError::SessionNotFound));
}

#[tokio::test]
async fn test_missing_or_empty_bearer_header() {
    let h = harness();

    assert!(matches!(
        h.gate.authenticate(None).await,
        Err(AuthError::TokenMissing)
    ));
    assert!(matches!(
        h.gate.authenticate(Some("")).await,
        Err(AuthError::TokenMissing)
    ));
}

#[tokio::test]
async fn test_garbage_token_is_one_uniform_rejection() {
    let h = harness();

    let err = h
        .gate
        .authenticate(Some("Bearer not.a.token"))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::TokenVerification));
    assert_eq!(err.status_code(), 401);
}

#[tokio::test]
async fn test_refresh_class_token_rejected_at_the_gate() {
    let h = harness();
    let user = seed_user(&h.users);

    let session = h
        .flow
        .lifecycle()
        .issue(user.id, TokenKind::Refresh)
        .await
        .unwrap();
    let cookie = session.refresh_cookie.unwrap();

    // A refresh-class token presented as a bearer token must not pass,
    // even though it is valid, allow-listed and owned by a real user.
    let err = h
        .gate
        .authenticate(Some(&format!("Bearer {}", cookie.value)))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::TokenVerification));
}

#[tokio::test]
async fn test_unknown_subject_is_rejected() {
    let h = harness();

    // No user seeded: token verifies and is allow-listed, but nobody owns it.
    let ghost = Uuid::new_v4();
    let session = h
        .flow
        .lifecycle()
        .issue(ghost, TokenKind::Access)
        .await
        .unwrap();
    let access = session.access.unwrap();

    let err = h
        .gate
        .authenticate(Some(&format!("Bearer {}", access.compact)))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::UserNotFound));
    assert_eq!(err.status_code(), 404);
}

#[tokio::test]
async fn test_mismatched_allow_list_entry_is_rejected() {
    let h = harness();
    let user = seed_user(&h.users);

    let session = h
        .flow
        .lifecycle()
        .issue(user.id, TokenKind::Access)
        .await
        .unwrap();
    let access = session.access.unwrap();

    // Overwrite the entry with a different owner: the integrity check
    // must refuse to accept mere existence.
    h.store
        .register(access.token_id, Uuid::new_v4(), 15)
        .await
        .unwrap();

    let err = h
        .gate
        .authenticate(Some(&format!("Bearer {}", access.compact)))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::SessionMismatch));
    assert_eq!(err.status_code(), 401);
}

#[tokio::test]
async fn test_refresh_issues_a_working_access_token() {
    let h = harness();
    let user = seed_user(&h.users);
    let keys = common::test_keys();

    let session = h
        .flow
        .lifecycle()
        .issue(user.id, TokenKind::Both)
        .await
        .unwrap();
    let cookie = session.refresh_cookie.unwrap();

    let refreshed = h.flow.refresh(Some(&cookie.value)).await.unwrap();
    let access = refreshed.access.expect("refresh produces an access token");
    assert!(refreshed.refresh_cookie.is_none());

    let claims = verify(&access.compact, &keys.access.decoding).unwrap();
    assert_eq!(claims.sub, user.id.to_string());

    let principal = h
        .gate
        .authenticate(Some(&format!("Bearer {}", access.compact)))
        .await
        .unwrap();
    assert_eq!(principal.user_id, user.id);
}

#[tokio::test]
async fn test_refresh_rejects_access_class_cookie() {
    let h = harness();
    let user = seed_user(&h.users);

    let session = h
        .flow
        .lifecycle()
        .issue(user.id, TokenKind::Access)
        .await
        .unwrap();
    let access = session.access.unwrap();

    let err = h.flow.refresh(Some(&access.compact)).await.unwrap_err();
    assert!(matches!(err, AuthError::TokenVerification));
}

#[tokio::test]
async fn test_refresh_with_missing_cookie() {
    let h = harness();
    assert!(matches!(
        h.flow.refresh(None).await,
        Err(AuthError::TokenMissing)
    ));
}

#[tokio::test]
async fn test_user_deleted_after_issuance() {
    let h = harness();
    let user = seed_user(&h.users);

    let session = h
        .flow
        .lifecycle()
        .issue(user.id, TokenKind::Access)
        .await
        .unwrap();
    let access = session.access.unwrap();
    h.users.remove(user.id);

    let err = h
        .gate
        .authenticate(Some(&format!("Bearer {}", access.compact)))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::UserNotFound));
}
