// tests/identity_tests.rs
mod common;

use common::*;
use std::sync::Arc;
use storefront::errors::AppError;
use storefront::models::Role;
use storefront::services::{AuthEventKind, IdentityProvider, SessionIdentity};
use storefront::store::{DataStore, MemoryStore};

fn identity(store: Arc<MemoryStore>) -> SessionIdentity {
  let dyn_store: Arc<dyn DataStore> = store;
  SessionIdentity::new(dyn_store, 6, Some("Admin@Shop.test".to_string()))
}

#[tokio::test]
async fn test_sign_up_sign_in_sign_out() {
  setup_tracing();
  let store = Arc::new(MemoryStore::new());
  let identity = identity(store.clone());

  let signed_up = identity.sign_up("  Shopper@Example.com ", "secret1").await.unwrap();
  assert_eq!(signed_up.email, "shopper@example.com");
  assert_eq!(identity.session(&signed_up.token), Some(signed_up.clone()));
  assert_eq!(identity.role_of(signed_up.user_id).await.unwrap(), Role::Customer);
  assert!(store.get_profile(signed_up.user_id).await.unwrap().is_some());

  let signed_in = identity.sign_in("shopper@example.com", "secret1").await.unwrap();
  assert_eq!(signed_in.user_id, signed_up.user_id);
  assert_ne!(signed_in.token, signed_up.token);
  assert_eq!(identity.active_sessions(), 2);

  identity.sign_out(&signed_up.token).await.unwrap();
  assert!(identity.session(&signed_up.token).is_none());
  assert!(identity.session(&signed_in.token).is_some());
  assert!(matches!(identity.sign_out(&signed_up.token).await, Err(AppError::Auth(_))));
}

#[tokio::test]
async fn test_rejected_credentials() {
  setup_tracing();
  let store = Arc::new(MemoryStore::new());
  let identity = identity(store);
  identity.sign_up("shopper@example.com", "secret1").await.unwrap();

  let duplicate = identity.sign_up("SHOPPER@example.com", "another1").await;
  assert!(matches!(duplicate, Err(AppError::Validation(_))));

  match identity.sign_up("new@example.com", "abc").await {
    Err(AppError::Validation(m)) => assert_eq!(m, "Password must be at least 6 characters long."),
    other => panic!("Expected validation error, got {:?}", other),
  }
  assert!(matches!(
    identity.sign_up("not-an-email", "secret1").await,
    Err(AppError::Validation(_))
  ));

  match identity.sign_in("shopper@example.com", "wrong-pass").await {
    Err(AppError::Auth(m)) => assert_eq!(m, "Invalid email or password."),
    other => panic!("Expected auth error, got {:?}", other),
  }
  assert!(matches!(
    identity.sign_in("nobody@example.com", "secret1").await,
    Err(AppError::Auth(_))
  ));
}

#[tokio::test]
async fn test_bootstrap_email_becomes_admin() {
  setup_tracing();
  let store = Arc::new(MemoryStore::new());
  let identity = identity(store);

  let admin = identity.sign_up("admin@shop.test", "secret1").await.unwrap();
  assert_eq!(identity.role_of(admin.user_id).await.unwrap(), Role::Admin);

  let customer = identity.sign_up("someone@shop.test", "secret1").await.unwrap();
  assert_eq!(identity.role_of(customer.user_id).await.unwrap(), Role::Customer);
}

#[tokio::test]
async fn test_auth_events_follow_session_changes() {
  setup_tracing();
  let store = Arc::new(MemoryStore::new());
  let identity = identity(store);
  let mut events = identity.subscribe();

  let session = identity.sign_up("shopper@example.com", "secret1").await.unwrap();
  identity.sign_out(&session.token).await.unwrap();
  let again = identity.sign_in("shopper@example.com", "secret1").await.unwrap();

  let first = events.recv().await.unwrap();
  assert_eq!(first.kind, AuthEventKind::SignedUp);
  assert_eq!(first.session, Some(session));

  let second = events.recv().await.unwrap();
  assert_eq!(second.kind, AuthEventKind::SignedOut);
  assert!(second.session.is_none());

  let third = events.recv().await.unwrap();
  assert_eq!(third.kind, AuthEventKind::SignedIn);
  assert_eq!(third.session.map(|s| s.token), Some(again.token));
}
