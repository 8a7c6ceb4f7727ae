// storefront/src/services/identity.rs

//! Sign-up, sign-in and bearer sessions.
//!
//! Credentials and profiles live in the [`DataStore`]; sessions are held in
//! process. Every sign-up, sign-in and sign-out is broadcast as an
//! [`AuthEvent`] carrying the session that is current afterwards.

use crate::errors::{AppError, Result};
use crate::models::{Profile, Role};
use crate::services::auth_service;
use crate::store::DataStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{info, instrument, warn};
use uuid::Uuid;

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
  pub token: String,
  pub user_id: Uuid,
  pub email: String,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthEventKind {
  SignedUp,
  SignedIn,
  SignedOut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthEvent {
  pub kind: AuthEventKind,
  /// `None` after a sign-out.
  pub session: Option<Session>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
  async fn sign_up(&self, email: &str, password: &str) -> Result<Session>;
  async fn sign_in(&self, email: &str, password: &str) -> Result<Session>;
  async fn sign_out(&self, token: &str) -> Result<()>;
  fn session(&self, token: &str) -> Option<Session>;
  async fn role_of(&self, user_id: Uuid) -> Result<Role>;
  fn subscribe(&self) -> broadcast::Receiver<AuthEvent>;
}

pub struct SessionIdentity {
  store: Arc<dyn DataStore>,
  sessions: RwLock<HashMap<String, Session>>,
  events: broadcast::Sender<AuthEvent>,
  min_password_len: usize,
  bootstrap_admin_email: Option<String>,
}

impl SessionIdentity {
  pub fn new(store: Arc<dyn DataStore>, min_password_len: usize, bootstrap_admin_email: Option<String>) -> Self {
    let (events, _) = broadcast::channel(EVENT_CAPACITY);
    Self {
      store,
      sessions: RwLock::new(HashMap::new()),
      events,
      min_password_len,
      bootstrap_admin_email: bootstrap_admin_email.map(|e| e.trim().to_lowercase()),
    }
  }

  fn open_session(&self, user_id: Uuid, email: String, kind: AuthEventKind) -> Session {
    let session = Session {
      token: auth_service::new_session_token(),
      user_id,
      email,
      created_at: Utc::now(),
    };
    self.sessions.write().insert(session.token.clone(), session.clone());
    self.publish(kind, Some(session.clone()));
    session
  }

  fn publish(&self, kind: AuthEventKind, session: Option<Session>) {
    // No subscribers is not an error.
    let _ = self.events.send(AuthEvent { kind, session });
  }

  pub fn active_sessions(&self) -> usize {
    self.sessions.read().len()
  }
}

#[async_trait]
impl IdentityProvider for SessionIdentity {
  #[instrument(name = "identity::sign_up", skip(self, password), err(Display))]
  async fn sign_up(&self, email: &str, password: &str) -> Result<Session> {
    let email = auth_service::validate_credentials(email, password, self.min_password_len)?;
    if self.store.find_user_by_email(&email).await?.is_some() {
      warn!("Attempt to sign up with existing email.");
      return Err(AppError::Validation(
        "An account with this email already exists.".to_string(),
      ));
    }

    let password_hash = auth_service::hash_password(password)?;
    let user = self.store.create_user(&email, &password_hash).await?;

    let role = match &self.bootstrap_admin_email {
      Some(admin_email) if *admin_email == user.email => Role::Admin,
      _ => Role::Customer,
    };
    self.store.upsert_profile(Profile::new(user.id, role)).await?;
    info!(user_id = %user.id, ?role, "User signed up.");

    Ok(self.open_session(user.id, user.email, AuthEventKind::SignedUp))
  }

  #[instrument(name = "identity::sign_in", skip(self, password), err(Display))]
  async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
    let invalid = || AppError::Auth("Invalid email or password.".to_string());
    let user = self
      .store
      .find_user_by_email(email.trim())
      .await?
      .ok_or_else(invalid)?;
    if !auth_service::verify_password(&user.password_hash, password)? {
      warn!(user_id = %user.id, "Wrong password.");
      return Err(invalid());
    }
    info!(user_id = %user.id, "User signed in.");
    Ok(self.open_session(user.id, user.email, AuthEventKind::SignedIn))
  }

  async fn sign_out(&self, token: &str) -> Result<()> {
    let removed = self.sessions.write().remove(token);
    match removed {
      Some(session) => {
        info!(user_id = %session.user_id, "User signed out.");
        self.publish(AuthEventKind::SignedOut, None);
        Ok(())
      }
      None => Err(AppError::Auth("Session not found or already ended.".to_string())),
    }
  }

  fn session(&self, token: &str) -> Option<Session> {
    self.sessions.read().get(token).cloned()
  }

  async fn role_of(&self, user_id: Uuid) -> Result<Role> {
    Ok(
      self
        .store
        .get_profile(user_id)
        .await?
        .map(|p| p.role)
        .unwrap_or_default(),
    )
  }

  fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
    self.events.subscribe()
  }
}
