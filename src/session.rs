//! The signed in user's session, shared explicitly between the components that need it.
//!
//! A session is created when the user logs in and cleared when they log out or
//! when the API rejects the session token.

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::{Error, models::UserId};

/// The fields identifying a signed in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// The bearer token sent with every API request.
    pub token: String,
    #[serde(alias = "id")]
    pub user_id: UserId,
    #[serde(default, alias = "name")]
    pub user_name: String,
    #[serde(default, alias = "photo")]
    pub user_photo: Option<String>,
}

/// A cloneable handle to the current session.
///
/// Clones share the same session, so clearing the session through one handle
/// clears it for every component holding a clone.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    session: Arc<RwLock<Option<Session>>>,
}

impl SessionContext {
    /// Create a context with no session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context that already holds `session`.
    pub fn with_session(session: Session) -> Self {
        let context = Self::new();
        context.init(session);
        context
    }

    /// Start a session, replacing any existing one.
    pub fn init(&self, session: Session) {
        tracing::info!(user_id = session.user_id, "Session started");

        match self.session.write() {
            Ok(mut guard) => *guard = Some(session),
            Err(poisoned) => *poisoned.into_inner() = Some(session),
        }
    }

    /// End the current session, if there is one.
    pub fn clear(&self) {
        let previous = match self.session.write() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };

        if let Some(session) = previous {
            tracing::info!(user_id = session.user_id, "Session cleared");
        }
    }

    /// A copy of the current session.
    pub fn current(&self) -> Option<Session> {
        match self.session.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.current().is_some()
    }

    /// The bearer token of the current session.
    pub fn token(&self) -> Option<String> {
        self.current().map(|session| session.token)
    }

    /// The ID of the signed in user.
    ///
    /// # Errors
    /// Returns [Error::NotSignedIn] if there is no session.
    pub fn user_id(&self) -> Result<UserId, Error> {
        self.current()
            .map(|session| session.user_id)
            .ok_or(Error::NotSignedIn)
    }
}

#[cfg(test)]
mod tests {
    use crate::Error;

    use super::{Session, SessionContext};

    fn session() -> Session {
        Session {
            token: "abc".to_owned(),
            user_id: 7,
            user_name: "Asha".to_owned(),
            user_photo: None,
        }
    }

    #[test]
    fn new_context_is_signed_out() {
        let context = SessionContext::new();

        assert!(!context.is_signed_in());
        assert_eq!(context.token(), None);
        assert_eq!(context.user_id(), Err(Error::NotSignedIn));
    }

    #[test]
    fn init_then_clear() {
        let context = SessionContext::new();

        context.init(session());
        assert_eq!(context.user_id(), Ok(7));
        assert_eq!(context.token().as_deref(), Some("abc"));

        context.clear();
        assert_eq!(context.current(), None);
    }

    #[test]
    fn clones_share_the_session() {
        let context = SessionContext::with_session(session());
        let clone = context.clone();

        clone.clear();

        assert!(!context.is_signed_in());
    }
}
