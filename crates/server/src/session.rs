//! The Session Store at the HTTP boundary.
//!
//! Two backends sit behind one interface. In cookie mode the signed cookie
//! value *is* the store: the whole document rides back and forth, and the
//! signature makes it tamper-evident despite round-tripping through the
//! client. In store mode the cookie carries only a signed learner id and the
//! documents live in server-side rows.

use std::sync::Arc;

use axum_extra::extract::SignedCookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::{DateTime, Utc};
use math_core::Clock;
use math_core::model::{LearnerId, SessionState};
use storage::codec::{decode_state, encode_state};
use storage::repository::{SessionStore, StorageError};

/// Cookie holding the whole session document (cookie mode).
pub const SESSION_COOKIE: &str = "math-adventure-session";

/// Cookie holding only the learner id (store mode).
pub const LEARNER_COOKIE: &str = "math-adventure-learner";

/// Rolling expiry, re-stamped on every write.
pub const SESSION_MAX_AGE_DAYS: i64 = 30;

#[derive(Clone)]
enum Backend {
    Cookie,
    Store(Arc<dyn SessionStore>),
}

#[derive(Clone)]
pub struct SessionLayer {
    backend: Backend,
    clock: Clock,
}

fn persistent_cookie(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::days(SESSION_MAX_AGE_DAYS))
        .build()
}

// Removal only matches when the path lines up with the original cookie.
fn removal_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build(name).path("/").build()
}

fn learner_from(jar: &SignedCookieJar) -> Option<LearnerId> {
    jar.get(LEARNER_COOKIE)?.value().parse().ok()
}

impl SessionLayer {
    #[must_use]
    pub fn cookie(clock: Clock) -> Self {
        Self {
            backend: Backend::Cookie,
            clock,
        }
    }

    #[must_use]
    pub fn store(clock: Clock, store: Arc<dyn SessionStore>) -> Self {
        Self {
            backend: Backend::Store(store),
            clock,
        }
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// The learner's current document. Missing or unparsable cookies degrade
    /// to the default document, never to an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` only for server-side backend failures.
    pub async fn read(&self, jar: &SignedCookieJar) -> Result<SessionState, StorageError> {
        match &self.backend {
            Backend::Cookie => Ok(jar
                .get(SESSION_COOKIE)
                .map(|cookie| decode_state(cookie.value()))
                .unwrap_or_default()),
            Backend::Store(store) => match learner_from(jar) {
                Some(learner) => store.load(learner).await,
                None => Ok(SessionState::default()),
            },
        }
    }

    /// Stamp `lastActive` and persist the document, returning the jar with
    /// whatever cookie the backend needs re-issued (the 30-day expiry rolls
    /// on every write).
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the document cannot be encoded or stored.
    pub async fn write(
        &self,
        jar: SignedCookieJar,
        state: &mut SessionState,
    ) -> Result<SignedCookieJar, StorageError> {
        state.last_active = self.clock.now();

        match &self.backend {
            Backend::Cookie => {
                let encoded = encode_state(state)?;
                Ok(jar.add(persistent_cookie(SESSION_COOKIE, encoded)))
            }
            Backend::Store(store) => {
                let learner = learner_from(&jar).unwrap_or_else(LearnerId::generate);
                store.save(learner, state).await?;
                // The learner cookie is re-issued even when it already
                // exists, so the 30-day expiry rolls here too.
                Ok(jar.add(persistent_cookie(LEARNER_COOKIE, learner.to_string())))
            }
        }
    }

    /// Destroy the stored document; subsequent reads yield defaults.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if a server-side row cannot be deleted.
    pub async fn reset(&self, jar: SignedCookieJar) -> Result<SignedCookieJar, StorageError> {
        match &self.backend {
            Backend::Cookie => Ok(jar.remove(removal_cookie(SESSION_COOKIE))),
            Backend::Store(store) => {
                if let Some(learner) = learner_from(&jar) {
                    store.reset(learner).await?;
                }
                Ok(jar.remove(removal_cookie(LEARNER_COOKIE)))
            }
        }
    }
}
