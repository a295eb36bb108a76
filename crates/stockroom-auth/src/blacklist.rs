//! In-memory revocation store for self-issued tokens.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

/// Revoked-token set plus the currently active token per user.
///
/// Concurrency contract: every method takes the lock exactly once, so each
/// call is atomic and read-your-writes. [`set_active_token`] revokes the
/// previous active token and installs the new one under a single write
/// lock; two concurrent logins for the same user may still each revoke the
/// other's token, which is benign — the losing session authenticates again.
///
/// Contents are process-local and lost on restart. Accepted for this
/// system; this is not a durable revocation list.
#[derive(Debug, Default)]
pub struct TokenBlacklist {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    revoked: HashSet<String>,
    active_by_user: HashMap<String, String>,
}

impl TokenBlacklist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Revoke a token outright.
    pub fn revoke(&self, token: &str) {
        let mut inner = self.inner.write().expect("token blacklist lock poisoned");
        inner.revoked.insert(token.to_owned());
    }

    pub fn is_revoked(&self, token: &str) -> bool {
        let inner = self.inner.read().expect("token blacklist lock poisoned");
        inner.revoked.contains(token)
    }

    /// Record `token` as the user's single active token, revoking whichever
    /// token held that slot before.
    pub fn set_active_token(&self, username: &str, token: &str) {
        let mut inner = self.inner.write().expect("token blacklist lock poisoned");
        if let Some(old) = inner
            .active_by_user
            .insert(username.to_owned(), token.to_owned())
        {
            inner.revoked.insert(old);
        }
    }

    /// Drop and revoke the user's active token, if any. Used on logout.
    pub fn clear_active_token(&self, username: &str) {
        let mut inner = self.inner.write().expect("token blacklist lock poisoned");
        if let Some(token) = inner.active_by_user.remove(username) {
            inner.revoked.insert(token);
        }
    }

    pub fn active_token(&self, username: &str) -> Option<String> {
        let inner = self.inner.read().expect("token blacklist lock poisoned");
        inner.active_by_user.get(username).cloned()
    }
}
