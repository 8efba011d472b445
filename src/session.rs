//! Per-process session state.
//!
//! A [`Session`] carries the identity principal supplied by the external
//! identity provider and the vault-unlocked flag. It is an explicit value
//! passed to every operation that needs it — there is no global. The
//! unlocked flag lives only for the lifetime of this value and is never
//! written to durable storage.

/// The caller's identity and vault state for one client session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    principal: Option<String>,
    vault_unlocked: bool,
}

impl Session {
    /// A session with an active identity. The vault starts locked.
    pub fn authenticated(principal: impl Into<String>) -> Self {
        Self {
            principal: Some(principal.into()),
            vault_unlocked: false,
        }
    }

    /// A session with no identity. Storage operations will refuse it.
    pub fn anonymous() -> Self {
        Self {
            principal: None,
            vault_unlocked: false,
        }
    }

    pub fn principal(&self) -> Option<&str> {
        self.principal.as_deref()
    }

    pub fn vault_unlocked(&self) -> bool {
        self.vault_unlocked
    }

    /// Mark the vault unlocked for the remainder of this session.
    pub fn unlock_vault(&mut self) {
        self.vault_unlocked = true;
    }

    pub fn lock_vault(&mut self) {
        self.vault_unlocked = false;
    }
}
