//! Vault flows: PIN setup validation, digest relay, and the unlock gate.
//!
//! The client never verifies a PIN itself. Setup validates the PIN locally
//! (digits only, minimum length, matching confirmation), then sends only
//! its SHA-256 digest to the storage service; unlocking relays the raw PIN
//! and gates session state on the service's boolean answer. Neither
//! outcome alters the persisted hash, and the unlocked flag never leaves
//! the [`Session`].

use crate::session::Session;
use crate::storage::{Storage, StorageError};
use crate::types::VaultStatus;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Minimum PIN length accepted by the setup flow.
pub const MIN_PIN_DIGITS: usize = 4;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PinError {
    #[error("PIN must be at least {MIN_PIN_DIGITS} digits")]
    TooShort,
    #[error("PIN must contain digits only")]
    NotDigits,
    #[error("PINs do not match")]
    Mismatch,
}

#[derive(Error, Debug)]
pub enum VaultError {
    #[error(transparent)]
    Pin(#[from] PinError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Which flow the client must present for the current vault state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultFlow {
    /// No PIN has ever been stored: offer setup, never unlock.
    Setup,
    /// A PIN exists: offer the unlock prompt.
    Unlock,
}

/// Decide the flow from the service's vault projection.
pub fn required_flow(status: &VaultStatus) -> VaultFlow {
    match status.pin_hash {
        None => VaultFlow::Setup,
        Some(_) => VaultFlow::Unlock,
    }
}

/// Local PIN validation; nothing is transmitted on failure.
pub fn validate_pin(pin: &str) -> Result<(), PinError> {
    if !pin.chars().all(|c| c.is_ascii_digit()) {
        return Err(PinError::NotDigits);
    }
    if pin.len() < MIN_PIN_DIGITS {
        return Err(PinError::TooShort);
    }
    Ok(())
}

/// Setup validation: the PIN must be valid and match its confirmation.
pub fn validate_pin_setup(pin: &str, confirm: &str) -> Result<(), PinError> {
    validate_pin(pin)?;
    if pin != confirm {
        return Err(PinError::Mismatch);
    }
    Ok(())
}

/// Hex SHA-256 digest of the PIN — the only form setup puts on the wire.
pub fn pin_digest(pin: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(pin.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Validate and store a new vault PIN.
pub async fn set_up_pin(
    store: &impl Storage,
    session: &Session,
    pin: &str,
    confirm: &str,
) -> Result<(), VaultError> {
    validate_pin_setup(pin, confirm)?;
    store.set_vault_pin(session, &pin_digest(pin)).await?;
    Ok(())
}

/// Relay an unlock attempt; a positive answer unlocks the session.
pub async fn unlock(
    store: &impl Storage,
    session: &mut Session,
    pin: &str,
) -> Result<bool, VaultError> {
    let unlocked = store.unlock_vault(session, pin).await?;
    if unlocked {
        session.unlock_vault();
    }
    Ok(unlocked)
}
