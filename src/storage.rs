//! The storage collaborator boundary.
//!
//! [`Storage`] is the complete operation contract with the remote backend:
//! media and album persistence, vault PIN storage, and the server-side PIN
//! comparison. The wire format belongs to the implementation behind the
//! trait — the rest of the codebase is transport-agnostic.
//!
//! The production implementation is [`HttpStore`]: one JSON `POST` per
//! operation to `<service_url>/api/<operation>`, with the session principal
//! in an `x-identity` header. Blobs travel base64-encoded (see
//! [`types`](crate::types)). Operations fail fast with
//! [`StorageError::AuthenticationRequired`] when the session carries no
//! identity — nothing touches the network in that case. Transport failures
//! are surfaced to the caller, never retried automatically.

use crate::session::Session;
use crate::types::{Album, MediaAsset, VaultStatus};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("no active identity — sign in before calling the storage service")]
    AuthenticationRequired,
    #[error("storage service call failed: {0}")]
    Transport(String),
}

/// Observer for blob transfer progress, fed percentages in `[0, 100]`.
pub type TransferObserver<'a> = &'a mut dyn FnMut(u8);

/// Operation contract with the remote storage service.
// async fn in trait: the client is single-threaded (current-thread runtime),
// so the futures never need Send bounds.
#[allow(async_fn_in_trait)]
pub trait Storage {
    /// Persist one media asset. The observer sees blob transfer progress.
    async fn add_media_item(
        &self,
        session: &Session,
        asset: &MediaAsset,
        observer: TransferObserver<'_>,
    ) -> Result<(), StorageError>;

    async fn get_all_media(&self, session: &Session) -> Result<Vec<MediaAsset>, StorageError>;

    async fn get_media_item(
        &self,
        session: &Session,
        id: &str,
    ) -> Result<Option<MediaAsset>, StorageError>;

    async fn add_album(&self, session: &Session, album: &Album) -> Result<(), StorageError>;

    async fn get_all_albums(&self, session: &Session) -> Result<Vec<Album>, StorageError>;

    async fn get_album(&self, session: &Session, id: &str) -> Result<Option<Album>, StorageError>;

    async fn reorder_albums(
        &self,
        session: &Session,
        ordered_ids: &[String],
    ) -> Result<(), StorageError>;

    /// Store the hash of a user-chosen PIN. Verification stays server-side.
    async fn set_vault_pin(&self, session: &Session, pin_digest: &str)
    -> Result<(), StorageError>;

    /// Server-side PIN comparison; the client only relays the boolean.
    async fn unlock_vault(&self, session: &Session, pin: &str) -> Result<bool, StorageError>;

    async fn get_vault_status(&self, session: &Session) -> Result<VaultStatus, StorageError>;
}

/// HTTP/JSON adapter for the storage service.
pub struct HttpStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpStore {
    pub fn new(service_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: service_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// POST one operation and decode its JSON response.
    async fn call<B: Serialize, R: DeserializeOwned>(
        &self,
        session: &Session,
        operation: &str,
        body: &B,
    ) -> Result<R, StorageError> {
        let response = self.post(session, operation, body).await?;
        response
            .json()
            .await
            .map_err(|e| StorageError::Transport(e.to_string()))
    }

    /// POST one operation, discarding the response body.
    async fn call_unit<B: Serialize>(
        &self,
        session: &Session,
        operation: &str,
        body: &B,
    ) -> Result<(), StorageError> {
        self.post(session, operation, body).await.map(drop)
    }

    async fn post<B: Serialize>(
        &self,
        session: &Session,
        operation: &str,
        body: &B,
    ) -> Result<reqwest::Response, StorageError> {
        let principal = session
            .principal()
            .ok_or(StorageError::AuthenticationRequired)?;

        self.client
            .post(format!("{}/api/{operation}", self.base_url))
            .header("x-identity", principal)
            .json(body)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                tracing::warn!(operation, error = %e, "storage call failed");
                StorageError::Transport(e.to_string())
            })
    }
}

impl Storage for HttpStore {
    async fn add_media_item(
        &self,
        session: &Session,
        asset: &MediaAsset,
        observer: TransferObserver<'_>,
    ) -> Result<(), StorageError> {
        // The blob goes up in a single request; the observer sees the
        // transfer start and completion.
        observer(0);
        self.call_unit(session, "add_media_item", &json!({ "item": asset }))
            .await?;
        observer(100);
        Ok(())
    }

    async fn get_all_media(&self, session: &Session) -> Result<Vec<MediaAsset>, StorageError> {
        self.call(session, "get_all_media", &json!({})).await
    }

    async fn get_media_item(
        &self,
        session: &Session,
        id: &str,
    ) -> Result<Option<MediaAsset>, StorageError> {
        self.call(session, "get_media_item", &json!({ "id": id }))
            .await
    }

    async fn add_album(&self, session: &Session, album: &Album) -> Result<(), StorageError> {
        self.call_unit(session, "add_album", &json!({ "album": album }))
            .await
    }

    async fn get_all_albums(&self, session: &Session) -> Result<Vec<Album>, StorageError> {
        self.call(session, "get_all_albums", &json!({})).await
    }

    async fn get_album(&self, session: &Session, id: &str) -> Result<Option<Album>, StorageError> {
        self.call(session, "get_album", &json!({ "id": id })).await
    }

    async fn reorder_albums(
        &self,
        session: &Session,
        ordered_ids: &[String],
    ) -> Result<(), StorageError> {
        self.call_unit(session, "reorder_albums", &json!({ "ordered_ids": ordered_ids }))
            .await
    }

    async fn set_vault_pin(
        &self,
        session: &Session,
        pin_digest: &str,
    ) -> Result<(), StorageError> {
        self.call_unit(session, "set_vault_pin", &json!({ "pin_hash": pin_digest }))
            .await
    }

    async fn unlock_vault(&self, session: &Session, pin: &str) -> Result<bool, StorageError> {
        #[derive(serde::Deserialize)]
        struct UnlockResponse {
            unlocked: bool,
        }
        let response: UnlockResponse = self
            .call(session, "unlock_vault", &json!({ "pin": pin }))
            .await?;
        Ok(response.unlocked)
    }

    async fn get_vault_status(&self, session: &Session) -> Result<VaultStatus, StorageError> {
        self.call(session, "get_vault_status", &json!({})).await
    }
}
