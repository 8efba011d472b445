//! The cached library view over the storage service.
//!
//! [`Library`] wraps a [`Storage`] implementation with an in-memory cache of
//! media and albums. Listings populate the cache on first use; every
//! successful write invalidates it (the cache is never mutated in place).
//! A failed write leaves the cache untouched — nothing was persisted, so
//! nothing went stale.
//!
//! Listings exclude vault-locked assets unless the session's vault is
//! unlocked. Asking for the locked subset through a locked session is an
//! error, not an empty list — callers must go through the unlock flow first.
//!
//! Pagination mirrors the grid's windowed growth: `page(n)` returns the
//! first `n` pages' worth of items, not the `n`-th slice in isolation.

use crate::editing::{EditSpec, decode_source, render, thumbnail_jpeg};
use crate::session::Session;
use crate::storage::{Storage, StorageError, TransferObserver};
use crate::types::{Album, MediaAsset, MediaKind};
use chrono::Utc;
use thiserror::Error;

/// Items per listing page.
pub const PAGE_SIZE: usize = 50;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Edit(#[from] crate::editing::EditError),
    #[error("the vault is locked — unlock it to list locked items")]
    VaultLocked,
    #[error("no media asset with identifier {0}")]
    UnknownAsset(String),
    #[error("{0} is a video — only photos can be edited")]
    NotAPhoto(String),
}

/// Cached view of the caller's media and albums.
pub struct Library<S: Storage> {
    store: S,
    media: Option<Vec<MediaAsset>>,
    albums: Option<Vec<Album>>,
}

impl<S: Storage> Library<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            media: None,
            albums: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// All assets visible to the caller, locked ones included.
    pub async fn all_media(&mut self, session: &Session) -> Result<&[MediaAsset], LibraryError> {
        if self.media.is_none() {
            let fetched = self.store.get_all_media(session).await?;
            tracing::debug!(count = fetched.len(), "media cache populated");
            self.media = Some(fetched);
        }
        Ok(self.media.as_deref().unwrap_or_default())
    }

    /// Assets shown in normal listings: locked items only appear once the
    /// session's vault is unlocked.
    pub async fn visible_media(
        &mut self,
        session: &Session,
    ) -> Result<Vec<&MediaAsset>, LibraryError> {
        let unlocked = session.vault_unlocked();
        Ok(self
            .all_media(session)
            .await?
            .iter()
            .filter(|asset| !asset.locked || unlocked)
            .collect())
    }

    /// The locked subset. Requires an unlocked vault session.
    pub async fn locked_media(
        &mut self,
        session: &Session,
    ) -> Result<Vec<&MediaAsset>, LibraryError> {
        if !session.vault_unlocked() {
            return Err(LibraryError::VaultLocked);
        }
        Ok(self
            .all_media(session)
            .await?
            .iter()
            .filter(|asset| asset.locked)
            .collect())
    }

    /// The first `pages` windows of visible media (windowed accumulation).
    pub async fn page(
        &mut self,
        session: &Session,
        pages: usize,
    ) -> Result<Vec<&MediaAsset>, LibraryError> {
        let mut visible = self.visible_media(session).await?;
        visible.truncate(pages.saturating_mul(PAGE_SIZE));
        Ok(visible)
    }

    /// Persist one asset and invalidate the media cache on success.
    pub async fn add_media_item(
        &mut self,
        session: &Session,
        asset: &MediaAsset,
        observer: TransferObserver<'_>,
    ) -> Result<(), LibraryError> {
        self.store.add_media_item(session, asset, observer).await?;
        self.media = None;
        Ok(())
    }

    /// Render an edited copy of a photo and persist it as a new asset.
    ///
    /// The original is never touched: the edited raster becomes a fresh
    /// asset titled `"<original title> (edited)"` with its own thumbnail
    /// derived from the edited bytes.
    pub async fn save_edited_copy(
        &mut self,
        session: &Session,
        id: &str,
        spec: &EditSpec,
        observer: TransferObserver<'_>,
    ) -> Result<MediaAsset, LibraryError> {
        let original = self
            .store
            .get_media_item(session, id)
            .await?
            .ok_or_else(|| LibraryError::UnknownAsset(id.to_string()))?;
        if original.media_kind != MediaKind::Photo {
            return Err(LibraryError::NotAPhoto(id.to_string()));
        }

        let source = decode_source(&original.original_bytes)?;
        let edited_bytes = render(&source, spec)?;
        let thumbnail = thumbnail_jpeg(&decode_source(&edited_bytes)?)?;

        let copy = MediaAsset::new(
            format!("{} (edited)", original.title),
            MediaKind::Photo,
            edited_bytes,
            thumbnail,
            Utc::now(),
        );
        self.add_media_item(session, &copy, observer).await?;
        Ok(copy)
    }

    // -- albums ------------------------------------------------------------

    pub async fn all_albums(&mut self, session: &Session) -> Result<&[Album], LibraryError> {
        if self.albums.is_none() {
            let fetched = self.store.get_all_albums(session).await?;
            tracing::debug!(count = fetched.len(), "album cache populated");
            self.albums = Some(fetched);
        }
        Ok(self.albums.as_deref().unwrap_or_default())
    }

    pub async fn album(
        &mut self,
        session: &Session,
        id: &str,
    ) -> Result<Option<Album>, LibraryError> {
        Ok(self.store.get_album(session, id).await?)
    }

    /// Create an empty album and invalidate the album cache on success.
    pub async fn add_album(
        &mut self,
        session: &Session,
        name: &str,
    ) -> Result<Album, LibraryError> {
        let album = Album::new(name, Utc::now());
        self.store.add_album(session, &album).await?;
        self.albums = None;
        Ok(album)
    }

    pub async fn reorder_albums(
        &mut self,
        session: &Session,
        ordered_ids: &[String],
    ) -> Result<(), LibraryError> {
        self.store.reorder_albums(session, ordered_ids).await?;
        self.albums = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::FilterKind;
    use crate::storage::tests::{MockStore, RecordedCall};
    use crate::test_helpers::{locked_asset, test_asset, test_photo_asset};

    fn fetch_count(store: &MockStore) -> usize {
        store
            .recorded_calls()
            .iter()
            .filter(|c| matches!(c, RecordedCall::GetAllMedia))
            .count()
    }

    #[tokio::test]
    async fn listings_are_served_from_cache() {
        let mut library = Library::new(MockStore::with_media(vec![test_asset(
            "a.jpg",
            MediaKind::Photo,
        )]));
        let session = Session::authenticated("alice");

        library.all_media(&session).await.unwrap();
        library.all_media(&session).await.unwrap();

        assert_eq!(fetch_count(library.store()), 1);
    }

    #[tokio::test]
    async fn successful_write_invalidates_the_cache() {
        let mut library = Library::new(MockStore::new());
        let session = Session::authenticated("alice");

        library.all_media(&session).await.unwrap();
        library
            .add_media_item(&session, &test_asset("b.jpg", MediaKind::Photo), &mut |_| {})
            .await
            .unwrap();
        let media = library.all_media(&session).await.unwrap();

        assert_eq!(media.len(), 1);
        assert_eq!(fetch_count(library.store()), 2);
    }

    #[tokio::test]
    async fn failed_write_keeps_the_cache() {
        let store = MockStore::new();
        *store.fail_operation.borrow_mut() = Some("add_media_item");
        let mut library = Library::new(store);
        let session = Session::authenticated("alice");

        library.all_media(&session).await.unwrap();
        let result = library
            .add_media_item(&session, &test_asset("b.jpg", MediaKind::Photo), &mut |_| {})
            .await;
        assert!(result.is_err());

        library.all_media(&session).await.unwrap();
        assert_eq!(fetch_count(library.store()), 1);
    }

    #[tokio::test]
    async fn locked_assets_hidden_until_vault_unlocks() {
        let mut library = Library::new(MockStore::with_media(vec![
            test_asset("open.jpg", MediaKind::Photo),
            locked_asset("secret.jpg"),
        ]));
        let mut session = Session::authenticated("alice");

        let visible = library.visible_media(&session).await.unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].title, "open.jpg");

        session.unlock_vault();
        assert_eq!(library.visible_media(&session).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn locked_listing_requires_an_unlocked_session() {
        let mut library = Library::new(MockStore::with_media(vec![locked_asset("secret.jpg")]));
        let mut session = Session::authenticated("alice");

        assert!(matches!(
            library.locked_media(&session).await,
            Err(LibraryError::VaultLocked)
        ));

        session.unlock_vault();
        let locked = library.locked_media(&session).await.unwrap();
        assert_eq!(locked.len(), 1);
    }

    #[tokio::test]
    async fn page_accumulates_windows() {
        let media: Vec<MediaAsset> = (0..120)
            .map(|i| test_asset(format!("{i:03}.jpg"), MediaKind::Photo))
            .collect();
        let mut library = Library::new(MockStore::with_media(media));
        let session = Session::authenticated("alice");

        assert_eq!(library.page(&session, 1).await.unwrap().len(), 50);
        assert_eq!(library.page(&session, 2).await.unwrap().len(), 100);
        assert_eq!(library.page(&session, 3).await.unwrap().len(), 120);
    }

    #[tokio::test]
    async fn edited_copy_is_a_new_asset_with_suffixed_title() {
        let original = test_photo_asset("beach.jpg", 120, 80);
        let original_id = original.identifier.clone();
        let original_bytes = original.original_bytes.clone();
        let mut library = Library::new(MockStore::with_media(vec![original]));
        let session = Session::authenticated("alice");

        let spec = EditSpec::new(100, 100, 90.0, FilterKind::None);
        let copy = library
            .save_edited_copy(&session, &original_id, &spec, &mut |_| {})
            .await
            .unwrap();

        assert_eq!(copy.title, "beach.jpg (edited)");
        assert_ne!(copy.identifier, original_id);
        assert!(!copy.locked);

        // the quarter turn swapped the copy's dimensions
        let decoded = image::load_from_memory(&copy.original_bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (80, 120));

        // original persisted untouched alongside the copy
        let media = library.store().media.borrow();
        assert_eq!(media.len(), 2);
        assert_eq!(media[0].identifier, original_id);
        assert_eq!(media[0].original_bytes, original_bytes);
    }

    #[tokio::test]
    async fn videos_cannot_be_edited() {
        let video = test_asset("clip.mp4", MediaKind::Video);
        let id = video.identifier.clone();
        let mut library = Library::new(MockStore::with_media(vec![video]));
        let session = Session::authenticated("alice");

        let result = library
            .save_edited_copy(&session, &id, &EditSpec::default(), &mut |_| {})
            .await;
        assert!(matches!(result, Err(LibraryError::NotAPhoto(_))));
    }

    #[tokio::test]
    async fn editing_a_missing_asset_is_reported() {
        let mut library = Library::new(MockStore::new());
        let session = Session::authenticated("alice");

        let result = library
            .save_edited_copy(&session, "nope", &EditSpec::default(), &mut |_| {})
            .await;
        assert!(matches!(result, Err(LibraryError::UnknownAsset(_))));
    }

    #[tokio::test]
    async fn new_album_invalidates_the_album_cache() {
        let mut library = Library::new(MockStore::new());
        let session = Session::authenticated("alice");

        assert!(library.all_albums(&session).await.unwrap().is_empty());
        let album = library.add_album(&session, "Holidays").await.unwrap();
        assert_eq!(album.name, "Holidays");

        let albums = library.all_albums(&session).await.unwrap();
        assert_eq!(albums.len(), 1);
    }
}
