//! The media upload pipeline.
//!
//! Consumes a batch of local files, classifies each as photo or video by
//! extension, derives a thumbnail (the decoded frame for photos, the
//! 1-second playback frame for videos), and submits each file to the
//! storage service as its own persisted unit — a failure on file N never
//! rolls back files 1..N-1.
//!
//! Files are processed strictly sequentially so progress reporting and
//! partial-failure semantics stay deterministic and order-preserving.
//!
//! # Partial-failure semantics
//!
//! - Unsupported file types are skipped with a notice; the batch continues.
//! - Decode, frame-sampling, and read failures abort only that file; the
//!   batch continues and counts a failure.
//! - Transport and authentication failures abort the remaining batch and
//!   surface as a single error. Already-committed uploads stay committed.
//!
//! # Progress model
//!
//! Overall progress is monotonic in `[0, 100]`. Within one file, blob
//! transfer occupies `[0, 80]` and post-upload bookkeeping `[80, 100]`;
//! each file's local progress is scaled into its `1/batch_size` slice of
//! the total. Skipped and failed files complete their slice immediately so
//! a finished batch always reads 100.

use crate::editing::{decode_source, thumbnail_jpeg};
use crate::frame::{FRAME_OFFSET, FrameSource};
use crate::library::{Library, LibraryError};
use crate::session::Session;
use crate::storage::{Storage, StorageError};
use crate::types::{MediaAsset, MediaKind};
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use walkdir::WalkDir;

/// Extensions with compiled-in photo decoders.
const PHOTO_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tif", "tiff", "webp"];

/// Extensions handed to the video frame collaborator.
const VIDEO_EXTENSIONS: &[&str] = &["avi", "m4v", "mkv", "mov", "mp4", "webm"];

/// Share of a file's slice consumed by blob transfer.
const TRANSFER_SHARE: u32 = 80;

#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("only images and videos are supported")]
    Unsupported,
}

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Classify a file as photo or video by its declared extension.
pub fn classify(path: &Path) -> Result<MediaKind, ClassifyError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    if PHOTO_EXTENSIONS.contains(&ext.as_str()) {
        Ok(MediaKind::Photo)
    } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        Ok(MediaKind::Video)
    } else {
        Err(ClassifyError::Unsupported)
    }
}

/// Expand directory arguments into their contained files, depth-first in
/// deterministic name order. Plain file arguments pass through unchanged.
pub fn expand_paths(paths: &[PathBuf]) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path).sort_by_file_name() {
                let entry = entry.map_err(std::io::Error::other)?;
                if entry.file_type().is_file() {
                    files.push(entry.into_path());
                }
            }
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

/// Map a blob transfer percentage into the file-local `[0, 80]` range.
pub fn transfer_progress(transfer_pct: u8) -> u8 {
    (u32::from(transfer_pct.min(100)) * TRANSFER_SHARE / 100) as u8
}

/// Scale a file-local percentage into its slice of the overall batch.
///
/// File `index` of `batch_size` owns the slice
/// `[index/batch_size, (index+1)/batch_size)` of `[0, 100]`.
pub fn overall_progress(batch_size: usize, index: usize, local: u8) -> u8 {
    debug_assert!(batch_size > 0 && index < batch_size);
    let local = f64::from(local.min(100));
    let scaled = (index as f64 + local / 100.0) / batch_size as f64 * 100.0;
    scaled.floor() as u8
}

/// Progress and per-file notices emitted while a batch runs.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadEvent {
    FileStarted {
        path: PathBuf,
        index: usize,
        total: usize,
    },
    /// Monotonic overall progress in `[0, 100]`.
    Progress { percent: u8 },
    FileSkipped { path: PathBuf, reason: String },
    FileFailed { path: PathBuf, reason: String },
    FileStored { id: String, title: String },
    BatchFinished {
        stored: usize,
        skipped: usize,
        failed: usize,
    },
}

/// What a finished batch committed, skipped, and failed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UploadReport {
    pub stored: Vec<String>,
    pub skipped: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
}

struct ProgressEmitter<'a> {
    events: Option<&'a Sender<UploadEvent>>,
    last: u8,
}

impl<'a> ProgressEmitter<'a> {
    fn new(events: Option<&'a Sender<UploadEvent>>) -> Self {
        Self { events, last: 0 }
    }

    /// Emit overall progress, suppressing regressions and repeats.
    fn progress(&mut self, percent: u8) {
        let percent = percent.min(100);
        if percent > self.last {
            self.last = percent;
            self.send(UploadEvent::Progress { percent });
        }
    }

    fn send(&self, event: UploadEvent) {
        if let Some(sender) = self.events {
            let _ = sender.send(event);
        }
    }
}

/// Upload a batch of files, one persisted asset per supported file.
pub async fn upload_batch<S: Storage, F: FrameSource>(
    library: &mut Library<S>,
    frames: &F,
    session: &Session,
    paths: &[PathBuf],
    events: Option<&Sender<UploadEvent>>,
) -> Result<UploadReport, UploadError> {
    let mut emitter = ProgressEmitter::new(events);
    let mut report = UploadReport::default();
    let total = paths.len();

    for (index, path) in paths.iter().enumerate() {
        emitter.send(UploadEvent::FileStarted {
            path: path.clone(),
            index,
            total,
        });

        let kind = match classify(path) {
            Ok(kind) => kind,
            Err(ClassifyError::Unsupported) => {
                tracing::debug!(path = %path.display(), "skipping unsupported file");
                emitter.send(UploadEvent::FileSkipped {
                    path: path.clone(),
                    reason: "only images and videos are supported".into(),
                });
                report.skipped.push(path.clone());
                emitter.progress(overall_progress(total, index, 100));
                continue;
            }
        };

        match upload_one(library, frames, session, path, kind, index, total, &mut emitter).await {
            Ok(id) => {
                emitter.send(UploadEvent::FileStored {
                    id: id.clone(),
                    title: title_of(path),
                });
                report.stored.push(id);
            }
            // per-file failures: count, notify, move on
            Err(FileError::Recoverable(reason)) => {
                tracing::warn!(path = %path.display(), %reason, "upload failed for file");
                emitter.send(UploadEvent::FileFailed {
                    path: path.clone(),
                    reason,
                });
                report.failed.push(path.clone());
            }
            // transport/auth failures abort the remaining batch
            Err(FileError::Fatal(error)) => return Err(error),
        }
        emitter.progress(overall_progress(total, index, 100));
    }

    emitter.send(UploadEvent::BatchFinished {
        stored: report.stored.len(),
        skipped: report.skipped.len(),
        failed: report.failed.len(),
    });
    Ok(report)
}

enum FileError {
    Recoverable(String),
    Fatal(UploadError),
}

#[allow(clippy::too_many_arguments)]
async fn upload_one<S: Storage, F: FrameSource>(
    library: &mut Library<S>,
    frames: &F,
    session: &Session,
    path: &Path,
    kind: MediaKind,
    index: usize,
    total: usize,
    emitter: &mut ProgressEmitter<'_>,
) -> Result<String, FileError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| FileError::Recoverable(e.to_string()))?;

    let frame = match kind {
        MediaKind::Photo => {
            decode_source(&bytes).map_err(|e| FileError::Recoverable(e.to_string()))?
        }
        MediaKind::Video => frames
            .frame_at(path, FRAME_OFFSET)
            .await
            .map_err(|e| FileError::Recoverable(e.to_string()))?,
    };
    let thumbnail = thumbnail_jpeg(&frame).map_err(|e| FileError::Recoverable(e.to_string()))?;

    let asset = MediaAsset::new(title_of(path), kind, bytes, thumbnail, Utc::now());

    let mut observer = |transfer: u8| {
        emitter.progress(overall_progress(total, index, transfer_progress(transfer)));
    };
    library
        .add_media_item(session, &asset, &mut observer)
        .await
        .map_err(|e| match e {
            LibraryError::Storage(storage) => FileError::Fatal(storage.into()),
            other => FileError::Recoverable(other.to_string()),
        })?;

    Ok(asset.identifier)
}

fn title_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
