//! # vaultgal
//!
//! Command-line client for a personal photo/video gallery service with a
//! PIN-locked vault. The remote backend owns all persistence, identity
//! validation, and PIN verification; this client uploads media, organizes
//! albums, renders photo edits, and gates vault access on the backend's
//! answers.
//!
//! # Architecture: Thin Client Over a Storage Trait
//!
//! Everything below the CLI speaks to the backend through one trait:
//!
//! ```text
//! main (clap)  →  library / upload / vault  →  Storage  →  HttpStore (reqwest)
//!                        ↓
//!                    editing (image)   frame (ffmpeg)
//! ```
//!
//! This separation exists for three reasons:
//!
//! - **Testability**: every pipeline runs against a recording mock of the
//!   storage trait, so tests exercise real semantics without a network.
//! - **Determinism**: files are processed strictly sequentially on a
//!   current-thread runtime, keeping progress reporting and partial-failure
//!   behavior reproducible.
//! - **Transport ownership**: the wire format lives entirely behind
//!   [`storage::HttpStore`]; nothing else knows how bytes travel.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | Shared boundary types (`MediaAsset`, `Album`, `VaultStatus`) |
//! | [`session`] | Identity principal + session-scoped vault-unlocked flag |
//! | [`editing`] | Rotation geometry, filter compositing, thumbnails, render pipeline |
//! | [`frame`] | Video frame sampling (`FrameSource` trait, ffmpeg implementation) |
//! | [`storage`] | The `Storage` operation contract and its HTTP/JSON adapter |
//! | [`library`] | Cached media/album view, pagination, vault filtering, save-as-copy |
//! | [`upload`] | Batch upload pipeline with sliced progress reporting |
//! | [`vault`] | PIN validation, digest relay, setup/unlock flows |
//! | [`config`] | `vaultgal.toml` loading and the documented stock config |
//! | [`output`] | CLI output formatting — entity blocks and upload event lines |
//!
//! # Design Decisions
//!
//! ## JPEG-Only Artifacts
//!
//! Every artifact the client produces — rendered edits and thumbnails — is
//! JPEG, at quality 90 for edits and 70 for thumbnails. The lower preview
//! quality trades fidelity for bandwidth and storage. Sources may be JPEG,
//! PNG, TIFF, or WebP; the `image` crate's pure-Rust decoders are compiled
//! in, so the binary stays self-contained.
//!
//! ## One Color Stage Chain Per Render
//!
//! Brightness, contrast, and the named filter form a fixed stage chain
//! applied per pixel in a single pass ([`editing::filter`]), each stage
//! clamped to the displayable range before the next. The order never
//! varies — a channel saturated by brightness feeds grayscale differently
//! than the reverse — and repeated renders of one specification are
//! pixel-identical.
//!
//! ## Single-Threaded Cooperative Scheduling
//!
//! All decode/render/network work runs as async tasks on a current-thread
//! Tokio runtime. Nothing executes in parallel; tasks suspend at awaits.
//! Upload batches walk their files strictly in order, which is what makes
//! the `[0,100]` progress contract and partial-failure semantics
//! deterministic enough to unit test.
//!
//! ## Session State Is a Value, Not a Global
//!
//! The vault-unlocked flag lives in an explicit [`session::Session`] passed
//! to every operation that needs it. It is never written to durable
//! storage: closing the client relocks the vault.
//!
//! ## FFmpeg for Video Frames
//!
//! Video thumbnails sample the frame at 1 second of playback through the
//! system `ffmpeg` binary — one short-lived process per sampled frame,
//! behind the [`frame::FrameSource`] trait. A source shorter than the
//! offset is surfaced as an error rather than thumbnailed as a black frame.

pub mod config;
pub mod editing;
pub mod frame;
pub mod library;
pub mod output;
pub mod session;
pub mod storage;
pub mod types;
pub mod upload;
pub mod vault;

#[cfg(test)]
pub(crate) mod test_helpers;
