//! CLI output formatting for all client operations.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not transport-centric**. The primary
//! display for every entity (asset, album, vault) is its semantic identity —
//! title and positional index — with identifiers and timestamps shown as
//! secondary context via indented lines.
//!
//! # Entity Display Contract
//!
//! Every entity follows a consistent two-level pattern:
//!
//! 1. **Header line**: positional index + title (+ detail like kind/size)
//! 2. **Context lines**: indented `Id:`, `Uploaded:`, `Locked`, etc.
//!
//! ## Listing
//!
//! ```text
//! Library (2 items)
//! 001 beach.jpg (photo, 2.1 MB)
//!     Id: 1754575200000000000-ab12cd34ef56
//!     Uploaded: 2026-08-07 12:00
//! 002 clip.mp4 (video, 18.4 MB)
//!     Id: 1754575201000000000-0099aabbccdd
//!     Uploaded: 2026-08-07 12:03
//!     Locked
//! ```
//!
//! ## Upload
//!
//! ```text
//! [1/3] beach.jpg
//!     45%
//!     stored as 1754575200000000000-ab12cd34ef56
//! [2/3] notes.txt
//!     skipped: only images and videos are supported
//! ```
//!
//! # Architecture
//!
//! Each surface has a `format_*` function (returns `Vec<String>` or
//! `String`) for testability and a `print_*` wrapper that writes to stdout.
//! Format functions are pure — no I/O, no side effects.

use crate::types::{Album, MediaAsset, VaultStatus};
use crate::upload::UploadEvent;
use crate::vault::{VaultFlow, required_flow};

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Human-readable byte size with one decimal above kilobytes.
fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    let bytes = bytes as f64;
    if bytes >= MB {
        format!("{:.1} MB", bytes / MB)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes / KB)
    } else {
        format!("{bytes} B")
    }
}

// ============================================================================
// Listings
// ============================================================================

/// Format a media listing: count header plus one entity block per asset.
pub fn format_media_list(items: &[&MediaAsset]) -> Vec<String> {
    let mut lines = Vec::new();
    let noun = if items.len() == 1 { "item" } else { "items" };
    lines.push(format!("Library ({} {noun})", items.len()));

    for (i, asset) in items.iter().enumerate() {
        lines.push(format!(
            "{} {} ({}, {})",
            format_index(i + 1),
            asset.title,
            asset.media_kind,
            format_size(asset.size_bytes)
        ));
        lines.push(format!("    Id: {}", asset.identifier));
        lines.push(format!(
            "    Uploaded: {}",
            asset.upload_timestamp.format("%Y-%m-%d %H:%M")
        ));
        if asset.locked {
            lines.push("    Locked".to_string());
        }
    }
    lines
}

/// Format an album listing.
pub fn format_album_list(albums: &[Album]) -> Vec<String> {
    let mut lines = Vec::new();
    let noun = if albums.len() == 1 { "album" } else { "albums" };
    lines.push(format!("Albums ({} {noun})", albums.len()));

    for (i, album) in albums.iter().enumerate() {
        let count = album.media_ids.len();
        lines.push(format!(
            "{} {} ({count} {})",
            format_index(i + 1),
            album.name,
            if count == 1 { "item" } else { "items" }
        ));
        lines.push(format!("    Id: {}", album.identifier));
        lines.push(format!(
            "    Created: {}",
            album.created_timestamp.format("%Y-%m-%d %H:%M")
        ));
        if album.hidden {
            lines.push("    Hidden".to_string());
        }
    }
    lines
}

/// Format one album with its member identifiers.
pub fn format_album(album: &Album) -> Vec<String> {
    let mut lines = vec![
        album.name.clone(),
        format!("    Id: {}", album.identifier),
        format!(
            "    Created: {}",
            album.created_timestamp.format("%Y-%m-%d %H:%M")
        ),
    ];
    for (i, id) in album.media_ids.iter().enumerate() {
        lines.push(format!("    {} {id}", format_index(i + 1)));
    }
    lines
}

// ============================================================================
// Vault
// ============================================================================

/// Format the vault status with the flow the user should take next.
pub fn format_vault_status(status: &VaultStatus) -> Vec<String> {
    let mut lines = vec!["Vault".to_string()];
    match required_flow(status) {
        VaultFlow::Setup => {
            lines.push("    PIN: not set".to_string());
            lines.push("    Run 'vaultgal vault setup <pin> <confirm>' to protect items".into());
        }
        VaultFlow::Unlock => {
            lines.push("    PIN: set".to_string());
            lines.push(format!(
                "    Locked: {}",
                if status.vault_locked { "yes" } else { "no" }
            ));
            lines.push(format!("    Failed attempts: {}", status.pin_attempts));
        }
    }
    lines
}

// ============================================================================
// Upload events
// ============================================================================

/// Format one upload pipeline event as display lines.
pub fn format_upload_event(event: &UploadEvent) -> Vec<String> {
    match event {
        UploadEvent::FileStarted { path, index, total } => {
            vec![format!("[{}/{total}] {}", index + 1, path.display())]
        }
        UploadEvent::Progress { percent } => vec![format!("    {percent}%")],
        UploadEvent::FileSkipped { reason, .. } => {
            vec![format!("    skipped: {reason}")]
        }
        UploadEvent::FileFailed { reason, .. } => vec![format!("    failed: {reason}")],
        UploadEvent::FileStored { id, .. } => vec![format!("    stored as {id}")],
        UploadEvent::BatchFinished {
            stored,
            skipped,
            failed,
        } => {
            let mut summary = format!("Uploaded {stored} file(s)");
            if *skipped > 0 {
                summary.push_str(&format!(", skipped {skipped}"));
            }
            if *failed > 0 {
                summary.push_str(&format!(", failed {failed}"));
            }
            vec![summary]
        }
    }
}

// ============================================================================
// Print wrappers
// ============================================================================

pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

pub fn print_upload_event(event: &UploadEvent) {
    print_lines(&format_upload_event(event));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{locked_asset, test_asset};
    use crate::types::MediaKind;
    use std::path::PathBuf;

    #[test]
    fn size_formatting_scales_units() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(2_202_009), "2.1 MB");
    }

    #[test]
    fn media_list_shows_index_kind_and_lock_state() {
        let open = test_asset("beach.jpg", MediaKind::Photo);
        let locked = locked_asset("secret.jpg");
        let lines = format_media_list(&[&open, &locked]);

        assert_eq!(lines[0], "Library (2 items)");
        assert!(lines[1].starts_with("001 beach.jpg (photo,"));
        assert!(lines[4].starts_with("002 secret.jpg (photo,"));
        assert_eq!(lines.last().unwrap(), "    Locked");
    }

    #[test]
    fn vault_status_gates_on_missing_pin() {
        let lines = format_vault_status(&VaultStatus::default());
        assert!(lines.iter().any(|l| l.contains("PIN: not set")));
        assert!(lines.iter().any(|l| l.contains("vault setup")));
        assert!(!lines.iter().any(|l| l.contains("unlock")));
    }

    #[test]
    fn vault_status_with_pin_shows_lock_state() {
        let status = VaultStatus {
            pin_hash: Some("abc".into()),
            vault_locked: true,
            pin_attempts: 2,
        };
        let lines = format_vault_status(&status);
        assert!(lines.contains(&"    Locked: yes".to_string()));
        assert!(lines.contains(&"    Failed attempts: 2".to_string()));
    }

    #[test]
    fn upload_events_render_one_block_per_file() {
        let started = format_upload_event(&UploadEvent::FileStarted {
            path: PathBuf::from("beach.jpg"),
            index: 0,
            total: 3,
        });
        assert_eq!(started, vec!["[1/3] beach.jpg"]);

        let finished = format_upload_event(&UploadEvent::BatchFinished {
            stored: 2,
            skipped: 1,
            failed: 0,
        });
        assert_eq!(finished, vec!["Uploaded 2 file(s), skipped 1"]);
    }
}
