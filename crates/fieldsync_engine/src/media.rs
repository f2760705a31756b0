//! Media sideload decoding and storage.

use crate::error::{EngineError, EngineResult};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, error, info, warn};

const PNG_SIGNATURE: [u8; 4] = [0x89, 0x50, 0x4E, 0x47];
const JPEG_SIGNATURE: [u8; 3] = [0xFF, 0xD8, 0xFF];

/// Decodes embedded base64 payloads into locally stored binaries.
///
/// Photo documents arrive from the remote store with the image embedded as
/// a base64 field. This store decodes the payload to disk and hands back a
/// stable relative reference path; the base64 itself is never persisted or
/// re-emitted.
///
/// File names are deterministic (`photo_{owner}_sig_{parent}.{ext}`), so
/// re-decoding the same logical record overwrites the same file.
#[derive(Debug)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    /// Opens a media store rooted at `root`, creating the directory if
    /// needed.
    pub fn open(root: impl Into<PathBuf>) -> EngineResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)
            .map_err(|e| EngineError::media(format!("cannot create {}: {e}", root.display())))?;
        info!(root = %root.display(), "media storage initialized");
        Ok(Self { root })
    }

    /// Storage root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Decodes a base64 payload and stores it, returning the relative
    /// reference path.
    ///
    /// Returns `None` for blank input, undecodable input, or an empty
    /// payload; this sub-step never fails the surrounding record. A
    /// data-URI prefix (`data:image/...;base64,`) is tolerated and
    /// stripped. A missing owner id falls back to epoch millis, a missing
    /// parent id to 0.
    pub fn decode_and_store(
        &self,
        base64_data: &str,
        owner_id: Option<i64>,
        parent_id: Option<i64>,
    ) -> Option<String> {
        if base64_data.trim().is_empty() {
            warn!(?owner_id, ?parent_id, "blank base64 payload, no media stored");
            return None;
        }

        let pure = strip_data_uri_prefix(base64_data);
        let bytes = match BASE64.decode(pure.as_bytes()) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(?owner_id, %e, "base64 decode failed, no media stored");
                return None;
            }
        };
        if bytes.is_empty() {
            warn!(?owner_id, "decoded payload is empty, no media stored");
            return None;
        }

        let extension = detect_format(&bytes, base64_data);
        let owner = owner_id.unwrap_or_else(|| chrono::Utc::now().timestamp_millis());
        let parent = parent_id.unwrap_or(0);
        let file_name = format!("photo_{owner}_sig_{parent}.{extension}");
        let path = self.root.join(&file_name);

        if let Err(e) = std::fs::write(&path, &bytes) {
            error!(path = %path.display(), %e, "media write failed, no media stored");
            return None;
        }

        info!(
            path = %path.display(),
            size = bytes.len(),
            format = extension,
            "media stored"
        );
        Some(path.to_string_lossy().into_owned())
    }

    /// Deletes a previously stored file, if the reference resolves to one.
    ///
    /// Used when an update supersedes an existing image. A failed delete
    /// is logged, not fatal.
    pub fn delete_if_exists(&self, reference: &str) {
        if reference.trim().is_empty() {
            return;
        }
        let path = match self.resolve(reference) {
            Ok(path) => path,
            Err(e) => {
                warn!(reference, %e, "refusing to delete media reference");
                return;
            }
        };
        match std::fs::remove_file(&path) {
            Ok(()) => info!(path = %path.display(), "superseded media deleted"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %path.display(), %e, "could not delete superseded media"),
        }
    }

    /// Resolves a stored reference against the storage root for serving.
    ///
    /// Refuses any reference whose resolved path would escape the root.
    pub fn resolve(&self, reference: &str) -> EngineResult<PathBuf> {
        let relative = Path::new(reference)
            .strip_prefix(&self.root)
            .unwrap_or_else(|_| Path::new(reference));

        for component in relative.components() {
            match component {
                Component::Normal(_) => {}
                _ => return Err(EngineError::MediaPathEscape(reference.to_string())),
            }
        }
        Ok(self.root.join(relative))
    }
}

/// Strips a `data:<media-type>;base64,` prefix, if present.
fn strip_data_uri_prefix(data: &str) -> &str {
    match data.find(',') {
        Some(index) => &data[index + 1..],
        None => data.trim(),
    }
}

/// Detects the image format from the data-URI media type or the decoded
/// bytes' magic signature. Defaults to JPEG.
fn detect_format(bytes: &[u8], raw: &str) -> &'static str {
    let lower = raw.get(..raw.len().min(24)).unwrap_or("").to_ascii_lowercase();
    if lower.starts_with("data:image/png") {
        return "png";
    }
    if lower.starts_with("data:image/jpeg") || lower.starts_with("data:image/jpg") {
        return "jpg";
    }

    if bytes.starts_with(&PNG_SIGNATURE) {
        return "png";
    }
    if bytes.starts_with(&JPEG_SIGNATURE) {
        return "jpg";
    }

    debug!("image format not detected, defaulting to jpeg");
    "jpg"
}
