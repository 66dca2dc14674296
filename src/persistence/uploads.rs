//! On-disk storage for situation images.
//!
//! Each accepted image is written as a flat file at
//! `{upload_dir}/{YYYYmmdd_HHMMSS_}{sanitized-name}`. Only the filename is
//! recorded in the database; the file is served back by name.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

/// Numbered alternatives tried when a stored name is already taken.
const MAX_NAME_SUFFIX: u32 = 1000;

/// Extensions accepted for uploads, compared case-insensitively.
pub const ALLOWED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];

/// Returns the lowercased extension of `filename` if it is an accepted
/// image type.
#[must_use]
pub fn allowed_extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// Reduces a client-supplied filename to a safe flat name.
///
/// Path separators and whitespace runs become `_`, every character other
/// than ASCII alphanumerics, `_`, `.` and `-` is dropped, and leading or
/// trailing `.`/`_` are stripped. May return an empty string.
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    let spaced = name.replace(['/', '\\'], " ");
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();
    kept.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// Builds the stored filename for an accepted upload.
///
/// Returns `None` if the extension is not accepted.
#[must_use]
pub fn stored_name(original: &str, now: DateTime<Local>) -> Option<String> {
    let ext = allowed_extension(original)?;
    let mut safe = sanitize_filename(original);
    if safe.is_empty() || allowed_extension(&safe).is_none() {
        safe = format!("image.{ext}");
    }
    Some(format!("{}{safe}", now.format("%Y%m%d_%H%M%S_")))
}

/// Inserts `_{n}` before the extension of a stored name.
fn numbered_name(name: &str, n: u32) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) => format!("{stem}_{n}.{ext}"),
        None => format!("{name}_{n}"),
    }
}

/// Manages the upload directory.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    /// Opens the upload directory, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory cannot be created.
    pub async fn open(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;
        info!(dir = %dir.display(), "upload directory ready");
        Ok(Self { dir })
    }

    /// Directory uploads are stored in.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of a stored upload.
    #[must_use]
    pub fn file_path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Saves an uploaded image and returns its stored filename.
    ///
    /// Returns `Ok(None)` without touching the disk when the original
    /// filename does not carry an accepted extension. Existing files are
    /// never overwritten: a taken name gets a numeric suffix, so the
    /// returned name always refers to a file created by this call.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be written.
    pub async fn save(&self, original: &str, bytes: &[u8]) -> std::io::Result<Option<String>> {
        let Some(name) = stored_name(original, Local::now()) else {
            warn!(filename = original, "dropping upload with unsupported extension");
            return Ok(None);
        };
        self.write_new(&name, bytes).await.map(Some)
    }

    async fn write_new(&self, name: &str, bytes: &[u8]) -> std::io::Result<String> {
        let mut candidate = name.to_string();
        let mut suffix = 0;
        let mut file = loop {
            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(self.file_path(&candidate))
                .await
            {
                Ok(file) => break file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists && suffix < MAX_NAME_SUFFIX => {
                    suffix += 1;
                    candidate = numbered_name(name, suffix);
                }
                Err(e) => return Err(e),
            }
        };

        if let Err(e) = write_all(&mut file, bytes).await {
            drop(file);
            self.discard(&candidate).await;
            return Err(e);
        }

        info!(file = %candidate, size = bytes.len(), "stored upload");
        Ok(candidate)
    }

    /// Removes a stored upload, logging instead of failing.
    pub async fn discard(&self, name: &str) {
        if let Err(e) = fs::remove_file(self.file_path(name)).await {
            warn!(file = name, error = %e, "failed to remove upload");
        }
    }
}

async fn write_all(file: &mut fs::File, bytes: &[u8]) -> std::io::Result<()> {
    file.write_all(bytes).await?;
    file.flush().await
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        let Some(t) = Local.with_ymd_and_hms(2026, 3, 7, 9, 5, 1).single() else {
            panic!("valid timestamp");
        };
        t
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        assert_eq!(allowed_extension("photo.PNG").as_deref(), Some("png"));
        assert_eq!(allowed_extension("a.b.JpEg").as_deref(), Some("jpeg"));
        assert!(allowed_extension("evil.exe").is_none());
        assert!(allowed_extension("png").is_none());
        assert!(allowed_extension("archive.png.zip").is_none());
    }

    #[test]
    fn sanitize_strips_traversal() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "etc_passwd");
        assert_eq!(sanitize_filename("my cat  pic.png"), "my_cat_pic.png");
        assert_eq!(sanitize_filename("C:\\Users\\x\\é.gif"), "C_Users_x_.gif");
        assert_eq!(sanitize_filename("..."), "");
    }

    #[test]
    fn stored_name_has_timestamp_prefix() {
        let Some(name) = stored_name("photo.PNG", fixed_time()) else {
            panic!("png should be accepted");
        };
        assert_eq!(name, "20260307_090501_photo.PNG");
    }

    #[test]
    fn stored_name_rejects_unsupported() {
        assert!(stored_name("evil.exe", fixed_time()).is_none());
    }

    #[test]
    fn stored_name_falls_back_when_nothing_survives() {
        let Some(name) = stored_name("日本.png", fixed_time()) else {
            panic!("png should be accepted");
        };
        assert_eq!(name, "20260307_090501_image.png");
    }

    #[tokio::test]
    async fn save_writes_file_and_skips_rejected() {
        let dir = std::env::temp_dir().join(format!("cooked-board-{}", uuid::Uuid::new_v4()));
        let Ok(store) = UploadStore::open(&dir).await else {
            panic!("upload dir creation failed");
        };

        let Ok(Some(name)) = store.save("photo.png", b"pixels").await else {
            panic!("save failed");
        };
        let Ok(contents) = fs::read(store.file_path(&name)).await else {
            panic!("stored file missing");
        };
        assert_eq!(contents, b"pixels");

        let Ok(rejected) = store.save("evil.exe", b"MZ").await else {
            panic!("save errored");
        };
        assert!(rejected.is_none());

        store.discard(&name).await;
        assert!(fs::metadata(store.file_path(&name)).await.is_err());

        let _ = fs::remove_dir_all(&dir).await;
    }

    #[test]
    fn numbered_name_goes_before_extension() {
        assert_eq!(
            numbered_name("20260307_090501_photo.png", 2),
            "20260307_090501_photo_2.png"
        );
    }

    #[tokio::test]
    async fn taken_name_is_never_overwritten() {
        let dir = std::env::temp_dir().join(format!("cooked-board-{}", uuid::Uuid::new_v4()));
        let Ok(store) = UploadStore::open(&dir).await else {
            panic!("upload dir creation failed");
        };
        let name = "20260307_090501_photo.png";
        let Ok(first) = store.write_new(name, b"first").await else {
            panic!("first write failed");
        };
        assert_eq!(first, name);

        let Ok(second) = store.write_new(name, b"second").await else {
            panic!("second write failed");
        };
        assert_eq!(second, "20260307_090501_photo_1.png");

        // Discarding the newer file leaves the earlier upload intact.
        store.discard(&second).await;
        let Ok(contents) = fs::read(store.file_path(&first)).await else {
            panic!("first upload missing");
        };
        assert_eq!(contents, b"first");

        let _ = fs::remove_dir_all(&dir).await;
    }
}
