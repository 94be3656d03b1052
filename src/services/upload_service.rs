use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::config::{normalize_extension, UploadConfig};

/// Public route prefix under which stored files are served
pub const PUBLIC_PREFIX: &str = "/uploads";

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("No file provided")]
    MissingFile,

    #[error("Uploaded file has no filename")]
    MissingFilename,

    #[error("File type '{extension}' is not allowed. Allowed types: {allowed}")]
    ExtensionNotAllowed { extension: String, allowed: String },

    #[error("File too large. Maximum size is {max_bytes} bytes")]
    TooLarge { max_bytes: usize },

    #[error("Malformed upload: {0}")]
    Malformed(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Extension allow-list plus byte ceiling, and the directory files land in.
#[derive(Debug, Clone)]
pub struct UploadService {
    dir: PathBuf,
    allowed_extensions: Vec<String>,
    max_bytes: usize,
}

impl UploadService {
    pub fn new(dir: impl Into<PathBuf>, allowed_extensions: Vec<String>, max_bytes: usize) -> Self {
        Self {
            dir: dir.into(),
            allowed_extensions: allowed_extensions.iter().map(|e| normalize_extension(e)).collect(),
            max_bytes,
        }
    }

    pub fn from_config(config: &UploadConfig) -> Self {
        Self::new(&config.dir, config.allowed_extensions.clone(), config.max_bytes)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Lower-cased extension of `filename` if it is on the allow-list
    pub fn check_extension(&self, filename: &str) -> Result<String, UploadError> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(normalize_extension)
            .unwrap_or_default();

        if extension.is_empty() || !self.allowed_extensions.contains(&extension) {
            return Err(UploadError::ExtensionNotAllowed {
                extension: if extension.is_empty() { "(none)".to_string() } else { extension },
                allowed: self.allowed_extensions.join(", "),
            });
        }
        Ok(extension)
    }

    pub fn check_size(&self, len: usize) -> Result<(), UploadError> {
        if len > self.max_bytes {
            return Err(UploadError::TooLarge {
                max_bytes: self.max_bytes,
            });
        }
        Ok(())
    }

    /// Validate and write a fully received file. Returns its public URL path.
    pub async fn store(&self, filename: &str, bytes: &[u8]) -> Result<String, UploadError> {
        if filename.trim().is_empty() {
            return Err(UploadError::MissingFilename);
        }
        self.check_extension(filename)?;
        self.check_size(bytes.len())?;

        let stored_name = unique_name(filename);
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.dir.join(&stored_name), bytes).await?;

        info!(file = %stored_name, bytes = bytes.len(), "Stored upload");
        Ok(format!("{}/{}", PUBLIC_PREFIX, stored_name))
    }
}

/// Strip any client path and keep a conservative character set.
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(filename);

    base.trim()
        .chars()
        .map(|c| match c {
            ' ' => '_',
            c if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') => c,
            _ => '_',
        })
        .collect()
}

/// `<random hex>_<sanitized name>`
pub fn unique_name(filename: &str) -> String {
    format!("{}_{}", Uuid::new_v4().simple(), sanitize_filename(filename))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(dir: &Path) -> UploadService {
        UploadService::new(dir, vec![".png".into(), "pdf".into()], 16)
    }

    #[test]
    fn sanitizes_names() {
        assert_eq!(sanitize_filename("my photo.PNG"), "my_photo.PNG");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\docs\\brief (v2).pdf"), "brief__v2_.pdf");
    }

    #[test]
    fn unique_names_keep_the_original_suffix() {
        let a = unique_name("logo.png");
        let b = unique_name("logo.png");
        assert_ne!(a, b);
        assert!(a.ends_with("_logo.png"));
    }

    #[test]
    fn extension_check_is_case_insensitive_and_names_allowed_set() {
        let svc = service(Path::new("unused"));
        assert_eq!(svc.check_extension("LOGO.PNG").unwrap(), ".png");

        let err = svc.check_extension("script.exe").unwrap_err();
        assert_eq!(
            err.to_string(),
            "File type '.exe' is not allowed. Allowed types: .png, .pdf"
        );
        assert!(svc.check_extension("README").is_err());
    }

    #[test]
    fn size_check_names_the_limit() {
        let svc = service(Path::new("unused"));
        assert!(svc.check_size(16).is_ok());
        let err = svc.check_size(17).unwrap_err();
        assert_eq!(err.to_string(), "File too large. Maximum size is 16 bytes");
    }

    #[tokio::test]
    async fn store_writes_file_and_returns_public_path() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path());

        let url = svc.store("site logo.png", b"\x89PNG").await.unwrap();
        assert!(url.starts_with("/uploads/"));
        assert!(url.ends_with("_site_logo.png"));

        let name = url.trim_start_matches("/uploads/");
        assert_eq!(std::fs::read(dir.path().join(name)).unwrap(), b"\x89PNG");
    }

    #[tokio::test]
    async fn rejected_uploads_write_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path());

        assert!(svc.store("notes.txt", b"hi").await.is_err());
        assert!(svc.store("big.png", &[0u8; 32]).await.is_err());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
