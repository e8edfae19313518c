use crate::{Error, Result};
use base64::{Engine, engine::general_purpose::STANDARD};
use std::{
    io::{ErrorKind, Write},
    path::Path,
};
use tempfile::{Builder, NamedTempFile};
use tracing::{debug, warn};
use uuid::Uuid;

const MAX_NAME_LEN: usize = 64;

/// An image received from the caller.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: Option<String>, content_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    pub fn validate(&self, max_bytes: Option<usize>) -> Result<()> {
        if self.bytes.is_empty() {
            return Err(Error::input("Uploaded file is empty"));
        }
        if let Some(limit) = max_bytes {
            if self.bytes.len() > limit {
                return Err(Error::input(format!(
                    "Image too large: {} bytes exceeds the {} byte limit",
                    self.bytes.len(),
                    limit
                )));
            }
        }
        Ok(())
    }
}

/// On-disk copy of an upload, removed when released or dropped.
#[derive(Debug)]
pub struct TransientFile {
    file: NamedTempFile,
}

impl TransientFile {
    /// Creates `temp_<request id>_<random>_<filename>` in `dir`. The file is
    /// opened exclusively, so an existing path is never overwritten.
    pub fn create(dir: &Path, request_id: Uuid, upload: &Upload) -> Result<Self> {
        let prefix = format!("temp_{}_", request_id.simple());
        let suffix = format!("_{}", sanitize_file_name(upload.file_name.as_deref()));
        let mut file = Builder::new()
            .prefix(&prefix)
            .suffix(&suffix)
            .tempfile_in(dir)?;

        file.write_all(&upload.bytes)?;
        file.flush()?;
        debug!("Wrote {} bytes to {}", upload.bytes.len(), file.path().display());

        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub async fn read_base64(&self) -> Result<String> {
        let bytes = tokio::fs::read(self.path()).await?;
        Ok(encode_base64(&bytes))
    }

    pub async fn release(self) {
        let path = self.path().to_path_buf();
        match tokio::task::spawn_blocking(move || self.file.close()).await {
            Ok(Ok(())) => debug!("Removed transient file {}", path.display()),
            Ok(Err(e)) if e.kind() == ErrorKind::NotFound => {}
            Ok(Err(e)) => warn!("Failed to remove transient file {}: {}", path.display(), e),
            Err(e) => warn!("Cleanup task for {} failed: {}", path.display(), e),
        }
    }
}

pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Reduces a client-declared filename to a safe single path component.
pub fn sanitize_file_name(name: Option<&str>) -> String {
    let base = name
        .and_then(|n| n.rsplit(['/', '\\']).next())
        .unwrap_or_default();

    let cleaned: String = base
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .take(MAX_NAME_LEN)
        .collect();

    if cleaned.trim_matches('.').is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}
