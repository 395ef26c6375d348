//! Content-addressed document storage on the local filesystem.

use std::path::PathBuf;

use sha2::{Digest, Sha256};
use vouch_core::error::{VouchError, VouchResult};
use vouch_workflow::{DocumentStore, Upload};

pub struct FsDocumentStore {
    dir: PathBuf,
}

impl FsDocumentStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, file_ref: &str) -> PathBuf {
        self.dir.join(file_ref)
    }
}

fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        _ => "pdf",
    }
}

impl DocumentStore for FsDocumentStore {
    /// Files are named by the SHA-256 of their content, so re-uploading
    /// identical bytes is a harmless overwrite and references never
    /// collide.
    async fn store(&self, upload: &Upload) -> VouchResult<String> {
        let mut hasher = Sha256::new();
        hasher.update(&upload.data);
        let file_ref = format!(
            "{}.{}",
            hex::encode(hasher.finalize()),
            extension_for(&upload.content_type)
        );

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| VouchError::Internal(format!("document dir: {e}")))?;
        tokio::fs::write(self.path_for(&file_ref), &upload.data)
            .await
            .map_err(|e| VouchError::Internal(format!("document write: {e}")))?;

        Ok(file_ref)
    }

    async fn resolve(&self, file_ref: &str) -> VouchResult<String> {
        let path = self.path_for(file_ref);
        match tokio::fs::try_exists(&path).await {
            Ok(true) => Ok(format!("file://{}", path.display())),
            Ok(false) => Err(VouchError::NotFound {
                entity: "document".into(),
                id: file_ref.into(),
            }),
            Err(e) => Err(VouchError::Internal(format!("document stat: {e}"))),
        }
    }
}
