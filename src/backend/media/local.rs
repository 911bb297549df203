/**
 * Local Image Store
 *
 * Writes images to `{upload_dir}/{folder}/{public_id}.{ext}`. The router serves
 * `upload_dir` at `/static/uploads`, so the returned URL is relative to the
 * server origin.
 */

use std::path::PathBuf;

use async_trait::async_trait;

use super::{extension_for, ImageStore, ImageUpload, UploadError, ACCEPTED_TYPES};

/// URL prefix under which `upload_dir` is served
pub const LOCAL_URL_PREFIX: &str = "/static/uploads";

#[derive(Debug, Clone)]
pub struct LocalImageStore {
    root: PathBuf,
}

impl LocalImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn upload(&self, image: ImageUpload) -> Result<String, UploadError> {
        let ext = extension_for(&image.content_type)
            .ok_or_else(|| UploadError::UnsupportedType(image.content_type.clone()))?;

        let folder: Vec<String> = image
            .folder
            .split('/')
            .filter(|segment| !segment.is_empty() && *segment != "." && *segment != "..")
            .map(str::to_string)
            .collect();

        let mut dir = self.root.clone();
        dir.extend(&folder);
        tokio::fs::create_dir_all(&dir).await?;

        let public_id = image.sanitized_public_id();
        let file_name = format!("{}.{}", public_id, ext);
        tokio::fs::write(dir.join(&file_name), &image.bytes).await?;

        // A public id names one image whatever its format
        for (_, stale) in ACCEPTED_TYPES.iter().filter(|(_, other)| *other != ext) {
            match tokio::fs::remove_file(dir.join(format!("{}.{}", public_id, stale))).await {
                Ok(()) => tracing::debug!("Removed previous {}.{}", public_id, stale),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }

        tracing::debug!("Stored {} bytes as {}", image.bytes.len(), file_name);

        Ok(format!("{}/{}/{}", LOCAL_URL_PREFIX, folder.join("/"), file_name))
    }
}
