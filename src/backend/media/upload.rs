//! Multipart image extraction
//!
//! Handlers that accept an image take axum's `Multipart` extractor and call
//! [`read_image`] to pull the named file field out of the body.

use axum::extract::Multipart;
use bytes::Bytes;

use super::{extension_for, ImageUpload, UploadError, MAX_IMAGE_BYTES};

/// A validated image file taken from a multipart body
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub content_type: String,
    pub bytes: Bytes,
}

impl ImageFile {
    pub fn into_upload(self, folder: impl Into<String>, public_id: impl Into<String>) -> ImageUpload {
        ImageUpload {
            folder: folder.into(),
            public_id: public_id.into(),
            content_type: self.content_type,
            bytes: self.bytes,
        }
    }
}

/// Read the file field called `field` and check that it is an image
///
/// Other fields are skipped.
pub async fn read_image(multipart: &mut Multipart, field: &str) -> Result<ImageFile, UploadError> {
    while let Some(part) = multipart
        .next_field()
        .await
        .map_err(|e| UploadError::Multipart(e.body_text()))?
    {
        if part.name() != Some(field) {
            continue;
        }

        let content_type = part
            .content_type()
            .map(str::to_string)
            .unwrap_or_default();
        if extension_for(&content_type).is_none() {
            return Err(UploadError::UnsupportedType(content_type));
        }

        let bytes = part
            .bytes()
            .await
            .map_err(|e| UploadError::Multipart(e.body_text()))?;
        if bytes.is_empty() {
            return Err(UploadError::MissingField(field.to_string()));
        }
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(UploadError::TooLarge);
        }

        return Ok(ImageFile { content_type, bytes });
    }

    Err(UploadError::MissingField(field.to_string()))
}
