/**
 * Cloudinary Image Store
 *
 * Uploads images with Cloudinary's unsigned upload API:
 *
 * ```http
 * POST {api_url}/{cloud_name}/image/upload
 * Content-Type: multipart/form-data
 *
 * upload_preset, folder, public_id, file
 * ```
 *
 * Cropping and output format are part of the upload preset, configured in the
 * Cloudinary console (profile pictures use a 400x400 face-gravity fill).
 */

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use super::{extension_for, ImageStore, ImageUpload, UploadError};
use crate::backend::server::config::CloudinaryConfig;

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, Clone)]
pub struct CloudinaryStore {
    config: CloudinaryConfig,
    http: reqwest::Client,
}

impl CloudinaryStore {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    fn upload_url(&self) -> String {
        format!(
            "{}/{}/image/upload",
            self.config.api_url.trim_end_matches('/'),
            self.config.cloud_name
        )
    }
}

#[async_trait]
impl ImageStore for CloudinaryStore {
    async fn upload(&self, image: ImageUpload) -> Result<String, UploadError> {
        let ext = extension_for(&image.content_type)
            .ok_or_else(|| UploadError::UnsupportedType(image.content_type.clone()))?;
        let public_id = image.sanitized_public_id();

        let file = Part::bytes(image.bytes.to_vec())
            .file_name(format!("{}.{}", public_id, ext))
            .mime_str(&image.content_type)?;

        let form = Form::new()
            .text("upload_preset", self.config.upload_preset.clone())
            .text("folder", image.folder.clone())
            .text("public_id", public_id)
            .part("file", file);

        tracing::debug!("Uploading image to Cloudinary folder {}", image.folder);
        let response = self.http.post(self.upload_url()).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorResponse>()
                .await
                .map(|e| e.error.message)
                .unwrap_or_else(|_| "unknown error".to_string());
            tracing::warn!("Cloudinary rejected upload ({}): {}", status, message);
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let body: UploadResponse = response.json().await?;
        Ok(body.secure_url)
    }
}
