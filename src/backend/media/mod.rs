//! Media Module
//!
//! Image storage for profile pictures, post images and stories. Storage itself
//! is delegated: `CloudinaryStore` hands the file to Cloudinary, while
//! `LocalImageStore` writes it under the upload directory served at
//! `/static/uploads`.
//!
//! # Module Structure
//!
//! ```text
//! media/
//! ├── mod.rs         - ImageStore trait, upload types, errors
//! ├── cloudinary.rs  - Cloudinary unsigned uploads
//! ├── local.rs       - Filesystem store
//! └── upload.rs      - Multipart field extraction for handlers
//! ```

use async_trait::async_trait;
use axum::http::StatusCode;
use bytes::Bytes;
use thiserror::Error;

pub mod cloudinary;
pub mod local;
pub mod upload;

pub use cloudinary::CloudinaryStore;
pub use local::LocalImageStore;
pub use upload::{read_image, ImageFile};

/// Largest accepted image
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Root folder for every upload
pub const ROOT_FOLDER: &str = "Instagram";

/// Content types accepted as images, with the extension used to store them
pub const ACCEPTED_TYPES: [(&str, &str); 4] = [
    ("image/png", "png"),
    ("image/jpeg", "jpg"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
];

/// File extension for an accepted image content type
pub fn extension_for(content_type: &str) -> Option<&'static str> {
    ACCEPTED_TYPES
        .iter()
        .find(|(ct, _)| ct.eq_ignore_ascii_case(content_type))
        .map(|(_, ext)| *ext)
}

/// An image ready to be stored
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Folder below the store root, e.g. `Instagram/stories`
    pub folder: String,
    /// Stable name inside the folder; uploading again replaces the image
    pub public_id: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl ImageUpload {
    /// Public ids end up in paths and URLs, keep them to a safe alphabet
    pub fn sanitized_public_id(&self) -> String {
        self.public_id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect()
    }
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Unsupported image type: {0}")]
    UnsupportedType(String),

    #[error("Image is larger than {} bytes", MAX_IMAGE_BYTES)]
    TooLarge,

    #[error("Image field '{0}' is missing")]
    MissingField(String),

    #[error("Malformed multipart body: {0}")]
    Multipart(String),

    #[error("Image store rejected the upload ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Image store request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Image store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl UploadError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::UnsupportedType(_) | Self::MissingField(_) | Self::Multipart(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::TooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Rejected { .. } | Self::Http(_) => StatusCode::BAD_GATEWAY,
            Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Destination for uploaded images
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store the image and return the URL it is served from
    async fn upload(&self, image: ImageUpload) -> Result<String, UploadError>;
}
