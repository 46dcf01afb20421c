//! Profile photo validation and storage.

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;

pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

/// Whole-request cap; leaves room for multipart framing around a maximum-size photo.
pub const MAX_REQUEST_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Webp,
}

impl ImageFormat {
    fn from_extension(file_name: &str) -> Option<Self> {
        let (_, ext) = file_name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            "webp" => Some(ImageFormat::Webp),
            _ => None,
        }
    }

    fn from_content_type(content_type: &str) -> Option<Self> {
        match content_type.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(ImageFormat::Jpeg),
            "image/png" => Some(ImageFormat::Png),
            "image/webp" => Some(ImageFormat::Webp),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
            ImageFormat::Webp => "webp",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Webp => "image/webp",
        }
    }

    fn matches_signature(&self, bytes: &[u8]) -> bool {
        match self {
            ImageFormat::Jpeg => bytes.starts_with(&[0xFF, 0xD8, 0xFF]),
            ImageFormat::Png => bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]),
            ImageFormat::Webp => {
                bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP"
            }
        }
    }
}

/// Accepts a photo only when the extension, the declared content type and the
/// leading bytes all agree on an allowed image format.
pub fn validate_photo(
    file_name: &str,
    content_type: &str,
    bytes: &[u8],
) -> Result<ImageFormat, AppError> {
    const ALLOWED: &str = "Only image files (jpeg, jpg, png, webp) are allowed";

    let format = ImageFormat::from_extension(file_name)
        .ok_or_else(|| AppError::UploadRejected(ALLOWED.to_string()))?;
    if ImageFormat::from_content_type(content_type) != Some(format) {
        return Err(AppError::UploadRejected(ALLOWED.to_string()));
    }
    if bytes.is_empty() {
        return Err(AppError::UploadRejected("Uploaded file is empty".to_string()));
    }
    if bytes.len() > MAX_PHOTO_BYTES {
        return Err(AppError::UploadRejected(format!(
            "Image file too large: {:.1}MB (max 5MB)",
            bytes.len() as f64 / 1024.0 / 1024.0
        )));
    }
    if !format.matches_signature(bytes) {
        return Err(AppError::UploadRejected(format!(
            "File content is not a valid {} image",
            format.extension()
        )));
    }
    Ok(format)
}

pub fn photo_key(resume_id: Uuid, format: ImageFormat) -> String {
    format!("photos/{resume_id}/{}.{}", Uuid::new_v4(), format.extension())
}

// ────────────────────────────────────────────────────────────────────────────
// Storage backends
// ────────────────────────────────────────────────────────────────────────────

/// Where uploaded photos live. Returns the reference to store on the resume.
///
/// Carried in `AppState` as `Arc<dyn PhotoStore>`.
#[async_trait]
pub trait PhotoStore: Send + Sync {
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<String, AppError>;
}

pub struct S3PhotoStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_base_url: String,
}

impl S3PhotoStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: String, public_base_url: String) -> Self {
        Self {
            client,
            bucket,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl PhotoStore for S3PhotoStore {
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<String, AppError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 upload failed: {e}")))?;

        info!("Uploaded photo to s3://{}/{}", self.bucket, key);
        Ok(format!("{}/{}", self.public_base_url, key))
    }
}
