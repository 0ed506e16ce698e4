//! Image host for hotel pictures
//!
//! Images go to an S3-compatible bucket; the object key is the opaque
//! reference stored on the hotel.

use aws_sdk_s3::{Client, error::DisplayErrorContext, primitives::ByteStream};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

/// Notice shown when an image could not be stored
pub const UPLOAD_FAILED_NOTICE: &str = "There was a problem uploading your image, please try again";

/// Image received in a multipart form
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),

    #[error("image storage failed: {0}")]
    Storage(String),
}

/// Uploads images to S3
#[derive(Clone)]
pub struct ImageStore {
    s3_client: Client,
    bucket: String,
    key_prefix: String,
}

impl ImageStore {
    pub fn new(s3_client: Client, bucket: String, key_prefix: String) -> Self {
        Self {
            s3_client,
            bucket,
            key_prefix,
        }
    }

    /// Store an image and return its reference
    pub async fn upload(&self, image: UploadedImage) -> Result<String, UploadError> {
        let content_type = image
            .content_type
            .clone()
            .unwrap_or_else(|| "application/octet-stream".to_string());
        if !content_type.starts_with("image/") {
            return Err(UploadError::UnsupportedContentType(content_type));
        }

        let key = image_key(
            &self.key_prefix,
            Uuid::new_v4(),
            image.file_name.as_deref(),
            &content_type,
        );
        info!("Uploading hotel image to S3: {}", key);

        self.s3_client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(image.bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| UploadError::Storage(DisplayErrorContext(e).to_string()))?;

        Ok(key)
    }
}

/// Object key for an upload: prefix, random id, and an extension taken from
/// the file name or, failing that, the content type
pub fn image_key(prefix: &str, id: Uuid, file_name: Option<&str>, content_type: &str) -> String {
    let from_name = file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| {
            !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric())
        });

    let extension = from_name.unwrap_or_else(|| {
        match content_type {
            "image/jpeg" => "jpg",
            "image/png" => "png",
            "image/gif" => "gif",
            "image/webp" => "webp",
            "image/svg+xml" => "svg",
            _ => "img",
        }
        .to_string()
    });

    format!("{}{}.{}", prefix, id, extension)
}
