use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::products::dtos::ImageDto;

/// Multipart form for uploading product images
#[derive(Debug, Deserialize, ToSchema)]
#[allow(dead_code)]
pub struct UploadImagesDto {
    /// One or more image files, sent as repeated `images[]` (or `images`) parts
    #[schema(value_type = Vec<String>, format = Binary, content_media_type = "application/octet-stream")]
    pub images: Vec<String>,
}

/// A file part read from an upload request
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ImageUploadResponseDto {
    /// Number of images stored by this request
    pub uploaded: usize,
    pub images: Vec<ImageDto>,
}
