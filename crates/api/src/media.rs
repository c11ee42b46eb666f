//! Media upload pipeline: multipart parsing, MIME/size validation, local
//! storage, and profile-picture resizing.
//!
//! One file per request under a known field name. Images are capped at 2 MB
//! and PDFs at 5 MB; anything failing validation is rejected before a single
//! byte is written. Stored files get a UUID name under the configured upload
//! directory and are served statically under `/uploads`, so the returned URL
//! is stable for the life of the record that owns it.

use std::collections::HashMap;
use std::path::Path;

use axum::extract::Multipart;
use image::imageops::FilterType;
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::error::{AppError, AppResult};

/// Maximum accepted image upload size.
pub const MAX_IMAGE_BYTES: usize = 2_000_000;

/// Maximum accepted PDF upload size.
pub const MAX_PDF_BYTES: usize = 5_000_000;

/// Square edge profile pictures are resized to.
pub const PROFILE_PICTURE_EDGE: u32 = 200;

/// What kind of file an endpoint accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Image,
    Pdf,
}

/// One uploaded file part, held in memory until validated.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub field_name: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// A fully-read multipart form: text fields by name plus file parts.
#[derive(Debug, Default)]
pub struct MultipartForm {
    pub fields: HashMap<String, String>,
    pub files: Vec<UploadedFile>,
}

impl MultipartForm {
    /// Drain a [`Multipart`] stream into memory.
    pub async fn parse(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            let name = field.name().unwrap_or("").to_string();

            if let Some(file_name) = field.file_name() {
                let file_name = file_name.to_string();
                let content_type = field.content_type().unwrap_or("").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                form.files.push(UploadedFile {
                    field_name: name,
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            } else {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                form.fields.insert(name, text);
            }
        }

        Ok(form)
    }

    /// Look up a text field.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Look up a file part by its field name.
    pub fn file(&self, field_name: &str) -> Option<&UploadedFile> {
        self.files.iter().find(|f| f.field_name == field_name)
    }
}

/// Validate a file part against the accepted kind and its size ceiling.
pub fn validate_upload(file: &UploadedFile, kind: UploadKind) -> AppResult<()> {
    match kind {
        UploadKind::Image => {
            if !file.content_type.starts_with("image/") {
                return Err(AppError::BadRequest("Only image files are allowed".into()));
            }
            if file.bytes.len() > MAX_IMAGE_BYTES {
                return Err(AppError::BadRequest(
                    "Image exceeds the 2MB size limit".into(),
                ));
            }
        }
        UploadKind::Pdf => {
            if file.content_type != "application/pdf" {
                return Err(AppError::BadRequest("Only PDF files are allowed".into()));
            }
            if file.bytes.len() > MAX_PDF_BYTES {
                return Err(AppError::BadRequest("PDF exceeds the 5MB size limit".into()));
            }
        }
    }
    Ok(())
}

/// Validate and store an upload, returning its public URL.
///
/// `resize_to` applies only to images: the decoded image is cover-cropped to
/// the given square edge before being written (profile pictures).
pub async fn store_upload(
    config: &ServerConfig,
    file: &UploadedFile,
    kind: UploadKind,
    resize_to: Option<u32>,
) -> AppResult<String> {
    validate_upload(file, kind)?;

    let ext = extension_for(file, kind);
    let stored_name = format!("{}.{ext}", Uuid::new_v4());
    let dir = Path::new(&config.upload_dir);
    let path = dir.join(&stored_name);

    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to create upload dir: {e}")))?;

    match (kind, resize_to) {
        (UploadKind::Image, Some(edge)) => {
            let img = image::load_from_memory(&file.bytes)
                .map_err(|e| AppError::BadRequest(format!("Unreadable image: {e}")))?;
            let resized = img.resize_to_fill(edge, edge, FilterType::Triangle);
            resized
                .save(&path)
                .map_err(|e| AppError::InternalError(format!("Failed to store image: {e}")))?;
        }
        _ => {
            tokio::fs::write(&path, &file.bytes)
                .await
                .map_err(|e| AppError::InternalError(format!("Failed to store file: {e}")))?;
        }
    }

    Ok(format!("{}/uploads/{stored_name}", config.base_url))
}

/// Pick a storage extension from the declared content type, falling back to
/// the client-supplied file name.
fn extension_for(file: &UploadedFile, kind: UploadKind) -> String {
    match kind {
        UploadKind::Pdf => "pdf".to_string(),
        UploadKind::Image => match file.content_type.as_str() {
            "image/png" => "png".to_string(),
            "image/jpeg" => "jpg".to_string(),
            "image/webp" => "webp".to_string(),
            _ => Path::new(&file.file_name)
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("png")
                .to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_file(bytes: usize) -> UploadedFile {
        UploadedFile {
            field_name: "profile_picture".to_string(),
            file_name: "me.png".to_string(),
            content_type: "image/png".to_string(),
            bytes: vec![0; bytes],
        }
    }

    fn pdf_file(bytes: usize) -> UploadedFile {
        UploadedFile {
            field_name: "pdf".to_string(),
            file_name: "book.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            bytes: vec![0; bytes],
        }
    }

    #[test]
    fn image_within_limit_passes() {
        assert!(validate_upload(&image_file(1024), UploadKind::Image).is_ok());
    }

    #[test]
    fn oversized_image_is_rejected() {
        let result = validate_upload(&image_file(MAX_IMAGE_BYTES + 1), UploadKind::Image);
        assert!(result.is_err());
    }

    #[test]
    fn non_image_mime_is_rejected_before_storage() {
        let mut file = image_file(10);
        file.content_type = "text/html".to_string();
        assert!(validate_upload(&file, UploadKind::Image).is_err());
    }

    #[test]
    fn pdf_mime_and_size_are_enforced() {
        assert!(validate_upload(&pdf_file(1024), UploadKind::Pdf).is_ok());
        assert!(validate_upload(&pdf_file(MAX_PDF_BYTES + 1), UploadKind::Pdf).is_err());

        let mut file = pdf_file(10);
        file.content_type = "image/png".to_string();
        assert!(validate_upload(&file, UploadKind::Pdf).is_err());
    }

    #[test]
    fn extension_follows_content_type() {
        assert_eq!(extension_for(&image_file(1), UploadKind::Image), "png");
        assert_eq!(extension_for(&pdf_file(1), UploadKind::Pdf), "pdf");

        let mut jpeg = image_file(1);
        jpeg.content_type = "image/jpeg".to_string();
        assert_eq!(extension_for(&jpeg, UploadKind::Image), "jpg");
    }
}
