use actix_multipart::{Multipart, MultipartError};
use actix_web::{HttpMessage, HttpRequest};
use futures::TryStreamExt;
use shared::{FileInfo, IMAGE_FIELD};
use thiserror::Error;

const DEFAULT_MIMETYPE: &str = "application/octet-stream";

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("No image file provided")]
    MissingFile,
    #[error("Image exceeds the upload limit of {limit} bytes")]
    TooLarge { limit: usize },
    #[error("{0}")]
    Multipart(#[from] MultipartError),
}

/// An image received in one request. Dropped with the request.
#[derive(Debug)]
pub struct UploadedImage {
    pub filename: String,
    pub mimetype: String,
    pub bytes: Vec<u8>,
}

impl UploadedImage {
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn file_info(&self) -> FileInfo {
        FileInfo {
            filename: self.filename.clone(),
            size: self.size(),
            mimetype: self.mimetype.clone(),
        }
    }
}

/// Pulls the `image` file part out of a multipart form. Only a part that
/// carries a filename counts as a file; the first one wins and every other
/// part is drained and ignored.
pub async fn read_image(
    req: &HttpRequest,
    mut payload: Multipart,
    max_bytes: Option<usize>,
) -> Result<UploadedImage, UploadError> {
    if !req.content_type().eq_ignore_ascii_case("multipart/form-data") {
        return Err(UploadError::MissingFile);
    }

    let mut image = None;
    let mut saw_part = false;

    loop {
        let next = match payload.try_next().await {
            Ok(next) => next,
            // A form with no entries at all ends before the first boundary.
            Err(MultipartError::Incomplete) if !saw_part => return Err(UploadError::MissingFile),
            Err(e) => return Err(e.into()),
        };
        let Some(mut field) = next else {
            break;
        };
        saw_part = true;

        let filename = field
            .content_disposition()
            .and_then(|disposition| disposition.get_filename())
            .map(str::to_owned);
        let is_image = image.is_none() && field.name() == Some(IMAGE_FIELD);

        match filename {
            Some(filename) if is_image => {
                let mimetype = field
                    .content_type()
                    .map(|mime| mime.essence_str().to_string())
                    .unwrap_or_else(|| DEFAULT_MIMETYPE.to_string());

                let mut bytes = Vec::new();
                while let Some(chunk) = field.try_next().await? {
                    if let Some(limit) = max_bytes {
                        if bytes.len() + chunk.len() > limit {
                            return Err(UploadError::TooLarge { limit });
                        }
                    }
                    bytes.extend_from_slice(&chunk);
                }

                image = Some(UploadedImage {
                    filename,
                    mimetype,
                    bytes,
                });
            }
            _ => {
                while field.try_next().await?.is_some() {}
            }
        }
    }

    image.ok_or(UploadError::MissingFile)
}
