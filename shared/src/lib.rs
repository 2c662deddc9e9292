pub mod classification;
pub mod orchestrator;

use serde::{Deserialize, Serialize};

pub use classification::{ClassificationPayload, Confidence, Prediction, RenderedPrediction};

/// Model every request is proxied to.
pub const VISION_MODEL: &str = "microsoft/resnet-50";

/// Multipart field carrying the uploaded image.
pub const IMAGE_FIELD: &str = "image";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileInfo {
    pub filename: String,
    pub size: usize,
    pub mimetype: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadTestResponse {
    pub message: String,
    pub file_info: FileInfo,
}

/// `analysis` is relayed untouched from the inference service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub message: String,
    pub analysis: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }

    /// One line suitable for an error banner.
    pub fn summary(&self) -> String {
        match &self.details {
            Some(details) if !details.is_empty() => format!("{}: {}", self.error, details),
            _ => self.error.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn upload_response_uses_camel_case_file_info() {
        let response = UploadTestResponse {
            message: "Image uploaded successfully".into(),
            file_info: FileInfo {
                filename: "cat.png".into(),
                size: 42,
                mimetype: "image/png".into(),
            },
        };

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "message": "Image uploaded successfully",
                "fileInfo": { "filename": "cat.png", "size": 42, "mimetype": "image/png" }
            })
        );
    }

    #[test]
    fn error_response_omits_missing_details() {
        let plain = serde_json::to_value(ErrorResponse::new("No image file provided")).unwrap();
        assert_eq!(plain, json!({ "error": "No image file provided" }));

        let parsed: ErrorResponse =
            serde_json::from_value(json!({ "error": "Image analysis failed", "details": "status 503" }))
                .unwrap();
        assert_eq!(parsed.summary(), "Image analysis failed: status 503");
    }
}
