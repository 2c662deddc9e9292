use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use futures::FutureExt;
use futures::future::LocalBoxFuture;
use reqwest::Client as HttpClient;
use serde_json::{Value, json};
use url::Url;

use super::{InferenceClient, InferenceError};
use crate::config::Config;

#[derive(Clone)]
pub struct HuggingFaceClient {
    http_client: HttpClient,
    model_url: Url,
    api_key: String,
}

impl HuggingFaceClient {
    pub fn new(config: &Config) -> Result<Self, InferenceError> {
        let mut builder = HttpClient::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| InferenceError::Client(e.to_string()))?;

        Ok(Self {
            http_client,
            model_url: config.model_url.clone(),
            api_key: config.hf_api_key.clone(),
        })
    }

    pub fn model_url(&self) -> &Url {
        &self.model_url
    }

    async fn head_model(&self) -> Result<(), InferenceError> {
        let response = self
            .http_client
            .head(self.model_url.clone())
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| InferenceError::Unreachable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(InferenceError::UpstreamStatus(response.status().as_u16()));
        }
        Ok(())
    }

    async fn post_image(&self, image: &[u8]) -> Result<Value, InferenceError> {
        let payload = json!({
            "inputs": {
                "image": STANDARD.encode(image)
            }
        });

        log::debug!(
            "Posting {} byte image to {}",
            image.len(),
            self.model_url
        );

        let response = self
            .http_client
            .post(self.model_url.clone())
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| InferenceError::Unreachable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(InferenceError::UpstreamStatus(response.status().as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| InferenceError::Decode(e.to_string()))
    }
}

impl InferenceClient for HuggingFaceClient {
    fn check_connection(&self) -> LocalBoxFuture<'_, Result<(), InferenceError>> {
        self.head_model().boxed_local()
    }

    fn classify<'a>(&'a self, image: &'a [u8]) -> LocalBoxFuture<'a, Result<Value, InferenceError>> {
        self.post_image(image).boxed_local()
    }
}
