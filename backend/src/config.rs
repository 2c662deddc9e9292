use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_API_BASE_URL: &str = "https://api-inference.huggingface.co/models";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{name} must be a positive integer, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
    #[error("Invalid inference API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Everything the server needs, resolved once at startup and handed to the
/// app factory.
#[derive(Debug, Clone)]
pub struct Config {
    pub hf_api_key: String,
    pub host: String,
    pub port: u16,
    pub model: String,
    pub model_url: Url,
    pub request_timeout: Option<Duration>,
    pub max_upload_bytes: Option<usize>,
    pub frontend_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let model = non_empty("HF_MODEL").unwrap_or_else(|| shared::VISION_MODEL.to_string());
        let base_url = non_empty("HF_API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        let model_url = Url::parse(&format!("{}/{}", base_url.trim_end_matches('/'), model))?;

        let port = match non_empty("PORT") {
            Some(value) => parse_number::<u16>("PORT", value)?,
            None => DEFAULT_PORT,
        };
        let request_timeout = non_empty("HF_TIMEOUT_SECS")
            .map(|value| parse_number::<u64>("HF_TIMEOUT_SECS", value))
            .transpose()?
            .map(Duration::from_secs);
        let max_upload_bytes = non_empty("MAX_UPLOAD_BYTES")
            .map(|value| parse_number::<usize>("MAX_UPLOAD_BYTES", value))
            .transpose()?;

        let frontend_dir = match non_empty("FRONTEND_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => match lookup("CARGO_MANIFEST_DIR") {
                Some(manifest_dir) => PathBuf::from(format!("{}/../frontend/dist", manifest_dir)),
                None => PathBuf::from("/usr/src/app/frontend/dist"),
            },
        };

        Ok(Self {
            hf_api_key: lookup("HF_API_KEY").unwrap_or_default(),
            host: non_empty("BIND_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            model,
            model_url,
            request_timeout,
            max_upload_bytes,
            frontend_dir,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn has_api_key(&self) -> bool {
        !self.hf_api_key.trim().is_empty()
    }
}

fn parse_number<T>(name: &'static str, value: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    match value.trim().parse::<T>() {
        Ok(number) if number > T::default() => Ok(number),
        _ => Err(ConfigError::InvalidNumber { name, value }),
    }
}
