use gloo_file::File as GlooFile;
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use shared::orchestrator::ClientError;
use shared::{AnalyzeResponse, ConnectionResponse, IMAGE_FIELD, UploadTestResponse};
use wasm_bindgen::JsValue;
use web_sys::{AbortSignal, FormData};

// Same origin unless the build points the app elsewhere.
const API_BASE_URL: &str = match option_env!("API_BASE_URL") {
    Some(url) => url,
    None => "",
};

fn endpoint(path: &str) -> String {
    format!("{}{}", API_BASE_URL.trim_end_matches('/'), path)
}

pub async fn check_connection() -> Result<ConnectionResponse, ClientError> {
    let response = Request::get(&endpoint("/api/test-hf-connection"))
        .send()
        .await
        .map_err(request_error)?;
    read_json(response).await
}

pub async fn test_upload(
    file: &GlooFile,
    signal: Option<&AbortSignal>,
) -> Result<UploadTestResponse, ClientError> {
    post_image("/api/test-upload", file, signal).await
}

pub async fn analyze_image(
    file: &GlooFile,
    signal: Option<&AbortSignal>,
) -> Result<AnalyzeResponse, ClientError> {
    post_image("/api/analyze-image", file, signal).await
}

async fn post_image<T: DeserializeOwned>(
    path: &str,
    file: &GlooFile,
    signal: Option<&AbortSignal>,
) -> Result<T, ClientError> {
    let form_data = FormData::new().map_err(js_error)?;
    form_data
        .append_with_blob_and_filename(IMAGE_FIELD, file.as_ref(), &file.name())
        .map_err(js_error)?;

    let response = Request::post(&endpoint(path))
        .abort_signal(signal)
        .body(form_data)
        .map_err(request_error)?
        .send()
        .await
        .map_err(request_error)?;
    read_json(response).await
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    if response.ok() {
        return response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()));
    }

    let body = response.text().await.unwrap_or_default();
    Err(ClientError::from_status_body(
        response.status(),
        &response.status_text(),
        &body,
    ))
}

fn request_error(err: gloo_net::Error) -> ClientError {
    match err {
        gloo_net::Error::JsError(js_error) if js_error.name == "AbortError" => ClientError::Aborted,
        other => {
            gloo_console::error!(format!("Fetch error: {:?}", other));
            ClientError::Network(other.to_string())
        }
    }
}

fn js_error(err: JsValue) -> ClientError {
    ClientError::Network(format!("{:?}", err))
}
