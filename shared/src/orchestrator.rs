//! Client-side flow: check connectivity on load, then for every selected file
//! run upload-test followed by analyze.
//!
//! `transition` is pure. The caller owns the I/O: it runs each returned
//! [`Effect`] and feeds the outcome back as an [`Event`]. Every call started
//! for a file selection is tagged with its [`SelectionId`], so results that
//! arrive after a newer selection are dropped instead of overwriting it.

use derive_more::{Display, From};
use serde_json::json;
use strum::IntoStaticStr;

use crate::classification::ClassificationPayload;
use crate::{AnalyzeResponse, ConnectionResponse, ErrorResponse, UploadTestResponse};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From)]
#[display(fmt = "selection #{}", _0)]
pub struct SelectionId(u64);

#[derive(Debug, Clone, PartialEq, Display)]
pub enum ClientError {
    #[display(fmt = "network error: {}", _0)]
    Network(String),
    #[display(fmt = "server responded with {}: {}", status, message)]
    Status { status: u16, message: String },
    #[display(fmt = "could not read response: {}", _0)]
    Decode(String),
    #[display(fmt = "request aborted")]
    Aborted,
}

impl ClientError {
    pub fn from_error_response(status: u16, body: &ErrorResponse) -> Self {
        Self::Status {
            status,
            message: body.summary(),
        }
    }

    /// Error for a non-2xx reply. Uses the server's `{error, details}` body
    /// when it has one, otherwise the status line text.
    pub fn from_status_body(status: u16, status_text: &str, body: &str) -> Self {
        match serde_json::from_str::<ErrorResponse>(body) {
            Ok(error) => Self::from_error_response(status, &error),
            Err(_) => Self::Status {
                status,
                message: status_text.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionStatus {
    Checking,
    Connected(String),
    Failed(String),
}

impl ConnectionStatus {
    pub fn text(&self) -> &str {
        match self {
            Self::Checking => "Checking API connection...",
            Self::Connected(message) | Self::Failed(message) => message,
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub message: String,
    pub payload: ClassificationPayload,
    /// Full response as received, for the debug view.
    pub raw: serde_json::Value,
}

impl From<AnalyzeResponse> for AnalysisResult {
    fn from(response: AnalyzeResponse) -> Self {
        let raw = json!({
            "message": response.message,
            "analysis": response.analysis,
        });
        Self {
            message: response.message,
            payload: ClassificationPayload::from_value(response.analysis),
            raw,
        }
    }
}

#[derive(Debug, Clone, PartialEq, IntoStaticStr)]
pub enum Phase {
    Idle,
    ConnectivityChecked,
    Uploading,
    UploadTested,
    Analyzing,
    Analyzed(AnalysisResult),
    Errored(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    pub connection: ConnectionStatus,
    pub phase: Phase,
    pub upload_status: Option<String>,
    pub selection: Option<SelectionId>,
    next_selection: u64,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            connection: ConnectionStatus::Checking,
            phase: Phase::Idle,
            upload_status: None,
            selection: None,
            next_selection: 0,
        }
    }
}

impl UiState {
    pub fn loading(&self) -> bool {
        matches!(
            self.phase,
            Phase::Uploading | Phase::UploadTested | Phase::Analyzing
        )
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            Phase::Errored(message) => Some(message),
            _ => None,
        }
    }

    pub fn analysis(&self) -> Option<&AnalysisResult> {
        match &self.phase {
            Phase::Analyzed(result) => Some(result),
            _ => None,
        }
    }

    pub fn phase_name(&self) -> &'static str {
        (&self.phase).into()
    }

    fn in_flight(&self) -> Option<SelectionId> {
        self.selection.filter(|_| self.loading())
    }

    fn is_current(&self, selection: SelectionId) -> bool {
        self.selection == Some(selection)
    }
}

#[derive(Debug)]
pub enum Event {
    ConnectionChecked(Result<ConnectionResponse, ClientError>),
    FileSelected,
    UploadTestDone(SelectionId, Result<UploadTestResponse, ClientError>),
    AnalyzeDispatched(SelectionId),
    AnalyzeDone(SelectionId, Result<AnalyzeResponse, ClientError>),
    TornDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    CheckConnection,
    UploadTest(SelectionId),
    Analyze(SelectionId),
    CancelInFlight(SelectionId),
}

pub fn init() -> (UiState, Vec<Effect>) {
    (UiState::default(), vec![Effect::CheckConnection])
}

pub fn transition(state: UiState, event: Event) -> (UiState, Vec<Effect>) {
    match event {
        Event::ConnectionChecked(result) => {
            let connection = match result {
                Ok(response) => ConnectionStatus::Connected(response.message),
                Err(err) => ConnectionStatus::Failed(format!("API connection failed: {}", err)),
            };
            let phase = match state.phase {
                Phase::Idle => Phase::ConnectivityChecked,
                phase => phase,
            };
            (
                UiState {
                    connection,
                    phase,
                    ..state
                },
                vec![],
            )
        }

        Event::FileSelected => {
            let mut effects = Vec::new();
            if let Some(previous) = state.in_flight() {
                effects.push(Effect::CancelInFlight(previous));
            }
            let selection = SelectionId(state.next_selection);
            effects.push(Effect::UploadTest(selection));
            (
                UiState {
                    phase: Phase::Uploading,
                    upload_status: None,
                    selection: Some(selection),
                    next_selection: state.next_selection + 1,
                    ..state
                },
                effects,
            )
        }

        Event::UploadTestDone(selection, result)
            if state.is_current(selection) && state.phase == Phase::Uploading =>
        {
            match result {
                Ok(response) => (
                    UiState {
                        phase: Phase::UploadTested,
                        upload_status: Some(response.message),
                        ..state
                    },
                    vec![Effect::Analyze(selection)],
                ),
                Err(err) => (
                    UiState {
                        phase: Phase::Errored(format!("Upload test failed: {}", err)),
                        ..state
                    },
                    vec![],
                ),
            }
        }

        Event::AnalyzeDispatched(selection)
            if state.is_current(selection) && state.phase == Phase::UploadTested =>
        {
            (
                UiState {
                    phase: Phase::Analyzing,
                    ..state
                },
                vec![],
            )
        }

        Event::AnalyzeDone(selection, result)
            if state.is_current(selection)
                && matches!(state.phase, Phase::UploadTested | Phase::Analyzing) =>
        {
            let phase = match result {
                Ok(response) => Phase::Analyzed(AnalysisResult::from(response)),
                Err(err) => Phase::Errored(format!("Analysis failed: {}", err)),
            };
            (UiState { phase, ..state }, vec![])
        }

        Event::TornDown => {
            let effects = state
                .in_flight()
                .map(Effect::CancelInFlight)
                .into_iter()
                .collect();
            (
                UiState {
                    selection: None,
                    ..state
                },
                effects,
            )
        }

        // Outcome for a superseded selection, or arriving out of order.
        Event::UploadTestDone(..) | Event::AnalyzeDispatched(..) | Event::AnalyzeDone(..) => {
            (state, vec![])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FileInfo;
    use pretty_assertions::assert_eq;

    #[test]
    fn error_body_from_server_becomes_status_error() {
        let body = r#"{"error":"Image analysis failed","details":"HuggingFace API responded with status 503"}"#;
        let err = ClientError::from_status_body(500, "Internal Server Error", body);

        assert_eq!(
            err,
            ClientError::Status {
                status: 500,
                message: "Image analysis failed: HuggingFace API responded with status 503".into(),
            }
        );
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn non_json_error_body_falls_back_to_status_text() {
        let err = ClientError::from_status_body(502, "Bad Gateway", "<html>upstream down</html>");

        assert_eq!(
            err,
            ClientError::Status {
                status: 502,
                message: "Bad Gateway".into(),
            }
        );
    }

    fn upload_ok() -> Result<UploadTestResponse, ClientError> {
        Ok(UploadTestResponse {
            message: "Image uploaded successfully".into(),
            file_info: FileInfo {
                filename: "dog.jpg".into(),
                size: 1024,
                mimetype: "image/jpeg".into(),
            },
        })
    }

    fn analyze_ok(analysis: serde_json::Value) -> Result<AnalyzeResponse, ClientError> {
        Ok(AnalyzeResponse {
            message: "Analysis completed successfully".into(),
            analysis,
        })
    }

    fn select(state: UiState) -> (UiState, SelectionId) {
        let (state, effects) = transition(state, Event::FileSelected);
        let selection = state.selection.expect("selection assigned");
        assert!(effects.contains(&Effect::UploadTest(selection)));
        (state, selection)
    }

    #[test]
    fn init_checks_connection() {
        let (state, effects) = init();
        assert_eq!(state.phase, Phase::Idle);
        assert_eq!(state.connection, ConnectionStatus::Checking);
        assert!(!state.loading());
        assert_eq!(effects, vec![Effect::CheckConnection]);
    }

    #[test]
    fn connection_success_and_failure() {
        let (state, _) = init();
        let (ok, effects) = transition(
            state.clone(),
            Event::ConnectionChecked(Ok(ConnectionResponse {
                message: "HuggingFace API connection successful".into(),
            })),
        );
        assert!(effects.is_empty());
        assert_eq!(ok.phase, Phase::ConnectivityChecked);
        assert!(ok.connection.is_connected());
        assert!(ok.connection.text().contains("successful"));

        let (failed, _) = transition(
            state,
            Event::ConnectionChecked(Err(ClientError::Status {
                status: 500,
                message: "HuggingFace API connection failed: error sending request".into(),
            })),
        );
        assert!(!failed.connection.is_connected());
        assert!(!failed.connection.text().is_empty());
        assert!(!failed.connection.text().contains("successful"));
    }

    #[test]
    fn happy_path_runs_upload_then_analyze() {
        let (state, _) = init();
        let (state, selection) = select(state);
        assert_eq!(state.phase, Phase::Uploading);
        assert!(state.loading());

        let (state, effects) = transition(state, Event::UploadTestDone(selection, upload_ok()));
        assert_eq!(state.phase, Phase::UploadTested);
        assert_eq!(state.upload_status.as_deref(), Some("Image uploaded successfully"));
        assert_eq!(effects, vec![Effect::Analyze(selection)]);
        assert!(state.loading());

        let (state, _) = transition(state, Event::AnalyzeDispatched(selection));
        assert_eq!(state.phase, Phase::Analyzing);
        assert!(state.loading());

        let analysis = serde_json::json!([{ "label": "golden retriever", "score": 0.97 }]);
        let (state, effects) =
            transition(state, Event::AnalyzeDone(selection, analyze_ok(analysis.clone())));
        assert!(effects.is_empty());
        assert!(!state.loading());

        let result = state.analysis().expect("analysis stored");
        assert_eq!(result.message, "Analysis completed successfully");
        assert_eq!(result.raw["analysis"], analysis);
        assert!(matches!(
            result.payload,
            ClassificationPayload::RecognizedPredictionList(_)
        ));
    }

    #[test]
    fn upload_failure_halts_without_analyze() {
        let (state, _) = init();
        let (state, selection) = select(state);

        let (state, effects) = transition(
            state,
            Event::UploadTestDone(selection, Err(ClientError::Network("connection refused".into()))),
        );
        assert!(effects.is_empty());
        assert!(!state.loading());
        let error = state.error().expect("error banner");
        assert!(error.starts_with("Upload test failed"));
        assert!(error.contains("connection refused"));
    }

    #[test]
    fn upstream_503_surfaces_as_error_and_clears_loading() {
        let (state, _) = init();
        let (state, selection) = select(state);
        let (state, _) = transition(state, Event::UploadTestDone(selection, upload_ok()));
        let (state, _) = transition(state, Event::AnalyzeDispatched(selection));

        let body = ErrorResponse::with_details(
            "Image analysis failed",
            "HuggingFace API responded with status 503",
        );
        let (state, _) = transition(
            state,
            Event::AnalyzeDone(selection, Err(ClientError::from_error_response(500, &body))),
        );

        assert!(!state.loading());
        let error = state.error().expect("error banner");
        assert!(!error.is_empty());
        assert!(error.contains("503"));
        assert!(state.analysis().is_none());
    }

    #[test]
    fn opaque_analysis_is_still_kept_for_debug_view() {
        let (state, _) = init();
        let (state, selection) = select(state);
        let (state, _) = transition(state, Event::UploadTestDone(selection, upload_ok()));
        let (state, _) = transition(state, Event::AnalyzeDispatched(selection));
        let raw = serde_json::json!({ "note": "unsupported" });
        let (state, _) = transition(state, Event::AnalyzeDone(selection, analyze_ok(raw.clone())));

        let result = state.analysis().unwrap();
        assert!(result.payload.rendered().is_none());
        assert_eq!(result.raw["analysis"], raw);
    }

    #[test]
    fn reselect_cancels_previous_call_and_ignores_its_result() {
        let (state, _) = init();
        let (state, first) = select(state);

        let (state, effects) = transition(state, Event::FileSelected);
        let second = state.selection.unwrap();
        assert_ne!(first, second);
        assert_eq!(
            effects,
            vec![Effect::CancelInFlight(first), Effect::UploadTest(second)]
        );

        let before = state.clone();
        let (state, effects) = transition(state, Event::UploadTestDone(first, upload_ok()));
        assert!(effects.is_empty());
        assert_eq!(state, before);

        let (state, effects) =
            transition(state, Event::AnalyzeDone(first, analyze_ok(serde_json::json!([]))));
        assert!(effects.is_empty());
        assert_eq!(state.phase, Phase::Uploading);
    }

    #[test]
    fn reselect_after_completion_does_not_cancel() {
        let (state, _) = init();
        let (state, selection) = select(state);
        let (state, _) = transition(
            state,
            Event::UploadTestDone(selection, Err(ClientError::Decode("expected value".into()))),
        );

        let (state, effects) = transition(state, Event::FileSelected);
        assert_eq!(effects, vec![Effect::UploadTest(state.selection.unwrap())]);
        assert_eq!(state.error(), None);
    }

    #[test]
    fn late_connection_result_keeps_upload_phase() {
        let (state, _) = init();
        let (state, _) = select(state);
        let (state, _) = transition(
            state,
            Event::ConnectionChecked(Err(ClientError::Network("offline".into()))),
        );
        assert_eq!(state.phase, Phase::Uploading);
        assert_eq!(state.connection.text(), "API connection failed: network error: offline");
    }

    #[test]
    fn teardown_cancels_in_flight_call() {
        let (state, _) = init();
        let (state, selection) = select(state);

        let (state, effects) = transition(state, Event::TornDown);
        assert_eq!(effects, vec![Effect::CancelInFlight(selection)]);

        let (state, effects) =
            transition(state, Event::UploadTestDone(selection, Err(ClientError::Aborted)));
        assert!(effects.is_empty());
        assert_eq!(state.error(), None);
    }

    #[test]
    fn phase_names_for_logging() {
        let (state, _) = init();
        assert_eq!(state.phase_name(), "Idle");
        let (state, _) = select(state);
        assert_eq!(state.phase_name(), "Uploading");
    }
}
