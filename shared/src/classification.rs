use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl Prediction {
    pub fn score_or_zero(&self) -> f64 {
        self.score.unwrap_or(0.0)
    }

    fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let label = object.get("label")?.as_str()?.to_string();
        let score = match object.get("score") {
            None | Some(Value::Null) => None,
            Some(score) => Some(score.as_f64()?),
        };
        Some(Self { label, score })
    }
}

/// Shape of the inference service's answer. Only a list in which every entry
/// has a string `label` (and, optionally, a numeric `score`) is recognized.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassificationPayload {
    RecognizedPredictionList(Vec<Prediction>),
    OpaquePayload(Value),
}

impl ClassificationPayload {
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Array(items) => {
                match items.iter().map(Prediction::from_value).collect::<Option<Vec<_>>>() {
                    Some(predictions) => Self::RecognizedPredictionList(predictions),
                    None => Self::OpaquePayload(Value::Array(items)),
                }
            }
            other => Self::OpaquePayload(other),
        }
    }

    pub fn sorted_predictions(&self) -> Option<Vec<Prediction>> {
        match self {
            Self::RecognizedPredictionList(predictions) => Some(sort_by_confidence(predictions)),
            Self::OpaquePayload(_) => None,
        }
    }

    /// Display rows, highest confidence first. `None` for opaque payloads.
    pub fn rendered(&self) -> Option<Vec<RenderedPrediction>> {
        self.sorted_predictions()
            .map(|sorted| sorted.into_iter().map(RenderedPrediction::from).collect())
    }
}

/// Descending by score, missing scores count as zero. Ties keep their input order.
pub fn sort_by_confidence(predictions: &[Prediction]) -> Vec<Prediction> {
    let mut sorted = predictions.to_vec();
    sorted.sort_by(|a, b| {
        b.score_or_zero()
            .partial_cmp(&a.score_or_zero())
            .unwrap_or(Ordering::Equal)
    });
    sorted
}

#[derive(Debug, Clone, PartialEq)]
pub struct Confidence {
    pub percent: f64,
}

impl Confidence {
    pub fn from_score(score: f64) -> Self {
        Self {
            percent: score * 100.0,
        }
    }

    pub fn label(&self) -> String {
        format!("{:.2}%", self.percent)
    }

    /// Width of the confidence bar, kept inside its track.
    pub fn bar_width(&self) -> f64 {
        self.percent.clamp(0.0, 100.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPrediction {
    pub label: String,
    pub confidence: Option<Confidence>,
}

impl From<Prediction> for RenderedPrediction {
    fn from(prediction: Prediction) -> Self {
        Self {
            label: prediction.label,
            confidence: prediction.score.map(Confidence::from_score),
        }
    }
}
