//! Server to client payloads

use serde::{Deserialize, Serialize};

use senas_core::{GestureCatalog, PredictionResult};

use crate::{GestureTrainingData, WireResult};

/// One-shot prediction response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub gesture: Option<String>,
    pub text: Option<String>,
    pub confidence: f32,
    pub processing_time_ms: f64,
}

impl From<&PredictionResult> for PredictionResponse {
    fn from(r: &PredictionResult) -> Self {
        Self {
            gesture: r.gesture.clone(),
            text: r.text.clone(),
            confidence: r.confidence,
            processing_time_ms: r.processing_time_ms,
        }
    }
}

/// Typed streaming message, tagged by `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerMessage {
    Prediction {
        gesture: Option<String>,
        text: Option<String>,
        confidence: f32,
    },
    Error {
        message: String,
    },
}

impl ServerMessage {
    pub fn prediction(result: &PredictionResult) -> Self {
        ServerMessage::Prediction {
            gesture: result.gesture.clone(),
            text: result.text.clone(),
            confidence: result.confidence,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error {
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ServerMessage::Error { .. })
    }

    pub fn to_json(&self) -> WireResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> WireResult<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Catalog entry as listed to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GestureSummary {
    pub key: String,
    pub name: String,
    pub text: String,
}

/// `{ gestures: [...] }` in catalog order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GestureListing {
    pub gestures: Vec<GestureSummary>,
}

impl GestureListing {
    pub fn from_catalog(catalog: &GestureCatalog) -> Self {
        let gestures = catalog
            .iter()
            .map(|def| GestureSummary {
                key: def.id().to_string(),
                name: def.name().to_string(),
                text: def.text().to_string(),
            })
            .collect();
        Self { gestures }
    }
}

/// Acknowledgement for a gesture intake request. Nothing is trained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeReceipt {
    pub status: String,
    pub message: String,
}

impl IntakeReceipt {
    pub fn received(data: &GestureTrainingData) -> Self {
        Self {
            status: "received".to_string(),
            message: format!(
                "Gesture '{}' received with {} samples. Training custom gestures is not supported yet.",
                data.gesture_name,
                data.samples.len()
            ),
        }
    }
}

/// Route table advertised at the service root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    pub predict: String,
    pub gestures: String,
    pub websocket: String,
}

/// `GET /` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    pub status: String,
    pub endpoints: Endpoints,
}

impl ServiceInfo {
    pub fn online(version: impl Into<String>) -> Self {
        Self {
            name: "Señas Connect API".to_string(),
            version: version.into(),
            status: "online".to_string(),
            endpoints: Endpoints {
                predict: "/api/predict".to_string(),
                gestures: "/api/gestures".to_string(),
                websocket: "/ws".to_string(),
            },
        }
    }
}

/// `GET /api/health` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    /// RFC 3339
    pub timestamp: String,
}

impl HealthStatus {
    pub fn healthy(timestamp: impl Into<String>) -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: timestamp.into(),
        }
    }
}

/// Body of a rejected one-shot request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}
