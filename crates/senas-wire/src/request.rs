//! Client to server payloads

use serde::{Deserialize, Serialize};

use senas_core::{GestureResult, HandObservation, Handedness, Landmark};

use crate::{WireError, WireResult};

/// `{x, y, z}` point as sent by the landmark producer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandmarkPayload {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl From<LandmarkPayload> for Landmark {
    fn from(p: LandmarkPayload) -> Self {
        Landmark::new(p.x, p.y, p.z)
    }
}

impl From<Landmark> for LandmarkPayload {
    fn from(lm: Landmark) -> Self {
        Self {
            x: lm.x,
            y: lm.y,
            z: lm.z,
        }
    }
}

/// `"Left"` / `"Right"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HandednessPayload {
    Left,
    #[default]
    Right,
}

impl From<HandednessPayload> for Handedness {
    fn from(h: HandednessPayload) -> Self {
        match h {
            HandednessPayload::Left => Handedness::Left,
            HandednessPayload::Right => Handedness::Right,
        }
    }
}

fn full_confidence() -> f32 {
    1.0
}

/// One detected hand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandPayload {
    pub landmarks: Vec<LandmarkPayload>,
    #[serde(default)]
    pub handedness: HandednessPayload,
    #[serde(default = "full_confidence")]
    pub confidence: f32,
}

impl HandPayload {
    pub fn new(landmarks: &[Landmark], handedness: HandednessPayload, confidence: f32) -> Self {
        Self {
            landmarks: landmarks.iter().copied().map(LandmarkPayload::from).collect(),
            handedness,
            confidence,
        }
    }

    /// Validate shape and convert into a classifier observation
    pub fn to_observation(&self) -> GestureResult<HandObservation> {
        let points: Vec<Landmark> = self.landmarks.iter().copied().map(Landmark::from).collect();
        HandObservation::from_slice(&points, self.handedness.into(), self.confidence)
    }
}

fn observations(hands: &[HandPayload]) -> WireResult<Vec<HandObservation>> {
    hands
        .iter()
        .enumerate()
        .map(|(hand, payload)| {
            payload
                .to_observation()
                .map_err(|source| WireError::Shape { hand, source })
        })
        .collect()
}

/// One-shot prediction request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    #[serde(default)]
    pub hands: Vec<HandPayload>,
    /// Client capture time; informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
}

impl PredictionRequest {
    pub fn observations(&self) -> WireResult<Vec<HandObservation>> {
        observations(&self.hands)
    }
}

/// One streaming frame from a connected client
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StreamFrame {
    #[serde(default)]
    pub hands: Vec<HandPayload>,
}

impl StreamFrame {
    pub fn observations(&self) -> WireResult<Vec<HandObservation>> {
        observations(&self.hands)
    }

    pub fn to_json(&self) -> WireResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Decode a streaming text frame into zero or more observations
pub fn decode_frame(text: &str) -> WireResult<Vec<HandObservation>> {
    let frame: StreamFrame = serde_json::from_str(text)?;
    frame.observations()
}

/// Request to add a gesture to the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureTrainingData {
    pub gesture_name: String,
    pub text: String,
    pub samples: Vec<Vec<LandmarkPayload>>,
}
