//! Hand landmarks - the 21-point joint schema
//!
//! Coordinates are normalized to image space (roughly 0.0..1.0) with y
//! growing downwards, so "higher on screen" means a smaller y.

use std::fmt;

use crate::{GestureError, GestureResult};

/// Number of landmarks in one hand observation
pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// One 3-D point on the hand
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to another landmark (3-D)
    pub fn distance(&self, other: &Landmark) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Which of the subject's hands was observed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Handedness {
    Left,
    #[default]
    Right,
}

impl Handedness {
    pub fn as_str(self) -> &'static str {
        match self {
            Handedness::Left => "Left",
            Handedness::Right => "Right",
        }
    }
}

impl fmt::Display for Handedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single detected hand.
///
/// The landmark array always holds exactly [`LANDMARK_COUNT`] points in the
/// fixed joint order; the constructor is the only way in, so holders of a
/// `HandObservation` never need to re-check its shape.
#[derive(Debug, Clone, PartialEq)]
pub struct HandObservation {
    landmarks: [Landmark; LANDMARK_COUNT],
    handedness: Handedness,
    confidence: f32,
}

impl HandObservation {
    /// Build an observation from an already-fixed landmark array
    pub fn new(
        landmarks: [Landmark; LANDMARK_COUNT],
        handedness: Handedness,
        confidence: f32,
    ) -> GestureResult<Self> {
        if let Some(index) = landmarks.iter().position(|lm| !lm.is_finite()) {
            return Err(GestureError::NonFiniteCoordinate { index });
        }
        if !(0.0..=1.0).contains(&confidence) {
            return Err(GestureError::InvalidConfidence(confidence));
        }

        Ok(Self {
            landmarks,
            handedness,
            confidence,
        })
    }

    /// Build an observation from a landmark list of unknown length
    pub fn from_slice(
        landmarks: &[Landmark],
        handedness: Handedness,
        confidence: f32,
    ) -> GestureResult<Self> {
        let landmarks: [Landmark; LANDMARK_COUNT] =
            landmarks
                .try_into()
                .map_err(|_| GestureError::InvalidLandmarkCount {
                    expected: LANDMARK_COUNT,
                    actual: landmarks.len(),
                })?;
        Self::new(landmarks, handedness, confidence)
    }

    #[inline]
    pub fn landmark(&self, index: usize) -> &Landmark {
        &self.landmarks[index]
    }

    pub fn handedness(&self) -> Handedness {
        self.handedness
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }
}
