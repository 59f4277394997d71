//! Feature extraction - geometric summary of one hand
//!
//! All functions are pure and O(1) over the fixed 21-point input.

use std::fmt;

use crate::{
    HandObservation, INDEX_MCP, INDEX_PIP, INDEX_TIP, MIDDLE_PIP, MIDDLE_TIP, PINKY_PIP,
    PINKY_TIP, RING_PIP, RING_TIP, THUMB_MCP, THUMB_TIP,
};

/// Thumb counts as extended when its tip is farther than this fraction of
/// the thumb-MCP to index-MCP span away from the index MCP.
pub const THUMB_EXTENSION_RATIO: f64 = 0.8;

/// Vertical band (thumb MCP y minus tip y) separating Up / Side / Down
pub const THUMB_DIRECTION_BAND: f64 = 0.1;

/// Maximum thumb-tip to index-tip distance for a pinch
pub const PINCH_DISTANCE: f64 = 0.05;

/// (tip, pip) pairs for index, middle, ring, pinky
const FINGER_JOINTS: [(usize, usize); 4] = [
    (INDEX_TIP, INDEX_PIP),
    (MIDDLE_TIP, MIDDLE_PIP),
    (RING_TIP, RING_PIP),
    (PINKY_TIP, PINKY_PIP),
];

/// Finger order used by every 5-element finger array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Finger {
    Thumb = 0,
    Index = 1,
    Middle = 2,
    Ring = 3,
    Pinky = 4,
}

/// Extended/retracted state per finger, thumb to pinky
pub type FingerStates = [bool; 5];

/// Coarse thumb orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThumbDirection {
    Up,
    Down,
    Side,
}

impl ThumbDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            ThumbDirection::Up => "up",
            ThumbDirection::Down => "down",
            ThumbDirection::Side => "side",
        }
    }
}

impl fmt::Display for ThumbDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-frame features used for matching. Never cached across frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureVector {
    pub fingers: FingerStates,
    pub thumb: ThumbDirection,
    pub pinch: bool,
}

impl FeatureVector {
    pub fn new(fingers: FingerStates, thumb: ThumbDirection, pinch: bool) -> Self {
        Self {
            fingers,
            thumb,
            pinch,
        }
    }

    /// Run every extractor over one observation
    pub fn extract(obs: &HandObservation) -> Self {
        Self {
            fingers: finger_states(obs),
            thumb: thumb_direction(obs),
            pinch: pinch_detected(obs),
        }
    }

    #[inline]
    pub fn is_extended(&self, finger: Finger) -> bool {
        self.fingers[finger as usize]
    }
}

/// Which fingers are extended, thumb first.
///
/// The thumb uses a distance test against the index MCP; the other four
/// compare tip and PIP heights.
pub fn finger_states(obs: &HandObservation) -> FingerStates {
    let thumb_tip = obs.landmark(THUMB_TIP);
    let thumb_mcp = obs.landmark(THUMB_MCP);
    let index_mcp = obs.landmark(INDEX_MCP);

    let mut states = [false; 5];
    states[Finger::Thumb as usize] =
        thumb_tip.distance(index_mcp) > thumb_mcp.distance(index_mcp) * THUMB_EXTENSION_RATIO;

    for (slot, (tip, pip)) in states[1..].iter_mut().zip(FINGER_JOINTS) {
        *slot = obs.landmark(tip).y < obs.landmark(pip).y;
    }

    states
}

/// Thumb orientation from the vertical offset between MCP and tip
pub fn thumb_direction(obs: &HandObservation) -> ThumbDirection {
    let rise = obs.landmark(THUMB_MCP).y - obs.landmark(THUMB_TIP).y;

    if rise > THUMB_DIRECTION_BAND {
        ThumbDirection::Up
    } else if rise < -THUMB_DIRECTION_BAND {
        ThumbDirection::Down
    } else {
        ThumbDirection::Side
    }
}

/// Thumb tip touching the index fingertip
pub fn pinch_detected(obs: &HandObservation) -> bool {
    obs.landmark(THUMB_TIP).distance(obs.landmark(INDEX_TIP)) < PINCH_DISTANCE
}
