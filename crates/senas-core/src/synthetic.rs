//! Deterministic synthetic hand poses.
//!
//! Builds landmark sets whose extracted features are known up front, so
//! tests, benchmarks and demo clients can drive the classifier without a
//! camera. The geometry is schematic, not anatomical.

use crate::{
    FingerStates, GestureResult, HandObservation, Handedness, Landmark, ThumbDirection, INDEX_MCP,
    INDEX_TIP, LANDMARK_COUNT, THUMB_CMC, THUMB_IP, THUMB_MCP, THUMB_TIP, WRIST,
};

/// Palm x positions for index, middle, ring, pinky
const FINGER_X: [f64; 4] = [0.45, 0.5, 0.55, 0.6];
const MCP_Y: f64 = 0.6;
const PIP_Y: f64 = 0.5;

/// Offset from thumb tip to index tip when pinching
const PINCH_OFFSET: f64 = 0.02;

/// (thumb MCP, thumb tip) per extension state and direction
fn thumb_joints(extended: bool, direction: ThumbDirection) -> (Landmark, Landmark) {
    let mcp = Landmark::new(0.35, 0.7, 0.0);
    match (extended, direction) {
        (true, ThumbDirection::Up) => (mcp, Landmark::new(0.3, 0.45, 0.0)),
        (true, ThumbDirection::Side) => (mcp, Landmark::new(0.2, 0.7, 0.0)),
        (true, ThumbDirection::Down) => (mcp, Landmark::new(0.3, 0.9, 0.0)),
        (false, ThumbDirection::Up) => (mcp, Landmark::new(0.4, 0.58, 0.0)),
        (false, ThumbDirection::Side) => (mcp, Landmark::new(0.44, 0.65, 0.0)),
        // A folded thumb can only point down if the MCP sits high
        (false, ThumbDirection::Down) => (
            Landmark::new(0.35, 0.45, 0.0),
            Landmark::new(0.42, 0.6, 0.0),
        ),
    }
}

fn midpoint(a: Landmark, b: Landmark) -> Landmark {
    Landmark::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0, (a.z + b.z) / 2.0)
}

/// Landmarks that extract to exactly `fingers`, `thumb` and `pinch`
pub fn synthetic_hand(
    fingers: FingerStates,
    thumb: ThumbDirection,
    pinch: bool,
) -> [Landmark; LANDMARK_COUNT] {
    let mut points = [Landmark::default(); LANDMARK_COUNT];
    let wrist = Landmark::new(0.5, 0.9, 0.0);
    points[WRIST] = wrist;

    let (thumb_mcp, thumb_tip) = thumb_joints(fingers[0], thumb);
    points[THUMB_CMC] = midpoint(wrist, thumb_mcp);
    points[THUMB_MCP] = thumb_mcp;
    points[THUMB_IP] = midpoint(thumb_mcp, thumb_tip);
    points[THUMB_TIP] = thumb_tip;

    for (finger, &x) in FINGER_X.iter().enumerate() {
        let mcp = INDEX_MCP + finger * 4;
        let extended = fingers[finger + 1];
        points[mcp] = Landmark::new(x, MCP_Y, 0.0);
        points[mcp + 1] = Landmark::new(x, PIP_Y, 0.0);
        if extended {
            points[mcp + 2] = Landmark::new(x, 0.4, 0.0);
            points[mcp + 3] = Landmark::new(x, 0.3, 0.0);
        } else {
            points[mcp + 2] = Landmark::new(x + 0.03, 0.45, 0.0);
            points[mcp + 3] = Landmark::new(x + 0.05, 0.56, 0.0);
        }
    }

    if pinch {
        let tip = Landmark::new(thumb_tip.x + PINCH_OFFSET, thumb_tip.y, thumb_tip.z);
        let pip_y = if fingers[1] { tip.y + 0.05 } else { tip.y - 0.05 };
        let pip = Landmark::new(tip.x, pip_y, tip.z);
        points[INDEX_TIP - 2] = pip;
        points[INDEX_TIP - 1] = midpoint(pip, tip);
        points[INDEX_TIP] = tip;
    }

    points
}

/// Same as [`synthetic_hand`], wrapped as a right-hand observation
pub fn synthetic_observation(
    fingers: FingerStates,
    thumb: ThumbDirection,
    pinch: bool,
) -> GestureResult<HandObservation> {
    HandObservation::new(synthetic_hand(fingers, thumb, pinch), Handedness::Right, 1.0)
}
