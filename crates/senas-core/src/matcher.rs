//! Gesture matcher - scores features against every catalog entry
//!
//! Scoring per entry:
//! - finger pattern: fraction of the five fingers in the expected state,
//!   halved when a required thumb direction is not observed
//! - pinch: 0.9 with middle/ring/pinky extended, 0.7 otherwise, 0.0 without pinch
//!
//! The best entry wins, earlier entries win ties, and anything below
//! [`ACCEPTANCE_THRESHOLD`] is reported as no match.

use std::sync::Arc;

use crate::{FeatureVector, Finger, GestureCatalog, GestureDefinition, SpecialTag};

/// Minimum confidence for a match to be reported
pub const ACCEPTANCE_THRESHOLD: f32 = 0.7;

/// Multiplier applied when the required thumb direction is not observed
pub const THUMB_MISMATCH_PENALTY: f32 = 0.5;

/// Pinch score when middle, ring and pinky are all extended
pub const PINCH_FULL_CONFIDENCE: f32 = 0.9;

/// Pinch score otherwise
pub const PINCH_PARTIAL_CONFIDENCE: f32 = 0.7;

/// An accepted match
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureMatch<'a> {
    /// Position in the catalog
    pub index: usize,
    pub definition: &'a GestureDefinition,
    pub confidence: f32,
}

impl GestureMatch<'_> {
    pub fn id(&self) -> &str {
        self.definition.id()
    }
}

/// Score one definition against one feature vector
pub fn score(def: &GestureDefinition, features: &FeatureVector) -> f32 {
    if let Some(expected) = def.fingers() {
        let matches = expected
            .iter()
            .zip(features.fingers.iter())
            .filter(|(e, a)| e == a)
            .count();
        let mut confidence = matches as f32 / expected.len() as f32;

        if let Some(required) = def.thumb() {
            if required != features.thumb {
                confidence *= THUMB_MISMATCH_PENALTY;
            }
        }
        return confidence;
    }

    match def.special_tag() {
        Some(SpecialTag::Pinch) => {
            if !features.pinch {
                return 0.0;
            }
            let others_extended = [Finger::Middle, Finger::Ring, Finger::Pinky]
                .into_iter()
                .all(|f| features.is_extended(f));
            if others_extended {
                PINCH_FULL_CONFIDENCE
            } else {
                PINCH_PARTIAL_CONFIDENCE
            }
        }
        // Rejected at catalog construction; never matches if it slips through
        None => 0.0,
    }
}

/// Acceptance gate applied to the best score
#[inline]
pub fn is_accepted(confidence: f32) -> bool {
    confidence >= ACCEPTANCE_THRESHOLD
}

/// Rule matcher over a shared, read-only catalog
#[derive(Debug, Clone)]
pub struct GestureMatcher {
    catalog: Arc<GestureCatalog>,
}

impl GestureMatcher {
    pub fn new(catalog: Arc<GestureCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &GestureCatalog {
        &self.catalog
    }

    /// Highest-scoring entry regardless of the threshold.
    ///
    /// Only strict improvements replace the running best, so the earliest
    /// entry wins a tie. Zero scores never produce a candidate.
    pub fn best(&self, features: &FeatureVector) -> Option<GestureMatch<'_>> {
        let mut best: Option<GestureMatch<'_>> = None;

        for (index, definition) in self.catalog.iter().enumerate() {
            let confidence = score(definition, features);
            let current = best.map_or(0.0, |m| m.confidence);
            if confidence > current {
                best = Some(GestureMatch {
                    index,
                    definition,
                    confidence,
                });
            }
        }

        best
    }

    /// Best entry if it clears [`ACCEPTANCE_THRESHOLD`]; the below-threshold
    /// score is discarded.
    pub fn match_features(&self, features: &FeatureVector) -> Option<GestureMatch<'_>> {
        self.best(features).filter(|m| is_accepted(m.confidence))
    }
}
