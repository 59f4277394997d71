//! Prediction service - one-shot classification with latency measurement

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::{FeatureVector, GestureCatalog, GestureMatcher, HandObservation};

/// Outcome of classifying one frame
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    /// Catalog id of the matched gesture
    pub gesture_id: Option<String>,
    /// Display name of the matched gesture
    pub gesture: Option<String>,
    pub text: Option<String>,
    /// In [0, 1]; 0.0 when nothing matched
    pub confidence: f32,
    /// Milliseconds, rounded to two decimals
    pub processing_time_ms: f64,
}

impl PredictionResult {
    /// No hand observed, or nothing matched
    pub fn absent() -> Self {
        Self {
            gesture_id: None,
            gesture: None,
            text: None,
            confidence: 0.0,
            processing_time_ms: 0.0,
        }
    }

    pub fn is_match(&self) -> bool {
        self.gesture_id.is_some()
    }
}

/// Round a duration to milliseconds with two decimals
pub fn round_latency_ms(elapsed: Duration) -> f64 {
    (elapsed.as_secs_f64() * 1000.0 * 100.0).round() / 100.0
}

/// Orchestrates feature extraction, matching and catalog lookup.
///
/// Cheap to clone; every clone shares the same read-only catalog.
#[derive(Debug, Clone)]
pub struct PredictionService {
    matcher: GestureMatcher,
}

impl PredictionService {
    pub fn new(catalog: Arc<GestureCatalog>) -> Self {
        Self {
            matcher: GestureMatcher::new(catalog),
        }
    }

    /// Service over the built-in catalog
    pub fn builtin() -> Self {
        Self::new(Arc::new(GestureCatalog::builtin()))
    }

    pub fn catalog(&self) -> &GestureCatalog {
        self.matcher.catalog()
    }

    pub fn matcher(&self) -> &GestureMatcher {
        &self.matcher
    }

    /// Classify the first observed hand; any further hands are ignored.
    ///
    /// An empty slice yields [`PredictionResult::absent`] without touching
    /// the extractor or matcher.
    pub fn predict(&self, hands: &[HandObservation]) -> PredictionResult {
        match hands.first() {
            Some(hand) => self.predict_hand(hand),
            None => PredictionResult::absent(),
        }
    }

    /// Classify a single hand
    pub fn predict_hand(&self, hand: &HandObservation) -> PredictionResult {
        let start = Instant::now();

        let features = FeatureVector::extract(hand);
        let mut result = match self.matcher.match_features(&features) {
            Some(m) => PredictionResult {
                gesture_id: Some(m.definition.id().to_string()),
                gesture: Some(m.definition.name().to_string()),
                text: Some(m.definition.text().to_string()),
                confidence: m.confidence,
                processing_time_ms: 0.0,
            },
            None => PredictionResult::absent(),
        };

        result.processing_time_ms = round_latency_ms(start.elapsed());
        tracing::trace!(
            gesture = result.gesture_id.as_deref().unwrap_or("none"),
            confidence = result.confidence,
            handedness = %hand.handedness(),
            latency_ms = result.processing_time_ms,
            "frame classified"
        );
        result
    }
}

impl Default for PredictionService {
    fn default() -> Self {
        Self::builtin()
    }
}
