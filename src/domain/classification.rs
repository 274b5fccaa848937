//! Labels, the decision threshold, and result assembly.

use serde::{Deserialize, Serialize};

/// Decision threshold for the positive class.
///
/// This is the single source of truth for thresholding: scores strictly
/// above it map to [`BeltLabel::BeltPresent`], so a score of exactly 0.5
/// resolves to [`BeltLabel::BeltAbsent`].
pub const DECISION_THRESHOLD: f32 = 0.5;

/// Binary outcome of a classification.
///
/// Serializes to the stable wire codes `belt_present` / `belt_absent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeltLabel {
    /// The person is wearing a seat belt.
    BeltPresent,
    /// The person is not wearing a seat belt.
    BeltAbsent,
}

impl BeltLabel {
    /// Derives the label from a model score using [`DECISION_THRESHOLD`].
    pub fn from_probability(probability: f32) -> Self {
        if probability > DECISION_THRESHOLD {
            Self::BeltPresent
        } else {
            Self::BeltAbsent
        }
    }

    /// Stable wire code used by stores and serializers.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BeltPresent => "belt_present",
            Self::BeltAbsent => "belt_absent",
        }
    }

    /// Fixed display message for this label.
    pub fn message(&self) -> &'static str {
        match self {
            Self::BeltPresent => "Person is WEARING a seat belt",
            Self::BeltAbsent => "Person is NOT wearing a seat belt",
        }
    }
}

impl std::fmt::Display for BeltLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one classification request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Derived label.
    pub label: BeltLabel,
    /// Raw model score in [0,1].
    pub probability: f32,
    /// Human-readable message for the label.
    pub message: String,
}

/// Maps a model score to the final classification.
///
/// Total over [0,1]. A score outside that range is an upstream contract
/// violation; it is clamped into [0,1] and reported at `warn` so the
/// caller still receives a structured result. The validated scoring path
/// in front of this function never produces such a score.
pub fn assemble(probability: f32) -> ClassificationResult {
    let clamped = probability.clamp(0.0, 1.0);
    if clamped != probability {
        tracing::warn!(probability, "model score outside [0,1]; clamping");
    }

    let label = BeltLabel::from_probability(clamped);
    ClassificationResult {
        label,
        probability: clamped,
        message: label.message().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_exactly_at_threshold_resolves_to_absent() {
        assert_eq!(BeltLabel::from_probability(0.5), BeltLabel::BeltAbsent);
    }

    #[test]
    fn score_just_above_threshold_resolves_to_present() {
        assert_eq!(
            BeltLabel::from_probability(0.500_000_1),
            BeltLabel::BeltPresent
        );
    }

    #[test]
    fn score_just_below_threshold_resolves_to_absent() {
        assert_eq!(
            BeltLabel::from_probability(0.499_999_9),
            BeltLabel::BeltAbsent
        );
    }

    #[test]
    fn assemble_pairs_label_with_its_message() {
        let positive = assemble(0.82);
        assert_eq!(positive.label, BeltLabel::BeltPresent);
        assert_eq!(positive.probability, 0.82);
        assert_eq!(positive.message, "Person is WEARING a seat belt");

        let negative = assemble(0.10);
        assert_eq!(negative.label, BeltLabel::BeltAbsent);
        assert_eq!(negative.probability, 0.10);
        assert_eq!(negative.message, "Person is NOT wearing a seat belt");
    }

    #[test]
    fn out_of_range_scores_are_clamped() {
        assert_eq!(assemble(1.5).probability, 1.0);
        assert_eq!(assemble(1.5).label, BeltLabel::BeltPresent);
        assert_eq!(assemble(-0.25).probability, 0.0);
        assert_eq!(assemble(-0.25).label, BeltLabel::BeltAbsent);
    }

    #[test]
    fn label_serializes_to_wire_codes() {
        assert_eq!(
            serde_json::to_value(BeltLabel::BeltPresent).unwrap(),
            serde_json::json!("belt_present")
        );
        assert_eq!(
            serde_json::to_value(BeltLabel::BeltAbsent).unwrap(),
            serde_json::json!("belt_absent")
        );
    }

    #[test]
    fn result_serializes_all_outbound_fields() {
        let value = serde_json::to_value(assemble(0.82)).unwrap();
        assert_eq!(value["label"], "belt_present");
        assert_eq!(value["message"], "Person is WEARING a seat belt");
        assert!((value["probability"].as_f64().unwrap() - 0.82).abs() < 1e-6);
    }
}
