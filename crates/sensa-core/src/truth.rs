//! Two-component truth values and the evidence calculus.
//!
//! A truth value pairs a frequency (how often the claim held) with a
//! confidence (how much evidence backs the frequency). All derivation
//! rules bottom out in the weight transforms `w2c` / `c2w`.

use serde::{Deserialize, Serialize};

/// Hard ceiling on confidence; no finite amount of evidence reaches 1.0.
pub const CONFIDENCE_CEILING: f64 = 0.99;

/// Evidential horizon constant for the weight transforms.
const EVIDENTIAL_HORIZON: f64 = 1.0;

/// Frequency/confidence pair, both in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Truth {
    pub frequency: f64,
    pub confidence: f64,
}

impl Truth {
    pub const fn new(frequency: f64, confidence: f64) -> Self {
        Truth { frequency, confidence }
    }

    /// Default truth assigned to direct input events.
    pub const fn input_default() -> Self {
        Truth::new(1.0, 0.9)
    }

    /// Decision-ready score: confidence pulls the frequency toward the
    /// maximally uncertain 0.5.
    pub fn expectation(&self) -> f64 {
        self.confidence * (self.frequency - 0.5) + 0.5
    }

    /// Merge two independent observations of the same statement.
    /// Frequencies combine weighted by evidence; confidence grows with the
    /// pooled weight but never reaches the ceiling.
    pub fn revise(&self, other: &Truth) -> Truth {
        let w1 = c2w(self.confidence);
        let w2 = c2w(other.confidence);
        let w = w1 + w2;
        let frequency = if w > 0.0 {
            (w1 * self.frequency + w2 * other.frequency) / w
        } else {
            0.5
        };
        Truth {
            frequency,
            confidence: w2c(w).min(CONFIDENCE_CEILING),
        }
    }

    /// Temporal induction: evidence that the earlier event predicts the
    /// later one. A single observation yields low confidence on purpose.
    pub fn induce(precondition: &Truth, consequent: &Truth) -> Truth {
        let w = precondition.frequency * precondition.confidence * consequent.confidence;
        Truth {
            frequency: consequent.frequency,
            confidence: w2c(w),
        }
    }

    /// Truth of a compound built from two co-occurring components.
    pub fn intersect(&self, other: &Truth) -> Truth {
        Truth {
            frequency: self.frequency * other.frequency,
            confidence: self.confidence * other.confidence,
        }
    }
}

/// Evidence weight to confidence.
pub fn w2c(w: f64) -> f64 {
    w / (w + EVIDENTIAL_HORIZON)
}

/// Confidence to evidence weight.
pub fn c2w(c: f64) -> f64 {
    if c >= 1.0 {
        c2w(CONFIDENCE_CEILING)
    } else {
        EVIDENTIAL_HORIZON * c / (1.0 - c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn expectation_pulls_toward_half() {
        assert!((Truth::new(1.0, 0.9).expectation() - 0.95).abs() < EPS);
        assert!((Truth::new(0.0, 0.9).expectation() - 0.05).abs() < EPS);
        assert!((Truth::new(1.0, 0.0).expectation() - 0.5).abs() < EPS);
    }

    #[test]
    fn revision_raises_confidence() {
        let a = Truth::new(1.0, 0.9);
        let b = Truth::new(1.0, 0.9);
        let r = a.revise(&b);
        assert!((r.frequency - 1.0).abs() < EPS);
        assert!(r.confidence > 0.9);
        assert!(r.confidence <= CONFIDENCE_CEILING);
    }

    #[test]
    fn revision_weights_frequencies_by_evidence() {
        let strong = Truth::new(1.0, 0.9);
        let weak = Truth::new(0.0, 0.1);
        let r = strong.revise(&weak);
        assert!(r.frequency > 0.9);
    }

    #[test]
    fn confidence_never_exceeds_ceiling() {
        let mut t = Truth::new(1.0, 0.9);
        for _ in 0..1000 {
            t = t.revise(&Truth::new(1.0, 0.9));
        }
        assert!(t.confidence <= CONFIDENCE_CEILING);
    }

    #[test]
    fn single_induction_stays_tentative() {
        let t = Truth::induce(&Truth::input_default(), &Truth::input_default());
        assert!((t.frequency - 1.0).abs() < EPS);
        // w = 1.0 * 0.9 * 0.9 = 0.81, c = 0.81/1.81
        assert!((t.confidence - 0.81 / 1.81).abs() < EPS);
        assert!(t.expectation() > 0.501);
    }

    #[test]
    fn intersection_multiplies_components() {
        let t = Truth::new(1.0, 0.9).intersect(&Truth::new(1.0, 0.9));
        assert!((t.frequency - 1.0).abs() < EPS);
        assert!((t.confidence - 0.81).abs() < EPS);
    }

    #[test]
    fn weight_transforms_are_inverse() {
        for c in [0.1, 0.5, 0.9] {
            assert!((w2c(c2w(c)) - c).abs() < EPS);
        }
    }
}
