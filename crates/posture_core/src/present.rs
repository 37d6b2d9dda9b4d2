//! Display derivation for a successful prediction. Pure functions only.

use crate::prediction::PredictionResult;
use std::fmt;

/// Binary risk label, taken from the predicted class and never from the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Risk {
    Safe,
    Unsafe,
}

impl Risk {
    pub fn from_class(predicted_class: &str) -> Self {
        if predicted_class.to_lowercase() == "unsafe" {
            Risk::Unsafe
        } else {
            Risk::Safe
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Risk::Safe => "SAFE POSTURE",
            Risk::Unsafe => "UNSAFE POSTURE",
        }
    }

    pub fn is_unsafe(self) -> bool {
        self == Risk::Unsafe
    }
}

/// One line of the probability listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbabilityRow {
    pub class_name: String,
    /// Value times 100, two decimals, with `%`.
    pub percentage: String,
}

impl fmt::Display for ProbabilityRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.class_name, self.percentage)
    }
}

/// Everything the result card shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub risk: Risk,
    /// Unsafe score times 100, one decimal, with `%`.
    pub score: String,
    pub predicted_class: String,
    pub device: String,
    pub probabilities: Vec<ProbabilityRow>,
}

impl ResultView {
    pub fn new(result: &PredictionResult) -> Self {
        let probabilities = result
            .probabilities
            .iter()
            .map(|(class_name, value)| ProbabilityRow {
                class_name: class_name.clone(),
                percentage: format_percent(*value, 2),
            })
            .collect();

        Self {
            risk: Risk::from_class(&result.predicted_class),
            score: format_percent(result.unsafe_score, 1),
            predicted_class: result.predicted_class.to_uppercase(),
            device: result.device.clone(),
            probabilities,
        }
    }
}

/// Scale a [0,1] value to a percentage string with `decimals` places.
pub fn format_percent(value: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, value * 100.0)
}
