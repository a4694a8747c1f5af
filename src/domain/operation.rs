// ============================================================
// Layer 3 - Operation Domain Type
// ============================================================
// The single decision point of the whole pipeline: which
// binary operator the regression model should learn.
//
// Everything else (data generation, topology, training,
// export) is identical between the two runs; only the label
// function and the printed text change.

use std::fmt;

/// The binary arithmetic operator a model is trained to approximate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Label = a + b
    Sum,
    /// Label = a - b
    Difference,
}

impl Operation {
    /// The fixed order in which a full run trains its models.
    pub const ALL: [Operation; 2] = [Operation::Sum, Operation::Difference];

    /// Apply the operator to one input pair. This IS the label
    /// function: labels in the dataset are exactly this value.
    pub fn apply(&self, a: f32, b: f32) -> f32 {
        match self {
            Operation::Sum => a + b,
            Operation::Difference => a - b,
        }
    }

    /// The printable operator symbol, used in example lines
    /// like "10.0 + 5.0 = 15.02".
    pub fn symbol(&self) -> char {
        match self {
            Operation::Sum => '+',
            Operation::Difference => '-',
        }
    }

    /// Name used for every per-model artifact: the bundle
    /// directory, the interchange file, the config JSON and
    /// the metrics CSV.
    pub fn model_name(&self) -> &'static str {
        match self {
            Operation::Sum => "sum_model",
            Operation::Difference => "difference_model",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Sum => write!(f, "sum"),
            Operation::Difference => write!(f, "difference"),
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply() {
        assert_eq!(Operation::Sum.apply(10.0, 5.0), 15.0);
        assert_eq!(Operation::Difference.apply(100.0, 50.0), 50.0);
        assert_eq!(Operation::Difference.apply(-5.0, 3.0), -8.0);
    }

    #[test]
    fn test_fixed_training_order() {
        // Sum first, then difference
        assert_eq!(Operation::ALL[0], Operation::Sum);
        assert_eq!(Operation::ALL[1], Operation::Difference);
    }

    #[test]
    fn test_model_names_are_distinct() {
        // The two runs must never collide on output paths
        assert_ne!(
            Operation::Sum.model_name(),
            Operation::Difference.model_name()
        );
    }
}
