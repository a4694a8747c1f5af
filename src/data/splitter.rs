// ============================================================
// Layer 4 - Train/Validation Splitter
// ============================================================
// Randomly shuffles samples and splits them into two sets:
//   - Training set:   used to update model weights
//   - Validation set: used to measure performance on data the
//     optimiser never saw, so overfitting is visible
//
// Why shuffle before splitting?
//   Generated samples are ordered by draw position; shuffling
//   keeps the held-out fraction statistically representative
//   no matter how the generator happens to order things.
//
// The RNG is passed in by the caller rather than created here,
// so a seeded run splits identically every time.
//
// Uses Fisher-Yates shuffle via rand::seq::SliceRandom,
// the standard unbiased shuffle algorithm.

use rand::seq::SliceRandom;
use rand::Rng;

/// Randomly shuffle `samples` and split into (train, validation).
///
/// # Arguments
/// * `samples`        - All available samples (consumed by this function)
/// * `train_fraction` - Proportion for training, e.g. 0.8 = 80%
/// * `rng`            - The caller's (usually seeded) RNG
///
/// # Returns
/// A tuple (train_samples, val_samples)
pub fn split_train_val<T>(
    mut samples: Vec<T>,
    train_fraction: f64,
    rng: &mut impl Rng,
) -> (Vec<T>, Vec<T>) {
    // Fisher-Yates shuffle: every permutation is equally likely
    samples.shuffle(rng);

    // e.g. 10000 samples * 0.8 = 8000 go to training
    let total = samples.len();
    let split_at = ((total as f64) * train_fraction).round() as usize;

    // Clamp to valid range to avoid panics on tiny datasets
    let split_at = split_at.min(total);

    // split_off(n) removes elements [n..] and returns them
    let val = samples.split_off(split_at);

    tracing::debug!(
        "Dataset split: {} training, {} validation",
        samples.len(),
        val.len(),
    );

    (samples, val)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_correct_split_sizes() {
        let items: Vec<usize> = (0..100).collect();
        let mut rng = StdRng::seed_from_u64(42);
        let (train, val) = split_train_val(items, 0.8, &mut rng);
        assert_eq!(train.len(), 80);
        assert_eq!(val.len(), 20);
    }

    #[test]
    fn test_all_items_preserved() {
        // No items should be lost in the split
        let items: Vec<usize> = (0..50).collect();
        let mut rng = StdRng::seed_from_u64(42);
        let (train, val) = split_train_val(items, 0.7, &mut rng);
        let mut all: Vec<usize> = train.into_iter().chain(val).collect();
        all.sort_unstable();
        assert_eq!(all, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_same_seed_same_split() {
        let items: Vec<usize> = (0..100).collect();
        let mut rng_a = StdRng::seed_from_u64(7);
        let mut rng_b = StdRng::seed_from_u64(7);
        let split_a = split_train_val(items.clone(), 0.8, &mut rng_a);
        let split_b = split_train_val(items, 0.8, &mut rng_b);
        assert_eq!(split_a, split_b);
    }

    #[test]
    fn test_empty_dataset() {
        let items: Vec<usize> = Vec::new();
        let mut rng = StdRng::seed_from_u64(42);
        let (train, val) = split_train_val(items, 0.8, &mut rng);
        assert!(train.is_empty());
        assert!(val.is_empty());
    }

    #[test]
    fn test_full_training_split() {
        // 1.0 fraction means everything goes to training
        let items: Vec<usize> = (0..10).collect();
        let mut rng = StdRng::seed_from_u64(42);
        let (train, val) = split_train_val(items, 1.0, &mut rng);
        assert_eq!(train.len(), 10);
        assert!(val.is_empty());
    }
}
