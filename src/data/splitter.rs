// ============================================================
// Layer 4 — Hold-out Splitter
// ============================================================
// Shuffles encoded samples with a seeded RNG, then cuts off the
// last `test_fraction` of them as the hold-out set:
//
//   [ ── fit rows ─────────────── | ── hold-out ── ]
//                                 ^ len - round(len * test_fraction)
//
// Hold-out rows are only scored, never fitted on. The same seed
// over the same rows always yields the same split, which is what
// makes a training run reproducible end to end.

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Shuffle with `seed` and split into (fit, hold_out).
/// `test_fraction` is clamped to [0, 1].
pub fn split_holdout<T>(mut samples: Vec<T>, test_fraction: f64, seed: u64) -> (Vec<T>, Vec<T>) {
    samples.shuffle(&mut StdRng::seed_from_u64(seed));

    let n_holdout = (samples.len() as f64 * test_fraction.clamp(0.0, 1.0)).round() as usize;
    let holdout   = samples.split_off(samples.len() - n_holdout.min(samples.len()));

    tracing::debug!(
        "Hold-out split (seed {}): {} fit rows, {} hold-out rows",
        seed,
        samples.len(),
        holdout.len(),
    );
    (samples, holdout)
}
