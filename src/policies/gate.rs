//! # Probability gate.
//!
//! Decides a boolean outcome from a chance in `[0.0, 1.0]`. Used by
//! [`Pool::take`](crate::Pool::take) (show chance) and by the single slot
//! (load chance).
//!
//! The draw is a uniform integer in `[1, 100]`; the gate opens iff the draw is
//! `<= round(chance × 100)`. Hence `1.0` always opens and `0.0` never does.
//!
//! # Example
//! ```rust
//! use preloadvisor::gate;
//!
//! assert!(gate::decide(1.0).unwrap());
//! assert!(!gate::decide(0.0).unwrap());
//! assert!(gate::decide(1.5).is_err());
//! ```

use rand::Rng;

use crate::error::PreloadError;

/// Returns `InvalidArgument` unless `chance` is a number in `[0.0, 1.0]`.
pub fn check_chance(chance: f64) -> Result<(), PreloadError> {
    if (0.0..=1.0).contains(&chance) {
        Ok(())
    } else {
        Err(PreloadError::invalid(format!(
            "chance must be within [0.0, 1.0], got {chance}"
        )))
    }
}

/// Evaluates the gate with the thread-local RNG.
pub fn decide(chance: f64) -> Result<bool, PreloadError> {
    decide_with(&mut rand::rng(), chance)
}

/// Evaluates the gate with an explicit RNG.
pub fn decide_with<R: Rng>(rng: &mut R, chance: f64) -> Result<bool, PreloadError> {
    check_chance(chance)?;
    let threshold = (chance * 100.0).round() as u32;
    let draw: u32 = rng.random_range(1..=100);
    Ok(draw <= threshold)
}
