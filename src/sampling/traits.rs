// src/sampling/traits.rs

use std::fmt::Debug;

/// Source of every random number a simulation consumes.
///
/// Both engines only ever need three kinds of draw, so the seam sits here
/// rather than on a generic `Rng`: a test can script exact values per
/// channel and a run can swap in a seeded generator.
pub trait DrawSource: Debug {
    /// Uniform integer in `[0, 99]`, fed to cumulative tables.
    fn percent(&mut self) -> u32;

    /// Uniform float in `[0, 1)`, used for overflow decisions.
    fn unit(&mut self) -> f64;

    /// Uniform integer in `[1, 100]`, fed to range tables.
    fn ticket(&mut self) -> u32;
}
