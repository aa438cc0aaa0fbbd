//! Shared types: index aliases, the deterministic RNG, and the error taxonomy
//! used throughout the geometry and decoder modules.

use rand_xoshiro::rand_core::{RngCore, SeedableRng};
use std::fmt;

cfg_if::cfg_if! {
    if #[cfg(feature = "u32_index")] {
        pub type VertexIndex = u32;
        pub type EdgeIndex = u32;
        pub type FaceIndex = u32;
    } else {
        pub type VertexIndex = usize;
        pub type EdgeIndex = usize;
        pub type FaceIndex = usize;
    }
}

/// use Xoshiro256StarStar as the process-agnostic, per-[`crate::code::Code`] deterministic
/// random number generator; each code owns its own stream rather than sharing a process-wide one
pub type DeterministicRng = rand_xoshiro::Xoshiro256StarStar;

pub trait F64Rng {
    /// uniform sample in `[0, 1]`, endpoint included, matching `uniform_real_distribution(0, nextafter(1, 2))`
    fn next_f64(&mut self) -> f64;
}

impl F64Rng for DeterministicRng {
    fn next_f64(&mut self) -> f64 {
        f64::from_bits(0x3FF << 52 | self.next_u64() >> 12) - 1.
    }
}

/// seed a fresh deterministic RNG from a master seed, the way a driver derives per-shot streams
/// from OS entropy collected once at process start
pub fn rng_from_seed(seed: u64) -> DeterministicRng {
    DeterministicRng::seed_from_u64(seed)
}

/// errors raised by [`crate::geometry::Geometry`] lookups
///
/// `InvalidArgument` and `OutOfLattice` are recoverable: callers that probe speculative
/// candidates (e.g. [`crate::sweep`]'s `findSweepEdges`) catch and discard them. `NotAFace` is
/// recoverable in the same way. There is no `InvariantViolation` variant here because those are
/// fatal by design and surface as a panic, never as a `Result`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    /// precondition violated on a public API (bad probability, bad L, unknown direction, out-of-range coordinate)
    InvalidArgument(String),
    /// a neighbour/edge lookup would leave a bounded lattice
    OutOfLattice,
    /// `find_face` was given four vertices that do not span a face
    NotAFace,
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            GeometryError::OutOfLattice => write!(f, "neighbour lies outside the lattice"),
            GeometryError::NotAFace => write!(f, "vertex set does not correspond to a face"),
        }
    }
}

impl std::error::Error for GeometryError {}

pub type GeometryResult<T> = Result<T, GeometryError>;
