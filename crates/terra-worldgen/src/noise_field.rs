//! Composable scalar noise fields.
//!
//! A [`NoiseField`] is a small expression tree: a seeded simplex leaf (or a
//! constant) wrapped by scale, offset, frequency, and octave-sum nodes. Each
//! combinator consumes the field and returns a new one wrapping it; a single
//! interpreter, [`NoiseField::sample`], walks the tree.

use std::fmt;

use noise::{NoiseFn, Simplex};
use rand_chacha::ChaCha8Rng;

use crate::seed::lattice_seed;

/// A deterministic 2D scalar field.
///
/// The simplex leaf owns its gradient lattice, built once at construction.
/// After that every node is immutable, so a field can be shared across
/// threads and sampled concurrently.
#[derive(Clone)]
pub enum NoiseField {
    /// Seeded 2D simplex noise, approximately in `[-1, 1]`.
    Simplex(Simplex),
    /// A constant value everywhere.
    Constant(f64),
    /// `source(x, z) * factor`.
    Scale {
        /// Wrapped field.
        source: Box<NoiseField>,
        /// Output multiplier.
        factor: f64,
    },
    /// `source(x, z) + amount`.
    Offset {
        /// Wrapped field.
        source: Box<NoiseField>,
        /// Output offset.
        amount: f64,
    },
    /// `source(x * factor, z * factor)`.
    Frequency {
        /// Wrapped field.
        source: Box<NoiseField>,
        /// Input coordinate multiplier.
        factor: f64,
    },
    /// Normalized octave sum of the wrapped field.
    Octaves {
        /// Wrapped field.
        source: Box<NoiseField>,
        /// Number of octaves, at least 1.
        octaves: u32,
        /// Frequency multiplier between successive octaves.
        lacunarity: f64,
        /// Amplitude multiplier between successive octaves.
        gain: f64,
    },
}

impl NoiseField {
    /// Simplex noise with an explicit lattice seed.
    pub fn simplex(seed: u32) -> Self {
        Self::Simplex(Simplex::new(seed))
    }

    /// Simplex noise whose lattice seed is drawn from `rng`.
    pub fn from_stream(rng: &mut ChaCha8Rng) -> Self {
        Self::simplex(lattice_seed(rng))
    }

    /// A constant field.
    pub fn constant(value: f64) -> Self {
        Self::Constant(value)
    }

    /// Multiply the output by `factor`.
    pub fn scale(self, factor: f64) -> Self {
        Self::Scale {
            source: Box::new(self),
            factor,
        }
    }

    /// Add `amount` to the output.
    pub fn offset(self, amount: f64) -> Self {
        Self::Offset {
            source: Box::new(self),
            amount,
        }
    }

    /// Multiply the input coordinates by `factor`.
    pub fn frequency(self, factor: f64) -> Self {
        Self::Frequency {
            source: Box::new(self),
            factor,
        }
    }

    /// Sum `octaves` copies of this field, each at `lacunarity` times the
    /// previous frequency and `gain` times the previous amplitude, divided by
    /// the total amplitude.
    ///
    /// A request for zero octaves is clamped to one; settings validation
    /// rejects it before a field is ever built.
    pub fn octavate(self, octaves: u32, lacunarity: f64, gain: f64) -> Self {
        Self::Octaves {
            source: Box::new(self),
            octaves: octaves.max(1),
            lacunarity,
            gain,
        }
    }

    /// Evaluate the field at `(x, z)`.
    pub fn sample(&self, x: f64, z: f64) -> f64 {
        match self {
            Self::Simplex(simplex) => simplex.get([x, z]),
            Self::Constant(value) => *value,
            Self::Scale { source, factor } => source.sample(x, z) * factor,
            Self::Offset { source, amount } => source.sample(x, z) + amount,
            Self::Frequency { source, factor } => source.sample(x * factor, z * factor),
            Self::Octaves {
                source,
                octaves,
                lacunarity,
                gain,
            } => {
                let mut total = 0.0;
                let mut scope = 0.0;
                let mut freq = 1.0;
                let mut amp = 1.0;

                for _ in 0..*octaves {
                    total += source.sample(x * freq, z * freq) * amp;
                    scope += amp;

                    freq *= lacunarity;
                    amp *= gain;
                }

                if scope == 0.0 { 0.0 } else { total / scope }
            }
        }
    }

    /// Upper bound on `|sample(x, z)|`, assuming the simplex leaf stays in
    /// `[-1, 1]` and octave gains are non-negative.
    pub fn amplitude_bound(&self) -> f64 {
        match self {
            Self::Simplex(_) => 1.0,
            Self::Constant(value) => value.abs(),
            Self::Scale { source, factor } => source.amplitude_bound() * factor.abs(),
            Self::Offset { source, amount } => source.amplitude_bound() + amount.abs(),
            Self::Frequency { source, .. } | Self::Octaves { source, .. } => {
                source.amplitude_bound()
            }
        }
    }

    /// Depth of the combinator tree (a leaf has depth 1).
    pub fn depth(&self) -> usize {
        match self {
            Self::Simplex(_) | Self::Constant(_) => 1,
            Self::Scale { source, .. }
            | Self::Offset { source, .. }
            | Self::Frequency { source, .. }
            | Self::Octaves { source, .. } => 1 + source.depth(),
        }
    }
}

impl fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simplex(_) => write!(f, "simplex"),
            Self::Constant(value) => write!(f, "{value}"),
            Self::Scale { source, factor } => write!(f, "({source:?}).scale({factor})"),
            Self::Offset { source, amount } => write!(f, "({source:?}).offset({amount})"),
            Self::Frequency { source, factor } => write!(f, "({source:?}).frequency({factor})"),
            Self::Octaves {
                source,
                octaves,
                lacunarity,
                gain,
            } => write!(f, "({source:?}).octavate({octaves}, {lacunarity}, {gain})"),
        }
    }
}
