//! Error types for world generation.

use std::fmt;

use crate::biome::BiomeId;

/// Pipeline stage an error originated in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GenerationStage {
    /// Building noise fields and checking settings.
    NoiseInit,
    /// Re-rolling climate fields until region counts are valid.
    ClimateValidation,
    /// Placing anchors and growing territories.
    TerritoryAllocation,
    /// Resolving the biome at a position.
    BiomeLookup,
    /// Resolving the surface elevation of a column.
    HeightResolution,
    /// Filling a block column.
    ColumnBuild,
}

impl fmt::Display for GenerationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NoiseInit => "noise init",
            Self::ClimateValidation => "climate validation",
            Self::TerritoryAllocation => "territory allocation",
            Self::BiomeLookup => "biome lookup",
            Self::HeightResolution => "height resolution",
            Self::ColumnBuild => "column build",
        };
        f.write_str(name)
    }
}

/// A failure tied to a specific query.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// A coordinate lies outside the supported range.
    #[error("coordinate out of range: {reason}")]
    CoordinateOutOfRange {
        /// Which bound was violated.
        reason: String,
    },
    /// The registry has no definition for a resolved biome.
    #[error("no definition registered for biome {0:?}")]
    MissingBiome(BiomeId),
}

/// Top-level error returned by every [`crate::WorldgenCore`] operation.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum WorldgenError {
    /// Settings are inconsistent, or no attempt within the retry budget
    /// satisfied the constraints.
    #[error("{stage} failed for seed {seed} after {attempts} attempt(s): {reason}")]
    Configuration {
        /// Stage that gave up.
        stage: GenerationStage,
        /// World seed.
        seed: u64,
        /// Attempts made before giving up.
        attempts: u32,
        /// Last rejection reason.
        reason: String,
    },
    /// A query could not be answered.
    #[error("{stage} failed for seed {seed} at ({x}, {y}, {z}): {source}")]
    Domain {
        /// Stage the query failed in.
        stage: GenerationStage,
        /// World seed.
        seed: u64,
        /// Block X.
        x: i32,
        /// Block Y. Column-level queries report `0`.
        y: i32,
        /// Block Z.
        z: i32,
        /// Underlying cause.
        source: DomainError,
    },
}

impl WorldgenError {
    /// Stage the error originated in.
    pub fn stage(&self) -> GenerationStage {
        match self {
            Self::Configuration { stage, .. } | Self::Domain { stage, .. } => *stage,
        }
    }

    /// Returns `true` for [`WorldgenError::Configuration`].
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_message_names_stage_and_seed() {
        let err = WorldgenError::Configuration {
            stage: GenerationStage::TerritoryAllocation,
            seed: 42,
            attempts: 3,
            reason: "no room for anchors".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("territory allocation"));
        assert!(msg.contains("42"));
        assert!(msg.contains("3 attempt"));
        assert!(msg.contains("no room for anchors"));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_domain_error_carries_coordinates() {
        let err = WorldgenError::Domain {
            stage: GenerationStage::BiomeLookup,
            seed: 1,
            x: 10,
            y: 999,
            z: -4,
            source: DomainError::CoordinateOutOfRange {
                reason: "y above the world".into(),
            },
        };
        assert_eq!(err.stage(), GenerationStage::BiomeLookup);
        assert!(err.to_string().contains("(10, 999, -4)"));
        assert_eq!(err.clone(), err);
    }
}
