use thiserror::Error;


/// Failures surfaced while turning a model into a point cloud.
///
/// None of these are retried. The viewer logs the error and exits.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SkullPointsError {
    /// The model or sprite texture could not be fetched or decoded.
    #[error("failed to load asset `{path}`: {reason}")]
    AssetLoad {
        path: String,
        reason: String,
    },

    /// The model has no triangles, or all of them are degenerate.
    #[error("mesh has no sampleable surface area")]
    EmptyMesh,

    /// The mesh data is malformed (bad index, non-finite position, unsupported format).
    #[error("invalid mesh: {0}")]
    InvalidMesh(String),

    #[error("point count must be greater than zero")]
    InvalidPointCount,

    /// A full-screen pipeline failed to compile.
    #[error("shader for `{pipeline}` failed to compile: {reason}")]
    ShaderCompile {
        pipeline: String,
        reason: String,
    },
}
