use super::point::Point;

/// PR四叉树错误类型
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QuadTreeError {
    /// 需要分裂但区域已经是单个格点，无法再细分
    #[error("Centroid accuracy exceeded: cannot split a node with k = {k}")]
    CentroidAccuracy { k: u32 },
    #[error("Point {point} is outside the indexed space [0, {side})")]
    OutOfBounds { point: Point, side: i64 },
    #[error("Point {point} is outside the region of the target slot")]
    OutOfRegion { point: Point },
    #[error("Bucket size must be at least 1")]
    InvalidBucketSize,
    #[error("Resolution k = {k} exceeds the maximum of {max}")]
    InvalidResolution { k: u32, max: u32 },
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),
}

pub type Result<T> = std::result::Result<T, QuadTreeError>;
