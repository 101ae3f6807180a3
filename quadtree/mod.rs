pub mod algorithms;
pub mod error;
pub mod node;
pub mod point;
pub mod prquadtree;
pub mod quadrant;

// 重新导出主要类型
pub use algorithms::delete::Removal;
pub use algorithms::export::{NodeType, NodeVisualization, TreeVisualization};
pub use algorithms::knn::{BoundedPriorityQueue, KnnResult, NnData};
pub use error::QuadTreeError;
pub use node::{InternalNode, LeafNode, Node, Slot};
pub use point::Point;
pub use prquadtree::PRQuadTree;
pub use quadrant::{Quadrant, Region};
