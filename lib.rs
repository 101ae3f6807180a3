pub mod cli;
pub mod commands;
pub mod config;
pub mod quadtree;

use std::error::Error;

// 重新导出主要的公共接口
pub use quadtree::{
    InternalNode, KnnResult, LeafNode, Node, PRQuadTree, Point, QuadTreeError, Quadrant, Region,
};

// 重新导出常用类型，便于二进制文件使用
pub use cli::{CliArgs, OutputFormatter};
pub use commands::{Command, CommandError, Reply};
pub use config::PrquadConfig;

pub type Result<T> = std::result::Result<T, Box<dyn Error + Send + Sync>>;
