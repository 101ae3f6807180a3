use super::super::node::Node;
use super::super::point::Point;
use super::super::prquadtree::PRQuadTree;
use super::super::quadrant::Quadrant;
use serde::{Deserialize, Serialize};

/// 用于JSON序列化的树结构
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeVisualization {
    /// 根节点（如果存在）
    pub root: Option<NodeVisualization>,
    /// 树的配置参数
    pub config: TreeConfig,
}

/// 用于JSON序列化的树配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeConfig {
    pub resolution: u32,
    pub bucket_size: usize,
    pub count: usize,
    pub height: usize,
}

/// 节点类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeType {
    Leaf,
    Internal,
}

/// 用于JSON序列化的节点结构
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeVisualization {
    pub node_type: NodeType,
    pub centroid: Point,
    pub k: u32,
    pub count: usize,
    /// 叶子节点中的点（仅叶子节点）
    pub points: Vec<Point>,
    /// 非空子节点，按 Z 序（仅内部节点）
    pub children: Vec<ChildVisualization>,
}

/// 内部节点的一个非空子节点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildVisualization {
    pub quadrant: Quadrant,
    pub node: NodeVisualization,
}

impl PRQuadTree {
    /// 导出树结构为JSON格式
    ///
    /// 返回包含完整树结构的JSON字符串，用于可视化和调试
    pub fn export_to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.create_tree_visualization())
    }

    /// 创建用于可视化的树结构
    pub fn create_tree_visualization(&self) -> TreeVisualization {
        TreeVisualization {
            root: self.root().map(create_node_visualization),
            config: TreeConfig {
                resolution: self.resolution(),
                bucket_size: self.bucket_size(),
                count: self.count(),
                height: self.height(),
            },
        }
    }
}

/// 递归创建节点的可视化结构
fn create_node_visualization(node: &Node) -> NodeVisualization {
    match node {
        Node::Leaf(leaf) => NodeVisualization {
            node_type: NodeType::Leaf,
            centroid: leaf.centroid(),
            k: leaf.k(),
            count: leaf.count(),
            points: leaf.points(),
            children: Vec::new(),
        },
        Node::Internal(internal) => NodeVisualization {
            node_type: NodeType::Internal,
            centroid: internal.centroid(),
            k: internal.k(),
            count: internal.count(),
            points: Vec::new(),
            children: internal
                .occupied()
                .map(|(quadrant, child)| ChildVisualization {
                    quadrant,
                    node: create_node_visualization(child),
                })
                .collect(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_export_empty_tree() {
        let tree = PRQuadTree::new(4, 3).unwrap();
        let json = tree.export_to_json().expect("Failed to export JSON");
        assert!(json.contains("\"root\": null"));
        assert!(json.contains("\"bucket_size\": 3"));
    }

    #[test]
    fn test_json_export_round_trip_structure() {
        let mut tree = PRQuadTree::new(3, 1).unwrap();
        for (x, y) in [(0, 0), (4, 0), (0, 4), (4, 4)] {
            tree.insert(Point::new(x, y)).unwrap();
        }

        let json = tree.export_to_json().expect("Failed to export JSON");
        let parsed: TreeVisualization = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, tree.create_tree_visualization());

        let root = parsed.root.unwrap();
        assert_eq!(root.node_type, NodeType::Internal);
        assert_eq!(root.count, 4);
        let quadrants: Vec<Quadrant> = root.children.iter().map(|c| c.quadrant).collect();
        assert_eq!(
            quadrants,
            vec![Quadrant::NW, Quadrant::NE, Quadrant::SW, Quadrant::SE]
        );
        assert!(root
            .children
            .iter()
            .all(|c| c.node.node_type == NodeType::Leaf && c.node.points.len() == 1));
    }
}
