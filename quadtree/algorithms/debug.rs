use super::super::node::Node;
use super::super::prquadtree::PRQuadTree;
use std::fmt::Write;

/// PR四叉树调试功能实现
impl PRQuadTree {
    /// 生成完整的树结构描述
    ///
    /// 递归遍历整棵树，每个节点一行，包括象限路径、节点类型、质心、k 和点数。
    pub fn format_tree_structure(&self) -> String {
        fn format_node_recursive(out: &mut String, node: &Node, depth: usize, path: &str) {
            let indent = "  ".repeat(depth);
            match node {
                Node::Leaf(leaf) => {
                    let points: Vec<String> = leaf.points().iter().map(|p| p.to_string()).collect();
                    let _ = writeln!(
                        out,
                        "{}Leaf{} (centroid={}, k={}, {} points): [{}]",
                        indent,
                        path,
                        leaf.centroid(),
                        leaf.k(),
                        leaf.count(),
                        points.join(", ")
                    );
                }
                Node::Internal(internal) => {
                    let _ = writeln!(
                        out,
                        "{}Internal{} (centroid={}, k={}, count={}, height={}):",
                        indent,
                        path,
                        internal.centroid(),
                        internal.k(),
                        internal.count(),
                        internal.height()
                    );
                    for (quadrant, child) in internal.occupied() {
                        let child_path = format!("{}[{}]", path, quadrant);
                        format_node_recursive(out, child, depth + 1, &child_path);
                    }
                }
            }
        }

        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== PR-quadtree (k={}, b={}, count={}) ===",
            self.resolution(),
            self.bucket_size(),
            self.count()
        );
        match self.root() {
            Some(root) => format_node_recursive(&mut out, root, 0, ""),
            None => out.push_str("Empty tree (no root)\n"),
        }
        out.push_str("=== End ===\n");
        out
    }

    /// 打印完整的树结构用于调试
    pub fn print_tree_structure_debug(&self) {
        print!("{}", self.format_tree_structure());
    }
}
