// PR四叉树算法模块
//
// 这个模块包含PR四叉树的所有核心算法实现，按功能分解为不同的子模块：
// - insert: 插入、叶子分裂和压缩节点扩展
// - delete: 删除和节点合并
// - search: 点查询和范围查询
// - knn: 最近邻和K-最近邻搜索
// - validate: 结构不变量校验
// - debug: 调试输出
// - export: JSON导出

pub mod debug;
pub mod delete;
pub mod export;
pub mod insert;
pub mod knn;
pub mod search;
pub mod validate;
