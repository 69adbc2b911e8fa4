//! HTML 片段解析和处理模块
//!
//! 管理员粘贴的 favicon 标记是一个 HTML 片段而不是完整文档，
//! 这里提供面向片段的容错 DOM 操作：
//!
//! - `dom`: 片段解析和基础 DOM 操作
//! - `serializer`: 单节点序列化

pub mod dom;
pub mod serializer;

// 重新导出主要的公共 API
pub use dom::{find_nodes, fragment_to_dom, get_node_attr, set_node_attr};
pub use serializer::serialize_node;
