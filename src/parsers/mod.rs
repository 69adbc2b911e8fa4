//! # 解析器模块
//!
//! 这个模块包含标记解析相关的功能：
//!
//! - HTML 片段的容错解析、元素操作和序列化
//!
//! # 模块组织
//!
//! - `html` - HTML 片段 DOM 处理

pub mod html;

// Re-export commonly used items for convenience
pub use html::{find_nodes, fragment_to_dom, get_node_attr, serialize_node, set_node_attr};
