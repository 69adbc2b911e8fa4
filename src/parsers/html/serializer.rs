use html5ever::serialize::{serialize, SerializeOpts, TraversalScope};
use markup5ever_rcdom::{Handle, SerializableHandle};

/// 将单个元素节点序列化为独立的标记片段
///
/// 与整文档序列化不同，这里只输出节点本身（及其子树），
/// 不带 html/head 包装，用于把保留下来的 link/meta 元素
/// 逐个拼装成最终标记。
pub fn serialize_node(node: &Handle) -> String {
    let mut buf: Vec<u8> = Vec::new();
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..Default::default()
    };

    serialize(&mut buf, &SerializableHandle::from(node.clone()), opts)
        .expect("unable to serialize DOM node into buffer");

    String::from_utf8_lossy(&buf).to_string()
}
