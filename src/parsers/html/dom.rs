use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// 将 HTML 片段解析为 DOM
///
/// 使用容错解析器：无法作为元素物化的内容（纯文本、残缺标记）
/// 会被静默跳过，解析本身永远不会失败。
pub fn fragment_to_dom(markup: &str) -> RcDom {
    parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut markup.as_bytes())
        .unwrap()
}

/// 按标签名收集元素节点（文档顺序）
pub fn find_nodes(node: &Handle, node_name: &str) -> Vec<Handle> {
    let mut found_nodes = Vec::new();

    if let NodeData::Element { ref name, .. } = node.data {
        if &*name.local == node_name {
            found_nodes.push(node.clone());
        }
    }

    for child_node in node.children.borrow().iter() {
        found_nodes.append(&mut find_nodes(child_node, node_name));
    }

    found_nodes
}

/// 获取节点属性值
pub fn get_node_attr(node: &Handle, attr_name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| &*attr.name.local == attr_name)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

/// 设置节点属性
///
/// `attr_value` 为 `None` 时移除该属性。
pub fn set_node_attr(node: &Handle, attr_name: &str, attr_value: Option<String>) {
    use html5ever::interface::{Attribute, QualName};
    use html5ever::tendril::format_tendril;
    use html5ever::{namespace_url, ns, LocalName};

    if let NodeData::Element { ref attrs, .. } = node.data {
        let attrs_mut = &mut attrs.borrow_mut();

        match attr_value {
            Some(value) => {
                if let Some(existing) = attrs_mut
                    .iter_mut()
                    .find(|attr| &*attr.name.local == attr_name)
                {
                    existing.value.clear();
                    existing.value.push_slice(&value);
                } else {
                    // Add new attribute (since originally the target node didn't have it)
                    attrs_mut.push(Attribute {
                        name: QualName::new(None, ns!(), LocalName::from(attr_name)),
                        value: format_tendril!("{}", value),
                    });
                }
            }
            None => attrs_mut.retain(|attr| &*attr.name.local != attr_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_to_dom_collects_links_in_order() {
        let dom = fragment_to_dom(
            "<link rel=\"icon\" href=\"/a.png\"><link rel=\"icon\" href=\"/b.png\">",
        );

        let links = find_nodes(&dom.document, "link");

        assert_eq!(links.len(), 2);
        assert_eq!(get_node_attr(&links[0], "href"), Some("/a.png".to_string()));
        assert_eq!(get_node_attr(&links[1], "href"), Some("/b.png".to_string()));
    }

    #[test]
    fn test_fragment_to_dom_tolerates_malformed_markup() {
        let dom = fragment_to_dom("<link rel=icon href=/a.png><not-closed <meta name=x");

        // 解析不会失败，能物化的元素被保留
        assert_eq!(find_nodes(&dom.document, "link").len(), 1);
    }

    #[test]
    fn test_fragment_to_dom_plain_text_has_no_elements() {
        let dom = fragment_to_dom("just some text");

        assert!(find_nodes(&dom.document, "link").is_empty());
        assert!(find_nodes(&dom.document, "meta").is_empty());
    }

    #[test]
    fn test_get_node_attr_missing() {
        let dom = fragment_to_dom("<link rel=\"icon\">");
        let links = find_nodes(&dom.document, "link");

        assert_eq!(get_node_attr(&links[0], "href"), None);
    }

    #[test]
    fn test_set_node_attr_replaces_and_removes() {
        let dom = fragment_to_dom("<link rel=\"icon\" href=\"/old.png\">");
        let links = find_nodes(&dom.document, "link");

        set_node_attr(&links[0], "href", Some("/new.png".to_string()));
        assert_eq!(
            get_node_attr(&links[0], "href"),
            Some("/new.png".to_string())
        );

        set_node_attr(&links[0], "href", None);
        assert_eq!(get_node_attr(&links[0], "href"), None);
    }

    #[test]
    fn test_set_node_attr_adds_missing_attribute() {
        let dom = fragment_to_dom("<meta name=\"theme-color\">");
        let metas = find_nodes(&dom.document, "meta");

        set_node_attr(&metas[0], "content", Some("#ffffff".to_string()));

        assert_eq!(
            get_node_attr(&metas[0], "content"),
            Some("#ffffff".to_string())
        );
    }
}
