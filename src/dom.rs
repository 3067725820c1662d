use anyhow::{Context, Result};
use html5ever::serialize::{serialize, SerializeOpts};
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};

/// Parses fetched HTML into an owned mutable tree.
///
/// The session holds the tree exclusively for one rewrite pass; the engine
/// mutates attribute values in place through element handles, so node
/// identity is preserved across rewriting.
pub fn parse(html: &str) -> RcDom {
    parse_document(RcDom::default(), ParseOpts::default()).one(html)
}

/// Serializes the (possibly mutated) document back to HTML text.
pub fn to_html(dom: &RcDom) -> Result<String> {
    let mut buf = Vec::new();
    let document: SerializableHandle = dom.document.clone().into();
    serialize(&mut buf, &document, SerializeOpts::default())
        .context("Failed to serialize document")?;
    String::from_utf8(buf).context("Serialized document was not valid UTF-8")
}

pub fn is_element(node: &Handle, tag: &str) -> bool {
    matches!(&node.data, NodeData::Element { name, .. } if name.local.as_ref() == tag)
}

pub fn get_attr(node: &Handle, attr_name: &str) -> Option<String> {
    if let NodeData::Element { ref attrs, .. } = node.data {
        attrs
            .borrow()
            .iter()
            .find(|a| a.name.local.as_ref() == attr_name)
            .map(|a| a.value.to_string())
    } else {
        None
    }
}

/// Overwrites an existing attribute value in place. A node without the
/// attribute is left untouched; the engine only rewrites references it has
/// already read.
pub fn set_attr(node: &Handle, attr_name: &str, value: &str) {
    if let NodeData::Element { ref attrs, .. } = node.data {
        if let Some(attr) = attrs
            .borrow_mut()
            .iter_mut()
            .find(|a| a.name.local.as_ref() == attr_name)
        {
            attr.value = StrTendril::from(value);
        }
    }
}

/// Preorder walk collecting every element the predicate accepts, in
/// document order.
pub fn find_all(root: &Handle, pred: &dyn Fn(&Handle) -> bool) -> Vec<Handle> {
    let mut found = Vec::new();
    walk(root, pred, &mut found);
    found
}

fn walk(node: &Handle, pred: &dyn Fn(&Handle) -> bool, found: &mut Vec<Handle>) {
    if pred(node) {
        found.push(node.clone());
    }
    for child in node.children.borrow().iter() {
        walk(child, pred, found);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_find_elements() {
        let dom = parse(r#"<html><body><img src="a.png"><img src="b.png"><p>hi</p></body></html>"#);
        let imgs = find_all(&dom.document, &|n| is_element(n, "img"));
        assert_eq!(imgs.len(), 2);
        assert_eq!(get_attr(&imgs[0], "src"), Some("a.png".to_string()));
        assert_eq!(get_attr(&imgs[1], "src"), Some("b.png".to_string()));
    }

    #[test]
    fn test_set_attr_mutates_in_place() {
        let dom = parse(r#"<html><body><img src="https://test.com/a.png"></body></html>"#);
        let imgs = find_all(&dom.document, &|n| is_element(n, "img"));
        set_attr(&imgs[0], "src", "a.png");

        assert_eq!(get_attr(&imgs[0], "src"), Some("a.png".to_string()));
        let html = to_html(&dom).unwrap();
        assert!(html.contains(r#"<img src="a.png">"#));
        assert!(!html.contains("https://test.com/a.png"));
    }

    #[test]
    fn test_set_attr_ignores_missing_attribute() {
        let dom = parse("<html><body><img></body></html>");
        let imgs = find_all(&dom.document, &|n| is_element(n, "img"));
        set_attr(&imgs[0], "src", "a.png");
        assert_eq!(get_attr(&imgs[0], "src"), None);
    }

    #[test]
    fn test_serialization_keeps_document_structure() {
        let dom = parse("<html><head></head><body><p>hello</p></body></html>");
        let html = to_html(&dom).unwrap();
        assert!(html.contains("<p>hello</p>"));
        assert!(html.contains("<body>"));
    }
}
