//! JSON wire form of the syntax tree.
//!
//! Decoding goes through `serde_path_to_error` so that a malformed tree
//! reports where it went wrong (`children[3].properties.VALUE`), not only
//! what went wrong.

use crate::Node;
use thiserror::Error;

/// Failure to decode a syntax tree from JSON.
#[derive(Debug, Error)]
pub enum AstError {
    #[error("at JSON path {path}: {message}")]
    Decode { path: String, message: String },
}

fn map_error(err: serde_path_to_error::Error<serde_json::Error>) -> AstError {
    let path = err.path().to_string();
    AstError::Decode {
        path,
        message: err.into_inner().to_string(),
    }
}

/// Decode a syntax tree from JSON text.
pub fn from_str(src: &str) -> Result<Node, AstError> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize(de).map_err(map_error)
}

/// Decode a syntax tree from JSON bytes.
pub fn from_slice(bytes: &[u8]) -> Result<Node, AstError> {
    let de = &mut serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(de).map_err(map_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PropertyValue;

    #[test]
    fn decodes_wire_form_with_optional_fields() {
        let src = r#"{
            "class": "File",
            "properties": { "FILENAME": "Foo.idl" },
            "children": [
                { "class": "Interface", "name": "Foo", "properties": { "PARTIAL": true } },
                { "class": "Enum", "name": "Mode",
                  "children": [ { "class": "EnumItem", "name": "a" } ] }
            ]
        }"#;
        let node = from_str(src).expect("tree should decode");

        assert_eq!(node.class(), "File");
        assert_eq!(node.name(), None);
        assert_eq!(node.string_property("FILENAME"), Some("Foo.idl"));
        assert_eq!(node.children().len(), 2);
        assert!(node.children()[0].flag("PARTIAL"));
        assert_eq!(node.children()[1].children()[0].name(), Some("a"));
    }

    #[test]
    fn decodes_list_properties() {
        let node = from_str(r#"{"class": "ExtAttribute", "name": "Exposed",
                               "properties": {"VALUE": ["Window", "Worker"]}}"#)
            .expect("tree should decode");
        assert_eq!(
            node.property("VALUE"),
            Some(&PropertyValue::List(vec!["Window".into(), "Worker".into()]))
        );
    }

    #[test]
    fn decode_error_carries_path() {
        let err = from_slice(br#"{"class": "File", "children": [{"class": 3}]}"#)
            .expect_err("numeric class should fail");
        let AstError::Decode { path, .. } = err;
        assert_eq!(path, "children[0].class");
    }

    #[test]
    fn round_trips_through_serde() {
        let node = Node::new("Attribute")
            .named("x")
            .with_property("READONLY", true)
            .with_child(Node::new("Type").with_child(Node::new("PrimitiveType").named("long")));
        let text = serde_json::to_string(&node).expect("serialize");
        assert_eq!(from_str(&text).expect("decode"), node);
    }
}
