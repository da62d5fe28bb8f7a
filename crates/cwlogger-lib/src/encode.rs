//! Attribute encoding into the JSON payload submitted to the sink.
//!
//! The payload is an ordered tree rather than a map: keys keep their
//! encounter order and duplicate keys are written as-is, so a handler
//! attribute and a record attribute sharing a key both reach the sink.

use chrono::SecondsFormat;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value as JsonValue;

use crate::attr::{Attr, Value};
use crate::error::Result;
use crate::record::LogRecord;

/// A node in the encoded payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Value(JsonValue),
    Tree(Tree),
}

/// Ordered key/value tree. Duplicate keys are permitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tree {
    entries: Vec<(String, Node)>,
}

impl Tree {
    pub fn entries(&self) -> &[(String, Node)] {
        &self.entries
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// First node stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, n)| n)
    }

    /// Every node stored under `key`, in encounter order.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.entries
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, n)| n)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize to the UTF-8 JSON text carried by a log event.
    pub fn to_message(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    fn push(&mut self, key: impl Into<String>, node: Node) {
        self.entries.push((key.into(), node));
    }
}

impl Serialize for Tree {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, node) in &self.entries {
            map.serialize_entry(key, node)?;
        }
        map.end()
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Node::Value(value) => value.serialize(serializer),
            Node::Tree(tree) => tree.serialize(serializer),
        }
    }
}

/// Build the payload for `record`.
///
/// `inherited` are the handler's accumulated attributes and precede the
/// record's own. `groups` is the handler's group path, written as a
/// `groups` list when non-empty.
pub fn encode(record: &LogRecord, inherited: &[Attr], groups: &[String]) -> Tree {
    let mut tree = Tree::default();

    tree.push(
        "time",
        Node::Value(JsonValue::String(
            record.time.to_rfc3339_opts(SecondsFormat::Secs, true),
        )),
    );
    tree.push(
        "level",
        Node::Value(JsonValue::String(record.level.as_str().to_string())),
    );
    tree.push(
        "message",
        Node::Value(JsonValue::String(record.message.clone())),
    );

    if !groups.is_empty() {
        tree.push(
            "groups",
            Node::Value(JsonValue::Array(
                groups.iter().cloned().map(JsonValue::String).collect(),
            )),
        );
    }

    for attr in inherited.iter().chain(record.attrs.iter()) {
        append_attr(&mut tree, attr);
    }

    tree
}

fn append_attr(tree: &mut Tree, attr: &Attr) {
    if attr.is_empty() {
        return;
    }

    let node = match &attr.value {
        Value::Empty => return,
        Value::Scalar(value) => Node::Value(value.clone()),
        Value::Error(err) => Node::Value(JsonValue::String(err.to_string())),
        Value::Group(children) => {
            let mut sub = Tree::default();
            for child in children {
                append_attr(&mut sub, child);
            }
            Node::Tree(sub)
        }
    };

    tree.push(attr.key.clone(), node);
}
