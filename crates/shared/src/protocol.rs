//! Wire shapes exchanged with the backend evaluator.
//!
//! Payloads are immutable snapshots: the evaluator serializes a value into
//! these shapes, the viewer renders them, and every "show more" resolves into
//! a brand new payload for the same object rather than a patch. Shape tags,
//! field names, and the `"more"` sentinel are the interop contract and must
//! not be renamed.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{
    domain::{Axis, CellId, ObjectId},
    error::ProtocolError,
};

/// Content kind routed to the recursive tree renderer.
pub const TREE_KIND: &str = "application/vnd.cellview.tree+object";
/// Content kind routed to the two-dimensional table renderer.
pub const TABLE_KIND: &str = "application/vnd.cellview.table+object";
/// Content kind routed to the composite (styled wrapper) container.
pub const DIV_KIND: &str = "application/vnd.cellview.div+element";
pub const TEXT_PLAIN_KIND: &str = "text/plain";

pub const IMAGE_KINDS: &[&str] = &[
    "image/png",
    "image/jpg",
    "image/jpeg",
    "image/gif",
    "image/bmp",
    "image/svg+xml",
];

/// The pagination sentinel: "more elements exist beyond this point".
/// Schema name/type lists carry it as this literal string; element and row
/// lists carry it as the typed [`PaginationMarker`].
pub const MORE_SENTINEL: &str = "more";

/// One serialized value slot: `[content, content_kind]` on the wire. The
/// content stays opaque until a renderer strategy is selected for the kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayloadSlot(pub serde_json::Value, pub String);

impl PayloadSlot {
    pub fn new(kind: impl Into<String>, content: serde_json::Value) -> Self {
        Self(content, kind.into())
    }

    pub fn text(body: impl Into<String>) -> Self {
        Self(serde_json::Value::String(body.into()), TEXT_PLAIN_KIND.into())
    }

    pub fn tree(node: &TreeNode) -> Result<Self, serde_json::Error> {
        Ok(Self(serde_json::to_value(node)?, TREE_KIND.into()))
    }

    pub fn table(body: &TableBody) -> Result<Self, serde_json::Error> {
        Ok(Self(serde_json::to_value(body)?, TABLE_KIND.into()))
    }

    pub fn div(body: &CompositeBody) -> Result<Self, serde_json::Error> {
        Ok(Self(serde_json::to_value(body)?, DIV_KIND.into()))
    }

    pub fn content(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn kind(&self) -> &str {
        &self.1
    }

    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, ProtocolError> {
        serde_json::from_value(self.0.clone()).map_err(|source| ProtocolError::MalformedPayload {
            kind: self.1.clone(),
            source,
        })
    }
}

/// Typed spelling of the `"more"` sentinel where it appears inside element,
/// row, and cell lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaginationMarker {
    #[serde(rename = "more")]
    More,
}

/// An element list entry: either real data or the trailing pagination marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListElement<T> {
    More(PaginationMarker),
    Entry(T),
}

impl<T> ListElement<T> {
    pub fn is_more(&self) -> bool {
        matches!(self, ListElement::More(_))
    }
}

/// Sequence/set entry. Sets omit the index; sequences usually carry one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeqEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<serde_json::Value>,
    pub value: PayloadSlot,
}

/// Ordered-map entry: the key is itself a rendered payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapEntry {
    pub key: PayloadSlot,
    pub value: PayloadSlot,
}

/// Named-tuple/record entry: the key is a plain field name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldEntry {
    pub name: String,
    pub value: PayloadSlot,
}

/// One node of the recursive tree payload, discriminated by `shape`.
///
/// The unknown case absorbs shapes this build does not understand; the
/// renderer degrades it to an empty collapsible body instead of failing the
/// surrounding siblings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum TreeNode {
    Pair {
        key: PayloadSlot,
        value: PayloadSlot,
    },
    /// Terminal marker: this node is an ancestor of itself in the value
    /// graph. The evaluator detects the cycle and emits this instead of
    /// re-descending.
    Circular,
    Sequence {
        object_id: ObjectId,
        label: String,
        label_short: String,
        elements: Vec<ListElement<SeqEntry>>,
    },
    Set {
        object_id: ObjectId,
        label: String,
        label_short: String,
        elements: Vec<ListElement<SeqEntry>>,
    },
    OrderedMap {
        object_id: ObjectId,
        label: String,
        label_short: String,
        elements: Vec<ListElement<MapEntry>>,
    },
    NamedTuple {
        object_id: ObjectId,
        label: String,
        label_short: String,
        elements: Vec<ListElement<FieldEntry>>,
    },
    Record {
        object_id: ObjectId,
        label: String,
        label_short: String,
        elements: Vec<ListElement<FieldEntry>>,
    },
    #[serde(other)]
    Unknown,
}

impl TreeNode {
    pub fn shape_tag(&self) -> &'static str {
        match self {
            TreeNode::Pair { .. } => "pair",
            TreeNode::Circular => "circular",
            TreeNode::Sequence { .. } => "sequence",
            TreeNode::Set { .. } => "set",
            TreeNode::OrderedMap { .. } => "ordered_map",
            TreeNode::NamedTuple { .. } => "named_tuple",
            TreeNode::Record { .. } => "record",
            TreeNode::Unknown => "unknown",
        }
    }

    pub fn object_id(&self) -> Option<ObjectId> {
        match self {
            TreeNode::Sequence { object_id, .. }
            | TreeNode::Set { object_id, .. }
            | TreeNode::OrderedMap { object_id, .. }
            | TreeNode::NamedTuple { object_id, .. }
            | TreeNode::Record { object_id, .. } => Some(*object_id),
            TreeNode::Pair { .. } | TreeNode::Circular | TreeNode::Unknown => None,
        }
    }

    /// Invariant check: a pagination marker, if present, is the last element
    /// and there is at most one of them.
    pub fn marker_is_terminal(&self) -> bool {
        match self {
            TreeNode::Sequence { elements, .. } | TreeNode::Set { elements, .. } => {
                marker_is_terminal(elements)
            }
            TreeNode::OrderedMap { elements, .. } => marker_is_terminal(elements),
            TreeNode::NamedTuple { elements, .. } | TreeNode::Record { elements, .. } => {
                marker_is_terminal(elements)
            }
            TreeNode::Pair { .. } | TreeNode::Circular | TreeNode::Unknown => true,
        }
    }
}

pub fn marker_is_terminal<T>(elements: &[ListElement<T>]) -> bool {
    let markers = elements.iter().filter(|e| e.is_more()).count();
    match markers {
        0 => true,
        1 => elements.last().is_some_and(ListElement::is_more),
        _ => false,
    }
}

/// Header of a table payload. `names` and `types` are index-aligned; either
/// may end with the literal `"more"` sentinel meaning more columns exist.
/// A missing schema means "render no header".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    pub names: Vec<String>,
    pub types: Vec<String>,
}

impl TableSchema {
    pub fn has_column_marker(&self) -> bool {
        self.names.last().map(String::as_str) == Some(MORE_SENTINEL)
    }
}

/// One table cell: a payload slot, the column pagination marker, or an empty
/// hole (rendered as nothing, never an error).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TableCell {
    More(PaginationMarker),
    Slot(PayloadSlot),
    Empty(()),
}

/// `[row_label, [cell, ...]]` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowBody(pub serde_json::Value, pub Vec<TableCell>);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TableRow {
    More(PaginationMarker),
    Row(RowBody),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableBody {
    pub object_id: ObjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<TableSchema>,
    pub rows: Vec<TableRow>,
}

impl TableBody {
    /// Row-axis invariant: at most one marker row, and only in last position.
    pub fn row_marker_is_terminal(&self) -> bool {
        let markers = self
            .rows
            .iter()
            .filter(|r| matches!(r, TableRow::More(_)))
            .count();
        match markers {
            0 => true,
            1 => matches!(self.rows.last(), Some(TableRow::More(_))),
            _ => false,
        }
    }

    /// Column-axis invariant: every data row is truncated at the same column
    /// cursor as the header, i.e. data cell counts match and a trailing
    /// column marker appears in each row exactly when the header carries one.
    pub fn column_cursor_is_consistent(&self) -> bool {
        let Some(schema) = &self.schema else {
            return true;
        };
        let header_more = schema.has_column_marker();
        let header_cols = schema.names.len() - usize::from(header_more);
        self.rows.iter().all(|row| match row {
            TableRow::More(_) => true,
            TableRow::Row(RowBody(_, cells)) => {
                let row_more = matches!(cells.last(), Some(TableCell::More(_)));
                let row_cols = cells.len() - usize::from(row_more);
                row_more == header_more && row_cols == header_cols
            }
        })
    }
}

/// Composite container: a fixed list of child slots in a styled wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classname: Option<String>,
    pub children: Vec<PayloadSlot>,
}

/// "Reveal more along `axis` for the value `object_id` in `cell_id`."
/// Fire-and-forget: the answer is a later [`CellUpdate`] for the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisclosureRequest {
    pub cell_id: CellId,
    pub object_id: ObjectId,
    pub axis: Axis,
}

/// A (re)delivered payload snapshot for one cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellUpdate {
    pub cell_id: CellId,
    pub slot: PayloadSlot,
    pub delivered_at: DateTime<Utc>,
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
