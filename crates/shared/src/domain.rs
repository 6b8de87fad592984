use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(ObjectId);

/// Identity of the document cell that owns a rendered value. Disclosure
/// requests are resolved against this, so it is threaded explicitly through
/// every recursive render call instead of being recovered from rendered
/// output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellId(pub Uuid);

impl CellId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CellId {
    fn default() -> Self {
        Self::new()
    }
}

/// Pagination dimension of a disclosure request. On the wire this is the
/// integer the evaluator expects: 1 for the primary/row axis, 2 for table
/// columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Axis {
    Rows,
    Columns,
}

impl From<Axis> for u8 {
    fn from(value: Axis) -> Self {
        match value {
            Axis::Rows => 1,
            Axis::Columns => 2,
        }
    }
}

impl TryFrom<u8> for Axis {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Axis::Rows),
            2 => Ok(Axis::Columns),
            other => Err(format!("axis must be 1 (rows) or 2 (columns), got {other}")),
        }
    }
}
