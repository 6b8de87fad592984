//! In-process demo evaluator.
//!
//! Holds a few sample values, serializes them into viewer payloads, and
//! answers disclosure requests by widening a per-object, per-axis pagination
//! window and re-serializing the whole owning cell. Windows only ever grow,
//! so a re-delivered payload always extends the previous one.

use std::collections::HashMap;

use chrono::Utc;
use serde_json::json;
use shared::domain::{Axis, CellId, ObjectId};
use shared::error::{ErrorCode, EvalError, ProtocolError};
use shared::protocol::{
    CellUpdate, CompositeBody, DisclosureRequest, FieldEntry, ListElement, MapEntry,
    PaginationMarker, PayloadSlot, RowBody, SeqEntry, TableBody, TableCell, TableRow, TableSchema,
    TreeNode, MORE_SENTINEL,
};

/// Elements shown per tree pagination page. Small on purpose so the demo
/// values overflow and exercise the disclosure path.
const TREE_PAGE: usize = 5;
const TABLE_ROW_PAGE: usize = 6;
const TABLE_COL_PAGE: usize = 4;

/// A value the demo evaluator can hold. Container variants carry the object
/// id their serialized payload advertises for disclosure.
enum SampleValue {
    Text(String),
    Html(String),
    Seq {
        id: ObjectId,
        label: String,
        label_short: String,
        items: Vec<SampleValue>,
    },
    Set {
        id: ObjectId,
        label: String,
        label_short: String,
        items: Vec<SampleValue>,
    },
    Map {
        id: ObjectId,
        label: String,
        label_short: String,
        entries: Vec<(SampleValue, SampleValue)>,
    },
    Record {
        id: ObjectId,
        label: String,
        label_short: String,
        named_tuple: bool,
        fields: Vec<(String, SampleValue)>,
    },
    Pair {
        key: Box<SampleValue>,
        value: Box<SampleValue>,
    },
    /// Stand-in for a value that contains itself.
    Circular,
    Table {
        id: ObjectId,
        names: Vec<String>,
        types: Vec<String>,
        rows: Vec<(serde_json::Value, Vec<SampleValue>)>,
    },
    Div {
        classname: Option<String>,
        children: Vec<SampleValue>,
    },
}

impl SampleValue {
    fn text(s: impl Into<String>) -> Self {
        SampleValue::Text(s.into())
    }

    fn object_id(&self) -> Option<ObjectId> {
        match self {
            SampleValue::Seq { id, .. }
            | SampleValue::Set { id, .. }
            | SampleValue::Map { id, .. }
            | SampleValue::Record { id, .. }
            | SampleValue::Table { id, .. } => Some(*id),
            _ => None,
        }
    }
}

#[derive(Default)]
struct IdGen(i64);

impl IdGen {
    fn next(&mut self) -> ObjectId {
        self.0 += 1;
        ObjectId(self.0)
    }
}

struct Cell {
    id: CellId,
    title: String,
    value: SampleValue,
}

pub struct Evaluator {
    cells: Vec<Cell>,
    owners: HashMap<ObjectId, CellId>,
    /// Extra pages revealed beyond the first, per object and axis.
    windows: HashMap<(ObjectId, Axis), usize>,
}

impl Evaluator {
    pub fn with_samples() -> Self {
        let mut ids = IdGen::default();
        let cells = vec![
            Cell {
                id: CellId::new(),
                title: "fibonacci".to_string(),
                value: fibonacci_sample(&mut ids),
            },
            Cell {
                id: CellId::new(),
                title: "nested structures".to_string(),
                value: nested_sample(&mut ids),
            },
            Cell {
                id: CellId::new(),
                title: "measurements".to_string(),
                value: table_sample(&mut ids),
            },
            Cell {
                id: CellId::new(),
                title: "report".to_string(),
                value: report_sample(&mut ids),
            },
        ];

        let mut owners = HashMap::new();
        for cell in &cells {
            register_owners(&cell.value, cell.id, &mut owners);
        }

        Self {
            cells,
            owners,
            windows: HashMap::new(),
        }
    }

    pub fn cell_ids(&self) -> Vec<CellId> {
        self.cells.iter().map(|c| c.id).collect()
    }

    pub fn cell_title(&self, cell_id: CellId) -> String {
        self.cells
            .iter()
            .find(|c| c.id == cell_id)
            .map(|c| c.title.clone())
            .unwrap_or_else(|| "cell".to_string())
    }

    /// Serializes the cell's value at its current disclosure windows.
    pub fn snapshot(&self, cell_id: CellId) -> Result<CellUpdate, EvalError> {
        let cell = self
            .cells
            .iter()
            .find(|c| c.id == cell_id)
            .ok_or(ProtocolError::DetachedCell { cell: cell_id })?;
        let slot = self.serialize(&cell.value).map_err(|err| {
            EvalError::new(
                ErrorCode::Evaluator,
                format!("failed to serialize cell value: {err}"),
            )
        })?;
        Ok(CellUpdate {
            cell_id,
            slot,
            delivered_at: Utc::now(),
        })
    }

    /// Widens one window and re-delivers the owning cell. Rejects requests
    /// for objects it never serialized and requests whose cell no longer
    /// owns the object.
    pub fn reveal_more(&mut self, request: &DisclosureRequest) -> Result<CellUpdate, EvalError> {
        let owner = self
            .owners
            .get(&request.object_id)
            .copied()
            .ok_or(ProtocolError::UnknownObject {
                object_id: request.object_id,
            })?;
        if owner != request.cell_id {
            return Err(ProtocolError::DetachedCell {
                cell: request.cell_id,
            }
            .into());
        }
        *self
            .windows
            .entry((request.object_id, request.axis))
            .or_insert(0) += 1;
        self.snapshot(owner)
    }

    /// How many of `total` entries the window for (`id`, `axis`) admits.
    fn visible(&self, id: ObjectId, axis: Axis, page: usize, total: usize) -> usize {
        let pages = 1 + self.windows.get(&(id, axis)).copied().unwrap_or(0);
        (page * pages).min(total)
    }

    fn serialize(&self, value: &SampleValue) -> Result<PayloadSlot, serde_json::Error> {
        match value {
            SampleValue::Text(s) => Ok(PayloadSlot::text(s.clone())),
            SampleValue::Html(s) => Ok(PayloadSlot::new("text/html", json!(s))),
            SampleValue::Seq {
                id,
                label,
                label_short,
                items,
            } => PayloadSlot::tree(&TreeNode::Sequence {
                object_id: *id,
                label: label.clone(),
                label_short: label_short.clone(),
                elements: self.seq_elements(*id, items, true)?,
            }),
            SampleValue::Set {
                id,
                label,
                label_short,
                items,
            } => PayloadSlot::tree(&TreeNode::Set {
                object_id: *id,
                label: label.clone(),
                label_short: label_short.clone(),
                elements: self.seq_elements(*id, items, false)?,
            }),
            SampleValue::Map {
                id,
                label,
                label_short,
                entries,
            } => {
                let shown = self.visible(*id, Axis::Rows, TREE_PAGE, entries.len());
                let mut elements = Vec::with_capacity(shown + 1);
                for (k, v) in &entries[..shown] {
                    elements.push(ListElement::Entry(MapEntry {
                        key: self.serialize(k)?,
                        value: self.serialize(v)?,
                    }));
                }
                if shown < entries.len() {
                    elements.push(ListElement::More(PaginationMarker::More));
                }
                PayloadSlot::tree(&TreeNode::OrderedMap {
                    object_id: *id,
                    label: label.clone(),
                    label_short: label_short.clone(),
                    elements,
                })
            }
            SampleValue::Record {
                id,
                label,
                label_short,
                named_tuple,
                fields,
            } => {
                let shown = self.visible(*id, Axis::Rows, TREE_PAGE, fields.len());
                let mut elements = Vec::with_capacity(shown + 1);
                for (name, v) in &fields[..shown] {
                    elements.push(ListElement::Entry(FieldEntry {
                        name: name.clone(),
                        value: self.serialize(v)?,
                    }));
                }
                if shown < fields.len() {
                    elements.push(ListElement::More(PaginationMarker::More));
                }
                let node = if *named_tuple {
                    TreeNode::NamedTuple {
                        object_id: *id,
                        label: label.clone(),
                        label_short: label_short.clone(),
                        elements,
                    }
                } else {
                    TreeNode::Record {
                        object_id: *id,
                        label: label.clone(),
                        label_short: label_short.clone(),
                        elements,
                    }
                };
                PayloadSlot::tree(&node)
            }
            SampleValue::Pair { key, value } => PayloadSlot::tree(&TreeNode::Pair {
                key: self.serialize(key)?,
                value: self.serialize(value)?,
            }),
            SampleValue::Circular => PayloadSlot::tree(&TreeNode::Circular),
            SampleValue::Table {
                id,
                names,
                types,
                rows,
            } => self.serialize_table(*id, names, types, rows),
            SampleValue::Div {
                classname,
                children,
            } => {
                let children = children
                    .iter()
                    .map(|c| self.serialize(c))
                    .collect::<Result<Vec<_>, _>>()?;
                PayloadSlot::div(&CompositeBody {
                    style: None,
                    classname: classname.clone(),
                    children,
                })
            }
        }
    }

    fn seq_elements(
        &self,
        id: ObjectId,
        items: &[SampleValue],
        indexed: bool,
    ) -> Result<Vec<ListElement<SeqEntry>>, serde_json::Error> {
        let shown = self.visible(id, Axis::Rows, TREE_PAGE, items.len());
        let mut elements = Vec::with_capacity(shown + 1);
        for (i, item) in items[..shown].iter().enumerate() {
            elements.push(ListElement::Entry(SeqEntry {
                index: indexed.then(|| json!(i + 1)),
                value: self.serialize(item)?,
            }));
        }
        if shown < items.len() {
            elements.push(ListElement::More(PaginationMarker::More));
        }
        Ok(elements)
    }

    /// Both axes share one column cursor: the header and every delivered row
    /// are truncated at the same column and carry the marker together.
    fn serialize_table(
        &self,
        id: ObjectId,
        names: &[String],
        types: &[String],
        rows: &[(serde_json::Value, Vec<SampleValue>)],
    ) -> Result<PayloadSlot, serde_json::Error> {
        let shown_cols = self.visible(id, Axis::Columns, TABLE_COL_PAGE, names.len());
        let col_more = shown_cols < names.len();
        let shown_rows = self.visible(id, Axis::Rows, TABLE_ROW_PAGE, rows.len());
        let row_more = shown_rows < rows.len();

        let mut schema_names: Vec<String> = names[..shown_cols].to_vec();
        let mut schema_types: Vec<String> = types[..shown_cols].to_vec();
        if col_more {
            schema_names.push(MORE_SENTINEL.to_string());
            schema_types.push(MORE_SENTINEL.to_string());
        }

        let mut out_rows = Vec::with_capacity(shown_rows + 1);
        for (label, cells) in &rows[..shown_rows] {
            let mut out_cells = Vec::with_capacity(shown_cols + 1);
            for cell in &cells[..shown_cols.min(cells.len())] {
                out_cells.push(TableCell::Slot(self.serialize(cell)?));
            }
            if col_more {
                out_cells.push(TableCell::More(PaginationMarker::More));
            }
            out_rows.push(TableRow::Row(RowBody(label.clone(), out_cells)));
        }
        if row_more {
            out_rows.push(TableRow::More(PaginationMarker::More));
        }

        PayloadSlot::table(&TableBody {
            object_id: id,
            schema: Some(TableSchema {
                names: schema_names,
                types: schema_types,
            }),
            rows: out_rows,
        })
    }
}

fn register_owners(value: &SampleValue, cell: CellId, owners: &mut HashMap<ObjectId, CellId>) {
    if let Some(id) = value.object_id() {
        owners.insert(id, cell);
    }
    match value {
        SampleValue::Seq { items, .. } | SampleValue::Set { items, .. } => {
            for item in items {
                register_owners(item, cell, owners);
            }
        }
        SampleValue::Map { entries, .. } => {
            for (k, v) in entries {
                register_owners(k, cell, owners);
                register_owners(v, cell, owners);
            }
        }
        SampleValue::Record { fields, .. } => {
            for (_, v) in fields {
                register_owners(v, cell, owners);
            }
        }
        SampleValue::Pair { key, value } => {
            register_owners(key, cell, owners);
            register_owners(value, cell, owners);
        }
        SampleValue::Table { rows, .. } => {
            for (_, cells) in rows {
                for c in cells {
                    register_owners(c, cell, owners);
                }
            }
        }
        SampleValue::Div { children, .. } => {
            for c in children {
                register_owners(c, cell, owners);
            }
        }
        SampleValue::Text(_) | SampleValue::Html(_) | SampleValue::Circular => {}
    }
}

fn fibonacci_sample(ids: &mut IdGen) -> SampleValue {
    let mut items = Vec::new();
    let (mut a, mut b) = (0u64, 1u64);
    for _ in 0..30 {
        items.push(SampleValue::text(a.to_string()));
        (a, b) = (b, a + b);
    }
    SampleValue::Seq {
        id: ids.next(),
        label: "Vector{Int64} with 30 elements".to_string(),
        label_short: "Vector{Int64}".to_string(),
        items,
    }
}

fn nested_sample(ids: &mut IdGen) -> SampleValue {
    let scores = SampleValue::Seq {
        id: ids.next(),
        label: "Vector{Float64} with 8 elements".to_string(),
        label_short: "Vector{Float64}".to_string(),
        items: (0..8)
            .map(|i| SampleValue::text(format!("{:.2}", 0.5 + i as f64 * 1.25)))
            .collect(),
    };
    let tags = SampleValue::Set {
        id: ids.next(),
        label: "Set{String} with 7 elements".to_string(),
        label_short: "Set{String}".to_string(),
        items: ["alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta"]
            .into_iter()
            .map(SampleValue::text)
            .collect(),
    };
    let lookup = SampleValue::Map {
        id: ids.next(),
        label: "Dict{String, Int64} with 9 entries".to_string(),
        label_short: "Dict".to_string(),
        entries: (1..=9)
            .map(|i| {
                (
                    SampleValue::text(format!("key_{i}")),
                    SampleValue::text((i * 100).to_string()),
                )
            })
            .collect(),
    };
    let point = SampleValue::Record {
        id: ids.next(),
        label: "NamedTuple{(:x, :y, :z)}".to_string(),
        label_short: "NamedTuple".to_string(),
        named_tuple: true,
        fields: vec![
            ("x".to_string(), SampleValue::text("1.0")),
            ("y".to_string(), SampleValue::text("-2.5")),
            ("z".to_string(), SampleValue::text("0.0")),
        ],
    };
    // A list whose tail refers back to the list itself; the serializer
    // represents the back-edge as a circular marker.
    let cycle = SampleValue::Seq {
        id: ids.next(),
        label: "Vector{Any} with 2 elements".to_string(),
        label_short: "Vector{Any}".to_string(),
        items: vec![SampleValue::text("head"), SampleValue::Circular],
    };
    SampleValue::Record {
        id: ids.next(),
        label: "Experiment".to_string(),
        label_short: "Experiment".to_string(),
        named_tuple: false,
        fields: vec![
            ("name".to_string(), SampleValue::text("trial-42")),
            (
                "entry".to_string(),
                SampleValue::Pair {
                    key: Box::new(SampleValue::text("created")),
                    value: Box::new(SampleValue::text("2026-08-30")),
                },
            ),
            ("scores".to_string(), scores),
            ("tags".to_string(), tags),
            ("lookup".to_string(), lookup),
            ("point".to_string(), point),
            ("cycle".to_string(), cycle),
        ],
    }
}

fn table_sample(ids: &mut IdGen) -> SampleValue {
    let names: Vec<String> = (1..=12).map(|c| format!("sensor_{c}")).collect();
    let types: Vec<String> = (1..=12)
        .map(|c| if c % 3 == 0 { "String" } else { "Float64" }.to_string())
        .collect();
    let rows = (1..=40)
        .map(|r| {
            let cells = (1..=12)
                .map(|c| {
                    if c % 3 == 0 {
                        SampleValue::text(format!("s{r}c{c}"))
                    } else {
                        SampleValue::text(format!("{:.3}", (r * 7 + c) as f64 / 9.0))
                    }
                })
                .collect();
            (json!(r), cells)
        })
        .collect();
    SampleValue::Table {
        id: ids.next(),
        names,
        types,
        rows,
    }
}

fn report_sample(ids: &mut IdGen) -> SampleValue {
    let summary = SampleValue::Seq {
        id: ids.next(),
        label: "Vector{String} with 3 elements".to_string(),
        label_short: "Vector{String}".to_string(),
        items: vec![
            SampleValue::text("all probes responded"),
            SampleValue::text("2 outliers discarded"),
            SampleValue::text("drift within tolerance"),
        ],
    };
    SampleValue::Div {
        classname: Some("report".to_string()),
        children: vec![
            SampleValue::text("Nightly calibration report"),
            summary,
            SampleValue::Html("<em>generated by the demo evaluator</em>".to_string()),
        ],
    }
}
