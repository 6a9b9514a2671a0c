//! Field model: the signable-field entity, its closed type set, and the
//! polymorphic per-type options payload.
//!
//! A field lives in memory under a process-local `temp_id` and gains a
//! server-assigned `id` once persisted. Geometry is always normalized here;
//! pixel values exist only on the wire (see [`crate::api`]). Stored options
//! arrive as an open-ended JSON bag and are parsed leniently against a
//! single type-keyed defaults table, so each field type has exactly one
//! source of truth for its initial shape.

#[cfg(test)]
#[path = "field_test.rs"]
mod field_test;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::consts::DEFAULT_CELL_COLUMNS;
use crate::geom::Rect;

/// Server-assigned persistent field identity.
pub type FieldId = i64;

/// The closed set of signable field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Free-text entry.
    Text,
    /// Drawn or typed signature.
    Signature,
    /// Initials stamp.
    Initials,
    /// Date picker.
    Date,
    /// Single checkbox.
    Checkbox,
    /// Numeric entry.
    Number,
    /// Single choice among options.
    Radio,
    /// Multiple choice among options.
    Multiple,
    /// Dropdown selection.
    Select,
    /// Table subdivided into columns.
    Cells,
    /// Image upload.
    Image,
    /// File attachment.
    File,
}

impl FieldType {
    /// Whether this type carries an option list (radio/multiple/select).
    #[must_use]
    pub fn is_choice(self) -> bool {
        matches!(self, Self::Radio | Self::Multiple | Self::Select)
    }

    /// Whether this type is the column-subdivided table type.
    #[must_use]
    pub fn is_table(self) -> bool {
        matches!(self, Self::Cells)
    }

    /// Default options for a freshly created field of this type. Simple
    /// types have none; radio starts with two placeholder options,
    /// multiple/select with three, cells with three uniform columns.
    #[must_use]
    pub fn default_options(self) -> Option<FieldOptions> {
        match self {
            Self::Radio => Some(FieldOptions::choice_placeholders(2)),
            Self::Multiple | Self::Select => Some(FieldOptions::choice_placeholders(3)),
            Self::Cells => Some(FieldOptions::uniform_table(DEFAULT_CELL_COLUMNS)),
            _ => None,
        }
    }
}

/// Per-type options payload. On the wire, choice types carry
/// `{"options": [...], "defaultValue": ...}` and cells carry
/// `{"columns": N, "widths": [...]}`.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOptions {
    /// Options for radio/multiple/select fields.
    Choice {
        /// Presented choices, in display order.
        options: Vec<String>,
        /// Pre-selected choice, if any.
        default_value: Option<String>,
    },
    /// Column layout for cells fields.
    Table {
        /// Number of columns.
        columns: u32,
        /// Relative column widths, one per column, summing to 1.
        widths: Vec<f64>,
    },
}

impl FieldOptions {
    /// A choice payload with `count` numbered placeholder options and no
    /// default value.
    #[must_use]
    pub fn choice_placeholders(count: usize) -> Self {
        Self::Choice {
            options: (1..=count).map(|n| format!("Option {n}")).collect(),
            default_value: None,
        }
    }

    /// A table payload with `columns` equal-width columns.
    #[must_use]
    pub fn uniform_table(columns: u32) -> Self {
        let columns = columns.max(1);
        Self::Table {
            columns,
            widths: vec![1.0 / f64::from(columns); columns as usize],
        }
    }

    /// Parse a stored options bag for a field of the given type, merging
    /// partial or corrupt payloads with the type's defaults. Simple types
    /// always yield `None`; choice and table types always yield a complete
    /// payload.
    #[must_use]
    pub fn from_stored(field_type: FieldType, stored: Option<&Value>) -> Option<Self> {
        if field_type.is_choice() {
            let defaults = field_type.default_options();
            let Some(bag) = stored else {
                return defaults;
            };
            let options = bag
                .get("options")
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_owned)
                        .collect::<Vec<_>>()
                })
                .filter(|opts| !opts.is_empty());
            let default_value = bag
                .get("defaultValue")
                .and_then(Value::as_str)
                .map(str::to_owned);
            return match options {
                Some(options) => Some(Self::Choice { options, default_value }),
                None => defaults,
            };
        }
        if field_type.is_table() {
            let columns = match stored.and_then(|bag| bag.get("columns")).and_then(Value::as_u64) {
                Some(n) => u32::try_from(n).map_or(DEFAULT_CELL_COLUMNS, |c| c.max(1)),
                None => DEFAULT_CELL_COLUMNS,
            };
            let widths = stored
                .and_then(|bag| bag.get("widths"))
                .and_then(Value::as_array)
                .map(|items| items.iter().filter_map(Value::as_f64).collect::<Vec<_>>());
            return match widths {
                Some(widths) if widths.len() == columns as usize => {
                    Some(Self::Table { columns, widths })
                }
                _ => Some(Self::uniform_table(columns)),
            };
        }
        None
    }

    /// Serialize to the wire bag shape.
    #[must_use]
    pub fn to_wire(&self) -> Value {
        match self {
            Self::Choice { options, default_value } => {
                let mut bag = json!({ "options": options });
                if let Some(default) = default_value {
                    bag["defaultValue"] = json!(default);
                }
                bag
            }
            Self::Table { columns, widths } => json!({ "columns": columns, "widths": widths }),
        }
    }
}

/// Field geometry plus page placement.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldPosition {
    /// Normalized [0,1] page-fraction rectangle.
    pub rect: Rect,
    /// 1-based page number.
    pub page: u32,
    /// Pre-filled value shown before the signer edits the field.
    pub default_value: Option<String>,
}

/// A signable field as held in the editor session.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Process-local identity, stable for the in-memory session. Never
    /// persisted.
    pub temp_id: String,
    /// Server-assigned identity, present once persisted.
    pub id: Option<FieldId>,
    /// Display label.
    pub name: String,
    /// Field type tag.
    pub field_type: FieldType,
    /// Whether the signer must complete this field.
    pub required: bool,
    /// Normalized geometry and page placement.
    pub position: FieldPosition,
    /// Per-type options payload; absent for simple types.
    pub options: Option<FieldOptions>,
    /// Name of the signing party this field belongs to.
    pub partner: String,
    /// Stable ordering used to correlate created records with
    /// server-returned identities.
    pub display_order: i64,
}

/// Sparse merge-update for a field. Only present values are applied.
#[derive(Debug, Clone, Default)]
pub struct FieldPatch {
    /// New normalized x, if being updated.
    pub x: Option<f64>,
    /// New normalized y, if being updated.
    pub y: Option<f64>,
    /// New normalized width, if being updated.
    pub width: Option<f64>,
    /// New normalized height, if being updated.
    pub height: Option<f64>,
    /// New page number, if being updated.
    pub page: Option<u32>,
    /// New display label, if being updated.
    pub name: Option<String>,
    /// New required flag, if being updated.
    pub required: Option<bool>,
    /// New field type, if being updated.
    pub field_type: Option<FieldType>,
    /// New options payload, if being updated.
    pub options: Option<FieldOptions>,
    /// New owning partner, if being updated.
    pub partner: Option<String>,
    /// New pre-filled value, if being updated.
    pub default_value: Option<String>,
}

impl FieldPatch {
    /// A patch that moves a field to a new normalized origin.
    #[must_use]
    pub fn moved_to(x: f64, y: f64) -> Self {
        Self { x: Some(x), y: Some(y), ..Self::default() }
    }

    /// A patch that replaces the full normalized rectangle.
    #[must_use]
    pub fn resized_to(rect: Rect) -> Self {
        Self {
            x: Some(rect.x),
            y: Some(rect.y),
            width: Some(rect.width),
            height: Some(rect.height),
            ..Self::default()
        }
    }
}

/// Temp id for a field reconciled from a persisted server record.
#[must_use]
pub fn server_temp_id(id: FieldId) -> String {
    format!("field-{id}")
}

/// Temp id for a field created by a draw gesture.
#[must_use]
pub fn drawn_temp_id() -> String {
    format!("new-{}", now_millis())
}

/// Temp id for a duplicated field. Carries a random suffix so copies made
/// within the same millisecond stay distinct.
#[must_use]
pub fn copy_temp_id() -> String {
    let suffix = rand::random::<u32>() % 1_000_000;
    format!("field-{}-{suffix}", now_millis())
}

fn now_millis() -> i64 {
    let nanos = time::OffsetDateTime::now_utc().unix_timestamp_nanos();
    i64::try_from(nanos / 1_000_000).unwrap_or(i64::MAX)
}
