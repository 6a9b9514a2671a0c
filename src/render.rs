//! Presentation layer: per-field chrome view-models for the host UI.
//!
//! This module receives read-only views of session state and produces
//! pixel-space descriptions of what to draw — it never mutates application
//! state. The host renders each [`FieldChrome`] as an overlay box (partner
//! color, label, manipulation handles) plus type-specific detail: an
//! options editor for choice fields, a column splitter bar for cells
//! fields. Pixel geometry is computed fresh from the live page size on
//! every call.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use crate::engine::{EditorCore, type_label};
use crate::field::{Field, FieldOptions};
use crate::geom::Rect;
use crate::input::{GestureState, ResizeAnchor};

/// Index of the create-columns handle on a cells field's splitter bar —
/// the only splitter handle the editor models.
pub const CREATE_COLUMNS_HANDLE: i32 = -1;

const HANDLE_ANCHORS: [ResizeAnchor; 8] = [
    ResizeAnchor::N,
    ResizeAnchor::Ne,
    ResizeAnchor::E,
    ResizeAnchor::Se,
    ResizeAnchor::S,
    ResizeAnchor::Sw,
    ResizeAnchor::W,
    ResizeAnchor::Nw,
];

/// Type-specific chrome for one field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldDetail {
    /// No extra chrome beyond the box.
    Plain,
    /// Options editor model for radio/multiple/select fields.
    Choice {
        options: Vec<String>,
        default_value: Option<String>,
    },
    /// Column splitter model for cells fields: interior edge offsets from
    /// the field's left border, in pixels.
    Table {
        columns: u32,
        edges_px: Vec<f64>,
    },
}

/// Everything the host needs to draw one field on the overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChrome {
    pub temp_id: String,
    /// Display label.
    pub name: String,
    /// Human label for the field's type.
    pub type_label: &'static str,
    /// Pixel rectangle for the current page render.
    pub rect_px: Rect,
    /// Partner color for the box border and tag.
    pub color: &'static str,
    pub partner: String,
    pub required: bool,
    pub selected: bool,
    /// Resize handles to draw; empty unless selected and editable.
    pub handles: Vec<ResizeAnchor>,
    pub detail: FieldDetail,
}

/// Chrome for every active field on a page, in display order.
#[must_use]
pub fn page_chrome(core: &EditorCore, page: u32) -> Vec<FieldChrome> {
    let page_size = core.effective_page_size();
    let can_edit = core.ui.permissions.can_edit;
    let mut fields: Vec<&Field> = core
        .store
        .active()
        .into_iter()
        .filter(|f| f.position.page == page)
        .collect();
    fields.sort_by_key(|f| f.display_order);

    fields
        .into_iter()
        .map(|field| {
            let rect_px = field.position.rect.to_pixels(page_size);
            let selected = core.selection() == Some(field.temp_id.as_str());
            let handles = if selected && can_edit {
                HANDLE_ANCHORS.to_vec()
            } else {
                Vec::new()
            };
            FieldChrome {
                temp_id: field.temp_id.clone(),
                name: field.name.clone(),
                type_label: type_label(field.field_type),
                rect_px,
                color: core.partners.color_for(&field.partner),
                partner: field.partner.clone(),
                required: field.required,
                selected,
                handles,
                detail: field_detail(field, rect_px.width),
            }
        })
        .collect()
}

/// The live draw-preview rectangle in pixels, while a draw gesture is in
/// progress.
#[must_use]
pub fn draw_preview(core: &EditorCore) -> Option<Rect> {
    let GestureState::Drawing { start, current } = &core.gesture else {
        return None;
    };
    Some(Rect::new(
        start.x.min(current.x),
        start.y.min(current.y),
        (current.x - start.x).abs(),
        (current.y - start.y).abs(),
    ))
}

fn field_detail(field: &Field, field_width_px: f64) -> FieldDetail {
    match &field.options {
        Some(FieldOptions::Choice { options, default_value }) => FieldDetail::Choice {
            options: options.clone(),
            default_value: default_value.clone(),
        },
        Some(FieldOptions::Table { columns, widths }) => FieldDetail::Table {
            columns: *columns,
            edges_px: column_edges_px(widths, field_width_px),
        },
        None => FieldDetail::Plain,
    }
}

/// Interior column edges as pixel offsets from the field's left border.
/// A field with N columns has N-1 interior edges.
fn column_edges_px(widths: &[f64], field_width_px: f64) -> Vec<f64> {
    let mut edges = Vec::with_capacity(widths.len().saturating_sub(1));
    let mut cumulative = 0.0;
    for width in widths.iter().take(widths.len().saturating_sub(1)) {
        cumulative += width;
        edges.push(cumulative * field_width_px);
    }
    edges
}
