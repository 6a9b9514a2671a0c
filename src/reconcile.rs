//! Initialization reconciler: converts raw server field records into the
//! normalized in-memory model on template load.
//!
//! Server payloads are messy in known ways: duplicate ids (first occurrence
//! wins, silently), mixed pixel/normalized geometry, partial or missing
//! options bags, and empty partner assignments. Everything is repaired
//! here so the rest of the editor only ever sees well-formed fields. The
//! same normalized shapes seed the persisted snapshot, making the
//! immediately-following change detection a no-op.

#[cfg(test)]
#[path = "reconcile_test.rs"]
mod reconcile_test;

use std::collections::HashSet;

use crate::api::{TemplateInfo, WireField};
use crate::field::{Field, FieldOptions, FieldPosition, drawn_temp_id, server_temp_id};
use crate::geom::{PageSize, Rect};
use crate::partner::PartnerRegistry;

/// Output of reconciling a template payload.
#[derive(Debug)]
pub struct ReconciledTemplate {
    /// Normalized fields in payload order, ready to seed the store.
    pub fields: Vec<Field>,
    /// Partner roster derived from the observed assignments.
    pub partners: PartnerRegistry,
}

/// Convert a template's raw field records into normalized editor fields
/// and derive the partner roster.
#[must_use]
pub fn reconcile_template(template: &TemplateInfo, page: PageSize) -> ReconciledTemplate {
    let mut seen_ids: HashSet<i64> = HashSet::new();
    let mut fields = Vec::with_capacity(template.fields.len());

    for (index, record) in template.fields.iter().enumerate() {
        if let Some(id) = record.id {
            if !seen_ids.insert(id) {
                tracing::warn!(template_id = template.id, field_id = id, "duplicate field id in template payload; keeping first occurrence");
                continue;
            }
        }
        fields.push(reconcile_record(record, page, index));
    }

    let partners = derive_partners(&fields);
    ReconciledTemplate { fields, partners }
}

fn reconcile_record(record: &WireField, page: PageSize, index: usize) -> Field {
    let temp_id = match record.id {
        Some(id) => server_temp_id(id),
        None => drawn_temp_id(),
    };

    let raw = Rect::new(
        record.position.x,
        record.position.y,
        record.position.width,
        record.position.height,
    );
    let (rect, corrected) = raw.to_normalized(page).clamped();
    if corrected {
        tracing::warn!(%temp_id, "stored field geometry out of bounds; clamped to page");
    }

    let display_order = if record.display_order == 0 {
        i64::try_from(index).map_or(i64::MAX, |i| i + 1)
    } else {
        record.display_order
    };

    Field {
        temp_id,
        id: record.id,
        name: record.name.clone(),
        field_type: record.field_type,
        required: record.required,
        position: FieldPosition {
            rect,
            page: record.position.page.max(1),
            default_value: record.position.default_value.clone(),
        },
        options: FieldOptions::from_stored(record.field_type, record.options.as_ref()),
        partner: record.partner.clone(),
        display_order,
    }
}

fn derive_partners(fields: &[Field]) -> PartnerRegistry {
    let registry = PartnerRegistry::from_names(fields.iter().map(|f| f.partner.clone()));
    if registry.is_empty() {
        PartnerRegistry::fallback()
    } else {
        registry
    }
}
