//! Save reconciler: diffs the live field set against the persisted
//! snapshot and flushes the difference to the template API.
//!
//! The save runs in three phases — create, update, delete — each fanned
//! out concurrently and awaited as a barrier before the next starts,
//! because created identities must exist before local reconciliation runs.
//! A failing phase aborts the save without rolling back local edits;
//! local and server state stay diverged until the next full reload. That
//! non-atomic boundary is accepted, not guaranteed against.
//!
//! Identity correlation after a bulk create relies on the server
//! preserving submission order. That assumption is isolated behind
//! [`CorrelateCreated`] so it can be swapped for token-based correlation
//! without touching the save flow.

#[cfg(test)]
#[path = "save_test.rs"]
mod save_test;

use futures_util::future::try_join_all;
use thiserror::Error;

use crate::api::{ApiError, TemplateApi, TemplateId, WireField, WirePosition};
use crate::consts::POSITION_TOLERANCE;
use crate::engine::EditorCore;
use crate::field::{Field, FieldId};
use crate::geom::PageSize;
use crate::store::FieldStore;

/// Error from a save attempt.
#[derive(Debug, Error)]
pub enum SaveError {
    /// The partner roster is empty; there is nobody to assign fields to.
    #[error("no signing parties defined")]
    NoPartners,
    /// A roster entry has no fields referencing it.
    #[error("partner \"{0}\" has no fields")]
    PartnerHasNoFields(String),
    /// A phase's API fan-out failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// What a successful save flushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveReport {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
}

/// The partitioned field set for one save pass.
#[derive(Debug, Default)]
pub struct SavePlan {
    /// Fields with no server id, sorted by (display order, name) — the
    /// submission order the correlator later relies on.
    pub to_create: Vec<Field>,
    /// Persisted fields whose current shape differs from the snapshot.
    pub to_update: Vec<Field>,
    /// Server ids pending deletion, ascending.
    pub to_delete: Vec<FieldId>,
    /// Temp ids needing no network call.
    pub unchanged: Vec<String>,
}

/// Partition the active field set against the persisted snapshot.
///
/// Every active field lands in exactly one of `to_create`, `to_update`,
/// or `unchanged`; `to_delete` comes from the store's deleted-ids set.
#[must_use]
pub fn partition(store: &FieldStore) -> SavePlan {
    let mut plan = SavePlan::default();
    for field in store.active() {
        match field.id {
            None => plan.to_create.push(field.clone()),
            Some(id) => {
                let changed = store
                    .snapshot_of(id)
                    .is_none_or(|snapshot| field_changed(field, snapshot));
                if changed {
                    plan.to_update.push(field.clone());
                } else {
                    plan.unchanged.push(field.temp_id.clone());
                }
            }
        }
    }
    plan.to_create
        .sort_by(|a, b| a.display_order.cmp(&b.display_order).then_with(|| a.name.cmp(&b.name)));
    plan.to_delete = store.deleted_ids();
    plan.to_delete.sort_unstable();
    plan
}

/// Whether a field's current shape differs from its persisted snapshot.
///
/// Position deltas below the per-axis tolerance are render noise and do
/// not count; everything else compares exactly.
#[must_use]
pub fn field_changed(current: &Field, snapshot: &Field) -> bool {
    if current.name != snapshot.name
        || current.required != snapshot.required
        || current.partner != snapshot.partner
        || current.options != snapshot.options
        || current.position.page != snapshot.position.page
        || current.position.default_value != snapshot.position.default_value
    {
        return true;
    }
    let a = current.position.rect;
    let b = snapshot.position.rect;
    (a.x - b.x).abs() >= POSITION_TOLERANCE
        || (a.y - b.y).abs() >= POSITION_TOLERANCE
        || (a.width - b.width).abs() >= POSITION_TOLERANCE
        || (a.height - b.height).abs() >= POSITION_TOLERANCE
}

/// Convert a field to its wire shape, pixel-valued for the given page.
#[must_use]
pub fn to_wire(field: &Field, page: PageSize) -> WireField {
    let px = field.position.rect.to_pixels(page);
    WireField {
        id: field.id,
        name: field.name.clone(),
        field_type: field.field_type,
        required: field.required,
        position: WirePosition {
            x: px.x,
            y: px.y,
            width: px.width,
            height: px.height,
            page: field.position.page,
            default_value: field.position.default_value.clone(),
        },
        options: field.options.as_ref().map(crate::field::FieldOptions::to_wire),
        partner: field.partner.clone(),
        display_order: field.display_order,
    }
}

/// Matches created server records back to the submitted fields.
pub trait CorrelateCreated {
    /// Pair each submitted field's temp id with the server id it was
    /// persisted under. `submitted` is in submission order.
    fn correlate(&self, submitted: &[Field], returned: &[WireField]) -> Vec<(String, FieldId)>;
}

/// Positional correlation: the server is expected to return created
/// records in submission order, verified by name and type parity.
pub struct OrderCorrelator;

impl CorrelateCreated for OrderCorrelator {
    fn correlate(&self, submitted: &[Field], returned: &[WireField]) -> Vec<(String, FieldId)> {
        let mut pairs = Vec::with_capacity(submitted.len());
        for (field, record) in submitted.iter().zip(returned) {
            let Some(id) = record.id else {
                tracing::warn!(temp_id = %field.temp_id, "created record came back without an id");
                continue;
            };
            if record.name != field.name || record.field_type != field.field_type {
                tracing::warn!(
                    temp_id = %field.temp_id,
                    returned_name = %record.name,
                    "created record does not match submission order; skipping reassignment"
                );
                continue;
            }
            pairs.push((field.temp_id.clone(), id));
        }
        pairs
    }
}

/// Flush the session's pending changes with the default correlator.
///
/// # Errors
///
/// Returns [`SaveError`] on a validation failure or when any phase's API
/// fan-out fails. Local edits are not rolled back on failure.
pub async fn save_fields(
    core: &mut EditorCore,
    api: &dyn TemplateApi,
    template_id: TemplateId,
) -> Result<SaveReport, SaveError> {
    save_fields_with(core, api, template_id, &OrderCorrelator).await
}

/// Flush the session's pending changes, reconciling created identities
/// through the supplied correlator.
///
/// # Errors
///
/// Returns [`SaveError`] on a validation failure or when any phase's API
/// fan-out fails.
pub async fn save_fields_with(
    core: &mut EditorCore,
    api: &dyn TemplateApi,
    template_id: TemplateId,
    correlator: &dyn CorrelateCreated,
) -> Result<SaveReport, SaveError> {
    if core.partners.is_empty() {
        return Err(SaveError::NoPartners);
    }
    core.auto_assign_orphans();
    for partner in core.partners.names() {
        let referenced = core.store.active().iter().any(|f| f.partner == *partner);
        if !referenced {
            return Err(SaveError::PartnerHasNoFields(partner.clone()));
        }
    }

    let plan = partition(&core.store);
    let page = core.effective_page_size();

    // Phase 1: creates.
    let create_payloads: Vec<WireField> =
        plan.to_create.iter().map(|f| to_wire(f, page)).collect();
    let created: Vec<WireField> = try_join_all(
        create_payloads
            .iter()
            .map(|payload| api.create_field(template_id, payload)),
    )
    .await?;

    // Phase 2: updates.
    let update_payloads: Vec<(FieldId, WireField)> = plan
        .to_update
        .iter()
        .filter_map(|f| f.id.map(|id| (id, to_wire(f, page))))
        .collect();
    try_join_all(
        update_payloads
            .iter()
            .map(|(id, payload)| api.update_field(template_id, *id, payload)),
    )
    .await?;

    // Phase 3: deletes.
    try_join_all(
        plan.to_delete
            .iter()
            .map(|id| api.delete_field(template_id, *id)),
    )
    .await?;

    // Reconcile created identities into the store, then reset bookkeeping.
    for (temp_id, id) in correlator.correlate(&plan.to_create, &created) {
        core.store.assign_server_id(&temp_id, id);
    }
    core.store.finish_save();

    let report = SaveReport {
        created: created.len(),
        updated: update_payloads.len(),
        deleted: plan.to_delete.len(),
    };
    tracing::info!(
        template_id,
        created = report.created,
        updated = report.updated,
        deleted = report.deleted,
        "template fields saved"
    );
    Ok(report)
}
