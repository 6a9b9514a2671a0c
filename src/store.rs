//! Field store: the live field array, the deleted-ids set, and the
//! last-known-persisted snapshot.
//!
//! The live array is the single rendering source of truth. The snapshot is
//! a change-detection input only — it maps server ids to the field shape
//! last confirmed by the server, and is rebuilt after every successful
//! save. Deleting a persisted field moves its server id into the deleted
//! set for the next save's delete phase; the whole store is discarded on
//! navigation away and re-seeded from the server on every fresh load.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::{HashMap, HashSet};

use crate::field::{Field, FieldId, FieldPatch, copy_temp_id, server_temp_id};

/// In-memory store for the editor session's fields.
#[derive(Debug, Default)]
pub struct FieldStore {
    fields: Vec<Field>,
    deleted_ids: HashSet<FieldId>,
    snapshot: HashMap<FieldId, Field>,
}

impl FieldStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the store's contents with reconciled template fields. The
    /// snapshot is seeded from the same normalized shapes and the deleted
    /// set is reset.
    pub fn seed(&mut self, fields: Vec<Field>) {
        self.snapshot = fields
            .iter()
            .filter_map(|f| f.id.map(|id| (id, f.clone())))
            .collect();
        self.fields = fields;
        self.deleted_ids.clear();
    }

    /// Append a field to the live array.
    pub fn insert(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Look up a field by temp id.
    #[must_use]
    pub fn get(&self, temp_id: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.temp_id == temp_id)
    }

    /// All fields in array order, including any pending deletion.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Fields visible to the editor: array order, minus anything whose
    /// server id is already marked deleted.
    #[must_use]
    pub fn active(&self) -> Vec<&Field> {
        self.fields
            .iter()
            .filter(|f| f.id.is_none_or(|id| !self.deleted_ids.contains(&id)))
            .collect()
    }

    /// Apply a sparse update to a field. Returns false if the temp id is
    /// unknown.
    pub fn update(&mut self, temp_id: &str, patch: &FieldPatch) -> bool {
        let Some(field) = self.fields.iter_mut().find(|f| f.temp_id == temp_id) else {
            return false;
        };
        if let Some(x) = patch.x {
            field.position.rect.x = x;
        }
        if let Some(y) = patch.y {
            field.position.rect.y = y;
        }
        if let Some(width) = patch.width {
            field.position.rect.width = width;
        }
        if let Some(height) = patch.height {
            field.position.rect.height = height;
        }
        if let Some(page) = patch.page {
            field.position.page = page;
        }
        if let Some(ref name) = patch.name {
            field.name = name.clone();
        }
        if let Some(required) = patch.required {
            field.required = required;
        }
        if let Some(field_type) = patch.field_type {
            if field_type != field.field_type {
                field.field_type = field_type;
                // Changing type invalidates the old payload shape.
                field.options = field_type.default_options();
            }
        }
        if let Some(ref options) = patch.options {
            field.options = Some(options.clone());
        }
        if let Some(ref partner) = patch.partner {
            field.partner = partner.clone();
        }
        if let Some(ref default_value) = patch.default_value {
            field.position.default_value = Some(default_value.clone());
        }
        true
    }

    /// Delete a field. A persisted field's server id moves into the
    /// deleted set so the next save flushes the deletion; an unsaved field
    /// just disappears. Returns the removed field, if any.
    pub fn remove(&mut self, temp_id: &str) -> Option<Field> {
        let index = self.fields.iter().position(|f| f.temp_id == temp_id)?;
        let field = self.fields.remove(index);
        if let Some(id) = field.id {
            self.deleted_ids.insert(id);
        }
        Some(field)
    }

    /// Duplicate a field: fresh temp id, no server id, copy-unique name, a
    /// small position nudge kept on the page, and the next display order.
    /// Returns the copy's temp id.
    pub fn duplicate(&mut self, temp_id: &str) -> Option<String> {
        let original = self.get(temp_id)?.clone();
        let mut copy = original;
        copy.temp_id = copy_temp_id();
        copy.id = None;
        copy.name = self.unique_copy_name(&copy.name);
        copy.display_order = self.next_display_order();
        copy.position.rect.x += 0.01;
        copy.position.rect.y += 0.01;
        let (nudged, _) = copy.position.rect.clamped();
        copy.position.rect = nudged;
        let new_temp_id = copy.temp_id.clone();
        self.fields.push(copy);
        Some(new_temp_id)
    }

    /// Display order for the next created field.
    #[must_use]
    pub fn next_display_order(&self) -> i64 {
        self.fields.iter().map(|f| f.display_order).max().unwrap_or(0) + 1
    }

    /// Rewrite every field referencing `old` to `new`. Returns how many
    /// fields changed.
    pub fn rename_partner(&mut self, old: &str, new: &str) -> usize {
        let mut renamed = 0;
        for field in &mut self.fields {
            if field.partner == old {
                field.partner = new.to_owned();
                renamed += 1;
            }
        }
        renamed
    }

    /// Remove every field referencing a partner, registering persisted ids
    /// for deletion. Returns the removed fields.
    pub fn remove_partner_fields(&mut self, partner: &str) -> Vec<Field> {
        let mut removed = Vec::new();
        let mut index = 0;
        while index < self.fields.len() {
            if self.fields[index].partner == partner {
                let field = self.fields.remove(index);
                if let Some(id) = field.id {
                    self.deleted_ids.insert(id);
                }
                removed.push(field);
            } else {
                index += 1;
            }
        }
        removed
    }

    /// Assign `default` to every field whose partner is empty or not in
    /// `known`. Returns the temp ids that were reassigned.
    pub fn assign_orphans(&mut self, known: &[String], default: &str) -> Vec<String> {
        let mut reassigned = Vec::new();
        for field in &mut self.fields {
            let orphaned = field.partner.trim().is_empty()
                || !known.iter().any(|name| *name == field.partner);
            if orphaned {
                field.partner = default.to_owned();
                reassigned.push(field.temp_id.clone());
            }
        }
        reassigned
    }

    /// Reassign a created field to its server identity: sets `id` and
    /// rewrites the temp id to the persisted form. Returns false if the
    /// temp id is unknown.
    pub fn assign_server_id(&mut self, temp_id: &str, id: FieldId) -> bool {
        let Some(field) = self.fields.iter_mut().find(|f| f.temp_id == temp_id) else {
            return false;
        };
        field.id = Some(id);
        field.temp_id = server_temp_id(id);
        true
    }

    /// Last-known-persisted shape for a server id.
    #[must_use]
    pub fn snapshot_of(&self, id: FieldId) -> Option<&Field> {
        self.snapshot.get(&id)
    }

    /// Server ids pending deletion, in unspecified order.
    #[must_use]
    pub fn deleted_ids(&self) -> Vec<FieldId> {
        self.deleted_ids.iter().copied().collect()
    }

    #[must_use]
    pub fn has_deleted(&self, id: FieldId) -> bool {
        self.deleted_ids.contains(&id)
    }

    /// Post-save cleanup: drop any live field whose id is still marked
    /// deleted, clear the deleted set, and rebuild the snapshot from the
    /// reconciled array.
    pub fn finish_save(&mut self) {
        let deleted = std::mem::take(&mut self.deleted_ids);
        self.fields
            .retain(|f| f.id.is_none_or(|id| !deleted.contains(&id)));
        self.snapshot = self
            .fields
            .iter()
            .filter_map(|f| f.id.map(|id| (id, f.clone())))
            .collect();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn unique_copy_name(&self, base: &str) -> String {
        let taken: HashSet<&str> = self.fields.iter().map(|f| f.name.as_str()).collect();
        let first = format!("{base} copy");
        if !taken.contains(first.as_str()) {
            return first;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{base} copy {n}");
            if !taken.contains(candidate.as_str()) {
                return candidate;
            }
            n += 1;
        }
    }
}
