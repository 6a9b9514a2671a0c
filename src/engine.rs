//! Editor engine: owns the session state and interprets pointer input.
//!
//! `EditorCore` is the single explicit session-state object — field store,
//! partner roster, UI state, and the active gesture — with all mutations
//! expressed as methods over that state, so the gesture state machine is
//! unit-testable without a rendering surface. Input handlers return
//! [`Action`]s for the host to process (re-render, surface a warning,
//! refresh an inspector); the host persists nothing from them — saving is
//! an explicit pass over the store (see [`crate::save`]).
//!
//! Every pixel-to-normalized conversion uses the live page dimensions
//! pushed in by the PDF display collaborator; pixel geometry is
//! view-dependent and never cached.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use thiserror::Error;

use crate::api::{TemplateId, TemplateInfo};
use crate::consts::{MIN_COLUMN_WIDTH_PX, MIN_DRAW_HEIGHT_PX, MIN_DRAW_WIDTH_PX, MIN_FIELD_SIZE};
use crate::field::{Field, FieldOptions, FieldPatch, FieldPosition, FieldType, drawn_temp_id};
use crate::geom::{PageSize, Point, Rect};
use crate::input::{GestureState, Modifiers, Permissions, ResizeAnchor, Tool, UiState};
use crate::partner::{PartnerError, PartnerRegistry};
use crate::reconcile::reconcile_template;
use crate::store::FieldStore;

/// User-facing warnings surfaced as transient notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EditorWarning {
    /// A draw gesture was attempted with an empty partner roster.
    #[error("add a signing party before placing fields")]
    NoPartners,
}

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone)]
pub enum Action {
    /// A new field was appended to the store.
    FieldCreated(Field),
    /// An existing field was mutated.
    FieldUpdated {
        temp_id: String,
        patch: FieldPatch,
    },
    /// A field was removed from the store.
    FieldDeleted {
        temp_id: String,
    },
    /// The selection moved.
    SelectionChanged(Option<String>),
    /// The active tool changed.
    ToolChanged(Tool),
    /// Something to show the user.
    Warning(EditorWarning),
    /// Local state changed; redraw the overlay.
    RenderNeeded,
}

/// What a cascading partner removal changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartnerRemoval {
    /// The removed partner.
    pub partner: String,
    /// Temp ids of the fields deleted by the cascade.
    pub removed_temp_ids: Vec<String>,
    /// The current selection after removal, if any partner remains.
    pub current: Option<String>,
}

/// The editor session: all state, all transitions.
#[derive(Debug, Default)]
pub struct EditorCore {
    pub store: FieldStore,
    pub partners: PartnerRegistry,
    pub ui: UiState,
    pub gesture: GestureState,
    page_size: Option<PageSize>,
    seed_key: Option<(TemplateId, u64, u64)>,
}

impl EditorCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Template lifecycle ---

    /// Seed the session from a template payload. Keyed on the template
    /// identity and current page geometry: re-invoking with an unchanged
    /// key is a no-op, so in-progress edits survive redundant load
    /// callbacks.
    pub fn load_template(&mut self, template: &TemplateInfo) {
        let page = self.effective_page_size();
        let key = (template.id, page.width.to_bits(), page.height.to_bits());
        if self.seed_key == Some(key) {
            return;
        }
        let reconciled = reconcile_template(template, page);
        self.store.seed(reconciled.fields);
        self.partners = reconciled.partners;
        self.ui.selected = None;
        self.ui.tool = Tool::Select;
        self.gesture = GestureState::Idle;
        self.seed_key = Some(key);
    }

    /// Record the rendered page's pixel dimensions. Called by the PDF
    /// display collaborator on load, container resize, and page
    /// navigation.
    pub fn set_page_size(&mut self, width: f64, height: f64) {
        if width > 0.0 && height > 0.0 {
            self.page_size = Some(PageSize::new(width, height));
        }
    }

    /// Live page dimensions, or the wire fallback if no page has rendered.
    #[must_use]
    pub fn effective_page_size(&self) -> PageSize {
        self.page_size.unwrap_or_default()
    }

    /// Switch the page that draw gestures and chrome apply to.
    pub fn set_page(&mut self, page: u32) {
        self.ui.current_page = page.max(1);
    }

    // --- Tool / selection / permissions ---

    /// Set the active tool. Read-only sessions are pinned to select.
    pub fn set_tool(&mut self, tool: Tool) {
        if !self.ui.permissions.can_edit {
            self.ui.tool = Tool::Select;
            return;
        }
        if let Tool::Draw(field_type) = tool {
            self.ui.last_field_type = field_type;
        }
        self.ui.tool = tool;
    }

    /// Apply the role collaborator's permissions.
    pub fn set_permissions(&mut self, permissions: Permissions) {
        self.ui.permissions = permissions;
        if !permissions.can_edit {
            self.ui.tool = Tool::Select;
            self.gesture = GestureState::Idle;
        }
    }

    /// Select a field (or clear the selection with `None`).
    pub fn select_field(&mut self, temp_id: Option<&str>) -> Vec<Action> {
        let next = temp_id
            .filter(|id| self.store.get(id).is_some())
            .map(str::to_owned);
        if next == self.ui.selected {
            return Vec::new();
        }
        self.ui.selected = next.clone();
        vec![Action::SelectionChanged(next)]
    }

    #[must_use]
    pub fn selection(&self) -> Option<&str> {
        self.ui.selected.as_deref()
    }

    /// The partner newly drawn fields are assigned to.
    #[must_use]
    pub fn current_partner(&self) -> Option<&str> {
        self.partners.current()
    }

    /// Active fields, for the hosting page's pre-save checks and field
    /// list panel.
    #[must_use]
    pub fn fields(&self) -> Vec<&Field> {
        self.store.active()
    }

    // --- Pointer input: overlay surface ---

    /// Pointer-down on the empty overlay surface.
    pub fn on_pointer_down(&mut self, at: Point, modifiers: Modifiers) -> Vec<Action> {
        if !self.ui.permissions.can_edit || self.gesture.is_active() {
            return Vec::new();
        }
        if self.ui.tool.draws(modifiers) {
            if self.partners.is_empty() {
                return vec![Action::Warning(EditorWarning::NoPartners)];
            }
            self.gesture = GestureState::Drawing { start: at, current: at };
            return vec![Action::RenderNeeded];
        }
        // Select tool on empty surface clears the selection.
        self.select_field(None)
    }

    /// Pointer movement. Pure arithmetic over the live page size — runs at
    /// pointer-event frequency.
    pub fn on_pointer_move(&mut self, at: Point) -> Vec<Action> {
        match self.gesture.clone() {
            GestureState::Idle => Vec::new(),
            GestureState::Drawing { start, .. } => {
                self.gesture = GestureState::Drawing { start, current: at };
                vec![Action::RenderNeeded]
            }
            GestureState::DraggingField { temp_id, grab_offset } => {
                self.move_field_to(&temp_id, at, grab_offset)
            }
            GestureState::ResizingField { temp_id, anchor, start, orig } => {
                self.resize_field_to(&temp_id, anchor, start, orig, at)
            }
            GestureState::ColumnResizing { temp_id } => self.resize_columns_to(&temp_id, at),
        }
    }

    /// Pointer release: finalize the active gesture.
    pub fn on_pointer_up(&mut self, at: Point) -> Vec<Action> {
        match std::mem::take(&mut self.gesture) {
            GestureState::Idle => Vec::new(),
            GestureState::Drawing { start, .. } => self.finish_draw(start, at),
            GestureState::DraggingField { temp_id, .. } => {
                self.finish_geometry_gesture(&temp_id, false)
            }
            GestureState::ResizingField { temp_id, .. } => {
                self.finish_geometry_gesture(&temp_id, true)
            }
            GestureState::ColumnResizing { .. } => vec![Action::RenderNeeded],
        }
    }

    // --- Pointer input: manipulation handles ---

    /// Start moving a field from its body handle. Always available,
    /// independent of the active tool.
    pub fn begin_field_drag(&mut self, temp_id: &str, at: Point) -> Vec<Action> {
        if !self.ui.permissions.can_edit || self.gesture.is_active() {
            return Vec::new();
        }
        let page = self.effective_page_size();
        let Some(field) = self.store.get(temp_id) else {
            return Vec::new();
        };
        let origin_px = field.position.rect.to_pixels(page);
        self.gesture = GestureState::DraggingField {
            temp_id: temp_id.to_owned(),
            grab_offset: Point::new(at.x - origin_px.x, at.y - origin_px.y),
        };
        self.select_field(Some(temp_id))
    }

    /// Start resizing a field from one of its corner/edge handles.
    pub fn begin_field_resize(&mut self, temp_id: &str, anchor: ResizeAnchor, at: Point) -> Vec<Action> {
        if !self.ui.permissions.can_edit || self.gesture.is_active() {
            return Vec::new();
        }
        let Some(field) = self.store.get(temp_id) else {
            return Vec::new();
        };
        self.gesture = GestureState::ResizingField {
            temp_id: temp_id.to_owned(),
            anchor,
            start: at,
            orig: field.position.rect,
        };
        self.select_field(Some(temp_id))
    }

    /// Start dragging the create-columns handle on a cells field.
    pub fn begin_column_resize(&mut self, temp_id: &str) -> Vec<Action> {
        if !self.ui.permissions.can_edit || self.gesture.is_active() {
            return Vec::new();
        }
        let is_cells = self
            .store
            .get(temp_id)
            .is_some_and(|f| f.field_type.is_table());
        if !is_cells {
            return Vec::new();
        }
        self.gesture = GestureState::ColumnResizing { temp_id: temp_id.to_owned() };
        self.select_field(Some(temp_id))
    }

    // --- Field operations ---

    /// Apply a host-driven edit (inspector panel, options editor).
    pub fn update_field(&mut self, temp_id: &str, patch: FieldPatch) -> Vec<Action> {
        if !self.ui.permissions.can_edit || !self.store.update(temp_id, &patch) {
            return Vec::new();
        }
        vec![Action::FieldUpdated { temp_id: temp_id.to_owned(), patch }]
    }

    /// Delete a field, clearing the selection if it pointed at it.
    pub fn delete_field(&mut self, temp_id: &str) -> Vec<Action> {
        if !self.ui.permissions.can_edit || self.store.remove(temp_id).is_none() {
            return Vec::new();
        }
        let mut actions = vec![Action::FieldDeleted { temp_id: temp_id.to_owned() }];
        if self.ui.selected.as_deref() == Some(temp_id) {
            self.ui.selected = None;
            actions.push(Action::SelectionChanged(None));
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Duplicate a field and select the copy.
    pub fn duplicate_field(&mut self, temp_id: &str) -> Vec<Action> {
        if !self.ui.permissions.can_edit {
            return Vec::new();
        }
        let Some(copy_id) = self.store.duplicate(temp_id) else {
            return Vec::new();
        };
        let mut actions = Vec::new();
        if let Some(copy) = self.store.get(&copy_id) {
            actions.push(Action::FieldCreated(copy.clone()));
        }
        actions.extend(self.select_field(Some(&copy_id)));
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Partner operations ---

    /// Add a partner to the roster.
    ///
    /// # Errors
    ///
    /// Propagates [`PartnerError`] from the roster.
    pub fn add_partner(&mut self, name: Option<&str>) -> Result<String, PartnerError> {
        self.partners.add(name)
    }

    /// Rename a partner, atomically rewriting every field that references
    /// it. Returns how many fields were rewritten.
    ///
    /// # Errors
    ///
    /// Propagates [`PartnerError`] from the roster; fields are untouched
    /// on error.
    pub fn rename_partner(&mut self, old: &str, new: &str) -> Result<usize, PartnerError> {
        self.partners.rename(old, new)?;
        Ok(self.store.rename_partner(old, new.trim()))
    }

    /// Remove a partner and cascade: every field referencing it is
    /// deleted. Returns a description of what changed.
    ///
    /// # Errors
    ///
    /// Returns [`PartnerError::UnknownPartner`] if the name is absent;
    /// nothing changes on error.
    pub fn remove_partner_cascading(&mut self, name: &str) -> Result<PartnerRemoval, PartnerError> {
        self.partners.remove(name)?;
        let removed = self.store.remove_partner_fields(name);
        let removed_temp_ids: Vec<String> = removed.into_iter().map(|f| f.temp_id).collect();
        if self
            .ui
            .selected
            .as_deref()
            .is_some_and(|sel| removed_temp_ids.iter().any(|id| id == sel))
        {
            self.ui.selected = None;
        }
        Ok(PartnerRemoval {
            partner: name.to_owned(),
            removed_temp_ids,
            current: self.partners.current().map(str::to_owned),
        })
    }

    /// Assign the first roster entry to every field whose partner is
    /// missing or stale. Returns the temp ids that changed.
    pub fn auto_assign_orphans(&mut self) -> Vec<String> {
        let Some(first) = self.partners.names().first().cloned() else {
            return Vec::new();
        };
        let known = self.partners.names().to_vec();
        self.store.assign_orphans(&known, &first)
    }

    // --- Gesture internals ---

    fn finish_draw(&mut self, start: Point, end: Point) -> Vec<Action> {
        let width_px = (end.x - start.x).abs();
        let height_px = (end.y - start.y).abs();
        if width_px < MIN_DRAW_WIDTH_PX || height_px < MIN_DRAW_HEIGHT_PX {
            // Accidental click, not an error.
            return vec![Action::RenderNeeded];
        }
        let Some(partner) = self.current_partner().map(str::to_owned) else {
            return vec![Action::Warning(EditorWarning::NoPartners)];
        };
        let page = self.effective_page_size();
        let box_px = Rect::new(start.x.min(end.x), start.y.min(end.y), width_px, height_px);
        let (rect, _) = box_px.to_normalized(page).clamped();

        let field_type = match self.ui.tool {
            Tool::Draw(field_type) => field_type,
            Tool::Select => self.ui.last_field_type,
        };
        let display_order = self.store.next_display_order();
        let field = Field {
            temp_id: drawn_temp_id(),
            id: None,
            name: format!("{} {display_order}", type_label(field_type)),
            field_type,
            required: true,
            position: FieldPosition {
                rect,
                page: self.ui.current_page,
                default_value: None,
            },
            options: field_type.default_options(),
            partner,
            display_order,
        };
        let temp_id = field.temp_id.clone();
        self.store.insert(field.clone());
        self.ui.last_field_type = field_type;
        self.ui.tool = Tool::Select;

        let mut actions = vec![Action::FieldCreated(field)];
        actions.extend(self.select_field(Some(&temp_id)));
        actions.push(Action::ToolChanged(Tool::Select));
        actions.push(Action::RenderNeeded);
        actions
    }

    fn move_field_to(&mut self, temp_id: &str, at: Point, grab_offset: Point) -> Vec<Action> {
        let page = self.effective_page_size();
        let Some(field) = self.store.get(temp_id) else {
            return Vec::new();
        };
        let rect = field.position.rect;
        let x = ((at.x - grab_offset.x) / page.width).clamp(0.0, 1.0 - rect.width);
        let y = ((at.y - grab_offset.y) / page.height).clamp(0.0, 1.0 - rect.height);
        self.store.update(temp_id, &FieldPatch::moved_to(x, y));
        vec![Action::RenderNeeded]
    }

    fn resize_field_to(
        &mut self,
        temp_id: &str,
        anchor: ResizeAnchor,
        start: Point,
        orig: Rect,
        at: Point,
    ) -> Vec<Action> {
        let page = self.effective_page_size();
        let dx = (at.x - start.x) / page.width;
        let dy = (at.y - start.y) / page.height;
        let mut rect = resized_rect(orig, anchor, dx, dy);
        // Pin the origin on the page, then cap the size at the far edge, so
        // an overshooting resize stops at the boundary instead of moving
        // the field.
        rect.x = rect.x.clamp(0.0, 1.0 - MIN_FIELD_SIZE);
        rect.y = rect.y.clamp(0.0, 1.0 - MIN_FIELD_SIZE);
        rect.width = rect.width.clamp(MIN_FIELD_SIZE, 1.0 - rect.x);
        rect.height = rect.height.clamp(MIN_FIELD_SIZE, 1.0 - rect.y);
        self.store.update(temp_id, &FieldPatch::resized_to(rect));
        vec![Action::RenderNeeded]
    }

    fn resize_columns_to(&mut self, temp_id: &str, at: Point) -> Vec<Action> {
        let page = self.effective_page_size();
        let Some(field) = self.store.get(temp_id) else {
            return Vec::new();
        };
        let field_px = field.position.rect.to_pixels(page);
        if field_px.width <= 0.0 {
            return Vec::new();
        }
        let current_columns = match field.options {
            Some(FieldOptions::Table { columns, .. }) => columns,
            _ => 1,
        };
        let min_ratio = (MIN_COLUMN_WIDTH_PX / field_px.width).min(1.0);
        let ratio = ((at.x - field_px.x) / field_px.width).clamp(min_ratio, 1.0);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let columns = ((1.0 / ratio).round() as u32).max(1);
        if columns == current_columns {
            return vec![Action::RenderNeeded];
        }
        let patch = FieldPatch {
            options: Some(FieldOptions::uniform_table(columns)),
            ..FieldPatch::default()
        };
        self.store.update(temp_id, &patch);
        vec![
            Action::FieldUpdated { temp_id: temp_id.to_owned(), patch },
            Action::RenderNeeded,
        ]
    }

    fn finish_geometry_gesture(&mut self, temp_id: &str, resized: bool) -> Vec<Action> {
        let Some(field) = self.store.get(temp_id) else {
            return vec![Action::RenderNeeded];
        };
        let rect = field.position.rect;
        let patch = if resized {
            FieldPatch::resized_to(rect)
        } else {
            FieldPatch::moved_to(rect.x, rect.y)
        };
        vec![
            Action::FieldUpdated { temp_id: temp_id.to_owned(), patch },
            Action::RenderNeeded,
        ]
    }
}

/// Human label for a field type, used for generated field names and
/// presentation chrome.
#[must_use]
pub fn type_label(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::Text => "Text",
        FieldType::Signature => "Signature",
        FieldType::Initials => "Initials",
        FieldType::Date => "Date",
        FieldType::Checkbox => "Checkbox",
        FieldType::Number => "Number",
        FieldType::Radio => "Radio",
        FieldType::Multiple => "Multiple",
        FieldType::Select => "Select",
        FieldType::Cells => "Cells",
        FieldType::Image => "Image",
        FieldType::File => "File",
    }
}

fn resized_rect(orig: Rect, anchor: ResizeAnchor, dx: f64, dy: f64) -> Rect {
    use ResizeAnchor::*;
    let mut rect = orig;
    if matches!(anchor, W | Nw | Sw) {
        rect.x = orig.x + dx;
        rect.width = orig.width - dx;
    }
    if matches!(anchor, E | Ne | Se) {
        rect.width = orig.width + dx;
    }
    if matches!(anchor, N | Ne | Nw) {
        rect.y = orig.y + dy;
        rect.height = orig.height - dy;
    }
    if matches!(anchor, S | Se | Sw) {
        rect.height = orig.height + dy;
    }
    // Keep the anchored edge fixed when the floor kicks in.
    if rect.width < MIN_FIELD_SIZE {
        if matches!(anchor, W | Nw | Sw) {
            rect.x = orig.x + orig.width - MIN_FIELD_SIZE;
        }
        rect.width = MIN_FIELD_SIZE;
    }
    if rect.height < MIN_FIELD_SIZE {
        if matches!(anchor, N | Ne | Nw) {
            rect.y = orig.y + orig.height - MIN_FIELD_SIZE;
        }
        rect.height = MIN_FIELD_SIZE;
    }
    rect
}
