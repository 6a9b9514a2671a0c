//! Input model: tools, modifier keys, and the gesture state machine.
//!
//! `Tool` and `Modifiers` capture the user's intent at the time of a
//! pointer event. `GestureState` is the active gesture being tracked
//! between pointer-down and pointer-up; it is exclusive — at any instant
//! at most one gesture is in progress — and carries all context needed to
//! compute incremental deltas in pure arithmetic at pointer-move
//! frequency.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::field::FieldType;
use crate::geom::{Point, Rect};

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Pointer / selection tool (default).
    #[default]
    Select,
    /// Draw a new field of the given type.
    Draw(FieldType),
}

impl Tool {
    /// Whether a pointer-down with these modifiers starts a draw gesture.
    /// The select tool draws only with a modifier held.
    #[must_use]
    pub fn draws(self, modifiers: Modifiers) -> bool {
        match self {
            Self::Draw(_) => true,
            Self::Select => modifiers.ctrl || modifiers.meta,
        }
    }
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

/// Corner or edge being dragged during a field resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeAnchor {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

/// Host-role permissions for this editor session. A denied permission
/// hides mutating controls; it is not an error state.
#[derive(Debug, Clone, Copy)]
pub struct Permissions {
    /// Whether the user may place, edit, and delete fields and partners.
    pub can_edit: bool,
}

impl Default for Permissions {
    fn default() -> Self {
        Self { can_edit: true }
    }
}

/// Persistent UI state visible to the presentation layer.
#[derive(Debug, Clone)]
pub struct UiState {
    /// Currently active tool.
    pub tool: Tool,
    /// Field type used when drawing with the select tool and a modifier,
    /// and when reverting the tool after a draw completes.
    pub last_field_type: FieldType,
    /// Temp id of the selected field, if any.
    pub selected: Option<String>,
    /// 1-based page currently shown by the PDF display.
    pub current_page: u32,
    /// Role-collaborator permissions.
    pub permissions: Permissions,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            tool: Tool::Select,
            last_field_type: FieldType::Text,
            selected: None,
            current_page: 1,
            permissions: Permissions::default(),
        }
    }
}

/// The active pointer gesture.
///
/// Each variant carries the context needed to recompute geometry from the
/// latest pointer position without touching any cached pixel dimensions.
#[derive(Debug, Clone, Default)]
pub enum GestureState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Dragging out a new field's bounding box on the overlay.
    Drawing {
        /// Pixel position of the pointer-down that started the gesture.
        start: Point,
        /// Latest pointer position, for the live preview rectangle.
        current: Point,
    },
    /// Moving an existing field across the page.
    DraggingField {
        /// Temp id of the field being moved.
        temp_id: String,
        /// Pixel offset from the field's top-left corner to the grab
        /// point, so the field doesn't jump under the pointer.
        grab_offset: Point,
    },
    /// Resizing an existing field from one of its handles.
    ResizingField {
        /// Temp id of the field being resized.
        temp_id: String,
        /// Which handle is being dragged.
        anchor: ResizeAnchor,
        /// Pixel position of the pointer at gesture start.
        start: Point,
        /// Normalized rect at gesture start.
        orig: Rect,
    },
    /// Dragging the create-columns handle on a cells field's splitter bar.
    ColumnResizing {
        /// Temp id of the cells field being reconfigured.
        temp_id: String,
    },
}

impl GestureState {
    /// Whether any gesture is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}
