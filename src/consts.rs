//! Shared numeric constants for the editor crate.

// ── Geometry ────────────────────────────────────────────────────

/// Minimum normalized width/height of a field. Anything smaller is
/// invisible at typical render sizes.
pub const MIN_FIELD_SIZE: f64 = 0.01;

/// Per-axis tolerance when comparing a field position against its saved
/// snapshot. Deltas below this are render noise, not edits.
pub const POSITION_TOLERANCE: f64 = 0.01;

/// Fallback page width in pixels when the PDF display never reported real
/// page geometry. Matches the wire format's historical default.
pub const DEFAULT_PAGE_WIDTH_PX: f64 = 600.0;

/// Fallback page height in pixels.
pub const DEFAULT_PAGE_HEIGHT_PX: f64 = 800.0;

// ── Draw gesture ────────────────────────────────────────────────

/// Minimum draw-gesture width in screen pixels. Smaller drags are treated
/// as accidental clicks and discarded.
pub const MIN_DRAW_WIDTH_PX: f64 = 20.0;

/// Minimum draw-gesture height in screen pixels.
pub const MIN_DRAW_HEIGHT_PX: f64 = 5.0;

// ── Cells fields ────────────────────────────────────────────────

/// Minimum rendered column width in pixels for a cells field.
pub const MIN_COLUMN_WIDTH_PX: f64 = 10.0;

/// Column count for a freshly created cells field.
pub const DEFAULT_CELL_COLUMNS: u32 = 3;
