//! Field placement and editing engine for the Signboard document-signing
//! product.
//!
//! This crate owns the editor session that sits on top of a rendered PDF
//! page: translating pointer input into field mutations, keeping geometry
//! in a normalized page-fraction model, diffing the live field set against
//! the last persisted snapshot, and reconciling locally-generated temp
//! identities against server-assigned ids after a save. The host UI layer
//! is responsible only for wiring DOM events to the engine, rendering the
//! [`render::FieldChrome`] view-models, and driving the explicit save.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Editor session state and the testable [`engine::EditorCore`] |
//! | [`store`] | Live field array, deleted-ids set, persisted snapshot |
//! | [`field`] | Field entity, type set, per-type options payloads |
//! | [`partner`] | Signing-party roster and per-partner colors |
//! | [`geom`] | Normalized rectangles and pixel conversions |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`reconcile`] | Template-load reconciliation of raw server records |
//! | [`save`] | Save partitioning, phased flush, identity correlation |
//! | [`api`] | Pixel-valued wire types and the template API adapter |
//! | [`render`] | Per-field presentation chrome (read-only view-models) |
//! | [`consts`] | Shared numeric constants (thresholds, tolerances) |

pub mod api;
pub mod consts;
pub mod engine;
pub mod field;
pub mod geom;
pub mod input;
pub mod partner;
pub mod reconcile;
pub mod render;
pub mod save;
pub mod store;
