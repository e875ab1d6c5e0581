// src/engine/mod.rs

//! Board orchestration.
//!
//! This module ties together:
//! - the graph store and the derivations in [`crate::dag`]
//! - typed mutations ([`actions`]) applied one at a time
//! - drag payloads and drop acceptance ([`drag`])
//! - the per-frame render view ([`view`])
//!
//! The state-owning service object lives in [`core`].

pub mod actions;
pub mod core;
pub mod drag;
pub mod view;

pub use actions::{ActionOutcome, BoardAction};
pub use self::core::Board;
pub use drag::{DragPayload, DropTarget};
pub use view::{BoardView, SubgraphView};
