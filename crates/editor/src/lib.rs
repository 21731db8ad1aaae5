// Library crate: the scene editing core (live scene, snapshot codec, history,
// commands, editor coordinator) plus the headless harness and script protocol.
// Graphics and UI collaborators plug in through the traits in `graph` and
// `messenger`.

pub mod codec;
pub mod command;
pub mod editor;
pub mod error;
pub mod fixtures;
pub mod graph;
pub mod harness;
pub mod messenger;
pub mod project;
pub mod state;

pub use editor::Editor;
pub use error::{EditorError, SnapshotError, SnapshotWarning, StoreError};
