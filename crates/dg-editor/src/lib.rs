pub mod config;
pub mod edit;
pub mod engine;
pub mod events;
pub mod input;
pub mod shortcuts;
pub mod store;
pub mod tools;

pub use config::{EditorConfig, WelcomeNode};
pub use edit::{BatchPatch, NodePatch};
pub use engine::Editor;
pub use events::{EditorEvent, EventQueue};
pub use input::{InputEvent, Modifiers};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use store::{KeyValueStore, MemoryStore, SnapshotStore};
pub use tools::ToolKind;
