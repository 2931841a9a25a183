pub mod document;
pub mod error;
pub mod geometry;
pub mod id;
pub mod model;
pub mod selection;
pub mod snapshot;
pub mod view;

pub use document::Document;
pub use error::{Error, ErrorKind, Result};
pub use geometry::{Shape, WrappedText, node_size, wrap_text};
pub use id::{EdgeId, NodeId};
pub use model::{Color, Edge, Graph, Node, NodeStyle, RemovedNode};
pub use selection::{Element, Selection};
pub use snapshot::{DocumentRecord, EdgeRecord, NodeRecord};
pub use view::ViewTransform;

// Re-export kurbo so downstream crates share the same point types
pub use kurbo::{Point, Vec2};
