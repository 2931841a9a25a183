pub mod hit;
pub mod paint;
pub mod svg;

pub use hit::{EDGE_HIT_TOLERANCE, Hit, hit_test};
pub use paint::{Primitive, Scene, build_scene, edge_primitive, node_primitive};
pub use svg::render_svg;
