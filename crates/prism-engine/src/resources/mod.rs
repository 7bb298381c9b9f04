//! Asset loading: WGSL shaders, geometry text files, OBJ meshes and images.

mod geometry;
mod obj;
mod shader;
mod tbn;
mod texture;
mod vertex;

pub use geometry::{load_geometry, parse_geometry, Geometry, GeometryParseError, GeometryParseErrorKind};
pub use obj::{load_geometry_from_obj, parse_obj};
pub use shader::{load_shader_module, shader_module_from_source};
pub use tbn::{compute_tbn, populate_texture_frame_attributes};
pub use texture::{bit_width, load_texture, mip_level_count, Texture};
pub use vertex::VertexAttributes;
