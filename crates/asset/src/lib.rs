//! Asset loading: triangle meshes read from OBJ text into flat vertex arrays.

pub mod mesh;
pub mod obj;

pub use mesh::TriangleSoup;
pub use obj::{load_obj_from_path, load_obj_from_reader, load_obj_from_str};
