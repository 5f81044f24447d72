//! Wavefront OBJ loading into flat, GPU-ready buffers.
//!
//! Positions that are shared by faces with different texture coordinates or
//! normals are split into one output vertex per distinct combination, so the
//! result can be drawn with a single index buffer.
//!
//! ```no_run
//! use objseam::{load_obj_file, LoadOptions};
//! use std::path::Path;
//!
//! let model = load_obj_file(Path::new("cube.obj"), &LoadOptions::default())?;
//! println!("{} vertices, {} triangles", model.vertex_count(), model.triangle_count());
//! # Ok::<(), objseam::ObjError>(())
//! ```

pub mod assemble;
pub mod config;
pub mod error;
pub mod log;
pub mod model;
pub mod obj;
pub mod options;
pub mod resolve;

pub use self::error::{ObjError, Result};
pub use self::model::{GpuVertex, Model, Vertex};
pub use self::obj::{load_obj_file, load_obj_files, parse_obj_file};
pub use self::options::LoadOptions;
