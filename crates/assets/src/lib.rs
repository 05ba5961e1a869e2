//! Model loading: reads a glTF scene into a single triangle mesh.
//!
//! Node hierarchy transforms are baked into vertex data and each primitive's
//! material base color factor becomes its vertex color, so the renderer only
//! needs one vertex buffer and one index buffer. Primitives become parts that
//! name the base color texture they sample.
//!
//! Loading is one-shot. A failure is reported to the caller, which decides
//! whether to render without the model.

mod loader;
mod mesh;

pub use loader::{AssetError, load_model};
pub use mesh::{MeshPart, MeshVertex, ModelMesh, TextureImage};

pub fn crate_info() -> &'static str {
    "earthview-assets v0.1.0"
}
