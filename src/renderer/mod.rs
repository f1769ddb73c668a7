//! Rendering module: wgpu flat-color pipeline, shape generators, the scene
//! builder that turns game state into triangles, and the text pass.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod text;
pub mod vertex;

pub use pipeline::RenderState;
pub use text::TextRenderer;
pub use vertex::Vertex;
