pub mod camera;
pub mod geospatial;
pub mod material;
pub mod mesh;
pub mod render_pipelines;
pub mod ticker;
