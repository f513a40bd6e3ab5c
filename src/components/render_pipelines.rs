use std::sync::Arc;

/// Pipelines are shared across entities of the same kind: every pin points
/// at the one sphere pipeline, every arc at the one line-strip pipeline.
pub struct RenderPipelineComponent {
    pub render_pipeline: Arc<wgpu::RenderPipeline>,
}
