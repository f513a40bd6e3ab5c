pub struct MaterialComponent {
    pub bind_group: wgpu::BindGroup,
    /// Present on animated materials (arcs); the frame ticker writes the
    /// current time here while playing.
    pub time_buffer: Option<wgpu::Buffer>,
}
