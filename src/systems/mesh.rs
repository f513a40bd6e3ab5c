use wgpu::util::DeviceExt;

use crate::components::mesh::Vertex;

pub struct MeshSystem<'a> {
    device: &'a wgpu::Device,
}

impl<'a> MeshSystem<'a> {
    pub fn new(device: &'a wgpu::Device) -> Self {
        Self { device }
    }

    pub fn create_vertex_buffer(&self, data: &[Vertex]) -> wgpu::Buffer {
        self.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Vertex Buffer"),
                contents: bytemuck::cast_slice(data),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            })
    }

    pub fn create_index_buffer(&self, data: &[u32]) -> wgpu::Buffer {
        self.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Index Buffer"),
                contents: bytemuck::cast_slice(data),
                usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            })
    }

    pub fn create_model_matrix_bind_group_layout(&self) -> wgpu::BindGroupLayout {
        self.device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some("Model Matrix Bind Group Layout"),
            })
    }

    pub fn create_model_matrix_bind_group(
        &self,
        layout: &wgpu::BindGroupLayout,
        model_matrix: [[f32; 4]; 4],
    ) -> wgpu::BindGroup {
        let buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Model Matrix Buffer"),
                contents: bytemuck::cast_slice(&model_matrix),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("Model Matrix Bind Group"),
        })
    }

    fn map(value: u32, start1: u32, stop1: u32, start2: f32, stop2: f32) -> f32 {
        start2
            + (stop2 - start2) * ((value as f32 - start1 as f32) / (stop1 as f32 - start1 as f32))
    }

    // Same parameterization as coordinates::project (y up, theta around
    // the polar axis), so a pin projected at (lat, lon) sits exactly on
    // the texel the UVs put there.
    fn sphere_vertex(radius: f32, phi: f32, theta: f32, u: f32, v: f32) -> Vertex {
        Vertex {
            position: [
                radius * phi.sin() * theta.cos(),
                radius * phi.cos(),
                radius * phi.sin() * theta.sin(),
            ],
            tex_coords: [u, v],
        }
    }

    /// UV sphere as a single triangle strip with degenerate stitches
    /// between rows.
    pub fn generate_sphere_mesh(radius: f32, segments: u32) -> (Vec<Vertex>, Vec<u32>) {
        let mut vertices = Vec::new();
        let mut indices = Vec::new();

        for i in 0..=segments {
            let phi = MeshSystem::map(i, 0, segments, 0.0, std::f32::consts::PI);
            let v = i as f32 / segments as f32;
            for j in 0..=segments {
                let theta = MeshSystem::map(j, 0, segments, 0.0, 2.0 * std::f32::consts::PI);
                let u = j as f32 / segments as f32;
                vertices.push(MeshSystem::sphere_vertex(radius, phi, theta, u, v));
            }
        }

        for i in 0..segments {
            for j in 0..=segments {
                indices.push(i * (segments + 1) + j); // current row
                indices.push((i + 1) * (segments + 1) + j); // next row
            }

            if i != segments - 1 {
                // Degenerate triangles to stitch strips together: repeat the
                // last vertex of this strip and the first of the next
                indices.push((i + 1) * (segments + 1) + segments);
                indices.push((i + 1) * (segments + 1));
            }
        }

        (vertices, indices)
    }

    /// Vertices for an arc rendered as a line strip. The u coordinate runs
    /// 0..1 along the arc so the shader can animate over its length.
    pub fn arc_strip(points: &[[f64; 3]]) -> (Vec<Vertex>, Vec<u32>) {
        let n = points.len();
        let vertices = points
            .iter()
            .enumerate()
            .map(|(i, p)| Vertex {
                position: [p[0] as f32, p[1] as f32, p[2] as f32],
                tex_coords: [i as f32 / (n.max(2) - 1) as f32, 0.0],
            })
            .collect();
        let indices = (0..n as u32).collect();
        (vertices, indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_vertices_sit_on_the_requested_radius() {
        let (vertices, _) = MeshSystem::generate_sphere_mesh(1.0, 8);
        assert_eq!(vertices.len(), 9 * 9);
        for v in &vertices {
            let r = (v.position[0] * v.position[0]
                + v.position[1] * v.position[1]
                + v.position[2] * v.position[2])
                .sqrt();
            assert!((r - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn sphere_uvs_cover_the_unit_square() {
        let (vertices, _) = MeshSystem::generate_sphere_mesh(0.05, 4);
        for v in &vertices {
            assert!((0.0..=1.0).contains(&v.tex_coords[0]));
            assert!((0.0..=1.0).contains(&v.tex_coords[1]));
        }
        assert_eq!(vertices.first().unwrap().tex_coords, [0.0, 0.0]);
        assert_eq!(vertices.last().unwrap().tex_coords, [1.0, 1.0]);
    }

    #[test]
    fn arc_strip_matches_the_sample_count() {
        let points = vec![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        let (vertices, indices) = MeshSystem::arc_strip(&points);
        assert_eq!(vertices.len(), 3);
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(vertices[0].tex_coords[0], 0.0);
        assert_eq!(vertices[2].tex_coords[0], 1.0);
    }
}
