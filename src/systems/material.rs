use image::{ImageBuffer, Rgba};
use wgpu::util::DeviceExt;

pub struct MaterialSystem<'a> {
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
}

const OCEAN: Rgba<u8> = Rgba([22, 48, 92, 255]);
const GRID: Rgba<u8> = Rgba([70, 110, 160, 255]);
const AXIS: Rgba<u8> = Rgba([200, 215, 235, 255]);

impl<'a> MaterialSystem<'a> {
    pub fn new(device: &'a wgpu::Device, queue: &'a wgpu::Queue) -> Self {
        Self { device, queue }
    }

    /// Equirectangular graticule standing in for an earth photo: gridlines
    /// every 15 degrees, with the equator and prime meridian highlighted.
    ///
    /// Column 0 is lon -180 and the prime meridian sits at u = 0.5, the
    /// same wrap the sphere projection uses, so "zeroZero" pins onto the
    /// bright meridian/equator crossing.
    pub fn graticule_texture(width: u32, height: u32) -> ImageBuffer<Rgba<u8>, Vec<u8>> {
        ImageBuffer::from_fn(width, height, |px, py| {
            let lon = px as f64 / width as f64 * 360.0 - 180.0;
            let lat = 90.0 - py as f64 / height as f64 * 180.0;
            let on_line = |deg: f64| (deg / 15.0).round().mul_add(-15.0, deg).abs() < 0.5;

            if lat.abs() < 0.7 || lon.abs() < 0.7 {
                AXIS
            } else if on_line(lat) || on_line(lon) {
                GRID
            } else {
                OCEAN
            }
        })
    }

    /// Texture + sampler layout for the globe material.
    pub fn texture_layout(&self) -> wgpu::BindGroupLayout {
        self.device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Globe Texture Bind Group Layout"),
                entries: &[
                    // texture
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            multisampled: false,
                            view_dimension: wgpu::TextureViewDimension::D2,
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        },
                        count: None,
                    },
                    // sampler
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            })
    }

    pub fn create_2d_texture(
        &self,
        layout: &wgpu::BindGroupLayout,
        image_data: ImageBuffer<Rgba<u8>, Vec<u8>>,
    ) -> wgpu::BindGroup {
        let dimensions = image_data.dimensions();
        let texture_size = wgpu::Extent3d {
            width: dimensions.0,
            height: dimensions.1,
            depth_or_array_layers: 1,
        };

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            size: texture_size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            label: Some("Globe Texture"),
            view_formats: &[],
        });

        self.queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            bytemuck::cast_slice(&image_data),
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(dimensions.0 * 4), // 4 bytes per RGBA pixel
                rows_per_image: Some(dimensions.1),
            },
            texture_size,
        );

        let texture_view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("Globe Texture View"),
            dimension: Some(wgpu::TextureViewDimension::D2),
            format: Some(wgpu::TextureFormat::Rgba8UnormSrgb),
            aspect: wgpu::TextureAspect::All,
            base_mip_level: 0,
            mip_level_count: Some(1),
            base_array_layer: 0,
            array_layer_count: None,
        });

        let texture_sampler = self.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Globe Texture Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&texture_sampler),
                },
            ],
            label: Some("Globe Texture Bind Group"),
        })
    }

    /// Layout shared by every pin's color material.
    pub fn color_layout(&self) -> wgpu::BindGroupLayout {
        self.device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[Self::fragment_uniform_entry(0)],
                label: Some("Pin Color Bind Group Layout"),
            })
    }

    /// Flat color material for pins.
    pub fn create_color_material(
        &self,
        layout: &wgpu::BindGroupLayout,
        color: [f32; 4],
    ) -> wgpu::BindGroup {
        let color_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Pin Color Uniform Buffer"),
                contents: bytemuck::bytes_of(&color),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });

        self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: color_buffer.as_entire_binding(),
            }],
            label: Some("Pin Color Bind Group"),
        })
    }

    /// Layout shared by every arc's color-plus-time material.
    pub fn arc_layout(&self) -> wgpu::BindGroupLayout {
        self.device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[
                    Self::fragment_uniform_entry(0),
                    Self::fragment_uniform_entry(1),
                ],
                label: Some("Arc Material Bind Group Layout"),
            })
    }

    /// Color plus animation-time material for arcs. The returned buffer is
    /// what the frame ticker writes into every frame.
    pub fn create_arc_material(
        &self,
        layout: &wgpu::BindGroupLayout,
        color: [f32; 4],
    ) -> (wgpu::BindGroup, wgpu::Buffer) {
        let color_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Arc Color Uniform Buffer"),
                contents: bytemuck::bytes_of(&color),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        // padded to 16 bytes for WebGL2-compatible uniform sizes
        let time_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Arc Time Uniform Buffer"),
                contents: bytemuck::bytes_of(&[0.0_f32; 4]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: color_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: time_buffer.as_entire_binding(),
                },
            ],
            label: Some("Arc Material Bind Group"),
        });

        (bind_group, time_buffer)
    }

    fn fragment_uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
        wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graticule_highlights_the_equator_and_prime_meridian() {
        let image = MaterialSystem::graticule_texture(360, 180);
        // lon 0 maps to the middle column, lat 0 to the middle row
        assert_eq!(*image.get_pixel(180, 90), AXIS);
        assert_eq!(*image.get_pixel(180, 5), AXIS);
        assert_eq!(*image.get_pixel(5, 90), AXIS);
    }

    #[test]
    fn graticule_is_mostly_ocean() {
        let image = MaterialSystem::graticule_texture(360, 180);
        assert_eq!(*image.get_pixel(8, 8), OCEAN);
        let ocean = image.pixels().filter(|p| **p == OCEAN).count();
        assert!(ocean * 2 > (360 * 180) as usize);
    }
}
