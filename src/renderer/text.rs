//! Glyph-atlas text rendering
//!
//! A single monochrome atlas is built once at startup. If a TTF/OTF is
//! found under `assets/fonts/` it is rasterized with fontdue; otherwise a
//! built-in 5x7 block face stands in so the HUD keeps working with no font
//! asset installed. Draw calls queue colored quads in logical screen
//! coordinates and are flushed in one pass after the shapes.

use std::collections::HashMap;
use std::path::PathBuf;

use bytemuck::{Pod, Zeroable};
use fontdue::{Font, FontSettings};
use wgpu::util::DeviceExt;

use super::pipeline::RenderState;

const ATLAS_SIZE: u32 = 512;
/// Nominal rasterization size; draw sizes scale from this
const BASE_SIZE: f32 = 48.0;

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct TextVertex {
    position: [f32; 2],
    tex_coords: [f32; 2],
    color: [f32; 4],
}

impl TextVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TextVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

struct GlyphInfo {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    advance: f32,
    offset_x: f32,
    offset_y: f32,
}

struct QueuedText {
    text: String,
    x: f32,
    y: f32,
    size: f32,
    color: [f32; 4],
}

pub struct TextRenderer {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    glyph_info: HashMap<char, GlyphInfo>,
    /// True when the built-in block face is in use (glyph lookup is
    /// uppercase-only in that case)
    block_face: bool,
    queued: Vec<QueuedText>,
}

impl TextRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
    ) -> Self {
        let mut atlas_data = vec![0u8; (ATLAS_SIZE * ATLAS_SIZE) as usize];
        let mut glyph_info = HashMap::new();

        let block_face = match load_font() {
            Some((path, font)) => {
                rasterize_font(&font, &mut atlas_data, &mut glyph_info);
                log::info!("Text atlas built from {}", path.display());
                false
            }
            None => {
                log::warn!("No font found under assets/fonts/, using built-in block glyphs");
                rasterize_block_face(&mut atlas_data, &mut glyph_info);
                true
            }
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("text_atlas"),
            size: wgpu::Extent3d {
                width: ATLAS_SIZE,
                height: ATLAS_SIZE,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &atlas_data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(ATLAS_SIZE),
                rows_per_image: Some(ATLAS_SIZE),
            },
            wgpu::Extent3d {
                width: ATLAS_SIZE,
                height: ATLAS_SIZE,
                depth_or_array_layers: 1,
            },
        );

        let texture_view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("text_bind_group_layout"),
            entries: &[
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
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("text_bind_group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("text_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("text.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("text_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("text_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[TextVertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        Self {
            pipeline,
            bind_group,
            glyph_info,
            block_face,
            queued: Vec::new(),
        }
    }

    fn lookup(&self, ch: char) -> Option<&GlyphInfo> {
        if self.block_face {
            self.glyph_info.get(&ch.to_ascii_uppercase())
        } else {
            self.glyph_info.get(&ch)
        }
    }

    /// Pixel width of `text` at the given size
    pub fn measure(&self, text: &str, size: f32) -> f32 {
        let scale = size / BASE_SIZE;
        text.chars()
            .map(|ch| match self.lookup(ch) {
                Some(glyph) => glyph.advance * scale,
                None => size * 0.5,
            })
            .sum()
    }

    /// Queue text with its left edge at `x` and baseline at `y`
    /// (logical screen coordinates)
    pub fn draw(&mut self, text: &str, x: f32, y: f32, size: f32, color: [f32; 4]) {
        self.queued.push(QueuedText {
            text: text.to_string(),
            x,
            y,
            size,
            color,
        });
    }

    /// Queue text centered horizontally on `center_x`
    pub fn draw_centered(&mut self, text: &str, center_x: f32, y: f32, size: f32, color: [f32; 4]) {
        let x = center_x - self.measure(text, size) / 2.0;
        self.draw(text, x, y, size, color);
    }

    /// Render everything queued since the last flush
    pub fn flush(
        &mut self,
        device: &wgpu::Device,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
    ) {
        let mut vertices: Vec<TextVertex> = Vec::new();
        let mut indices: Vec<u32> = Vec::new();

        for item in &self.queued {
            let scale = item.size / BASE_SIZE;
            let mut cursor_x = item.x;

            for ch in item.text.chars() {
                let Some(glyph) = self.lookup(ch) else {
                    cursor_x += item.size * 0.5;
                    continue;
                };
                if glyph.width == 0 {
                    cursor_x += glyph.advance * scale;
                    continue;
                }

                let x0 = cursor_x + glyph.offset_x * scale;
                // offset_y is the baseline-relative bottom of the glyph
                let y1 = item.y - glyph.offset_y * scale;
                let y0 = y1 - glyph.height as f32 * scale;
                let x1 = x0 + glyph.width as f32 * scale;

                let (sx0, sy0) = RenderState::screen_to_ndc(x0, y0);
                let (sx1, sy1) = RenderState::screen_to_ndc(x1, y1);

                let u0 = glyph.x as f32 / ATLAS_SIZE as f32;
                let v0 = glyph.y as f32 / ATLAS_SIZE as f32;
                let u1 = (glyph.x + glyph.width) as f32 / ATLAS_SIZE as f32;
                let v1 = (glyph.y + glyph.height) as f32 / ATLAS_SIZE as f32;

                let base = vertices.len() as u32;
                vertices.push(TextVertex {
                    position: [sx0, sy0],
                    tex_coords: [u0, v0],
                    color: item.color,
                });
                vertices.push(TextVertex {
                    position: [sx1, sy0],
                    tex_coords: [u1, v0],
                    color: item.color,
                });
                vertices.push(TextVertex {
                    position: [sx1, sy1],
                    tex_coords: [u1, v1],
                    color: item.color,
                });
                vertices.push(TextVertex {
                    position: [sx0, sy1],
                    tex_coords: [u0, v1],
                    color: item.color,
                });
                indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);

                cursor_x += glyph.advance * scale;
            }
        }
        self.queued.clear();

        if vertices.is_empty() {
            return;
        }

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("text_vertex_buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("text_index_buffer"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("text_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, vertex_buffer.slice(..));
        render_pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..indices.len() as u32, 0, 0..1);
    }
}

/// First TTF/OTF under assets/fonts/, if any
fn load_font() -> Option<(PathBuf, Font)> {
    let dir = std::fs::read_dir("assets/fonts").ok()?;
    for entry in dir.flatten() {
        let path = entry.path();
        let is_font = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("ttf") || e.eq_ignore_ascii_case("otf"));
        if !is_font {
            continue;
        }
        match std::fs::read(&path) {
            Ok(bytes) => match Font::from_bytes(bytes, FontSettings::default()) {
                Ok(font) => return Some((path, font)),
                Err(e) => log::warn!("Failed to parse font {}: {e}", path.display()),
            },
            Err(e) => log::warn!("Failed to read font {}: {e}", path.display()),
        }
    }
    None
}

fn rasterize_font(font: &Font, atlas: &mut [u8], glyph_info: &mut HashMap<char, GlyphInfo>) {
    let mut cursor_x = 0u32;
    let mut cursor_y = 0u32;
    let mut row_height = 0u32;

    for ch in (32u8..127).map(|c| c as char) {
        let (metrics, bitmap) = font.rasterize(ch, BASE_SIZE);

        if cursor_x + metrics.width as u32 > ATLAS_SIZE {
            cursor_x = 0;
            cursor_y += row_height + 2;
            row_height = 0;
        }
        if cursor_y + metrics.height as u32 > ATLAS_SIZE {
            log::warn!("Text atlas full at {ch:?}, remaining glyphs dropped");
            break;
        }

        for y in 0..metrics.height {
            for x in 0..metrics.width {
                let idx = ((cursor_y + y as u32) * ATLAS_SIZE + cursor_x + x as u32) as usize;
                atlas[idx] = bitmap[y * metrics.width + x];
            }
        }

        glyph_info.insert(
            ch,
            GlyphInfo {
                x: cursor_x,
                y: cursor_y,
                width: metrics.width as u32,
                height: metrics.height as u32,
                advance: metrics.advance_width,
                offset_x: metrics.xmin as f32,
                offset_y: metrics.ymin as f32,
            },
        );

        row_height = row_height.max(metrics.height as u32);
        cursor_x += metrics.width as u32 + 2;
    }
}

/// 5x7 uppercase block face used when no font asset is present.
/// Each glyph is seven rows of five bits, MSB on the left.
const BLOCK_GLYPHS: &[(char, [u8; 7])] = &[
    ('A', [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11]),
    ('B', [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E]),
    ('C', [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E]),
    ('D', [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E]),
    ('E', [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F]),
    ('F', [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10]),
    ('G', [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F]),
    ('H', [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11]),
    ('I', [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E]),
    ('J', [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C]),
    ('K', [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11]),
    ('L', [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F]),
    ('M', [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11]),
    ('N', [0x11, 0x19, 0x15, 0x13, 0x11, 0x11, 0x11]),
    ('O', [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E]),
    ('P', [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10]),
    ('Q', [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D]),
    ('R', [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11]),
    ('S', [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E]),
    ('T', [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04]),
    ('U', [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E]),
    ('V', [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04]),
    ('W', [0x11, 0x11, 0x11, 0x15, 0x15, 0x1B, 0x11]),
    ('X', [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11]),
    ('Y', [0x11, 0x11, 0x0A, 0x04, 0x04, 0x04, 0x04]),
    ('Z', [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F]),
    ('0', [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E]),
    ('1', [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E]),
    ('2', [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F]),
    ('3', [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E]),
    ('4', [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02]),
    ('5', [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E]),
    ('6', [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E]),
    ('7', [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08]),
    ('8', [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E]),
    ('9', [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C]),
    (':', [0x00, 0x04, 0x04, 0x00, 0x04, 0x04, 0x00]),
    ('!', [0x04, 0x04, 0x04, 0x04, 0x04, 0x00, 0x04]),
    ('+', [0x00, 0x04, 0x04, 0x1F, 0x04, 0x04, 0x00]),
    ('-', [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00]),
    ('.', [0x00, 0x00, 0x00, 0x00, 0x00, 0x04, 0x04]),
    (',', [0x00, 0x00, 0x00, 0x00, 0x04, 0x04, 0x08]),
    ('/', [0x01, 0x01, 0x02, 0x04, 0x08, 0x10, 0x10]),
    ('(', [0x02, 0x04, 0x08, 0x08, 0x08, 0x04, 0x02]),
    (')', [0x08, 0x04, 0x02, 0x02, 0x02, 0x04, 0x08]),
];

fn rasterize_block_face(atlas: &mut [u8], glyph_info: &mut HashMap<char, GlyphInfo>) {
    // Scale each 5x7 cell by 6 for a ~42px tall face at the nominal size
    const SCALE: u32 = 6;
    const CELL_W: u32 = 5 * SCALE;
    const CELL_H: u32 = 7 * SCALE;

    let mut cursor_x = 0u32;
    let mut cursor_y = 0u32;

    // Space has no pixels, just an advance
    glyph_info.insert(
        ' ',
        GlyphInfo {
            x: 0,
            y: 0,
            width: 0,
            height: 0,
            advance: (CELL_W + SCALE) as f32 * 0.8,
            offset_x: 0.0,
            offset_y: 0.0,
        },
    );

    for &(ch, rows) in BLOCK_GLYPHS {
        if cursor_x + CELL_W > ATLAS_SIZE {
            cursor_x = 0;
            cursor_y += CELL_H + 2;
        }

        for (row_idx, row) in rows.iter().enumerate() {
            for bit in 0..5u32 {
                if row & (0x10 >> bit) == 0 {
                    continue;
                }
                for dy in 0..SCALE {
                    for dx in 0..SCALE {
                        let px = cursor_x + bit * SCALE + dx;
                        let py = cursor_y + row_idx as u32 * SCALE + dy;
                        atlas[(py * ATLAS_SIZE + px) as usize] = 0xFF;
                    }
                }
            }
        }

        glyph_info.insert(
            ch,
            GlyphInfo {
                x: cursor_x,
                y: cursor_y,
                width: CELL_W,
                height: CELL_H,
                advance: (CELL_W + SCALE) as f32,
                offset_x: 0.0,
                offset_y: 0.0,
            },
        );
        cursor_x += CELL_W + 2;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_face_covers_hud_strings() {
        let mut atlas = vec![0u8; (ATLAS_SIZE * ATLAS_SIZE) as usize];
        let mut glyphs = HashMap::new();
        rasterize_block_face(&mut atlas, &mut glyphs);

        for text in [
            "SCORE: 123",
            "HIGH SCORE: 456",
            "SHOTS: 2",
            "GAME OVER!",
            "NEW HIGH SCORE!",
            "PRESS R TO RESTART",
            "COMBO X3!",
            "+2 BONUS!",
            "CAT DASH",
        ] {
            for ch in text.chars().filter(|c| *c != ' ') {
                assert!(
                    glyphs.contains_key(&ch.to_ascii_uppercase()),
                    "missing block glyph for {ch:?}"
                );
            }
        }
    }

    #[test]
    fn test_block_glyphs_fit_atlas() {
        let mut atlas = vec![0u8; (ATLAS_SIZE * ATLAS_SIZE) as usize];
        let mut glyphs = HashMap::new();
        rasterize_block_face(&mut atlas, &mut glyphs);
        for info in glyphs.values() {
            assert!(info.x + info.width <= ATLAS_SIZE);
            assert!(info.y + info.height <= ATLAS_SIZE);
        }
    }
}
