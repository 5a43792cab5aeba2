use bytemuck::{Pod, Zeroable};

use stipple_engine::coords::PixelDims;
use stipple_engine::core::{Layer, LayerCtx};
use stipple_engine::render::{begin_pass, RenderCtx};

use super::pipeline::create_pipeline;

/// Flame color scheme.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum Palette {
    Blue,
    #[default]
    Red,
}

impl Palette {
    fn tint(self) -> [f32; 4] {
        match self {
            Palette::Blue => [0.15, 0.45, 1.0, 1.0],
            Palette::Red => [1.0, 0.35, 0.05, 1.0],
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct FlameParams {
    time: f32,
    _pad: f32,
    resolution: [f32; 2],
    tint: [f32; 4],
}

impl FlameParams {
    fn new(elapsed: f32, dims: PixelDims, palette: Palette) -> Self {
        Self {
            time: elapsed,
            _pad: 0.0,
            resolution: dims.to_f32(),
            tint: palette.tint(),
        }
    }
}

/// Procedural fire filling the whole target.
pub struct Flame {
    palette: Palette,
    pipeline: Option<wgpu::RenderPipeline>,
    ubo: Option<wgpu::Buffer>,
    bind_group: Option<wgpu::BindGroup>,
}

impl Flame {
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            pipeline: None,
            ubo: None,
            bind_group: None,
        }
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }

    fn ensure_resources(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline.is_some() {
            return;
        }

        let bgl = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("stipple flame bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("stipple flame params"),
            size: std::mem::size_of::<FlameParams>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("stipple flame bind group"),
            layout: &bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.as_entire_binding(),
            }],
        });

        self.pipeline = Some(create_pipeline(
            ctx,
            "stipple flame",
            include_str!("shaders/flame.wgsl"),
            &[],
            &[&bgl],
        ));
        self.ubo = Some(ubo);
        self.bind_group = Some(bind_group);
    }
}

impl Layer for Flame {
    fn update(&mut self, ctx: &mut LayerCtx<'_>, elapsed: f32, dims: PixelDims) {
        let rctx = ctx.backend().render_ctx();
        self.ensure_resources(&rctx);

        if let Some(ubo) = self.ubo.as_ref() {
            let params = FlameParams::new(elapsed, dims, self.palette);
            rctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&params));
        }
        ctx.check("flame upload");
    }

    fn render(&mut self, ctx: &mut LayerCtx<'_>) {
        let (Some(pipeline), Some(bind_group)) = (self.pipeline.as_ref(), self.bind_group.as_ref())
        else {
            return;
        };

        ctx.backend().encode("stipple flame", |_, target| {
            let mut pass = begin_pass(target, "stipple flame pass", wgpu::LoadOp::Load);
            pass.set_pipeline(pipeline);
            pass.set_bind_group(0, bind_group, &[]);
            pass.draw(0..3, 0..1);
        });
        ctx.check("flame draw");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_match_uniform_layout() {
        // Params in flame.wgsl: f32, f32, vec2<f32>, vec4<f32>.
        assert_eq!(std::mem::size_of::<FlameParams>(), 32);
    }

    #[test]
    fn params_carry_palette_tint() {
        let p = FlameParams::new(1.5, PixelDims::new(200, 100), Palette::Blue);
        assert_eq!(p.time, 1.5);
        assert_eq!(p.resolution, [200.0, 100.0]);
        assert!(p.tint[2] > p.tint[0]);

        let p = FlameParams::new(0.0, PixelDims::new(200, 100), Palette::Red);
        assert!(p.tint[0] > p.tint[2]);
    }

    #[test]
    fn default_palette_is_red() {
        assert_eq!(Palette::default(), Palette::Red);
        assert_eq!(Flame::new(Palette::default()).palette(), Palette::Red);
    }
}
