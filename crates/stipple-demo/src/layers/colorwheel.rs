use bytemuck::{Pod, Zeroable};

use stipple_engine::coords::PixelDims;
use stipple_engine::core::{Layer, LayerCtx};
use stipple_engine::render::{begin_pass, RenderCtx};

use super::pipeline::create_pipeline;

const SEGMENTS: usize = 12;
const VERTEX_COUNT: usize = SEGMENTS * 3;
const RADIUS: f32 = 0.95;
const DEGREES_PER_SECOND: f32 = 120.0;

/// Rim colors, one per 30° segment, starting at red.
#[rustfmt::skip]
const RIM_COLORS: [[f32; 3]; SEGMENTS] = [
    [1.00, 0.00, 0.00], // R
    [0.66, 0.33, 0.00],
    [0.50, 0.50, 0.00], // Y
    [0.33, 0.66, 0.00],
    [0.00, 1.00, 0.00], // G
    [0.00, 0.66, 0.33],
    [0.00, 0.50, 0.50], // C
    [0.00, 0.33, 0.66],
    [0.00, 0.00, 1.00], // B
    [0.33, 0.00, 0.66],
    [0.50, 0.00, 0.50], // M
    [0.66, 0.00, 0.33],
];

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct WheelVertex {
    pos: [f32; 2],
    color: [f32; 3],
}

impl WheelVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // pos
        1 => Float32x3  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<WheelVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Builds the wheel: one triangle per segment from two rim points to a white
/// center. `angle` rotates the wheel (radians); `x_scale` squeezes it
/// horizontally so it stays round on a non-square raster.
fn wheel_vertices(angle: f32, x_scale: f32) -> [WheelVertex; VERTEX_COUNT] {
    let rim = |k: usize| {
        let a = (k % SEGMENTS) as f32 * (std::f32::consts::TAU / SEGMENTS as f32) + angle;
        WheelVertex {
            pos: [RADIUS * a.cos() * x_scale, RADIUS * a.sin()],
            color: RIM_COLORS[k % SEGMENTS],
        }
    };
    let center = WheelVertex {
        pos: [0.0, 0.0],
        color: [1.0, 1.0, 1.0],
    };

    let mut out = [center; VERTEX_COUNT];
    for k in 0..SEGMENTS {
        out[k * 3] = rim(k);
        out[k * 3 + 1] = rim(k + 1);
    }
    out
}

/// Spinning twelve-color wheel.
#[derive(Default)]
pub struct ColorWheel {
    pipeline: Option<wgpu::RenderPipeline>,
    vbo: Option<wgpu::Buffer>,
}

impl ColorWheel {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_resources(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline.is_none() {
            self.pipeline = Some(create_pipeline(
                ctx,
                "stipple colorwheel",
                include_str!("shaders/colorwheel.wgsl"),
                &[WheelVertex::layout()],
                &[],
            ));
        }

        if self.vbo.is_none() {
            self.vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("stipple colorwheel vbo"),
                size: (VERTEX_COUNT * std::mem::size_of::<WheelVertex>()) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
        }
    }
}

impl Layer for ColorWheel {
    fn update(&mut self, ctx: &mut LayerCtx<'_>, elapsed: f32, _dims: PixelDims) {
        let rctx = ctx.backend().render_ctx();
        self.ensure_resources(&rctx);

        let angle = (elapsed * DEGREES_PER_SECOND).to_radians();
        let x_scale = 1.0 / rctx.aspect();
        let vertices = wheel_vertices(angle, x_scale);

        if let Some(vbo) = self.vbo.as_ref() {
            rctx.queue.write_buffer(vbo, 0, bytemuck::cast_slice(&vertices));
        }
        ctx.check("colorwheel upload");
    }

    fn render(&mut self, ctx: &mut LayerCtx<'_>) {
        let (Some(pipeline), Some(vbo)) = (self.pipeline.as_ref(), self.vbo.as_ref()) else {
            return;
        };

        ctx.backend().encode("stipple colorwheel", |_, target| {
            let mut pass = begin_pass(target, "stipple colorwheel pass", wgpu::LoadOp::Load);
            pass.set_pipeline(pipeline);
            pass.set_vertex_buffer(0, vbo.slice(..));
            pass.draw(0..VERTEX_COUNT as u32, 0..1);
        });
        ctx.check("colorwheel draw");
    }
}
