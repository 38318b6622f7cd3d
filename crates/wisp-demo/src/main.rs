//! Sprite field demo.
//!
//! Spawns a few thousand world-space sprites on a golden-angle spiral (several
//! instanced batches), pans and zooms the camera, and draws a screen-space HUD
//! strip with one bar per batch of the previous frame. Every few seconds the
//! motes switch between a soft dot texture and flat squares.

use std::f32::consts::TAU;

use anyhow::Result;
use glam::Vec2;
use wisp_engine::core::{App, AppControl, FrameCtx};
use wisp_engine::device::GpuInit;
use wisp_engine::logging::{init_logging, LoggingConfig};
use wisp_engine::paint::Color;
use wisp_engine::render::sprites::{BatchStats, SpriteRenderer, SpriteRendererConfig, INSTANCE_COUNT};
use wisp_engine::sprite::{Camera2d, CameraCmd, SpriteCmd};
use wisp_engine::time::TargetInterval;
use wisp_engine::window::{Runtime, RuntimeConfig};

const MOTE_COUNT: usize = 5000;
const GOLDEN_ANGLE: f32 = 2.399_963;
const CLEAR: Color = Color::from_premul(0.02, 0.02, 0.05, 1.0);
const DOT_SIZE: u32 = 32;
const TEXTURE_PERIOD_SECS: f32 = 6.0;

struct Mote {
    home: Vec2,
    size: f32,
    spin: f32,
    color: Color,
}

struct SpriteField {
    renderer: SpriteRenderer,
    hud: SpriteRenderer,
    camera: Camera2d,
    motes: Vec<Mote>,
    dot: Vec<u8>,
    elapsed: f32,
    last_stats: BatchStats,
}

/// Premultiplied white disc fading towards its rim.
fn dot_pixels(size: u32) -> Vec<u8> {
    let half = size as f32 / 2.0;
    (0..size * size)
        .flat_map(|i| {
            let p = Vec2::new((i % size) as f32 + 0.5, (i / size) as f32 + 0.5) - Vec2::splat(half);
            let a = (1.0 - p.length() / half).clamp(0.0, 1.0).sqrt();
            [(a * 255.0) as u8; 4]
        })
        .collect()
}

impl SpriteField {
    fn new() -> Self {
        let motes = (0..MOTE_COUNT)
            .map(|i| {
                let t = i as f32;
                let angle = t * GOLDEN_ANGLE;
                let radius = 6.0 * t.sqrt();
                let hue = (t / MOTE_COUNT as f32) * TAU;
                Mote {
                    home: Vec2::from_angle(angle) * radius,
                    size: 4.0 + (i % 7) as f32,
                    spin: if i % 2 == 0 { 1.0 } else { -1.5 },
                    color: Color::from_straight(
                        0.5 + 0.5 * hue.cos(),
                        0.5 + 0.5 * (hue + TAU / 3.0).cos(),
                        0.5 + 0.5 * (hue + 2.0 * TAU / 3.0).cos(),
                        0.85,
                    ),
                }
            })
            .collect();

        Self {
            renderer: SpriteRenderer::new(),
            hud: SpriteRenderer::with_config(SpriteRendererConfig {
                label: "wisp hud".to_string(),
                ..SpriteRendererConfig::default()
            }),
            camera: Camera2d::default(),
            motes,
            dot: dot_pixels(DOT_SIZE),
            elapsed: 0.0,
            last_stats: BatchStats::default(),
        }
    }

    fn submit_world(&mut self) {
        let t = self.elapsed;
        let sprites = self.motes.iter().map(|m| {
            let wobble = Vec2::new((t + m.home.y * 0.01).sin(), (t + m.home.x * 0.01).cos()) * 3.0;
            SpriteCmd::new(m.home + wobble, Vec2::splat(m.size))
                .centered()
                .with_rotation(t * m.spin)
                .with_color(m.color)
        });
        self.renderer.extend(sprites);
    }

    fn submit_hud(&mut self) {
        let bar = Vec2::new(24.0, 6.0);
        for i in 0..self.last_stats.batches {
            let fill = if i + 1 == self.last_stats.batches {
                let rem = self.last_stats.sprites - i * INSTANCE_COUNT;
                rem as f32 / INSTANCE_COUNT as f32
            } else {
                1.0
            };
            let origin = Vec2::new(12.0 + i as f32 * (bar.x + 4.0), 12.0);
            self.hud.submit(
                SpriteCmd::new(origin, bar)
                    .with_color(Color::WHITE.with_opacity(0.2))
                    .screen_space(),
            );
            self.hud.submit(
                SpriteCmd::new(origin, bar)
                    .with_scale(Vec2::new(fill, 1.0))
                    .with_color(Color::from_rgba8(120, 220, 160, 255))
                    .screen_space(),
            );
        }
    }
}

impl App for SpriteField {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        self.elapsed += ctx.time.dt;
        let t = self.elapsed;

        self.camera.position = Vec2::new((t * 0.3).cos() * 120.0, (t * 0.2).sin() * 80.0);
        self.camera.zoom = 1.0 + 0.4 * (t * 0.25).sin();
        self.camera.rotation = 0.1 * (t * 0.15).sin();
        self.renderer.submit_camera(self.camera.to_cmd(ctx.window.viewport()));
        self.hud.submit_camera(CameraCmd::identity());

        self.submit_world();
        self.submit_hud();

        let want_dot = (t / TEXTURE_PERIOD_SECS) as u32 % 2 == 0;
        let (renderer, hud, dot) = (&mut self.renderer, &mut self.hud, &self.dot);
        let mut stats = None;
        ctx.render(CLEAR, |rctx, target| {
            if want_dot && !renderer.has_texture() {
                if let Err(e) = renderer.set_texture_rgba8(rctx, DOT_SIZE, DOT_SIZE, dot) {
                    log::error!("dot texture rejected: {e}");
                }
            } else if !want_dot && renderer.has_texture() {
                renderer.clear_texture();
            }

            match renderer.render(rctx, target) {
                Ok(s) => stats = Some(s),
                Err(e) => log::error!("sprite pass failed: {e}"),
            }
            if let Err(e) = hud.render(rctx, target) {
                log::error!("hud pass failed: {e}");
            }
        });
        renderer.flip();
        hud.flip();

        if let Some(s) = stats {
            self.last_stats = s;
        }
        if ctx.time.frame_index % 600 == 0 {
            log::info!(
                "frame {}: {} sprites in {} batches",
                ctx.time.frame_index,
                self.last_stats.sprites,
                self.last_stats.batches
            );
        }

        AppControl::Continue
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "wisp sprite field".to_string(),
        ..RuntimeConfig::default()
    };

    Runtime::run_paced(config, GpuInit::default(), TargetInterval::from_hz(120.0), SpriteField::new())
}
