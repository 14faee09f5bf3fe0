//! Performance benchmarks for the per-frame display pipeline
//!
//! These benchmarks cover the hot path that runs once per display per frame:
//! arena sizing/carving and the full prepare pass.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use stratum::frame::format_code;
use stratum::{
    BufferHandle, BufferId, CompositionEngine, CompositionType, Display, DisplayConfigInfo,
    DisplayKind, DisplayState, EngineError, FrameContents, FrameLayer, LayerComposition,
    LayerStackArena, LayerStackView, PixelRect,
};

/// Engine stub that marks every non-target layer hardware-composed.
struct OverlayEngine;

impl CompositionEngine for OverlayEngine {
    fn prepare(&mut self, stack: &mut LayerStackView<'_>) -> Result<(), EngineError> {
        for layer in stack.layers.iter_mut() {
            if layer.composition != LayerComposition::GpuTarget {
                layer.composition = LayerComposition::Hardware;
            }
        }
        Ok(())
    }

    fn commit(&mut self, _stack: &mut LayerStackView<'_>) -> Result<(), EngineError> {
        Ok(())
    }

    fn set_vsync(&mut self, _enabled: bool) -> Result<(), EngineError> {
        Ok(())
    }

    fn set_display_state(&mut self, _state: DisplayState) -> Result<(), EngineError> {
        Ok(())
    }

    fn config(&self) -> Result<DisplayConfigInfo, EngineError> {
        Ok(DisplayConfigInfo {
            vsync_period_ns: 16_666_666,
            x_pixels: 1920,
            y_pixels: 1080,
            x_dpi: 160.0,
            y_dpi: 160.0,
        })
    }
}

fn frame_contents(layer_count: usize) -> FrameContents {
    let mut contents = FrameContents::default();
    for i in 0..layer_count {
        let composition = if i == layer_count - 1 {
            CompositionType::FramebufferTarget
        } else {
            CompositionType::Framebuffer
        };
        contents.layers.push(FrameLayer {
            buffer: Some(BufferHandle {
                id: BufferId(i as u64 + 1),
                format: format_code::RGBA_8888,
                width: 1920,
                height: 1080,
                fd: 3,
                offset: 0,
                stride: 1920,
                video: false,
                secure: false,
            }),
            display_frame: PixelRect::new(0, i as i32 * 10, 1920, i as i32 * 10 + 200),
            visible_region: vec![PixelRect::new(0, 0, 960, 200), PixelRect::new(960, 0, 1920, 200)],
            dirty_rect: PixelRect::new(0, 0, 1920, 200),
            composition,
            ..FrameLayer::default()
        });
    }
    contents
}

/// Benchmark arena sizing and carving across frame shapes
fn bench_arena_allocate(c: &mut Criterion) {
    let mut group = c.benchmark_group("arena_allocate");

    for layer_count in [2usize, 8, 32, 128].iter() {
        group.bench_with_input(
            format!("carve_{}_layers", layer_count),
            layer_count,
            |b, &layer_count| {
                let mut arena = LayerStackArena::new();
                let shape: Vec<u32> = (0..layer_count).map(|i| (i % 4) as u32).collect();

                // Warm the arena so the steady-state (reuse) path is measured.
                arena.allocate(shape.iter().copied()).unwrap();

                b.iter(|| {
                    arena.allocate(black_box(shape.iter().copied())).unwrap();
                    black_box(arena.layer_count());
                });
            },
        );
    }

    group.finish();
}

/// Benchmark the full prepare pass (translate + decide + write-back)
fn bench_prepare_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("prepare_pass");

    for layer_count in [2usize, 8, 32].iter() {
        group.bench_with_input(
            format!("prepare_{}_layers", layer_count),
            layer_count,
            |b, &layer_count| {
                b.iter_batched(
                    || {
                        let mut display = Display::new(DisplayKind::Primary, 0, OverlayEngine);
                        let mut contents = frame_contents(layer_count);
                        // Prime the cache so the steady-state diff is measured.
                        display.prepare(&mut contents).unwrap();
                        (display, frame_contents(layer_count))
                    },
                    |(mut display, mut contents)| {
                        display.prepare(black_box(&mut contents)).unwrap();
                        black_box(&contents);
                    },
                    BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_arena_allocate, bench_prepare_pass);
criterion_main!(benches);
