use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use input_overlay::geometry::Point;
use input_overlay::input::{InputSource, ScrollEvent, ScrollOrigin};
use input_overlay::{EngineConfig, OverlayEngine, OverlayLayout, VirtualKey};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Random key levels and pointer jitter, reproducible across runs.
struct RandomInput {
    rng: ChaCha8Rng,
    pointer: Point,
}

impl InputSource for RandomInput {
    fn is_pressed(&mut self, _key: VirtualKey) -> input_overlay::Result<bool> {
        Ok(self.rng.gen_bool(0.1))
    }

    fn pointer_position(&mut self) -> input_overlay::Result<Option<Point>> {
        self.pointer.x += self.rng.gen_range(-4.0..4.0);
        self.pointer.y += self.rng.gen_range(-4.0..4.0);
        Ok(Some(self.pointer))
    }
}

/// A keyboard-sized layout: `keys` buttons plus a wheel and both cursor modes.
fn create_layout(keys: usize) -> OverlayLayout {
    let mut elements = Vec::with_capacity(keys + 3);
    for i in 0..keys {
        // Bind to letters and digits, with some codes shared between elements.
        let vk = if i % 2 == 0 { 0x41 + (i % 26) } else { 0x30 + (i % 10) };
        elements.push(format!(
            r#"{{ "id": "key{i}", "codes": {{ "winvk": {vk} }}, "pos": [{}, {}],
                 "sprite": {{ "normal": [0, 0, 32, 32] }} }}"#,
            (i % 20) * 34,
            (i / 20) * 34
        ));
    }
    elements.push(
        r#"{ "id": "wheel", "sprite": { "normal": [32, 0, 16, 16], "up": [48, 0, 16, 16], "down": [64, 0, 16, 16] } }"#
            .to_string(),
    );
    elements.push(
        r#"{ "id": "arrow", "sprite": { "normal": [80, 0, 16, 16] }, "cursor": { "mode": "arrow" } }"#
            .to_string(),
    );
    elements.push(
        r#"{ "id": "dot", "pos": [400, 200], "sprite": { "normal": [96, 0, 8, 8] }, "cursor": { "mode": "dot", "radius": 40 } }"#
            .to_string(),
    );

    let json = format!(
        r#"{{ "texture": {{ "file": "keys.png" }}, "canvas": {{ "size": [700, 300] }},
             "defaults": {{ "pressed_offset": [0, 32] }}, "elements": [{}] }}"#,
        elements.join(",")
    );
    OverlayLayout::from_json_str(&json).expect("benchmark layout is valid")
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_tick");
    group.measurement_time(Duration::from_secs(5));

    for keys in [16usize, 104, 400] {
        let layout = Arc::new(create_layout(keys));
        group.bench_with_input(BenchmarkId::from_parameter(keys), &layout, |b, layout| {
            let mut engine = OverlayEngine::new(Arc::clone(layout), EngineConfig::default());
            let mut input = RandomInput {
                rng: ChaCha8Rng::seed_from_u64(42),
                pointer: Point::new(500.0, 500.0),
            };
            let mut now = Instant::now();
            let mut tick = 0u64;
            b.iter(|| {
                now += Duration::from_millis(16);
                tick += 1;
                if tick % 7 == 0 {
                    let delta = if tick % 2 == 0 { 120 } else { -120 };
                    engine.handle_scroll(ScrollEvent::new(delta, ScrollOrigin::Global, now));
                }
                black_box(engine.tick(&mut input, now));
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_tick);
criterion_main!(benches);
