use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use lexdec_core::AnswerKeys;
use lexdec_render::{DEFAULT_FONT_PATH, SkiaRenderer, View, load_font};
use lexdec_timing::HighPrecisionTimer;

fn harness() -> Option<(SkiaRenderer, Vec<u8>, HighPrecisionTimer)> {
    let width = 1280u32;
    let height = 720u32;
    let font = load_font(DEFAULT_FONT_PATH).ok()?;
    let r = SkiaRenderer::new(width, height, font, AnswerKeys::default()).ok()?;
    let fb = vec![0u8; (width * height * 4) as usize];
    Some((r, fb, HighPrecisionTimer::new()))
}

pub fn bench_task_frame(c: &mut Criterion) {
    if harness().is_none() {
        eprintln!("skipping render_frame bench: no font at {DEFAULT_FONT_PATH}");
        return;
    }

    let mut g = c.benchmark_group("render_frame");
    g.sample_size(40);

    g.bench_function("task_frame", |b| {
        b.iter_batched(
            || harness().expect("harness"),
            |(mut r, mut fb, mut t)| {
                let view = View::Task {
                    stimulus: Some("garden"),
                    progress: (4, 10),
                    accepting: true,
                    hover: Some(false),
                };
                let stats = r.render_frame(&view, &mut fb, &mut t);
                black_box(stats.is_ok());
            },
            BatchSize::SmallInput,
        )
    });

    g.finish();
}

criterion_group!(benches, bench_task_frame);
criterion_main!(benches);
