use attune_engine::{AttuneConfig, AttuneEngine};
use attune_types::{ChannelReading, Context, Feedback, Mood, MoodState, UserProfile};
use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn readings() -> Vec<ChannelReading> {
    vec![
        ChannelReading::Pulse {
            bpm: 104.0,
            variability: 18.0,
            confidence: 0.9,
        },
        ChannelReading::Temperature {
            celsius: 37.2,
            trend: Default::default(),
            confidence: 0.8,
        },
        ChannelReading::Interaction {
            click_frequency: 9.0,
            typing_speed: 55.0,
            mouse_smoothness: 0.6,
            mouse_jitter: 0.8,
            scroll_velocity: 1.5,
            confidence: 0.7,
        },
        ChannelReading::Facial {
            emotion: "stressed".into(),
            confidence: 0.85,
        },
    ]
}

fn context(hour: u32) -> Context {
    Context::new(
        MoodState::with_scalars(Mood::Stressed, 0.8, 0.7, 0.3, 0.9),
        UserProfile::default(),
        NaiveDate::from_ymd_opt(2024, 3, 14)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap(),
    )
    .with_page("https://example.com/work/dashboard")
}

fn benchmark_fuse(c: &mut Criterion) {
    let mut engine = AttuneEngine::new(AttuneConfig::default()).unwrap();
    let readings = readings();

    c.bench_function("fuse_four_channels", |b| {
        b.iter(|| engine.fuse(black_box(&readings)))
    });
}

fn benchmark_decide_with_history(c: &mut Criterion) {
    let mut group = c.benchmark_group("decide");
    for resolved in [0usize, 100, 500] {
        let mut engine = AttuneEngine::new(AttuneConfig::default()).unwrap();
        let ctx = context(14);
        for i in 0..resolved {
            let decision = engine.decide(&ctx);
            let feedback = if i % 2 == 0 {
                Feedback::positive()
            } else {
                Feedback::negative()
            };
            engine.apply_feedback(&decision.record_id, feedback);
        }

        group.bench_with_input(BenchmarkId::from_parameter(resolved), &ctx, |b, ctx| {
            b.iter(|| engine.decide(black_box(ctx)))
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_fuse, benchmark_decide_with_history);
criterion_main!(benches);
