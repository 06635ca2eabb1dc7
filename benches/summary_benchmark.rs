use chrono::{DateTime, Utc};
use coach_summary::models::AthleteProfile;
use coach_summary::services::ingest::parse_markdown_export;
use coach_summary::services::WeeklySummaryBuilder;
use criterion::{criterion_group, criterion_main, Criterion};
use std::fs;
use std::hint::black_box;

fn benchmark_weekly_summary(c: &mut Criterion) {
    let text = fs::read_to_string("tests/fixtures/training_export.md").expect("Failed to read fixture");
    let input = parse_markdown_export(&text)
        .expect("Failed to parse export")
        .into_input();

    let profile = AthleteProfile {
        max_hr_running: Some(192),
        max_hr_cycling: Some(185),
        hrv_baseline_ms: Some(55.0),
        ..Default::default()
    };
    let now: DateTime<Utc> = "2026-03-09T21:00:00Z".parse().expect("valid timestamp");

    let mut group = c.benchmark_group("weekly_summary");

    group.bench_function("parse_markdown_export", |b| {
        b.iter(|| parse_markdown_export(black_box(&text)))
    });

    group.bench_function("build_week", |b| {
        b.iter(|| WeeklySummaryBuilder::new(&profile).build(black_box(&input), now))
    });

    group.bench_function("build_four_weeks", |b| {
        b.iter(|| {
            WeeklySummaryBuilder::new(&profile)
                .window_days(28)
                .build(black_box(&input), now)
        })
    });

    group.finish();
}

criterion_group!(benches, benchmark_weekly_summary);
criterion_main!(benches);
