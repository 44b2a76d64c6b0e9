use chatbuddy::core::companion::CompanionId;
use chatbuddy::generator::mood::infer_mood;
use chatbuddy::generator::prompt::{build_prompt, PromptTurn};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn make_history(turns: usize) -> Vec<PromptTurn> {
    let user = "I had such a long day at work, can you cheer me up a little?";
    let ai = "Of course! Tell me everything, I'm always here to listen to you.";
    (0..turns)
        .map(|i| {
            if i % 2 == 0 {
                PromptTurn::user(user)
            } else {
                PromptTurn::ai(ai)
            }
        })
        .collect()
}

fn bench_build_prompt(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_prompt");
    for &turns in &[10usize, 100, 400] {
        let history = make_history(turns);
        group.throughput(Throughput::Elements(turns as u64));
        group.bench_function(BenchmarkId::from_parameter(turns), |b| {
            b.iter(|| build_prompt(&history, CompanionId::Girlfriend, "Jenny"))
        });
    }
    group.finish();
}

fn bench_infer_mood(c: &mut Criterion) {
    let no_match = "The weather report says clouds all afternoon. ".repeat(40);
    let late_match = format!("{no_match} and honestly I adore you");

    let mut group = c.benchmark_group("infer_mood");
    group.bench_function("short_happy", |b| {
        b.iter(|| infer_mood("That sounds wonderful, I'm so excited!"))
    });
    group.bench_function("long_no_keyword", |b| b.iter(|| infer_mood(&no_match)));
    group.bench_function("long_late_keyword", |b| b.iter(|| infer_mood(&late_match)));
    group.finish();
}

criterion_group!(benches, bench_build_prompt, bench_infer_mood);
criterion_main!(benches);
