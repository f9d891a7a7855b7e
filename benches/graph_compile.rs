use std::path::Path;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use shortcast::config::ComposerConfig;
use shortcast::domain::model::{DisplayMode, MixMode};
use shortcast::graph::GraphCompiler;
use shortcast::planner::{LayoutPlanner, TextWrapper, TimingPlanner};

fn bench_graph_compile(c: &mut Criterion) {
    let config = ComposerConfig::default();
    let mut audio = config.audio.clone();
    audio.mix_mode = MixMode::Mix;
    let compiler = GraphCompiler::new(config.text.clone(), config.bar.clone(), audio);
    let timing = TimingPlanner::new(DisplayMode::HeadlineReappear, 3.0, 11.0, 0.8).plan(18.5);
    let layout = LayoutPlanner::from_config(&config.layout, &config.text, &config.bar).plan();
    let textfile = Path::new("/tmp/shortcast-bench/tagline.txt");

    c.bench_function("compile_mixed_graph", |b| {
        b.iter(|| {
            let graph = compiler.compile(
                black_box(&timing),
                black_box(&layout),
                textfile,
                true,
                true,
            );
            black_box(graph.program())
        })
    });
}

fn bench_wrap(c: &mut Criterion) {
    let wrapper = TextWrapper::new(1080, 72, 0.06, 2);
    let tagline = "Tomorrow is a road we pave together, one step at a time, until 2112";

    c.bench_function("wrap_tagline", |b| {
        b.iter(|| wrapper.wrap(black_box(tagline)))
    });
}

criterion_group!(benches, bench_graph_compile, bench_wrap);
criterion_main!(benches);
