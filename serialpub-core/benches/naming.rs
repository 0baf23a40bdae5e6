//! Naming benchmarks: compile once, name many packages

use criterion::{criterion_group, criterion_main, Criterion};
use serialpub_core::{compile, Fc, NameGenerator, NamingRequest, Part, Series, Volume};

const EXPRESSION: &str = "t:legacy_t|n:fc_rm>p_split_part>v_split_volume>pn_0pad>vn_number>vn_0pad>vn_merge>pn_prepend_vn>pn_short>s_title>ss_rm_subtitle>to_string>str_filesafe|f:legacy_f";

fn requests() -> Vec<NamingRequest> {
    let series = Series::new("Rebuild World");
    let volumes: Vec<Volume> = (1..=3)
        .map(|n| Volume::new(n, format!("Rebuild World Volume {}", n)))
        .collect();
    let single = NamingRequest::new(
        series.clone(),
        volumes[..1].to_vec(),
        vec![Part::new(1, 2, "Rebuild World Volume 1 Part 2")],
        Fc::default(),
    );
    let several = NamingRequest::new(
        series,
        volumes.clone(),
        (1..=3)
            .flat_map(|v| (1..=4).map(move |p| Part::new(v, p, format!("Part {}", p))))
            .collect(),
        Fc::new(true, true),
    );
    [single, several].into_iter().filter_map(Result::ok).collect()
}

fn naming_benchmark(c: &mut Criterion) {
    c.bench_function("compile", |b| {
        b.iter(|| compile(Some(std::hint::black_box(EXPRESSION))))
    });

    let generator = match NameGenerator::from_expression(Some(EXPRESSION)) {
        Ok(generator) => generator,
        Err(e) => panic!("benchmark expression does not compile: {}", e),
    };
    let requests = requests();
    c.bench_function("generate", |b| {
        b.iter(|| {
            for request in &requests {
                let _ = std::hint::black_box(generator.generate(request));
            }
        })
    });
}

criterion_group!(benches, naming_benchmark);
criterion_main!(benches);
