//! Benchmarks for content compilation.

#![allow(clippy::format_push_string)] // Benchmark setup code, performance not critical

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use lm_markup::{GlossaryTerm, InstancePrefix, RenderContext, compile};

/// Generate a lesson with `sections` sections, each carrying every marker kind.
fn generate_lesson(sections: usize) -> String {
    let mut md = String::from("# Lesson\n\n");
    for i in 0..sections {
        md.push_str(&format!("## Section {i}\n\n"));
        md.push_str(&format!(
            "A [glossary-inline:term_{i} \"term {i}\"] fits in [drop-zone|w-60]. Answer: [inline-question:q_{i}]\n\n"
        ));
        md.push_str(&format!("[glossary:term_{i}]\n\n"));
        md.push_str("| Value | Unit |\n|---|---|\n| [drop-zone] | m/s |\n\n");
    }
    md
}

fn glossary(sections: usize) -> Vec<GlossaryTerm> {
    (0..sections)
        .map(|i| {
            GlossaryTerm::new(format!("term_{i}"))
                .with_value(format!("Term {i}"))
                .with_explanation("An explanation.")
        })
        .collect()
}

fn bench_compile_plain(c: &mut Criterion) {
    let ctx = RenderContext::new(InstancePrefix::new("bench").unwrap());
    let markdown = "# Hello\n\nSimple content with **bold** text.";

    c.bench_function("compile_plain_markdown", |b| {
        b.iter(|| compile(markdown, "markdown", &ctx));
    });
}

fn bench_compile_by_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile_by_size");

    for sections in [5, 20, 50] {
        let markdown = generate_lesson(sections);
        let terms = glossary(sections);
        let ctx = RenderContext::new(InstancePrefix::new("bench").unwrap()).with_glossary(&terms);

        group.throughput(Throughput::Bytes(markdown.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("markdown", format!("{sections}s")),
            &markdown,
            |b, md| b.iter(|| compile(md, "markdown", &ctx)),
        );
    }

    group.finish();
}

fn bench_nested_tables(c: &mut Criterion) {
    let ctx = RenderContext::new(InstancePrefix::new("bench").unwrap());
    let mut group = c.benchmark_group("nested_tables");

    for depth in [1, 4, 8] {
        let mut html = String::from(r#"<span id="drop-region-0" data-index="0"></span>"#);
        for _ in 0..depth {
            html = format!("<table><tr><td>{html}</td></tr></table>");
        }
        group.bench_with_input(BenchmarkId::new("html", depth), &html, |b, html| {
            b.iter(|| compile(html, "html", &ctx));
        });
    }

    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let terms = glossary(20);
    let ctx = RenderContext::new(InstancePrefix::new("bench").unwrap()).with_glossary(&terms);
    let compiled = compile(&generate_lesson(20), "markdown", &ctx);
    let root = compiled.mount_static().unwrap();

    c.bench_function("resolve_20_sections", |b| {
        b.iter(|| compiled.resolve(&root));
    });
}

criterion_group!(
    benches,
    bench_compile_plain,
    bench_compile_by_size,
    bench_nested_tables,
    bench_resolve
);
criterion_main!(benches);
