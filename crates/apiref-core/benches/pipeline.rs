//! Benchmarks for the documentation pipeline.

use std::fmt::Write;
use std::sync::Arc;

use apiref_core::{Pipeline, PipelineConfig};
use apiref_doc::{Docs, Field, Function, Module, Package, Struct};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

/// Create a package with `modules` modules of `structs` structs each.
///
/// Every struct references a sibling and its first field, and the root
/// exports the first struct of every module.
fn create_docs(modules: usize, structs: usize) -> Docs {
    let mut root = Package::new("lib");
    let mut exports = String::from("Root package.\n\nExports:\n");

    for m in 0..modules {
        let mut module = Module::new(format!("mod{m}"));
        module.description = format!("Module {m}. See [.mod{m}.Type0].").into();
        for s in 0..structs {
            let mut item = Struct::new(format!("Type{s}"));
            item.summary = format!(
                "Struct {s}, next to [..mod{m}.Type{}] with [.Type{s}.field0 a field].",
                (s + 1) % structs
            )
            .into();
            item.description = "```\n[not.a.reference]\n```\nSee `[also.code]`.".into();
            item.fields.push(Field {
                name: "field0".to_owned(),
                summary: "A field.".into(),
                ..Field::default()
            });
            let mut method = Function::new("run");
            method.description = format!("Runs [..Type{s}].").into();
            item.functions.push(method);
            module.structs.push(Arc::new(item));
        }
        root.modules.push(module);
        let _ = writeln!(exports, " - mod{m}.Type0");
    }
    root.description = exports.into();

    Docs {
        version: "1.0.0".to_owned(),
        decl: root,
    }
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");

    for (modules, structs) in [(5, 10), (20, 25), (50, 50)] {
        let docs = create_docs(modules, structs);
        let id = format!("{modules}x{structs}");

        group.bench_with_input(BenchmarkId::new("identity", &id), &docs, |b, docs| {
            let pipeline = Pipeline::new(PipelineConfig {
                case_sensitive: true,
                ..PipelineConfig::default()
            });
            b.iter(|| pipeline.run(docs.clone()));
        });

        group.bench_with_input(BenchmarkId::new("exports", &id), &docs, |b, docs| {
            let pipeline = Pipeline::new(PipelineConfig {
                exports: true,
                case_sensitive: true,
                ..PipelineConfig::default()
            });
            b.iter(|| pipeline.run(docs.clone()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
