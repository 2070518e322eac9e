//! Benchmarks for type adapter resolution.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use persistgen::prelude::*;
use std::sync::Arc;

fn root() -> ProcessingContext {
    let root = ProcessingContext::new(ProcessorOptions::default(), Arc::new(NoOpDiagnosticSink));
    root.fork(Arc::new(
        DeclaredElement::new("MusicDatabase")
            .with_converter(ConverterDescriptor::new("DateToInstant", "Date", "Instant"))
            .with_converter(ConverterDescriptor::new("MoodToString", "Mood", "String")),
    ))
}

fn resolver_benchmark(c: &mut Criterion) {
    let database = root();
    let ty = TypeName::new("Date");

    c.bench_function("fork_shared_resolver", |b| {
        b.iter(|| {
            let dao = database.fork(Arc::new(DeclaredElement::new("SongDao")));
            black_box(dao.type_adapter_resolver().resolve(&ty))
        });
    });

    c.bench_function("fork_rebuilt_resolver", |b| {
        b.iter(|| {
            let resolver =
                TypeAdapterResolver::new(Arc::new(BuiltinAdapters::standard()), database.converters());
            black_box(resolver.resolve(&ty))
        });
    });

    c.bench_function("cached_resolve_type", |b| {
        b.iter(|| black_box(database.resolve_type(&ty)));
    });
}

criterion_group!(benches, resolver_benchmark);
criterion_main!(benches);
