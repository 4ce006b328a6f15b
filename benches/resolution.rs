use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use lattice_di::{
    CacheBuilder, ConfigValue, Configuration, FactoryRegistry, Resolver, ServiceEntry, ServiceRef,
};

struct Foo;
struct Goo;
struct Moo;

fn registry() -> FactoryRegistry {
    let mut registry = FactoryRegistry::new();
    registry.register("data::Foo", |_| Ok(Arc::new(Foo) as ServiceRef));
    registry.register("data::Goo", |_| Ok(Arc::new(Goo) as ServiceRef));
    registry.register("data::Moo", |_| Ok(Arc::new(Moo) as ServiceRef));
    registry
}

fn configuration() -> Configuration {
    let mut configuration = Configuration::new();
    configuration.set_service(
        "foo",
        ServiceEntry::new("data::Foo")
            .arg("value1")
            .arg(ConfigValue::Array(vec![ConfigValue::from("value2")]))
            .arg("~my.parameter"),
    );
    configuration.set_service(
        "goo",
        ServiceEntry::new("data::Goo").arg("@foo").arg("@moo"),
    );
    configuration.set_service("moo", ServiceEntry::new("data::Moo"));
    configuration.set_parameter("my.parameter", "my.value");
    configuration
}

fn bench_memoized_get(c: &mut Criterion) {
    let mut resolver = Resolver::new(configuration(), registry(), false);
    resolver.compile().unwrap();

    // Prime the memo table
    let _ = resolver.get("goo").unwrap();

    c.bench_function("memoized_get", |b| {
        b.iter(|| {
            let service = resolver.get("goo").unwrap();
            black_box(service);
        })
    });
}

fn bench_compile_and_first_build(c: &mut Criterion) {
    c.bench_function("compile_and_first_build", |b| {
        b.iter_batched(
            || Resolver::new(configuration(), registry(), false),
            |mut resolver| {
                resolver.compile().unwrap();
                let service = resolver.get("goo").unwrap();
                black_box(service);
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

fn bench_parameter_lookup(c: &mut Criterion) {
    let mut resolver = Resolver::new(configuration(), registry(), false);
    resolver.compile().unwrap();

    c.bench_function("parameter_lookup", |b| {
        b.iter(|| {
            let value = resolver.get_parameter("my.parameter").unwrap();
            black_box(value);
        })
    });
}

fn bench_cache_generation(c: &mut Criterion) {
    let mut resolver = Resolver::new(configuration(), registry(), false);
    resolver.compile().unwrap();

    c.bench_function("cache_generation", |b| {
        b.iter(|| {
            let source = CacheBuilder::new(
                resolver.service_definitions().unwrap(),
                resolver.parameter_definitions().unwrap(),
            )
            .build()
            .unwrap();
            black_box(source);
        })
    });
}

criterion_group!(
    benches,
    bench_memoized_get,
    bench_compile_and_first_build,
    bench_parameter_lookup,
    bench_cache_generation
);
criterion_main!(benches);
