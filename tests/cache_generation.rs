use std::collections::BTreeMap;
use std::sync::Arc;

use lattice_di::{
    CacheBuilder, ConfigValue, Configuration, DiError, FactoryRegistry, Resolver, ServiceEntry,
    ServiceRef,
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

fn standard_configuration() -> Configuration {
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

fn build_standard_source() -> String {
    let mut resolver = Resolver::new(standard_configuration(), registry(), false);
    resolver.compile().unwrap();

    CacheBuilder::new(
        resolver.service_definitions().unwrap(),
        resolver.parameter_definitions().unwrap(),
    )
    .build()
    .unwrap()
}

#[test]
fn test_generation_is_deterministic() {
    let first = build_standard_source();
    let second = build_standard_source();
    assert_eq!(first, second); // Byte-identical across independent compiles
}

#[test]
fn test_one_method_per_service() {
    let source = build_standard_source();
    assert!(source.contains("pub fn get_service_foo(&self) -> DiResult<ServiceRef>"));
    assert!(source.contains("pub fn get_service_goo(&self) -> DiResult<ServiceRef>"));
    assert!(source.contains("pub fn get_service_moo(&self) -> DiResult<ServiceRef>"));
}

#[test]
fn test_sanitized_method_names() {
    let mut configuration = Configuration::new();
    configuration.set_service("my.mailer-v2", ServiceEntry::new("data::Foo"));

    let mut resolver = Resolver::new(configuration, registry(), false);
    resolver.compile().unwrap();
    let source = CacheBuilder::new(
        resolver.service_definitions().unwrap(),
        resolver.parameter_definitions().unwrap(),
    )
    .build()
    .unwrap();

    assert!(source.contains("pub fn get_service_my_mailer_v2"));
    assert!(source.contains("\"get_service_my_mailer_v2\" => Some(self.get_service_my_mailer_v2()),"));
}

#[test]
fn test_literal_arguments_are_inlined() {
    let source = build_standard_source();
    assert!(source.contains("ResolvedArgument::Value(ConfigValue::String(\"value1\".to_string()))"));
    assert!(source.contains(
        "ResolvedArgument::Value(ConfigValue::Array(vec![ConfigValue::String(\"value2\".to_string())]))"
    ));
}

#[test]
fn test_parameter_arguments_index_the_table() {
    let source = build_standard_source();
    assert!(source.contains("ResolvedArgument::Value(self.parameters[\"my.parameter\"].clone())"));
}

#[test]
fn test_service_arguments_become_nested_calls() {
    let source = build_standard_source();
    assert!(source.contains("ResolvedArgument::Service(self.get_service_foo()?)"));
    assert!(source.contains("ResolvedArgument::Service(self.get_service_moo()?)"));
}

#[test]
fn test_parameter_table_is_emitted_once() {
    let source = build_standard_source();
    assert!(source.contains(
        "parameters.insert(\"my.parameter\".to_string(), ConfigValue::String(\"my.value\".to_string()));"
    ));
    assert_eq!(source.matches("parameters.insert(").count(), 1);
}

#[test]
fn test_class_names_reach_the_registry_calls() {
    let source = build_standard_source();
    assert!(source.contains("self.registry.construct(\"data::Moo\", &[])"));
    assert!(source.contains("\"data::Foo\""));
    assert!(source.contains("\"data::Goo\""));
}

#[test]
fn test_dispatch_covers_every_service() {
    let source = build_standard_source();
    assert!(source.contains("impl CompiledGraph for GeneratedGraph"));
    assert!(source.contains("\"get_service_foo\" => Some(self.get_service_foo()),"));
    assert!(source.contains("\"get_service_goo\" => Some(self.get_service_goo()),"));
    assert!(source.contains("\"get_service_moo\" => Some(self.get_service_moo()),"));
}

#[test]
fn test_composite_parameter_rendering() {
    let mut nested = BTreeMap::new();
    nested.insert("enabled".to_string(), ConfigValue::Boolean(true));
    nested.insert("retries".to_string(), ConfigValue::Integer(3));

    let mut configuration = Configuration::new();
    configuration.set_parameter("settings", ConfigValue::Object(nested));
    configuration.set_parameter("weights", ConfigValue::Array(vec![
        ConfigValue::Float(0.5),
        ConfigValue::Null,
    ]));

    let mut resolver = Resolver::new(configuration, registry(), false);
    resolver.compile().unwrap();
    let source = CacheBuilder::new(
        resolver.service_definitions().unwrap(),
        resolver.parameter_definitions().unwrap(),
    )
    .build()
    .unwrap();

    assert!(source.contains(
        "ConfigValue::Object(BTreeMap::from([(\"enabled\".to_string(), ConfigValue::Boolean(true)), (\"retries\".to_string(), ConfigValue::Integer(3))]))"
    ));
    assert!(source.contains("ConfigValue::Array(vec![ConfigValue::Float(0.5), ConfigValue::Null])"));
}

#[test]
fn test_colliding_sanitized_names_fail_generation() {
    let mut configuration = Configuration::new();
    configuration.set_service("a.b", ServiceEntry::new("data::Foo"));
    configuration.set_service("a-b", ServiceEntry::new("data::Moo"));

    let mut resolver = Resolver::new(configuration, registry(), false);
    resolver.compile().unwrap();
    let error = CacheBuilder::new(
        resolver.service_definitions().unwrap(),
        resolver.parameter_definitions().unwrap(),
    )
    .build()
    .unwrap_err();

    assert_eq!(
        error,
        DiError::CacheNameCollision {
            first: "a.b".to_string(),
            second: "a-b".to_string(),
            method: "get_service_a_b".to_string(),
        }
    );
}

#[test]
fn test_empty_model_still_generates_a_unit() {
    let mut resolver = Resolver::new(Configuration::new(), registry(), false);
    resolver.compile().unwrap();
    let source = CacheBuilder::new(
        resolver.service_definitions().unwrap(),
        resolver.parameter_definitions().unwrap(),
    )
    .build()
    .unwrap();

    assert!(source.contains("pub struct GeneratedGraph"));
    assert!(source.contains("let parameters = BTreeMap::new();"));
    assert!(source.contains("_ => None,"));
}
