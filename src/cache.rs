//! Cache-source generation: a pre-resolved, directly-executable artifact.
//!
//! Given a fully compiled definition model, [`CacheBuilder`] emits Rust
//! source for a specialized graph type with one method per service. Each
//! method constructs its service directly, with every argument inlined:
//! nested method calls for service references, parameter-table lookups
//! for parameter references, and literal expressions for values. The
//! output is deterministic: identical definition models yield
//! byte-identical source, so callers can invalidate by file presence
//! alone.

use std::collections::HashMap;

use crate::{
    Argument, ConfigValue, DiError, DiResult, ParameterDefinitionChain, ServiceDefinitionChain,
};

/// Generates the cache artifact source for a compiled definition model.
///
/// # Examples
///
/// ```rust
/// use lattice_di::{
///     CacheBuilder, ParameterDefinitionChain, ServiceDefinition, ServiceDefinitionChain,
/// };
///
/// let mut services = ServiceDefinitionChain::new();
/// services.add(ServiceDefinition::new("moo", "app::Moo", Vec::new(), true));
/// let parameters = ParameterDefinitionChain::new();
///
/// let source = CacheBuilder::new(&services, &parameters).build().unwrap();
/// assert!(source.contains("pub fn get_service_moo"));
/// ```
pub struct CacheBuilder<'a> {
    services: &'a ServiceDefinitionChain,
    parameters: &'a ParameterDefinitionChain,
}

impl<'a> CacheBuilder<'a> {
    /// Creates a builder over compiled definition chains.
    pub fn new(
        services: &'a ServiceDefinitionChain,
        parameters: &'a ParameterDefinitionChain,
    ) -> Self {
        Self {
            services,
            parameters,
        }
    }

    /// Builds the artifact source.
    ///
    /// Fails with `CacheNameCollision` when two distinct service names
    /// sanitize to the same method name.
    pub fn build(&self) -> DiResult<String> {
        self.check_method_collisions()?;

        let mut out = String::new();
        out.push_str("//! Pre-resolved service graph generated by lattice-di. Do not edit.\n");
        out.push_str("\n");
        out.push_str("use std::collections::BTreeMap;\n");
        out.push_str("\n");
        out.push_str("use lattice_di::{\n");
        out.push_str("    CompiledGraph, ConfigValue, DiResult, FactoryRegistry, ResolvedArgument, ServiceRef,\n");
        out.push_str("};\n");
        out.push_str("\n");
        out.push_str("/// Directly-executable service graph for a compiled configuration.\n");
        out.push_str("pub struct GeneratedGraph {\n");
        out.push_str("    registry: FactoryRegistry,\n");
        out.push_str("    parameters: BTreeMap<String, ConfigValue>,\n");
        out.push_str("}\n");
        out.push_str("\n");
        out.push_str("impl GeneratedGraph {\n");
        self.build_constructor_block(&mut out);
        self.build_service_block(&mut out);
        out.push_str("}\n");
        out.push_str("\n");
        self.build_dispatch_block(&mut out);

        Ok(out)
    }

    /// Emits `new()`, inlining the parameter table once.
    fn build_constructor_block(&self, out: &mut String) {
        out.push_str("    /// Creates the graph over the registry it was generated for.\n");
        out.push_str("    pub fn new(registry: FactoryRegistry) -> Self {\n");
        if self.parameters.is_empty() {
            out.push_str("        let parameters = BTreeMap::new();\n");
        } else {
            out.push_str("        let mut parameters = BTreeMap::new();\n");
            for definition in self.parameters.iter() {
                out.push_str(&format!(
                    "        parameters.insert({:?}.to_string(), {});\n",
                    definition.name(),
                    render_value(definition.value())
                ));
            }
        }
        out.push_str("        Self { registry, parameters }\n");
        out.push_str("    }\n");
    }

    /// Emits one construction method per service.
    fn build_service_block(&self, out: &mut String) {
        for definition in self.services.iter() {
            let method = Self::cached_service_method_name(definition.name());

            out.push_str("\n");
            out.push_str(&format!(
                "    /// Return instance of service `{}`\n",
                definition.name()
            ));
            out.push_str(&format!("    pub fn {}(&self) -> DiResult<ServiceRef> {{\n", method));

            if definition.arguments().is_empty() {
                out.push_str(&format!(
                    "        self.registry.construct({:?}, &[])\n",
                    definition.class_name()
                ));
            } else {
                out.push_str("        self.registry.construct(\n");
                out.push_str(&format!("            {:?},\n", definition.class_name()));
                out.push_str("            &[\n");
                for argument in definition.arguments() {
                    out.push_str(&format!(
                        "                {},\n",
                        render_argument(argument)
                    ));
                }
                out.push_str("            ],\n");
                out.push_str("        )\n");
            }

            out.push_str("    }\n");
        }
    }

    /// Emits the `CompiledGraph` impl dispatching by method name.
    fn build_dispatch_block(&self, out: &mut String) {
        out.push_str("impl CompiledGraph for GeneratedGraph {\n");
        out.push_str("    fn construct(&self, method: &str) -> Option<DiResult<ServiceRef>> {\n");
        out.push_str("        match method {\n");
        for definition in self.services.iter() {
            let method = Self::cached_service_method_name(definition.name());
            out.push_str(&format!(
                "            {:?} => Some(self.{}()),\n",
                method, method
            ));
        }
        out.push_str("            _ => None,\n");
        out.push_str("        }\n");
        out.push_str("    }\n");
        out.push_str("\n");
        out.push_str("    fn parameter(&self, name: &str) -> Option<&ConfigValue> {\n");
        out.push_str("        self.parameters.get(name)\n");
        out.push_str("    }\n");
        out.push_str("}\n");
    }

    /// The generated method name serving a service.
    pub fn cached_service_method_name(service_name: &str) -> String {
        format!("get_service_{}", Self::sanitize_service_name(service_name))
    }

    /// Sanitizes a service name for use in a method name: every character
    /// outside `[A-Za-z0-9_]` becomes `_`.
    pub fn sanitize_service_name(service_name: &str) -> String {
        service_name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
            .collect()
    }

    /// Distinct service names must keep distinct method names after
    /// sanitization; a collision would silently serve the wrong service.
    fn check_method_collisions(&self) -> DiResult<()> {
        let mut seen: HashMap<String, &str> = HashMap::new();
        for definition in self.services.iter() {
            let method = Self::cached_service_method_name(definition.name());
            if let Some(first) = seen.get(&method) {
                return Err(DiError::CacheNameCollision {
                    first: first.to_string(),
                    second: definition.name().to_string(),
                    method,
                });
            }
            seen.insert(method, definition.name());
        }
        Ok(())
    }
}

/// Renders one argument as the expression inlined into a method body.
fn render_argument(argument: &Argument) -> String {
    match argument {
        Argument::Service(reference) => format!(
            "ResolvedArgument::Service(self.{}()?)",
            CacheBuilder::cached_service_method_name(reference)
        ),
        Argument::Parameter(reference) => format!(
            "ResolvedArgument::Value(self.parameters[{:?}].clone())",
            reference
        ),
        Argument::Value(value) => format!("ResolvedArgument::Value({})", render_value(value)),
    }
}

/// Renders a value as a canonical Rust expression reproducing it exactly.
fn render_value(value: &ConfigValue) -> String {
    match value {
        ConfigValue::Null => "ConfigValue::Null".to_string(),
        ConfigValue::Boolean(b) => format!("ConfigValue::Boolean({})", b),
        ConfigValue::Integer(i) => format!("ConfigValue::Integer({})", i),
        ConfigValue::Float(f) => {
            if f.is_nan() {
                "ConfigValue::Float(f64::NAN)".to_string()
            } else if f.is_infinite() {
                if f.is_sign_positive() {
                    "ConfigValue::Float(f64::INFINITY)".to_string()
                } else {
                    "ConfigValue::Float(f64::NEG_INFINITY)".to_string()
                }
            } else {
                format!("ConfigValue::Float({:?})", f)
            }
        }
        ConfigValue::String(s) => format!("ConfigValue::String({:?}.to_string())", s),
        ConfigValue::Array(items) => {
            let rendered: Vec<String> = items.iter().map(render_value).collect();
            format!("ConfigValue::Array(vec![{}])", rendered.join(", "))
        }
        ConfigValue::Object(map) => {
            if map.is_empty() {
                return "ConfigValue::Object(BTreeMap::new())".to_string();
            }
            let rendered: Vec<String> = map
                .iter()
                .map(|(key, value)| {
                    format!("({:?}.to_string(), {})", key, render_value(value))
                })
                .collect();
            format!(
                "ConfigValue::Object(BTreeMap::from([{}]))",
                rendered.join(", ")
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_sanitize_service_name() {
        assert_eq!(CacheBuilder::sanitize_service_name("foo"), "foo");
        assert_eq!(CacheBuilder::sanitize_service_name("my.service"), "my_service");
        assert_eq!(CacheBuilder::sanitize_service_name("a-b c"), "a_b_c");
        assert_eq!(CacheBuilder::sanitize_service_name("under_score9"), "under_score9");
    }

    #[test]
    fn test_cached_service_method_name() {
        assert_eq!(
            CacheBuilder::cached_service_method_name("my.parameter-ish"),
            "get_service_my_parameter_ish"
        );
    }

    #[test]
    fn test_render_scalars() {
        assert_eq!(render_value(&ConfigValue::Null), "ConfigValue::Null");
        assert_eq!(
            render_value(&ConfigValue::Boolean(true)),
            "ConfigValue::Boolean(true)"
        );
        assert_eq!(
            render_value(&ConfigValue::Integer(-7)),
            "ConfigValue::Integer(-7)"
        );
        assert_eq!(
            render_value(&ConfigValue::Float(2.5)),
            "ConfigValue::Float(2.5)"
        );
        assert_eq!(
            render_value(&ConfigValue::String("it \"quotes\"".to_string())),
            "ConfigValue::String(\"it \\\"quotes\\\"\".to_string())"
        );
    }

    #[test]
    fn test_render_composites() {
        let rendered = render_value(&ConfigValue::Array(vec![
            ConfigValue::Integer(1),
            ConfigValue::Null,
        ]));
        assert_eq!(
            rendered,
            "ConfigValue::Array(vec![ConfigValue::Integer(1), ConfigValue::Null])"
        );

        let mut map = BTreeMap::new();
        map.insert("k".to_string(), ConfigValue::Boolean(false));
        assert_eq!(
            render_value(&ConfigValue::Object(map)),
            "ConfigValue::Object(BTreeMap::from([(\"k\".to_string(), ConfigValue::Boolean(false))]))"
        );

        assert_eq!(
            render_value(&ConfigValue::Object(BTreeMap::new())),
            "ConfigValue::Object(BTreeMap::new())"
        );
    }

    #[test]
    fn test_render_arguments() {
        assert_eq!(
            render_argument(&Argument::Service("my.mailer".to_string())),
            "ResolvedArgument::Service(self.get_service_my_mailer()?)"
        );
        assert_eq!(
            render_argument(&Argument::Parameter("smtp.host".to_string())),
            "ResolvedArgument::Value(self.parameters[\"smtp.host\"].clone())"
        );
        assert_eq!(
            render_argument(&Argument::Value(ConfigValue::Integer(25))),
            "ResolvedArgument::Value(ConfigValue::Integer(25))"
        );
    }
}
