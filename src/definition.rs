//! Immutable service and parameter definitions and their ordered chains.

use std::collections::HashMap;

use crate::{Argument, ConfigValue};

/// A compiled service definition: name, class, and ordered arguments.
///
/// Created during compilation and immutable afterwards. The class name is
/// stored in canonical form (leading `::` stripped) so registry lookups
/// are insensitive to how the configuration spelled it.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDefinition {
    name: String,
    class_name: String,
    arguments: Vec<Argument>,
    public: bool,
}

impl ServiceDefinition {
    /// Creates a service definition, canonicalizing the class name.
    pub fn new(
        name: impl Into<String>,
        class_name: impl Into<String>,
        arguments: Vec<Argument>,
        public: bool,
    ) -> Self {
        Self {
            name: name.into(),
            class_name: canonical_class_name(&class_name.into()),
            arguments,
            public,
        }
    }

    /// The service name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The canonical class name
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Constructor arguments in positional order
    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    /// Declared visibility (metadata only, defaults to public)
    pub fn is_public(&self) -> bool {
        self.public
    }
}

/// A compiled parameter definition: name and verbatim value.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDefinition {
    name: String,
    value: ConfigValue,
}

impl ParameterDefinition {
    /// Creates a parameter definition.
    pub fn new(name: impl Into<String>, value: ConfigValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// The parameter name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The stored value
    pub fn value(&self) -> &ConfigValue {
        &self.value
    }
}

/// Canonical form of a class name: any leading `::` stripped.
pub(crate) fn canonical_class_name(class_name: &str) -> String {
    class_name.trim_start_matches("::").to_string()
}

/// Insertion-ordered, name-keyed collection of service definitions.
///
/// Lookup by name is O(1); iteration follows insertion order. Adding a
/// definition under an existing name replaces the stored definition in
/// place, keeping the first insertion's position (last write wins).
#[derive(Debug, Clone, Default)]
pub struct ServiceDefinitionChain {
    order: Vec<ServiceDefinition>,
    index: HashMap<String, usize>,
}

impl ServiceDefinitionChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a definition, replacing any previous one with the same name.
    pub fn add(&mut self, definition: ServiceDefinition) {
        match self.index.get(definition.name()) {
            Some(&position) => self.order[position] = definition,
            None => {
                self.index
                    .insert(definition.name().to_string(), self.order.len());
                self.order.push(definition);
            }
        }
    }

    /// Whether a definition with this name exists
    pub fn has(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// The definition with this name, if any
    pub fn get(&self, name: &str) -> Option<&ServiceDefinition> {
        self.index.get(name).map(|&position| &self.order[position])
    }

    /// Definitions in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &ServiceDefinition> {
        self.order.iter()
    }

    /// Number of definitions
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the chain is empty
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Insertion-ordered, name-keyed collection of parameter definitions.
///
/// Same ordering and replacement semantics as [`ServiceDefinitionChain`].
#[derive(Debug, Clone, Default)]
pub struct ParameterDefinitionChain {
    order: Vec<ParameterDefinition>,
    index: HashMap<String, usize>,
}

impl ParameterDefinitionChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a definition, replacing any previous one with the same name.
    pub fn add(&mut self, definition: ParameterDefinition) {
        match self.index.get(definition.name()) {
            Some(&position) => self.order[position] = definition,
            None => {
                self.index
                    .insert(definition.name().to_string(), self.order.len());
                self.order.push(definition);
            }
        }
    }

    /// Whether a definition with this name exists
    pub fn has(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// The definition with this name, if any
    pub fn get(&self, name: &str) -> Option<&ParameterDefinition> {
        self.index.get(name).map(|&position| &self.order[position])
    }

    /// Definitions in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &ParameterDefinition> {
        self.order.iter()
    }

    /// Number of definitions
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the chain is empty
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(name: &str, class: &str) -> ServiceDefinition {
        ServiceDefinition::new(name, class, Vec::new(), true)
    }

    #[test]
    fn test_class_name_canonicalization() {
        assert_eq!(definition("a", "::app::Foo").class_name(), "app::Foo");
        assert_eq!(definition("a", "app::Foo").class_name(), "app::Foo");
    }

    #[test]
    fn test_chain_preserves_insertion_order() {
        let mut chain = ServiceDefinitionChain::new();
        chain.add(definition("foo", "Foo"));
        chain.add(definition("goo", "Goo"));
        chain.add(definition("moo", "Moo"));

        let names: Vec<&str> = chain.iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["foo", "goo", "moo"]);
        assert!(chain.has("goo"));
        assert_eq!(chain.get("moo").unwrap().class_name(), "Moo");
        assert_eq!(chain.len(), 3);
    }

    #[test]
    fn test_last_write_wins_keeps_position() {
        let mut chain = ServiceDefinitionChain::new();
        chain.add(definition("foo", "First"));
        chain.add(definition("bar", "Bar"));
        chain.add(definition("foo", "Second"));

        assert_eq!(chain.len(), 2);
        assert_eq!(chain.get("foo").unwrap().class_name(), "Second");
        let names: Vec<&str> = chain.iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["foo", "bar"]);
    }

    #[test]
    fn test_parameter_chain_lookup() {
        let mut chain = ParameterDefinitionChain::new();
        chain.add(ParameterDefinition::new(
            "my.parameter",
            ConfigValue::from("my.value"),
        ));

        assert!(chain.has("my.parameter"));
        assert!(!chain.has("missing"));
        assert_eq!(
            chain.get("my.parameter").unwrap().value().as_str().unwrap(),
            "my.value"
        );
    }
}
