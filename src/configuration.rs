//! Raw container configuration: the declarative name → entry map.

use std::collections::HashMap;

use crate::ConfigValue;
#[cfg(feature = "config")]
use crate::{DiError, DiResult};

/// A raw service entry before compilation.
///
/// Carries the declared class, the raw argument tokens (strings prefixed
/// `@` or `~` become references during compilation, everything else is a
/// literal), and the optional `public` flag.
///
/// # Examples
///
/// ```rust
/// use lattice_di::{Configuration, ServiceEntry};
///
/// let mut configuration = Configuration::new();
/// configuration.set_service(
///     "mailer",
///     ServiceEntry::new("app::Mailer")
///         .arg("~smtp.host")
///         .arg("@transport"),
/// );
/// configuration.set_service("transport", ServiceEntry::new("app::Transport"));
/// configuration.set_parameter("smtp.host", "localhost");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceEntry {
    class: String,
    arguments: Vec<ConfigValue>,
    public: bool,
}

impl ServiceEntry {
    /// Creates a service entry for the given class, with no arguments.
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            arguments: Vec::new(),
            public: true,
        }
    }

    /// Appends one raw argument token.
    pub fn arg(mut self, token: impl Into<ConfigValue>) -> Self {
        self.arguments.push(token.into());
        self
    }

    /// Replaces the argument token list.
    pub fn with_arguments(mut self, tokens: Vec<ConfigValue>) -> Self {
        self.arguments = tokens;
        self
    }

    /// Marks the service as private.
    pub fn private(mut self) -> Self {
        self.public = false;
        self
    }

    /// The declared class name, as written in the configuration
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Raw argument tokens in positional order
    pub fn arguments(&self) -> &[ConfigValue] {
        &self.arguments
    }

    /// Declared visibility
    pub fn is_public(&self) -> bool {
        self.public
    }
}

/// One raw configuration entry: a service record or a parameter value.
///
/// Classification rule: an entry is a service iff it is a structured
/// record carrying a `class` key; any other value is a parameter, used
/// verbatim including nested composites.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigEntry {
    /// A class-backed service declaration
    Service(ServiceEntry),
    /// A plain parameter value
    Parameter(ConfigValue),
}

/// The raw container configuration: an insertion-ordered map of names to
/// service or parameter entries.
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    entries: Vec<(String, ConfigEntry)>,
    index: HashMap<String, usize>,
}

impl Configuration {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a service under `name`, replacing any previous entry.
    pub fn set_service(&mut self, name: impl Into<String>, entry: ServiceEntry) {
        self.set(name.into(), ConfigEntry::Service(entry));
    }

    /// Declares a parameter under `name`, replacing any previous entry.
    pub fn set_parameter(&mut self, name: impl Into<String>, value: impl Into<ConfigValue>) {
        self.set(name.into(), ConfigEntry::Parameter(value.into()));
    }

    fn set(&mut self, name: String, entry: ConfigEntry) {
        match self.index.get(&name) {
            Some(&position) => self.entries[position] = (name, entry),
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push((name, entry));
            }
        }
    }

    /// The entry declared under `name`, if any
    pub fn get(&self, name: &str) -> Option<&ConfigEntry> {
        self.index
            .get(name)
            .map(|&position| &self.entries[position].1)
    }

    /// Entries in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigEntry)> {
        self.entries
            .iter()
            .map(|(name, entry)| (name.as_str(), entry))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the configuration is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Loads a configuration from a JSON object string.
    ///
    /// Each key maps to either a service (a JSON object containing a
    /// `"class"` key, with optional `"arguments"` array and `"public"`
    /// flag) or a parameter (any other value, kept verbatim). Declaration
    /// order is preserved.
    ///
    /// A non-string `"class"` value is carried through as its JSON text
    /// and rejected later, at compile time, as `ClassNotFound`.
    #[cfg(feature = "config")]
    pub fn from_json_str(content: &str) -> DiResult<Self> {
        let root: serde_json::Value = serde_json::from_str(content)
            .map_err(|_| DiError::TypeMismatch("invalid JSON configuration"))?;

        let object = root
            .as_object()
            .ok_or(DiError::TypeMismatch("configuration root is not an object"))?;

        let mut configuration = Configuration::new();
        for (name, value) in object {
            match value.as_object().filter(|map| map.contains_key("class")) {
                Some(record) => {
                    let class = match &record["class"] {
                        serde_json::Value::String(class) => class.clone(),
                        other => other.to_string(),
                    };

                    let mut entry = ServiceEntry::new(class);
                    if let Some(tokens) = record.get("arguments") {
                        let tokens = tokens.as_array().ok_or(DiError::TypeMismatch(
                            "service arguments must be an array",
                        ))?;
                        entry = entry
                            .with_arguments(tokens.iter().map(json_to_value).collect());
                    }
                    if let Some(false) = record.get("public").and_then(|p| p.as_bool()) {
                        entry = entry.private();
                    }

                    configuration.set_service(name.as_str(), entry);
                }
                None => configuration.set_parameter(name.as_str(), json_to_value(value)),
            }
        }

        Ok(configuration)
    }
}

#[cfg(feature = "config")]
fn json_to_value(value: &serde_json::Value) -> ConfigValue {
    match value {
        serde_json::Value::Null => ConfigValue::Null,
        serde_json::Value::Bool(b) => ConfigValue::Boolean(*b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => ConfigValue::Integer(i),
            None => ConfigValue::Float(n.as_f64().unwrap_or(0.0)),
        },
        serde_json::Value::String(s) => ConfigValue::String(s.clone()),
        serde_json::Value::Array(items) => {
            ConfigValue::Array(items.iter().map(json_to_value).collect())
        }
        serde_json::Value::Object(map) => ConfigValue::Object(
            map.iter()
                .map(|(key, value)| (key.clone(), json_to_value(value)))
                .collect(),
        ),
    }
}
