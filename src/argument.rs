//! Constructor arguments and the reference-marker dispatch rule.

use crate::ConfigValue;

/// Marker prefix identifying a service reference argument (`@name`).
pub const SERVICE_PREFIX: char = '@';

/// Marker prefix identifying a parameter reference argument (`~name`).
pub const PARAMETER_PREFIX: char = '~';

/// One constructor argument of a service definition.
///
/// Argument order is significant and matches constructor positional
/// order. A raw configuration token compiles into one of three variants:
///
/// - a string starting with `@` becomes a [`Argument::Service`] reference,
/// - a string starting with `~` becomes a [`Argument::Parameter`] reference,
/// - anything else is wrapped verbatim as [`Argument::Value`].
///
/// # Examples
///
/// ```rust
/// use lattice_di::{Argument, ConfigValue};
///
/// let service = Argument::from_token(&ConfigValue::from("@mailer"));
/// assert_eq!(service, Argument::Service("mailer".to_string()));
///
/// let parameter = Argument::from_token(&ConfigValue::from("~smtp.host"));
/// assert_eq!(parameter, Argument::Parameter("smtp.host".to_string()));
///
/// let literal = Argument::from_token(&ConfigValue::from(25i64));
/// assert_eq!(literal, Argument::Value(ConfigValue::Integer(25)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    /// A literal value, passed through unchanged at build time
    Value(ConfigValue),
    /// A reference to a parameter, resolved by parameter lookup
    Parameter(String),
    /// A reference to another service, resolved by recursive retrieval
    Service(String),
}

impl Argument {
    /// Compile a raw configuration token into an argument.
    ///
    /// The marker is stripped exactly once, so `"@@escaped"` becomes a
    /// service reference named `"@escaped"`.
    pub fn from_token(token: &ConfigValue) -> Argument {
        if let ConfigValue::String(s) = token {
            if let Some(name) = s.strip_prefix(SERVICE_PREFIX) {
                return Argument::Service(name.to_string());
            }
            if let Some(name) = s.strip_prefix(PARAMETER_PREFIX) {
                return Argument::Parameter(name.to_string());
            }
        }

        Argument::Value(token.clone())
    }

    /// The referenced service name, for service-reference arguments
    pub fn service_reference(&self) -> Option<&str> {
        match self {
            Argument::Service(name) => Some(name),
            _ => None,
        }
    }

    /// The referenced parameter name, for parameter-reference arguments
    pub fn parameter_reference(&self) -> Option<&str> {
        match self {
            Argument::Parameter(name) => Some(name),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_dispatch() {
        assert_eq!(
            Argument::from_token(&ConfigValue::from("@foo")),
            Argument::Service("foo".to_string())
        );
        assert_eq!(
            Argument::from_token(&ConfigValue::from("~my.parameter")),
            Argument::Parameter("my.parameter".to_string())
        );
        assert_eq!(
            Argument::from_token(&ConfigValue::from("value1")),
            Argument::Value(ConfigValue::String("value1".to_string()))
        );
    }

    #[test]
    fn test_marker_stripped_once() {
        assert_eq!(
            Argument::from_token(&ConfigValue::from("@@twice")),
            Argument::Service("@twice".to_string())
        );
        assert_eq!(
            Argument::from_token(&ConfigValue::from("~~twice")),
            Argument::Parameter("~twice".to_string())
        );
    }

    #[test]
    fn test_non_string_tokens_are_literals() {
        let token = ConfigValue::Array(vec![ConfigValue::from("@not-a-reference")]);
        match Argument::from_token(&token) {
            Argument::Value(ConfigValue::Array(items)) => {
                // Markers only apply to top-level string tokens
                assert_eq!(items[0], ConfigValue::String("@not-a-reference".to_string()));
            }
            other => panic!("expected literal, got {:?}", other),
        }
    }

    #[test]
    fn test_reference_accessors() {
        let service = Argument::Service("foo".to_string());
        assert_eq!(service.service_reference(), Some("foo"));
        assert_eq!(service.parameter_reference(), None);

        let literal = Argument::Value(ConfigValue::Null);
        assert_eq!(literal.service_reference(), None);
        assert_eq!(literal.parameter_reference(), None);
    }
}
