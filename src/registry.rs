//! Factory registry: typed construction without reflection.
//!
//! Every class name a configuration may declare is mapped to a factory
//! function taking the resolved positional argument list. The compile
//! step validates that the registry knows every declared class, replacing
//! a "class exists" check against a runtime type system.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::definition::canonical_class_name;
use crate::{ConfigValue, DiError, DiResult};

/// A shared, type-erased service instance.
pub type ServiceRef = Arc<dyn Any + Send + Sync>;

/// A factory constructing one service instance from resolved arguments.
pub type ServiceFactory = Box<dyn Fn(&[ResolvedArgument]) -> DiResult<ServiceRef> + Send + Sync>;

/// One fully resolved constructor argument, as passed to a factory.
///
/// Literal and parameter-reference arguments arrive as values; service
/// references arrive as the already-built instance.
#[derive(Clone)]
pub enum ResolvedArgument {
    /// A literal or parameter value
    Value(ConfigValue),
    /// An already-built service instance
    Service(ServiceRef),
}

impl ResolvedArgument {
    /// The argument as a value
    pub fn value(&self) -> DiResult<&ConfigValue> {
        match self {
            ResolvedArgument::Value(value) => Ok(value),
            ResolvedArgument::Service(_) => {
                Err(DiError::TypeMismatch("argument is a service reference, not a value"))
            }
        }
    }

    /// The argument as a service instance of the requested type
    pub fn service<T: Send + Sync + 'static>(&self) -> DiResult<Arc<T>> {
        match self {
            ResolvedArgument::Service(service) => service
                .clone()
                .downcast::<T>()
                .map_err(|_| DiError::TypeMismatch("service argument is not of the requested type")),
            ResolvedArgument::Value(_) => {
                Err(DiError::TypeMismatch("argument is a value, not a service reference"))
            }
        }
    }
}

impl fmt::Debug for ResolvedArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedArgument::Value(value) => f.debug_tuple("Value").field(value).finish(),
            ResolvedArgument::Service(_) => f.debug_tuple("Service").field(&"..").finish(),
        }
    }
}

/// Registry of class names to service factories.
///
/// Class names are canonicalized on registration and lookup, so
/// `::app::Foo` and `app::Foo` name the same factory.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use lattice_di::{FactoryRegistry, ResolvedArgument, ServiceRef};
///
/// struct Mailer {
///     host: String,
/// }
///
/// let mut registry = FactoryRegistry::new();
/// registry.register("app::Mailer", |args| {
///     Ok(Arc::new(Mailer {
///         host: args[0].value()?.as_str()?.to_string(),
///     }) as ServiceRef)
/// });
///
/// let args = [ResolvedArgument::Value("localhost".into())];
/// let mailer = registry.construct("::app::Mailer", &args).unwrap();
/// let mailer = mailer.downcast::<Mailer>().ok().unwrap();
/// assert_eq!(mailer.host, "localhost");
/// ```
#[derive(Default)]
pub struct FactoryRegistry {
    factories: HashMap<String, ServiceFactory>,
}

impl FactoryRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory for a class name, replacing any previous one.
    pub fn register<F>(&mut self, class_name: impl Into<String>, factory: F)
    where
        F: Fn(&[ResolvedArgument]) -> DiResult<ServiceRef> + Send + Sync + 'static,
    {
        self.factories
            .insert(canonical_class_name(&class_name.into()), Box::new(factory));
    }

    /// Whether the registry knows this class name
    pub fn contains(&self, class_name: &str) -> bool {
        self.factories.contains_key(&canonical_class_name(class_name))
    }

    /// Constructs an instance of the class from resolved arguments.
    pub fn construct(&self, class_name: &str, args: &[ResolvedArgument]) -> DiResult<ServiceRef> {
        let factory = self
            .factories
            .get(&canonical_class_name(class_name))
            .ok_or_else(|| DiError::ClassNotFound(class_name.to_string()))?;

        factory(args)
    }
}

impl fmt::Debug for FactoryRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryRegistry")
            .field("factories", &format!("{} classes", self.factories.len()))
            .finish()
    }
}
