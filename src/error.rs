//! Error types for the dependency injection container.

use std::fmt;

/// Dependency injection errors
///
/// Represents the error conditions that can occur while compiling a
/// configuration, resolving services and parameters, or generating and
/// loading the pre-resolved cache artifact.
///
/// Compile-time errors (`ClassNotFound`, `ServiceArgumentNotFound`,
/// `CircularReference`) abort compilation entirely; runtime errors
/// (`ServiceNotFound`, `ParameterNotFound`, `NotCompiled`) abort only the
/// single call that raised them. None are retried internally.
///
/// # Examples
///
/// ```rust
/// use lattice_di::DiError;
///
/// let not_found = DiError::ServiceNotFound("mailer".to_string());
/// assert_eq!(not_found.to_string(), "Service \"mailer\" not found");
///
/// let cycle = DiError::CircularReference(vec![
///     "a".to_string(), "b".to_string(), "a".to_string(),
/// ]);
/// assert_eq!(cycle.to_string(), "Circular service reference: a -> b -> a");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum DiError {
    /// The one-way compile transition was already consumed
    AlreadyCompiled,
    /// The container was used before `compile()`
    NotCompiled,
    /// A service declares a class the factory registry does not know
    ClassNotFound(String),
    /// `get` was called with a name absent from the service chain
    ServiceNotFound(String),
    /// `get_parameter` was called with a name absent from the parameter chain
    ParameterNotFound(String),
    /// A service argument references a service or parameter that does not exist
    ServiceArgumentNotFound {
        /// The service whose argument list holds the dangling reference
        service: String,
        /// The reference that could not be satisfied
        reference: MissingReference,
    },
    /// A reference cycle between services (includes the full path)
    CircularReference(Vec<String>),
    /// Two distinct service names sanitize to the same cached method name
    CacheNameCollision {
        /// First service name mapping to the method
        first: String,
        /// Second service name mapping to the method
        second: String,
        /// The shared sanitized method name
        method: String,
    },
    /// Reading or writing the cache artifact file failed
    CacheIo(String),
    /// A typed accessor was used against a value of another shape
    TypeMismatch(&'static str),
}

/// The target of a dangling service-argument reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissingReference {
    /// A `@name` argument whose service does not exist
    Service(String),
    /// A `~name` argument whose parameter does not exist
    Parameter(String),
}

impl fmt::Display for DiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiError::AlreadyCompiled => write!(f, "Container already compiled"),
            DiError::NotCompiled => {
                write!(f, "Container should be compiled before being used")
            }
            DiError::ClassNotFound(class) => write!(f, "Class {} not found", class),
            DiError::ServiceNotFound(name) => write!(f, "Service \"{}\" not found", name),
            DiError::ParameterNotFound(name) => write!(f, "Parameter \"{}\" not found", name),
            DiError::ServiceArgumentNotFound { service, reference } => match reference {
                MissingReference::Service(name) => write!(
                    f,
                    "Service \"{}\" not found in \"@{}\" arguments list",
                    name, service
                ),
                MissingReference::Parameter(name) => write!(
                    f,
                    "Parameter \"{}\" not found in \"@{}\" arguments list",
                    name, service
                ),
            },
            DiError::CircularReference(path) => {
                write!(f, "Circular service reference: {}", path.join(" -> "))
            }
            DiError::CacheNameCollision {
                first,
                second,
                method,
            } => write!(
                f,
                "Service names \"{}\" and \"{}\" both map to cached method \"{}\"",
                first, second, method
            ),
            DiError::CacheIo(message) => write!(f, "Cache file error: {}", message),
            DiError::TypeMismatch(message) => write!(f, "Type mismatch: {}", message),
        }
    }
}

impl std::error::Error for DiError {}

/// Result type for DI operations
///
/// A convenience type alias for `Result<T, DiError>` used throughout
/// lattice-di.
///
/// # Examples
///
/// ```rust
/// use lattice_di::{DiError, DiResult};
///
/// fn lookup(name: &str) -> DiResult<u32> {
///     match name {
///         "port" => Ok(8080),
///         _ => Err(DiError::ParameterNotFound(name.to_string())),
///     }
/// }
///
/// assert_eq!(lookup("port").unwrap(), 8080);
/// assert!(lookup("host").is_err());
/// ```
pub type DiResult<T> = Result<T, DiError>;
