//! Logging sink and the logging container decorator.

use crate::{ConfigValue, Container, DiResult, ServiceRef};

/// A sink for container activity messages.
///
/// The decorator calls `debug` before each delegated operation when the
/// wrapped container is in debug mode, and `error` immediately before
/// re-raising any failure.
pub trait ContainerLogger: Send + Sync {
    /// Records a routine container action.
    fn debug(&self, message: &str);

    /// Records a failed container action.
    fn error(&self, message: &str);
}

/// A plain stdout/stderr sink with a configurable prefix.
#[derive(Debug)]
pub struct StdoutLogger {
    prefix: String,
}

impl StdoutLogger {
    /// Creates a sink with the default prefix.
    pub fn new() -> Self {
        Self {
            prefix: "[lattice-di]".to_string(),
        }
    }

    /// Creates a sink with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for StdoutLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerLogger for StdoutLogger {
    fn debug(&self, message: &str) {
        println!("{} {}", self.prefix, message);
    }

    fn error(&self, message: &str) {
        eprintln!("{} {}", self.prefix, message);
    }
}

/// A sink forwarding to the `tracing` ecosystem.
#[derive(Debug, Default)]
pub struct TracingLogger;

impl TracingLogger {
    /// Creates the sink.
    pub fn new() -> Self {
        Self
    }
}

impl ContainerLogger for TracingLogger {
    fn debug(&self, message: &str) {
        tracing::debug!(target: "lattice_di", "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "lattice_di", "{}", message);
    }
}

/// A decorator logging every operation of the wrapped container.
///
/// Pure delegation: results and errors pass through unchanged, never
/// swallowed or transformed. Debug lines are emitted only when the
/// wrapped container reports debug mode; error lines are emitted
/// unconditionally, immediately before the failure is re-raised.
///
/// # Examples
///
/// ```rust
/// use lattice_di::{
///     Configuration, Container, FactoryRegistry, LoggedContainer, Resolver, StdoutLogger,
/// };
///
/// let resolver = Resolver::new(Configuration::new(), FactoryRegistry::new(), true);
/// let mut container = LoggedContainer::new(resolver, Box::new(StdoutLogger::new()));
///
/// container.compile().unwrap();
/// assert!(container.is_debug());
/// assert!(container.get("missing").is_err()); // logged, then re-raised
/// ```
pub struct LoggedContainer<C: Container> {
    container: C,
    logger: Box<dyn ContainerLogger>,
}

impl<C: Container> LoggedContainer<C> {
    /// Wraps a container with a logging sink.
    pub fn new(container: C, logger: Box<dyn ContainerLogger>) -> Self {
        Self { container, logger }
    }

    /// Consumes the decorator, returning the wrapped container.
    pub fn into_inner(self) -> C {
        self.container
    }

    fn log_debug(&self, message: &str) {
        if self.container.is_debug() {
            self.logger.debug(message);
        }
    }
}

impl<C: Container> Container for LoggedContainer<C> {
    fn compile(&mut self) -> DiResult<()> {
        if self.container.is_debug() {
            self.logger.debug("Compiling container");
        }

        match self.container.compile() {
            Ok(()) => Ok(()),
            Err(error) => {
                self.logger.error("Container compilation failed");
                Err(error)
            }
        }
    }

    fn get(&self, name: &str) -> DiResult<ServiceRef> {
        self.log_debug(&format!("Service {} requested", name));

        match self.container.get(name) {
            Ok(instance) => Ok(instance),
            Err(error) => {
                self.logger
                    .error(&format!("Service {} requested and not found", name));
                Err(error)
            }
        }
    }

    fn get_parameter(&self, name: &str) -> DiResult<ConfigValue> {
        self.log_debug(&format!("Parameter {} requested", name));

        match self.container.get_parameter(name) {
            Ok(value) => Ok(value),
            Err(error) => {
                self.logger
                    .error(&format!("Parameter {} requested and not found", name));
                Err(error)
            }
        }
    }

    fn is_debug(&self) -> bool {
        self.container.is_debug()
    }
}
