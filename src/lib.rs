//! # lattice-di
//!
//! Configuration-driven dependency injection for Rust: named services,
//! compile-once validation, and a pre-resolved cache generator.
//!
//! ## Features
//!
//! - **Declarative graphs**: services and parameters declared as a plain
//!   name → entry map, with `@service` and `~parameter` argument markers
//! - **Compile-once validation**: every class, reference, and cycle is
//!   checked before the first service is built
//! - **Memoized resolution**: each service is constructed at most once
//!   and served with `Arc` identity afterwards
//! - **No reflection**: a [`FactoryRegistry`] maps class names to typed
//!   factory functions
//! - **Cache generation**: a compiled model can be emitted as ordinary
//!   Rust source that rebuilds the same graph by direct method dispatch
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use lattice_di::{Configuration, FactoryRegistry, Resolver, ServiceEntry, ServiceRef};
//!
//! struct Database {
//!     url: String,
//! }
//!
//! struct UserService {
//!     db: Arc<Database>,
//! }
//!
//! // Declare the graph
//! let mut configuration = Configuration::new();
//! configuration.set_parameter("db.url", "postgres://localhost");
//! configuration.set_service("database", ServiceEntry::new("app::Database").arg("~db.url"));
//! configuration.set_service("users", ServiceEntry::new("app::UserService").arg("@database"));
//!
//! // Map each class name to a factory
//! let mut registry = FactoryRegistry::new();
//! registry.register("app::Database", |args| {
//!     Ok(Arc::new(Database {
//!         url: args[0].value()?.as_str()?.to_string(),
//!     }) as ServiceRef)
//! });
//! registry.register("app::UserService", |args| {
//!     Ok(Arc::new(UserService {
//!         db: args[0].service::<Database>()?,
//!     }) as ServiceRef)
//! });
//!
//! // Compile once, then resolve lazily
//! let mut resolver = Resolver::new(configuration, registry, false);
//! resolver.compile().unwrap();
//!
//! let users = resolver.get("users").unwrap();
//! let users = users.downcast::<UserService>().ok().unwrap();
//! assert_eq!(users.db.url, "postgres://localhost");
//! ```
//!
//! ## Cached graphs
//!
//! A compiled [`Resolver`] can be serialized by [`CacheBuilder`] into a
//! generated Rust source unit, with one construction method per service and
//! every argument inlined, served by a [`CachedContainer`] that
//! dispatches directly instead of walking the definition model. The
//! artifact file is regenerated whenever debug mode is on or the file is
//! missing, and reused verbatim otherwise.

// Module declarations
pub mod argument;
pub mod cache;
pub mod cached;
pub mod configuration;
pub mod definition;
pub mod error;
pub mod logging;
pub mod registry;
pub mod resolver;
pub mod traits;
pub mod value;

// Re-export core types
pub use argument::{Argument, PARAMETER_PREFIX, SERVICE_PREFIX};
pub use cache::CacheBuilder;
pub use cached::{CachedContainer, CompiledGraph, GraphLoader};
pub use configuration::{ConfigEntry, Configuration, ServiceEntry};
pub use definition::{
    ParameterDefinition, ParameterDefinitionChain, ServiceDefinition, ServiceDefinitionChain,
};
pub use error::{DiError, DiResult, MissingReference};
pub use logging::{ContainerLogger, LoggedContainer, StdoutLogger, TracingLogger};
pub use registry::{FactoryRegistry, ResolvedArgument, ServiceFactory, ServiceRef};
pub use resolver::Resolver;
pub use traits::Container;
pub use value::ConfigValue;
