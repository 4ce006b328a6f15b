//! The common container interface consumed by decorators and callers.

use crate::{ConfigValue, DiResult, ServiceRef};

/// The dependency injection container surface.
///
/// Implemented by the live [`Resolver`](crate::Resolver), the
/// [`CachedContainer`](crate::CachedContainer), and the
/// [`LoggedContainer`](crate::LoggedContainer) decorator, so callers can
/// hold any of them behind `Box<dyn Container>`.
///
/// The lifecycle is one-way: a container starts uncompiled, `compile`
/// transitions it exactly once, and `get`/`get_parameter` only work
/// afterwards.
pub trait Container {
    /// Compiles the configuration, consuming the one-way transition.
    ///
    /// Fails with [`DiError::AlreadyCompiled`](crate::DiError) if the
    /// transition was already consumed.
    fn compile(&mut self) -> DiResult<()>;

    /// Retrieves (building and memoizing if needed) the named service.
    fn get(&self, name: &str) -> DiResult<ServiceRef>;

    /// Retrieves the named parameter's value.
    fn get_parameter(&self, name: &str) -> DiResult<ConfigValue>;

    /// Whether the container runs in debug mode.
    ///
    /// Purely informational; consumed by the logging decorator and the
    /// cached container's artifact-reuse policy.
    fn is_debug(&self) -> bool;
}
