//! The live resolver: compile-once validation and lazy, memoized building.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::{
    Argument, ConfigEntry, ConfigValue, Configuration, Container, DiError, DiResult,
    FactoryRegistry, MissingReference, ParameterDefinition, ParameterDefinitionChain,
    ResolvedArgument, ServiceDefinition, ServiceDefinitionChain, ServiceRef,
};

/// Compile lifecycle of a container. The transition out of `Uncompiled`
/// happens exactly once, whether the compile succeeded or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum State {
    Uncompiled,
    Compiled,
    Failed,
}

/// The live dependency injection container.
///
/// Holds a raw [`Configuration`] and a [`FactoryRegistry`]; `compile()`
/// turns the configuration into a validated definition model, after which
/// `get` lazily builds services through the registry, memoizing each
/// instance so construction happens at most once per name.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use lattice_di::{Configuration, FactoryRegistry, Resolver, ServiceEntry, ServiceRef};
///
/// struct Transport;
/// struct Mailer {
///     transport: Arc<Transport>,
///     host: String,
/// }
///
/// let mut configuration = Configuration::new();
/// configuration.set_service("transport", ServiceEntry::new("app::Transport"));
/// configuration.set_service(
///     "mailer",
///     ServiceEntry::new("app::Mailer").arg("@transport").arg("~smtp.host"),
/// );
/// configuration.set_parameter("smtp.host", "localhost");
///
/// let mut registry = FactoryRegistry::new();
/// registry.register("app::Transport", |_| Ok(Arc::new(Transport) as ServiceRef));
/// registry.register("app::Mailer", |args| {
///     Ok(Arc::new(Mailer {
///         transport: args[0].service::<Transport>()?,
///         host: args[1].value()?.as_str()?.to_string(),
///     }) as ServiceRef)
/// });
///
/// let mut resolver = Resolver::new(configuration, registry, false);
/// resolver.compile().unwrap();
///
/// let mailer = resolver.get("mailer").unwrap();
/// let mailer = mailer.downcast::<Mailer>().ok().unwrap();
/// assert_eq!(mailer.host, "localhost");
/// assert_eq!(
///     resolver.get_parameter("smtp.host").unwrap().as_str().unwrap(),
///     "localhost"
/// );
/// ```
pub struct Resolver {
    configuration: Configuration,
    registry: FactoryRegistry,
    debug: bool,
    services: ServiceDefinitionChain,
    parameters: ParameterDefinitionChain,
    state: State,
    instances: RwLock<HashMap<String, ServiceRef>>,
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("state", &self.state)
            .field("debug", &self.debug)
            .field("services", &self.services.len())
            .field("parameters", &self.parameters.len())
            .finish()
    }
}

impl Resolver {
    /// Creates an uncompiled resolver over a configuration and registry.
    pub fn new(configuration: Configuration, registry: FactoryRegistry, debug: bool) -> Self {
        Self {
            configuration,
            registry,
            debug,
            services: ServiceDefinitionChain::new(),
            parameters: ParameterDefinitionChain::new(),
            state: State::Uncompiled,
            instances: RwLock::new(HashMap::new()),
        }
    }

    /// Compiles and validates the configuration.
    ///
    /// The uncompiled → compiled transition is consumed by this call even
    /// when it fails: a later call reports `AlreadyCompiled` either way.
    pub fn compile(&mut self) -> DiResult<()> {
        if self.state != State::Uncompiled {
            return Err(DiError::AlreadyCompiled);
        }

        match compile_configuration(&self.configuration, &self.registry).and_then(
            |(services, parameters)| {
                validate_references(&services, &parameters)?;
                detect_reference_cycles(&services)?;
                Ok((services, parameters))
            },
        ) {
            Ok((services, parameters)) => {
                self.services = services;
                self.parameters = parameters;
                self.state = State::Compiled;
                Ok(())
            }
            Err(error) => {
                self.state = State::Failed;
                Err(error)
            }
        }
    }

    /// Retrieves the named service, building and memoizing it on first use.
    ///
    /// Returns the identical instance (`Arc` identity) on every call for
    /// the same name.
    pub fn get(&self, name: &str) -> DiResult<ServiceRef> {
        if self.state != State::Compiled {
            return Err(DiError::NotCompiled);
        }

        if let Ok(instances) = self.instances.read() {
            if let Some(instance) = instances.get(name) {
                return Ok(instance.clone());
            }
        }

        if !self.services.has(name) {
            return Err(DiError::ServiceNotFound(name.to_string()));
        }

        let instance = self.build_service(name)?;
        if let Ok(mut instances) = self.instances.write() {
            instances.insert(name.to_string(), instance.clone());
        }

        Ok(instance)
    }

    /// Retrieves the named parameter's value.
    pub fn get_parameter(&self, name: &str) -> DiResult<ConfigValue> {
        if self.state != State::Compiled {
            return Err(DiError::NotCompiled);
        }

        match self.parameters.get(name) {
            Some(definition) => Ok(definition.value().clone()),
            None => Err(DiError::ParameterNotFound(name.to_string())),
        }
    }

    /// Whether this resolver runs in debug mode.
    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// The compiled service definitions.
    pub fn service_definitions(&self) -> DiResult<&ServiceDefinitionChain> {
        if self.state != State::Compiled {
            return Err(DiError::NotCompiled);
        }
        Ok(&self.services)
    }

    /// The compiled parameter definitions.
    pub fn parameter_definitions(&self) -> DiResult<&ParameterDefinitionChain> {
        if self.state != State::Compiled {
            return Err(DiError::NotCompiled);
        }
        Ok(&self.parameters)
    }

    /// Builds a service assumed to exist, resolving each argument in
    /// declaration order: service references recurse through `get`,
    /// parameter references go through `get_parameter`, literals pass
    /// through unchanged.
    fn build_service(&self, name: &str) -> DiResult<ServiceRef> {
        let definition = self
            .services
            .get(name)
            .ok_or_else(|| DiError::ServiceNotFound(name.to_string()))?;

        let mut arguments = Vec::with_capacity(definition.arguments().len());
        for argument in definition.arguments() {
            arguments.push(match argument {
                Argument::Service(reference) => ResolvedArgument::Service(self.get(reference)?),
                Argument::Parameter(reference) => {
                    ResolvedArgument::Value(self.get_parameter(reference)?)
                }
                Argument::Value(value) => ResolvedArgument::Value(value.clone()),
            });
        }

        self.registry.construct(definition.class_name(), &arguments)
    }
}

impl Container for Resolver {
    fn compile(&mut self) -> DiResult<()> {
        Resolver::compile(self)
    }

    fn get(&self, name: &str) -> DiResult<ServiceRef> {
        Resolver::get(self, name)
    }

    fn get_parameter(&self, name: &str) -> DiResult<ConfigValue> {
        Resolver::get_parameter(self, name)
    }

    fn is_debug(&self) -> bool {
        Resolver::is_debug(self)
    }
}

/// Compiles the raw configuration into definition chains.
///
/// An entry is a service iff it carries a `class` key; its class must be
/// known to the registry. Everything else becomes a parameter, its value
/// kept verbatim.
fn compile_configuration(
    configuration: &Configuration,
    registry: &FactoryRegistry,
) -> DiResult<(ServiceDefinitionChain, ParameterDefinitionChain)> {
    let mut services = ServiceDefinitionChain::new();
    let mut parameters = ParameterDefinitionChain::new();

    for (name, entry) in configuration.iter() {
        match entry {
            ConfigEntry::Service(service) => {
                if !registry.contains(service.class()) {
                    return Err(DiError::ClassNotFound(service.class().to_string()));
                }

                let arguments = service
                    .arguments()
                    .iter()
                    .map(Argument::from_token)
                    .collect();

                services.add(ServiceDefinition::new(
                    name,
                    service.class(),
                    arguments,
                    service.is_public(),
                ));
            }
            ConfigEntry::Parameter(value) => {
                parameters.add(ParameterDefinition::new(name, value.clone()));
            }
        }
    }

    Ok((services, parameters))
}

/// Checks that every reference argument names an existing definition.
///
/// Runs after the whole configuration is compiled, so declaration order
/// never matters; only name existence does.
fn validate_references(
    services: &ServiceDefinitionChain,
    parameters: &ParameterDefinitionChain,
) -> DiResult<()> {
    for definition in services.iter() {
        for argument in definition.arguments() {
            match argument {
                Argument::Service(reference) => {
                    if !services.has(reference) {
                        return Err(DiError::ServiceArgumentNotFound {
                            service: definition.name().to_string(),
                            reference: MissingReference::Service(reference.clone()),
                        });
                    }
                }
                Argument::Parameter(reference) => {
                    if !parameters.has(reference) {
                        return Err(DiError::ServiceArgumentNotFound {
                            service: definition.name().to_string(),
                            reference: MissingReference::Parameter(reference.clone()),
                        });
                    }
                }
                Argument::Value(_) => {}
            }
        }
    }

    Ok(())
}

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Rejects reference cycles between services, reporting the full path.
fn detect_reference_cycles(services: &ServiceDefinitionChain) -> DiResult<()> {
    let mut marks: HashMap<&str, Mark> = services
        .iter()
        .map(|definition| (definition.name(), Mark::Unvisited))
        .collect();

    let mut path = Vec::new();
    for definition in services.iter() {
        visit(definition.name(), services, &mut marks, &mut path)?;
    }

    Ok(())
}

fn visit<'a>(
    name: &'a str,
    services: &'a ServiceDefinitionChain,
    marks: &mut HashMap<&'a str, Mark>,
    path: &mut Vec<&'a str>,
) -> DiResult<()> {
    match marks.get(name).copied() {
        Some(Mark::Done) => return Ok(()),
        Some(Mark::InProgress) => {
            let start = path.iter().position(|&n| n == name).unwrap_or(0);
            let mut cycle: Vec<String> = path[start..].iter().map(|n| n.to_string()).collect();
            cycle.push(name.to_string());
            return Err(DiError::CircularReference(cycle));
        }
        _ => {}
    }

    marks.insert(name, Mark::InProgress);
    path.push(name);

    if let Some(definition) = services.get(name) {
        for argument in definition.arguments() {
            if let Argument::Service(reference) = argument {
                visit(reference, services, marks, path)?;
            }
        }
    }

    path.pop();
    marks.insert(name, Mark::Done);
    Ok(())
}
