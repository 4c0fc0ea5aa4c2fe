//! Plugin resolution
//!
//! Maps parser/producer identifiers to plugin instances. An identifier is
//! either fully qualified (`sqlt::parser::uml`), a short name resolved under
//! the role's namespace (`uml` → `sqlt::parser::uml`), or a plugin handed in
//! directly.
//!
//! Instances are created once per registry and shared afterwards, so
//! resolving the same identifier twice yields the same `Arc`.

use crate::plugin::{IdentityParser, IdentityProducer, Parser, Producer};
use crate::{Error, Result};
use dashmap::DashMap;
use regex::Regex;
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, LazyLock};
use tracing::{debug, trace};

/// Separator between namespace segments of an identifier
pub const NAMESPACE_SEPARATOR: &str = "::";

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(::[A-Za-z_][A-Za-z0-9_]*)*$")
        .expect("identifier pattern is valid")
});

/// Which side of the pipeline a plugin serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Parser,
    Producer,
}

impl Role {
    /// Namespace prefix that short names are resolved under
    pub fn prefix(self) -> &'static str {
        match self {
            Role::Parser => "sqlt::parser::",
            Role::Producer => "sqlt::producer::",
        }
    }

    /// Expand a short name into a fully-qualified one; qualified names pass through
    pub fn qualify(self, identifier: &str) -> String {
        if identifier.contains(NAMESPACE_SEPARATOR) {
            identifier.to_string()
        } else {
            format!("{}{}", self.prefix(), identifier)
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Parser => f.write_str("parser"),
            Role::Producer => f.write_str("producer"),
        }
    }
}

/// A plugin given either by name or as an instance
pub enum PluginRef<T: ?Sized> {
    Named(String),
    Direct(Arc<T>),
}

impl<T: ?Sized> Clone for PluginRef<T> {
    fn clone(&self) -> Self {
        match self {
            PluginRef::Named(name) => PluginRef::Named(name.clone()),
            PluginRef::Direct(plugin) => PluginRef::Direct(Arc::clone(plugin)),
        }
    }
}

impl<T: ?Sized> fmt::Debug for PluginRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluginRef::Named(name) => f.debug_tuple("Named").field(name).finish(),
            PluginRef::Direct(_) => f.write_str("Direct(..)"),
        }
    }
}

impl<T: ?Sized> From<&str> for PluginRef<T> {
    fn from(name: &str) -> Self {
        PluginRef::Named(name.to_string())
    }
}

impl<T: ?Sized> From<String> for PluginRef<T> {
    fn from(name: String) -> Self {
        PluginRef::Named(name)
    }
}

impl<T: ?Sized> From<Arc<T>> for PluginRef<T> {
    fn from(plugin: Arc<T>) -> Self {
        PluginRef::Direct(plugin)
    }
}

type Factory<T> = Arc<dyn Fn() -> Arc<T> + Send + Sync>;

/// Factories and loaded instances for one role
struct Slot<T: ?Sized> {
    factories: DashMap<String, Factory<T>>,
    loaded: DashMap<String, Arc<T>>,
}

impl<T: ?Sized> Default for Slot<T> {
    fn default() -> Self {
        Self {
            factories: DashMap::new(),
            loaded: DashMap::new(),
        }
    }
}

impl<T: ?Sized> Slot<T> {
    fn register(&self, qualified: String, factory: Factory<T>) {
        // A re-registration must not keep serving the old instance
        self.loaded.remove(&qualified);
        self.factories.insert(qualified, factory);
    }

    fn load(&self, role: Role, requested: &str, qualified: &str) -> Result<Arc<T>> {
        if let Some(hit) = self.loaded.get(qualified) {
            trace!(%role, binding = qualified, "plugin already loaded");
            return Ok(Arc::clone(hit.value()));
        }

        let factory = self
            .factories
            .get(qualified)
            .map(|f| Arc::clone(f.value()))
            .ok_or_else(|| {
                Error::configuration(
                    role,
                    requested,
                    format!("no plugin registered as '{qualified}'"),
                )
            })?;

        let instance = self
            .loaded
            .entry(qualified.to_string())
            .or_insert_with(|| factory());
        Ok(Arc::clone(instance.value()))
    }

    fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }
}

#[derive(Default)]
struct Inner {
    parsers: Slot<dyn Parser>,
    producers: Slot<dyn Producer>,
    aliases: DashMap<(Role, String), String>,
}

/// Registry of named parsers and producers.
///
/// Cloning is cheap and clones share state, so one registry can serve every
/// [`Translator`](crate::Translator) in the process.
#[derive(Clone, Default)]
pub struct PluginRegistry {
    inner: Arc<Inner>,
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("parsers", &self.names(Role::Parser))
            .field("producers", &self.names(Role::Producer))
            .finish()
    }
}

impl PluginRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the identity parser and producer
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        registry.inner.parsers.register(
            Role::Parser.qualify("identity"),
            Arc::new(|| Arc::new(IdentityParser) as Arc<dyn Parser>),
        );
        registry.inner.producers.register(
            Role::Producer.qualify("identity"),
            Arc::new(|| Arc::new(IdentityProducer) as Arc<dyn Producer>),
        );
        registry
    }

    /// Register a parser factory under `name` (short or fully qualified)
    pub fn register_parser<F, P>(&self, name: &str, factory: F) -> Result<()>
    where
        F: Fn() -> P + Send + Sync + 'static,
        P: Parser + 'static,
    {
        let qualified = Self::validate(Role::Parser, name)?;
        debug!(binding = %qualified, "registering parser");
        self.inner.parsers.register(
            qualified,
            Arc::new(move || Arc::new(factory()) as Arc<dyn Parser>),
        );
        Ok(())
    }

    /// Register a producer factory under `name` (short or fully qualified)
    pub fn register_producer<F, P>(&self, name: &str, factory: F) -> Result<()>
    where
        F: Fn() -> P + Send + Sync + 'static,
        P: Producer + 'static,
    {
        let qualified = Self::validate(Role::Producer, name)?;
        debug!(binding = %qualified, "registering producer");
        self.inner.producers.register(
            qualified,
            Arc::new(move || Arc::new(factory()) as Arc<dyn Producer>),
        );
        Ok(())
    }

    /// Make `alias` resolve to the same plugin as `target`
    pub fn register_alias(&self, role: Role, alias: &str, target: &str) -> Result<()> {
        let alias = Self::validate(role, alias)?;
        let target = Self::validate(role, target)?;
        debug!(%role, %alias, %target, "registering alias");
        self.inner.aliases.insert((role, alias), target);
        Ok(())
    }

    /// Resolve a parser reference to an instance
    pub fn resolve_parser(&self, plugin: PluginRef<dyn Parser>) -> Result<Arc<dyn Parser>> {
        match plugin {
            PluginRef::Direct(parser) => {
                debug!(role = %Role::Parser, "using directly supplied plugin");
                Ok(parser)
            }
            PluginRef::Named(name) => {
                let qualified = self.canonical(Role::Parser, &name)?;
                let parser = self.inner.parsers.load(Role::Parser, &name, &qualified)?;
                debug!(role = %Role::Parser, identifier = %name, binding = %qualified, "resolved plugin");
                Ok(parser)
            }
        }
    }

    /// Resolve a producer reference to an instance
    pub fn resolve_producer(&self, plugin: PluginRef<dyn Producer>) -> Result<Arc<dyn Producer>> {
        match plugin {
            PluginRef::Direct(producer) => {
                debug!(role = %Role::Producer, "using directly supplied plugin");
                Ok(producer)
            }
            PluginRef::Named(name) => {
                let qualified = self.canonical(Role::Producer, &name)?;
                let producer = self
                    .inner
                    .producers
                    .load(Role::Producer, &name, &qualified)?;
                debug!(role = %Role::Producer, identifier = %name, binding = %qualified, "resolved plugin");
                Ok(producer)
            }
        }
    }

    /// Check whether `identifier` resolves to a registered plugin
    pub fn contains(&self, role: Role, identifier: &str) -> bool {
        let Ok(qualified) = self.canonical(role, identifier) else {
            return false;
        };
        match role {
            Role::Parser => self.inner.parsers.factories.contains_key(&qualified),
            Role::Producer => self.inner.producers.factories.contains_key(&qualified),
        }
    }

    /// Fully-qualified names of registered plugins, sorted
    pub fn names(&self, role: Role) -> Vec<String> {
        match role {
            Role::Parser => self.inner.parsers.names(),
            Role::Producer => self.inner.producers.names(),
        }
    }

    /// Registered aliases as `(alias, target)` pairs, sorted by alias
    pub fn aliases(&self, role: Role) -> Vec<(String, String)> {
        let mut aliases: Vec<(String, String)> = self
            .inner
            .aliases
            .iter()
            .filter(|e| e.key().0 == role)
            .map(|e| (e.key().1.clone(), e.value().clone()))
            .collect();
        aliases.sort();
        aliases
    }

    fn validate(role: Role, identifier: &str) -> Result<String> {
        if !IDENTIFIER.is_match(identifier) {
            return Err(Error::configuration(
                role,
                identifier,
                "malformed plugin identifier",
            ));
        }
        Ok(role.qualify(identifier))
    }

    /// Qualify `identifier` and follow aliases to the registered name
    fn canonical(&self, role: Role, identifier: &str) -> Result<String> {
        let mut name = Self::validate(role, identifier)?;
        let mut seen = HashSet::new();

        while let Some(target) = self
            .inner
            .aliases
            .get(&(role, name.clone()))
            .map(|t| t.value().clone())
        {
            if !seen.insert(name.clone()) {
                return Err(Error::configuration(role, identifier, "alias cycle"));
            }
            trace!(%role, alias = %name, %target, "following alias");
            name = target;
        }

        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::{Context, Ir};

    #[derive(Default)]
    struct Upper;

    impl Parser for Upper {
        fn parse(&self, input: &str, _ctx: &mut Context) -> Result<Ir> {
            Ok(Ir::Text(input.to_uppercase()))
        }
    }

    #[test]
    fn short_names_are_qualified_per_role() {
        assert_eq!(Role::Parser.qualify("uml"), "sqlt::parser::uml");
        assert_eq!(Role::Producer.qualify("yaml"), "sqlt::producer::yaml");
        assert_eq!(Role::Parser.qualify("acme::parser::x"), "acme::parser::x");
    }

    #[test]
    fn resolving_twice_yields_the_same_instance() {
        let registry = PluginRegistry::new();
        registry.register_parser("upper", Upper::default).unwrap();

        let first = registry.resolve_parser("upper".into()).unwrap();
        let second = registry.resolve_parser("sqlt::parser::upper".into()).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn clones_share_loaded_instances() {
        let registry = PluginRegistry::with_builtins();
        let other = registry.clone();

        let a = registry.resolve_producer("identity".into()).unwrap();
        let b = other.resolve_producer("identity".into()).unwrap();

        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn unknown_identifier_is_configuration_error() {
        let registry = PluginRegistry::with_builtins();
        let Err(err) = registry.resolve_parser("nosuch".into()) else {
            panic!("resolution of an unknown parser should fail");
        };

        match err {
            Error::Configuration {
                role, identifier, ..
            } => {
                assert_eq!(role, Role::Parser);
                assert_eq!(identifier, "nosuch");
            }
            other => panic!("expected configuration error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_identifier_is_rejected() {
        let registry = PluginRegistry::with_builtins();
        for bad in ["", "has space", "trailing::", "9lives"] {
            assert!(
                matches!(
                    registry.resolve_producer(bad.into()),
                    Err(Error::Configuration { .. })
                ),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn direct_plugins_pass_through() {
        let registry = PluginRegistry::new();
        let parser: Arc<dyn Parser> = Arc::new(Upper);

        let resolved = registry
            .resolve_parser(PluginRef::Direct(Arc::clone(&parser)))
            .unwrap();

        assert!(Arc::ptr_eq(&parser, &resolved));
    }

    #[test]
    fn aliases_resolve_to_target_instance() {
        let registry = PluginRegistry::new();
        registry.register_parser("upper", Upper::default).unwrap();
        registry
            .register_alias(Role::Parser, "shout", "upper")
            .unwrap();

        let via_alias = registry.resolve_parser("shout".into()).unwrap();
        let direct = registry.resolve_parser("upper".into()).unwrap();

        assert!(Arc::ptr_eq(&via_alias, &direct));
        assert!(registry.contains(Role::Parser, "shout"));
        assert_eq!(
            registry.aliases(Role::Parser),
            vec![(
                "sqlt::parser::shout".to_string(),
                "sqlt::parser::upper".to_string()
            )]
        );
    }

    #[test]
    fn alias_cycle_is_configuration_error() {
        let registry = PluginRegistry::new();
        registry.register_alias(Role::Producer, "a", "b").unwrap();
        registry.register_alias(Role::Producer, "b", "a").unwrap();

        assert!(matches!(
            registry.resolve_producer("a".into()),
            Err(Error::Configuration { .. })
        ));
    }

    #[test]
    fn names_are_sorted_and_qualified() {
        let registry = PluginRegistry::with_builtins();
        registry.register_parser("upper", Upper::default).unwrap();

        assert_eq!(
            registry.names(Role::Parser),
            vec!["sqlt::parser::identity", "sqlt::parser::upper"]
        );
        assert_eq!(
            registry.names(Role::Producer),
            vec!["sqlt::producer::identity"]
        );
    }
}
