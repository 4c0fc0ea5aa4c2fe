//! Translation engine
//!
//! Runs input through the configured parser, then hands the parser's result
//! to the configured producer.

use crate::config::EngineConfig;
use crate::input::{Input, normalize};
use crate::plugin::{Context, IdentityParser, IdentityProducer, Ir, Options, Parser, Producer};
use crate::resolver::{PluginRef, PluginRegistry};
use crate::Result;
use std::fmt;
use std::sync::Arc;
use tracing::{Dispatch, debug, info, warn};

/// Result of a successful [`Translator::translate`] call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The producer's output
    Produced(Ir),
    /// No input data was supplied; nothing ran
    NoData,
}

impl Outcome {
    pub fn is_no_data(&self) -> bool {
        matches!(self, Outcome::NoData)
    }

    pub fn into_ir(self) -> Option<Ir> {
        match self {
            Outcome::Produced(ir) => Some(ir),
            Outcome::NoData => None,
        }
    }
}

/// Parse-then-produce engine holding the current parser and producer
pub struct Translator {
    registry: PluginRegistry,
    parser: Arc<dyn Parser>,
    producer: Arc<dyn Producer>,
    options: Options,
    last_error: String,
    dispatch: Option<Dispatch>,
}

impl fmt::Debug for Translator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Translator")
            .field("registry", &self.registry)
            .field("options", &self.options)
            .field("last_error", &self.last_error)
            .field("has_dispatch", &self.dispatch.is_some())
            .finish_non_exhaustive()
    }
}

impl Translator {
    /// Create an engine with identity parser and producer
    pub fn new(registry: PluginRegistry) -> Self {
        Self {
            registry,
            parser: Arc::new(IdentityParser),
            producer: Arc::new(IdentityProducer),
            options: Options::default(),
            last_error: String::new(),
            dispatch: None,
        }
    }

    /// Create an engine from configuration. Unresolvable plugins are fatal.
    pub fn from_config(registry: PluginRegistry, config: &EngineConfig) -> Result<Self> {
        let mut translator = Self::new(registry);
        translator.set_parser(config.parser.as_str())?;
        translator.set_producer(config.producer.as_str())?;
        translator.options = config.plugin_options();
        Ok(translator)
    }

    /// Route this engine's diagnostics to `dispatch` instead of the global subscriber
    #[must_use]
    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = Some(dispatch);
        self
    }

    /// Set engine-level plugin options, overridden per call by the input's options
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    pub fn options_mut(&mut self) -> &mut Options {
        &mut self.options
    }

    /// Resolve and install a parser
    pub fn set_parser(&mut self, parser: impl Into<PluginRef<dyn Parser>>) -> Result<()> {
        let parser = parser.into();
        self.parser = self.in_scope(|this| this.registry.resolve_parser(parser))?;
        Ok(())
    }

    /// Resolve and install a producer
    pub fn set_producer(&mut self, producer: impl Into<PluginRef<dyn Producer>>) -> Result<()> {
        let producer = producer.into();
        self.producer = self.in_scope(|this| this.registry.resolve_producer(producer))?;
        Ok(())
    }

    pub fn parser(&self) -> &Arc<dyn Parser> {
        &self.parser
    }

    pub fn producer(&self) -> &Arc<dyn Producer> {
        &self.producer
    }

    /// Last error a plugin reported, empty when none
    pub fn last_error(&self) -> &str {
        &self.last_error
    }

    /// Translate `input`.
    ///
    /// Returns [`Outcome::NoData`] without touching the configured plugins
    /// when the input carries no data. Parser/producer overrides in the
    /// input become the engine's new defaults.
    pub fn translate(&mut self, input: impl Into<Input>) -> Result<Outcome> {
        let input = input.into();
        self.in_scope_mut(|this| this.run(input))
    }

    fn run(&mut self, input: Input) -> Result<Outcome> {
        let normalized = normalize(input)?;
        let Some(payload) = normalized.payload else {
            warn!("no input data, nothing to translate");
            return Ok(Outcome::NoData);
        };
        let args = normalized.args;

        if let Some(parser) = args.parser {
            self.set_parser(parser)?;
        }
        if let Some(producer) = args.producer {
            self.set_producer(producer)?;
        }

        let mut options = self.options.clone();
        options.merge(args.options);
        let mut ctx = Context::new(options);

        info!(bytes = payload.len(), "translating");
        let parsed = self.parser.parse(&payload, &mut ctx);
        self.record_report(&mut ctx);
        let ir = parsed?;

        if let Some(message) = ir.as_schema().map(|s| s.error()).filter(|m| !m.is_empty()) {
            self.record_error(message.to_string());
        }
        debug!(ir = ir.kind(), "parser finished");

        let produced = self.producer.produce(ir, &mut ctx);
        self.record_report(&mut ctx);
        let output = produced?;
        debug!(output = output.kind(), "producer finished");

        Ok(Outcome::Produced(output))
    }

    fn record_report(&mut self, ctx: &mut Context) {
        if let Some(message) = ctx.take_report() {
            self.record_error(message);
        }
    }

    fn record_error(&mut self, message: String) {
        warn!(%message, "plugin reported an error");
        self.last_error = message;
    }

    fn in_scope<T>(&self, f: impl FnOnce(&Self) -> T) -> T {
        match &self.dispatch {
            Some(dispatch) => tracing::dispatcher::with_default(dispatch, || f(self)),
            None => f(self),
        }
    }

    fn in_scope_mut<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        match self.dispatch.clone() {
            Some(dispatch) => tracing::dispatcher::with_default(&dispatch, || f(self)),
            None => f(self),
        }
    }
}
