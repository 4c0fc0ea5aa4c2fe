//! Input normalization
//!
//! Every supported input shape is reduced to a single text payload plus the
//! arguments that travel with it.

use crate::plugin::{Options, Parser, Producer};
use crate::resolver::PluginRef;
use crate::{Error, Result};
use std::fmt;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, trace};

/// The input of a translation
pub enum Input {
    /// Literal input text
    Text(String),
    /// Path of a file to read
    Path(PathBuf),
    /// Stream drained to its end
    Reader(Box<dyn Read + Send>),
    /// Shared in-memory buffer
    Buffer(Arc<str>),
    /// Full argument record
    Args(TranslateArgs),
}

impl fmt::Debug for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Input::Text(text) => f.debug_tuple("Text").field(&text.len()).finish(),
            Input::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Input::Reader(_) => f.write_str("Reader(..)"),
            Input::Buffer(buffer) => f.debug_tuple("Buffer").field(&buffer.len()).finish(),
            Input::Args(args) => f.debug_tuple("Args").field(args).finish(),
        }
    }
}

impl From<TranslateArgs> for Input {
    fn from(args: TranslateArgs) -> Self {
        Input::Args(args)
    }
}

impl From<PathBuf> for Input {
    fn from(path: PathBuf) -> Self {
        Input::Path(path)
    }
}

impl From<Arc<str>> for Input {
    fn from(buffer: Arc<str>) -> Self {
        Input::Buffer(buffer)
    }
}

/// Argument record of a translation call
#[derive(Debug, Clone, Default)]
pub struct TranslateArgs {
    /// Input text; takes precedence over `filename`
    pub data: Option<String>,
    /// File to read when no `data` is given
    pub filename: Option<PathBuf>,
    /// Parser override for this and later calls
    pub parser: Option<PluginRef<dyn Parser>>,
    /// Producer override for this and later calls
    pub producer: Option<PluginRef<dyn Producer>>,
    /// Passthrough options for the plugins
    pub options: Options,
}

impl TranslateArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build arguments from key/value pairs.
    ///
    /// Recognized keys are `data`, `filename`/`file`, `parser`/`from` and
    /// `producer`/`to`; every other key becomes a plugin option.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut args = Self::default();
        for (key, value) in pairs {
            let value = value.into();
            match key.as_ref() {
                "data" => args.data = Some(value),
                "filename" | "file" => args.filename = Some(PathBuf::from(value)),
                "parser" | "from" => args.parser = Some(PluginRef::Named(value)),
                "producer" | "to" => args.producer = Some(PluginRef::Named(value)),
                other => {
                    args.options.set(other, value);
                }
            }
        }
        args
    }

    #[must_use]
    pub fn data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    #[must_use]
    pub fn filename(mut self, path: impl Into<PathBuf>) -> Self {
        self.filename = Some(path.into());
        self
    }

    #[must_use]
    pub fn parser(mut self, parser: impl Into<PluginRef<dyn Parser>>) -> Self {
        self.parser = Some(parser.into());
        self
    }

    #[must_use]
    pub fn producer(mut self, producer: impl Into<PluginRef<dyn Producer>>) -> Self {
        self.producer = Some(producer.into());
        self
    }

    #[must_use]
    pub fn option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.set(key, value);
        self
    }
}

/// Result of [`normalize`]
#[derive(Debug, Clone)]
pub struct Normalized {
    /// Input text; `None` means there is nothing to translate
    pub payload: Option<String>,
    /// Remaining arguments (`data` has been moved into `payload`)
    pub args: TranslateArgs,
}

/// Reduce an [`Input`] to its text payload and arguments.
///
/// `data` is used verbatim when present, otherwise `filename` is read in
/// full. Read failures are errors; a missing payload is not.
pub fn normalize(input: Input) -> Result<Normalized> {
    let mut args = match input {
        Input::Args(args) => args,
        Input::Text(text) => TranslateArgs::new().data(text),
        Input::Buffer(buffer) => TranslateArgs::new().data(String::from(&*buffer)),
        Input::Path(path) => TranslateArgs::new().filename(path),
        Input::Reader(mut reader) => {
            let mut text = String::new();
            reader
                .read_to_string(&mut text)
                .map_err(|e| Error::io("read", "<stream>", e.to_string()))?;
            trace!(bytes = text.len(), "drained input stream");
            TranslateArgs::new().data(text)
        }
    };

    let payload = match (args.data.take(), &args.filename) {
        (Some(data), _) => Some(data),
        (None, Some(path)) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| Error::io("read", path.display().to_string(), e.to_string()))?;
            debug!(path = %path.display(), bytes = text.len(), "read input file");
            Some(text)
        }
        (None, None) => None,
    };

    Ok(Normalized { payload, args })
}
