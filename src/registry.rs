//! Conversion registry: exact (domain, input, output) → handler mapping.
//!
//! Lookup is a pure map operation. There is no partial or format-family
//! matching and no fallback search — the triple either has a handler or it
//! does not, and the orchestrator reports the latter as
//! [`FlexifileError::UnsupportedConversion`]. The registry is populated once
//! at startup ([`Registry::builtin`]) and never mutated afterwards, so it is
//! freely shareable across threads.

use crate::catalog::{Format, FormatDomain};
use crate::config::ConvertConfig;
use crate::error::FlexifileError;
use crate::output::Outcome;
use std::collections::HashMap;
use std::path::Path;

/// Lookup key: one (domain, input format, output format) triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConversionKey {
    pub domain: FormatDomain,
    pub input: Format,
    pub output: Format,
}

impl ConversionKey {
    pub fn new(domain: FormatDomain, input: Format, output: Format) -> Self {
        Self {
            domain,
            input,
            output,
        }
    }
}

/// Everything a handler receives: the request bytes, a staged on-disk copy
/// for handlers that shell out to file-based tools, a scratch directory in
/// the same temp scope, and the resolved configuration.
///
/// Paths live inside a per-request [`tempfile::TempDir`] owned by the
/// orchestrator; handlers must read any file output back into memory before
/// returning, never hand a path out as a final artifact.
pub struct Staged<'a> {
    pub bytes: &'a [u8],
    pub input_path: &'a Path,
    pub work_dir: &'a Path,
    pub stem: &'a str,
    pub input: Format,
    pub output: Format,
    pub config: &'a ConvertConfig,
}

/// One conversion routine. A pure function of the staged input; any state a
/// handler closes over must be immutable and thread-safe.
pub trait Handler: Send + Sync {
    fn convert(&self, staged: &Staged<'_>) -> Result<Outcome, FlexifileError>;
}

impl<F> Handler for F
where
    F: Fn(&Staged<'_>) -> Result<Outcome, FlexifileError> + Send + Sync,
{
    fn convert(&self, staged: &Staged<'_>) -> Result<Outcome, FlexifileError> {
        self(staged)
    }
}

/// The handler table. Built once, read-only thereafter.
#[derive(Default)]
pub struct Registry {
    handlers: HashMap<ConversionKey, Box<dyn Handler>>,
}

impl Registry {
    /// An empty registry, for callers wiring their own handler set.
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry with every built-in per-domain handler installed.
    pub fn builtin() -> Result<Self, FlexifileError> {
        let mut reg = Self::new();
        crate::domains::register_builtin(&mut reg)?;
        Ok(reg)
    }

    /// Register a handler for `key`. At most one handler may exist per key.
    pub fn register(
        &mut self,
        key: ConversionKey,
        handler: impl Handler + 'static,
    ) -> Result<(), FlexifileError> {
        if self.handlers.contains_key(&key) {
            return Err(FlexifileError::DuplicateHandler {
                domain: key.domain,
                input: key.input,
                output: key.output,
            });
        }
        self.handlers.insert(key, Box::new(handler));
        Ok(())
    }

    /// Exact-match lookup. `None` means "not supported".
    pub fn resolve(&self, key: &ConversionKey) -> Option<&dyn Handler> {
        self.handlers.get(key).map(|h| h.as_ref())
    }

    /// Every registered key, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &ConversionKey> {
        self.handlers.keys()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
