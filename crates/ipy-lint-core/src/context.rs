//! Context types for rule execution.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative stop signal shared between a driver and its analyses.
///
/// Cloning yields a handle to the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    /// Creates a flag that is not yet cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Returns true once cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Context provided to rules alongside each method.
///
/// Describes where the method came from. Nothing in it is mutable, so the
/// same context is shared by every concurrent rule invocation on a model.
#[derive(Debug, Clone, Copy)]
pub struct SymbolContext<'a> {
    /// Path of the symbol model file, or a synthetic name for in-memory models.
    pub model_path: &'a Path,
    /// Assembly the symbols were taken from.
    pub assembly: &'a str,
    /// Stop signal of the driving analysis.
    pub cancellation: &'a CancellationFlag,
}

impl<'a> SymbolContext<'a> {
    /// Creates a new symbol context.
    #[must_use]
    pub fn new(
        model_path: &'a Path,
        assembly: &'a str,
        cancellation: &'a CancellationFlag,
    ) -> Self {
        Self {
            model_path,
            assembly,
            cancellation,
        }
    }
}
