//! Build errors for the controller builder.

use thiserror::Error;

/// Errors that can occur when building a controller.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Context not specified. Call .context(value) or .shared_context(rc) before .build()")]
    MissingContext,

    #[error("Hooks not specified. Call .hooks(..), .handlers(..) or .dummy() before .build()")]
    MissingHooks,
}
