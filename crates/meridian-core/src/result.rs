//! Result type alias for Meridian.

use crate::MeridianError;

/// A specialized `Result` type for Meridian operations.
pub type MeridianResult<T> = Result<T, MeridianError>;
