//! Navigation subsystem trait.

use crate::types::Route;

/// Performs navigation on behalf of the guard and the activation flow.
pub trait Navigator {
    /// Navigate to `target`.
    fn navigate(&self, target: &Route);
}
