//! View state of the catalog screens.
//!
//! A view subscribes to the service's channels when it is constructed and
//! unsubscribes when it is dropped. Rendering is left to the caller.

mod create;
mod details;
mod messages;
mod search;
mod update;

pub use create::*;
pub use details::*;
pub use messages::*;
pub use search::*;
pub use update::*;

use tokio::sync::broadcast::error::TryRecvError;
use tokio::sync::broadcast::Receiver;

/// Path of the start page, target of every successful save.
pub const HOME_PATH: &str = "/";

/// Navigation could not be carried out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationError(pub String);

impl std::fmt::Display for NavigationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Navigation failed: {}", self.0)
    }
}

impl std::error::Error for NavigationError {}

/// Moves the application to another page.
pub trait Navigator {
    /// `Ok(false)` means a guard refused the navigation.
    fn navigate(&self, path: &str) -> Result<bool, NavigationError>;
}

/// Take the next already-published event without waiting.
pub(crate) fn try_take<T: Clone>(receiver: &mut Receiver<T>) -> Option<T> {
    loop {
        match receiver.try_recv() {
            Ok(value) => return Some(value),
            Err(TryRecvError::Lagged(skipped)) => {
                tracing::warn!("View lagged behind by {} events", skipped);
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
        }
    }
}
