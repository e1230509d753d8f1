//! ScreenStateSource trait - Screen on/off notifications

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Screen power transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenEvent {
    On,
    Off,
}

/// Screen event callback type
pub type ScreenEventCallback = Arc<dyn Fn(ScreenEvent) + Send + Sync>;

/// Screen state observer registration
pub trait ScreenStateSource: Send + Sync {
    /// Register the observer; replaces a previous registration
    fn subscribe(&self, callback: ScreenEventCallback);

    /// Remove the observer; tolerates double unsubscribe
    fn unsubscribe(&self);

    /// Whether an observer is registered
    fn is_subscribed(&self) -> bool;
}
