//! Manually driven screen state

use std::sync::Mutex;

use contracts::{ScreenEvent, ScreenEventCallback, ScreenStateSource};
use tracing::debug;

/// Screen state set from code (CLI timers, tests)
pub struct ManualScreenState {
    callback: Mutex<Option<ScreenEventCallback>>,
    current: Mutex<ScreenEvent>,
}

impl ManualScreenState {
    /// Starts with the screen on
    pub fn new() -> Self {
        Self {
            callback: Mutex::new(None),
            current: Mutex::new(ScreenEvent::On),
        }
    }

    /// Change the state and notify the observer
    ///
    /// Every call notifies, repeated states included, as platform broadcasts do.
    pub fn set(&self, event: ScreenEvent) {
        *self.current.lock().unwrap_or_else(|e| e.into_inner()) = event;
        debug!(?event, "screen state changed");

        let callback = self
            .callback
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        if let Some(callback) = callback {
            callback(event);
        }
    }

    pub fn turn_on(&self) {
        self.set(ScreenEvent::On);
    }

    pub fn turn_off(&self) {
        self.set(ScreenEvent::Off);
    }

    pub fn current(&self) -> ScreenEvent {
        *self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for ManualScreenState {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenStateSource for ManualScreenState {
    fn subscribe(&self, callback: ScreenEventCallback) {
        *self.callback.lock().unwrap_or_else(|e| e.into_inner()) = Some(callback);
    }

    fn unsubscribe(&self) {
        self.callback.lock().unwrap_or_else(|e| e.into_inner()).take();
    }

    fn is_subscribed(&self) -> bool {
        self.callback
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_notifies_subscriber() {
        let screen = ManualScreenState::new();
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        screen.subscribe(Arc::new(move |event: ScreenEvent| sink.lock().unwrap().push(event)));

        screen.turn_off();
        screen.turn_on();
        screen.unsubscribe();
        screen.unsubscribe();
        screen.turn_off();

        assert_eq!(*events.lock().unwrap(), vec![ScreenEvent::Off, ScreenEvent::On]);
        assert_eq!(screen.current(), ScreenEvent::Off);
        assert!(!screen.is_subscribed());
    }
}
