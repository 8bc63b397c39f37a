use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Event listener; a returned value is collected as the listener's response
pub type Listener = Arc<dyn Fn(&str, &Value) -> Option<Value> + Send + Sync>;

/// Synchronous event dispatcher bound under `events`.
///
/// Listeners registered for a name ending in `*` receive every event
/// whose name starts with the part before the `*`. A listener that
/// responds with `false` stops propagation.
#[derive(Default)]
pub struct Dispatcher {
    listeners: RwLock<HashMap<String, Vec<Listener>>>,
    wildcards: RwLock<Vec<(String, Listener)>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for an event name or `prefix*` pattern
    pub fn listen<F>(&self, event: impl Into<String>, listener: F)
    where
        F: Fn(&str, &Value) -> Option<Value> + Send + Sync + 'static,
    {
        let event = event.into();
        let listener: Listener = Arc::new(listener);

        if let Some(prefix) = event.strip_suffix('*') {
            self.wildcards.write().push((prefix.to_string(), listener));
        } else {
            self.listeners.write().entry(event).or_default().push(listener);
        }
    }

    /// Check if anything listens for `event`
    pub fn has_listeners(&self, event: &str) -> bool {
        !self.listeners_for(event).is_empty()
    }

    /// Remove every listener registered under exactly `event`
    pub fn forget(&self, event: &str) {
        if let Some(prefix) = event.strip_suffix('*') {
            self.wildcards
                .write()
                .retain(|(pattern, _)| pattern != prefix);
        } else {
            self.listeners.write().remove(event);
        }
    }

    /// Call every listener and collect their responses
    pub fn dispatch(&self, event: &str, payload: &Value) -> Vec<Value> {
        self.fire(event, payload, false)
    }

    /// Call listeners until the first one responds, and return that response
    pub fn until(&self, event: &str, payload: &Value) -> Option<Value> {
        self.fire(event, payload, true).into_iter().next()
    }

    fn fire(&self, event: &str, payload: &Value, halt: bool) -> Vec<Value> {
        let mut responses = Vec::new();

        // Snapshot so listeners may register further listeners
        for listener in self.listeners_for(event) {
            match listener(event, payload) {
                Some(Value::Bool(false)) => break,
                Some(response) => {
                    responses.push(response);
                    if halt {
                        break;
                    }
                }
                None => {}
            }
        }

        responses
    }

    fn listeners_for(&self, event: &str) -> Vec<Listener> {
        let mut found: Vec<Listener> = self
            .listeners
            .read()
            .get(event)
            .cloned()
            .unwrap_or_default();

        found.extend(
            self.wildcards
                .read()
                .iter()
                .filter(|(prefix, _)| event.starts_with(prefix.as_str()))
                .map(|(_, listener)| listener.clone()),
        );

        found
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let events = self.listeners.read().len();
        let wildcards = self.wildcards.read().len();
        f.debug_struct("Dispatcher")
            .field("events", &events)
            .field("wildcards", &wildcards)
            .finish()
    }
}
