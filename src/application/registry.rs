// Registry of selector instances keyed by widget container
use crate::application::clock::Clock;
use crate::application::selector::TimewindowSelector;
use crate::application::settings::SelectorSettings;
use chrono::TimeZone;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Created,
    Existing,
}

/// One selector per container id. Initializing a container twice returns
/// the instance created the first time, with its state intact.
pub struct SelectorRegistry<Tz: TimeZone> {
    selectors: HashMap<String, TimewindowSelector<Tz>>,
    tz: Tz,
    clock: Arc<dyn Clock>,
}

impl<Tz: TimeZone> SelectorRegistry<Tz> {
    pub fn new(tz: Tz, clock: Arc<dyn Clock>) -> Self {
        Self {
            selectors: HashMap::new(),
            tz,
            clock,
        }
    }

    /// `settings` is only evaluated when the container is new.
    pub fn get_or_init<F>(&mut self, container_id: &str, settings: F) -> (&mut TimewindowSelector<Tz>, Registration)
    where
        F: FnOnce() -> SelectorSettings,
    {
        match self.selectors.entry(container_id.to_string()) {
            Entry::Occupied(entry) => {
                tracing::debug!("Reusing selector for container {}", container_id);
                (entry.into_mut(), Registration::Existing)
            }
            Entry::Vacant(entry) => {
                tracing::info!("Creating selector for container {}", container_id);
                let selector = TimewindowSelector::new(settings(), self.tz.clone(), self.clock.clone());
                (entry.insert(selector), Registration::Created)
            }
        }
    }

    pub fn get(&self, container_id: &str) -> Option<&TimewindowSelector<Tz>> {
        self.selectors.get(container_id)
    }

    pub fn get_mut(&mut self, container_id: &str) -> Option<&mut TimewindowSelector<Tz>> {
        self.selectors.get_mut(container_id)
    }

    /// Widget teardown.
    pub fn remove(&mut self, container_id: &str) -> Option<TimewindowSelector<Tz>> {
        let removed = self.selectors.remove(container_id);
        if removed.is_some() {
            tracing::info!("Destroyed selector for container {}", container_id);
        }
        removed
    }
}
