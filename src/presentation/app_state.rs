// Application state for HTTP handlers
use crate::application::clock::Clock;
use crate::application::data_context::DataContext;
use crate::application::registry::SelectorRegistry;
use crate::application::settings::WidgetSettings;
use crate::infrastructure::host_timewindows::HostTimewindows;
use crate::presentation::error::ApiError;
use chrono::Local;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

pub struct AppState {
    pub widget_defaults: WidgetSettings,
    pub use_dashboard_timewindow: bool,
    sessions: Mutex<WidgetSessions>,
}

/// Everything mutable, behind one lock so handlers run one at a time
/// against the selectors.
pub struct WidgetSessions {
    pub selectors: SelectorRegistry<Local>,
    pub contexts: HashMap<String, DataContext>,
    pub host: HostTimewindows,
}

impl AppState {
    pub fn new(widget_defaults: WidgetSettings, use_dashboard_timewindow: bool, clock: Arc<dyn Clock>) -> Self {
        Self {
            widget_defaults,
            use_dashboard_timewindow,
            sessions: Mutex::new(WidgetSessions {
                selectors: SelectorRegistry::new(Local, clock),
                contexts: HashMap::new(),
                host: HostTimewindows::default(),
            }),
        }
    }

    pub fn sessions(&self) -> Result<MutexGuard<'_, WidgetSessions>, ApiError> {
        self.sessions.lock().map_err(|_| ApiError::StatePoisoned)
    }
}
