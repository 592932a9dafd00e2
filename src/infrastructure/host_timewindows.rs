// In-memory stand-in for the dashboard platform's timewindow state
use crate::application::host::{HostUnavailable, TimewindowHost};
use crate::domain::timewindow::Timewindow;
use std::collections::HashMap;

/// Last timewindow applied dashboard-wide and per widget.
#[derive(Debug, Default)]
pub struct HostTimewindows {
    dashboard: Option<Timewindow>,
    widgets: HashMap<String, Timewindow>,
}

impl HostTimewindows {
    pub fn dashboard(&self) -> Option<&Timewindow> {
        self.dashboard.as_ref()
    }

    pub fn widget(&self, widget_id: &str) -> Option<&Timewindow> {
        self.widgets.get(widget_id)
    }

    pub fn forget_widget(&mut self, widget_id: &str) {
        self.widgets.remove(widget_id);
    }

    /// Host view bound to a single widget.
    pub fn for_widget<'a>(&'a mut self, widget_id: &'a str, use_dashboard_timewindow: bool) -> WidgetHost<'a> {
        WidgetHost {
            store: self,
            widget_id,
            use_dashboard_timewindow,
        }
    }
}

pub struct WidgetHost<'a> {
    store: &'a mut HostTimewindows,
    widget_id: &'a str,
    use_dashboard_timewindow: bool,
}

impl TimewindowHost for WidgetHost<'_> {
    fn use_dashboard_timewindow(&self) -> bool {
        self.use_dashboard_timewindow
    }

    fn update_dashboard_timewindow(&mut self, timewindow: &Timewindow) -> Result<(), HostUnavailable> {
        tracing::info!(widget = self.widget_id, "Updating dashboard timewindow");
        self.store.dashboard = Some(*timewindow);
        Ok(())
    }

    fn update_widget_timewindow(&mut self, timewindow: &Timewindow) -> Result<(), HostUnavailable> {
        tracing::info!(widget = self.widget_id, "Updating widget timewindow");
        self.store.widgets.insert(self.widget_id.to_string(), *timewindow);
        Ok(())
    }
}
