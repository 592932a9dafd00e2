// Host dashboard capabilities the selector pushes timewindows into
use crate::domain::timewindow::Timewindow;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("host does not provide a {0} timewindow update")]
pub struct HostUnavailable(pub PushTarget);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PushTarget {
    Dashboard,
    Widget,
}

impl std::fmt::Display for PushTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PushTarget::Dashboard => f.write_str("dashboard"),
            PushTarget::Widget => f.write_str("widget"),
        }
    }
}

/// The surrounding dashboard platform. Both update callbacks are optional
/// capabilities; the defaults report them as unavailable.
pub trait TimewindowHost {
    /// Selects which callback receives pushes.
    fn use_dashboard_timewindow(&self) -> bool;

    fn update_dashboard_timewindow(&mut self, _timewindow: &Timewindow) -> Result<(), HostUnavailable> {
        Err(HostUnavailable(PushTarget::Dashboard))
    }

    fn update_widget_timewindow(&mut self, _timewindow: &Timewindow) -> Result<(), HostUnavailable> {
        Err(HostUnavailable(PushTarget::Widget))
    }
}

/// Hand the timewindow to exactly one callback, chosen by the host flag.
pub fn push_timewindow(
    host: &mut dyn TimewindowHost,
    timewindow: &Timewindow,
) -> Result<PushTarget, HostUnavailable> {
    if host.use_dashboard_timewindow() {
        host.update_dashboard_timewindow(timewindow)?;
        Ok(PushTarget::Dashboard)
    } else {
        host.update_widget_timewindow(timewindow)?;
        Ok(PushTarget::Widget)
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;

    /// Records every callback invocation.
    #[derive(Debug, Default)]
    pub struct RecordingHost {
        pub use_dashboard: bool,
        pub dashboard_available: bool,
        pub widget_available: bool,
        pub dashboard_calls: Vec<Timewindow>,
        pub widget_calls: Vec<Timewindow>,
    }

    impl RecordingHost {
        pub fn dashboard() -> Self {
            Self {
                use_dashboard: true,
                dashboard_available: true,
                widget_available: true,
                ..Default::default()
            }
        }

        pub fn widget() -> Self {
            Self {
                use_dashboard: false,
                ..Self::dashboard()
            }
        }

        pub fn total_calls(&self) -> usize {
            self.dashboard_calls.len() + self.widget_calls.len()
        }
    }

    impl TimewindowHost for RecordingHost {
        fn use_dashboard_timewindow(&self) -> bool {
            self.use_dashboard
        }

        fn update_dashboard_timewindow(&mut self, timewindow: &Timewindow) -> Result<(), HostUnavailable> {
            if !self.dashboard_available {
                return Err(HostUnavailable(PushTarget::Dashboard));
            }
            self.dashboard_calls.push(*timewindow);
            Ok(())
        }

        fn update_widget_timewindow(&mut self, timewindow: &Timewindow) -> Result<(), HostUnavailable> {
            if !self.widget_available {
                return Err(HostUnavailable(PushTarget::Widget));
            }
            self.widget_calls.push(*timewindow);
            Ok(())
        }
    }
}
