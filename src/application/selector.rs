// Timewindow selector state machine
use crate::application::clock::Clock;
use crate::application::custom_range::calculate_custom_range;
use crate::application::data_context::DataContext;
use crate::application::host::{push_timewindow, HostUnavailable, PushTarget, TimewindowHost};
use crate::application::settings::SelectorSettings;
use crate::domain::calendar::{calculate_range, shift_reference};
use crate::domain::date_format::DateFormatter;
use crate::domain::timewindow::{Direction, SelectorMode, TimeRange, Timewindow};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;
use std::sync::Arc;

pub const CUSTOM_PLACEHOLDER_LABEL: &str = "Custom";

#[derive(Debug, Clone, PartialEq)]
pub struct SelectorState {
    pub mode: SelectorMode,
    pub reference_date: DateTime<Utc>,
    /// User-picked range; start and end are always set together.
    pub custom: Option<TimeRange>,
}

impl SelectorState {
    pub fn custom_start(&self) -> Option<i64> {
        self.custom.map(|r| r.start_ms)
    }

    pub fn custom_end(&self) -> Option<i64> {
        self.custom.map(|r| r.end_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ApplyOutcome {
    Pushed {
        target: PushTarget,
        timewindow: Timewindow,
    },
    /// A range was resolved but the host lacks the selected callback.
    HostUnavailable {
        target: PushTarget,
        timewindow: Timewindow,
    },
    /// Nothing to push; only the label was refreshed.
    LabelOnly,
}

impl ApplyOutcome {
    pub fn timewindow(&self) -> Option<Timewindow> {
        match self {
            ApplyOutcome::Pushed { timewindow, .. } | ApplyOutcome::HostUnavailable { timewindow, .. } => {
                Some(*timewindow)
            }
            ApplyOutcome::LabelOnly => None,
        }
    }
}

/// How much of the widget the caller has to redraw after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderScope {
    Full,
    LabelOnly,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub outcome: ApplyOutcome,
    pub render: RenderScope,
}

pub struct TimewindowSelector<Tz: TimeZone> {
    settings: SelectorSettings,
    formatter: DateFormatter,
    tz: Tz,
    clock: Arc<dyn Clock>,
    state: SelectorState,
    label: String,
}

impl<Tz: TimeZone> TimewindowSelector<Tz> {
    pub fn new(settings: SelectorSettings, tz: Tz, clock: Arc<dyn Clock>) -> Self {
        let state = SelectorState {
            mode: settings.default_mode,
            reference_date: clock.now(),
            custom: None,
        };

        let mut selector = Self {
            settings,
            formatter: DateFormatter::standard(),
            tz,
            clock,
            state,
            label: String::new(),
        };
        let range = selector.resolve_range(&DataContext::default());
        selector.label = selector.format_label(range);
        selector
    }

    pub fn state(&self) -> &SelectorState {
        &self.state
    }

    pub fn mode(&self) -> SelectorMode {
        self.state.mode
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn settings(&self) -> &SelectorSettings {
        &self.settings
    }

    /// Switch mode. Calendar modes restart from "now" and drop any custom pick.
    pub fn select_mode(
        &mut self,
        mode: SelectorMode,
        host: &mut dyn TimewindowHost,
        context: &DataContext,
    ) -> Transition {
        tracing::debug!("Selector mode {} -> {}", self.state.mode, mode);
        self.state.mode = mode;
        if mode.is_calendar() {
            self.state.reference_date = self.clock.now();
            self.state.custom = None;
        }

        Transition {
            outcome: self.apply(host, context),
            render: RenderScope::Full,
        }
    }

    /// Step one day/week/month. Returns `None` in custom mode.
    pub fn navigate(
        &mut self,
        direction: Direction,
        host: &mut dyn TimewindowHost,
        context: &DataContext,
    ) -> Option<Transition> {
        let Some(period) = self.state.mode.calendar_period() else {
            tracing::debug!("Ignoring navigation in custom mode");
            return None;
        };

        let shifted = shift_reference(period, &self.local(self.state.reference_date), direction);
        self.state.reference_date = shifted.with_timezone(&Utc);

        Some(Transition {
            outcome: self.apply(host, context),
            render: RenderScope::LabelOnly,
        })
    }

    /// Date-picker apply: store the picked range and push it. Bounds given in
    /// reverse order are swapped.
    pub fn apply_custom_range(
        &mut self,
        start_ms: i64,
        end_ms: i64,
        host: &mut dyn TimewindowHost,
    ) -> Transition {
        let range = TimeRange::new(start_ms.min(end_ms), start_ms.max(end_ms));
        self.state.mode = SelectorMode::Custom;
        self.state.custom = Some(range);

        Transition {
            outcome: self.reconcile(Some(range), host),
            render: RenderScope::LabelOnly,
        }
    }

    /// Recompute the range for the current state and push it to the host.
    pub fn apply(&mut self, host: &mut dyn TimewindowHost, context: &DataContext) -> ApplyOutcome {
        let range = self.resolve_range(context);
        self.reconcile(range, host)
    }

    /// Custom mode precedence: user pick, then configured bounds, then nothing.
    pub fn resolve_range(&self, context: &DataContext) -> Option<TimeRange> {
        match self.state.mode.calendar_period() {
            Some(period) => Some(calculate_range(period, &self.local(self.state.reference_date))),
            None => {
                if let Some(picked) = self.state.custom {
                    Some(picked)
                } else if self.settings.has_custom_bounds() {
                    let now = self.local(self.clock.now());
                    Some(calculate_custom_range(&self.settings, context, &now))
                } else {
                    None
                }
            }
        }
    }

    fn reconcile(&mut self, range: Option<TimeRange>, host: &mut dyn TimewindowHost) -> ApplyOutcome {
        self.label = self.format_label(range);

        let Some(range) = range else {
            tracing::debug!("No custom range to apply, keeping host timewindow");
            return ApplyOutcome::LabelOnly;
        };

        let timewindow = Timewindow::new(range, self.settings.aggregation);
        match push_timewindow(host, &timewindow) {
            Ok(target) => {
                tracing::debug!(
                    "Pushed {} timewindow {}..{}",
                    target,
                    range.start_ms,
                    range.end_ms
                );
                ApplyOutcome::Pushed { target, timewindow }
            }
            Err(HostUnavailable(target)) => {
                tracing::warn!("Host has no {} timewindow callback, skipping push", target);
                ApplyOutcome::HostUnavailable { target, timewindow }
            }
        }
    }

    fn format_label(&self, range: Option<TimeRange>) -> String {
        let Some(range) = range else {
            return CUSTOM_PLACEHOLDER_LABEL.to_string();
        };
        let (Some(start), Some(end)) = (self.naive_local(range.start_ms), self.naive_local(range.end_ms)) else {
            return CUSTOM_PLACEHOLDER_LABEL.to_string();
        };

        let s = &self.settings;
        match self.state.mode {
            SelectorMode::Day => self.formatter.format(&s.day_format, &start),
            SelectorMode::Week => format!(
                "{} - {}",
                self.formatter.format(&s.week_format, &start),
                self.formatter.format(&s.week_format, &end)
            ),
            SelectorMode::Month => self.formatter.format(&s.month_format, &start),
            SelectorMode::Custom => format!(
                "{} - {}",
                self.formatter.format(&s.custom_format, &start),
                self.formatter.format(&s.custom_format, &end)
            ),
        }
    }

    fn local(&self, instant: DateTime<Utc>) -> DateTime<Tz> {
        instant.with_timezone(&self.tz)
    }

    fn naive_local(&self, ms: i64) -> Option<NaiveDateTime> {
        DateTime::<Utc>::from_timestamp_millis(ms).map(|dt| self.local(dt).naive_local())
    }
}
