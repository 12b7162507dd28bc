/// Revalidation policy of one subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwrOptions {
    /// Revalidate when the browser window regains focus
    pub revalidate_on_focus: bool,
    /// Keep showing the previous key's data while a new key loads
    pub keep_previous_data: bool,
    /// Poll period for near-real-time counters
    pub refresh_interval_ms: Option<u32>,
    /// Non-forced revalidations inside this window after the last request are skipped
    pub dedupe_interval_ms: u32,
    /// Report new fetch errors through the notifier
    pub notify_errors: bool,
}

pub const DEFAULT_DEDUPE_INTERVAL_MS: u32 = 2_000;

impl Default for SwrOptions {
    fn default() -> Self {
        Self {
            revalidate_on_focus: false,
            keep_previous_data: true,
            refresh_interval_ms: None,
            dedupe_interval_ms: DEFAULT_DEDUPE_INTERVAL_MS,
            notify_errors: false,
        }
    }
}

impl SwrOptions {
    pub fn with_refresh_interval(mut self, ms: u32) -> Self {
        self.refresh_interval_ms = Some(ms);
        self
    }

    pub fn with_dedupe_interval(mut self, ms: u32) -> Self {
        self.dedupe_interval_ms = ms;
        self
    }

    pub fn with_focus_revalidation(mut self) -> Self {
        self.revalidate_on_focus = true;
        self
    }

    pub fn without_previous_data(mut self) -> Self {
        self.keep_previous_data = false;
        self
    }

    pub fn with_error_notifications(mut self) -> Self {
        self.notify_errors = true;
        self
    }
}
