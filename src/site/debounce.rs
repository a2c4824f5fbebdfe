use crate::Page;
use crate::runtime_state::TimerAction;

/// Trailing-edge debounce on the page's virtual clock.
#[derive(Debug, Clone)]
pub(crate) struct Debouncer {
    pub(crate) wait_ms: u64,
    pub(crate) pending: Option<i64>,
    action: TimerAction,
}

impl Debouncer {
    pub(crate) fn new(wait_ms: u64, action: TimerAction) -> Self {
        Self {
            wait_ms,
            pending: None,
            action,
        }
    }

    pub(crate) fn is_immediate(&self) -> bool {
        self.wait_ms == 0
    }

    #[cfg(test)]
    pub(crate) fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Page {
    /// Restarts the quiet period of the navigation scroll debouncer.
    pub(crate) fn debounce_nav_scroll(&mut self) {
        self.cancel_nav_scroll_debounce();
        let wait_ms = i64::try_from(self.site.nav_debounce.wait_ms).unwrap_or(i64::MAX);
        let action = self.site.nav_debounce.action;
        let timer = self.schedule_timer(wait_ms, action);
        self.site.nav_debounce.pending = Some(timer);
    }

    pub(crate) fn cancel_nav_scroll_debounce(&mut self) {
        if let Some(timer) = self.site.nav_debounce.pending.take() {
            self.cancel_timer(timer);
        }
    }
}
