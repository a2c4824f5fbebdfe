use crate::{Error, Result};

/// Tunables of the site controllers and the page runtime they run on.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteConfig {
    /// Extra lead, above the header, at which a section already counts as current.
    pub nav_section_slack_px: f64,
    /// Quiet period of the navigation scroll handler; 0 recomputes on every event.
    pub nav_scroll_debounce_ms: u64,
    pub smooth_scroll_duration_ms: u64,
    pub smooth_scroll_frame_ms: u64,
    pub reveal_threshold: f64,
    pub reveal_root_margin_px: f64,
    pub reveal_offset_px: f64,
    pub reveal_stagger_ms: u64,
    pub reveal_duration_ms: u64,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub timer_step_limit: usize,
    pub clock_offset_seconds: i32,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            nav_section_slack_px: 100.0,
            nav_scroll_debounce_ms: 50,
            smooth_scroll_duration_ms: 300,
            smooth_scroll_frame_ms: 16,
            reveal_threshold: 0.1,
            reveal_root_margin_px: 50.0,
            reveal_offset_px: 30.0,
            reveal_stagger_ms: 100,
            reveal_duration_ms: 600,
            viewport_width: 1280.0,
            viewport_height: 720.0,
            timer_step_limit: 10_000,
            clock_offset_seconds: 0,
        }
    }
}

impl SiteConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.reveal_threshold > 0.0 && self.reveal_threshold <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "reveal_threshold must be in (0, 1]: {}",
                self.reveal_threshold
            )));
        }
        for (name, value) in [
            ("nav_section_slack_px", self.nav_section_slack_px),
            ("reveal_root_margin_px", self.reveal_root_margin_px),
            ("reveal_offset_px", self.reveal_offset_px),
        ] {
            if !value.is_finite() {
                return Err(Error::InvalidConfig(format!("{name} must be finite: {value}")));
            }
        }
        if !(self.viewport_width.is_finite()
            && self.viewport_height.is_finite()
            && self.viewport_width > 0.0
            && self.viewport_height > 0.0)
        {
            return Err(Error::InvalidConfig(format!(
                "viewport must have a positive size: {}x{}",
                self.viewport_width, self.viewport_height
            )));
        }
        if self.timer_step_limit == 0 {
            return Err(Error::InvalidConfig(
                "timer_step_limit must be at least 1".into(),
            ));
        }
        if self.clock_offset_seconds.unsigned_abs() >= 86_400 {
            return Err(Error::InvalidConfig(format!(
                "clock_offset_seconds must be within one day: {}",
                self.clock_offset_seconds
            )));
        }
        Ok(())
    }
}
