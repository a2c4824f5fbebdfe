use super::*;
use crate::site::{SiteConfig, SiteState};
use chrono::{DateTime, FixedOffset, TimeDelta, Utc};

/// A loaded page: the document, its listeners, the viewport and the virtual
/// clock, with the site behavior booted as it would be on `DOMContentLoaded`.
#[derive(Debug)]
pub struct Page {
    pub(crate) dom: Dom,
    pub(crate) listeners: ListenerStore,
    pub(crate) scheduler: SchedulerState,
    pub(crate) viewport: ViewportState,
    pub(crate) platform_mocks: PlatformMockState,
    pub(crate) trace: TraceState,
    pub(crate) config: SiteConfig,
    pub(crate) site: SiteState,
    pub(crate) clock_origin: DateTime<FixedOffset>,
}

impl Page {
    pub fn from_html(html: &str) -> Result<Self> {
        Self::from_html_with_config(html, SiteConfig::default())
    }

    pub fn from_html_with_config(html: &str, config: SiteConfig) -> Result<Self> {
        config.validate()?;
        let offset = FixedOffset::east_opt(config.clock_offset_seconds).ok_or_else(|| {
            Error::InvalidConfig(format!(
                "clock_offset_seconds out of range: {}",
                config.clock_offset_seconds
            ))
        })?;
        let dom = parse_html(html)?;
        let scheduler = SchedulerState {
            timer_step_limit: config.timer_step_limit,
            ..SchedulerState::default()
        };

        let mut page = Self {
            dom,
            listeners: ListenerStore::default(),
            scheduler,
            viewport: ViewportState::new(config.viewport_width, config.viewport_height),
            platform_mocks: PlatformMockState::default(),
            trace: TraceState::default(),
            site: SiteState::new(&config),
            config,
            clock_origin: Utc::now().with_timezone(&offset),
        };

        crate::site::boot(&mut page)?;
        Ok(page)
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn set_clock_origin(&mut self, origin: DateTime<FixedOffset>) {
        self.clock_origin = origin;
    }

    /// Wall-clock time of the page: the clock origin plus the virtual clock.
    pub fn current_time(&self) -> DateTime<FixedOffset> {
        TimeDelta::try_milliseconds(self.scheduler.now_ms)
            .and_then(|delta| self.clock_origin.checked_add_signed(delta))
            .unwrap_or(self.clock_origin)
    }

    pub fn click(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.click_node(target)
    }

    pub(crate) fn click_node(&mut self, target: NodeId) -> Result<()> {
        let outcome = self.dispatch_event(target, "click")?;
        if outcome.default_prevented {
            return Ok(());
        }

        if self.is_submit_control(target) {
            if let Some(form) = self.dom.closest(target, "form")? {
                self.dispatch_event(form, "submit")?;
            }
            return Ok(());
        }

        if let Some(anchor) = self.dom.closest(target, "a[href]")? {
            self.follow_fragment_link(anchor)?;
        }
        Ok(())
    }

    fn is_submit_control(&self, node: NodeId) -> bool {
        let kind = self
            .dom
            .attr(node, "type")
            .unwrap_or_default()
            .to_ascii_lowercase();
        if self.dom.is_tag(node, "button") {
            return kind.is_empty() || kind == "submit";
        }
        self.dom.is_tag(node, "input") && kind == "submit"
    }

    /// Default action of an in-page anchor: jump to the target's top edge.
    fn follow_fragment_link(&mut self, anchor: NodeId) -> Result<()> {
        let href = self.dom.attr(anchor, "href").unwrap_or_default();
        let Some(fragment) = href.strip_prefix('#').filter(|id| !id.is_empty()) else {
            return Ok(());
        };
        let Some(target) = self.dom.by_id(fragment) else {
            return Ok(());
        };
        let top = self.dom.offset_top(target);
        self.trace_site_line(format!("[site] default navigation href={href} top={top}"));
        self.scroll_window_to(top, ScrollBehavior::Instant)
    }

    pub fn hover(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.dispatch_event(target, "mouseenter")?;
        Ok(())
    }

    pub fn unhover(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.dispatch_event(target, "mouseleave")?;
        Ok(())
    }

    pub fn type_text(&mut self, selector: &str, text: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let tag = self
            .dom
            .tag_name(target)
            .unwrap_or_default()
            .to_ascii_lowercase();
        if tag != "input" && tag != "textarea" {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "input or textarea".into(),
                actual: tag,
            });
        }
        if self.dom.attr(target, "disabled").is_some() || self.dom.attr(target, "readonly").is_some()
        {
            return Ok(());
        }

        self.dom.set_value(target, text)?;
        self.dispatch_event(target, "input")?;
        Ok(())
    }

    pub fn submit(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if let Some(form) = self.dom.closest(target, "form")? {
            self.dispatch_event(form, "submit")?;
        }
        Ok(())
    }

    pub fn dispatch(&mut self, selector: &str, event: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.dispatch_event(target, event)?;
        Ok(())
    }

    /// Assigns the vertical layout box of the first element matching `selector`.
    pub fn set_layout(&mut self, selector: &str, top: f64, height: f64) -> Result<()> {
        if !(top.is_finite() && height.is_finite() && height >= 0.0) {
            return Err(Error::Runtime(format!(
                "invalid layout for {selector}: top={top} height={height}"
            )));
        }
        let target = self.select_one(selector)?;
        self.dom.set_layout(target, LayoutBox { top, height })?;
        self.refresh_viewport()
    }

    pub fn take_alert_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.platform_mocks.alert_messages)
    }

    pub fn take_console_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.platform_mocks.console_messages)
    }

    pub(crate) fn alert(&mut self, message: String) {
        self.trace_site_line(format!("[site] alert lines={}", message.lines().count()));
        self.platform_mocks.alert_messages.push(message);
    }

    pub(crate) fn console_log(&mut self, message: &str) {
        self.trace_site_line(format!("[site] console {message}"));
        self.platform_mocks.console_messages.push(message.to_string());
    }

    pub fn text(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(self.dom.text_content(target))
    }

    pub fn value(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        self.dom.value(target)
    }

    pub fn attr(&self, selector: &str, name: &str) -> Result<Option<String>> {
        let target = self.select_one(selector)?;
        Ok(self.dom.attr(target, name))
    }

    /// Inline style declaration `property` (CSS name) of the first match.
    pub fn style(&self, selector: &str, property: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        self.dom.style_get(target, property)
    }

    pub fn count(&self, selector: &str) -> Result<usize> {
        Ok(self.dom.query_selector_all(selector)?.len())
    }

    pub fn assert_text(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.text_content(target);
        if actual.trim() != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: expected.to_string(),
                actual,
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    pub fn assert_value(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.value(target)?;
        if actual != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: expected.to_string(),
                actual,
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    pub fn assert_style(&self, selector: &str, property: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.style_get(target, property)?;
        if actual != expected {
            return Err(Error::AssertionFailed {
                selector: format!("{selector} {{{property}}}"),
                expected: expected.to_string(),
                actual,
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    pub fn assert_exists(&self, selector: &str) -> Result<()> {
        let _ = self.select_one(selector)?;
        Ok(())
    }

    pub fn assert_missing(&self, selector: &str) -> Result<()> {
        if let Some(found) = self.dom.query_selector(selector)? {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: "no match".into(),
                actual: "element present".into(),
                dom_snippet: self.node_snippet(found),
            });
        }
        Ok(())
    }

    pub fn dump_dom(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(self.dom.dump_node(target))
    }

    pub fn dump_document(&self) -> String {
        self.dom.dump_node(self.dom.root)
    }

    pub fn enable_trace(&mut self, enabled: bool) {
        self.trace.enabled = enabled;
    }

    pub fn take_trace_logs(&mut self) -> Vec<String> {
        std::mem::take(&mut self.trace.logs).into_iter().collect()
    }

    pub fn set_trace_stderr(&mut self, enabled: bool) {
        self.trace.to_stderr = enabled;
    }

    pub fn set_trace_events(&mut self, enabled: bool) {
        self.trace.events = enabled;
    }

    pub fn set_trace_timers(&mut self, enabled: bool) {
        self.trace.timers = enabled;
    }

    pub fn set_trace_site(&mut self, enabled: bool) {
        self.trace.site = enabled;
    }

    pub fn set_trace_log_limit(&mut self, max_entries: usize) -> Result<()> {
        if max_entries == 0 {
            return Err(Error::Runtime(
                "set_trace_log_limit requires at least 1 entry".into(),
            ));
        }
        self.trace.log_limit = max_entries;
        while self.trace.logs.len() > max_entries {
            self.trace.logs.pop_front();
        }
        Ok(())
    }

    pub(crate) fn trace_site_line(&mut self, line: String) {
        if self.trace.enabled && self.trace.site {
            self.trace.push(line);
        }
    }

    pub(crate) fn select_one(&self, selector: &str) -> Result<NodeId> {
        self.dom
            .query_selector(selector)?
            .ok_or_else(|| Error::SelectorNotFound(selector.to_string()))
    }

    fn node_snippet(&self, node_id: NodeId) -> String {
        truncate_chars(&self.dom.dump_node(node_id), 200)
    }

    /// `document.head`, falling back to `body` and then the document itself.
    pub(crate) fn head_or_fallback(&self) -> Result<NodeId> {
        if let Some(head) = self.dom.query_selector("head")? {
            return Ok(head);
        }
        self.body_or_fallback()
    }

    pub(crate) fn body_or_fallback(&self) -> Result<NodeId> {
        Ok(self.dom.query_selector("body")?.unwrap_or(self.dom.root))
    }
}
