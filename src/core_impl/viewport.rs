use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBehavior {
    #[default]
    Instant,
    Smooth,
}

impl Page {
    pub fn scroll_y(&self) -> f64 {
        self.viewport.scroll_y
    }

    pub fn viewport_size(&self) -> (f64, f64) {
        (self.viewport.width, self.viewport.height)
    }

    pub fn is_scroll_animating(&self) -> bool {
        self.viewport.animation.is_some()
    }

    /// User scroll: jumps to `y` (clamped to the scrollable range) and
    /// cancels any smooth scroll in flight.
    pub fn scroll_to(&mut self, y: f64) -> Result<()> {
        if !y.is_finite() {
            return Err(Error::Runtime(format!("scroll_to requires a finite offset: {y}")));
        }
        self.cancel_scroll_animation();
        self.set_scroll_position(y)
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) -> Result<()> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(Error::Runtime(format!(
                "viewport must have a positive size: {width}x{height}"
            )));
        }
        self.viewport.width = width;
        self.viewport.height = height;
        self.refresh_viewport()
    }

    /// Re-clamps the scroll offset after the viewport or the content changed
    /// size, then runs an intersection pass.
    pub(crate) fn refresh_viewport(&mut self) -> Result<()> {
        let clamped = self.clamp_scroll(self.viewport.scroll_y);
        if clamped != self.viewport.scroll_y {
            self.set_scroll_position(clamped)
        } else {
            crate::site::reveal::on_viewport_change(self)
        }
    }

    /// `window.scrollTo({ top, behavior })`.
    pub(crate) fn scroll_window_to(&mut self, top: f64, behavior: ScrollBehavior) -> Result<()> {
        self.cancel_scroll_animation();
        let target = self.clamp_scroll(top);
        let duration_ms = self.config.smooth_scroll_duration_ms as i64;
        if behavior == ScrollBehavior::Instant
            || duration_ms == 0
            || target == self.viewport.scroll_y
        {
            return self.set_scroll_position(target);
        }

        let id = self.viewport.allocate_animation_id();
        self.viewport.animation = Some(ScrollAnimation {
            id,
            from: self.viewport.scroll_y,
            to: target,
            started_at: self.scheduler.now_ms,
            duration_ms,
            frame_timer: None,
        });
        self.trace_site_line(format!(
            "[site] smooth scroll id={id} from={} to={target} duration_ms={duration_ms}",
            self.viewport.scroll_y
        ));
        self.schedule_scroll_frame(id);
        Ok(())
    }

    fn schedule_scroll_frame(&mut self, animation_id: u64) {
        let frame_ms = self.config.smooth_scroll_frame_ms.max(1) as i64;
        let timer = self.schedule_timer(frame_ms, TimerAction::SmoothScrollFrame { animation_id });
        if let Some(animation) = self.viewport.animation.as_mut() {
            animation.frame_timer = Some(timer);
        }
    }

    pub(crate) fn run_smooth_scroll_frame(&mut self, animation_id: u64) -> Result<()> {
        let Some(animation) = self.viewport.animation else {
            return Ok(());
        };
        if animation.id != animation_id {
            return Ok(());
        }

        let elapsed = (self.scheduler.now_ms - animation.started_at).max(0);
        let progress = (elapsed as f64 / animation.duration_ms as f64).min(1.0);
        if progress >= 1.0 {
            self.viewport.animation = None;
            return self.set_scroll_position(animation.to);
        }

        let y = animation.from + (animation.to - animation.from) * ease_in_out_cubic(progress);
        self.set_scroll_position(y)?;
        // A scroll listener may have started a newer animation.
        if self
            .viewport
            .animation
            .is_some_and(|current| current.id == animation_id)
        {
            self.schedule_scroll_frame(animation_id);
        }
        Ok(())
    }

    fn cancel_scroll_animation(&mut self) {
        if let Some(animation) = self.viewport.animation.take() {
            if let Some(timer) = animation.frame_timer {
                self.cancel_timer(timer);
            }
            self.trace_site_line(format!(
                "[site] smooth scroll id={} canceled at={}",
                animation.id, self.viewport.scroll_y
            ));
        }
    }

    fn max_scroll(&self) -> f64 {
        (self.dom.content_height() - self.viewport.height).max(0.0)
    }

    fn clamp_scroll(&self, y: f64) -> f64 {
        y.clamp(0.0, self.max_scroll())
    }

    fn set_scroll_position(&mut self, y: f64) -> Result<()> {
        let clamped = self.clamp_scroll(y);
        if clamped == self.viewport.scroll_y {
            return Ok(());
        }
        self.viewport.scroll_y = clamped;
        let root = self.dom.root;
        self.dispatch_event(root, "scroll")?;
        crate::site::reveal::on_viewport_change(self)
    }
}

fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}
