use super::*;

impl Page {
    pub(crate) fn schedule_timer(&mut self, delay_ms: i64, action: TimerAction) -> i64 {
        let delay_ms = delay_ms.max(0);
        let id = self.scheduler.allocate_timer_id();
        let order = self.scheduler.allocate_task_order();
        let due_at = self.scheduler.now_ms.saturating_add(delay_ms);
        self.scheduler.task_queue.push(ScheduledTask {
            id,
            due_at,
            order,
            action,
        });
        self.trace_timer_line(format!(
            "[timer] schedule id={id} due_at={due_at} delay_ms={delay_ms} action={action:?}"
        ));
        id
    }

    pub(crate) fn cancel_timer(&mut self, timer_id: i64) -> bool {
        let before = self.scheduler.task_queue.len();
        self.scheduler.task_queue.retain(|task| task.id != timer_id);
        let canceled = self.scheduler.task_queue.len() != before;
        if canceled {
            self.trace_timer_line(format!("[timer] cancel id={timer_id}"));
        }
        canceled
    }

    pub fn now_ms(&self) -> i64 {
        self.scheduler.now_ms
    }

    pub fn pending_timer_count(&self) -> usize {
        self.scheduler.task_queue.len()
    }

    pub fn clear_all_timers(&mut self) -> usize {
        let cleared = self.scheduler.task_queue.len();
        self.scheduler.task_queue.clear();
        self.viewport.animation = None;
        self.site.nav_debounce.pending = None;
        self.trace_timer_line(format!("[timer] clear_all cleared={cleared}"));
        cleared
    }

    pub fn set_timer_step_limit(&mut self, max_steps: usize) -> Result<()> {
        if max_steps == 0 {
            return Err(Error::Runtime(
                "set_timer_step_limit requires at least 1 step".into(),
            ));
        }
        self.scheduler.timer_step_limit = max_steps;
        Ok(())
    }

    /// Moves the virtual clock forward and runs every timer that became due.
    pub fn advance_time(&mut self, delta_ms: i64) -> Result<()> {
        if delta_ms < 0 {
            return Err(Error::Runtime(
                "advance_time requires non-negative milliseconds".into(),
            ));
        }
        let from = self.scheduler.now_ms;
        let target = from.saturating_add(delta_ms);
        let ran = self.run_timer_queue(Some(target))?;
        self.scheduler.now_ms = target;
        self.trace_timer_line(format!(
            "[timer] advance delta_ms={delta_ms} from={from} to={target} ran_due={ran}"
        ));
        Ok(())
    }

    /// Runs timers until the queue is empty, advancing the clock to each due time.
    pub fn flush(&mut self) -> Result<()> {
        let from = self.scheduler.now_ms;
        let ran = self.run_timer_queue(None)?;
        self.trace_timer_line(format!(
            "[timer] flush from={from} to={} ran={ran}",
            self.scheduler.now_ms
        ));
        Ok(())
    }

    fn run_timer_queue(&mut self, due_limit: Option<i64>) -> Result<usize> {
        let mut steps = 0usize;
        while let Some(next_idx) = self.scheduler.next_task_index(due_limit) {
            steps += 1;
            if steps > self.scheduler.timer_step_limit {
                return Err(Error::Runtime(format!(
                    "timer step limit exceeded: limit={}, now_ms={}, due_limit={}, pending_tasks={}",
                    self.scheduler.timer_step_limit,
                    self.scheduler.now_ms,
                    due_limit.map_or_else(|| "none".to_string(), |limit| limit.to_string()),
                    self.scheduler.task_queue.len()
                )));
            }
            let task = self.scheduler.task_queue.remove(next_idx);
            if task.due_at > self.scheduler.now_ms {
                self.scheduler.now_ms = task.due_at;
            }
            self.trace_timer_line(format!(
                "[timer] run id={} due_at={} now_ms={} action={:?}",
                task.id, task.due_at, self.scheduler.now_ms, task.action
            ));
            self.execute_timer_action(task.action)?;
        }
        Ok(steps)
    }

    fn execute_timer_action(&mut self, action: TimerAction) -> Result<()> {
        match action {
            TimerAction::NavScrollSettled => crate::site::navigation::on_scroll_settled(self),
            TimerAction::SmoothScrollFrame { animation_id } => {
                self.run_smooth_scroll_frame(animation_id)
            }
        }
    }

    pub(crate) fn trace_timer_line(&mut self, line: String) {
        if self.trace.enabled && self.trace.timers {
            self.trace.push(line);
        }
    }
}
