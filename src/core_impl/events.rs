use super::*;
use crate::site::Handler;

#[derive(Debug, Default, Clone)]
pub(crate) struct ListenerStore {
    map: HashMap<NodeId, HashMap<String, Vec<Handler>>>,
}

impl ListenerStore {
    pub(crate) fn add(&mut self, node_id: NodeId, event: &str, handler: Handler) {
        self.map
            .entry(node_id)
            .or_default()
            .entry(event.to_string())
            .or_default()
            .push(handler);
    }

    pub(crate) fn get(&self, node_id: NodeId, event: &str) -> Vec<Handler> {
        self.map
            .get(&node_id)
            .and_then(|events| events.get(event))
            .cloned()
            .unwrap_or_default()
    }

    /// Drops every listener registered on `node_id`.
    pub(crate) fn remove_node(&mut self, node_id: NodeId) -> bool {
        self.map.remove(&node_id).is_some()
    }

    #[cfg(test)]
    pub(crate) fn count(&self, node_id: NodeId) -> usize {
        self.map
            .get(&node_id)
            .map(|events| events.values().map(Vec::len).sum())
            .unwrap_or(0)
    }

    #[cfg(test)]
    pub(crate) fn total(&self) -> usize {
        self.map
            .values()
            .flat_map(|events| events.values())
            .map(Vec::len)
            .sum()
    }
}

#[derive(Debug, Clone)]
pub(crate) struct EventState {
    pub(crate) event_type: String,
    pub(crate) target: NodeId,
    pub(crate) current_target: NodeId,
    pub(crate) bubbles: bool,
    pub(crate) default_prevented: bool,
    pub(crate) propagation_stopped: bool,
}

impl EventState {
    pub(crate) fn new(event_type: &str, target: NodeId) -> Self {
        Self {
            event_type: event_type.to_string(),
            target,
            current_target: target,
            bubbles: event_bubbles(event_type),
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    pub(crate) fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    #[cfg(test)]
    pub(crate) fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }
}

fn event_bubbles(event_type: &str) -> bool {
    !matches!(event_type, "mouseenter" | "mouseleave" | "scroll" | "focus" | "blur")
}

impl Page {
    pub(crate) fn dispatch_event(&mut self, target: NodeId, event_type: &str) -> Result<EventState> {
        let mut event = EventState::new(event_type, target);

        let mut path = vec![target];
        if event.bubbles {
            let mut cursor = self.dom.parent(target);
            while let Some(node) = cursor {
                path.push(node);
                cursor = self.dom.parent(node);
            }
        }

        for node in path {
            event.current_target = node;
            let handlers = self.listeners.get(node, &event.event_type);
            for handler in handlers {
                if self.trace.enabled && self.trace.events {
                    let line = format!(
                        "[event] {} target={} current={} handler={:?} default_prevented={}",
                        event.event_type,
                        self.trace_node_label(event.target),
                        self.trace_node_label(event.current_target),
                        handler,
                        event.default_prevented
                    );
                    self.trace.push(line);
                }
                crate::site::run_handler(self, handler, &mut event)?;
            }
            if event.propagation_stopped {
                self.trace_event_done(&event, "propagation_stopped");
                return Ok(event);
            }
        }

        self.trace_event_done(&event, "completed");
        Ok(event)
    }

    fn trace_event_done(&mut self, event: &EventState, outcome: &str) {
        if !(self.trace.enabled && self.trace.events) {
            return;
        }
        let line = format!(
            "[event] done {} target={} current={} outcome={} default_prevented={} propagation_stopped={}",
            event.event_type,
            self.trace_node_label(event.target),
            self.trace_node_label(event.current_target),
            outcome,
            event.default_prevented,
            event.propagation_stopped
        );
        self.trace.push(line);
    }

    pub(crate) fn trace_node_label(&self, node: NodeId) -> String {
        if node == self.dom.root {
            return "document".to_string();
        }
        if let Some(id) = self.dom.attr(node, "id") {
            if !id.is_empty() {
                return format!("#{id}");
            }
        }
        if let Some(class) = self.dom.attr(node, "class") {
            if let Some(first) = class.split_whitespace().next() {
                return format!(
                    "{}.{first}",
                    self.dom.tag_name(node).unwrap_or_default()
                );
            }
        }
        self.dom
            .tag_name(node)
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| format!("node-{}", node.0))
    }
}
