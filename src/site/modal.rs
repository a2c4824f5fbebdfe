use super::Handler;
use super::intake::DiagnosticSubmission;
use crate::core_impl::escape_html;
use crate::{Error, NodeId, Page, Result};
use std::collections::HashMap;

const TIMESTAMP_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

const MODAL_STYLES: &str = "
.diagnostic-modal { position: fixed; top: 0; left: 0; width: 100%; height: 100%; background: rgba(0, 0, 0, 0.8); display: flex; justify-content: center; align-items: center; z-index: 10000; }
.modal-content { background: var(--color-surface); padding: var(--space-32); border-radius: var(--radius-lg); max-width: 500px; width: 90%; box-shadow: var(--shadow-lg); }
.modal-content h3 { color: var(--color-primary); margin-bottom: var(--space-20); text-align: center; }
.diagnostic-summary { margin-bottom: var(--space-20); }
.summary-item { display: flex; justify-content: space-between; margin-bottom: var(--space-8); padding: var(--space-8); background: var(--color-bg-1); border-radius: var(--radius-sm); }
.summary-label { font-weight: var(--font-weight-semibold); color: var(--color-text); }
.summary-value { color: var(--color-text-secondary); font-family: var(--font-family-mono); }
.priority-critical { color: var(--color-error); font-weight: bold; }
.priority-high-priority { color: var(--color-warning); font-weight: bold; }
.priority-standard { color: var(--color-success); }
.confirmation-message { text-align: center; color: var(--color-text-secondary); margin-bottom: var(--space-20); }
.close-modal { width: 100%; }
";

/// Nodes owned by one mounted confirmation modal.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ModalMount {
    pub(crate) overlay: NodeId,
    pub(crate) style: NodeId,
}

#[derive(Debug, Default)]
pub(crate) struct ModalRegistry {
    mounted: HashMap<u64, ModalMount>,
    next_id: u64,
}

impl ModalRegistry {
    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.mounted.len()
    }

    pub(crate) fn get(&self, modal_id: u64) -> Option<ModalMount> {
        self.mounted.get(&modal_id).copied()
    }
}

pub(crate) fn format_timestamp(page: &Page) -> String {
    page.current_time().format(TIMESTAMP_FORMAT).to_string()
}

fn summary_item(label: &str, value: &str, extra_class: Option<&str>) -> String {
    let class = match extra_class {
        Some(extra) => format!("summary-value {extra}"),
        None => "summary-value".to_string(),
    };
    format!(
        "<div class=\"summary-item\"><span class=\"summary-label\">{label}</span><span class=\"{class}\">{}</span></div>",
        escape_html(value)
    )
}

pub(crate) fn render_markup(modal_id: u64, submission: &DiagnosticSubmission) -> String {
    let vehicle = if submission.vehicle_description.is_empty() {
        "Not specified"
    } else {
        submission.vehicle_description.as_str()
    };
    let codes = if submission.dtc_codes.is_empty() {
        "None provided"
    } else {
        submission.dtc_codes.as_str()
    };

    let mut out = format!(
        "<div class=\"diagnostic-modal\" data-modal-id=\"{modal_id}\"><div class=\"modal-content\"><h3>Diagnostic Request Submitted</h3><div class=\"diagnostic-summary\">"
    );
    out.push_str(&summary_item("Vehicle:", vehicle, None));
    out.push_str(&summary_item("Diagnostic Codes:", codes, None));
    out.push_str(&summary_item(
        "Priority Level:",
        submission.priority.label(),
        Some(submission.priority.css_class()),
    ));
    out.push_str(&summary_item("Timestamp:", &submission.submitted_at, None));
    out.push_str(
        "</div><p class=\"confirmation-message\">Our ASE certified technicians will contact you within 24 hours to schedule your diagnostic appointment.</p>",
    );
    out.push_str("<button class=\"btn btn--primary close-modal\">Close</button></div></div>");
    out
}

/// Mounts the confirmation overlay and its scoped style sheet together.
pub(crate) fn mount(page: &mut Page, submission: &DiagnosticSubmission) -> Result<u64> {
    let modal_id = page.site.modals.allocate_id();
    let head = page.head_or_fallback()?;
    let body = page.body_or_fallback()?;

    let style = page
        .dom
        .append_html(
            head,
            &format!("<style data-modal-style=\"{modal_id}\">{MODAL_STYLES}</style>"),
        )?
        .into_iter()
        .next()
        .ok_or_else(|| Error::Runtime("modal style did not produce an element".into()))?;
    let overlay = match page
        .dom
        .append_html(body, &render_markup(modal_id, submission))?
        .into_iter()
        .next()
    {
        Some(overlay) => overlay,
        None => {
            page.dom.remove_node(style)?;
            return Err(Error::Runtime("modal markup did not produce an element".into()));
        }
    };

    page.listeners
        .add(overlay, "click", Handler::ModalBackdrop { modal_id });
    if let Some(close) = page.dom.query_selector_from(overlay, ".close-modal")? {
        page.listeners
            .add(close, "click", Handler::ModalClose { modal_id });
    }
    page.site
        .modals
        .mounted
        .insert(modal_id, ModalMount { overlay, style });
    page.trace_site_line(format!(
        "[site] modal mount id={modal_id} priority={}",
        submission.priority.label()
    ));
    Ok(modal_id)
}

/// Removes the overlay, its style sheet and their listeners. Unmounting an
/// already closed modal does nothing.
pub(crate) fn unmount(page: &mut Page, modal_id: u64) -> Result<()> {
    let Some(mount) = page.site.modals.mounted.remove(&modal_id) else {
        return Ok(());
    };
    for node in page.dom.subtree(mount.overlay) {
        page.listeners.remove_node(node);
    }
    page.dom.remove_node(mount.overlay)?;
    page.dom.remove_node(mount.style)?;
    page.trace_site_line(format!("[site] modal unmount id={modal_id}"));
    Ok(())
}

pub(crate) fn on_backdrop_click(page: &mut Page, modal_id: u64, target: NodeId) -> Result<()> {
    let is_overlay = page
        .site
        .modals
        .get(modal_id)
        .is_some_and(|mount| mount.overlay == target);
    if is_overlay {
        unmount(page, modal_id)?;
    }
    Ok(())
}
