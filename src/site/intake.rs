use super::dtc_format::DtcValidator;
use super::priority::{PriorityLevel, classify_priority};
use super::{Handler, modal};
use crate::core_impl::EventState;
use crate::{NodeId, Page, Result};

const FORM_SELECTOR: &str = ".diagnostic-form";
const VEHICLE_FALLBACK: &str = r#"input[placeholder*="Year"]"#;
const DTC_FALLBACK: &str = r#"input[placeholder*="P0XXX"]"#;
const SYMPTOMS_FALLBACK: &str = "textarea";
const BORDER_OK: &str = "var(--color-border)";
const BORDER_ERROR: &str = "var(--color-error)";

/// One submitted diagnostic request, alive until the confirmation is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DiagnosticSubmission {
    pub(crate) vehicle_description: String,
    pub(crate) dtc_codes: String,
    pub(crate) symptoms: String,
    pub(crate) submitted_at: String,
    pub(crate) priority: PriorityLevel,
}

pub(crate) fn init(page: &mut Page) -> Result<()> {
    let Some(form) = page.dom.query_selector(FORM_SELECTOR)? else {
        return Ok(());
    };
    page.listeners.add(form, "submit", Handler::IntakeSubmit);

    let dtc_input = match page.dom.query_selector_from(form, DTC_FALLBACK)? {
        Some(input) => Some(input),
        None => page.dom.query_selector_from(form, r#"[name="dtc"]"#)?,
    };
    if let Some(input) = dtc_input {
        page.site.dtc_validator = Some(DtcValidator::new()?);
        page.listeners.add(input, "input", Handler::DtcInput);
    }
    page.trace_site_line(format!(
        "[site] intake init live_validation={}",
        dtc_input.is_some()
    ));
    Ok(())
}

pub(crate) fn on_submit(page: &mut Page, form: NodeId, event: &mut EventState) -> Result<()> {
    event.prevent_default();

    let dtc_codes = read_field(page, form, "dtc", DTC_FALLBACK)?;
    let submission = DiagnosticSubmission {
        vehicle_description: read_field(page, form, "vehicle", VEHICLE_FALLBACK)?,
        priority: classify_priority(Some(dtc_codes.as_str())),
        dtc_codes,
        symptoms: read_field(page, form, "symptoms", SYMPTOMS_FALLBACK)?,
        submitted_at: modal::format_timestamp(page),
    };
    page.trace_site_line(format!(
        "[site] intake submit codes={:?} priority={} symptoms_len={}",
        submission.dtc_codes,
        submission.priority.label(),
        submission.symptoms.chars().count()
    ));

    modal::mount(page, &submission)?;
    reset_form(page, form)
}

/// Named field first, then the field found by its placeholder or tag.
fn read_field(page: &Page, form: NodeId, name: &str, fallback: &str) -> Result<String> {
    if let Some(named) = page
        .dom
        .query_selector_from(form, &format!("[name=\"{name}\"]"))?
    {
        let value = page.dom.value(named)?;
        if !value.is_empty() {
            return Ok(value);
        }
    }
    match page.dom.query_selector_from(form, fallback)? {
        Some(node) => page.dom.value(node),
        None => Ok(String::new()),
    }
}

fn reset_form(page: &mut Page, form: NodeId) -> Result<()> {
    for control in page.dom.query_selector_all_from(form, "input, textarea")? {
        let kind = page.dom.attr(control, "type").unwrap_or_default();
        if matches!(kind.as_str(), "submit" | "button" | "reset" | "hidden") {
            continue;
        }
        let default = page.dom.default_value(control);
        page.dom.set_value(control, &default)?;
    }
    Ok(())
}

pub(crate) fn on_dtc_input(page: &mut Page, input: NodeId) -> Result<()> {
    let raw = page.dom.value(input)?;
    let validation = match page.site.dtc_validator.as_ref() {
        Some(validator) => validator.validate(&raw)?,
        None => DtcValidator::new()?.validate(&raw)?,
    };

    let border = if validation.valid { BORDER_OK } else { BORDER_ERROR };
    page.dom.style_set(input, "border-color", border)?;
    page.dom.set_value(input, &validation.normalized)?;
    page.trace_site_line(format!(
        "[site] dtc input value={:?} valid={}",
        validation.normalized, validation.valid
    ));
    Ok(())
}
