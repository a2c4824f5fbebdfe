use super::Handler;
use super::catalog::DtcCatalogEntry;
use crate::{NodeId, Page, Result};

pub(crate) fn init(page: &mut Page) -> Result<()> {
    let service_cards = page.dom.query_selector_all(".service-card")?;
    for card in &service_cards {
        page.listeners
            .add(*card, "mouseenter", Handler::ServiceCardEnter);
        page.listeners
            .add(*card, "mouseleave", Handler::ServiceCardLeave);
    }

    let dtc_items = page.dom.query_selector_all(".dtc-item")?;
    for item in &dtc_items {
        page.listeners.add(*item, "click", Handler::DtcItemClick);
        page.dom.style_set(*item, "cursor", "pointer")?;
    }

    let equipment_cards = page.dom.query_selector_all(".equipment-card")?;
    for card in &equipment_cards {
        page.listeners
            .add(*card, "click", Handler::EquipmentCardClick);
        page.dom.style_set(*card, "cursor", "pointer")?;
    }

    page.trace_site_line(format!(
        "[site] cards init service={} dtc={} equipment={}",
        service_cards.len(),
        dtc_items.len(),
        equipment_cards.len()
    ));
    Ok(())
}

pub(crate) fn on_service_card_enter(page: &mut Page, card: NodeId) -> Result<()> {
    page.dom.style_set(card, "transform", "translateY(-4px)")?;
    page.dom.style_set(card, "box-shadow", "var(--shadow-lg)")
}

pub(crate) fn on_service_card_leave(page: &mut Page, card: NodeId) -> Result<()> {
    page.dom.style_set(card, "transform", "translateY(0)")?;
    page.dom.style_set(card, "box-shadow", "var(--shadow-sm)")
}

fn child_text(page: &Page, parent: NodeId, selector: &str) -> Result<String> {
    Ok(page
        .dom
        .query_selector_from(parent, selector)?
        .map(|node| page.dom.text_content(node))
        .unwrap_or_default())
}

pub(crate) fn on_dtc_item_click(page: &mut Page, item: NodeId) -> Result<()> {
    let code = child_text(page, item, ".dtc-code")?;
    let code = code.trim();
    let message = format_dtc_alert(code, page.site.dtc_catalog.lookup(code));
    page.alert(message);
    Ok(())
}

pub(crate) fn format_dtc_alert(code: &str, entry: &DtcCatalogEntry) -> String {
    let causes = entry
        .common_causes
        .iter()
        .map(|cause| format!("• {cause}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "DTC: {code}\nSystem: {}\nComponent: {}\n\nCommon Causes:\n{causes}\n\nDiagnostic Procedure:\n{}",
        entry.system, entry.component, entry.diagnostic_procedure
    )
}

/// Expands the card with its spec sheet, or collapses it when already open.
pub(crate) fn on_equipment_card_click(page: &mut Page, card: NodeId) -> Result<()> {
    if let Some(details) = page.dom.query_selector_from(card, ".equipment-details")? {
        page.dom.remove_node(details)?;
        page.trace_site_line("[site] equipment collapse".to_string());
        return Ok(());
    }

    let title = child_text(page, card, ".equipment-card__title")?;
    let markup = page.site.equipment_catalog.lookup(&title).details_markup();
    page.dom
        .append_html(card, &format!("<div class=\"equipment-details\">{markup}</div>"))?;
    page.trace_site_line(format!("[site] equipment expand title={title:?}"));
    Ok(())
}
