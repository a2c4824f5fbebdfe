use super::Handler;
use crate::core_impl::EventState;
use crate::{NodeId, Page, Result, ScrollBehavior};

const NAV_LINK_SELECTOR: &str = ".nav__link";
const SECTION_SELECTOR: &str = "section, footer";
const ACTIVE_COLOR: &str = "var(--color-teal-300)";
const ACTIVE_BACKGROUND: &str = "rgba(var(--color-teal-300-rgb), 0.1)";
pub(crate) const DEFAULT_SECTION_SLACK_PX: f64 = 100.0;

/// Vertical extent of one navigable section.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionBounds {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

impl SectionBounds {
    pub fn new(id: impl Into<String>, top: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            top,
            height,
        }
    }
}

/// Id of the section the reader is in at `scroll_y`.
///
/// A section covers `[top - header - 100, top - header - 100 + height)`.
/// When ranges overlap the last section in document order wins; when none
/// covers `scroll_y` there is no active section.
pub fn active_section(scroll_y: f64, header_height: f64, sections: &[SectionBounds]) -> Option<&str> {
    active_section_with_slack(scroll_y, header_height, DEFAULT_SECTION_SLACK_PX, sections)
}

pub(crate) fn active_section_with_slack(
    scroll_y: f64,
    header_height: f64,
    slack: f64,
    sections: &[SectionBounds],
) -> Option<&str> {
    sections
        .iter()
        .rev()
        .find(|section| {
            let start = section.top - header_height - slack;
            scroll_y >= start && scroll_y < start + section.height
        })
        .map(|section| section.id.as_str())
}

pub(crate) fn init(page: &mut Page) -> Result<()> {
    let links = page.dom.query_selector_all(NAV_LINK_SELECTOR)?;
    for link in &links {
        page.listeners.add(*link, "click", Handler::NavLinkClick);
    }
    let root = page.dom.root;
    page.listeners.add(root, "scroll", Handler::NavScroll);
    page.trace_site_line(format!("[site] navigation init links={}", links.len()));
    Ok(())
}

pub(crate) fn on_link_click(page: &mut Page, link: NodeId, event: &mut EventState) -> Result<()> {
    let href = page.dom.attr(link, "href").unwrap_or_default();
    let Some(id) = href.strip_prefix('#').filter(|id| !id.is_empty()) else {
        return Ok(());
    };
    let Some(target) = page.dom.by_id(id) else {
        return Ok(());
    };
    event.prevent_default();

    let top = page.dom.offset_top(target) - header_height(page)?;
    page.trace_site_line(format!("[site] nav link href={href} scroll_to={top}"));
    page.scroll_window_to(top, ScrollBehavior::Smooth)?;
    render_links(page, Some(id))
}

pub(crate) fn on_scroll(page: &mut Page) -> Result<()> {
    if page.site.nav_debounce.is_immediate() {
        return refresh_active_link(page);
    }
    page.debounce_nav_scroll();
    Ok(())
}

pub(crate) fn on_scroll_settled(page: &mut Page) -> Result<()> {
    page.site.nav_debounce.pending = None;
    refresh_active_link(page)
}

fn refresh_active_link(page: &mut Page) -> Result<()> {
    let sections = section_bounds(page)?;
    let header = header_height(page)?;
    let active = active_section_with_slack(
        page.viewport.scroll_y,
        header,
        page.config.nav_section_slack_px,
        &sections,
    )
    .map(ToOwned::to_owned);
    render_links(page, active.as_deref())
}

/// Re-renders every link from the single active section id.
fn render_links(page: &mut Page, active: Option<&str>) -> Result<()> {
    let current = active.filter(|id| !id.is_empty()).map(|id| format!("#{id}"));
    for link in page.dom.query_selector_all(NAV_LINK_SELECTOR)? {
        let href = page.dom.attr(link, "href").unwrap_or_default();
        if current.as_deref() == Some(href.as_str()) {
            page.dom.style_set(link, "color", ACTIVE_COLOR)?;
            page.dom.style_set(link, "background", ACTIVE_BACKGROUND)?;
        } else {
            page.dom.style_set(link, "color", "")?;
            page.dom.style_set(link, "background", "")?;
        }
    }
    page.trace_site_line(format!(
        "[site] nav active={}",
        current.as_deref().unwrap_or("none")
    ));
    Ok(())
}

fn header_height(page: &Page) -> Result<f64> {
    Ok(page
        .dom
        .query_selector(".header")?
        .map_or(0.0, |header| page.dom.offset_height(header)))
}

fn section_bounds(page: &Page) -> Result<Vec<SectionBounds>> {
    Ok(page
        .dom
        .query_selector_all(SECTION_SELECTOR)?
        .into_iter()
        .map(|node| SectionBounds {
            id: page.dom.attr(node, "id").unwrap_or_default(),
            top: page.dom.offset_top(node),
            height: page.dom.offset_height(node),
        })
        .collect())
}
