use crate::{NodeId, Page, Result};

const OBSERVED_SELECTOR: &str = ".service-card, .capability, .equipment-card, .dtc-card";

/// The visible band of the document, after shrinking the viewport by the
/// root margin on both edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootBand {
    pub top: f64,
    pub bottom: f64,
}

impl RootBand {
    pub fn from_viewport(scroll_y: f64, viewport_height: f64, root_margin: f64) -> Self {
        Self {
            top: scroll_y + root_margin,
            bottom: scroll_y + viewport_height - root_margin,
        }
    }
}

/// Visible fraction of a box of `height` starting at `top`.
///
/// A zero-height box counts as fully visible when it lies inside the band.
pub fn intersection_ratio(top: f64, height: f64, band: RootBand) -> f64 {
    if band.bottom < band.top {
        return 0.0;
    }
    if height <= 0.0 {
        return if top >= band.top && top <= band.bottom {
            1.0
        } else {
            0.0
        };
    }
    let overlap = (top + height).min(band.bottom) - top.max(band.top);
    (overlap.max(0.0) / height).min(1.0)
}

#[derive(Debug, Default)]
pub(crate) struct RevealState {
    pub(crate) observed: Vec<NodeId>,
    pub(crate) revealed: usize,
}

/// `ms` as CSS seconds: 600 -> "0.6", 1250 -> "1.25", 2000 -> "2".
pub(crate) fn css_seconds(ms: u64) -> String {
    let whole = ms / 1000;
    let frac = ms % 1000;
    if frac == 0 {
        return whole.to_string();
    }
    let digits = format!("{frac:03}");
    format!("{whole}.{}", digits.trim_end_matches('0'))
}

pub(crate) fn init(page: &mut Page) -> Result<()> {
    let elements = page.dom.query_selector_all(OBSERVED_SELECTOR)?;
    let duration = css_seconds(page.config.reveal_duration_ms);
    let offset = page.config.reveal_offset_px;
    for (index, element) in elements.iter().enumerate() {
        let delay = css_seconds(
            page.config
                .reveal_stagger_ms
                .saturating_mul(index as u64),
        );
        page.dom.style_set(*element, "opacity", "0")?;
        page.dom
            .style_set(*element, "transform", &format!("translateY({offset}px)"))?;
        page.dom.style_set(
            *element,
            "transition",
            &format!("opacity {duration}s ease {delay}s, transform {duration}s ease {delay}s"),
        )?;
    }
    page.trace_site_line(format!("[site] reveal observe count={}", elements.len()));
    page.site.reveal.observed = elements;
    on_viewport_change(page)
}

/// Intersection pass: reveals every observed element that crossed the
/// threshold and stops observing it.
pub(crate) fn on_viewport_change(page: &mut Page) -> Result<()> {
    if page.site.reveal.observed.is_empty() {
        return Ok(());
    }
    let band = RootBand::from_viewport(
        page.viewport.scroll_y,
        page.viewport.height,
        page.config.reveal_root_margin_px,
    );
    let threshold = page.config.reveal_threshold;

    let observed = std::mem::take(&mut page.site.reveal.observed);
    let mut still_observed = Vec::with_capacity(observed.len());
    for element in observed {
        let layout = page.dom.layout_box(element);
        let visible = page.dom.is_connected(element)
            && page.dom.has_layout(element)
            && intersection_ratio(layout.top, layout.height, band) >= threshold;
        if !visible {
            still_observed.push(element);
            continue;
        }
        page.dom.style_set(element, "opacity", "1")?;
        page.dom.style_set(element, "transform", "translateY(0)")?;
        page.site.reveal.revealed += 1;
        let label = page.trace_node_label(element);
        page.trace_site_line(format!("[site] reveal {label} top={}", layout.top));
    }
    page.site.reveal.observed = still_observed;
    Ok(())
}
