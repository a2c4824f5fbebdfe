use super::*;

const ACTIVE_COLOR: &str = "var(--color-teal-300)";
const ACTIVE_BACKGROUND: &str = "rgba(var(--color-teal-300-rgb), 0.1)";

fn active_links(page: &Page) -> Result<Vec<String>> {
    let mut out = Vec::new();
    for link in page.dom.query_selector_all(".nav__link")? {
        if page.dom.style_get(link, "color")? == ACTIVE_COLOR {
            out.push(page.dom.attr(link, "href").unwrap_or_default());
        }
    }
    Ok(out)
}

fn sections() -> Vec<SectionBounds> {
    vec![
        SectionBounds::new("services", 600.0, 800.0),
        SectionBounds::new("diagnostics", 1400.0, 900.0),
        SectionBounds::new("equipment", 2300.0, 700.0),
    ]
}

#[test]
fn active_section_uses_header_and_slack() {
    let sections = sections();
    assert_eq!(active_section(0.0, 80.0, &sections), None);
    assert_eq!(active_section(419.0, 80.0, &sections), None);
    assert_eq!(active_section(420.0, 80.0, &sections), Some("services"));
    assert_eq!(active_section(1219.0, 80.0, &sections), Some("services"));
    assert_eq!(active_section(1220.0, 80.0, &sections), Some("diagnostics"));
    assert_eq!(active_section(2819.0, 80.0, &sections), Some("equipment"));
    assert_eq!(active_section(2820.0, 80.0, &sections), None);
}

#[test]
fn overlapping_sections_resolve_to_the_last_one() {
    let sections = vec![
        SectionBounds::new("outer", 0.0, 2000.0),
        SectionBounds::new("inner", 500.0, 300.0),
    ];
    assert_eq!(active_section(450.0, 0.0, &sections), Some("inner"));
    assert_eq!(active_section(1000.0, 0.0, &sections), Some("outer"));
    assert_eq!(active_section(0.0, 0.0, &[]), None);
}

#[test]
fn link_click_smooth_scrolls_below_the_header() -> Result<()> {
    let mut page = site_page()?;
    page.click(r##"a[href="#diagnostics"]"##)?;
    assert!(page.is_scroll_animating());
    assert_eq!(page.scroll_y(), 0.0);
    assert_eq!(active_links(&page)?, ["#diagnostics"]);
    page.assert_style(r##"a[href="#diagnostics"]"##, "background", ACTIVE_BACKGROUND)?;

    page.advance_time(160)?;
    let midway = page.scroll_y();
    assert!(midway > 0.0 && midway < 1320.0, "midway={midway}");

    page.flush()?;
    assert!(!page.is_scroll_animating());
    assert_eq!(page.scroll_y(), 1320.0);
    assert_eq!(active_links(&page)?, ["#diagnostics"]);
    Ok(())
}

#[test]
fn smooth_scroll_reaches_the_target_after_its_duration() -> Result<()> {
    let mut page = site_page()?;
    page.click(r##"a[href="#services"]"##)?;
    // Frames land every 16ms; the first one at or past 300ms finishes the animation.
    page.advance_time(304)?;
    assert_eq!(page.scroll_y(), 520.0);
    assert!(!page.is_scroll_animating());
    Ok(())
}

#[test]
fn smooth_scroll_is_monotonic() -> Result<()> {
    let mut page = site_page()?;
    page.click(r##"a[href="#equipment"]"##)?;
    let mut last = page.scroll_y();
    for _ in 0..20 {
        page.advance_time(16)?;
        let now = page.scroll_y();
        assert!(now >= last, "{now} < {last}");
        last = now;
    }
    assert_eq!(last, 2220.0);
    Ok(())
}

#[test]
fn smooth_scroll_target_is_clamped_to_the_document() -> Result<()> {
    let mut page = site_page()?;
    page.click(r##"a[href="#contact"]"##)?;
    page.flush()?;
    // 3400px of content in a 720px viewport.
    assert_eq!(page.scroll_y(), 2680.0);
    Ok(())
}

#[test]
fn user_scroll_cancels_the_animation() -> Result<()> {
    let mut page = site_page()?;
    page.click(r##"a[href="#equipment"]"##)?;
    page.advance_time(32)?;
    page.scroll_to(100.0)?;
    assert!(!page.is_scroll_animating());
    page.flush()?;
    assert_eq!(page.scroll_y(), 100.0);
    assert!(active_links(&page)?.is_empty());
    Ok(())
}

#[test]
fn a_second_link_click_replaces_the_first_animation() -> Result<()> {
    let mut page = site_page()?;
    page.click(r##"a[href="#equipment"]"##)?;
    page.advance_time(48)?;
    page.click(r##"a[href="#services"]"##)?;
    assert_eq!(active_links(&page)?, ["#services"]);
    page.flush()?;
    assert_eq!(page.scroll_y(), 520.0);
    assert_eq!(active_links(&page)?, ["#services"]);
    Ok(())
}

#[test]
fn unresolved_anchor_is_left_alone() -> Result<()> {
    let mut page = site_page()?;
    page.click(r##"a[href="#missing"]"##)?;
    assert!(!page.is_scroll_animating());
    assert_eq!(page.pending_timer_count(), 0);
    assert_eq!(page.scroll_y(), 0.0);
    assert!(active_links(&page)?.is_empty());
    Ok(())
}

#[test]
fn plain_anchor_default_action_jumps_instantly() -> Result<()> {
    let mut page = Page::from_html(
        r##"<a id="skip" href="#target">skip</a><div id="target"></div><div id="tail"></div>"##,
    )?;
    page.set_layout("#target", 900.0, 100.0)?;
    page.set_layout("#tail", 1000.0, 2000.0)?;
    page.click("#skip")?;
    assert_eq!(page.scroll_y(), 900.0);
    assert!(!page.is_scroll_animating());
    Ok(())
}

#[test]
fn scroll_updates_the_active_link_after_the_quiet_period() -> Result<()> {
    let mut page = site_page()?;
    page.scroll_to(500.0)?;
    assert!(active_links(&page)?.is_empty());
    page.advance_time(49)?;
    assert!(active_links(&page)?.is_empty());
    page.advance_time(1)?;
    assert_eq!(active_links(&page)?, ["#services"]);

    page.scroll_to(2200.0)?;
    page.advance_time(50)?;
    assert_eq!(active_links(&page)?, ["#equipment"]);
    page.assert_style(r##"a[href="#services"]"##, "color", "")?;
    page.assert_style(r##"a[href="#services"]"##, "background", "")?;
    Ok(())
}

#[test]
fn bursts_of_scroll_events_settle_once() -> Result<()> {
    let mut page = site_page()?;
    quiet_trace(&mut page);
    page.scroll_to(500.0)?;
    page.advance_time(30)?;
    page.scroll_to(1300.0)?;
    page.advance_time(30)?;
    assert_eq!(page.pending_timer_count(), 1);
    assert!(active_links(&page)?.is_empty());
    page.advance_time(20)?;
    assert_eq!(active_links(&page)?, ["#diagnostics"]);

    let renders = page
        .take_trace_logs()
        .into_iter()
        .filter(|line| line.starts_with("[site] nav active="))
        .count();
    assert_eq!(renders, 1);
    Ok(())
}

#[test]
fn zero_debounce_recomputes_on_every_scroll() -> Result<()> {
    let config = SiteConfig {
        nav_scroll_debounce_ms: 0,
        ..SiteConfig::default()
    };
    let mut page = Page::from_html_with_config(SITE_HTML, config)?;
    lay_out_site(&mut page)?;
    page.scroll_to(500.0)?;
    assert_eq!(page.pending_timer_count(), 0);
    assert_eq!(active_links(&page)?, ["#services"]);
    page.scroll_to(0.0)?;
    assert!(active_links(&page)?.is_empty());
    Ok(())
}

#[test]
fn missing_header_counts_as_zero_height() -> Result<()> {
    let mut page = Page::from_html(
        r##"<a class="nav__link" href="#two">two</a><section id="one"></section><section id="two"></section>"##,
    )?;
    page.set_layout("#one", 0.0, 1000.0)?;
    page.set_layout("#two", 1000.0, 1000.0)?;
    page.click(r##"a[href="#two"]"##)?;
    page.flush()?;
    assert_eq!(page.scroll_y(), 1000.0);
    page.assert_style(".nav__link", "color", ACTIVE_COLOR)?;
    Ok(())
}

#[test]
fn scroll_position_is_clamped() -> Result<()> {
    let mut page = site_page()?;
    page.scroll_to(99_999.0)?;
    assert_eq!(page.scroll_y(), 2680.0);
    page.scroll_to(-5.0)?;
    assert_eq!(page.scroll_y(), 0.0);
    assert!(matches!(page.scroll_to(f64::INFINITY), Err(Error::Runtime(_))));
    Ok(())
}

#[test]
fn shrinking_the_content_clamps_on_resize() -> Result<()> {
    let mut page = site_page()?;
    page.scroll_to(2680.0)?;
    page.set_viewport(1280.0, 1400.0)?;
    assert_eq!(page.scroll_y(), 2000.0);
    assert_eq!(page.viewport_size(), (1280.0, 1400.0));
    assert!(matches!(page.set_viewport(0.0, 10.0), Err(Error::Runtime(_))));
    Ok(())
}
