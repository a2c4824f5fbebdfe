use super::*;

#[test]
fn boot_registers_listeners_and_logs_branding() -> Result<()> {
    let mut page = Page::from_html(SITE_HTML)?;
    let root = page.dom.root;
    assert_eq!(page.listeners.count(root), 1);
    // 5 nav links, form submit, dtc input, 2x2 service card, 2 dtc items, 2 equipment cards.
    assert_eq!(page.listeners.total(), 1 + 5 + 2 + 4 + 2 + 2);

    let console = page.take_console_messages();
    assert_eq!(console.len(), 3);
    assert!(console[0].contains("Concord Motors - Professional Automotive Diagnostics"));
    assert!(console[2].ends_with("concordmotors@gmail.com"));
    assert!(page.take_console_messages().is_empty());
    Ok(())
}

#[test]
fn empty_document_boots_as_a_no_op() -> Result<()> {
    let mut page = Page::from_html("<p>nothing interactive here</p>")?;
    assert_eq!(page.listeners.total(), 1);
    assert_eq!(page.pending_timer_count(), 0);
    page.scroll_to(100.0)?;
    assert_eq!(page.scroll_y(), 0.0);
    page.flush()?;
    assert!(page.take_alert_messages().is_empty());
    Ok(())
}

#[test]
fn mouseenter_does_not_bubble_but_click_does() -> Result<()> {
    let mut page = site_page()?;
    // The heading has no listener of its own; hover only reaches the target.
    page.hover("#svc-engine h3")?;
    assert_eq!(page.style("#svc-engine", "box-shadow")?, "");

    page.click("#dtc-p0420 .dtc-code")?;
    assert_eq!(page.take_alert_messages().len(), 1);
    Ok(())
}

#[test]
fn dispatch_reports_prevented_default() -> Result<()> {
    let mut page = site_page()?;
    let link = page.select_one(r##"a[href="#services"]"##)?;
    let event = page.dispatch_event(link, "click")?;
    assert!(event.default_prevented);
    assert_eq!(event.current_target, page.dom.root);

    let unresolved = page.select_one(r##"a[href="#missing"]"##)?;
    let event = page.dispatch_event(unresolved, "click")?;
    assert!(!event.default_prevented);
    Ok(())
}

#[test]
fn stop_propagation_halts_the_bubble_path() {
    let mut event = core_impl::EventState::new("click", NodeId(3));
    assert!(event.bubbles);
    event.stop_propagation();
    event.prevent_default();
    assert!(event.propagation_stopped);
    assert!(event.default_prevented);
    assert!(!core_impl::EventState::new("scroll", NodeId(0)).bubbles);
    assert!(!core_impl::EventState::new("mouseleave", NodeId(0)).bubbles);
}

#[test]
fn type_text_rejects_non_text_controls() -> Result<()> {
    let mut page = site_page()?;
    match page.type_text("#svc-engine", "x") {
        Err(Error::TypeMismatch {
            expected, actual, ..
        }) => {
            assert_eq!(expected, "input or textarea");
            assert_eq!(actual, "div");
        }
        other => panic!("unexpected result: {other:?}"),
    }
    page.type_text("#symptoms", "Check engine light flashing")?;
    page.assert_value("#symptoms", "Check engine light flashing")?;
    Ok(())
}

#[test]
fn timers_run_in_due_order_and_clock_advances() -> Result<()> {
    let mut page = site_page()?;
    page.scroll_to(500.0)?;
    assert_eq!(page.pending_timer_count(), 1);
    page.advance_time(49)?;
    assert_eq!(page.pending_timer_count(), 1);
    assert_eq!(page.now_ms(), 49);
    page.advance_time(1)?;
    assert_eq!(page.pending_timer_count(), 0);
    assert_eq!(page.now_ms(), 50);
    Ok(())
}

#[test]
fn flush_moves_the_clock_to_the_last_due_timer() -> Result<()> {
    let mut page = site_page()?;
    page.scroll_to(10.0)?;
    page.flush()?;
    assert_eq!(page.now_ms(), 50);
    assert_eq!(page.pending_timer_count(), 0);
    Ok(())
}

#[test]
fn negative_advance_is_an_error() -> Result<()> {
    let mut page = site_page()?;
    assert!(matches!(page.advance_time(-1), Err(Error::Runtime(_))));
    assert!(matches!(page.set_timer_step_limit(0), Err(Error::Runtime(_))));
    Ok(())
}

#[test]
fn timer_step_limit_stops_a_long_animation() -> Result<()> {
    let mut page = site_page()?;
    page.set_timer_step_limit(2)?;
    page.click(r##"a[href="#equipment"]"##)?;
    match page.flush() {
        Err(Error::Runtime(msg)) => assert!(msg.contains("timer step limit exceeded"), "{msg}"),
        other => panic!("expected step limit error, got {other:?}"),
    }
    Ok(())
}

#[test]
fn clear_all_timers_drops_pending_work() -> Result<()> {
    let mut page = site_page()?;
    page.click(r##"a[href="#equipment"]"##)?;
    assert!(page.pending_timer_count() > 0);
    assert!(page.clear_all_timers() > 0);
    page.flush()?;
    assert_eq!(page.scroll_y(), 0.0);
    Ok(())
}

#[test]
fn trace_lines_are_prefixed_and_bounded() -> Result<()> {
    let mut page = site_page()?;
    quiet_trace(&mut page);
    page.click(r##"a[href="#services"]"##)?;
    page.flush()?;
    let logs = page.take_trace_logs();
    assert!(logs.iter().any(|line| line.starts_with("[event] click")));
    assert!(logs.iter().any(|line| line.starts_with("[timer] schedule")));
    assert!(logs.iter().any(|line| line.starts_with("[site] nav link href=#services")));
    assert!(logs.iter().any(|line| line.starts_with("[site] smooth scroll id=1")));
    assert!(page.take_trace_logs().is_empty());

    page.set_trace_log_limit(2)?;
    page.scroll_to(0.0)?;
    page.flush()?;
    assert!(page.take_trace_logs().len() <= 2);
    assert!(matches!(page.set_trace_log_limit(0), Err(Error::Runtime(_))));
    Ok(())
}

#[test]
fn trace_categories_can_be_switched_off() -> Result<()> {
    let mut page = site_page()?;
    quiet_trace(&mut page);
    page.set_trace_events(false);
    page.set_trace_timers(false);
    page.click(r##"a[href="#services"]"##)?;
    page.flush()?;
    let logs = page.take_trace_logs();
    assert!(!logs.is_empty());
    assert!(logs.iter().all(|line| line.starts_with("[site]")));

    page.set_trace_site(false);
    page.scroll_to(5.0)?;
    page.flush()?;
    assert!(page.take_trace_logs().is_empty());
    Ok(())
}

#[test]
fn trace_is_off_by_default() -> Result<()> {
    let mut page = site_page()?;
    page.click(r##"a[href="#services"]"##)?;
    page.flush()?;
    assert!(page.take_trace_logs().is_empty());
    Ok(())
}
