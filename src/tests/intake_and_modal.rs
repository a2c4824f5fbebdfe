use super::*;
use chrono::DateTime;

fn fixed_clock(page: &mut Page) -> Result<()> {
    let origin = DateTime::parse_from_rfc3339("2024-03-05T14:07:09+00:00")
        .map_err(|err| Error::Runtime(err.to_string()))?;
    page.set_clock_origin(origin);
    Ok(())
}

fn fill_form(page: &mut Page, vehicle: &str, codes: &str, symptoms: &str) -> Result<()> {
    page.type_text("#vehicle", vehicle)?;
    page.type_text("#dtc", codes)?;
    page.type_text("#symptoms", symptoms)?;
    Ok(())
}

#[test]
fn submit_renders_the_confirmation_summary() -> Result<()> {
    let mut page = site_page()?;
    fixed_clock(&mut page)?;
    fill_form(&mut page, "2019 Honda Civic", "p0300, u0100", "Rough idle")?;
    page.click("#send")?;

    page.assert_text(".diagnostic-modal h3", "Diagnostic Request Submitted")?;
    assert_eq!(page.count(".diagnostic-modal .summary-item")?, 4);
    page.assert_text(".diagnostic-modal .priority-critical", "Critical")?;
    let summary = page.text(".diagnostic-summary")?;
    assert!(summary.contains("2019 Honda Civic"), "{summary}");
    assert!(summary.contains("P0300, U0100"), "{summary}");
    assert!(summary.contains("3/5/2024, 2:07:09 PM"), "{summary}");
    page.assert_text(
        ".confirmation-message",
        "Our ASE certified technicians will contact you within 24 hours to schedule your diagnostic appointment.",
    )?;
    page.assert_exists("head > style[data-modal-style]")?;
    page.assert_exists("body > .diagnostic-modal")?;
    Ok(())
}

#[test]
fn submit_resets_the_form() -> Result<()> {
    let mut page = site_page()?;
    fill_form(&mut page, "2015 Ford F-150", "P0420", "Sulfur smell")?;
    page.click("#send")?;
    page.assert_value("#vehicle", "")?;
    page.assert_value("#dtc", "")?;
    page.assert_value("#symptoms", "")?;
    page.assert_text(".diagnostic-modal .priority-high-priority", "High Priority")?;
    Ok(())
}

#[test]
fn reset_restores_markup_defaults() -> Result<()> {
    let mut page = Page::from_html(
        r#"<form class="diagnostic-form" id="f">
             <input name="vehicle" id="v" value="Fleet van">
             <input name="dtc" id="c" placeholder="P0XXX">
             <textarea name="symptoms" id="s">Describe symptoms</textarea>
           </form>"#,
    )?;
    page.type_text("#v", "Other car")?;
    page.type_text("#s", "Noise")?;
    page.submit("#f")?;
    page.assert_value("#v", "Fleet van")?;
    page.assert_value("#s", "Describe symptoms")?;
    page.assert_value("#c", "")?;
    Ok(())
}

#[test]
fn empty_submission_uses_placeholders_in_the_summary() -> Result<()> {
    let mut page = site_page()?;
    page.click("#send")?;
    let summary = page.text(".diagnostic-summary")?;
    assert!(summary.contains("Not specified"), "{summary}");
    assert!(summary.contains("None provided"), "{summary}");
    page.assert_text(".diagnostic-modal .priority-standard", "Standard")?;
    Ok(())
}

#[test]
fn unnamed_fields_are_found_by_placeholder() -> Result<()> {
    let mut page = Page::from_html(
        r#"<html><head></head><body>
             <form class="diagnostic-form" id="f">
               <input placeholder="Year / Make / Model" id="v">
               <input placeholder="e.g. P0XXX" id="c">
               <textarea id="s"></textarea>
             </form>
           </body></html>"#,
    )?;
    page.type_text("#v", "2008 Subaru Outback")?;
    page.type_text("#c", "c0710")?;
    page.submit("#f")?;
    let summary = page.text(".diagnostic-summary")?;
    assert!(summary.contains("2008 Subaru Outback"), "{summary}");
    assert!(summary.contains("C0710"), "{summary}");
    page.assert_text(".priority-high-priority", "High Priority")?;
    Ok(())
}

#[test]
fn empty_named_field_falls_back_to_placeholder_field() -> Result<()> {
    let mut page = Page::from_html(
        r#"<form class="diagnostic-form" id="f">
             <input name="vehicle" id="named">
             <input placeholder="Year Make Model" id="positional">
           </form>"#,
    )?;
    page.type_text("#positional", "1999 Jeep Cherokee")?;
    page.submit("#f")?;
    assert!(page.text(".diagnostic-summary")?.contains("1999 Jeep Cherokee"));
    Ok(())
}

#[test]
fn user_values_are_escaped() -> Result<()> {
    let mut page = site_page()?;
    page.type_text("#vehicle", "<b>Turbo</b> & co")?;
    page.click("#send")?;
    assert_eq!(page.count(".diagnostic-modal b")?, 0);
    assert!(page.text(".diagnostic-summary")?.contains("<b>Turbo</b> & co"));
    Ok(())
}

#[test]
fn close_button_restores_head_and_body() -> Result<()> {
    let mut page = site_page()?;
    fill_form(&mut page, "2020 Tesla Model 3", "U0100", "No start")?;
    let head_before = page.dump_dom("head")?;
    let body_before = page.dump_dom("body")?;
    let listeners_before = page.listeners.total();

    page.click("#send")?;
    assert_eq!(page.site.modals.len(), 1);
    page.click(".close-modal")?;

    page.assert_missing(".diagnostic-modal")?;
    page.assert_missing("style[data-modal-style]")?;
    assert_eq!(page.dump_dom("head")?, head_before);
    assert_eq!(page.dump_dom("body")?, body_before);
    assert_eq!(page.listeners.total(), listeners_before);
    assert_eq!(page.site.modals.len(), 0);
    Ok(())
}

#[test]
fn backdrop_click_closes_but_content_click_does_not() -> Result<()> {
    let mut page = site_page()?;
    let head_before = page.dump_dom("head")?;
    page.click("#send")?;

    page.click(".modal-content")?;
    page.click(".diagnostic-modal h3")?;
    page.assert_exists(".diagnostic-modal")?;

    page.click(".diagnostic-modal")?;
    page.assert_missing(".diagnostic-modal")?;
    assert_eq!(page.dump_dom("head")?, head_before);
    Ok(())
}

#[test]
fn modals_are_independent() -> Result<()> {
    let mut page = site_page()?;
    page.type_text("#dtc", "P0601")?;
    page.click("#send")?;
    page.type_text("#dtc", "P0101")?;
    page.click("#send")?;
    assert_eq!(page.count(".diagnostic-modal")?, 2);
    assert_eq!(page.count("style[data-modal-style]")?, 2);

    page.click(r#".diagnostic-modal[data-modal-id="1"] .close-modal"#)?;
    assert_eq!(page.count(".diagnostic-modal")?, 1);
    assert_eq!(page.count("style[data-modal-style]")?, 1);
    page.assert_exists(r#"style[data-modal-style="2"]"#)?;
    page.assert_text(".diagnostic-modal .priority-standard", "Standard")?;
    Ok(())
}

#[test]
fn unmounting_twice_is_harmless() -> Result<()> {
    let mut page = site_page()?;
    page.click("#send")?;
    site::modal::unmount(&mut page, 1)?;
    site::modal::unmount(&mut page, 1)?;
    site::modal::unmount(&mut page, 42)?;
    page.assert_missing(".diagnostic-modal")?;
    Ok(())
}

#[test]
fn modal_mounts_without_head_or_body() -> Result<()> {
    let mut page = Page::from_html(
        r#"<form class="diagnostic-form" id="f"><input name="dtc" id="c"></form>"#,
    )?;
    page.type_text("#c", "C0561")?;
    page.submit("#f")?;
    page.assert_exists(".diagnostic-modal")?;
    page.assert_text(".priority-critical", "Critical")?;
    page.click(".close-modal")?;
    page.assert_missing(".diagnostic-modal")?;
    page.assert_missing("style")?;
    Ok(())
}

#[test]
fn timestamp_follows_the_virtual_clock() -> Result<()> {
    let mut page = site_page()?;
    let origin = DateTime::parse_from_rfc3339("2024-12-31T23:59:30-05:00")
        .map_err(|err| Error::Runtime(err.to_string()))?;
    page.set_clock_origin(origin);
    page.advance_time(45_000)?;
    assert_eq!(
        site::modal::format_timestamp(&page),
        "1/1/2025, 12:00:15 AM"
    );
    Ok(())
}

#[test]
fn invalid_config_is_rejected() {
    let bad_threshold = SiteConfig {
        reveal_threshold: 0.0,
        ..SiteConfig::default()
    };
    assert!(matches!(
        Page::from_html_with_config(SITE_HTML, bad_threshold),
        Err(Error::InvalidConfig(_))
    ));
    let bad_steps = SiteConfig {
        timer_step_limit: 0,
        ..SiteConfig::default()
    };
    assert!(matches!(bad_steps.validate(), Err(Error::InvalidConfig(_))));
    let bad_offset = SiteConfig {
        clock_offset_seconds: 90_000,
        ..SiteConfig::default()
    };
    assert!(matches!(bad_offset.validate(), Err(Error::InvalidConfig(_))));
    assert!(SiteConfig::default().validate().is_ok());
}

#[test]
fn clock_offset_applies_to_the_default_origin() -> Result<()> {
    let config = SiteConfig {
        clock_offset_seconds: 9 * 3600,
        ..SiteConfig::default()
    };
    let page = Page::from_html_with_config("<p></p>", config)?;
    assert_eq!(page.current_time().offset().local_minus_utc(), 9 * 3600);
    Ok(())
}
