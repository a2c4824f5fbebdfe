//! Interactive behavior of the Concord Motors site, wired onto a [`Page`].

pub(crate) mod cards;
pub(crate) mod catalog;
pub(crate) mod config;
pub(crate) mod debounce;
pub(crate) mod dtc_format;
pub(crate) mod intake;
pub(crate) mod modal;
pub(crate) mod navigation;
pub(crate) mod priority;
pub(crate) mod reveal;

use crate::core_impl::EventState;
use crate::runtime_state::TimerAction;
use crate::{Page, Result};

pub(crate) use config::SiteConfig;

const CONSOLE_BRANDING: [&str; 3] = [
    "🔧 Concord Motors - Professional Automotive Diagnostics System Loaded",
    "📊 Advanced diagnostic capabilities initialized",
    "⚙️ For technical support: concordmotors@gmail.com",
];

/// Listener bodies the site attaches to the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Handler {
    NavLinkClick,
    NavScroll,
    IntakeSubmit,
    DtcInput,
    ServiceCardEnter,
    ServiceCardLeave,
    DtcItemClick,
    EquipmentCardClick,
    ModalClose { modal_id: u64 },
    ModalBackdrop { modal_id: u64 },
}

#[derive(Debug)]
pub(crate) struct SiteState {
    pub(crate) nav_debounce: debounce::Debouncer,
    pub(crate) reveal: reveal::RevealState,
    pub(crate) modals: modal::ModalRegistry,
    pub(crate) dtc_validator: Option<dtc_format::DtcValidator>,
    pub(crate) dtc_catalog: catalog::DtcCatalog,
    pub(crate) equipment_catalog: catalog::EquipmentCatalog,
}

impl SiteState {
    pub(crate) fn new(config: &SiteConfig) -> Self {
        Self {
            nav_debounce: debounce::Debouncer::new(
                config.nav_scroll_debounce_ms,
                TimerAction::NavScrollSettled,
            ),
            reveal: reveal::RevealState::default(),
            modals: modal::ModalRegistry::default(),
            dtc_validator: None,
            dtc_catalog: catalog::DtcCatalog::standard(),
            equipment_catalog: catalog::EquipmentCatalog::standard(),
        }
    }
}

/// Page-load initialization. Each controller only attaches to the elements
/// it finds, so a partial document boots without error.
pub(crate) fn boot(page: &mut Page) -> Result<()> {
    navigation::init(page)?;
    intake::init(page)?;
    cards::init(page)?;
    reveal::init(page)?;
    for line in CONSOLE_BRANDING {
        page.console_log(line);
    }
    Ok(())
}

pub(crate) fn run_handler(page: &mut Page, handler: Handler, event: &mut EventState) -> Result<()> {
    let node = event.current_target;
    match handler {
        Handler::NavLinkClick => navigation::on_link_click(page, node, event),
        Handler::NavScroll => navigation::on_scroll(page),
        Handler::IntakeSubmit => intake::on_submit(page, node, event),
        Handler::DtcInput => intake::on_dtc_input(page, node),
        Handler::ServiceCardEnter => cards::on_service_card_enter(page, node),
        Handler::ServiceCardLeave => cards::on_service_card_leave(page, node),
        Handler::DtcItemClick => cards::on_dtc_item_click(page, node),
        Handler::EquipmentCardClick => cards::on_equipment_card_click(page, node),
        Handler::ModalClose { modal_id } => modal::unmount(page, modal_id),
        Handler::ModalBackdrop { modal_id } => {
            modal::on_backdrop_click(page, modal_id, event.target)
        }
    }
}
