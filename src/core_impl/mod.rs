use super::*;

mod dom;
mod events;
mod html;
mod page;
mod scheduler;
mod viewport;

pub(crate) use events::{EventState, ListenerStore};
pub(crate) use html::{escape_html, parse_fragment, parse_html};
pub use page::Page;
pub use viewport::ScrollBehavior;
