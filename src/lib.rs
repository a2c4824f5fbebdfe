use std::collections::{HashMap, HashSet, VecDeque};
use std::error::Error as StdError;
use std::fmt;

mod core_impl;
mod runtime_state;
mod selector;
mod site;

pub use core_impl::{Page, ScrollBehavior};
pub use site::catalog::{
    CatalogKey, DtcCatalog, DtcCatalogEntry, EquipmentCatalog, EquipmentSpec, StaticCatalog,
};
pub use site::config::SiteConfig;
pub use site::dtc_format::{DtcValidation, DtcValidator, validate_dtc_input};
pub use site::navigation::{SectionBounds, active_section};
pub use site::priority::{PriorityLevel, classify_priority};
pub use site::reveal::{RootBand, intersection_ratio};

use runtime_state::*;
use selector::*;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    HtmlParse(String),
    Runtime(String),
    Regex(String),
    InvalidConfig(String),
    SelectorNotFound(String),
    UnsupportedSelector(String),
    TypeMismatch {
        selector: String,
        expected: String,
        actual: String,
    },
    AssertionFailed {
        selector: String,
        expected: String,
        actual: String,
        dom_snippet: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HtmlParse(msg) => write!(f, "html parse error: {msg}"),
            Self::Runtime(msg) => write!(f, "page runtime error: {msg}"),
            Self::Regex(msg) => write!(f, "regex error: {msg}"),
            Self::InvalidConfig(msg) => write!(f, "invalid site config: {msg}"),
            Self::SelectorNotFound(selector) => write!(f, "selector not found: {selector}"),
            Self::UnsupportedSelector(selector) => write!(f, "unsupported selector: {selector}"),
            Self::TypeMismatch {
                selector,
                expected,
                actual,
            } => write!(
                f,
                "type mismatch for {selector}: expected {expected}, actual {actual}"
            ),
            Self::AssertionFailed {
                selector,
                expected,
                actual,
                dom_snippet,
            } => write!(
                f,
                "assertion failed for {selector}: expected {expected}, actual {actual}, snippet {dom_snippet}"
            ),
        }
    }
}

impl StdError for Error {}

impl From<fancy_regex::Error> for Error {
    fn from(value: fancy_regex::Error) -> Self {
        Self::Regex(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct NodeId(usize);

#[derive(Debug, Clone)]
pub(crate) enum NodeType {
    Document,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) node_type: NodeType,
}

#[derive(Debug, Clone)]
pub(crate) struct Element {
    pub(crate) tag_name: String,
    pub(crate) attrs: HashMap<String, String>,
    // Order of attributes as written, so serialization is stable.
    pub(crate) attr_order: Vec<String>,
    pub(crate) value: String,
}

/// Vertical geometry of an element in document coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct LayoutBox {
    pub(crate) top: f64,
    pub(crate) height: f64,
}

#[derive(Debug, Clone)]
pub(crate) struct Dom {
    pub(crate) nodes: Vec<Node>,
    pub(crate) root: NodeId,
    pub(crate) id_index: HashMap<String, NodeId>,
    pub(crate) layout: HashMap<NodeId, LayoutBox>,
}

pub(crate) fn truncate_chars(value: &str, max_chars: usize) -> String {
    let mut out = String::new();
    for (count, ch) in value.chars().enumerate() {
        if count >= max_chars {
            out.push_str("...");
            break;
        }
        out.push(ch);
    }
    out
}
