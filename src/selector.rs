use super::*;

/// Attribute tests the site scripts rely on: presence, exact value and
/// substring (`[placeholder*="P0XXX"]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AttrMatch {
    Present(String),
    Equals(String, String),
    Substring(String, String),
}

impl AttrMatch {
    fn matches(&self, attrs: &HashMap<String, String>) -> bool {
        match self {
            Self::Present(name) => attrs.contains_key(name),
            Self::Equals(name, value) => attrs.get(name) == Some(value),
            // An empty needle never matches, as in CSS.
            Self::Substring(name, needle) => attrs
                .get(name)
                .is_some_and(|actual| !needle.is_empty() && actual.contains(needle.as_str())),
        }
    }
}

/// `tag#id.class[attr]` with every part optional; at least one is present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Compound {
    universal: bool,
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrMatch>,
}

impl Compound {
    fn is_empty(&self) -> bool {
        !self.universal
            && self.tag.is_none()
            && self.id.is_none()
            && self.classes.is_empty()
            && self.attrs.is_empty()
    }

    pub(crate) fn matches(&self, element: &Element) -> bool {
        if self
            .tag
            .as_ref()
            .is_some_and(|tag| !element.tag_name.eq_ignore_ascii_case(tag))
        {
            return false;
        }
        if self
            .id
            .as_ref()
            .is_some_and(|id| element.attrs.get("id") != Some(id))
        {
            return false;
        }
        let class_list = element.attrs.get("class").map(String::as_str).unwrap_or("");
        self.classes
            .iter()
            .all(|wanted| class_list.split_whitespace().any(|class| class == wanted))
            && self.attrs.iter().all(|test| test.matches(&element.attrs))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Combinator {
    Descendant,
    Child,
}

/// One comma-separated alternative. `ancestors` runs right to left: the
/// first entry relates the subject to the compound written just before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SelectorChain {
    pub(crate) subject: Compound,
    pub(crate) ancestors: Vec<(Combinator, Compound)>,
}

impl SelectorChain {
    /// `#some-id` on its own, answerable from the id index.
    pub(crate) fn lone_id(&self) -> Option<&str> {
        let subject = &self.subject;
        let only_id = self.ancestors.is_empty()
            && !subject.universal
            && subject.tag.is_none()
            && subject.classes.is_empty()
            && subject.attrs.is_empty();
        if only_id { subject.id.as_deref() } else { None }
    }
}

/// Parses a selector list. Sibling combinators, pseudo-classes and the
/// remaining attribute operators are reported as unsupported.
pub(crate) fn parse_selector_list(source: &str) -> Result<Vec<SelectorChain>> {
    SelectorParser {
        source,
        chars: source.chars().collect(),
        pos: 0,
    }
    .list()
}

struct SelectorParser<'a> {
    source: &'a str,
    chars: Vec<char>,
    pos: usize,
}

fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '-'
}

impl SelectorParser<'_> {
    fn reject(&self) -> Error {
        Error::UnsupportedSelector(self.source.to_string())
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        Some(ch)
    }

    fn take_while(&mut self, keep: impl Fn(char) -> bool) -> String {
        let start = self.pos;
        while self.peek().is_some_and(&keep) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    /// Returns whether any whitespace was consumed.
    fn skip_whitespace(&mut self) -> bool {
        !self.take_while(|ch| ch.is_ascii_whitespace()).is_empty()
    }

    fn ident(&mut self) -> Result<String> {
        let ident = self.take_while(is_ident_char);
        if ident.is_empty() {
            return Err(self.reject());
        }
        Ok(ident)
    }

    fn list(mut self) -> Result<Vec<SelectorChain>> {
        let mut chains = vec![self.chain()?];
        while self.peek() == Some(',') {
            self.pos += 1;
            chains.push(self.chain()?);
        }
        if self.peek().is_some() {
            return Err(self.reject());
        }
        Ok(chains)
    }

    fn chain(&mut self) -> Result<SelectorChain> {
        self.skip_whitespace();
        let mut subject = self.compound()?;
        let mut ancestors = Vec::new();
        loop {
            let spaced = self.skip_whitespace();
            let combinator = match self.peek() {
                None | Some(',') => break,
                Some('>') => {
                    self.pos += 1;
                    self.skip_whitespace();
                    Combinator::Child
                }
                Some(_) if spaced => Combinator::Descendant,
                Some(_) => return Err(self.reject()),
            };
            let next = self.compound()?;
            ancestors.push((combinator, std::mem::replace(&mut subject, next)));
        }
        ancestors.reverse();
        Ok(SelectorChain { subject, ancestors })
    }

    fn compound(&mut self) -> Result<Compound> {
        let mut compound = Compound::default();
        match self.peek() {
            Some('*') => {
                self.pos += 1;
                compound.universal = true;
            }
            Some(ch) if is_ident_char(ch) => {
                compound.tag = Some(self.ident()?.to_ascii_lowercase());
            }
            _ => {}
        }
        loop {
            match self.peek() {
                Some('#') => {
                    self.pos += 1;
                    let id = self.ident()?;
                    if compound.id.replace(id).is_some() {
                        return Err(self.reject());
                    }
                }
                Some('.') => {
                    self.pos += 1;
                    let class = self.ident()?;
                    compound.classes.push(class);
                }
                Some('[') => {
                    let test = self.attribute()?;
                    compound.attrs.push(test);
                }
                _ => break,
            }
        }
        if compound.is_empty() {
            return Err(self.reject());
        }
        Ok(compound)
    }

    fn attribute(&mut self) -> Result<AttrMatch> {
        self.pos += 1;
        self.skip_whitespace();
        let name = self
            .take_while(|ch| is_ident_char(ch) || ch == ':')
            .to_ascii_lowercase();
        if name.is_empty() {
            return Err(self.reject());
        }
        self.skip_whitespace();
        let substring = match self.bump() {
            Some(']') => return Ok(AttrMatch::Present(name)),
            Some('=') => false,
            Some('*') if self.bump() == Some('=') => true,
            _ => return Err(self.reject()),
        };
        self.skip_whitespace();
        let value = self.attribute_value()?;
        self.skip_whitespace();
        if self.bump() != Some(']') {
            return Err(self.reject());
        }
        Ok(if substring {
            AttrMatch::Substring(name, value)
        } else {
            AttrMatch::Equals(name, value)
        })
    }

    fn attribute_value(&mut self) -> Result<String> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                let value = self.take_while(|ch| ch != quote);
                if self.bump() != Some(quote) {
                    return Err(self.reject());
                }
                Ok(value)
            }
            _ => {
                let value = self.take_while(|ch| !ch.is_ascii_whitespace() && ch != ']');
                if value.is_empty() {
                    return Err(self.reject());
                }
                Ok(value)
            }
        }
    }
}
