use super::html::{is_raw_text_tag, is_void_tag};
use super::*;

impl Element {
    pub(crate) fn new(tag_name: String, attrs: Vec<(String, String)>) -> Self {
        let mut map = HashMap::with_capacity(attrs.len());
        let mut attr_order = Vec::with_capacity(attrs.len());
        for (name, value) in attrs {
            if map.insert(name.clone(), value).is_none() {
                attr_order.push(name);
            }
        }
        let value = map.get("value").cloned().unwrap_or_default();
        Self {
            tag_name,
            attrs: map,
            attr_order,
            value,
        }
    }
}

impl Dom {
    pub(crate) fn new() -> Self {
        let root = Node {
            parent: None,
            children: Vec::new(),
            node_type: NodeType::Document,
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
            id_index: HashMap::new(),
            layout: HashMap::new(),
        }
    }

    fn create_node(&mut self, parent: Option<NodeId>, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent,
            children: Vec::new(),
            node_type,
        });
        if let Some(parent_id) = parent {
            self.nodes[parent_id.0].children.push(id);
        }
        id
    }

    pub(crate) fn create_element(&mut self, parent: NodeId, element: Element) -> NodeId {
        let id_attr = element.attrs.get("id").cloned();
        let id = self.create_node(Some(parent), NodeType::Element(element));
        if let Some(id_attr) = id_attr {
            if !id_attr.is_empty() && self.is_connected(id) {
                self.id_index.entry(id_attr).or_insert(id);
            }
        }
        id
    }

    pub(crate) fn create_text(&mut self, parent: NodeId, text: String) -> NodeId {
        self.create_node(Some(parent), NodeType::Text(text))
    }

    pub(crate) fn element(&self, node_id: NodeId) -> Option<&Element> {
        match &self.nodes.get(node_id.0)?.node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    pub(crate) fn element_mut(&mut self, node_id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes.get_mut(node_id.0)?.node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    pub(crate) fn tag_name(&self, node_id: NodeId) -> Option<&str> {
        self.element(node_id).map(|e| e.tag_name.as_str())
    }

    pub(crate) fn is_tag(&self, node_id: NodeId, tag: &str) -> bool {
        self.tag_name(node_id)
            .is_some_and(|actual| actual.eq_ignore_ascii_case(tag))
    }

    pub(crate) fn parent(&self, node_id: NodeId) -> Option<NodeId> {
        self.nodes.get(node_id.0).and_then(|node| node.parent)
    }

    pub(crate) fn children(&self, node_id: NodeId) -> &[NodeId] {
        self.nodes
            .get(node_id.0)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
    }

    pub(crate) fn is_connected(&self, node_id: NodeId) -> bool {
        let mut cursor = Some(node_id);
        while let Some(node) = cursor {
            if node == self.root {
                return true;
            }
            cursor = self.parent(node);
        }
        false
    }

    pub(crate) fn by_id(&self, id: &str) -> Option<NodeId> {
        self.id_index.get(id).copied()
    }

    pub(crate) fn rebuild_id_index(&mut self) {
        let mut next = HashMap::new();
        let mut stack = vec![self.root];
        while let Some(node) = stack.pop() {
            if let NodeType::Element(element) = &self.nodes[node.0].node_type {
                if let Some(id) = element.attrs.get("id") {
                    if !id.is_empty() {
                        next.entry(id.clone()).or_insert(node);
                    }
                }
            }
            for child in self.nodes[node.0].children.iter().rev() {
                stack.push(*child);
            }
        }
        self.id_index = next;
    }

    pub(crate) fn text_content(&self, node_id: NodeId) -> String {
        stacker::maybe_grow(64 * 1024, 2 * 1024 * 1024, || {
            match &self.nodes[node_id.0].node_type {
                NodeType::Document | NodeType::Element(_) => {
                    let mut out = String::new();
                    for child in &self.nodes[node_id.0].children {
                        out.push_str(&self.text_content(*child));
                    }
                    out
                }
                NodeType::Text(text) => text.clone(),
            }
        })
    }

    pub(crate) fn attr(&self, node_id: NodeId, name: &str) -> Option<String> {
        self.element(node_id)
            .and_then(|element| element.attrs.get(&name.to_ascii_lowercase()).cloned())
    }

    pub(crate) fn set_attr(&mut self, node_id: NodeId, name: &str, value: &str) -> Result<()> {
        let lowered = name.to_ascii_lowercase();
        {
            let element = self.element_mut(node_id).ok_or_else(|| {
                Error::Runtime("setAttribute target is not an element".into())
            })?;
            if element
                .attrs
                .insert(lowered.clone(), value.to_string())
                .is_none()
            {
                element.attr_order.push(lowered.clone());
            }
            if lowered == "value" {
                element.value = value.to_string();
            }
        }
        if lowered == "id" {
            self.rebuild_id_index();
        }
        Ok(())
    }

    pub(crate) fn value(&self, node_id: NodeId) -> Result<String> {
        let element = self
            .element(node_id)
            .ok_or_else(|| Error::Runtime("value target is not an element".into()))?;
        Ok(element.value.clone())
    }

    pub(crate) fn set_value(&mut self, node_id: NodeId, value: &str) -> Result<()> {
        let element = self
            .element_mut(node_id)
            .ok_or_else(|| Error::Runtime("value target is not an element".into()))?;
        element.value = value.to_string();
        Ok(())
    }

    /// Value a control returns to when its form is reset.
    pub(crate) fn default_value(&self, node_id: NodeId) -> String {
        if self.is_tag(node_id, "textarea") {
            self.text_content(node_id)
        } else {
            self.attr(node_id, "value").unwrap_or_default()
        }
    }

    pub(crate) fn initialize_form_control_values(&mut self) {
        for node in self.all_element_nodes() {
            if self.is_tag(node, "textarea") {
                let text = self.text_content(node);
                if let Some(element) = self.element_mut(node) {
                    element.value = text;
                }
            }
        }
    }

    pub(crate) fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        if self.parent(child) != Some(parent) {
            return Err(Error::Runtime(
                "removeChild target is not a direct child".into(),
            ));
        }
        self.nodes[parent.0].children.retain(|id| *id != child);
        self.nodes[child.0].parent = None;
        self.rebuild_id_index();
        Ok(())
    }

    pub(crate) fn remove_node(&mut self, node: NodeId) -> Result<()> {
        if node == self.root {
            return Err(Error::Runtime("cannot remove document root".into()));
        }
        let Some(parent) = self.parent(node) else {
            return Ok(());
        };
        self.remove_child(parent, node)
    }

    /// Parses `html` as a fragment and appends its top-level nodes to `parent`.
    pub(crate) fn append_html(&mut self, parent: NodeId, html: &str) -> Result<Vec<NodeId>> {
        if self.element(parent).is_none() && parent != self.root {
            return Err(Error::Runtime("innerHTML target cannot have children".into()));
        }
        let fragment = parse_fragment(html)?;
        let mut appended = Vec::new();
        for child in fragment.nodes[fragment.root.0].children.clone() {
            appended.push(self.clone_subtree_from_dom(&fragment, child, Some(parent))?);
        }
        self.rebuild_id_index();
        Ok(appended)
    }

    fn clone_subtree_from_dom(
        &mut self,
        source: &Dom,
        source_node: NodeId,
        parent: Option<NodeId>,
    ) -> Result<NodeId> {
        let node_type = match &source.nodes[source_node.0].node_type {
            NodeType::Document => {
                return Err(Error::Runtime(
                    "cannot clone document node into fragment target".into(),
                ));
            }
            NodeType::Element(element) => NodeType::Element(element.clone()),
            NodeType::Text(text) => NodeType::Text(text.clone()),
        };

        let node = self.create_node(parent, node_type);
        for child in &source.nodes[source_node.0].children {
            self.clone_subtree_from_dom(source, *child, Some(node))?;
        }
        Ok(node)
    }

    pub(crate) fn style_get(&self, node_id: NodeId, name: &str) -> Result<String> {
        let element = self
            .element(node_id)
            .ok_or_else(|| Error::Runtime("style target is not an element".into()))?;
        let decls = parse_style_declarations(element.attrs.get("style").map(String::as_str));
        Ok(decls
            .iter()
            .find(|(prop, _)| prop == name)
            .map(|(_, value)| value.clone())
            .unwrap_or_default())
    }

    /// Sets one inline declaration; an empty value removes it.
    pub(crate) fn style_set(&mut self, node_id: NodeId, name: &str, value: &str) -> Result<()> {
        let current = self
            .element(node_id)
            .ok_or_else(|| Error::Runtime("style target is not an element".into()))?
            .attrs
            .get("style")
            .cloned();

        let mut decls = parse_style_declarations(current.as_deref());
        if let Some(pos) = decls.iter().position(|(prop, _)| prop == name) {
            if value.is_empty() {
                decls.remove(pos);
            } else {
                decls[pos].1 = value.to_string();
            }
        } else if !value.is_empty() {
            decls.push((name.to_string(), value.to_string()));
        }

        if decls.is_empty() && current.is_none() {
            return Ok(());
        }
        // Keep an empty style attribute to match CSSStyleDeclaration behavior.
        self.set_attr(node_id, "style", &serialize_style_declarations(&decls))
    }

    pub(crate) fn layout_box(&self, node_id: NodeId) -> LayoutBox {
        self.layout.get(&node_id).copied().unwrap_or_default()
    }

    pub(crate) fn has_layout(&self, node_id: NodeId) -> bool {
        self.layout.contains_key(&node_id)
    }

    pub(crate) fn set_layout(&mut self, node_id: NodeId, layout: LayoutBox) -> Result<()> {
        if self.element(node_id).is_none() {
            return Err(Error::Runtime("layout target is not an element".into()));
        }
        self.layout.insert(node_id, layout);
        Ok(())
    }

    pub(crate) fn offset_top(&self, node_id: NodeId) -> f64 {
        self.layout_box(node_id).top
    }

    pub(crate) fn offset_height(&self, node_id: NodeId) -> f64 {
        self.layout_box(node_id).height
    }

    /// Bottom edge of the lowest connected element with a layout box.
    pub(crate) fn content_height(&self) -> f64 {
        self.layout
            .iter()
            .filter(|(node, _)| self.is_connected(**node))
            .map(|(_, layout)| layout.top + layout.height)
            .fold(0.0, f64::max)
    }

    pub(crate) fn query_selector(&self, selector: &str) -> Result<Option<NodeId>> {
        Ok(self.query_selector_all(selector)?.into_iter().next())
    }

    pub(crate) fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        let chains = parse_selector_list(selector)?;
        if let [chain] = chains.as_slice() {
            if let Some(id) = chain.lone_id() {
                return Ok(self.by_id(id).into_iter().collect());
            }
        }

        let mut candidates = Vec::new();
        self.collect_elements_dfs(self.root, &mut candidates);
        Ok(self.filter_matching(candidates, &chains))
    }

    pub(crate) fn query_selector_from(
        &self,
        root: NodeId,
        selector: &str,
    ) -> Result<Option<NodeId>> {
        Ok(self.query_selector_all_from(root, selector)?.into_iter().next())
    }

    pub(crate) fn query_selector_all_from(
        &self,
        root: NodeId,
        selector: &str,
    ) -> Result<Vec<NodeId>> {
        let chains = parse_selector_list(selector)?;
        let mut candidates = Vec::new();
        for child in self.children(root) {
            self.collect_elements_dfs(*child, &mut candidates);
        }
        Ok(self.filter_matching(candidates, &chains))
    }

    fn filter_matching(
        &self,
        candidates: Vec<NodeId>,
        chains: &[SelectorChain],
    ) -> Vec<NodeId> {
        let mut seen = HashSet::new();
        candidates
            .into_iter()
            .filter(|candidate| {
                chains
                    .iter()
                    .any(|chain| self.matches_chain(*candidate, chain))
                    && seen.insert(*candidate)
            })
            .collect()
    }

    pub(crate) fn closest(&self, node_id: NodeId, selector: &str) -> Result<Option<NodeId>> {
        let chains = parse_selector_list(selector)?;
        let mut cursor = Some(node_id);
        while let Some(current) = cursor {
            if self.element(current).is_some()
                && chains
                    .iter()
                    .any(|chain| self.matches_chain(current, chain))
            {
                return Ok(Some(current));
            }
            cursor = self.parent(current);
        }
        Ok(None)
    }

    pub(crate) fn subtree(&self, node_id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![node_id];
        while let Some(node) = stack.pop() {
            out.push(node);
            for child in self.children(node).iter().rev() {
                stack.push(*child);
            }
        }
        out
    }

    fn collect_elements_dfs(&self, node_id: NodeId, out: &mut Vec<NodeId>) {
        stacker::maybe_grow(64 * 1024, 2 * 1024 * 1024, || {
            if matches!(self.nodes[node_id.0].node_type, NodeType::Element(_)) {
                out.push(node_id);
            }
            for child in &self.nodes[node_id.0].children {
                self.collect_elements_dfs(*child, out);
            }
        })
    }

    pub(crate) fn all_element_nodes(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_elements_dfs(self.root, &mut out);
        out
    }

    fn matches_chain(&self, node_id: NodeId, chain: &SelectorChain) -> bool {
        if !self.matches_compound(node_id, &chain.subject) {
            return false;
        }
        let mut current = node_id;
        for (combinator, compound) in &chain.ancestors {
            let matched = match combinator {
                Combinator::Child => self
                    .parent(current)
                    .filter(|parent| self.matches_compound(*parent, compound)),
                Combinator::Descendant => std::iter::successors(self.parent(current), |node| {
                    self.parent(*node)
                })
                .find(|ancestor| self.matches_compound(*ancestor, compound)),
            };
            let Some(matched) = matched else {
                return false;
            };
            current = matched;
        }
        true
    }

    fn matches_compound(&self, node_id: NodeId, compound: &Compound) -> bool {
        self.element(node_id)
            .is_some_and(|element| compound.matches(element))
    }

    pub(crate) fn dump_node(&self, node_id: NodeId) -> String {
        let mut out = String::new();
        self.dump_node_into(node_id, false, &mut out);
        out
    }

    fn dump_node_into(&self, node_id: NodeId, raw_text: bool, out: &mut String) {
        stacker::maybe_grow(64 * 1024, 2 * 1024 * 1024, || {
            match &self.nodes[node_id.0].node_type {
                NodeType::Document => {
                    for child in &self.nodes[node_id.0].children {
                        self.dump_node_into(*child, false, out);
                    }
                }
                NodeType::Text(text) => {
                    if raw_text {
                        out.push_str(text);
                    } else {
                        out.push_str(&escape_html(text));
                    }
                }
                NodeType::Element(element) => {
                    out.push('<');
                    out.push_str(&element.tag_name);
                    for name in &element.attr_order {
                        let Some(value) = element.attrs.get(name) else {
                            continue;
                        };
                        out.push(' ');
                        out.push_str(name);
                        out.push_str("=\"");
                        out.push_str(&escape_html(value));
                        out.push('"');
                    }
                    out.push('>');
                    if is_void_tag(&element.tag_name) {
                        return;
                    }
                    let raw = is_raw_text_tag(&element.tag_name);
                    for child in &self.nodes[node_id.0].children {
                        self.dump_node_into(*child, raw, out);
                    }
                    out.push_str("</");
                    out.push_str(&element.tag_name);
                    out.push('>');
                }
            }
        })
    }
}

pub(crate) fn parse_style_declarations(style_attr: Option<&str>) -> Vec<(String, String)> {
    let Some(style_attr) = style_attr else {
        return Vec::new();
    };

    let mut out: Vec<(String, String)> = Vec::new();
    for raw_decl in style_attr.split(';') {
        let Some((raw_name, raw_value)) = raw_decl.split_once(':') else {
            continue;
        };
        let name = raw_name.trim().to_ascii_lowercase();
        let value = raw_value.trim();
        if name.is_empty() || value.is_empty() {
            continue;
        }
        if let Some(pos) = out.iter().position(|(existing, _)| existing == &name) {
            out[pos].1 = value.to_string();
        } else {
            out.push((name, value.to_string()));
        }
    }
    out
}

pub(crate) fn serialize_style_declarations(decls: &[(String, String)]) -> String {
    decls
        .iter()
        .map(|(name, value)| format!("{name}: {value};"))
        .collect::<Vec<_>>()
        .join(" ")
}
