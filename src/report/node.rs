// Report tree - shared element arena for the XML and HTML writers

/// Handle into a [`ReportTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct ReportNode {
    tag: String,
    attrs: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone, Copy)]
enum Markup {
    Xml,
    Html,
}

/// Element tree built incrementally by the renderers and serialized
/// once at the end of the run. Attributes keep insertion order.
#[derive(Debug, Clone)]
pub struct ReportTree {
    nodes: Vec<ReportNode>,
}

impl ReportTree {
    pub fn new(root_tag: &str) -> Self {
        Self {
            nodes: vec![ReportNode {
                tag: root_tag.to_string(),
                attrs: Vec::new(),
                text: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn create_node(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(ReportNode {
            tag: tag.to_string(),
            attrs: Vec::new(),
            text: None,
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Set an attribute, replacing an earlier value in place so the
    /// original attribute order is kept.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        let value = value.into();
        let node = &mut self.nodes[id.0];
        match node.attrs.iter_mut().find(|(n, _)| n.as_str() == name) {
            Some(attr) => attr.1 = value,
            None => node.attrs.push((name.to_string(), value)),
        }
    }

    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        self.nodes[id.0].text = Some(text.into());
    }

    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        self.write_node(self.root(), 0, Markup::Xml, &mut out);
        out
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_node(self.root(), 0, Markup::Html, &mut out);
        out
    }

    fn write_node(&self, id: NodeId, depth: usize, markup: Markup, out: &mut String) {
        let node = &self.nodes[id.0];
        let pad = "  ".repeat(depth);

        out.push_str(&pad);
        out.push('<');
        out.push_str(&node.tag);
        for (name, value) in &node.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_attr(value));
            out.push('"');
        }

        if node.children.is_empty() {
            match &node.text {
                Some(text) => {
                    out.push('>');
                    out.push_str(&escape_text(text));
                    out.push_str("</");
                    out.push_str(&node.tag);
                    out.push_str(">\n");
                }
                None => match markup {
                    Markup::Xml => out.push_str("/>\n"),
                    Markup::Html => {
                        out.push_str("></");
                        out.push_str(&node.tag);
                        out.push_str(">\n");
                    }
                },
            }
            return;
        }

        out.push_str(">\n");
        if let Some(text) = &node.text {
            out.push_str(&pad);
            out.push_str("  ");
            out.push_str(&escape_text(text));
            out.push('\n');
        }
        for child in &node.children {
            self.write_node(*child, depth + 1, markup, out);
        }
        out.push_str(&pad);
        out.push_str("</");
        out.push_str(&node.tag);
        out.push_str(">\n");
    }
}

pub(crate) fn escape_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

pub(crate) fn escape_attr(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
