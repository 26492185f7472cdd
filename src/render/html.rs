use crate::error::CspError;
use crate::render::fragment::{ElementMut, HtmlFragment};
use html5ever::{local_name, namespace_url, ns, QualName};
use kuchiki::iter::NodeIterator;
use kuchiki::traits::TendrilSink;
use kuchiki::{ElementData, NodeRef};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FragmentKind {
    Document,
    Fragment,
}

/// HTML parsed with html5ever and kept as a mutable kuchiki tree.
#[derive(Clone)]
pub struct ParsedFragment {
    root: NodeRef,
    kind: FragmentKind,
}

impl ParsedFragment {
    /// Parses a complete document. Rendering returns the whole document again.
    pub fn parse_document(html: &str) -> Self {
        Self {
            root: kuchiki::parse_html().one(html),
            kind: FragmentKind::Document,
        }
    }

    /// Parses a piece of markup such as one head or body chunk. Rendering returns exactly
    /// the parsed nodes, comments and table parts included.
    ///
    /// The `template` context accepts anything a renderer may emit on its own, such as
    /// `<tr>` rows or `<link>` tags, without moving or dropping nodes.
    pub fn parse(html: &str) -> Self {
        let context = QualName::new(None, ns!(html), local_name!("template"));
        Self {
            root: kuchiki::parse_fragment(context, Vec::new()).one(html),
            kind: FragmentKind::Fragment,
        }
    }

    #[inline]
    pub fn root(&self) -> &NodeRef {
        &self.root
    }

    #[inline]
    pub fn is_document(&self) -> bool {
        self.kind == FragmentKind::Document
    }

    pub fn render(&self) -> Result<String, CspError> {
        let mut buffer = Vec::new();

        match self.kind {
            FragmentKind::Document => self.root.serialize(&mut buffer)?,
            // The fragment parser hangs the parsed nodes under a synthetic `html` element.
            FragmentKind::Fragment => {
                let container = self.root.first_child().unwrap_or_else(|| self.root.clone());
                for child in container.children() {
                    child.serialize(&mut buffer)?;
                }
            }
        }

        String::from_utf8(buffer).map_err(|err| CspError::SerializationError(err.to_string()))
    }
}

impl fmt::Debug for ParsedFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParsedFragment")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl HtmlFragment for ParsedFragment {
    fn for_each_element(&mut self, tag_names: &[&str], mutate: &mut dyn FnMut(&mut dyn ElementMut)) {
        for element in self.root.descendants().elements() {
            let matched = tag_names
                .iter()
                .any(|tag| tag.eq_ignore_ascii_case(&element.name.local));
            if matched {
                mutate(&mut KuchikiElement { data: &element });
            }
        }
    }
}

struct KuchikiElement<'a> {
    data: &'a ElementData,
}

impl ElementMut for KuchikiElement<'_> {
    fn tag_name(&self) -> &str {
        &self.data.name.local
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.data.attributes.borrow().get(name).map(str::to_owned)
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        self.data
            .attributes
            .borrow_mut()
            .insert(name, value.to_owned());
    }
}
