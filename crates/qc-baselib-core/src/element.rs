//! Generic element tree for checker-specific payloads.
//!
//! `XmlElement` is also the intermediate tree the XML reader builds before
//! mapping it onto the document model.

/// A named element with ordered attributes, ordered child elements and
/// optional text content.
///
/// Text is written before the children. Mixed content is collapsed into a
/// single text node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<XmlElement>,
}

impl XmlElement {
    /// Creates an element with no attributes or children.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// Sets the text content.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    /// Adds an attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Adds a child element.
    #[must_use]
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    /// Sets an attribute. An existing attribute keeps its position.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == name) {
            Some(existing) => existing.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Replaces the text content.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    /// Appends to the text content.
    pub fn append_text(&mut self, text: &str) {
        self.text.get_or_insert_with(String::new).push_str(text);
    }

    /// Appends a child and returns a handle to it.
    pub fn push_child(&mut self, child: XmlElement) -> &mut XmlElement {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// Element name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Looks up an attribute value.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Attributes in document order.
    #[must_use]
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Text content, if any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Child elements in document order.
    #[must_use]
    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }

    /// Child elements with the given name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.name == name)
    }
}

/// Named, opaque block of checker-specific data attached to an issue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainSpecificInfo {
    name: String,
    elements: Vec<XmlElement>,
}

impl DomainSpecificInfo {
    /// Creates an empty block.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            elements: Vec::new(),
        }
    }

    /// Appends an element and returns a handle to it.
    pub fn push(&mut self, element: XmlElement) -> &mut XmlElement {
        self.elements.push(element);
        let last = self.elements.len() - 1;
        &mut self.elements[last]
    }

    /// Block name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Top-level elements in insertion order.
    #[must_use]
    pub fn elements(&self) -> &[XmlElement] {
        &self.elements
    }
}
