////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2019 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

use std::io;

use xml::reader::{EventReader, XmlEvent};

use crate::errors::{Error, Result};

/// A minimal element tree, just enough to walk the registry by element name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Node {
    Element(Element),
    Text(String),
}

impl Element {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|child| match child {
            Node::Element(elem) => Some(elem),
            Node::Text(_) => None,
        })
    }

    pub fn elements_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.elements().filter(move |elem| elem.name == name)
    }

    pub fn first_named(&self, name: &str) -> Option<&Element> {
        self.elements().find(|elem| elem.name == name)
    }

    /// Concatenation of all descendant text, in document order.
    pub fn text(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(t) => out.push_str(t),
                Node::Element(elem) => elem.collect_text(out),
            }
        }
    }
}

/// Reads a whole document into an [`Element`] tree rooted at the document element.
pub(crate) fn parse_tree<R>(source: R, source_name: &str) -> Result<Element>
where R: io::Read {
    let mut stack: Vec<Element> = Vec::new();
    let mut root = None;

    for event in EventReader::new(source) {
        match event? {
            XmlEvent::StartElement { name, attributes, .. } => {
                stack.push(Element {
                    name: name.local_name,
                    attributes: attributes
                        .into_iter()
                        .map(|attr| (attr.name.local_name, attr.value))
                        .collect(),
                    children: Vec::new(),
                });
            },
            XmlEvent::EndElement { .. } => {
                let elem = stack
                    .pop()
                    .ok_or_else(|| Error::malformed(source_name, "unbalanced end element"))?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(Node::Element(elem)),
                    None => root = Some(elem),
                }
            },
            XmlEvent::Characters(text) | XmlEvent::Whitespace(text) | XmlEvent::CData(text) => {
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(Node::Text(text));
                }
            },
            _ => {},
        }
    }

    root.ok_or_else(|| Error::malformed(source_name, "document has no root element"))
}
