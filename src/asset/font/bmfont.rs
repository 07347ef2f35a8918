use std::str::FromStr;

use roxmltree::{Document, Node};

use super::{FontError, Glyph};

const CHARS_TAG: &str = "chars";
const CHAR_TAG: &str = "char";

/// The subset of an AngelCode BMFont XML descriptor that the renderer needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BmFont {
    /// One entry per `chars` element directly under the root, in document order.
    pub counts: Vec<u32>,
    /// Every `char` element in the document, in document order.
    pub glyphs: Vec<Glyph>,
}

impl BmFont {
    pub fn parse(xml: &str) -> Result<Self, FontError> {
        let doc = Document::parse(xml)?;
        let root = doc.root_element();

        let counts = root
            .children()
            .filter(|node| node.has_tag_name(CHARS_TAG))
            .map(|node| parse_attribute::<u32>(&node, CHARS_TAG, "count"))
            .collect::<Result<Vec<_>, _>>()?;

        let glyphs = root
            .descendants()
            .filter(|node| node.has_tag_name(CHAR_TAG))
            .map(|node| -> Result<Glyph, FontError> {
                Ok(Glyph {
                    id: parse_attribute(&node, CHAR_TAG, "id")?,
                    x: parse_attribute(&node, CHAR_TAG, "x")?,
                    y: parse_attribute(&node, CHAR_TAG, "y")?,
                    width: parse_attribute(&node, CHAR_TAG, "width")?,
                    height: parse_attribute(&node, CHAR_TAG, "height")?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!(
            "Parsed {} chars element(s) and {} glyph(s)",
            counts.len(),
            glyphs.len()
        );

        Ok(Self { counts, glyphs })
    }

    /// Sum of every declared `count` attribute.
    pub fn declared_count(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }
}

fn parse_attribute<T: FromStr>(
    node: &Node,
    element: &'static str,
    attribute: &'static str,
) -> Result<T, FontError> {
    let raw = node
        .attribute(attribute)
        .ok_or(FontError::MissingAttribute { element, attribute })?;

    raw.trim().parse().map_err(|_| FontError::InvalidValue {
        element,
        attribute,
        value: raw.to_string(),
    })
}
