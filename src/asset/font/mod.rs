pub mod bmfont;
pub mod dat;

use std::{
    fmt::Display,
    fs, io,
    path::{Path, PathBuf},
};

use serde::Serialize;

pub use bmfont::BmFont;
pub use dat::FontDat;

#[derive(Debug)]
pub enum FontError {
    /// The descriptor could not be read or the output could not be written.
    Io { path: PathBuf, source: io::Error },
    /// The descriptor is not well-formed XML.
    Xml(roxmltree::Error),
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },
    /// The attribute is not an integer, or does not fit the field it is packed into.
    InvalidValue {
        element: &'static str,
        attribute: &'static str,
        value: String,
    },
    /// The texture filename is longer than its u8 length prefix allows.
    TextureNameTooLong(usize),
    GlyphCountMismatch { declared: u64, found: usize },
    /// An existing `.dat` file could not be decoded.
    InvalidDat(String),
}

impl Display for FontError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "Unable to access {}: {}", path.display(), source),
            Self::Xml(e) => write!(f, "Unable to parse font descriptor: {}", e),
            Self::MissingAttribute { element, attribute } => {
                write!(f, "A <{element}> element is missing its \"{attribute}\" attribute")
            }
            Self::InvalidValue {
                element,
                attribute,
                value,
            } => write!(
                f,
                "Attribute \"{attribute}\" of a <{element}> element has invalid value \"{value}\""
            ),
            Self::TextureNameTooLong(len) => write!(
                f,
                "Texture filename is {len} bytes long (at most {} bytes are allowed)",
                dat::MAX_TEXTURE_FILENAME_LEN
            ),
            Self::GlyphCountMismatch { declared, found } => write!(
                f,
                "Descriptor declares {declared} glyphs but contains {found} char elements"
            ),
            Self::InvalidDat(details) => write!(f, "Invalid font data: {details}"),
        }
    }
}

impl std::error::Error for FontError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Xml(e) => Some(e),
            _ => None,
        }
    }
}

impl From<roxmltree::Error> for FontError {
    fn from(value: roxmltree::Error) -> Self {
        FontError::Xml(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Glyph {
    pub id: i16,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone)]
pub struct FontDatConfig {
    /// Written as the first header field
    pub signature: u32,
    /// Written as the second header field
    pub version: u32,
    /// Reject descriptors whose `count` attributes disagree with the number of `char` elements.
    pub strict_count: bool,
}

impl Default for FontDatConfig {
    fn default() -> Self {
        Self {
            signature: 0,
            version: 1,
            strict_count: true,
        }
    }
}

/// Converts BMFont XML text into the renderer's `.dat` bytes.
pub fn convert(
    xml: &str,
    texture_filename: &str,
    config: &FontDatConfig,
) -> Result<Vec<u8>, FontError> {
    let font = BmFont::parse(xml)?;

    FontDat::new(font, texture_filename, config)?.to_bytes()
}

/// Reads the descriptor at `xml_path` and writes its `.dat` form to `output_path`.
///
/// The output is only created once the whole descriptor has been parsed and validated.
///
/// # Examples
/// ```no_run
/// use locfont::asset::font::{FontDatConfig, convert_file};
///
/// let dat = convert_file("andy_48.fnt", "0_andy_48.png", "andy_48.dat", &FontDatConfig::default())
///     .expect("Unable to convert font.");
///
/// println!("Wrote {} glyphs", dat.glyphs.len());
/// ```
pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
    xml_path: P,
    texture_filename: &str,
    output_path: Q,
    config: &FontDatConfig,
) -> Result<FontDat, FontError> {
    let xml_path = xml_path.as_ref();
    let output_path = output_path.as_ref();

    let xml = fs::read_to_string(xml_path).map_err(|source| FontError::Io {
        path: xml_path.to_path_buf(),
        source,
    })?;

    let dat = FontDat::new(BmFont::parse(&xml)?, texture_filename, config)?;

    fs::write(output_path, dat.to_bytes()?).map_err(|source| FontError::Io {
        path: output_path.to_path_buf(),
        source,
    })?;

    log::info!(
        "Wrote {} glyph(s) for texture {} to {}",
        dat.glyphs.len(),
        dat.texture_filename,
        output_path.display()
    );

    Ok(dat)
}
