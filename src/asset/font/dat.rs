use std::io::{self, Cursor, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use serde::Serialize;

use super::{FontDatConfig, FontError, Glyph, bmfont::BmFont};

/// Longest texture filename the u8 length prefix can describe.
pub const MAX_TEXTURE_FILENAME_LEN: usize = u8::MAX as usize;

// id                   2 bytes
// x, y, width, height  16 bytes
// page index           4 bytes
pub const GLYPH_RECORD_SIZE: usize = size_of::<i16>() + 5 * size_of::<u32>();

/// The renderer's binary font layout (little endian):
///
/// | Field            | Size               |
/// |------------------|--------------------|
/// | signature        | u32                |
/// | version          | u32                |
/// | filename length  | u8                 |
/// | texture filename | filename length    |
/// | glyph count      | u32 (one per `chars` element) |
/// | glyphs           | [`GLYPH_RECORD_SIZE`] each |
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FontDat {
    pub signature: u32,
    pub version: u32,
    pub texture_filename: String,
    pub counts: Vec<u32>,
    pub glyphs: Vec<Glyph>,
}

impl FontDat {
    /// Builds the binary model from a parsed descriptor.
    ///
    /// # Errors
    /// - [`FontError::TextureNameTooLong`] when the filename does not fit the length prefix
    /// - [`FontError::GlyphCountMismatch`] when `config.strict_count` is set and the declared
    ///   counts disagree with the glyphs found
    pub fn new(
        font: BmFont,
        texture_filename: &str,
        config: &FontDatConfig,
    ) -> Result<Self, FontError> {
        check_texture_filename(texture_filename)?;

        if config.strict_count && font.declared_count() != font.glyphs.len() as u64 {
            return Err(FontError::GlyphCountMismatch {
                declared: font.declared_count(),
                found: font.glyphs.len(),
            });
        }

        Ok(Self {
            signature: config.signature,
            version: config.version,
            texture_filename: texture_filename.to_string(),
            counts: font.counts,
            glyphs: font.glyphs,
        })
    }

    pub fn size(&self) -> usize {
        2 * size_of::<u32>()
            + size_of::<u8>()
            + self.texture_filename.len()
            + self.counts.len() * size_of::<u32>()
            + self.glyphs.len() * GLYPH_RECORD_SIZE
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, FontError> {
        let name_len = check_texture_filename(&self.texture_filename)?;

        let mut bytes: Vec<u8> = Vec::with_capacity(self.size());

        self.write_records(name_len, &mut bytes).map_err(|e| {
            FontError::InvalidDat(format!("Unable to encode font data. Error: {}", e))
        })?;

        Ok(bytes)
    }

    fn write_records<W: Write>(&self, name_len: u8, out: &mut W) -> io::Result<()> {
        out.write_u32::<LittleEndian>(self.signature)?;
        out.write_u32::<LittleEndian>(self.version)?;

        out.write_u8(name_len)?;
        out.write_all(self.texture_filename.as_bytes())?;

        for count in &self.counts {
            out.write_u32::<LittleEndian>(*count)?;
        }

        for glyph in &self.glyphs {
            out.write_i16::<LittleEndian>(glyph.id)?;
            out.write_u32::<LittleEndian>(glyph.x)?;
            out.write_u32::<LittleEndian>(glyph.y)?;
            out.write_u32::<LittleEndian>(glyph.width)?;
            out.write_u32::<LittleEndian>(glyph.height)?;
            // Page index, single page only
            out.write_u32::<LittleEndian>(0)?;
        }

        Ok(())
    }

    /// Reads a `.dat` file back into memory. Files are expected to carry a single count field,
    /// which is what a BMFont descriptor with one `chars` element produces.
    pub fn from_bytes(data: &[u8]) -> Result<Self, FontError> {
        let mut cur = Cursor::new(data);

        let signature = cur.read_u32::<LittleEndian>().map_err(truncated)?;
        let version = cur.read_u32::<LittleEndian>().map_err(truncated)?;

        let name_len = cur.read_u8().map_err(truncated)?;
        let mut name_bytes = vec![0u8; name_len as usize];
        cur.read_exact(&mut name_bytes).map_err(truncated)?;

        let texture_filename = String::from_utf8(name_bytes).map_err(|e| {
            FontError::InvalidDat(format!("Texture filename is not valid UTF-8. Error: {}", e))
        })?;

        let count = cur.read_u32::<LittleEndian>().map_err(truncated)?;

        let remaining = data.len() - cur.position() as usize;
        let expected = (count as usize)
            .checked_mul(GLYPH_RECORD_SIZE)
            .ok_or_else(|| {
                FontError::InvalidDat(format!("Glyph count {} is too large to read", count))
            })?;

        if remaining != expected {
            return Err(FontError::InvalidDat(format!(
                "Glyph count is {} ({} bytes), but {} bytes of glyph data remain",
                count, expected, remaining
            )));
        }

        let glyphs = (0..count)
            .map(|i| -> Result<Glyph, FontError> {
                let (glyph, page) = read_glyph(&mut cur).map_err(truncated)?;

                if page != 0 {
                    return Err(FontError::InvalidDat(format!(
                        "Glyph {} (id {}) refers to page {}, only page 0 is supported",
                        i, glyph.id, page
                    )));
                }

                Ok(glyph)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            signature,
            version,
            texture_filename,
            counts: vec![count],
            glyphs,
        })
    }
}

/// Returns the glyph and its page index.
fn read_glyph(cur: &mut Cursor<&[u8]>) -> io::Result<(Glyph, u32)> {
    let glyph = Glyph {
        id: cur.read_i16::<LittleEndian>()?,
        x: cur.read_u32::<LittleEndian>()?,
        y: cur.read_u32::<LittleEndian>()?,
        width: cur.read_u32::<LittleEndian>()?,
        height: cur.read_u32::<LittleEndian>()?,
    };

    let page = cur.read_u32::<LittleEndian>()?;

    Ok((glyph, page))
}

fn truncated(e: io::Error) -> FontError {
    FontError::InvalidDat(format!("Font data ends early. Error: {}", e))
}

fn check_texture_filename(texture_filename: &str) -> Result<u8, FontError> {
    u8::try_from(texture_filename.len())
        .map_err(|_| FontError::TextureNameTooLong(texture_filename.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    use ntest::timeout;

    fn two_glyph_font() -> BmFont {
        BmFont {
            counts: vec![2],
            glyphs: vec![
                Glyph {
                    id: 0,
                    x: 1,
                    y: 2,
                    width: 3,
                    height: 4,
                },
                Glyph {
                    id: 1,
                    x: 5,
                    y: 6,
                    width: 7,
                    height: 8,
                },
            ],
        }
    }

    #[test]
    fn to_bytes_layout() {
        let dat = FontDat::new(two_glyph_font(), "a.png", &FontDatConfig::default()).unwrap();
        let bytes = dat.to_bytes().unwrap();

        let expected: Vec<u8> = [
            &[0x00, 0x00, 0x00, 0x00][..], // Signature
            &[0x01, 0x00, 0x00, 0x00],     // Version
            &[0x05, b'a', b'.', b'p', b'n', b'g'],
            &[0x02, 0x00, 0x00, 0x00], // Count
            &[0x00, 0x00],             // Glyph 0
            &[0x01, 0x00, 0x00, 0x00],
            &[0x02, 0x00, 0x00, 0x00],
            &[0x03, 0x00, 0x00, 0x00],
            &[0x04, 0x00, 0x00, 0x00],
            &[0x00, 0x00, 0x00, 0x00],
            &[0x01, 0x00], // Glyph 1
            &[0x05, 0x00, 0x00, 0x00],
            &[0x06, 0x00, 0x00, 0x00],
            &[0x07, 0x00, 0x00, 0x00],
            &[0x08, 0x00, 0x00, 0x00],
            &[0x00, 0x00, 0x00, 0x00],
        ]
        .concat();

        assert_eq!(bytes.len(), 4 + 4 + 1 + 5 + 4 + 22 * 2);
        assert_eq!(bytes.len(), dat.size());
        assert_eq!(bytes, expected);
    }

    #[test]
    fn from_bytes_reads_back() {
        let dat = FontDat::new(two_glyph_font(), "0_andy_48.png", &FontDatConfig::default())
            .unwrap();

        let decoded = FontDat::from_bytes(&dat.to_bytes().unwrap()).unwrap();

        assert_eq!(decoded, dat);
    }

    #[test]
    fn negative_id_is_written_as_i16() {
        let font = BmFont {
            counts: vec![1],
            glyphs: vec![Glyph {
                id: -1,
                x: 0,
                y: 0,
                width: 0,
                height: 0,
            }],
        };

        let bytes = FontDat::new(font, "", &FontDatConfig::default())
            .unwrap()
            .to_bytes()
            .unwrap();

        assert_eq!(&bytes[13..15], &[0xFF, 0xFF]);
    }

    #[test]
    fn texture_filename_limit() {
        let max = "x".repeat(MAX_TEXTURE_FILENAME_LEN);
        let bytes = FontDat::new(two_glyph_font(), &max, &FontDatConfig::default())
            .unwrap()
            .to_bytes()
            .unwrap();
        assert_eq!(bytes[8], 0xFF);

        let too_long = "x".repeat(MAX_TEXTURE_FILENAME_LEN + 1);
        assert!(matches!(
            FontDat::new(two_glyph_font(), &too_long, &FontDatConfig::default()),
            Err(FontError::TextureNameTooLong(256))
        ));
    }

    #[test]
    fn count_mismatch() {
        let mut font = two_glyph_font();
        font.counts = vec![3];

        assert!(matches!(
            FontDat::new(font.clone(), "a.png", &FontDatConfig::default()),
            Err(FontError::GlyphCountMismatch {
                declared: 3,
                found: 2
            })
        ));

        let lenient = FontDatConfig {
            strict_count: false,
            ..Default::default()
        };
        let dat = FontDat::new(font, "a.png", &lenient).unwrap();
        assert_eq!(dat.counts, vec![3]);
    }

    #[test]
    fn multiple_counts_are_written_in_order() {
        let mut font = two_glyph_font();
        font.counts = vec![1, 1];

        let bytes = FontDat::new(font, "", &FontDatConfig::default())
            .unwrap()
            .to_bytes()
            .unwrap();

        assert_eq!(&bytes[9..17], &[0x01, 0, 0, 0, 0x01, 0, 0, 0]);
        assert_eq!(bytes.len(), 4 + 4 + 1 + 4 * 2 + 22 * 2);
    }

    #[test]
    fn from_bytes_truncated() {
        let bytes = FontDat::new(two_glyph_font(), "a.png", &FontDatConfig::default())
            .unwrap()
            .to_bytes()
            .unwrap();

        assert!(matches!(
            FontDat::from_bytes(&bytes[..bytes.len() - 3]),
            Err(FontError::InvalidDat(_))
        ));
        assert!(matches!(
            FontDat::from_bytes(&bytes[..6]),
            Err(FontError::InvalidDat(_))
        ));
    }

    #[test]
    fn from_bytes_short_header_reports_end_of_data() {
        match FontDat::from_bytes(&[0x00, 0x00, 0x00, 0x00, 0x01, 0x00]) {
            Err(FontError::InvalidDat(details)) => assert!(details.contains("ends early")),
            other => panic!("Unexpected result {:?}", other),
        }
    }

    #[test]
    fn from_bytes_huge_glyph_count() {
        let mut bytes = FontDat::new(two_glyph_font(), "a.png", &FontDatConfig::default())
            .unwrap()
            .to_bytes()
            .unwrap();

        // Count field follows the 4 + 4 + 1 + 5 byte header
        bytes[14..18].copy_from_slice(&u32::MAX.to_le_bytes());

        assert!(matches!(
            FontDat::from_bytes(&bytes),
            Err(FontError::InvalidDat(_))
        ));
    }

    #[test]
    fn from_bytes_rejects_other_pages() {
        let mut bytes = FontDat::new(two_glyph_font(), "a.png", &FontDatConfig::default())
            .unwrap()
            .to_bytes()
            .unwrap();

        let last = bytes.len() - 4;
        bytes[last] = 1;

        assert!(matches!(
            FontDat::from_bytes(&bytes),
            Err(FontError::InvalidDat(_))
        ));
    }

    #[test]
    #[timeout(1000)]
    fn large_font_reads_back() {
        let glyphs: Vec<Glyph> = (0..i16::MAX)
            .map(|id| Glyph {
                id,
                x: id as u32 * 3,
                y: u32::MAX - id as u32,
                width: 12,
                height: 48,
            })
            .collect();

        let font = BmFont {
            counts: vec![glyphs.len() as u32],
            glyphs,
        };

        let dat = FontDat::new(font, "0_andy_48.png", &FontDatConfig::default()).unwrap();
        let bytes = dat.to_bytes().unwrap();

        assert_eq!(FontDat::from_bytes(&bytes).unwrap(), dat);
    }
}
