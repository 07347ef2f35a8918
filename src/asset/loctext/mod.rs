mod serialisation;
use std::{
    fmt::Display,
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use serialisation::*;

#[derive(Debug)]
pub enum LoctextError {
    /// A localization file could not be read or the merged output could not be written.
    Io { path: PathBuf, source: io::Error },
    /// A localization file was readable but did not contain UTF-8 text.
    Encoding { path: PathBuf },
}

impl Display for LoctextError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "Unable to access {}: {}", path.display(), source),
            Self::Encoding { path } => {
                write!(f, "File {} is not valid UTF-8 text", path.display())
            }
        }
    }
}

impl std::error::Error for LoctextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Encoding { .. } => None,
        }
    }
}

/// A translated value written over an original tag during a merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub tag: String,
    pub value: String,
}

/// Ordered `tag=value` entries from a localization file. Iteration order is the order in which
/// each tag was first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagTable {
    values: IndexMap<String, String>,
}

impl TagTable {
    pub fn parse(text: &str) -> Self {
        let mut values = IndexMap::new();

        // A lone '\r' also ends a line
        for (tag, value) in text.split(['\r', '\n']).filter_map(split_tag_line) {
            // Overwrites keep the original position
            values.insert(tag.to_string(), value.to_string());
        }

        Self { values }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LoctextError> {
        let path = path.as_ref();

        let bytes = fs::read(path).map_err(|source| LoctextError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let text = String::from_utf8(bytes).map_err(|_| LoctextError::Encoding {
            path: path.to_path_buf(),
        })?;

        let table = Self::parse(&text);
        log::debug!("Read {} tags from {}", table.len(), path.display());

        Ok(table)
    }

    pub fn get(&self, tag: &str) -> Option<&str> {
        self.values.get(tag).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Overwrites every tag that also exists in `translation`. Tags only present in the
    /// translation are ignored.
    ///
    /// Returns the replacements in the translation's order.
    pub fn merge_translation(&mut self, translation: &TagTable) -> Vec<Replacement> {
        let mut replacements = vec![];

        for (tag, translated) in &translation.values {
            let Some(value) = self.values.get_mut(tag) else {
                continue;
            };

            value.clone_from(translated);

            log::debug!("Replaced tag {tag}");

            replacements.push(Replacement {
                tag: tag.clone(),
                value: translated.clone(),
            });
        }

        replacements
    }

    pub fn to_text(&self) -> String {
        self.iter()
            .map(|(tag, value)| format_tag_line(tag, value))
            .collect()
    }

    pub fn dump<P: AsRef<Path>>(&self, dump_path: P) -> Result<(), LoctextError> {
        let path = dump_path.as_ref();
        let io_err = |source| LoctextError::Io {
            path: path.to_path_buf(),
            source,
        };

        let out_file = File::create(path).map_err(io_err)?;
        let mut writer = BufWriter::new(out_file);

        writer.write_all(self.to_text().as_bytes()).map_err(io_err)?;
        writer.flush().map_err(io_err)?;

        Ok(())
    }
}

/// Merges the translation file over the original and writes the result to `output_path`.
///
/// # Errors
/// - [`LoctextError::Io`] when either input can not be read or the output can not be written
/// - [`LoctextError::Encoding`] when an input is not UTF-8
///
/// # Examples
/// ```no_run
/// use locfont::asset::loctext::merge_files;
///
/// let replacements = merge_files("enLocalization.txt.eng", "enLocalization.txt.rus", "enLocalization.txt")
///     .expect("Unable to merge.");
///
/// for r in &replacements {
///     println!("{} -> {}", r.tag, r.value);
/// }
/// ```
pub fn merge_files<P, Q, R>(
    original_path: P,
    translation_path: Q,
    output_path: R,
) -> Result<Vec<Replacement>, LoctextError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    R: AsRef<Path>,
{
    merge_files_with(original_path, translation_path, output_path, |_| ())
}

/// Same as [`merge_files`], but hands each replacement to `on_replace` as soon as the merge
/// makes it, before the output is written.
pub fn merge_files_with<P, Q, R, F>(
    original_path: P,
    translation_path: Q,
    output_path: R,
    mut on_replace: F,
) -> Result<Vec<Replacement>, LoctextError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    R: AsRef<Path>,
    F: FnMut(&Replacement),
{
    let mut original = TagTable::from_path(original_path)?;
    let translation = TagTable::from_path(translation_path)?;

    let replacements = original.merge_translation(&translation);
    for replacement in &replacements {
        on_replace(replacement);
    }

    original.dump(&output_path)?;

    log::info!(
        "Replaced {} of {} tags, wrote {}",
        replacements.len(),
        original.len(),
        output_path.as_ref().display()
    );

    Ok(replacements)
}

#[cfg(test)]
mod tests {
    use super::*;

    use ntest::timeout;

    #[test]
    fn translated_tag_is_replaced_in_place() {
        let mut original = TagTable::parse("A=hello\nB=world\n");
        let translation = TagTable::parse("B=mundo\n");

        let replacements = original.merge_translation(&translation);

        assert_eq!(original.to_text(), "A=hello\nB=mundo\n");
        assert_eq!(
            replacements,
            vec![Replacement {
                tag: "B".to_string(),
                value: "mundo".to_string()
            }]
        );
    }

    #[test]
    fn translation_only_tags_are_dropped() {
        let mut original = TagTable::parse("A=hello\n");
        let translation = TagTable::parse("Z=extra\nA=hola\n");

        let replacements = original.merge_translation(&translation);

        assert_eq!(original.to_text(), "A=hola\n");
        assert_eq!(original.get("Z"), None);
        assert_eq!(replacements.len(), 1);
    }

    #[test]
    fn output_order_follows_original() {
        let mut original = TagTable::parse("one=1\ntwo=2\nthree=3\n");
        let translation = TagTable::parse("three=III\none=I\n");

        let replacements = original.merge_translation(&translation);

        assert_eq!(original.to_text(), "one=I\ntwo=2\nthree=III\n");
        assert_eq!(
            replacements
                .iter()
                .map(|r| r.tag.as_str())
                .collect::<Vec<_>>(),
            ["three", "one"]
        );
    }

    #[test]
    fn duplicate_tags_keep_last_value_and_first_position() {
        let table = TagTable::parse("A=1\nB=2\nA=3\n");

        assert_eq!(table.len(), 2);
        assert_eq!(table.to_text(), "A=3\nB=2\n");
    }

    #[test]
    fn malformed_lines_and_whitespace() {
        let table = TagTable::parse("# no separator here\r\n  key  =  some value  \r\n\n");

        assert_eq!(table.len(), 1);
        assert_eq!(table.get("key"), Some("some value"));
    }

    #[test]
    fn carriage_return_line_endings() {
        let table = TagTable::parse("A=1\rB=2\r");

        assert_eq!(table.len(), 2);
        assert_eq!(table.get("A"), Some("1"));
        assert_eq!(table.get("B"), Some("2"));

        let mixed = TagTable::parse("A=1\r\nB=2\nC=3\rD=4");
        assert_eq!(mixed.to_text(), "A=1\nB=2\nC=3\nD=4\n");
    }

    #[test]
    #[timeout(1000)]
    fn merging_with_itself_is_identity() {
        let text: String = (0..500).map(|i| format!("tag_{i}=value {i}\n")).collect();

        let mut original = TagTable::parse(&text);
        let translation = original.clone();

        let replacements = original.merge_translation(&translation);

        assert_eq!(replacements.len(), 500);
        assert_eq!(original.to_text(), text);
    }
}
