/*
Localization text layout (one entry per line, UTF-8, no escaping):

    tag=value
    other_tag = value with = signs in it

 - only the first '=' separates tag from value
 - tag and value are trimmed of surrounding whitespace
 - lines with no '=' carry no entry and are skipped
*/

pub const TAG_SEPARATOR: char = '=';

/// Splits a single `tag=value` line into its trimmed parts, or [`None`] if the line has no
/// separator.
pub fn split_tag_line(line: &str) -> Option<(&str, &str)> {
    line.split_once(TAG_SEPARATOR)
        .map(|(tag, value)| (tag.trim(), value.trim()))
}

pub fn format_tag_line(tag: &str, value: &str) -> String {
    format!("{tag}{TAG_SEPARATOR}{value}\n")
}
