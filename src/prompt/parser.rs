use regex::Regex;

use super::schema::OutputSchema;

/// Named fields extracted from one model reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedResult {
    fields: Vec<(String, String)>,
}

impl ParsedResult {
    /// Value of a field, or `""` when the field was not found.
    pub fn get(&self, name: &str) -> &str {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .unwrap_or("")
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value,
            None => self.fields.push((name.to_string(), value)),
        }
    }

    /// True when no field has any text.
    pub fn is_blank(&self) -> bool {
        self.fields.iter().all(|(_, v)| v.is_empty())
    }
}

/// Matches `**Label:**`, `**Label**:` and bare `Label:`, case-insensitively.
///
/// Only a label opening a line counts; the same words inside prose do not.
fn marker_pattern(marker: &str) -> Option<Regex> {
    let label = marker.trim().trim_end_matches(':');
    let pattern = format!(
        r"(?im)^[ \t]*\*{{0,2}}{}(?:\*\*)?:(?:\*\*)?",
        regex::escape(label)
    );
    Regex::new(&pattern).ok()
}

fn delimiter_pattern() -> Option<Regex> {
    Regex::new(r"(?m)^[ \t]*-{3,}[ \t]*$").ok()
}

/// Extract every section of `schema` from `text`.
///
/// A section's value runs from the end of its marker to the start of the next
/// schema marker or a `---` line, whichever comes first, and is trimmed. Markers
/// are recognised at the start of a line. A marker that does not occur yields an
/// empty value.
pub fn parse_response(schema: &OutputSchema, text: &str) -> ParsedResult {
    let patterns: Vec<Option<Regex>> = schema
        .sections
        .iter()
        .map(|s| marker_pattern(s.marker))
        .collect();
    let delimiter = delimiter_pattern();

    let mut result = ParsedResult::default();
    for (i, section) in schema.sections.iter().enumerate() {
        let value = patterns[i]
            .as_ref()
            .and_then(|re| re.find(text))
            .map(|m| {
                let start = m.end();
                let next_marker = patterns
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| *j != i)
                    .filter_map(|(_, p)| p.as_ref()?.find_at(text, start))
                    .map(|n| n.start());
                let next_delimiter = delimiter
                    .as_ref()
                    .and_then(|d| d.find_at(text, start))
                    .map(|n| n.start());
                let end = next_marker
                    .chain(next_delimiter)
                    .min()
                    .unwrap_or(text.len());
                text[start..end].trim().to_string()
            })
            .unwrap_or_default();
        result.set(section.field, value);
    }
    result
}
