//! SVG template substitution.
//!
//! The display template carries placeholder labels (`CAL_DATETIME_1`,
//! `CAL_DESC_1`, ...) as literal text. Rendering is a plain textual
//! substitution of each label with its XML-escaped value.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use tracing::info;

/// Reads the template, substitutes every placeholder, and writes the
/// result. Template and output may be the same file.
pub fn render_template(
    template: &Path,
    output: &Path,
    values: &BTreeMap<String, String>,
) -> io::Result<()> {
    let mut content = fs::read_to_string(template)?;

    // Longest placeholder first: CAL_DESC_1 is a prefix of CAL_DESC_10,
    // so replacing the short label first would corrupt the long one.
    let mut keys: Vec<&String> = values.keys().collect();
    keys.sort_by_key(|k| std::cmp::Reverse(k.len()));

    for key in keys {
        content = content.replace(key.as_str(), &xml_escape(&values[key]));
    }

    fs::write(output, content)?;
    info!(output = %output.display(), "wrote rendered SVG");
    Ok(())
}

/// Escapes text for inclusion in XML content or attribute values.
fn xml_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn values(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn substitutes_placeholders() {
        let dir = TempDir::new().unwrap();
        let template = dir.path().join("template.svg");
        let output = dir.path().join("out.svg");
        fs::write(
            &template,
            "<svg><text>CAL_DATETIME_1</text><text>CAL_DESC_1</text></svg>",
        )
        .unwrap();

        render_template(
            &template,
            &output,
            &values(&[
                ("CAL_DATETIME_1", "Jun 10, 10:00 AM - 11:00 AM"),
                ("CAL_DESC_1", "Team Meeting"),
            ]),
        )
        .unwrap();

        let rendered = fs::read_to_string(&output).unwrap();
        assert!(rendered.contains("Jun 10, 10:00 AM - 11:00 AM"));
        assert!(rendered.contains("Team Meeting"));
        assert!(!rendered.contains("CAL_DATETIME_1"));
    }

    #[test]
    fn slot_ten_survives_slot_one() {
        let dir = TempDir::new().unwrap();
        let template = dir.path().join("template.svg");
        fs::write(&template, "<svg>CAL_DESC_1 CAL_DESC_10</svg>").unwrap();

        render_template(
            &template,
            &template,
            &values(&[("CAL_DESC_1", "first"), ("CAL_DESC_10", "tenth")]),
        )
        .unwrap();

        let rendered = fs::read_to_string(&template).unwrap();
        assert_eq!(rendered, "<svg>first tenth</svg>");
    }

    #[test]
    fn escapes_markup_in_values() {
        let dir = TempDir::new().unwrap();
        let template = dir.path().join("template.svg");
        let output = dir.path().join("out.svg");
        fs::write(&template, "<svg><text>CAL_DESC_1</text></svg>").unwrap();

        render_template(
            &template,
            &output,
            &values(&[("CAL_DESC_1", "Q&A <review> \"deep\" dive")]),
        )
        .unwrap();

        let rendered = fs::read_to_string(&output).unwrap();
        assert!(rendered.contains("Q&amp;A &lt;review&gt; &quot;deep&quot; dive"));
        assert!(!rendered.contains("<review>"));
    }

    #[test]
    fn in_place_rendering() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("screen.svg");
        fs::write(&file, "<svg>CAL_DESC_1</svg>").unwrap();

        render_template(&file, &file, &values(&[("CAL_DESC_1", "Standup")])).unwrap();
        assert_eq!(fs::read_to_string(&file).unwrap(), "<svg>Standup</svg>");
    }

    #[test]
    fn missing_template_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.svg");
        let output = dir.path().join("out.svg");
        assert!(render_template(&missing, &output, &BTreeMap::new()).is_err());
    }
}
