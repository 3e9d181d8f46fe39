//! XML cleanup applied before deserialization

use std::borrow::Cow;
use std::sync::OnceLock;

use quick_xml::Reader;
use quick_xml::events::Event;
use regex::Regex;
use tracing::debug;

use crate::error::{PubMedError, Result};

/// Strip inline formatting tags (`<i>`, `<sup>`, `<sub>`, `<b>`, …) that
/// PubMed leaves inside titles and abstracts.
///
/// Returns the input unchanged (borrowed) when there is nothing to strip.
pub(crate) fn strip_inline_html_tags(xml: &str) -> Cow<'_, str> {
    static INLINE_TAG_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = INLINE_TAG_REGEX.get_or_init(|| {
        Regex::new(r"</?(?:i|b|u|sup|sub|em|strong|italic|bold)>")
            .expect("Failed to compile inline tag regex")
    });

    let cleaned = re.replace_all(xml, "");

    if let Cow::Owned(_) = cleaned {
        debug!(
            original = xml.len(),
            cleaned = cleaned.len(),
            "Stripped inline HTML tags"
        );
    }

    cleaned
}

/// Check that `xml` is a single well-formed document with a root element.
///
/// Catches truncated bodies, mismatched tags and HTML error pages served with
/// a 200 status before any typed parsing is attempted.
pub fn ensure_well_formed(xml: &str) -> Result<()> {
    let mut reader = Reader::from_str(xml);
    let mut depth: usize = 0;
    let mut seen_root = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(_)) => {
                depth += 1;
                seen_root = true;
            }
            Ok(Event::Empty(_)) => seen_root = true,
            Ok(Event::End(_)) => depth = depth.saturating_sub(1),
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(PubMedError::MalformedResponseError {
                    message: format!(
                        "XML error at position {}: {}",
                        reader.error_position(),
                        e
                    ),
                });
            }
        }
    }

    if !seen_root {
        return Err(PubMedError::MalformedResponseError {
            message: "response contains no XML element".to_string(),
        });
    }
    if depth != 0 {
        return Err(PubMedError::MalformedResponseError {
            message: format!("document ended with {depth} unclosed element(s)"),
        });
    }
    Ok(())
}
