//! Front-matter detection.
//!
//! A front-matter block opens on the very first line of a document and
//! closes on the next line that is exactly `---`:
//! ```markdown
//! ---
//! title: "Chapter One"
//! tags: [draft]
//! ---
//! It was a dark and stormy night.
//! ```
//! Anything else (leading whitespace, a missing closer, `----`) is not
//! front-matter and stays part of the prose.

const DELIMITER: &str = "---";

/// Split a document into its front-matter contents and body.
///
/// Returns `None` when the document has no complete front-matter block.
/// The body starts right after the line terminator of the closing delimiter.
#[must_use]
pub fn split_frontmatter(content: &str) -> Option<(&str, &str)> {
    let after_open = strip_delimiter_line(content)?;

    let mut offset = 0;
    for line in after_open.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == DELIMITER {
            let yaml = strip_line_ending(&after_open[..offset]);
            let body = &after_open[offset + line.len()..];
            return Some((yaml, body));
        }
        offset += line.len();
    }

    None
}

/// Drop a leading front-matter block, delimiters included.
///
/// Text without a complete block is returned unchanged.
#[must_use]
pub fn strip_frontmatter(content: &str) -> &str {
    split_frontmatter(content).map_or(content, |(_, body)| body)
}

fn strip_delimiter_line(content: &str) -> Option<&str> {
    let rest = content.strip_prefix(DELIMITER)?;
    rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n'))
}

fn strip_line_ending(s: &str) -> &str {
    let s = s.strip_suffix('\n').unwrap_or(s);
    s.strip_suffix('\r').unwrap_or(s)
}
