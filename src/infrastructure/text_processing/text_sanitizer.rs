use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

static HYPHEN_NEWLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?P<prefix>\w)-[ \t]*\r?\n[ \t]*(?P<suffix>\w)").unwrap());

// PDF extractors emit a zoo of bullet glyphs, often doubled.
static BULLET_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[•◦▪\-\u{2022}]+[ \t]*").unwrap());

/// Normalizes extractor output into text stable enough to tokenize and
/// prompt with. NFKC folds ligatures and width variants, words broken by a
/// hyphen at a line wrap are rejoined, bullet glyph runs become a single
/// `- ` marker, and whitespace is collapsed while paragraph breaks survive.
pub fn sanitize_extracted_text(raw: &str) -> String {
    let normalized: String = raw.nfkc().collect();
    let rejoined = HYPHEN_NEWLINE.replace_all(&normalized, "$prefix$suffix");

    let mut result = String::with_capacity(rejoined.len());
    let mut pending_break: Option<&str> = None;

    for line in rejoined.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if !result.is_empty() {
                pending_break = Some("\n\n");
            }
            continue;
        }

        if let Some(sep) = pending_break.take() {
            result.push_str(sep);
        }
        push_normalized_line(trimmed, &mut result);
        pending_break = Some("\n");
    }

    result
}

fn push_normalized_line(line: &str, out: &mut String) {
    let line = match BULLET_PREFIX.find(line) {
        Some(m) if m.end() < line.len() => {
            out.push_str("- ");
            &line[m.end()..]
        }
        _ => line,
    };

    let mut prev_was_space = false;
    for ch in line.chars() {
        if ch.is_whitespace() {
            if !prev_was_space {
                out.push(' ');
                prev_was_space = true;
            }
        } else {
            out.push(ch);
            prev_was_space = false;
        }
    }
}
