const MAX_VISIBLE_CHARS: usize = 100;

/// Makes user-supplied prompt text safe to log: trimmed, capped to a short
/// preview on a character boundary, with credential-shaped substrings
/// blanked out.
pub fn sanitize_prompt(prompt: &str) -> String {
    let trimmed = prompt.trim();

    if trimmed.is_empty() {
        return String::from("[EMPTY]");
    }

    let preview = match trimmed.char_indices().nth(MAX_VISIBLE_CHARS) {
        Some((byte_index, _)) => format!(
            "{}... ({} chars total)",
            &trimmed[..byte_index],
            trimmed.chars().count()
        ),
        None => trimmed.to_string(),
    };

    redact_sensitive_patterns(&preview)
}

fn redact_sensitive_patterns(text: &str) -> String {
    const PATTERNS: [(&str, &str); 5] = [
        ("Bearer ", "Bearer [REDACTED]"),
        ("api_key=", "api_key=[REDACTED]"),
        ("password=", "password=[REDACTED]"),
        ("secret=", "secret=[REDACTED]"),
        ("token=", "token=[REDACTED]"),
    ];

    let mut result = text.to_string();
    for (pattern, replacement) in PATTERNS {
        let mut search_from = 0;
        while let Some(found) = result[search_from..].find(pattern) {
            let start = search_from + found;
            let value_start = start + pattern.len();
            let value_end = result[value_start..]
                .find(|c: char| c.is_whitespace() || c == '&' || c == '"' || c == '\'')
                .map(|i| value_start + i)
                .unwrap_or(result.len());
            result.replace_range(start..value_end, replacement);
            search_from = start + replacement.len();
        }
    }

    result
}
