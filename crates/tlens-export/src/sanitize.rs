//! Narrative text sanitization for the document's narrow encoding.
//!
//! The exported document uses a builtin PDF font whose text encoding is
//! WinAnsi. Common typographic punctuation is rewritten to its ASCII
//! equivalent; anything else outside the encodable range is replaced with
//! a placeholder glyph per character.

/// Placeholder for characters the document encoding cannot represent.
const REPLACEMENT: char = '?';

/// Rewrite typographic punctuation and strip unencodable characters.
pub fn sanitize_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{2032}' => out.push('\''),
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{2033}' => out.push('"'),
            '\u{2010}' | '\u{2011}' | '\u{2013}' | '\u{2014}' | '\u{2212}' => out.push('-'),
            '\u{2026}' => out.push_str("..."),
            '\u{00A0}' => out.push(' '),
            '\n' | '\t' => out.push(c),
            c if c.is_ascii_graphic() || c == ' ' => out.push(c),
            // Latin-1 supplement survives WinAnsi encoding
            '\u{00A1}'..='\u{00FF}' => out.push(c),
            _ => out.push(REPLACEMENT),
        }
    }
    out
}

/// Greedy word wrap at `max_chars` columns.
///
/// Blank lines are preserved; a single word longer than the width is
/// hard-broken rather than overflowing the page. Widths are measured in
/// chars, not bytes: sanitized text still carries Latin-1 characters, so
/// byte offsets are not valid split points.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();

    for raw_line in text.lines() {
        if raw_line.trim().is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current = String::new();
        let mut current_chars = 0;
        for word in raw_line.split_whitespace() {
            let mut word = word;
            let mut word_chars = word.chars().count();
            // Hard-break words wider than the page
            while word_chars > max_chars {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    current_chars = 0;
                }
                let split = word
                    .char_indices()
                    .nth(max_chars)
                    .map(|(i, _)| i)
                    .unwrap_or(word.len());
                let (head, tail) = word.split_at(split);
                lines.push(head.to_string());
                word = tail;
                word_chars -= max_chars;
            }

            if current.is_empty() {
                current.push_str(word);
                current_chars = word_chars;
            } else if current_chars + 1 + word_chars <= max_chars {
                current.push(' ');
                current.push_str(word);
                current_chars += 1 + word_chars;
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
                current_chars = word_chars;
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}
