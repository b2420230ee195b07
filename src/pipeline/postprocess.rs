//! Post-processing: deterministic cleanup of VLM-generated markdown.
//!
//! Even well-prompted vision models occasionally wrap the whole page in
//! ```` ```markdown ```` fences, emit Windows line endings, or forget the
//! separator row of a pipe table. These quirks would survive into chunk
//! text and, in the fence case, derail the markdown splitter's structure
//! detection. The rules here are cheap, deterministic string/regex passes
//! applied in a fixed order: fences are stripped before any line-based
//! rule, and the final-newline pass runs last.

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all cleanup rules to one page of raw VLM output.
pub fn clean_markdown(input: &str) -> String {
    let s = strip_outer_fences(input);
    let s = normalise_line_endings(&s);
    let s = trim_trailing_whitespace(&s);
    let s = collapse_blank_lines(&s);
    let s = remove_invisible_chars(&s);
    let s = repair_table_separators(&s);
    ensure_final_newline(&s)
}

// ── Fence stripping ──────────────────────────────────────────────────────

static RE_OUTER_FENCES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```(?:markdown|md)?\n(.*)\n```\s*$").unwrap());

fn strip_outer_fences(input: &str) -> String {
    match RE_OUTER_FENCES.captures(input.trim()) {
        Some(caps) => caps[1].to_string(),
        None => input.to_string(),
    }
}

// ── Whitespace normalisation ─────────────────────────────────────────────

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

fn trim_trailing_whitespace(input: &str) -> String {
    input
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_LINES.replace_all(input, "\n\n").to_string()
}

fn remove_invisible_chars(input: &str) -> String {
    input.replace(
        [
            '\u{200B}', '\u{FEFF}', '\u{00AD}', '\u{200C}', '\u{200D}', '\u{2060}',
        ],
        "",
    )
}

fn ensure_final_newline(input: &str) -> String {
    let trimmed = input.trim_end();
    if trimmed.is_empty() {
        String::from("\n")
    } else {
        format!("{trimmed}\n")
    }
}

// ── Table separator repair ───────────────────────────────────────────────
//
// A pipe table without the `| --- |` row after its header is not a GFM
// table at all, and downstream markdown-aware chunking treats it as prose.
// Insert the separator when the model forgot it.

fn repair_table_separators(input: &str) -> String {
    let lines: Vec<&str> = input.lines().collect();
    let mut result: Vec<String> = Vec::with_capacity(lines.len() + 4);
    let mut prev_was_table_start = false;

    for (i, line) in lines.iter().enumerate() {
        let starts_table = is_table_row(line)
            && !is_separator_row(line)
            && (i == 0 || !is_table_row(lines[i - 1]));

        if prev_was_table_start && is_table_row(line) && !is_separator_row(line) {
            let cols = lines[i - 1].matches('|').count().saturating_sub(1).max(1);
            let mut sep = String::from("|");
            for _ in 0..cols {
                sep.push_str(" --- |");
            }
            result.push(sep);
        }

        result.push((*line).to_string());
        prev_was_table_start = starts_table;
    }

    result.join("\n")
}

fn is_table_row(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with('|') && trimmed.ends_with('|') && trimmed.len() > 2
}

fn is_separator_row(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with('|')
        && trimmed
            .chars()
            .all(|c| c == '|' || c == '-' || c == ':' || c == ' ')
}

// ── Tests ────────────────────────────────────────────────────────────────
