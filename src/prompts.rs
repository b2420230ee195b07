//! System prompts for VLM-based page transcription.
//!
//! Centralising prompt text here keeps the VLM call site
//! ([`crate::pipeline::vlm`]) free of prompt engineering, and lets unit
//! tests inspect prompts without spinning up a provider. The table rules
//! vary with the run configuration, so the prompt is built per run rather
//! than being a single constant.

use crate::config::{RunConfig, TableMode};

/// Shared transcription rules, independent of table handling.
const BASE_PROMPT: &str = r#"You are an expert document converter. Your task is to convert a PDF page image to clean, well-structured Markdown.

Follow these rules precisely:

1. TEXT PRESERVATION
   - Preserve ALL text content completely and accurately
   - Maintain the reading order as a human would read the page
   - Correct obvious OCR-like errors only if you are completely certain

2. STRUCTURE
   - Use # for the main page title (at most one per page)
   - Use ## for major sections, ### for subsections, #### for minor headings
   - Use - for unordered lists and 1. 2. 3. for ordered lists
   - Preserve list nesting with indentation

3. WHAT TO IGNORE
   - Page numbers (bottom/top of page)
   - Repeated headers/footers that appear on every page
   - Decorative borders and lines that carry no content meaning

4. OUTPUT FORMAT
   - Output ONLY the Markdown content
   - Do NOT wrap in ```markdown fences
   - Do NOT add commentary or explanations
   - Start directly with the page content"#;

const TABLES_ACCURATE: &str = r#"

5. TABLES
   - Convert tables to GFM pipe format
   - Add alignment markers (:---, :---:, ---:) matching visual alignment
   - If a table is too complex for pipe format, use HTML table markup"#;

const TABLES_FAST: &str = r#"

5. TABLES
   - Convert tables to plain GFM pipe format; do not use HTML markup
   - Flatten merged cells by repeating their content"#;

const TABLES_OFF: &str = r#"

5. TABLES
   - Do not reproduce table structure; render each table row as a plain
     prose line instead"#;

/// Build the system prompt for page transcription from the run
/// configuration. Table handling follows `tables`/`table_mode`.
pub fn system_prompt(config: &RunConfig) -> String {
    let table_rules = if !config.tables {
        TABLES_OFF
    } else {
        match config.table_mode {
            TableMode::Accurate => TABLES_ACCURATE,
            TableMode::Fast => TABLES_FAST,
        }
    };
    format!("{BASE_PROMPT}{table_rules}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunConfig;

    #[test]
    fn accurate_tables_allow_html_fallback() {
        let config = RunConfig::default();
        let prompt = system_prompt(&config);
        assert!(prompt.contains("HTML table markup"));
    }

    #[test]
    fn fast_tables_forbid_html() {
        let config = RunConfig::builder()
            .table_mode(TableMode::Fast)
            .build()
            .unwrap();
        let prompt = system_prompt(&config);
        assert!(prompt.contains("do not use HTML markup"));
    }

    #[test]
    fn disabled_tables_ask_for_prose() {
        let config = RunConfig::builder().tables(false).build().unwrap();
        let prompt = system_prompt(&config);
        assert!(prompt.contains("Do not reproduce table structure"));
        assert!(!prompt.contains("pipe format"));
    }

    #[test]
    fn base_rules_always_present() {
        for tables in [true, false] {
            let config = RunConfig::builder().tables(tables).build().unwrap();
            let prompt = system_prompt(&config);
            assert!(prompt.contains("TEXT PRESERVATION"));
            assert!(prompt.contains("Do NOT wrap in"));
        }
    }
}
