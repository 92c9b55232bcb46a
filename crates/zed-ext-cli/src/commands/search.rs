//! Search the registry

use zed_ext_core::Lifecycle;
use zed_ext_registry::RegistryEntry;

use super::render_table;
use crate::error::Result;

const DESCRIPTION_WIDTH: usize = 50;

/// Run the search command
pub fn run_search(lifecycle: &Lifecycle, query: &str, json: bool) -> Result<()> {
    if json {
        let results = lifecycle.search(query)?;
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    println!("Searching for \"{query}\"...\n");
    let results = lifecycle.search(query)?;
    if results.is_empty() {
        println!("No extensions found.");
        return Ok(());
    }
    print!("{}", format_results(&results));
    Ok(())
}

fn format_results(results: &[RegistryEntry]) -> String {
    let rows: Vec<Vec<String>> = results
        .iter()
        .map(|ext| {
            vec![
                ext.id.clone(),
                ext.name.clone(),
                ext.version.clone(),
                ext.download_count.to_string(),
                truncate(&ext.description, DESCRIPTION_WIDTH),
            ]
        })
        .collect();
    render_table(&["ID", "NAME", "VERSION", "DOWNLOADS", "DESCRIPTION"], &rows)
}

/// Cut `text` to `max` characters, ending in `...` when shortened.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("short", "short")]
    #[case(&"x".repeat(50), &"x".repeat(50))]
    #[case(&"x".repeat(51), &format!("{}...", "x".repeat(47)))]
    #[case(&"é".repeat(60), &format!("{}...", "é".repeat(47)))]
    fn test_truncate(#[case] input: &str, #[case] expected: &str) {
        let out = truncate(input, DESCRIPTION_WIDTH);
        assert_eq!(out, expected);
        assert!(out.chars().count() <= DESCRIPTION_WIDTH);
    }

    #[test]
    fn test_results_table_columns() {
        let entry: RegistryEntry = serde_json::from_str(
            r#"{"id": "html", "name": "HTML", "version": "0.1.4",
                "description": "HTML support", "download_count": 12345}"#,
        )
        .unwrap();

        let out = format_results(&[entry]);

        let mut lines = out.lines();
        assert_eq!(
            lines.next(),
            Some("ID    NAME  VERSION  DOWNLOADS  DESCRIPTION")
        );
        assert_eq!(lines.next(), Some("html  HTML  0.1.4    12345      HTML support"));
    }
}
