//! List installed extensions

use colored::Colorize;
use zed_ext_core::{Lifecycle, Listing};

use super::render_table;
use crate::error::Result;

/// Run the list command
pub fn run_list(lifecycle: &Lifecycle, json: bool) -> Result<()> {
    let listing = lifecycle.list()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
    } else {
        print!("{}", format_listing(&listing));
    }
    Ok(())
}

fn format_listing(listing: &Listing) -> String {
    if listing.extensions.is_empty() {
        let mut out = String::from("No extensions installed (via index.json).\n");
        if !listing.unindexed_dirs.is_empty() {
            out.push_str(&format!("\n{}\n", "Directories found in installed/:".bold()));
            for dir in &listing.unindexed_dirs {
                out.push_str(&format!("  {dir}\n"));
            }
        }
        return out;
    }

    let rows: Vec<Vec<String>> = listing
        .extensions
        .iter()
        .map(|ext| {
            vec![
                ext.id.clone(),
                ext.name.clone(),
                ext.version.clone(),
                ext.dev.to_string(),
            ]
        })
        .collect();
    render_table(&["ID", "NAME", "VERSION", "DEV"], &rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use zed_ext_core::ListedExtension;

    #[test]
    fn test_empty_listing_mentions_directories() {
        colored::control::set_override(false);
        let listing = Listing {
            extensions: vec![],
            unindexed_dirs: vec!["html".into()],
        };

        let out = format_listing(&listing);

        assert!(out.starts_with("No extensions installed"));
        assert!(out.contains("Directories found in installed/:\n  html\n"));
    }

    #[test]
    fn test_empty_listing_without_directories() {
        assert_eq!(
            format_listing(&Listing::default()),
            "No extensions installed (via index.json).\n"
        );
    }

    #[test]
    fn test_listing_table() {
        let listing = Listing {
            extensions: vec![ListedExtension {
                id: "html".into(),
                name: "HTML".into(),
                version: "0.1.4".into(),
                dev: false,
            }],
            unindexed_dirs: vec![],
        };

        let out = format_listing(&listing);

        assert!(out.starts_with("ID    NAME  VERSION  DEV\n"));
        assert!(out.contains("html  HTML  0.1.4    false\n"));
    }
}
