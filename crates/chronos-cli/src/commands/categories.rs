//! Categories command: every category in use, with its colours.

use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use chronos_core::{CategoryColor, category_color};
use chronos_store::Store;

#[derive(Debug, Serialize)]
pub struct JsonCategory {
    pub name: String,
    pub color: Option<CategoryColor>,
}

pub fn run<W: Write>(writer: &mut W, store: &Store, json: bool) -> Result<()> {
    let categories = store.categories();

    if json {
        let listing: Vec<JsonCategory> = categories
            .into_iter()
            .map(|name| JsonCategory {
                color: category_color(&name),
                name,
            })
            .collect();
        writeln!(writer, "{}", serde_json::to_string_pretty(&listing)?)?;
        return Ok(());
    }

    if categories.is_empty() {
        writeln!(writer, "No categories yet. Add one with: chronos start <name> --category <category>")?;
        return Ok(());
    }
    for name in &categories {
        writeln!(writer, "{name}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    use crate::commands::util::test_support::{add_entry, at};

    fn store_with_categories() -> Store {
        let mut store = Store::in_memory();
        let sheet = store.create_timesheet(Some("Tuesday"), at(8, 0)).unwrap();
        let other = store.create_timesheet(Some("Monday"), at(7, 0)).unwrap();
        add_entry(&mut store, &sheet.id, "code", Some("dev"), at(9, 0), None);
        add_entry(&mut store, &sheet.id, "deploy", Some("ops"), at(9, 0), None);
        add_entry(&mut store, &other.id, "tests", Some("dev"), at(9, 0), None);
        add_entry(&mut store, &other.id, "lunch", None, at(9, 0), None);
        store
    }

    #[test]
    fn lists_sorted_unique_categories_across_sheets() {
        let store = store_with_categories();
        let mut output = Vec::new();
        run(&mut output, &store, false).unwrap();

        assert_snapshot!(String::from_utf8(output).unwrap(), @r"
        dev
        ops
        ");
    }

    #[test]
    fn json_includes_colors() {
        let store = store_with_categories();
        let mut output = Vec::new();
        run(&mut output, &store, true).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        let listing = value.as_array().unwrap();
        assert_eq!(listing.len(), 2);
        assert_eq!(listing[0]["name"], "dev");
        let expected = category_color("dev").unwrap();
        assert_eq!(listing[0]["color"]["darkText"], expected.dark_text);
    }

    #[test]
    fn empty_store_has_hint() {
        let store = Store::in_memory();
        let mut output = Vec::new();
        run(&mut output, &store, false).unwrap();
        assert!(String::from_utf8(output).unwrap().starts_with("No categories yet"));
    }
}
