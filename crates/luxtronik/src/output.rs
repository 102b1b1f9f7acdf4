//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one value per line.

use std::io::{self, Write};

use tabled::{Table, Tabled, settings::Style};

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Resolved output settings shared by every handler.
#[derive(Debug, Clone, Copy)]
pub struct OutputOpts {
    pub format: OutputFormat,
    pub quiet: bool,
}

impl OutputOpts {
    pub fn print(self, rendered: &str) {
        print_output(rendered, self.quiet);
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact`: serializes the original data via serde
/// - `yaml`: serializes via serde_yaml
/// - `plain`: calls `plain_fn` on each item to emit one line per item
pub fn render_list<'a, T, R>(
    format: OutputFormat,
    data: &'a [T],
    to_row: impl Fn(&'a T) -> R,
    plain_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    Ok(match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => serde_json::to_string_pretty(data)?,
        OutputFormat::JsonCompact => serde_json::to_string(data)?,
        OutputFormat::Yaml => serde_yaml::to_string(data)?,
        OutputFormat::Plain => data.iter().map(plain_fn).collect::<Vec<_>>().join("\n"),
    })
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses `detail_fn`, which returns a pre-formatted string.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    plain_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
{
    Ok(match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => serde_json::to_string_pretty(data)?,
        OutputFormat::JsonCompact => serde_json::to_string(data)?,
        OutputFormat::Yaml => serde_yaml::to_string(data)?,
        OutputFormat::Plain => plain_fn(data),
    })
}

/// Aligned `key: value` lines for detail views.
pub fn detail(pairs: &[(&str, String)]) -> String {
    let width = pairs.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    pairs
        .iter()
        .map(|(k, v)| format!("{k:<width$}  {v}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(serde::Serialize)]
    struct Item {
        name: &'static str,
    }

    #[derive(Tabled)]
    struct Row {
        #[tabled(rename = "Name")]
        name: &'static str,
    }

    #[test]
    fn plain_emits_one_line_per_item() {
        let items = [Item { name: "a" }, Item { name: "b" }];
        let out = render_list(
            OutputFormat::Plain,
            &items,
            |i| Row { name: i.name },
            |i| i.name.to_owned(),
        )
        .unwrap();
        assert_eq!(out, "a\nb");
    }

    #[test]
    fn table_has_header() {
        let items = [Item { name: "a" }];
        let out = render_list(
            OutputFormat::Table,
            &items,
            |i| Row { name: i.name },
            |i| i.name.to_owned(),
        )
        .unwrap();
        assert!(out.contains("Name"));
    }

    #[test]
    fn detail_aligns_keys() {
        let out = detail(&[("a", "1".into()), ("long", "2".into())]);
        assert_eq!(out, "a     1\nlong  2");
    }
}
