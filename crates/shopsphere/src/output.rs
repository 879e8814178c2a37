//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one line per item. Status
//! messages go to stderr so stdout stays machine-readable.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Whether color output should be enabled for `stream`.
pub fn should_color(mode: ColorMode, stream_is_terminal: bool) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => stream_is_terminal && std::env::var_os("NO_COLOR").is_none(),
    }
}

/// Print a success line to stderr unless `--quiet`.
pub fn success(global: &GlobalOpts, message: &str) {
    if global.quiet {
        return;
    }
    if should_color(global.color, io::stderr().is_terminal()) {
        eprintln!("{} {message}", "✓".green().bold());
    } else {
        eprintln!("✓ {message}");
    }
}

/// Print an informational line to stderr unless `--quiet`.
pub fn note(global: &GlobalOpts, message: &str) {
    if global.quiet {
        return;
    }
    if should_color(global.color, io::stderr().is_terminal()) {
        eprintln!("{}", message.dimmed());
    } else {
        eprintln!("{message}");
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list in the chosen format.
///
/// `to_row` feeds the table; `plain` yields one line per item.
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    plain: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            if data.is_empty() {
                return Ok(String::new());
            }
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Ok(Table::new(rows).with(Style::rounded()).to_string())
        }
        OutputFormat::Plain => Ok(data.iter().map(plain).collect::<Vec<_>>().join("\n")),
        structured => render_structured(structured, data),
    }
}

/// Render a single item; `detail` produces the table-mode text.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail: impl Fn(&T) -> Result<String, CliError>,
    plain: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: Serialize,
{
    match format {
        OutputFormat::Table => detail(data),
        OutputFormat::Plain => Ok(plain(data)),
        structured => render_structured(structured, data),
    }
}

fn render_structured<T: Serialize + ?Sized>(
    format: OutputFormat,
    data: &T,
) -> Result<String, CliError> {
    let rendered = match format {
        OutputFormat::JsonCompact => serde_json::to_string(data).map_err(render_err)?,
        OutputFormat::Yaml => serde_yaml::to_string(data).map_err(render_err)?,
        OutputFormat::Json | OutputFormat::Table | OutputFormat::Plain => {
            serde_json::to_string_pretty(data).map_err(render_err)?
        }
    };
    Ok(rendered.trim_end().to_owned())
}

fn render_err(e: impl std::fmt::Display) -> CliError {
    CliError::Render(e.to_string())
}

/// Print rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

#[cfg(test)]
mod tests {
    use serde::Serialize;

    use super::*;

    #[derive(Serialize)]
    struct Item {
        id: u64,
        name: &'static str,
    }

    #[derive(Tabled)]
    struct ItemRow {
        #[tabled(rename = "ID")]
        id: u64,
        #[tabled(rename = "Name")]
        name: &'static str,
    }

    fn items() -> Vec<Item> {
        vec![Item { id: 1, name: "Pen" }, Item { id: 2, name: "Ink" }]
    }

    fn render(format: OutputFormat) -> String {
        render_list(
            format,
            &items(),
            |i| ItemRow {
                id: i.id,
                name: i.name,
            },
            |i| i.id.to_string(),
        )
        .expect("render")
    }

    #[test]
    fn plain_is_one_line_per_item() {
        assert_eq!(render(OutputFormat::Plain), "1\n2");
    }

    #[test]
    fn table_has_headers_and_rows() {
        let table = render(OutputFormat::Table);
        assert!(table.contains("ID"));
        assert!(table.contains("Ink"));
    }

    #[test]
    fn json_compact_is_single_line() {
        assert_eq!(
            render(OutputFormat::JsonCompact),
            r#"[{"id":1,"name":"Pen"},{"id":2,"name":"Ink"}]"#
        );
        assert!(render(OutputFormat::Json).contains('\n'));
    }

    #[test]
    fn yaml_lists_items() {
        let yaml = render(OutputFormat::Yaml);
        assert!(yaml.starts_with("- id: 1"));
    }

    #[test]
    fn empty_table_renders_nothing() {
        let out = render_list(
            OutputFormat::Table,
            &Vec::<Item>::new(),
            |i| ItemRow {
                id: i.id,
                name: i.name,
            },
            |i| i.id.to_string(),
        )
        .expect("render");
        assert!(out.is_empty());
    }

    #[test]
    fn color_modes() {
        assert!(should_color(ColorMode::Always, false));
        assert!(!should_color(ColorMode::Never, true));
        assert!(!should_color(ColorMode::Auto, false));
    }
}
