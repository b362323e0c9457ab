use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    /// `key: value` lines, the way restool prints object info.
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

/// One printable field of a report.
pub type Field = (&'static str, String);

/// Print a report: `value` as JSON, `fields` as a table or lines.
pub fn print_report<T: Serialize>(value: &T, fields: &[Field], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(value),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FIELD", "VALUE"]);
            for (name, value) in fields {
                table.add_row(vec![name.to_string(), value.clone()]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for (name, value) in fields {
                println!("{name}: {value}");
            }
        }
    }
}

#[derive(Serialize)]
struct ActionOutput<'a> {
    object: &'a str,
    action: &'a str,
}

/// Report a completed lifecycle action such as `created` or `destroyed`.
pub fn print_action(object: &str, action: &str, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&ActionOutput { object, action }),
        OutputFormat::Table | OutputFormat::Pretty => println!("{object} is {action}"),
    }
}

fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}
