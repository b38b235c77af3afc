//! CSV export of list pages.
//!
//! Output is UTF-8 with a byte-order mark so spreadsheet apps pick the right
//! encoding for Korean names. One row per record, in the order given.

use std::fmt::Write;

use chrono::NaiveDate;

/// UTF-8 byte-order mark.
pub const UTF8_BOM: &str = "\u{feff}";

/// Something that can be written as one CSV row.
pub trait CsvRow {
    /// Column headers, in output order.
    fn headers() -> &'static [&'static str];

    /// Field values, aligned with [`CsvRow::headers`].
    fn fields(&self) -> Vec<String>;
}

/// Render `rows` as a CSV document with a header line.
#[must_use]
pub fn render<R: CsvRow>(rows: &[R]) -> String {
    let mut csv = String::from(UTF8_BOM);
    write_line(&mut csv, R::headers().iter().copied());
    for row in rows {
        let fields = row.fields();
        write_line(&mut csv, fields.iter().map(String::as_str));
    }
    csv
}

fn write_line<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>) {
    let line = fields.map(escape_field).collect::<Vec<_>>().join(",");
    let _ = writeln!(out, "{line}");
}

/// Quote a field when it contains a comma, quote or line break.
#[must_use]
pub fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_owned()
    }
}

/// Download name, e.g. `countries_2026-10-16.csv`.
#[must_use]
pub fn export_filename(entity: &str, date: NaiveDate) -> String {
    format!("{entity}_{}.csv", date.format("%Y-%m-%d"))
}
