use chrono::NaiveDate;
use printpdf::{BuiltinFont, Mm, PdfDocument};

use crate::error::{Result, WeatherError};
use crate::model::WeatherRecord;

/// Field names in declaration order; the markdown header row.
const FIELD_NAMES: [&str; 6] = [
    "id",
    "location",
    "date_range_start",
    "date_range_end",
    "temperature",
    "weather_description",
];

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Json,
    Csv,
    Pdf,
    Xml,
    Markdown,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Xml => "xml",
            ExportFormat::Markdown => "markdown",
        }
    }

    pub const fn all() -> &'static [ExportFormat] {
        &[
            ExportFormat::Json,
            ExportFormat::Csv,
            ExportFormat::Pdf,
            ExportFormat::Xml,
            ExportFormat::Markdown,
        ]
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv",
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Xml => "application/xml",
            ExportFormat::Markdown => "text/markdown",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ExportFormat {
    type Error = WeatherError;

    fn try_from(value: &str) -> std::result::Result<Self, Self::Error> {
        match value {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "pdf" => Ok(ExportFormat::Pdf),
            "xml" => Ok(ExportFormat::Xml),
            "markdown" => Ok(ExportFormat::Markdown),
            _ => Err(WeatherError::UnsupportedFormat(value.to_string())),
        }
    }
}

/// A rendered export: text for most formats, raw bytes for the PDF
/// attachment.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportOutput {
    Text(String),
    Binary(Vec<u8>),
}

/// Serialize the full record set into the requested format.
pub fn render(format: ExportFormat, records: &[WeatherRecord]) -> Result<ExportOutput> {
    match format {
        ExportFormat::Json => render_json(records).map(ExportOutput::Text),
        ExportFormat::Csv => render_csv(records).map(ExportOutput::Text),
        ExportFormat::Pdf => render_pdf(records).map(ExportOutput::Binary),
        ExportFormat::Xml => Ok(ExportOutput::Text(render_xml(records))),
        ExportFormat::Markdown => Ok(ExportOutput::Text(render_markdown(records))),
    }
}

fn render_err(e: impl std::fmt::Display) -> WeatherError {
    WeatherError::Render(e.to_string())
}

/// Array of record objects, ISO-8601 dates, 2-space indentation.
fn render_json(records: &[WeatherRecord]) -> Result<String> {
    serde_json::to_string_pretty(records).map_err(render_err)
}

/// Header row from the field names, one data row per record. An empty set
/// renders as an empty string with no header.
fn render_csv(records: &[WeatherRecord]) -> Result<String> {
    if records.is_empty() {
        return Ok(String::new());
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in records {
        writer.serialize(record).map_err(render_err)?;
    }
    let bytes = writer.into_inner().map_err(render_err)?;
    String::from_utf8(bytes).map_err(render_err)
}

/// Root `weather_records` element, one `record` child per record, one child
/// element per field. Absent dates render as empty text.
fn render_xml(records: &[WeatherRecord]) -> String {
    if records.is_empty() {
        return "<weather_records />".to_string();
    }

    let mut xml = String::from("<weather_records>");
    for record in records {
        xml.push_str("<record>");
        for (name, value) in fields_of(record) {
            xml.push_str(&format!("<{name}>{}</{name}>", escape_xml(&value)));
        }
        xml.push_str("</record>");
    }
    xml.push_str("</weather_records>");
    xml
}

/// Pipe-delimited table, or the literal "No records found." for an empty
/// set.
fn render_markdown(records: &[WeatherRecord]) -> String {
    if records.is_empty() {
        return "No records found.".to_string();
    }

    let mut md = format!("| {} |\n", FIELD_NAMES.join(" | "));
    md.push_str(&format!("|{}\n", " --- |".repeat(FIELD_NAMES.len())));
    for record in records {
        let cells: Vec<String> = fields_of(record).into_iter().map(|(_, v)| v).collect();
        md.push_str(&format!("| {} |\n", cells.join(" | ")));
    }
    md
}

// Layout of the PDF table: header label, column width in mm, and the cell
// clip length in characters.
const PDF_COLUMNS: [(&str, f64, usize); 6] = [
    ("ID", 15.0, 6),
    ("Location", 45.0, 22),
    ("Start Date", 27.0, 12),
    ("End Date", 27.0, 12),
    ("Temperature", 29.0, 12),
    ("Description", 55.0, 28),
];

const PAGE_WIDTH_MM: f64 = 210.0;
const PAGE_HEIGHT_MM: f64 = 297.0;
const LEFT_MARGIN_MM: f64 = 10.0;
const ROW_STEP_MM: f64 = 8.0;

/// Single-page tabular rendering: a title, a fixed-width 6-column header,
/// one row per record with cells clipped to their column width.
fn render_pdf(records: &[WeatherRecord]) -> Result<Vec<u8>> {
    let (doc, page, layer) = PdfDocument::new(
        "Weather Records",
        Mm(PAGE_WIDTH_MM as f32),
        Mm(PAGE_HEIGHT_MM as f32),
        "records",
    );
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(render_err)?;
    let layer = doc.get_page(page).get_layer(layer);

    layer.use_text(
        "Weather Records",
        14.0,
        Mm(80.0),
        Mm((PAGE_HEIGHT_MM - 15.0) as f32),
        &font,
    );

    let mut y = PAGE_HEIGHT_MM - 30.0;
    let mut x = LEFT_MARGIN_MM;
    for (label, width, _) in PDF_COLUMNS {
        layer.use_text(label, 10.0, Mm(x as f32), Mm(y as f32), &font);
        x += width;
    }

    for record in records {
        y -= ROW_STEP_MM;
        let cells = [
            record.id.to_string(),
            record.location.clone(),
            date_cell(record.date_range_start),
            date_cell(record.date_range_end),
            format!("{:.1}", record.temperature),
            record.weather_description.clone(),
        ];
        let mut x = LEFT_MARGIN_MM;
        for ((_, width, clip_len), cell) in PDF_COLUMNS.iter().zip(cells) {
            layer.use_text(clip(&cell, *clip_len), 10.0, Mm(x as f32), Mm(y as f32), &font);
            x += width;
        }
    }

    doc.save_to_bytes().map_err(render_err)
}

fn fields_of(record: &WeatherRecord) -> [(&'static str, String); 6] {
    [
        ("id", record.id.to_string()),
        ("location", record.location.clone()),
        ("date_range_start", date_cell(record.date_range_start)),
        ("date_range_end", date_cell(record.date_range_end)),
        ("temperature", record.temperature.to_string()),
        ("weather_description", record.weather_description.clone()),
    ]
}

fn date_cell(date: Option<NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_default()
}

fn clip(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, location: &str) -> WeatherRecord {
        WeatherRecord {
            id,
            location: location.to_string(),
            date_range_start: Some("2024-01-01".parse().unwrap()),
            date_range_end: Some("2024-01-05".parse().unwrap()),
            temperature: 3.25,
            weather_description: "Forecast average: overcast".to_string(),
        }
    }

    fn current_record(id: i64, location: &str) -> WeatherRecord {
        WeatherRecord {
            id,
            location: location.to_string(),
            date_range_start: None,
            date_range_end: None,
            temperature: 21.0,
            weather_description: "clear sky".to_string(),
        }
    }

    #[test]
    fn format_name_roundtrip() {
        for format in ExportFormat::all() {
            let parsed = ExportFormat::try_from(format.as_str()).expect("roundtrip");
            assert_eq!(*format, parsed);
        }
    }

    #[test]
    fn unknown_format_is_rejected() {
        let err = ExportFormat::try_from("yaml").unwrap_err();
        assert!(matches!(err, WeatherError::UnsupportedFormat(_)));
        assert!(err.to_string().contains("yaml"));
    }

    #[test]
    fn empty_set_per_format() {
        assert_eq!(render(ExportFormat::Json, &[]).unwrap(), ExportOutput::Text("[]".into()));
        assert_eq!(render(ExportFormat::Csv, &[]).unwrap(), ExportOutput::Text(String::new()));
        assert_eq!(
            render(ExportFormat::Markdown, &[]).unwrap(),
            ExportOutput::Text("No records found.".into())
        );
        assert_eq!(
            render(ExportFormat::Xml, &[]).unwrap(),
            ExportOutput::Text("<weather_records />".into())
        );
    }

    #[test]
    fn json_round_trips_structurally() {
        let records = vec![record(1, "Paris"), current_record(2, "Oslo")];
        let ExportOutput::Text(json) = render(ExportFormat::Json, &records).unwrap() else {
            panic!("json export is text");
        };

        let parsed: Vec<WeatherRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, records);
    }

    #[test]
    fn json_uses_iso_dates_and_two_space_indent() {
        let ExportOutput::Text(json) = render(ExportFormat::Json, &[record(1, "Paris")]).unwrap()
        else {
            panic!("json export is text");
        };
        assert!(json.contains("\"2024-01-01\""));
        assert!(json.contains("\n  {"));
    }

    #[test]
    fn csv_has_header_then_one_row_per_record() {
        let records = vec![record(1, "Paris"), current_record(2, "Oslo")];
        let ExportOutput::Text(csv) = render(ExportFormat::Csv, &records).unwrap() else {
            panic!("csv export is text");
        };

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "id,location,date_range_start,date_range_end,temperature,weather_description"
        );
        assert!(lines[1].starts_with("1,Paris,2024-01-01,2024-01-05,"));
        // Absent dates are empty fields.
        assert!(lines[2].starts_with("2,Oslo,,,"));
    }

    #[test]
    fn csv_quotes_fields_containing_commas() {
        let mut r = current_record(1, "Paris, France");
        r.weather_description = "light rain".to_string();
        let ExportOutput::Text(csv) = render(ExportFormat::Csv, &[r]).unwrap() else {
            panic!("csv export is text");
        };
        assert!(csv.contains("\"Paris, France\""));
    }

    #[test]
    fn xml_nests_one_element_per_field() {
        let ExportOutput::Text(xml) = render(ExportFormat::Xml, &[record(7, "Paris")]).unwrap()
        else {
            panic!("xml export is text");
        };

        assert!(xml.starts_with("<weather_records><record>"));
        assert!(xml.contains("<id>7</id>"));
        assert!(xml.contains("<location>Paris</location>"));
        assert!(xml.contains("<date_range_start>2024-01-01</date_range_start>"));
        assert!(xml.ends_with("</record></weather_records>"));
    }

    #[test]
    fn xml_escapes_markup_in_text() {
        let mut r = current_record(1, "A & B <city>");
        r.weather_description = "sun > clouds".to_string();
        let ExportOutput::Text(xml) = render(ExportFormat::Xml, &[r]).unwrap() else {
            panic!("xml export is text");
        };
        assert!(xml.contains("<location>A &amp; B &lt;city&gt;</location>"));
        assert!(xml.contains("sun &gt; clouds"));
    }

    #[test]
    fn markdown_is_a_pipe_table() {
        let ExportOutput::Text(md) =
            render(ExportFormat::Markdown, &[current_record(1, "Oslo")]).unwrap()
        else {
            panic!("markdown export is text");
        };

        let lines: Vec<&str> = md.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "| id | location | date_range_start | date_range_end | temperature | weather_description |"
        );
        assert_eq!(lines[1], "| --- | --- | --- | --- | --- | --- |");
        assert_eq!(lines[2], "| 1 | Oslo |  |  | 21 | clear sky |");
    }

    #[test]
    fn pdf_renders_a_pdf_document() {
        let ExportOutput::Binary(bytes) =
            render(ExportFormat::Pdf, &[record(1, "Paris")]).unwrap()
        else {
            panic!("pdf export is binary");
        };
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn pdf_of_empty_set_still_renders() {
        let ExportOutput::Binary(bytes) = render(ExportFormat::Pdf, &[]).unwrap() else {
            panic!("pdf export is binary");
        };
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn clip_respects_char_boundaries() {
        assert_eq!(clip("Ålesund centrum", 7), "Ålesund");
        assert_eq!(clip("short", 20), "short");
    }
}
