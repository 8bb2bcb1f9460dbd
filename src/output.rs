use crate::error::Result;
use crate::types::OrderedReport;
use rust_xlsxwriter::{Format, Workbook};
use spreadsheet_ods::{Sheet, WorkBook};
use std::io::Write;
use std::path::Path;
use tabled::{settings::Style, Table};

pub const NO_DATA: &str = "No data available for the day selected.";
pub const PUBLICATION_HINT: &str =
    "Today's figures are usually published in the late afternoon, try again later or pick an earlier date.";

const HEADER: [&str; 2] = ["Region", "Cases"];

/// Spreadsheet flavours the CLI can write. XLSX and ODS are binary
/// workbooks; CSV is the plain-text sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadsheetFormat {
    Xlsx,
    Ods,
    Csv,
}

/// `"<region>: <count>"` per line, or the no-data notice.
pub fn write_lines<W: Write>(out: &mut W, report: &OrderedReport, is_today: bool) -> Result<()> {
    if report.is_empty() {
        writeln!(out, "{}", NO_DATA)?;
        if is_today {
            writeln!(out, "{}", PUBLICATION_HINT)?;
        }
        return Ok(());
    }
    for e in &report.entries {
        writeln!(out, "{}: {}", e.region, e.cases)?;
    }
    Ok(())
}

pub fn print_lines(report: &OrderedReport, is_today: bool) -> Result<()> {
    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    write_lines(&mut lock, report, is_today)
}

pub fn render_table(report: &OrderedReport) -> Option<String> {
    if report.is_empty() {
        return None;
    }
    Some(Table::new(report.entries.clone()).with(Style::markdown()).to_string())
}

pub fn print_table(report: &OrderedReport, is_today: bool) -> Result<()> {
    match render_table(report) {
        Some(table) => {
            println!("{}\n", table);
            Ok(())
        }
        None => print_lines(report, is_today),
    }
}

pub fn render_json(report: &OrderedReport) -> Result<String> {
    Ok(serde_json::to_string(report)?)
}

pub fn write_json<P: AsRef<Path>>(path: P, report: &OrderedReport) -> Result<()> {
    let s = serde_json::to_string_pretty(report)?;
    std::fs::write(path, s)?;
    Ok(())
}

pub fn write_spreadsheet<P: AsRef<Path>>(
    path: P,
    format: SpreadsheetFormat,
    report: &OrderedReport,
) -> Result<()> {
    match format {
        SpreadsheetFormat::Xlsx => write_xlsx(path, report),
        SpreadsheetFormat::Ods => write_ods(path, report),
        SpreadsheetFormat::Csv => write_csv(path, report),
    }
}

pub fn write_csv<P: AsRef<Path>>(path: P, report: &OrderedReport) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    // Header comes from the field renames on `RegionCount`.
    for r in &report.entries {
        wtr.serialize(r)?;
    }
    if report.is_empty() {
        wtr.write_record(HEADER)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_xlsx<P: AsRef<Path>>(path: P, report: &OrderedReport) -> Result<()> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Cases")?;
    for (col, title) in HEADER.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, &bold)?;
    }
    for (idx, e) in report.entries.iter().enumerate() {
        let row = idx as u32 + 1;
        sheet.write_string(row, 0, &e.region)?;
        sheet.write_number(row, 1, e.cases as f64)?;
    }
    sheet.autofit();
    workbook.save(path.as_ref())?;
    Ok(())
}

pub fn write_ods<P: AsRef<Path>>(path: P, report: &OrderedReport) -> Result<()> {
    let mut workbook = WorkBook::new_empty();
    let mut sheet = Sheet::new("Cases");
    for (col, title) in HEADER.iter().enumerate() {
        sheet.set_value(0, col as u32, *title);
    }
    for (idx, e) in report.entries.iter().enumerate() {
        let row = idx as u32 + 1;
        sheet.set_value(row, 0, e.region.as_str());
        sheet.set_value(row, 1, e.cases as f64);
    }
    workbook.push_sheet(sheet);
    spreadsheet_ods::write_ods(&mut workbook, path.as_ref())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RegionCount;
    use calamine::{open_workbook, Ods, Reader, Xlsx};
    use std::fs::File;
    use std::io::BufReader;

    fn sheet_rows<R: Reader<BufReader<File>>>(path: &Path) -> Vec<Vec<String>> {
        let mut workbook: R = open_workbook(path).unwrap();
        let range = workbook.worksheet_range("Cases").unwrap();
        range.rows().map(|row| row.iter().map(|c| c.to_string()).collect()).collect()
    }

    fn expected_rows() -> Vec<Vec<String>> {
        [["Region", "Cases"], ["Veneto", "300"], ["Abruzzo", "10"], ["Trentino - Alto Adige", "10"]]
            .iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    fn report() -> OrderedReport {
        OrderedReport {
            entries: vec![
                RegionCount { region: "Veneto".into(), cases: 300 },
                RegionCount { region: "Abruzzo".into(), cases: 10 },
                RegionCount { region: "Trentino - Alto Adige".into(), cases: 10 },
            ],
        }
    }

    #[test]
    fn lines_follow_report_order() {
        let mut buf = Vec::new();
        write_lines(&mut buf, &report(), false).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Veneto: 300\nAbruzzo: 10\nTrentino - Alto Adige: 10\n"
        );
    }

    #[test]
    fn empty_report_prints_notice_and_hint_only_for_today() {
        let mut buf = Vec::new();
        write_lines(&mut buf, &OrderedReport::default(), false).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), format!("{NO_DATA}\n"));

        let mut buf = Vec::new();
        write_lines(&mut buf, &OrderedReport::default(), true).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), format!("{NO_DATA}\n{PUBLICATION_HINT}\n"));
    }

    #[test]
    fn json_object_keeps_report_order() {
        let json = render_json(&report()).unwrap();
        assert_eq!(json, r#"{"Veneto":300,"Abruzzo":10,"Trentino - Alto Adige":10}"#);
        assert_eq!(render_json(&OrderedReport::default()).unwrap(), "{}");
    }

    #[test]
    fn table_has_header_and_rows() {
        let table = render_table(&report()).unwrap();
        let first = table.lines().next().unwrap();
        assert!(first.contains("Region") && first.contains("Cases"));
        assert!(table.contains("Veneto"));
        assert!(render_table(&OrderedReport::default()).is_none());
    }

    #[test]
    fn csv_has_header_then_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cases.csv");
        write_spreadsheet(&path, SpreadsheetFormat::Csv, &report()).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "Region,Cases\nVeneto,300\nAbruzzo,10\nTrentino - Alto Adige,10\n"
        );
    }

    #[test]
    fn csv_for_empty_report_is_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cases.csv");
        write_csv(&path, &OrderedReport::default()).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Region,Cases\n");
    }

    #[test]
    fn xlsx_reads_back_header_and_ordered_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cases.xlsx");
        write_spreadsheet(&path, SpreadsheetFormat::Xlsx, &report()).unwrap();
        assert_eq!(sheet_rows::<Xlsx<_>>(&path), expected_rows());
    }

    #[test]
    fn ods_reads_back_header_and_ordered_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cases.ods");
        write_spreadsheet(&path, SpreadsheetFormat::Ods, &report()).unwrap();
        assert_eq!(sheet_rows::<Ods<_>>(&path), expected_rows());
    }

    #[test]
    fn workbooks_for_empty_report_keep_the_header() {
        let dir = tempfile::tempdir().unwrap();
        let xlsx = dir.path().join("empty.xlsx");
        let ods = dir.path().join("empty.ods");
        write_xlsx(&xlsx, &OrderedReport::default()).unwrap();
        write_ods(&ods, &OrderedReport::default()).unwrap();
        let header = vec![vec!["Region".to_string(), "Cases".to_string()]];
        assert_eq!(sheet_rows::<Xlsx<_>>(&xlsx), header);
        assert_eq!(sheet_rows::<Ods<_>>(&ods), header);
    }

    #[test]
    fn pretty_json_file_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cases.json");
        write_json(&path, &report()).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["Veneto"], 300);
        assert_eq!(value.as_object().unwrap().len(), 3);
    }
}
