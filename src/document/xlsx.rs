use std::path::Path;

use anyhow::Context;
use calamine::{open_workbook_auto, Data, Range, Reader};

/// Every sheet gets start/end markers, with its non-empty rows between them as
/// `Row {n}: a | b | c`. Row and column numbering is absolute within the sheet.
pub fn extract(path: &Path) -> anyhow::Result<Vec<String>> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open workbook {}", path.display()))?;

    let mut parts = Vec::new();
    for sheet_name in workbook.sheet_names() {
        let range = workbook.worksheet_range(&sheet_name)
            .with_context(|| format!("Failed to read sheet {}", sheet_name))?;

        parts.push(format!("[START SHEET: {}]", sheet_name));
        let rows = sheet_rows(&range);
        if !rows.is_empty() {
            parts.push(rows.join("\n"));
        }
        parts.push(format!("[END SHEET: {}]", sheet_name));
    }

    Ok(parts)
}

fn sheet_rows(range: &Range<Data>) -> Vec<String> {
    let Some((first_row, first_col)) = range.start() else {
        return Vec::new();
    };

    range.rows()
        .enumerate()
        .filter(|(_, row)| row.iter().any(|cell| !matches!(cell, Data::Empty)))
        .map(|(i, row)| {
            let cells = std::iter::repeat(String::new())
                .take(first_col as usize)
                .chain(row.iter().map(cell_text))
                .collect::<Vec<_>>();
            format!("Row {}: {}", first_row as usize + i + 1, cells.join(" | "))
        })
        .collect()
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::Bool(true) => "True".to_string(),
        Data::Bool(false) => "False".to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) => datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => cell.to_string(),
        },
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

    #[test]
    fn test_sheet_markers_and_rows() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("sales.xlsx");

        let mut workbook = Workbook::new();
        let summary = workbook.add_worksheet().set_name("Summary")?;
        summary.write_string(0u32, 0, "Region")?;
        summary.write_string(0u32, 1, "Revenue")?;
        summary.write_string(2u32, 0, "North")?;
        summary.write_number(2u32, 1, 1250)?;
        workbook.add_worksheet().set_name("Empty")?;
        workbook.save(&path)?;

        let parts = extract(&path)?;
        assert_eq!(parts, vec![
            "[START SHEET: Summary]".to_string(),
            "Row 1: Region | Revenue\nRow 3: North | 1250".to_string(),
            "[END SHEET: Summary]".to_string(),
            "[START SHEET: Empty]".to_string(),
            "[END SHEET: Empty]".to_string(),
        ]);
        Ok(())
    }

    #[test]
    fn test_dates_and_booleans_are_readable() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("typed.xlsx");

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet().set_name("S")?;
        let date = ExcelDateTime::from_ymd(2024, 1, 15)?;
        let date_format = Format::new().set_num_format("yyyy-mm-dd");
        sheet.write_datetime_with_format(0u32, 0, &date, &date_format)?;
        sheet.write_boolean(0u32, 1, true)?;
        sheet.write_number(0u32, 2, 2.5)?;
        workbook.save(&path)?;

        let parts = extract(&path)?;
        assert_eq!(parts, vec![
            "[START SHEET: S]".to_string(),
            "Row 1: 2024-01-15 00:00:00 | True | 2.5".to_string(),
            "[END SHEET: S]".to_string(),
        ]);
        Ok(())
    }

    #[test]
    fn test_offset_sheet_keeps_absolute_positions() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("offset.xlsx");

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet().set_name("Data")?;
        sheet.write_string(3u32, 2, "late")?;
        workbook.save(&path)?;

        let parts = extract(&path)?;
        assert_eq!(parts[1], "Row 4:  |  | late");
        Ok(())
    }
}
