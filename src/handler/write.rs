use rust_xlsxwriter::{Format, FormatAlign, Workbook};
use std::path::{Path, PathBuf};
use anyhow::Context;
use log::info;

use crate::report::Report;

/// Writes `report` to `{dir}/{stem}.xlsx`, one row per section.
pub fn export_report(report: &Report, dir: &Path, stem: &str) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Could not create {}", dir.display()))?;
    let path = dir.join(format!("{}.xlsx", stem));

    let mut workbook = Workbook::new();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Report")?;

    let header_format = Format::new()
        .set_bold()
        .set_align(FormatAlign::Center);
    let content_format = Format::new()
        .set_text_wrap()
        .set_align(FormatAlign::Top);

    worksheet.write_string_with_format(0u32, 0, "Section", &header_format)?;
    worksheet.write_string_with_format(0u32, 1, "Content", &header_format)?;

    for (i, section) in report.sections.iter().enumerate() {
        let row = (i + 1) as u32;
        worksheet.write_string_with_format(row, 0, &section.title, &content_format)?;
        worksheet.write_string_with_format(row, 1, &section.content, &content_format)?;
    }

    worksheet.autofit();
    worksheet.set_column_width(1u16, 100)?;

    workbook.save(&path)?;
    info!("Exported {} sections to {}", report.sections.len(), path.display());
    Ok(path)
}
