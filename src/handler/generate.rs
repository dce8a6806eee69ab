use std::path::PathBuf;

use anyhow::Context;

use super::{write::export_report, ReportArgs};
use crate::report::{Generator, Report};
use crate::Config;

async fn build_report(config: &Config, request: ReportArgs) -> anyhow::Result<Report> {
    let generator = Generator::from_config(config)?;
    let tone = request.tone.unwrap_or_else(|| config.default_tone.clone());
    let style = request.style.unwrap_or_else(|| config.default_style.clone());
    generator.create_final_document(&request.sections, &request.files, &tone, &style).await
}

pub async fn generate(config: &Config, request: ReportArgs, output: Option<PathBuf>) -> anyhow::Result<()> {
    let document = build_report(config, request).await?.render();
    match output {
        Some(path) => {
            std::fs::write(&path, &document)
                .with_context(|| format!("Could not write {}", path.display()))?;
            println!("Report written to {}", path.display());
        }
        None => println!("{}", document),
    }
    Ok(())
}

pub async fn clarify(config: &Config, sections: Vec<String>, files: Vec<String>) -> anyhow::Result<()> {
    let generator = Generator::from_config(config)?;
    let questions = generator.ask_clarifying_questions(&sections, &files).await?;
    println!("{}", questions);
    Ok(())
}

pub async fn export(config: &Config, request: ReportArgs, name: &str) -> anyhow::Result<()> {
    let report = build_report(config, request).await?;
    let path = export_report(&report, PathBuf::from(&config.export_dir).as_path(), name)?;
    println!("Workbook written to {}", path.display());
    Ok(())
}
