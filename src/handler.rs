use std::path::PathBuf;
use clap::{command, Args, Parser};
use crate::Config;

mod document;
mod generate;
pub mod write;

#[derive(Parser)]
#[command(name = "reportforge")]
#[command(about = "Generate citation-backed reports from office documents", version = "1.0")]
pub enum Cli {
    /// Manage uploaded source documents
    #[command(subcommand)]
    Doc(DocCommand),

    /// Generate a report and print or save it as Markdown
    Generate {
        #[command(flatten)]
        request: ReportArgs,

        #[arg(short, long, help = "Write the Markdown report to this file")]
        output: Option<PathBuf>,
    },

    /// Ask the model which questions would sharpen the report
    Clarify {
        #[arg(short, long = "section", required = true, help = "Template section title (repeatable)")]
        sections: Vec<String>,

        #[arg(short, long = "file", help = "Uploaded file name (repeatable)")]
        files: Vec<String>,
    },

    /// Generate a report and export it to an Excel workbook
    Export {
        #[command(flatten)]
        request: ReportArgs,

        #[arg(long, default_value = "generated_report", help = "Workbook file stem")]
        name: String,
    },

    /// Serve the HTTP API
    Serve {
        #[arg(long, help = "Listen address, overrides the configured one")]
        bind: Option<String>,
    },
}

#[derive(Parser)]
pub enum DocCommand {
    /// Copy a document, or a directory of documents, into the upload directory
    Add {
        #[arg(help = "File or directory path")]
        path: PathBuf,

        #[arg(short, long, help = "Recurse into subdirectories")]
        recursive: bool,
    },

    /// List uploaded documents
    List,

    /// Delete an uploaded document
    Remove {
        #[arg(help = "Uploaded file name")]
        name: String,
    },
}

#[derive(Args)]
pub struct ReportArgs {
    #[arg(short, long = "section", required = true, help = "Template section title (repeatable)")]
    pub sections: Vec<String>,

    #[arg(short, long = "file", help = "Uploaded file name (repeatable)")]
    pub files: Vec<String>,

    #[arg(long, help = "Writing tone, e.g. professional")]
    pub tone: Option<String>,

    #[arg(long, help = "Writing style, e.g. analytical")]
    pub style: Option<String>,
}

pub async fn handler(args: Cli, config: Config) -> anyhow::Result<()> {
    match args {
        Cli::Doc(cmd) => handle_doc_command(cmd, config),
        Cli::Generate { request, output } => generate::generate(&config, request, output).await,
        Cli::Clarify { sections, files } => generate::clarify(&config, sections, files).await,
        Cli::Export { request, name } => generate::export(&config, request, &name).await,
        Cli::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| config.bind.clone());
            crate::server::serve(config, &bind).await
        }
    }
}

fn handle_doc_command(cmd: DocCommand, config: Config) -> anyhow::Result<()> {
    use document::*;
    let store = crate::uploads::UploadStore::new(&config.upload_dir);

    match cmd {
        DocCommand::Add { path, recursive } => add_documents(&store, path, recursive),
        DocCommand::List => list_documents(&store),
        DocCommand::Remove { name } => remove_document(&store, &name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_generate() {
        let cli = Cli::try_parse_from([
            "reportforge", "generate",
            "-s", "Executive Summary", "-s", "Findings",
            "-f", "q3.pdf", "--tone", "formal", "-o", "out.md",
        ]);
        match cli {
            Ok(Cli::Generate { request, output }) => {
                assert_eq!(request.sections, vec!["Executive Summary", "Findings"]);
                assert_eq!(request.files, vec!["q3.pdf"]);
                assert_eq!(request.tone.as_deref(), Some("formal"));
                assert_eq!(request.style, None);
                assert_eq!(output, Some(PathBuf::from("out.md")));
            }
            _ => panic!("expected generate command"),
        }
    }

    #[test]
    fn test_sections_required() {
        assert!(Cli::try_parse_from(["reportforge", "clarify", "-f", "a.txt"]).is_err());
    }
}
