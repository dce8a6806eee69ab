use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use log::{info, warn};

use crate::chat::fallback::{demo_content, DEFAULT_QUESTIONS};
use crate::chat::openai::ChatClient;
use crate::chat::prompt::{clarify_prompts, section_prompts};
use crate::chat::ChatModel;
use crate::document::parse_document;
use crate::Config;

const PREVIEW_CHARS: usize = 100;

#[derive(Debug, Clone)]
pub struct ReportSection {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Default)]
pub struct Report {
    pub sections: Vec<ReportSection>,
}

impl Report {
    /// Markdown document: a `##` heading, the content and a rule per section.
    pub fn render(&self) -> String {
        let mut parts = Vec::with_capacity(self.sections.len() * 3);
        for section in &self.sections {
            parts.push(format!("## {}\n", section.title));
            parts.push(section.content.clone());
            parts.push("\n---\n".to_string());
        }
        parts.join("\n")
    }
}

/// Turns uploaded files and a list of section titles into a report, one chat
/// completion per section.
#[derive(Clone)]
pub struct Generator {
    model: Arc<dyn ChatModel>,
    upload_dir: PathBuf,
    report_model: String,
    clarify_model: String,
}

impl Generator {
    pub fn new(model: Arc<dyn ChatModel>, config: &Config) -> Self {
        Self {
            model,
            upload_dir: PathBuf::from(&config.upload_dir),
            report_model: config.report_model.clone(),
            clarify_model: config.clarify_model.clone(),
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = ChatClient::from_config(config)?;
        Ok(Self::new(Arc::new(client), config))
    }

    /// Every file wrapped in `[START DOCUMENT: name]` markers, blank-line separated.
    /// Parsing runs on the blocking pool.
    pub async fn build_context(&self, filenames: &[String]) -> anyhow::Result<String> {
        let upload_dir = self.upload_dir.clone();
        let filenames = filenames.to_vec();
        tokio::task::spawn_blocking(move || collect_context(&upload_dir, &filenames))
            .await
            .context("Document parsing task failed")
    }

    pub async fn generate_section(&self, section_title: &str, context: &str, tone: &str, style: &str) -> String {
        let messages = section_prompts(section_title, context, tone, style);
        match self.model.complete(&self.report_model, &messages).await {
            Ok(content) => content,
            Err(err) => {
                warn!("Chat API unavailable for section \"{}\", using demo content: {:#}", section_title, err);
                demo_content(section_title, context)
            }
        }
    }

    pub async fn create_final_document(
        &self,
        template: &[String],
        filenames: &[String],
        tone: &str,
        style: &str,
    ) -> anyhow::Result<Report> {
        info!("Generating {} sections from {} files", template.len(), filenames.len());
        let context = self.build_context(filenames).await?;

        let mut report = Report::default();
        for title in template {
            let content = self.generate_section(title, &context, tone, style).await;
            report.sections.push(ReportSection { title: title.clone(), content });
        }
        Ok(report)
    }

    pub async fn ask_clarifying_questions(&self, template: &[String], filenames: &[String]) -> anyhow::Result<String> {
        let upload_dir = self.upload_dir.clone();
        let files = filenames.to_vec();
        let previews = tokio::task::spawn_blocking(move || file_previews(&upload_dir, &files))
            .await
            .context("Document parsing task failed")?;

        let messages = clarify_prompts(template, &previews);
        match self.model.complete(&self.clarify_model, &messages).await {
            Ok(questions) => Ok(questions),
            Err(err) => {
                warn!("Chat API unavailable for clarifying questions: {:#}", err);
                Ok(DEFAULT_QUESTIONS.to_string())
            }
        }
    }
}

fn collect_context(upload_dir: &Path, filenames: &[String]) -> String {
    filenames.iter()
        .map(|filename| {
            let parsed = parse_document(upload_dir, filename);
            format!("[START DOCUMENT: {filename}]\n{parsed}\n[END DOCUMENT: {filename}]")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// `- name: first characters...` line per file.
fn file_previews(upload_dir: &Path, filenames: &[String]) -> Vec<String> {
    filenames.iter()
        .map(|filename| {
            let preview = parse_document(upload_dir, filename)
                .chars()
                .take(PREVIEW_CHARS)
                .collect::<String>();
            format!("- {}: {}...", filename, preview)
        })
        .collect()
}
