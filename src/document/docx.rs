use std::path::Path;
use std::{fs::File, io::Read};

use anyhow::Context;
use docx_rs::{read_docx, DocumentChild, ParagraphChild, RunChild};

pub fn extract(path: &Path) -> anyhow::Result<Vec<String>> {
    let mut file = File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)?;

    let document = read_docx(&buffer)?;

    let mut parts = Vec::new();
    let mut para_num = 0;
    for child in &document.document.children {
        if let DocumentChild::Paragraph(p) = child {
            para_num += 1;
            let text = paragraph_text(&p.children);
            if !text.trim().is_empty() {
                parts.push(format!("[START PARA {para_num}]\n{text}\n[END PARA {para_num}]"));
            }
        }
    }

    Ok(parts)
}

fn paragraph_text(children: &[ParagraphChild]) -> String {
    let mut text = String::new();
    for child in children {
        match child {
            ParagraphChild::Run(r) => {
                for run_child in &r.children {
                    match run_child {
                        RunChild::Text(t) => text.push_str(&t.text),
                        RunChild::Tab(_) => text.push('\t'),
                        RunChild::Break(_) => text.push('\n'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(h) => text.push_str(&paragraph_text(&h.children)),
            _ => {}
        }
    }
    text
}
