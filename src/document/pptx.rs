use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use anyhow::{Context, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

/// One `[START SLIDE n]` block per slide in presentation order, holding the
/// non-blank text of each shape.
pub fn extract(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let mut archive = ZipArchive::new(file)?;

    let mut parts = Vec::new();
    for (i, slide_path) in slide_paths(&mut archive)?.iter().enumerate() {
        let n = i + 1;
        let xml = read_entry(&mut archive, slide_path)?;
        parts.push(format!("[START SLIDE {n}]"));
        let shapes = shape_texts(&xml)?;
        if !shapes.is_empty() {
            parts.push(shapes.join("\n"));
        }
        parts.push(format!("[END SLIDE {n}]"));
    }

    Ok(parts)
}

fn read_entry<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<String> {
    let mut entry = archive.by_name(name)
        .with_context(|| format!("Missing part {}", name))?;
    let mut xml = String::new();
    entry.read_to_string(&mut xml)?;
    Ok(xml)
}

/// Resolves slide parts through `presentation.xml` and its relationships. Falls
/// back to numeric `slideN.xml` order when the presentation part is unusable.
fn slide_paths<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<Vec<String>> {
    let ordered = read_entry(archive, "ppt/presentation.xml")
        .and_then(|presentation| {
            let rels = read_entry(archive, "ppt/_rels/presentation.xml.rels")?;
            ordered_slide_paths(&presentation, &rels)
        });
    match ordered {
        Ok(paths) if !paths.is_empty() => Ok(paths),
        _ => {
            let mut numbered = archive.file_names()
                .filter_map(|name| {
                    let n = name.strip_prefix("ppt/slides/slide")?
                        .strip_suffix(".xml")?
                        .parse::<u32>()
                        .ok()?;
                    Some((n, name.to_string()))
                })
                .collect::<Vec<_>>();
            numbered.sort();
            Ok(numbered.into_iter().map(|(_, name)| name).collect())
        }
    }
}

fn ordered_slide_paths(presentation: &str, rels: &str) -> Result<Vec<String>> {
    let mut targets = HashMap::new();
    let mut reader = Reader::from_str(rels);
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                let mut id = None;
                let mut target = None;
                for attr in e.attributes() {
                    let attr = attr?;
                    match attr.key.as_ref() {
                        b"Id" => id = Some(attr.unescape_value()?.into_owned()),
                        b"Target" => target = Some(attr.unescape_value()?.into_owned()),
                        _ => {}
                    }
                }
                if let (Some(id), Some(target)) = (id, target) {
                    targets.insert(id, resolve_target(&target));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let mut paths = Vec::new();
    let mut reader = Reader::from_str(presentation);
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"sldId" => {
                for attr in e.attributes() {
                    let attr = attr?;
                    if attr.key.as_ref() == b"r:id" {
                        let id = attr.unescape_value()?;
                        if let Some(path) = targets.get(id.as_ref()) {
                            paths.push(path.clone());
                        }
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(paths)
}

fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("ppt/{}", target),
    }
}

/// Text of every shape text body on the slide, grouped shapes included.
/// Paragraphs inside a shape are joined by newlines and `a:br` line breaks
/// become newlines too; table cells are not shapes and are left out.
fn shape_texts(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut shapes = Vec::new();
    let mut paragraphs: Option<Vec<String>> = None;
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"p:txBody" => paragraphs = Some(Vec::new()),
                b"a:p" => current.clear(),
                b"a:t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"a:br" if paragraphs.is_some() => current.push('\n'),
                b"a:p" => {
                    if let Some(paras) = paragraphs.as_mut() {
                        paras.push(String::new());
                    }
                }
                _ => {}
            },
            Event::Text(t) if in_text && paragraphs.is_some() => {
                current.push_str(&t.unescape()?);
            }
            Event::End(e) => match e.name().as_ref() {
                b"a:t" => in_text = false,
                b"a:p" => {
                    if let Some(paras) = paragraphs.as_mut() {
                        paras.push(std::mem::take(&mut current));
                    }
                }
                b"p:txBody" => {
                    if let Some(paras) = paragraphs.take() {
                        let text = paras.join("\n");
                        if !text.trim().is_empty() {
                            shapes.push(text);
                        }
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(shapes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn slide_xml(shapes: &[&[&str]]) -> String {
        let mut body = String::new();
        for paragraphs in shapes {
            body.push_str("<p:sp><p:txBody>");
            for para in *paragraphs {
                body.push_str(&format!("<a:p><a:r><a:t>{}</a:t></a:r></a:p>", para));
            }
            body.push_str("</p:txBody></p:sp>");
        }
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:spTree>{}</p:spTree></p:cSld></p:sld>"#,
            body
        )
    }

    fn write_deck(path: &Path, entries: &[(&str, String)]) -> anyhow::Result<()> {
        let mut zip = ZipWriter::new(File::create(path)?);
        for (name, content) in entries {
            zip.start_file(*name, SimpleFileOptions::default())?;
            zip.write_all(content.as_bytes())?;
        }
        zip.finish()?;
        Ok(())
    }

    #[test]
    fn test_slides_follow_presentation_order() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("deck.pptx");
        let presentation = r#"<p:presentation xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><p:sldIdLst><p:sldId id="256" r:id="rId3"/><p:sldId id="257" r:id="rId2"/></p:sldIdLst></p:presentation>"#;
        let rels = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId2" Type="slide" Target="slides/slide1.xml"/><Relationship Id="rId3" Type="slide" Target="slides/slide2.xml"/></Relationships>"#;

        write_deck(&path, &[
            ("ppt/presentation.xml", presentation.to_string()),
            ("ppt/_rels/presentation.xml.rels", rels.to_string()),
            ("ppt/slides/slide1.xml", slide_xml(&[&["Second"]])),
            ("ppt/slides/slide2.xml", slide_xml(&[&["Title", "Subtitle"], &["  "], &["Body &amp; notes"]])),
        ])?;

        assert_eq!(extract(&path)?, vec![
            "[START SLIDE 1]".to_string(),
            "Title\nSubtitle\nBody & notes".to_string(),
            "[END SLIDE 1]".to_string(),
            "[START SLIDE 2]".to_string(),
            "Second".to_string(),
            "[END SLIDE 2]".to_string(),
        ]);
        Ok(())
    }

    #[test]
    fn test_numeric_order_without_presentation_part() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("bare.pptx");
        write_deck(&path, &[
            ("ppt/slides/slide10.xml", slide_xml(&[&["ten"]])),
            ("ppt/slides/slide2.xml", slide_xml(&[])),
        ])?;

        assert_eq!(extract(&path)?, vec![
            "[START SLIDE 1]".to_string(),
            "[END SLIDE 1]".to_string(),
            "[START SLIDE 2]".to_string(),
            "ten".to_string(),
            "[END SLIDE 2]".to_string(),
        ]);
        Ok(())
    }

    #[test]
    fn test_grouped_shapes_and_line_breaks() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("grouped.pptx");
        let grouped = slide_xml(&[&["outer"]]).replace(
            "</p:spTree>",
            "<p:grpSp><p:sp><p:txBody><a:p><a:r><a:t>x</a:t></a:r><a:br/><a:r><a:t>y</a:t></a:r></a:p></p:txBody></p:sp></p:grpSp></p:spTree>",
        );
        write_deck(&path, &[("ppt/slides/slide1.xml", grouped)])?;

        // Shapes nested in a group count like top-level ones.
        assert_eq!(extract(&path)?, vec![
            "[START SLIDE 1]".to_string(),
            "outer".to_string(),
            "x\ny".to_string(),
            "[END SLIDE 1]".to_string(),
        ]);
        Ok(())
    }
}
