//! The PPTX generator.

use std::io::{Cursor, Write};

use async_trait::async_trait;
use deck_core::{DeckArtifact, DeckGenerator, DeckSpec, GenerationError};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::parts;

/// Generates `.pptx` presentations.
#[derive(Debug, Clone, Copy, Default)]
pub struct PptxGenerator;

impl PptxGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Render `spec` into presentation bytes.
    pub fn render(&self, spec: &DeckSpec) -> Result<Vec<u8>, GenerationError> {
        spec.validate()?;
        let theme = spec.theme()?;
        let slide_count = spec.page_count;

        let mut package = Package::new();
        package.add("[Content_Types].xml", &parts::content_types(slide_count)?)?;
        package.add("_rels/.rels", &parts::root_rels()?)?;
        package.add("ppt/presentation.xml", &parts::presentation(slide_count)?)?;
        package.add(
            "ppt/_rels/presentation.xml.rels",
            &parts::presentation_rels(slide_count)?,
        )?;
        package.add("ppt/slideMasters/slideMaster1.xml", &parts::slide_master()?)?;
        package.add(
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            &parts::slide_master_rels()?,
        )?;
        package.add("ppt/slideLayouts/slideLayout1.xml", &parts::slide_layout()?)?;
        package.add(
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            &parts::slide_layout_rels()?,
        )?;
        package.add("ppt/theme/theme1.xml", &parts::theme(theme)?)?;

        let title = parts::title_slide(theme, spec.topic.trim(), spec.requester_name.trim())?;
        package.add_slide(1, &title)?;
        for index in 1..slide_count {
            let body = parts::content_slide(theme, spec.topic.trim(), index)?;
            package.add_slide(index + 1, &body)?;
        }

        package.finish()
    }
}

#[async_trait]
impl DeckGenerator for PptxGenerator {
    async fn generate(&self, spec: &DeckSpec) -> Result<DeckArtifact, GenerationError> {
        let bytes = self.render(spec)?;
        debug!(
            "Rendered {}-slide deck with theme {} ({} bytes)",
            spec.page_count,
            spec.theme_id,
            bytes.len()
        );
        Ok(DeckArtifact::new(bytes, spec.page_count))
    }

    fn name(&self) -> &str {
        "PptxGenerator"
    }
}

/// In-memory zip package under construction.
struct Package {
    writer: ZipWriter<Cursor<Vec<u8>>>,
}

impl Package {
    fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    fn add(&mut self, path: &str, xml: &str) -> Result<(), GenerationError> {
        self.writer
            .start_file(path, SimpleFileOptions::default())
            .map_err(|e| GenerationError::Render(format!("{}: {}", path, e)))?;
        self.writer
            .write_all(xml.as_bytes())
            .map_err(|e| GenerationError::Render(format!("{}: {}", path, e)))
    }

    fn add_slide(&mut self, number: u32, xml: &str) -> Result<(), GenerationError> {
        self.add(&format!("ppt/slides/slide{}.xml", number), xml)?;
        self.add(
            &format!("ppt/slides/_rels/slide{}.xml.rels", number),
            &parts::slide_rels()?,
        )
    }

    fn finish(self) -> Result<Vec<u8>, GenerationError> {
        let cursor = self
            .writer
            .finish()
            .map_err(|e| GenerationError::Render(e.to_string()))?;
        Ok(cursor.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use super::*;

    fn open(bytes: Vec<u8>) -> zip::ZipArchive<Cursor<Vec<u8>>> {
        zip::ZipArchive::new(Cursor::new(bytes)).unwrap()
    }

    fn read_entry(archive: &mut zip::ZipArchive<Cursor<Vec<u8>>>, name: &str) -> String {
        let mut entry = archive.by_name(name).unwrap();
        let mut xml = String::new();
        entry.read_to_string(&mut xml).unwrap();
        xml
    }

    fn slide_names(archive: &zip::ZipArchive<Cursor<Vec<u8>>>) -> Vec<String> {
        archive
            .file_names()
            .filter(|name| name.starts_with("ppt/slides/slide"))
            .map(str::to_string)
            .collect()
    }

    #[tokio::test]
    async fn test_generates_requested_slide_count() {
        let generator = PptxGenerator::new();
        let deck = generator
            .generate(&DeckSpec::new("Space", "Ali", 10, 2))
            .await
            .unwrap();
        assert_eq!(deck.slide_count, 10);

        let archive = open(deck.bytes);
        assert_eq!(slide_names(&archive).len(), 10);
    }

    #[tokio::test]
    async fn test_title_slide_uses_primary_colour() {
        let generator = PptxGenerator::new();
        let deck = generator
            .generate(&DeckSpec::new("Space", "Ali", 8, 2))
            .await
            .unwrap();

        let mut archive = open(deck.bytes);
        let title = read_entry(&mut archive, "ppt/slides/slide1.xml");
        assert!(title.contains(r#"<a:srgbClr val="166534"/>"#));
        assert!(title.contains("<a:t>Space</a:t>"));
        assert!(title.contains("<a:t>Ali</a:t>"));

        let last = read_entry(&mut archive, "ppt/slides/slide8.xml");
        assert!(last.contains(r#"<a:srgbClr val="DCFCE7"/>"#));
        assert!(last.contains("ma&apos;lumotlar 7"));
    }

    #[tokio::test]
    async fn test_package_parts_are_well_formed() {
        let bytes = PptxGenerator::new()
            .render(&DeckSpec::new("Tarix & madaniyat", "Ali", 12, 6))
            .unwrap();
        let mut archive = open(bytes);
        let names: Vec<String> = archive.file_names().map(str::to_string).collect();

        for name in names {
            let xml = read_entry(&mut archive, &name);
            let mut reader = quick_xml::Reader::from_str(&xml);
            loop {
                match reader.read_event() {
                    Ok(quick_xml::events::Event::Eof) => break,
                    Ok(_) => {}
                    Err(e) => panic!("{} is not well-formed: {}", name, e),
                }
            }
        }
    }

    #[tokio::test]
    async fn test_rejects_invalid_spec() {
        let generator = PptxGenerator::new();
        let result = generator.generate(&DeckSpec::new("Space", "Ali", 3, 2)).await;
        assert!(matches!(result, Err(GenerationError::InvalidSpec(_))));

        let result = generator.generate(&DeckSpec::new("Space", "Ali", 10, 9)).await;
        assert!(matches!(result, Err(GenerationError::UnknownTheme(9))));
    }
}
