//! Small event-based XML builder over `quick_xml::Writer`.

use deck_core::GenerationError;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

/// Builds one XML part. Text and attribute values are escaped by quick-xml.
pub struct XmlBuilder {
    writer: Writer<Vec<u8>>,
    error: Option<String>,
}

impl XmlBuilder {
    /// Start a part with the standalone UTF-8 declaration.
    pub fn new() -> Self {
        let mut builder = Self {
            writer: Writer::new(Vec::new()),
            error: None,
        };
        builder.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))));
        builder
    }

    fn write(&mut self, event: Event<'_>) -> &mut Self {
        if self.error.is_none() {
            if let Err(e) = self.writer.write_event(event) {
                self.error = Some(e.to_string());
            }
        }
        self
    }

    pub fn open(&mut self, name: &str, attrs: &[(&str, &str)]) -> &mut Self {
        let start = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.write(Event::Start(start))
    }

    pub fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> &mut Self {
        let element = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.write(Event::Empty(element))
    }

    pub fn close(&mut self, name: &str) -> &mut Self {
        self.write(Event::End(BytesEnd::new(name)))
    }

    pub fn text(&mut self, text: &str) -> &mut Self {
        self.write(Event::Text(BytesText::new(text)))
    }

    /// `<name>text</name>`
    pub fn text_element(&mut self, name: &str, text: &str) -> &mut Self {
        self.open(name, &[]).text(text).close(name)
    }

    pub fn finish(self) -> Result<String, GenerationError> {
        if let Some(e) = self.error {
            return Err(GenerationError::Render(e));
        }
        String::from_utf8(self.writer.into_inner())
            .map_err(|e| GenerationError::Render(e.to_string()))
    }
}
