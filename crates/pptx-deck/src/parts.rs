//! XML parts of the presentation package.

use deck_core::{GenerationError, Theme};

use crate::xml::XmlBuilder;

type Part = Result<String, GenerationError>;

const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const NS_CT: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
const REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const CT_BASE: &str = "application/vnd.openxmlformats-officedocument";

/// 10 inches in EMU.
pub const SLIDE_WIDTH: i64 = 9_144_000;
/// 5.625 inches in EMU (16:9).
pub const SLIDE_HEIGHT: i64 = 5_143_500;

const EMU_PER_INCH: f64 = 914_400.0;

fn inches(value: f64) -> i64 {
    (value * EMU_PER_INCH).round() as i64
}

/// Namespace attributes shared by presentation, master, layout and slide roots.
fn root_ns() -> [(&'static str, &'static str); 3] {
    [("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P)]
}

fn relationships(entries: &[(&str, &str)]) -> Part {
    let mut xml = XmlBuilder::new();
    xml.open("Relationships", &[("xmlns", REL_NS)]);
    for (index, (kind, target)) in entries.iter().enumerate() {
        let id = format!("rId{}", index + 1);
        let kind = format!("{}/{}", NS_R, kind);
        xml.empty(
            "Relationship",
            &[("Id", id.as_str()), ("Type", kind.as_str()), ("Target", *target)],
        );
    }
    xml.close("Relationships");
    xml.finish()
}

pub fn content_types(slide_count: u32) -> Part {
    let overrides = [
        ("/ppt/presentation.xml", "presentationml.presentation.main+xml"),
        ("/ppt/slideMasters/slideMaster1.xml", "presentationml.slideMaster+xml"),
        ("/ppt/slideLayouts/slideLayout1.xml", "presentationml.slideLayout+xml"),
        ("/ppt/theme/theme1.xml", "theme+xml"),
    ];
    let slide_type = format!("{}.presentationml.slide+xml", CT_BASE);

    let mut xml = XmlBuilder::new();
    xml.open("Types", &[("xmlns", NS_CT)])
        .empty(
            "Default",
            &[
                ("Extension", "rels"),
                ("ContentType", "application/vnd.openxmlformats-package.relationships+xml"),
            ],
        )
        .empty("Default", &[("Extension", "xml"), ("ContentType", "application/xml")]);
    for (part, kind) in overrides {
        let content_type = format!("{}.{}", CT_BASE, kind);
        xml.empty(
            "Override",
            &[("PartName", part), ("ContentType", content_type.as_str())],
        );
    }
    for n in 1..=slide_count {
        let part = format!("/ppt/slides/slide{}.xml", n);
        xml.empty(
            "Override",
            &[("PartName", part.as_str()), ("ContentType", slide_type.as_str())],
        );
    }
    xml.close("Types");
    xml.finish()
}

pub fn root_rels() -> Part {
    relationships(&[("officeDocument", "ppt/presentation.xml")])
}

/// Presentation part. Relationship ids: 1 master, 2 theme, 3.. slides.
pub fn presentation(slide_count: u32) -> Part {
    let cx = SLIDE_WIDTH.to_string();
    let cy = SLIDE_HEIGHT.to_string();

    let mut xml = XmlBuilder::new();
    xml.open("p:presentation", &root_ns())
        .open("p:sldMasterIdLst", &[])
        .empty("p:sldMasterId", &[("id", "2147483648"), ("r:id", "rId1")])
        .close("p:sldMasterIdLst")
        .open("p:sldIdLst", &[]);
    for i in 0..slide_count {
        let id = (256 + i).to_string();
        let rel = format!("rId{}", 3 + i);
        xml.empty("p:sldId", &[("id", id.as_str()), ("r:id", rel.as_str())]);
    }
    xml.close("p:sldIdLst")
        .empty("p:sldSz", &[("cx", cx.as_str()), ("cy", cy.as_str())])
        .empty("p:notesSz", &[("cx", "6858000"), ("cy", "9144000")])
        .close("p:presentation");
    xml.finish()
}

pub fn presentation_rels(slide_count: u32) -> Part {
    let slides: Vec<String> = (1..=slide_count)
        .map(|n| format!("slides/slide{}.xml", n))
        .collect();
    let mut entries = vec![
        ("slideMaster", "slideMasters/slideMaster1.xml"),
        ("theme", "theme/theme1.xml"),
    ];
    entries.extend(slides.iter().map(|target| ("slide", target.as_str())));
    relationships(&entries)
}

fn empty_tree(xml: &mut XmlBuilder) -> &mut XmlBuilder {
    xml.open("p:nvGrpSpPr", &[])
        .empty("p:cNvPr", &[("id", "1"), ("name", "")])
        .empty("p:cNvGrpSpPr", &[])
        .empty("p:nvPr", &[])
        .close("p:nvGrpSpPr")
        .empty("p:grpSpPr", &[])
}

pub fn slide_master() -> Part {
    let mut xml = XmlBuilder::new();
    xml.open("p:sldMaster", &root_ns())
        .open("p:cSld", &[])
        .open("p:spTree", &[]);
    empty_tree(&mut xml)
        .close("p:spTree")
        .close("p:cSld")
        .empty(
            "p:clrMap",
            &[
                ("bg1", "lt1"),
                ("tx1", "dk1"),
                ("bg2", "lt2"),
                ("tx2", "dk2"),
                ("accent1", "accent1"),
                ("accent2", "accent2"),
                ("accent3", "accent3"),
                ("accent4", "accent4"),
                ("accent5", "accent5"),
                ("accent6", "accent6"),
                ("hlink", "hlink"),
                ("folHlink", "folHlink"),
            ],
        )
        .open("p:sldLayoutIdLst", &[])
        .empty("p:sldLayoutId", &[("id", "2147483649"), ("r:id", "rId1")])
        .close("p:sldLayoutIdLst")
        .close("p:sldMaster");
    xml.finish()
}

pub fn slide_master_rels() -> Part {
    relationships(&[
        ("slideLayout", "../slideLayouts/slideLayout1.xml"),
        ("theme", "../theme/theme1.xml"),
    ])
}

pub fn slide_layout() -> Part {
    let [a, r, p] = root_ns();
    let mut xml = XmlBuilder::new();
    xml.open("p:sldLayout", &[a, r, p, ("type", "blank"), ("preserve", "1")])
        .open("p:cSld", &[("name", "Blank")])
        .open("p:spTree", &[]);
    empty_tree(&mut xml)
        .close("p:spTree")
        .close("p:cSld")
        .open("p:clrMapOvr", &[])
        .empty("a:masterClrMapping", &[])
        .close("p:clrMapOvr")
        .close("p:sldLayout");
    xml.finish()
}

pub fn slide_layout_rels() -> Part {
    relationships(&[("slideMaster", "../slideMasters/slideMaster1.xml")])
}

pub fn slide_rels() -> Part {
    relationships(&[("slideLayout", "../slideLayouts/slideLayout1.xml")])
}

fn solid<'a>(xml: &'a mut XmlBuilder, colour: &str) -> &'a mut XmlBuilder {
    xml.open("a:solidFill", &[])
        .empty("a:srgbClr", &[("val", colour)])
        .close("a:solidFill")
}

fn placeholder_fill(xml: &mut XmlBuilder) -> &mut XmlBuilder {
    xml.open("a:solidFill", &[])
        .empty("a:schemeClr", &[("val", "phClr")])
        .close("a:solidFill")
}

/// Office theme part carrying the deck theme's colours.
pub fn theme(theme: &Theme) -> Part {
    let scheme = [
        ("a:dk1", theme.text),
        ("a:lt1", "FFFFFF"),
        ("a:dk2", theme.primary),
        ("a:lt2", theme.accent),
        ("a:accent1", theme.primary),
        ("a:accent2", theme.secondary),
        ("a:accent3", theme.accent),
        ("a:accent4", theme.text),
        ("a:accent5", theme.secondary),
        ("a:accent6", theme.primary),
        ("a:hlink", theme.secondary),
        ("a:folHlink", theme.primary),
    ];

    let mut xml = XmlBuilder::new();
    xml.open("a:theme", &[("xmlns:a", NS_A), ("name", theme.name)])
        .open("a:themeElements", &[])
        .open("a:clrScheme", &[("name", "Slayd")]);
    for (slot, colour) in scheme {
        xml.open(slot, &[]);
        xml.empty("a:srgbClr", &[("val", colour)]).close(slot);
    }
    xml.close("a:clrScheme")
        .open("a:fontScheme", &[("name", "Slayd")]);
    for font in ["a:majorFont", "a:minorFont"] {
        xml.open(font, &[])
            .empty("a:latin", &[("typeface", "Calibri")])
            .empty("a:ea", &[("typeface", "")])
            .empty("a:cs", &[("typeface", "")])
            .close(font);
    }
    xml.close("a:fontScheme")
        .open("a:fmtScheme", &[("name", "Slayd")])
        .open("a:fillStyleLst", &[]);
    for _ in 0..3 {
        placeholder_fill(&mut xml);
    }
    xml.close("a:fillStyleLst").open("a:lnStyleLst", &[]);
    for _ in 0..3 {
        xml.open("a:ln", &[("w", "9525")]);
        placeholder_fill(&mut xml).close("a:ln");
    }
    xml.close("a:lnStyleLst").open("a:effectStyleLst", &[]);
    for _ in 0..3 {
        xml.open("a:effectStyle", &[])
            .empty("a:effectLst", &[])
            .close("a:effectStyle");
    }
    xml.close("a:effectStyleLst").open("a:bgFillStyleLst", &[]);
    for _ in 0..3 {
        placeholder_fill(&mut xml);
    }
    xml.close("a:bgFillStyleLst")
        .close("a:fmtScheme")
        .close("a:themeElements")
        .close("a:theme");
    xml.finish()
}

/// A text box with one paragraph.
struct TextBox<'a> {
    id: u32,
    name: &'a str,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    text: &'a str,
    size: u32,
    colour: &'a str,
    centred: bool,
}

impl TextBox<'_> {
    fn write(&self, xml: &mut XmlBuilder) {
        let id = self.id.to_string();
        let (x, y) = (inches(self.x).to_string(), inches(self.y).to_string());
        let (cx, cy) = (inches(self.width).to_string(), inches(self.height).to_string());
        let size = (self.size * 100).to_string();

        xml.open("p:sp", &[])
            .open("p:nvSpPr", &[])
            .empty("p:cNvPr", &[("id", id.as_str()), ("name", self.name)])
            .empty("p:cNvSpPr", &[("txBox", "1")])
            .empty("p:nvPr", &[])
            .close("p:nvSpPr")
            .open("p:spPr", &[])
            .open("a:xfrm", &[])
            .empty("a:off", &[("x", x.as_str()), ("y", y.as_str())])
            .empty("a:ext", &[("cx", cx.as_str()), ("cy", cy.as_str())])
            .close("a:xfrm")
            .open("a:prstGeom", &[("prst", "rect")])
            .empty("a:avLst", &[])
            .close("a:prstGeom")
            .empty("a:noFill", &[])
            .close("p:spPr")
            .open("p:txBody", &[])
            .empty("a:bodyPr", &[("wrap", "square")])
            .empty("a:lstStyle", &[])
            .open("a:p", &[]);
        if self.centred {
            xml.empty("a:pPr", &[("algn", "ctr")]);
        }
        xml.open("a:r", &[])
            .open("a:rPr", &[("lang", "uz-UZ"), ("sz", size.as_str()), ("dirty", "0")]);
        solid(xml, self.colour)
            .close("a:rPr")
            .text_element("a:t", self.text)
            .close("a:r")
            .close("a:p")
            .close("p:txBody")
            .close("p:sp");
    }
}

fn slide(background: &str, shapes: &[TextBox<'_>]) -> Part {
    let mut xml = XmlBuilder::new();
    xml.open("p:sld", &root_ns())
        .open("p:cSld", &[])
        .open("p:bg", &[])
        .open("p:bgPr", &[]);
    solid(&mut xml, background)
        .empty("a:effectLst", &[])
        .close("p:bgPr")
        .close("p:bg")
        .open("p:spTree", &[]);
    empty_tree(&mut xml);
    for shape in shapes {
        shape.write(&mut xml);
    }
    xml.close("p:spTree")
        .close("p:cSld")
        .open("p:clrMapOvr", &[])
        .empty("a:masterClrMapping", &[])
        .close("p:clrMapOvr")
        .close("p:sld");
    xml.finish()
}

/// Title slide: topic centred in white on the primary colour, requester below.
pub fn title_slide(theme: &Theme, topic: &str, requester: &str) -> Part {
    slide(
        theme.primary,
        &[
            TextBox {
                id: 2,
                name: "Title",
                x: 0.5,
                y: 1.8,
                width: 9.0,
                height: 1.0,
                text: topic,
                size: 44,
                colour: "FFFFFF",
                centred: true,
            },
            TextBox {
                id: 3,
                name: "Subtitle",
                x: 0.5,
                y: 3.0,
                width: 9.0,
                height: 0.6,
                text: requester,
                size: 20,
                colour: theme.accent,
                centred: true,
            },
        ],
    )
}

/// Content slide number `index` (1-based) on the accent colour.
pub fn content_slide(theme: &Theme, topic: &str, index: u32) -> Part {
    let text = format!("• {} bo'yicha ma'lumotlar {}", topic, index);
    slide(
        theme.accent,
        &[TextBox {
            id: 2,
            name: "Content",
            x: 0.7,
            y: 1.6,
            width: 8.5,
            height: 3.5,
            text: &text,
            size: 24,
            colour: theme.text,
            centred: false,
        }],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::ThemeCatalog;

    #[test]
    fn test_inches_to_emu() {
        assert_eq!(inches(10.0), SLIDE_WIDTH);
        assert_eq!(inches(5.625), SLIDE_HEIGHT);
    }

    #[test]
    fn test_text_is_escaped() {
        let theme = ThemeCatalog::builtin().get(1).unwrap();
        let xml = title_slide(theme, "R&D <plans>", "Ali").unwrap();
        assert!(xml.contains("R&amp;D &lt;plans&gt;"));
        assert!(!xml.contains("<plans>"));
    }

    #[test]
    fn test_presentation_lists_every_slide() {
        let xml = presentation(3).unwrap();
        assert!(xml.contains(r#"<p:sldId id="256" r:id="rId3"/>"#));
        assert!(xml.contains(r#"<p:sldId id="258" r:id="rId5"/>"#));
        assert!(!xml.contains(r#"r:id="rId6""#));

        let rels = presentation_rels(3).unwrap();
        assert!(rels.contains(r#"Id="rId5""#));
        assert!(rels.contains(r#"Target="slides/slide3.xml""#));
    }

    #[test]
    fn test_content_types_cover_slides() {
        let xml = content_types(2).unwrap();
        assert!(xml.contains(r#"PartName="/ppt/slides/slide2.xml""#));
        assert!(!xml.contains("slide3.xml"));
    }

    #[test]
    fn test_theme_name_is_escaped() {
        let theme = ThemeCatalog::builtin().get(1).unwrap();
        let xml = theme_part(theme);
        assert!(xml.contains(r#"name="🔵 Ko&apos;k Professional""#));
        assert!(xml.contains(r#"<a:dk2><a:srgbClr val="1E3A8A"/></a:dk2>"#));
    }

    fn theme_part(theme: &Theme) -> String {
        super::theme(theme).unwrap()
    }

    #[test]
    fn test_content_slide_uses_accent_background() {
        let theme = ThemeCatalog::builtin().get(3).unwrap();
        let xml = content_slide(theme, "Mars", 4).unwrap();
        assert!(xml.contains(r#"<p:bgPr><a:solidFill><a:srgbClr val="FEE2E2"/>"#));
        assert!(xml.contains("Mars bo&apos;yicha ma&apos;lumotlar 4"));
    }
}
