//! PPTX package assembly.
//!
//! Each slide becomes `ppt/slides/slideN.xml` on a single blank layout. The
//! master, layout, theme and property parts are static; slide parts,
//! relationships, pictures and document properties are generated.
//!
//! ```text
//! [Content_Types].xml
//! _rels/.rels
//! docProps/{core,app}.xml
//! ppt/presentation.xml (+ _rels)
//! ppt/slides/slideN.xml (+ _rels)
//! ppt/media/imageN.{png,jpeg,gif}
//! ppt/{slideMasters,slideLayouts,theme}/...
//! ```

mod media;
mod shapes;

use std::fmt::Write as _;
use std::io::{Cursor, Write};

use deck_core::{Slide, Transition, TransitionKind};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub use media::{MediaPart, MediaStore};
pub use shapes::PptxSink;

use crate::assets::AssetCache;
use crate::color::Rgba;
use crate::error::ExportResult;
use crate::report::RenderWarning;
use crate::sink::render_slide;
use crate::svg::escape_xml;
use crate::transform::{emu, CoordinateTransform, PPTX_PAGE_HEIGHT_IN, PPTX_PAGE_WIDTH_IN};

const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const NS_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const XML_DECL: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n";

const THEME: &str = include_str!("../../resources/pptx/theme1.xml");
const SLIDE_MASTER: &str = include_str!("../../resources/pptx/slideMaster1.xml");
const SLIDE_MASTER_RELS: &str = include_str!("../../resources/pptx/slideMaster1.xml.rels");
const SLIDE_LAYOUT: &str = include_str!("../../resources/pptx/slideLayout1.xml");
const SLIDE_LAYOUT_RELS: &str = include_str!("../../resources/pptx/slideLayout1.xml.rels");
const PRES_PROPS: &str = include_str!("../../resources/pptx/presProps.xml");
const VIEW_PROPS: &str = include_str!("../../resources/pptx/viewProps.xml");
const TABLE_STYLES: &str = include_str!("../../resources/pptx/tableStyles.xml");

/// First `p:sldId` value allowed by PresentationML.
const FIRST_SLIDE_ID: usize = 256;

struct SlidePart {
    xml: String,
    media_targets: Vec<String>,
}

/// An in-progress PPTX package.
pub struct PptxPackage {
    title: String,
    background: Rgba,
    icon_oversample: f32,
    slides: Vec<SlidePart>,
    media: MediaStore,
}

impl PptxPackage {
    /// Empty package. Slides without a background get `background`; icons
    /// are rasterized at `icon_oversample`× their placed size.
    #[must_use]
    pub fn new(title: impl Into<String>, background: Rgba, icon_oversample: f32) -> Self {
        Self {
            title: title.into(),
            background,
            icon_oversample,
            slides: Vec::new(),
            media: MediaStore::default(),
        }
    }

    /// Slides added so far.
    #[must_use]
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Append `slide`, returning the elements that had to be skipped.
    pub fn add_slide(
        &mut self,
        slide: &Slide,
        slide_index: usize,
        transition: &Transition,
        assets: &AssetCache,
    ) -> Vec<RenderWarning> {
        let transform = CoordinateTransform::pptx();
        let mut sink = PptxSink::new(&mut self.media, self.icon_oversample);
        let warnings = render_slide(&mut sink, slide, &transform, assets, slide_index);
        let (shapes, media_targets) = sink.finish();

        let background = Rgba::parse(&slide.background)
            .filter(|c| !c.is_transparent())
            .unwrap_or(self.background);
        let xml = slide_xml(background, &shapes, transition);
        self.slides.push(SlidePart { xml, media_targets });
        warnings
    }

    /// Write the package.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ExportError::Package`] if the zip container cannot
    /// be written.
    pub fn finish(self) -> ExportResult<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        let mut put = |name: &str, bytes: &[u8]| -> ExportResult<()> {
            zip.start_file(name, options)?;
            zip.write_all(bytes)?;
            Ok(())
        };

        put("[Content_Types].xml", self.content_types().as_bytes())?;
        put("_rels/.rels", root_rels().as_bytes())?;
        put("docProps/core.xml", core_props(&self.title).as_bytes())?;
        put("docProps/app.xml", app_props(self.slides.len()).as_bytes())?;
        put("ppt/presentation.xml", self.presentation_xml().as_bytes())?;
        put(
            "ppt/_rels/presentation.xml.rels",
            self.presentation_rels().as_bytes(),
        )?;

        for (idx, slide) in self.slides.iter().enumerate() {
            let n = idx + 1;
            put(&format!("ppt/slides/slide{n}.xml"), slide.xml.as_bytes())?;
            put(
                &format!("ppt/slides/_rels/slide{n}.xml.rels"),
                slide_rels(&slide.media_targets).as_bytes(),
            )?;
        }
        for part in self.media.parts() {
            put(&format!("ppt/media/{}", part.name), &part.bytes)?;
        }

        put("ppt/slideMasters/slideMaster1.xml", SLIDE_MASTER.as_bytes())?;
        put(
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            SLIDE_MASTER_RELS.as_bytes(),
        )?;
        put("ppt/slideLayouts/slideLayout1.xml", SLIDE_LAYOUT.as_bytes())?;
        put(
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            SLIDE_LAYOUT_RELS.as_bytes(),
        )?;
        put("ppt/theme/theme1.xml", THEME.as_bytes())?;
        put("ppt/presProps.xml", PRES_PROPS.as_bytes())?;
        put("ppt/viewProps.xml", VIEW_PROPS.as_bytes())?;
        put("ppt/tableStyles.xml", TABLE_STYLES.as_bytes())?;

        let cursor = zip.finish()?;
        tracing::debug!(
            slides = self.slides.len(),
            media = self.media.parts().len(),
            "PPTX package written"
        );
        Ok(cursor.into_inner())
    }

    fn content_types(&self) -> String {
        let mut out = format!(
            "{XML_DECL}<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
             <Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
             <Default Extension=\"xml\" ContentType=\"application/xml\"/>"
        );
        for format in self.media.formats() {
            let _ = write!(
                out,
                "<Default Extension=\"{}\" ContentType=\"{}\"/>",
                format.extension(),
                format.mime()
            );
        }

        let pml = "application/vnd.openxmlformats-officedocument.presentationml";
        let overrides = [
            ("/ppt/presentation.xml", format!("{pml}.presentation.main+xml")),
            ("/ppt/slideMasters/slideMaster1.xml", format!("{pml}.slideMaster+xml")),
            ("/ppt/slideLayouts/slideLayout1.xml", format!("{pml}.slideLayout+xml")),
            ("/ppt/presProps.xml", format!("{pml}.presProps+xml")),
            ("/ppt/viewProps.xml", format!("{pml}.viewProps+xml")),
            ("/ppt/tableStyles.xml", format!("{pml}.tableStyles+xml")),
            (
                "/ppt/theme/theme1.xml",
                "application/vnd.openxmlformats-officedocument.theme+xml".to_string(),
            ),
            (
                "/docProps/core.xml",
                "application/vnd.openxmlformats-package.core-properties+xml".to_string(),
            ),
            (
                "/docProps/app.xml",
                "application/vnd.openxmlformats-officedocument.extended-properties+xml".to_string(),
            ),
        ];
        for (part, content_type) in overrides {
            let _ = write!(
                out,
                "<Override PartName=\"{part}\" ContentType=\"{content_type}\"/>"
            );
        }
        for n in 1..=self.slides.len() {
            let _ = write!(
                out,
                "<Override PartName=\"/ppt/slides/slide{n}.xml\" ContentType=\"{pml}.slide+xml\"/>"
            );
        }
        out.push_str("</Types>");
        out
    }

    fn presentation_xml(&self) -> String {
        let mut ids = String::new();
        for idx in 0..self.slides.len() {
            let _ = write!(
                ids,
                "<p:sldId id=\"{}\" r:id=\"rId{}\"/>",
                FIRST_SLIDE_ID + idx,
                idx + 2
            );
        }
        let slide_list = if ids.is_empty() {
            String::new()
        } else {
            format!("<p:sldIdLst>{ids}</p:sldIdLst>")
        };
        format!(
            "{XML_DECL}<p:presentation xmlns:a=\"{NS_A}\" xmlns:r=\"{NS_R}\" xmlns:p=\"{NS_P}\" saveSubsetFonts=\"1\">\
             <p:sldMasterIdLst><p:sldMasterId id=\"2147483648\" r:id=\"rId1\"/></p:sldMasterIdLst>\
             {slide_list}\
             <p:sldSz cx=\"{}\" cy=\"{}\"/><p:notesSz cx=\"6858000\" cy=\"9144000\"/>\
             </p:presentation>",
            emu(PPTX_PAGE_WIDTH_IN),
            emu(PPTX_PAGE_HEIGHT_IN),
        )
    }

    fn presentation_rels(&self) -> String {
        let mut rels = vec![(
            "slideMaster".to_string(),
            "slideMasters/slideMaster1.xml".to_string(),
        )];
        for n in 1..=self.slides.len() {
            rels.push(("slide".to_string(), format!("slides/slide{n}.xml")));
        }
        for (kind, target) in [
            ("presProps", "presProps.xml"),
            ("viewProps", "viewProps.xml"),
            ("theme", "theme/theme1.xml"),
            ("tableStyles", "tableStyles.xml"),
        ] {
            rels.push((kind.to_string(), target.to_string()));
        }
        relationships(&rels)
    }
}

fn relationships(rels: &[(String, String)]) -> String {
    let mut out = format!("{XML_DECL}<Relationships xmlns=\"{NS_RELS}\">");
    for (idx, (kind, target)) in rels.iter().enumerate() {
        let _ = write!(
            out,
            "<Relationship Id=\"rId{}\" Type=\"{REL_BASE}/{kind}\" Target=\"{}\"/>",
            idx + 1,
            escape_xml(target)
        );
    }
    out.push_str("</Relationships>");
    out
}

fn root_rels() -> String {
    format!(
        "{XML_DECL}<Relationships xmlns=\"{NS_RELS}\">\
         <Relationship Id=\"rId1\" Type=\"{REL_BASE}/officeDocument\" Target=\"ppt/presentation.xml\"/>\
         <Relationship Id=\"rId2\" Type=\"{NS_RELS}/metadata/core-properties\" Target=\"docProps/core.xml\"/>\
         <Relationship Id=\"rId3\" Type=\"{REL_BASE}/extended-properties\" Target=\"docProps/app.xml\"/>\
         </Relationships>"
    )
}

/// Slide relationships: the layout first, then pictures as `rId2..`.
fn slide_rels(media_targets: &[String]) -> String {
    let mut rels = vec![(
        "slideLayout".to_string(),
        "../slideLayouts/slideLayout1.xml".to_string(),
    )];
    rels.extend(
        media_targets
            .iter()
            .map(|target| ("image".to_string(), target.clone())),
    );
    relationships(&rels)
}

fn core_props(title: &str) -> String {
    format!(
        "{XML_DECL}<cp:coreProperties xmlns:cp=\"http://schemas.openxmlformats.org/package/2006/metadata/core-properties\" \
         xmlns:dc=\"http://purl.org/dc/elements/1.1/\" xmlns:dcterms=\"http://purl.org/dc/terms/\" \
         xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\">\
         <dc:title>{}</dc:title><dc:creator>deck</dc:creator></cp:coreProperties>",
        escape_xml(title)
    )
}

fn app_props(slides: usize) -> String {
    format!(
        "{XML_DECL}<Properties xmlns=\"http://schemas.openxmlformats.org/officeDocument/2006/extended-properties\">\
         <Application>deck</Application><Slides>{slides}</Slides></Properties>"
    )
}

fn slide_xml(background: Rgba, shapes: &str, transition: &Transition) -> String {
    format!(
        "{XML_DECL}<p:sld xmlns:a=\"{NS_A}\" xmlns:r=\"{NS_R}\" xmlns:p=\"{NS_P}\">\
         <p:cSld><p:bg><p:bgPr><a:solidFill><a:srgbClr val=\"{}\"/></a:solidFill><a:effectLst/></p:bgPr></p:bg>\
         <p:spTree><p:nvGrpSpPr><p:cNvPr id=\"1\" name=\"\"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>\
         <p:grpSpPr><a:xfrm><a:off x=\"0\" y=\"0\"/><a:ext cx=\"0\" cy=\"0\"/><a:chOff x=\"0\" y=\"0\"/><a:chExt cx=\"0\" cy=\"0\"/></a:xfrm></p:grpSpPr>\
         {shapes}</p:spTree></p:cSld>\
         <p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>{}</p:sld>",
        background.hex6(),
        transition_xml(transition).unwrap_or_default(),
    )
}

/// `p:transition` for a slide entry, or `None` for a plain cut.
fn transition_xml(transition: &Transition) -> Option<String> {
    let effect = match transition.kind {
        TransitionKind::None => return None,
        TransitionKind::Fade => "<p:fade/>",
        TransitionKind::SlideLeft => "<p:push dir=\"l\"/>",
        TransitionKind::SlideRight => "<p:push dir=\"r\"/>",
        TransitionKind::SlideUp => "<p:push dir=\"u\"/>",
        TransitionKind::SlideDown => "<p:push dir=\"d\"/>",
        TransitionKind::Zoom => "<p:zoom dir=\"in\"/>",
    };
    let speed = if transition.duration < 0.5 {
        "fast"
    } else if transition.duration < 1.0 {
        "med"
    } else {
        "slow"
    };
    Some(format!("<p:transition spd=\"{speed}\">{effect}</p:transition>"))
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use super::*;
    use deck_core::{Element, ElementKind, SlideLayout, TextContent, Transform};

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("zip");
        let mut file = archive.by_name(name).expect("part");
        let mut out = String::new();
        file.read_to_string(&mut out).expect("utf-8");
        out
    }

    #[test]
    fn test_transition_mapping() {
        assert!(transition_xml(&Transition::default()).is_none());

        let mut push = Transition::new(TransitionKind::SlideUp);
        push.duration = 0.3;
        assert_eq!(
            transition_xml(&push).as_deref(),
            Some("<p:transition spd=\"fast\"><p:push dir=\"u\"/></p:transition>")
        );

        let mut zoom = Transition::new(TransitionKind::Zoom);
        zoom.duration = 1.2;
        assert!(transition_xml(&zoom)
            .is_some_and(|xml| xml.contains("spd=\"slow\"") && xml.contains("<p:zoom dir=\"in\"/>")));
    }

    #[test]
    fn test_package_parts() {
        let mut package = PptxPackage::new("Q3 <Review>", Rgba::WHITE, 2.0);
        let slide = Slide::new(SlideLayout::Blank).with_element(
            Element::new(ElementKind::Text(TextContent::plain("Hello", 24.0)))
                .with_transform(Transform::at(96.0, 96.0, 192.0, 48.0)),
        );
        let warnings = package.add_slide(&slide, 0, &Transition::new(TransitionKind::Fade), &AssetCache::empty());
        assert!(warnings.is_empty());
        package.add_slide(&Slide::new(SlideLayout::Blank), 1, &Transition::default(), &AssetCache::empty());
        assert_eq!(package.slide_count(), 2);

        let bytes = package.finish().expect("package");

        let types = read_part(&bytes, "[Content_Types].xml");
        assert!(types.contains("/ppt/slides/slide2.xml"));

        let presentation = read_part(&bytes, "ppt/presentation.xml");
        assert!(presentation.contains("<p:sldId id=\"257\" r:id=\"rId3\"/>"));
        assert!(presentation.contains("<p:sldSz cx=\"9144000\" cy=\"5143500\"/>"));

        let slide1 = read_part(&bytes, "ppt/slides/slide1.xml");
        assert!(slide1.contains("<a:t>Hello</a:t>"));
        assert!(slide1.contains("<a:off x=\"914400\" y=\"914400\"/>"));
        assert!(slide1.ends_with("<p:transition spd=\"med\"><p:fade/></p:transition></p:sld>"));
        assert!(slide1.contains("<a:srgbClr val=\"FFFFFF\"/>"));

        let core = read_part(&bytes, "docProps/core.xml");
        assert!(core.contains("<dc:title>Q3 &lt;Review&gt;</dc:title>"));

        let rels = read_part(&bytes, "ppt/slides/_rels/slide2.xml.rels");
        assert!(rels.contains("slideLayout1.xml"));
        assert!(!rels.contains("image"));
    }

    #[test]
    fn test_slide_background_overrides_fallback() {
        let mut slide = Slide::new(SlideLayout::Blank);
        slide.background = "#102030".to_string();
        let xml = slide_xml(
            Rgba::parse(&slide.background).unwrap_or(Rgba::WHITE),
            "",
            &Transition::default(),
        );
        assert!(xml.contains("<a:srgbClr val=\"102030\"/>"));
        assert!(!xml.contains("p:transition"));
    }
}
