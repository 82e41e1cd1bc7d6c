//! Overlay strategy: stamp an uploaded PDF instead of drawing a new one.
//!
//! Only the first page is written to (processing header top-left,
//! signature bottom-right). The submission summary and certification block
//! are appended as new trailing pages; other source pages are untouched.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use tracing::{debug, warn};

use crate::drawn::{
    FONT_BODY, FONT_BOLD, SIGNATURE_XOBJECT, append_summary_pages, font_dict, image_ops,
    save, text_ops,
};
use crate::error::RenderError;
use crate::sections::DocumentContent;
use crate::signature::SignatureImage;
use crate::styles::DocumentStyles;

/// Visible area of a page in default user space.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PageBox {
    left: f32,
    bottom: f32,
    right: f32,
    top: f32,
}

impl PageBox {
    /// US Letter, used when a page carries no readable media box.
    const FALLBACK: PageBox = PageBox {
        left: 0.0,
        bottom: 0.0,
        right: 612.0,
        top: 792.0,
    };

    /// Corners may be given in any order.
    fn from_corners(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            left: x0.min(x1),
            bottom: y0.min(y1),
            right: x0.max(x1),
            top: y0.max(y1),
        }
    }
}

pub fn overlay_document(
    source: &[u8],
    content: &DocumentContent,
    signature: Option<&[u8]>,
    styles: &DocumentStyles,
    processed_at: jiff::Timestamp,
) -> Result<Vec<u8>, RenderError> {
    let mut doc = Document::load_mem(source)
        .map_err(|e| RenderError::InvalidSourceDocument(e.to_string()))?;
    if doc.is_encrypted() {
        return Err(RenderError::InvalidSourceDocument(
            "encrypted documents cannot be stamped".to_string(),
        ));
    }

    let first_page = doc
        .get_pages()
        .values()
        .next()
        .copied()
        .ok_or_else(|| RenderError::InvalidSourceDocument("document has no pages".to_string()))?;
    let page = media_box(&doc, first_page).unwrap_or(PageBox::FALLBACK);

    let body_font = doc.add_object(font_dict(&styles.body_font));
    let bold_font = doc.add_object(font_dict(&styles.heading_font));
    register_resource(&mut doc, first_page, b"Font", FONT_BODY, body_font)?;
    register_resource(&mut doc, first_page, b"Font", FONT_BOLD, bold_font)?;

    let margin = styles.margin / 2.0;
    let left = page.left + margin;
    let top = page.top - margin - styles.small_size;
    let mut operations: Vec<Operation> = Vec::new();
    operations.extend(text_ops(
        &format!("Processed: {processed_at}"),
        FONT_BOLD,
        styles.small_size,
        left,
        top,
    ));
    operations.extend(text_ops(
        &content.header_line,
        FONT_BODY,
        styles.small_size,
        left,
        top - styles.small_size * styles.line_height,
    ));

    let mut stamped = false;
    if let Some(bytes) = signature {
        match SignatureImage::decode(bytes) {
            Ok(sig) => {
                stamped = true;
                let (w, h) = sig.fit_within(styles.signature_width, styles.signature_height);
                let image_id = doc.add_object(sig.to_xobject());
                register_resource(&mut doc, first_page, b"XObject", SIGNATURE_XOBJECT, image_id)?;
                operations.extend(image_ops(
                    SIGNATURE_XOBJECT,
                    page.right - margin - w,
                    page.bottom + margin,
                    w,
                    h,
                ));
            }
            Err(e) => warn!(error = %e, "signature could not be embedded, continuing without it"),
        }
    }

    append_page_content(&mut doc, first_page, Content { operations }.encode()?)?;
    append_summary_pages(&mut doc, content, stamped, styles)?;

    debug!(pages = doc.get_pages().len(), "overlay complete");
    save(&mut doc)
}

/// Read a page's media box, following inherited values up the page tree.
fn media_box(doc: &Document, page_id: ObjectId) -> Option<PageBox> {
    let mut node = doc.get_dictionary(page_id).ok()?;
    loop {
        if let Ok(value) = node.get(b"MediaBox") {
            let array = match value {
                Object::Reference(id) => doc.get_object(*id).ok()?.as_array().ok()?,
                other => other.as_array().ok()?,
            };
            let numbers: Vec<f32> = array.iter().filter_map(number).collect();
            if let &[x0, y0, x1, y1] = numbers.as_slice() {
                return Some(PageBox::from_corners(x0, y0, x1, y1));
            }
            return None;
        }
        let parent = node.get(b"Parent").ok()?.as_reference().ok()?;
        node = doc.get_dictionary(parent).ok()?;
    }
}

fn number(object: &Object) -> Option<f32> {
    match object {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r as f32),
        _ => None,
    }
}

/// Wrap existing content in `q`/`Q` and add a new stream after it, so the
/// source's graphics state cannot leak into the overlay.
fn append_page_content(
    doc: &mut Document,
    page_id: ObjectId,
    overlay: Vec<u8>,
) -> Result<(), RenderError> {
    let save_id = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
    let mut restored = b"\nQ\n".to_vec();
    restored.extend(overlay);
    let overlay_id = doc.add_object(Stream::new(Dictionary::new(), restored));

    let existing = match doc.get_dictionary(page_id)?.get(b"Contents") {
        Ok(Object::Reference(id)) => match doc.get_object(*id) {
            Ok(Object::Array(streams)) => streams.clone(),
            _ => vec![Object::Reference(*id)],
        },
        Ok(Object::Array(streams)) => streams.clone(),
        _ => Vec::new(),
    };

    let mut contents = vec![Object::Reference(save_id)];
    contents.extend(existing);
    contents.push(Object::Reference(overlay_id));
    doc.get_object_mut(page_id)?
        .as_dict_mut()?
        .set("Contents", contents);
    Ok(())
}

/// Where a page's resource dictionary lives.
enum ResourcesAt {
    Inline,
    Indirect(ObjectId),
}

fn locate_resources(doc: &mut Document, page_id: ObjectId) -> Result<ResourcesAt, RenderError> {
    match doc.get_dictionary(page_id)?.get(b"Resources") {
        Ok(Object::Reference(id)) => return Ok(ResourcesAt::Indirect(*id)),
        Ok(Object::Dictionary(_)) => return Ok(ResourcesAt::Inline),
        _ => {}
    }

    // Inherited (or absent): copy onto the page so edits stay local to it.
    let inherited = inherited_resources(doc, page_id).unwrap_or_else(Dictionary::new);
    doc.get_object_mut(page_id)?
        .as_dict_mut()?
        .set("Resources", inherited);
    Ok(ResourcesAt::Inline)
}

fn inherited_resources(doc: &Document, page_id: ObjectId) -> Option<Dictionary> {
    let mut node = doc.get_dictionary(page_id).ok()?;
    loop {
        let parent = node.get(b"Parent").ok()?.as_reference().ok()?;
        node = doc.get_dictionary(parent).ok()?;
        match node.get(b"Resources") {
            Ok(Object::Reference(id)) => return doc.get_dictionary(*id).ok().cloned(),
            Ok(Object::Dictionary(dict)) => return Some(dict.clone()),
            _ => continue,
        }
    }
}

fn resources_mut(doc: &mut Document, page_id: ObjectId) -> Result<&mut Dictionary, RenderError> {
    match locate_resources(doc, page_id)? {
        ResourcesAt::Indirect(id) => Ok(doc.get_object_mut(id)?.as_dict_mut()?),
        ResourcesAt::Inline => Ok(doc
            .get_object_mut(page_id)?
            .as_dict_mut()?
            .get_mut(b"Resources")?
            .as_dict_mut()?),
    }
}

/// Add `name -> target` to a resource category (`Font`, `XObject`) of a page.
fn register_resource(
    doc: &mut Document,
    page_id: ObjectId,
    category: &[u8],
    name: &str,
    target: ObjectId,
) -> Result<(), RenderError> {
    let indirect = resources_mut(doc, page_id)?
        .get(category)
        .ok()
        .and_then(|object| object.as_reference().ok());

    if let Some(id) = indirect {
        doc.get_object_mut(id)?.as_dict_mut()?.set(name, target);
        return Ok(());
    }

    let resources = resources_mut(doc, page_id)?;
    match resources.get_mut(category) {
        Ok(Object::Dictionary(entries)) => entries.set(name, target),
        _ => resources.set(category.to_vec(), dictionary! { name => target }),
    };
    Ok(())
}
