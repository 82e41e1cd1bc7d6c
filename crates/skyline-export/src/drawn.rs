//! Drawn strategy: build a paginated PDF from scratch with `lopdf`.
//!
//! The same page writer appends the summary pages of the overlay strategy.
//!
//! Standard Type1 fonts only, so no font files ship with the service.
//! Text wider than a column wraps on whitespace using an average glyph
//! width estimate.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat, dictionary};

use crate::error::RenderError;
use crate::sections::{DocumentContent, NO_GUESTS_LINE, Row};
use crate::signature::SignatureImage;
use crate::styles::DocumentStyles;

pub(crate) const FONT_BODY: &str = "SkF1";
pub(crate) const FONT_BOLD: &str = "SkF2";
pub(crate) const SIGNATURE_XOBJECT: &str = "SkSig";

/// Average Helvetica glyph width as a fraction of the font size.
const AVG_GLYPH_WIDTH: f32 = 0.52;

const GUEST_COLUMNS: [(&str, f32); 6] = [
    ("#", 0.06),
    ("First Name", 0.22),
    ("Last Name", 0.22),
    ("Check-in", 0.18),
    ("Check-out", 0.18),
    ("Nights", 0.14),
];

pub const SIGNATURE_ON_FIRST_PAGE: &str = "Signed on page 1";

pub const CERTIFICATION_TITLE: &str = "Certification of Authenticity";

const CERTIFICATION_NOTE: &str = "This document was generated from an online booking form \
     submission. Its integrity can be verified with the document identifier and SHA-256 \
     content hash below.";

/// Render the full document: body sections on the first page(s), the
/// certification block always on a page of its own.
pub fn draw_document(
    content: &DocumentContent,
    signature: Option<&SignatureImage>,
    styles: &DocumentStyles,
    generated_at: jiff::Timestamp,
) -> Result<Vec<u8>, RenderError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.add_object(dictionary! {
        "Type" => "Pages",
        "Kids" => Vec::<Object>::new(),
        "Count" => 0,
    });
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => pdf_string(&content.title),
        "Producer" => pdf_string(concat!("skyline-export ", env!("CARGO_PKG_VERSION"))),
        "CreationDate" => pdf_string(&generated_at.strftime("D:%Y%m%d%H%M%SZ").to_string()),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let signature_id = signature.map(|sig| doc.add_object(sig.to_xobject()));

    let slot = match signature {
        Some(sig) => SignatureSlot::Image(sig),
        None => SignatureSlot::Missing,
    };

    let mut writer = PageWriter::new(&mut doc, pages_id, styles, &content.header_line);
    writer.signature = signature_id;
    write_body(&mut writer, content, slot)?;
    writer.page_break()?;
    write_certification(&mut writer, content)?;
    writer.finish()?;

    save(&mut doc)
}

/// Append the submission summary and the certification block as new
/// trailing pages of `doc`.
pub fn append_summary_pages(
    doc: &mut Document,
    content: &DocumentContent,
    signature_stamped: bool,
    styles: &DocumentStyles,
) -> Result<(), RenderError> {
    let pages_id = doc.catalog()?.get(b"Pages")?.as_reference()?;
    let slot = if signature_stamped {
        SignatureSlot::OnFirstPage
    } else {
        SignatureSlot::Missing
    };

    let mut writer = PageWriter::new(doc, pages_id, styles, &content.header_line);
    write_body(&mut writer, content, slot)?;
    writer.page_break()?;
    write_certification(&mut writer, content)?;
    writer.finish()
}

pub(crate) fn save(doc: &mut Document) -> Result<Vec<u8>, RenderError> {
    let mut buf = Vec::new();
    doc.save_to(&mut buf)
        .map_err(|e| RenderError::Pdf(e.to_string()))?;
    Ok(buf)
}

/// Where the signature of a document is shown.
enum SignatureSlot<'s> {
    Image(&'s SignatureImage),
    OnFirstPage,
    Missing,
}

fn write_body(
    writer: &mut PageWriter<'_>,
    content: &DocumentContent,
    signature: SignatureSlot<'_>,
) -> Result<(), RenderError> {
    let styles = writer.styles;
    writer.line(&content.title, styles.title_size, true)?;

    for section in &content.sections {
        writer.heading(&section.title)?;
        for row in &section.rows {
            writer.row(row)?;
        }
    }

    writer.heading("Guests")?;
    if content.guests.is_empty() {
        writer.line(NO_GUESTS_LINE, styles.body_size, false)?;
    } else {
        let header: Vec<String> = GUEST_COLUMNS.iter().map(|(h, _)| h.to_string()).collect();
        writer.table_row(&header, true)?;
        for guest in &content.guests {
            writer.table_row(
                &[
                    guest.number.to_string(),
                    guest.first_name.clone(),
                    guest.last_name.clone(),
                    guest.check_in.clone(),
                    guest.check_out.clone(),
                    guest.nights.clone(),
                ],
                false,
            )?;
        }
    }

    writer.heading("Terms & Acceptance")?;
    writer.paragraph(&content.terms_line, styles.body_size, false)?;

    match signature {
        SignatureSlot::Image(sig) => {
            let (w, h) = sig.fit_within(styles.signature_width, styles.signature_height);
            writer.signature_block(w, h)
        }
        SignatureSlot::OnFirstPage => writer.row(&Row {
            label: "Signature".to_string(),
            value: SIGNATURE_ON_FIRST_PAGE.to_string(),
        }),
        SignatureSlot::Missing => writer.row(&Row {
            label: "Signature".to_string(),
            value: styles.not_provided.clone(),
        }),
    }
}

fn write_certification(
    writer: &mut PageWriter<'_>,
    content: &DocumentContent,
) -> Result<(), RenderError> {
    let styles = writer.styles;
    writer.line(CERTIFICATION_TITLE, styles.heading_size, true)?;
    writer.paragraph(CERTIFICATION_NOTE, styles.small_size, false)?;
    writer.gap(styles.body_size);
    for row in &content.certification {
        writer.row(row)?;
    }
    writer.gap(styles.body_size);
    writer.paragraph(&content.terms_line, styles.body_size, false)
}

/// Accumulates content operations and emits pages under a `Pages` node.
pub(crate) struct PageWriter<'a> {
    doc: &'a mut Document,
    pages_id: ObjectId,
    styles: &'a DocumentStyles,
    header: &'a str,
    fonts: (ObjectId, ObjectId),
    signature: Option<ObjectId>,
    ops: Vec<Operation>,
    y: f32,
    new_pages: Vec<ObjectId>,
}

impl<'a> PageWriter<'a> {
    pub(crate) fn new(
        doc: &'a mut Document,
        pages_id: ObjectId,
        styles: &'a DocumentStyles,
        header: &'a str,
    ) -> Self {
        let fonts = (
            doc.add_object(font_dict(&styles.body_font)),
            doc.add_object(font_dict(&styles.heading_font)),
        );
        let mut writer = Self {
            doc,
            pages_id,
            styles,
            header,
            fonts,
            signature: None,
            ops: Vec::new(),
            y: 0.0,
            new_pages: Vec::new(),
        };
        writer.start_page();
        writer
    }

    fn start_page(&mut self) {
        let styles = self.styles;
        self.y = styles.page_height - styles.margin;
        self.ops.extend(text_ops(
            self.header,
            FONT_BODY,
            styles.small_size,
            styles.margin,
            self.y,
        ));
        self.y -= styles.small_size * styles.line_height * 1.5;
    }

    fn advance(&self, size: f32) -> f32 {
        size * self.styles.line_height
    }

    fn max_chars(width: f32, size: f32) -> usize {
        ((width / (size * AVG_GLYPH_WIDTH)) as usize).max(1)
    }

    fn ensure_space(&mut self, height: f32) -> Result<(), RenderError> {
        if self.y - height < self.styles.margin {
            self.page_break()?;
        }
        Ok(())
    }

    fn gap(&mut self, points: f32) {
        self.y -= points;
    }

    pub(crate) fn page_break(&mut self) -> Result<(), RenderError> {
        self.flush_page()?;
        self.start_page();
        Ok(())
    }

    fn line(&mut self, text: &str, size: f32, bold: bool) -> Result<(), RenderError> {
        let advance = self.advance(size);
        self.ensure_space(advance)?;
        self.y -= advance;
        let font = if bold { FONT_BOLD } else { FONT_BODY };
        self.ops
            .extend(text_ops(text, font, size, self.styles.margin, self.y));
        Ok(())
    }

    fn paragraph(&mut self, text: &str, size: f32, bold: bool) -> Result<(), RenderError> {
        let max = Self::max_chars(self.styles.content_width(), size);
        for line in wrap(text, max) {
            self.line(&line, size, bold)?;
        }
        Ok(())
    }

    fn heading(&mut self, text: &str) -> Result<(), RenderError> {
        let size = self.styles.heading_size;
        // Keep a heading together with at least one following line.
        self.ensure_space(self.advance(size) + self.advance(self.styles.body_size) + size * 0.6)?;
        self.gap(size * 0.6);
        self.line(text, size, true)
    }

    fn row(&mut self, row: &Row) -> Result<(), RenderError> {
        let styles = self.styles;
        let size = styles.body_size;
        let value_x = styles.margin + styles.value_offset;
        let max = Self::max_chars(styles.content_width() - styles.value_offset, size);

        for (i, line) in wrap(&row.value, max).into_iter().enumerate() {
            let advance = self.advance(size);
            self.ensure_space(advance)?;
            self.y -= advance;
            if i == 0 {
                self.ops.extend(text_ops(
                    &format!("{}:", row.label),
                    FONT_BOLD,
                    size,
                    styles.margin,
                    self.y,
                ));
            }
            self.ops
                .extend(text_ops(&line, FONT_BODY, size, value_x, self.y));
        }
        Ok(())
    }

    fn table_row(&mut self, cells: &[String], bold: bool) -> Result<(), RenderError> {
        let styles = self.styles;
        let size = styles.body_size;
        let advance = self.advance(size);
        self.ensure_space(advance)?;
        self.y -= advance;

        let font = if bold { FONT_BOLD } else { FONT_BODY };
        let mut x = styles.margin;
        for (cell, (_, fraction)) in cells.iter().zip(GUEST_COLUMNS) {
            let width = styles.content_width() * fraction;
            let max = Self::max_chars(width, size).saturating_sub(1).max(1);
            let text: String = cell.chars().take(max).collect();
            self.ops.extend(text_ops(&text, font, size, x, self.y));
            x += width;
        }
        Ok(())
    }

    fn signature_block(&mut self, width: f32, height: f32) -> Result<(), RenderError> {
        let styles = self.styles;
        let advance = self.advance(styles.body_size);
        self.ensure_space(height + advance)?;
        self.y -= advance;
        self.ops.extend(text_ops(
            "Signature:",
            FONT_BOLD,
            styles.body_size,
            styles.margin,
            self.y,
        ));
        let image_y = self.y - height + styles.body_size;
        self.ops.extend(image_ops(
            SIGNATURE_XOBJECT,
            styles.margin + styles.value_offset,
            image_y,
            width,
            height,
        ));
        self.y = image_y - styles.body_size * 0.5;
        Ok(())
    }

    fn flush_page(&mut self) -> Result<(), RenderError> {
        let operations = std::mem::take(&mut self.ops);
        let encoded = Content { operations }.encode()?;
        let content_id = self
            .doc
            .add_object(Stream::new(Dictionary::new(), encoded));

        let mut resources = dictionary! {
            "Font" => dictionary! {
                FONT_BODY => self.fonts.0,
                FONT_BOLD => self.fonts.1,
            },
        };
        if let Some(signature_id) = self.signature {
            resources.set("XObject", dictionary! { SIGNATURE_XOBJECT => signature_id });
        }

        let media_box: Vec<Object> = vec![
            0f32.into(),
            0f32.into(),
            self.styles.page_width.into(),
            self.styles.page_height.into(),
        ];
        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "Resources" => resources,
            "MediaBox" => media_box,
            "Contents" => content_id,
        });
        self.new_pages.push(page_id);
        Ok(())
    }

    /// Emit the last page and link every new page into the page tree.
    pub(crate) fn finish(mut self) -> Result<(), RenderError> {
        self.flush_page()?;

        let pages = self.doc.get_object_mut(self.pages_id)?.as_dict_mut()?;
        let count = pages.get(b"Count").and_then(Object::as_i64).unwrap_or(0);
        pages
            .get_mut(b"Kids")?
            .as_array_mut()?
            .extend(self.new_pages.iter().map(|&id| Object::Reference(id)));
        pages.set("Count", count + self.new_pages.len() as i64);
        Ok(())
    }
}

pub(crate) fn font_dict(base_font: &str) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
        "Encoding" => "WinAnsiEncoding",
    }
}

/// Latin-1 bytes for a standard-font string; anything outside is `?`.
pub(crate) fn pdf_string(text: &str) -> Object {
    let bytes = text
        .chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect();
    Object::String(bytes, StringFormat::Literal)
}

pub(crate) fn text_ops(text: &str, font: &str, size: f32, x: f32, y: f32) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![font.into(), size.into()]),
        Operation::new("Td", vec![x.into(), y.into()]),
        Operation::new("Tj", vec![pdf_string(text)]),
        Operation::new("ET", vec![]),
    ]
}

pub(crate) fn image_ops(name: &str, x: f32, y: f32, width: f32, height: f32) -> Vec<Operation> {
    vec![
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![
                width.into(),
                0f32.into(),
                0f32.into(),
                height.into(),
                x.into(),
                y.into(),
            ],
        ),
        Operation::new("Do", vec![name.into()]),
        Operation::new("Q", vec![]),
    ]
}

/// Greedy word wrap; words longer than a line are split.
pub(crate) fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word = word;
        while word.chars().count() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let split = word
                .char_indices()
                .nth(max_chars)
                .map(|(i, _)| i)
                .unwrap_or(word.len());
            lines.push(word[..split].to_string());
            word = &word[split..];
        }
        if word.is_empty() {
            continue;
        }

        let needed = current.chars().count() + usize::from(!current.is_empty()) + word.chars().count();
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}
