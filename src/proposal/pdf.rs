// src/proposal/pdf.rs
use crate::domain::errors::{ExportError, ExportResult};
use crate::proposal::banner::BannerImage;
use crate::proposal::sanitize::latin1_bytes;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};

pub const PDF_MIME_TYPE: &str = "application/pdf";

// A4 in millimetres; every layout figure below is in mm
const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 10.0;
const BOTTOM_MARGIN: f32 = 20.0;
const LINE_HEIGHT: f32 = 10.0;
const FONT_SIZE: f32 = 12.0;
const CELL_PADDING: f32 = 1.0;

const BANNER_X: f32 = 10.0;
const BANNER_Y: f32 = 8.0;
const BANNER_WIDTH: f32 = 180.0;
const BANNER_GAP: f32 = 50.0;
const TITLE_GAP: f32 = 10.0;
const SECTION_GAP: f32 = 5.0;

const LINK_LABEL: &str = "VER MODELO ONLINE";
const CLIENT_LABEL: &str = "Cliente";

const POINTS_PER_MM: f32 = 72.0 / 25.4;
const FONT_NAME: &str = "F1";
const BANNER_NAME: &str = "Im1";

/// Helvetica advance widths for ASCII 32..=126, in 1/1000 em
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, 667, 778, 722, 667,
    611, 722, 667, 944, 667, 667, 611, // 'A'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, 556, 333, 500,
    278, 556, 500, 722, 500, 500, 500, // 'a'..'z'
    334, 260, 334, 584, // '{'..'~'
];
const DEFAULT_GLYPH_WIDTH: u16 = 556;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color(pub u8, pub u8, pub u8);

pub const BLACK: Color = Color(0, 0, 0);
pub const LINK_BLUE: Color = Color(0, 0, 255);

/// Everything that goes into one proposal
#[derive(Debug, Clone)]
pub struct ProposalRequest<'a> {
    pub client_name: Option<&'a str>,
    pub message: &'a str,
    pub model_link: &'a str,
    pub banner: Option<&'a BannerImage>,
}

/// One drawing instruction, positioned from the top-left corner in mm
#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    Text {
        x: f32,
        y: f32,
        color: Color,
        text: Vec<u8>,
    },
    Underline {
        x: f32,
        y: f32,
        width: f32,
        color: Color,
    },
    Banner {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    Link {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        uri: String,
    },
}

/// Marks of a single page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub marks: Vec<Mark>,
}

/// Width of Latin-1 text in mm at the proposal font size
fn text_width(text: &[u8]) -> f32 {
    let units: u32 = text
        .iter()
        .map(|&b| match b {
            32..=126 => u32::from(HELVETICA_WIDTHS[usize::from(b - 32)]),
            0..=31 => 0,
            _ => u32::from(DEFAULT_GLYPH_WIDTH),
        })
        .sum();
    units as f32 / 1000.0 * FONT_SIZE / POINTS_PER_MM
}

/// Greedy word wrap; newlines force breaks and blank lines are kept
fn wrap_text(text: &[u8], max_width: f32) -> Vec<Vec<u8>> {
    let mut lines = Vec::new();

    for paragraph in text.split(|&b| b == b'\n') {
        let mut line: Vec<u8> = Vec::new();

        for word in paragraph.split(|&b| b == b' ') {
            let candidate_width = if line.is_empty() {
                text_width(word)
            } else {
                text_width(&line) + text_width(b" ") + text_width(word)
            };

            if candidate_width <= max_width {
                if !line.is_empty() {
                    line.push(b' ');
                }
                line.extend_from_slice(word);
                continue;
            }

            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }

            // A single word wider than the line is split by characters
            for &byte in word {
                line.push(byte);
                if text_width(&line) > max_width && line.len() > 1 {
                    line.pop();
                    lines.push(std::mem::replace(&mut line, vec![byte]));
                }
            }
        }

        lines.push(line);
    }

    lines
}

/// Flowing layout cursor with automatic page breaks
struct Layout {
    pages: Vec<Page>,
    y: f32,
}

impl Layout {
    fn new() -> Self {
        Self {
            pages: vec![Page::default()],
            y: MARGIN,
        }
    }

    fn push(&mut self, mark: Mark) {
        if let Some(page) = self.pages.last_mut() {
            page.marks.push(mark);
        }
    }

    fn ensure_room(&mut self, height: f32) {
        if self.y + height > PAGE_HEIGHT - BOTTOM_MARGIN {
            self.pages.push(Page::default());
            self.y = MARGIN;
        }
    }

    fn gap(&mut self, height: f32) {
        self.y += height;
    }

    /// Place a text cell at `x` on the current line and move to the next one
    fn cell(&mut self, x: f32, text: Vec<u8>, color: Color) -> (f32, f32) {
        self.ensure_room(LINE_HEIGHT);
        let top = self.y;
        // Vertically centre the baseline in the cell
        let baseline = top + LINE_HEIGHT / 2.0 + 0.3 * FONT_SIZE / POINTS_PER_MM;
        self.push(Mark::Text {
            x,
            y: baseline,
            color,
            text,
        });
        self.y += LINE_HEIGHT;
        (top, baseline)
    }
}

/// Renders quote proposals as PDF documents
pub struct ProposalExporter {
    title: String,
}

impl ProposalExporter {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
        }
    }

    /// Produce the PDF bytes for a proposal
    pub fn render(&self, request: &ProposalRequest) -> ExportResult<Vec<u8>> {
        let pages = self.layout(request);
        let bytes = self.build_document(&pages, request.banner)?;

        log::info!(
            "Rendered proposal: {} page(s), {} bytes, banner: {}",
            pages.len(),
            bytes.len(),
            request.banner.is_some()
        );
        Ok(bytes)
    }

    /// Lay the proposal out into pages of marks
    pub fn layout(&self, request: &ProposalRequest) -> Vec<Page> {
        let mut layout = Layout::new();
        let text_left = MARGIN + CELL_PADDING;

        match request.banner {
            Some(banner) => {
                let height = banner.scaled_height(BANNER_WIDTH);
                layout.push(Mark::Banner {
                    x: BANNER_X,
                    y: BANNER_Y,
                    width: BANNER_WIDTH,
                    height,
                });
                layout.y = (MARGIN + BANNER_GAP).max(BANNER_Y + height);
            }
            None => {
                let title = latin1_bytes(&self.title);
                let x = ((PAGE_WIDTH - text_width(&title)) / 2.0).max(MARGIN);
                layout.cell(x, title, BLACK);
                layout.gap(TITLE_GAP);
            }
        }

        if let Some(name) = request.client_name.filter(|n| !n.trim().is_empty()) {
            let line = latin1_bytes(&format!("{}: {}", CLIENT_LABEL, name.trim()));
            layout.cell(text_left, line, BLACK);
            layout.gap(SECTION_GAP);
        }

        let body_width = PAGE_WIDTH - 2.0 * MARGIN - 2.0 * CELL_PADDING;
        for line in wrap_text(&latin1_bytes(request.message), body_width) {
            layout.cell(text_left, line, BLACK);
        }

        layout.gap(SECTION_GAP);
        let label = latin1_bytes(LINK_LABEL);
        let width = text_width(&label);
        let (top, baseline) = layout.cell(text_left, label, LINK_BLUE);
        layout.push(Mark::Underline {
            x: text_left,
            y: baseline + 0.1 * FONT_SIZE / POINTS_PER_MM,
            width,
            color: LINK_BLUE,
        });
        layout.push(Mark::Link {
            x: MARGIN,
            y: top,
            width: PAGE_WIDTH - 2.0 * MARGIN,
            height: LINE_HEIGHT,
            uri: request.model_link.to_string(),
        });

        layout.pages
    }

    fn build_document(&self, pages: &[Page], banner: Option<&BannerImage>) -> ExportResult<Vec<u8>> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });

        let mut xobjects = Dictionary::new();
        if let Some(banner) = banner {
            let image = Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => i64::from(banner.width),
                    "Height" => i64::from(banner.height),
                    "ColorSpace" => "DeviceRGB",
                    "BitsPerComponent" => 8_i64,
                },
                banner.rgb.clone(),
            );
            xobjects.set(BANNER_NAME, doc.add_object(image));
        }

        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { FONT_NAME => font_id },
            "XObject" => xobjects,
        });

        let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
        for page in pages {
            let content = Content {
                operations: page_operations(page),
            };
            let encoded = content
                .encode()
                .map_err(|e| ExportError::Pdf(format!("Failed to encode page content: {}", e)))?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

            let mut annotations: Vec<Object> = Vec::new();
            for mark in &page.marks {
                if let Mark::Link { x, y, width, height, uri } = mark {
                    let annotation = doc.add_object(dictionary! {
                        "Type" => "Annot",
                        "Subtype" => "Link",
                        "Rect" => vec![
                            real(pt(*x)),
                            real(pt_from_top(*y + *height)),
                            real(pt(*x + *width)),
                            real(pt_from_top(*y)),
                        ],
                        "Border" => vec![0_i64.into(), 0_i64.into(), 0_i64.into()],
                        "A" => dictionary! {
                            "S" => "URI",
                            "URI" => Object::string_literal(uri.as_bytes().to_vec()),
                        },
                    });
                    annotations.push(annotation.into());
                }
            }

            let mut page_dict = dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            };
            if !annotations.is_empty() {
                page_dict.set("Annots", annotations);
            }
            kids.push(doc.add_object(page_dict).into());
        }

        let page_count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_count,
                "Resources" => resources_id,
                "MediaBox" => vec![
                    0_i64.into(),
                    0_i64.into(),
                    real(pt(PAGE_WIDTH)),
                    real(pt(PAGE_HEIGHT)),
                ],
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let created = chrono::Local::now().format("D:%Y%m%d%H%M%S").to_string();
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(latin1_bytes(&self.title)),
            "Producer" => Object::string_literal(format!("kit_quote {}", env!("CARGO_PKG_VERSION"))),
            "CreationDate" => Object::string_literal(created),
        });
        doc.trailer.set("Info", info_id);

        doc.compress();

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| ExportError::Pdf(format!("Failed to write document: {}", e)))?;
        Ok(buffer)
    }
}

fn page_operations(page: &Page) -> Vec<Operation> {
    let mut ops = Vec::new();

    for mark in &page.marks {
        match mark {
            Mark::Text { x, y, color, text } => {
                ops.push(fill_color(*color));
                ops.push(Operation::new("BT", vec![]));
                ops.push(Operation::new("Tf", vec![FONT_NAME.into(), real(FONT_SIZE)]));
                ops.push(Operation::new("Td", vec![real(pt(*x)), real(pt_from_top(*y))]));
                ops.push(Operation::new("Tj", vec![Object::string_literal(text.clone())]));
                ops.push(Operation::new("ET", vec![]));
            }
            Mark::Underline { x, y, width, color } => {
                let thickness = 0.05 * FONT_SIZE;
                ops.push(fill_color(*color));
                ops.push(Operation::new(
                    "re",
                    vec![real(pt(*x)), real(pt_from_top(*y)), real(pt(*width)), real(-thickness)],
                ));
                ops.push(Operation::new("f", vec![]));
            }
            Mark::Banner { x, y, width, height } => {
                ops.push(Operation::new("q", vec![]));
                ops.push(Operation::new(
                    "cm",
                    vec![
                        real(pt(*width)),
                        real(0.0),
                        real(0.0),
                        real(pt(*height)),
                        real(pt(*x)),
                        real(pt_from_top(*y + *height)),
                    ],
                ));
                ops.push(Operation::new("Do", vec![BANNER_NAME.into()]));
                ops.push(Operation::new("Q", vec![]));
            }
            // Links become page annotations, not content
            Mark::Link { .. } => {}
        }
    }

    ops
}

fn fill_color(color: Color) -> Operation {
    let Color(r, g, b) = color;
    Operation::new(
        "rg",
        vec![
            real(f32::from(r) / 255.0),
            real(f32::from(g) / 255.0),
            real(f32::from(b) / 255.0),
        ],
    )
}

fn pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

fn pt_from_top(mm: f32) -> f32 {
    pt(PAGE_HEIGHT - mm)
}

fn real(value: f32) -> Object {
    Object::Real(value.into())
}
