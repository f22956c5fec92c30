//! Placeholder pages for entries that cannot be rendered.
//!
//! Office and text documents are never converted. Each one becomes a single
//! A4 page with a framed, centered notice: a bold title, the original file
//! name and a fixed explanation.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Object, Stream, StringFormat, dictionary};

use crate::error::{DocFuseError, Result};
use crate::merge::builder::OutputDocument;
use crate::merge::fonts::{StandardFont, encode_win_ansi, fit_to_width};

/// A4 width in points.
pub const PAGE_WIDTH: f32 = 595.0;
/// A4 height in points.
pub const PAGE_HEIGHT: f32 = 842.0;

/// Bold headline.
pub const TITLE: &str = "Conversión no disponible";
/// Explanation under the file name.
pub const SUBTEXT: &str = "Configure un servidor de conversión para incluir este archivo";

const TITLE_SIZE: f32 = 18.0;
const NAME_SIZE: f32 = 12.0;
const SUBTEXT_SIZE: f32 = 10.0;

const TITLE_OFFSET: f32 = 30.0;
const SUBTEXT_OFFSET: f32 = -25.0;

const FRAME_LEFT: f32 = 60.0;
const FRAME_BOTTOM_OFFSET: f32 = -45.0;
const FRAME_TOP_OFFSET: f32 = 60.0;
const FRAME_PADDING: f32 = 10.0;

const FONT_RESOURCES: &str = "placeholder-fonts";

/// One line of text placed on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    /// Font used for the line.
    pub font: StandardFont,
    /// Font size in points.
    pub size: f32,
    /// Text as shown.
    pub text: String,
    /// Left edge of the line.
    pub x: f32,
    /// Baseline.
    pub y: f32,
}

impl TextLine {
    fn centered(font: StandardFont, size: f32, text: String, y: f32) -> Self {
        let x = (PAGE_WIDTH - font.text_width(&text, size)) / 2.0;
        Self {
            font,
            size,
            text,
            x,
            y,
        }
    }
}

/// Positions of everything drawn on a placeholder page.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceholderLayout {
    /// Title, file name and subtext, top to bottom.
    pub lines: [TextLine; 3],
    /// Frame as `[x, y, width, height]`.
    pub frame: [f32; 4],
}

impl PlaceholderLayout {
    /// Lay out the notice for `file_name`.
    ///
    /// Lines are stacked around the vertical middle of the page (title at
    /// +30, name at 0, subtext at -25) and each is centered horizontally by
    /// its measured width. Names too wide for the frame are shortened.
    pub fn new(file_name: &str) -> Self {
        let mid = PAGE_HEIGHT / 2.0;
        let frame_width = PAGE_WIDTH - 2.0 * FRAME_LEFT;
        let name = fit_to_width(
            StandardFont::Helvetica,
            file_name,
            NAME_SIZE,
            frame_width - 2.0 * FRAME_PADDING,
        );

        Self {
            lines: [
                TextLine::centered(
                    StandardFont::HelveticaBold,
                    TITLE_SIZE,
                    TITLE.to_string(),
                    mid + TITLE_OFFSET,
                ),
                TextLine::centered(StandardFont::Helvetica, NAME_SIZE, name, mid),
                TextLine::centered(
                    StandardFont::Helvetica,
                    SUBTEXT_SIZE,
                    SUBTEXT.to_string(),
                    mid + SUBTEXT_OFFSET,
                ),
            ],
            frame: [
                FRAME_LEFT,
                mid + FRAME_BOTTOM_OFFSET,
                frame_width,
                FRAME_TOP_OFFSET - FRAME_BOTTOM_OFFSET,
            ],
        }
    }

    fn operations(&self) -> Vec<Operation> {
        let [x, y, width, height] = self.frame;
        let gray = |level: f32| vec![Object::Real(level); 3];
        let mut operations = vec![
            Operation::new("q", vec![]),
            Operation::new("w", vec![1.into()]),
            Operation::new("RG", gray(0.6)),
            Operation::new(
                "re",
                vec![
                    Object::Real(x),
                    Object::Real(y),
                    Object::Real(width),
                    Object::Real(height),
                ],
            ),
            Operation::new("S", vec![]),
            Operation::new("Q", vec![]),
            Operation::new("rg", gray(0.2)),
        ];

        for line in &self.lines {
            operations.extend([
                Operation::new("BT", vec![]),
                Operation::new(
                    "Tf",
                    vec![
                        Object::Name(line.font.resource_name().as_bytes().to_vec()),
                        Object::Real(line.size),
                    ],
                ),
                Operation::new("Td", vec![Object::Real(line.x), Object::Real(line.y)]),
                Operation::new(
                    "Tj",
                    vec![Object::String(
                        encode_win_ansi(&line.text),
                        StringFormat::Literal,
                    )],
                ),
                Operation::new("ET", vec![]),
            ]);
        }

        operations
    }
}

/// Append a placeholder page for `file_name`.
///
/// # Errors
///
/// Returns [`DocFuseError::Layout`] if the page content cannot be encoded.
pub fn append_placeholder(out: &mut OutputDocument, file_name: &str) -> Result<()> {
    let layout = PlaceholderLayout::new(file_name);

    let content = Content {
        operations: layout.operations(),
    };
    let encoded = content
        .encode()
        .map_err(|e| DocFuseError::layout(format!("Failed to encode placeholder page: {e}")))?;
    let content_id = out.add_object(Stream::new(Dictionary::new(), encoded));

    let fonts_id = out.shared_object(FONT_RESOURCES, || {
        let mut fonts = Dictionary::new();
        for font in StandardFont::ALL {
            fonts.set(font.resource_name(), font.dictionary());
        }
        Object::Dictionary(fonts)
    });

    out.push_page(dictionary! {
        "MediaBox" => vec![
            0.into(),
            0.into(),
            Object::Real(PAGE_WIDTH),
            Object::Real(PAGE_HEIGHT),
        ],
        "Resources" => dictionary! { "Font" => fonts_id },
        "Contents" => content_id,
    });

    Ok(())
}
