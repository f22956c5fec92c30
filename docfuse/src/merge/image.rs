//! Embedding raster images as full pages.
//!
//! JPEG data is passed through untouched as a `DCTDecode` stream, labelled with
//! the color space it was encoded in. Every other raster format is decoded and stored as 8-bit RGB, with a soft mask when the
//! image carries alpha.

use image::codecs::jpeg::JpegDecoder;
use image::{DynamicImage, ExtendedColorType, ImageDecoder};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Object, Stream, dictionary};
use std::io::Cursor;
use tracing::debug;

use crate::document::Rotation;
use crate::document::classify::extension;
use crate::error::{DocFuseError, Result};
use crate::merge::builder::OutputDocument;

/// Name of the image in the page's XObject resources.
const IMAGE_RESOURCE: &str = "Im0";

/// JPEG markers walked while looking for the Adobe segment.
const MARKER_SOS: u8 = 0xDA;
const MARKER_APP14: u8 = 0xEE;

/// How an image entry is embedded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageEncoding {
    /// Embedded as-is.
    Jpeg,
    /// Decoded and re-encoded as raw RGB (PNG and other formats).
    Png,
}

impl ImageEncoding {
    /// Pick the encoding from the MIME hint, falling back to the file suffix.
    ///
    /// # Examples
    ///
    /// ```
    /// use docfuse::merge::image::ImageEncoding;
    ///
    /// assert_eq!(ImageEncoding::detect("scan.JPG", None), ImageEncoding::Jpeg);
    /// assert_eq!(ImageEncoding::detect("photo", Some("image/jpeg")), ImageEncoding::Jpeg);
    /// assert_eq!(ImageEncoding::detect("logo.png", None), ImageEncoding::Png);
    /// ```
    pub fn detect(name: &str, mime: Option<&str>) -> Self {
        let jpeg_mime = mime
            .map(|m| m.trim().to_ascii_lowercase())
            .is_some_and(|m| m == "image/jpeg" || m == "image/jpg");
        let jpeg_suffix = matches!(extension(name).as_deref(), Some("jpg" | "jpeg"));

        if jpeg_mime || jpeg_suffix {
            Self::Jpeg
        } else {
            Self::Png
        }
    }
}

struct ImageXObject {
    width: u32,
    height: u32,
    stream: Stream,
}

/// Append one page showing the image at its native pixel size.
///
/// The page's MediaBox equals the pixel dimensions, the image fills it from
/// the origin, and `Rotate` is set to the entry rotation once the image is
/// placed.
///
/// # Errors
///
/// Returns [`DocFuseError::ImageDecode`] if the bytes cannot be decoded with
/// the detected encoding.
pub fn append_image(
    out: &mut OutputDocument,
    name: &str,
    mime: Option<&str>,
    bytes: &[u8],
    rotation: Rotation,
) -> Result<()> {
    let encoding = ImageEncoding::detect(name, mime);
    let xobject = match encoding {
        ImageEncoding::Jpeg => jpeg_xobject(name, bytes)?,
        ImageEncoding::Png => raster_xobject(out, name, bytes)?,
    };
    debug!(
        name,
        ?encoding,
        width = xobject.width,
        height = xobject.height,
        "Embedding image"
    );

    let (width, height) = (i64::from(xobject.width), i64::from(xobject.height));
    let image_id = out.add_object(xobject.stream);

    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    width.into(),
                    0.into(),
                    0.into(),
                    height.into(),
                    0.into(),
                    0.into(),
                ],
            ),
            Operation::new("Do", vec![Object::Name(IMAGE_RESOURCE.as_bytes().to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let encoded = content
        .encode()
        .map_err(|e| DocFuseError::layout(format!("Failed to encode image page: {e}")))?;
    let content_id = out.add_object(Stream::new(Dictionary::new(), encoded));

    let mut page = dictionary! {
        "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
        "Resources" => dictionary! {
            "XObject" => dictionary! { IMAGE_RESOURCE => image_id },
        },
        "Contents" => content_id,
    };
    page.set("Rotate", rotation.as_degrees());
    out.push_page(page);

    Ok(())
}

fn jpeg_xobject(name: &str, bytes: &[u8]) -> Result<ImageXObject> {
    let decoder = JpegDecoder::new(Cursor::new(bytes))
        .map_err(|e| DocFuseError::image_decode(name, e.to_string()))?;
    let (width, height) = decoder.dimensions();
    let color_space = jpeg_color_space(decoder.original_color_type());

    let mut dict = image_dictionary(width, height, color_space);
    dict.set("Filter", "DCTDecode");
    // Adobe writers store CMYK samples inverted.
    if color_space == "DeviceCMYK" && has_adobe_marker(bytes) {
        dict.set("Decode", [1, 0, 1, 0, 1, 0, 1, 0].map(Object::Integer).to_vec());
    }

    let mut stream = Stream::new(dict, bytes.to_vec());
    stream.allows_compression = false;

    Ok(ImageXObject {
        width,
        height,
        stream,
    })
}

/// PDF color space for the components a JPEG was encoded with.
fn jpeg_color_space(color: ExtendedColorType) -> &'static str {
    match color {
        ExtendedColorType::L8 | ExtendedColorType::L16 => "DeviceGray",
        ExtendedColorType::Cmyk8 => "DeviceCMYK",
        _ => "DeviceRGB",
    }
}

/// Whether the header carries an Adobe APP14 segment.
fn has_adobe_marker(bytes: &[u8]) -> bool {
    let mut pos = 2;
    while let Some(&[0xFF, marker, hi, lo]) = bytes.get(pos..pos + 4) {
        if marker == MARKER_SOS {
            break;
        }
        if marker == MARKER_APP14 && bytes.get(pos + 4..pos + 9) == Some(b"Adobe".as_slice()) {
            return true;
        }
        pos += 2 + usize::from(u16::from_be_bytes([hi, lo]));
    }
    false
}

fn raster_xobject(out: &mut OutputDocument, name: &str, bytes: &[u8]) -> Result<ImageXObject> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| DocFuseError::image_decode(name, e.to_string()))?;
    let (width, height) = (decoded.width(), decoded.height());

    let mut dict = image_dictionary(width, height, "DeviceRGB");
    if let Some(mask) = alpha_channel(&decoded) {
        let mask_id = out.add_object(Stream::new(
            image_dictionary(width, height, "DeviceGray"),
            mask,
        ));
        dict.set("SMask", mask_id);
    }

    Ok(ImageXObject {
        width,
        height,
        stream: Stream::new(dict, decoded.to_rgb8().into_raw()),
    })
}

fn image_dictionary(width: u32, height: u32, color_space: &str) -> Dictionary {
    dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => i64::from(width),
        "Height" => i64::from(height),
        "ColorSpace" => color_space,
        "BitsPerComponent" => 8,
    }
}

fn alpha_channel(image: &DynamicImage) -> Option<Vec<u8>> {
    if !image.color().has_alpha() {
        return None;
    }
    Some(image.to_rgba8().pixels().map(|pixel| pixel.0[3]).collect())
}
