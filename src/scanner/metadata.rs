//! Header-level probing of media files: native dimensions and EXIF orientation.
//!
//! Reads as little as possible. Camera RAW files are measured through their
//! largest embedded JPEG preview, which is what gets displayed.

use std::fs::{self, File};
use std::io::{BufReader, Cursor};
use std::path::Path;

use anyhow::{bail, Context, Result};
use exif::{In, Reader, Tag};
use image::{ImageFormat, ImageReader};
use tracing::{debug, trace};

use crate::geometry::{Orientation, Size};
use crate::models::MediaType;

pub struct MetadataExtractor;

impl MetadataExtractor {
    /// Native pixel size of the file as stored (before orientation).
    pub fn measure(path: &Path, media_type: MediaType) -> Result<Size> {
        match media_type {
            MediaType::Image => Self::image_dimensions(path),
            MediaType::Raw => Self::raw_preview_dimensions(path),
        }
    }

    /// EXIF orientation of the file. Files without EXIF, or with a missing or
    /// malformed tag, are upright.
    pub fn read_orientation(path: &Path) -> Orientation {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                debug!("Cannot open {:?} for EXIF: {}", path, e);
                return Orientation::Normal;
            }
        };

        let mut reader = BufReader::new(file);
        let exif = match Reader::new().read_from_container(&mut reader) {
            Ok(exif) => exif,
            Err(e) => {
                trace!("No EXIF in {:?}: {}", path, e);
                return Orientation::Normal;
            }
        };

        let raw = exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(i64::from);
        Orientation::from_optional(raw)
    }

    fn image_dimensions(path: &Path) -> Result<Size> {
        let (width, height) = ImageReader::open(path)
            .with_context(|| format!("Failed to open image {:?}", path))?
            .with_guessed_format()
            .with_context(|| format!("Failed to guess format of {:?}", path))?
            .into_dimensions()
            .with_context(|| format!("Failed to read dimensions of {:?}", path))?;
        trace!("Got dimensions {}x{} for {:?}", width, height, path);
        Ok(Size::new(width, height))
    }

    fn raw_preview_dimensions(path: &Path) -> Result<Size> {
        let data = fs::read(path).with_context(|| format!("Failed to read {:?}", path))?;
        let Some((start, end)) = find_largest_jpeg(&data) else {
            bail!("No embedded JPEG preview in {:?}", path);
        };

        let mut reader = ImageReader::new(Cursor::new(&data[start..end]));
        reader.set_format(ImageFormat::Jpeg);
        let (width, height) = reader
            .into_dimensions()
            .with_context(|| format!("Failed to read embedded preview of {:?}", path))?;
        trace!(
            "Embedded preview {}x{} ({} bytes) in {:?}",
            width,
            height,
            end - start,
            path
        );
        Ok(Size::new(width, height))
    }
}

/// Byte range of the largest SOI..EOI run in `data`. RAW containers carry
/// several JPEGs (thumbnail, preview, sometimes a full-size render).
pub fn find_largest_jpeg(data: &[u8]) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize)> = None;
    let mut i = 0;

    while i + 1 < data.len() {
        if data[i] != 0xFF || data[i + 1] != 0xD8 {
            i += 1;
            continue;
        }

        let start = i;
        let Some(eoi) = data[start + 2..]
            .windows(2)
            .position(|w| w == [0xFF, 0xD9])
        else {
            break;
        };
        let end = start + 2 + eoi + 2;
        if best.map_or(true, |(s, e)| end - start > e - s) {
            best = Some((start, end));
        }
        i = end;
    }

    best
}
