use std::path::{Path, PathBuf};

use crate::geometry::{Orientation, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    /// Directly decodable image.
    Image,
    /// Camera RAW; displayed through its embedded JPEG preview.
    Raw,
}

impl MediaType {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" | "png" | "webp" | "gif" | "bmp" | "tiff" | "tif" => Some(Self::Image),
            "arw" | "dng" | "cr2" | "cr3" | "nef" | "raf" | "orf" | "rw2" | "srw" | "pef" => {
                Some(Self::Raw)
            }
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

/// One presented media item. Owned by the caller; the layout engine only
/// reads it.
#[derive(Debug, Clone)]
pub struct MediaItem {
    /// Stable identity of the item.
    pub path: PathBuf,
    pub media_type: MediaType,
    pub orientation: Orientation,
    /// Unknown until the image has been measured. Never changes once set.
    pub native_size: Option<Size>,
}

impl MediaItem {
    pub fn new(path: PathBuf, media_type: MediaType) -> Self {
        Self {
            path,
            media_type,
            orientation: Orientation::Normal,
            native_size: None,
        }
    }

    /// Create an image item with a known orientation and no measurement yet.
    pub fn image(path: impl Into<PathBuf>, orientation: Orientation) -> Self {
        Self {
            orientation,
            ..Self::new(path.into(), MediaType::Image)
        }
    }

    pub fn with_native_size(mut self, size: Size) -> Self {
        self.native_size = Some(size);
        self
    }

    /// Record the measured size. Returns false when a size was already set
    /// (the first measurement wins) or when `size` is empty.
    pub fn set_native_size(&mut self, size: Size) -> bool {
        if self.native_size.is_some() || size.is_empty() {
            return false;
        }
        self.native_size = Some(size);
        true
    }

    /// Orientation-corrected size, once measured.
    pub fn logical_size(&self) -> Option<Size> {
        self.native_size
            .map(|native| self.orientation.logical_size(native))
    }

    /// Logical width over logical height. `None` until a non-empty size is known.
    pub fn aspect_ratio(&self) -> Option<f64> {
        self.logical_size().and_then(|size| size.aspect_ratio())
    }

    pub fn is_raw(&self) -> bool {
        self.media_type == MediaType::Raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_from_extension() {
        assert_eq!(MediaType::from_extension("JPG"), Some(MediaType::Image));
        assert_eq!(MediaType::from_extension("nef"), Some(MediaType::Raw));
        assert_eq!(MediaType::from_extension("CR3"), Some(MediaType::Raw));
        assert_eq!(MediaType::from_extension("txt"), None);
        assert_eq!(MediaType::from_path(Path::new("/a/b.ARW")), Some(MediaType::Raw));
        assert_eq!(MediaType::from_path(Path::new("/a/noext")), None);
    }

    #[test]
    fn test_aspect_ratio_uses_logical_size() {
        let item = MediaItem::image("a.jpg", Orientation::Rotate90).with_native_size(Size::new(3000, 2000));
        assert_eq!(item.logical_size(), Some(Size::new(2000, 3000)));
        let ar = item.aspect_ratio().unwrap();
        assert!((ar - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_unmeasured_has_no_ratio() {
        let item = MediaItem::image("a.jpg", Orientation::Normal);
        assert_eq!(item.aspect_ratio(), None);
        let empty = item.with_native_size(Size::new(0, 100));
        assert_eq!(empty.aspect_ratio(), None);
    }

    #[test]
    fn test_native_size_is_set_once() {
        let mut item = MediaItem::image("a.jpg", Orientation::Normal);
        assert!(item.set_native_size(Size::new(100, 50)));
        assert!(!item.set_native_size(Size::new(10, 10)));
        assert_eq!(item.native_size, Some(Size::new(100, 50)));
    }

    #[test]
    fn test_empty_size_is_not_recorded() {
        let mut item = MediaItem::new(PathBuf::from("a.nef"), MediaType::Raw);
        assert!(item.is_raw());
        assert!(!item.set_native_size(Size::new(0, 0)));
        assert_eq!(item.native_size, None);
        assert!(item.set_native_size(Size::new(6000, 4000)));
        assert_eq!(item.aspect_ratio(), Some(1.5));
    }
}
