//! Folder listing for the layout driver.
//!
//! Discovers media files with walkdir, sorts them by path and reads each
//! file's EXIF orientation. Native sizes are left unknown; measuring is slow
//! and happens afterwards, off the layout thread.

use std::path::Path;

use anyhow::{bail, Result};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::models::{MediaItem, MediaType};
use crate::scanner::metadata::MetadataExtractor;

#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Whether to scan directories recursively.
    pub recursive: bool,
    /// Maximum directory depth when recursive (0 = unlimited).
    pub max_depth: usize,
    pub follow_symlinks: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            recursive: false,
            max_depth: 0,
            follow_symlinks: false,
        }
    }
}

pub struct FileScanner {
    config: ScanConfig,
}

impl FileScanner {
    pub fn new() -> Self {
        Self::with_config(ScanConfig::default())
    }

    pub fn with_config(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Lists the media items under `dir` in path order, orientation filled in
    /// and native size pending.
    pub fn scan(&self, dir: &Path) -> Result<Vec<MediaItem>> {
        if !dir.is_dir() {
            bail!("{:?} is not a directory", dir);
        }
        info!("Starting scan of {:?}", dir);

        let mut walker = WalkDir::new(dir).follow_links(self.config.follow_symlinks);
        if !self.config.recursive {
            walker = walker.max_depth(1);
        } else if self.config.max_depth > 0 {
            walker = walker.max_depth(self.config.max_depth);
        }

        let mut items = Vec::new();
        let mut skipped = 0usize;

        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if entry.file_type().is_dir() {
                continue;
            }

            let Some(media_type) = MediaType::from_path(entry.path()) else {
                skipped += 1;
                continue;
            };

            let mut item = MediaItem::new(entry.path().to_path_buf(), media_type);
            item.orientation = MetadataExtractor::read_orientation(&item.path);
            items.push(item);
        }

        items.sort_by(|a, b| a.path.cmp(&b.path));

        debug!("Skipped {} non-media files", skipped);
        info!("Discovered {} media files", items.len());
        Ok(items)
    }
}

impl Default for FileScanner {
    fn default() -> Self {
        Self::new()
    }
}
