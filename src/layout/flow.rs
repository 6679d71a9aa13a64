use crate::layout::masonry::{FlexCell, MasonryPacker};
use crate::models::{MediaItem, RowItem, RowModel};

/// Flex-wrap row composition over packed cells.
///
/// Browsers get this from `flex-wrap: wrap` for free; toolkit grids do not.
/// Cells keep the fixed row height and wrap left-to-right at the viewport
/// width. Leftover space on a row is shared out by each cell's grow weight,
/// overflow (a lone panorama wider than the viewport) is taken back in
/// proportion to basis width.
#[derive(Debug, Clone)]
pub struct FlowLayout {
    pub packer: MasonryPacker,
    /// Horizontal gap between cells in a row (default: 0)
    pub gap: f64,
    /// Stretch the final row to the full width as well (default: false)
    pub justify_last_row: bool,
}

impl Default for FlowLayout {
    fn default() -> Self {
        Self {
            packer: MasonryPacker::default(),
            gap: 0.0,
            justify_last_row: false,
        }
    }
}

impl FlowLayout {
    pub fn new(packer: MasonryPacker, gap: f64, justify_last_row: bool) -> Self {
        Self {
            packer,
            gap,
            justify_last_row,
        }
    }

    pub fn row_height(&self) -> f64 {
        self.packer.row_height
    }

    fn cells(&self, items: &[MediaItem]) -> Vec<FlexCell> {
        self.packer.pack(items.iter().map(MediaItem::aspect_ratio))
    }

    /// Computes rows for a list of media items.
    ///
    /// # Algorithm
    /// 1. Pack every item into a flex cell at the shared row height.
    /// 2. Stream cells left-to-right, wrapping when the next basis no longer fits.
    /// 3. Resolve each row's final widths from its free space.
    pub fn compute(&self, items: &[MediaItem], viewport_width: f64) -> Vec<RowModel> {
        let breaks = self.compute_breaks(items, viewport_width);
        self.rows_from_breaks(items, &breaks, viewport_width)
    }

    /// Computes row breaks (index ranges) only. Used by the layout cache.
    pub fn compute_breaks(&self, items: &[MediaItem], viewport_width: f64) -> Vec<RowBreak> {
        if items.is_empty() || !(viewport_width > 0.0) {
            return Vec::new();
        }

        let cells = self.cells(items);
        let mut breaks = Vec::new();
        let mut start = 0usize;
        let mut used = 0.0f64;

        for (idx, cell) in cells.iter().enumerate() {
            if idx > start {
                if used + self.gap + cell.basis_width > viewport_width {
                    breaks.push(RowBreak {
                        start_index: start,
                        end_index: idx,
                    });
                    start = idx;
                    used = 0.0;
                } else {
                    used += self.gap;
                }
            }
            used += cell.basis_width;
        }

        breaks.push(RowBreak {
            start_index: start,
            end_index: cells.len(),
        });
        breaks
    }

    /// Rebuilds rows from breaks without re-running line breaking.
    pub fn rows_from_breaks(
        &self,
        items: &[MediaItem],
        breaks: &[RowBreak],
        viewport_width: f64,
    ) -> Vec<RowModel> {
        let row_height = self.row_height();
        let last = breaks.len().saturating_sub(1);

        breaks
            .iter()
            .enumerate()
            .map(|(row_idx, brk)| {
                let row = &items[brk.start_index..brk.end_index];
                let cells = self.cells(row);
                let stretch = row_idx != last || self.justify_last_row;
                let widths = self.resolve_widths(&cells, viewport_width, stretch);

                let mut offset_left = 0.0;
                let row_items = row
                    .iter()
                    .zip(widths)
                    .map(|(item, display_w)| {
                        let cell = RowItem {
                            media_path: item.path.clone(),
                            offset_left,
                            display_w,
                            display_h: row_height,
                        };
                        offset_left += display_w + self.gap;
                        cell
                    })
                    .collect();

                RowModel::new(row_idx as u32, row_height, row_items)
            })
            .collect()
    }

    fn resolve_widths(&self, cells: &[FlexCell], viewport_width: f64, stretch: bool) -> Vec<f64> {
        let gaps = self.gap * cells.len().saturating_sub(1) as f64;
        let basis_sum: f64 = cells.iter().map(|c| c.basis_width).sum();
        let grow_sum: f64 = cells.iter().map(|c| c.grow).sum();
        let free = viewport_width - basis_sum - gaps;

        if free > 0.0 && stretch && grow_sum > 0.0 {
            cells
                .iter()
                .map(|c| c.basis_width + free * c.grow / grow_sum)
                .collect()
        } else if free < 0.0 {
            if basis_sum > 0.0 {
                cells
                    .iter()
                    .map(|c| (c.basis_width + free * c.basis_width / basis_sum).max(0.0))
                    .collect()
            } else {
                let share = ((viewport_width - gaps) / cells.len() as f64).max(0.0);
                vec![share; cells.len()]
            }
        } else {
            cells.iter().map(|c| c.basis_width).collect()
        }
    }

    /// Calculates the total height of all rows.
    /// Useful for scroll calculations.
    pub fn total_height(&self, rows: &[RowModel], row_gap: f64) -> f64 {
        if rows.is_empty() {
            return 0.0;
        }

        let heights_sum: f64 = rows.iter().map(|r| r.height_px).sum();
        let gaps_sum = (rows.len().saturating_sub(1)) as f64 * row_gap;
        heights_sum + gaps_sum
    }
}

/// Represents a row break for caching purposes.
/// Contains only the index range, not the resolved cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowBreak {
    /// Start index in the items array (inclusive)
    pub start_index: usize,
    /// End index in the items array (exclusive)
    pub end_index: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Orientation, Size};

    fn make_item(path: &str, width: u32, height: u32) -> MediaItem {
        MediaItem::image(path, Orientation::Normal).with_native_size(Size::new(width, height))
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_empty_items() {
        let layout = FlowLayout::default();
        assert!(layout.compute(&[], 1920.0).is_empty());
    }

    #[test]
    fn test_zero_viewport() {
        let layout = FlowLayout::default();
        let items = vec![make_item("a.jpg", 3000, 2000)];
        assert!(layout.compute(&items, 0.0).is_empty());
        assert!(layout.compute(&items, f64::NAN).is_empty());
    }

    #[test]
    fn test_single_item_keeps_basis() {
        let layout = FlowLayout::default();
        let items = vec![make_item("a.jpg", 3000, 2000)];
        let rows = layout.compute(&items, 1920.0);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].items[0].display_w, 330.0);
        assert_eq!(rows[0].items[0].display_h, 220.0);
    }

    #[test]
    fn test_full_rows_fill_viewport() {
        let layout = FlowLayout::default();
        let items: Vec<MediaItem> = (0..12)
            .map(|i| make_item(&format!("{}.jpg", i), 1920, 1080))
            .collect();

        let rows = layout.compute(&items, 1920.0);

        assert!(rows.len() > 1, "Expected > 1 rows, got {}", rows.len());
        let total_items: usize = rows.iter().map(|r| r.items.len()).sum();
        assert_eq!(total_items, items.len());
        for row in &rows[..rows.len() - 1] {
            assert!(close(row.used_width(), 1920.0), "row width {}", row.used_width());
        }
    }

    #[test]
    fn test_gap_is_respected() {
        let layout = FlowLayout::new(MasonryPacker::new(100.0), 4.0, false);
        let items: Vec<MediaItem> = (0..7)
            .map(|i| make_item(&format!("{}.jpg", i), 1000, 1000))
            .collect();
        // 100 + 4 + 100 + 4 + 100 = 308 <= 320, a fourth cell would need 412.
        let rows = layout.compute(&items, 320.0);
        assert_eq!(rows[0].items.len(), 3);
        let first = &rows[0].items;
        assert!(close(first[1].offset_left, first[0].display_w + 4.0));
        assert!(close(rows[0].used_width(), 320.0));
    }

    #[test]
    fn test_growth_follows_aspect_ratio() {
        let layout = FlowLayout::new(MasonryPacker::new(100.0), 0.0, false);
        let items = vec![
            make_item("wide.jpg", 2000, 1000),
            make_item("square.jpg", 1000, 1000),
            make_item("next.jpg", 1000, 1000),
        ];
        // 200 + 100 = 300 of 330; the third cell wraps and the 30 px left
        // over splits 2:1.
        let rows = layout.compute(&items, 330.0);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].items.len(), 2);
        assert!(close(rows[0].items[0].display_w, 220.0));
        assert!(close(rows[0].items[1].display_w, 110.0));
        assert!(close(rows[0].items[1].offset_left, 220.0));
    }

    #[test]
    fn test_panorama_shrinks_to_viewport() {
        let layout = FlowLayout::default();
        let viewport = 1000.0;
        let items = vec![make_item("pano.jpg", 12000, 1000)];
        let rows = layout.compute(&items, viewport);
        assert_eq!(rows.len(), 1);
        assert!(close(rows[0].items[0].display_w, viewport));
        assert_eq!(rows[0].height_px, layout.row_height());
    }

    #[test]
    fn test_last_row_justification() {
        let items: Vec<MediaItem> = (0..4)
            .map(|i| make_item(&format!("{}.jpg", i), 1000, 1000))
            .collect();

        let natural = FlowLayout::new(MasonryPacker::new(100.0), 0.0, false);
        let rows = natural.compute(&items, 350.0);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].items[0].display_w, 100.0);

        let justified = FlowLayout::new(MasonryPacker::new(100.0), 0.0, true);
        let rows = justified.compute(&items, 350.0);
        assert!(close(rows[1].items[0].display_w, 350.0));
    }

    #[test]
    fn test_unmeasured_items_use_fallback() {
        let layout = FlowLayout::default();
        let items = vec![
            MediaItem::image("pending.jpg", Orientation::Normal),
            make_item("known.jpg", 3000, 2000),
        ];
        let rows = layout.compute(&items, 1920.0);
        assert_eq!(rows[0].items[0].display_w, 330.0);
        assert_eq!(rows[0].items[1].display_w, 330.0);
    }

    #[test]
    fn test_rows_from_breaks_match_compute() {
        let layout = FlowLayout::default();
        let items: Vec<MediaItem> = (0..15)
            .map(|i| make_item(&format!("{}.jpg", i), 1920 + i * 40, 1080))
            .collect();

        let breaks = layout.compute_breaks(&items, 1500.0);
        let rows = layout.rows_from_breaks(&items, &breaks, 1500.0);
        assert_eq!(rows, layout.compute(&items, 1500.0));
        assert_eq!(breaks.first().map(|b| b.start_index), Some(0));
        assert_eq!(breaks.last().map(|b| b.end_index), Some(items.len()));
    }

    #[test]
    fn test_total_height() {
        let layout = FlowLayout::default();
        let items: Vec<MediaItem> = (0..20)
            .map(|i| make_item(&format!("{}.jpg", i), 1000, 1000))
            .collect();
        let rows = layout.compute(&items, 1000.0);
        let expected = rows.len() as f64 * 220.0 + (rows.len() - 1) as f64 * 8.0;
        assert!(close(layout.total_height(&rows, 8.0), expected));
        assert_eq!(layout.total_height(&[], 8.0), 0.0);
    }
}
