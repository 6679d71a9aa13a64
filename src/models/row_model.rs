use std::path::PathBuf;

use crate::geometry::LayoutBox;

#[derive(Debug, Clone, PartialEq)]
pub struct RowItem {
    pub media_path: PathBuf,
    /// Horizontal offset of the cell within its row.
    pub offset_left: f64,
    pub display_w: f64,
    pub display_h: f64,
}

impl RowItem {
    /// The cell's box, handed to the item's layout controller.
    pub fn layout_box(&self) -> LayoutBox {
        LayoutBox::new(self.display_w, self.display_h)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowModel {
    pub row_index: u32,
    pub height_px: f64,
    pub items: Vec<RowItem>,
}

impl RowModel {
    pub fn new(row_index: u32, height_px: f64, items: Vec<RowItem>) -> Self {
        Self {
            row_index,
            height_px,
            items,
        }
    }

    /// Total width occupied by the row's cells and gaps.
    pub fn used_width(&self) -> f64 {
        self.items
            .last()
            .map(|item| item.offset_left + item.display_w)
            .unwrap_or(0.0)
    }
}
