//! Cell geometry of the cross menu.
//!
//! Menu items sit on one row, spaced `horizontal_step` columns apart and
//! translated so the active item lands on the anchor column. The active
//! item's sub-items hang below the row; the ones already passed are lifted
//! above it by an extra `vertical_offset`.

use ratatui::layout::Rect;
use xmb_util::CompactMode;

/// Terminals narrower than this use the compact profile in `auto` mode.
pub const COMPACT_WIDTH_THRESHOLD: u16 = 80;

/// Rows between the menu row and the active sub-item.
pub const SUB_ITEM_GAP: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutProfile {
    pub horizontal_step: u16,
    pub vertical_step: u16,
    pub vertical_offset: u16,
}

impl LayoutProfile {
    pub const REGULAR: Self = Self {
        horizontal_step: 18,
        vertical_step: 3,
        vertical_offset: 6,
    };

    pub const COMPACT: Self = Self {
        horizontal_step: 12,
        vertical_step: 2,
        vertical_offset: 5,
    };

    pub fn select(mode: CompactMode, width: u16) -> Self {
        match mode {
            CompactMode::Always => Self::COMPACT,
            CompactMode::Never => Self::REGULAR,
            CompactMode::Auto if width < COMPACT_WIDTH_THRESHOLD => Self::COMPACT,
            CompactMode::Auto => Self::REGULAR,
        }
    }

    pub fn is_compact(&self) -> bool {
        *self == Self::COMPACT
    }

    /// Resting column translate of menu item `index` while `active` is selected.
    pub fn column_rest(&self, index: usize, active: usize) -> f32 {
        (index as f32 - active as f32) * f32::from(self.horizontal_step)
    }

    /// Resting row translate of sub-item `index` while `active` is selected.
    pub fn row_rest(&self, index: usize, active: usize) -> f32 {
        let base = (index as f32 - active as f32) * f32::from(self.vertical_step);
        if index < active { base - f32::from(self.vertical_offset) } else { base }
    }
}

/// Screen anchors for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuGeometry {
    pub area: Rect,
    /// Column where the active menu item starts.
    pub anchor_x: i32,
    /// Row of the menu icons; labels go on the row below.
    pub menu_row: i32,
}

impl MenuGeometry {
    pub fn new(area: Rect) -> Self {
        Self {
            area,
            anchor_x: i32::from(area.x) + i32::from(area.width) / 4,
            menu_row: i32::from(area.y) + i32::from(area.height) * 45 / 100,
        }
    }

    /// Row of the active sub-item.
    pub fn sub_anchor_row(&self) -> i32 {
        self.menu_row + SUB_ITEM_GAP
    }

    /// Clip a `width` x `height` box at (`x`, `y`) to the area.
    pub fn clip(&self, x: i32, y: i32, width: u16, height: u16) -> Option<Rect> {
        let left = i32::from(self.area.x);
        let top = i32::from(self.area.y);
        let right = left + i32::from(self.area.width);
        let bottom = top + i32::from(self.area.height);

        let x0 = x.max(left);
        let y0 = y.max(top);
        let x1 = (x + i32::from(width)).min(right);
        let y1 = (y + i32::from(height)).min(bottom);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some(Rect::new(x0 as u16, y0 as u16, (x1 - x0) as u16, (y1 - y0) as u16))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_follows_mode_and_width() {
        assert_eq!(LayoutProfile::select(CompactMode::Auto, 79), LayoutProfile::COMPACT);
        assert_eq!(LayoutProfile::select(CompactMode::Auto, 80), LayoutProfile::REGULAR);
        assert_eq!(LayoutProfile::select(CompactMode::Always, 200), LayoutProfile::COMPACT);
        assert_eq!(LayoutProfile::select(CompactMode::Never, 40), LayoutProfile::REGULAR);
    }

    #[test]
    fn passed_sub_items_are_lifted_by_the_offset() {
        let profile = LayoutProfile::REGULAR;
        assert_eq!(profile.row_rest(2, 2), 0.0);
        assert_eq!(profile.row_rest(3, 2), 3.0);
        assert_eq!(profile.row_rest(1, 2), -9.0);
        assert_eq!(profile.row_rest(0, 2), -12.0);
        assert_eq!(profile.column_rest(0, 2), -36.0);
    }

    #[test]
    fn clip_drops_boxes_outside_the_area() {
        let geometry = MenuGeometry::new(Rect::new(0, 0, 100, 40));
        assert_eq!(geometry.anchor_x, 25);
        assert_eq!(geometry.menu_row, 18);
        assert_eq!(geometry.clip(-5, 2, 10, 1), Some(Rect::new(0, 2, 5, 1)));
        assert_eq!(geometry.clip(120, 2, 10, 1), None);
        assert_eq!(geometry.clip(95, 39, 10, 3), Some(Rect::new(95, 39, 5, 1)));
    }
}
