//! Mouse drags read as touch swipes.

use xmb_types::{Direction, HorizontalDirection, VerticalDirection};

/// Minimum horizontal travel, in columns, for a swipe.
pub const MIN_SWIPE_COLUMNS: u16 = 6;
/// Minimum vertical travel, in rows, for a swipe.
pub const MIN_SWIPE_ROWS: u16 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Swipe(Direction),
    /// Press and release too close together to be a swipe.
    Click { column: u16, row: u16 },
}

#[derive(Debug, Default)]
pub struct SwipeTracker {
    start: Option<(u16, u16)>,
}

impl SwipeTracker {
    pub fn press(&mut self, column: u16, row: u16) {
        self.start = Some((column, row));
    }

    pub fn is_pressed(&self) -> bool {
        self.start.is_some()
    }

    /// Finish the gesture started by the last [`press`](Self::press).
    pub fn release(&mut self, column: u16, row: u16) -> Option<Gesture> {
        let (start_column, start_row) = self.start.take()?;
        let dx = i32::from(column) - i32::from(start_column);
        let dy = i32::from(row) - i32::from(start_row);
        Some(classify(dx, dy).map_or(Gesture::Click { column, row }, Gesture::Swipe))
    }
}

/// Content follows the finger: dragging left reveals the item on the right,
/// dragging up reveals the sub-item below.
fn classify(dx: i32, dy: i32) -> Option<Direction> {
    // Cells are about twice as tall as they are wide.
    let horizontal_dominant = dx.abs() >= dy.abs() * 2;
    if horizontal_dominant {
        if dx.unsigned_abs() < u32::from(MIN_SWIPE_COLUMNS) {
            return None;
        }
        let direction = if dx < 0 { HorizontalDirection::Right } else { HorizontalDirection::Left };
        Some(direction.into())
    } else {
        if dy.unsigned_abs() < u32::from(MIN_SWIPE_ROWS) {
            return None;
        }
        let direction = if dy < 0 { VerticalDirection::Down } else { VerticalDirection::Up };
        Some(direction.into())
    }
}
