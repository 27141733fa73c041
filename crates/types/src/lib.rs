//! Shared vocabulary for the XMB cross menu.
//!
//! These types are consumed by the navigation engine, the terminal front-end
//! and the CLI. They carry no behavior beyond small index helpers so that any
//! presentation layer can depend on them without pulling in tokio or ratatui.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the two independently tracked navigation dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// The top-level menu row.
    Horizontal,
    /// The sub-menu column of the active menu item.
    Vertical,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Horizontal => f.write_str("horizontal"),
            Self::Vertical => f.write_str("vertical"),
        }
    }
}

/// Direction of travel along the menu row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HorizontalDirection {
    Left,
    Right,
}

impl HorizontalDirection {
    /// Signed change applied to the active menu index.
    pub fn index_delta(self) -> isize {
        match self {
            Self::Left => -1,
            Self::Right => 1,
        }
    }

    /// Direction that moves from `from` towards `to`, or `None` when equal.
    pub fn towards(from: usize, to: usize) -> Option<Self> {
        match to.cmp(&from) {
            std::cmp::Ordering::Greater => Some(Self::Right),
            std::cmp::Ordering::Less => Some(Self::Left),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Direction of travel inside a sub-menu column.
///
/// `Down` selects the next sub-item (higher index), `Up` the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalDirection {
    Up,
    Down,
}

impl VerticalDirection {
    /// Signed change applied to the active sub-item index.
    pub fn index_delta(self) -> isize {
        match self {
            Self::Up => -1,
            Self::Down => 1,
        }
    }

    /// Direction that moves from `from` towards `to`, or `None` when equal.
    pub fn towards(from: usize, to: usize) -> Option<Self> {
        match to.cmp(&from) {
            std::cmp::Ordering::Greater => Some(Self::Down),
            std::cmp::Ordering::Less => Some(Self::Up),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// A direction on either axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Horizontal(HorizontalDirection),
    Vertical(VerticalDirection),
}

impl Direction {
    pub fn axis(self) -> Axis {
        match self {
            Self::Horizontal(_) => Axis::Horizontal,
            Self::Vertical(_) => Axis::Vertical,
        }
    }
}

impl From<HorizontalDirection> for Direction {
    fn from(value: HorizontalDirection) -> Self {
        Self::Horizontal(value)
    }
}

impl From<VerticalDirection> for Direction {
    fn from(value: VerticalDirection) -> Self {
        Self::Vertical(value)
    }
}

/// Vertical navigation state of a single menu item.
///
/// `NoSubItems` replaces the magic "-1 children" marker: an item either has a
/// non-empty column with a selected entry or it has nothing to navigate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SubMenu {
    #[default]
    NoSubItems,
    HasSubItems { count: usize, active_index: usize },
}

impl SubMenu {
    /// Builds the initial state for a column of `count` children.
    ///
    /// A column without children is treated as having no sub-menu.
    pub fn with_count(count: usize) -> Self {
        if count == 0 {
            Self::NoSubItems
        } else {
            Self::HasSubItems { count, active_index: 0 }
        }
    }

    /// Number of sub-items, zero for the sentinel.
    pub fn count(&self) -> usize {
        match self {
            Self::NoSubItems => 0,
            Self::HasSubItems { count, .. } => *count,
        }
    }

    pub fn active_index(&self) -> Option<usize> {
        match self {
            Self::NoSubItems => None,
            Self::HasSubItems { active_index, .. } => Some(*active_index),
        }
    }
}

/// Notification emitted for every accepted single-step move.
///
/// Presentation code uses it to toggle "active" styling and compute
/// transforms. `offset_index` is only set for vertical moves and names the
/// sub-item that receives the extra displacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveIndexChanged {
    pub axis: Axis,
    /// Menu item whose column moved (vertical) or the new active item (horizontal).
    pub menu_index: usize,
    pub old_index: usize,
    pub new_index: usize,
    pub direction: Direction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset_index: Option<usize>,
    /// Number of visual elements expected to report completion.
    pub affected_elements: usize,
}
