//! Desktop icon placement.
//!
//! Icons for file-system entries get pixel positions from a sparse side
//! table that survives across sessions. New entries take the first vacant
//! grid slot, scanning a column top-to-bottom and wrapping to the next
//! column, skipping anything already occupied — including the reserved
//! slots of built-in app icons. This is a placement heuristic, not an
//! invariant system: it avoids overlap but makes no aesthetic promises.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use virtual_fs::ItemId;

use crate::model::{Point, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Grid geometry for desktop icon slots.
pub struct IconGrid {
    /// Top-left of the first slot.
    pub origin: Point,
    /// Slot pitch (icon cell plus label and spacing).
    pub cell: Size,
    /// Slots per column before wrapping to the next column.
    pub rows: u32,
}

impl Default for IconGrid {
    fn default() -> Self {
        Self {
            origin: Point { x: 20, y: 20 },
            cell: Size { w: 90, h: 95 },
            rows: 7,
        }
    }
}

impl IconGrid {
    /// Pixel position of slot `index` (column-major, top to bottom).
    pub fn slot(&self, index: u32) -> Point {
        let rows = self.rows.max(1);
        let column = (index / rows) as i32;
        let row = (index % rows) as i32;
        Point {
            x: self.origin.x + column * self.cell.w,
            y: self.origin.y + row * self.cell.h,
        }
    }
}

/// Assigns a position to every id in `ids` that does not have one yet.
///
/// Already-assigned ids are left untouched, so repeated calls with the same
/// inputs are idempotent. `reserved` holds slots that must stay free (app
/// icons not backed by file-system items).
pub fn assign_icon_positions(
    ids: &[ItemId],
    positions: &mut HashMap<ItemId, Point>,
    reserved: &[Point],
    grid: &IconGrid,
) {
    let mut occupied: HashSet<(i32, i32)> = positions
        .values()
        .chain(reserved)
        .map(|point| (point.x, point.y))
        .collect();

    for id in ids {
        if positions.contains_key(id) {
            continue;
        }
        let mut index = 0u32;
        let slot = loop {
            let candidate = grid.slot(index);
            if !occupied.contains(&(candidate.x, candidate.y)) {
                break candidate;
            }
            index += 1;
        };
        occupied.insert((slot.x, slot.y));
        positions.insert(id.clone(), slot);
    }
}

/// Clears the slot assigned to `id`, returning the freed position.
///
/// Callers invoke this alongside the file-system delete; the allocator does
/// not watch the item arena itself.
pub fn release_icon_position(
    positions: &mut HashMap<ItemId, Point>,
    id: &ItemId,
) -> Option<Point> {
    positions.remove(id)
}
