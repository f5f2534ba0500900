//! The player's bag — the `bag` slot.

use serde::{Deserialize, Serialize};

use crate::game_data::DataRef;
use crate::model::metadata::ItemStack;

/// Default registered-item selection.
pub const DEFAULT_REGISTERED_INDEX: [u32; 3] = [0, 0, 1];

/// The player's bag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bag {
    /// Item pockets; empty positions are `None`.
    pub pockets: Vec<Vec<Option<ItemStack>>>,
    /// Items registered to the quick-use button. `0` marks an empty entry.
    pub registered_items: Vec<Option<DataRef>>,
    /// Cursor state of the registered-items menu.
    pub registered_index: Option<[u32; 3]>,
}

impl Bag {
    /// Total number of stacks across all pockets.
    #[must_use]
    pub fn stack_count(&self) -> usize {
        self.pockets.iter().map(|p| p.iter().flatten().count()).sum()
    }
}
