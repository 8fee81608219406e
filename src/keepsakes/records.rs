use serde::{Deserialize, Serialize};

/// The durable description of one dumped keepsake bundle: everything
/// needed to rebuild it from the chest standing in at its tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeepsakeRecord {
    pub given_from: String,
    pub giftbox_index: u32,
    pub message: String,
    pub pos_x: i32,
    pub pos_y: i32,
}

impl KeepsakeRecord {
    pub fn position(&self) -> (i32, i32) {
        (self.pos_x, self.pos_y)
    }
}
