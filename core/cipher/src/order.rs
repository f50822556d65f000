//! Random storage order of the two blocks.
//!
//! Order affects layout only. Each block names its slot in cleartext, so the
//! order does not hide which block belongs to which password.

use rand::Rng;

use crate::frame::Block;
use dualpass_common::Slot;

/// Storage order of the two blocks in a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockOrder {
    /// Slot A's block is stored first.
    AFirst,
    /// Slot B's block is stored first.
    BFirst,
}

impl BlockOrder {
    /// Pick an order uniformly at random.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.gen_bool(0.5) {
            BlockOrder::AFirst
        } else {
            BlockOrder::BFirst
        }
    }

    /// The order a parsed pair of blocks was stored in, if both slots are known.
    pub fn of(blocks: &[Block]) -> Option<Self> {
        match blocks {
            [first, second] => match (first.slot()?, second.slot()?) {
                (Slot::A, Slot::B) => Some(BlockOrder::AFirst),
                (Slot::B, Slot::A) => Some(BlockOrder::BFirst),
                _ => None,
            },
            _ => None,
        }
    }

    /// Place the two blocks in this order.
    pub fn arrange(self, block_a: Block, block_b: Block) -> [Block; 2] {
        match self {
            BlockOrder::AFirst => [block_a, block_b],
            BlockOrder::BFirst => [block_b, block_a],
        }
    }
}

/// Randomly permute slot A's and slot B's blocks.
pub fn shuffle<R: Rng + ?Sized>(rng: &mut R, block_a: Block, block_b: Block) -> [Block; 2] {
    BlockOrder::random(rng).arrange(block_a, block_b)
}
