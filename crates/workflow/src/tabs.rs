//! Status-keyed tabs for the block and slab listings.

use crate::block::Block;
use crate::slab::Slab;
use crate::status::{BlockStatus, SlabStatus};

#[derive(Debug, Clone, PartialEq)]
pub struct StatusTab<'a, S, T> {
    pub status: S,
    pub label: &'static str,
    pub items: Vec<&'a T>,
}

impl<S, T> StatusTab<'_, S, T> {
    pub fn count(&self) -> usize {
        self.items.len()
    }
}

/// One tab per block status in line order, empty tabs included. Input order
/// is kept inside each tab.
pub fn block_tabs(blocks: &[Block]) -> Vec<StatusTab<'_, BlockStatus, Block>> {
    BlockStatus::ALL
        .iter()
        .map(|&status| StatusTab {
            status,
            label: status.label(),
            items: blocks.iter().filter(|b| b.status() == status).collect(),
        })
        .collect()
}

pub fn slab_tabs(slabs: &[Slab]) -> Vec<StatusTab<'_, SlabStatus, Slab>> {
    SlabStatus::ALL
        .iter()
        .map(|&status| StatusTab {
            status,
            label: status.label(),
            items: slabs.iter().filter(|s| s.status() == status).collect(),
        })
        .collect()
}
