//! Block and slab workflow (event-sourced state machine).
//!
//! Statuses and actions are closed enums and the permission table matches on
//! them exhaustively. Status strings coming from the backend go through the
//! `*_raw` lookups, which grant nothing for values they do not recognize.
//!
//! Aggregates here are pure: they validate a command against the table and
//! return events. Persistence is the caller's job (see `stoneyard-infra`).

pub mod action;
pub mod block;
pub mod slab;
pub mod status;
pub mod status_override;
pub mod table;
pub mod tabs;

pub use action::{BlockAction, SlabAction};
pub use block::{
    Block, BlockCommand, BlockEvent, BlockPatch, CreateBlock, CutSlab, EditBlock, MarkCut,
    MarkDressed, MarkSplit, OverrideStatus, SendBlock,
};
pub use slab::{total_amount, total_square_feet, MarkPolish, SetTrim, Slab, SlabCommand, SlabEvent};
pub use status::{BlockStatus, SlabStatus};
pub use status_override::OverrideGrant;
pub use table::{
    allowed_block_actions, allowed_block_actions_raw, allowed_slab_actions,
    allowed_slab_actions_raw,
};
pub use tabs::{block_tabs, slab_tabs, StatusTab};
