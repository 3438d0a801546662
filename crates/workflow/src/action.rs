//! Action tags the presentation layer renders as buttons.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockAction {
    SendForDressing,
    SendForSplitting,
    SendForCutting,
    MarkDressed,
    MarkSplit,
    MarkCut,
    Edit,
    View,
    Delete,
}

impl BlockAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockAction::SendForDressing => "sendForDressing",
            BlockAction::SendForSplitting => "sendForSplitting",
            BlockAction::SendForCutting => "sendForCutting",
            BlockAction::MarkDressed => "markDressed",
            BlockAction::MarkSplit => "markSplit",
            BlockAction::MarkCut => "markCut",
            BlockAction::Edit => "edit",
            BlockAction::View => "view",
            BlockAction::Delete => "delete",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SlabAction {
    /// Submit polished values.
    MarkPolish,
    View,
    Delete,
}

impl SlabAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlabAction::MarkPolish => "markPolish",
            SlabAction::View => "view",
            SlabAction::Delete => "delete",
        }
    }
}

impl core::fmt::Display for BlockAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::fmt::Display for SlabAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
