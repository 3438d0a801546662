//! Workflow statuses, spelled on the wire exactly as the backend stores them.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use stoneyard_core::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockStatus {
    InStock,
    InDressing,
    Dressed,
    InSplitting,
    Split,
    ReadyForCutting,
    InCutting,
    Cut,
    /// Display only; reachable through an admin override.
    Cracked,
}

impl BlockStatus {
    /// Tab order.
    pub const ALL: [BlockStatus; 9] = [
        BlockStatus::InStock,
        BlockStatus::InDressing,
        BlockStatus::Dressed,
        BlockStatus::InSplitting,
        BlockStatus::Split,
        BlockStatus::ReadyForCutting,
        BlockStatus::InCutting,
        BlockStatus::Cut,
        BlockStatus::Cracked,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockStatus::InStock => "inStock",
            BlockStatus::InDressing => "inDressing",
            BlockStatus::Dressed => "dressed",
            BlockStatus::InSplitting => "inSplitting",
            BlockStatus::Split => "split",
            BlockStatus::ReadyForCutting => "readyForCutting",
            BlockStatus::InCutting => "inCutting",
            BlockStatus::Cut => "cut",
            BlockStatus::Cracked => "cracked",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BlockStatus::InStock => "In Stock",
            BlockStatus::InDressing => "In Dressing",
            BlockStatus::Dressed => "Dressed",
            BlockStatus::InSplitting => "In Splitting",
            BlockStatus::Split => "Split",
            BlockStatus::ReadyForCutting => "Ready For Cutting",
            BlockStatus::InCutting => "In Cutting",
            BlockStatus::Cut => "Cut",
            BlockStatus::Cracked => "Cracked",
        }
    }

    /// Position along the processing line; `None` for off-line statuses.
    pub fn stage(&self) -> Option<u8> {
        match self {
            BlockStatus::InStock => Some(0),
            BlockStatus::InDressing => Some(1),
            BlockStatus::Dressed => Some(2),
            BlockStatus::InSplitting => Some(3),
            BlockStatus::Split => Some(4),
            BlockStatus::ReadyForCutting => Some(5),
            BlockStatus::InCutting => Some(6),
            BlockStatus::Cut => Some(7),
            BlockStatus::Cracked => None,
        }
    }

    /// True when the block is at or past `other` on the processing line.
    pub fn has_reached(&self, other: BlockStatus) -> bool {
        match (self.stage(), other.stage()) {
            (Some(a), Some(b)) => a >= b,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SlabStatus {
    ReadyForPolish,
    InPolishing,
    Polished,
}

impl SlabStatus {
    pub const ALL: [SlabStatus; 3] = [
        SlabStatus::ReadyForPolish,
        SlabStatus::InPolishing,
        SlabStatus::Polished,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SlabStatus::ReadyForPolish => "readyForPolish",
            SlabStatus::InPolishing => "inPolishing",
            SlabStatus::Polished => "polished",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SlabStatus::ReadyForPolish => "Ready For Polish",
            SlabStatus::InPolishing => "In Polishing",
            SlabStatus::Polished => "Polished",
        }
    }
}

macro_rules! impl_status_text {
    ($t:ty, $name:literal) => {
        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|status| status.as_str() == s)
                    .ok_or_else(|| DomainError::validation(format!("unknown {}: '{}'", $name, s)))
            }
        }
    };
}

impl_status_text!(BlockStatus, "block status");
impl_status_text!(SlabStatus, "slab status");
