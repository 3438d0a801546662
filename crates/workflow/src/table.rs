//! Status → allowed actions.

use crate::action::{BlockAction, SlabAction};
use crate::status::{BlockStatus, SlabStatus};

use BlockAction::*;

/// Actions offered for a block in `status`, in button order.
///
/// `readyForCutting` and `cracked` have no row and offer nothing.
pub fn allowed_block_actions(status: BlockStatus) -> &'static [BlockAction] {
    match status {
        BlockStatus::InStock => &[SendForDressing, SendForSplitting, SendForCutting, Edit, View, Delete],
        BlockStatus::InDressing => &[MarkDressed, View, Delete],
        BlockStatus::Dressed => &[SendForSplitting, SendForCutting, Edit, View, Delete],
        BlockStatus::InSplitting => &[MarkSplit, View, Delete],
        BlockStatus::Split => &[SendForCutting, Edit, View, Delete],
        BlockStatus::InCutting => &[MarkCut, View, Delete],
        BlockStatus::Cut => &[View, Delete],
        BlockStatus::ReadyForCutting | BlockStatus::Cracked => &[],
    }
}

pub fn allowed_slab_actions(status: SlabStatus) -> &'static [SlabAction] {
    match status {
        SlabStatus::ReadyForPolish => &[SlabAction::MarkPolish, SlabAction::View, SlabAction::Delete],
        SlabStatus::InPolishing => &[SlabAction::MarkPolish, SlabAction::View],
        SlabStatus::Polished => &[SlabAction::View, SlabAction::Delete],
    }
}

/// Lookup by the backend's status string. Unrecognized strings offer nothing,
/// so a status added on the server only hides buttons until it is mapped here.
pub fn allowed_block_actions_raw(status: &str) -> &'static [BlockAction] {
    status
        .parse::<BlockStatus>()
        .map(allowed_block_actions)
        .unwrap_or(&[])
}

pub fn allowed_slab_actions_raw(status: &str) -> &'static [SlabAction] {
    status
        .parse::<SlabStatus>()
        .map(allowed_slab_actions)
        .unwrap_or(&[])
}

pub fn is_block_action_allowed(status: BlockStatus, action: BlockAction) -> bool {
    allowed_block_actions(status).contains(&action)
}

pub fn is_slab_action_allowed(status: SlabStatus, action: SlabAction) -> bool {
    allowed_slab_actions(status).contains(&action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn set(actions: &[BlockAction]) -> BTreeSet<BlockAction> {
        actions.iter().copied().collect()
    }

    #[test]
    fn block_rows_match_workflow() {
        let expected: [(&str, &[BlockAction]); 7] = [
            ("inStock", &[SendForDressing, SendForSplitting, SendForCutting, Edit, View, Delete]),
            ("inDressing", &[MarkDressed, View, Delete]),
            ("dressed", &[SendForSplitting, SendForCutting, Edit, View, Delete]),
            ("inSplitting", &[MarkSplit, View, Delete]),
            ("split", &[SendForCutting, Edit, View, Delete]),
            ("inCutting", &[MarkCut, View, Delete]),
            ("cut", &[View, Delete]),
        ];
        for (status, actions) in expected {
            assert_eq!(set(allowed_block_actions_raw(status)), set(actions), "{status}");
        }
    }

    #[test]
    fn statuses_without_a_row_offer_nothing() {
        assert!(allowed_block_actions(BlockStatus::Cracked).is_empty());
        assert!(allowed_block_actions(BlockStatus::ReadyForCutting).is_empty());
        assert!(allowed_block_actions_raw("onHold").is_empty());
        assert!(allowed_block_actions_raw("").is_empty());
    }

    #[test]
    fn slab_rows_match_workflow() {
        assert_eq!(
            allowed_slab_actions_raw("readyForPolish"),
            &[SlabAction::MarkPolish, SlabAction::View, SlabAction::Delete]
        );
        assert_eq!(
            allowed_slab_actions_raw("inPolishing"),
            &[SlabAction::MarkPolish, SlabAction::View]
        );
        assert_eq!(
            allowed_slab_actions_raw("polished"),
            &[SlabAction::View, SlabAction::Delete]
        );
        assert!(allowed_slab_actions_raw("inStock").is_empty());
    }

    #[test]
    fn mark_actions_only_in_their_in_progress_status() {
        for status in BlockStatus::ALL {
            assert_eq!(
                is_block_action_allowed(status, MarkDressed),
                status == BlockStatus::InDressing
            );
            assert_eq!(
                is_block_action_allowed(status, MarkCut),
                status == BlockStatus::InCutting
            );
        }
    }

    proptest! {
        #[test]
        fn unknown_strings_grant_nothing(s in "[a-zA-Z]{0,16}") {
            prop_assume!(s.parse::<BlockStatus>().is_err());
            prop_assert!(allowed_block_actions_raw(&s).is_empty());
        }

        #[test]
        fn unknown_slab_strings_grant_nothing(s in "[a-zA-Z]{0,16}") {
            prop_assume!(s.parse::<SlabStatus>().is_err());
            prop_assert!(allowed_slab_actions_raw(&s).is_empty());
        }
    }
}
