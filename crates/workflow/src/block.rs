use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stoneyard_core::{
    Aggregate, AggregateRoot, BlockId, DomainError, DomainResult, Entity, Event, SlabId, UserId,
};
use stoneyard_measure::{Dimensions, SlabDimensions};

use crate::action::BlockAction;
use crate::status::BlockStatus;
use crate::status_override::OverrideGrant;
use crate::table::{allowed_block_actions, is_block_action_allowed};

/// Aggregate root: Block.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    id: BlockId,
    status: BlockStatus,
    dimensions: Option<Dimensions>,
    net_dimensions: Option<Dimensions>,
    dress_dimensions: Option<Dimensions>,
    split_dimensions: Option<Dimensions>,
    slabs: Vec<SlabId>,
    version: u64,
    created: bool,
}

impl Block {
    /// Create an empty, not-yet-created instance to run `CreateBlock` against.
    pub fn empty(id: BlockId) -> Self {
        Self {
            id,
            status: BlockStatus::InStock,
            dimensions: None,
            net_dimensions: None,
            dress_dimensions: None,
            split_dimensions: None,
            slabs: Vec::new(),
            version: 0,
            created: false,
        }
    }

    pub fn id_typed(&self) -> BlockId {
        self.id
    }

    pub fn status(&self) -> BlockStatus {
        self.status
    }

    /// Gross end-to-end measurement.
    pub fn dimensions(&self) -> Option<&Dimensions> {
        self.dimensions.as_ref()
    }

    pub fn net_dimensions(&self) -> Option<&Dimensions> {
        self.net_dimensions.as_ref()
    }

    pub fn dress_dimensions(&self) -> Option<&Dimensions> {
        self.dress_dimensions.as_ref()
    }

    pub fn split_dimensions(&self) -> Option<&Dimensions> {
        self.split_dimensions.as_ref()
    }

    pub fn slabs(&self) -> &[SlabId] {
        &self.slabs
    }

    pub fn is_created(&self) -> bool {
        self.created
    }

    pub fn allowed_actions(&self) -> &'static [BlockAction] {
        allowed_block_actions(self.status)
    }

    /// Most recent measurement along the processing line.
    pub fn latest_dimensions(&self) -> Option<&Dimensions> {
        self.split_dimensions
            .as_ref()
            .or(self.dress_dimensions.as_ref())
            .or(self.dimensions.as_ref())
    }

    /// Check measurement sub-records against the current status.
    ///
    /// Overridden statuses can break these; callers use this to flag such
    /// blocks for review.
    pub fn check_invariants(&self) -> DomainResult<()> {
        if !self.created {
            return Ok(());
        }
        check_stage(
            self.status,
            BlockStatus::Dressed,
            self.dress_dimensions.is_some(),
            "dressDimensions",
        )?;
        check_stage(
            self.status,
            BlockStatus::Split,
            self.split_dimensions.is_some(),
            "splitDimensions",
        )?;
        if self.status == BlockStatus::Cut && self.slabs.is_empty() {
            return Err(DomainError::invariant("cut block has no slabs"));
        }
        if !self.slabs.is_empty() && !self.status.has_reached(BlockStatus::Cut) {
            return Err(DomainError::invariant("uncut block owns slabs"));
        }
        if let (Some(gross), Some(net)) = (&self.dimensions, &self.net_dimensions) {
            net.ensure_within(gross)?;
        }
        Ok(())
    }
}

fn check_stage(
    status: BlockStatus,
    stage: BlockStatus,
    present: bool,
    field: &'static str,
) -> DomainResult<()> {
    if status == BlockStatus::Cracked {
        return Ok(());
    }
    if status == stage && !present {
        return Err(DomainError::invariant(format!("{field} missing while {status}")));
    }
    if present && !status.has_reached(stage) {
        return Err(DomainError::invariant(format!("{field} present while {status}")));
    }
    Ok(())
}

impl AggregateRoot for Block {
    type Id = BlockId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

impl Entity for Block {
    type Id = BlockId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Command: CreateBlock (intake).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlock {
    pub block_id: BlockId,
    pub dimensions: Dimensions,
    pub net_dimensions: Dimensions,
    pub occurred_at: DateTime<Utc>,
}

/// Command payload shared by the three "send for ..." actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendBlock {
    pub block_id: BlockId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkDressed {
    pub block_id: BlockId,
    pub dress_dimensions: Option<Dimensions>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkSplit {
    pub block_id: BlockId,
    pub split_dimensions: Option<Dimensions>,
    pub occurred_at: DateTime<Utc>,
}

/// One slab produced by the cutting operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CutSlab {
    pub slab_id: SlabId,
    pub dimensions: SlabDimensions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkCut {
    pub block_id: BlockId,
    pub slabs: Vec<CutSlab>,
    pub occurred_at: DateTime<Utc>,
}

/// Fields the edit form may change. Status is deliberately absent; see
/// [`OverrideStatus`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net_dimensions: Option<Dimensions>,
}

impl BlockPatch {
    pub fn is_empty(&self) -> bool {
        self.dimensions.is_none() && self.net_dimensions.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditBlock {
    pub block_id: BlockId,
    pub patch: BlockPatch,
    pub occurred_at: DateTime<Utc>,
}

/// Command: OverrideStatus (admin only, bypasses the action table).
#[derive(Debug, Clone, PartialEq)]
pub struct OverrideStatus {
    pub block_id: BlockId,
    pub status: BlockStatus,
    pub grant: OverrideGrant,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BlockCommand {
    Create(CreateBlock),
    SendForDressing(SendBlock),
    SendForSplitting(SendBlock),
    SendForCutting(SendBlock),
    MarkDressed(MarkDressed),
    MarkSplit(MarkSplit),
    MarkCut(MarkCut),
    Edit(EditBlock),
    OverrideStatus(OverrideStatus),
    View(BlockId),
    Delete(BlockId),
}

impl BlockCommand {
    /// The table action this command is gated by. Intake and admin override
    /// are not table actions.
    pub fn action(&self) -> Option<BlockAction> {
        match self {
            BlockCommand::Create(_) | BlockCommand::OverrideStatus(_) => None,
            BlockCommand::SendForDressing(_) => Some(BlockAction::SendForDressing),
            BlockCommand::SendForSplitting(_) => Some(BlockAction::SendForSplitting),
            BlockCommand::SendForCutting(_) => Some(BlockAction::SendForCutting),
            BlockCommand::MarkDressed(_) => Some(BlockAction::MarkDressed),
            BlockCommand::MarkSplit(_) => Some(BlockAction::MarkSplit),
            BlockCommand::MarkCut(_) => Some(BlockAction::MarkCut),
            BlockCommand::Edit(_) => Some(BlockAction::Edit),
            BlockCommand::View(_) => Some(BlockAction::View),
            BlockCommand::Delete(_) => Some(BlockAction::Delete),
        }
    }

    pub fn block_id(&self) -> BlockId {
        match self {
            BlockCommand::Create(c) => c.block_id,
            BlockCommand::SendForDressing(c)
            | BlockCommand::SendForSplitting(c)
            | BlockCommand::SendForCutting(c) => c.block_id,
            BlockCommand::MarkDressed(c) => c.block_id,
            BlockCommand::MarkSplit(c) => c.block_id,
            BlockCommand::MarkCut(c) => c.block_id,
            BlockCommand::Edit(c) => c.block_id,
            BlockCommand::OverrideStatus(c) => c.block_id,
            BlockCommand::View(id) | BlockCommand::Delete(id) => *id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum BlockEvent {
    Created {
        block_id: BlockId,
        dimensions: Dimensions,
        net_dimensions: Dimensions,
        occurred_at: DateTime<Utc>,
    },
    SentForDressing {
        block_id: BlockId,
        occurred_at: DateTime<Utc>,
    },
    SentForSplitting {
        block_id: BlockId,
        occurred_at: DateTime<Utc>,
    },
    SentForCutting {
        block_id: BlockId,
        occurred_at: DateTime<Utc>,
    },
    Dressed {
        block_id: BlockId,
        dress_dimensions: Dimensions,
        occurred_at: DateTime<Utc>,
    },
    Split {
        block_id: BlockId,
        split_dimensions: Dimensions,
        occurred_at: DateTime<Utc>,
    },
    Cut {
        block_id: BlockId,
        slabs: Vec<CutSlab>,
        occurred_at: DateTime<Utc>,
    },
    Edited {
        block_id: BlockId,
        patch: BlockPatch,
        occurred_at: DateTime<Utc>,
    },
    StatusOverridden {
        block_id: BlockId,
        from: BlockStatus,
        to: BlockStatus,
        by: UserId,
        occurred_at: DateTime<Utc>,
    },
}

impl Event for BlockEvent {
    fn event_type(&self) -> &'static str {
        match self {
            BlockEvent::Created { .. } => "blocks.block.created",
            BlockEvent::SentForDressing { .. } => "blocks.block.sent_for_dressing",
            BlockEvent::SentForSplitting { .. } => "blocks.block.sent_for_splitting",
            BlockEvent::SentForCutting { .. } => "blocks.block.sent_for_cutting",
            BlockEvent::Dressed { .. } => "blocks.block.dressed",
            BlockEvent::Split { .. } => "blocks.block.split",
            BlockEvent::Cut { .. } => "blocks.block.cut",
            BlockEvent::Edited { .. } => "blocks.block.edited",
            BlockEvent::StatusOverridden { .. } => "blocks.block.status_overridden",
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            BlockEvent::Created { occurred_at, .. }
            | BlockEvent::SentForDressing { occurred_at, .. }
            | BlockEvent::SentForSplitting { occurred_at, .. }
            | BlockEvent::SentForCutting { occurred_at, .. }
            | BlockEvent::Dressed { occurred_at, .. }
            | BlockEvent::Split { occurred_at, .. }
            | BlockEvent::Cut { occurred_at, .. }
            | BlockEvent::Edited { occurred_at, .. }
            | BlockEvent::StatusOverridden { occurred_at, .. } => *occurred_at,
        }
    }
}

impl Aggregate for Block {
    type Command = BlockCommand;
    type Event = BlockEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            BlockEvent::Created {
                block_id,
                dimensions,
                net_dimensions,
                ..
            } => {
                self.id = *block_id;
                self.status = BlockStatus::InStock;
                self.dimensions = Some(dimensions.clone());
                self.net_dimensions = Some(net_dimensions.clone());
                self.dress_dimensions = None;
                self.split_dimensions = None;
                self.slabs.clear();
                self.created = true;
            }
            BlockEvent::SentForDressing { .. } => self.status = BlockStatus::InDressing,
            BlockEvent::SentForSplitting { .. } => self.status = BlockStatus::InSplitting,
            BlockEvent::SentForCutting { .. } => self.status = BlockStatus::InCutting,
            BlockEvent::Dressed {
                dress_dimensions, ..
            } => {
                self.dress_dimensions = Some(dress_dimensions.clone());
                self.status = BlockStatus::Dressed;
            }
            BlockEvent::Split {
                split_dimensions, ..
            } => {
                self.split_dimensions = Some(split_dimensions.clone());
                self.status = BlockStatus::Split;
            }
            BlockEvent::Cut { slabs, .. } => {
                self.slabs.extend(slabs.iter().map(|s| s.slab_id));
                self.status = BlockStatus::Cut;
            }
            BlockEvent::Edited { patch, .. } => {
                if let Some(d) = &patch.dimensions {
                    self.dimensions = Some(d.clone());
                }
                if let Some(d) = &patch.net_dimensions {
                    self.net_dimensions = Some(d.clone());
                }
            }
            BlockEvent::StatusOverridden { to, .. } => self.status = *to,
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        if !matches!(command, BlockCommand::Create(_)) {
            if !self.created {
                return Err(DomainError::not_found());
            }
            self.ensure_block_id(command.block_id())?;
        }
        if let Some(action) = command.action() {
            self.ensure_allowed(action)?;
        }

        match command {
            BlockCommand::Create(cmd) => self.handle_create(cmd),
            BlockCommand::SendForDressing(c) => Ok(vec![BlockEvent::SentForDressing {
                block_id: c.block_id,
                occurred_at: c.occurred_at,
            }]),
            BlockCommand::SendForSplitting(c) => Ok(vec![BlockEvent::SentForSplitting {
                block_id: c.block_id,
                occurred_at: c.occurred_at,
            }]),
            BlockCommand::SendForCutting(c) => Ok(vec![BlockEvent::SentForCutting {
                block_id: c.block_id,
                occurred_at: c.occurred_at,
            }]),
            BlockCommand::MarkDressed(c) => self.handle_mark_dressed(c),
            BlockCommand::MarkSplit(c) => self.handle_mark_split(c),
            BlockCommand::MarkCut(c) => self.handle_mark_cut(c),
            BlockCommand::Edit(c) => self.handle_edit(c),
            BlockCommand::OverrideStatus(c) => self.handle_override(c),
            // Navigation and deletion are table checks only; deletion itself
            // is carried out by persistence.
            BlockCommand::View(_) | BlockCommand::Delete(_) => Ok(Vec::new()),
        }
    }
}

impl Block {
    fn ensure_block_id(&self, block_id: BlockId) -> Result<(), DomainError> {
        if self.id != block_id {
            return Err(DomainError::invariant("block_id mismatch"));
        }
        Ok(())
    }

    fn ensure_allowed(&self, action: BlockAction) -> Result<(), DomainError> {
        if !is_block_action_allowed(self.status, action) {
            return Err(DomainError::invalid_transition(self.status, action));
        }
        Ok(())
    }

    /// New measurements may only remove material relative to the latest one.
    fn ensure_removes_material(&self, dims: &Dimensions) -> Result<(), DomainError> {
        dims.validate()?;
        if let Some(previous) = self.latest_dimensions() {
            dims.ensure_within(previous)?;
        }
        Ok(())
    }

    fn handle_create(&self, cmd: &CreateBlock) -> Result<Vec<BlockEvent>, DomainError> {
        if self.created {
            return Err(DomainError::invariant("block already exists"));
        }
        cmd.dimensions.validate()?;
        cmd.net_dimensions.validate()?;
        cmd.net_dimensions.ensure_within(&cmd.dimensions)?;

        Ok(vec![BlockEvent::Created {
            block_id: cmd.block_id,
            dimensions: cmd.dimensions.clone(),
            net_dimensions: cmd.net_dimensions.clone(),
            occurred_at: cmd.occurred_at,
        }])
    }

    fn handle_mark_dressed(&self, cmd: &MarkDressed) -> Result<Vec<BlockEvent>, DomainError> {
        let dims = cmd
            .dress_dimensions
            .as_ref()
            .ok_or_else(|| DomainError::missing_measurement("dressDimensions"))?;
        self.ensure_removes_material(dims)?;

        Ok(vec![BlockEvent::Dressed {
            block_id: cmd.block_id,
            dress_dimensions: dims.clone(),
            occurred_at: cmd.occurred_at,
        }])
    }

    fn handle_mark_split(&self, cmd: &MarkSplit) -> Result<Vec<BlockEvent>, DomainError> {
        let dims = cmd
            .split_dimensions
            .as_ref()
            .ok_or_else(|| DomainError::missing_measurement("splitDimensions"))?;
        self.ensure_removes_material(dims)?;

        Ok(vec![BlockEvent::Split {
            block_id: cmd.block_id,
            split_dimensions: dims.clone(),
            occurred_at: cmd.occurred_at,
        }])
    }

    fn handle_mark_cut(&self, cmd: &MarkCut) -> Result<Vec<BlockEvent>, DomainError> {
        if cmd.slabs.is_empty() {
            return Err(DomainError::validation("cutting must produce at least one slab"));
        }
        let mut seen = HashSet::with_capacity(cmd.slabs.len());
        for slab in &cmd.slabs {
            if !seen.insert(slab.slab_id) {
                return Err(DomainError::validation(format!(
                    "slab {} listed more than once",
                    slab.slab_id
                )));
            }
            slab.dimensions.validate()?;
        }

        Ok(vec![BlockEvent::Cut {
            block_id: cmd.block_id,
            slabs: cmd.slabs.clone(),
            occurred_at: cmd.occurred_at,
        }])
    }

    fn handle_edit(&self, cmd: &EditBlock) -> Result<Vec<BlockEvent>, DomainError> {
        if cmd.patch.is_empty() {
            return Err(DomainError::validation("edit patch is empty"));
        }

        let gross = match (&cmd.patch.dimensions, &self.dimensions) {
            (Some(d), _) | (None, Some(d)) => d,
            (None, None) => return Err(DomainError::invariant("block has no gross dimensions")),
        };
        let net = match (&cmd.patch.net_dimensions, &self.net_dimensions) {
            (Some(d), _) | (None, Some(d)) => d,
            (None, None) => return Err(DomainError::invariant("block has no net dimensions")),
        };
        gross.validate()?;
        net.validate()?;
        net.ensure_within(gross)?;
        // Dressed and split records were taken from the gross block.
        for processed in [&self.dress_dimensions, &self.split_dimensions]
            .into_iter()
            .flatten()
        {
            processed.ensure_within(gross)?;
        }

        Ok(vec![BlockEvent::Edited {
            block_id: cmd.block_id,
            patch: cmd.patch.clone(),
            occurred_at: cmd.occurred_at,
        }])
    }

    fn handle_override(&self, cmd: &OverrideStatus) -> Result<Vec<BlockEvent>, DomainError> {
        if cmd.status == self.status {
            return Err(DomainError::validation(format!(
                "block is already {}",
                self.status
            )));
        }

        Ok(vec![BlockEvent::StatusOverridden {
            block_id: cmd.block_id,
            from: self.status,
            to: cmd.status,
            by: cmd.grant.granted_to(),
            occurred_at: cmd.occurred_at,
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stoneyard_auth::{Principal, Role};
    use stoneyard_measure::Length;

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn cm(l: f64, b: f64, h: f64) -> Dimensions {
        Dimensions::new(Length::cm(l), Length::cm(b), Length::cm(h))
    }

    fn slab_dims() -> SlabDimensions {
        SlabDimensions {
            length: Length::inch(120.0),
            height: Length::inch(60.0),
            thickness: Length::inch(0.75),
            breadth: Length::inch(0.75),
        }
    }

    fn created_block() -> Block {
        let block_id = BlockId::new();
        let block = Block::empty(block_id);
        let cmd = BlockCommand::Create(CreateBlock {
            block_id,
            dimensions: cm(100.0, 60.0, 20.0),
            net_dimensions: cm(95.0, 58.0, 19.0),
            occurred_at: test_time(),
        });
        let (block, _) = block.execute(&cmd).unwrap();
        block
    }

    fn send(block: &Block) -> SendBlock {
        SendBlock {
            block_id: block.id_typed(),
            occurred_at: test_time(),
        }
    }

    #[test]
    fn create_puts_block_in_stock() {
        let block = created_block();
        assert!(block.is_created());
        assert_eq!(block.status(), BlockStatus::InStock);
        assert_eq!(block.version(), 1);
        assert!(block.check_invariants().is_ok());
    }

    #[test]
    fn create_rejects_net_larger_than_gross() {
        let block_id = BlockId::new();
        let err = Block::empty(block_id)
            .handle(&BlockCommand::Create(CreateBlock {
                block_id,
                dimensions: cm(100.0, 60.0, 20.0),
                net_dimensions: cm(100.0, 60.0, 21.0),
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn commands_on_uncreated_block_are_not_found() {
        let block = Block::empty(BlockId::new());
        let err = block.handle(&BlockCommand::View(block.id_typed())).unwrap_err();
        assert_eq!(err, DomainError::NotFound);
    }

    #[test]
    fn full_line_dress_split_cut() {
        let block = created_block();

        let (block, _) = block
            .execute(&BlockCommand::SendForDressing(send(&block)))
            .unwrap();
        assert_eq!(block.status(), BlockStatus::InDressing);
        assert!(block.dress_dimensions().is_none());

        let (block, _) = block
            .execute(&BlockCommand::MarkDressed(MarkDressed {
                block_id: block.id_typed(),
                dress_dimensions: Some(cm(98.0, 59.0, 19.5)),
                occurred_at: test_time(),
            }))
            .unwrap();
        assert_eq!(block.status(), BlockStatus::Dressed);
        assert!(block.dress_dimensions().is_some());

        let (block, _) = block
            .execute(&BlockCommand::SendForSplitting(send(&block)))
            .unwrap();
        let (block, _) = block
            .execute(&BlockCommand::MarkSplit(MarkSplit {
                block_id: block.id_typed(),
                split_dimensions: Some(cm(98.0, 59.0, 9.0)),
                occurred_at: test_time(),
            }))
            .unwrap();
        assert_eq!(block.status(), BlockStatus::Split);

        let (block, _) = block
            .execute(&BlockCommand::SendForCutting(send(&block)))
            .unwrap();
        let slab_id = SlabId::new();
        let (block, events) = block
            .execute(&BlockCommand::MarkCut(MarkCut {
                block_id: block.id_typed(),
                slabs: vec![CutSlab {
                    slab_id,
                    dimensions: slab_dims(),
                }],
                occurred_at: test_time(),
            }))
            .unwrap();
        assert_eq!(block.status(), BlockStatus::Cut);
        assert_eq!(block.slabs(), &[slab_id]);
        assert_eq!(events[0].event_type(), "blocks.block.cut");
        assert_eq!(block.allowed_actions(), &[BlockAction::View, BlockAction::Delete]);
        assert!(block.check_invariants().is_ok());
    }

    #[test]
    fn action_outside_table_is_invalid_transition() {
        let block = created_block();
        let err = block
            .handle(&BlockCommand::MarkDressed(MarkDressed {
                block_id: block.id_typed(),
                dress_dimensions: Some(cm(90.0, 50.0, 10.0)),
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert_eq!(err, DomainError::invalid_transition("inStock", "markDressed"));
    }

    #[test]
    fn rejected_command_leaves_block_untouched() {
        let block = created_block();
        let before = block.clone();
        assert!(block
            .execute(&BlockCommand::MarkCut(MarkCut {
                block_id: block.id_typed(),
                slabs: Vec::new(),
                occurred_at: test_time(),
            }))
            .is_err());
        assert_eq!(block, before);
    }

    #[test]
    fn mark_without_measurement_is_missing_measurement() {
        let block = created_block();
        let (block, _) = block
            .execute(&BlockCommand::SendForSplitting(send(&block)))
            .unwrap();
        let err = block
            .handle(&BlockCommand::MarkSplit(MarkSplit {
                block_id: block.id_typed(),
                split_dimensions: None,
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert_eq!(err, DomainError::MissingMeasurement("splitDimensions"));
    }

    #[test]
    fn dressing_cannot_add_material() {
        let block = created_block();
        let (block, _) = block
            .execute(&BlockCommand::SendForDressing(send(&block)))
            .unwrap();
        let err = block
            .handle(&BlockCommand::MarkDressed(MarkDressed {
                block_id: block.id_typed(),
                dress_dimensions: Some(cm(110.0, 60.0, 20.0)),
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn malformed_measurement_is_rejected() {
        let block = created_block();
        let (block, _) = block
            .execute(&BlockCommand::SendForDressing(send(&block)))
            .unwrap();
        let err = block
            .handle(&BlockCommand::MarkDressed(MarkDressed {
                block_id: block.id_typed(),
                dress_dimensions: Some(cm(f64::NAN, 60.0, 20.0)),
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::MalformedDimension(_)));
    }

    #[test]
    fn edit_merges_patch_and_keeps_status() {
        let block = created_block();
        let (edited, _) = block
            .execute(&BlockCommand::Edit(EditBlock {
                block_id: block.id_typed(),
                patch: BlockPatch {
                    dimensions: None,
                    net_dimensions: Some(cm(90.0, 55.0, 18.0)),
                },
                occurred_at: test_time(),
            }))
            .unwrap();
        assert_eq!(edited.status(), BlockStatus::InStock);
        assert_eq!(edited.net_dimensions(), Some(&cm(90.0, 55.0, 18.0)));
        assert_eq!(edited.dimensions(), block.dimensions());
    }

    #[test]
    fn edit_cannot_shrink_gross_below_net() {
        let block = created_block();
        let err = block
            .handle(&BlockCommand::Edit(EditBlock {
                block_id: block.id_typed(),
                patch: BlockPatch {
                    dimensions: Some(cm(50.0, 50.0, 10.0)),
                    net_dimensions: None,
                },
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn edit_not_allowed_while_in_dressing() {
        let block = created_block();
        let (block, _) = block
            .execute(&BlockCommand::SendForDressing(send(&block)))
            .unwrap();
        let err = block
            .handle(&BlockCommand::Edit(EditBlock {
                block_id: block.id_typed(),
                patch: BlockPatch::default(),
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));
    }

    #[test]
    fn admin_override_bypasses_table() {
        let block = created_block();
        let admin = Principal::new(UserId::new()).with_role(Role::YARD_ADMIN);
        let grant = OverrideGrant::issue(&admin).unwrap();

        let (block, events) = block
            .execute(&BlockCommand::OverrideStatus(OverrideStatus {
                block_id: block.id_typed(),
                status: BlockStatus::Cracked,
                grant,
                occurred_at: test_time(),
            }))
            .unwrap();
        assert_eq!(block.status(), BlockStatus::Cracked);
        assert!(block.allowed_actions().is_empty());
        match &events[0] {
            BlockEvent::StatusOverridden { from, to, by, .. } => {
                assert_eq!(*from, BlockStatus::InStock);
                assert_eq!(*to, BlockStatus::Cracked);
                assert_eq!(*by, admin.user_id);
            }
            other => panic!("expected StatusOverridden, got {other:?}"),
        }
    }

    #[test]
    fn override_into_dressed_without_measurement_fails_invariant_check() {
        let block = created_block();
        let admin = Principal::new(UserId::new()).with_role(Role::YARD_ADMIN);
        let (block, _) = block
            .execute(&BlockCommand::OverrideStatus(OverrideStatus {
                block_id: block.id_typed(),
                status: BlockStatus::Dressed,
                grant: OverrideGrant::issue(&admin).unwrap(),
                occurred_at: test_time(),
            }))
            .unwrap();
        assert!(matches!(
            block.check_invariants(),
            Err(DomainError::InvariantViolation(_))
        ));
    }

    #[test]
    fn view_and_delete_emit_nothing() {
        let block = created_block();
        assert!(block.handle(&BlockCommand::View(block.id_typed())).unwrap().is_empty());
        assert!(block.handle(&BlockCommand::Delete(block.id_typed())).unwrap().is_empty());
    }

    #[test]
    fn events_serialize_with_camel_case_tags() {
        let block = created_block();
        let events = block
            .handle(&BlockCommand::SendForCutting(send(&block)))
            .unwrap();
        let json = serde_json::to_value(&events[0]).unwrap();
        assert_eq!(json["type"], "sentForCutting");
        assert!(json.get("blockId").is_some());
        assert!(json.get("occurredAt").is_some());
    }

    fn block_in(status: BlockStatus) -> Block {
        let block = created_block();
        if status == block.status() {
            return block;
        }
        let admin = Principal::new(UserId::new()).with_role(Role::YARD_ADMIN);
        let (block, _) = block
            .execute(&BlockCommand::OverrideStatus(OverrideStatus {
                block_id: block.id_typed(),
                status,
                grant: OverrideGrant::issue(&admin).unwrap(),
                occurred_at: test_time(),
            }))
            .unwrap();
        block
    }

    /// One well-formed command per table action.
    fn table_commands(block_id: BlockId) -> Vec<BlockCommand> {
        let send = || SendBlock {
            block_id,
            occurred_at: test_time(),
        };
        vec![
            BlockCommand::SendForDressing(send()),
            BlockCommand::SendForSplitting(send()),
            BlockCommand::SendForCutting(send()),
            BlockCommand::MarkDressed(MarkDressed {
                block_id,
                dress_dimensions: Some(cm(98.0, 59.0, 19.5)),
                occurred_at: test_time(),
            }),
            BlockCommand::MarkSplit(MarkSplit {
                block_id,
                split_dimensions: Some(cm(98.0, 59.0, 9.0)),
                occurred_at: test_time(),
            }),
            BlockCommand::MarkCut(MarkCut {
                block_id,
                slabs: vec![CutSlab {
                    slab_id: SlabId::new(),
                    dimensions: slab_dims(),
                }],
                occurred_at: test_time(),
            }),
            BlockCommand::Edit(EditBlock {
                block_id,
                patch: BlockPatch {
                    dimensions: None,
                    net_dimensions: Some(cm(90.0, 55.0, 18.0)),
                },
                occurred_at: test_time(),
            }),
            BlockCommand::View(block_id),
            BlockCommand::Delete(block_id),
        ]
    }

    #[test]
    fn every_action_outside_the_table_is_invalid_transition() {
        for status in BlockStatus::ALL {
            let block = block_in(status);
            assert_eq!(block.status(), status);

            for command in table_commands(block.id_typed()) {
                let action = command.action().unwrap();
                let result = block.handle(&command);
                if is_block_action_allowed(status, action) {
                    assert!(result.is_ok(), "{action} while {status}: {result:?}");
                } else {
                    assert_eq!(
                        result.unwrap_err(),
                        DomainError::invalid_transition(status, action),
                        "{action} while {status}"
                    );
                }
            }
        }
    }

    #[test]
    fn mark_cut_rejects_repeated_slab_ids() {
        let block = block_in(BlockStatus::InCutting);
        let slab_id = SlabId::new();
        let cut = CutSlab {
            slab_id,
            dimensions: slab_dims(),
        };
        let err = block
            .handle(&BlockCommand::MarkCut(MarkCut {
                block_id: block.id_typed(),
                slabs: vec![cut.clone(), cut],
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn edit_cannot_shrink_gross_below_dressed_record() {
        let block = created_block();
        let (block, _) = block
            .execute(&BlockCommand::SendForDressing(send(&block)))
            .unwrap();
        let (block, _) = block
            .execute(&BlockCommand::MarkDressed(MarkDressed {
                block_id: block.id_typed(),
                dress_dimensions: Some(cm(98.0, 59.0, 19.5)),
                occurred_at: test_time(),
            }))
            .unwrap();

        // Still holds the net record, but not the dressed one.
        let err = block
            .handle(&BlockCommand::Edit(EditBlock {
                block_id: block.id_typed(),
                patch: BlockPatch {
                    dimensions: Some(cm(96.0, 59.0, 19.5)),
                    net_dimensions: None,
                },
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }
}
