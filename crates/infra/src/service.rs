//! Workflow service: the seam between callers (UI handlers) and persistence.
//!
//! ```text
//! command
//!   ↓
//! 1. fetch entity from store
//!   ↓
//! 2. table check + domain decision (pure, in the aggregate)
//!   ↓
//! 3. persist the evolved entity (or delete it)
//! ```
//!
//! Domain rejections are returned to the caller unchanged and never retried.

use chrono::{DateTime, Utc};
use thiserror::Error;

use stoneyard_auth::{AuthzError, Principal};
use stoneyard_core::{Aggregate, BlockId, DomainError, Event, SlabId};
use stoneyard_measure::{fixed2, PolishingCosting};
use stoneyard_workflow::{
    total_amount, total_square_feet, Block, BlockAction, BlockCommand, BlockEvent, BlockStatus,
    CreateBlock, CutSlab, OverrideGrant, OverrideStatus, Slab, SlabAction, SlabCommand,
};

use crate::config::EngineConfig;
use crate::store::{ChildStore, EntityStore, StoreError};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Authz(#[from] AuthzError),
}

/// Volume (m³) and weight (t, formatted) for a block's gross and net records.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockFigures {
    pub gross_volume: f64,
    pub gross_weight: String,
    pub net_volume: f64,
    pub net_weight: String,
}

/// Polishing pay sheet for the slabs of one block.
#[derive(Debug, Clone, PartialEq)]
pub struct PolishingSheet {
    pub rows: Vec<(SlabId, PolishingCosting)>,
    pub total_square_feet: String,
    pub total_amount: String,
}

pub struct WorkflowService<B, S> {
    blocks: B,
    slabs: S,
    config: EngineConfig,
}

impl<B, S> WorkflowService<B, S>
where
    B: EntityStore<Block>,
    S: ChildStore<Slab>,
{
    pub fn new(blocks: B, slabs: S, config: EngineConfig) -> Self {
        Self {
            blocks,
            slabs,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn block(&self, id: BlockId) -> Result<Block, ServiceError> {
        tracing::debug!(block_id = %id, "fetching block");
        Ok(self.blocks.fetch(&id)?)
    }

    pub fn create_block(&self, cmd: CreateBlock) -> Result<Block, ServiceError> {
        match self.blocks.fetch(&cmd.block_id) {
            Ok(_) => return Err(DomainError::invariant("block already exists").into()),
            Err(StoreError::NotFound(_)) => {}
            Err(e) => return Err(e.into()),
        }

        let block_id = cmd.block_id;
        let (block, _) = Block::empty(block_id).execute(&BlockCommand::Create(cmd))?;
        let stored = self.blocks.update(block)?;
        tracing::info!(block_id = %block_id, status = %stored.status(), "block created");
        Ok(stored)
    }

    pub fn block_actions(&self, id: BlockId) -> Result<&'static [BlockAction], ServiceError> {
        Ok(self.block(id)?.allowed_actions())
    }

    /// Run a block command. Returns `None` once the block has been deleted.
    pub fn execute_block(&self, command: BlockCommand) -> Result<Option<Block>, ServiceError> {
        if let BlockCommand::Create(cmd) = command {
            return self.create_block(cmd).map(Some);
        }

        let id = command.block_id();
        let current = self.blocks.fetch(&id)?;
        let (next, events) = current.execute(&command).inspect_err(|e| {
            tracing::warn!(
                block_id = %id,
                status = %current.status(),
                action = ?command.action(),
                error = %e,
                "block command rejected"
            );
        })?;

        match command {
            BlockCommand::View(_) => Ok(Some(next)),
            BlockCommand::Delete(_) => {
                self.blocks.delete(&id)?;
                tracing::info!(block_id = %id, "block deleted");
                Ok(None)
            }
            _ => {
                let mut cuts = Vec::new();
                for event in &events {
                    if let BlockEvent::Cut { slabs, .. } = event {
                        cuts.extend(slabs.iter());
                    }
                }
                self.ensure_new_slabs(id, &cuts)?;

                let stored = self.blocks.update(next)?;
                if let Err(e) = self.store_cut_slabs(id, &cuts) {
                    if let Err(restore) = self.blocks.update(current) {
                        tracing::error!(
                            block_id = %id,
                            error = %restore,
                            "failed to restore block after slab write failure"
                        );
                    }
                    return Err(e.into());
                }
                for event in &events {
                    tracing::info!(
                        block_id = %id,
                        event = event.event_type(),
                        status = %stored.status(),
                        "block updated"
                    );
                }
                Ok(Some(stored))
            }
        }
    }

    /// Cut slab ids must not already be stored, under this block or another.
    fn ensure_new_slabs(&self, block_id: BlockId, cuts: &[&CutSlab]) -> Result<(), ServiceError> {
        for cut in cuts {
            match self.slabs.fetch(&cut.slab_id) {
                Ok(existing) => {
                    tracing::warn!(
                        block_id = %block_id,
                        slab_id = %cut.slab_id,
                        owner = %existing.block_id(),
                        "cut rejected: slab id already in use"
                    );
                    return Err(DomainError::invariant(format!(
                        "slab {} already exists",
                        cut.slab_id
                    ))
                    .into());
                }
                Err(StoreError::NotFound(_)) => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// Write the cut slabs, removing the ones already written if any write fails.
    fn store_cut_slabs(&self, block_id: BlockId, cuts: &[&CutSlab]) -> Result<(), StoreError> {
        for (written, cut) in cuts.iter().enumerate() {
            if let Err(e) = self.slabs.update(Slab::cut_from(block_id, cut)) {
                for done in &cuts[..written] {
                    if let Err(cleanup) = self.slabs.delete(&done.slab_id) {
                        tracing::error!(
                            slab_id = %done.slab_id,
                            error = %cleanup,
                            "failed to remove slab after cut failure"
                        );
                    }
                }
                return Err(e);
            }
        }
        Ok(())
    }

    /// Set a block's status directly. Requires the status-override permission.
    pub fn override_status(
        &self,
        principal: &Principal,
        id: BlockId,
        status: BlockStatus,
        occurred_at: DateTime<Utc>,
    ) -> Result<Block, ServiceError> {
        let grant = OverrideGrant::issue(principal)?;
        let updated = self.execute_block(BlockCommand::OverrideStatus(OverrideStatus {
            block_id: id,
            status,
            grant,
            occurred_at,
        }))?;
        let block = updated.ok_or(DomainError::NotFound)?;
        if let Err(e) = block.check_invariants() {
            tracing::warn!(block_id = %id, error = %e, "overridden block needs review");
        }
        Ok(block)
    }

    pub fn block_figures(&self, id: BlockId) -> Result<BlockFigures, ServiceError> {
        let block = self.block(id)?;
        let (gross, net) = match (block.dimensions(), block.net_dimensions()) {
            (Some(g), Some(n)) => (g, n),
            _ => return Err(DomainError::invariant("block has no dimensions").into()),
        };
        let density = self.config.density;
        Ok(BlockFigures {
            gross_volume: gross.volume(),
            gross_weight: fixed2(gross.weight_tonnes(density)),
            net_volume: net.volume(),
            net_weight: fixed2(net.weight_tonnes(density)),
        })
    }

    pub fn slab(&self, id: SlabId) -> Result<Slab, ServiceError> {
        tracing::debug!(slab_id = %id, "fetching slab");
        Ok(self.slabs.fetch(&id)?)
    }

    pub fn slab_actions(&self, id: SlabId) -> Result<&'static [SlabAction], ServiceError> {
        Ok(self.slab(id)?.allowed_actions())
    }

    /// Run a slab command. Returns `None` once the slab has been deleted.
    pub fn execute_slab(&self, command: SlabCommand) -> Result<Option<Slab>, ServiceError> {
        let id = command.slab_id();
        let current = self.slabs.fetch(&id)?;
        let (next, events) = current.execute(&command).inspect_err(|e| {
            tracing::warn!(
                slab_id = %id,
                status = %current.status(),
                action = ?command.action(),
                error = %e,
                "slab command rejected"
            );
        })?;

        match command {
            SlabCommand::View { .. } => Ok(Some(next)),
            SlabCommand::Delete { .. } => {
                self.slabs.delete(&id)?;
                tracing::info!(slab_id = %id, "slab deleted");
                Ok(None)
            }
            _ => {
                let stored = self.slabs.update(next)?;
                for event in &events {
                    tracing::info!(
                        slab_id = %id,
                        event = event.event_type(),
                        status = %stored.status(),
                        "slab updated"
                    );
                }
                Ok(Some(stored))
            }
        }
    }

    pub fn slabs_of(&self, block_id: BlockId) -> Result<Vec<Slab>, ServiceError> {
        self.block(block_id)?;
        Ok(self.slabs.list_by_parent(&block_id)?)
    }

    /// Pay sheet at `rate`, or at the configured default rate.
    pub fn polishing_sheet(
        &self,
        block_id: BlockId,
        rate: Option<f64>,
    ) -> Result<PolishingSheet, ServiceError> {
        let rate = rate
            .or(self.config.polishing_rate)
            .ok_or_else(|| DomainError::validation("no polishing rate given or configured"))?;
        let slabs = self.slabs_of(block_id)?;

        let rows = slabs
            .iter()
            .filter_map(|slab| slab.costing(rate).map(|row| (slab.id_typed(), row)))
            .collect();

        Ok(PolishingSheet {
            rows,
            total_square_feet: total_square_feet(&slabs),
            total_amount: total_amount(&slabs, rate),
        })
    }
}
