use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stoneyard_core::{
    Aggregate, AggregateRoot, BlockId, DomainError, DomainResult, Entity, Event, Owned, SlabId,
};
use stoneyard_measure::{
    aggregate_display, polishing_costing, PolishedValues, PolishingCosting, SlabDimensions, Trim,
};

use crate::action::SlabAction;
use crate::block::CutSlab;
use crate::status::SlabStatus;
use crate::table::{allowed_slab_actions, is_slab_action_allowed};

/// Aggregate root: Slab.
#[derive(Debug, Clone, PartialEq)]
pub struct Slab {
    id: SlabId,
    block_id: BlockId,
    status: SlabStatus,
    dimensions: SlabDimensions,
    trim: Option<Trim>,
    polished_values: Option<PolishedValues>,
    version: u64,
}

impl Slab {
    /// A freshly cut slab, waiting for polish.
    pub fn cut_from(block_id: BlockId, cut: &CutSlab) -> Self {
        Self {
            id: cut.slab_id,
            block_id,
            status: SlabStatus::ReadyForPolish,
            dimensions: cut.dimensions.clone(),
            trim: None,
            polished_values: None,
            version: 0,
        }
    }

    /// Rebuild a slab fetched from persistence.
    pub fn restore(
        id: SlabId,
        block_id: BlockId,
        status: SlabStatus,
        dimensions: SlabDimensions,
        trim: Option<Trim>,
        polished_values: Option<PolishedValues>,
    ) -> DomainResult<Self> {
        if polished_values.is_some() != (status == SlabStatus::Polished) {
            return Err(DomainError::invariant(
                "polishedValues must be present exactly when polished",
            ));
        }
        Ok(Self {
            id,
            block_id,
            status,
            dimensions,
            trim,
            polished_values,
            version: 0,
        })
    }

    pub fn id_typed(&self) -> SlabId {
        self.id
    }

    pub fn block_id(&self) -> BlockId {
        self.block_id
    }

    pub fn status(&self) -> SlabStatus {
        self.status
    }

    pub fn dimensions(&self) -> &SlabDimensions {
        &self.dimensions
    }

    pub fn trim(&self) -> Option<&Trim> {
        self.trim.as_ref()
    }

    pub fn polished_values(&self) -> Option<&PolishedValues> {
        self.polished_values.as_ref()
    }

    pub fn allowed_actions(&self) -> &'static [SlabAction] {
        allowed_slab_actions(self.status)
    }

    /// Polishing pay row; `None` until a trim has been recorded.
    pub fn costing(&self, rate_per_sq_ft: f64) -> Option<PolishingCosting> {
        self.trim
            .as_ref()
            .map(|trim| polishing_costing(&self.dimensions, trim, rate_per_sq_ft))
    }
}

/// "Total SQF" footer. Slabs without a trim contribute nothing.
pub fn total_square_feet(slabs: &[Slab]) -> String {
    aggregate_display(slabs, |slab| {
        slab.costing(0.0).map(|c| c.square_feet).unwrap_or_default()
    })
}

/// "Total Amount" footer at `rate_per_sq_ft`.
pub fn total_amount(slabs: &[Slab], rate_per_sq_ft: f64) -> String {
    aggregate_display(slabs, |slab| {
        slab.costing(rate_per_sq_ft)
            .map(|c| c.amount)
            .unwrap_or_default()
    })
}

impl AggregateRoot for Slab {
    type Id = SlabId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

impl Entity for Slab {
    type Id = SlabId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Owned for Slab {
    type ParentId = BlockId;

    fn parent_id(&self) -> &Self::ParentId {
        &self.block_id
    }
}

/// Command: SetTrim. Trim is write-once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetTrim {
    pub slab_id: SlabId,
    pub trim: Trim,
    pub occurred_at: DateTime<Utc>,
}

/// Command: MarkPolish (submit polished values).
///
/// `trim` may be supplied here when it was not recorded beforehand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkPolish {
    pub slab_id: SlabId,
    pub polished_values: Option<PolishedValues>,
    #[serde(default)]
    pub trim: Option<Trim>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SlabCommand {
    SetTrim(SetTrim),
    MarkPolish(MarkPolish),
    View { slab_id: SlabId },
    Delete { slab_id: SlabId },
}

impl SlabCommand {
    pub fn action(&self) -> Option<SlabAction> {
        match self {
            SlabCommand::SetTrim(_) => None,
            SlabCommand::MarkPolish(_) => Some(SlabAction::MarkPolish),
            SlabCommand::View { .. } => Some(SlabAction::View),
            SlabCommand::Delete { .. } => Some(SlabAction::Delete),
        }
    }

    pub fn slab_id(&self) -> SlabId {
        match self {
            SlabCommand::SetTrim(c) => c.slab_id,
            SlabCommand::MarkPolish(c) => c.slab_id,
            SlabCommand::View { slab_id } | SlabCommand::Delete { slab_id } => *slab_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SlabEvent {
    TrimSet {
        slab_id: SlabId,
        trim: Trim,
        occurred_at: DateTime<Utc>,
    },
    Polished {
        slab_id: SlabId,
        polished_values: PolishedValues,
        /// Set only when the trim was recorded together with the polish.
        trim: Option<Trim>,
        occurred_at: DateTime<Utc>,
    },
}

impl Event for SlabEvent {
    fn event_type(&self) -> &'static str {
        match self {
            SlabEvent::TrimSet { .. } => "slabs.slab.trim_set",
            SlabEvent::Polished { .. } => "slabs.slab.polished",
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            SlabEvent::TrimSet { occurred_at, .. } | SlabEvent::Polished { occurred_at, .. } => {
                *occurred_at
            }
        }
    }
}

impl Aggregate for Slab {
    type Command = SlabCommand;
    type Event = SlabEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            SlabEvent::TrimSet { trim, .. } => self.trim = Some(*trim),
            SlabEvent::Polished {
                polished_values,
                trim,
                ..
            } => {
                if let Some(t) = trim {
                    self.trim = Some(*t);
                }
                self.polished_values = Some(*polished_values);
                self.status = SlabStatus::Polished;
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        if self.id != command.slab_id() {
            return Err(DomainError::invariant("slab_id mismatch"));
        }
        if let Some(action) = command.action() {
            if !is_slab_action_allowed(self.status, action) {
                return Err(DomainError::invalid_transition(self.status, action));
            }
        }

        match command {
            SlabCommand::SetTrim(cmd) => self.handle_set_trim(cmd),
            SlabCommand::MarkPolish(cmd) => self.handle_mark_polish(cmd),
            SlabCommand::View { .. } | SlabCommand::Delete { .. } => Ok(Vec::new()),
        }
    }
}

impl Slab {
    fn handle_set_trim(&self, cmd: &SetTrim) -> Result<Vec<SlabEvent>, DomainError> {
        if self.status == SlabStatus::Polished {
            return Err(DomainError::invariant("slab is already polished"));
        }
        if self.trim.is_some() {
            return Err(DomainError::invariant("trim is immutable once set"));
        }
        cmd.trim.validate()?;

        Ok(vec![SlabEvent::TrimSet {
            slab_id: cmd.slab_id,
            trim: cmd.trim,
            occurred_at: cmd.occurred_at,
        }])
    }

    fn handle_mark_polish(&self, cmd: &MarkPolish) -> Result<Vec<SlabEvent>, DomainError> {
        let polished = cmd
            .polished_values
            .ok_or_else(|| DomainError::missing_measurement("polishedValues"))?;
        polished.validate()?;

        let new_trim = match (&self.trim, &cmd.trim) {
            (Some(current), Some(submitted)) if current != submitted => {
                return Err(DomainError::invariant("trim is immutable once set"));
            }
            (Some(_), _) => None,
            (None, Some(submitted)) => {
                submitted.validate()?;
                Some(*submitted)
            }
            (None, None) => return Err(DomainError::missing_measurement("trim")),
        };

        Ok(vec![SlabEvent::Polished {
            slab_id: cmd.slab_id,
            polished_values: polished,
            trim: new_trim,
            occurred_at: cmd.occurred_at,
        }])
    }
}
