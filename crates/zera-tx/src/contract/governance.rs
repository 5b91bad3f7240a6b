//! Governance settings attached to a contract.
//!
//! The required period fields depend on the governance type:
//!
//! | type      | proposal period | start timestamp | stages   |
//! |-----------|-----------------|-----------------|----------|
//! | staged    | required        | required        | required |
//! | cycle     | required        | required        | no       |
//! | staggered | required        | no              | no       |
//! | adaptive  | no              | no              | no       |

use crate::{fields, TxError};
use zera_types::amount::Policy;
use zera_types::constants::{QUORUM_EXP, THRESHOLD_EXP};
use zera_types::proto::{Governance, GovernanceType, ProposalPeriod, Stage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProposalPeriodConfig {
    pub period: ProposalPeriod,
    /// Length of the voting window in `period` units.
    pub voting_period: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageConfig {
    pub period: ProposalPeriod,
    pub length: u32,
    /// A break stage accepts no votes.
    pub is_break: bool,
    pub max_approved: u32,
}

#[derive(Debug, Clone)]
pub struct GovernanceConfig {
    pub kind: GovernanceType,
    pub proposal_period: Option<ProposalPeriodConfig>,
    pub stages: Vec<StageConfig>,
    /// Unix seconds of the first cycle.
    pub start_timestamp: Option<i64>,
    /// Percent, 0-100, two decimals kept.
    pub regular_quorum: String,
    pub fast_quorum: Option<String>,
    /// Percent, 0-100, one decimal kept.
    pub threshold: String,
    pub voting_instruments: Vec<String>,
    pub allowed_proposal_instruments: Vec<String>,
    /// Exactly one option always wins.
    pub always_winner: Option<bool>,
    pub allow_multi: bool,
}

impl GovernanceConfig {
    pub fn new(kind: GovernanceType, regular_quorum: &str, threshold: &str) -> Self {
        Self {
            kind,
            proposal_period: None,
            stages: Vec::new(),
            start_timestamp: None,
            regular_quorum: regular_quorum.to_string(),
            fast_quorum: None,
            threshold: threshold.to_string(),
            voting_instruments: Vec::new(),
            allowed_proposal_instruments: Vec::new(),
            always_winner: None,
            allow_multi: false,
        }
    }

    pub fn to_proto(&self) -> Result<Governance, TxError> {
        let regular_quorum =
            fields::percent_u32("governance.regular_quorum", &self.regular_quorum, QUORUM_EXP, Policy::Truncate)?;
        let fast_quorum = self
            .fast_quorum
            .as_deref()
            .map(|q| fields::percent_u32("governance.fast_quorum", q, QUORUM_EXP, Policy::Truncate))
            .transpose()?;
        let threshold = fields::percent_u32("governance.threshold", &self.threshold, THRESHOLD_EXP, Policy::Truncate)?;

        let needs_period = self.kind != GovernanceType::Adaptive;
        let needs_start = matches!(self.kind, GovernanceType::Staged | GovernanceType::Cycle);
        let staged = self.kind == GovernanceType::Staged;

        let (proposal_period, voting_period) = match (needs_period, self.proposal_period) {
            (true, Some(p)) => (Some(p.period as i32), Some(p.voting_period)),
            (true, None) => return Err(self.misconfigured("governance.proposal_period", "is required")),
            (false, Some(_)) => return Err(self.misconfigured("governance.proposal_period", "is not allowed")),
            (false, None) => (None, None),
        };

        let start_timestamp = match (needs_start, self.start_timestamp) {
            (true, Some(ts)) => Some(fields::unix_timestamp(ts)),
            (true, None) => return Err(self.misconfigured("governance.start_timestamp", "is required")),
            (false, Some(_)) => return Err(self.misconfigured("governance.start_timestamp", "is not allowed")),
            (false, None) => None,
        };

        if staged && self.stages.is_empty() {
            return Err(self.misconfigured("governance.stages", "are required"));
        }
        if !staged && !self.stages.is_empty() {
            return Err(self.misconfigured("governance.stages", "are not allowed"));
        }
        let stage_length = self
            .stages
            .iter()
            .enumerate()
            .map(|(i, stage)| {
                if stage.length == 0 {
                    return Err(TxError::invalid(format!("governance.stages[{}].length", i), "must be at least 1"));
                }
                if stage.max_approved == 0 {
                    return Err(TxError::invalid(
                        format!("governance.stages[{}].max_approved", i),
                        "must be at least 1",
                    ));
                }
                Ok(Stage {
                    length: stage.length,
                    period: stage.period as i32,
                    r#break: stage.is_break,
                    max_approved: stage.max_approved,
                })
            })
            .collect::<Result<Vec<_>, TxError>>()?;

        Ok(Governance {
            r#type: self.kind as i32,
            regular_quorum,
            fast_quorum,
            voting_instrument: self.voting_instruments.clone(),
            threshold,
            chicken_dinner: self.always_winner,
            allow_multi: self.allow_multi,
            voting_period,
            allowed_proposal_instrument: self.allowed_proposal_instruments.clone(),
            proposal_period,
            stage_length,
            start_timestamp,
        })
    }

    fn misconfigured(&self, field: &str, reason: &str) -> TxError {
        TxError::invalid(field, format!("{} for {:?} governance", reason, self.kind))
    }
}
