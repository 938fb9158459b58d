//! Equal-split share allocation.
//!
//! The total is divided by the number of listed participants, resolved or not,
//! with no rounding and no remainder redistribution. An unresolved participant
//! gets no share, so the owed shares of the remaining entries can sum to less
//! than the total; such names are reported in [`Allocation::unresolved`].

use thiserror::Error;

use crate::directory::IdentityDirectory;
use crate::models::ShareEntry;

/// Errors that make an allocation impossible.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AllocationError {
    #[error("cannot split an expense among zero participants")]
    NoParticipants,

    #[error("invalid expense amount: {0}")]
    InvalidAmount(f64),

    #[error("participant '{0}' does not match the current user or any friend")]
    UnresolvedParticipant(String),
}

/// What to do with a participant name that has no directory match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AllocationPolicy {
    /// Skip the participant and report the name in [`Allocation::unresolved`].
    #[default]
    SkipUnresolved,
    /// Fail with [`AllocationError::UnresolvedParticipant`].
    Strict,
}

/// Shares for the resolvable participants plus the names that were skipped.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Allocation {
    pub shares: Vec<ShareEntry>,
    pub unresolved: Vec<String>,
}

impl Allocation {
    pub fn total_paid(&self) -> f64 {
        self.shares.iter().map(|s| s.paid_share).sum()
    }

    pub fn total_owed(&self) -> f64 {
        self.shares.iter().map(|s| s.owed_share).sum()
    }

    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Splits `total` equally among `participants`, crediting the full amount to `payer`.
///
/// Shares follow the participant order. The payer is matched by name, or by
/// resolved id when `payer` and a participant name the same person; only the
/// first match is credited. A resolvable payer missing from `participants` is
/// appended with the full payment and no owed share.
pub fn allocate(
    directory: &IdentityDirectory,
    participants: &[String],
    payer: &str,
    total: f64,
    policy: AllocationPolicy,
) -> Result<Allocation, AllocationError> {
    if participants.is_empty() {
        return Err(AllocationError::NoParticipants);
    }
    if !total.is_finite() || total < 0.0 {
        return Err(AllocationError::InvalidAmount(total));
    }

    let contribution = total / participants.len() as f64;
    let payer_id = directory.lookup(payer);
    let mut payer_credited = false;
    let mut allocation = Allocation::default();

    for name in participants {
        let Some(user_id) = directory.lookup(name) else {
            if policy == AllocationPolicy::Strict {
                return Err(AllocationError::UnresolvedParticipant(name.clone()));
            }
            tracing::warn!("Skipping participant '{}': no matching friend", name);
            allocation.unresolved.push(name.clone());
            continue;
        };

        let is_payer = !payer_credited && (name == payer || payer_id == Some(user_id));
        let paid_share = if is_payer {
            payer_credited = true;
            total
        } else {
            0.0
        };

        allocation.shares.push(ShareEntry {
            user_id,
            paid_share,
            owed_share: contribution,
        });
    }

    if !payer_credited {
        match payer_id {
            Some(user_id) => allocation.shares.push(ShareEntry {
                user_id,
                paid_share: total,
                owed_share: 0.0,
            }),
            None => tracing::warn!("Payer '{}' does not match any friend", payer),
        }
    }

    Ok(allocation)
}
