//! Dense sequential identity allocation.
//!
//! Each registry owns one [`IdSequence`]. The sequence hands out
//! [`SequentialId::FIRST`] and then every successor in order. Ids are never
//! reused and never skipped; a failed operation never consumes one because
//! allocation is the only thing that advances the counter.

use core::marker::PhantomData;

use civitas_types::{RegistryKind, SequentialId};

use crate::RegistryError;

/// Allocator for the ids of one registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdSequence<I> {
    /// Number of ids handed out so far. Also the value of the last id.
    issued: u64,
    kind: RegistryKind,
    _id: PhantomData<I>,
}

impl<I: SequentialId> IdSequence<I> {
    /// Create a sequence that has not issued anything yet.
    pub const fn new(kind: RegistryKind) -> Self {
        Self {
            issued: 0,
            kind,
            _id: PhantomData,
        }
    }

    /// Create a sequence that resumes after `issued` ids.
    ///
    /// Used when restoring a registry from a snapshot of `issued` records.
    pub const fn resume(kind: RegistryKind, issued: u64) -> Self {
        Self {
            issued,
            kind,
            _id: PhantomData,
        }
    }

    /// Return the id the next [`allocate`](Self::allocate) call produces.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::IdSpaceExhausted`] if the sequence is spent.
    pub fn peek(&self) -> Result<I, RegistryError> {
        self.issued
            .checked_add(1)
            .map(I::from_value)
            .ok_or(RegistryError::IdSpaceExhausted { kind: self.kind })
    }

    /// Allocate the next id.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::IdSpaceExhausted`] if the sequence is spent.
    pub fn allocate(&mut self) -> Result<I, RegistryError> {
        let id = self.peek()?;
        self.issued = id.value();
        Ok(id)
    }

    /// Return how many ids have been allocated.
    pub const fn issued(&self) -> u64 {
        self.issued
    }
}

/// Verify that `ids` are exactly `1..=N` in order and return `N`.
///
/// Snapshots are only accepted when they could have been produced by an
/// unbroken run of allocations.
pub(crate) fn dense_len<I: SequentialId>(
    kind: RegistryKind,
    ids: impl IntoIterator<Item = I>,
) -> Result<u64, RegistryError> {
    let mut expected = IdSequence::<I>::new(kind);
    for id in ids {
        let want = expected.allocate()?;
        if id != want {
            return Err(RegistryError::CorruptSnapshot {
                kind,
                reason: format!("expected id {want}, found {id}"),
            });
        }
    }
    Ok(expected.issued())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use civitas_types::{CivilizationId, TechnologyId};

    use super::*;

    #[test]
    fn allocates_dense_ids_from_one() {
        let mut seq = IdSequence::<CivilizationId>::new(RegistryKind::Civilization);
        let ids: Vec<u64> = (0..5).map(|_| seq.allocate().unwrap().value()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(seq.issued(), 5);
    }

    #[test]
    fn peek_does_not_consume() {
        let mut seq = IdSequence::<TechnologyId>::new(RegistryKind::Technology);
        assert_eq!(seq.peek().unwrap(), TechnologyId(1));
        assert_eq!(seq.peek().unwrap(), TechnologyId(1));
        assert_eq!(seq.allocate().unwrap(), TechnologyId(1));
        assert_eq!(seq.peek().unwrap(), TechnologyId(2));
    }

    #[test]
    fn resume_continues_after_issued() {
        let mut seq = IdSequence::<CivilizationId>::resume(RegistryKind::Civilization, 3);
        assert_eq!(seq.allocate().unwrap(), CivilizationId(4));
    }

    #[test]
    fn dense_len_accepts_unbroken_runs() {
        let ids = [CivilizationId(1), CivilizationId(2), CivilizationId(3)];
        assert_eq!(dense_len(RegistryKind::Civilization, ids).unwrap(), 3);
        assert_eq!(
            dense_len(RegistryKind::Civilization, Vec::<CivilizationId>::new()).unwrap(),
            0
        );
    }

    #[test]
    fn dense_len_rejects_gaps_and_reordering() {
        let gap = [TechnologyId(1), TechnologyId(3)];
        assert!(matches!(
            dense_len(RegistryKind::Technology, gap),
            Err(RegistryError::CorruptSnapshot { .. })
        ));
        let shuffled = [TechnologyId(2), TechnologyId(1)];
        assert!(dense_len(RegistryKind::Technology, shuffled).is_err());
    }

    #[test]
    fn exhausted_sequence_reports_error() {
        let mut seq = IdSequence::<TechnologyId>::resume(RegistryKind::Technology, u64::MAX);
        assert_eq!(
            seq.allocate(),
            Err(RegistryError::IdSpaceExhausted {
                kind: RegistryKind::Technology
            })
        );
        assert_eq!(seq.issued(), u64::MAX);
    }
}
