// src/engine/diff.rs

use crate::types::{ChangeSet, DigestRecord, DigestState};

/// Compare freshly computed digests against the stored ones.
///
/// Only resources present in both maps are compared. A resource missing from
/// `record` (it failed this run) is neither changed nor unchanged. The empty
/// placeholder is compared like any other digest, so a first successful hash
/// always counts as a change.
pub fn diff_digests(prior: &DigestState, record: &DigestRecord) -> ChangeSet {
    record
        .iter()
        .filter_map(|(id, new_digest)| match prior.get(id) {
            Some(old_digest) if old_digest != new_digest => {
                Some((id.clone(), new_digest.clone()))
            }
            _ => None,
        })
        .collect()
}

/// Write every successfully recomputed digest into `state`.
///
/// Resources absent from `record` keep their old digest; ids that are not
/// tracked in `state` are ignored.
pub fn apply_record(state: &mut DigestState, record: &DigestRecord) {
    for (id, digest) in record {
        if let Some(slot) = state.get_mut(id) {
            slot.clone_from(digest);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, &str)]) -> DigestState {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn reports_only_differing_digests() {
        let prior = map(&[("a", ""), ("b", "deadbeef"), ("c", "01")]);
        let record = map(&[("a", "111"), ("b", "deadbeef"), ("c", "02")]);

        assert_eq!(diff_digests(&prior, &record), map(&[("a", "111"), ("c", "02")]));
    }

    #[test]
    fn failed_resources_are_not_changes() {
        let prior = map(&[("a", "1"), ("b", "2")]);
        let record = map(&[("b", "2")]);

        assert!(diff_digests(&prior, &record).is_empty());
    }

    #[test]
    fn untracked_record_entries_are_ignored() {
        let prior = map(&[("a", "1")]);
        let record = map(&[("a", "1"), ("stray", "9")]);

        assert!(diff_digests(&prior, &record).is_empty());

        let mut state = prior.clone();
        apply_record(&mut state, &record);
        assert_eq!(state, prior);
    }

    #[test]
    fn apply_keeps_failed_digests() {
        let mut state = map(&[("a", "old-a"), ("b", "old-b")]);
        apply_record(&mut state, &map(&[("b", "new-b")]));

        assert_eq!(state, map(&[("a", "old-a"), ("b", "new-b")]));
    }
}
