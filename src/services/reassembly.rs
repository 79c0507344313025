//! Reconstructing documents from retrieved chunk sets.

use std::collections::HashMap;

use crate::models::{ReassembledDocument, RetrievedChunk};

/// Group retrieved chunks by origin and rebuild each document's chunk
/// sequence in original order.
///
/// A pure, stateless fold: the input may be partial, unordered, and mixed
/// across origins. Documents come back in retrieval-rank order (first
/// match of each origin wins its position). When matches of one origin
/// disagree on `total`, the maximum is reconciled across the whole group
/// before any chunk is placed, so the same set of matches produces the
/// same document regardless of arrival order. A match whose `index`
/// falls outside the reconciled slot vector is dropped without error;
/// a slot that is already filled keeps its first value.
pub fn reassemble(matches: &[RetrievedChunk]) -> Vec<ReassembledDocument> {
    let mut order: Vec<String> = Vec::new();
    let mut totals: HashMap<String, usize> = HashMap::new();

    for m in matches {
        let total = m.total.max(1) as usize;
        totals
            .entry(m.origin_id.clone())
            .and_modify(|t| *t = (*t).max(total))
            .or_insert_with(|| {
                order.push(m.origin_id.clone());
                total
            });
    }

    let mut groups: HashMap<String, ReassembledDocument> = HashMap::new();

    for m in matches {
        let total = totals.get(&m.origin_id).copied().unwrap_or(1);
        let entry = groups.entry(m.origin_id.clone()).or_insert_with(|| {
            let mut doc = ReassembledDocument::new(m.origin_id.clone());
            doc.slots.resize(total, None);
            doc
        });

        let index = m.index as usize;
        if index >= entry.slots.len() {
            tracing::warn!(
                origin_id = %m.origin_id,
                index = m.index,
                total = m.total,
                "dropping chunk with out-of-range index"
            );
            continue;
        }

        if entry.slots[index].is_none() {
            entry.slots[index] = Some(m.text.clone());
        }
    }

    order
        .into_iter()
        .filter_map(|origin_id| groups.remove(&origin_id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(origin_id: &str, index: u32, total: u32, text: &str) -> RetrievedChunk {
        RetrievedChunk {
            record_id: format!("{origin_id}_{index}"),
            score: 0.9,
            origin_id: origin_id.to_string(),
            text: text.to_string(),
            index,
            total,
        }
    }

    #[test]
    fn test_reassemble_two_chunks() {
        let matches = vec![chunk("doc1", 0, 2, "Hello "), chunk("doc1", 1, 2, "world")];
        let docs = reassemble(&matches);

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].origin_id, "doc1");
        assert_eq!(docs[0].text(), "Hello world");
    }

    #[test]
    fn test_reassemble_unordered_input() {
        let matches = vec![
            chunk("doc1", 2, 3, "c"),
            chunk("doc1", 0, 3, "a"),
            chunk("doc1", 1, 3, "b"),
        ];
        let docs = reassemble(&matches);

        assert_eq!(docs[0].text(), "abc");
    }

    #[test]
    fn test_out_of_range_index_dropped() {
        let matches = vec![chunk("doc1", 0, 2, "Hello "), chunk("doc1", 5, 2, "stray")];
        let docs = reassemble(&matches);

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].total(), 2);
        assert_eq!(docs[0].text(), "Hello ");
    }

    #[test]
    fn test_missing_positions_stay_empty() {
        let matches = vec![chunk("doc1", 1, 2, "world")];
        let docs = reassemble(&matches);

        assert_eq!(docs[0].total(), 2);
        assert_eq!(docs[0].slots[0], None);
        assert_eq!(docs[0].slots[1].as_deref(), Some("world"));
        assert_eq!(docs[0].text(), "world");
    }

    #[test]
    fn test_disagreeing_totals_take_maximum() {
        let matches = vec![
            chunk("doc1", 0, 2, "a"),
            chunk("doc1", 3, 4, "d"),
            chunk("doc1", 1, 2, "b"),
        ];
        let docs = reassemble(&matches);

        assert_eq!(docs[0].total(), 4);
        assert_eq!(docs[0].text(), "abd");
    }

    #[test]
    fn test_total_reconciliation_is_order_independent() {
        // The second chunk claims a smaller total than its own index; it
        // is placeable only because the group's maximum wins, and that
        // must hold whichever chunk is retrieved first.
        let forward = vec![chunk("doc1", 0, 5, "a"), chunk("doc1", 3, 2, "d")];
        let reversed = vec![chunk("doc1", 3, 2, "d"), chunk("doc1", 0, 5, "a")];

        let forward_docs = reassemble(&forward);
        let reversed_docs = reassemble(&reversed);

        assert_eq!(forward_docs[0].total(), 5);
        assert_eq!(reversed_docs[0].total(), 5);
        assert_eq!(forward_docs[0].text(), "ad");
        assert_eq!(reversed_docs[0].text(), "ad");
    }

    #[test]
    fn test_first_value_kept_on_duplicate_index() {
        let matches = vec![chunk("doc1", 0, 1, "first"), chunk("doc1", 0, 1, "second")];
        let docs = reassemble(&matches);

        assert_eq!(docs[0].text(), "first");
    }

    #[test]
    fn test_multiple_origins_keep_rank_order() {
        let matches = vec![
            chunk("doc2", 0, 1, "beta"),
            chunk("doc1", 0, 2, "al"),
            chunk("doc1", 1, 2, "pha"),
        ];
        let docs = reassemble(&matches);

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].origin_id, "doc2");
        assert_eq!(docs[0].text(), "beta");
        assert_eq!(docs[1].origin_id, "doc1");
        assert_eq!(docs[1].text(), "alpha");
    }

    #[test]
    fn test_empty_input() {
        assert!(reassemble(&[]).is_empty());
    }
}
