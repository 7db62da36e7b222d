//! Structural grouping of flat starting-equipment records.
//!
//! Links every record to its containing AND/OR entry and rejects grouping
//! data that cannot form a tree. Item resolution happens later, over the
//! structure produced here.

use std::collections::HashMap;

use crate::entities::RawEntry;
use crate::error::DomainError;
use crate::ids::EntryId;

/// A recoverable oddity found while grouping records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForestIssue {
    /// The group id names no record; the entry was placed at the root
    UnknownGroup { entry: EntryId, group: EntryId },
    /// The group id names a record that is not AND/OR; placed at the root
    NonGroupingParent { entry: EntryId, group: EntryId },
    /// Explicit zero count, normalized to one
    ZeroCount { entry: EntryId },
}

/// A record and the records grouped under it, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryTree<'a> {
    pub entry: &'a RawEntry,
    pub children: Vec<EntryTree<'a>>,
}

impl EntryTree<'_> {
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(EntryTree::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Grouped records plus whatever had to be repaired on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryForest<'a> {
    pub roots: Vec<EntryTree<'a>>,
    pub issues: Vec<ForestIssue>,
}

impl<'a> EntryForest<'a> {
    /// Group flat records into trees.
    ///
    /// Fails with `MalformedGrouping` on duplicate ids, self references and
    /// group cycles. Unknown or non-grouping parents demote the entry to a
    /// root and are reported as issues.
    pub fn build(entries: &'a [RawEntry]) -> Result<Self, DomainError> {
        let mut positions: HashMap<&EntryId, usize> = HashMap::with_capacity(entries.len());
        for (idx, entry) in entries.iter().enumerate() {
            if positions.insert(&entry.id, idx).is_some() {
                return Err(DomainError::malformed_grouping(
                    entry.id.as_str(),
                    "duplicate entry id",
                ));
            }
        }

        let mut issues = Vec::new();
        let mut parents: Vec<Option<usize>> = Vec::with_capacity(entries.len());
        for entry in entries {
            if entry.count == Some(0) {
                issues.push(ForestIssue::ZeroCount {
                    entry: entry.id.clone(),
                });
            }

            let Some(group) = &entry.group else {
                parents.push(None);
                continue;
            };
            if group == &entry.id {
                return Err(DomainError::malformed_grouping(
                    entry.id.as_str(),
                    "entry names itself as its group",
                ));
            }
            match positions.get(group) {
                None => {
                    issues.push(ForestIssue::UnknownGroup {
                        entry: entry.id.clone(),
                        group: group.clone(),
                    });
                    parents.push(None);
                }
                Some(&idx) if !entries[idx].kind.is_grouping() => {
                    issues.push(ForestIssue::NonGroupingParent {
                        entry: entry.id.clone(),
                        group: group.clone(),
                    });
                    parents.push(None);
                }
                Some(&idx) => parents.push(Some(idx)),
            }
        }

        detect_cycles(entries, &parents)?;

        let mut children: Vec<Vec<usize>> = vec![Vec::new(); entries.len()];
        let mut roots = Vec::new();
        for (idx, parent) in parents.iter().enumerate() {
            match parent {
                Some(p) => children[*p].push(idx),
                None => roots.push(idx),
            }
        }

        let roots = roots
            .into_iter()
            .map(|idx| assemble(entries, &children, idx))
            .collect();
        Ok(Self { roots, issues })
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

/// Walk each parent chain; revisiting a node means the groups loop.
fn detect_cycles(entries: &[RawEntry], parents: &[Option<usize>]) -> Result<(), DomainError> {
    // 0 = unvisited, 1 = on current chain, 2 = known to reach a root
    let mut state = vec![0u8; entries.len()];
    for start in 0..entries.len() {
        let mut chain = Vec::new();
        let mut cursor = Some(start);
        while let Some(idx) = cursor {
            match state[idx] {
                2 => break,
                1 => {
                    return Err(DomainError::malformed_grouping(
                        entries[idx].id.as_str(),
                        "group references form a cycle",
                    ));
                }
                _ => {
                    state[idx] = 1;
                    chain.push(idx);
                    cursor = parents[idx];
                }
            }
        }
        for idx in chain {
            state[idx] = 2;
        }
    }
    Ok(())
}

fn assemble<'a>(entries: &'a [RawEntry], children: &[Vec<usize>], idx: usize) -> EntryTree<'a> {
    EntryTree {
        entry: &entries[idx],
        children: children[idx]
            .iter()
            .map(|child| assemble(entries, children, *child))
            .collect(),
    }
}
