use crate::algorithms::common::{reconstruct_path, SearchResult};
use crate::environment::Environment;
use crate::error::SearchError;
use crate::grid::Position;
use rustc_hash::{FxHashMap, FxHashSet};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Priority of a frontier entry. Lower priority pops first; on equal
/// priority the entry with the larger `g` (closer to the goal under A*) wins,
/// then insertion order.
/// We implement Ord in reverse to make the BinaryHeap a min-heap.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Key {
    priority: u64,
    g: u64,
    sequence: u64,
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| self.g.cmp(&other.g))
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

#[derive(Debug)]
struct Entry {
    key: Key,
    pos: Position,
    depth: u64,
    parent: Option<Position>,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

/// Cost-ordered graph search shared by uniform-cost and A*.
///
/// Entries are ordered by `g + heuristic(pos)`. A cell is finalized the first
/// time it is popped; later pops of the same cell are stale and skipped
/// without counting as an expansion. A neighbor is only pushed when it
/// improves on the best known `g`.
pub(crate) fn best_first<E, H>(
    env: &E,
    start: Position,
    goal: Position,
    time_step: u64,
    heuristic: H,
) -> Result<SearchResult, SearchError>
where
    E: Environment + ?Sized,
    H: Fn(Position) -> u64,
{
    let mut open = BinaryHeap::new();
    let mut best_g: FxHashMap<Position, u64> = FxHashMap::default();
    let mut closed: FxHashSet<Position> = FxHashSet::default();
    let mut parents: FxHashMap<Position, Position> = FxHashMap::default();
    let mut sequence = 0u64;
    let mut nodes_expanded = 0;

    best_g.insert(start, 0);
    open.push(Entry {
        key: Key {
            priority: heuristic(start),
            g: 0,
            sequence,
        },
        pos: start,
        depth: 0,
        parent: None,
    });

    while let Some(entry) = open.pop() {
        if !closed.insert(entry.pos) {
            continue;
        }
        nodes_expanded += 1;
        if let Some(parent) = entry.parent {
            parents.insert(entry.pos, parent);
        }

        if entry.pos == goal {
            let path = reconstruct_path(&parents, goal);
            return Ok(SearchResult::found(path, entry.key.g, nodes_expanded));
        }

        // Neighbors are checked at the tick the agent would arrive on them.
        let arrival = time_step + entry.depth + 1;
        for (next, step_cost) in env.neighbors(entry.pos, arrival) {
            if closed.contains(&next) {
                continue;
            }
            let g = entry.key.g + u64::from(step_cost);
            if best_g.get(&next).is_some_and(|&known| g >= known) {
                continue;
            }
            best_g.insert(next, g);
            sequence += 1;
            open.push(Entry {
                key: Key {
                    priority: g + heuristic(next),
                    g,
                    sequence,
                },
                pos: next,
                depth: entry.depth + 1,
                parent: Some(entry.pos),
            });
        }
    }

    Ok(SearchResult::unreachable(nodes_expanded))
}
