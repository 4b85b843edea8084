//! Connection ID assignment (spec.md §6): a trivial helper, not part of the
//! routing core proper, but the natural home for it in this crate.
use std::collections::HashSet;

use crate::node::{Connection, ConnectionId};

/// Ensures every connection has a unique, non-zero-unless-reassigned id.
///
/// - If every id is `0`, or any *non-zero* id repeats, every connection is
///   reassigned by its index in `connections` (`0..N`). A repeated `0` is
///   not itself a trigger for this branch: `0` is the "unassigned" sentinel,
///   not a real id, so multiple unassigned connections coexisting is the
///   normal case, not a collision.
/// - Otherwise, non-zero ids are left untouched and every `0` is replaced
///   with the smallest id not already in use. `0` itself is never handed
///   out as a replacement value in this branch (it is reserved as the
///   sentinel); candidates start at `1`.
pub fn assign_connection_ids(connections: &mut [Connection]) {
    let all_zero = connections.iter().all(|c| c.id == 0);

    let mut seen = HashSet::new();
    let has_nonzero_duplicate = connections
        .iter()
        .filter(|c| c.id != 0)
        .any(|c| !seen.insert(c.id));

    if all_zero || has_nonzero_duplicate {
        for (index, connection) in connections.iter_mut().enumerate() {
            connection.id = index as ConnectionId;
        }
        return;
    }

    let mut used: HashSet<ConnectionId> = connections.iter().filter(|c| c.id != 0).map(|c| c.id).collect();
    let mut next: ConnectionId = 1;

    for connection in connections.iter_mut() {
        if connection.id == 0 {
            while used.contains(&next) {
                next += 1;
            }
            connection.id = next;
            used.insert(next);
            next += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conns(ids: &[ConnectionId]) -> Vec<Connection> {
        ids.iter().map(|&id| Connection::new(id, 0, 1)).collect()
    }

    fn ids_of(connections: &[Connection]) -> Vec<ConnectionId> {
        connections.iter().map(|c| c.id).collect()
    }

    #[test]
    fn scenario_f_all_zero_reassigned_by_index() {
        let mut connections = conns(&[0, 0, 0]);
        assign_connection_ids(&mut connections);

        assert_eq!(ids_of(&connections), vec![0, 1, 2]);
    }

    #[test]
    fn scenario_f_gap_filled_with_smallest_unused() {
        let mut connections = conns(&[5, 0, 7]);
        assign_connection_ids(&mut connections);

        assert_eq!(ids_of(&connections), vec![5, 1, 7]);
    }

    #[test]
    fn scenario_f_nonzero_duplicate_forces_full_reassignment() {
        let mut connections = conns(&[5, 5, 7]);
        assign_connection_ids(&mut connections);

        assert_eq!(ids_of(&connections), vec![0, 1, 2]);
    }

    #[test]
    fn already_unique_nonzero_ids_are_untouched() {
        let mut connections = conns(&[5, 3, 7]);
        assign_connection_ids(&mut connections);

        assert_eq!(ids_of(&connections), vec![5, 3, 7]);
    }
}
