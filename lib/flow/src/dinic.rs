//! Maximum flow via Dinic's algorithm.
//!
//! Each phase builds a BFS level graph and saturates it with a blocking
//! flow found by depth-first search over arcs that climb exactly one level.
//! Per-node current-arc pointers make every dead end visited once per phase.
//! Time: O(V^2 * E).

use std::collections::VecDeque;

use roadflow_core::Result;

use crate::residual::{ArcIndex, Augmenter, ResidualNetwork, NONE};

pub(crate) fn run(
    net: &mut ResidualNetwork,
    source: usize,
    sink: usize,
    augmenter: &mut Augmenter<'_>,
) -> Result<f64> {
    let n = net.node_count();
    let mut level = vec![NONE; n];
    let mut cursor = vec![0usize; n];
    let mut queue = VecDeque::with_capacity(n);
    let mut path: Vec<ArcIndex> = Vec::new();
    let mut total = 0.0;

    loop {
        augmenter.checkpoint()?;

        if !build_levels(net, source, sink, &mut level, &mut queue) {
            break;
        }

        cursor.fill(0);
        while next_path(net, source, sink, &level, &mut cursor, &mut path) {
            total += augmenter.push(net, source, &path);
            augmenter.checkpoint()?;
        }
    }

    Ok(total)
}

/// BFS distances from `source` over open arcs; false when `sink` is unreachable
fn build_levels(
    net: &ResidualNetwork,
    source: usize,
    sink: usize,
    level: &mut [usize],
    queue: &mut VecDeque<usize>,
) -> bool {
    level.fill(NONE);
    queue.clear();
    level[source] = 0;
    queue.push_back(source);

    while let Some(u) = queue.pop_front() {
        for &a in net.arcs(u) {
            let v = net.head(a);
            if level[v] == NONE && net.open(a) {
                level[v] = level[u] + 1;
                queue.push_back(v);
            }
        }
    }

    level[sink] != NONE
}

/// Iterative DFS for one source-to-sink path in the level graph.
/// Leaves the arcs in `path` and returns false once the phase is blocked.
fn next_path(
    net: &ResidualNetwork,
    source: usize,
    sink: usize,
    level: &[usize],
    cursor: &mut [usize],
    path: &mut Vec<ArcIndex>,
) -> bool {
    path.clear();
    let mut u = source;

    loop {
        if u == sink {
            return true;
        }

        let arcs = net.arcs(u);
        let mut advanced = false;
        while cursor[u] < arcs.len() {
            let a = arcs[cursor[u]];
            let v = net.head(a);
            if net.open(a) && level[v] != NONE && level[v] == level[u] + 1 {
                path.push(a);
                u = v;
                advanced = true;
                break;
            }
            cursor[u] += 1;
        }

        if !advanced {
            // dead end: retreat and skip the arc that led here
            match path.pop() {
                Some(a) => {
                    u = net.tail(a);
                    cursor[u] += 1;
                }
                None => return false,
            }
        }
    }
}
