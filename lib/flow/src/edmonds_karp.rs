//! Maximum flow via Edmonds-Karp (BFS-based Ford-Fulkerson).
//!
//! Each round augments along a shortest augmenting path in edge count.
//! Time: O(V * E^2).

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
    let mut parent: Vec<ArcIndex> = vec![NONE; n];
    let mut visited = vec![false; n];
    let mut queue = VecDeque::with_capacity(n);
    let mut path: Vec<ArcIndex> = Vec::new();
    let mut total = 0.0;

    loop {
        augmenter.checkpoint()?;

        visited.fill(false);
        queue.clear();
        visited[source] = true;
        queue.push_back(source);

        'bfs: while let Some(u) = queue.pop_front() {
            for &a in net.arcs(u) {
                let v = net.head(a);
                if !visited[v] && net.open(a) {
                    visited[v] = true;
                    parent[v] = a;
                    if v == sink {
                        break 'bfs;
                    }
                    queue.push_back(v);
                }
            }
        }

        if !visited[sink] {
            break;
        }

        path.clear();
        let mut v = sink;
        while v != source {
            let a = parent[v];
            path.push(a);
            v = net.tail(a);
        }
        path.reverse();

        total += augmenter.push(net, source, &path);
    }

    Ok(total)
}
