//! Maximum flow via Ford-Fulkerson with depth-first augmenting paths.
//!
//! Arcs are explored in ascending head-id order, so the path sequence is
//! reproducible. No polynomial bound on the number of augmentations.

use roadflow_core::Result;

use crate::residual::{ArcIndex, Augmenter, ResidualNetwork};

pub(crate) fn run(
    net: &mut ResidualNetwork,
    source: usize,
    sink: usize,
    augmenter: &mut Augmenter<'_>,
) -> Result<f64> {
    let n = net.node_count();
    let mut visited = vec![false; n];
    let mut cursor = vec![0usize; n];
    let mut path: Vec<ArcIndex> = Vec::new();
    let mut total = 0.0;

    loop {
        augmenter.checkpoint()?;

        visited.fill(false);
        cursor.fill(0);
        if !find_path(net, source, sink, &mut visited, &mut cursor, &mut path) {
            break;
        }

        total += augmenter.push(net, source, &path);
    }

    Ok(total)
}

fn find_path(
    net: &ResidualNetwork,
    source: usize,
    sink: usize,
    visited: &mut [bool],
    cursor: &mut [usize],
    path: &mut Vec<ArcIndex>,
) -> bool {
    path.clear();
    visited[source] = true;
    let mut u = source;

    loop {
        if u == sink {
            return true;
        }

        let arcs = net.arcs(u);
        let mut advanced = false;
        while cursor[u] < arcs.len() {
            let a = arcs[cursor[u]];
            cursor[u] += 1;
            let v = net.head(a);
            if !visited[v] && net.open(a) {
                visited[v] = true;
                path.push(a);
                u = v;
                advanced = true;
                break;
            }
        }

        if !advanced {
            match path.pop() {
                Some(a) => u = net.tail(a),
                None => return false,
            }
        }
    }
}
