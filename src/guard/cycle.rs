use ahash::AHashMap;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnPath,
    Done,
}

/// Finds a directed cycle, returned as the node path that closes on itself
/// (`a -> b -> a`). Nodes and edges are visited in declaration order so the
/// reported cycle is deterministic.
pub(super) fn find_cycle<'a>(
    node_ids: &[&'a str],
    edges: &[(&'a str, &'a str)],
) -> Option<Vec<String>> {
    let mut adjacency: AHashMap<&'a str, Vec<&'a str>> = AHashMap::new();
    for &(from, to) in edges {
        adjacency.entry(from).or_default().push(to);
    }
    let mut marks: AHashMap<&'a str, Mark> =
        node_ids.iter().map(|id| (*id, Mark::Unvisited)).collect();

    for &start in node_ids {
        if marks.get(start) != Some(&Mark::Unvisited) {
            continue;
        }
        // Iterative DFS: each frame is (node, index of next child to visit).
        let mut path: Vec<&'a str> = vec![start];
        let mut frames: Vec<(&'a str, usize)> = vec![(start, 0)];
        marks.insert(start, Mark::OnPath);

        while let Some(&(node, next)) = frames.last() {
            let child = adjacency.get(node).and_then(|c| c.get(next)).copied();
            let Some(child) = child else {
                marks.insert(node, Mark::Done);
                path.pop();
                frames.pop();
                continue;
            };
            if let Some(frame) = frames.last_mut() {
                frame.1 += 1;
            }
            match marks.get(child).copied().unwrap_or(Mark::Done) {
                Mark::OnPath => {
                    let from = path.iter().position(|p| *p == child).unwrap_or(0);
                    let mut cycle: Vec<String> =
                        path[from..].iter().map(|s| s.to_string()).collect();
                    cycle.push(child.to_string());
                    return Some(cycle);
                }
                Mark::Unvisited => {
                    marks.insert(child, Mark::OnPath);
                    path.push(child);
                    frames.push((child, 0));
                }
                Mark::Done => {}
            }
        }
    }
    None
}
