use crate::graph::Quest;
use std::collections::{HashMap, HashSet};

/// Topological depth per quest id
pub type DepthMap = HashMap<String, usize>;

/// Compute the dependency depth of every quest in `quests`.
///
/// A quest without prerequisites has depth 0; any other quest sits one level
/// below its deepest prerequisite. Prerequisites outside `quests` are ignored.
/// A quest reached again while it is still being resolved (a cycle) contributes
/// depth 0 at that point instead of recursing.
pub fn compute_global_depths<'a>(quests: impl IntoIterator<Item = &'a Quest>) -> DepthMap {
    let by_id: HashMap<&str, &Quest> = quests.into_iter().map(|q| (q.id.as_str(), q)).collect();
    let mut order: Vec<&str> = by_id.keys().copied().collect();
    // Sorted so cycle fallbacks are stable
    order.sort_unstable();

    let mut memo = DepthMap::new();
    let mut visiting = HashSet::new();
    for id in order {
        depth_of(id, &by_id, &mut memo, &mut visiting);
    }
    memo
}

fn depth_of<'a>(
    id: &'a str,
    by_id: &HashMap<&'a str, &'a Quest>,
    memo: &mut DepthMap,
    visiting: &mut HashSet<&'a str>,
) -> usize {
    if let Some(&depth) = memo.get(id) {
        return depth;
    }
    if visiting.contains(id) {
        return 0;
    }
    let Some(&quest) = by_id.get(id) else {
        return 0;
    };

    visiting.insert(id);
    let depth = quest
        .depends_on
        .iter()
        .filter_map(|dep| by_id.get_key_value(dep.quest_id.as_str()).map(|(k, _)| *k))
        .map(|prereq| depth_of(prereq, by_id, memo, visiting) + 1)
        .max()
        .unwrap_or(0);
    visiting.remove(id);

    memo.insert(id.to_string(), depth);
    depth
}
