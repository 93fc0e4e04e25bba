/// Layered graph layout using a simplified Sugiyama algorithm, ranked left to right.
///
/// 1. Layer assignment: longest path from sources (topological depth)
/// 2. Crossing minimization: barycenter heuristic (forward + backward pass)
/// 3. Coordinate assignment: columns packed left to right, nodes stacked
///    top to bottom inside a column, each column centered on the tallest one
///
/// Positions are node centers, like most layered layout libraries report them.
use std::collections::{HashMap, VecDeque};

/// A node to place, sized in pixels
#[derive(Debug, Clone)]
pub struct LayeredNode {
    pub id: String,
    pub width: f64,
    pub height: f64,
}

/// Input graph: nodes in preferred initial order, edges as (from, to)
#[derive(Debug, Clone, Default)]
pub struct LayeredGraph {
    pub nodes: Vec<LayeredNode>,
    pub edges: Vec<(String, String)>,
}

impl LayeredGraph {
    pub fn add_node(&mut self, id: impl Into<String>, width: f64, height: f64) {
        self.nodes.push(LayeredNode {
            id: id.into(),
            width,
            height,
        });
    }

    pub fn add_edge(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.edges.push((from.into(), to.into()));
    }
}

/// Where a node ended up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Column index (0 = sources)
    pub rank: usize,
    pub center_x: f64,
    pub center_y: f64,
    pub width: f64,
    pub height: f64,
}

/// Spacing between nodes in a column and between columns
#[derive(Debug, Clone, Copy)]
pub struct Spacing {
    pub node_sep: f64,
    pub rank_sep: f64,
}

pub fn layout(graph: &LayeredGraph, spacing: Spacing) -> HashMap<String, Placement> {
    if graph.nodes.is_empty() {
        return HashMap::new();
    }

    let sizes: HashMap<&str, (f64, f64)> = graph
        .nodes
        .iter()
        .map(|n| (n.id.as_str(), (n.width, n.height)))
        .collect();
    let all_ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();

    let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut parents: HashMap<&str, Vec<&str>> = HashMap::new();
    for (from, to) in &graph.edges {
        // Self-loops and dangling edges carry no ordering information
        if from == to || !sizes.contains_key(from.as_str()) || !sizes.contains_key(to.as_str()) {
            continue;
        }
        children.entry(from.as_str()).or_default().push(to.as_str());
        parents.entry(to.as_str()).or_default().push(from.as_str());
    }

    // 1. Layer assignment via longest-path from sources
    let layers = assign_layers(&all_ids, &children, &parents);

    let max_layer = layers.values().copied().max().unwrap_or(0);
    let mut layer_groups: Vec<Vec<&str>> = vec![Vec::new(); max_layer + 1];
    for &id in &all_ids {
        let layer = layers.get(id).copied().unwrap_or(0);
        layer_groups[layer].push(id);
    }

    // 2. Crossing minimization via barycenter heuristic
    minimize_crossings(&mut layer_groups, &children, &parents);

    // 3. Coordinate assignment
    assign_coordinates(&layer_groups, &sizes, spacing)
}

// ── Layer assignment (longest path from sources) ────────────────────────

fn assign_layers<'a>(
    all_ids: &[&'a str],
    children: &HashMap<&str, Vec<&'a str>>,
    parents: &HashMap<&str, Vec<&'a str>>,
) -> HashMap<&'a str, usize> {
    let mut layers: HashMap<&str, usize> = HashMap::new();
    let mut in_degree: HashMap<&str, usize> = HashMap::new();

    for &id in all_ids {
        let deg = parents.get(id).map(|p| p.len()).unwrap_or(0);
        in_degree.insert(id, deg);
    }

    // BFS from sources (nodes with in_degree 0)
    let mut queue: VecDeque<&str> = VecDeque::new();
    for &id in all_ids {
        if in_degree[id] == 0 {
            queue.push_back(id);
            layers.insert(id, 0);
        }
    }

    while let Some(node) = queue.pop_front() {
        let node_layer = layers.get(node).copied().unwrap_or(0);
        if let Some(kids) = children.get(node) {
            for &kid in kids {
                // Assign max depth (longest path)
                let new_layer = node_layer + 1;
                let current = layers.entry(kid).or_insert(0);
                if new_layer > *current {
                    *current = new_layer;
                }
                // Enqueue once every parent has been processed
                if let Some(deg) = in_degree.get_mut(kid) {
                    *deg = deg.saturating_sub(1);
                    if *deg == 0 {
                        queue.push_back(kid);
                    }
                }
            }
        }
    }

    // Nodes on a cycle never reach in_degree 0; they keep whatever layer
    // their processed parents gave them, or 0
    for &id in all_ids {
        layers.entry(id).or_insert(0);
    }

    layers
}

// ── Crossing minimization (barycenter heuristic) ────────────────────────

fn minimize_crossings<'a>(
    layer_groups: &mut [Vec<&'a str>],
    children: &HashMap<&str, Vec<&'a str>>,
    parents: &HashMap<&str, Vec<&'a str>>,
) {
    if layer_groups.len() <= 1 {
        return;
    }

    let mut positions: Vec<HashMap<&str, usize>> =
        layer_groups.iter().map(|group| index_positions(group)).collect();

    // Forward pass: order each layer based on parents in previous layer
    for layer_idx in 1..layer_groups.len() {
        let ordered = order_by_barycenter(&layer_groups[layer_idx], parents, &positions[layer_idx - 1]);
        positions[layer_idx] = index_positions(&ordered);
        layer_groups[layer_idx] = ordered;
    }

    // Backward pass: order each layer based on children in next layer
    for layer_idx in (0..layer_groups.len() - 1).rev() {
        let ordered = order_by_barycenter(&layer_groups[layer_idx], children, &positions[layer_idx + 1]);
        positions[layer_idx] = index_positions(&ordered);
        layer_groups[layer_idx] = ordered;
    }
}

fn index_positions<'a>(group: &[&'a str]) -> HashMap<&'a str, usize> {
    group.iter().enumerate().map(|(i, &id)| (id, i)).collect()
}

/// Stable sort of `group` by the mean position of each node's neighbours in
/// the adjacent layer; nodes without neighbours there sink to the end.
fn order_by_barycenter<'a>(
    group: &[&'a str],
    neighbours: &HashMap<&str, Vec<&'a str>>,
    adjacent_positions: &HashMap<&str, usize>,
) -> Vec<&'a str> {
    let mut barycenters: Vec<(&str, f64)> = group
        .iter()
        .map(|&id| {
            let adjacent: Vec<f64> = neighbours
                .get(id)
                .map(|ns| {
                    ns.iter()
                        .filter_map(|n| adjacent_positions.get(n).map(|&pos| pos as f64))
                        .collect()
                })
                .unwrap_or_default();
            let bc = if adjacent.is_empty() {
                f64::MAX
            } else {
                adjacent.iter().sum::<f64>() / adjacent.len() as f64
            };
            (id, bc)
        })
        .collect();

    barycenters.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    barycenters.into_iter().map(|(id, _)| id).collect()
}

// ── Coordinate assignment ───────────────────────────────────────────────

fn assign_coordinates(
    layer_groups: &[Vec<&str>],
    sizes: &HashMap<&str, (f64, f64)>,
    spacing: Spacing,
) -> HashMap<String, Placement> {
    let size_of = |id: &str| sizes.get(id).copied().unwrap_or((0.0, 0.0));

    let column_heights: Vec<f64> = layer_groups
        .iter()
        .map(|group| {
            let content: f64 = group.iter().map(|&id| size_of(id).1).sum();
            content + spacing.node_sep * group.len().saturating_sub(1) as f64
        })
        .collect();
    let tallest = column_heights.iter().copied().fold(0.0, f64::max);

    let mut placements = HashMap::new();
    let mut column_x = 0.0;

    for (rank, group) in layer_groups.iter().enumerate() {
        if group.is_empty() {
            continue;
        }

        let column_width = group.iter().map(|&id| size_of(id).0).fold(0.0, f64::max);
        // Center each column on the tallest one
        let mut y = (tallest - column_heights[rank]) / 2.0;

        for &id in group {
            let (width, height) = size_of(id);
            placements.insert(
                id.to_string(),
                Placement {
                    rank,
                    center_x: column_x + column_width / 2.0,
                    center_y: y + height / 2.0,
                    width,
                    height,
                },
            );
            y += height + spacing.node_sep;
        }

        column_x += column_width + spacing.rank_sep;
    }

    placements
}
