/// Hierarchical planner (spec section 4.6): A* over the abstract graph,
/// then within-component A* refinement between entry and exit cells.
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::components::diagonally_connected;
use crate::constants::{AXIAL_COST, DIAGONAL_COST};
use crate::graph::{AbstractGraph, ColoredGrid};
use crate::grid::Grid;
use crate::types::{Cell, CellState, HeuristicKind, NodeId};

/// The result of a `plan` call (spec section 6's Planner API).
#[derive(Clone, Debug, Default)]
pub struct PlanResult {
    pub abstract_path: Vec<NodeId>,
    pub detailed_path: Vec<Cell>,
    pub actual_end: Option<Cell>,
}

fn heuristic_cells(kind: HeuristicKind, a: Cell, b: Cell) -> f64 {
    match kind {
        HeuristicKind::Manhattan => a.manhattan(b) as f64,
        HeuristicKind::Chebyshev => a.chebyshev(b) as f64,
        HeuristicKind::Octile => {
            let dr = (a.row as i64 - b.row as i64).unsigned_abs() as f64;
            let dc = (a.col as i64 - b.col as i64).unsigned_abs() as f64;
            let dmax = dr.max(dc);
            let dmin = dr.min(dc);
            dmax + (std::f64::consts::SQRT_2 - 1.0) * dmin
        }
    }
}

#[derive(Copy, Clone, PartialEq)]
struct Scored<T: Copy> {
    cost: f64,
    order: usize,
    item: T,
}
impl<T: Copy> Eq for Scored<T> {}
impl<T: Copy> Ord for Scored<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap via BinaryHeap's max-heap, reversed; ties broken by
        // insertion order (spec section 4.6: "tie-breaks by insertion
        // order").
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.order.cmp(&self.order))
    }
}
impl<T: Copy> PartialOrd for Scored<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A* over the abstract graph with unit edge weights and a region-distance
/// heuristic (spec section 4.6 step 2).
fn abstract_astar(graph: &AbstractGraph, start: NodeId, goal: NodeId, heuristic: HeuristicKind) -> Option<Vec<NodeId>> {
    if start == goal {
        return Some(vec![start]);
    }
    let region_cell = |id: NodeId| Cell::new(id.region().0, id.region().1);
    let h = |id: NodeId| heuristic_cells(heuristic, region_cell(id), region_cell(goal));

    let mut open = BinaryHeap::new();
    let mut order_ctr = 0usize;
    let mut g_score: HashMap<NodeId, f64> = HashMap::new();
    let mut came_from: HashMap<NodeId, NodeId> = HashMap::new();

    g_score.insert(start, 0.0);
    open.push(Scored {
        cost: h(start),
        order: order_ctr,
        item: start,
    });

    let mut closed: HashSet<NodeId> = HashSet::new();

    while let Some(Scored { item: current, .. }) = open.pop() {
        if current == goal {
            let mut path = vec![current];
            let mut node = current;
            while let Some(&prev) = came_from.get(&node) {
                path.push(prev);
                node = prev;
            }
            path.reverse();
            return Some(path);
        }
        if !closed.insert(current) {
            continue;
        }
        let Some(node) = graph.nodes.get(&current) else {
            continue;
        };
        let current_g = g_score[&current];
        for &neighbor in &node.neighbors {
            if closed.contains(&neighbor) {
                continue;
            }
            let tentative = current_g + 1.0;
            if tentative < *g_score.get(&neighbor).unwrap_or(&f64::INFINITY) {
                g_score.insert(neighbor, tentative);
                came_from.insert(neighbor, current);
                order_ctr += 1;
                open.push(Scored {
                    cost: tentative + h(neighbor),
                    order: order_ctr,
                    item: neighbor,
                });
            }
        }
    }
    None
}

/// Within-component A*: 8-connected movement, axial cost 1, diagonal cost
/// sqrt(2), respecting the squeeze rule, restricted to `allowed` cells
/// (spec section 4.6). If `goal` is not in `allowed`, the search instead
/// targets the `allowed` cell nearest `goal` by the active heuristic.
fn local_astar(known: &Grid, start: Cell, goal: Cell, allowed: &HashSet<Cell>, heuristic: HeuristicKind) -> Option<(Vec<Cell>, Cell)> {
    if !allowed.contains(&start) {
        return None;
    }
    let effective_goal = if allowed.contains(&goal) {
        goal
    } else {
        *allowed
            .iter()
            .min_by(|a, b| {
                heuristic_cells(heuristic, **a, goal)
                    .partial_cmp(&heuristic_cells(heuristic, **b, goal))
                    .unwrap_or(Ordering::Equal)
            })
            .expect("allowed is non-empty because start is in it")
    };

    if start == effective_goal {
        return Some((vec![start], effective_goal));
    }

    let h = |c: Cell| heuristic_cells(heuristic, c, effective_goal);
    let mut open = BinaryHeap::new();
    let mut order_ctr = 0usize;
    let mut g_score: HashMap<Cell, f64> = HashMap::new();
    let mut came_from: HashMap<Cell, Cell> = HashMap::new();
    let mut closed: HashSet<Cell> = HashSet::new();

    g_score.insert(start, 0.0);
    open.push(Scored {
        cost: h(start),
        order: order_ctr,
        item: start,
    });

    const OFFSETS: [(i32, i32); 8] = [(-1, -1), (-1, 0), (-1, 1), (0, -1), (0, 1), (1, -1), (1, 0), (1, 1)];

    while let Some(Scored { item: current, .. }) = open.pop() {
        if current == effective_goal {
            let mut path = vec![current];
            let mut node = current;
            while let Some(&prev) = came_from.get(&node) {
                path.push(prev);
                node = prev;
            }
            path.reverse();
            return Some((path, effective_goal));
        }
        if !closed.insert(current) {
            continue;
        }
        let current_g = g_score[&current];
        for (dr, dc) in OFFSETS {
            let nr = current.row as i64 + dr as i64;
            let nc = current.col as i64 + dc as i64;
            if nr < 0 || nc < 0 {
                continue;
            }
            let neighbor = Cell::new(nr as usize, nc as usize);
            if !allowed.contains(&neighbor) || closed.contains(&neighbor) {
                continue;
            }
            if !known.is_walkable(neighbor) {
                continue;
            }
            if dr.abs() == 1 && dc.abs() == 1 && !diagonally_connected(known, current, neighbor) {
                continue;
            }
            let step_cost = if dr.abs() == 1 && dc.abs() == 1 { DIAGONAL_COST } else { AXIAL_COST };
            let tentative = current_g + step_cost;
            if tentative < *g_score.get(&neighbor).unwrap_or(&f64::INFINITY) {
                g_score.insert(neighbor, tentative);
                came_from.insert(neighbor, current);
                order_ctr += 1;
                open.push(Scored {
                    cost: tentative + h(neighbor),
                    order: order_ctr,
                    item: neighbor,
                });
            }
        }
    }
    None
}

/// Full hierarchical plan from `start` to `goal` (spec section 4.6 /
/// section 6's Planner API). Returns `None` if either endpoint has no
/// node, the abstract search fails, or any segment refinement fails.
pub fn plan(known: &Grid, graph: &AbstractGraph, colored: &ColoredGrid, start: Cell, goal: Cell, heuristic: HeuristicKind) -> Option<PlanResult> {
    let s_id = graph.node_containing(colored, start)?;
    let e_id = graph.node_containing(colored, goal)?;

    let abstract_path = abstract_astar(graph, s_id, e_id, heuristic)?;

    let mut detailed_path = Vec::new();
    let mut curr_pos = start;

    for window in abstract_path.windows(2) {
        let (u, v) = (window[0], window[1]);
        let u_node = graph.nodes.get(&u)?;
        let allowed: HashSet<Cell> = u_node.cells.iter().copied().collect();
        let transition = u_node.transitions.get(&v)?;

        let (segment, _) = local_astar(known, curr_pos, transition.from_cell, &allowed, heuristic)?;
        append_path(&mut detailed_path, &segment);
        if detailed_path.last() != Some(&transition.to_cell) {
            detailed_path.push(transition.to_cell);
        }
        curr_pos = transition.to_cell;
    }

    // Final segment, restricted to the terminal node's cells.
    let terminal = *abstract_path.last()?;
    let terminal_node = graph.nodes.get(&terminal)?;
    let allowed: HashSet<Cell> = terminal_node.cells.iter().copied().collect();
    let (segment, end) = local_astar(known, curr_pos, goal, &allowed, heuristic)?;
    append_path(&mut detailed_path, &segment);

    Some(PlanResult {
        abstract_path,
        detailed_path,
        actual_end: Some(end),
    })
}

fn append_path(dest: &mut Vec<Cell>, segment: &[Cell]) {
    if dest.last() == segment.first() {
        dest.extend_from_slice(&segment[1.min(segment.len())..]);
    } else {
        dest.extend_from_slice(segment);
    }
}

/// Ground distance between two consecutive path cells, used by the
/// path-admissibility property (spec section 8). `None` if they are not
/// 8-adjacent.
pub fn step_cost(a: Cell, b: Cell) -> Option<f64> {
    let dr = (b.row as i64 - a.row as i64).abs();
    let dc = (b.col as i64 - a.col as i64).abs();
    match (dr, dc) {
        (0, 1) | (1, 0) => Some(AXIAL_COST),
        (1, 1) => Some(DIAGONAL_COST),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::AbstractGraph;

    fn open_grid(size: usize) -> Grid {
        Grid::new(size, size, CellState::Walkable)
    }

    #[test]
    fn plan_within_single_component_is_direct() {
        let g = open_grid(8);
        let (graph, colored) = AbstractGraph::build(&g, 4);
        let result = plan(&g, &graph, &colored, Cell::new(0, 0), Cell::new(3, 3), HeuristicKind::Manhattan).unwrap();
        assert_eq!(result.detailed_path.first(), Some(&Cell::new(0, 0)));
        assert_eq!(result.detailed_path.last(), Some(&Cell::new(3, 3)));
        assert_eq!(result.actual_end, Some(Cell::new(3, 3)));
    }

    #[test]
    fn plan_across_regions_passes_through_the_gap() {
        // 16x16 grid, single wall row at r=7 except (7,8) walkable.
        let mut g = Grid::new(16, 16, CellState::Walkable);
        for c in 0..16 {
            g.set(Cell::new(7, c), CellState::Wall);
        }
        g.set(Cell::new(7, 8), CellState::Walkable);
        let (graph, colored) = AbstractGraph::build(&g, 8);

        let result = plan(&g, &graph, &colored, Cell::new(0, 0), Cell::new(15, 15), HeuristicKind::Manhattan).unwrap();
        assert_eq!(result.abstract_path.len(), 2);
        assert!(result.detailed_path.contains(&Cell::new(7, 8)));
        assert!(result.detailed_path.len() >= 22);
    }

    #[test]
    fn plan_respects_diagonal_squeeze() {
        let mut g = Grid::new(4, 4, CellState::Wall);
        g.set(Cell::new(1, 1), CellState::Walkable);
        g.set(Cell::new(2, 1), CellState::Walkable);
        g.set(Cell::new(2, 2), CellState::Walkable);
        let (graph, colored) = AbstractGraph::build(&g, 4);
        let result = plan(&g, &graph, &colored, Cell::new(1, 1), Cell::new(2, 2), HeuristicKind::Manhattan).unwrap();
        assert_eq!(result.detailed_path, vec![Cell::new(1, 1), Cell::new(2, 1), Cell::new(2, 2)]);
        let mut total = 0.0;
        for w in result.detailed_path.windows(2) {
            total += step_cost(w[0], w[1]).unwrap();
        }
        assert_eq!(total, 2.0);
    }

    #[test]
    fn plan_fails_when_goal_is_unknown() {
        let mut g = Grid::new(8, 8, CellState::Unknown);
        for r in 0..4 {
            for c in 0..8 {
                g.set(Cell::new(r, c), CellState::Walkable);
            }
        }
        let (graph, colored) = AbstractGraph::build(&g, 4);
        assert!(plan(&g, &graph, &colored, Cell::new(0, 0), Cell::new(7, 7), HeuristicKind::Manhattan).is_none());
    }

    #[test]
    fn forward_and_reverse_plans_have_equal_length() {
        let g = open_grid(8);
        let (graph, colored) = AbstractGraph::build(&g, 4);
        let a = plan(&g, &graph, &colored, Cell::new(0, 0), Cell::new(7, 7), HeuristicKind::Manhattan).unwrap();
        let b = plan(&g, &graph, &colored, Cell::new(7, 7), Cell::new(0, 0), HeuristicKind::Manhattan).unwrap();
        assert_eq!(a.detailed_path.len(), b.detailed_path.len());
    }
}
