/// Abstract graph (spec sections 3, 4.4) and incremental repair (spec
/// section 4.5). Nodes are (region, component) pairs; edges carry the
/// boundary-cell pair that realizes the transition.
use std::collections::{HashMap, HashSet};

use crate::components::{are_neighbors, region_components};
use crate::grid::Grid;
use crate::types::{Cell, NodeId, Transition};

/// One abstract-graph node: the cells of a single component, its
/// neighboring node ids, and the transition realizing each neighbor edge.
#[derive(Clone, Debug)]
pub struct Node {
    pub id: NodeId,
    pub cells: Vec<Cell>,
    pub neighbors: HashSet<NodeId>,
    pub transitions: HashMap<NodeId, Transition>,
}

impl Node {
    fn new(id: NodeId, cells: Vec<Cell>) -> Self {
        Self {
            id,
            cells,
            neighbors: HashSet::new(),
            transitions: HashMap::new(),
        }
    }
}

/// The auxiliary SIZE x SIZE array mapping each cell to its component id
/// within its region, or `None` if unassigned (spec section 3's "colored
/// grid"; -1 there is `None` here).
#[derive(Clone, Debug)]
pub struct ColoredGrid {
    width: usize,
    height: usize,
    colors: Vec<Option<u32>>,
}

impl ColoredGrid {
    pub fn blank(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            colors: vec![None; width * height],
        }
    }

    pub fn get(&self, cell: Cell) -> Option<u32> {
        self.colors[cell.row * self.width + cell.col]
    }

    fn set(&mut self, cell: Cell, local: Option<u32>) {
        let idx = cell.row * self.width + cell.col;
        self.colors[idx] = local;
    }
}

/// Mapping from node id to node record (spec section 3's "abstract graph
/// G"), plus the colored grid it was built against.
#[derive(Clone, Debug)]
pub struct AbstractGraph {
    pub nodes: HashMap<NodeId, Node>,
    pub region_size: usize,
}

impl AbstractGraph {
    /// A full rebuild from scratch: recompute components in every region,
    /// then every inter-region edge (spec section 4.4).
    pub fn build(known: &Grid, region_size: usize) -> (Self, ColoredGrid) {
        let mut graph = Self {
            nodes: HashMap::new(),
            region_size,
        };
        let mut colored = ColoredGrid::blank(known.width, known.height);
        let (region_rows, region_cols) = known.region_count(region_size);
        for rr in 0..region_rows {
            for rc in 0..region_cols {
                graph.recompute_region(known, &mut colored, rr, rc);
            }
        }
        graph.rebuild_edges(known);
        (graph, colored)
    }

    /// Recompute components (and colored-grid entries) for a single
    /// region, replacing whatever nodes it previously held. Does not touch
    /// edges; callers must follow with `rebuild_edges`.
    fn recompute_region(&mut self, known: &Grid, colored: &mut ColoredGrid, region_row: usize, region_col: usize) {
        self.nodes.retain(|id, _| id.region() != (region_row, region_col));
        for cell in known.region_cells(region_row, region_col, self.region_size) {
            colored.set(cell, None);
        }
        let components = region_components(known, region_row, region_col, self.region_size);
        for (local, members) in components.into_iter().enumerate() {
            let id = NodeId::new(region_row, region_col, local);
            for &cell in &members {
                colored.set(cell, Some(local as u32));
            }
            self.nodes.insert(id, Node::new(id, members));
        }
    }

    /// Incremental repair (spec section 4.5): recompute components only
    /// for regions containing a newly revealed walkable cell, then rebuild
    /// every edge. The contract is that the result equals a full rebuild;
    /// restricting the edge rescan to affected regions plus their
    /// 8-neighbors (as the spec's "production implementation" note
    /// permits) is an optimization this implementation does not take,
    /// trading some recompute cost for a simpler, manifestly-correct
    /// rebuild_edges (see DESIGN.md).
    pub fn repair(&mut self, known: &Grid, colored: &mut ColoredGrid, newly_walkable: &[Cell]) {
        let region_size = self.region_size;
        let mut regions: HashSet<(usize, usize)> = HashSet::new();
        for &cell in newly_walkable {
            regions.insert(cell.region(region_size));
        }
        if regions.is_empty() {
            return;
        }
        for (rr, rc) in regions {
            self.recompute_region(known, colored, rr, rc);
        }
        self.rebuild_edges(known);
    }

    /// Clear every node's neighbors/transitions, then rescan boundary cell
    /// pairs across the whole grid and reinsert edges (spec section 4.4).
    /// Multiple boundary pairs between the same two nodes keep only the
    /// first-discovered pair as the transition representative.
    fn rebuild_edges(&mut self, known: &Grid) {
        for node in self.nodes.values_mut() {
            node.neighbors.clear();
            node.transitions.clear();
        }

        let mut colored = ColoredGrid::blank(known.width, known.height);
        for node in self.nodes.values() {
            for &cell in &node.cells {
                colored.set(cell, Some(node.id.local));
            }
        }

        let region_size = self.region_size;
        let mut pending: Vec<(NodeId, NodeId, Transition)> = Vec::new();
        for node in self.nodes.values() {
            for &a in &node.cells {
                for (dr, dc) in [(-1i32, -1i32), (-1, 0), (-1, 1), (0, -1), (0, 1), (1, -1), (1, 0), (1, 1)] {
                    let nr = a.row as i64 + dr as i64;
                    let nc = a.col as i64 + dc as i64;
                    if nr < 0 || nc < 0 {
                        continue;
                    }
                    let b = Cell::new(nr as usize, nc as usize);
                    if !known.in_bounds(b) {
                        continue;
                    }
                    if b.region(region_size) == a.region(region_size) {
                        continue; // same region, not an inter-region edge
                    }
                    let Some(b_local) = colored.get(b) else {
                        continue;
                    };
                    if !are_neighbors(known, a, b) {
                        continue;
                    }
                    let (b_rr, b_rc) = b.region(region_size);
                    let v_id = NodeId::new(b_rr, b_rc, b_local as usize);
                    pending.push((
                        node.id,
                        v_id,
                        Transition {
                            from_cell: a,
                            to_cell: b,
                        },
                    ));
                }
            }
        }

        for (u, v, transition) in pending {
            if let Some(node) = self.nodes.get_mut(&u) {
                node.neighbors.insert(v);
                node.transitions.entry(v).or_insert(transition);
            }
        }
    }

    /// The node id whose cells contain `cell`, if any (spec section 4.6
    /// step 1, also used by reachability / frontier tagging).
    pub fn node_containing(&self, colored: &ColoredGrid, cell: Cell) -> Option<NodeId> {
        let (rr, rc) = cell.region(self.region_size);
        let local = colored.get(cell)?;
        let id = NodeId::new(rr, rc, local as usize);
        self.nodes.contains_key(&id).then_some(id)
    }

    /// BFS reachability set from `start` over the abstract graph.
    pub fn reachable_from(&self, start: NodeId) -> HashSet<NodeId> {
        let mut seen = HashSet::new();
        if !self.nodes.contains_key(&start) {
            return seen;
        }
        let mut queue = std::collections::VecDeque::new();
        queue.push_back(start);
        seen.insert(start);
        while let Some(node_id) = queue.pop_front() {
            if let Some(node) = self.nodes.get(&node_id) {
                for &n in &node.neighbors {
                    if seen.insert(n) {
                        queue.push_back(n);
                    }
                }
            }
        }
        seen
    }

    /// Defensive invariant check (spec section 7's `InvariantViolation`):
    /// every edge u->v with transition (a,b) has a matching edge v->u with
    /// transition (b,a), and both transition cells are still walkable.
    pub fn check_invariants(&self, known: &Grid) -> Result<(), String> {
        for node in self.nodes.values() {
            for (&neighbor_id, transition) in &node.transitions {
                let Some(neighbor) = self.nodes.get(&neighbor_id) else {
                    return Err(format!("edge to missing node {}", neighbor_id));
                };
                let Some(back) = neighbor.transitions.get(&node.id) else {
                    return Err(format!("missing reverse edge {} -> {}", neighbor_id, node.id));
                };
                if back.from_cell != transition.to_cell || back.to_cell != transition.from_cell {
                    return Err(format!("asymmetric transition between {} and {}", node.id, neighbor_id));
                }
                if !known.is_walkable(transition.from_cell) || !known.is_walkable(transition.to_cell) {
                    return Err(format!("transition cells no longer walkable for edge {} -> {}", node.id, neighbor_id));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellState;

    fn open_grid(size: usize) -> Grid {
        Grid::new(size, size, CellState::Walkable)
    }

    #[test]
    fn open_grid_has_one_node_per_region() {
        let g = open_grid(8);
        let (graph, _colored) = AbstractGraph::build(&g, 4);
        assert_eq!(graph.nodes.len(), 4);
    }

    #[test]
    fn adjacent_regions_get_symmetric_edges() {
        let g = open_grid(8);
        let (graph, _colored) = AbstractGraph::build(&g, 4);
        for node in graph.nodes.values() {
            for &neighbor_id in &node.neighbors {
                let neighbor = &graph.nodes[&neighbor_id];
                assert!(neighbor.neighbors.contains(&node.id), "edge {} -> {} is not symmetric", node.id, neighbor_id);
                let t = &node.transitions[&neighbor_id];
                let back = &neighbor.transitions[&node.id];
                assert_eq!(back.from_cell, t.to_cell);
                assert_eq!(back.to_cell, t.from_cell);
            }
        }
    }

    #[test]
    fn repair_twice_with_no_new_cells_is_a_no_op() {
        let g = open_grid(8);
        let (mut graph, mut colored) = AbstractGraph::build(&g, 4);
        let before = format!("{:?}", graph.nodes.keys().collect::<Vec<_>>());
        graph.repair(&g, &mut colored, &[]);
        let after = format!("{:?}", graph.nodes.keys().collect::<Vec<_>>());
        assert_eq!(before, after);
    }

    #[test]
    fn repair_after_reveal_matches_full_rebuild() {
        let mut known = Grid::new(8, 8, CellState::Unknown);
        // Reveal everything except one region.
        for r in 0..8 {
            for c in 0..4 {
                known.set(Cell::new(r, c), CellState::Walkable);
            }
        }
        let (mut graph, mut colored) = AbstractGraph::build(&known, 4);

        // Now reveal the remaining region.
        let mut newly = Vec::new();
        for r in 0..8 {
            for c in 4..8 {
                known.set(Cell::new(r, c), CellState::Walkable);
                newly.push(Cell::new(r, c));
            }
        }
        graph.repair(&known, &mut colored, &newly);

        let (rebuilt, _rebuilt_colored) = AbstractGraph::build(&known, 4);
        assert_eq!(graph.nodes.len(), rebuilt.nodes.len());
        for (id, node) in &graph.nodes {
            let other = &rebuilt.nodes[id];
            assert_eq!(node.neighbors, other.neighbors);
        }
    }

    #[test]
    fn invariants_hold_after_build() {
        let g = open_grid(8);
        let (graph, _colored) = AbstractGraph::build(&g, 4);
        assert!(graph.check_invariants(&g).is_ok());
    }
}
