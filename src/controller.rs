/// Exploration controller (spec section 4.8): the state machine that ties
/// sensing, map update, graph repair, frontier detection, frontier
/// selection, abandonment, path following, and rotation together into the
/// online exploration loop.
use log::{debug, info, trace, warn};

use crate::constants::{RECENT_TARGET_ABANDON_EXCLUDE_SLICE, RECENT_TARGET_ANTI_YOYO_SLICE};
use crate::error::{ExploreError, Result};
use crate::frontier::{detect_frontiers, detect_frontiers_fallback, Frontier};
use crate::graph::{AbstractGraph, ColoredGrid};
use crate::grid::{update_known, Grid};
use crate::heading::rotation_path;
use crate::planner::{self, PlanResult};
use crate::sensor::visible_cells;
use crate::types::{AgentState, Cell, CellState, ExploreOptions, ExploreOutcome, Heading, HeuristicKind, Metrics, ProgressEvent, RecentTargets};

/// Input to `explore`: the read-only ground-truth grid and the agent's
/// starting cell (spec section 6's Explorer API `{maze, start, size}`;
/// `size` is implicit in `maze`'s dimensions).
pub struct ExploreInput {
    pub maze: Grid,
    pub start: Cell,
}

/// Result of a full `explore` run (spec section 6's Explorer API).
pub struct ExploreResult {
    pub success: bool,
    pub outcome: ExploreOutcome,
    pub trajectory: Vec<Cell>,
    pub known_map: Grid,
    pub graph: AbstractGraph,
    pub colored_grid: ColoredGrid,
    pub final_coverage: f64,
    pub agent_pos: Cell,
    pub agent_heading: Heading,
    pub metrics: Metrics,
}

/// Repair the abstract graph if any newly-revealed cell became walkable
/// (spec section 9 open question (b): repair triggers on walkable reveals
/// only), then check the post-repair invariant (spec section 7's
/// `InvariantViolation`, defensive and unrecoverable).
fn maybe_repair(graph: &mut AbstractGraph, known: &Grid, colored: &mut ColoredGrid, new_cells: &[(Cell, CellState)]) -> Result<()> {
    let newly_walkable: Vec<Cell> = new_cells.iter().filter(|(_, s)| *s == CellState::Walkable).map(|(c, _)| *c).collect();
    if newly_walkable.is_empty() {
        return Ok(());
    }
    graph.repair(known, colored, &newly_walkable);
    graph.check_invariants(known).map_err(ExploreError::InvariantViolation)?;
    Ok(())
}

/// Frontier selection (spec section 4.9): exclude candidates targeted in
/// the last 5 iterations, relaxing to the full reachable set if that
/// empties it; pick the reachable frontier with the shortest HPA* path,
/// ties broken by insertion order.
fn select_target(reachable: &[&Frontier], agent_pos: Cell, known: &Grid, graph: &AbstractGraph, colored: &ColoredGrid, heuristic: HeuristicKind, recent: &RecentTargets) -> Option<Cell> {
    let mut candidates: Vec<&Frontier> = reachable.iter().filter(|f| !recent.contains_in(f.target, RECENT_TARGET_ANTI_YOYO_SLICE)).copied().collect();
    if candidates.is_empty() {
        candidates = reachable.to_vec();
    }

    let mut best: Option<(Cell, usize)> = None;
    for f in candidates {
        if let Some(plan) = planner::plan(known, graph, colored, agent_pos, f.target, heuristic) {
            let len = plan.detailed_path.len();
            if best.as_ref().map(|(_, blen)| len < *blen).unwrap_or(true) {
                best = Some((f.target, len));
            }
        }
    }
    best.map(|(cell, _)| cell)
}

/// Abandonment check (spec section 4.8 step 7): among reachable frontiers
/// other than the current target, find the one whose HPA* path from the
/// agent is strictly shorter than the current target's, was not targeted
/// in the last 3 or last 5 iterations (spec section 9 open question (c)
/// additionally gates this on `targetSwitchCooldown` elapsed since the
/// last switch, applied by the caller).
#[allow(clippy::too_many_arguments)]
fn abandon_candidate(
    reachable: &[&Frontier],
    agent_pos: Cell,
    current_target: Cell,
    current_len: usize,
    known: &Grid,
    graph: &AbstractGraph,
    colored: &ColoredGrid,
    heuristic: HeuristicKind,
    recent: &RecentTargets,
) -> Option<(Cell, PlanResult)> {
    let mut best: Option<(Cell, PlanResult)> = None;
    for f in reachable {
        if f.target == current_target {
            continue;
        }
        if recent.contains_in(f.target, RECENT_TARGET_ABANDON_EXCLUDE_SLICE) {
            continue;
        }
        if recent.contains_in(f.target, RECENT_TARGET_ANTI_YOYO_SLICE) {
            continue;
        }
        let Some(plan) = planner::plan(known, graph, colored, agent_pos, f.target, heuristic) else {
            continue;
        };
        if plan.detailed_path.len() >= current_len {
            continue;
        }
        let better = best.as_ref().map(|(_, p)| plan.detailed_path.len() < p.detailed_path.len()).unwrap_or(true);
        if better {
            best = Some((f.target, plan));
        }
    }
    best
}

#[allow(clippy::too_many_arguments)]
fn emit_progress(on_progress: &mut Option<&mut dyn FnMut(&ProgressEvent)>, iteration: usize, coverage: f64, agent: &AgentState, planned_path: Option<&[Cell]>, current_target: Option<Cell>, known_map: &Grid) {
    if let Some(cb) = on_progress.as_deref_mut() {
        let event = ProgressEvent {
            iteration,
            coverage,
            agent_position: agent.position,
            agent_heading: agent.heading,
            planned_path,
            current_target,
            known_map,
        };
        cb(&event);
    }
}

/// Run the full online exploration loop (spec sections 4.8-4.9, 6's
/// Explorer API). Returns `Err` only for an unrecoverable invariant
/// violation (spec section 7); every other outcome, including planner or
/// frontier failures, is reported as data in the returned `ExploreResult`.
pub fn explore(input: &ExploreInput, options: &ExploreOptions, mut on_progress: Option<&mut dyn FnMut(&ProgressEvent)>) -> Result<ExploreResult> {
    let options = options.clone().normalized();
    let ground_truth = &input.maze;
    ground_truth.check_region_size(options.region_size)?;

    let mut known = Grid::blank_like(ground_truth);
    let (mut graph, mut colored) = AbstractGraph::build(&known, options.region_size);
    let mut agent = AgentState::new(input.start, Heading::N);
    let mut metrics = Metrics::default();

    info!("starting exploration at {:?} with sensor_range={} region_size={}", input.start, options.sensor_range, options.region_size);

    let outcome = 'explore_loop: loop {
        let iteration = metrics.iterations;
        if iteration >= options.max_iter {
            break ExploreOutcome::IterationCap;
        }

        // 1. Sense.
        let visible = visible_cells(agent.position, agent.heading, options.sensor_range, ground_truth);
        let new_cells = update_known(&mut known, ground_truth, &visible);
        maybe_repair(&mut graph, &known, &mut colored, &new_cells)?;

        // 2. Coverage check.
        let coverage = known.coverage(ground_truth);
        trace!("iteration {iteration}: coverage={coverage:.2}");
        if coverage >= options.coverage_threshold {
            info!("coverage threshold reached at iteration {iteration}: {coverage:.2}%");
            metrics.final_coverage = coverage;
            break ExploreOutcome::CoverageReached;
        }

        // 3. Frontier detect.
        let mut frontiers = if options.use_wfd {
            detect_frontiers(&known, &graph, &colored, agent.position, options.frontier_strategy)
        } else {
            detect_frontiers_fallback(&known, &graph, &colored, agent.position)
        };
        if frontiers.is_empty() {
            info!("no frontiers remain at iteration {iteration}");
            metrics.final_coverage = coverage;
            break ExploreOutcome::NoFrontier;
        }

        // 4. Reachability filter.
        let agent_node = graph.node_containing(&colored, agent.position);
        let reachable_set = agent_node.map(|id| graph.reachable_from(id)).unwrap_or_default();
        for f in &mut frontiers {
            f.is_reachable = f.node.map(|n| reachable_set.contains(&n)).unwrap_or(false);
        }
        let reachable: Vec<&Frontier> = frontiers.iter().filter(|f| f.is_reachable).collect();
        if reachable.is_empty() {
            warn!("no reachable frontier at iteration {iteration}");
            metrics.final_coverage = coverage;
            break ExploreOutcome::NoReachableFrontier;
        }

        // 5. Target choice.
        let needs_new_target = match agent.current_target {
            None => true,
            Some(t) => t == agent.position || !frontiers.iter().any(|f| f.target == t),
        };
        if needs_new_target {
            match select_target(&reachable, agent.position, &known, &graph, &colored, options.heuristic, &agent.recent_targets) {
                Some(target) => {
                    debug!("iteration {iteration}: selected new target {target:?}");
                    agent.current_target = Some(target);
                }
                None => {
                    warn!("frontier selection found no viable target at iteration {iteration}");
                    metrics.final_coverage = coverage;
                    break ExploreOutcome::NoReachableFrontier;
                }
            }
        }
        let target = agent.current_target.expect("just assigned or already present");

        // 6. Plan.
        let Some(mut plan) = planner::plan(&known, &graph, &colored, agent.position, target, options.heuristic) else {
            // NoPath (spec section 7): skip this iteration, re-sense and
            // re-plan next time around; do not abort.
            debug!("iteration {iteration}: no path to target {target:?}, skipping");
            metrics.iterations += 1;
            continue 'explore_loop;
        };
        metrics.replans += 1;

        // 7. Abandonment check, gated by the target-switch cooldown (spec
        // section 9 open question (c)).
        let cooldown_elapsed = agent.last_switch_iteration.map(|last| iteration.saturating_sub(last) >= options.target_switch_cooldown as usize).unwrap_or(true);
        if cooldown_elapsed {
            if let Some((better_target, better_plan)) =
                abandon_candidate(&reachable, agent.position, target, plan.detailed_path.len(), &known, &graph, &colored, options.heuristic, &agent.recent_targets)
            {
                debug!("iteration {iteration}: abandoning {target:?} for shorter path to {better_target:?}");
                metrics.abandonments += 1;
                agent.recent_targets.push(target);
                agent.current_target = Some(better_target);
                agent.last_switch_iteration = Some(iteration);
                plan = better_plan;
            }
        }

        // 8. Step.
        let path = &plan.detailed_path;
        if path.len() <= 1 {
            if options.scan_360 {
                let mut scan_new_cells = Vec::new();
                for heading in Heading::ALL {
                    let visible = visible_cells(agent.position, heading, options.sensor_range, ground_truth);
                    scan_new_cells.extend(update_known(&mut known, ground_truth, &visible));
                }
                maybe_repair(&mut graph, &known, &mut colored, &scan_new_cells)?;
                metrics.full_scans += 1;
            }
            agent.recent_targets.push(agent.current_target.take().expect("target present at arrival"));
            metrics.iterations += 1;
            emit_progress(&mut on_progress, iteration, coverage, &agent, None, None, &known);
            continue 'explore_loop;
        }
        let step_index = ((options.step_size.floor() as usize) + 1).min(path.len() - 1);
        let next_pos = path[step_index];

        // 9. Rotate and sense: sweep through every intermediate heading,
        // sensing at each (spec section 4.8 step 9), then repair once.
        let dr = next_pos.row as i32 - agent.position.row as i32;
        let dc = next_pos.col as i32 - agent.position.col as i32;
        let target_heading = Heading::from_delta(dr, dc);
        let rotation = rotation_path(agent.heading, target_heading);
        let mut rotation_new_cells = Vec::new();
        for &heading in rotation.iter().skip(1) {
            let visible = visible_cells(agent.position, heading, options.sensor_range, ground_truth);
            rotation_new_cells.extend(update_known(&mut known, ground_truth, &visible));
        }
        agent.heading = target_heading;
        agent.position = next_pos;
        agent.trajectory.push(next_pos);
        maybe_repair(&mut graph, &known, &mut colored, &rotation_new_cells)?;

        metrics.iterations += 1;
        metrics.final_coverage = known.coverage(ground_truth);
        let planned_path_snapshot = plan.detailed_path.clone();
        emit_progress(&mut on_progress, iteration, metrics.final_coverage, &agent, Some(&planned_path_snapshot[..]), Some(target), &known);
    };

    let final_coverage = known.coverage(ground_truth);
    metrics.final_coverage = final_coverage;
    let success = matches!(outcome, ExploreOutcome::CoverageReached | ExploreOutcome::NoFrontier);
    info!("exploration finished: outcome={outcome:?} coverage={final_coverage:.2}% iterations={}", metrics.iterations);

    Ok(ExploreResult {
        success,
        outcome,
        trajectory: agent.trajectory.clone(),
        known_map: known,
        graph,
        colored_grid: colored,
        final_coverage,
        agent_pos: agent.position,
        agent_heading: agent.heading,
        metrics,
    })
}
