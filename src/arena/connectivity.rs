//! Spawn-to-objective reachability
//!
//! Always searched on a full-resolution grid (`CONNECTIVITY_CELL_SIZE`).
//! A coarser render grid can alias a narrow gate shut and report false
//! failures, so the render cell size is never used here.

use std::collections::VecDeque;

use glam::IVec2;
use thiserror::Error;

use super::grid::OccupancyGrid;
use super::spec::ArenaSpec;
use crate::consts::CONNECTIVITY_CELL_SIZE;

const NEIGHBORS: [IVec2; 4] = [IVec2::X, IVec2::NEG_X, IVec2::Y, IVec2::NEG_Y];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConnectivityError {
    #[error("spawn for team {team} has no walkable cell near its center")]
    NoWalkableStart { team: u8 },

    #[error("spawn for team {team} cannot reach the objective")]
    Unreachable { team: u8 },
}

/// Search result for one spawn pad
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnReach {
    pub team: u8,
    /// Walkable cell the search started from
    pub start: Option<IVec2>,
    /// BFS steps to the objective cell, if reached
    pub steps: Option<u32>,
}

impl SpawnReach {
    pub fn error(&self) -> Option<ConnectivityError> {
        match (self.start, self.steps) {
            (None, _) => Some(ConnectivityError::NoWalkableStart { team: self.team }),
            (Some(_), None) => Some(ConnectivityError::Unreachable { team: self.team }),
            _ => None,
        }
    }
}

/// Per-spawn diagnostics for one spec
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectivityReport {
    /// Cell size the grid was built at
    pub cell_size: f32,
    pub objective_cell: IVec2,
    pub spawns: Vec<SpawnReach>,
}

impl ConnectivityReport {
    pub fn all_reachable(&self) -> bool {
        self.spawns.iter().all(|s| s.error().is_none())
    }

    pub fn errors(&self) -> Vec<ConnectivityError> {
        self.spawns.iter().filter_map(SpawnReach::error).collect()
    }
}

/// Search from every spawn pad to the objective
pub fn connectivity_report(spec: &ArenaSpec) -> ConnectivityReport {
    let grid = OccupancyGrid::build(spec, CONNECTIVITY_CELL_SIZE);
    let objective_cell = grid.world_to_cell(spec.objective.center);

    let spawns = spec
        .spawn_zones
        .iter()
        .map(|zone| {
            let start = walkable_start(&grid, grid.world_to_cell(zone.center()));
            let steps = start.and_then(|s| bfs_steps(&grid, s, objective_cell));
            SpawnReach {
                team: zone.team,
                start,
                steps,
            }
        })
        .collect();

    ConnectivityReport {
        cell_size: grid.cell_size,
        objective_cell,
        spawns,
    }
}

/// Every spawn must reach the objective; all failures are reported
pub fn validate_connectivity(spec: &ArenaSpec) -> Result<(), Vec<ConnectivityError>> {
    let errors = connectivity_report(spec).errors();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// The pad center, or the first walkable cell of its 3×3 neighborhood
fn walkable_start(grid: &OccupancyGrid, center: IVec2) -> Option<IVec2> {
    if grid.is_walkable(center) {
        return Some(center);
    }
    (-1..=1)
        .flat_map(|dy| (-1..=1).map(move |dx| center + IVec2::new(dx, dy)))
        .find(|&cell| grid.is_walkable(cell))
}

/// 4-connected breadth-first search over walkable cells
fn bfs_steps(grid: &OccupancyGrid, start: IVec2, goal: IVec2) -> Option<u32> {
    if !grid.is_walkable(goal) {
        return None;
    }
    let side = grid.side;
    let index = |c: IVec2| c.y as usize * side as usize + c.x as usize;

    let mut dist = vec![u32::MAX; grid.cell_count()];
    let mut queue = VecDeque::new();
    dist[index(start)] = 0;
    queue.push_back(start);

    while let Some(cell) = queue.pop_front() {
        let d = dist[index(cell)];
        if cell == goal {
            return Some(d);
        }
        for offset in NEIGHBORS {
            let next = cell + offset;
            if grid.is_walkable(next) && dist[index(next)] == u32::MAX {
                dist[index(next)] = d + 1;
                queue.push_back(next);
            }
        }
    }
    None
}
