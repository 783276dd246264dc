//! Landmark resolution and shortest cardinal-move search over the merged grid.
//!
//! The search is a breadth-first expansion from the home cell. Cells are marked visited when
//! they are enqueued, so every cell enters the queue at most once and both time and memory stay
//! linear in the number of cells reached. Bookkeeping is keyed by cell rather than by a dense
//! index, so a sparse grid with far-off coordinates costs only what the search touches. The first time the destination is dequeued its parent chain is a
//! minimum-step path.
//!
//! Among several equally short paths the one returned is fixed by [`NEIGHBOR_ORDER`]: right,
//! down, left, up (x grows to the right, y grows downward).

use crate::config::Landmarks;
use crate::error::{Error, Result};
use crate::model::{Cell, GridCell, MergedGrid, Path};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Right,
    Down,
    Left,
    Up,
}

impl Direction {
    const fn delta(self) -> (i64, i64) {
        match self {
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Up => (0, -1),
        }
    }
}

/// Expansion order. Changing it changes which of several shortest paths is returned.
pub const NEIGHBOR_ORDER: [Direction; 4] = [
    Direction::Right,
    Direction::Down,
    Direction::Left,
    Direction::Up,
];

/// Both endpoints of a route, resolved against a merged grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoints {
    pub home: Cell,
    pub destination: Cell,
}

/// Finds the cell carrying structure `name`.
///
/// When several cells carry the name the first one in grid order wins and a warning is logged,
/// since repeated landmarks usually mean bad input.
pub fn find_landmark(grid: &MergedGrid, role: &'static str, name: &str) -> Result<Cell> {
    let mut matches = grid.iter().filter(|c| c.is_named(name));
    let Some(first) = matches.next() else {
        return Err(Error::LandmarkNotFound {
            role,
            name: name.to_string(),
        });
    };
    let extra = matches.count();
    if extra > 0 {
        tracing::warn!(
            target: "areamap::pathfind",
            role,
            name,
            matches = extra + 1,
            chosen = %first.cell,
            "landmark is ambiguous; using the first cell in grid order"
        );
    }
    Ok(first.cell)
}

pub fn resolve_endpoints(grid: &MergedGrid, landmarks: &Landmarks) -> Result<Endpoints> {
    Ok(Endpoints {
        home: find_landmark(grid, "home", &landmarks.home)?,
        destination: find_landmark(grid, "destination", &landmarks.destination)?,
    })
}

/// Read-only view of the grid used by the search: extent plus impassable cells.
#[derive(Debug, Clone)]
pub struct GridGraph {
    max_x: u32,
    max_y: u32,
    obstacles: FxHashSet<Cell>,
}

impl GridGraph {
    pub fn from_grid(grid: &MergedGrid) -> Self {
        let (max_x, max_y) = grid.extent().unwrap_or((0, 0));
        Self::new(
            max_x,
            max_y,
            grid.iter().filter(|c| c.obstructed).map(|c: &GridCell| c.cell),
        )
    }

    pub fn new(max_x: u32, max_y: u32, obstacles: impl IntoIterator<Item = Cell>) -> Self {
        Self {
            max_x,
            max_y,
            obstacles: obstacles.into_iter().collect(),
        }
    }

    pub fn extent(&self) -> (u32, u32) {
        (self.max_x, self.max_y)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        (1..=self.max_x).contains(&cell.x) && (1..=self.max_y).contains(&cell.y)
    }

    pub fn is_obstructed(&self, cell: Cell) -> bool {
        self.obstacles.contains(&cell)
    }

    /// In-bounds neighbours of `cell` in [`NEIGHBOR_ORDER`].
    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        NEIGHBOR_ORDER.iter().filter_map(move |dir| {
            let (dx, dy) = dir.delta();
            let x = i64::from(cell.x) + dx;
            let y = i64::from(cell.y) + dy;
            let next = Cell::new(u32::try_from(x).ok()?, u32::try_from(y).ok()?);
            self.contains(next).then_some(next)
        })
    }

    /// Shortest path from `start` to `goal`, or `None` when the frontier empties first.
    ///
    /// `start` and `goal` are admissible even when obstructed; every other cell on the path is
    /// free.
    pub fn shortest_path(&self, start: Cell, goal: Cell) -> Option<Path> {
        if start == goal {
            return Some(Path::new(vec![start]));
        }
        if !self.contains(start) || !self.contains(goal) {
            return None;
        }

        let mut parent: FxHashMap<Cell, Cell> = FxHashMap::default();
        let mut visited: FxHashSet<Cell> = FxHashSet::default();
        let mut queue: VecDeque<Cell> = VecDeque::new();

        visited.insert(start);
        queue.push_back(start);

        while let Some(cur) = queue.pop_front() {
            if cur == goal {
                return Some(rebuild(&parent, start, goal));
            }
            for next in self.neighbors(cur) {
                if visited.contains(&next) || (next != goal && self.is_obstructed(next)) {
                    continue;
                }
                visited.insert(next);
                parent.insert(next, cur);
                queue.push_back(next);
            }
        }
        None
    }
}

fn rebuild(parent: &FxHashMap<Cell, Cell>, start: Cell, goal: Cell) -> Path {
    let mut cells = vec![goal];
    let mut cur = goal;
    while let Some(&prev) = parent.get(&cur) {
        cells.push(prev);
        cur = prev;
    }
    debug_assert_eq!(cells.last().copied(), Some(start));
    cells.reverse();
    Path::new(cells)
}

/// Resolves both landmarks and searches between them.
///
/// Missing landmarks are errors; an unreachable destination is `Ok(None)`.
pub fn find_route(grid: &MergedGrid, landmarks: &Landmarks) -> Result<Option<Path>> {
    let endpoints = resolve_endpoints(grid, landmarks)?;
    let graph = GridGraph::from_grid(grid);

    let route = graph.shortest_path(endpoints.home, endpoints.destination);
    match &route {
        Some(path) => tracing::debug!(
            target: "areamap::pathfind",
            home = %endpoints.home,
            destination = %endpoints.destination,
            steps = path.steps(),
            "shortest path found"
        ),
        None => tracing::debug!(
            target: "areamap::pathfind",
            home = %endpoints.home,
            destination = %endpoints.destination,
            "destination unreachable"
        ),
    }
    Ok(route)
}
