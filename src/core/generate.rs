//! Seeded maze layouts for assays and benchmarks.
//!
//! Passages are carved by a depth-first backtracker over a `cells_w x cells_h`
//! lattice, drawn on a block grid of `(2w+1) x (2h+1)` where every other
//! row and column is wall. START sits in the top-left room, GOAL in the
//! bottom-right one, and the unique path between them is marked ROUTE.

use std::collections::VecDeque;

use crate::maze::{CellCode, Maze, Position};
use crate::prng::Prng;

pub const MIN_CELLS: u32 = 2;
pub const MAX_CELLS: u32 = 256;

/// Carve a perfect maze. Dimensions are clamped to `MIN_CELLS..=MAX_CELLS`.
pub fn carve(seed: u64, cells_w: u32, cells_h: u32) -> Maze {
    let cw = cells_w.clamp(MIN_CELLS, MAX_CELLS) as usize;
    let ch = cells_h.clamp(MIN_CELLS, MAX_CELLS) as usize;
    let width = 2 * cw + 1;
    let height = 2 * ch + 1;

    let mut cells = vec![CellCode::Wall; width * height];
    let block = |cx: usize, cy: usize| (2 * cy + 1) * width + (2 * cx + 1);

    let mut rng = Prng::new(seed ^ 0xA5A5_5A5A);
    let mut visited = vec![false; cw * ch];
    let mut stack: Vec<(usize, usize)> = vec![(0, 0)];
    visited[0] = true;
    cells[block(0, 0)] = CellCode::Empty;

    while let Some(&(x, y)) = stack.last() {
        let mut neighbors = [(0usize, 0usize); 4];
        let mut n = 0;
        if y > 0 && !visited[(y - 1) * cw + x] {
            neighbors[n] = (x, y - 1);
            n += 1;
        }
        if x + 1 < cw && !visited[y * cw + x + 1] {
            neighbors[n] = (x + 1, y);
            n += 1;
        }
        if y + 1 < ch && !visited[(y + 1) * cw + x] {
            neighbors[n] = (x, y + 1);
            n += 1;
        }
        if x > 0 && !visited[y * cw + x - 1] {
            neighbors[n] = (x - 1, y);
            n += 1;
        }

        if n == 0 {
            stack.pop();
            continue;
        }

        let (nx, ny) = neighbors[rng.below(n)];
        // The wall block between two rooms sits at the midpoint.
        let between = (y + ny + 1) * width + (x + nx + 1);
        cells[between] = CellCode::Empty;
        cells[block(nx, ny)] = CellCode::Empty;
        visited[ny * cw + nx] = true;
        stack.push((nx, ny));
    }

    let start = block(0, 0);
    let goal = block(cw - 1, ch - 1);
    for idx in solution_path(&cells, width, start, goal) {
        if idx != start && idx != goal {
            cells[idx] = CellCode::Route;
        }
    }
    cells[start] = CellCode::Start;
    cells[goal] = CellCode::Goal;

    Maze::from_cells(width, height, cells, Position::new(1, 1))
}

// Breadth-first search over open blocks. Empty when `goal` is unreachable.
fn solution_path(cells: &[CellCode], width: usize, start: usize, goal: usize) -> Vec<usize> {
    let mut parent = vec![usize::MAX; cells.len()];
    let mut queue = VecDeque::from([start]);
    parent[start] = start;

    while let Some(idx) = queue.pop_front() {
        if idx == goal {
            break;
        }
        // The outer ring is always wall, so these never leave the grid.
        for next in [idx - width, idx + 1, idx + width, idx - 1] {
            if cells[next] != CellCode::Wall && parent[next] == usize::MAX {
                parent[next] = idx;
                queue.push_back(next);
            }
        }
    }

    if parent[goal] == usize::MAX {
        return Vec::new();
    }
    let mut path = vec![goal];
    let mut idx = goal;
    while idx != start {
        idx = parent[idx];
        path.push(idx);
    }
    path.reverse();
    path
}
