//! Score controllers against a maze: one fresh robot per controller.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::SimConfig;
use crate::error::SimError;
use crate::maze::Maze;
use crate::program::Program;
use crate::robot::{Robot, RunReport};

/// Run `program` from the maze start and report its route and score.
pub fn evaluate(maze: &Maze, program: &Program, config: &SimConfig) -> Result<RunReport, SimError> {
    let mut robot = Robot::new(program, maze, config);
    robot.run()?;
    Ok(robot.into_report())
}

/// Evaluate many controllers against the same maze. Results keep input order.
///
/// With the `parallel` feature the runs are spread over the rayon pool; each
/// run is still single-threaded and the maze is only read.
pub fn evaluate_batch(
    maze: &Maze,
    programs: &[Program],
    config: &SimConfig,
) -> Vec<Result<RunReport, SimError>> {
    #[cfg(feature = "parallel")]
    let results = programs
        .par_iter()
        .map(|p| evaluate(maze, p, config))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let results = programs.iter().map(|p| evaluate(maze, p, config)).collect();

    results
}

/// Fitness used by a search loop: the route score, or 0 for an invalid controller.
pub fn fitness(maze: &Maze, program: &Program, config: &SimConfig) -> u32 {
    evaluate(maze, program, config)
        .map(|r| r.score)
        .unwrap_or(0)
}
