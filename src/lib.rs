//! # mazebot
//!
//! A deterministic maze-robot simulator. A robot with six wall sensors is
//! driven by a tiny stack-machine program; the route it walks is scored
//! against the maze's reward cells to give a fitness signal.
//!
//! ## Quick Start
//!
//! ```
//! use mazebot::prelude::*;
//!
//! let maze = Maze::from_glyphs("#####\n##S##\n##.##\n#G..#\n#####\n").unwrap();
//!
//! // Drop five sensor readings, then: wall ahead -> turn right, else forward.
//! let program: Program = "IF NOP NOP IF NOP NOP IF NOP NOP IF NOP NOP IF NOP NOP IF RIGHT FORWARD"
//!     .parse()
//!     .unwrap();
//!
//! let mut robot = Robot::new(&program, &maze, &SimConfig::default());
//! assert_eq!(robot.run().unwrap(), RunOutcome::ReachedGoal);
//! assert_eq!(maze.score_route(robot.route()), 2);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): serialization of cell codes, programs, configs and reports
//! - `parallel`: evaluate controller batches on the rayon thread pool
//!
//! ## Modules
//!
//! - [`maze`]: grid model, lookups, route scoring
//! - [`program`]: controller tokens and the stack-machine evaluator
//! - [`robot`]: sensors, movement, run loop
//! - [`evaluation`]: single and batch controller scoring
//! - [`generate`]: seeded maze layouts

#[path = "core/config.rs"]
pub mod config;

#[path = "core/error.rs"]
pub mod error;

#[path = "core/evaluation.rs"]
pub mod evaluation;

#[path = "core/generate.rs"]
pub mod generate;

#[path = "core/maze.rs"]
pub mod maze;

#[path = "core/prng.rs"]
pub mod prng;

#[path = "core/program.rs"]
pub mod program;

#[path = "core/robot.rs"]
pub mod robot;

/// Prelude module for convenient imports.
///
/// ```
/// use mazebot::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::SimConfig;
    pub use crate::error::{ConfigError, EvalError, MazeError, ProgramError, SimError};
    pub use crate::evaluation::{evaluate, evaluate_batch, fitness};
    pub use crate::maze::{CellCode, Maze, Position};
    pub use crate::program::{MoveCode, OpCode, Program, Token};
    pub use crate::robot::{Heading, Robot, RunOutcome, RunReport, Sensor, SensorReading};
}
