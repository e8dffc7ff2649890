//! The maze robot: heading, wall sensors, movement and the run loop.

use tracing::{debug, trace, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::error::{EvalError, SimError};
use crate::maze::{Maze, Position};
use crate::program::{MoveCode, Program};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Heading {
    North,
    East,
    South,
    West,
}

impl Heading {
    /// Clockwise quarter turn.
    pub fn right(self) -> Self {
        match self {
            Heading::North => Heading::East,
            Heading::East => Heading::South,
            Heading::South => Heading::West,
            Heading::West => Heading::North,
        }
    }

    /// Counter-clockwise quarter turn.
    pub fn left(self) -> Self {
        match self {
            Heading::North => Heading::West,
            Heading::East => Heading::North,
            Heading::South => Heading::East,
            Heading::West => Heading::South,
        }
    }

    /// One step forward, in grid coordinates (y grows downwards).
    pub fn delta(self) -> (i32, i32) {
        match self {
            Heading::North => (0, -1),
            Heading::East => (1, 0),
            Heading::South => (0, 1),
            Heading::West => (-1, 0),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Heading::North => "north",
            Heading::East => "east",
            Heading::South => "south",
            Heading::West => "west",
        }
    }
}

/// Wall sensors, in the order they are pushed onto the evaluation stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sensor {
    Front,
    FrontLeft,
    FrontRight,
    Left,
    Right,
    Back,
}

impl Sensor {
    pub const ALL: [Sensor; 6] = [
        Sensor::Front,
        Sensor::FrontLeft,
        Sensor::FrontRight,
        Sensor::Left,
        Sensor::Right,
        Sensor::Back,
    ];

    /// Absolute grid offset this sensor reads when facing `heading`.
    pub fn offset(self, heading: Heading) -> (i32, i32) {
        SENSOR_OFFSETS[heading as usize][self as usize]
    }
}

// [heading][sensor] -> (dx, dy). Sensor order matches `Sensor::ALL`.
const SENSOR_OFFSETS: [[(i32, i32); 6]; 4] = [
    // North
    [(0, -1), (-1, -1), (1, -1), (-1, 0), (1, 0), (0, 1)],
    // East
    [(1, 0), (1, -1), (1, 1), (0, -1), (0, 1), (-1, 0)],
    // South
    [(0, 1), (1, 1), (-1, 1), (1, 0), (-1, 0), (0, -1)],
    // West
    [(-1, 0), (-1, 1), (-1, -1), (0, 1), (0, -1), (1, 0)],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SensorReading([bool; 6]);

impl SensorReading {
    pub fn new(values: [bool; 6]) -> Self {
        Self(values)
    }

    /// Read the six cells around `pos` relative to `heading`.
    pub fn sense(maze: &Maze, pos: Position, heading: Heading) -> Self {
        let mut values = [false; 6];
        for sensor in Sensor::ALL {
            let (dx, dy) = sensor.offset(heading);
            let cell = pos.offset(dx, dy);
            values[sensor as usize] = maze.is_wall(cell.x, cell.y);
        }
        Self(values)
    }

    pub fn get(&self, sensor: Sensor) -> bool {
        self.0[sensor as usize]
    }

    pub fn values(&self) -> [bool; 6] {
        self.0
    }

    /// Initial evaluation stack; `Back` ends up on top.
    pub fn to_stack(&self) -> Vec<bool> {
        self.0.to_vec()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RunOutcome {
    ReachedGoal,
    BudgetExhausted,
}

impl RunOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            RunOutcome::ReachedGoal => "reached_goal",
            RunOutcome::BudgetExhausted => "budget_exhausted",
        }
    }
}

/// Everything the fitness consumer needs from a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub n_moves: usize,
    pub score: u32,
    pub route: Vec<Position>,
    pub moves: Vec<MoveCode>,
}

#[derive(Debug, Clone)]
pub struct Robot<'a> {
    maze: &'a Maze,
    controller: &'a Program,

    position: Position,
    heading: Heading,

    // Cleared after every move.
    sensor_cache: Option<SensorReading>,

    moves: Vec<MoveCode>,
    route: Vec<Position>,
    n_moves: usize,
    max_moves: usize,
}

impl<'a> Robot<'a> {
    pub fn new(controller: &'a Program, maze: &'a Maze, config: &SimConfig) -> Self {
        let start = maze.start();
        Self {
            maze,
            controller,
            position: start,
            heading: config.start_heading,
            sensor_cache: None,
            moves: Vec::new(),
            route: vec![start],
            n_moves: 0,
            max_moves: config.max_moves,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn heading(&self) -> Heading {
        self.heading
    }

    pub fn route(&self) -> &[Position] {
        &self.route
    }

    pub fn moves(&self) -> &[MoveCode] {
        &self.moves
    }

    pub fn n_moves(&self) -> usize {
        self.n_moves
    }

    pub fn max_moves(&self) -> usize {
        self.max_moves
    }

    pub fn at_goal(&self) -> bool {
        self.maze.is_goal(self.position.x, self.position.y)
    }

    /// Sensor reading for the current pose, computed at most once per step.
    pub fn sensor_value(&mut self) -> SensorReading {
        if let Some(reading) = self.sensor_cache {
            return reading;
        }
        let reading = SensorReading::sense(self.maze, self.position, self.heading);
        self.sensor_cache = Some(reading);
        reading
    }

    pub fn eval(&mut self) -> Result<MoveCode, EvalError> {
        let stack = self.sensor_value().to_stack();
        self.controller.evaluate(stack)
    }

    pub fn next_action(&mut self) -> Result<MoveCode, SimError> {
        self.eval().map_err(|source| {
            warn!(step = self.n_moves, error = %source, "controller produced no move");
            SimError::InvalidController {
                step: self.n_moves,
                source,
            }
        })
    }

    /// Sense, decide and move once. Does not touch the move counter.
    pub fn make_next_action(&mut self) -> Result<MoveCode, SimError> {
        let m = self.next_action()?;
        self.apply_move(m);
        Ok(m)
    }

    /// Apply a move directly, bypassing the controller.
    pub fn apply_move(&mut self, m: MoveCode) {
        match m {
            MoveCode::Forward => self.step_forward(),
            MoveCode::Left => self.heading = self.heading.left(),
            MoveCode::Right => self.heading = self.heading.right(),
        }
        self.sensor_cache = None;
        self.moves.push(m);
    }

    fn step_forward(&mut self) {
        let (dx, dy) = self.heading.delta();
        let before = self.position;
        let ahead = before.offset(dx, dy);
        let next = Position::new(
            ahead.x.clamp(0, self.maze.max_x()),
            ahead.y.clamp(0, self.maze.max_y()),
        );

        if self.maze.is_wall(next.x, next.y) {
            trace!(from = %before, to = %next, "bumped into wall");
            return;
        }
        if next != before {
            self.position = next;
            self.route.push(next);
        }
    }

    /// Drive the robot until it reaches the goal or spends its move budget.
    pub fn run(&mut self) -> Result<RunOutcome, SimError> {
        debug!(
            start = %self.position,
            heading = self.heading.as_str(),
            max_moves = self.max_moves,
            "run started"
        );

        while self.n_moves < self.max_moves {
            if self.at_goal() {
                break;
            }
            let m = self.make_next_action()?;
            self.n_moves += 1;
            trace!(
                step = self.n_moves,
                action = m.as_str(),
                pos = %self.position,
                heading = self.heading.as_str(),
                "step"
            );
        }

        let outcome = self.outcome();
        debug!(
            outcome = outcome.as_str(),
            n_moves = self.n_moves,
            route_len = self.route.len(),
            "run finished"
        );
        Ok(outcome)
    }

    pub fn outcome(&self) -> RunOutcome {
        if self.at_goal() {
            RunOutcome::ReachedGoal
        } else {
            RunOutcome::BudgetExhausted
        }
    }

    pub fn into_report(self) -> RunReport {
        RunReport {
            outcome: self.outcome(),
            n_moves: self.n_moves,
            score: self.maze.score_route(&self.route),
            route: self.route,
            moves: self.moves,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::Token;

    // Corridor going south from S, then west to G.
    const CORRIDOR: &str = "\
#####
##S##
##.##
#G..#
#####
";

    fn maze(text: &str) -> Maze {
        Maze::from_glyphs(text).unwrap()
    }

    fn front_only() -> Program {
        // Drop the other five readings, then turn right on a wall ahead.
        "IF NOP NOP IF NOP NOP IF NOP NOP IF NOP NOP IF NOP NOP IF RIGHT FORWARD"
            .parse()
            .unwrap()
    }

    #[test]
    fn four_turns_restore_heading() {
        for h in [Heading::North, Heading::East, Heading::South, Heading::West] {
            assert_eq!(h.right().right().right().right(), h);
            assert_eq!(h.left().left().left().left(), h);
            assert_eq!(h.right().left(), h);
        }
        assert_eq!(Heading::North.right(), Heading::East);
        assert_eq!(Heading::North.left(), Heading::West);
    }

    #[test]
    fn robot_heading_cycles_through_moves() {
        let m = maze(CORRIDOR);
        let p = Program::new(vec![Token::RIGHT]);
        let mut robot = Robot::new(&p, &m, &SimConfig::default());
        let start = robot.heading();
        for _ in 0..4 {
            robot.apply_move(MoveCode::Right);
        }
        assert_eq!(robot.heading(), start);
        for _ in 0..4 {
            robot.apply_move(MoveCode::Left);
        }
        assert_eq!(robot.heading(), start);
        assert_eq!(robot.moves().len(), 8);
        assert_eq!(robot.route(), &[m.start()]);
    }

    #[test]
    fn sensor_table_matches_each_heading() {
        // Only the cell east of S is open; everything else around it is wall.
        let m = maze("###\n#S \n###\n");
        let pos = m.start();
        let east = SensorReading::sense(&m, pos, Heading::East);
        assert_eq!(east.values(), [false, true, true, true, true, true]);
        let north = SensorReading::sense(&m, pos, Heading::North);
        assert!(!north.get(Sensor::Right));
        assert!(north.get(Sensor::Front));
        let south = SensorReading::sense(&m, pos, Heading::South);
        assert!(!south.get(Sensor::Left));
        assert!(south.get(Sensor::Right));
        let west = SensorReading::sense(&m, pos, Heading::West);
        assert!(!west.get(Sensor::Back));
        assert!(west.get(Sensor::Front));
    }

    #[test]
    fn diagonal_sensors_follow_the_table() {
        // Open cell at (2,0): north-east of S.
        let m = maze("## \n#S#\n###\n");
        let pos = m.start();
        assert!(!SensorReading::sense(&m, pos, Heading::North).get(Sensor::FrontRight));
        assert!(!SensorReading::sense(&m, pos, Heading::East).get(Sensor::FrontLeft));
        let south = SensorReading::sense(&m, pos, Heading::South);
        assert!(south.values().iter().all(|&w| w));
        let west = SensorReading::sense(&m, pos, Heading::West);
        assert!(west.values().iter().all(|&w| w));
    }

    #[test]
    fn sensor_value_is_cached_until_the_next_move() {
        let m = maze(CORRIDOR);
        let p = Program::new(vec![Token::FORWARD]);
        let mut robot = Robot::new(&p, &m, &SimConfig::default());
        assert_eq!(robot.sensor_cache, None);
        let first = robot.sensor_value();
        assert_eq!(robot.sensor_cache, Some(first));
        robot.apply_move(MoveCode::Left);
        assert_eq!(robot.sensor_cache, None);
        assert_ne!(robot.sensor_value(), first);
    }

    #[test]
    fn forward_into_wall_is_rejected() {
        let m = maze(CORRIDOR);
        let p = Program::new(vec![Token::FORWARD]);
        let cfg = SimConfig::default().with_start_heading(Heading::North);
        let mut robot = Robot::new(&p, &m, &cfg);
        robot.apply_move(MoveCode::Forward);
        assert_eq!(robot.position(), m.start());
        assert_eq!(robot.route(), &[m.start()]);
        assert_eq!(robot.moves(), &[MoveCode::Forward]);
    }

    #[test]
    fn forward_at_the_grid_edge_clamps() {
        let m = maze("S  G\n");
        let p = Program::new(vec![Token::FORWARD]);
        let cfg = SimConfig::default().with_start_heading(Heading::West);
        let mut robot = Robot::new(&p, &m, &cfg);
        robot.apply_move(MoveCode::Forward);
        assert_eq!(robot.position(), Position::new(0, 0));
        assert_eq!(robot.route().len(), 1);
    }

    #[test]
    fn start_on_goal_finishes_without_moving() {
        use crate::maze::CellCode::{Empty, Goal, Wall};
        let m = Maze::with_start(
            vec![vec![Wall, Wall, Wall], vec![Wall, Goal, Empty]],
            Position::new(1, 1),
        )
        .unwrap();
        // Never evaluated: the robot is already home.
        let p = Program::new(vec![Token::NOP]);
        let mut robot = Robot::new(&p, &m, &SimConfig::default());
        assert_eq!(robot.run(), Ok(RunOutcome::ReachedGoal));
        assert_eq!(robot.n_moves(), 0);
        assert_eq!(robot.route(), &[Position::new(1, 1)]);
        assert!(robot.moves().is_empty());
    }

    #[test]
    fn run_follows_the_corridor_to_the_goal() {
        let m = maze(CORRIDOR);
        let p = front_only();
        let mut robot = Robot::new(&p, &m, &SimConfig::default());
        assert_eq!(robot.run(), Ok(RunOutcome::ReachedGoal));
        assert_eq!(robot.n_moves(), 4);
        assert_eq!(
            robot.moves(),
            &[
                MoveCode::Forward,
                MoveCode::Forward,
                MoveCode::Right,
                MoveCode::Forward
            ]
        );
        assert_eq!(
            robot.route(),
            &[
                Position::new(2, 1),
                Position::new(2, 2),
                Position::new(2, 3),
                Position::new(1, 3)
            ]
        );
        let report = robot.into_report();
        assert_eq!(report.score, 2);
        assert_eq!(report.outcome, RunOutcome::ReachedGoal);
    }

    #[test]
    fn right_turner_walks_a_spiral_and_collects_every_reward() {
        let m = maze(
            "#########\n#S.....##\n######.##\n##.G##.##\n##.# #.##\n##.###.##\n##.....##\n#########\n",
        );
        let p = front_only();
        let mut robot = Robot::new(&p, &m, &SimConfig::default());
        assert_eq!(robot.run(), Ok(RunOutcome::ReachedGoal));
        // Three turns to face east, four corners, 18 forward steps.
        assert_eq!(robot.n_moves(), 25);
        assert_eq!(robot.position(), Position::new(3, 3));
        assert_eq!(robot.heading(), Heading::East);
        assert_eq!(m.score_route(robot.route()) as usize, m.route_cell_count());
        assert_eq!(robot.route().len(), 19);
    }

    #[test]
    fn run_stops_at_the_move_budget() {
        let m = maze(CORRIDOR);
        let p = Program::new(vec![Token::LEFT]);
        let mut robot = Robot::new(&p, &m, &SimConfig::default().with_max_moves(7));
        assert_eq!(robot.run(), Ok(RunOutcome::BudgetExhausted));
        assert_eq!(robot.n_moves(), 7);
        assert_eq!(robot.moves().len(), 7);
        assert_eq!(robot.route(), &[m.start()]);
    }

    #[test]
    fn invalid_controller_aborts_the_run() {
        let m = maze(CORRIDOR);
        let p = Program::new(vec![Token::NOP]);
        let mut robot = Robot::new(&p, &m, &SimConfig::default());
        assert_eq!(
            robot.run(),
            Err(SimError::InvalidController {
                step: 0,
                source: EvalError::NoMove,
            })
        );
        assert_eq!(robot.n_moves(), 0);
        assert!(robot.moves().is_empty());
    }
}
