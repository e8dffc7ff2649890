use mazebot::config::SimConfig;
use mazebot::evaluation::evaluate_batch;
use mazebot::generate;
use mazebot::program::Program;
use mazebot::robot::RunOutcome;

// Each controller drops five sensor readings and reacts to the front one.
const CONTROLLERS: [(&str, &str); 4] = [
    ("forward", "FORWARD"),
    (
        "turn_right",
        "IF NOP NOP IF NOP NOP IF NOP NOP IF NOP NOP IF NOP NOP IF RIGHT FORWARD",
    ),
    (
        "turn_left",
        "IF NOP NOP IF NOP NOP IF NOP NOP IF NOP NOP IF NOP NOP IF LEFT FORWARD",
    ),
    ("nop", "NOP"),
];

#[derive(Debug, Clone, Default)]
struct AssayRow {
    name: &'static str,
    runs: usize,
    reached_goal: usize,
    invalid: usize,
    score_sum: u64,
    coverage_sum: f32,
    moves_sum: u64,
}

impl AssayRow {
    fn mean_score(&self) -> f32 {
        self.score_sum as f32 / self.runs.max(1) as f32
    }

    fn mean_coverage(&self) -> f32 {
        self.coverage_sum / self.runs.max(1) as f32
    }

    fn mean_moves(&self) -> f32 {
        self.moves_sum as f32 / self.runs.max(1) as f32
    }
}

pub fn run() {
    let seeds = 1u64..=20;
    let (cells_w, cells_h) = (6, 6);
    let cfg = SimConfig::default().with_max_moves(300);

    let controllers: Vec<(&'static str, Program)> = CONTROLLERS
        .iter()
        .filter_map(|&(name, text)| match text.parse() {
            Ok(p) => Some((name, p)),
            Err(e) => {
                eprintln!("skipping {name}: {e}");
                None
            }
        })
        .collect();
    let programs: Vec<Program> = controllers.iter().map(|(_, p)| p.clone()).collect();

    let mut rows: Vec<AssayRow> = controllers
        .iter()
        .map(|&(name, _)| AssayRow {
            name,
            ..AssayRow::default()
        })
        .collect();

    for seed in seeds.clone() {
        let maze = generate::carve(seed, cells_w, cells_h);
        let reward_cells = maze.route_cell_count().max(1) as f32;
        for (row, result) in rows.iter_mut().zip(evaluate_batch(&maze, &programs, &cfg)) {
            row.runs += 1;
            match result {
                Ok(report) => {
                    if report.outcome == RunOutcome::ReachedGoal {
                        row.reached_goal += 1;
                    }
                    row.score_sum += report.score as u64;
                    row.coverage_sum += report.score as f32 / reward_cells;
                    row.moves_sum += report.n_moves as u64;
                }
                Err(_) => row.invalid += 1,
            }
        }
    }

    println!("mazebot assays");
    println!(
        "mazes={} cells={}x{} max_moves={}",
        seeds.count(),
        cells_w,
        cells_h,
        cfg.max_moves
    );
    println!(
        "{:<12} {:>6} {:>8} {:>8} {:>10} {:>10}",
        "controller", "goals", "invalid", "score", "coverage", "moves"
    );
    for row in &rows {
        println!(
            "{:<12} {:>6} {:>8} {:>8.2} {:>10.3} {:>10.1}",
            row.name,
            row.reached_goal,
            row.invalid,
            row.mean_score(),
            row.mean_coverage(),
            row.mean_moves()
        );
    }
}
