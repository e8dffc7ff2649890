mod experiments;

use mazebot::config::SimConfig;
use mazebot::maze::Maze;
use mazebot::program::Program;
use mazebot::robot::Robot;

// A spiral: a controller that turns right at every wall walks it to G.
const DEMO_MAZE: &str = "\
#########
#S.....##
######.##
##.G##.##
##.# #.##
##.###.##
##.....##
#########
";

// Drop back, right, left, front-right and front-left; then turn on a wall ahead.
const DEMO_PROGRAM: &str =
    "IF NOP NOP IF NOP NOP IF NOP NOP IF NOP NOP IF NOP NOP IF RIGHT FORWARD";

fn main() {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() >= 2 && (args[1] == "--help" || args[1] == "-h" || args[1] == "help") {
        print_help();
        return;
    }
    if args.len() >= 2 && args[1] == "assays" {
        experiments::assays::run();
        return;
    }
    if args.len() >= 2 {
        eprintln!("Unknown command: {}", args[1]);
        print_help();
        std::process::exit(2);
    }

    if let Err(e) = run_demo() {
        eprintln!("demo failed: {e}");
        std::process::exit(1);
    }
}

fn run_demo() -> Result<(), Box<dyn std::error::Error>> {
    let maze = Maze::from_glyphs(DEMO_MAZE)?;
    let program: Program = DEMO_PROGRAM.parse()?;
    let cfg = SimConfig::default().with_env_overrides()?;

    println!("{maze}");
    println!("program: {program}");

    let mut robot = Robot::new(&program, &maze, &cfg);
    let outcome = robot.run()?;

    println!(
        "outcome={} moves={}/{} heading={} pos={}",
        outcome.as_str(),
        robot.n_moves(),
        robot.max_moves(),
        robot.heading().as_str(),
        robot.position()
    );
    let route: Vec<String> = robot.route().iter().map(|p| p.to_string()).collect();
    println!("route: {}", route.join(" "));
    println!(
        "score={} (of {} reward cells)",
        maze.score_route(robot.route()),
        maze.route_cell_count()
    );
    Ok(())
}

fn print_help() {
    println!("mazebot (maze robot controller simulator)");
    println!("usage:");
    println!("  cargo run");
    println!("  cargo run -- assays");
    println!();
    println!("env:");
    println!("  MAZEBOT_MAX_MOVES   move budget for the demo run");
    println!("  RUST_LOG            tracing filter, e.g. RUST_LOG=mazebot=trace");
}
