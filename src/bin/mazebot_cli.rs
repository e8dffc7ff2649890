//! Command-line front end for running and scoring maze controllers.
//!
//! Examples:
//!   mazebot-cli run maze.txt IF FORWARD LEFT
//!   mazebot-cli run maze.txt @controller.txt --json
//!   mazebot-cli score maze.txt 1,1 2,1 3,1
//!   mazebot-cli render maze.txt
//!   mazebot-cli generate 42 8 6
//!   mazebot-cli paths
//!
//! Settings come from `--config <file>`, else `<config dir>/mazebot/config.json`
//! if it exists, else defaults; `MAZEBOT_MAX_MOVES` and `--max-moves` override
//! the move budget.

use std::fs;
use std::path::PathBuf;
use std::process;

use mazebot::config::SimConfig;
use mazebot::evaluation::evaluate;
use mazebot::generate;
use mazebot::maze::{Maze, Position};
use mazebot::program::Program;
use tracing::{debug, info};

#[derive(Debug, Default)]
struct Flags {
    config: Option<PathBuf>,
    max_moves: Option<usize>,
    json: bool,
}

fn usage() -> ! {
    eprintln!("mazebot-cli: run and score maze robot controllers");
    eprintln!();
    eprintln!("usage:");
    eprintln!("  mazebot-cli run <maze.txt> <program tokens...|@file> [--json]");
    eprintln!("  mazebot-cli score <maze.txt> <x,y>...");
    eprintln!("  mazebot-cli render <maze.txt>");
    eprintln!("  mazebot-cli generate <seed> <cells_w> <cells_h>");
    eprintln!("  mazebot-cli paths");
    eprintln!();
    eprintln!("flags:");
    eprintln!("  --config <file>     JSON settings (max_moves, start_heading)");
    eprintln!("  --max-moves <n>     override the move budget");
    eprintln!("  --json              print the run report as JSON");
    process::exit(2);
}

fn make_error(msg: &str) -> ! {
    eprintln!("Error: {msg}");
    process::exit(1);
}

fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("mazebot").join("config.json"))
}

fn split_flags(raw: Vec<String>) -> (Vec<String>, Flags) {
    let mut args = Vec::new();
    let mut flags = Flags::default();
    let mut it = raw.into_iter();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--json" => flags.json = true,
            "--config" => {
                let path = it.next().unwrap_or_else(|| usage());
                flags.config = Some(PathBuf::from(path));
            }
            "--max-moves" => {
                let n = it.next().unwrap_or_else(|| usage());
                let n = n
                    .parse()
                    .unwrap_or_else(|_| make_error("--max-moves must be a number"));
                flags.max_moves = Some(n);
            }
            _ => args.push(a),
        }
    }
    (args, flags)
}

fn load_config(flags: &Flags) -> SimConfig {
    let path = flags
        .config
        .clone()
        .or_else(|| default_config_file().filter(|p| p.exists()));

    let cfg = match path {
        Some(path) => {
            info!("Loading config from {:?}", path);
            SimConfig::load(&path).unwrap_or_else(|e| make_error(&e.to_string()))
        }
        None => {
            debug!("No config file; using defaults");
            SimConfig::default()
        }
    };
    let mut cfg = cfg
        .with_env_overrides()
        .unwrap_or_else(|e| make_error(&e.to_string()));
    if let Some(n) = flags.max_moves {
        cfg = cfg.with_max_moves(n);
    }
    if let Err(e) = cfg.validate() {
        make_error(&e.to_string());
    }
    cfg
}

fn load_maze(path: &str) -> Maze {
    let text = fs::read_to_string(path)
        .unwrap_or_else(|e| make_error(&format!("cannot read {path}: {e}")));
    Maze::from_glyphs(&text).unwrap_or_else(|e| make_error(&format!("{path}: {e}")))
}

fn load_program(args: &[String]) -> Program {
    let text = match args {
        [single] if single.starts_with('@') => {
            let path = &single[1..];
            fs::read_to_string(path)
                .unwrap_or_else(|e| make_error(&format!("cannot read {path}: {e}")))
        }
        _ => args.join(" "),
    };
    text.parse().unwrap_or_else(|e| make_error(&format!("{e}")))
}

fn parse_position(s: &str) -> Position {
    let parsed = s
        .split_once(',')
        .and_then(|(x, y)| Some(Position::new(x.trim().parse().ok()?, y.trim().parse().ok()?)));
    parsed.unwrap_or_else(|| make_error(&format!("bad position {s:?}, expected x,y")))
}

fn main() {
    tracing_subscriber::fmt::init();

    let (args, flags) = split_flags(std::env::args().skip(1).collect());
    if args.is_empty() {
        usage();
    }

    match args[0].as_str() {
        "run" => {
            if args.len() < 3 {
                usage();
            }
            let maze = load_maze(&args[1]);
            let program = load_program(&args[2..]);
            let cfg = load_config(&flags);

            let report =
                evaluate(&maze, &program, &cfg).unwrap_or_else(|e| make_error(&e.to_string()));
            if flags.json {
                match serde_json::to_string_pretty(&report) {
                    Ok(s) => println!("{s}"),
                    Err(e) => make_error(&e.to_string()),
                }
            } else {
                let route: Vec<String> = report.route.iter().map(|p| p.to_string()).collect();
                println!("outcome: {}", report.outcome.as_str());
                println!("moves:   {}/{}", report.n_moves, cfg.max_moves);
                println!("score:   {}/{}", report.score, maze.route_cell_count());
                println!("route:   {}", route.join(" "));
            }
        }
        "score" => {
            if args.len() < 2 {
                usage();
            }
            let maze = load_maze(&args[1]);
            let route: Vec<Position> = args[2..].iter().map(|s| parse_position(s)).collect();
            println!("{}", maze.score_route(&route));
        }
        "render" => {
            if args.len() < 2 {
                usage();
            }
            print!("{}", load_maze(&args[1]));
        }
        "generate" => {
            if args.len() < 4 {
                usage();
            }
            let seed: u64 = args[1]
                .parse()
                .unwrap_or_else(|_| make_error("seed must be a number"));
            let w: u32 = args[2]
                .parse()
                .unwrap_or_else(|_| make_error("cells_w must be a number"));
            let h: u32 = args[3]
                .parse()
                .unwrap_or_else(|_| make_error("cells_h must be a number"));
            print!("{}", generate::carve(seed, w, h));
        }
        "paths" => match default_config_file() {
            Some(p) => println!("Config file: {}", p.display()),
            None => println!("Config file: (no config directory on this platform)"),
        },
        _ => usage(),
    }
}
