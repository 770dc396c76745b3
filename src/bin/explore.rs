/// CLI demo harness: load an ASCII map, optionally load `ExploreOptions`
/// from a JSON config file, run the explorer to completion, and print a
/// tick-by-tick summary. A collaborator of the core (spec section 1's
/// out-of-scope "CLI argument parsing" / "timing and progress callbacks"),
/// not part of it, mirroring how the teacher's `main.rs` sits outside
/// `lib.rs`.
use std::env;
use std::process::ExitCode;

use hpa_explore::map_loader::load_map_from_file;
use hpa_explore::{explore, Cell, ExploreInput, ExploreOptions, ProgressEvent};

/// Read `ExploreOptions` from a JSON config file (SPEC_FULL.md section 1:
/// "a demo or future config file can supply it; the core does not read
/// files itself"). A plain `String` error, matching the teacher's own
/// `Result<Self, String>` loader style rather than the core's `thiserror`
/// taxonomy, since this is CLI-local plumbing, not a core operation.
fn load_options_from_file(path: &str) -> Result<ExploreOptions, String> {
    let data = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_json::from_str(&data).map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("usage: {} <map_file> [start_row start_col [config_file]]", args[0]);
        return ExitCode::FAILURE;
    }
    let map_file = &args[1];
    let start_row: usize = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(0);
    let start_col: usize = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(0);

    let maze = match load_map_from_file(map_file) {
        Ok(grid) => grid,
        Err(e) => {
            eprintln!("failed to load map: {e}");
            return ExitCode::FAILURE;
        }
    };

    let input = ExploreInput {
        maze,
        start: Cell::new(start_row, start_col),
    };
    let options = match args.get(4) {
        Some(config_file) => match load_options_from_file(config_file) {
            Ok(opts) => opts,
            Err(e) => {
                eprintln!("failed to load config: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => ExploreOptions::default(),
    };

    let mut tick: usize = 0;
    let mut on_progress = |event: &ProgressEvent| {
        println!(
            "tick {:>5}: pos=({:>3},{:>3}) heading={:?} coverage={:>6.2}% target={:?}",
            tick, event.agent_position.row, event.agent_position.col, event.agent_heading, event.coverage, event.current_target
        );
        tick += 1;
    };

    let result = match explore(&input, &options, Some(&mut on_progress)) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("exploration aborted: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!("=== exploration complete ===");
    println!("outcome: {:?}", result.outcome);
    println!("success: {}", result.success);
    println!("final coverage: {:.2}%", result.final_coverage);
    println!("trajectory length: {}", result.trajectory.len());
    println!("iterations: {}", result.metrics.iterations);
    println!("replans: {}", result.metrics.replans);
    println!("abandonments: {}", result.metrics.abandonments);
    println!("full 360 scans: {}", result.metrics.full_scans);

    ExitCode::SUCCESS
}
