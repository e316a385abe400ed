//! Command line front end for the logic-grid solver

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use logic_grid_solver::{
    config::{CliOverrides, OutputFormat, Settings},
    puzzle::{create_example_puzzles, load_puzzle_from_file, ClueOutcome, ClueResult, Command, Reply, Session},
    utils::{ColorOutput, ReportFormatter},
};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "logic_grid_solver")]
#[command(about = "Logic grid puzzle solver")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a puzzle's clues and show where they lead
    Solve {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Puzzle file (overrides config)
        #[arg(short, long)]
        puzzle: Option<PathBuf>,

        /// Extra clue to apply after the puzzle's own clues
        #[arg(long = "clue")]
        clues: Vec<String>,

        /// Directory to write the report into (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write the report as JSON
        #[arg(long)]
        json: bool,

        /// Evaluate clues on all cores
        #[arg(long)]
        parallel: bool,

        /// Largest candidate pool to accept (overrides config)
        #[arg(long)]
        max_candidates: Option<usize>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Enter clues one at a time
    Play {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Puzzle file (overrides config)
        #[arg(short, long)]
        puzzle: Option<PathBuf>,

        /// Skip the clues listed in the puzzle file
        #[arg(long)]
        fresh: bool,
    },

    /// Create a default configuration and example puzzles
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },

    /// List the parse-strings a puzzle understands
    Vocabulary {
        /// Puzzle file
        #[arg(short, long)]
        puzzle: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Solve { verbose: true, .. } => "debug",
        _ => "warn",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    match cli.command {
        Commands::Solve {
            config, puzzle, clues, output, json,
            parallel, max_candidates, no_color, verbose
        } => {
            let overrides = CliOverrides {
                puzzle_file: puzzle,
                output_dir: output,
                format: json.then_some(OutputFormat::Json),
                parallel: parallel.then_some(true),
                max_candidates,
                no_color,
            };
            solve_command(config, overrides, clues, verbose)
        }
        Commands::Play { config, puzzle, fresh } => {
            play_command(config, puzzle, fresh)
        }
        Commands::Setup { directory, force } => {
            setup_command(directory, force)
        }
        Commands::Vocabulary { puzzle } => {
            vocabulary_command(puzzle)
        }
    }
}

fn load_settings(config_path: &Path, overrides: &CliOverrides) -> Result<Settings> {
    let mut settings = if config_path.exists() {
        Settings::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        println!("{}", ColorOutput::warning(&format!(
            "Config file {} not found, using defaults", config_path.display()
        )));
        Settings::default()
    };

    settings.merge_with_cli(overrides);
    settings.validate()
        .context("Configuration validation failed")?;
    settings.validate_input()?;

    if !settings.display.use_color {
        ColorOutput::disable();
    }

    Ok(settings)
}

fn print_outcome(outcome: &ClueOutcome) {
    let line = format!("  {}", outcome);
    match outcome.result {
        ClueResult::Accepted => println!("{}", ColorOutput::success(&line)),
        ClueResult::Inconsistent => println!("{}", ColorOutput::warning(&line)),
        ClueResult::Rejected { .. } => println!("{}", ColorOutput::error(&line)),
    }
}

fn solve_command(
    config_path: PathBuf,
    overrides: CliOverrides,
    extra_clues: Vec<String>,
    verbose: bool,
) -> Result<()> {
    println!("{}", ColorOutput::info("🔄 Starting Logic Grid Solver"));

    let settings = load_settings(&config_path, &overrides)?;

    if verbose {
        println!("Configuration:");
        println!("  Puzzle file: {}", settings.input.puzzle_file.display());
        println!("  Parallel evaluation: {}", settings.engine.parallel_evaluation);
        println!("  Max candidates: {}", settings.engine.max_candidates);
        println!();
    }

    let start_time = Instant::now();
    let mut session = Session::new(settings.clone())
        .context("Failed to open puzzle")?;

    println!("{}", session);
    if verbose {
        println!("{}", session.puzzle().engine().layout().statistics());
    }

    let total = session.puzzle_clues().len() + extra_clues.len();
    println!("{}", ColorOutput::info(&format!("🧮 Applying {} clue(s)...", total)));

    for outcome in session.apply_puzzle_clues() {
        print_outcome(&outcome);
    }
    for clue in &extra_clues {
        print_outcome(&session.evaluate(clue));
    }

    let total_time = start_time.elapsed();
    println!("\n{}", session.render_views());

    if session.puzzle().solved() {
        println!("{}", ColorOutput::success(&format!(
            "✅ Puzzle solved in {:.3}s",
            total_time.as_secs_f64()
        )));
    } else {
        println!("{}", ColorOutput::warning(&format!(
            "❌ Puzzle not solved, {} candidate(s) remain",
            session.puzzle().candidate_count()
        )));
    }

    if let Some(output_dir) = &settings.output.output_directory {
        println!("\n{}", ColorOutput::info("💾 Saving report..."));
        let path = ReportFormatter::save_report(&session.report(), output_dir, settings.output.format)
            .context("Failed to save report")?;
        println!("{}", ColorOutput::success(&format!("Report saved to {}", path.display())));
    }

    Ok(())
}

fn play_command(config_path: PathBuf, puzzle_file: Option<PathBuf>, fresh: bool) -> Result<()> {
    let overrides = CliOverrides {
        puzzle_file,
        ..CliOverrides::default()
    };
    let settings = load_settings(&config_path, &overrides)?;
    let mut session = Session::new(settings)
        .context("Failed to open puzzle")?;

    println!("{}", session);
    if !fresh {
        for outcome in session.apply_puzzle_clues() {
            print_outcome(&outcome);
        }
    }
    println!("{}", Command::help());

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run_session(&mut session, stdin.lock(), stdout.lock())
}

/// Drive a session from line-oriented input until `q` or end of input
fn run_session<R: BufRead, W: Write>(session: &mut Session, input: R, mut output: W) -> Result<()> {
    let mut lines = input.lines();

    loop {
        write!(output, "{}", ColorOutput::prompt("> "))?;
        output.flush()?;

        let Some(line) = lines.next() else { break };
        let line = line.context("Failed to read input")?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(err) => {
                writeln!(output, "{}", ColorOutput::error(&err.to_string()))?;
                continue;
            }
        };

        let reply = match session.handle(command) {
            Reply::NeedClue => {
                write!(output, "{}", ColorOutput::prompt("Enter Clue: "))?;
                output.flush()?;
                match lines.next() {
                    Some(clue) => Reply::Outcome(session.evaluate(&clue.context("Failed to read input")?)),
                    None => break,
                }
            }
            reply => reply,
        };

        match reply {
            Reply::Output(text) => writeln!(output, "{}", text)?,
            Reply::Outcome(outcome) => {
                match &outcome.result {
                    ClueResult::Accepted => {
                        writeln!(output, "{}", ColorOutput::success("Clue accepted"))?;
                        if session.puzzle().solved() {
                            writeln!(output, "{}", ColorOutput::success("✅ Puzzle solved!"))?;
                        }
                    }
                    ClueResult::Inconsistent => writeln!(output, "{}", ColorOutput::warning(
                        "This clue is logically inconsistent with previous clues"
                    ))?,
                    ClueResult::Rejected { reason } => {
                        writeln!(output, "{}", ColorOutput::error(&format!("Error: {}", reason)))?
                    }
                }
            }
            Reply::NeedClue => {}
            Reply::Quit => break,
        }
    }

    Ok(())
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("🛠️  Setting up project structure..."));

    let config_dir = directory.join("config");
    let puzzle_dir = directory.join("puzzles");
    let output_dir = directory.join("output/reports");

    for dir in [&config_dir, &puzzle_dir, &output_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        let default_settings = Settings::default();
        default_settings.to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    create_example_puzzles(&puzzle_dir)
        .context("Failed to create example puzzles")?;
    println!("Created example puzzles in: {}", puzzle_dir.display());

    // Report-writing variant of the defaults
    let variants_dir = config_dir.join("variants");
    std::fs::create_dir_all(&variants_dir)?;

    let mut numbered_config = Settings::default();
    numbered_config.input.puzzle_file = PathBuf::from("puzzles/numbered.txt");
    numbered_config.output.format = OutputFormat::Json;
    numbered_config.output.output_directory = Some(PathBuf::from("output/reports"));
    numbered_config.to_file(variants_dir.join("numbered.yaml"))?;

    println!("Created configuration variants in: {}", variants_dir.display());

    println!("\n{}", ColorOutput::success("✅ Setup complete!"));
    println!("\nNext steps:");
    println!("1. Edit configuration files in {}", config_dir.display());
    println!("2. Add your own puzzles to {}", puzzle_dir.display());
    println!("3. Run: cargo run -- solve --config config/default.yaml");
    println!("4. Or play interactively: cargo run -- play --puzzle puzzles/numbered.txt --fresh");

    Ok(())
}

fn vocabulary_command(puzzle_path: PathBuf) -> Result<()> {
    let definition = load_puzzle_from_file(&puzzle_path)
        .with_context(|| format!("Failed to load puzzle from {}", puzzle_path.display()))?;
    definition.validate()?;

    println!("{}", ColorOutput::info(&format!(
        "📖 Parse-strings for {} ({} variables):",
        definition.name,
        definition.variable_count()
    )));
    let parser = logic_grid_solver::parse::Parser::from_tokens(definition.resolved_parse_strings())
        .context("Invalid parse-strings")?;
    print!("{}", parser);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from(&[
            "logic_grid_solver",
            "solve",
            "--config", "test.yaml",
            "--clue", "6 + 8",
            "--clue", "17 > 14",
            "--json",
        ]);
        assert!(cli.is_ok());

        match cli.unwrap().command {
            Commands::Solve { clues, json, parallel, .. } => {
                assert_eq!(clues, vec!["6 + 8", "17 > 14"]);
                assert!(json);
                assert!(!parallel);
            }
            _ => panic!("expected solve"),
        }

        assert!(Cli::try_parse_from(&["logic_grid_solver", "vocabulary"]).is_err());
        assert!(Cli::try_parse_from(&["logic_grid_solver", "play", "--puzzle", "p.txt", "--fresh"]).is_ok());
    }

    #[test]
    fn test_setup_command() {
        let temp_dir = tempdir().unwrap();
        let result = setup_command(temp_dir.path().to_path_buf(), false);

        assert!(result.is_ok());
        assert!(temp_dir.path().join("config/default.yaml").exists());
        assert!(temp_dir.path().join("config/variants/numbered.yaml").exists());
        assert!(temp_dir.path().join("puzzles/pet_owners.yaml").exists());
        assert!(temp_dir.path().join("puzzles/numbered.txt").exists());
        assert!(temp_dir.path().join("output/reports").exists());

        let settings = Settings::from_file(temp_dir.path().join("config/default.yaml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_run_session() {
        let temp_dir = tempdir().unwrap();
        create_example_puzzles(temp_dir.path()).unwrap();

        let mut settings = Settings::default();
        settings.display.use_color = false;
        settings.input.puzzle_file = temp_dir.path().join("numbered.txt");
        let mut session = Session::new(settings).unwrap();

        let input = "e 6 + 8\nbogus\ne\n((~2 * ~22) * 4)\ne (6 +\ne ~6 * ~8\ne 17 > 14\ns\nq\ne 0\n";
        let mut output = Vec::new();
        run_session(&mut session, input.as_bytes(), &mut output).unwrap();
        let output = String::from_utf8(output).unwrap();

        assert!(output.contains("Invalid command 'bogus'"));
        assert!(output.contains("Enter Clue: "));
        assert!(output.contains("Error: clue ended unexpectedly"));
        assert!(output.contains("This clue is logically inconsistent with previous clues"));
        assert!(output.contains("Puzzle solved!"));
        assert!(output.contains("Summary View: Numbered"));
        // Input after `q` is never read
        assert_eq!(session.history().len(), 5);
        assert!(session.puzzle().solved());
    }
}
