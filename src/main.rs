//! Main CLI application for the Sudoku SAT solver

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use sudoku_sat::{
    config::{CliOverrides, OutputFormat, Settings, SolverBackend},
    sat::{dimacs, PairStrategy, TheoryGenerator},
    solve::{SolutionValidator, SolveResult, SudokuProblem},
    sudoku::{create_example_puzzles, load_board_from_file, parse_board_from_string, Board},
    utils::{ColorOutput, SolutionFormatter},
};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "sudoku_sat")]
#[command(about = "Sudoku solver built on a SAT encoding")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a puzzle, or count its solutions
    Solve {
        /// Puzzle as a row-major digit string, `0` or `.` for empty cells
        board: Option<String>,

        /// Read the puzzle from a file instead
        #[arg(short, long, conflicts_with = "board")]
        file: Option<PathBuf>,

        /// Count all solutions instead of printing one
        #[arg(long)]
        count: bool,

        /// Print only the solution digits or the count
        #[arg(short, long)]
        quiet: bool,

        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Solver backend (overrides config)
        #[arg(short, long, value_enum)]
        backend: Option<SolverBackend>,

        /// Solver timeout in seconds (overrides config)
        #[arg(short, long)]
        timeout: Option<u64>,

        /// External solver executable (overrides config)
        #[arg(long)]
        solver_command: Option<String>,

        /// Box pair strategy (overrides config)
        #[arg(long, value_enum)]
        pair_strategy: Option<PairStrategy>,

        /// Output format (overrides config)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,

        /// Keep the generated CNF file at this path
        #[arg(long)]
        keep_cnf: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Write the DIMACS theory of a puzzle without solving it
    Encode {
        /// Puzzle as a row-major digit string
        board: Option<String>,

        /// Read the puzzle from a file instead
        #[arg(short, long, conflicts_with = "board")]
        file: Option<PathBuf>,

        /// Output CNF file
        #[arg(short, long)]
        output: PathBuf,

        /// Box pair strategy
        #[arg(long, value_enum, default_value_t = PairStrategy::Minimal)]
        pair_strategy: PairStrategy,

        /// Print clause statistics
        #[arg(long)]
        stats: bool,
    },

    /// Check that a completed board solves a puzzle
    Validate {
        /// The puzzle
        puzzle: String,

        /// The candidate solution
        solution: String,
    },

    /// Create a default configuration and example puzzles
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let verbose = matches!(cli.command, Commands::Solve { verbose: true, .. });
    init_logging(verbose)?;

    match cli.command {
        Commands::Solve {
            board,
            file,
            count,
            quiet,
            config,
            backend,
            timeout,
            solver_command,
            pair_strategy,
            format,
            keep_cnf,
            verbose,
        } => {
            let overrides = CliOverrides {
                backend,
                timeout_seconds: timeout,
                command: solver_command,
                keep_cnf,
                pair_strategy,
                format,
            };
            let board = read_board(board, file)?;
            solve_command(board, &config, &overrides, count, quiet, verbose)
        }
        Commands::Encode {
            board,
            file,
            output,
            pair_strategy,
            stats,
        } => {
            let board = read_board(board, file)?;
            encode_command(&board, &output, pair_strategy, stats)
        }
        Commands::Validate { puzzle, solution } => validate_command(&puzzle, &solution),
        Commands::Setup { directory, force } => setup_command(directory, force),
    }
}

fn init_logging(verbose: bool) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(if verbose { Level::INFO } else { Level::WARN })
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to install logger")?;
    Ok(())
}

fn read_board(board: Option<String>, file: Option<PathBuf>) -> Result<Board> {
    match (board, file) {
        (Some(board), _) => parse_board_from_string(&board).context("Invalid puzzle"),
        (None, Some(path)) => load_board_from_file(&path),
        (None, None) => anyhow::bail!("Provide a puzzle string or --file"),
    }
}

fn load_settings(config_path: &Path, overrides: &CliOverrides) -> Result<Settings> {
    let mut settings = if config_path.exists() {
        Settings::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        info!("Config file {} not found, using defaults", config_path.display());
        Settings::default()
    };

    settings.merge_with_cli(overrides);
    settings.validate().context("Configuration validation failed")?;
    Ok(settings)
}

fn solve_command(
    board: Board,
    config_path: &Path,
    overrides: &CliOverrides,
    count: bool,
    quiet: bool,
    verbose: bool,
) -> Result<()> {
    let settings = load_settings(config_path, overrides)?;
    let format = settings.output.format;
    let problem = SudokuProblem::new(board, settings);

    if verbose {
        println!("{}\n{}", ColorOutput::info("Puzzle:"), SolutionFormatter::format_board(problem.puzzle()));
        println!("{}", problem.encoding_statistics());
    }

    if count {
        let report = problem
            .count_solutions()
            .context("Failed to count solutions")?;
        println!("{}", SolutionFormatter::format_count(&report, format, quiet)?);
        return Ok(());
    }

    let result = problem.solve().context("Failed to solve puzzle")?;
    let output = SolutionFormatter::format_solve_result(&result, format, quiet)?;

    match result {
        SolveResult::Solved(_) => println!("{output}"),
        SolveResult::Unsatisfiable => {
            if quiet || format == OutputFormat::Json {
                println!("{output}");
            } else {
                println!("{}", ColorOutput::warning(&output));
            }
        }
        SolveResult::TimedOut(limit) => {
            println!("{output}");
            anyhow::bail!("Solver timed out after {}s", limit.as_secs());
        }
    }

    Ok(())
}

fn encode_command(board: &Board, output: &Path, pair_strategy: PairStrategy, stats: bool) -> Result<()> {
    let (theory, statistics) = TheoryGenerator::new(pair_strategy).generate_with_statistics(board);

    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let file = File::create(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    let comment = format!("sudoku {} ({:?} box pairs)", board.to_digit_string(), pair_strategy);
    dimacs::write_cnf_annotated(BufWriter::new(file), &theory, &comment)
        .with_context(|| format!("Failed to write CNF to {}", output.display()))?;

    if stats {
        println!("{statistics}");
    }
    println!(
        "{}",
        ColorOutput::success(&format!(
            "Wrote {} clauses over {} variables to {}",
            theory.len(),
            theory.variable_count(),
            output.display()
        ))
    );
    Ok(())
}

fn validate_command(puzzle: &str, solution: &str) -> Result<()> {
    let puzzle = parse_board_from_string(puzzle).context("Invalid puzzle")?;
    let solution = parse_board_from_string(solution).context("Invalid solution")?;

    let result = SolutionValidator::new().validate(&puzzle, &solution);
    if result.is_valid {
        println!("{}", ColorOutput::success("Solution is valid"));
        Ok(())
    } else {
        println!("{}", ColorOutput::error("Solution is invalid"));
        for violation in &result.violations {
            println!("  {violation}");
        }
        anyhow::bail!("{} rule violation(s)", result.violations.len())
    }
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    let config_dir = directory.join("config");
    let puzzle_dir = directory.join("puzzles");

    std::fs::create_dir_all(&config_dir)
        .with_context(|| format!("Failed to create directory {}", config_dir.display()))?;

    write_config(&config_dir.join("default.yaml"), &Settings::default(), force)?;

    // in-process backend, no external solver needed
    let mut cadical = Settings::default();
    cadical.solver.backend = SolverBackend::Cadical;
    write_config(&config_dir.join("cadical.yaml"), &cadical, force)?;

    create_example_puzzles(&puzzle_dir).context("Failed to create example puzzles")?;
    println!("Created example puzzles in: {}", puzzle_dir.display());

    println!("\n{}", ColorOutput::success("Setup complete!"));
    println!("\nNext steps:");
    println!("1. Edit configuration files in {}", config_dir.display());
    println!("2. Run: sudoku_sat solve --file {}", puzzle_dir.join("easy.txt").display());

    Ok(())
}

/// Write `settings` unless the file exists and `force` is not set
fn write_config(path: &Path, settings: &Settings, force: bool) -> Result<()> {
    if path.exists() && !force {
        println!("Skipped: {} (already exists)", path.display());
        return Ok(());
    }
    settings
        .to_file(path)
        .with_context(|| format!("Failed to write configuration {}", path.display()))?;
    println!("Created: {}", path.display());
    Ok(())
}
