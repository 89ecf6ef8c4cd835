//! Display and output formatting utilities

use crate::config::OutputFormat;
use crate::solve::{EnumerationReport, Solution, SolveResult};
use crate::sudoku::board::digit_char;
use crate::sudoku::{Board, EMPTY};
use anyhow::Result;
use serde_json::json;

/// Format boards and solver results for display
pub struct SolutionFormatter;

impl SolutionFormatter {
    /// Matrix form: `|` between boxes, a blank line between bands of boxes
    pub fn format_board(board: &Board) -> String {
        let size = board.size();
        let box_size = board.box_size();
        let mut output = String::new();

        for row in 0..size {
            if row > 0 && row % box_size == 0 {
                output.push('\n');
            }
            let mut line = String::new();
            for (col, &digit) in board.row(row).iter().enumerate() {
                if col > 0 {
                    line.push_str(if col % box_size == 0 { " | " } else { " " });
                }
                line.push(match digit {
                    EMPTY => '.',
                    digit => digit_char(digit),
                });
            }
            output.push_str(&line);
            output.push('\n');
        }

        output
    }

    pub fn format_solution(solution: &Solution, format: OutputFormat) -> Result<String> {
        Ok(match format {
            OutputFormat::Text => format!(
                "Solution: {}\n\n{}",
                solution.board.to_digit_string(),
                Self::format_board(&solution.board)
            ),
            OutputFormat::Board => Self::format_board(&solution.board),
            OutputFormat::Json => solution.to_json()?,
        })
    }

    /// Format the outcome of a single solve; `quiet` drops everything but the digits
    pub fn format_solve_result(result: &SolveResult, format: OutputFormat, quiet: bool) -> Result<String> {
        if quiet && format != OutputFormat::Json {
            return Ok(match result {
                SolveResult::Solved(solution) => solution.board.to_digit_string(),
                SolveResult::Unsatisfiable => "UNSAT".to_string(),
                SolveResult::TimedOut(_) => "TIMEOUT".to_string(),
            });
        }

        match (result, format) {
            (SolveResult::Solved(solution), format) => Self::format_solution(solution, format),
            (SolveResult::Unsatisfiable, OutputFormat::Json) => {
                Ok(serde_json::to_string_pretty(&json!({ "status": "unsat" }))?)
            }
            (SolveResult::TimedOut(limit), OutputFormat::Json) => Ok(serde_json::to_string_pretty(
                &json!({ "status": "timeout", "timeout_seconds": limit.as_secs_f64() }),
            )?),
            (SolveResult::Unsatisfiable, _) => Ok("The puzzle has no solution (UNSAT)".to_string()),
            (SolveResult::TimedOut(limit), _) => Ok(format!(
                "The solver timed out after {:.1}s; the puzzle is undecided",
                limit.as_secs_f64()
            )),
        }
    }

    pub fn format_count(report: &EnumerationReport, format: OutputFormat, quiet: bool) -> Result<String> {
        Ok(match format {
            OutputFormat::Json => serde_json::to_string_pretty(report)?,
            _ if quiet => report.count.to_string(),
            _ => format!(
                "Solutions: {}\nSolver calls: {}\nTime: {:.3}s",
                report.count,
                report.solver_calls,
                report.elapsed.as_secs_f64()
            ),
        })
    }
}

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Format text with color (if terminal supports it)
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err() && (std::env::var("TERM").unwrap_or_default() != "dumb")
    }

    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    pub fn error(text: &str) -> String {
        Self::colored(text, Color::Red)
    }

    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }

    pub fn info(text: &str) -> String {
        Self::colored(text, Color::Blue)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
        }
    }
}
