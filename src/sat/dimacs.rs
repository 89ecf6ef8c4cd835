//! DIMACS CNF serialization and solver result parsing

use super::constraints::{Clause, Theory};
use super::solver::{Model, SolveOutcome};
use crate::error::{Error, Result};
use std::io::{self, Write};

/// Writes a clause collection in DIMACS CNF form
///
/// The header is `p cnf <variable_count> <clauses>`, followed by one line per
/// clause of space separated literals terminated by `0`. Equal inputs always
/// produce identical bytes.
pub fn write_clauses<W: Write>(
    mut writer: W,
    variable_count: usize,
    clauses: &[Clause],
) -> io::Result<()> {
    writeln!(writer, "p cnf {variable_count} {}", clauses.len())?;
    clauses
        .iter()
        .try_for_each(|clause| write_clause(&mut writer, clause))?;
    writer.flush()
}

/// Writes a theory, declaring all N³ variables of its board
pub fn write_cnf<W: Write>(writer: W, theory: &Theory) -> io::Result<()> {
    write_clauses(writer, theory.variable_count(), theory.clauses())
}

/// Like [`write_cnf`] with a leading `c` comment line
pub fn write_cnf_annotated<W: Write>(mut writer: W, theory: &Theory, comment: &str) -> io::Result<()> {
    writeln!(writer, "c {comment}")?;
    write_cnf(writer, theory)
}

/// The DIMACS text of a theory
pub fn to_cnf_string(theory: &Theory) -> String {
    let mut buffer = Vec::new();
    // writing into a Vec cannot fail
    let _ = write_cnf(&mut buffer, theory);
    String::from_utf8_lossy(&buffer).into_owned()
}

fn write_clause<W: Write>(writer: &mut W, clause: &Clause) -> io::Result<()> {
    clause
        .literals
        .iter()
        .try_for_each(|lit| write!(writer, "{lit} "))?;
    writeln!(writer, "0")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Sat,
    Unsat,
    Unknown,
}

/// Parses the answer of an external SAT solver
///
/// Accepts MiniSat result files (`SAT` / `UNSAT` / `INDET` followed by a
/// literal line), SAT competition output (`s ...` and `v ...` lines) and bare
/// one-literal-per-line models. A positive literal means the variable is true.
pub fn parse_solver_output(output: &str) -> Result<SolveOutcome> {
    let mut status = None;
    let mut literals = Vec::new();
    let mut terminated = false;

    for (line_no, line) in output.lines().enumerate() {
        let mut tokens = line.split_whitespace().peekable();
        let Some(&first) = tokens.peek() else {
            continue;
        };

        match first {
            "c" => continue,
            "s" => {
                tokens.next();
                let rest: Vec<_> = tokens.collect();
                status = Some(parse_status(&rest.join(" ")).ok_or_else(|| {
                    Error::SolverOutput(format!("unrecognized status line {}: '{line}'", line_no + 1))
                })?);
                continue;
            }
            "v" => {
                tokens.next();
            }
            word => {
                if let Some(parsed) = parse_status(word) {
                    status = Some(parsed);
                    continue;
                }
            }
        }

        for token in tokens {
            if terminated {
                break;
            }
            let literal: i32 = token.parse().map_err(|_| {
                Error::SolverOutput(format!("invalid literal '{token}' on line {}", line_no + 1))
            })?;
            if literal == 0 {
                terminated = true;
            } else {
                literals.push(literal);
            }
        }
    }

    match (status, literals.is_empty()) {
        (Some(Status::Unsat), _) => Ok(SolveOutcome::Unsat),
        (Some(Status::Unknown), _) => Err(Error::SolverOutput(
            "solver reported an indeterminate result".to_string(),
        )),
        (Some(Status::Sat), true) => Err(Error::SolverOutput(
            "satisfiable verdict without an assignment".to_string(),
        )),
        (None, true) => Err(Error::SolverOutput("no verdict in solver output".to_string())),
        (Some(Status::Sat) | None, false) => Ok(SolveOutcome::Sat(Model::from_literals(literals)?)),
    }
}

fn parse_status(word: &str) -> Option<Status> {
    match word {
        "SAT" | "SATISFIABLE" => Some(Status::Sat),
        "UNSAT" | "UNSATISFIABLE" => Some(Status::Unsat),
        "INDET" | "UNKNOWN" => Some(Status::Unknown),
        _ => None,
    }
}
