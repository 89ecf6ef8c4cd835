//! SAT backend calling an external solver executable

use super::constraints::Theory;
use super::dimacs;
use super::solver::{SatSolver, SolveOutcome};
use crate::error::{Error, Result};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use wait_timeout::ChildExt;

/// Placeholder replaced by the CNF input path
pub const CNF_PLACEHOLDER: &str = "{cnf}";
/// Placeholder replaced by the result file path
pub const RESULT_PLACEHOLDER: &str = "{result}";

/// A solver called via an external executable
///
/// The executable receives the CNF path and a result path through its
/// argument list (`{cnf}` and `{result}` placeholders, MiniSat order by
/// default). Its result file is parsed with
/// [`parse_solver_output`](dimacs::parse_solver_output); when the solver
/// writes no result file, its stdout is parsed instead.
#[derive(Debug, Clone)]
pub struct ExternalSolver {
    program: String,
    args: Vec<String>,
    timeout: Duration,
    keep_cnf: Option<PathBuf>,
    scratch_dir: Option<PathBuf>,
}

impl ExternalSolver {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args: vec![CNF_PLACEHOLDER.to_string(), RESULT_PLACEHOLDER.to_string()],
            timeout,
            keep_cnf: None,
            scratch_dir: None,
        }
    }

    /// Replace the argument template
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Write the CNF to `path` and leave it there after solving
    #[must_use]
    pub fn keep_cnf<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.keep_cnf = Some(path.as_ref().to_path_buf());
        self
    }

    /// Create temporary CNF and result files under `dir` instead of the system temp directory
    #[must_use]
    pub fn with_scratch_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.scratch_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run the solver on an existing CNF file
    pub fn solve_file(&self, cnf_path: &Path) -> Result<SolveOutcome> {
        // scratch space for the result and captured output, removed on drop
        let workdir = temp_builder().tempdir_in(self.scratch_root())?;
        let result_path = workdir.path().join("result.txt");
        let stdout_path = workdir.path().join("stdout.txt");
        let stderr_path = workdir.path().join("stderr.txt");

        let mut cmd = Command::new(&self.program);
        cmd.args(self.expand_args(cnf_path, &result_path))
            .stdin(Stdio::null())
            .stdout(File::create(&stdout_path)?)
            .stderr(File::create(&stderr_path)?);
        // own process group, so a timeout also reaches processes the solver starts
        #[cfg(unix)]
        std::os::unix::process::CommandExt::process_group(&mut cmd, 0);

        debug!(program = %self.program, cnf = %cnf_path.display(), "spawning solver");
        let start_time = Instant::now();
        let child = cmd.spawn().map_err(|e| {
            Error::SolverProcess(format!("failed to start '{}': {e}", self.program))
        })?;
        let mut guard = ChildGuard(child);

        let Some(status) = guard.0.wait_timeout(self.timeout)? else {
            guard.terminate();
            warn!(program = %self.program, timeout_ms = self.timeout.as_millis() as u64, "solver timed out");
            return Ok(SolveOutcome::TimedOut(self.timeout));
        };
        let solve_time = start_time.elapsed();

        let stderr = fs::read_to_string(&stderr_path).unwrap_or_default();
        if !stderr.trim().is_empty() {
            warn!(program = %self.program, "solver stderr: {}", stderr.trim());
        }
        check_exit_code(status)?;

        let output = match read_non_empty(&result_path)? {
            Some(text) => text,
            None => fs::read_to_string(&stdout_path)?,
        };
        let outcome = dimacs::parse_solver_output(&output)?;

        info!(
            backend = self.name(),
            solve_time_ms = solve_time.as_millis() as u64,
            "{outcome}"
        );
        Ok(outcome)
    }

    fn scratch_root(&self) -> PathBuf {
        self.scratch_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    fn expand_args(&self, cnf_path: &Path, result_path: &Path) -> Vec<OsString> {
        self.args
            .iter()
            .map(|arg| match arg.as_str() {
                CNF_PLACEHOLDER => cnf_path.as_os_str().to_owned(),
                RESULT_PLACEHOLDER => result_path.as_os_str().to_owned(),
                other => other
                    .replace(CNF_PLACEHOLDER, &cnf_path.to_string_lossy())
                    .replace(RESULT_PLACEHOLDER, &result_path.to_string_lossy())
                    .into(),
            })
            .collect()
    }
}

impl SatSolver for ExternalSolver {
    fn name(&self) -> &'static str {
        "external"
    }

    fn solve(&mut self, theory: &Theory) -> Result<SolveOutcome> {
        match &self.keep_cnf {
            Some(path) => {
                write_theory(theory, File::create(path)?)?;
                self.solve_file(path)
            }
            None => {
                let file = temp_builder().suffix(".cnf").tempfile_in(self.scratch_root())?;
                let mut writer = BufWriter::new(file);
                dimacs::write_cnf(&mut writer, theory)?;
                // deleted when `temp` goes out of scope
                let temp = writer.into_inner().map_err(|e| e.into_error())?.into_temp_path();
                self.solve_file(&temp)
            }
        }
    }
}

fn write_theory(theory: &Theory, file: File) -> io::Result<()> {
    dimacs::write_cnf(BufWriter::new(file), theory)
}

fn temp_builder() -> tempfile::Builder<'static, 'static> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("sudoku-sat-");
    builder
}

fn read_non_empty(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(text) if !text.trim().is_empty() => Ok(Some(text)),
        Ok(_) => Ok(None),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn check_exit_code(status: ExitStatus) -> Result<()> {
    match status.code() {
        // the usual SAT solver codes; the verdict itself comes from the output
        Some(0 | 10 | 20) => Ok(()),
        Some(code) => Err(Error::SolverProcess(format!("solver returned unexpected code {code}"))),
        None => Err(Error::SolverProcess("solver process terminated by signal".to_string())),
    }
}

/// Kills the child on drop unless it already exited
struct ChildGuard(Child);

impl ChildGuard {
    fn terminate(&mut self) {
        #[cfg(unix)]
        kill_process_group(self.0.id());
        let _ = self.0.kill();
        let _ = self.0.wait();
    }
}

/// SIGKILL to the group led by `leader`; the leader is not reaped yet
#[cfg(unix)]
fn kill_process_group(leader: u32) {
    let Ok(pgid) = libc::pid_t::try_from(leader) else {
        return;
    };
    // SAFETY: killpg only sends a signal; the group id is our unreaped child's pid
    unsafe {
        libc::killpg(pgid, libc::SIGKILL);
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if let Ok(None) = self.0.try_wait() {
            self.terminate();
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::sat::{Clause, VariableEncoder};
    use tempfile::TempDir;

    /// A fake solver: a shell script run through `sh`
    fn script_solver(dir: &TempDir, body: &str, timeout: Duration) -> ExternalSolver {
        let script = dir.path().join("solver.sh");
        fs::write(&script, body).unwrap();
        ExternalSolver::new("sh", timeout).with_args([
            script.to_string_lossy().into_owned(),
            CNF_PLACEHOLDER.to_string(),
            RESULT_PLACEHOLDER.to_string(),
        ])
    }

    fn unit_theory() -> Theory {
        let mut theory = Theory::new(VariableEncoder::new(1));
        theory.push(Clause::unit(1));
        theory
    }

    #[test]
    fn test_reads_result_file() {
        let dir = tempfile::tempdir().unwrap();
        // only answers SAT if the CNF file was written as expected
        let mut solver = script_solver(
            &dir,
            "head -n 1 \"$1\" | grep -q '^p cnf 1 1$' || exit 3\nprintf 'SAT\\n1 0\\n' > \"$2\"\nexit 10\n",
            Duration::from_secs(10),
        );

        let SolveOutcome::Sat(model) = solver.solve(&unit_theory()).unwrap() else {
            panic!("expected SAT");
        };
        assert!(model.is_true(1));
    }

    #[test]
    fn test_unsat_result() {
        let dir = tempfile::tempdir().unwrap();
        let mut solver = script_solver(&dir, "echo UNSAT > \"$2\"\nexit 20\n", Duration::from_secs(10));
        assert_eq!(solver.solve(&unit_theory()).unwrap(), SolveOutcome::Unsat);
    }

    #[test]
    fn test_falls_back_to_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let mut solver = script_solver(
            &dir,
            "echo 's SATISFIABLE'\necho 'v 1 0'\n",
            Duration::from_secs(10),
        );
        assert!(solver.solve(&unit_theory()).unwrap().is_sat());
    }

    #[test]
    fn test_timeout_kills_solver() {
        let dir = tempfile::tempdir().unwrap();
        let mut solver = script_solver(&dir, "exec sleep 30\n", Duration::from_millis(200));

        let start = Instant::now();
        let outcome = solver.solve(&unit_theory()).unwrap();
        assert_eq!(outcome, SolveOutcome::TimedOut(Duration::from_millis(200)));
        assert!(start.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn test_timeout_kills_processes_started_by_the_solver() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("alive");
        // the subshell is a grandchild, not replaced by exec
        let body = format!("(sleep 2; touch '{}')\n", marker.display());
        let mut solver = script_solver(&dir, &body, Duration::from_millis(200));

        let outcome = solver.solve(&unit_theory()).unwrap();
        assert_eq!(outcome, SolveOutcome::TimedOut(Duration::from_millis(200)));

        std::thread::sleep(Duration::from_secs(3));
        assert!(!marker.exists());
    }

    #[test]
    fn test_scratch_files_removed_on_every_exit_path() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = tempfile::tempdir().unwrap();
        let cases = [
            ("echo 'SAT' > \"$2\"\necho '1 0' >> \"$2\"\n", Duration::from_secs(10)),
            ("exec sleep 30\n", Duration::from_millis(200)),
            ("exit 3\n", Duration::from_secs(10)),
        ];

        for (body, timeout) in cases {
            let mut solver = script_solver(&dir, body, timeout).with_scratch_dir(scratch.path());
            let _ = solver.solve(&unit_theory());
            assert_eq!(fs::read_dir(scratch.path()).unwrap().count(), 0, "left files after: {body}");
        }
    }

    #[test]
    fn test_abnormal_exit_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut solver = script_solver(&dir, "exit 3\n", Duration::from_secs(10));
        assert!(matches!(
            solver.solve(&unit_theory()),
            Err(Error::SolverProcess(_))
        ));
    }

    #[test]
    fn test_garbage_output_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut solver = script_solver(&dir, "echo 'SAT maybe' > \"$2\"\necho 'x y z' >> \"$2\"\n", Duration::from_secs(10));
        assert!(matches!(
            solver.solve(&unit_theory()),
            Err(Error::SolverOutput(_))
        ));
    }

    #[test]
    fn test_missing_program() {
        let mut solver = ExternalSolver::new("definitely-not-a-sat-solver-binary", Duration::from_secs(1));
        assert!(matches!(
            solver.solve(&unit_theory()),
            Err(Error::SolverProcess(_))
        ));
    }

    #[test]
    fn test_keep_cnf_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let cnf = dir.path().join("theory.cnf");
        let mut solver = script_solver(&dir, "echo 'SAT' > \"$2\"\necho '1 0' >> \"$2\"\n", Duration::from_secs(10))
            .keep_cnf(&cnf);

        solver.solve(&unit_theory()).unwrap();
        assert_eq!(fs::read_to_string(&cnf).unwrap(), "p cnf 1 1\n1 0\n");
    }

    #[test]
    fn test_placeholders_inside_arguments() {
        let solver = ExternalSolver::new("solver", Duration::from_secs(1))
            .with_args(["--input={cnf}", "{result}"]);
        let args = solver.expand_args(Path::new("/tmp/a.cnf"), Path::new("/tmp/r.txt"));
        assert_eq!(args, vec![OsString::from("--input=/tmp/a.cnf"), OsString::from("/tmp/r.txt")]);
    }
}
