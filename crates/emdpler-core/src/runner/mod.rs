//! Synchronous driver around the external solver executable.
//!
//! One run = one exclusively owned scratch directory holding the input deck
//! and the three result files. The directory is removed when the run ends,
//! on the error path as well, via the workspace guard's drop.

use crate::codec::{ResultTable, decode_table, normalize_phases};
use crate::deck::{INPUT_FILE_NAME, RESULT_COLUMNS, RESULT_FILE_NAMES, assemble_input_deck};
use crate::domain::{
    EmdplerError, EmdplerResult, FrequencySweep, InductionSweep, SoundingRequest, SoundingResponse,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// Scratch directory for a single solver invocation. Removal happens on
/// drop; a `Workspace` without a guard (plain path) is left in place.
#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
    _guard: Option<tempfile::TempDir>,
}

impl Workspace {
    pub fn scoped(guard: tempfile::TempDir) -> Self {
        Self {
            root: guard.path().to_path_buf(),
            _guard: Some(guard),
        }
    }

    pub fn unmanaged(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            _guard: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }
}

/// Injected working-directory collaborator: each acquisition must yield a
/// directory owned by exactly one invocation.
pub trait WorkspaceProvider {
    fn acquire(&self) -> EmdplerResult<Workspace>;
}

/// Default provider: a fresh `tmp_emdpler*` temporary directory per run.
#[derive(Debug, Clone, Copy, Default)]
pub struct TempWorkspaceProvider;

impl WorkspaceProvider for TempWorkspaceProvider {
    fn acquire(&self) -> EmdplerResult<Workspace> {
        let guard = tempfile::Builder::new()
            .prefix("tmp_emdpler")
            .tempdir()
            .map_err(|source| EmdplerError::io(std::env::temp_dir(), source))?;
        Ok(Workspace::scoped(guard))
    }
}

/// Solver executable next to the current binary, with the platform suffix.
pub fn default_executable() -> EmdplerResult<PathBuf> {
    let current = std::env::current_exe()
        .map_err(|source| EmdplerError::io(PathBuf::from("current_exe"), source))?;
    let dir = current.parent().unwrap_or_else(|| Path::new("."));
    Ok(dir.join(format!("emdpler{}", std::env::consts::EXE_SUFFIX)))
}

/// Blocking forward-model runner. No timeout and no retry: the solver is
/// invoked once per request and runs to completion.
#[derive(Debug)]
pub struct ForwardRunner<P = TempWorkspaceProvider> {
    executable: PathBuf,
    workspaces: P,
}

impl ForwardRunner<TempWorkspaceProvider> {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            workspaces: TempWorkspaceProvider,
        }
    }

    pub fn with_default_executable() -> EmdplerResult<Self> {
        Ok(Self::new(default_executable()?))
    }
}

impl<P: WorkspaceProvider> ForwardRunner<P> {
    pub fn with_provider(executable: impl Into<PathBuf>, workspaces: P) -> Self {
        Self {
            executable: executable.into(),
            workspaces,
        }
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Run the full cycle: assemble deck, write it into a fresh workspace,
    /// invoke the solver with the workspace as cwd, decode and
    /// cross-validate the three result tables. All-or-nothing; no partial
    /// response ever escapes.
    pub fn run(&self, request: &SoundingRequest) -> EmdplerResult<SoundingResponse> {
        // Deck errors abort before anything touches the filesystem.
        let deck = assemble_input_deck(request)?;

        if !self.executable.is_file() {
            return Err(EmdplerError::external(format!(
                "solver executable not found at '{}'",
                self.executable.display()
            )));
        }

        let workspace = self.workspaces.acquire()?;
        info!(
            workspace = %workspace.path().display(),
            dipole = %request.dipole,
            "running forward model"
        );

        let input_path = workspace.path().join(INPUT_FILE_NAME);
        fs::write(&input_path, &deck)
            .map_err(|source| EmdplerError::io(input_path.clone(), source))?;
        debug!(deck_bytes = deck.len(), "wrote input deck");

        let output = Command::new(&self.executable)
            .current_dir(workspace.path())
            .output()
            .map_err(|source| {
                EmdplerError::external(format!(
                    "failed to spawn '{}': {}",
                    self.executable.display(),
                    source
                ))
            })?;
        debug!(status = %output.status, "solver finished");

        if !output.status.success() {
            let status_text = output.status.code().map_or_else(
                || "terminated by signal".to_string(),
                |code| format!("exit code {code}"),
            );
            return Err(EmdplerError::external(format!(
                "solver failed with {status_text}"
            )));
        }

        let [r1, r2, r3] = self.decode_result_tables(workspace.path())?;
        cross_validate(&r1, &r2, &r3)?;
        Ok(build_response(&r1, &r2, &r3))
    }

    fn decode_result_tables(&self, workspace: &Path) -> EmdplerResult<[ResultTable; 3]> {
        let mut tables = Vec::with_capacity(RESULT_FILE_NAMES.len());
        for name in RESULT_FILE_NAMES {
            let path = workspace.join(name);
            let text = read_result_file(&path, name)?;
            tables.push(decode_table(&text, RESULT_COLUMNS, &path)?);
        }

        match <[ResultTable; 3]>::try_from(tables) {
            Ok(tables) => Ok(tables),
            Err(_) => unreachable!("RESULT_FILE_NAMES has exactly three entries"),
        }
    }
}

fn read_result_file(path: &Path, name: &str) -> EmdplerResult<String> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => Err(
            EmdplerError::external(format!("solver did not write expected output file '{name}'")),
        ),
        Err(source) => Err(EmdplerError::io(path, source)),
    }
}

fn cross_validate(r1: &ResultTable, r2: &ResultTable, r3: &ResultTable) -> EmdplerResult<()> {
    for (name, table) in RESULT_FILE_NAMES.iter().zip([r1, r2, r3]) {
        if table.row_count() == 0 {
            return Err(EmdplerError::TableMismatch {
                detail: format!("{name} contains no data rows"),
            });
        }
    }

    if r1.row_count() != r3.row_count() {
        return Err(EmdplerError::TableMismatch {
            detail: format!(
                "frequency tables disagree on row count: {} vs {}",
                r1.row_count(),
                r3.row_count()
            ),
        });
    }

    // Same strictness as the legacy driver: the frequency axes must be
    // bitwise identical, not merely close.
    if r1.column(0) != r3.column(0) {
        return Err(EmdplerError::TableMismatch {
            detail: "frequency columns of RESULT1.DAT and RESULT3.DAT differ".to_string(),
        });
    }

    Ok(())
}

fn build_response(r1: &ResultTable, r2: &ResultTable, r3: &ResultTable) -> SoundingResponse {
    let mut phase = r1.column(2);
    normalize_phases(&mut phase);
    let mut norm_phase = r3.column(2);
    normalize_phases(&mut norm_phase);
    let mut induction_phase = r2.column(2);
    normalize_phases(&mut induction_phase);

    SoundingResponse {
        frequency: FrequencySweep {
            freq: r1.column(0),
            ampl: r1.column(1),
            phase,
            norm_ampl: r3.column(1),
            norm_phase,
        },
        induction: InductionSweep {
            induction_number: r2.column(0),
            ampl: r2.column(1),
            phase: induction_phase,
        },
    }
}
