//! Kill a configured list of programs, then optionally power off.

use std::collections::BTreeSet;
use std::path::Path;
use std::process::Command;

use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::error::SenpaiError;
use crate::watchlist::{read_lines, write_lines};

/// Read the close list, creating it from `defaults` when missing.
pub fn load_close_list(path: &Path, defaults: &[String]) -> Result<Vec<String>, SenpaiError> {
    if !path.exists() {
        write_lines(path, defaults)?;
        tracing::info!(path = %path.display(), "created default close list");
        return Ok(defaults.to_vec());
    }
    read_lines(path)
}

/// Names (deduplicated, sorted) from `running` that appear in `targets`,
/// compared case-insensitively.
pub fn matching<'a, I>(running: I, targets: &[String]) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let targets: BTreeSet<String> = targets.iter().map(|t| t.trim().to_lowercase()).collect();
    running
        .into_iter()
        .filter(|name| targets.contains(&name.to_lowercase()))
        .map(String::from)
        .collect()
}

/// One sweep over the process table.
pub struct Closer {
    system: System,
    targets: Vec<String>,
    own_pid: Option<Pid>,
}

impl Closer {
    pub fn new(targets: Vec<String>) -> Self {
        Self {
            system: System::new(),
            targets,
            own_pid: sysinfo::get_current_pid().ok(),
        }
    }

    /// Refresh the process table and kill every matching process except
    /// ourselves. Returns the distinct names that were found.
    pub fn sweep(&mut self) -> BTreeSet<String> {
        self.system.refresh_processes(ProcessesToUpdate::All, true);

        let candidates: Vec<(Pid, String)> = self
            .system
            .processes()
            .iter()
            .filter(|(pid, _)| Some(**pid) != self.own_pid)
            .map(|(pid, p)| (*pid, p.name().to_string_lossy().into_owned()))
            .collect();

        let found = matching(candidates.iter().map(|(_, n)| n.as_str()), &self.targets);

        for (pid, name) in candidates.iter().filter(|(_, n)| found.contains(n)) {
            let killed = self
                .system
                .process(*pid)
                .is_some_and(|process| process.kill());
            if killed {
                tracing::info!(pid = pid.as_u32(), name = %name, "process killed");
            } else {
                tracing::warn!(pid = pid.as_u32(), name = %name, "process could not be killed");
            }
        }

        found
    }
}

/// Program and arguments that power the machine off.
pub fn shutdown_command() -> (&'static str, &'static [&'static str]) {
    if cfg!(windows) {
        ("shutdown", &["/s", "/t", "5"])
    } else {
        ("shutdown", &["-h", "now"])
    }
}

pub fn shutdown() -> Result<(), SenpaiError> {
    let (program, args) = shutdown_command();
    tracing::info!(program, ?args, "shutdown initiated");
    let status = Command::new(program).args(args).status()?;
    if !status.success() {
        return Err(SenpaiError::Process(format!("{program} exited with {status}")));
    }
    Ok(())
}
