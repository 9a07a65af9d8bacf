use std::io;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;

use tracing::{debug, info, warn};

/// Opens files with an external program.
pub trait Launcher {
    /// Start opening `path` without waiting for the program to finish.
    fn open(&mut self, path: &Path) -> io::Result<()>;
}

/// Launches a configured program, or the platform default application.
#[derive(Debug, Clone, Default)]
pub struct SystemLauncher {
    program: Option<String>,
}

impl SystemLauncher {
    pub fn new(program: Option<&str>) -> Self {
        Self {
            program: program.map(str::to_string),
        }
    }

    /// The configured program; `None` means the platform default.
    pub fn program(&self) -> Option<&str> {
        self.program.as_deref()
    }

    /// Spawn `program path` and reap it from a background thread.
    fn spawn_program(program: &str, path: &Path) -> io::Result<()> {
        let mut child = Command::new(program)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        let pid = child.id();
        thread::Builder::new()
            .name(format!("launcher-wait-{pid}"))
            .spawn(move || match child.wait() {
                Ok(status) => debug!(pid, %status, "launched program exited"),
                Err(e) => warn!(pid, error = %e, "waiting on launched program failed"),
            })?;
        Ok(())
    }
}

impl Launcher for SystemLauncher {
    fn open(&mut self, path: &Path) -> io::Result<()> {
        match &self.program {
            Some(program) => {
                info!(program = %program, path = %path.display(), "launching");
                Self::spawn_program(program, path)
            }
            None => {
                info!(path = %path.display(), "opening with system default");
                opener::open(path).map_err(io::Error::other)
            }
        }
    }
}
