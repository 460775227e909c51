//! In-process stand-ins for external programs.

use std::cell::RefCell;
use std::fs;
use std::io;

use crate::service::REQUIREMENTS_DIR;
use crate::util::process::{CommandOutput, CommandSpec, Runner};

enum Behaviour {
    Exit { code: i32, stderr: String },
    NotFound,
}

/// Records every spec it is asked to run and answers with a scripted result.
pub struct RecordingRunner {
    behaviour: Behaviour,
    installs: Vec<(&'static str, &'static str)>,
    calls: RefCell<Vec<CommandSpec>>,
}

impl RecordingRunner {
    pub fn succeeding() -> Self {
        Self::with(Behaviour::Exit {
            code: 0,
            stderr: String::new(),
        })
    }

    pub fn failing(code: i32, stderr: &str) -> Self {
        Self::with(Behaviour::Exit {
            code,
            stderr: stderr.to_string(),
        })
    }

    pub fn unstartable() -> Self {
        Self::with(Behaviour::NotFound)
    }

    fn with(behaviour: Behaviour) -> Self {
        Self {
            behaviour,
            installs: Vec::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// On a successful run, write these files under `.requirements/` in the
    /// spec's working directory, the way pip would.
    pub fn installing(mut self, files: &[(&'static str, &'static str)]) -> Self {
        self.installs.extend_from_slice(files);
        self
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.borrow().clone()
    }
}

impl Runner for RecordingRunner {
    fn run(&self, spec: &CommandSpec) -> io::Result<CommandOutput> {
        self.calls.borrow_mut().push(spec.clone());
        match &self.behaviour {
            Behaviour::NotFound => Err(io::Error::new(
                io::ErrorKind::NotFound,
                "program not found",
            )),
            Behaviour::Exit { code, stderr } => {
                if *code == 0
                    && let Some(dir) = &spec.current_dir
                {
                    let target = dir.join(REQUIREMENTS_DIR);
                    for (name, body) in &self.installs {
                        let path = target.join(name);
                        if let Some(parent) = path.parent() {
                            fs::create_dir_all(parent)?;
                        }
                        fs::write(path, body)?;
                    }
                }
                Ok(CommandOutput {
                    code: Some(*code),
                    stdout: Some(Vec::new()),
                    stderr: Some(stderr.clone().into_bytes()),
                })
            }
        }
    }
}
