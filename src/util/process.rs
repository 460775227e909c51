use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::process::{Command, Stdio};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StreamMode {
    Inherit,
    Capture,
}

impl StreamMode {
    fn stdio(self) -> Stdio {
        match self {
            StreamMode::Inherit => Stdio::inherit(),
            StreamMode::Capture => Stdio::piped(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: OsString,
    pub args: Vec<OsString>,
    pub current_dir: Option<PathBuf>,
    pub inherit_stdin: bool,
    pub stdout: StreamMode,
    pub stderr: StreamMode,
}

impl CommandSpec {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            inherit_stdin: false,
            stdout: StreamMode::Inherit,
            stderr: StreamMode::Inherit,
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    pub fn capture(mut self) -> Self {
        self.stdout = StreamMode::Capture;
        self.stderr = StreamMode::Capture;
        self
    }

    /// Hand stdin and both output streams straight to the child.
    pub fn interactive(mut self) -> Self {
        self.inherit_stdin = true;
        self.stdout = StreamMode::Inherit;
        self.stderr = StreamMode::Inherit;
        self
    }

    pub fn display_program(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the child was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: Option<Vec<u8>>,
    pub stderr: Option<Vec<u8>>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    pub fn stderr_lossy(&self) -> String {
        self.stderr
            .as_deref()
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            .unwrap_or_default()
    }
}

/// Blocking process execution. The error case means the process never
/// started; a started process always yields a `CommandOutput`.
pub trait Runner {
    fn run(&self, spec: &CommandSpec) -> io::Result<CommandOutput>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemRunner;

impl Runner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> io::Result<CommandOutput> {
        run(spec)
    }
}

pub fn run(spec: &CommandSpec) -> io::Result<CommandOutput> {
    let mut command = Command::new(&spec.program);
    command.args(&spec.args);
    if let Some(dir) = &spec.current_dir {
        command.current_dir(dir);
    }
    command.stdin(if spec.inherit_stdin {
        Stdio::inherit()
    } else {
        Stdio::null()
    });
    command.stdout(spec.stdout.stdio());
    command.stderr(spec.stderr.stdio());

    let output = command.output()?;
    Ok(CommandOutput {
        code: output.status.code(),
        stdout: (spec.stdout == StreamMode::Capture).then_some(output.stdout),
        stderr: (spec.stderr == StreamMode::Capture).then_some(output.stderr),
    })
}
