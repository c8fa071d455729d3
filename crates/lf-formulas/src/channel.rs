//! NUL-framed duplex channel to the external typesetting process.

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use crate::error::FormulaError;

/// Script run by the default renderer: KaTeX behind a NUL stream splitter,
/// one rendered response per request, in request order.
const KATEX_SCRIPT: &str = "\
var katex = require('katex');
var split = require('split');
process.stdin.pipe(split('\\0', null, { trailing: false })).on('data', function (tex) {
  process.stdout.write(katex.renderToString(tex));
  process.stdout.write('\\0');
});
";

/// Frame terminator byte for requests and responses.
const TERMINATOR: u8 = 0;

/// Command line used to start the renderer process.
#[derive(Debug, Clone)]
pub struct RendererCommand {
    program: String,
    args: Vec<String>,
}

impl RendererCommand {
    /// Command for a custom renderer program.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append an argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Build a command from a program-plus-arguments list, as configured in
    /// `lf.toml`. Returns `None` for an empty list.
    #[must_use]
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    /// The default KaTeX-over-node renderer.
    #[must_use]
    pub fn katex() -> Self {
        Self::new("node").arg("-e").arg(KATEX_SCRIPT)
    }
}

/// A running renderer process with its pipe endpoints.
struct RendererProcess {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

/// Channel owning at most one renderer process per run.
///
/// The process starts lazily on the first request and serves every later
/// one, amortizing its startup cost over a whole build. It is never torn
/// down here; the host process exit reaps it.
///
/// The protocol carries no request identifiers: correctness depends on one
/// request being in flight at a time, which [`FormulaRenderer`] enforces by
/// keeping the channel behind a mutex.
///
/// [`FormulaRenderer`]: crate::FormulaRenderer
pub struct RenderChannel {
    command: RendererCommand,
    process: Option<RendererProcess>,
}

impl RenderChannel {
    /// Create a channel; no process is spawned until the first request.
    #[must_use]
    pub fn new(command: RendererCommand) -> Self {
        Self {
            command,
            process: None,
        }
    }

    /// Whether the renderer process has been spawned.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.process.is_some()
    }

    /// Send one formula and block until its framed response arrives.
    ///
    /// The request is the formula's UTF-8 bytes followed by a single NUL,
    /// flushed before any read. The response is everything up to the next
    /// NUL on the child's stdout. There is no read timeout; a hung renderer
    /// stalls the transform.
    ///
    /// # Errors
    ///
    /// Pipe or spawn I/O failure, a response that is not UTF-8, or
    /// [`FormulaError::UnexpectedEof`] when the child's stdout ends before a
    /// frame terminator (renderer crash or misconfiguration). Failures are
    /// not retried and the process is not restarted.
    pub fn request(&mut self, formula: &str) -> Result<String, FormulaError> {
        let process = self.ensure_started()?;

        process.stdin.write_all(formula.as_bytes())?;
        process.stdin.write_all(&[TERMINATOR])?;
        process.stdin.flush()?;

        let mut response = Vec::new();
        process.stdout.read_until(TERMINATOR, &mut response)?;
        if response.pop() != Some(TERMINATOR) {
            if let Ok(Some(status)) = process.child.try_wait() {
                tracing::warn!(%status, "Formula renderer exited");
            }
            return Err(FormulaError::UnexpectedEof);
        }

        Ok(String::from_utf8(response)?)
    }

    fn ensure_started(&mut self) -> Result<&mut RendererProcess, FormulaError> {
        if self.process.is_none() {
            let mut child = Command::new(&self.command.program)
                .args(&self.command.args)
                .stdin(Stdio::piped())
                .stdout(Stdio::piped())
                .stderr(Stdio::inherit())
                .spawn()?;

            let stdin = child.stdin.take().expect("renderer stdin is piped");
            let stdout = BufReader::new(child.stdout.take().expect("renderer stdout is piped"));
            tracing::debug!(program = %self.command.program, pid = child.id(), "Started formula renderer");

            self.process = Some(RendererProcess {
                child,
                stdin,
                stdout,
            });
        }

        Ok(self.process.as_mut().expect("renderer process just started"))
    }
}
