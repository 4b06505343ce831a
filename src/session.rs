use crate::error::{Result, ShellError};
use crate::io_adapters::LineSource;
use crate::messages::Catalog;
use crate::opts::Opts;
use std::fmt::Display;
use std::io::Write;

/// Whether the shell loop should keep reading lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    ExitRequested,
}

/// Mutable state shared by the shell loop and the commands it runs.
///
/// The session owns the input source, the output sink, the message catalog
/// and the properties. Commands request exit through [`Session::request_exit`];
/// the loop checks [`Session::state`] once per line.
pub struct Session {
    input: Box<dyn LineSource>,
    output: Box<dyn Write>,
    catalog: Catalog,
    opts: Opts,
    state: LoopState,
}

impl Session {
    pub fn new(input: Box<dyn LineSource>, output: Box<dyn Write>, catalog: Catalog) -> Self {
        Self {
            input,
            output,
            catalog,
            opts: Opts::default(),
            state: LoopState::Running,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn request_exit(&mut self) {
        self.state = LoopState::ExitRequested;
    }

    pub fn opts(&self) -> &Opts {
        &self.opts
    }

    pub fn opts_mut(&mut self) -> &mut Opts {
        &mut self.opts
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Render a message from the catalog.
    pub fn message(&self, key: &str, args: &[&dyn Display]) -> String {
        self.catalog.format(key, args)
    }

    /// Write `msg` followed by a line break.
    pub fn println(&mut self, msg: &str) -> Result<()> {
        writeln!(self.output, "{}", msg)?;
        self.output.flush()?;
        Ok(())
    }

    /// Render a catalog message and write it as one line.
    pub fn say(&mut self, key: &str, args: &[&dyn Display]) -> Result<()> {
        let msg = self.message(key, args);
        self.println(&msg)
    }

    /// Prompt and read one line. Lines from non-interactive sources are echoed
    /// (cut when very long) so the output reads like a transcript.
    pub fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        let line = self.input.read_line(prompt, &mut self.output)?;
        if let Some(line) = &line {
            if !self.input.is_interactive() {
                let echo = self.catalog.cut(line);
                self.println(&echo)?;
            }
        }
        Ok(line)
    }

    /// Announce the end of input and stop the loop.
    pub fn end_of_input(&mut self) -> Result<()> {
        self.request_exit();
        let msg = self.message("eof-detected", &[]);
        self.println(&format!("\n{}", msg))
    }

    /// Tell the user about an error that did not stop the shell.
    ///
    /// Failing to write the report is only logged.
    pub fn report(&mut self, error: &ShellError) {
        tracing::debug!(%error, "command failed");
        let msg = self.message("error", &[error]);
        if let Err(e) = self.println(&msg) {
            tracing::error!(error = %e, "cannot write error report");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io_adapters::{MemWriter, ScriptSource};
    use std::io::Cursor;

    fn session(input: &str) -> (Session, std::rc::Rc<std::cell::RefCell<Vec<u8>>>) {
        let (out, handle) = MemWriter::with_handle();
        let catalog = Catalog::parse("rest-is-cut=~\neof-detected=bye\nerror=E: {0}");
        let session = Session::new(
            Box::new(ScriptSource::new(Cursor::new(input.to_string()))),
            Box::new(out),
            catalog,
        );
        (session, handle)
    }

    #[test]
    fn test_read_line_echoes_script_lines() {
        let (mut session, out) = session("H\n");
        assert_eq!(session.read_line("> ").unwrap().as_deref(), Some("H"));
        assert_eq!(session.read_line("> ").unwrap(), None);
        assert_eq!(MemWriter::contents(&out), "> H\n> ");
    }

    #[test]
    fn test_long_echo_is_cut() {
        let long = "z".repeat(150);
        let (mut session, out) = session(&long);
        session.read_line("").unwrap();
        assert_eq!(MemWriter::contents(&out), format!("{}~\n", "z".repeat(100)));
    }

    #[test]
    fn test_end_of_input_requests_exit() {
        let (mut session, out) = session("");
        assert_eq!(session.state(), LoopState::Running);
        session.end_of_input().unwrap();
        assert_eq!(session.state(), LoopState::ExitRequested);
        assert_eq!(MemWriter::contents(&out), "\nbye\n");
    }

    #[test]
    fn test_report_writes_error_message() {
        let (mut session, out) = session("");
        session.report(&ShellError::NotANumber("abc".to_string()));
        assert_eq!(MemWriter::contents(&out), "E: not a number: abc\n");
        assert_eq!(session.state(), LoopState::Running);
    }
}
