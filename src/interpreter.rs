use crate::builtin::default_commands;
use crate::command::CommandTable;
use crate::error::{Result, ShellError};
use crate::session::{LoopState, Session};

/// A line-oriented shell that runs commands from a [`CommandTable`].
///
/// The shell owns its [`Session`]; running it consumes the shell, so the input
/// source is released however the loop ends.
///
/// Example
/// ```
/// use quiz_shell::{Catalog, MemWriter, ScriptSource, Session, Shell, LoopState};
/// use std::io::Cursor;
///
/// let (out, handle) = MemWriter::with_handle();
/// let session = Session::new(
///     Box::new(ScriptSource::new(Cursor::new("SET max-number\nQ\n"))),
///     Box::new(out),
///     Catalog::default(),
/// );
/// assert_eq!(Shell::with_defaults(session).run(), LoopState::ExitRequested);
/// assert!(MemWriter::contents(&handle).contains("max-number 10"));
/// ```
pub struct Shell {
    commands: CommandTable,
    session: Session,
}

impl Shell {
    /// Create a shell with a custom set of commands.
    pub fn new(commands: CommandTable, session: Session) -> Self {
        Self { commands, session }
    }

    /// Create a shell with the built-in commands `H`, `Q`, `SET`, `PLUS` and `+`.
    pub fn with_defaults(session: Session) -> Self {
        Self::new(default_commands(), session)
    }

    /// Run one command line.
    ///
    /// The first space-separated word of the trimmed line picks the command;
    /// the handler gets the rest of the original line after that word and one
    /// separator. Unknown commands are reported here and never returned as
    /// errors; errors from the handler are returned.
    pub fn dispatch(&mut self, raw_line: &str) -> Result<()> {
        let trimmed = raw_line.trim();
        let name = trimmed.split(' ').next().unwrap_or(trimmed);

        let Some(handler) = self.commands.get(name) else {
            let shown = self.session.catalog().cut(name);
            tracing::debug!(error = %ShellError::UnknownCommand(name.to_string()), "dispatch");
            return self.session.say("unknown-command", &[&shown]);
        };

        let argument = if name == trimmed {
            ""
        } else {
            raw_line
                .find(name)
                .and_then(|at| {
                    let rest = &raw_line[at + name.len()..];
                    let mut chars = rest.chars();
                    chars.next().map(|_| chars.as_str())
                })
                .unwrap_or("")
        };
        tracing::debug!(command = handler.name(), argument, "dispatch");
        handler.execute(argument, &mut self.session)
    }

    /// Read and run lines until `Q`, end of input or a read failure.
    pub fn run(mut self) -> LoopState {
        tracing::info!("shell started");
        while self.session.state() == LoopState::Running {
            let prompt = self.session.message("prompt", &[]);
            let line = match self.session.read_line(&prompt) {
                Ok(Some(line)) => line,
                Ok(None) => {
                    if let Err(e) = self.session.end_of_input() {
                        tracing::error!(error = %e, "cannot announce end of input");
                    }
                    continue;
                }
                Err(e) => {
                    tracing::error!(error = %e, "cannot read input");
                    self.session.report(&e);
                    self.session.request_exit();
                    continue;
                }
            };

            if line.trim().is_empty() {
                continue;
            }
            if let Err(e) = self.dispatch(&line) {
                self.session.report(&e);
            }
        }
        tracing::info!("shell stopped");
        self.session.state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandHandler;
    use crate::io_adapters::{LineSource, MemWriter, ScriptSource};
    use crate::messages::Catalog;
    use std::cell::RefCell;
    use std::io::{self, Cursor, Write};
    use std::rc::Rc;

    /// Records every argument it is called with.
    struct Recorder {
        name: &'static str,
        calls: Rc<RefCell<Vec<String>>>,
    }

    impl CommandHandler for Recorder {
        fn name(&self) -> &'static str {
            self.name
        }

        fn execute(&self, argument: &str, session: &mut Session) -> Result<()> {
            self.calls.borrow_mut().push(argument.to_string());
            session.println(&format!("{} ran", self.name))
        }
    }

    struct Failing;

    impl CommandHandler for Failing {
        fn name(&self) -> &'static str {
            "FAIL"
        }

        fn execute(&self, argument: &str, _session: &mut Session) -> Result<()> {
            Err(ShellError::NotANumber(argument.to_string()))
        }
    }

    const MESSAGES: &str = "\
prompt=>\u{20}
help=HELP
unknown-command=UNKNOWN {0}
rest-is-cut=~
eof-detected=EOF
error=ERR {0}";

    fn session(input: &str) -> (Session, Rc<RefCell<Vec<u8>>>) {
        let (out, handle) = MemWriter::with_handle();
        let session = Session::new(
            Box::new(ScriptSource::new(Cursor::new(input.to_string()))),
            Box::new(out),
            Catalog::parse(MESSAGES),
        );
        (session, handle)
    }

    fn recording_shell() -> (Shell, Rc<RefCell<Vec<String>>>, Rc<RefCell<Vec<u8>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let commands = CommandTable::new()
            .register(Recorder {
                name: "H",
                calls: calls.clone(),
            })
            .register(Recorder {
                name: "SET",
                calls: calls.clone(),
            });
        let (session, out) = session("");
        (Shell::new(commands, session), calls, out)
    }

    #[test]
    fn test_dispatch_passes_rest_of_line() {
        let (mut shell, calls, out) = recording_shell();
        shell.dispatch("H").unwrap();
        shell.dispatch("SET all").unwrap();
        shell.dispatch("  set   name 'a b'  ").unwrap();
        shell.dispatch("h ").unwrap();
        assert_eq!(*calls.borrow(), vec!["", "all", "  name 'a b'  ", ""]);
        assert_eq!(MemWriter::contents(&out), "H ran\nSET ran\nSET ran\nH ran\n");
    }

    #[test]
    fn test_dispatch_unknown_command() {
        let (mut shell, calls, out) = recording_shell();
        shell.dispatch("zzz with args").unwrap();
        assert!(calls.borrow().is_empty());
        assert_eq!(MemWriter::contents(&out), "UNKNOWN zzz\n");
    }

    #[test]
    fn test_dispatch_cuts_long_unknown_names() {
        let (mut shell, _calls, out) = recording_shell();
        let name = "w".repeat(120);
        shell.dispatch(&name).unwrap();
        assert_eq!(
            MemWriter::contents(&out),
            format!("UNKNOWN {}~\n", "w".repeat(100))
        );
    }

    #[test]
    fn test_dispatch_returns_handler_errors() {
        let (session, _out) = session("");
        let mut shell = Shell::new(CommandTable::new().register(Failing), session);
        assert!(matches!(
            shell.dispatch("fail x"),
            Err(ShellError::NotANumber(arg)) if arg == "x"
        ));
    }

    #[test]
    fn test_script_help_then_quit() {
        let (session, out) = session("H\nQ\n");
        let state = Shell::with_defaults(session).run();
        assert_eq!(state, LoopState::ExitRequested);
        assert_eq!(MemWriter::contents(&out), "> H\nHELP\n> Q\n");
    }

    #[test]
    fn test_loop_survives_errors_and_stops_at_eof() {
        let (session, out) = session("\n   \nnope\nfail 1\n");
        let commands = default_commands().register(Failing);
        let state = Shell::new(commands, session).run();
        assert_eq!(state, LoopState::ExitRequested);
        assert_eq!(
            MemWriter::contents(&out),
            "> \n>    \n> nope\nUNKNOWN nope\n> fail 1\nERR not a number: 1\n> \nEOF\n"
        );
    }

    struct BrokenSource;

    impl LineSource for BrokenSource {
        fn read_line(&mut self, prompt: &str, out: &mut dyn Write) -> io::Result<Option<String>> {
            write!(out, "{}", prompt)?;
            Err(io::Error::other("disk on fire"))
        }

        fn is_interactive(&self) -> bool {
            false
        }
    }

    #[test]
    fn test_read_failure_is_reported_and_ends_loop() {
        let (out, handle) = MemWriter::with_handle();
        let session = Session::new(Box::new(BrokenSource), Box::new(out), Catalog::parse(MESSAGES));
        let state = Shell::with_defaults(session).run();
        assert_eq!(state, LoopState::ExitRequested);
        assert_eq!(
            MemWriter::contents(&handle),
            "> ERR i/o failure: disk on fire\n"
        );
    }
}
