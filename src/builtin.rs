use crate::command::{CommandHandler, CommandTable};
use crate::error::{Result, ShellError};
use crate::session::Session;
use crate::tokenizer::tokenize;
use argh::{EarlyExit, FromArgs};
use rand::Rng;

/// Built-in commands known to the shell at compile time.
///
/// Builtins are parsed using the [`argh`] crate (`FromArgs`) from the tokens of
/// their argument string and executed against the session.
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "SET".
    fn name() -> &'static str;

    /// Catalog key of the message printed when the arguments do not parse.
    fn usage_key() -> &'static str;

    /// Executes the command.
    fn execute(self, session: &mut Session) -> Result<()>;
}

/// Adapter turning a [`BuiltinCommand`] type into a [`CommandHandler`].
pub(crate) struct Builtin<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Builtin<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<T: BuiltinCommand> CommandHandler for Builtin<T> {
    fn name(&self) -> &'static str {
        T::name()
    }

    fn execute(&self, argument: &str, session: &mut Session) -> Result<()> {
        let tokens = match tokenize(argument, " ", 0) {
            Ok(tokens) => tokens,
            Err(e) => {
                session.report(&e);
                return Ok(());
            }
        };
        // Values such as `-1` are positionals, not flags. Only a leading
        // `--help` reaches argh as an option.
        let mut args: Vec<&str> = Vec::with_capacity(tokens.len() + 1);
        if tokens.first().map(String::as_str) != Some("--help") {
            args.push("--");
        }
        args.extend(tokens.iter().map(String::as_str));

        match T::from_args(&[T::name()], &args) {
            Ok(cmd) => cmd.execute(session),
            Err(EarlyExit { output, status }) => {
                if status.is_ok() {
                    session.println(output.trim_end())
                } else {
                    tracing::debug!(command = T::name(), %output, "bad arguments");
                    session.say(T::usage_key(), &[])
                }
            }
        }
    }
}

/// The commands every shell starts with: `H`, `Q`, `SET`, `PLUS` and `+`.
pub fn default_commands() -> CommandTable {
    CommandTable::new()
        .register(Builtin::<Help>::default())
        .register(Builtin::<Quit>::default())
        .register(Builtin::<Set>::default())
        .register(Builtin::<Plus>::default())
        .alias("+", "PLUS")
}

#[derive(FromArgs)]
/// Print the list of commands.
pub struct Help {
    #[argh(positional, greedy)]
    /// ignored
    pub _args: Vec<String>,
}

impl BuiltinCommand for Help {
    fn name() -> &'static str {
        "H"
    }

    fn usage_key() -> &'static str {
        "help"
    }

    fn execute(self, session: &mut Session) -> Result<()> {
        session.say("help", &[])
    }
}

#[derive(FromArgs)]
/// Leave the shell.
pub struct Quit {}

impl BuiltinCommand for Quit {
    fn name() -> &'static str {
        "Q"
    }

    fn usage_key() -> &'static str {
        "usage-q"
    }

    fn execute(self, session: &mut Session) -> Result<()> {
        session.request_exit();
        Ok(())
    }
}

#[derive(FromArgs)]
/// Show or change shell properties.
pub struct Set {
    #[argh(positional, greedy)]
    /// either "all", a property name, or a property name followed by its new value
    pub args: Vec<String>,
}

impl Set {
    fn show(session: &mut Session, name: &str) -> Result<()> {
        let value = session.opts().get(name);
        match value {
            Ok(value) => session.say("property", &[&name.to_lowercase(), &value]),
            Err(ShellError::UnknownProperty(_)) => session.say("no-specified-prop", &[&name]),
            Err(e) => Err(e),
        }
    }

    fn show_all(session: &mut Session) -> Result<()> {
        let entries = session.opts().entries();
        for (name, value) in entries {
            session.say("property", &[&name, &value])?;
        }
        Ok(())
    }
}

impl BuiltinCommand for Set {
    fn name() -> &'static str {
        "SET"
    }

    fn usage_key() -> &'static str {
        "usage-set"
    }

    fn execute(self, session: &mut Session) -> Result<()> {
        match self.args.as_slice() {
            [] => Self::show_all(session),
            [name] if name.eq_ignore_ascii_case("all") => Self::show_all(session),
            [name] => Self::show(session, name),
            [name, value] => {
                let outcome = session.opts_mut().set(name, value);
                match outcome {
                    Ok(()) => Ok(()),
                    Err(ShellError::UnknownProperty(_)) => {
                        session.say("no-specified-prop", &[name])
                    }
                    Err(e @ ShellError::PropertySetFailure { .. }) => {
                        tracing::debug!(error = %e, "property rejected");
                        session.say("error-setting", &[name, &e])
                    }
                    Err(e) => Err(e),
                }
            }
            _ => session.say(Self::usage_key(), &[]),
        }
    }
}

#[derive(FromArgs)]
/// Solve addition tasks.
pub struct Plus {
    #[argh(positional)]
    /// how many tasks to ask, defaults to the number-of-tasks property
    pub tasks: Option<String>,
}

impl Plus {
    fn task_count(&self, session: &Session) -> Result<u32> {
        match &self.tasks {
            None => Ok(session.opts().number_of_tasks),
            Some(raw) => match raw.parse::<u32>() {
                Ok(n) if n > 0 => Ok(n),
                _ => Err(ShellError::NotANumber(raw.clone())),
            },
        }
    }

    /// Ask `a + b = ` until a numeric answer arrives.
    ///
    /// Returns `None` when the input ends first.
    fn ask(session: &mut Session, a: u32, b: u32) -> Result<Option<i64>> {
        let question = session.message("task", &[&a, &b]);
        loop {
            let Some(line) = session.read_line(&question)? else {
                return Ok(None);
            };
            let answer = line.trim();
            match answer.parse::<i64>() {
                Ok(n) => return Ok(Some(n)),
                Err(_) => session.say("answer-should-be-number", &[&answer])?,
            }
        }
    }
}

impl BuiltinCommand for Plus {
    fn name() -> &'static str {
        "PLUS"
    }

    fn usage_key() -> &'static str {
        "usage-plus"
    }

    fn execute(self, session: &mut Session) -> Result<()> {
        let total = match self.task_count(session) {
            Ok(n) => n,
            Err(ShellError::NotANumber(raw)) => {
                return session.say("number-of-tasks-should-be-number", &[&raw]);
            }
            Err(e) => return Err(e),
        };
        let max = session.opts().max_number;
        let mut rng = rand::rng();
        let mut correct = 0u32;

        for _ in 0..total {
            let (a, b) = (rng.random_range(0..=max), rng.random_range(0..=max));
            let expected = i64::from(a) + i64::from(b);
            let Some(answer) = Self::ask(session, a, b)? else {
                return session.end_of_input();
            };
            if answer == expected {
                correct += 1;
                session.say("correct-answer", &[])?;
            } else {
                session.say("not-correct-answer", &[&expected])?;
            }
        }
        tracing::info!(correct, total, "quiz finished");
        session.say("answer", &[&correct, &total])
    }
}
