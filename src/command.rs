use crate::error::Result;
use crate::session::Session;
use std::collections::HashMap;
use std::rc::Rc;

/// Object-safe trait for any command that can be executed by the shell.
pub trait CommandHandler {
    /// Canonical name of the command, e.g. "SET".
    fn name(&self) -> &'static str;

    /// Executes the command.
    ///
    /// `argument` is the rest of the command line after the command name,
    /// untouched. Handlers tokenize it themselves when they need arguments.
    fn execute(&self, argument: &str, session: &mut Session) -> Result<()>;
}

/// Mapping from uppercase command names to their handlers.
///
/// Built once with [`CommandTable::register`] and [`CommandTable::alias`],
/// then only read.
#[derive(Default)]
pub struct CommandTable {
    handlers: HashMap<String, Rc<dyn CommandHandler>>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a handler under its own name.
    pub fn register(mut self, handler: impl CommandHandler + 'static) -> Self {
        let name = handler.name().to_uppercase();
        self.handlers.insert(name, Rc::new(handler));
        self
    }

    /// Make `alias` run the handler already registered as `target`.
    ///
    /// Does nothing when `target` is unknown.
    pub fn alias(mut self, alias: &str, target: &str) -> Self {
        if let Some(handler) = self.handlers.get(&target.to_uppercase()).cloned() {
            self.handlers.insert(alias.to_uppercase(), handler);
        }
        self
    }

    /// Find the handler for `name`, ignoring letter case.
    pub fn get(&self, name: &str) -> Option<&dyn CommandHandler> {
        self.handlers.get(&name.to_uppercase()).map(|h| h.as_ref())
    }
}
