//! User-visible message templates looked up by key.
//!
//! Templates use positional placeholders `{0}`, `{1}`, ... and are read from a
//! small `key=value` file format. A default English catalog is compiled in.

use crate::error::Result;
use regex::Regex;
use std::collections::HashMap;
use std::fmt::Display;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

const BUILTIN: &str = include_str!("messages.properties");

/// Maximum number of characters of a user line repeated back in messages.
pub const MAX_ECHO_CHARS: usize = 100;

fn placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{(\d+)\}").expect("placeholder pattern is valid"))
}

/// Key to template mapping.
#[derive(Debug, Clone)]
pub struct Catalog {
    templates: HashMap<String, String>,
}

impl Catalog {
    /// Parse `key=value` lines. Blank lines and lines starting with `#` are
    /// skipped, `\n` in a value stands for a line break.
    pub fn parse(text: &str) -> Self {
        let templates = text
            .lines()
            .filter(|line| !line.trim().is_empty() && !line.trim_start().starts_with('#'))
            .filter_map(|line| line.split_once('='))
            .map(|(key, value)| {
                (
                    key.trim().to_string(),
                    value.trim_start().replace("\\n", "\n"),
                )
            })
            .collect();
        Self { templates }
    }

    /// Read a catalog file. Keys it lacks fall back to the built-in messages.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let mut catalog = Self::default();
        catalog.templates.extend(Self::parse(&text).templates);
        Ok(catalog)
    }

    /// Render the template for `key`, substituting `{N}` with `args[N]`.
    ///
    /// Placeholders without a matching argument are left untouched. An
    /// unknown key renders as the key itself.
    pub fn format(&self, key: &str, args: &[&dyn Display]) -> String {
        let Some(template) = self.templates.get(key) else {
            tracing::warn!(key, "missing message template");
            return key.to_string();
        };
        placeholder()
            .replace_all(template, |caps: &regex::Captures| {
                caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| args.get(index))
                    .map(|arg| arg.to_string())
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }

    /// Cut `line` to [`MAX_ECHO_CHARS`] characters, marking the cut.
    pub fn cut(&self, line: &str) -> String {
        match line.char_indices().nth(MAX_ECHO_CHARS) {
            Some((end, _)) => format!("{}{}", &line[..end], self.format("rest-is-cut", &[])),
            None => line.to_string(),
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::parse(BUILTIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_has_every_key() {
        let catalog = Catalog::default();
        for key in [
            "prompt",
            "help",
            "unknown-command",
            "rest-is-cut",
            "file-not-exist",
            "usage-start",
            "eof-detected",
            "usage-q",
            "usage-set",
            "usage-plus",
            "task",
            "answer",
            "correct-answer",
            "not-correct-answer",
            "number-of-tasks-should-be-number",
            "answer-should-be-number",
            "no-specified-prop",
            "error-setting",
            "property",
            "error",
        ] {
            assert_ne!(catalog.format(key, &[]), key, "missing {}", key);
        }
    }

    #[test]
    fn test_format_substitutes_positional_args() {
        let catalog = Catalog::parse("pair={1} and {0}, {0} again, {2} stays");
        assert_eq!(
            catalog.format("pair", &[&"a", &7]),
            "7 and a, a again, {2} stays"
        );
    }

    #[test]
    fn test_parse_keeps_trailing_spaces_and_newlines() {
        let catalog = Catalog::parse("# comment\n\nprompt = > \nhelp=one\\ntwo");
        assert_eq!(catalog.format("prompt", &[]), "> ");
        assert_eq!(catalog.format("help", &[]), "one\ntwo");
    }

    #[test]
    fn test_unknown_key_renders_as_key() {
        assert_eq!(Catalog::default().format("no-such-key", &[]), "no-such-key");
    }

    #[test]
    fn test_cut_long_lines() {
        let catalog = Catalog::parse("rest-is-cut=<cut>");
        assert_eq!(catalog.cut("short"), "short");
        let exact = "x".repeat(MAX_ECHO_CHARS);
        assert_eq!(catalog.cut(&exact), exact);
        let long = "y".repeat(MAX_ECHO_CHARS + 5);
        assert_eq!(catalog.cut(&long), format!("{}<cut>", "y".repeat(MAX_ECHO_CHARS)));
    }

    #[test]
    fn test_load_overrides_builtin() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "prompt=>>> ").unwrap();
        let catalog = Catalog::load(file.path()).unwrap();
        assert_eq!(catalog.format("prompt", &[]), ">>> ");
        assert_eq!(catalog.format("correct-answer", &[]), "Correct!");
    }
}
