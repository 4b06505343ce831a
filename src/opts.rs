//! Options that can be changed at runtime with the `SET` command.

use crate::error::{Result, ShellError};

/// Current values of all shell properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    /// How many tasks `PLUS` asks when no count is given.
    pub number_of_tasks: u32,
    /// Largest operand of a generated task.
    pub max_number: u32,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            number_of_tasks: 5,
            max_number: 10,
        }
    }
}

/// Getter, setter and validator of one named property.
struct Property {
    name: &'static str,
    get: fn(&Opts) -> u32,
    set: fn(&mut Opts, u32),
    validate: fn(&str) -> std::result::Result<u32, String>,
}

fn parse_count(value: &str) -> std::result::Result<u32, String> {
    match value.parse::<u32>() {
        Ok(0) => Err("should be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

fn parse_bound(value: &str) -> std::result::Result<u32, String> {
    value.parse::<u32>().map_err(|e| e.to_string())
}

/// Sorted by name, which is the order `SET all` lists them in.
const PROPERTIES: &[Property] = &[
    Property {
        name: "max-number",
        get: |opts| opts.max_number,
        set: |opts, value| opts.max_number = value,
        validate: parse_bound,
    },
    Property {
        name: "number-of-tasks",
        get: |opts| opts.number_of_tasks,
        set: |opts, value| opts.number_of_tasks = value,
        validate: parse_count,
    },
];

fn lookup(name: &str) -> Result<&'static Property> {
    PROPERTIES
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| ShellError::UnknownProperty(name.to_string()))
}

impl Opts {
    /// Current value of a property rendered as text.
    pub fn get(&self, name: &str) -> Result<String> {
        let property = lookup(name)?;
        Ok((property.get)(self).to_string())
    }

    /// Validate `value` and store it. Nothing changes when validation fails.
    pub fn set(&mut self, name: &str, value: &str) -> Result<()> {
        let property = lookup(name)?;
        let parsed = (property.validate)(value.trim()).map_err(|reason| {
            ShellError::PropertySetFailure {
                name: property.name.to_string(),
                value: value.to_string(),
                reason,
            }
        })?;
        (property.set)(self, parsed);
        tracing::debug!(property = property.name, value = parsed, "property changed");
        Ok(())
    }

    /// All properties as `(name, value)` pairs, sorted by name.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        PROPERTIES
            .iter()
            .map(|p| (p.name, (p.get)(self).to_string()))
            .collect()
    }
}
