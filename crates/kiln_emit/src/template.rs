//! `${name}` placeholder templates for generated source files.
//!
//! A scalar parameter replaces its placeholder inline. A list parameter must
//! stand alone on its line and expands to one line per element, each with
//! the placeholder's indentation.

use crate::error::EmitError;
use std::collections::BTreeMap;

/// A template parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    /// A single string substituted inline.
    Text(String),
    /// Lines expanded in place of a standalone placeholder.
    Lines(Vec<String>),
}

impl From<String> for Param {
    fn from(value: String) -> Self {
        Param::Text(value)
    }
}

impl From<&str> for Param {
    fn from(value: &str) -> Self {
        Param::Text(value.to_string())
    }
}

impl From<Vec<String>> for Param {
    fn from(value: Vec<String>) -> Self {
        Param::Lines(value)
    }
}

/// A named set of finished parameter values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters {
    values: BTreeMap<String, Param>,
}

impl Parameters {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a parameter, replacing any previous value.
    pub fn set(&mut self, name: &str, value: impl Into<Param>) -> &mut Self {
        self.values.insert(name.to_string(), value.into());
        self
    }

    /// Builder-style variant of [`Parameters::set`].
    pub fn with(mut self, name: &str, value: impl Into<Param>) -> Self {
        self.set(name, value);
        self
    }

    /// Merges all entries of `other`, overriding existing names.
    pub fn extend(&mut self, other: Parameters) {
        self.values.extend(other.values);
    }

    /// Looks a parameter up by name.
    pub fn get(&self, name: &str) -> Option<&Param> {
        self.values.get(name)
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no parameters are set.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A named template body.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    body: String,
}

impl Template {
    /// Creates a template from its name and body text.
    pub fn new(name: &str, body: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            body: body.into(),
        }
    }

    /// The template name, used in error messages.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renders the template into finished lines.
    pub fn render(&self, params: &Parameters) -> Result<Vec<String>, EmitError> {
        let mut out = Vec::new();
        for (index, line) in self.body.lines().enumerate() {
            if let Some(name) = standalone_placeholder(line) {
                if let Some(Param::Lines(lines)) = params.get(name) {
                    let indent = &line[..line.len() - line.trim_start().len()];
                    out.extend(lines.iter().map(|l| format!("{indent}{l}")));
                    continue;
                }
            }
            out.push(self.substitute(line, index + 1, params)?);
        }
        Ok(out)
    }

    fn substitute(&self, line: &str, line_no: usize, params: &Parameters) -> Result<String, EmitError> {
        let mut result = String::with_capacity(line.len());
        let mut rest = line;
        while let Some(start) = rest.find("${") {
            result.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let end = after.find('}').ok_or_else(|| EmitError::MalformedPlaceholder {
                template: self.name.clone(),
                line: line_no,
            })?;
            let name = &after[..end];
            match params.get(name) {
                Some(Param::Text(value)) => result.push_str(value),
                Some(Param::Lines(_)) => {
                    return Err(EmitError::ListInline {
                        template: self.name.clone(),
                        parameter: name.to_string(),
                    })
                }
                None => {
                    return Err(EmitError::MissingParameter {
                        template: self.name.clone(),
                        parameter: name.to_string(),
                    })
                }
            }
            rest = &after[end + 1..];
        }
        result.push_str(rest);
        Ok(result)
    }
}

/// Returns the placeholder name if `line` consists of nothing but `${name}`.
fn standalone_placeholder(line: &str) -> Option<&str> {
    let inner = line.trim().strip_prefix("${")?.strip_suffix('}')?;
    if inner.is_empty() || inner.contains('}') || inner.contains("${") {
        None
    } else {
        Some(inner)
    }
}
