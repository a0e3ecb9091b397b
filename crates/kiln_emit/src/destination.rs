//! The output-location abstraction that designs persist themselves into.

use crate::error::EmitError;

/// A location that generated files are written to.
///
/// A destination names a path without an extension. Designs typically call
/// `create_subpath(name)` and then `write_file(".vhd", lines)`, producing
/// `<path>/<name>.vhd`.
pub trait Destination {
    /// Slash-separated path of this destination relative to its root.
    ///
    /// The root itself has the empty path.
    fn path(&self) -> String;

    /// Returns a child destination one level below this one.
    fn create_subpath(&self, name: &str) -> Result<Box<dyn Destination>, EmitError>;

    /// Writes `lines` to the file `<path><extension>`, each line terminated
    /// by a newline.
    fn write_file(&self, extension: &str, lines: &[String]) -> Result<(), EmitError>;
}

/// Checks that `name` is usable as a single path component.
pub(crate) fn validate_component(name: &str) -> Result<(), EmitError> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(EmitError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Joins a parent path and a component with `/`.
pub(crate) fn join(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}/{name}")
    }
}

/// Renders lines as file contents.
pub(crate) fn file_contents(lines: &[String]) -> String {
    let mut text = String::new();
    for line in lines {
        text.push_str(line);
        text.push('\n');
    }
    text
}
