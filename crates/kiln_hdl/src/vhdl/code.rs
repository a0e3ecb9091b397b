//! Line-level helpers for composite designs.

use crate::signal::Signal;

/// Declares an internal signal.
///
/// One-bit signals are declared as `std_logic`, wider ones as
/// `std_logic_vector`.
pub fn signal_definition(name: &str, width: u32) -> String {
    if width == 1 {
        format!("signal {name} : std_logic := '0';")
    } else {
        format!("signal {name} : std_logic_vector({width}-1 downto 0) := (others => '0');")
    }
}

/// Declares one internal signal per present signal, each named
/// `<prefix><signal name>`.
pub fn create_signal_definitions<'a, I>(prefix: &str, signals: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Signal>,
{
    signals
        .into_iter()
        .filter(|s| s.is_present())
        .map(|s| signal_definition(&format!("{prefix}{}", s.name), s.width))
        .collect()
}

/// Instantiates `library.entity(architecture)` as `name`, mapping each
/// formal port to an actual signal in the given order.
pub fn create_instance(
    name: &str,
    entity: &str,
    library: &str,
    architecture: &str,
    signal_mapping: &[(String, String)],
) -> Vec<String> {
    let mut code = vec![format!("{name} : entity {library}.{entity}({architecture})")];
    if let Some(((last_formal, last_actual), rest)) = signal_mapping.split_last() {
        code.push("port map(".to_string());
        code.extend(
            rest.iter()
                .map(|(formal, actual)| format!("    {formal} => {actual},")),
        );
        code.push(format!("    {last_formal} => {last_actual}"));
        code.push(");".to_string());
    } else {
        code.push(";".to_string());
    }
    code
}

/// Renders `sink <= source;` assignments, sorted.
pub fn create_connections<'a, I>(pairs: I) -> Vec<String>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut lines: Vec<String> = pairs
        .into_iter()
        .map(|(sink, source)| format!("{sink} <= {source};"))
        .collect();
    lines.sort();
    lines
}
