use super::language::{ieee, Architecture, Entity, VhdlPackage};

/// Assembles library clauses, an entity and its architecture into one file.
#[derive(Debug, Clone)]
pub struct DesignBuilder {
    /// Imported packages in first-use order.
    pub packages: Vec<VhdlPackage>,
    /// The entity declaration.
    pub entity: Entity,
    /// The architecture body.
    pub architecture: Architecture,
}

impl DesignBuilder {
    /// Creates a builder for an entity with the default `ieee` packages and
    /// an empty `rtl` architecture.
    pub fn new(entity: Entity) -> Self {
        let architecture = Architecture {
            name: "rtl".to_string(),
            entity_name: entity.name.clone(),
            decl: Vec::new(),
            body: Vec::new(),
        };
        Self {
            packages: vec![ieee::STD_LOGIC_1164, ieee::STD_LOGIC_UNSIGNED],
            entity,
            architecture,
        }
    }

    /// Library clauses, grouped by library in order of first appearance.
    fn library_section(&self) -> Vec<String> {
        let mut libraries: Vec<(&str, Vec<&VhdlPackage>)> = Vec::new();
        for package in &self.packages {
            match libraries.iter_mut().find(|(lib, _)| *lib == package.library) {
                Some((_, members)) => {
                    if !members.contains(&package) {
                        members.push(package);
                    }
                }
                None => libraries.push((package.library, vec![package])),
            }
        }
        let mut section = Vec::new();
        for (library, members) in libraries {
            section.push(format!("library {library};"));
            section.extend(
                members
                    .iter()
                    .map(|p| format!("    use {library}.{}.all;", p.name)),
            );
        }
        section
    }

    /// Renders the complete file.
    pub fn build(&self) -> Vec<String> {
        let mut code = self.library_section();
        code.extend(self.entity.build_code());
        code.extend(self.architecture.build_code());
        code
    }
}
