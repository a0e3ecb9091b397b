//! `kiln build`: generates the VHDL sources of the configured network.
//!
//! Loads `kiln.toml`, generates the complete file set in memory and only then
//! writes it to the output directory together with the build manifest, so a
//! failing build leaves no partial output behind.

use std::path::Path;

use kiln_emit::{BuildManifest, InMemoryPath};

use crate::pipeline::{build_in_memory, project_dir, resolve_config_path};
use crate::{BuildArgs, GlobalArgs};

/// Runs the `kiln build` command. Returns exit code 0 on success.
pub fn run(args: &BuildArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config_path = resolve_config_path(args.config.as_deref())?;
    let config = kiln_config::load_config_file(&config_path)?;

    if !global.quiet {
        eprintln!(
            "   Building {} ({} layers, {})",
            config.network.name,
            config.layers.len(),
            kiln_config::fxp_params(&config)?
        );
    }

    let tree = build_in_memory(&config)?;
    let out_dir = kiln_config::output_dir(
        &config,
        &project_dir(&config_path),
        args.out.as_deref().map(Path::new),
    );
    let manifest = write_build(&tree, &out_dir, global)?;

    if !global.quiet {
        eprintln!(
            "  Finished {} files in {}",
            manifest.files.len(),
            out_dir.display()
        );
    }
    println!("{}", manifest.digest);
    Ok(0)
}

/// Flushes `tree` to `out_dir`, listing the files that changed since the
/// previous build when one is recorded there.
fn write_build(
    tree: &InMemoryPath,
    out_dir: &Path,
    global: &GlobalArgs,
) -> Result<BuildManifest, Box<dyn std::error::Error>> {
    let version = env!("CARGO_PKG_VERSION");
    let previous = BuildManifest::load(out_dir).filter(|m| m.is_compatible(version));
    let manifest = tree.flush_to(out_dir, version)?;

    if let Some(previous) = previous {
        let changed = manifest.changed_since(&previous);
        if changed.is_empty() {
            tracing::info!("build unchanged since last run");
        } else if global.verbose {
            for path in &changed {
                eprintln!("   Changed {path}");
            }
        }
    }
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NETWORK: &str = r#"
[network]
name = "net"
total_bits = 8
frac_bits = 4

[[layers]]
kind = "linear"
name = "fc1"
in_features = 2
out_features = 1
weights = [[0.5, -0.25]]
bias = [0.125]
"#;

    fn quiet() -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
        }
    }

    #[test]
    fn build_writes_sources_and_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("kiln.toml");
        std::fs::write(&config, NETWORK).unwrap();
        let args = BuildArgs {
            config: Some(config.to_string_lossy().into_owned()),
            out: None,
        };
        assert_eq!(run(&args, &quiet()).unwrap(), 0);
        let out = dir.path().join("build");
        assert!(out.join("net.vhd").is_file());
        assert!(out.join("fc1/fc1.vhd").is_file());
        assert!(out.join("fc1/fc1_w_rom.vhd").is_file());
        let manifest = BuildManifest::load(&out).unwrap();
        assert_eq!(manifest.files.len(), 4);
    }

    #[test]
    fn out_flag_overrides_configured_output() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("kiln.toml");
        std::fs::write(&config, NETWORK).unwrap();
        let out = dir.path().join("gen");
        let args = BuildArgs {
            config: Some(config.to_string_lossy().into_owned()),
            out: Some(out.to_string_lossy().into_owned()),
        };
        run(&args, &quiet()).unwrap();
        assert!(out.join("net.vhd").is_file());
        assert!(!dir.path().join("build").exists());
    }

    #[test]
    fn rebuild_keeps_digest() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("kiln.toml");
        std::fs::write(&config, NETWORK).unwrap();
        let args = BuildArgs {
            config: Some(config.to_string_lossy().into_owned()),
            out: None,
        };
        run(&args, &quiet()).unwrap();
        let first = BuildManifest::load(&dir.path().join("build")).unwrap();
        run(&args, &quiet()).unwrap();
        let second = BuildManifest::load(&dir.path().join("build")).unwrap();
        assert_eq!(first.digest, second.digest);
        assert!(second.changed_since(&first).is_empty());
    }

    #[test]
    fn missing_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = BuildArgs {
            config: Some(dir.path().join("absent.toml").to_string_lossy().into_owned()),
            out: None,
        };
        assert!(run(&args, &quiet()).is_err());
    }

    #[test]
    fn invalid_network_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("kiln.toml");
        std::fs::write(&config, NETWORK.replace("weights = [[0.5, -0.25]]", "weights = [[9.0, 0.0]]"))
            .unwrap();
        let args = BuildArgs {
            config: Some(config.to_string_lossy().into_owned()),
            out: None,
        };
        assert!(run(&args, &quiet()).is_err());
        assert!(!dir.path().join("build").exists());
    }
}
