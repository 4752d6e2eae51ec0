//! `config init`: write a starter config

use crate::cli::ConfigInitArgs;
use anyhow::Context;
use std::fs;
use std::path::Path;

const STARTER_CONFIG: &str = include_str!("../../fabric-desk.example.toml");

/// Write the starter config to `args.output`, creating missing parent directories.
/// An existing file is left alone unless `--force` is given.
pub fn handle_config_init(args: &ConfigInitArgs) -> anyhow::Result<()> {
    let output = args.output.as_path();
    if output.is_dir() {
        anyhow::bail!("{} is a directory", output.display());
    }
    if output.exists() && !args.force {
        anyhow::bail!(
            "{} already exists (pass --force to replace it)",
            output.display()
        );
    }

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    fs::write(output, STARTER_CONFIG).with_context(|| format!("writing {}", output.display()))?;

    print_next_steps(output);
    Ok(())
}

fn print_next_steps(output: &Path) {
    println!("✓ Wrote {}", output.display());
    println!("  Set [server] base_url and executable, then run:");
    println!("  fabric-desk serve --config {}", output.display());
}
