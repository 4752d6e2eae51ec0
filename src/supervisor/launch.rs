//! Executable lookup and command-line construction.

use crate::config::ServerConfig;
use std::path::{Path, PathBuf};

/// Locate the server executable.
///
/// Bare names are resolved on PATH; anything with a directory component must
/// point at an existing file.
pub fn resolve_executable(executable: &str) -> Option<PathBuf> {
    let path = Path::new(executable);
    if path.components().count() > 1 {
        return path.is_file().then(|| path.to_path_buf());
    }
    which::which(executable).ok()
}

/// Port of the base URL, falling back to the scheme default.
pub fn port_from_base_url(base_url: &str) -> Option<u16> {
    reqwest::Url::parse(base_url)
        .ok()
        .and_then(|url| url.port_or_known_default())
}

/// Full argument list for the server process.
///
/// The server binds with `--address :PORT`, so the port is taken from the base
/// URL the client will talk to.
pub fn build_args(config: &ServerConfig) -> Vec<String> {
    let mut args = config.args.clone();
    if config.pass_address {
        if let Some(port) = port_from_base_url(&config.base_url) {
            args.push("--address".to_string());
            args.push(format!(":{}", port));
        }
    }
    args
}

/// Known-noise server output that is not forwarded.
pub fn is_noise_line(line: &str) -> bool {
    line.contains("Ollama Get") && line.contains("connectex")
}
