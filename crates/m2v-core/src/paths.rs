use dirs::home_dir;
use std::path::PathBuf;

/// Returns the m2v home directory, or None if the user's home cannot be resolved.
///
/// `M2V_HOME` overrides the default `~/.m2v`.
pub fn try_m2v_home() -> Option<PathBuf> {
    if let Ok(val) = std::env::var("M2V_HOME") {
        return Some(PathBuf::from(val));
    }
    home_dir().map(|h| h.join(".m2v"))
}

/// Default configuration file: ~/.m2v/config.toml
pub fn config_path() -> Option<PathBuf> {
    try_m2v_home().map(|home| home.join("config.toml"))
}
