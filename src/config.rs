/// External configuration.
///
/// `config.toml` is looked up next to the executable, then in the CWD.
/// Every key has a default, so a missing or partial file still yields a
/// playable setup; a malformed file warns and falls back wholesale.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub tick_rate_ms: u64,
    pub levels_dir: PathBuf,
    pub boss: BossConfig,
}

#[derive(Clone, Debug)]
pub struct BossConfig {
    /// Starting health of the final-level boss.
    pub health: u32,
    /// Health the boss loses when the player ends a turn adjacent to it.
    pub contact_damage: u32,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    game: TomlGame,
    #[serde(default)]
    boss: TomlBoss,
}

#[derive(Deserialize, Debug)]
struct TomlGame {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_levels_dir")]
    levels_dir: String,
}

#[derive(Deserialize, Debug)]
struct TomlBoss {
    #[serde(default = "default_boss_health")]
    health: u32,
    #[serde(default = "default_contact_damage")]
    contact_damage: u32,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { 75 }
fn default_levels_dir() -> String { "levels".into() }
fn default_boss_health() -> u32 { 100 }
fn default_contact_damage() -> u32 { 25 }

impl Default for TomlGame {
    fn default() -> Self {
        TomlGame {
            tick_rate_ms: default_tick_rate(),
            levels_dir: default_levels_dir(),
        }
    }
}

impl Default for TomlBoss {
    fn default() -> Self {
        TomlBoss {
            health: default_boss_health(),
            contact_damage: default_contact_damage(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = load_toml(&search_dirs);

        // Resolve the levels directory against the same candidates.
        let levels_dir_str = &toml_cfg.game.levels_dir;
        let levels_dir = if PathBuf::from(levels_dir_str).is_absolute() {
            PathBuf::from(levels_dir_str)
        } else {
            search_dirs
                .iter()
                .map(|d| d.join(levels_dir_str))
                .find(|p| p.is_dir())
                .unwrap_or_else(|| PathBuf::from(levels_dir_str))
        };

        GameConfig {
            tick_rate_ms: toml_cfg.game.tick_rate_ms,
            levels_dir,
            boss: BossConfig {
                health: toml_cfg.boss.health,
                contact_damage: toml_cfg.boss.contact_damage,
            },
        }
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        // Resolve symlinks so a linked binary still finds data
        // relative to the real location.
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_takes_all_defaults() {
        let cfg: TomlConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.game.tick_rate_ms, 75);
        assert_eq!(cfg.boss.health, 100);
        assert_eq!(cfg.boss.contact_damage, 25);
    }

    #[test]
    fn partial_sections_fill_per_key() {
        let cfg: TomlConfig = toml::from_str("[boss]\nhealth = 250\n").unwrap();
        assert_eq!(cfg.boss.health, 250);
        assert_eq!(cfg.boss.contact_damage, 25);
        assert_eq!(cfg.game.levels_dir, "levels");
    }
}
