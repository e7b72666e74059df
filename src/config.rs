/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub movement: MovementConfig,
    pub hints: HintConfig,
    pub gamepad: GamepadConfig,
    pub tile_size: u32,
}

/// Everything the movement engine needs to know about time and distance.
#[derive(Clone, Debug, PartialEq)]
pub struct MovementConfig {
    pub speed_tiles_per_sec: f32,
    pub settle_epsilon: f32,
    pub frame: Duration,
    pub switch_guard: Duration,
}

#[derive(Clone, Debug)]
pub struct HintConfig {
    pub auto_hint_after: Duration,
    pub display_for: Duration,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub confirm: Vec<String>,
    pub cancel: Vec<String>,
    pub hint: Vec<String>,
}

impl Default for MovementConfig {
    fn default() -> Self {
        MovementConfig {
            speed_tiles_per_sec: default_speed(),
            settle_epsilon: default_epsilon(),
            frame: Duration::from_millis(default_frame_ms()),
            switch_guard: Duration::from_millis(default_guard_ms()),
        }
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    movement: TomlMovement,
    #[serde(default)]
    switches: TomlSwitches,
    #[serde(default)]
    hints: TomlHints,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlMovement {
    #[serde(default = "default_speed")]
    speed_tiles_per_sec: f32,
    #[serde(default = "default_epsilon")]
    settle_epsilon: f32,
    #[serde(default = "default_frame_ms")]
    frame_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlSwitches {
    #[serde(default = "default_guard_ms")]
    guard_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlHints {
    #[serde(default = "default_auto_hint")]
    auto_hint_secs: u64,
    #[serde(default = "default_hint_display")]
    hint_display_secs: u64,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_confirm")]
    confirm: Vec<String>,
    #[serde(default = "default_cancel")]
    cancel: Vec<String>,
    #[serde(default = "default_hint")]
    hint: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_tile_size")]
    tile_size: u32,
}

// ── Defaults ──

fn default_speed() -> f32 { 4.0 }
fn default_epsilon() -> f32 { 0.05 }
fn default_frame_ms() -> u64 { 16 }
fn default_guard_ms() -> u64 { 500 }
fn default_auto_hint() -> u64 { 30 }
fn default_hint_display() -> u64 { 3 }
fn default_tile_size() -> u32 { 32 }

fn default_confirm() -> Vec<String> { vec!["A".into(), "Start".into()] }
fn default_cancel() -> Vec<String> { vec!["B".into(), "Select".into()] }
fn default_hint() -> Vec<String> { vec!["Y".into()] }

impl Default for TomlMovement {
    fn default() -> Self {
        TomlMovement {
            speed_tiles_per_sec: default_speed(),
            settle_epsilon: default_epsilon(),
            frame_ms: default_frame_ms(),
        }
    }
}

impl Default for TomlSwitches {
    fn default() -> Self {
        TomlSwitches { guard_ms: default_guard_ms() }
    }
}

impl Default for TomlHints {
    fn default() -> Self {
        TomlHints {
            auto_hint_secs: default_auto_hint(),
            hint_display_secs: default_hint_display(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            confirm: default_confirm(),
            cancel: default_cancel(),
            hint: default_hint(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral { tile_size: default_tile_size() }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory,
    /// (3) `~/.local/share/doormaze`.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        Self::from_toml(load_toml(&candidate_dirs()))
    }

    /// Parse a config document. Keys left out take their defaults.
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<TomlConfig>(text).map(Self::from_toml)
    }

    fn from_toml(cfg: TomlConfig) -> Self {
        let mut movement = MovementConfig {
            speed_tiles_per_sec: cfg.movement.speed_tiles_per_sec,
            settle_epsilon: cfg.movement.settle_epsilon,
            frame: Duration::from_millis(cfg.movement.frame_ms.max(1)),
            switch_guard: Duration::from_millis(cfg.switches.guard_ms),
        };

        // A non-positive speed would never arrive; an epsilon of zero would never settle.
        if !(movement.speed_tiles_per_sec > 0.0) {
            tracing::warn!(speed = movement.speed_tiles_per_sec, "invalid movement speed, using default");
            movement.speed_tiles_per_sec = default_speed();
        }
        if !(movement.settle_epsilon > 0.0) {
            tracing::warn!(epsilon = movement.settle_epsilon, "invalid settle epsilon, using default");
            movement.settle_epsilon = default_epsilon();
        }

        GameConfig {
            movement,
            hints: HintConfig {
                auto_hint_after: Duration::from_secs(cfg.hints.auto_hint_secs),
                display_for: Duration::from_secs(cfg.hints.hint_display_secs),
            },
            gamepad: GamepadConfig {
                confirm: cfg.gamepad.confirm,
                cancel: cfg.gamepad.cancel,
                hint: cfg.gamepad.hint,
            },
            tile_size: cfg.general.tile_size.max(1),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::from_toml(TomlConfig::default())
    }
}

/// Candidate directories to search: exe dir + CWD + XDG data (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/doormaze)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/doormaze");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
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
        if !path.exists() {
            continue;
        }
        match std::fs::read_to_string(&path) {
            Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                Ok(cfg) => {
                    tracing::info!(path = %path.display(), "loaded config");
                    return cfg;
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), "config.toml parse error: {e}; using defaults");
                    return TomlConfig::default();
                }
            },
            Err(e) => {
                tracing::warn!("could not read {}: {e}", path.display());
            }
        }
    }
    TomlConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let cfg = GameConfig::parse("").unwrap();
        assert_eq!(cfg.movement, MovementConfig::default());
        assert_eq!(cfg.movement.speed_tiles_per_sec, 4.0);
        assert_eq!(cfg.movement.switch_guard, Duration::from_millis(500));
        assert_eq!(cfg.hints.auto_hint_after, Duration::from_secs(30));
        assert_eq!(cfg.tile_size, 32);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = GameConfig::parse(
            "[movement]\nspeed_tiles_per_sec = 6.5\n\n[switches]\nguard_ms = 250\n",
        ).unwrap();
        assert_eq!(cfg.movement.speed_tiles_per_sec, 6.5);
        assert_eq!(cfg.movement.settle_epsilon, 0.05);
        assert_eq!(cfg.movement.switch_guard, Duration::from_millis(250));
        assert_eq!(cfg.gamepad.confirm, vec!["A".to_string(), "Start".to_string()]);
    }

    #[test]
    fn nonsense_speed_falls_back() {
        let cfg = GameConfig::parse("[movement]\nspeed_tiles_per_sec = -1.0\nsettle_epsilon = 0.0\n").unwrap();
        assert_eq!(cfg.movement.speed_tiles_per_sec, 4.0);
        assert_eq!(cfg.movement.settle_epsilon, 0.05);
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(GameConfig::parse("[movement\nspeed = ").is_err());
    }
}
