//! Game settings and preferences
//!
//! Persisted as a plain `config` file in the configuration directory, one
//! `key<TAB>value` pair per line. Keys are case-insensitive; unknown keys and
//! malformed lines are skipped so an old or hand-edited file still loads.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PersistError;
use crate::sim::state::CoreFlags;

/// Settings file name inside the configuration directory
pub const CONFIG_FILE: &str = "config";

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Name recorded with high scores
    pub name: String,
    /// Hits never cost a heart
    pub invincibility: bool,
    /// Particle effects (smoke, splashes, debris)
    pub particles: bool,
    pub sound: bool,
    pub music: bool,
    pub fullscreen: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            name: "Funny Boat".to_string(),
            invincibility: false,
            particles: true,
            sound: true,
            music: true,
            fullscreen: false,
        }
    }
}

/// `true/false/1/0`, any case
fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

impl Settings {
    /// `$HOME/.funnyboat`, or `./.funnyboat` when there is no home
    pub fn default_dir() -> PathBuf {
        std::env::var_os("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".funnyboat")
    }

    pub fn path(dir: &Path) -> PathBuf {
        dir.join(CONFIG_FILE)
    }

    /// The flags the simulation reads
    pub fn core_flags(&self) -> CoreFlags {
        CoreFlags {
            invincible: self.invincibility,
            particles: self.particles,
        }
    }

    /// Apply every recognised line of a config file on top of `self`
    pub fn apply(&mut self, text: &str) {
        for line in text.lines() {
            let mut tokens = line.split('\t').map(str::trim);
            let (Some(key), Some(value)) = (tokens.next(), tokens.next()) else {
                continue;
            };

            let flag = match key.to_ascii_lowercase().as_str() {
                "name" => {
                    self.name = value.to_string();
                    continue;
                }
                "invincibility" => &mut self.invincibility,
                "particles" => &mut self.particles,
                "sound" => &mut self.sound,
                "music" => &mut self.music,
                "fullscreen" => &mut self.fullscreen,
                other => {
                    log::debug!("Ignoring unknown setting {:?}", other);
                    continue;
                }
            };
            match parse_bool(value) {
                Some(on) => *flag = on,
                None => log::debug!("Ignoring {:?} for {:?}", value, key),
            }
        }
    }

    pub fn parse(text: &str) -> Self {
        let mut settings = Self::default();
        settings.apply(text);
        settings
    }

    /// File contents for [`Settings::save`]
    pub fn to_config_string(&self) -> String {
        format!(
            "particles\t{}\ninvincibility\t{}\nmusic\t{}\nname\t{}\nsound\t{}\nfullscreen\t{}\n",
            self.particles, self.invincibility, self.music, self.name, self.sound, self.fullscreen
        )
    }

    /// Read `dir/config`; a missing file yields the defaults
    pub fn read(dir: &Path) -> Result<Self, PersistError> {
        let path = Self::path(dir);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Self::parse(&text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(PersistError::io(path, e)),
        }
    }

    /// Load settings, falling back to defaults on any failure
    pub fn load(dir: &Path) -> Self {
        match Self::read(dir) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", Self::path(dir).display());
                settings
            }
            Err(e) => {
                log::warn!("Using default settings: {}", e);
                Self::default()
            }
        }
    }

    /// Write `dir/config`, creating the directory if needed
    pub fn save(&self, dir: &Path) -> Result<(), PersistError> {
        fs::create_dir_all(dir).map_err(|e| PersistError::io(dir, e))?;
        let path = Self::path(dir);
        fs::write(&path, self.to_config_string()).map_err(|e| PersistError::io(&path, e))?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
