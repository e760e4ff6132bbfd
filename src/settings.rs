//! Solver and host-loop settings
//!
//! Stored as JSON. Every field has a default, so a settings file only needs
//! the values it changes.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::{SolverConfig, SolverError};

/// Settings load/save failure
#[derive(Debug)]
pub enum SettingsError {
    Io(io::Error),
    Parse(serde_json::Error),
    /// Parsed, but not a usable solver configuration
    Invalid(SolverError),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "Settings I/O error: {e}"),
            Self::Parse(e) => write!(f, "Settings parse error: {e}"),
            Self::Invalid(e) => write!(f, "Invalid settings: {e}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Invalid(e) => Some(e),
        }
    }
}

impl From<io::Error> for SettingsError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

impl From<SolverError> for SettingsError {
    fn from(e: SolverError) -> Self {
        Self::Invalid(e)
    }
}

/// Simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === World ===
    /// World width and height in grid cells (one cell per world unit)
    pub world_size: [i32; 2],
    /// Radius given to every ball a scenario creates
    pub ball_radius: f32,

    // === Solver ===
    pub sub_steps: u32,
    pub gravity: [f32; 2],
    /// Body slots per grid cell
    pub cell_capacity: u32,

    // === Host loop ===
    /// Frames per second the driver simulates
    pub fps_cap: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            world_size: [WORLD_SIZE.0, WORLD_SIZE.1],
            ball_radius: BALL_RADIUS,
            sub_steps: SUB_STEPS,
            gravity: [0.0, 0.0],
            cell_capacity: CELL_CAPACITY,
            fps_cap: FPS_CAP,
        }
    }
}

impl Settings {
    /// Solver configuration, validated
    pub fn solver_config(&self) -> Result<SolverConfig, SolverError> {
        if !(self.ball_radius.is_finite() && self.ball_radius > 0.0) {
            return Err(SolverError::InvalidRadius {
                radius: self.ball_radius,
            });
        }
        let config = SolverConfig {
            world_size: IVec2::from_array(self.world_size),
            sub_steps: self.sub_steps,
            gravity: Vec2::from_array(self.gravity),
            cell_capacity: self.cell_capacity,
        };
        config.validate()?;
        Ok(config)
    }

    /// Frame time for the host loop; a zero cap falls back to the default
    pub fn frame_dt(&self) -> f32 {
        let fps = if self.fps_cap == 0 { FPS_CAP } else { self.fps_cap };
        1.0 / fps as f32
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.solver_config()?;
        Ok(settings)
    }

    /// Load and validate settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_solver_defaults() {
        let settings = Settings::default();
        let config = settings.solver_config().unwrap();
        assert_eq!(config, SolverConfig::default());
        assert!((settings.frame_dt() - 1.0 / 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "sub_steps": 4, "gravity": [0.0, 9.8] }"#).unwrap();
        assert_eq!(settings.sub_steps, 4);
        assert_eq!(settings.gravity, [0.0, 9.8]);
        assert_eq!(settings.world_size, [100, 100]);
        assert_eq!(settings.fps_cap, 60);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = Settings::from_json(r#"{ "world_size": [0, 100] }"#).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid(SolverError::InvalidWorldSize { width: 0, height: 100 })
        ));
        let err = Settings::from_json(r#"{ "ball_radius": -1.0 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(SolverError::InvalidRadius { .. })));
        let err = Settings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_zero_fps_cap_falls_back() {
        let settings = Settings {
            fps_cap: 0,
            ..Default::default()
        };
        assert!((settings.frame_dt() - 1.0 / 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("verlet-pool-settings-{}.json", std::process::id()));
        let settings = Settings {
            sub_steps: 3,
            cell_capacity: 12,
            ..Default::default()
        };
        settings.save(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Settings::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }
}
