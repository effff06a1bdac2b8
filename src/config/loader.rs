use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

use super::cursor::CursorConfig;

#[derive(Deserialize, Default, Clone, Debug, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub cursor: CursorConfig,
}

const DEFAULT_CONFIG: &str = r###"# Cursor installed on the root window
[cursor]
# Any standard shape name, case-insensitive:
#   arrow, ibeam, wait, cross, uparrow, sizewesteast, sizenorthsouth,
#   sizeall, no, hand, appstarting, help, topside, bottomside, leftside,
#   rightside, topleftcorner, toprightcorner, bottomleftcorner,
#   bottomrightcorner, dragmove, dragcopy, draglink, none
shape = "arrow"

# A PNG image replaces the shape. Relative paths start at this directory.
# image = { path = "pointer.png", hotspot = [16, 16] }

# Several PNGs, one per display scale, replace both. The closest scale wins.
# images = [
#   { path = "pointer-32.png", hotspot = [1, 1], scale = 1.0 },
#   { path = "pointer-64.png", hotspot = [2, 2], scale = 2.0 },
# ]

# Scale factor override; defaults to Xft.dpi / 96
# scale = 2.0
"###;

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let mut config = Self::parse(&content)?;

        if let Some(dir) = path.parent() {
            config.cursor.resolve_paths(dir);
        }

        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config file")
    }

    pub fn config_path() -> Result<PathBuf> {
        if let Ok(dir) = std::env::var("XDG_CONFIG_HOME") {
            if !dir.is_empty() {
                return Ok(PathBuf::from(dir).join("hotspot/config.toml"));
            }
        }

        let home = std::env::var("HOME").context("Failed to get HOME directory")?;

        Ok(PathBuf::from(home).join(".config/hotspot/config.toml"))
    }

    fn create_default_config(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        fs::write(path, DEFAULT_CONFIG).context("Failed to write default config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::shape::CursorShape;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_config_parses() {
        let config = Config::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.cursor.shape, CursorShape::Arrow);
        assert_eq!(config.cursor.scale, None);
    }

    #[test]
    fn shape_names_ignore_case() {
        let config = Config::parse("[cursor]\nshape = \"SizeAll\"\nscale = 2.0\n").unwrap();
        assert_eq!(config.cursor.shape, CursorShape::SizeAll);
        assert_eq!(config.cursor.effective_scale(1.0), 2.0);

        let config = Config::parse("[cursor]\nshape = \"ibeam\"\n").unwrap();
        assert_eq!(config.cursor.shape, CursorShape::Ibeam);
        assert_eq!(config.cursor.effective_scale(1.5), 1.5);
    }

    #[test]
    fn unknown_shape_is_rejected() {
        let err = Config::parse("[cursor]\nshape = \"pirate\"\n").unwrap_err();
        assert!(format!("{:#}", err).contains("Unrecognized cursor type 'pirate'."));
    }

    #[test]
    fn non_positive_override_falls_back_to_display() {
        let config = Config::parse("[cursor]\nscale = 0.0\n").unwrap();
        assert_eq!(config.cursor.effective_scale(1.25), 1.25);
    }

    #[test]
    fn writes_and_reads_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.toml");

        Config::create_default_config(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
    }

    #[test]
    fn image_paths_are_relative_to_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[cursor]\nimage = { path = \"pointer.png\" }\nimages = [{ path = \"/abs/big.png\", scale = 2.0 }]\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(
            config.cursor.image.unwrap().path,
            dir.path().join("pointer.png")
        );
        assert_eq!(config.cursor.images[0].path, PathBuf::from("/abs/big.png"));
    }

    #[test]
    fn config_path_points_at_hotspot_dir() {
        let path = Config::config_path().unwrap();
        assert!(path.ends_with("hotspot/config.toml"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_from(&dir.path().join("absent.toml")).is_err());
    }
}
