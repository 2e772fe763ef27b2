use std::fmt;
use std::io::ErrorKind;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{json, Error, Result};

#[derive(Copy, Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Copy, Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Sections,
    Tabs,
}

/// Panel preferences kept in `settings.json`.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Settings {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub view_mode: ViewMode,
}

impl Settings {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        match std::fs::read(path.as_ref()) {
            Ok(content) => Ok(serde_json::from_slice(&content)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err.into()),
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        json::write_pretty(path.as_ref(), self)
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(Error::InvalidVar {
                name: "theme",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::Sections => write!(f, "sections"),
            ViewMode::Tabs => write!(f, "tabs"),
        }
    }
}

impl FromStr for ViewMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sections" => Ok(ViewMode::Sections),
            "tabs" => Ok(ViewMode::Tabs),
            other => Err(Error::InvalidVar {
                name: "view_mode",
                value: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path() -> std::path::PathBuf {
        std::env::temp_dir().join(format!("settings-{}.json", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let settings = Settings::load(temp_path()).unwrap();
        assert_eq!(settings.theme, Theme::Light);
        assert_eq!(settings.view_mode, ViewMode::Sections);
    }

    #[test]
    fn test_reads_existing_file() {
        let path = temp_path();
        std::fs::write(&path, r#"{"theme": "dark", "view_mode": "tabs"}"#).unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(settings.view_mode, ViewMode::Tabs);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let path = temp_path();
        std::fs::write(&path, r#"{"theme": "dark"}"#).unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.view_mode, ViewMode::Sections);
    }

    #[test]
    fn test_save() {
        let path = temp_path();
        let settings = Settings {
            theme: Theme::Dark,
            view_mode: ViewMode::Tabs,
        };
        settings.save(&path).unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "{\n    \"theme\": \"dark\",\n    \"view_mode\": \"tabs\"\n}"
        );
        assert_eq!(Settings::load(&path).unwrap(), settings);
    }
}
