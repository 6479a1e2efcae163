use std::{fs, io, path::PathBuf};

use serde::Deserialize;

use crate::{Error, PowerAction};

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
  /// `tracing_subscriber::EnvFilter` directive, e.g. `info` or `switchoff=debug`.
  pub log_level: String,
  /// Action focused when the grid first appears.
  pub focus: PowerAction,
  /// Let polkit prompt for authentication (logind only).
  pub interactive: bool,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      log_level: "info".to_string(),
      focus: PowerAction::Sleep,
      interactive: true,
    }
  }
}

impl Config {
  /// Loads the config file, or defaults if there isn't one.
  pub fn load() -> Result<Self, Error> {
    let config_path = Self::get_config_path()?;
    Self::load_from_file(&config_path)
  }

  pub fn get_config_path() -> Result<PathBuf, Error> {
    #[cfg(debug_assertions)]
    {
      // In debug mode, look for config.toml in the current directory
      Ok(PathBuf::from("config.toml"))
    }

    #[cfg(not(debug_assertions))]
    {
      let home = std::env::var_os("HOME").ok_or_else(|| {
        Error::Io(io::Error::new(
          io::ErrorKind::NotFound,
          "HOME environment variable not set",
        ))
      })?;
      Ok(PathBuf::from(home).join(".config/switchoff/config.toml"))
    }
  }

  pub fn load_from_file(path: impl Into<PathBuf>) -> Result<Self, Error> {
    let path = path.into();
    let contents = match fs::read_to_string(&path) {
      Ok(contents) => contents,
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
      Err(source) => {
        return Err(Error::ReadConfig {
          path: path.display().to_string(),
          source,
        })
      }
    };
    toml::from_str(&contents).map_err(|source| Error::ParseConfig {
      path: path.display().to_string(),
      source,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_file_is_all_defaults() {
    let config: Config = toml::from_str("").unwrap();
    assert_eq!(config, Config::default());
  }

  #[test]
  fn parses_every_key() {
    let config: Config = toml::from_str(
      r#"
        log_level = "switchoff=debug"
        focus = "shutdown"
        interactive = false
      "#,
    )
    .unwrap();
    assert_eq!(config.log_level, "switchoff=debug");
    assert_eq!(config.focus, PowerAction::ShutDown);
    assert!(!config.interactive);
  }

  #[test]
  fn accepts_kebab_case_actions() {
    let config: Config = toml::from_str(r#"focus = "log-out""#).unwrap();
    assert_eq!(config.focus, PowerAction::LogOut);
  }

  #[test]
  fn rejects_unknown_keys_and_actions() {
    assert!(toml::from_str::<Config>(r#"focus = "hibernate""#).is_err());
    assert!(toml::from_str::<Config>(r#"timeout = 5"#).is_err());
  }

  #[test]
  fn missing_file_gives_defaults() {
    let path = std::env::temp_dir().join("switchoff-does-not-exist/config.toml");
    assert_eq!(Config::load_from_file(path).unwrap(), Config::default());
  }

  #[test]
  fn reports_bad_files() {
    let path = std::env::temp_dir().join(format!("switchoff-bad-{}.toml", std::process::id()));
    fs::write(&path, "focus = 3").unwrap();
    let err = Config::load_from_file(&path).unwrap_err();
    fs::remove_file(&path).unwrap();
    assert!(matches!(err, Error::ParseConfig { .. }));
  }
}
