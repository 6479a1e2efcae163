#![warn(clippy::all)]

//! Ask the OS session manager to sleep, restart, shut down, or log out.
//!
//! [`PowerAction`] is the closed set of things that can be asked for. A [`Dispatcher`] hands one
//! of them to a [`SessionControl`] backend: Apple Events to `loginwindow` on macOS, logind over
//! D-Bus on Linux.

mod action;
pub mod app;
pub mod chooser;
pub mod config;
mod dispatch;
pub mod logging;

#[cfg(target_os = "linux")]
mod logind;
#[cfg(target_os = "macos")]
mod macos;

pub use action::{EventId, PowerAction, Tint, UnknownAction};
pub use config::Config;
pub use dispatch::{
  dispatch, DispatchError, DispatchResult, Dispatcher, OsStatus, SessionControl, SEND_TIMEOUT,
};

#[cfg(target_os = "linux")]
pub use logind::Logind;
#[cfg(target_os = "macos")]
pub use macos::AppleEvents;

#[cfg(target_os = "macos")]
pub type SystemSessionControl = AppleEvents;
#[cfg(target_os = "linux")]
pub type SystemSessionControl = Logind;
#[cfg(not(any(target_os = "macos", target_os = "linux")))]
pub type SystemSessionControl = Unsupported;

/// Builds this platform's backend with the settings from `config`.
#[cfg(target_os = "linux")]
pub fn system_session_control(config: &Config) -> SystemSessionControl {
  Logind::new(config.interactive)
}

#[cfg(not(target_os = "linux"))]
pub fn system_session_control(_config: &Config) -> SystemSessionControl {
  SystemSessionControl::default()
}

/// Backend for platforms without a supported session manager. Every dispatch fails to resolve.
#[derive(Debug, Default)]
pub struct Unsupported;

impl Unsupported {
  fn status() -> OsStatus {
    OsStatus::with_detail(
      -1,
      format!("no session manager support for {}", std::env::consts::OS),
    )
  }
}

impl SessionControl for Unsupported {
  type Target = ();
  type Request = ();

  fn resolve_target(&mut self) -> Result<(), OsStatus> {
    Err(Self::status())
  }

  fn build_request(&mut self, _target: &(), _action: PowerAction) -> Result<(), OsStatus> {
    Err(Self::status())
  }

  fn send(&mut self, _request: &(), _timeout: std::time::Duration) -> Result<(), OsStatus> {
    Err(Self::status())
  }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("failed to read {path}: {source}")]
  ReadConfig {
    path: String,
    source: std::io::Error,
  },
  #[error("invalid config {path}: {source}")]
  ParseConfig {
    path: String,
    source: toml::de::Error,
  },
  #[error("invalid log filter: {0}")]
  Logging(String),
  #[error(transparent)]
  Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unsupported_fails_every_step() {
    let mut control = Unsupported;
    assert_eq!(control.resolve_target().unwrap_err().code, -1);
    assert!(control.build_request(&(), PowerAction::Sleep).is_err());
    assert!(control.send(&(), SEND_TIMEOUT).is_err());

    let err = Dispatcher::new(Unsupported).dispatch(PowerAction::Restart).unwrap_err();
    assert!(matches!(err, DispatchError::AddressResolution { .. }));
  }
}
