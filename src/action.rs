#![allow(non_upper_case_globals)]

use std::{fmt, str::FromStr};

use serde::Deserialize;

/// A four-character code naming an Apple Event, e.g. `'slep'`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventId(u32);

impl EventId {
  pub const fn new(code: [u8; 4]) -> Self {
    Self(u32::from_be_bytes(code))
  }

  pub const fn code(self) -> u32 {
    self.0
  }
}

impl fmt::Display for EventId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let bytes = self.0.to_be_bytes();
    write!(f, "'{}'", String::from_utf8_lossy(&bytes))
  }
}

const kAESleep: EventId = EventId::new(*b"slep");
const kAERestart: EventId = EventId::new(*b"rrst");
const kAEShutDown: EventId = EventId::new(*b"shut");
const kAEReallyLogOut: EventId = EventId::new(*b"rlgo");

/// Colour token for an action. The front end decides how to paint it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tint {
  Blue,
  Orange,
  Red,
  Purple,
}

impl Tint {
  /// ANSI SGR foreground code.
  pub const fn ansi(self) -> u8 {
    match self {
      Tint::Blue => 34,
      Tint::Orange => 33,
      Tint::Red => 31,
      Tint::Purple => 35,
    }
  }
}

/// One of the four power/session transitions the session manager can be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PowerAction {
  #[serde(alias = "shutdown")]
  ShutDown,
  Restart,
  Sleep,
  #[serde(alias = "logout")]
  LogOut,
}

impl PowerAction {
  const ALL: [PowerAction; 4] = [
    PowerAction::ShutDown,
    PowerAction::Restart,
    PowerAction::Sleep,
    PowerAction::LogOut,
  ];

  const BY_TAB_ORDER: [PowerAction; 4] = [
    PowerAction::Sleep,
    PowerAction::Restart,
    PowerAction::ShutDown,
    PowerAction::LogOut,
  ];

  /// Every action, in declaration order.
  pub const fn all() -> [PowerAction; 4] {
    Self::ALL
  }

  /// Every action, sorted for focus navigation.
  pub fn by_tab_order() -> [PowerAction; 4] {
    let mut actions = Self::all();
    actions.sort_by_key(|action| action.tab_order());
    actions
  }

  /// Apple Event id the login window understands for this action.
  pub const fn event_id(self) -> EventId {
    match self {
      PowerAction::ShutDown => kAEShutDown,
      PowerAction::Restart => kAERestart,
      PowerAction::Sleep => kAESleep,
      PowerAction::LogOut => kAEReallyLogOut,
    }
  }

  pub const fn label(self) -> &'static str {
    match self {
      PowerAction::ShutDown => "Shut Down",
      PowerAction::Restart => "Restart",
      PowerAction::Sleep => "Sleep",
      PowerAction::LogOut => "Log Out",
    }
  }

  pub const fn description(self) -> &'static str {
    match self {
      PowerAction::ShutDown => "Shut down the computer",
      PowerAction::Restart => "Restart the computer",
      PowerAction::Sleep => "Put the computer to sleep",
      PowerAction::LogOut => "Log out the user",
    }
  }

  /// SF Symbols name; also used as a stable icon token elsewhere.
  pub const fn icon(self) -> &'static str {
    match self {
      PowerAction::ShutDown => "power",
      PowerAction::Restart => "arrow.clockwise",
      PowerAction::Sleep => "moon.fill",
      PowerAction::LogOut => "person.crop.circle.badge.xmark",
    }
  }

  pub const fn tint(self) -> Tint {
    match self {
      PowerAction::ShutDown => Tint::Red,
      PowerAction::Restart => Tint::Orange,
      PowerAction::Sleep => Tint::Blue,
      PowerAction::LogOut => Tint::Purple,
    }
  }

  pub const fn shortcut(self) -> char {
    match self {
      PowerAction::ShutDown => 's',
      PowerAction::Restart => 'r',
      PowerAction::Sleep => 'z',
      PowerAction::LogOut => 'l',
    }
  }

  pub const fn tab_order(self) -> usize {
    match self {
      PowerAction::Sleep => 0,
      PowerAction::Restart => 1,
      PowerAction::ShutDown => 2,
      PowerAction::LogOut => 3,
    }
  }

  pub fn from_shortcut(key: char) -> Option<PowerAction> {
    let key = key.to_ascii_lowercase();
    Self::all().into_iter().find(|action| action.shortcut() == key)
  }

  /// Next action in tab order, wrapping after the last.
  pub fn next(self) -> PowerAction {
    Self::BY_TAB_ORDER[(self.tab_order() + 1) % Self::BY_TAB_ORDER.len()]
  }

  pub fn previous(self) -> PowerAction {
    let len = Self::BY_TAB_ORDER.len();
    Self::BY_TAB_ORDER[(self.tab_order() + len - 1) % len]
  }
}

impl fmt::Display for PowerAction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown power action `{0}`")]
pub struct UnknownAction(String);

impl FromStr for PowerAction {
  type Err = UnknownAction;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "sleep" => Ok(PowerAction::Sleep),
      "restart" => Ok(PowerAction::Restart),
      "shut-down" | "shutdown" => Ok(PowerAction::ShutDown),
      "log-out" | "logout" => Ok(PowerAction::LogOut),
      _ => Err(UnknownAction(s.to_string())),
    }
  }
}

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use super::*;

  #[test]
  fn attributes_are_pairwise_distinct() {
    let ids: HashSet<_> = PowerAction::all().iter().map(|a| a.event_id()).collect();
    let shortcuts: HashSet<_> = PowerAction::all().iter().map(|a| a.shortcut()).collect();
    let orders: HashSet<_> = PowerAction::all().iter().map(|a| a.tab_order()).collect();

    assert_eq!(ids.len(), 4);
    assert_eq!(shortcuts.len(), 4);
    assert_eq!(orders, HashSet::from([0, 1, 2, 3]));
  }

  #[test]
  fn tab_order_sequence() {
    assert_eq!(
      PowerAction::by_tab_order(),
      [
        PowerAction::Sleep,
        PowerAction::Restart,
        PowerAction::ShutDown,
        PowerAction::LogOut
      ]
    );
  }

  #[test]
  fn next_and_previous_wrap() {
    assert_eq!(PowerAction::LogOut.next(), PowerAction::Sleep);
    assert_eq!(PowerAction::Sleep.previous(), PowerAction::LogOut);
    for action in PowerAction::all() {
      assert_eq!(action.next().previous(), action);
    }
  }

  #[test]
  fn shortcuts_ignore_case() {
    assert_eq!(PowerAction::from_shortcut('Z'), Some(PowerAction::Sleep));
    assert_eq!(PowerAction::from_shortcut('s'), Some(PowerAction::ShutDown));
    assert_eq!(PowerAction::from_shortcut('x'), None);
  }

  #[test]
  fn event_id_renders_as_four_chars() {
    assert_eq!(PowerAction::Sleep.event_id().to_string(), "'slep'");
    assert_eq!(PowerAction::LogOut.event_id().code(), 0x726c676f);
  }

  #[test]
  fn parses_names() {
    assert_eq!("shutdown".parse::<PowerAction>().unwrap(), PowerAction::ShutDown);
    assert_eq!("Log-Out".parse::<PowerAction>().unwrap(), PowerAction::LogOut);
    assert!("hibernate".parse::<PowerAction>().is_err());
  }
}
