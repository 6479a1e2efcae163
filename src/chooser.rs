//! Keyboard focus over the action grid.
//!
//! The grid is two columns wide, laid out in tab order:
//!
//! ```text
//!   Sleep      Restart
//!   Shut Down  Log Out
//! ```

use tracing::trace;

use crate::PowerAction;

const COLUMNS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
  Tab,
  Left,
  Right,
  Up,
  Down,
  Enter,
  Escape,
  Char(char),
  /// An action typed out by name.
  Named(PowerAction),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
  Pending,
  Chosen(PowerAction),
  Cancelled,
}

#[derive(Debug, Clone)]
pub struct Chooser {
  focus: PowerAction,
}

impl Default for Chooser {
  fn default() -> Self {
    Self::new(PowerAction::Sleep)
  }
}

impl Chooser {
  pub fn new(focus: PowerAction) -> Self {
    Self { focus }
  }

  pub fn focus(&self) -> PowerAction {
    self.focus
  }

  pub fn handle(&mut self, key: Key) -> Outcome {
    let outcome = match key {
      Key::Tab => {
        self.focus = self.focus.next();
        Outcome::Pending
      }
      Key::Left => self.step(|row, col| (col > 0).then(|| (row, col - 1))),
      Key::Right => self.step(|row, col| (col + 1 < COLUMNS).then(|| (row, col + 1))),
      Key::Up => self.step(|row, col| (row > 0).then(|| (row - 1, col))),
      Key::Down => self.step(|row, col| Some((row + 1, col))),
      Key::Enter => Outcome::Chosen(self.focus),
      Key::Escape => Outcome::Cancelled,
      Key::Named(action) => {
        self.focus = action;
        Outcome::Chosen(action)
      }
      Key::Char(c) => match PowerAction::from_shortcut(c) {
        Some(action) => {
          self.focus = action;
          Outcome::Chosen(action)
        }
        None => Outcome::Pending,
      },
    };
    trace!("{:?} -> {:?} (focus {:?})", key, outcome, self.focus);
    outcome
  }

  /// Moves focus within the grid. Moves that would leave the grid do nothing.
  fn step<F>(&mut self, f: F) -> Outcome
  where
    F: FnOnce(usize, usize) -> Option<(usize, usize)>,
  {
    let order = self.focus.tab_order();
    let cells = PowerAction::by_tab_order();
    if let Some((row, col)) = f(order / COLUMNS, order % COLUMNS) {
      if let Some(action) = cells.get(row * COLUMNS + col) {
        self.focus = *action;
      }
    }
    Outcome::Pending
  }
}

/// Turns one line of terminal input into keys.
///
/// A blank line is Enter, and a line naming an action (`sleep`, `Shut Down`, `logout`, ...) picks
/// it. Otherwise the line is split on spaces; each word is a key name (`tab`, `left`, `esc`, ...),
/// a single shortcut character, or raw tabs and escape sequences as a cooked terminal echoes them.
/// Any other word is ignored.
pub fn parse_line(line: &str) -> Vec<Key> {
  let line = line.trim_end_matches(['\r', '\n']);
  if line.trim().is_empty() && !line.contains('\t') {
    return vec![Key::Enter];
  }
  let name = line.split_whitespace().collect::<Vec<_>>().join("-");
  if let Ok(action) = name.parse::<PowerAction>() {
    return vec![Key::Named(action)];
  }

  let mut keys = Vec::new();
  for word in line.split(' ').filter(|w| !w.is_empty()) {
    match word.to_ascii_lowercase().as_str() {
      "tab" => keys.push(Key::Tab),
      "left" => keys.push(Key::Left),
      "right" => keys.push(Key::Right),
      "up" => keys.push(Key::Up),
      "down" => keys.push(Key::Down),
      "enter" | "return" => keys.push(Key::Enter),
      "esc" | "escape" | "cancel" | "q" => keys.push(Key::Escape),
      _ => parse_raw(word, &mut keys),
    }
  }
  keys
}

fn parse_raw(word: &str, keys: &mut Vec<Key>) {
  let mut single = word.chars();
  if let (Some(c), None) = (single.next(), single.next()) {
    if !c.is_control() {
      keys.push(Key::Char(c));
      return;
    }
  }

  let mut chars = word.chars().peekable();
  while let Some(c) = chars.next() {
    match c {
      '\t' => keys.push(Key::Tab),
      '\u{1b}' => {
        if chars.peek() == Some(&'[') {
          chars.next();
          match chars.next() {
            Some('A') => keys.push(Key::Up),
            Some('B') => keys.push(Key::Down),
            Some('C') => keys.push(Key::Right),
            Some('D') => keys.push(Key::Left),
            _ => {}
          }
        } else {
          keys.push(Key::Escape);
        }
      }
      // letters inside a longer word are not shortcuts
      _ => {}
    }
  }
}
