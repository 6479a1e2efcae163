//! Terminal front end: draws the action grid, reads keys, dispatches the choice.

use std::io::{BufRead, Write};

use tracing::{debug, error, info};

use crate::{
  chooser::{self, Chooser, Outcome},
  Config, DispatchError, Dispatcher, Error, PowerAction, SessionControl,
};

/// How a run ended.
#[derive(Debug)]
pub enum Exit {
  Dispatched(PowerAction),
  Cancelled,
  Failed(DispatchError),
}

impl Exit {
  pub fn code(&self) -> u8 {
    match self {
      Exit::Dispatched(_) | Exit::Cancelled => 0,
      Exit::Failed(_) => 1,
    }
  }
}

pub struct App<C> {
  config: Config,
  dispatcher: Dispatcher<C>,
  color: bool,
}

impl<C> App<C>
where
  C: SessionControl,
{
  pub fn startup(config: Config, control: C) -> Self {
    info!("application did finish launching");
    debug!("initial focus {:?}", config.focus);
    Self {
      config,
      dispatcher: Dispatcher::new(control),
      color: false,
    }
  }

  /// Paint action labels with their tint.
  pub fn with_color(mut self, color: bool) -> Self {
    self.color = color;
    self
  }

  /// Shows the grid until an action is chosen or the user cancels, then dispatches it.
  ///
  /// The dispatch happens before anything is torn down, so a failure is still shown and
  /// acknowledged on this screen.
  pub fn run<R, W>(&mut self, mut input: R, mut output: W) -> Result<Exit, Error>
  where
    R: BufRead,
    W: Write,
  {
    let mut chooser = Chooser::new(self.config.focus);
    let action = loop {
      self.render(&chooser, &mut output)?;
      match read_choice(&mut chooser, &mut input)? {
        Outcome::Chosen(action) => break action,
        Outcome::Cancelled => {
          info!("cancelled");
          return Ok(Exit::Cancelled);
        }
        Outcome::Pending => {}
      }
    };

    match self.dispatcher.dispatch(action) {
      Ok(()) => Ok(Exit::Dispatched(action)),
      Err(e) => {
        error!("{}", e);
        writeln!(output)?;
        writeln!(output, "Error")?;
        writeln!(output, "{}", e)?;
        write!(output, "[OK] ")?;
        output.flush()?;
        let mut ack = String::new();
        input.read_line(&mut ack)?;
        Ok(Exit::Failed(e))
      }
    }
  }

  pub fn teardown(self) {
    info!("application will terminate");
  }

  fn render<W: Write>(&self, chooser: &Chooser, out: &mut W) -> Result<(), Error> {
    writeln!(out)?;
    writeln!(out, "System Control")?;
    writeln!(out, "Select an action to perform")?;
    writeln!(out)?;
    for row in PowerAction::by_tab_order().chunks(2) {
      let cells: Vec<String> = row.iter().map(|a| self.cell(*a, chooser.focus())).collect();
      writeln!(out, "  {}", cells.join("  "))?;
    }
    writeln!(out)?;
    writeln!(out, "  Tab/arrows move, Enter selects, a shortcut or name picks, Esc cancels")?;
    write!(out, "> ")?;
    out.flush()?;
    Ok(())
  }

  fn cell(&self, action: PowerAction, focus: PowerAction) -> String {
    let marker = if action == focus { '>' } else { ' ' };
    let label = format!("{:<10}", action.label());
    let label = if self.color {
      format!("\u{1b}[{}m{}\u{1b}[0m", action.tint().ansi(), label)
    } else {
      label
    };
    format!("{} [{}] {}", marker, action.shortcut(), label)
  }
}

/// Reads one line and feeds its keys to the chooser until one of them decides. EOF cancels.
fn read_choice<R: BufRead>(chooser: &mut Chooser, input: &mut R) -> Result<Outcome, Error> {
  let mut line = String::new();
  if input.read_line(&mut line)? == 0 {
    return Ok(Outcome::Cancelled);
  }
  for key in chooser::parse_line(&line) {
    match chooser.handle(key) {
      Outcome::Pending => continue,
      decided => return Ok(decided),
    }
  }
  Ok(Outcome::Pending)
}

#[cfg(test)]
mod tests {
  use std::{io::Cursor, time::Duration};

  use super::*;
  use crate::OsStatus;

  #[derive(Default)]
  struct Recorder {
    sent: Vec<PowerAction>,
    fail: bool,
  }

  impl SessionControl for Recorder {
    type Target = ();
    type Request = PowerAction;

    fn resolve_target(&mut self) -> Result<(), OsStatus> {
      Ok(())
    }

    fn build_request(&mut self, _: &(), action: PowerAction) -> Result<PowerAction, OsStatus> {
      Ok(action)
    }

    fn send(&mut self, request: &PowerAction, _: Duration) -> Result<(), OsStatus> {
      self.sent.push(*request);
      if self.fail {
        Err(OsStatus::new(-1712))
      } else {
        Ok(())
      }
    }
  }

  fn run(input: &str, recorder: Recorder) -> (Exit, String, Vec<PowerAction>) {
    let mut app = App::startup(Config::default(), recorder);
    let mut output = Vec::new();
    let exit = app.run(Cursor::new(input), &mut output).unwrap();
    let sent = app.dispatcher.control().sent.clone();
    app.teardown();
    (exit, String::from_utf8(output).unwrap(), sent)
  }

  #[test]
  fn enter_dispatches_default_focus() {
    let (exit, output, sent) = run("\n", Recorder::default());
    assert!(matches!(exit, Exit::Dispatched(PowerAction::Sleep)));
    assert_eq!(sent, [PowerAction::Sleep]);
    assert!(output.contains("> [z] Sleep"));
  }

  #[test]
  fn navigates_then_dispatches() {
    let (exit, _, sent) = run("tab\ndown\n\n", Recorder::default());
    assert!(matches!(exit, Exit::Dispatched(PowerAction::LogOut)));
    assert_eq!(sent, [PowerAction::LogOut]);
  }

  #[test]
  fn shortcut_dispatches_immediately() {
    let (exit, _, sent) = run("s\n", Recorder::default());
    assert!(matches!(exit, Exit::Dispatched(PowerAction::ShutDown)));
    assert_eq!(sent, [PowerAction::ShutDown]);
  }

  #[test]
  fn typing_a_label_sends_that_action() {
    let (exit, _, sent) = run("sleep\n", Recorder::default());
    assert!(matches!(exit, Exit::Dispatched(PowerAction::Sleep)));
    assert_eq!(sent, [PowerAction::Sleep]);

    let (exit, _, sent) = run("slp\n", Recorder::default());
    assert!(matches!(exit, Exit::Cancelled));
    assert!(sent.is_empty());
  }

  #[test]
  fn escape_and_eof_cancel_without_sending() {
    let (exit, _, sent) = run("esc\n", Recorder::default());
    assert!(matches!(exit, Exit::Cancelled));
    assert!(sent.is_empty());

    let (exit, _, sent) = run("tab\n", Recorder::default());
    assert!(matches!(exit, Exit::Cancelled));
    assert!(sent.is_empty());
  }

  #[test]
  fn failure_is_shown_and_acknowledged() {
    let recorder = Recorder {
      fail: true,
      ..Default::default()
    };
    let (exit, output, _) = run("r\n\n", recorder);
    assert_eq!(exit.code(), 1);
    assert!(output.contains("Restart"));
    assert!(output.contains("-1712"));
    assert!(output.ends_with("[OK] "));
  }
}
