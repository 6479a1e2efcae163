use std::time::Duration;

use tracing::{debug, trace};
use zbus::{blocking::Connection, message::Flags, Message};

use crate::{OsStatus, PowerAction, SessionControl};

const LOGIND_SERVICE: &str = "org.freedesktop.login1";
const MANAGER_PATH: &str = "/org/freedesktop/login1";
const MANAGER_INTERFACE: &str = "org.freedesktop.login1.Manager";
const SESSION_PATH: &str = "/org/freedesktop/login1/session/auto";
const SESSION_INTERFACE: &str = "org.freedesktop.login1.Session";

/// Talks to systemd-logind on the system bus.
///
/// Every call goes out flagged `NO_REPLY_EXPECTED`, so a send completes as soon as the message
/// is written to the bus. polkit decides afterwards whether the caller may actually do it.
///
/// The send timeout is not applied here: neither the bus handshake in `resolve_target` nor the
/// write in `send` is time-limited.
#[derive(Debug)]
pub struct Logind {
  interactive: bool,
}

impl Logind {
  /// `interactive` lets polkit ask the user for authentication instead of refusing outright.
  pub fn new(interactive: bool) -> Self {
    Self { interactive }
  }
}

impl Default for Logind {
  fn default() -> Self {
    Self::new(true)
  }
}

pub struct Request {
  bus: Connection,
  message: Message,
}

impl SessionControl for Logind {
  type Target = Connection;
  type Request = Request;

  fn resolve_target(&mut self) -> Result<Connection, OsStatus> {
    let bus = Connection::system().map_err(status_of)?;
    debug!("connected to the system bus");
    Ok(bus)
  }

  fn build_request(&mut self, bus: &Connection, action: PowerAction) -> Result<Request, OsStatus> {
    let message = method_call(action, self.interactive).map_err(status_of)?;
    Ok(Request {
      bus: bus.clone(),
      message,
    })
  }

  fn send(&mut self, request: &Request, timeout: Duration) -> Result<(), OsStatus> {
    trace!("sending, {:?} budget not enforced on the bus", timeout);
    request.bus.send(&request.message).map_err(status_of)
  }
}

/// The no-reply logind call that performs `action`.
fn method_call(action: PowerAction, interactive: bool) -> zbus::Result<Message> {
  let (path, interface, method) = match action {
    PowerAction::Sleep => (MANAGER_PATH, MANAGER_INTERFACE, "Suspend"),
    PowerAction::Restart => (MANAGER_PATH, MANAGER_INTERFACE, "Reboot"),
    PowerAction::ShutDown => (MANAGER_PATH, MANAGER_INTERFACE, "PowerOff"),
    PowerAction::LogOut => (SESSION_PATH, SESSION_INTERFACE, "Terminate"),
  };
  trace!("building {}.{} on {}", interface, method, path);

  let builder = Message::method_call(path, method)?
    .destination(LOGIND_SERVICE)?
    .interface(interface)?
    .with_flags(Flags::NoReplyExpected)?;

  match action {
    PowerAction::LogOut => builder.build(&()),
    _ => builder.build(&(interactive,)),
  }
}

fn status_of(err: zbus::Error) -> OsStatus {
  let code = match &err {
    zbus::Error::InputOutput(io) => io.raw_os_error().unwrap_or(-1),
    _ => -1,
  };
  OsStatus::with_detail(code, err.to_string())
}
