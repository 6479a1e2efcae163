#![forbid(unsafe_code)]
#![warn(clippy::all)]

use std::time::Duration;

use switchoff::{Dispatcher, OsStatus, PowerAction, SessionControl};
use tracing::info;

/// Logs every step instead of talking to the session manager.
struct Printer {}
impl SessionControl for Printer {
  type Target = ();
  type Request = PowerAction;

  fn resolve_target(&mut self) -> Result<(), OsStatus> {
    info!("resolve_target");
    Ok(())
  }

  fn build_request(&mut self, _target: &(), action: PowerAction) -> Result<PowerAction, OsStatus> {
    info!("build_request {} {}", action.event_id(), action.description());
    Ok(action)
  }

  fn send(&mut self, request: &PowerAction, timeout: Duration) -> Result<(), OsStatus> {
    info!("send {:?} within {:?}", request, timeout);
    Ok(())
  }
}

fn main() {
  tracing_subscriber::fmt().init();

  let mut dispatcher = Dispatcher::new(Printer {});
  for action in PowerAction::by_tab_order() {
    if let Err(e) = dispatcher.dispatch(action) {
      info!("{}", e);
    }
  }
}
