use std::{fmt, time::Duration};

use tracing::{debug, info, warn};

use crate::PowerAction;

/// How long a send may wait for the OS messaging layer to accept the request.
pub const SEND_TIMEOUT: Duration = Duration::from_secs(1);

/// Status reported by the OS for a failed step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsStatus {
  pub code: i32,
  pub detail: Option<String>,
}

impl OsStatus {
  pub fn new(code: i32) -> Self {
    Self { code, detail: None }
  }

  pub fn with_detail(code: i32, detail: impl Into<String>) -> Self {
    Self {
      code,
      detail: Some(detail.into()),
    }
  }
}

impl fmt::Display for OsStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.detail {
      Some(detail) => write!(f, "{} ({})", self.code, detail),
      None => write!(f, "{}", self.code),
    }
  }
}

/// The OS facility that performs power and session transitions.
///
/// A dispatch walks the three steps in order: resolve the session-control process, build a
/// request for one action addressed to it, then send that request without waiting for a reply.
/// `Target` and `Request` own whatever the OS allocated for them and must release it on drop.
pub trait SessionControl {
  type Target;
  type Request;

  fn resolve_target(&mut self) -> Result<Self::Target, OsStatus>;

  fn build_request(
    &mut self,
    target: &Self::Target,
    action: PowerAction,
  ) -> Result<Self::Request, OsStatus>;

  /// Hands the request to the OS. Returns once the messaging layer has accepted it or `timeout`
  /// expires; it never waits for the transition itself.
  fn send(&mut self, request: &Self::Request, timeout: Duration) -> Result<(), OsStatus>;
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
  #[error("unable to address the session-control process for {action:?}. Status: {status}")]
  AddressResolution { action: PowerAction, status: OsStatus },

  #[error("unable to create the {action:?} event {}. Status: {status}", .action.event_id())]
  EventConstruction { action: PowerAction, status: OsStatus },

  #[error("error while sending the {action:?} event {}. Status: {status}", .action.event_id())]
  Send { action: PowerAction, status: OsStatus },
}

impl DispatchError {
  pub fn action(&self) -> PowerAction {
    match self {
      DispatchError::AddressResolution { action, .. }
      | DispatchError::EventConstruction { action, .. }
      | DispatchError::Send { action, .. } => *action,
    }
  }

  pub fn status(&self) -> &OsStatus {
    match self {
      DispatchError::AddressResolution { status, .. }
      | DispatchError::EventConstruction { status, .. }
      | DispatchError::Send { status, .. } => status,
    }
  }
}

pub type DispatchResult = Result<(), DispatchError>;

/// Sends power actions through a [`SessionControl`].
pub struct Dispatcher<C> {
  control: C,
}

impl<C> Dispatcher<C>
where
  C: SessionControl,
{
  pub fn new(control: C) -> Self {
    Self { control }
  }

  /// Asks the OS to perform `action`.
  ///
  /// `Ok` only means the request was accepted for delivery. The session manager may still refuse
  /// the transition later (an app with unsaved documents, for instance) and that is not reported
  /// here. Nothing is retried.
  pub fn dispatch(&mut self, action: PowerAction) -> DispatchResult {
    info!("dispatching {:?} ({})", action, action.event_id());

    let target = self.control.resolve_target().map_err(|status| {
      warn!("address resolution failed for {:?}: {}", action, status);
      DispatchError::AddressResolution { action, status }
    })?;
    debug!("resolved session-control target");

    let request = self.control.build_request(&target, action);
    // the request no longer needs its address
    drop(target);
    let request = request.map_err(|status| {
      warn!("event construction failed for {:?}: {}", action, status);
      DispatchError::EventConstruction { action, status }
    })?;

    self.control.send(&request, SEND_TIMEOUT).map_err(|status| {
      warn!("send failed for {:?}: {}", action, status);
      DispatchError::Send { action, status }
    })?;

    info!("{:?} accepted by the session manager", action);
    Ok(())
  }

  pub fn control(&self) -> &C {
    &self.control
  }

  pub fn into_inner(self) -> C {
    self.control
  }
}

/// Dispatches `action` through this platform's session manager.
pub fn dispatch(action: PowerAction) -> DispatchResult {
  Dispatcher::new(crate::SystemSessionControl::default()).dispatch(action)
}
