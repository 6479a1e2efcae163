#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
#![allow(non_upper_case_globals)]

use std::{
  ffi::{c_long, c_void},
  marker::{PhantomData, PhantomPinned},
  mem::size_of,
  ptr::{addr_of, addr_of_mut, null_mut},
  time::Duration,
};

use tracing::{debug, trace, warn};

use crate::{OsStatus, PowerAction, SessionControl};

/// Talks to `loginwindow` with Apple Events.
///
/// `loginwindow` is reachable as the system process (PSN `{0, kSystemProcess}`) and accepts the
/// `kCoreEventClass` events `kAESleep`, `kAERestart`, `kAEShutDown` and `kAEReallyLogOut`. See
/// Apple's QA1134 for the original recipe.
#[derive(Debug, Default)]
pub struct AppleEvents;

impl SessionControl for AppleEvents {
  type Target = Desc;
  type Request = Desc;

  fn resolve_target(&mut self) -> Result<Desc, OsStatus> {
    let login_window = ProcessSerialNumber {
      highLongOfPSN: 0,
      lowLongOfPSN: kSystemProcess,
    };

    let mut target = Desc::null();
    // SAFETY: AECreateDesc copies `dataSize` bytes out of `dataPtr`, which points at a live PSN.
    // On failure it leaves `result` as a null descriptor, which Desc is fine dropping.
    let err = unsafe {
      AECreateDesc(
        typeProcessSerialNumber,
        addr_of!(login_window) as *const c_void,
        size_of::<ProcessSerialNumber>() as Size,
        target.as_mut_ptr(),
      )
    };
    trace!("AECreateDesc(psn) -> {}", err);
    if err != noErr {
      return Err(OsStatus::new(err.into()));
    }
    Ok(target)
  }

  fn build_request(&mut self, target: &Desc, action: PowerAction) -> Result<Desc, OsStatus> {
    let mut event = Desc::null();
    // SAFETY: target is a valid address descriptor for the lifetime of this call and event is a
    // null descriptor AECreateAppleEvent may overwrite.
    let err = unsafe {
      AECreateAppleEvent(
        kCoreEventClass,
        action.event_id().code(),
        target.as_ptr(),
        kAutoGenerateReturnID,
        kAnyTransactionID,
        event.as_mut_ptr(),
      )
    };
    trace!("AECreateAppleEvent({}) -> {}", action.event_id(), err);
    if err != noErr {
      return Err(OsStatus::new(err.into()));
    }
    Ok(event)
  }

  fn send(&mut self, request: &Desc, timeout: Duration) -> Result<(), OsStatus> {
    // kAENoReply never fills in the reply, but AESendMessage still wants somewhere to put it
    let mut reply = Desc::null();
    let ticks = to_ticks(timeout);
    // SAFETY: request is a fully built Apple Event and reply is a null descriptor we dispose of.
    let status = unsafe { AESendMessage(request.as_ptr(), reply.as_mut_ptr(), kAENoReply, ticks) };
    trace!("AESendMessage(timeout={} ticks) -> {}", ticks, status);
    if status != noErr.into() {
      return Err(OsStatus::new(status));
    }
    Ok(())
  }
}

/// Owned `AEDesc`, disposed on drop.
pub struct Desc(AEDesc);

impl Desc {
  fn null() -> Self {
    Self(AEDesc {
      descriptorType: typeNull,
      dataHandle: null_mut(),
    })
  }

  fn as_ptr(&self) -> *const AEDesc {
    addr_of!(self.0)
  }

  fn as_mut_ptr(&mut self) -> *mut AEDesc {
    addr_of_mut!(self.0)
  }
}

impl Drop for Desc {
  fn drop(&mut self) {
    // SAFETY: disposing a null descriptor is a no-op, and anything else was created by the AE
    // manager and is disposed exactly once, here
    let err = unsafe { AEDisposeDesc(self.as_mut_ptr()) };
    if err != noErr {
      warn!("AEDisposeDesc failed. err={}", err);
    } else {
      debug!("disposed Apple Event descriptor");
    }
  }
}

/// The Event Manager counts time in ticks of 1/60 s.
fn to_ticks(timeout: Duration) -> c_long {
  (timeout.as_millis() * 60 / 1000) as c_long
}

const fn four_char_code(code: &[u8; 4]) -> u32 {
  u32::from_be_bytes(*code)
}

//
// Carbon types
//

type OSErr = i16;
type OSStatus = i32;
type OSType = u32;
type DescType = OSType;
type AEEventClass = OSType;
type AEEventID = OSType;
type AEReturnID = i16;
type AETransactionID = i32;
type AESendMode = i32;
type Size = isize;

const noErr: OSErr = 0;

#[repr(C)]
struct OpaqueAEDataStorageType {
  _data: [u8; 0],
  _marker: PhantomData<(*mut u8, PhantomPinned)>,
}
type AEDataStorage = *mut *mut OpaqueAEDataStorageType;

// AEDataModel.h wraps these in `#pragma pack(push, 2)`
#[repr(C, packed(2))]
struct AEDesc {
  descriptorType: DescType,
  dataHandle: AEDataStorage,
}
type AEAddressDesc = AEDesc;
type AppleEvent = AEDesc;

#[repr(C, packed(2))]
struct ProcessSerialNumber {
  highLongOfPSN: u32,
  lowLongOfPSN: u32,
}

const kSystemProcess: u32 = 1;

const typeNull: DescType = four_char_code(b"null");
const typeProcessSerialNumber: DescType = four_char_code(b"psn ");
const kCoreEventClass: AEEventClass = four_char_code(b"aevt");

const kAutoGenerateReturnID: AEReturnID = -1;
const kAnyTransactionID: AETransactionID = 0;
const kAENoReply: AESendMode = 0x0000_0001;

#[cfg_attr(target_os = "macos", link(name = "CoreServices", kind = "framework"))]
extern "C" {
  fn AECreateDesc(
    typeCode: DescType,
    dataPtr: *const c_void,
    dataSize: Size,
    result: *mut AEDesc,
  ) -> OSErr;

  fn AECreateAppleEvent(
    theAEEventClass: AEEventClass,
    theAEEventID: AEEventID,
    target: *const AEAddressDesc,
    returnID: AEReturnID,
    transactionID: AETransactionID,
    result: *mut AppleEvent,
  ) -> OSErr;

  fn AESendMessage(
    event: *const AppleEvent,
    reply: *mut AppleEvent,
    sendMode: AESendMode,
    timeOutInTicks: c_long,
  ) -> OSStatus;

  fn AEDisposeDesc(theAEDesc: *mut AEDesc) -> OSErr;
}
