//! OTP-gated execution of sensitive record operations.
//!
//! A privileged user requests an upload or delete; the coordinator asks the
//! server to dispatch a one-time passcode, holds the operation in a single
//! pending slot, and runs it only after the server accepts the code.
//!
//! Transitions:
//! - `Idle` → `AwaitingOtp`: OTP dispatched for a requested action
//! - `AwaitingOtp` → `Verifying` → `Idle`: code accepted, operation run once
//! - `Verifying` → `AwaitingOtp`: code rejected, action kept for another try
//! - `AwaitingOtp` → `Idle`: cancelled
//! - a failed dispatch leaves `Idle` and discards the request

mod coordinator;
mod error;

pub use coordinator::{ActionOutcome, PendingPolicy, SecureActionCoordinator, SecureActionPhase};
pub use error::SecureActionError;
