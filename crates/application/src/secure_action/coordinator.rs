//! Secure action coordinator

use std::sync::Arc;

use careportal_domain::{
    ActionKind, ChallengeState, DeferredOperation, OtpCode, PendingAction, endpoints,
};
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use super::SecureActionError;
use crate::ports::ApiClient;

/// What to do when an action is requested while another is pending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PendingPolicy {
    /// Refuse the new request with [`SecureActionError::Busy`].
    #[default]
    RejectWhileBusy,
    /// Discard the pending action and start over with the new one.
    ReplacePending,
}

/// Coarse phase of the coordinator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SecureActionPhase {
    /// No action pending.
    #[default]
    Idle,
    /// OTP dispatched; waiting for the user's code.
    AwaitingOtp,
    /// A code is being verified with the server.
    Verifying,
}

/// Result of a verified and executed action.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionOutcome {
    /// Label of the executed action.
    pub label: String,
    /// Kind of the executed action.
    pub kind: ActionKind,
    /// Response body of the executed operation.
    pub response: Value,
}

impl ActionOutcome {
    /// Confirmation message for the user.
    #[must_use]
    pub const fn success_message(&self) -> &'static str {
        match self.kind {
            ActionKind::Upload => "Record uploaded successfully!",
            ActionKind::Delete => "Record deleted successfully!",
        }
    }
}

/// Runs sensitive operations behind a server-verified OTP challenge.
///
/// Holds at most one [`PendingAction`]. The pending operation is executed
/// only from the success path of the verify call, exactly once, and is
/// discarded afterwards whether or not execution succeeds.
///
/// All transitions take `&mut self`, so two transitions can never overlap.
pub struct SecureActionCoordinator<C: ApiClient> {
    client: Arc<C>,
    policy: PendingPolicy,
    pending: Option<PendingAction>,
    challenge: ChallengeState,
    phase: SecureActionPhase,
}

impl<C: ApiClient> SecureActionCoordinator<C> {
    /// Creates an idle coordinator that rejects overlapping requests.
    pub fn new(client: Arc<C>) -> Self {
        Self::with_policy(client, PendingPolicy::default())
    }

    /// Creates an idle coordinator with an explicit overlap policy.
    pub fn with_policy(client: Arc<C>, policy: PendingPolicy) -> Self {
        Self {
            client,
            policy,
            pending: None,
            challenge: ChallengeState::closed(),
            phase: SecureActionPhase::Idle,
        }
    }

    /// Returns the current phase.
    #[must_use]
    pub const fn phase(&self) -> SecureActionPhase {
        self.phase
    }

    /// Returns the prompt state.
    #[must_use]
    pub const fn challenge(&self) -> &ChallengeState {
        &self.challenge
    }

    /// Returns the pending action, if any.
    #[must_use]
    pub const fn pending(&self) -> Option<&PendingAction> {
        self.pending.as_ref()
    }

    /// Returns the overlap policy.
    #[must_use]
    pub const fn policy(&self) -> PendingPolicy {
        self.policy
    }

    /// Records `action` and asks the server to dispatch an OTP for it.
    ///
    /// On success the challenge is opened with the action's label. On
    /// dispatch failure the action is discarded and the coordinator is Idle;
    /// the challenge never opens.
    ///
    /// # Errors
    /// - [`SecureActionError::InvalidAction`] if the operation cannot be
    ///   addressed (a delete with an unusable record id)
    /// - [`SecureActionError::Busy`] if another action is pending and the
    ///   policy is [`PendingPolicy::RejectWhileBusy`]
    /// - [`SecureActionError::Dispatch`] if the OTP could not be sent
    pub async fn request_secure_action(
        &mut self,
        action: PendingAction,
    ) -> Result<ChallengeState, SecureActionError> {
        if let DeferredOperation::Delete { record_id } = &action.operation {
            endpoints::record(record_id).map_err(SecureActionError::InvalidAction)?;
        }

        if let Some(current) = self.pending.as_ref().map(|a| a.label.clone()) {
            match self.policy {
                PendingPolicy::RejectWhileBusy => {
                    return Err(SecureActionError::Busy { label: current });
                }
                PendingPolicy::ReplacePending => {
                    info!(
                        replaced = %current,
                        action = %action.label,
                        "replacing pending secure action"
                    );
                    self.reset();
                }
            }
        }

        // Installed only once the dispatch succeeds, so an abandoned or
        // failed dispatch leaves the coordinator Idle with nothing pending.
        let label = action.label.clone();
        if let Err(e) = self.dispatch_otp(&label).await {
            warn!(action = %label, error = %e, "OTP dispatch failed");
            return Err(SecureActionError::Dispatch(e));
        }

        info!(action = %label, "OTP dispatched, awaiting code");
        self.pending = Some(action);
        self.challenge = ChallengeState::opened(label);
        self.phase = SecureActionPhase::AwaitingOtp;
        Ok(self.challenge.clone())
    }

    /// Verifies `code` and, if accepted, executes the pending operation.
    ///
    /// The code format is checked first, without any request. A rejected
    /// code keeps the action pending so the user can retry or resend.
    ///
    /// # Errors
    /// - [`SecureActionError::InvalidCode`] for anything but six digits
    /// - [`SecureActionError::NoPendingAction`] when Idle
    /// - [`SecureActionError::Verification`] when the server rejects the code
    /// - [`SecureActionError::Execution`] when the operation itself fails
    pub async fn verify(&mut self, code: &str) -> Result<ActionOutcome, SecureActionError> {
        let code = OtpCode::parse(code).map_err(SecureActionError::InvalidCode)?;
        let label = match &self.pending {
            Some(action) => action.label.clone(),
            None => return Err(SecureActionError::NoPendingAction),
        };

        let body = json!({ "otp": code.as_str(), "action": label });
        let verified = {
            let _verifying = PhaseGuard::enter(&mut self.phase, SecureActionPhase::Verifying);
            self.client
                .post(endpoints::MANAGER_VERIFY_OTP, Some(&body))
                .await
        };
        if let Err(e) = verified {
            warn!(action = %label, error = %e, "OTP verification failed");
            return Err(SecureActionError::Verification(e));
        }

        let Some(action) = self.pending.take() else {
            self.reset();
            return Err(SecureActionError::NoPendingAction);
        };
        self.reset();

        debug!(action = %action.label, "OTP accepted, executing deferred operation");
        let kind = action.kind();
        let PendingAction { label, operation } = action;
        let result = match operation {
            DeferredOperation::Upload(file) => {
                self.client
                    .upload_file(endpoints::RECORDS_UPLOAD, &file)
                    .await
            }
            DeferredOperation::Delete { record_id } => match endpoints::record(&record_id) {
                Ok(path) => self.client.delete(&path).await,
                Err(e) => Err(e.into()),
            },
        };

        match result {
            Ok(response) => {
                info!(action = %label, "secure action completed");
                Ok(ActionOutcome {
                    label,
                    kind,
                    response,
                })
            }
            Err(source) => {
                warn!(action = %label, error = %source, "secure action failed");
                Err(SecureActionError::Execution { label, source })
            }
        }
    }

    /// Asks the server to send a fresh OTP for the pending action.
    ///
    /// # Errors
    /// - [`SecureActionError::NoPendingAction`] when Idle
    /// - [`SecureActionError::Resend`] if dispatch fails; the action stays
    ///   pending
    pub async fn resend(&mut self) -> Result<(), SecureActionError> {
        let label = match &self.pending {
            Some(action) => action.label.clone(),
            None => return Err(SecureActionError::NoPendingAction),
        };

        self.dispatch_otp(&label).await.map_err(|e| {
            warn!(action = %label, error = %e, "OTP resend failed");
            SecureActionError::Resend(e)
        })?;

        info!(action = %label, "OTP re-sent");
        Ok(())
    }

    /// Discards the pending action and closes the challenge without
    /// contacting the server. Returns the discarded action.
    pub fn cancel(&mut self) -> Option<PendingAction> {
        let discarded = self.pending.take();
        if let Some(action) = &discarded {
            info!(action = %action.label, "secure action cancelled");
        }
        self.reset();
        discarded
    }

    /// Hides the prompt while keeping the pending action.
    pub fn dismiss_prompt(&mut self) {
        self.challenge.open = false;
    }

    /// Shows the prompt again for the pending action.
    ///
    /// # Errors
    /// Returns [`SecureActionError::NoPendingAction`] when Idle.
    pub fn reopen_prompt(&mut self) -> Result<&ChallengeState, SecureActionError> {
        if self.pending.is_none() {
            return Err(SecureActionError::NoPendingAction);
        }
        self.challenge.open = true;
        Ok(&self.challenge)
    }

    async fn dispatch_otp(&self, label: &str) -> careportal_domain::ApiResult<Value> {
        let body = json!({ "action": label });
        self.client
            .post(endpoints::MANAGER_SEND_OTP, Some(&body))
            .await
    }

    fn reset(&mut self) {
        self.pending = None;
        self.challenge = ChallengeState::closed();
        self.phase = SecureActionPhase::Idle;
    }
}

/// Holds a phase for the lifetime of the guard, restoring the previous one
/// on drop, including when the owning future is dropped mid-await.
struct PhaseGuard<'a> {
    slot: &'a mut SecureActionPhase,
    previous: SecureActionPhase,
}

impl<'a> PhaseGuard<'a> {
    fn enter(slot: &'a mut SecureActionPhase, phase: SecureActionPhase) -> Self {
        let previous = std::mem::replace(slot, phase);
        Self { slot, previous }
    }
}

impl Drop for PhaseGuard<'_> {
    fn drop(&mut self) {
        *self.slot = self.previous;
    }
}
