//! Sign-in gate for actions that need an identity.
//!
//! A gated action issued while signed out is parked in a single slot and
//! the sign-in prompt is raised. Completing sign-in replays the parked
//! action once; a newer gated action replaces an older one.

use crate::user::Identity;
use crate::AuthError;
use std::fmt;

/// Work deferred until sign-in. It owns everything it needs to run.
pub type GatedAction<C> = Box<dyn FnOnce(&mut C, &Identity) -> Result<(), AuthError>>;

/// What [`AuthGate::check_auth_and_execute`] did with an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// Ran immediately for the signed-in user.
    Executed,
    /// Parked until sign-in; `replaced` is set when an earlier parked
    /// action was dropped in its favour.
    Deferred { replaced: bool },
}

/// Gate over a context `C` the actions operate on.
pub struct AuthGate<C> {
    current_user: Option<Identity>,
    pending: Option<GatedAction<C>>,
    prompt_visible: bool,
}

impl<C> Default for AuthGate<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> AuthGate<C> {
    /// Signed-out gate with nothing pending.
    pub fn new() -> Self {
        Self {
            current_user: None,
            pending: None,
            prompt_visible: false,
        }
    }

    /// Gate that starts signed in as `identity`.
    pub fn signed_in(identity: Identity) -> Self {
        Self {
            current_user: Some(identity),
            ..Self::new()
        }
    }

    /// Run `action` now if signed in, otherwise park it and raise the prompt.
    pub fn check_auth_and_execute<F>(
        &mut self,
        ctx: &mut C,
        action: F,
    ) -> Result<GateOutcome, AuthError>
    where
        F: FnOnce(&mut C, &Identity) -> Result<(), AuthError> + 'static,
    {
        if let Some(identity) = &self.current_user {
            action(ctx, identity)?;
            return Ok(GateOutcome::Executed);
        }

        let replaced = self.pending.replace(Box::new(action)).is_some();
        if replaced {
            tracing::debug!("replacing earlier action waiting on sign-in");
        }
        self.prompt_visible = true;
        Ok(GateOutcome::Deferred { replaced })
    }

    /// Record a completed sign-in and replay the parked action, if any.
    ///
    /// Returns whether an action was replayed. The slot is emptied before
    /// the action runs, so it runs at most once even if it fails.
    pub fn on_signed_in(&mut self, identity: Identity, ctx: &mut C) -> Result<bool, AuthError> {
        identity.validate()?;
        tracing::info!(user = %identity.id, "signed in");
        self.prompt_visible = false;
        let identity = self.current_user.insert(identity);

        match self.pending.take() {
            Some(action) => {
                action(ctx, identity)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Forget the identity and anything parked.
    pub fn on_signed_out(&mut self) {
        if let Some(identity) = self.current_user.take() {
            tracing::info!(user = %identity.id, "signed out");
        }
        self.pending = None;
        self.prompt_visible = false;
    }

    /// Close the prompt without signing in. Returns whether an action was dropped.
    pub fn dismiss_prompt(&mut self) -> bool {
        self.prompt_visible = false;
        self.pending.take().is_some()
    }

    pub fn prompt_visible(&self) -> bool {
        self.prompt_visible
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn current_user(&self) -> Option<&Identity> {
        self.current_user.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.current_user.is_some()
    }
}

impl<C> fmt::Debug for AuthGate<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthGate")
            .field("current_user", &self.current_user)
            .field("pending", &self.pending.is_some())
            .field("prompt_visible", &self.prompt_visible)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asha() -> Identity {
        Identity::new("u1", "Asha", "asha@example.com")
    }

    fn push(value: &'static str) -> impl FnOnce(&mut Vec<String>, &Identity) -> Result<(), AuthError> {
        move |log, who| {
            log.push(format!("{}:{}", who.id, value));
            Ok(())
        }
    }

    #[test]
    fn test_signed_in_runs_immediately() {
        let mut gate = AuthGate::signed_in(asha());
        let mut log = Vec::new();
        let outcome = gate.check_auth_and_execute(&mut log, push("premium")).unwrap();

        assert_eq!(outcome, GateOutcome::Executed);
        assert_eq!(log, vec!["u1:premium"]);
        assert!(!gate.prompt_visible());
    }

    #[test]
    fn test_signed_out_defers_and_prompts() {
        let mut gate = AuthGate::new();
        let mut log = Vec::new();
        let outcome = gate.check_auth_and_execute(&mut log, push("premium")).unwrap();

        assert_eq!(outcome, GateOutcome::Deferred { replaced: false });
        assert!(log.is_empty());
        assert!(gate.prompt_visible());
        assert!(gate.has_pending());
    }

    #[test]
    fn test_sign_in_replays_exactly_once() {
        let mut gate = AuthGate::new();
        let mut log = Vec::new();
        gate.check_auth_and_execute(&mut log, push("premium")).unwrap();

        assert!(gate.on_signed_in(asha(), &mut log).unwrap());
        assert_eq!(log, vec!["u1:premium"]);
        assert!(!gate.prompt_visible());

        // a second sign-in signal has nothing left to replay
        assert!(!gate.on_signed_in(asha(), &mut log).unwrap());
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_last_deferred_action_wins() {
        let mut gate = AuthGate::new();
        let mut log = Vec::new();
        gate.check_auth_and_execute(&mut log, push("basic")).unwrap();
        let outcome = gate.check_auth_and_execute(&mut log, push("deluxe")).unwrap();
        assert_eq!(outcome, GateOutcome::Deferred { replaced: true });

        gate.on_signed_in(asha(), &mut log).unwrap();
        assert_eq!(log, vec!["u1:deluxe"]);
    }

    #[test]
    fn test_dismiss_drops_pending() {
        let mut gate = AuthGate::new();
        let mut log = Vec::new();
        gate.check_auth_and_execute(&mut log, push("basic")).unwrap();

        assert!(gate.dismiss_prompt());
        assert!(!gate.prompt_visible());
        assert!(!gate.on_signed_in(asha(), &mut log).unwrap());
        assert!(log.is_empty());
    }

    #[test]
    fn test_sign_out_forgets_everything() {
        let mut gate = AuthGate::signed_in(asha());
        gate.on_signed_out();
        assert!(gate.current_user().is_none());

        let mut log = Vec::new();
        gate.check_auth_and_execute(&mut log, push("basic")).unwrap();
        gate.on_signed_out();
        assert!(!gate.has_pending());
        assert!(!gate.prompt_visible());
    }

    #[test]
    fn test_invalid_identity_keeps_action_parked() {
        let mut gate = AuthGate::new();
        let mut log = Vec::new();
        gate.check_auth_and_execute(&mut log, push("basic")).unwrap();

        let bad = Identity::new("u1", "Asha", "nope");
        assert!(gate.on_signed_in(bad, &mut log).is_err());
        assert!(gate.has_pending());
        assert!(gate.current_user().is_none());
    }

    #[test]
    fn test_failed_replay_is_not_retried() {
        let mut gate: AuthGate<Vec<String>> = AuthGate::new();
        let mut log = Vec::new();
        gate.check_auth_and_execute(&mut log, |_, _| {
            Err(AuthError::InvalidIdentity("boom".to_string()))
        })
        .unwrap();

        assert!(gate.on_signed_in(asha(), &mut log).is_err());
        assert!(!gate.has_pending());
        assert!(gate.is_signed_in());
    }
}
