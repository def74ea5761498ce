//! Route guards and client-side form checks.

use rbac_auth::{PasswordPolicy, Role};

use crate::session::SessionState;

pub const LOGIN_ROUTE: &str = "/login";
pub const FORBIDDEN_ROUTE: &str = "/unauthorized";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session still being established; show a spinner.
    Loading,
    RedirectToLogin,
    /// Signed in, wrong role; show the access-denied page.
    Forbidden,
    Render,
}

impl GuardDecision {
    /// Route to navigate to, if the decision is a redirect.
    pub fn redirect(&self) -> Option<&'static str> {
        match self {
            GuardDecision::RedirectToLogin => Some(LOGIN_ROUTE),
            GuardDecision::Forbidden => Some(FORBIDDEN_ROUTE),
            GuardDecision::Loading | GuardDecision::Render => None,
        }
    }
}

/// Decide what a protected page should do for the current session.
///
/// Uses the profile's role (fresh from the server), matched exactly like the
/// server-side gate.
pub fn guard(state: &SessionState, required: Option<Role>) -> GuardDecision {
    match state {
        SessionState::Unknown | SessionState::Verifying => GuardDecision::Loading,
        SessionState::Anonymous => GuardDecision::RedirectToLogin,
        SessionState::Authenticated { user, .. } => match required {
            Some(role) if !user.role.satisfies(role) => GuardDecision::Forbidden,
            _ => GuardDecision::Render,
        },
    }
}

/// Home page after login.
pub fn landing_route(role: Role) -> &'static str {
    match role {
        Role::Admin => "/admin",
        Role::User => "/dashboard",
    }
}

/// Check the change-password form before it is submitted.
///
/// The new password is checked against the policy first, then against its
/// confirmation. The error is the message to display.
pub fn validate_password_change(new_password: &str, confirm_password: &str) -> Result<(), String> {
    PasswordPolicy::default()
        .check(new_password)
        .map_err(|v| v.to_string())?;

    if new_password != confirm_password {
        return Err("New passwords do not match".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::tests::profile;

    fn signed_in(role: Role) -> SessionState {
        SessionState::Authenticated {
            token: "t".into(),
            user: profile("Alice", role),
        }
    }

    #[test]
    fn loading_states_wait() {
        for state in [SessionState::Unknown, SessionState::Verifying] {
            assert_eq!(guard(&state, Some(Role::Admin)), GuardDecision::Loading);
            assert_eq!(guard(&state, None), GuardDecision::Loading);
        }
    }

    #[test]
    fn anonymous_is_sent_to_login() {
        let decision = guard(&SessionState::Anonymous, None);
        assert_eq!(decision, GuardDecision::RedirectToLogin);
        assert_eq!(decision.redirect(), Some("/login"));
    }

    #[test]
    fn role_mismatch_is_forbidden_both_ways() {
        assert_eq!(guard(&signed_in(Role::User), Some(Role::Admin)), GuardDecision::Forbidden);
        assert_eq!(guard(&signed_in(Role::Admin), Some(Role::User)), GuardDecision::Forbidden);
        assert_eq!(
            guard(&signed_in(Role::User), Some(Role::Admin)).redirect(),
            Some("/unauthorized")
        );
    }

    #[test]
    fn matching_or_unrestricted_renders() {
        assert_eq!(guard(&signed_in(Role::Admin), Some(Role::Admin)), GuardDecision::Render);
        assert_eq!(guard(&signed_in(Role::User), Some(Role::User)), GuardDecision::Render);
        assert_eq!(guard(&signed_in(Role::User), None), GuardDecision::Render);
        assert_eq!(guard(&signed_in(Role::Admin), None), GuardDecision::Render);
    }

    #[test]
    fn landing_depends_on_role() {
        assert_eq!(landing_route(Role::Admin), "/admin");
        assert_eq!(landing_route(Role::User), "/dashboard");
    }

    #[test]
    fn password_form_checks_policy_before_confirmation() {
        assert_eq!(
            validate_password_change("abc", "xyz"),
            Err("Password must be at least 6 characters long".to_string())
        );
        assert_eq!(
            validate_password_change("NewPass9", "NewPass8"),
            Err("New passwords do not match".to_string())
        );
        assert_eq!(validate_password_change("NewPass9", "NewPass9"), Ok(()));
    }
}
