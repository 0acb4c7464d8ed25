#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Session verification and identity resolution.
//!
//! Maps an authenticated session (a bearer token provisioned by the
//! external auth collaborator) to `{role, station_id}`. Accounts without
//! a profile row get a default role derived from their email domain and
//! no station; the station is only ever set through the separate
//! profile-completion flow.
//!
//! The resolved [`SessionContext`] is passed explicitly to every
//! data-access call; there is no ambient global session state.

use casetrack_case_models::UserRole;
use casetrack_database::{DbError, sessions, users};
use sha2::{Digest as _, Sha256};
use switchy_database::Database;

/// Errors from session verification and identity resolution.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// A database query failed.
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    /// No valid session exists for the presented token.
    #[error("Unauthorized")]
    Unauthorized,
}

/// The authenticated account behind a verified session, before the
/// profile lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    /// Account id from the auth collaborator.
    pub user_id: String,
    /// Account email from the auth collaborator.
    pub email: String,
}

/// A resolved identity: who the caller is and what they may see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Account id.
    pub user_id: String,
    /// Account email.
    pub email: String,
    /// Resolved role (profile row, or email-domain fallback).
    pub role: UserRole,
    /// Station the account is bound to, if any. Never set by the
    /// fallback path.
    pub station_id: Option<String>,
}

/// The caller's scope, carried through every data-access call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    /// Account id.
    pub user_id: String,
    /// Account role.
    pub role: UserRole,
    /// Station the account is bound to, if any.
    pub station_id: Option<String>,
}

impl From<Identity> for SessionContext {
    fn from(identity: Identity) -> Self {
        Self {
            user_id: identity.user_id,
            role: identity.role,
            station_id: identity.station_id,
        }
    }
}

impl SessionContext {
    /// Resolves the station scope for a request.
    ///
    /// Elevated roles may ask for any station (or none, meaning all
    /// stations); everyone else is pinned to their own station
    /// regardless of what they requested. This is the explicit
    /// replacement for the hosted store's row-level scoping.
    #[must_use]
    pub fn effective_station(&self, requested: Option<&str>) -> Option<String> {
        if self.role.is_elevated() {
            requested.map(ToString::to_string)
        } else {
            self.station_id.clone()
        }
    }
}

/// Returns the hex digest under which a bearer token is stored.
#[must_use]
pub fn token_digest(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Verifies a bearer token against the sessions table.
///
/// # Errors
///
/// Returns [`IdentityError::Unauthorized`] if no session exists for the
/// token or the session has expired, and [`IdentityError::Database`] if
/// the lookup itself fails.
pub async fn verify_session(db: &dyn Database, token: &str) -> Result<AuthUser, IdentityError> {
    let Some(session) = sessions::get_session(db, &token_digest(token)).await? else {
        return Err(IdentityError::Unauthorized);
    };

    // An unparsable expiry is treated as expired rather than eternal.
    let expires = chrono::DateTime::parse_from_rfc3339(&session.expires_at)
        .map_err(|_| IdentityError::Unauthorized)?;
    if expires <= chrono::Utc::now() {
        return Err(IdentityError::Unauthorized);
    }

    Ok(AuthUser {
        user_id: session.user_id,
        email: session.email,
    })
}

/// Derives the default role for an account with no profile row from its
/// email domain.
#[must_use]
pub fn default_role_for_email(email: &str) -> UserRole {
    let email = email.to_lowercase();
    if email.ends_with("@police.go.ke") {
        UserRole::Officer
    } else if email.ends_with("@judiciary.go.ke") {
        UserRole::Judiciary
    } else if email.ends_with("@supervisor.go.ke") {
        UserRole::Supervisor
    } else {
        UserRole::Public
    }
}

/// Resolves an authenticated account to its role and station.
///
/// Uses the profile row when one exists; otherwise falls back to the
/// email-domain heuristic with no station.
///
/// # Errors
///
/// Returns [`IdentityError::Database`] if the profile lookup fails.
pub async fn resolve_identity(db: &dyn Database, auth: &AuthUser) -> Result<Identity, IdentityError> {
    match users::get_user_by_id(db, &auth.user_id).await? {
        Some(user) => Ok(Identity {
            user_id: auth.user_id.clone(),
            email: auth.email.clone(),
            role: user.role,
            station_id: user.station_id,
        }),
        None => {
            log::debug!(
                "No profile row for user {}; deriving role from email domain",
                auth.user_id
            );
            Ok(Identity {
                user_id: auth.user_id.clone(),
                email: auth.email.clone(),
                role: default_role_for_email(&auth.email),
                station_id: None,
            })
        }
    }
}
