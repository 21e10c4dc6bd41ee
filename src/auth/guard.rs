use std::collections::HashMap;

use super::{AuthError, Identity};

/// Route data a guard may consult besides the identity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteContext {
    /// Target of a `:username` path parameter, if the route has one
    pub username: Option<String>,
}

impl RouteContext {
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        Self {
            username: params.get("username").cloned(),
        }
    }
}

/// A single pass/fail authorization check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// Any decoded identity, admin or not
    RequireIdentity,
    /// Identity with the admin flag set
    RequireAdmin,
    /// Admin, or the user named by the route's `:username`
    RequireSelfOrAdmin,
}

impl Guard {
    pub fn check(&self, identity: Option<&Identity>, route: &RouteContext) -> Result<(), AuthError> {
        match self {
            Guard::RequireIdentity => identity.map(|_| ()).ok_or(AuthError::NotLoggedIn),
            Guard::RequireAdmin => match identity {
                Some(user) if user.is_admin => Ok(()),
                _ => Err(AuthError::NotAdmin),
            },
            Guard::RequireSelfOrAdmin => {
                let target = route.username.as_deref();
                match identity {
                    Some(user) if user.is_admin => Ok(()),
                    Some(user) if target == Some(user.username.as_str()) => Ok(()),
                    _ => Err(AuthError::NotSelfOrAdmin(target.unwrap_or_default().to_string())),
                }
            }
        }
    }
}

/// Run `guards` in order; the first failure wins
pub fn authorize(guards: &[Guard], identity: Option<&Identity>, route: &RouteContext) -> Result<(), AuthError> {
    guards.iter().try_for_each(|guard| guard.check(identity, route))
}
