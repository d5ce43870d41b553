//! Declarative route table.
//!
//! Every endpoint is listed once here with its access rule. The router
//! registers a handler per path, the access middleware enforces the rule of
//! the matched entry, and the not-found fallback lists the table.

use axum::http::Method;
use gamefest_core::auth::roles::{Role, TEAM_ADMINS, USER_MANAGERS, USER_VIEWERS};

pub const HEALTH: &str = "/api/health";
pub const ADMIN_LOGIN: &str = "/api/admin/login";
pub const ADMIN_LOGOUT: &str = "/api/admin/logout";
pub const ADMIN_ME: &str = "/api/admin/me";
pub const TEAMS: &str = "/api/teams";
pub const TEAMS_CHECK: &str = "/api/teams/check/{teamName}";
pub const TEAMS_STATS: &str = "/api/teams/stats";
pub const GAME_SCORES: &str = "/api/game-scores";
pub const LEADERBOARD: &str = "/api/game-scores/leaderboard/{gameType}";
pub const ADMIN_TEAMS: &str = "/api/admin/teams";
pub const ADMIN_TEAM: &str = "/api/admin/teams/{id}";
pub const ADMIN_SCORES: &str = "/api/admin/scores";
pub const ADMIN_SCORE: &str = "/api/admin/scores/{id}";
pub const ADMIN_USERS: &str = "/api/admin/users";
pub const ADMIN_USER: &str = "/api/admin/users/{id}";
pub const ADMIN_FILES: &str = "/api/admin/files";
pub const ADMIN_FILE: &str = "/api/admin/files/{id}";

/// Who may call an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    /// Any valid session of an active account.
    Authenticated,
    /// A valid session whose role is in the allowlist.
    Roles(&'static [Role]),
}

/// One row of the route table.
#[derive(Debug)]
pub struct RouteSpec {
    pub method: Method,
    pub path: &'static str,
    pub access: Access,
}

impl RouteSpec {
    /// `"METHOD /path"` as shown in the not-found listing.
    pub fn endpoint(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

macro_rules! route {
    ($method:ident, $path:expr, $access:expr) => {
        RouteSpec {
            method: Method::$method,
            path: $path,
            access: $access,
        }
    };
}

pub static ROUTES: &[RouteSpec] = &[
    route!(GET, HEALTH, Access::Public),
    route!(POST, ADMIN_LOGIN, Access::Public),
    route!(POST, ADMIN_LOGOUT, Access::Public),
    route!(GET, ADMIN_ME, Access::Authenticated),
    route!(POST, TEAMS, Access::Public),
    route!(GET, TEAMS_CHECK, Access::Public),
    route!(GET, TEAMS_STATS, Access::Public),
    route!(POST, GAME_SCORES, Access::Public),
    route!(GET, LEADERBOARD, Access::Public),
    route!(GET, ADMIN_TEAMS, Access::Roles(TEAM_ADMINS)),
    route!(DELETE, ADMIN_TEAM, Access::Roles(TEAM_ADMINS)),
    route!(GET, ADMIN_SCORES, Access::Roles(TEAM_ADMINS)),
    route!(DELETE, ADMIN_SCORE, Access::Roles(TEAM_ADMINS)),
    route!(GET, ADMIN_USERS, Access::Roles(USER_VIEWERS)),
    route!(POST, ADMIN_USERS, Access::Roles(USER_MANAGERS)),
    route!(PATCH, ADMIN_USER, Access::Roles(USER_MANAGERS)),
    route!(DELETE, ADMIN_USER, Access::Roles(USER_MANAGERS)),
    route!(GET, ADMIN_FILES, Access::Roles(TEAM_ADMINS)),
    route!(GET, ADMIN_FILE, Access::Roles(TEAM_ADMINS)),
];

/// Find the table entry for a matched route pattern.
pub fn find(method: &Method, path: &str) -> Option<&'static RouteSpec> {
    ROUTES.iter().find(|r| r.method == *method && r.path == path)
}

/// Access rule for a matched route pattern; unknown patterns are public.
pub fn access_for(method: &Method, path: &str) -> Access {
    find(method, path).map_or(Access::Public, |r| r.access)
}

/// All endpoints as `"METHOD /path"` strings.
pub fn endpoints() -> Vec<String> {
    ROUTES.iter().map(RouteSpec::endpoint).collect()
}
