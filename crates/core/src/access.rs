//! Route classification and the per-request access decision.
//!
//! Every path is either [`RouteClass::Public`] or [`RouteClass::Protected`].
//! The public set is an explicit allowlist held in one [`RouteTable`]; anything
//! the table does not match is protected, so classification is total.
//!
//! [`AccessGate::decide`] turns a path and the session state into a
//! [`GateDecision`]. It is a pure function: the HTTP layer performs the session
//! lookup and acts on the answer.

use serde::{Deserialize, Serialize};

/// A single allowlist entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoutePattern {
    /// Matches the path exactly.
    Exact(String),
    /// Matches the path itself without its trailing slash, and everything below it.
    Prefix(String),
}

impl RoutePattern {
    /// Parse a pattern from configuration.
    ///
    /// A trailing `*` marks a prefix (`/static/*`), anything else is exact.
    /// Returns `None` for blank input.
    ///
    /// ```
    /// use helpdesk_core::RoutePattern;
    ///
    /// assert_eq!(RoutePattern::parse("/static/*"), Some(RoutePattern::Prefix("/static/".into())));
    /// assert_eq!(RoutePattern::parse(" / "), Some(RoutePattern::Exact("/".into())));
    /// assert_eq!(RoutePattern::parse(""), None);
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        Some(raw.strip_suffix('*').map_or_else(
            || Self::Exact(raw.to_owned()),
            |prefix| Self::Prefix(prefix.to_owned()),
        ))
    }

    /// Whether this pattern matches `path`.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::Exact(exact) => path == exact,
            Self::Prefix(prefix) => {
                path.starts_with(prefix.as_str())
                    || prefix.strip_suffix('/').is_some_and(|bare| path == bare)
            }
        }
    }
}

/// Classification of a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteClass {
    /// Reachable without a session.
    Public,
    /// Requires a session.
    Protected,
}

/// The allowlist of public routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    public: Vec<RoutePattern>,
}

impl RouteTable {
    /// Patterns used when no explicit list is configured.
    pub const DEFAULT_PUBLIC: &'static [&'static str] = &[
        "/",
        "/novo-ticket",
        "/static/*",
        "/favicon.ico",
        "/health",
        "/health/ready",
    ];

    /// Create a table from public patterns.
    #[must_use]
    pub const fn new(public: Vec<RoutePattern>) -> Self {
        Self { public }
    }

    /// Build a table from raw pattern strings, skipping blanks.
    #[must_use]
    pub fn from_patterns<'a>(raw: impl IntoIterator<Item = &'a str>) -> Self {
        Self::new(raw.into_iter().filter_map(RoutePattern::parse).collect())
    }

    /// Classify a path. Paths matched by no pattern are protected.
    #[must_use]
    pub fn classify(&self, path: &str) -> RouteClass {
        if self.public.iter().any(|pattern| pattern.matches(path)) {
            RouteClass::Public
        } else {
            RouteClass::Protected
        }
    }

    /// The configured public patterns.
    #[must_use]
    pub fn public_patterns(&self) -> &[RoutePattern] {
        &self.public
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::from_patterns(Self::DEFAULT_PUBLIC.iter().copied())
    }
}

/// Whether the request carries an authenticated session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    Present,
    Absent,
}

impl SessionState {
    /// Convenience for `Option`-shaped lookups.
    #[must_use]
    pub const fn from_present(present: bool) -> Self {
        if present { Self::Present } else { Self::Absent }
    }
}

/// What the gate tells the HTTP layer to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateDecision {
    /// Let the request through unchanged.
    Pass,
    /// Send the client to the login page.
    RedirectToLogin,
    /// Send the client to the dashboard.
    RedirectToDashboard,
}

/// Well-known destinations the gate and the admin guard redirect to.
///
/// The router mounts its login, dashboard and unauthorized pages at these
/// paths, so redirects and routes cannot drift apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatePaths {
    pub login: String,
    pub dashboard: String,
    /// Where signed-in users without the admin role are sent.
    pub unauthorized: String,
}

impl Default for GatePaths {
    fn default() -> Self {
        Self {
            login: "/login".to_owned(),
            dashboard: "/dashboard".to_owned(),
            unauthorized: "/unauthorized".to_owned(),
        }
    }
}

/// The per-request access policy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessGate {
    routes: RouteTable,
    paths: GatePaths,
}

impl AccessGate {
    /// Create a gate from a route table and redirect destinations.
    #[must_use]
    pub const fn new(routes: RouteTable, paths: GatePaths) -> Self {
        Self { routes, paths }
    }

    /// The route table backing this gate.
    #[must_use]
    pub const fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// The redirect destinations.
    #[must_use]
    pub const fn paths(&self) -> &GatePaths {
        &self.paths
    }

    /// Decide what to do with a request. First matching rule wins:
    ///
    /// 1. public path: pass, whatever the session state;
    /// 2. no session on a protected path: redirect to login (unless the path
    ///    already is the login page);
    /// 3. session on the login page: redirect to the dashboard;
    /// 4. otherwise pass.
    ///
    /// If the login path is itself listed as public, rule 1 shadows rule 3 and
    /// logged-in users see the login page again.
    #[must_use]
    pub fn decide(&self, path: &str, session: SessionState) -> GateDecision {
        let is_login = path == self.paths.login;

        if self.routes.classify(path) == RouteClass::Public {
            return GateDecision::Pass;
        }

        match session {
            SessionState::Absent if !is_login => GateDecision::RedirectToLogin,
            SessionState::Present if is_login => GateDecision::RedirectToDashboard,
            _ => GateDecision::Pass,
        }
    }
}
