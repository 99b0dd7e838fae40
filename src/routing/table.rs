//! Static route table with per-route access requirements.
//!
//! The table is validated once at construction: paths are absolute and
//! unique, and the login and forbidden redirect targets exist and are public.
//! After that it is immutable and only answers lookups by path.

#[cfg(test)]
#[path = "table_test.rs"]
mod table_test;

use crate::config::GateConfig;

/// Access requirements drawn from the closed set
/// `{requires_sign_in, requires_elevated_privilege}`.
///
/// Elevated privilege implies sign-in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Requirements {
    sign_in: bool,
    elevated: bool,
}

impl Requirements {
    pub const PUBLIC: Self = Self::new(false, false);
    pub const SIGNED_IN: Self = Self::new(true, false);
    pub const ELEVATED: Self = Self::new(true, true);

    #[must_use]
    pub const fn new(requires_sign_in: bool, requires_elevated_privilege: bool) -> Self {
        Self { sign_in: requires_sign_in || requires_elevated_privilege, elevated: requires_elevated_privilege }
    }

    #[must_use]
    pub const fn requires_sign_in(self) -> bool {
        self.sign_in
    }

    #[must_use]
    pub const fn requires_elevated_privilege(self) -> bool {
        self.elevated
    }

    #[must_use]
    pub const fn is_public(self) -> bool {
        !self.sign_in && !self.elevated
    }
}

/// Views the application can render.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViewId {
    Home,
    Login,
    Forbidden,
    Profile,
    AdminUsers,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub path: String,
    pub name: String,
    pub view: ViewId,
    pub requirements: Requirements,
}

impl RouteDescriptor {
    pub fn new(path: impl Into<String>, name: impl Into<String>, view: ViewId, requirements: Requirements) -> Self {
        Self { path: path.into(), name: name.into(), view, requirements }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RouteTableError {
    #[error("route path {0:?} must start with '/'")]
    RelativePath(String),

    #[error("duplicate route path {0:?}")]
    DuplicatePath(String),

    #[error("duplicate route name {0:?}")]
    DuplicateName(String),

    #[error("redirect target {0:?} has no route")]
    MissingRedirectTarget(String),

    #[error("redirect target {0:?} must not carry access requirements")]
    GuardedRedirectTarget(String),
}

#[derive(Clone, Debug)]
pub struct RouteTable {
    routes: Vec<RouteDescriptor>,
    login: usize,
    forbidden: usize,
}

impl RouteTable {
    /// Validate `routes` and resolve the two redirect targets.
    ///
    /// # Errors
    ///
    /// Returns [`RouteTableError`] for relative or duplicate paths, duplicate
    /// names, and missing or guarded redirect targets.
    pub fn new(
        mut routes: Vec<RouteDescriptor>,
        login_path: &str,
        forbidden_path: &str,
    ) -> Result<Self, RouteTableError> {
        for route in &mut routes {
            if !route.path.starts_with('/') {
                return Err(RouteTableError::RelativePath(route.path.clone()));
            }
            route.path = normalize_path(&route.path).to_owned();
        }

        for (i, route) in routes.iter().enumerate() {
            let earlier = &routes[..i];
            if earlier.iter().any(|r| r.path == route.path) {
                return Err(RouteTableError::DuplicatePath(route.path.clone()));
            }
            if earlier.iter().any(|r| r.name == route.name) {
                return Err(RouteTableError::DuplicateName(route.name.clone()));
            }
        }

        let login = redirect_target(&routes, login_path)?;
        let forbidden = redirect_target(&routes, forbidden_path)?;
        Ok(Self { routes, login, forbidden })
    }

    /// The application's route set, with redirect targets taken from config.
    ///
    /// # Errors
    ///
    /// See [`RouteTable::new`].
    pub fn standard(config: &GateConfig) -> Result<Self, RouteTableError> {
        Self::new(
            vec![
                RouteDescriptor::new("/", "home", ViewId::Home, Requirements::PUBLIC),
                RouteDescriptor::new(config.login_path.as_str(), "login", ViewId::Login, Requirements::PUBLIC),
                RouteDescriptor::new(config.forbidden_path.as_str(), "forbidden", ViewId::Forbidden, Requirements::PUBLIC),
                RouteDescriptor::new("/profile", "profile", ViewId::Profile, Requirements::SIGNED_IN),
                RouteDescriptor::new("/admin-users", "admin-users", ViewId::AdminUsers, Requirements::ELEVATED),
            ],
            &config.login_path,
            &config.forbidden_path,
        )
    }

    /// Find the route for `path`, ignoring query, fragment, and a trailing `/`.
    pub fn lookup(&self, path: &str) -> Option<&RouteDescriptor> {
        let path = normalize_path(path);
        self.routes.iter().find(|r| r.path == path)
    }

    pub fn login(&self) -> &RouteDescriptor {
        &self.routes[self.login]
    }

    pub fn forbidden(&self) -> &RouteDescriptor {
        &self.routes[self.forbidden]
    }
}

fn redirect_target(routes: &[RouteDescriptor], path: &str) -> Result<usize, RouteTableError> {
    let path = normalize_path(path);
    let index = routes
        .iter()
        .position(|r| r.path == path)
        .ok_or_else(|| RouteTableError::MissingRedirectTarget(path.to_owned()))?;
    if !routes[index].requirements.is_public() {
        return Err(RouteTableError::GuardedRedirectTarget(path.to_owned()));
    }
    Ok(index)
}

/// Strip query string, fragment, and trailing slashes (except for `/`).
pub fn normalize_path(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let trimmed = path[..end].trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}
