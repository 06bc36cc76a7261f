//! Route guard
//!
//! Which page a path shows, given whether the user is signed in. Route
//! tables and rendering belong to the UI; only the redirect rules live here.

use std::fmt;

/// Known pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Root,
    Login,
    Register,
    Todos,
    /// Any other path
    Unknown,
}

impl Route {
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        match path.trim_end_matches('/') {
            "" => Route::Root,
            "/login" => Route::Login,
            "/register" => Route::Register,
            "/todos" => Route::Todos,
            _ => Route::Unknown,
        }
    }

    pub const fn path(&self) -> &'static str {
        match self {
            Route::Root => "/",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Todos => "/todos",
            Route::Unknown => "*",
        }
    }

    /// Pages that need a signed-in user
    pub const fn is_protected(&self) -> bool {
        matches!(self, Route::Root | Route::Todos)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Outcome of the guard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Render(Route),
    Redirect(Route),
}

/// Apply the redirect rules
///
/// Signed out: `/` and `/todos` go to `/login`. Signed in: `/`, `/login`
/// and `/register` go to `/todos`. Unknown paths go to the home page of
/// the current state.
pub fn guard(route: Route, authenticated: bool) -> Navigation {
    match (route, authenticated) {
        (Route::Unknown, true) | (Route::Root, true) => Navigation::Redirect(Route::Todos),
        (Route::Unknown, false) => Navigation::Redirect(Route::Login),
        (Route::Login | Route::Register, true) => Navigation::Redirect(Route::Todos),
        (r, false) if r.is_protected() => Navigation::Redirect(Route::Login),
        (r, _) => Navigation::Render(r),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(Route::parse("/"), Route::Root);
        assert_eq!(Route::parse(""), Route::Root);
        assert_eq!(Route::parse("/todos/"), Route::Todos);
        assert_eq!(Route::parse("/login?next=/todos"), Route::Login);
        assert_eq!(Route::parse("/register#top"), Route::Register);
        assert_eq!(Route::parse("/admin"), Route::Unknown);
    }

    #[test]
    fn test_signed_out() {
        assert_eq!(guard(Route::Root, false), Navigation::Redirect(Route::Login));
        assert_eq!(guard(Route::Todos, false), Navigation::Redirect(Route::Login));
        assert_eq!(guard(Route::Login, false), Navigation::Render(Route::Login));
        assert_eq!(guard(Route::Register, false), Navigation::Render(Route::Register));
        assert_eq!(guard(Route::Unknown, false), Navigation::Redirect(Route::Login));
    }

    #[test]
    fn test_signed_in() {
        assert_eq!(guard(Route::Root, true), Navigation::Redirect(Route::Todos));
        assert_eq!(guard(Route::Todos, true), Navigation::Render(Route::Todos));
        assert_eq!(guard(Route::Login, true), Navigation::Redirect(Route::Todos));
        assert_eq!(guard(Route::Register, true), Navigation::Redirect(Route::Todos));
        assert_eq!(guard(Route::Unknown, true), Navigation::Redirect(Route::Todos));
    }
}
