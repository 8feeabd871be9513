/// Client-side route table and navigation guard
///
/// Each navigation is evaluated exactly once, with no intermediate states:
/// public routes pass, everything else requires a locally stored token, and
/// an unauthenticated hit on a protected route redirects to the login view.
///
/// The guard deliberately does NOT inspect the token's expiry. An
/// expired-but-present token passes here and fails at the first API call,
/// at which point the session is cleared (see `session`).

/// The application's routes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Landing page listing all contacts
    Home,

    /// Contact creation form
    CreateContact,

    /// Contact edit form for an existing record
    EditContact(i32),

    /// Read-only contact detail view
    ContactDetails(i32),

    /// Login form
    Login,
}

impl Route {
    /// Parses a location path into a route
    ///
    /// Returns `None` for paths outside the route table (the SPA shell
    /// decides what to do with those).
    pub fn parse(path: &str) -> Option<Route> {
        let mut segments = path.trim_matches('/').split('/');

        match (segments.next(), segments.next(), segments.next()) {
            (Some(""), None, _) => Some(Route::Home),
            (Some("create"), None, _) => Some(Route::CreateContact),
            (Some("login"), None, _) => Some(Route::Login),
            (Some("edit"), Some(id), None) => id.parse().ok().map(Route::EditContact),
            (Some("contact"), Some(id), None) => id.parse().ok().map(Route::ContactDetails),
            _ => None,
        }
    }

    /// Renders the route back into its location path
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::CreateContact => "/create".to_string(),
            Route::EditContact(id) => format!("/edit/{}", id),
            Route::ContactDetails(id) => format!("/contact/{}", id),
            Route::Login => "/login".to_string(),
        }
    }

    /// Whether the route is reachable without a stored token
    pub fn is_public(&self) -> bool {
        matches!(
            self,
            Route::Home | Route::ContactDetails(_) | Route::Login
        )
    }
}

/// Outcome of evaluating one navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Proceed to the requested route
    Proceed(Route),

    /// Redirect to the login view
    RedirectToLogin,
}

/// Evaluates a navigation against the guard
///
/// `has_token` is the only input from session state: presence of a locally
/// stored token, nothing more.
pub fn evaluate(target: Route, has_token: bool) -> Navigation {
    if target.is_public() || has_token {
        Navigation::Proceed(target)
    } else {
        Navigation::RedirectToLogin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_routes() {
        assert_eq!(Route::parse("/"), Some(Route::Home));
        assert_eq!(Route::parse("/create"), Some(Route::CreateContact));
        assert_eq!(Route::parse("/login"), Some(Route::Login));
        assert_eq!(Route::parse("/edit/7"), Some(Route::EditContact(7)));
        assert_eq!(Route::parse("/contact/12"), Some(Route::ContactDetails(12)));
    }

    #[test]
    fn test_parse_rejects_unknown_paths() {
        assert_eq!(Route::parse("/nope"), None);
        assert_eq!(Route::parse("/edit"), None);
        assert_eq!(Route::parse("/edit/abc"), None);
        assert_eq!(Route::parse("/contact/1/extra"), None);
    }

    #[test]
    fn test_path_roundtrip() {
        let routes = [
            Route::Home,
            Route::CreateContact,
            Route::EditContact(3),
            Route::ContactDetails(9),
            Route::Login,
        ];

        for route in routes {
            assert_eq!(Route::parse(&route.path()), Some(route));
        }
    }

    #[test]
    fn test_public_routes_bypass_guard() {
        for route in [Route::Home, Route::ContactDetails(1), Route::Login] {
            assert_eq!(
                evaluate(route.clone(), false),
                Navigation::Proceed(route),
                "public routes must not require a token"
            );
        }
    }

    #[test]
    fn test_protected_routes_redirect_without_token() {
        for route in [Route::CreateContact, Route::EditContact(1)] {
            assert_eq!(evaluate(route, false), Navigation::RedirectToLogin);
        }
    }

    #[test]
    fn test_protected_routes_pass_with_token() {
        assert_eq!(
            evaluate(Route::CreateContact, true),
            Navigation::Proceed(Route::CreateContact)
        );
        assert_eq!(
            evaluate(Route::EditContact(4), true),
            Navigation::Proceed(Route::EditContact(4))
        );
    }

    #[test]
    fn test_guard_does_not_judge_token_validity() {
        // The guard only sees "a token is stored". An expired token is the
        // API's problem, not the router's.
        assert_eq!(
            evaluate(Route::CreateContact, true),
            Navigation::Proceed(Route::CreateContact)
        );
    }
}
