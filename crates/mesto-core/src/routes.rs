//! Navigation targets for the Mesto client.

/// Views the client can show.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Route {
    /// Gallery (protected).
    #[default]
    Home,
    /// Sign-in form.
    SignIn,
    /// Registration form.
    SignUp,
    /// Unknown path.
    NotFound,
}

impl Route {
    /// Path the route is served at.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::SignIn => "/signin",
            Self::SignUp => "/signup",
            Self::NotFound => "/404",
        }
    }

    /// Parse a path, falling back to [`Route::NotFound`].
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Self::Home,
            "/signin" => Self::SignIn,
            "/signup" => Self::SignUp,
            _ => Self::NotFound,
        }
    }

    /// Route actually rendered: the gallery redirects anonymous users to sign-in.
    #[must_use]
    pub const fn resolve(self, logged_in: bool) -> Self {
        match self {
            Self::Home if !logged_in => Self::SignIn,
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Route;

    #[test]
    fn parses_known_paths() {
        assert_eq!(Route::from_path("/"), Route::Home);
        assert_eq!(Route::from_path(""), Route::Home);
        assert_eq!(Route::from_path("/signin"), Route::SignIn);
        assert_eq!(Route::from_path("/signup/"), Route::SignUp);
        assert_eq!(Route::from_path("/cards/42"), Route::NotFound);
    }

    #[test]
    fn home_is_protected() {
        assert_eq!(Route::Home.resolve(false), Route::SignIn);
        assert_eq!(Route::Home.resolve(true), Route::Home);
        assert_eq!(Route::SignUp.resolve(false), Route::SignUp);
    }

    #[test]
    fn paths_round_trip() {
        for route in [Route::Home, Route::SignIn, Route::SignUp] {
            assert_eq!(Route::from_path(route.path()), route);
        }
    }
}
