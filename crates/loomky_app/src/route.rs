//! Page routes

use crate::error::{LoomkyError, Result};
use std::fmt;

/// The marketing site's pages
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Route {
    #[default]
    Home,
    Owners,
    Features,
    Pricing,
    Contact,
}

impl Route {
    /// Navigation order used by the header
    pub const ALL: [Route; 5] = [
        Route::Home,
        Route::Owners,
        Route::Features,
        Route::Pricing,
        Route::Contact,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Owners => "/owners",
            Route::Features => "/features",
            Route::Pricing => "/pricing",
            Route::Contact => "/contact",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::Owners => "Owners",
            Route::Features => "Features",
            Route::Pricing => "Pricing",
            Route::Contact => "Contact",
        }
    }

    /// Resolve a path, ignoring a trailing slash
    pub fn from_path(path: &str) -> Result<Self> {
        let trimmed = match path.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        Route::ALL
            .into_iter()
            .find(|r| r.path() == trimmed)
            .ok_or_else(|| LoomkyError::UnknownRoute(path.to_string()))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_round_trip() {
        for route in Route::ALL {
            assert_eq!(Route::from_path(route.path()).unwrap(), route);
        }
    }

    #[test]
    fn test_trailing_slash() {
        assert_eq!(Route::from_path("/pricing/").unwrap(), Route::Pricing);
        assert_eq!(Route::from_path("").unwrap(), Route::Home);
    }

    #[test]
    fn test_unknown_path() {
        assert!(matches!(
            Route::from_path("/blog"),
            Err(LoomkyError::UnknownRoute(p)) if p == "/blog"
        ));
    }
}
