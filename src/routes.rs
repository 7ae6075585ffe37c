use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Bills,
    NewBill,
    Dashboard,
}

impl Route {
    pub const ALL: [Route; 4] = [Route::Login, Route::Bills, Route::NewBill, Route::Dashboard];

    /// The path handed to `navigate` for this route.
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/",
            Route::Bills => "#employee/bills",
            Route::NewBill => "#employee/bill/new",
            Route::Dashboard => "#admin/dashboard",
        }
    }

    /// Accepts both the hash form (`#employee/bills`) and the plain-path form
    /// (`/employee/bills`).
    pub fn parse(path: &str) -> Option<Route> {
        let path = path.trim();
        if path.is_empty() || path == "/" || path == "#" {
            return Some(Route::Login);
        }
        let stripped = path
            .strip_prefix('#')
            .or_else(|| path.strip_prefix('/'))
            .unwrap_or(path)
            .trim_end_matches('/');
        Route::ALL
            .into_iter()
            .find(|r| r.path().trim_start_matches(['#', '/']) == stripped && *r != Route::Login)
    }

    pub fn is_protected(&self) -> bool {
        *self != Route::Login
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Route::Login => "Login",
            Route::Bills => "Bills",
            Route::NewBill => "NewBill",
            Route::Dashboard => "Dashboard",
        };
        f.write_str(name)
    }
}

/// What a settled pipeline asks the controller to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Stay,
    Navigate(Route),
}

/// Where the app was opened: a path plus an optional hash fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub pathname: String,
    pub hash: String,
}

impl Location {
    pub fn root() -> Self {
        Self {
            pathname: "/".to_string(),
            hash: String::new(),
        }
    }

    /// Split `"/#employee/bills"` style addresses into path and hash.
    pub fn parse(address: &str) -> Self {
        let address = address.trim();
        match address.find('#') {
            Some(i) => {
                let pathname = &address[..i];
                Self {
                    pathname: if pathname.is_empty() { "/".to_string() } else { pathname.to_string() },
                    hash: address[i..].to_string(),
                }
            }
            None => Self {
                pathname: if address.is_empty() { "/".to_string() } else { address.to_string() },
                hash: String::new(),
            },
        }
    }

    pub fn is_root(&self) -> bool {
        self.pathname == "/" && self.hash.is_empty()
    }

    /// The address that selects a screen: the hash when present, else the path.
    pub fn target(&self) -> &str {
        if self.hash.is_empty() {
            &self.pathname
        } else {
            &self.hash
        }
    }
}
