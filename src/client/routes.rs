use super::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    Login,
    Register,
}

/// Which screen to show for `path`. The dashboard needs a session and login
/// and register are only for visitors without one. Unknown paths go to login,
/// which in turn sends a logged-in user on to the dashboard.
pub fn resolve_route(path: &str, session: &SessionStore) -> Screen {
    let logged_in = session.is_authenticated();
    let path = path.split(['?', '#']).next().unwrap_or(path);
    let path = match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    };

    match path {
        _ if logged_in => Screen::Dashboard,
        "/register" => Screen::Register,
        _ => Screen::Login,
    }
}
