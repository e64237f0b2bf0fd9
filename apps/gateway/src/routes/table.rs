//! Static route table mapping public paths to backend sub-paths.
//!
//! Patterns are `/`-separated segments where `:name` captures exactly one
//! non-empty segment. The table is insertion ordered and the first
//! descriptor matching both method and path wins.

use actix_web::http::Method;

use crate::config::BackendId;
use crate::error::AppError;

/// One public route and where it is forwarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub method: Method,
    /// Public path pattern, e.g. `/api/goals/:id`
    pub pattern: &'static str,
    pub backend: BackendId,
    /// Backend path template; may reuse the pattern's placeholders
    pub upstream: &'static str,
    pub requires_identity: bool,
    /// Roles permitted on this route; empty means no restriction
    pub allowed_roles: &'static [&'static str],
}

impl RouteDescriptor {
    /// A route forwarded without verifying the caller.
    pub fn public(
        method: Method,
        pattern: &'static str,
        backend: BackendId,
        upstream: &'static str,
    ) -> Self {
        Self {
            method,
            pattern,
            backend,
            upstream,
            requires_identity: false,
            allowed_roles: &[],
        }
    }

    /// A route that requires a verified identity.
    pub fn protected(
        method: Method,
        pattern: &'static str,
        backend: BackendId,
        upstream: &'static str,
    ) -> Self {
        Self {
            requires_identity: true,
            ..Self::public(method, pattern, backend, upstream)
        }
    }

    /// Restrict a protected route to the given roles.
    pub fn with_roles(mut self, roles: &'static [&'static str]) -> Self {
        self.requires_identity = true;
        self.allowed_roles = roles;
        self
    }
}

/// Result of a successful resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    pub route: &'a RouteDescriptor,
    /// Captured path parameters, in pattern order
    pub params: Vec<(&'static str, String)>,
    /// Backend path with parameters substituted
    pub upstream_path: String,
}

#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<RouteDescriptor>,
}

impl RouteTable {
    pub fn new(routes: Vec<RouteDescriptor>) -> Self {
        Self { routes }
    }

    /// The gateway's public surface.
    pub fn gateway() -> Self {
        use BackendId::{Auth, Goals};

        Self::new(vec![
            // Auth service, public
            RouteDescriptor::public(Method::POST, "/api/auth/register", Auth, "/api/auth/register"),
            RouteDescriptor::public(Method::POST, "/api/auth/login", Auth, "/api/auth/login"),
            RouteDescriptor::public(Method::POST, "/api/auth/refresh", Auth, "/api/auth/refresh"),
            RouteDescriptor::public(
                Method::GET,
                "/api/auth/verify-email/:token",
                Auth,
                "/api/auth/verify-email/:token",
            ),
            RouteDescriptor::public(
                Method::POST,
                "/api/auth/forgot-password",
                Auth,
                "/api/auth/forgot-password",
            ),
            RouteDescriptor::public(
                Method::POST,
                "/api/auth/reset-password/:token",
                Auth,
                "/api/auth/reset-password/:token",
            ),
            // Auth service, protected
            RouteDescriptor::protected(Method::GET, "/api/auth/me", Auth, "/api/auth/me"),
            RouteDescriptor::protected(Method::POST, "/api/auth/logout", Auth, "/api/auth/logout"),
            // Goals service; health must precede `/:id`
            RouteDescriptor::protected(Method::GET, "/api/goals/health", Goals, "/health"),
            RouteDescriptor::protected(Method::GET, "/api/goals", Goals, "/api/goals"),
            RouteDescriptor::protected(Method::POST, "/api/goals", Goals, "/api/goals"),
            RouteDescriptor::protected(Method::GET, "/api/goals/:id", Goals, "/api/goals/:id"),
            RouteDescriptor::protected(Method::PATCH, "/api/goals/:id", Goals, "/api/goals/:id"),
            RouteDescriptor::protected(Method::DELETE, "/api/goals/:id", Goals, "/api/goals/:id"),
            RouteDescriptor::protected(
                Method::PATCH,
                "/api/goals/:id/complete",
                Goals,
                "/api/goals/:id/complete",
            ),
        ])
    }

    pub fn routes(&self) -> &[RouteDescriptor] {
        &self.routes
    }

    /// Find the first route matching `method` and `path`.
    pub fn resolve(&self, method: &Method, path: &str) -> Result<RouteMatch<'_>, AppError> {
        for route in self.routes.iter().filter(|r| &r.method == method) {
            if let Some(params) = match_pattern(route.pattern, path) {
                let upstream_path = render_upstream(route.upstream, &params);
                return Ok(RouteMatch {
                    route,
                    params: params
                        .into_iter()
                        .map(|(name, value)| (name, value.to_string()))
                        .collect(),
                    upstream_path,
                });
            }
        }

        Err(AppError::not_found(format!("Route not found: {method} {path}")))
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    let path = path.strip_prefix('/').unwrap_or(path);
    // A single trailing slash is not significant.
    let path = path.strip_suffix('/').unwrap_or(path);
    path.split('/')
}

fn match_pattern<'p>(pattern: &'static str, path: &'p str) -> Option<Vec<(&'static str, &'p str)>> {
    let mut params = Vec::new();
    let mut actual = segments(path);

    for expected in segments(pattern) {
        let segment = actual.next()?;
        match expected.strip_prefix(':') {
            Some(name) if !segment.is_empty() && !is_dot_segment(segment) => {
                params.push((name, segment))
            }
            Some(_) => return None,
            None if expected == segment => {}
            None => return None,
        }
    }

    if actual.next().is_some() {
        return None;
    }
    Some(params)
}

/// `.` or `..`, raw or percent-encoded. The outbound URL parser would
/// collapse these and move the request off the route's upstream template.
fn is_dot_segment(segment: &str) -> bool {
    let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
    decoded == "." || decoded == ".."
}

fn render_upstream(template: &str, params: &[(&'static str, &str)]) -> String {
    template
        .split('/')
        .map(|segment| match segment.strip_prefix(':') {
            Some(name) => params
                .iter()
                .find(|(param, _)| *param == name)
                .map(|(_, value)| *value)
                .unwrap_or(segment),
            None => segment,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use proptest::prelude::*;

    use super::*;

    fn resolve<'a>(table: &'a RouteTable, method: Method, path: &str) -> RouteMatch<'a> {
        table.resolve(&method, path).unwrap()
    }

    #[test]
    fn test_static_routes() {
        let table = RouteTable::gateway();

        let login = resolve(&table, Method::POST, "/api/auth/login");
        assert_eq!(login.route.backend, BackendId::Auth);
        assert_eq!(login.upstream_path, "/api/auth/login");
        assert!(!login.route.requires_identity);

        let me = resolve(&table, Method::GET, "/api/auth/me");
        assert!(me.route.requires_identity);
    }

    #[test]
    fn test_parameter_substitution() {
        let table = RouteTable::gateway();

        let goal = resolve(&table, Method::PATCH, "/api/goals/7/complete");
        assert_eq!(goal.upstream_path, "/api/goals/7/complete");
        assert_eq!(goal.params, vec![("id", "7".to_string())]);

        let reset = resolve(&table, Method::POST, "/api/auth/reset-password/abc.def");
        assert_eq!(reset.upstream_path, "/api/auth/reset-password/abc.def");
        assert!(!reset.route.requires_identity);
    }

    #[test]
    fn test_first_match_wins() {
        let table = RouteTable::gateway();

        let health = resolve(&table, Method::GET, "/api/goals/health");
        assert_eq!(health.upstream_path, "/health");
        assert!(health.params.is_empty());

        let custom = RouteTable::new(vec![
            RouteDescriptor::public(Method::GET, "/x/:a", BackendId::Auth, "/first/:a"),
            RouteDescriptor::public(Method::GET, "/x/:b", BackendId::Goals, "/second/:b"),
        ]);
        let matched = resolve(&custom, Method::GET, "/x/1");
        assert_eq!(matched.upstream_path, "/first/1");
        assert_eq!(matched.route.backend, BackendId::Auth);
    }

    #[test]
    fn test_method_is_part_of_the_match() {
        let table = RouteTable::gateway();

        assert_eq!(
            resolve(&table, Method::DELETE, "/api/goals/9").route.method,
            Method::DELETE
        );
        let err = table.resolve(&Method::PUT, "/api/goals/9").unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.public_message(), "Route not found: PUT /api/goals/9");
    }

    #[test]
    fn test_unmatched_paths() {
        let table = RouteTable::gateway();
        for path in [
            "/",
            "/api",
            "/api/goals/7/complete/extra",
            "/api/goals//complete",
            "/api/auth/verify-email/",
            "/health",
        ] {
            let err = table.resolve(&Method::GET, path).unwrap_err();
            assert_eq!(err.status(), StatusCode::NOT_FOUND, "path {path}");
        }
    }

    #[test]
    fn test_dot_segments_are_not_parameters() {
        let table = RouteTable::gateway();
        for (method, path) in [
            (Method::PATCH, "/api/goals/../complete"),
            (Method::PATCH, "/api/goals/%2e%2e/complete"),
            (Method::PATCH, "/api/goals/%2E./complete"),
            (Method::GET, "/api/goals/."),
            (Method::GET, "/api/auth/verify-email/.."),
            (Method::POST, "/api/auth/reset-password/%2e"),
        ] {
            let err = table.resolve(&method, path).unwrap_err();
            assert_eq!(err.status(), StatusCode::NOT_FOUND, "{method} {path}");
        }

        // Dots inside a value are fine
        assert_eq!(
            resolve(&table, Method::GET, "/api/goals/v1..2").upstream_path,
            "/api/goals/v1..2"
        );
    }

    #[test]
    fn test_trailing_slash_is_ignored() {
        let table = RouteTable::gateway();
        assert_eq!(
            resolve(&table, Method::GET, "/api/goals/").upstream_path,
            "/api/goals"
        );
    }

    #[test]
    fn test_role_restriction_implies_identity() {
        let route = RouteDescriptor::public(Method::GET, "/a", BackendId::Auth, "/a")
            .with_roles(&["admin"]);
        assert!(route.requires_identity);
        assert_eq!(route.allowed_roles, &["admin"]);
    }

    #[test]
    fn test_gateway_table_roles_unrestricted() {
        assert!(RouteTable::gateway()
            .routes()
            .iter()
            .all(|r| r.allowed_roles.is_empty()));
    }

    proptest! {
        #[test]
        fn prop_goal_id_is_substituted(id in "[A-Za-z0-9_.~%-]{1,24}") {
            prop_assume!(id != "health");
            prop_assume!(!is_dot_segment(&id));
            let table = RouteTable::gateway();
            let path = format!("/api/goals/{id}");
            let matched = table.resolve(&Method::GET, &path).unwrap();
            prop_assert_eq!(matched.upstream_path, path.clone());
            prop_assert_eq!(matched.route.backend, BackendId::Goals);
        }
    }
}
