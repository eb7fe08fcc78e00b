use backoffice_core::config::{flag, or_default, required};

/// Admin service configuration loaded from environment variables.
#[derive(Debug)]
pub struct AdminConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// HS256 secret shared with the token issuer.
    pub jwt_secret: String,
    /// TCP port for the HTTP server (default 3120). Env var: `ADMIN_PORT`.
    pub admin_port: u16,
    /// Apply pending migrations on startup. Env var: `RUN_MIGRATIONS`.
    pub run_migrations: bool,
}

impl AdminConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: required("DATABASE_URL"),
            jwt_secret: required("JWT_SECRET"),
            admin_port: or_default("ADMIN_PORT", 3120),
            run_migrations: flag("RUN_MIGRATIONS"),
        }
    }
}
