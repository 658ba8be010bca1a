use anyhow::Result;

pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub user_service: UserServiceConfig,
    pub session: SessionConfig,
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        let server = ServerConfig {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,
        };
        let database = DatabaseConfig {
            host: std::env::var("DATABASE_HOST")?,
            port: std::env::var("DATABASE_PORT")?.parse()?,
            username: std::env::var("DATABASE_USERNAME")?,
            password: std::env::var("DATABASE_PASSWORD")?,
            database: std::env::var("DATABASE_NAME")?,
        };
        let redis = RedisConfig {
            host: std::env::var("REDIS_HOST")?,
            port: std::env::var("REDIS_PORT")?.parse()?,
        };
        let user_service = UserServiceConfig {
            base_url: std::env::var("USER_SERVICE_URL")?,
        };
        let session = SessionConfig {
            guest_state_ttl: std::env::var("GUEST_STATE_TTL")
                .unwrap_or_else(|_| "86400".into())
                .parse()?,
        };
        Ok(Self {
            server,
            database,
            redis,
            user_service,
            session,
        })
    }
}

pub struct ServerConfig {
    pub port: u16,
}

pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

pub struct RedisConfig {
    pub host: String,
    pub port: u16,
}

pub struct UserServiceConfig {
    pub base_url: String,
}

pub struct SessionConfig {
    // seconds a guest checkout state survives in Redis
    pub guest_state_ttl: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_falls_back_to_the_default_port_and_ttl() {
        std::env::remove_var("PORT");
        std::env::remove_var("GUEST_STATE_TTL");
        std::env::set_var("DATABASE_HOST", "localhost");
        std::env::set_var("DATABASE_PORT", "5432");
        std::env::set_var("DATABASE_USERNAME", "app");
        std::env::set_var("DATABASE_PASSWORD", "passwd");
        std::env::set_var("DATABASE_NAME", "app");
        std::env::set_var("REDIS_HOST", "localhost");
        std::env::set_var("REDIS_PORT", "6379");
        std::env::set_var("USER_SERVICE_URL", "http://localhost:8081");

        let config = AppConfig::new().unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.session.guest_state_ttl, 86_400);
    }
}
