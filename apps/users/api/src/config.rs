use core_config::{
    ConfigError, FromEnv, env_optional, env_parse_optional, env_required, server::ServerConfig,
};
use domain_users::{CreateUser, TokenConfig};

pub use core_config::Environment;

const DEFAULT_ADMIN_AGE: i64 = 30;

/// Administrator created at startup
#[derive(Clone, Debug)]
pub struct AdminSeed {
    pub name: String,
    pub password: String,
    pub age: i64,
    pub email: Option<String>,
}

impl AdminSeed {
    /// `None` unless `ADMIN_NAME` is set; `ADMIN_PASSWORD` is then required.
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(name) = env_optional("ADMIN_NAME") else {
            return Ok(None);
        };

        Ok(Some(Self {
            name,
            password: env_required("ADMIN_PASSWORD")?,
            age: env_parse_optional("ADMIN_AGE")?.unwrap_or(DEFAULT_ADMIN_AGE),
            email: env_optional("ADMIN_EMAIL"),
        }))
    }
}

impl From<AdminSeed> for CreateUser {
    fn from(seed: AdminSeed) -> Self {
        CreateUser {
            name: seed.name,
            age: seed.age,
            email: seed.email,
            password: seed.password,
        }
    }
}

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub server: ServerConfig,
    pub environment: Environment,
    pub token: TokenConfig,
    pub admin: Option<AdminSeed>,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?; // HOST=0.0.0.0, PORT=3000 unless set
        let token = TokenConfig::from_env()?; // Required in production
        let admin = AdminSeed::from_env()?;

        Ok(Self {
            server,
            environment,
            token,
            admin,
        })
    }
}
