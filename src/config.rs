use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub session: SessionConfig,
    pub forms: FormsConfig,
    pub fixtures: FixturesConfig,
    pub log: LogConfig,
    pub templates: TemplatesConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub secure: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FormsConfig {
    pub banner_seconds: u64,  // how long a success banner stays before the form resets
}

#[derive(Debug, Deserialize, Clone)]
pub struct FixturesConfig {
    pub path: Option<String>,  // JSON dataset replacing the built-in seed
    pub bcrypt_cost: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    pub level: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TemplatesConfig {
    pub dir: String,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Self {
            server: ServerConfig { host: "127.0.0.1".into(), port: 0 },
            session: SessionConfig { cookie_name: "session".into(), secure: false },
            forms: FormsConfig { banner_seconds: 3 },
            fixtures: FixturesConfig { path: None, bcrypt_cost: 4 },
            log: LogConfig { level: "debug".into() },
            templates: TemplatesConfig {
                dir: concat!(env!("CARGO_MANIFEST_DIR"), "/templates").into(),
            },
        }
    }
}
