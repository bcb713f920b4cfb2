use crate::error::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017";
const DEFAULT_MONGODB_DATABASE: &str = "campaigns";

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub mongodb_uri: String,
    pub mongodb_database: String,
}

impl Config {
    pub fn from_env() -> Result<Config, Error> {
        Config::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from whatever `lookup` returns for each variable.
    /// `PORT` is required, everything else has a default.
    pub fn from_lookup<F>(lookup: F) -> Result<Config, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup("PORT").ok_or(Error::InvalidConfig {
            key: "PORT",
            reason: "is not set".to_string(),
        })?;
        let port = port.trim().parse::<u16>().map_err(|err| Error::InvalidConfig {
            key: "PORT",
            reason: format!("{:?} is not a valid port: {}", port, err),
        })?;

        Ok(Config {
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            mongodb_uri: lookup("MONGODB_URI").unwrap_or_else(|| DEFAULT_MONGODB_URI.to_string()),
            mongodb_database: lookup("MONGODB_DATABASE")
                .unwrap_or_else(|| DEFAULT_MONGODB_DATABASE.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn port_is_required() {
        let result = Config::from_lookup(lookup(&[]));

        assert_eq!(
            result.unwrap_err(),
            Error::InvalidConfig {
                key: "PORT",
                reason: "is not set".to_string(),
            }
        );
    }

    #[test]
    fn port_must_be_a_number() {
        let result = Config::from_lookup(lookup(&[("PORT", "eighty")]));

        assert!(matches!(
            result,
            Err(Error::InvalidConfig { key: "PORT", .. })
        ));
    }

    #[test]
    fn defaults_fill_in_the_rest() {
        let config = Config::from_lookup(lookup(&[("PORT", "3000")])).unwrap();

        assert_eq!(
            config,
            Config {
                host: "0.0.0.0".to_string(),
                port: 3000,
                mongodb_uri: "mongodb://localhost:27017".to_string(),
                mongodb_database: "campaigns".to_string(),
            }
        );
    }

    #[test]
    fn overrides_are_used() {
        let config = Config::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("HOST", "127.0.0.1"),
            ("MONGODB_URI", "mongodb://db:27017"),
            ("MONGODB_DATABASE", "marketing"),
        ]))
        .unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.mongodb_uri, "mongodb://db:27017");
        assert_eq!(config.mongodb_database, "marketing");
    }
}
