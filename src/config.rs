use std::{collections::HashMap, env};

use crate::{Error, Result};

/// Name of the environment variable used when `--environment` is not given
pub const ENVIRONMENT_VAR: &str = "Environment";

const PRODUCTION_ENVIRONMENT: &str = "prod";
const PRODUCTION_BASE_DOMAIN: &str = "cloudhub.io";
const DEFAULT_BASE_DOMAIN: &str = "msap.io";

/// Source of ambient environment variables
pub trait Env {
    fn var(&self, key: &str) -> Option<String>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl Env for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

impl Env for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub environment: Option<String>,
    pub client_id: Option<String>,
    pub org_id: Option<String>,
    pub provisioning_api_host: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub environment: String,
    pub client_id: Option<String>,
    pub org_id: Option<String>,
    pub provisioning_api_host: String,
}

impl Config {
    // empty values count as not given
    pub fn resolve<E: Env>(overrides: ConfigOverrides, env: &E) -> Result<Config> {
        let environment = non_empty(overrides.environment)
            .or_else(|| non_empty(env.var(ENVIRONMENT_VAR)))
            .ok_or(Error::MissingEnvironment)?;

        let provisioning_api_host = match non_empty(overrides.provisioning_api_host) {
            Some(host) => host,
            None => provisioning_api_host(&environment),
        };
        Ok(Config {
            environment,
            client_id: non_empty(overrides.client_id),
            org_id: non_empty(overrides.org_id),
            provisioning_api_host,
        })
    }
}

pub fn provisioning_api_host(environment: &str) -> String {
    let base_domain = if environment == PRODUCTION_ENVIRONMENT {
        PRODUCTION_BASE_DOMAIN
    } else {
        DEFAULT_BASE_DOMAIN
    };
    format!("https://dias-provisioning-api.{}.{}", environment, base_domain)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_with<'a, T>(vars: T) -> HashMap<String, String>
    where
        T: IntoIterator<Item = (&'a str, &'a str)>,
    {
        vars.into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn overrides(environment: Option<&str>) -> ConfigOverrides {
        ConfigOverrides {
            environment: environment.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn host_for_prod() {
        assert_eq!(
            provisioning_api_host("prod"),
            "https://dias-provisioning-api.prod.cloudhub.io"
        );
    }

    #[test]
    fn host_for_other_environments() {
        assert_eq!(
            provisioning_api_host("sandbox"),
            "https://dias-provisioning-api.sandbox.msap.io"
        );
        assert_eq!(
            provisioning_api_host("qa"),
            "https://dias-provisioning-api.qa.msap.io"
        );
    }

    #[test]
    fn explicit_environment_wins_over_env() {
        let env = env_with([("Environment", "qa")]);
        let config = Config::resolve(overrides(Some("prod")), &env).unwrap();
        assert_eq!(config.environment, "prod");
        assert_eq!(
            config.provisioning_api_host,
            "https://dias-provisioning-api.prod.cloudhub.io"
        );
    }

    #[test]
    fn environment_falls_back_to_env() {
        let env = env_with([("Environment", "sandbox")]);
        let config = Config::resolve(overrides(None), &env).unwrap();
        assert_eq!(config.environment, "sandbox");
        assert_eq!(
            config.provisioning_api_host,
            "https://dias-provisioning-api.sandbox.msap.io"
        );
    }

    #[test]
    fn missing_environment() {
        assert_eq!(
            Config::resolve(overrides(None), &HashMap::new()),
            Err(Error::MissingEnvironment)
        );

        // empty values do not count
        let env = env_with([("Environment", "")]);
        assert_eq!(
            Config::resolve(overrides(Some("")), &env),
            Err(Error::MissingEnvironment)
        );
    }

    #[test]
    fn host_override() {
        let config = Config::resolve(
            ConfigOverrides {
                environment: Some("prod".into()),
                provisioning_api_host: Some("http://localhost:8080".into()),
                ..Default::default()
            },
            &HashMap::new(),
        )
        .unwrap();
        assert_eq!(config.provisioning_api_host, "http://localhost:8080");

        // empty override falls back to derivation
        let config = Config::resolve(
            ConfigOverrides {
                environment: Some("dev".into()),
                provisioning_api_host: Some("".into()),
                ..Default::default()
            },
            &HashMap::new(),
        )
        .unwrap();
        assert_eq!(
            config.provisioning_api_host,
            "https://dias-provisioning-api.dev.msap.io"
        );
    }

    #[test]
    fn ids_are_optional() {
        let config = Config::resolve(
            ConfigOverrides {
                environment: Some("dev".into()),
                client_id: Some("client-1".into()),
                org_id: Some("".into()),
                ..Default::default()
            },
            &HashMap::new(),
        )
        .unwrap();
        assert_eq!(config.client_id.as_deref(), Some("client-1"));
        assert_eq!(config.org_id, None);
    }
}
