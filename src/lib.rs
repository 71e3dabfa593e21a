//! `dias-id-check` checks whether a client ID or an organization ID is already
//! known before provisioning a new one. Unknown IDs print an empty line.
//!
//! ```no_run
//! use dias_id_check::{Config, ConfigOverrides, ProcessEnv, ProvisioningClient, SsmParameterStore};
//!
//! let overrides = ConfigOverrides {
//!     environment: Some("sandbox".into()),
//!     org_id: Some("my-org".into()),
//!     ..Default::default()
//! };
//! let config = Config::resolve(overrides, &ProcessEnv).unwrap();
//! let store = SsmParameterStore::new().unwrap();
//! let api = ProvisioningClient::new(&config.provisioning_api_host).unwrap();
//! dias_id_check::run(&config, &store, &api, &mut std::io::stdout()).unwrap();
//! ```

use std::{fmt, io::Write};

pub mod config;
pub mod parameter_store;
pub mod provisioning;

pub use config::{Config, ConfigOverrides, Env, ProcessEnv};
pub use parameter_store::{lookup_client_org_id, ParameterStore, SsmParameterStore};
pub use provisioning::{lookup_org_product_sku, ProvisioningApi, ProvisioningClient};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    MissingEnvironment,
    ParameterStore(String),
    ProvisioningRequest(String),
    /// Error status other than 404
    ProvisioningStatus { status: u16, body: String },
    MalformedResponse(String),
    Output(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::MissingEnvironment => write!(
                f,
                "environment is not set: pass --environment or set {}",
                config::ENVIRONMENT_VAR
            ),
            Error::ParameterStore(s) => write!(f, "parameter store lookup failed: {}", s),
            Error::ProvisioningRequest(s) => write!(f, "provisioning API request failed: {}", s),
            Error::ProvisioningStatus { status, body } => {
                write!(f, "provisioning API returned {}: {}", status, body)
            }
            Error::MalformedResponse(s) => {
                write!(f, "provisioning API response is not valid JSON: {}", s)
            }
            Error::Output(s) => write!(f, "failed to write result: {}", s),
        }
    }
}

impl std::error::Error for Error {}

/// Runs the requested lookups, client ID first, writing one line per lookup
/// to `out`. The first failing lookup ends the run.
pub fn run<S, P, W>(config: &Config, store: &S, api: &P, out: &mut W) -> Result<()>
where
    S: ParameterStore + ?Sized,
    P: ProvisioningApi + ?Sized,
    W: Write + ?Sized,
{
    log::debug!(
        "Checking IDs in environment {} ({})",
        config.environment,
        config.provisioning_api_host
    );

    if let Some(client_id) = &config.client_id {
        let org_id = lookup_client_org_id(store, client_id)?;
        write_line(out, &org_id)?;
    }

    if let Some(org_id) = &config.org_id {
        let sku = lookup_org_product_sku(api, org_id)?;
        write_line(out, &sku)?;
    }

    Ok(())
}

fn write_line<W: Write + ?Sized>(out: &mut W, line: &str) -> Result<()> {
    writeln!(out, "{}", line)
        .and_then(|_| out.flush())
        .map_err(|e| Error::Output(e.to_string()))
}
