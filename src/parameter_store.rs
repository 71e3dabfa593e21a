use std::sync::OnceLock;

use aws_config::BehaviorVersion;
use aws_sdk_ssm::error::DisplayErrorContext;
use tokio::runtime::{Builder, Runtime};

use crate::{Error, Result};

/// Key/value store holding decrypted configuration parameters
pub trait ParameterStore {
    /// Returns the decrypted value of parameter `name`, or `None` if the
    /// parameter does not exist
    fn get_parameter(&self, name: &str) -> Result<Option<String>>;
}

/// [`ParameterStore`] backed by AWS Systems Manager Parameter Store.
///
/// Region and credentials come from the default AWS configuration chain,
/// loaded on first use. The SDK is async: the store drives it on its own
/// current-thread runtime so that callers stay synchronous.
pub struct SsmParameterStore {
    runtime: Runtime,
    client: OnceLock<aws_sdk_ssm::Client>,
}

impl SsmParameterStore {
    pub fn new() -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::ParameterStore(format!("Failed to start runtime: {}", e)))?;
        Ok(Self {
            runtime,
            client: OnceLock::new(),
        })
    }

    /// Uses `client` instead of loading the default AWS configuration
    pub fn with_client(client: aws_sdk_ssm::Client) -> Result<Self> {
        let store = Self::new()?;
        let _ = store.client.set(client);
        Ok(store)
    }

    fn client(&self) -> &aws_sdk_ssm::Client {
        self.client.get_or_init(|| {
            log::debug!("Parameter Store: Loading AWS configuration");
            let config = self
                .runtime
                .block_on(aws_config::load_defaults(BehaviorVersion::latest()));
            aws_sdk_ssm::Client::new(&config)
        })
    }
}

impl ParameterStore for SsmParameterStore {
    fn get_parameter(&self, name: &str) -> Result<Option<String>> {
        log::debug!("Parameter Store: Requesting {}", name);
        let response = self.runtime.block_on(
            self.client()
                .get_parameter()
                .name(name)
                .with_decryption(true)
                .send(),
        );
        match response {
            Ok(output) => Ok(Some(
                output
                    .parameter()
                    .and_then(|p| p.value())
                    .unwrap_or_default()
                    .to_string(),
            )),
            Err(e) if e.as_service_error().is_some_and(|se| se.is_parameter_not_found()) => {
                Ok(None)
            }
            Err(e) => Err(Error::ParameterStore(format!(
                "Failed to get parameter '{}': {}",
                name,
                DisplayErrorContext(&e)
            ))),
        }
    }
}

pub fn client_org_id_key(client_id: &str) -> String {
    format!("/monitoring-center/{}/org_id", client_id)
}

/// Looks up the organization ID stored for `client_id`.
///
/// A missing parameter is not an error: the result is then an empty string.
pub fn lookup_client_org_id<S>(store: &S, client_id: &str) -> Result<String>
where
    S: ParameterStore + ?Sized,
{
    let key = client_org_id_key(client_id);
    match store.get_parameter(&key)? {
        Some(org_id) => Ok(org_id),
        None => {
            log::debug!("Parameter Store: {} not found", key);
            Ok(String::new())
        }
    }
}
