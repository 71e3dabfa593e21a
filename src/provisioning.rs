use reqwest::{blocking::Client, StatusCode};
use serde_json::{Map, Value};

use crate::{Error, Result};

/// Read access to the DIAS Provisioning API
pub trait ProvisioningApi {
    /// Returns the organization document for `org_id`.
    ///
    /// An unknown organization (HTTP 404) yields an empty JSON object.
    fn organization(&self, org_id: &str) -> Result<Value>;
}

/// Blocking HTTP client for the DIAS Provisioning API
pub struct ProvisioningClient {
    host: String,
    client: Client,
}

impl ProvisioningClient {
    pub fn new(host: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::ProvisioningRequest(format!("Failed to build client: {}", e)))?;
        Ok(Self {
            host: host.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn get(&self, endpoint: &str) -> Result<Value> {
        let url = format!("{}/{}", self.host, endpoint);
        log::debug!("Provisioning API: Requesting {}", url);

        let response = match self.client.get(&url).send() {
            Ok(response) => response,
            Err(e) => return Err(Error::ProvisioningRequest(format!("{}: {}", url, e))),
        };

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            log::debug!("Provisioning API: {} not found", url);
            return Ok(Value::Object(Map::new()));
        }

        let body = response
            .text()
            .map_err(|e| Error::ProvisioningRequest(format!("{}: {}", url, e)))?;
        if status.is_client_error() || status.is_server_error() {
            return Err(Error::ProvisioningStatus {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| Error::MalformedResponse(e.to_string()))
    }
}

impl ProvisioningApi for ProvisioningClient {
    fn organization(&self, org_id: &str) -> Result<Value> {
        self.get(&organization_path(org_id))
    }
}

pub fn organization_path(org_id: &str) -> String {
    format!("organizations/{}", org_id)
}

/// Extracts `organizations[0].environment.entitlement.productSKU` from
/// `response`, or `None` if any step of that path is missing
pub fn extract_product_sku(response: &Value) -> Option<String> {
    let sku = response
        .get("organizations")
        .and_then(Value::as_array)
        .and_then(|organizations| organizations.first())
        .and_then(|organization| organization.get("environment"))
        .and_then(|environment| environment.get("entitlement"))
        .and_then(|entitlement| entitlement.get("productSKU"))?;
    match sku {
        Value::Null => None,
        Value::String(sku) => Some(sku.clone()),
        other => Some(other.to_string()),
    }
}

pub fn lookup_org_product_sku<P>(api: &P, org_id: &str) -> Result<String>
where
    P: ProvisioningApi + ?Sized,
{
    let response = api.organization(org_id)?;
    match extract_product_sku(&response) {
        Some(sku) => Ok(sku),
        None => {
            log::debug!("Provisioning API: no product SKU for organization {}", org_id);
            Ok(String::new())
        }
    }
}
