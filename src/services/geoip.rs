use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, warn};

const PUBLIC_IP_ENDPOINT: &str = "https://api.ipify.org?format=json";
const GEO_FIELDS: &str = "status,message,city,regionName,country,timezone,isp,proxy,hosting";

#[derive(Debug, Deserialize)]
struct PublicIpResponse {
    ip: String,
}

#[derive(Debug, Deserialize)]
struct GeoResponse {
    status: String,
    message: Option<String>,
    city: Option<String>,
    #[serde(rename = "regionName")]
    region_name: Option<String>,
    country: Option<String>,
    timezone: Option<String>,
    isp: Option<String>,
    proxy: Option<bool>,
    hosting: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IpInfo {
    pub ip: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub isp: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hosting: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,
}

#[derive(Clone)]
pub struct GeoClient {
    client: Client,
}

impl GeoClient {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(5))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    // Best-effort: any transport failure on either lookup degrades to None,
    // a provider-reported failure degrades to an address-only result.
    pub async fn lookup(&self) -> Option<IpInfo> {
        let ip = self.public_ip().await?;

        let url = format!("http://ip-api.com/json/{ip}?fields={GEO_FIELDS}");
        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(err) => {
                error!("Error fetching IP location: {}", err);
                return None;
            }
        };

        if !response.status().is_success() {
            error!(
                "IP location lookup failed with status {}",
                response.status()
            );
            return None;
        }

        let geo = match response.json::<GeoResponse>().await {
            Ok(geo) => geo,
            Err(err) => {
                error!("Error decoding IP location response: {}", err);
                return None;
            }
        };

        Some(merge_lookup(ip, geo))
    }

    async fn public_ip(&self) -> Option<String> {
        let response = match self.client.get(PUBLIC_IP_ENDPOINT).send().await {
            Ok(response) => response,
            Err(err) => {
                error!("Error fetching public IP: {}", err);
                return None;
            }
        };

        match response.json::<PublicIpResponse>().await {
            Ok(data) if !data.ip.is_empty() => Some(data.ip),
            Ok(_) => {
                error!("Failed to fetch public IP");
                None
            }
            Err(err) => {
                error!("Error decoding public IP response: {}", err);
                None
            }
        }
    }
}

impl Default for GeoClient {
    fn default() -> Self {
        Self::new()
    }
}

fn merge_lookup(ip: String, geo: GeoResponse) -> IpInfo {
    if geo.status == "fail" {
        warn!(
            "IP location lookup failed for {}: {}",
            ip,
            geo.message.as_deref().unwrap_or("unknown reason")
        );
        return IpInfo {
            ip,
            ..IpInfo::default()
        };
    }

    IpInfo {
        ip,
        message: geo.message,
        city: geo.city,
        region: geo.region_name,
        country: geo.country,
        timezone: geo.timezone,
        isp: geo.isp,
        proxy: geo.proxy,
        hosting: geo.hosting,
        hostname: local_hostname(),
        app_version: Some(env!("CARGO_PKG_VERSION").to_string()),
    }
}

fn local_hostname() -> Option<String> {
    hostname::get()
        .ok()
        .map(|name| name.to_string_lossy().into_owned())
}
