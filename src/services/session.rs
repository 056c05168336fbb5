use serde_json::{json, Map, Value};
use tracing::{info, warn};

use crate::models::Activity;
use crate::services::activity_log::ActivityLog;
use crate::services::geoip::{GeoClient, IpInfo};
use crate::services::webhook::{ActivitySender, SendOutcome};

// Enrichment snapshot taken once at startup and threaded to call sites.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub ip: Option<String>,
    pub timezone: Option<String>,
    pub hostname: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl Session {
    pub fn from_lookup(info: Option<IpInfo>, name: Option<String>, email: Option<String>) -> Self {
        match info {
            Some(info) => Self {
                ip: Some(info.ip),
                timezone: info.timezone,
                hostname: info.hostname,
                name,
                email,
            },
            None => Self {
                name,
                email,
                ..Self::default()
            },
        }
    }
}

pub struct ActivityLogger {
    sender: ActivitySender,
    local: ActivityLog,
    geo: GeoClient,
}

impl ActivityLogger {
    pub fn new(sender: ActivitySender, local: ActivityLog, geo: GeoClient) -> Self {
        Self { sender, local, geo }
    }

    pub async fn initialize(
        &self,
        name: Option<String>,
        email: Option<String>,
        send_startup: bool,
    ) -> Session {
        let session = Session::from_lookup(self.geo.lookup().await, name, email);

        if send_startup {
            let activity = Activity::new(
                "App Started / User Logged In",
                startup_message(&session),
            )
            .with("ip", json!(session.ip))
            .with("timezone", json!(session.timezone));

            if let SendOutcome::Failed { error } = self.sender.send(&activity).await {
                warn!("Startup activity not delivered: {}", error);
            }
        }

        session
    }

    // Remote send and local append are independent best-effort operations;
    // one failing never suppresses the other.
    pub async fn log(&self, mut activity: Activity, detail: bool) {
        if detail {
            if let Some(info) = self.geo.lookup().await {
                merge_info(&mut activity, &info);
            }
        }

        if let SendOutcome::Failed { error } = self.sender.send(&activity).await {
            warn!("Activity not delivered to webhook: {}", error);
        }

        if let Err(err) = self.local.append(&activity) {
            warn!("Error saving activity locally: {}", err);
        }
    }

    pub async fn simple_send(
        &self,
        session: &Session,
        event: &str,
        message: &str,
        attach_session: bool,
        save_local: bool,
    ) {
        let mut activity = Activity::new(event, message);

        if attach_session {
            activity.extend(session_fields(session));
        }

        if let SendOutcome::Failed { error } = self.sender.send(&activity).await {
            warn!("Activity not delivered to webhook: {}", error);
        }

        if save_local {
            if let Err(err) = self.local.append(&activity) {
                warn!("Error saving activity locally: {}", err);
            }
        }

        info!("Logged activity '{}'", event);
    }
}

fn merge_info(activity: &mut Activity, info: &IpInfo) {
    if let Ok(Value::Object(fields)) = serde_json::to_value(info) {
        activity.extend(fields);
    }
}

fn session_fields(session: &Session) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("hostname".to_string(), json!(session.hostname));
    fields.insert("ip".to_string(), json!(session.ip));
    fields.insert("timezone".to_string(), json!(session.timezone));
    fields.insert("email".to_string(), json!(session.email));
    fields.insert("name".to_string(), json!(session.name));
    fields
}

fn startup_message(session: &Session) -> String {
    let ip = session.ip.as_deref().unwrap_or("unknown");
    let timezone = session.timezone.as_deref().unwrap_or("unknown");

    match (&session.name, &session.email) {
        (Some(name), Some(email)) => format!(
            "App Initialize Event Triggered for User [{name}({email})] with IP {ip}({timezone})"
        ),
        _ => format!(
            "App Initialize Event Triggered with IP {ip}({timezone}) [No User Logged In]"
        ),
    }
}
