pub mod activity_log;
pub mod geoip;
pub mod session;
pub mod webhook;

pub use activity_log::ActivityLog;
pub use geoip::{GeoClient, IpInfo};
pub use session::{ActivityLogger, Session};
pub use webhook::{ActivitySender, SendOutcome};
