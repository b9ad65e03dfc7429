//! The BTCPayServer capability catalogue
//!
//! One module per capability group. Each exposes `group(remote)`, which
//! declares the group's operations and wires each to a [`Route`] or, where
//! the request needs shaping a route cannot express, a custom handler.
//!
//! [`Route`]: crate::capability::Route

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::capability::{Arguments, CapabilityGroup, scalar_text};
use crate::remote::RemoteCollaborator;
use crate::{Error, Result};

mod api_keys;
mod apps;
mod authorization;
mod invoices;
mod lightning_address;
mod lightning_internal;
mod lightning_store;
mod notifications;
mod payment_requests;
mod pull_payments;
mod server_info;
mod stores;
mod stores_email;
mod stores_payment_methods;
mod stores_payout_processors;
mod stores_payouts;
mod stores_rates;
mod stores_users;
mod stores_wallet;
mod users;
mod webhooks;

/// Every group, in registration order, sharing one collaborator
pub fn catalogue(remote: &Arc<dyn RemoteCollaborator>) -> Vec<CapabilityGroup> {
    let builders: [fn(Arc<dyn RemoteCollaborator>) -> CapabilityGroup; 21] = [
        payment_requests::group,
        invoices::group,
        lightning_internal::group,
        lightning_store::group,
        lightning_address::group,
        stores::group,
        stores_email::group,
        stores_payment_methods::group,
        stores_users::group,
        stores_wallet::group,
        stores_payouts::group,
        stores_payout_processors::group,
        stores_rates::group,
        users::group,
        webhooks::group,
        pull_payments::group,
        apps::group,
        api_keys::group,
        server_info::group,
        authorization::group,
        notifications::group,
    ];
    builders
        .iter()
        .map(|build| build(Arc::clone(remote)))
        .collect()
}

/// Non-null string argument
pub(crate) fn text_arg<'a>(args: &'a Arguments, name: &str) -> Option<&'a str> {
    args.get(name).and_then(Value::as_str)
}

/// Text form of an argument that must be present; numbers and booleans are
/// rendered the way path placeholders render them.
///
/// Only used after validation, so absence means a descriptor and its handler
/// disagree.
pub(crate) fn required_text(args: &Arguments, name: &str, operation: &str) -> Result<String> {
    args.get(name)
        .filter(|v| !v.is_null())
        .map(scalar_text)
        .ok_or_else(|| Error::MissingParameter {
            parameter: name.to_string(),
            operation: operation.to_string(),
        })
}

/// Unix timestamp for RFC 3339, `YYYY-MM-DD HH:MM:SS` or `YYYY-MM-DD` (UTC)
pub(crate) fn unix_timestamp(text: &str) -> Option<i64> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.timestamp());
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt.and_utc().timestamp());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp())
}

/// Replace a date-string argument with its unix timestamp.
///
/// Numbers pass through; unparseable strings are dropped.
pub(crate) fn date_to_timestamp(args: &mut Arguments, name: &str) {
    let Some(Value::String(text)) = args.get(name) else {
        return;
    };
    match unix_timestamp(text) {
        Some(ts) => {
            args.insert(name.to_string(), Value::from(ts));
        }
        None => {
            args.remove(name);
        }
    }
}
