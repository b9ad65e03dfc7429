//! Interactive API key authorization
//!
//! BTCPayServer can mint an API key on a user's behalf after they consent in
//! the browser. This group only builds the consent URL; no request is made.

use std::fmt::Write as _;
use std::sync::Arc;

use serde_json::{Value, json};
use url::Url;

use super::text_arg;
use crate::capability::{
    Arguments, CapabilityGroup, Invocation, OperationDescriptor as Op, ParamType as T,
};
use crate::remote::RemoteCollaborator;
use crate::{Error, Result};

pub fn group(remote: Arc<dyn RemoteCollaborator>) -> CapabilityGroup {
    CapabilityGroup::builder(
        "authorization",
        "authentication",
        "Authorization operations for user API key generation and permission management",
    )
    .custom(authorize_user(), |inv: Invocation| async move {
        let base_url = inv.remote.base_url().to_string();
        authorization_link(&base_url, &inv.args)
    })
    .build(remote)
}

fn authorize_user() -> Op {
    Op::new(
        "authorizeUser",
        "Generate authorization URL to redirect the browser for user API key generation with specific permissions",
    )
    .optional(
        "permissions",
        T::Array,
        "Array of permission strings to request (e.g., [\"btcpay.store.cancreateinvoice\", \"btcpay.store.canviewinvoices\"])",
    )
    .with_default(
        "strict",
        T::Boolean,
        "If permissions are specified and strict is false, allows user to reject some permissions. Default: true",
        true,
    )
    .optional(
        "applicationIdentifier",
        T::String,
        "Application identifier for checking existing API keys. Ignored if redirect is not specified",
    )
    .with_default(
        "selectiveStores",
        T::Boolean,
        "If requesting CanModifyStoreSettings permission, allows user to grant permissions to selected stores only. Default: false",
        false,
    )
    .optional(
        "applicationName",
        T::String,
        "The name of your application to display to the user",
    )
    .optional(
        "redirect",
        T::String,
        "URL to redirect to after user consent, with query parameters appended (permissions, user-id, api-key). If not specified, user is redirected to their API Key list",
    )
    .example(
        "Basic authorization request",
        "Request basic invoice and store permissions",
        json!({
            "permissions": ["btcpay.store.cancreateinvoice", "btcpay.store.canviewinvoices"],
            "applicationName": "My E-commerce App",
            "redirect": "https://myapp.com/btcpay/callback"
        }),
    )
    .example(
        "Store management authorization",
        "Request store management permissions with selective stores",
        json!({
            "permissions": ["btcpay.store.canmodifystoresettings", "btcpay.store.canviewinvoices"],
            "applicationName": "Store Manager App",
            "selectiveStores": true,
            "strict": false,
            "redirect": "https://myapp.com/btcpay/setup"
        }),
    )
    .example(
        "Server admin authorization",
        "Request server administration permissions",
        json!({
            "permissions": ["btcpay.server.canmanageserver", "btcpay.user.canviewprofile"],
            "applicationName": "BTCPay Admin Tool",
            "applicationIdentifier": "btcpay-admin-v1",
            "strict": true,
            "redirect": "https://admin.myapp.com/auth/callback"
        }),
    )
    .example(
        "Simple redirect to API keys",
        "Redirect user to create any API key (no specific permissions)",
        json!({"applicationName": "Simple Integration"}),
    )
}

fn permissions(args: &Arguments) -> Vec<&str> {
    args.get("permissions")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

fn flag(args: &Arguments, name: &str) -> Option<bool> {
    args.get(name).and_then(Value::as_bool)
}

/// Build `{authorizationUrl, instructions}` for the consent page
fn authorization_link(base_url: &str, args: &Arguments) -> Result<Value> {
    let base = base_url.trim_end_matches('/');
    if base.is_empty() {
        return Err(Error::Config(
            "BTCPAY_BASE_URL is required to build an authorization URL".to_string(),
        ));
    }
    let mut url = Url::parse(&format!("{base}/api-keys/authorize"))
        .map_err(|e| Error::Config(format!("Invalid BTCPAY_BASE_URL '{base}': {e}")))?;

    let mut pairs: Vec<(&str, String)> = permissions(args)
        .into_iter()
        .map(|p| ("permissions", p.to_string()))
        .collect();
    if let Some(strict) = flag(args, "strict") {
        pairs.push(("strict", strict.to_string()));
    }
    if let Some(id) = text_arg(args, "applicationIdentifier").filter(|s| !s.is_empty()) {
        pairs.push(("applicationIdentifier", id.to_string()));
    }
    if let Some(selective) = flag(args, "selectiveStores") {
        pairs.push(("selectiveStores", selective.to_string()));
    }
    if let Some(name) = text_arg(args, "applicationName").filter(|s| !s.is_empty()) {
        pairs.push(("applicationName", name.to_string()));
    }
    if let Some(redirect) = text_arg(args, "redirect").filter(|s| !s.is_empty()) {
        pairs.push(("redirect", redirect.to_string()));
    }
    if !pairs.is_empty() {
        url.query_pairs_mut().extend_pairs(pairs);
    }

    Ok(json!({
        "authorizationUrl": url.as_str(),
        "instructions": instructions(args),
    }))
}

fn instructions(args: &Arguments) -> String {
    let mut out = String::from("Authorization URL generated successfully.\n\n**Next Steps:**\n");
    out.push_str("1. Direct the user to the authorization URL in their browser\n");
    out.push_str("2. User will see a BTCPay Server authorization page\n");

    let requested = permissions(args);
    if requested.is_empty() {
        out.push_str("3. User can create an API key with any permissions they choose\n");
    } else {
        out.push_str("3. User will be prompted to grant the following permissions:\n");
        for permission in requested {
            let _ = writeln!(out, "   - {permission}");
        }
    }

    if flag(args, "selectiveStores") == Some(true) {
        out.push_str("4. User can select specific stores to grant permissions to\n");
    }

    match text_arg(args, "redirect").filter(|s| !s.is_empty()) {
        Some(redirect) => {
            let _ = writeln!(
                out,
                "5. After authorization, user will be redirected to: {redirect}"
            );
            out.push_str("6. The redirect URL will include query parameters:\n");
            out.push_str("   - permissions: granted permissions (comma-separated)\n");
            out.push_str("   - user-id: BTCPay Server user ID\n");
            out.push_str("   - api-key: generated API key\n");
        }
        None => {
            out.push_str("5. After authorization, user will be redirected to their API Key list\n");
            out.push_str("6. User will need to manually provide you with the generated API key\n");
        }
    }

    out.push_str("\n**Security Notes:**\n");
    out.push_str("- The authorization URL is safe to share with the user\n");
    out.push_str(
        "- The actual API key is only accessible to the user or via the redirect callback\n",
    );
    out.push_str("- Store the API key securely once received\n");
    if flag(args, "strict") == Some(false) {
        out.push_str("- User can reject some of the requested permissions (strict=false)\n");
    }
    out
}
