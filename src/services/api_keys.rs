//! API keys and the permission catalogue

use std::sync::Arc;

use serde_json::json;

use crate::Result;
use crate::capability::{
    Arguments, CapabilityGroup, OperationDescriptor as Op, ParamType as T, Route,
};
use crate::remote::{RemoteCollaborator, Shape};

const PERMISSIONS: &str = "Array of permission strings";
const USER: &str = "The user's ID or email address";

pub fn group(remote: Arc<dyn RemoteCollaborator>) -> CapabilityGroup {
    CapabilityGroup::builder(
        "api-keys",
        "authentication",
        "Manage API keys and permissions - create, get, delete API keys and manage permissions",
    )
    .route(
        Op::new("create", "Create a new API key")
            .optional("label", T::String, "API key label")
            .required("permissions", T::Array, PERMISSIONS)
            .optional("storeId", T::String, "Store ID for store-specific permissions")
            .example(
                "Store manager key",
                "Create API key with store management permissions",
                json!({
                    "label": "Store Manager Key",
                    "permissions": [
                        "btcpay.store.canmodifystoresettings",
                        "btcpay.store.canviewinvoices"
                    ],
                    "storeId": "store123"
                }),
            )
            .example(
                "Invoice-only key",
                "Create API key for invoice operations only",
                json!({
                    "label": "Invoice API Key",
                    "permissions": ["btcpay.store.cancreateinvoice", "btcpay.store.canviewinvoices"],
                    "storeId": "store123"
                }),
            ),
        Route::post("/api-keys").expect(Shape::Object),
    )
    .route(
        Op::new("get", "Get API key details")
            .required("apiKey", T::String, "API key to retrieve")
            .example(
                "Get API key info",
                "Retrieve API key information",
                json!({"apiKey": "your-api-key-here"}),
            ),
        Route::get("/api-keys/current")
            .prepare(current_key_only)
            .expect(Shape::Object),
    )
    .route(
        Op::new("delete", "Delete an API key")
            .required("apiKey", T::String, "API key to delete")
            .example(
                "Revoke API key",
                "Delete/revoke an API key",
                json!({"apiKey": "api-key-to-revoke"}),
            ),
        Route::delete("/api-keys/{apiKey}"),
    )
    .route(
        Op::new("getPermissions", "Get available API permissions").example(
            "List permissions",
            "Get all available API permissions",
            json!({}),
        ),
        Route::get("/permissions").expect(Shape::Array),
    )
    .route(
        Op::new("revokeCurrent", "Revoke the current API key").example(
            "Revoke current key",
            "Revoke the currently used API key",
            json!({}),
        ),
        Route::delete("/api-keys/current"),
    )
    .route(
        Op::new("createForUser", "Create a new API key for a specific user")
            .required("idOrEmail", T::String, USER)
            .optional("label", T::String, "API key label")
            .required("permissions", T::Array, PERMISSIONS)
            .example(
                "Create user API key",
                "Create API key for a specific user",
                json!({
                    "idOrEmail": "user@example.com",
                    "label": "User Store Key",
                    "permissions": ["btcpay.store.cancreateinvoice"]
                }),
            ),
        Route::post("/users/{idOrEmail}/api-keys").expect(Shape::Object),
    )
    .route(
        Op::new("deleteForUser", "Delete an API key for a specific user")
            .required("idOrEmail", T::String, USER)
            .required("apiKey", T::String, "API key to delete")
            .example(
                "Delete user API key",
                "Delete/revoke an API key for a specific user",
                json!({"idOrEmail": "user@example.com", "apiKey": "api-key-to-revoke"}),
            ),
        Route::delete("/users/{idOrEmail}/api-keys/{apiKey}"),
    )
    .build(remote)
}

/// The API describes only the key making the request; never put a key in the URL
fn current_key_only(args: &mut Arguments) -> Result<()> {
    args.remove("apiKey");
    Ok(())
}
