//! Lightning addresses configured on a store

use std::sync::Arc;

use serde_json::json;

use crate::capability::{CapabilityGroup, OperationDescriptor as Op, ParamType as T, Route};
use crate::remote::{RemoteCollaborator, Shape};

pub fn group(remote: Arc<dyn RemoteCollaborator>) -> CapabilityGroup {
    CapabilityGroup::builder(
        "lightning-address",
        "lightning",
        "Lightning Address configuration - manage Lightning addresses for stores",
    )
    .route(
        Op::new("getLightningAddresses", "Get store configured Lightning addresses")
            .required("storeId", T::String, "Store ID")
            .example(
                "List Lightning addresses",
                "Get all Lightning addresses configured for the store",
                json!({"storeId": "store123"}),
            ),
        Route::get("/stores/{storeId}/lightning-addresses").expect(Shape::Array),
    )
    .route(
        Op::new("getLightningAddress", "Get specific Lightning address configuration")
            .required("storeId", T::String, "Store ID")
            .required("username", T::String, "Lightning address username")
            .example(
                "Get Lightning address",
                "Get configuration for a specific Lightning address",
                json!({"storeId": "store123", "username": "satoshi"}),
            ),
        Route::get("/stores/{storeId}/lightning-addresses/{username}").expect(Shape::Object),
    )
    .route(
        Op::new(
            "addOrUpdateLightningAddress",
            "Add or update Lightning address configuration",
        )
        .required("storeId", T::String, "Store ID")
        .required("username", T::String, "Lightning address username")
        .optional(
            "currencyCode",
            T::String,
            "Currency to generate invoices in (leave null for store default)",
        )
        .optional("min", T::String, "Minimum amount in sats this address allows")
        .optional("max", T::String, "Maximum amount in sats this address allows")
        .optional("invoiceMetadata", T::Object, "Invoice metadata as JSON")
        .example(
            "Create Lightning address",
            "Create a new Lightning address for the store",
            json!({
                "storeId": "store123",
                "username": "satoshi",
                "currencyCode": "USD",
                "min": "1000",
                "max": "100000000",
                "invoiceMetadata": {"purpose": "donations"}
            }),
        )
        .example(
            "Update Lightning address",
            "Update existing Lightning address configuration",
            json!({"storeId": "store123", "username": "satoshi", "max": "500000000"}),
        ),
        Route::post("/stores/{storeId}/lightning-addresses/{username}")
            .body(&["username"])
            .expect(Shape::Object),
    )
    .route(
        Op::new("removeLightningAddress", "Remove Lightning address configuration")
            .required("storeId", T::String, "Store ID")
            .required("username", T::String, "Lightning address username to remove")
            .example(
                "Remove Lightning address",
                "Remove a Lightning address from the store",
                json!({"storeId": "store123", "username": "satoshi"}),
            ),
        Route::delete("/stores/{storeId}/lightning-addresses/{username}"),
    )
    .build(remote)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::Arguments;
    use crate::remote::testing::Recorder;
    use reqwest::Method;
    use serde_json::Value;

    fn args(value: Value) -> Arguments {
        value.as_object().cloned().unwrap_or_default()
    }

    #[tokio::test]
    async fn upsert_repeats_username_in_body() {
        let recorder = Arc::new(Recorder::default());
        group(recorder.clone())
            .invoke(
                "addOrUpdateLightningAddress",
                args(json!({"storeId": "s1", "username": "satoshi", "max": "500"})),
            )
            .await
            .unwrap();

        let call = recorder.last();
        assert_eq!(call.method, Method::POST);
        assert_eq!(call.path(), "/stores/s1/lightning-addresses/satoshi");
        assert_eq!(
            call.body.unwrap(),
            json!({"username": "satoshi", "max": "500"})
        );
    }

    #[tokio::test]
    async fn remove_sends_no_body() {
        let recorder = Arc::new(Recorder::default());
        group(recorder.clone())
            .invoke(
                "removeLightningAddress",
                args(json!({"storeId": "s1", "username": "satoshi"})),
            )
            .await
            .unwrap();

        let call = recorder.last();
        assert_eq!(call.method, Method::DELETE);
        assert!(call.body.is_none());
        assert!(call.query.is_empty());
    }
}
