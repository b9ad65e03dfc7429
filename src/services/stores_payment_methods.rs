//! Per-store payment method configuration

use std::sync::Arc;

use serde_json::json;

use crate::capability::{CapabilityGroup, OperationDescriptor as Op, ParamType as T, Route};
use crate::remote::{RemoteCollaborator, Shape};

pub fn group(remote: Arc<dyn RemoteCollaborator>) -> CapabilityGroup {
    CapabilityGroup::builder(
        "stores-payment-methods",
        "store-management",
        "Store payment methods operations - manage payment method configurations",
    )
    .route(
        Op::new("getPaymentMethods", "Get store payment methods")
            .required("storeId", T::String, "Store ID")
            .optional(
                "onlyEnabled",
                T::Boolean,
                "Fetch payment methods that are enabled/disabled only",
            )
            .optional("includeConfig", T::Boolean, "Fetch the config of the payment methods")
            .example(
                "Get all payment methods",
                "Get all payment methods for a store",
                json!({"storeId": "store123"}),
            )
            .example(
                "Get enabled payment methods with config",
                "Get only enabled payment methods with configuration",
                json!({"storeId": "store123", "onlyEnabled": true, "includeConfig": true}),
            ),
        Route::get("/stores/{storeId}/payment-methods").expect(Shape::Array),
    )
    .route(
        Op::new("getPaymentMethod", "Get specific store payment method")
            .required("storeId", T::String, "Store ID")
            .required("paymentMethodId", T::String, "Payment method ID (e.g., BTC-CHAIN)")
            .optional("includeConfig", T::Boolean, "Fetch the config of the payment method")
            .example(
                "Get Bitcoin payment method",
                "Get Bitcoin on-chain payment method configuration",
                json!({"storeId": "store123", "paymentMethodId": "BTC-CHAIN", "includeConfig": true}),
            ),
        Route::get("/stores/{storeId}/payment-methods/{paymentMethodId}").expect(Shape::Object),
    )
    .route(
        Op::new("updatePaymentMethod", "Update store payment method")
            .required("storeId", T::String, "Store ID")
            .required("paymentMethodId", T::String, "Payment method ID (e.g., BTC-CHAIN)")
            .optional("enabled", T::Boolean, "Whether the payment method is enabled")
            .optional("config", T::Object, "Payment method configuration object")
            .example(
                "Enable Bitcoin with config",
                "Enable Bitcoin payment method with configuration",
                json!({
                    "storeId": "store123",
                    "paymentMethodId": "BTC-CHAIN",
                    "enabled": true,
                    "config": {"useBech32Scheme": true, "lud12Enabled": true}
                }),
            ),
        Route::put("/stores/{storeId}/payment-methods/{paymentMethodId}").expect(Shape::Object),
    )
    .route(
        Op::new("deletePaymentMethod", "Delete store payment method")
            .required("storeId", T::String, "Store ID")
            .required("paymentMethodId", T::String, "Payment method ID (e.g., BTC-CHAIN)")
            .example(
                "Delete Bitcoin payment method",
                "Remove Bitcoin payment method from store",
                json!({"storeId": "store123", "paymentMethodId": "BTC-CHAIN"}),
            ),
        Route::delete("/stores/{storeId}/payment-methods/{paymentMethodId}"),
    )
    .build(remote)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::Arguments;
    use crate::remote::testing::Recorder;
    use serde_json::Value;

    fn args(value: Value) -> Arguments {
        value.as_object().cloned().unwrap_or_default()
    }

    #[tokio::test]
    async fn filters_travel_as_query() {
        let recorder = Arc::new(Recorder::default());
        group(recorder.clone())
            .invoke(
                "getPaymentMethods",
                args(json!({"storeId": "s1", "onlyEnabled": false, "includeConfig": true})),
            )
            .await
            .unwrap();

        let call = recorder.last();
        assert_eq!(call.path(), "/stores/s1/payment-methods");
        assert_eq!(
            call.query,
            vec![
                ("onlyEnabled".to_string(), "false".to_string()),
                ("includeConfig".to_string(), "true".to_string()),
            ]
        );
        assert!(call.body.is_none());
    }

    #[tokio::test]
    async fn update_keeps_config_object_intact() {
        let recorder = Arc::new(Recorder::default());
        group(recorder.clone())
            .invoke(
                "updatePaymentMethod",
                args(json!({
                    "storeId": "s1",
                    "paymentMethodId": "BTC-LN",
                    "config": {"connectionString": "Internal Node"}
                })),
            )
            .await
            .unwrap();

        let call = recorder.last();
        assert_eq!(call.path(), "/stores/s1/payment-methods/BTC-LN");
        assert_eq!(
            call.body.unwrap(),
            json!({"config": {"connectionString": "Internal Node"}})
        );
    }
}
