//! Automated payout and transfer processors

use std::sync::Arc;

use serde_json::json;

use crate::capability::{CapabilityGroup, OperationDescriptor as Op, ParamType as T, Route};
use crate::remote::{RemoteCollaborator, Shape};

const FEE_TARGET: &str = "How many blocks should the fee rate calculation target to confirm in";
const INTERVAL: &str = "How often should the processor run (in seconds)";
const THRESHOLD: &str = "Only process payouts when this payout sum is reached";
const INSTANT: &str = "Skip the interval when an eligible payout has been approved";

fn store(name: &str, description: &str) -> Op {
    Op::new(name, description).required("storeId", T::String, "Store ID")
}

pub fn group(remote: Arc<dyn RemoteCollaborator>) -> CapabilityGroup {
    CapabilityGroup::builder(
        "stores-payout-processors",
        "store-management",
        "Store payout processors operations - manage automated payout processing configurations",
    )
    .route(
        store("getPayoutProcessors", "Get store configured payout processors").example(
            "Get all payout processors",
            "Get all configured payout processors for the store",
            json!({"storeId": "store123"}),
        ),
        Route::get("/stores/{storeId}/payout-processors").expect(Shape::Array),
    )
    .route(
        store("removePayoutProcessor", "Remove store configured payout processor")
            .required("processor", T::String, "The processor name")
            .required("paymentMethodId", T::String, "Payment method ID (e.g., BTC-CHAIN)")
            .example(
                "Remove processor",
                "Remove a payout processor configuration",
                json!({
                    "storeId": "store123",
                    "processor": "OnChainAutomatedPayoutSenderFactory",
                    "paymentMethodId": "BTC-CHAIN"
                }),
            ),
        Route::delete("/stores/{storeId}/payout-processors/{processor}/{paymentMethodId}"),
    )
    .route(
        store(
            "getOnChainPayoutProcessors",
            "Get configured store onchain automated payout processors",
        )
        .required("paymentMethodId", T::String, "Payment method ID (e.g., BTC-CHAIN)")
        .example(
            "Get onchain processors",
            "Get onchain automated payout processors",
            json!({"storeId": "store123", "paymentMethodId": "BTC-CHAIN"}),
        ),
        Route::get(
            "/stores/{storeId}/payout-processors/OnChainAutomatedPayoutSenderFactory/{paymentMethodId}",
        )
        .expect(Shape::Array),
    )
    .route(
        store(
            "updateOnChainPayoutProcessors",
            "Update configured store onchain automated payout processors",
        )
        .required("paymentMethodId", T::String, "Payment method ID (e.g., BTC-CHAIN)")
        .optional("feeTargetBlock", T::Number, FEE_TARGET)
        .required("intervalSeconds", T::Number, INTERVAL)
        .required("threshold", T::String, THRESHOLD)
        .with_default("processNewPayoutsInstantly", T::Boolean, INSTANT, false)
        .example(
            "Configure onchain processor",
            "Configure automated onchain payout processing",
            json!({
                "storeId": "store123",
                "paymentMethodId": "BTC-CHAIN",
                "feeTargetBlock": 6,
                "intervalSeconds": 3600,
                "threshold": "0.001",
                "processNewPayoutsInstantly": true
            }),
        ),
        Route::put(
            "/stores/{storeId}/payout-processors/OnChainAutomatedPayoutSenderFactory/{paymentMethodId}",
        )
        .expect(Shape::Object),
    )
    .route(
        store(
            "getLightningPayoutProcessors",
            "Get configured store Lightning automated payout processors",
        )
        .required("payoutMethodId", T::String, "Payout method ID (e.g., BTC-LN)")
        .example(
            "Get Lightning processors",
            "Get Lightning automated payout processors",
            json!({"storeId": "store123", "payoutMethodId": "BTC-LN"}),
        ),
        Route::get(
            "/stores/{storeId}/payout-processors/LightningAutomatedPayoutSenderFactory/{payoutMethodId}",
        )
        .expect(Shape::Array),
    )
    .route(
        store(
            "updateLightningPayoutProcessors",
            "Update configured store Lightning automated payout processors",
        )
        .required("payoutMethodId", T::String, "Payout method ID (e.g., BTC-LN)")
        .required("intervalSeconds", T::Number, INTERVAL)
        .optional(
            "cancelPayoutAfterFailures",
            T::Number,
            "How many failures should the processor tolerate before cancelling the payout",
        )
        .with_default("processNewPayoutsInstantly", T::Boolean, INSTANT, false)
        .example(
            "Configure Lightning processor",
            "Configure automated Lightning payout processing",
            json!({
                "storeId": "store123",
                "payoutMethodId": "BTC-LN",
                "intervalSeconds": 1800,
                "cancelPayoutAfterFailures": 3,
                "processNewPayoutsInstantly": true
            }),
        ),
        Route::put(
            "/stores/{storeId}/payout-processors/LightningAutomatedPayoutSenderFactory/{payoutMethodId}",
        )
        .expect(Shape::Object),
    )
    .route(
        store(
            "getOnChainTransferProcessors",
            "Get configured store onchain automated transfer processors",
        )
        .example(
            "Get transfer processors",
            "Get onchain automated transfer processors",
            json!({"storeId": "store123"}),
        ),
        Route::get("/stores/{storeId}/payout-processors/OnChainAutomatedTransferSenderFactory")
            .expect(Shape::Array),
    )
    .route(
        store(
            "updateOnChainTransferProcessors",
            "Update configured store onchain automated transfer processors",
        )
        .optional("feeTargetBlock", T::Number, FEE_TARGET)
        .required("intervalSeconds", T::Number, INTERVAL)
        .required("threshold", T::String, THRESHOLD)
        .with_default("processNewPayoutsInstantly", T::Boolean, INSTANT, false)
        .example(
            "Configure transfer processor",
            "Configure automated onchain transfer processing",
            json!({
                "storeId": "store123",
                "feeTargetBlock": 12,
                "intervalSeconds": 7200,
                "threshold": "0.01",
                "processNewPayoutsInstantly": false
            }),
        ),
        Route::put("/stores/{storeId}/payout-processors/OnChainAutomatedTransferSenderFactory")
            .expect(Shape::Object),
    )
    .route(
        store(
            "getLightningTransferProcessors",
            "Get configured store Lightning automated transfer processors",
        )
        .example(
            "Get Lightning transfer processors",
            "Get Lightning automated transfer processors",
            json!({"storeId": "store123"}),
        ),
        Route::get("/stores/{storeId}/payout-processors/LightningAutomatedPayoutSenderFactory")
            .expect(Shape::Array),
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
    async fn removal_addresses_processor_and_method() {
        let recorder = Arc::new(Recorder::default());
        group(recorder.clone())
            .invoke(
                "removePayoutProcessor",
                args(json!({
                    "storeId": "s1",
                    "processor": "OnChainAutomatedPayoutSenderFactory",
                    "paymentMethodId": "BTC-CHAIN"
                })),
            )
            .await
            .unwrap();

        assert_eq!(
            recorder.last().path(),
            "/stores/s1/payout-processors/OnChainAutomatedPayoutSenderFactory/BTC-CHAIN"
        );
    }

    #[tokio::test]
    async fn lightning_update_applies_instant_default() {
        let recorder = Arc::new(Recorder::default());
        group(recorder.clone())
            .invoke(
                "updateLightningPayoutProcessors",
                args(json!({"storeId": "s1", "payoutMethodId": "BTC-LN", "intervalSeconds": 60})),
            )
            .await
            .unwrap();

        let call = recorder.last();
        assert_eq!(
            call.path(),
            "/stores/s1/payout-processors/LightningAutomatedPayoutSenderFactory/BTC-LN"
        );
        assert_eq!(
            call.body.unwrap(),
            json!({"intervalSeconds": 60, "processNewPayoutsInstantly": false})
        );
    }

    #[tokio::test]
    async fn transfer_update_requires_threshold() {
        let recorder = Arc::new(Recorder::default());
        let err = group(recorder.clone())
            .invoke(
                "updateOnChainTransferProcessors",
                args(json!({"storeId": "s1", "intervalSeconds": 60})),
            )
            .await
            .unwrap_err();

        assert!(err.to_string().contains("'threshold'"));
        assert_eq!(recorder.count(), 0);
    }
}
