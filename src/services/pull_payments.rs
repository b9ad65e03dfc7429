//! Pull payments, their payouts, boltcards and LNURL withdrawals

use std::sync::Arc;

use serde_json::json;

use crate::capability::{CapabilityGroup, OperationDescriptor as Op, ParamType as T, Route};
use crate::remote::{RemoteCollaborator, Shape};

fn pull_payment(name: &str, description: &str) -> Op {
    Op::new(name, description).required("pullPaymentId", T::String, "Pull payment ID")
}

pub fn group(remote: Arc<dyn RemoteCollaborator>) -> CapabilityGroup {
    CapabilityGroup::builder(
        "pull-payments",
        "payments",
        "Comprehensive pull payments management - create and manage pull payments, payouts, boltcard integration and LNURL functionality",
    )
    .route(
        Op::new("listStore", "Get store's pull payments")
            .required("storeId", T::String, "Store ID")
            .with_default(
                "includeArchived",
                T::Boolean,
                "Whether to include archived pull payments",
                false,
            )
            .example(
                "List active pull payments",
                "Get all active pull payments for a store",
                json!({"storeId": "store123", "includeArchived": false}),
            )
            .example(
                "List all pull payments",
                "Get all pull payments including archived ones",
                json!({"storeId": "store123", "includeArchived": true}),
            ),
        Route::get("/stores/{storeId}/pull-payments").expect(Shape::Array),
    )
    .route(
        Op::new("create", "Create a new pull payment")
            .required("storeId", T::String, "Store ID")
            .required("pullPaymentData", T::Object, "Pull payment configuration")
            .example(
                "Basic pull payment",
                "Create a simple pull payment",
                json!({
                    "storeId": "store123",
                    "pullPaymentData": {
                        "name": "Monthly Payouts",
                        "description": "Employee monthly salary payments",
                        "amount": "10000.00",
                        "currency": "USD",
                        "autoApproveClaims": false
                    }
                }),
            )
            .example(
                "Advanced pull payment",
                "Create a pull payment with full configuration",
                json!({
                    "storeId": "store123",
                    "pullPaymentData": {
                        "name": "Project Funding",
                        "description": "Development team payments",
                        "amount": "50000.00",
                        "currency": "USD",
                        "BOLT11Expiration": 60,
                        "autoApproveClaims": true,
                        "startsAt": 1_672_531_200,
                        "expiresAt": 1_704_067_200,
                        "payoutMethods": ["BTC-CHAIN", "BTC-LN"]
                    }
                }),
            ),
        Route::post("/stores/{storeId}/pull-payments")
            .spread("pullPaymentData")
            .expect(Shape::Object),
    )
    .route(
        Op::new(
            "archive",
            "Archive a pull payment (cancels all awaiting payouts)",
        )
        .required("storeId", T::String, "Store ID")
        .required("pullPaymentId", T::String, "Pull payment ID to archive")
        .example(
            "Archive pull payment",
            "Archive a pull payment and cancel pending payouts",
            json!({"storeId": "store123", "pullPaymentId": "pp_456"}),
        ),
        Route::delete("/stores/{storeId}/pull-payments/{pullPaymentId}"),
    )
    .route(
        pull_payment(
            "linkBoltcard",
            "Link a boltcard to a pull payment for NFC payments",
        )
        .required("boltcardData", T::Object, "Boltcard configuration")
        .example(
            "Link new boltcard",
            "Link a new boltcard to pull payment",
            json!({
                "pullPaymentId": "pp_456",
                "boltcardData": {"UID": "46ab87ff36a3b7", "onExisting": "UpdateVersion"}
            }),
        ),
        Route::post("/pull-payments/{pullPaymentId}/boltcards")
            .spread("boltcardData")
            .expect(Shape::Object),
    )
    .route(
        pull_payment("get", "Get pull payment details").example(
            "Get pull payment",
            "Retrieve pull payment information",
            json!({"pullPaymentId": "pp_456"}),
        ),
        Route::get("/pull-payments/{pullPaymentId}").expect(Shape::Object),
    )
    .route(
        pull_payment("getPayouts", "Get payouts for a pull payment")
            .with_default(
                "includeCancelled",
                T::Boolean,
                "Whether to include cancelled payouts",
                false,
            )
            .example(
                "Get active payouts",
                "Get all active payouts for a pull payment",
                json!({"pullPaymentId": "pp_456", "includeCancelled": false}),
            ),
        Route::get("/pull-payments/{pullPaymentId}/payouts").expect(Shape::Array),
    )
    .route(
        pull_payment("createPayout", "Create a new payout from a pull payment")
            .required("payoutData", T::Object, "Payout configuration")
            .example(
                "Create BTC payout",
                "Create a Bitcoin payout",
                json!({
                    "pullPaymentId": "pp_456",
                    "payoutData": {
                        "destination": "1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN2",
                        "amount": "1000.00",
                        "payoutMethodId": "BTC-CHAIN"
                    }
                }),
            )
            .example(
                "Create Lightning payout",
                "Create a Lightning Network payout",
                json!({
                    "pullPaymentId": "pp_456",
                    "payoutData": {
                        "destination": "lnbc100n1...",
                        "amount": "50.00",
                        "payoutMethodId": "BTC-LN"
                    }
                }),
            ),
        Route::post("/pull-payments/{pullPaymentId}/payouts")
            .spread("payoutData")
            .expect(Shape::Object),
    )
    .route(
        pull_payment("getPayout", "Get specific payout details")
            .required("payoutId", T::String, "Payout ID")
            .example(
                "Get payout details",
                "Retrieve specific payout information",
                json!({"pullPaymentId": "pp_456", "payoutId": "payout_789"}),
            ),
        Route::get("/pull-payments/{pullPaymentId}/payouts/{payoutId}").expect(Shape::Object),
    )
    .route(
        pull_payment(
            "getLNURL",
            "Get pull payment LNURL details for Lightning withdrawals",
        )
        .example(
            "Get LNURL details",
            "Get LNURL withdrawal information",
            json!({"pullPaymentId": "pp_456"}),
        ),
        Route::get("/pull-payments/{pullPaymentId}/lnurl").expect(Shape::Object),
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
    async fn create_spreads_configuration() {
        let recorder = Arc::new(Recorder::default());
        group(recorder.clone())
            .invoke(
                "create",
                args(json!({
                    "storeId": "s1",
                    "pullPaymentData": {"name": "Payroll", "amount": "10", "currency": "USD"}
                })),
            )
            .await
            .unwrap();

        let call = recorder.last();
        assert_eq!(call.path(), "/stores/s1/pull-payments");
        assert_eq!(
            call.body.unwrap(),
            json!({"name": "Payroll", "amount": "10", "currency": "USD"})
        );
    }

    #[tokio::test]
    async fn public_endpoints_need_no_store() {
        let recorder = Arc::new(Recorder::default());
        let group = group(recorder.clone());
        group
            .invoke("getLNURL", args(json!({"pullPaymentId": "pp1"})))
            .await
            .unwrap();
        assert_eq!(recorder.last().path(), "/pull-payments/pp1/lnurl");

        group
            .invoke("archive", args(json!({"storeId": "s1", "pullPaymentId": "pp1"})))
            .await
            .unwrap();
        let call = recorder.last();
        assert_eq!(call.method, Method::DELETE);
        assert_eq!(call.path(), "/stores/s1/pull-payments/pp1");
    }
}
