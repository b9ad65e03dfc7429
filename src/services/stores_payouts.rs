//! Store payouts: creation, approval and state changes

use std::sync::Arc;

use serde_json::json;

use crate::capability::{CapabilityGroup, OperationDescriptor as Op, ParamType as T, Route};
use crate::remote::{RemoteCollaborator, Shape};

fn payout(name: &str, description: &str) -> Op {
    Op::new(name, description)
        .required("storeId", T::String, "Store ID")
        .required("payoutId", T::String, "The ID of the payout")
}

pub fn group(remote: Arc<dyn RemoteCollaborator>) -> CapabilityGroup {
    CapabilityGroup::builder(
        "stores-payouts",
        "store-management",
        "Store payouts operations - manage pull payment payouts, approvals, and state changes",
    )
    .route(
        Op::new("createPayout", "Create a new payout")
            .required("storeId", T::String, "Store ID")
            .required(
                "destination",
                T::String,
                "The destination of the payout (can be an address or a BIP21 url)",
            )
            .required(
                "amount",
                T::String,
                "The amount of the payout in the currency of the pull payment (eg. USD)",
            )
            .required("payoutMethodId", T::String, "Payout method ID (BTC-CHAIN, BTC-LN)")
            .optional(
                "pullPaymentId",
                T::String,
                "The pull payment to create this for (optional)",
            )
            .optional(
                "approved",
                T::Boolean,
                "Whether to approve this payout automatically upon creation",
            )
            .optional("metadata", T::Object, "Additional metadata to store with the payout")
            .example(
                "Create Bitcoin payout",
                "Create a new Bitcoin on-chain payout",
                json!({
                    "storeId": "store123",
                    "destination": "1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN2",
                    "amount": "100.50",
                    "payoutMethodId": "BTC-CHAIN",
                    "approved": true
                }),
            )
            .example(
                "Create Lightning payout",
                "Create a new Lightning Network payout",
                json!({
                    "storeId": "store123",
                    "destination": "lnbc100u1p3...",
                    "amount": "25.00",
                    "payoutMethodId": "BTC-LN",
                    "pullPaymentId": "pullpay123",
                    "metadata": {"source": "API payout", "note": "Weekly payment"}
                }),
            ),
        Route::post("/stores/{storeId}/payouts").expect(Shape::Object),
    )
    .route(
        Op::new("getPayouts", "Get store payouts")
            .required("storeId", T::String, "Store ID")
            .with_default(
                "includeCancelled",
                T::Boolean,
                "Whether to include cancelled payouts",
                false,
            )
            .example(
                "Get all payouts",
                "Get all payouts for the store",
                json!({"storeId": "store123"}),
            )
            .example(
                "Get payouts including cancelled",
                "Get all payouts including cancelled ones",
                json!({"storeId": "store123", "includeCancelled": true}),
            ),
        Route::get("/stores/{storeId}/payouts").expect(Shape::Array),
    )
    .route(
        payout("getPayout", "Get specific payout").example(
            "Get payout details",
            "Get details of a specific payout",
            json!({"storeId": "store123", "payoutId": "payout456"}),
        ),
        Route::get("/stores/{storeId}/payouts/{payoutId}").expect(Shape::Object),
    )
    .route(
        payout("approvePayout", "Approve a payout")
            .required(
                "revision",
                T::Number,
                "The revision number of the payout being modified",
            )
            .optional(
                "rateRule",
                T::String,
                "The rate rule to calculate the rate of the payout",
            )
            .example(
                "Approve payout",
                "Approve a payout for processing",
                json!({
                    "storeId": "store123",
                    "payoutId": "payout456",
                    "revision": 0,
                    "rateRule": "kraken(BTC_USD)"
                }),
            ),
        Route::post("/stores/{storeId}/payouts/{payoutId}").expect(Shape::Object),
    )
    .route(
        payout("cancelPayout", "Cancel the payout").example(
            "Cancel payout",
            "Cancel a pending payout",
            json!({"storeId": "store123", "payoutId": "payout456"}),
        ),
        Route::delete("/stores/{storeId}/payouts/{payoutId}"),
    )
    .route(
        payout("markPayoutPaid", "Mark a payout as paid").example(
            "Mark payout as paid",
            "Mark a payout as completed/paid",
            json!({"storeId": "store123", "payoutId": "payout456"}),
        ),
        Route::post("/stores/{storeId}/payouts/{payoutId}/mark-paid"),
    )
    .route(
        payout("markPayout", "Mark a payout with a specific state")
            .required(
                "state",
                T::String,
                "The state of the payout (AwaitingApproval, AwaitingPayment, InProgress, Completed, Cancelled)",
            )
            .optional(
                "paymentProof",
                T::Object,
                "Additional information about how the payout is being paid out",
            )
            .example(
                "Mark payout in progress",
                "Mark a payout as in progress with payment proof",
                json!({
                    "storeId": "store123",
                    "payoutId": "payout456",
                    "state": "InProgress",
                    "paymentProof": {"id": "tx123", "proofType": "transaction"}
                }),
            ),
        Route::post("/stores/{storeId}/payouts/{payoutId}/mark"),
    )
    .build(remote)
}
