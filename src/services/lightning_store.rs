//! Store-scoped Lightning node

use std::sync::Arc;

use serde_json::json;

use crate::capability::{CapabilityGroup, OperationDescriptor as Op, ParamType as T, Route};
use crate::remote::{RemoteCollaborator, Shape};

const CRYPTO: &str = "The cryptoCode of the lightning-node to query";

/// Every operation is addressed by store and crypto code
fn node(name: &str, description: &str) -> Op {
    Op::new(name, description)
        .required("storeId", T::String, "Store ID")
        .with_default("cryptoCode", T::String, CRYPTO, "BTC")
}

pub fn group(remote: Arc<dyn RemoteCollaborator>) -> CapabilityGroup {
    CapabilityGroup::builder(
        "lightning-store",
        "lightning",
        "Lightning Store operations - store-specific Lightning Network node management",
    )
    .route(
        node("getNodeInfo", "Get store Lightning node information").example(
            "Get store node info",
            "Get Bitcoin Lightning node information for a store",
            json!({"storeId": "store123", "cryptoCode": "BTC"}),
        ),
        Route::get("/stores/{storeId}/lightning/{cryptoCode}/info").expect(Shape::Object),
    )
    .route(
        node("getNodeBalance", "Get store Lightning node balance").example(
            "Get store node balance",
            "Get on-chain and off-chain balance for store",
            json!({"storeId": "store123", "cryptoCode": "BTC"}),
        ),
        Route::get("/stores/{storeId}/lightning/{cryptoCode}/balance").expect(Shape::Object),
    )
    .route(
        node("getNodeHistogram", "Get store Lightning node balance histogram").example(
            "Get store balance histogram",
            "Get weekly balance histogram for store",
            json!({"storeId": "store123", "cryptoCode": "BTC"}),
        ),
        Route::get("/stores/{storeId}/lightning/{cryptoCode}/histogram").expect(Shape::Object),
    )
    .route(
        node("connectToNode", "Connect to another Lightning node")
            .required("nodeURI", T::String, "Node URI in the form pubkey@endpoint[:port]")
            .example(
                "Connect store to peer",
                "Connect store Lightning node to another node",
                json!({
                    "storeId": "store123",
                    "cryptoCode": "BTC",
                    "nodeURI": "03abcd1234@ln.example.com:9735"
                }),
            ),
        Route::post("/stores/{storeId}/lightning/{cryptoCode}/connect"),
    )
    .route(
        node("getChannels", "Get store Lightning node channels").example(
            "List store channels",
            "Get all Lightning channels for store",
            json!({"storeId": "store123", "cryptoCode": "BTC"}),
        ),
        Route::get("/stores/{storeId}/lightning/{cryptoCode}/channels").expect(Shape::Array),
    )
    .route(
        node("openChannel", "Open a Lightning channel")
            .required("nodeURI", T::String, "Node URI to open channel with")
            .required("channelAmount", T::String, "The amount to fund (in satoshi)")
            .optional("feeRate", T::Number, "The fee rate (in satoshi per byte)")
            .example(
                "Open store channel",
                "Open a Lightning channel from store node",
                json!({
                    "storeId": "store123",
                    "cryptoCode": "BTC",
                    "nodeURI": "03abcd1234@ln.example.com:9735",
                    "channelAmount": "1000000",
                    "feeRate": 10
                }),
            ),
        Route::post("/stores/{storeId}/lightning/{cryptoCode}/channels"),
    )
    .route(
        node("getDepositAddress", "Get on-chain deposit address").example(
            "Get store deposit address",
            "Get an on-chain address for funding the store Lightning node",
            json!({"storeId": "store123", "cryptoCode": "BTC"}),
        ),
        Route::post("/stores/{storeId}/lightning/{cryptoCode}/address"),
    )
    .route(
        node("getPayment", "Get Lightning payment details")
            .required("paymentHash", T::String, "The payment hash of the Lightning payment")
            .example(
                "Get store payment status",
                "Check the status of a store Lightning payment",
                json!({"storeId": "store123", "cryptoCode": "BTC", "paymentHash": "abcd1234..."}),
            ),
        Route::get("/stores/{storeId}/lightning/{cryptoCode}/payments/{paymentHash}")
            .expect(Shape::Object),
    )
    .route(
        node("getInvoice", "Get Lightning invoice details")
            .required("invoiceId", T::String, "The ID of the Lightning invoice")
            .example(
                "Get store invoice details",
                "Get details of a specific store Lightning invoice",
                json!({"storeId": "store123", "cryptoCode": "BTC", "invoiceId": "inv_123456"}),
            ),
        Route::get("/stores/{storeId}/lightning/{cryptoCode}/invoices/{invoiceId}")
            .expect(Shape::Object),
    )
    .route(
        node("payInvoice", "Pay Lightning invoice")
            .required("bolt11", T::String, "The BOLT11 invoice to pay")
            .optional("amount", T::String, "Optional explicit payment amount in millisatoshi")
            .optional("maxFeePercent", T::String, "Fee limit as percentage of payment amount")
            .optional("maxFeeFlat", T::String, "Fee limit as fixed amount in satoshi")
            .with_default("sendTimeout", T::Number, "Payment timeout in seconds", 30)
            .example(
                "Pay invoice from store",
                "Pay a Lightning invoice from store node with fee limits",
                json!({
                    "storeId": "store123",
                    "cryptoCode": "BTC",
                    "bolt11": "lnbc100u1p3...",
                    "maxFeePercent": "1.0",
                    "sendTimeout": 60
                }),
            ),
        Route::post("/stores/{storeId}/lightning/{cryptoCode}/invoices/pay")
            .rename("bolt11", "BOLT11")
            .expect(Shape::Object),
    )
    .route(
        node("getInvoices", "List Lightning invoices")
            .with_default("pendingOnly", T::Boolean, "Limit to pending invoices only", false)
            .with_default("offsetIndex", T::Number, "Index to start the list from", 0)
            .example(
                "List store invoices",
                "Get all Lightning invoices for store",
                json!({"storeId": "store123", "cryptoCode": "BTC"}),
            )
            .example(
                "List pending store invoices",
                "Get only pending Lightning invoices for store",
                json!({"storeId": "store123", "cryptoCode": "BTC", "pendingOnly": true}),
            ),
        Route::get("/stores/{storeId}/lightning/{cryptoCode}/invoices").expect(Shape::Array),
    )
    .route(
        node("createInvoice", "Create Lightning invoice")
            .required(
                "amount",
                T::String,
                "Amount in millisatoshi (1000 millisatoshi = 1 satoshi)",
            )
            .optional("description", T::String, "Description of the invoice")
            .with_default(
                "descriptionHashOnly",
                T::Boolean,
                "Use description hash instead of full description",
                false,
            )
            .required("expiry", T::Number, "Expiration time in seconds")
            .with_default("privateRouteHints", T::Boolean, "Include private route hints", false)
            .example(
                "Create store invoice",
                "Create a new Lightning invoice for store",
                json!({
                    "storeId": "store123",
                    "cryptoCode": "BTC",
                    "amount": "100000",
                    "description": "Payment for services",
                    "expiry": 3600
                }),
            ),
        Route::post("/stores/{storeId}/lightning/{cryptoCode}/invoices").expect(Shape::Object),
    )
    .route(
        node("getPayments", "List Lightning payments")
            .with_default("includePending", T::Boolean, "Include pending payments", false)
            .with_default("offsetIndex", T::Number, "Index to start the list from", 0)
            .example(
                "List store payments",
                "Get all Lightning payments for store",
                json!({"storeId": "store123", "cryptoCode": "BTC"}),
            )
            .example(
                "List store payments with pending",
                "Get payments including pending ones for store",
                json!({"storeId": "store123", "cryptoCode": "BTC", "includePending": true}),
            ),
        Route::get("/stores/{storeId}/lightning/{cryptoCode}/payments").expect(Shape::Array),
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
    async fn open_channel_body_excludes_path_parameters() {
        let recorder = Arc::new(Recorder::default());
        group(recorder.clone())
            .invoke(
                "openChannel",
                args(json!({"storeId": "s1", "nodeURI": "03ab@host:9735", "channelAmount": "50000"})),
            )
            .await
            .unwrap();

        let call = recorder.last();
        assert_eq!(call.path(), "/stores/s1/lightning/BTC/channels");
        assert_eq!(
            call.body.unwrap(),
            json!({"nodeURI": "03ab@host:9735", "channelAmount": "50000"})
        );
    }

    #[tokio::test]
    async fn create_invoice_requires_expiry() {
        let recorder = Arc::new(Recorder::default());
        let err = group(recorder.clone())
            .invoke("createInvoice", args(json!({"storeId": "s1", "amount": "1000"})))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("'expiry'"));
        assert_eq!(recorder.count(), 0);
    }
}
