//! Server-level Lightning node

use std::sync::Arc;

use serde_json::json;

use crate::capability::{CapabilityGroup, OperationDescriptor as Op, ParamType as T, Route};
use crate::remote::{RemoteCollaborator, Shape};

const CRYPTO: &str = "The cryptoCode of the lightning-node to query";

fn crypto(op: Op, description: &str) -> Op {
    op.with_default("cryptoCode", T::String, description, "BTC")
}

pub fn group(remote: Arc<dyn RemoteCollaborator>) -> CapabilityGroup {
    CapabilityGroup::builder(
        "lightning-internal",
        "lightning",
        "Lightning Internal Node operations - server-level Lightning Network node management",
    )
    .route(
        crypto(
            Op::new("getNodeInfo", "Get Lightning node information"),
            "The cryptoCode of the lightning-node to query (e.g., BTC)",
        )
        .example(
            "Get BTC node info",
            "Get Bitcoin Lightning node information",
            json!({"cryptoCode": "BTC"}),
        ),
        Route::get("/server/lightning/{cryptoCode}/info").expect(Shape::Object),
    )
    .route(
        crypto(Op::new("getNodeBalance", "Get Lightning node balance"), CRYPTO).example(
            "Get node balance",
            "Get on-chain and off-chain balance",
            json!({"cryptoCode": "BTC"}),
        ),
        Route::get("/server/lightning/{cryptoCode}/balance").expect(Shape::Object),
    )
    .route(
        crypto(
            Op::new("getNodeHistogram", "Get Lightning node balance histogram"),
            CRYPTO,
        )
        .example(
            "Get balance histogram",
            "Get weekly balance histogram",
            json!({"cryptoCode": "BTC"}),
        ),
        Route::get("/server/lightning/{cryptoCode}/histogram").expect(Shape::Object),
    )
    .route(
        crypto(Op::new("connectToNode", "Connect to another Lightning node"), CRYPTO)
            .required("nodeURI", T::String, "Node URI in the form pubkey@endpoint[:port]")
            .example(
                "Connect to peer",
                "Connect to another Lightning node",
                json!({"cryptoCode": "BTC", "nodeURI": "03abcd1234@ln.example.com:9735"}),
            ),
        Route::post("/server/lightning/{cryptoCode}/connect"),
    )
    .route(
        crypto(Op::new("getChannels", "Get Lightning node channels"), CRYPTO).example(
            "List channels",
            "Get all Lightning channels",
            json!({"cryptoCode": "BTC"}),
        ),
        Route::get("/server/lightning/{cryptoCode}/channels").expect(Shape::Array),
    )
    .route(
        crypto(Op::new("openChannel", "Open a Lightning channel"), CRYPTO)
            .required("nodeURI", T::String, "Node URI to open channel with")
            .required("channelAmount", T::String, "The amount to fund (in satoshi)")
            .optional("feeRate", T::Number, "The fee rate (in satoshi per byte)")
            .example(
                "Open channel",
                "Open a Lightning channel with another node",
                json!({
                    "cryptoCode": "BTC",
                    "nodeURI": "03abcd1234@ln.example.com:9735",
                    "channelAmount": "1000000",
                    "feeRate": 10
                }),
            ),
        Route::post("/server/lightning/{cryptoCode}/channels"),
    )
    .route(
        crypto(Op::new("getDepositAddress", "Get on-chain deposit address"), CRYPTO).example(
            "Get deposit address",
            "Get an on-chain address for funding the Lightning node",
            json!({"cryptoCode": "BTC"}),
        ),
        Route::post("/server/lightning/{cryptoCode}/address"),
    )
    .route(
        crypto(Op::new("getPayment", "Get Lightning payment details"), CRYPTO)
            .required("paymentHash", T::String, "The payment hash of the Lightning payment")
            .example(
                "Get payment status",
                "Check the status of a Lightning payment",
                json!({"cryptoCode": "BTC", "paymentHash": "abcd1234..."}),
            ),
        Route::get("/server/lightning/{cryptoCode}/payments/{paymentHash}").expect(Shape::Object),
    )
    .route(
        crypto(Op::new("getInvoice", "Get Lightning invoice details"), CRYPTO)
            .required("invoiceId", T::String, "The ID of the Lightning invoice")
            .example(
                "Get invoice details",
                "Get details of a specific Lightning invoice",
                json!({"cryptoCode": "BTC", "invoiceId": "inv_123456"}),
            ),
        Route::get("/server/lightning/{cryptoCode}/invoices/{invoiceId}").expect(Shape::Object),
    )
    .route(
        crypto(Op::new("payInvoice", "Pay Lightning invoice"), CRYPTO)
            .required("bolt11", T::String, "The BOLT11 invoice to pay")
            .optional("amount", T::String, "Optional explicit payment amount in millisatoshi")
            .optional("maxFeePercent", T::String, "Fee limit as percentage of payment amount")
            .optional("maxFeeFlat", T::String, "Fee limit as fixed amount in satoshi")
            .with_default("sendTimeout", T::Number, "Payment timeout in seconds", 30)
            .example(
                "Pay invoice",
                "Pay a Lightning invoice with fee limits",
                json!({
                    "cryptoCode": "BTC",
                    "bolt11": "lnbc100u1p3...",
                    "maxFeePercent": "1.0",
                    "sendTimeout": 60
                }),
            ),
        Route::post("/server/lightning/{cryptoCode}/invoices/pay")
            .rename("bolt11", "BOLT11")
            .expect(Shape::Object),
    )
    .route(
        crypto(Op::new("getInvoices", "List Lightning invoices"), CRYPTO)
            .with_default("pendingOnly", T::Boolean, "Limit to pending invoices only", false)
            .with_default("offsetIndex", T::Number, "Index to start the list from", 0)
            .example(
                "List all invoices",
                "Get all Lightning invoices",
                json!({"cryptoCode": "BTC"}),
            )
            .example(
                "List pending invoices",
                "Get only pending Lightning invoices",
                json!({"cryptoCode": "BTC", "pendingOnly": true}),
            ),
        Route::get("/server/lightning/{cryptoCode}/invoices").expect(Shape::Array),
    )
    .route(
        crypto(Op::new("createInvoice", "Create Lightning invoice"), CRYPTO)
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
                "Create invoice",
                "Create a new Lightning invoice",
                json!({
                    "cryptoCode": "BTC",
                    "amount": "100000",
                    "description": "Payment for services",
                    "expiry": 3600
                }),
            ),
        Route::post("/server/lightning/{cryptoCode}/invoices").expect(Shape::Object),
    )
    .route(
        crypto(Op::new("getPayments", "List Lightning payments"), CRYPTO)
            .with_default("includePending", T::Boolean, "Include pending payments", false)
            .with_default("offsetIndex", T::Number, "Index to start the list from", 0)
            .example(
                "List all payments",
                "Get all Lightning payments",
                json!({"cryptoCode": "BTC"}),
            )
            .example(
                "List with pending",
                "Get payments including pending ones",
                json!({"cryptoCode": "BTC", "includePending": true}),
            ),
        Route::get("/server/lightning/{cryptoCode}/payments").expect(Shape::Array),
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
    async fn crypto_code_defaults_to_btc() {
        let recorder = Arc::new(Recorder::default());
        group(recorder.clone())
            .invoke("getNodeInfo", Arguments::new())
            .await
            .unwrap();
        assert_eq!(recorder.last().path(), "/server/lightning/BTC/info");
    }

    #[tokio::test]
    async fn pay_invoice_uses_upstream_field_name() {
        let recorder = Arc::new(Recorder::default());
        group(recorder.clone())
            .invoke("payInvoice", args(json!({"bolt11": "lnbc1..."})))
            .await
            .unwrap();

        let call = recorder.last();
        assert_eq!(call.path(), "/server/lightning/BTC/invoices/pay");
        assert_eq!(call.body.unwrap(), json!({"BOLT11": "lnbc1...", "sendTimeout": 30}));
    }

    #[tokio::test]
    async fn invoice_listing_sends_defaults_as_query() {
        let recorder = Arc::new(Recorder::default());
        group(recorder.clone())
            .invoke("getInvoices", args(json!({"cryptoCode": "LTC", "pendingOnly": true})))
            .await
            .unwrap();

        let call = recorder.last();
        assert_eq!(call.path(), "/server/lightning/LTC/invoices");
        assert_eq!(
            call.query,
            vec![
                ("pendingOnly".to_string(), "true".to_string()),
                ("offsetIndex".to_string(), "0".to_string()),
            ]
        );
    }
}
