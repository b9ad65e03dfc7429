//! Stores: lifecycle, checkout settings, payment methods and rates

use std::sync::Arc;

use reqwest::Method;
use serde_json::{Map, Value, json};

use super::required_text;
use crate::capability::{
    CapabilityGroup, Invocation, OperationDescriptor as Op, ParamType as T, Route,
};
use crate::remote::{RemoteCall, RemoteCollaborator, Shape};

pub fn group(remote: Arc<dyn RemoteCollaborator>) -> CapabilityGroup {
    CapabilityGroup::builder(
        "stores",
        "store-management",
        "Manage BTCPayServer stores - create, retrieve, update, delete stores and manage payment methods and rates",
    )
    .route(create(), Route::post("/stores").expect(Shape::Object))
    .route(
        Op::new("get", "Get details of a specific store")
            .required("storeId", T::String, "Store ID to retrieve")
            .example(
                "Get store details",
                "Retrieve information about a specific store",
                json!({"storeId": "store123"}),
            ),
        Route::get("/stores/{storeId}").expect(Shape::Object),
    )
    .route(
        Op::new("list", "List all stores accessible to the current user").example(
            "List all stores",
            "Get all stores you have access to",
            json!({}),
        ),
        Route::get("/stores").expect(Shape::Array),
    )
    .route(
        Op::new("update", "Update an existing store")
            .required("storeId", T::String, "Store ID to update")
            .optional("name", T::String, "Store name")
            .optional("website", T::String, "Store website URL")
            .optional("defaultCurrency", T::String, "Default currency for the store")
            .optional("invoiceExpiration", T::Number, "Invoice expiration time in minutes")
            .optional(
                "speedPolicy",
                T::String,
                "Speed policy (HighSpeed, MediumSpeed, LowMediumSpeed, LowSpeed)",
            )
            .example(
                "Update store name",
                "Change the store name and website",
                json!({
                    "storeId": "store123",
                    "name": "Updated Store Name",
                    "website": "https://newdomain.com"
                }),
            ),
        Route::put("/stores/{storeId}").expect(Shape::Object),
    )
    .route(
        Op::new("delete", "Delete a store")
            .required("storeId", T::String, "Store ID to delete")
            .example(
                "Delete store",
                "Permanently delete a store",
                json!({"storeId": "store123"}),
            ),
        Route::delete("/stores/{storeId}"),
    )
    .route(
        Op::new("getPaymentMethods", "Get payment methods configured for a store")
            .required("storeId", T::String, "Store ID")
            .optional("enabled", T::Boolean, "Filter by enabled status")
            .example(
                "Get all payment methods",
                "List all payment methods for a store",
                json!({"storeId": "store123"}),
            )
            .example(
                "Get enabled payment methods",
                "List only enabled payment methods",
                json!({"storeId": "store123", "enabled": true}),
            ),
        Route::get("/stores/{storeId}/payment-methods").expect(Shape::Array),
    )
    .custom(
        Op::new("updatePaymentMethod", "Update a payment method for a store")
            .required("storeId", T::String, "Store ID")
            .required("cryptoCode", T::String, "Cryptocurrency code (e.g., BTC, LTC)")
            .optional("enabled", T::Boolean, "Whether the payment method is enabled")
            .optional("derivationScheme", T::String, "Derivation scheme for the payment method")
            .optional("label", T::String, "Label for the payment method")
            .example(
                "Enable Bitcoin payments",
                "Enable Bitcoin payment method with derivation scheme",
                json!({
                    "storeId": "store123",
                    "cryptoCode": "BTC",
                    "enabled": true,
                    "derivationScheme": "xpub661...",
                    "label": "Main Bitcoin Wallet"
                }),
            ),
        update_payment_method,
    )
    .route(
        Op::new("getRates", "Get exchange rates for a store")
            .required("storeId", T::String, "Store ID")
            .optional(
                "currencyPairs",
                T::Array,
                "Array of currency pairs (e.g., [\"BTC_USD\", \"BTC_EUR\"])",
            )
            .example(
                "Get BTC rates",
                "Get Bitcoin exchange rates",
                json!({"storeId": "store123", "currencyPairs": ["BTC_USD", "BTC_EUR"]}),
            ),
        Route::get("/stores/{storeId}/rates")
            .rename("currencyPairs", "currencyPair")
            .expect(Shape::Array),
    )
    .route(
        Op::new("previewRates", "Preview exchange rates with custom configuration")
            .required("storeId", T::String, "Store ID")
            .required("currencyPairs", T::Array, "Array of currency pairs to preview")
            .optional("script", T::String, "Rate script to preview")
            .example(
                "Preview custom rates",
                "Preview rates with custom script",
                json!({
                    "storeId": "store123",
                    "currencyPairs": ["BTC_USD"],
                    "script": "coinbase(X_Y) * 1.02"
                }),
            ),
        Route::post("/stores/{storeId}/rates/preview")
            .query(&["currencyPairs"])
            .rename("currencyPairs", "currencyPair")
            .rename("script", "effectiveScript")
            .expect(Shape::Array),
    )
    .route(
        Op::new("getRateConfiguration", "Get rate configuration for a store")
            .required("storeId", T::String, "Store ID")
            .example(
                "Get rate config",
                "Get current rate configuration",
                json!({"storeId": "store123"}),
            ),
        Route::get("/stores/{storeId}/rates/configuration").expect(Shape::Object),
    )
    .route(
        Op::new("updateRateConfiguration", "Update rate configuration for a store")
            .required("storeId", T::String, "Store ID")
            .optional("script", T::String, "Rate script")
            .optional("effectiveScript", T::String, "Effective rate script")
            .optional("spread", T::Number, "Spread percentage")
            .example(
                "Update rate script",
                "Set custom rate calculation script",
                json!({"storeId": "store123", "script": "coinbase(X_Y) * 1.05", "spread": 2.0}),
            ),
        Route::put("/stores/{storeId}/rates/configuration").expect(Shape::Object),
    )
    .route(
        Op::new("uploadLogo", "Upload a logo for the store")
            .required("storeId", T::String, "Store ID")
            .required("file", T::String, "Logo file data (binary)")
            .example(
                "Upload store logo",
                "Upload a logo image for the store",
                json!({"storeId": "store123", "file": "binary_file_data"}),
            ),
        Route::post("/stores/{storeId}/logo"),
    )
    .route(
        Op::new("deleteLogo", "Delete the store logo")
            .required("storeId", T::String, "Store ID")
            .example(
                "Delete store logo",
                "Remove the store's logo",
                json!({"storeId": "store123"}),
            ),
        Route::delete("/stores/{storeId}/logo"),
    )
    .route(
        Op::new("getRoles", "Get store roles")
            .required("storeId", T::String, "Store ID")
            .example(
                "Get store roles",
                "Get information about the store's available roles",
                json!({"storeId": "store123"}),
            ),
        Route::get("/stores/{storeId}/roles"),
    )
    .build(remote)
}

fn create() -> Op {
    Op::new("create", "Create a new BTCPayServer store with comprehensive settings")
        .required("name", T::String, "The name of the store")
        .optional("website", T::String, "The absolute url of the store")
        .optional(
            "supportUrl",
            T::String,
            "The support URI of the store, can contain placeholders {OrderId} and {InvoiceId}",
        )
        .optional("logoUrl", T::String, "Absolute URL to a logo file or fileid:ID reference")
        .optional("cssUrl", T::String, "Absolute URL to CSS file or fileid:ID reference")
        .optional(
            "paymentSoundUrl",
            T::String,
            "Absolute URL to a sound file or fileid:ID reference",
        )
        .optional("brandColor", T::String, "The brand color of the store in HEX format")
        .with_default(
            "applyBrandColorToBackend",
            T::Boolean,
            "Apply the brand color to the store's backend as well",
            false,
        )
        .with_default("defaultCurrency", T::String, "The default currency of the store", "USD")
        .optional(
            "additionalTrackedRates",
            T::Array,
            "Additional rates to track (e.g., [\"EUR\", \"JPY\"])",
        )
        .with_default(
            "invoiceExpiration",
            T::Number,
            "Invoice expiration time in seconds (60-2073600)",
            900,
        )
        .with_default(
            "refundBOLT11Expiration",
            T::Number,
            "Minimum expiry of BOLT11 invoices for refunds in days (0-3650)",
            30,
        )
        .with_default(
            "displayExpirationTimer",
            T::Number,
            "Time left to trigger countdown timer in seconds (60-2073600)",
            300,
        )
        .with_default(
            "monitoringExpiration",
            T::Number,
            "Monitoring expiration time in seconds (600-2073600)",
            86_400,
        )
        .with_default(
            "speedPolicy",
            T::String,
            "Speed policy (HighSpeed, MediumSpeed, LowMediumSpeed, LowSpeed)",
            "MediumSpeed",
        )
        .optional(
            "lightningDescriptionTemplate",
            T::String,
            "BOLT11 description template with placeholders {StoreName}, {ItemDescription}, {OrderId}",
        )
        .with_default("paymentTolerance", T::Number, "Payment tolerance percentage (0-100)", 0)
        .with_default(
            "archived",
            T::Boolean,
            "If true, store does not appear in stores list by default",
            false,
        )
        .with_default(
            "anyoneCanCreateInvoice",
            T::Boolean,
            "If true, no authentication needed to create invoices",
            false,
        )
        .with_default(
            "lightningAmountInSatoshi",
            T::Boolean,
            "Show lightning amounts in satoshi",
            false,
        )
        .with_default(
            "lightningPrivateRouteHints",
            T::Boolean,
            "Include private route hints in lightning payments",
            false,
        )
        .with_default(
            "onChainWithLnInvoiceFallback",
            T::Boolean,
            "Unify on-chain and lightning payment URLs",
            false,
        )
        .with_default(
            "redirectAutomatically",
            T::Boolean,
            "Auto-redirect after successful payment",
            false,
        )
        .with_default(
            "showRecommendedFee",
            T::Boolean,
            "Show recommended fee in checkout",
            true,
        )
        .with_default(
            "recommendedFeeBlockTarget",
            T::Number,
            "Fee rate recommendation for confirmation target blocks",
            1,
        )
        .with_default("defaultLang", T::String, "Default language for checkout page", "en")
        .optional("htmlTitle", T::String, "HTML title of the checkout page")
        .with_default(
            "networkFeeMode",
            T::String,
            "Network fee mode (Always, MultiplePaymentsOnly, Never)",
            "Always",
        )
        .with_default(
            "payJoinEnabled",
            T::Boolean,
            "Enable payjoin in checkout if possible",
            false,
        )
        .with_default(
            "autoDetectLanguage",
            T::Boolean,
            "Adapt checkout language to browser settings",
            false,
        )
        .with_default(
            "showPayInWalletButton",
            T::Boolean,
            "Show \"Pay in wallet\" button (Checkout V2)",
            true,
        )
        .with_default(
            "showStoreHeader",
            T::Boolean,
            "Show store header on checkout page (Checkout V2)",
            true,
        )
        .with_default(
            "celebratePayment",
            T::Boolean,
            "Celebrate payments with confetti (Checkout V2)",
            true,
        )
        .with_default(
            "playSoundOnPayment",
            T::Boolean,
            "Enable sounds on checkout page (Checkout V2)",
            false,
        )
        .with_default(
            "lazyPaymentMethods",
            T::Boolean,
            "Enable payment methods individually upon user interaction",
            false,
        )
        .optional(
            "defaultPaymentMethod",
            T::String,
            "Default payment method (e.g., BTC-CHAIN, BTC-LN)",
        )
        .optional("receipt", T::Object, "Additional settings to customize the public receipt")
        .optional(
            "paymentMethodCriteria",
            T::Object,
            "Criteria required to activate specific payment methods",
        )
        .example(
            "Basic store",
            "Create a basic store with minimal settings",
            json!({"name": "My Bitcoin Store", "website": "https://mystore.com", "defaultCurrency": "USD"}),
        )
        .example(
            "Advanced store",
            "Create a store with custom settings",
            json!({
                "name": "Lightning Fast Store",
                "website": "https://lightningstore.com",
                "defaultCurrency": "EUR",
                "invoiceExpiration": 30,
                "speedPolicy": "HighSpeed",
                "paymentTolerance": 2.5
            }),
        )
}

/// Wallet details travel nested under `config`
async fn update_payment_method(inv: Invocation) -> crate::Result<Value> {
    let store = required_text(&inv.args, "storeId", "updatePaymentMethod")?;
    let method = required_text(&inv.args, "cryptoCode", "updatePaymentMethod")?;

    let present = |name: &str| inv.args.get(name).filter(|v| !v.is_null()).cloned();
    let config: Map<String, Value> = ["derivationScheme", "label"]
        .into_iter()
        .filter_map(|name| present(name).map(|v| (name.to_string(), v)))
        .collect();

    let mut body = Map::new();
    if let Some(enabled) = present("enabled") {
        body.insert("enabled".to_string(), enabled);
    }
    if !config.is_empty() {
        body.insert("config".to_string(), Value::Object(config));
    }

    let mut call = RemoteCall::new(
        inv.procedure,
        Method::PUT,
        vec!["stores".into(), store, "payment-methods".into(), method],
    );
    call.body = Some(Value::Object(body));
    call.shape = Shape::Object;
    inv.remote.call(call).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::Arguments;
    use crate::remote::testing::Recorder;

    fn args(value: Value) -> Arguments {
        value.as_object().cloned().unwrap_or_default()
    }

    #[tokio::test]
    async fn create_sends_checkout_defaults() {
        let recorder = Arc::new(Recorder::default());
        group(recorder.clone())
            .invoke("create", args(json!({"name": "Shop", "speedPolicy": "HighSpeed"})))
            .await
            .unwrap();

        let call = recorder.last();
        assert_eq!(call.path(), "/stores");
        let body = call.body.unwrap();
        assert_eq!(body["name"], "Shop");
        assert_eq!(body["speedPolicy"], "HighSpeed");
        assert_eq!(body["defaultCurrency"], "USD");
        assert_eq!(body["invoiceExpiration"], 900);
        assert_eq!(body["showRecommendedFee"], true);
        assert!(body.get("website").is_none());
    }

    #[tokio::test]
    async fn payment_method_update_accepts_numeric_ids() {
        let recorder = Arc::new(Recorder::default());
        group(recorder.clone())
            .invoke(
                "updatePaymentMethod",
                args(json!({"storeId": 42, "cryptoCode": "BTC", "enabled": true})),
            )
            .await
            .unwrap();

        assert_eq!(recorder.last().path(), "/stores/42/payment-methods/BTC");
    }

    #[tokio::test]
    async fn payment_method_update_nests_config() {
        let recorder = Arc::new(Recorder::default());
        group(recorder.clone())
            .invoke(
                "updatePaymentMethod",
                args(json!({
                    "storeId": "s1",
                    "cryptoCode": "BTC",
                    "enabled": false,
                    "label": "Cold"
                })),
            )
            .await
            .unwrap();

        let call = recorder.last();
        assert_eq!(call.method, Method::PUT);
        assert_eq!(call.path(), "/stores/s1/payment-methods/BTC");
        assert_eq!(
            call.body.unwrap(),
            json!({"enabled": false, "config": {"label": "Cold"}})
        );
    }

    #[tokio::test]
    async fn preview_rates_splits_query_and_body() {
        let recorder = Arc::new(Recorder::default());
        group(recorder.clone())
            .invoke(
                "previewRates",
                args(json!({"storeId": "s1", "currencyPairs": ["BTC_USD"], "script": "x"})),
            )
            .await
            .unwrap();

        let call = recorder.last();
        assert_eq!(call.query, vec![("currencyPair".to_string(), "BTC_USD".to_string())]);
        assert_eq!(call.body.unwrap(), json!({"effectiveScript": "x"}));
    }
}
