//! Store exchange rates and rate-source configuration

use std::sync::Arc;

use serde_json::json;

use crate::capability::{CapabilityGroup, OperationDescriptor as Op, ParamType as T, Route};
use crate::remote::{RemoteCollaborator, Shape};

const RATE_SOURCE: &str = "The rate source to configure (primary or fallback)";
const SPREAD: &str = "A spread applies to the rate fetched in %. Must be >= 0 or <= 100";
const PREFERRED: &str = "When isCustomScript is false, uses this source in the default script";
const CUSTOM: &str = "Whether to use preferredSource with default script or a custom script";
const SCRIPT: &str = "Custom script used to calculate exchange rates (when isCustomScript is true)";

/// Rate settings shared by update and preview
fn rate_settings(op: Op) -> Op {
    op.optional("spread", T::String, SPREAD)
        .optional("preferredSource", T::String, PREFERRED)
        .optional("isCustomScript", T::Boolean, CUSTOM)
        .optional("effectiveScript", T::String, SCRIPT)
}

pub fn group(remote: Arc<dyn RemoteCollaborator>) -> CapabilityGroup {
    CapabilityGroup::builder(
        "stores-rates",
        "store-management",
        "Store rates operations - manage exchange rates and rate configurations",
    )
    .route(
        Op::new("getRates", "Get rates on the store")
            .required("storeId", T::String, "Store ID")
            .optional(
                "currencyPair",
                T::Array,
                "The currency pairs to fetch rates for (e.g., [\"BTC_USD\", \"BTC_EUR\"])",
            )
            .example(
                "Get all rates",
                "Get all available exchange rates for the store",
                json!({"storeId": "store123"}),
            )
            .example(
                "Get specific currency rates",
                "Get rates for specific currency pairs",
                json!({"storeId": "store123", "currencyPair": ["BTC_USD", "BTC_EUR", "BTC_JPY"]}),
            ),
        Route::get("/stores/{storeId}/rates").expect(Shape::Array),
    )
    .route(
        Op::new(
            "getRateConfiguration",
            "Get store rate settings for the specified rate source",
        )
        .required("storeId", T::String, "Store ID")
        .with_default("rateSource", T::String, RATE_SOURCE, "primary")
        .example(
            "Get primary rate config",
            "Get primary rate source configuration",
            json!({"storeId": "store123", "rateSource": "primary"}),
        )
        .example(
            "Get fallback rate config",
            "Get fallback rate source configuration",
            json!({"storeId": "store123", "rateSource": "fallback"}),
        ),
        Route::get("/stores/{storeId}/rates/configuration/{rateSource}").expect(Shape::Object),
    )
    .route(
        rate_settings(
            Op::new(
                "updateRateConfiguration",
                "Update rate settings for the specified store and rate source",
            )
            .required("storeId", T::String, "Store ID")
            .with_default("rateSource", T::String, RATE_SOURCE, "primary"),
        )
        .example(
            "Set custom rate script",
            "Configure a custom rate calculation script",
            json!({
                "storeId": "store123",
                "rateSource": "primary",
                "spread": "2.5",
                "isCustomScript": true,
                "effectiveScript": "coinbase(X_Y) * 1.025"
            }),
        )
        .example(
            "Use preferred source",
            "Configure using a preferred rate source",
            json!({
                "storeId": "store123",
                "rateSource": "primary",
                "spread": "1.0",
                "preferredSource": "kraken",
                "isCustomScript": false
            }),
        ),
        Route::put("/stores/{storeId}/rates/configuration/{rateSource}").expect(Shape::Object),
    )
    .route(
        rate_settings(
            Op::new(
                "previewRateConfiguration",
                "Preview rate configuration results before applying them",
            )
            .required("storeId", T::String, "Store ID")
            .optional("currencyPair", T::Array, "The currency pairs to preview"),
        )
        .example(
            "Preview custom script",
            "Preview results of a custom rate script",
            json!({
                "storeId": "store123",
                "currencyPair": ["BTC_USD"],
                "spread": "3.0",
                "isCustomScript": true,
                "effectiveScript": "binance(X_Y) * 1.03"
            }),
        )
        .example(
            "Preview rate source change",
            "Preview switching to a different rate source",
            json!({
                "storeId": "store123",
                "currencyPair": ["BTC_USD", "BTC_EUR"],
                "spread": "1.5",
                "preferredSource": "coinbase",
                "isCustomScript": false
            }),
        ),
        Route::post("/stores/{storeId}/rates/preview")
            .query(&["currencyPair"])
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
    async fn configuration_defaults_to_primary_source() {
        let recorder = Arc::new(Recorder::default());
        let group = group(recorder.clone());
        group
            .invoke("getRateConfiguration", args(json!({"storeId": "s1"})))
            .await
            .unwrap();
        assert_eq!(recorder.last().path(), "/stores/s1/rates/configuration/primary");

        group
            .invoke(
                "updateRateConfiguration",
                args(json!({"storeId": "s1", "rateSource": "fallback", "spread": "1.0"})),
            )
            .await
            .unwrap();
        let call = recorder.last();
        assert_eq!(call.path(), "/stores/s1/rates/configuration/fallback");
        assert_eq!(call.body.unwrap(), json!({"spread": "1.0"}));
    }

    #[tokio::test]
    async fn preview_sends_pairs_in_query_and_settings_in_body() {
        let recorder = Arc::new(Recorder::default());
        group(recorder.clone())
            .invoke(
                "previewRateConfiguration",
                args(json!({
                    "storeId": "s1",
                    "currencyPair": ["BTC_USD", "BTC_EUR"],
                    "isCustomScript": true
                })),
            )
            .await
            .unwrap();

        let call = recorder.last();
        assert_eq!(
            call.query,
            vec![
                ("currencyPair".to_string(), "BTC_USD".to_string()),
                ("currencyPair".to_string(), "BTC_EUR".to_string()),
            ]
        );
        assert_eq!(call.body.unwrap(), json!({"isCustomScript": true}));
    }
}
