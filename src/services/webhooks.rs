//! Store webhooks and their delivery log

use std::sync::Arc;

use serde_json::{Value, json};

use crate::Result;
use crate::capability::{
    Arguments, CapabilityGroup, OperationDescriptor as Op, ParamType as T, Route,
};
use crate::remote::{RemoteCollaborator, Shape};

fn webhook(name: &str, description: &str, id: &str) -> Op {
    Op::new(name, description)
        .required("storeId", T::String, "Store ID")
        .required("webhookId", T::String, id)
}

fn delivery(name: &str, description: &str, id: &str) -> Op {
    webhook(name, description, "Webhook ID").required("deliveryId", T::String, id)
}

fn delivery_example() -> Value {
    json!({"storeId": "store123", "webhookId": "webhook456", "deliveryId": "delivery789"})
}

pub fn group(remote: Arc<dyn RemoteCollaborator>) -> CapabilityGroup {
    CapabilityGroup::builder(
        "webhooks",
        "integrations",
        "Manage store webhooks - create, list, get, update, delete webhooks, and manage delivery tracking for real-time notifications",
    )
    .route(
        Op::new("create", "Register a new webhook for a store")
            .required("storeId", T::String, "Store ID")
            .required("url", T::String, "Webhook endpoint URL")
            .required("authorizedEvents", T::Array, "Array of event types to subscribe to")
            .optional("secret", T::String, "Secret for webhook signature verification")
            .example(
                "Invoice webhook",
                "Create webhook for invoice events",
                json!({
                    "storeId": "store123",
                    "url": "https://mysite.com/webhooks/btcpay",
                    "authorizedEvents": ["InvoiceCreated", "InvoiceExpired", "InvoiceSettled"],
                    "secret": "my-webhook-secret"
                }),
            ),
        Route::post("/stores/{storeId}/webhooks")
            .fixed("enabled", true)
            .fixed("automaticRedelivery", true)
            .prepare(specific_events)
            .expect(Shape::Object),
    )
    .route(
        Op::new("list", "List all webhooks for a store")
            .required("storeId", T::String, "Store ID")
            .example(
                "List webhooks",
                "Get all webhooks for a store",
                json!({"storeId": "store123"}),
            ),
        Route::get("/stores/{storeId}/webhooks").expect(Shape::Array),
    )
    .route(
        webhook("get", "Get details of a specific webhook", "Webhook ID").example(
            "Get webhook details",
            "Retrieve information about a specific webhook",
            json!({"storeId": "store123", "webhookId": "webhook456"}),
        ),
        Route::get("/stores/{storeId}/webhooks/{webhookId}").expect(Shape::Object),
    )
    .route(
        webhook("update", "Update an existing webhook", "Webhook ID to update")
            .optional("enabled", T::Boolean, "Whether webhook is enabled")
            .optional(
                "automaticRedelivery",
                T::Boolean,
                "Enable automatic redelivery on failure",
            )
            .optional("url", T::String, "Webhook endpoint URL")
            .optional(
                "authorizedEvents",
                T::Object,
                "Events to subscribe to {everything: boolean, specificEvents: string[]}",
            )
            .optional("secret", T::String, "Secret for webhook signature verification")
            .example(
                "Update webhook URL",
                "Change the webhook endpoint URL",
                json!({
                    "storeId": "store123",
                    "webhookId": "webhook456",
                    "url": "https://mysite.com/webhooks/btcpay-new"
                }),
            )
            .example(
                "Disable webhook",
                "Temporarily disable a webhook",
                json!({"storeId": "store123", "webhookId": "webhook456", "enabled": false}),
            )
            .example(
                "Update webhook events",
                "Change which events the webhook receives",
                json!({
                    "storeId": "store123",
                    "webhookId": "webhook456",
                    "authorizedEvents": {
                        "everything": false,
                        "specificEvents": ["InvoiceCreated", "InvoiceSettled"]
                    }
                }),
            ),
        Route::put("/stores/{storeId}/webhooks/{webhookId}")
            .prepare(specific_events)
            .expect(Shape::Object),
    )
    .route(
        webhook("getDeliveries", "Get recent webhook deliveries", "Webhook ID")
            .optional("count", T::Number, "Number of recent deliveries to fetch")
            .example(
                "Get recent deliveries",
                "Get the 10 most recent webhook deliveries",
                json!({"storeId": "store123", "webhookId": "webhook456", "count": 10}),
            ),
        Route::get("/stores/{storeId}/webhooks/{webhookId}/deliveries").expect(Shape::Array),
    )
    .route(
        delivery(
            "getDelivery",
            "Get details of a specific webhook delivery",
            "Delivery ID",
        )
        .example(
            "Get delivery details",
            "Get information about a specific webhook delivery",
            delivery_example(),
        ),
        Route::get("/stores/{storeId}/webhooks/{webhookId}/deliveries/{deliveryId}")
            .expect(Shape::Object),
    )
    .route(
        delivery(
            "getDeliveryRequest",
            "Get the JSON request payload of a webhook delivery",
            "Delivery ID",
        )
        .example(
            "Get delivery request",
            "Get the JSON payload that was sent to the webhook",
            delivery_example(),
        ),
        Route::get("/stores/{storeId}/webhooks/{webhookId}/deliveries/{deliveryId}/request"),
    )
    .route(
        delivery(
            "redeliver",
            "Redeliver a failed webhook delivery",
            "Delivery ID to redeliver",
        )
        .example(
            "Redeliver webhook",
            "Retry a failed webhook delivery",
            delivery_example(),
        ),
        Route::post("/stores/{storeId}/webhooks/{webhookId}/deliveries/{deliveryId}/redeliver"),
    )
    .route(
        webhook("delete", "Delete a webhook", "Webhook ID to delete").example(
            "Delete webhook",
            "Remove a webhook endpoint",
            json!({"storeId": "store123", "webhookId": "webhook456"}),
        ),
        Route::delete("/stores/{storeId}/webhooks/{webhookId}"),
    )
    .build(remote)
}

/// A plain event list subscribes to exactly those events
fn specific_events(args: &mut Arguments) -> Result<()> {
    if let Some(Value::Array(events)) = args.get("authorizedEvents") {
        let shaped = json!({"everything": false, "specificEvents": events});
        args.insert("authorizedEvents".to_string(), shaped);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::testing::Recorder;

    fn args(value: Value) -> Arguments {
        value.as_object().cloned().unwrap_or_default()
    }

    #[tokio::test]
    async fn create_wraps_event_list() {
        let recorder = Arc::new(Recorder::default());
        group(recorder.clone())
            .invoke(
                "create",
                args(json!({
                    "storeId": "s1",
                    "url": "https://hooks.example.com",
                    "authorizedEvents": ["InvoiceSettled"]
                })),
            )
            .await
            .unwrap();

        let call = recorder.last();
        assert_eq!(call.path(), "/stores/s1/webhooks");
        assert_eq!(
            call.body.unwrap(),
            json!({
                "enabled": true,
                "automaticRedelivery": true,
                "url": "https://hooks.example.com",
                "authorizedEvents": {"everything": false, "specificEvents": ["InvoiceSettled"]}
            })
        );
    }

    #[tokio::test]
    async fn update_passes_event_object_through() {
        let recorder = Arc::new(Recorder::default());
        group(recorder.clone())
            .invoke(
                "update",
                args(json!({
                    "storeId": "s1",
                    "webhookId": "w1",
                    "authorizedEvents": {"everything": true}
                })),
            )
            .await
            .unwrap();

        assert_eq!(
            recorder.last().body.unwrap(),
            json!({"authorizedEvents": {"everything": true}})
        );
    }

    #[tokio::test]
    async fn redelivery_targets_delivery() {
        let recorder = Arc::new(Recorder::default());
        group(recorder.clone())
            .invoke("redeliver", args(delivery_example()))
            .await
            .unwrap();

        assert_eq!(
            recorder.last().path(),
            "/stores/store123/webhooks/webhook456/deliveries/delivery789/redeliver"
        );
    }
}
