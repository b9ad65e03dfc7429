//! Notifications of the current user

use std::sync::Arc;

use serde_json::json;

use crate::capability::{CapabilityGroup, OperationDescriptor as Op, ParamType as T, Route};
use crate::remote::{RemoteCollaborator, Shape};

fn notification(name: &str, description: &str, id: &str) -> Op {
    Op::new(name, description).required("id", T::String, id)
}

pub fn group(remote: Arc<dyn RemoteCollaborator>) -> CapabilityGroup {
    CapabilityGroup::builder(
        "notifications",
        "user",
        "Current user notification management - view, update, and manage notification settings",
    )
    .route(
        Op::new("list", "Get current user's notifications with optional filtering")
            .optional(
                "storeIds",
                T::Array,
                "Array of store IDs to filter notifications for specific stores",
            )
            .optional("take", T::Number, "Number of records to return (pagination)")
            .optional("skip", T::Number, "Number of records to skip (pagination)")
            .optional(
                "seen",
                T::String,
                "Filter by seen status: \"true\", \"false\", or omit for all",
            )
            .example(
                "Get all notifications",
                "Retrieve all notifications for the current user",
                json!({}),
            )
            .example(
                "Get unread notifications",
                "Get only unseen notifications",
                json!({"seen": "false"}),
            )
            .example(
                "Get store-specific notifications",
                "Get notifications for specific stores with pagination",
                json!({"storeIds": ["store1", "store2"], "take": 10, "skip": 0}),
            )
            .example(
                "Paginated notifications",
                "Get notifications with pagination",
                json!({"take": 20, "skip": 40}),
            ),
        Route::get("/users/me/notifications")
            .rename("storeIds", "storeId")
            .expect(Shape::Array),
    )
    .route(
        notification(
            "get",
            "Get details of a specific notification by ID",
            "The notification ID to retrieve",
        )
        .example(
            "Get notification details",
            "Retrieve details of a specific notification",
            json!({"id": "notification-uuid-123"}),
        ),
        Route::get("/users/me/notifications/{id}").expect(Shape::Object),
    )
    .route(
        notification(
            "update",
            "Update notification status (mark as seen/unseen)",
            "The notification ID to update",
        )
        .optional(
            "seen",
            T::Boolean,
            "Mark notification as seen (true) or unseen (false). If omitted, toggles current state",
        )
        .example(
            "Mark as read",
            "Mark a notification as seen/read",
            json!({"id": "notification-uuid-123", "seen": true}),
        )
        .example(
            "Mark as unread",
            "Mark a notification as unseen/unread",
            json!({"id": "notification-uuid-123", "seen": false}),
        )
        .example(
            "Toggle seen status",
            "Toggle the seen status of a notification",
            json!({"id": "notification-uuid-123"}),
        ),
        Route::put("/users/me/notifications/{id}")
            .fixed("seen", serde_json::Value::Null)
            .expect(Shape::Object),
    )
    .route(
        notification(
            "delete",
            "Remove/delete a specific notification",
            "The notification ID to delete",
        )
        .example(
            "Delete notification",
            "Remove a notification from the user's list",
            json!({"id": "notification-uuid-123"}),
        ),
        Route::delete("/users/me/notifications/{id}"),
    )
    .route(
        Op::new(
            "getSettings",
            "Get current user's notification preferences/settings",
        )
        .example(
            "View notification settings",
            "Get all notification type preferences for the current user",
            json!({}),
        ),
        Route::get("/users/me/notification-settings"),
    )
    .route(
        Op::new(
            "updateSettings",
            "Update notification preferences - enable/disable specific notification types",
        )
        .required(
            "disabled",
            T::Array,
            "Array of notification type identifiers to disable. Use \"all\" to disable all notifications",
        )
        .example(
            "Disable version notifications",
            "Disable new version and plugin update notifications",
            json!({"disabled": ["newversion", "pluginupdate"]}),
        )
        .example(
            "Disable invoice notifications",
            "Disable all invoice-related notifications",
            json!({"disabled": [
                "invoicestate",
                "invoicestate_invoice_confirmed",
                "invoicestate_invoice_expiredPaidPartial",
                "invoicestate_invoice_failedToConfirm",
                "invoicestate_invoice_paidAfterExpiration"
            ]}),
        )
        .example(
            "Disable all notifications",
            "Disable all notification types",
            json!({"disabled": ["all"]}),
        )
        .example(
            "Selective notifications",
            "Keep only critical notifications enabled",
            json!({"disabled": ["newversion", "pluginupdate", "invoicestate"]}),
        ),
        Route::put("/users/me/notification-settings"),
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
    async fn list_repeats_store_filter() {
        let recorder = Arc::new(Recorder::default());
        group(recorder.clone())
            .invoke(
                "list",
                args(json!({"storeIds": ["a", "b"], "take": 10, "seen": "false"})),
            )
            .await
            .unwrap();

        let call = recorder.last();
        assert_eq!(call.path(), "/users/me/notifications");
        assert_eq!(
            call.query,
            vec![
                ("storeId".to_string(), "a".to_string()),
                ("storeId".to_string(), "b".to_string()),
                ("take".to_string(), "10".to_string()),
                ("seen".to_string(), "false".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn update_without_seen_toggles() {
        let recorder = Arc::new(Recorder::default());
        let group = group(recorder.clone());

        group
            .invoke("update", args(json!({"id": "n1"})))
            .await
            .unwrap();
        assert_eq!(recorder.last().body.unwrap(), json!({"seen": null}));

        group
            .invoke("update", args(json!({"id": "n1", "seen": true})))
            .await
            .unwrap();
        assert_eq!(recorder.last().body.unwrap(), json!({"seen": true}));
    }
}
