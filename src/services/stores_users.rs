//! Store membership and roles

use std::sync::Arc;

use serde_json::json;

use crate::capability::{CapabilityGroup, OperationDescriptor as Op, ParamType as T, Route};
use crate::remote::{RemoteCollaborator, Shape};

const ROLE: &str = "The role of the user (Owner, Manager, Employee, Guest)";

pub fn group(remote: Arc<dyn RemoteCollaborator>) -> CapabilityGroup {
    CapabilityGroup::builder(
        "stores-users",
        "store-management",
        "Store users operations - manage store user access and permissions",
    )
    .route(
        Op::new("getUsers", "Get store users")
            .required("storeId", T::String, "Store ID")
            .example(
                "Get all store users",
                "List all users with access to the store",
                json!({"storeId": "store123"}),
            ),
        Route::get("/stores/{storeId}/users").expect(Shape::Array),
    )
    .route(
        Op::new("addUser", "Add a user to the store")
            .required("storeId", T::String, "Store ID")
            .optional("id", T::String, "The id of the user")
            .required("email", T::String, "The email of the user")
            .optional("name", T::String, "The name of the user")
            .required("storeRole", T::String, ROLE)
            .optional(
                "emailConfirmed",
                T::Boolean,
                "True if the email has been confirmed by the user",
            )
            .optional("approved", T::Boolean, "True if an admin has approved the user")
            .optional("disabled", T::Boolean, "True if an admin has disabled the user")
            .example(
                "Add manager user",
                "Add a new manager to the store",
                json!({
                    "storeId": "store123",
                    "email": "manager@example.com",
                    "name": "John Manager",
                    "storeRole": "Manager",
                    "emailConfirmed": true,
                    "approved": true
                }),
            ),
        Route::post("/stores/{storeId}/users").expect(Shape::Object),
    )
    .route(
        Op::new("updateUser", "Update a store user")
            .required("storeId", T::String, "Store ID")
            .required("idOrEmail", T::String, "The user's id or email")
            .optional("storeRole", T::String, ROLE)
            .optional("name", T::String, "The name of the user")
            .optional("approved", T::Boolean, "True if an admin has approved the user")
            .optional("disabled", T::Boolean, "True if an admin has disabled the user")
            .example(
                "Promote user to manager",
                "Change user role from employee to manager",
                json!({
                    "storeId": "store123",
                    "idOrEmail": "employee@example.com",
                    "storeRole": "Manager"
                }),
            ),
        Route::put("/stores/{storeId}/users/{idOrEmail}").expect(Shape::Object),
    )
    .route(
        Op::new("removeUser", "Remove a user from the store")
            .required("storeId", T::String, "Store ID")
            .required("idOrEmail", T::String, "The user's id or email")
            .example(
                "Remove user access",
                "Remove user access from the store",
                json!({"storeId": "store123", "idOrEmail": "former-employee@example.com"}),
            ),
        Route::delete("/stores/{storeId}/users/{idOrEmail}"),
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
    async fn email_identifies_user_in_path() {
        let recorder = Arc::new(Recorder::default());
        let group = group(recorder.clone());
        group
            .invoke(
                "updateUser",
                args(json!({"storeId": "s1", "idOrEmail": "bob@example.com", "storeRole": "Guest"})),
            )
            .await
            .unwrap();

        let call = recorder.last();
        assert_eq!(call.segments, vec!["stores", "s1", "users", "bob@example.com"]);
        assert_eq!(call.body.unwrap(), json!({"storeRole": "Guest"}));

        group
            .invoke("removeUser", args(json!({"storeId": "s1", "idOrEmail": "u9"})))
            .await
            .unwrap();
        assert_eq!(recorder.last().path(), "/stores/s1/users/u9");
    }

    #[tokio::test]
    async fn add_user_requires_role() {
        let recorder = Arc::new(Recorder::default());
        let err = group(recorder.clone())
            .invoke("addUser", args(json!({"storeId": "s1", "email": "a@b.c"})))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("'storeRole'"));
        assert_eq!(recorder.count(), 0);
    }
}
