//! Server users, the current profile, and store membership

use std::sync::Arc;

use serde_json::json;

use crate::capability::{
    Arguments, CapabilityGroup, OperationDescriptor as Op, ParamType as T, Route,
};
use crate::remote::{RemoteCollaborator, Shape};
use crate::{Error, Result};

const ID_OR_EMAIL: &str = "User ID or email address";

pub fn group(remote: Arc<dyn RemoteCollaborator>) -> CapabilityGroup {
    CapabilityGroup::builder(
        "users",
        "user-management",
        "Manage BTCPayServer users - create, update, delete users, manage profiles, handle user administration and store permissions",
    )
    .route(
        Op::new("create", "Create a new BTCPayServer user")
            .required("email", T::String, "User email address")
            .optional(
                "password",
                T::String,
                "User password (if not provided, invitation email will be sent)",
            )
            .optional("name", T::String, "User display name")
            .optional("imageUrl", T::String, "Profile image URL")
            .with_default(
                "isAdministrator",
                T::Boolean,
                "Whether the user should be an administrator",
                false,
            )
            .with_default(
                "sendInvitationEmail",
                T::Boolean,
                "Whether to send invitation email to the user",
                true,
            )
            .example(
                "Create user with password",
                "Create a new user with immediate access",
                json!({
                    "email": "user@example.com",
                    "password": "SecurePassword123!",
                    "name": "John Doe",
                    "isAdministrator": false
                }),
            )
            .example(
                "Create admin with invitation",
                "Create admin and send invitation email",
                json!({
                    "email": "admin@example.com",
                    "name": "Admin User",
                    "isAdministrator": true,
                    "sendInvitationEmail": true
                }),
            ),
        Route::post("/users").expect(Shape::Object),
    )
    .route(
        Op::new(
            "getCurrent",
            "Get information about the current authenticated user",
        )
        .optional(
            "userId",
            T::String,
            "Not supported: only the current user can be fetched",
        )
        .example(
            "Get current user",
            "Get details of the currently logged in user",
            json!({}),
        ),
        Route::get("/users/me")
            .prepare(reject_other_user)
            .expect(Shape::Object),
    )
    .route(
        Op::new("updateCurrent", "Update current user information")
            .optional("email", T::String, "New email address")
            .optional("name", T::String, "User display name")
            .optional("imageUrl", T::String, "Profile image URL")
            .optional(
                "currentPassword",
                T::String,
                "Current password (required for password change)",
            )
            .optional("newPassword", T::String, "New password")
            .example(
                "Update profile info",
                "Update name and profile picture",
                json!({"name": "John Doe", "imageUrl": "https://example.com/avatar.jpg"}),
            )
            .example(
                "Change password",
                "Change user password",
                json!({"currentPassword": "OldPassword123!", "newPassword": "NewPassword456!"}),
            )
            .example(
                "Update email and name",
                "Change email and display name",
                json!({"email": "newemail@example.com", "name": "Jane Smith"}),
            ),
        Route::put("/users/me").expect(Shape::Object),
    )
    .route(
        Op::new(
            "deleteCurrent",
            "Delete current user profile and associated data",
        )
        .example(
            "Delete own account",
            "Permanently delete current user account",
            json!({}),
        ),
        Route::delete("/users/me"),
    )
    .route(
        Op::new(
            "uploadProfilePicture",
            "Upload a profile picture for the current user",
        )
        .required(
            "fileData",
            T::Object,
            "FormData object containing the image file",
        )
        .example(
            "Upload avatar",
            "Upload a new profile picture",
            json!({"fileData": "FormData with image file"}),
        ),
        Route::post("/users/me/picture")
            .spread("fileData")
            .expect(Shape::Object),
    )
    .route(
        Op::new(
            "deleteProfilePicture",
            "Delete the current user profile picture",
        )
        .example(
            "Remove profile picture",
            "Delete the current profile picture",
            json!({}),
        ),
        Route::delete("/users/me/picture"),
    )
    .route(
        Op::new("listAll", "List all users (admin only)").example(
            "Get all users",
            "Retrieve all users in the system",
            json!({}),
        ),
        Route::get("/users").expect(Shape::Array),
    )
    .route(
        Op::new("getByIdOrEmail", "Get user by ID or email (admin only)")
            .required("idOrEmail", T::String, ID_OR_EMAIL)
            .example(
                "Get user by email",
                "Find user by email address",
                json!({"idOrEmail": "user@example.com"}),
            )
            .example(
                "Get user by ID",
                "Find user by user ID",
                json!({"idOrEmail": "user123"}),
            ),
        Route::get("/users/{idOrEmail}").expect(Shape::Object),
    )
    .route(
        Op::new("deleteByIdOrEmail", "Delete user by ID or email (admin only)")
            .required("idOrEmail", T::String, ID_OR_EMAIL)
            .example(
                "Delete user by email",
                "Delete user account by email",
                json!({"idOrEmail": "user@example.com"}),
            ),
        Route::delete("/users/{idOrEmail}"),
    )
    .route(
        Op::new("lock", "Lock or unlock a user account (admin only)")
            .required("idOrEmail", T::String, ID_OR_EMAIL)
            .required("locked", T::Boolean, "Whether to lock or unlock the user")
            .example(
                "Lock user account",
                "Lock a user account to prevent access",
                json!({"idOrEmail": "user@example.com", "locked": true}),
            )
            .example(
                "Unlock user account",
                "Unlock a previously locked user account",
                json!({"idOrEmail": "user@example.com", "locked": false}),
            ),
        Route::post("/users/{idOrEmail}/lock"),
    )
    .route(
        Op::new("approve", "Approve or unapprove a user account (admin only)")
            .required("idOrEmail", T::String, ID_OR_EMAIL)
            .required("approved", T::Boolean, "Whether to approve or unapprove the user")
            .example(
                "Approve user",
                "Approve a pending user registration",
                json!({"idOrEmail": "user@example.com", "approved": true}),
            )
            .example(
                "Unapprove user",
                "Revoke approval for a user account",
                json!({"idOrEmail": "user@example.com", "approved": false}),
            ),
        Route::post("/users/{idOrEmail}/approve"),
    )
    .route(
        Op::new("delete", "Delete a user account")
            .required("userId", T::String, "User ID to delete")
            .example(
                "Delete user",
                "Permanently delete a user account",
                json!({"userId": "user123"}),
            ),
        Route::delete("/users/{userId}"),
    )
    .route(
        Op::new("listStoreUsers", "List all users with access to a specific store")
            .required("storeId", T::String, "Store ID")
            .example(
                "List store users",
                "Get all users who have access to a store",
                json!({"storeId": "store123"}),
            ),
        Route::get("/stores/{storeId}/users").expect(Shape::Array),
    )
    .route(
        Op::new("addStoreUser", "Add a user to a store")
            .required("storeId", T::String, "Store ID")
            .required("user", T::Object, "User object with properties to set")
            .example(
                "Add user by email and role",
                "Add a user to store by email with specific role",
                json!({
                    "storeId": "store123",
                    "user": {"email": "user@example.com", "storeRole": "Manager"}
                }),
            )
            .example(
                "Add user by ID with full details",
                "Add existing user with complete information",
                json!({
                    "storeId": "store123",
                    "user": {
                        "id": "user456",
                        "email": "user@example.com",
                        "name": "John Doe",
                        "storeRole": "Employee"
                    }
                }),
            ),
        Route::post("/stores/{storeId}/users")
            .spread("user")
            .expect(Shape::Object),
    )
    .route(
        Op::new("updateStoreUser", "Update a store user")
            .required("storeId", T::String, "Store ID")
            .required("idOrEmail", T::String, ID_OR_EMAIL)
            .required("user", T::Object, "User object with properties to update")
            .example(
                "Update user role",
                "Change a user role in the store",
                json!({
                    "storeId": "store123",
                    "idOrEmail": "user@example.com",
                    "user": {"storeRole": "Owner"}
                }),
            )
            .example(
                "Update user details",
                "Update user name and role",
                json!({
                    "storeId": "store123",
                    "idOrEmail": "user456",
                    "user": {"name": "Jane Smith", "storeRole": "Manager"}
                }),
            ),
        Route::put("/stores/{storeId}/users/{idOrEmail}")
            .spread("user")
            .expect(Shape::Object),
    )
    .route(
        Op::new("removeStoreUser", "Remove a user from a store")
            .required("storeId", T::String, "Store ID")
            .required("idOrEmail", T::String, ID_OR_EMAIL)
            .example(
                "Remove store access by email",
                "Remove user access using email",
                json!({"storeId": "store123", "idOrEmail": "user@example.com"}),
            )
            .example(
                "Remove store access by ID",
                "Remove user access using user ID",
                json!({"storeId": "store123", "idOrEmail": "user456"}),
            ),
        Route::delete("/stores/{storeId}/users/{idOrEmail}"),
    )
    .build(remote)
}

/// The API only serves the authenticated user's own profile
fn reject_other_user(args: &mut Arguments) -> Result<()> {
    if args.get("userId").is_some_and(|v| !v.is_null()) {
        return Err(Error::Unsupported(
            "BTCPayServer API does not support getting other users by ID. Only current user (/users/me) is supported."
                .to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::testing::Recorder;
    use serde_json::Value;

    fn args(value: Value) -> Arguments {
        value.as_object().cloned().unwrap_or_default()
    }

    #[tokio::test]
    async fn current_user_by_id_is_rejected_locally() {
        let recorder = Arc::new(Recorder::default());
        let group = group(recorder.clone());

        let err = group
            .invoke("getCurrent", args(json!({"userId": "u1"})))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Unsupported(_)));
        assert_eq!(recorder.count(), 0);

        group.invoke("getCurrent", Arguments::new()).await.unwrap();
        let call = recorder.last();
        assert_eq!(call.path(), "/users/me");
        assert!(call.query.is_empty());
    }

    #[tokio::test]
    async fn store_user_object_is_spread_into_body() {
        let recorder = Arc::new(Recorder::default());
        group(recorder.clone())
            .invoke(
                "addStoreUser",
                args(json!({
                    "storeId": "s1",
                    "user": {"email": "a@b.c", "storeRole": "Guest"}
                })),
            )
            .await
            .unwrap();

        let call = recorder.last();
        assert_eq!(call.path(), "/stores/s1/users");
        assert_eq!(
            call.body.unwrap(),
            json!({"email": "a@b.c", "storeRole": "Guest"})
        );
    }

    #[tokio::test]
    async fn create_sends_invitation_by_default() {
        let recorder = Arc::new(Recorder::default());
        group(recorder.clone())
            .invoke("create", args(json!({"email": "new@example.com"})))
            .await
            .unwrap();

        assert_eq!(
            recorder.last().body.unwrap(),
            json!({
                "email": "new@example.com",
                "isAdministrator": false,
                "sendInvitationEmail": true
            })
        );
    }

    #[tokio::test]
    async fn lock_posts_flag() {
        let recorder = Arc::new(Recorder::default());
        group(recorder.clone())
            .invoke("lock", args(json!({"idOrEmail": "bob", "locked": false})))
            .await
            .unwrap();

        let call = recorder.last();
        assert_eq!(call.path(), "/users/bob/lock");
        assert_eq!(call.body.unwrap(), json!({"locked": false}));
    }
}
