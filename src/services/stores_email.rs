//! Store SMTP settings and outgoing mail

use std::sync::Arc;

use serde_json::json;

use crate::capability::{CapabilityGroup, OperationDescriptor as Op, ParamType as T, Route};
use crate::remote::{RemoteCollaborator, Shape};

pub fn group(remote: Arc<dyn RemoteCollaborator>) -> CapabilityGroup {
    CapabilityGroup::builder(
        "stores-email",
        "store-management",
        "Store email operations - manage email settings and send emails through store SMTP",
    )
    .route(
        Op::new("getEmailSettings", "Get store email settings")
            .required("storeId", T::String, "Store ID")
            .example(
                "Get email settings",
                "Retrieve the email settings configured for a store",
                json!({"storeId": "store123"}),
            ),
        Route::get("/stores/{storeId}/email").expect(Shape::Object),
    )
    .route(
        Op::new("updateEmailSettings", "Update store email settings")
            .required("storeId", T::String, "Store ID")
            .required("from", T::String, "The sender email address")
            .required("server", T::String, "SMTP server host")
            .required("port", T::Number, "SMTP server port")
            .required("login", T::String, "SMTP username")
            .with_default(
                "disableCertificateCheck",
                T::Boolean,
                "Disable TLS certificate security checks",
                false,
            )
            .optional(
                "password",
                T::String,
                "SMTP password (keep null or empty to not update it)",
            )
            .example(
                "Configure Gmail SMTP",
                "Set up Gmail SMTP for store emails",
                json!({
                    "storeId": "store123",
                    "from": "sender@gmail.com",
                    "server": "smtp.gmail.com",
                    "port": 587,
                    "login": "John.Smith",
                    "disableCertificateCheck": false,
                    "password": "MyS3cr3t"
                }),
            ),
        Route::put("/stores/{storeId}/email").expect(Shape::Object),
    )
    .route(
        Op::new("sendEmail", "Send an email using the store's SMTP server")
            .required("storeId", T::String, "Store ID")
            .required("email", T::String, "Email of the recipient")
            .required("subject", T::String, "Subject of the email")
            .required("body", T::String, "Body of the email to send as plain text")
            .example(
                "Send notification email",
                "Send a notification email to a customer",
                json!({
                    "storeId": "store123",
                    "email": "customer@example.com",
                    "subject": "Order Confirmation",
                    "body": "Thank you for your order! Your payment has been received."
                }),
            ),
        Route::post("/stores/{storeId}/email/send"),
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
    async fn settings_update_defaults_certificate_check() {
        let recorder = Arc::new(Recorder::default());
        group(recorder.clone())
            .invoke(
                "updateEmailSettings",
                args(json!({
                    "storeId": "s1",
                    "from": "a@b.c",
                    "server": "smtp.b.c",
                    "port": 587,
                    "login": "a"
                })),
            )
            .await
            .unwrap();

        let call = recorder.last();
        assert_eq!(call.method, Method::PUT);
        assert_eq!(call.path(), "/stores/s1/email");
        let body = call.body.unwrap();
        assert_eq!(body["disableCertificateCheck"], false);
        assert_eq!(body["port"], 587);
        assert!(body.get("password").is_none());
    }

    #[tokio::test]
    async fn send_requires_subject() {
        let recorder = Arc::new(Recorder::default());
        let err = group(recorder.clone())
            .invoke(
                "sendEmail",
                args(json!({"storeId": "s1", "email": "x@y.z", "body": "hi"})),
            )
            .await
            .unwrap_err();

        assert!(err.to_string().contains("'subject'"));
        assert_eq!(recorder.count(), 0);
    }
}
