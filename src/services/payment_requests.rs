//! Payment requests: long-lived payment links that spawn invoices

use std::sync::Arc;

use serde_json::{Value, json};

use super::date_to_timestamp;
use crate::Result;
use crate::capability::{Arguments, CapabilityGroup, OperationDescriptor as Op, ParamType as T, Route};
use crate::remote::{RemoteCollaborator, Shape};

/// Amount sent for custom-amount requests that name no positive amount
const CUSTOM_AMOUNT_FLOOR: &str = "1.00";

pub fn group(remote: Arc<dyn RemoteCollaborator>) -> CapabilityGroup {
    CapabilityGroup::builder(
        "payment-requests",
        "payments",
        "Manage BTCPayServer payment requests - create, retrieve, list, update, delete payment requests, and pay payment requests (creates invoices)",
    )
    .route(
        Op::new("create", "Create a new payment request for a store")
            .required("storeId", T::String, "The store ID to create the payment request for")
            .optional("amount", T::String, "Payment amount (optional for custom amount requests)")
            .with_default("currency", T::String, "Currency code", "USD")
            .optional("title", T::String, "Payment request title")
            .optional("description", T::String, "Payment request description")
            .optional(
                "expiryDate",
                T::String,
                "Expiry date in ISO format (e.g., \"2025-09-04T00:00:00Z\" or \"2025-09-04 00:00:00\")",
            )
            .optional("email", T::String, "Email for payment notifications")
            .with_default("allowCustomPaymentAmounts", T::Boolean, "Allow custom payment amounts", false)
            .optional("referenceId", T::String, "Reference ID for the payment request")
            .example(
                "Fixed amount payment request",
                "Create a payment request for a specific amount",
                json!({
                    "storeId": "store123",
                    "amount": "100.00",
                    "currency": "USD",
                    "title": "Product Payment",
                    "description": "Payment for premium product"
                }),
            )
            .example(
                "Custom amount payment request",
                "Create a payment request allowing custom amounts",
                json!({
                    "storeId": "store123",
                    "currency": "USD",
                    "title": "Donation",
                    "description": "Support our cause",
                    "allowCustomPaymentAmounts": true
                }),
            ),
        Route::post("/stores/{storeId}/payment-requests")
            .prepare(prepare_create)
            .expect(Shape::Object),
    )
    .route(
        Op::new("get", "Get a specific payment request by ID")
            .required("storeId", T::String, "Store ID")
            .required("paymentRequestId", T::String, "Payment request ID to retrieve")
            .example(
                "Get payment request",
                "Retrieve details of a specific payment request",
                json!({"storeId": "store123", "paymentRequestId": "pr_abc123"}),
            ),
        Route::get("/stores/{storeId}/payment-requests/{paymentRequestId}").expect(Shape::Object),
    )
    .route(
        Op::new("list", "List all payment requests for a store")
            .required("storeId", T::String, "Store ID to list payment requests for")
            .example(
                "List all payment requests",
                "Get all payment requests for a store",
                json!({"storeId": "store123"}),
            ),
        Route::get("/stores/{storeId}/payment-requests").expect(Shape::Array),
    )
    .route(
        Op::new("update", "Update an existing payment request")
            .required("storeId", T::String, "Store ID")
            .required("paymentRequestId", T::String, "Payment request ID to update")
            .optional("amount", T::String, "Payment amount")
            .optional("currency", T::String, "Currency code")
            .optional("title", T::String, "Payment request title")
            .optional("description", T::String, "Payment request description")
            .optional("expiryDate", T::String, "Expiry date in ISO format")
            .optional("email", T::String, "Email for payment notifications")
            .optional("allowCustomPaymentAmounts", T::Boolean, "Allow custom payment amounts")
            .optional("referenceId", T::String, "Reference ID for the payment request")
            .optional("formId", T::String, "Form ID to request customer data")
            .optional("formResponse", T::Object, "Form data response")
            .example(
                "Update payment request title",
                "Update the title of an existing payment request",
                json!({
                    "storeId": "store123",
                    "paymentRequestId": "pr_abc123",
                    "title": "Updated Product Payment"
                }),
            )
            .example(
                "Update payment request amount",
                "Update the amount and currency of a payment request",
                json!({
                    "storeId": "store123",
                    "paymentRequestId": "pr_abc123",
                    "amount": "150.00",
                    "currency": "EUR"
                }),
            ),
        Route::put("/stores/{storeId}/payment-requests/{paymentRequestId}")
            .prepare(prepare_update)
            .expect(Shape::Object),
    )
    .route(
        Op::new("pay", "Pay a payment request (creates an invoice for payment)")
            .required("storeId", T::String, "Store ID")
            .required("paymentRequestId", T::String, "Payment request ID to pay")
            .optional("amount", T::String, "Invoice amount (if different from payment request amount)")
            .with_default(
                "allowPendingInvoiceReuse",
                T::Boolean,
                "Whether to reuse pending invoices for this payment request",
                false,
            )
            .example(
                "Pay payment request",
                "Pay a payment request for the full amount (creates invoice)",
                json!({"storeId": "store123", "paymentRequestId": "pr_abc123"}),
            )
            .example(
                "Pay partial amount",
                "Pay a partial amount (requires allowCustomPaymentAmounts)",
                json!({"storeId": "store123", "paymentRequestId": "pr_abc123", "amount": "50.00"}),
            )
            .example(
                "Pay with invoice reuse",
                "Pay a payment request allowing reuse of pending invoices",
                json!({
                    "storeId": "store123",
                    "paymentRequestId": "pr_abc123",
                    "allowPendingInvoiceReuse": true
                }),
            ),
        Route::post("/stores/{storeId}/payment-requests/{paymentRequestId}/pay")
            .expect(Shape::Object),
    )
    .route(
        Op::new("delete", "Delete a payment request")
            .required("storeId", T::String, "Store ID")
            .required("paymentRequestId", T::String, "Payment request ID to delete")
            .example(
                "Delete payment request",
                "Remove a payment request",
                json!({"storeId": "store123", "paymentRequestId": "pr_abc123"}),
            ),
        Route::delete("/stores/{storeId}/payment-requests/{paymentRequestId}"),
    )
    .build(remote)
}

fn prepare_create(args: &mut Arguments) -> Result<()> {
    date_to_timestamp(args, "expiryDate");

    // The server still needs a positive amount when payers choose their own.
    if args.get("allowCustomPaymentAmounts").and_then(Value::as_bool) == Some(true)
        && !args.get("amount").is_some_and(is_positive_amount)
    {
        args.insert("amount".to_string(), json!(CUSTOM_AMOUNT_FLOOR));
    }
    Ok(())
}

fn prepare_update(args: &mut Arguments) -> Result<()> {
    date_to_timestamp(args, "expiryDate");
    Ok(())
}

fn is_positive_amount(value: &Value) -> bool {
    let amount = match value {
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    };
    amount.is_some_and(|a| a > 0.0)
}
