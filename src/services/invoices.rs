//! Invoices: creation, lookup, lifecycle changes and refunds

use std::sync::Arc;

use serde_json::json;

use crate::capability::{CapabilityGroup, OperationDescriptor as Op, ParamType as T, Route};
use crate::remote::{RemoteCollaborator, Shape};

pub fn group(remote: Arc<dyn RemoteCollaborator>) -> CapabilityGroup {
    CapabilityGroup::builder(
        "invoices",
        "payments",
        "Manage BTCPayServer invoices - create, retrieve, list, update, archive, mark status, refund, and manage payment methods",
    )
    .route(
        Op::new("create", "Create a new invoice for a store")
            .required("storeId", T::String, "Store ID to create invoice for")
            .optional("amount", T::String, "Invoice amount")
            .with_default("currency", T::String, "Currency code", "USD")
            .optional("orderId", T::String, "Order ID for the invoice")
            .optional("buyerEmail", T::String, "Email for payment notifications")
            .optional("notificationURL", T::String, "Webhook URL for payment notifications")
            .optional("redirectURL", T::String, "URL to redirect after payment")
            .optional("defaultPaymentMethod", T::String, "Preferred payment method")
            .optional("metadata", T::Object, "Additional metadata for the invoice")
            .example(
                "Basic invoice",
                "Create a simple invoice",
                json!({
                    "storeId": "store123",
                    "amount": "50.00",
                    "currency": "USD",
                    "buyerEmail": "customer@example.com"
                }),
            )
            .example(
                "Invoice with callbacks",
                "Create an invoice with webhook and redirect URLs",
                json!({
                    "storeId": "store123",
                    "amount": "100.00",
                    "currency": "USD",
                    "orderId": "order-456",
                    "notificationURL": "https://mysite.com/webhook",
                    "redirectURL": "https://mysite.com/success"
                }),
            ),
        Route::post("/stores/{storeId}/invoices")
            .rename("buyerEmail", "notificationEmail")
            .expect(Shape::Object),
    )
    .route(
        Op::new("get", "Get details of a specific invoice by ID")
            .required("storeId", T::String, "Store ID")
            .required("invoiceId", T::String, "Invoice ID to retrieve")
            .example(
                "Get invoice",
                "Retrieve details of a specific invoice",
                json!({"storeId": "store123", "invoiceId": "inv_abc123"}),
            ),
        Route::get("/stores/{storeId}/invoices/{invoiceId}").expect(Shape::Object),
    )
    .route(
        Op::new("list", "List all invoices for a store with optional filtering")
            .required("storeId", T::String, "Store ID to list invoices for")
            .optional("orderId", T::String, "Filter by order ID")
            .optional(
                "status",
                T::String,
                "Filter by status (New, Processing, Expired, Invalid, Settled)",
            )
            .optional("startDate", T::String, "Filter invoices created after this date (ISO format)")
            .optional("endDate", T::String, "Filter invoices created before this date (ISO format)")
            .example(
                "List all invoices",
                "Get all invoices for a store",
                json!({"storeId": "store123"}),
            )
            .example(
                "Filter by status",
                "Get only settled invoices",
                json!({"storeId": "store123", "status": "Settled"}),
            ),
        Route::get("/stores/{storeId}/invoices").expect(Shape::Array),
    )
    .route(
        Op::new("update", "Update an existing invoice")
            .required("storeId", T::String, "Store ID")
            .required("invoiceId", T::String, "Invoice ID to update")
            .optional("metadata", T::Object, "Updated metadata for the invoice")
            .example(
                "Update invoice metadata",
                "Add or update invoice metadata",
                json!({
                    "storeId": "store123",
                    "invoiceId": "inv_abc123",
                    "metadata": {"customerNote": "Priority order", "internalRef": "ref-789"}
                }),
            ),
        Route::put("/stores/{storeId}/invoices/{invoiceId}").expect(Shape::Object),
    )
    .route(
        Op::new("listAdvanced", "List invoices with advanced filtering options")
            .required("storeId", T::String, "Store ID to list invoices for")
            .optional("orderId", T::Array, "Array of order IDs to filter by")
            .optional("textSearch", T::String, "Search term to find specific invoices")
            .optional(
                "status",
                T::String,
                "Filter by status (Expired, Invalid, New, Processing, Settled)",
            )
            .optional("startDate", T::Number, "Unix timestamp - start date filter")
            .optional("endDate", T::Number, "Unix timestamp - end date filter")
            .optional("take", T::Number, "Number of records to return")
            .optional("skip", T::Number, "Number of records to skip")
            .example(
                "Search invoices",
                "Search for invoices containing specific text",
                json!({"storeId": "store123", "textSearch": "premium product", "take": 10}),
            )
            .example(
                "Filter by date range",
                "Get invoices from a specific period",
                json!({
                    "storeId": "store123",
                    "startDate": 1_640_995_200,
                    "endDate": 1_643_673_600,
                    "status": "Settled"
                }),
            ),
        Route::get("/stores/{storeId}/invoices").expect(Shape::Array),
    )
    .route(
        Op::new("getPaymentMethods", "Get payment methods for a specific invoice")
            .required("storeId", T::String, "Store ID")
            .required("invoiceId", T::String, "Invoice ID")
            .with_default(
                "includeSensitive",
                T::Boolean,
                "Include sensitive data (requires additional permissions)",
                false,
            )
            .with_default(
                "onlyAccountedPayments",
                T::Boolean,
                "Only return accounted payments",
                true,
            )
            .example(
                "Get invoice payment methods",
                "Retrieve payment methods for an invoice",
                json!({"storeId": "store123", "invoiceId": "inv_abc123"}),
            ),
        Route::get("/stores/{storeId}/invoices/{invoiceId}/payment-methods").expect(Shape::Array),
    )
    .route(
        Op::new(
            "getRefundTriggerData",
            "Get refund calculation data for an invoice payment method",
        )
        .required("storeId", T::String, "Store ID")
        .required("invoiceId", T::String, "Invoice ID")
        .required("paymentMethodId", T::String, "Payment method ID (e.g., BTC-CHAIN)")
        .example(
            "Get refund data",
            "Calculate refund amounts for Bitcoin payments",
            json!({"storeId": "store123", "invoiceId": "inv_abc123", "paymentMethodId": "BTC-CHAIN"}),
        ),
        Route::get("/stores/{storeId}/invoices/{invoiceId}/refund/{paymentMethodId}")
            .expect(Shape::Object),
    )
    .route(
        Op::new("markStatus", "Mark an invoice as Invalid or Settled")
            .required("storeId", T::String, "Store ID")
            .required("invoiceId", T::String, "Invoice ID")
            .required("status", T::String, "Status to mark the invoice as (Invalid or Settled)")
            .example(
                "Mark invoice as settled",
                "Manually mark an invoice as settled",
                json!({"storeId": "store123", "invoiceId": "inv_abc123", "status": "Settled"}),
            )
            .example(
                "Mark invoice as invalid",
                "Mark an invoice as invalid",
                json!({"storeId": "store123", "invoiceId": "inv_abc123", "status": "Invalid"}),
            ),
        Route::post("/stores/{storeId}/invoices/{invoiceId}/status").expect(Shape::Object),
    )
    .route(
        Op::new("archive", "Archive an invoice")
            .required("storeId", T::String, "Store ID")
            .required("invoiceId", T::String, "Invoice ID to archive")
            .example(
                "Archive invoice",
                "Archive an invoice to remove it from active lists",
                json!({"storeId": "store123", "invoiceId": "inv_abc123"}),
            ),
        Route::delete("/stores/{storeId}/invoices/{invoiceId}"),
    )
    .route(
        Op::new("unarchive", "Unarchive an invoice")
            .required("storeId", T::String, "Store ID")
            .required("invoiceId", T::String, "Invoice ID to unarchive")
            .example(
                "Unarchive invoice",
                "Restore an archived invoice to active status",
                json!({"storeId": "store123", "invoiceId": "inv_abc123"}),
            ),
        Route::post("/stores/{storeId}/invoices/{invoiceId}/unarchive").expect(Shape::Object),
    )
    .route(
        Op::new(
            "activatePaymentMethod",
            "Activate a payment method for an invoice (lazy payments)",
        )
        .required("storeId", T::String, "Store ID")
        .required("invoiceId", T::String, "Invoice ID")
        .required("paymentMethodId", T::String, "Payment method ID to activate (e.g., BTC-CHAIN)")
        .example(
            "Activate Bitcoin payment",
            "Activate Bitcoin on-chain payment for an invoice",
            json!({"storeId": "store123", "invoiceId": "inv_abc123", "paymentMethodId": "BTC-CHAIN"}),
        ),
        Route::post(
            "/stores/{storeId}/invoices/{invoiceId}/payment-methods/{paymentMethodId}/activate",
        ),
    )
    .route(
        Op::new("refund", "Create a refund for an invoice")
            .required("storeId", T::String, "Store ID")
            .required("invoiceId", T::String, "Invoice ID to refund")
            .optional("name", T::String, "Name for the refund pull payment")
            .optional("description", T::String, "Description for the refund")
            .optional("payoutMethodId", T::String, "Payout method (e.g., BTC-CHAIN, BTC-LN)")
            .optional(
                "refundVariant",
                T::String,
                "Refund calculation method (CurrentRate, Custom, Fiat, OverpaidAmount, RateThen)",
            )
            .optional(
                "subtractPercentage",
                T::String,
                "Percentage to subtract from refund (e.g., processing fee)",
            )
            .optional("customAmount", T::String, "Custom refund amount (for Custom variant)")
            .optional("customCurrency", T::String, "Custom refund currency (for Custom variant)")
            .example(
                "Full refund at current rate",
                "Refund the full amount at current exchange rate",
                json!({
                    "storeId": "store123",
                    "invoiceId": "inv_abc123",
                    "refundVariant": "CurrentRate",
                    "payoutMethodId": "BTC-CHAIN"
                }),
            )
            .example(
                "Partial refund with fee",
                "Refund with processing fee deduction",
                json!({
                    "storeId": "store123",
                    "invoiceId": "inv_abc123",
                    "refundVariant": "RateThen",
                    "subtractPercentage": "2.5",
                    "description": "Partial refund minus processing fee"
                }),
            )
            .example(
                "Custom amount refund",
                "Refund a specific custom amount",
                json!({
                    "storeId": "store123",
                    "invoiceId": "inv_abc123",
                    "refundVariant": "Custom",
                    "customAmount": "25.00",
                    "customCurrency": "USD"
                }),
            ),
        Route::post("/stores/{storeId}/invoices/{invoiceId}/refund").expect(Shape::Object),
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
    async fn create_renames_buyer_email() {
        let recorder = Arc::new(Recorder::default());
        group(recorder.clone())
            .invoke(
                "create",
                args(json!({"storeId": "s1", "amount": "5", "buyerEmail": "a@b.c"})),
            )
            .await
            .unwrap();

        let body = recorder.last().body.unwrap();
        assert_eq!(body["notificationEmail"], "a@b.c");
        assert_eq!(body["currency"], "USD");
        assert!(body.get("buyerEmail").is_none());
    }

    #[tokio::test]
    async fn advanced_listing_repeats_order_ids() {
        let recorder = Arc::new(Recorder::default());
        group(recorder.clone())
            .invoke(
                "listAdvanced",
                args(json!({"storeId": "s1", "orderId": ["a", "b"], "take": 10})),
            )
            .await
            .unwrap();

        let call = recorder.last();
        assert_eq!(call.path(), "/stores/s1/invoices");
        assert_eq!(
            call.query,
            vec![
                ("orderId".to_string(), "a".to_string()),
                ("orderId".to_string(), "b".to_string()),
                ("take".to_string(), "10".to_string()),
            ]
        );
        assert!(call.body.is_none());
    }

    #[tokio::test]
    async fn mark_status_posts_status_in_body() {
        let recorder = Arc::new(Recorder::default());
        group(recorder.clone())
            .invoke(
                "markStatus",
                args(json!({"storeId": "s1", "invoiceId": "i1", "status": "Settled"})),
            )
            .await
            .unwrap();

        let call = recorder.last();
        assert_eq!(call.path(), "/stores/s1/invoices/i1/status");
        assert_eq!(call.body.unwrap(), json!({"status": "Settled"}));
    }
}
