//! On-chain store wallet: balance, addresses, transactions and UTXOs

use std::sync::Arc;

use serde_json::json;

use crate::capability::{CapabilityGroup, OperationDescriptor as Op, ParamType as T, Route};
use crate::remote::{RemoteCollaborator, Shape};

/// Operation scoped to one store wallet
fn wallet(name: &str, description: &str) -> Op {
    Op::new(name, description)
        .required("storeId", T::String, "Store ID")
        .required("paymentMethodId", T::String, "Payment method ID (e.g., BTC-CHAIN)")
}

fn btc_chain() -> serde_json::Value {
    json!({"storeId": "store123", "paymentMethodId": "BTC-CHAIN"})
}

pub fn group(remote: Arc<dyn RemoteCollaborator>) -> CapabilityGroup {
    CapabilityGroup::builder(
        "stores-wallet",
        "store-management",
        "Store wallet (on-chain) operations - manage wallet balance, transactions, addresses, and UTXOs",
    )
    .route(
        wallet("getWalletOverview", "Get store on-chain wallet overview").example(
            "Get Bitcoin wallet overview",
            "Get Bitcoin wallet balance information",
            btc_chain(),
        ),
        Route::get("/stores/{storeId}/payment-methods/{paymentMethodId}/wallet")
            .expect(Shape::Object),
    )
    .route(
        wallet("getWalletHistogram", "Get store on-chain wallet balance histogram").example(
            "Get wallet histogram",
            "Get wallet balance histogram over time",
            btc_chain(),
        ),
        Route::get("/stores/{storeId}/payment-methods/{paymentMethodId}/wallet/histogram"),
    )
    .route(
        wallet("getWalletFeeRate", "Get store on-chain wallet fee rate")
            .optional(
                "blockTarget",
                T::Number,
                "Number of blocks away for confirmation target",
            )
            .example(
                "Get current fee rate",
                "Get recommended fee rate for transactions",
                json!({"storeId": "store123", "paymentMethodId": "BTC-CHAIN", "blockTarget": 6}),
            ),
        Route::get("/stores/{storeId}/payment-methods/{paymentMethodId}/wallet/feerate")
            .expect(Shape::Object),
    )
    .route(
        wallet("getWalletAddress", "Get or generate address for wallet")
            .with_default(
                "forceGenerate",
                T::Boolean,
                "Generate a new address even if previous one was not used",
                false,
            )
            .example(
                "Get wallet address",
                "Get a receiving address for the wallet",
                btc_chain(),
            ),
        Route::get("/stores/{storeId}/payment-methods/{paymentMethodId}/wallet/address")
            .expect(Shape::Object),
    )
    .route(
        wallet("unreserveWalletAddress", "Unreserve last store on-chain wallet address").example(
            "Unreserve address",
            "Unreserve the last generated address",
            btc_chain(),
        ),
        Route::delete("/stores/{storeId}/payment-methods/{paymentMethodId}/wallet/address"),
    )
    .route(
        wallet("getWalletTransactions", "Get store on-chain wallet transactions")
            .optional("labelFilter", T::String, "Transaction label to filter by")
            .optional("limit", T::Number, "Maximum number of transactions to return")
            .optional("skip", T::Number, "Number of transactions to skip from the start")
            .optional("statusFilter", T::Array, "Statuses to filter the transactions with")
            .example(
                "Get recent transactions",
                "Get the last 10 confirmed transactions",
                json!({
                    "storeId": "store123",
                    "paymentMethodId": "BTC-CHAIN",
                    "limit": 10,
                    "statusFilter": ["Confirmed"]
                }),
            ),
        Route::get("/stores/{storeId}/payment-methods/{paymentMethodId}/wallet/transactions")
            .expect(Shape::Array),
    )
    .route(
        wallet("createWalletTransaction", "Create store on-chain wallet transaction")
            .required(
                "destinations",
                T::Array,
                "Array of destination objects with address and amount",
            )
            .optional("feerate", T::Number, "Transaction fee rate")
            .with_default(
                "proceedWithPayjoin",
                T::Boolean,
                "Whether to attempt BIP78 payjoin",
                true,
            )
            .with_default(
                "proceedWithBroadcast",
                T::Boolean,
                "Whether to broadcast the transaction after creating",
                true,
            )
            .with_default("noChange", T::Boolean, "Send all spent coins to destinations", false)
            .optional("rbf", T::Boolean, "Enable RBF for the transaction")
            .optional(
                "excludeUnconfirmed",
                T::Boolean,
                "Only spend confirmed coins",
            )
            .optional(
                "selectedInputs",
                T::Array,
                "Outpoints (txid-vout) to restrict coin selection to",
            )
            .example(
                "Send Bitcoin transaction",
                "Create and broadcast a Bitcoin transaction",
                json!({
                    "storeId": "store123",
                    "paymentMethodId": "BTC-CHAIN",
                    "destinations": [
                        {"address": "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa", "amount": "0.001"}
                    ],
                    "feerate": 10
                }),
            ),
        Route::post("/stores/{storeId}/payment-methods/{paymentMethodId}/wallet/transactions"),
    )
    .route(
        wallet("getWalletTransaction", "Get store on-chain wallet transaction")
            .required("transactionId", T::String, "The transaction id to fetch")
            .example(
                "Get transaction details",
                "Get details of a specific transaction",
                json!({
                    "storeId": "store123",
                    "paymentMethodId": "BTC-CHAIN",
                    "transactionId": "abc123..."
                }),
            ),
        Route::get(
            "/stores/{storeId}/payment-methods/{paymentMethodId}/wallet/transactions/{transactionId}",
        )
        .expect(Shape::Object),
    )
    .route(
        wallet("updateWalletTransaction", "Update store on-chain wallet transaction info")
            .required("transactionId", T::String, "The transaction id to update")
            .optional("comment", T::String, "Transaction comment")
            .optional("labels", T::Array, "Transaction labels")
            .optional(
                "force",
                T::Boolean,
                "Update even if transaction does not exist yet",
            )
            .example(
                "Add comment to transaction",
                "Add a comment to a transaction",
                json!({
                    "storeId": "store123",
                    "paymentMethodId": "BTC-CHAIN",
                    "transactionId": "abc123...",
                    "comment": "Payment to supplier"
                }),
            ),
        Route::patch(
            "/stores/{storeId}/payment-methods/{paymentMethodId}/wallet/transactions/{transactionId}",
        )
        .query(&["force"])
        .expect(Shape::Object),
    )
    .route(
        wallet("getWalletUTXOs", "Get store on-chain wallet UTXOs").example(
            "Get wallet UTXOs",
            "Get all unspent transaction outputs",
            btc_chain(),
        ),
        Route::get("/stores/{storeId}/payment-methods/{paymentMethodId}/wallet/utxos")
            .expect(Shape::Array),
    )
    .route(
        wallet("generateWallet", "Generate a wallet and update store payment method")
            .optional("label", T::String, "A label for the wallet")
            .optional("existingMnemonic", T::String, "A BIP39 mnemonic")
            .optional("passphrase", T::String, "A passphrase for the BIP39 mnemonic seed")
            .with_default(
                "accountNumber",
                T::Number,
                "The account to derive from the BIP39 mnemonic seed",
                0,
            )
            .with_default(
                "savePrivateKeys",
                T::Boolean,
                "Whether to store the seed inside BTCPay Server",
                false,
            )
            .with_default(
                "importKeysToRPC",
                T::Boolean,
                "Whether to import addresses to the underlying node wallet",
                false,
            )
            .with_default("wordList", T::String, "Word list for mnemonic generation", "English")
            .with_default("wordCount", T::Number, "Word count for mnemonic generation", 12)
            .with_default(
                "scriptPubKeyType",
                T::String,
                "The type of wallet to generate",
                "Segwit",
            )
            .example(
                "Generate new wallet",
                "Generate a new Bitcoin wallet for the store",
                json!({
                    "storeId": "store123",
                    "paymentMethodId": "BTC-CHAIN",
                    "label": "Store Main Wallet",
                    "savePrivateKeys": true,
                    "scriptPubKeyType": "Segwit"
                }),
            ),
        Route::post("/stores/{storeId}/payment-methods/{paymentMethodId}/wallet/generate"),
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
    async fn status_filter_repeats_in_query() {
        let recorder = Arc::new(Recorder::default());
        group(recorder.clone())
            .invoke(
                "getWalletTransactions",
                args(json!({
                    "storeId": "s1",
                    "paymentMethodId": "BTC-CHAIN",
                    "limit": 5,
                    "statusFilter": ["Confirmed", "Unconfirmed"]
                })),
            )
            .await
            .unwrap();

        let call = recorder.last();
        assert_eq!(call.path(), "/stores/s1/payment-methods/BTC-CHAIN/wallet/transactions");
        assert_eq!(
            call.query,
            vec![
                ("limit".to_string(), "5".to_string()),
                ("statusFilter".to_string(), "Confirmed".to_string()),
                ("statusFilter".to_string(), "Unconfirmed".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn transaction_update_sends_force_as_query() {
        let recorder = Arc::new(Recorder::default());
        group(recorder.clone())
            .invoke(
                "updateWalletTransaction",
                args(json!({
                    "storeId": "s1",
                    "paymentMethodId": "BTC-CHAIN",
                    "transactionId": "tx1",
                    "labels": ["rent"],
                    "force": true
                })),
            )
            .await
            .unwrap();

        let call = recorder.last();
        assert_eq!(call.method, Method::PATCH);
        assert_eq!(call.query, vec![("force".to_string(), "true".to_string())]);
        assert_eq!(call.body.unwrap(), json!({"labels": ["rent"]}));
    }

    #[tokio::test]
    async fn new_address_is_not_forced_by_default() {
        let recorder = Arc::new(Recorder::default());
        group(recorder.clone())
            .invoke("getWalletAddress", args(btc_chain()))
            .await
            .unwrap();

        assert_eq!(
            recorder.last().query,
            vec![("forceGenerate".to_string(), "false".to_string())]
        );
    }
}
