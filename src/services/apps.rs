//! Point-of-Sale and Crowdfund apps

use std::sync::Arc;

use serde_json::json;

use crate::capability::{CapabilityGroup, OperationDescriptor as Op, ParamType as T, Route};
use crate::remote::{RemoteCollaborator, Shape};

const APP_NAME: &str = "Name given to the app when it was created";
const TITLE: &str = "Display title of the app";
const DESCRIPTION: &str = "App description";
const ARCHIVED: &str = "If true, the app does not appear in the apps list by default";
const DEFAULT_VIEW: &str = "App view type (Static, Cart, Light, Print)";
const ENABLE_TIPS: &str = "Whether the option to enter a tip is shown";
const CURRENCY: &str = "Currency used for the app";
const TIP_PERCENTAGES: &str = "Array of predefined tip percentage amounts";
const NOTIFICATION_URL: &str = "Callback notification url to POST to once when invoice is paid";
const HTML_LANG: &str = "Used for SEO, the HTML Lang of the page";
const HTML_META: &str = "Used for SEO, the Meta tags of the page";
const FORM_ID: &str = "Form ID to request customer data";
const CF_ENABLED: &str = "Whether the app is enabled to be viewed by everyone";
const TARGET_CURRENCY: &str = "Target currency for the crowdfund";
const TARGET_AMOUNT: &str = "Target amount for the crowdfund";
const TAGLINE: &str = "Tagline for the app displayed to user";

fn app(name: &str, description: &str) -> Op {
    Op::new(name, description).required("appId", T::String, "App ID")
}

pub fn group(remote: Arc<dyn RemoteCollaborator>) -> CapabilityGroup {
    CapabilityGroup::builder(
        "apps",
        "applications",
        "Manage BTCPayServer apps - create, get, update, delete Point-of-Sale and Crowdfund applications with comprehensive features",
    )
    .route(
        Op::new("listAll", "List all apps for all stores").example(
            "List all apps",
            "Get all apps across all stores",
            json!({}),
        ),
        Route::get("/apps").expect(Shape::Array),
    )
    .route(
        Op::new("listStore", "List all apps for a specific store")
            .required("storeId", T::String, "Store ID")
            .example(
                "List store apps",
                "Get all apps for a store",
                json!({"storeId": "store123"}),
            ),
        Route::get("/stores/{storeId}/apps").expect(Shape::Array),
    )
    .route(
        app("get", "Get basic app data").example(
            "Get app info",
            "Get basic app information",
            json!({"appId": "app_123"}),
        ),
        Route::get("/apps/{appId}").expect(Shape::Object),
    )
    .route(
        Op::new("delete", "Delete an app")
            .required("appId", T::String, "App ID to delete")
            .example(
                "Delete app",
                "Remove an app completely",
                json!({"appId": "app_123"}),
            ),
        Route::delete("/apps/{appId}"),
    )
    .route(
        app("uploadImage", "Upload an image for an app")
            .required(
                "fileData",
                T::Object,
                "FormData object containing the image file",
            )
            .example(
                "Upload app image",
                "Upload an image for app branding",
                json!({"appId": "app_123", "fileData": "FormData with image file"}),
            ),
        Route::post("/apps/{appId}/image")
            .spread("fileData")
            .expect(Shape::Object),
    )
    .route(
        app("deleteImage", "Delete an app image")
            .required("fileId", T::String, "File ID to delete")
            .example(
                "Delete app image",
                "Remove an app image",
                json!({"appId": "app_123", "fileId": "file_456"}),
            ),
        Route::delete("/apps/{appId}/image/{fileId}"),
    )
    .route(
        app("getSalesStatistics", "Get app sales statistics")
            .with_default(
                "numberOfDays",
                T::Number,
                "Number of days to include in statistics",
                7,
            )
            .example(
                "Get sales stats",
                "Get sales statistics for the last 30 days",
                json!({"appId": "app_123", "numberOfDays": 30}),
            ),
        Route::get("/apps/{appId}/sales").expect(Shape::Object),
    )
    .route(
        app("getTopItems", "Get top-selling items for an app")
            .with_default("count", T::Number, "Number of items to return", 5)
            .with_default("offset", T::Number, "Offset for pagination", 0)
            .example(
                "Get top items",
                "Get top 10 selling items",
                json!({"appId": "app_123", "count": 10}),
            ),
        Route::get("/apps/{appId}/top-items").expect(Shape::Array),
    )
    .route(create_pos(), Route::post("/stores/{storeId}/apps/pos").expect(Shape::Object))
    .route(
        app("getPos", "Get Point-of-Sale app details").example(
            "Get POS app",
            "Retrieve POS app configuration",
            json!({"appId": "3ki4jsAkN4u9rv1PUzj1odX4Nx7s"}),
        ),
        Route::get("/apps/pos/{appId}").expect(Shape::Object),
    )
    .route(
        Op::new("updatePos", "Update Point-of-Sale app")
            .required("appId", T::String, "POS App ID")
            .optional("appName", T::String, APP_NAME)
            .optional("title", T::String, TITLE)
            .optional("description", T::String, DESCRIPTION)
            .optional("defaultView", T::String, DEFAULT_VIEW)
            .optional("enableTips", T::Boolean, ENABLE_TIPS)
            .optional("currency", T::String, CURRENCY)
            .optional("customTipPercentages", T::Array, TIP_PERCENTAGES)
            .optional("archived", T::Boolean, ARCHIVED)
            .example(
                "Update POS settings",
                "Update POS app configuration",
                json!({
                    "appId": "pos_app_456",
                    "title": "Updated Coffee Shop",
                    "enableTips": true,
                    "customTipPercentages": [18, 20, 22]
                }),
            ),
        Route::put("/apps/pos/{appId}").expect(Shape::Object),
    )
    .route(
        create_crowdfund(),
        Route::post("/stores/{storeId}/apps/crowdfund").expect(Shape::Object),
    )
    .route(
        app("getCrowdfund", "Get Crowdfund app details").example(
            "Get crowdfund app",
            "Retrieve crowdfund app details",
            json!({"appId": "3ki4jsAkN4u9rv1PUzj1odX4Nx7s"}),
        ),
        Route::get("/apps/crowdfund/{appId}").expect(Shape::Object),
    )
    .route(
        Op::new("updateCrowdfund", "Update Crowdfund app")
            .required("appId", T::String, "Crowdfund App ID")
            .optional("appName", T::String, APP_NAME)
            .optional("title", T::String, TITLE)
            .optional("description", T::String, DESCRIPTION)
            .optional("enabled", T::Boolean, CF_ENABLED)
            .optional("targetAmount", T::String, TARGET_AMOUNT)
            .optional("targetCurrency", T::String, TARGET_CURRENCY)
            .optional("tagline", T::String, TAGLINE)
            .optional("archived", T::Boolean, ARCHIVED)
            .example(
                "Update crowdfund target",
                "Update crowdfund target amount",
                json!({
                    "appId": "crowd_app_789",
                    "targetAmount": "75000",
                    "enabled": true,
                    "tagline": "We are almost there!"
                }),
            ),
        Route::put("/apps/crowdfund/{appId}").expect(Shape::Object),
    )
    .build(remote)
}

fn create_pos() -> Op {
    Op::new("createPos", "Create a new Point-of-Sale app")
        .required("storeId", T::String, "Store ID")
        .required("appName", T::String, APP_NAME)
        .optional("id", T::String, "Id of the app")
        .optional("title", T::String, TITLE)
        .optional("description", T::String, DESCRIPTION)
        .optional("defaultView", T::String, DEFAULT_VIEW)
        .optional("showItems", T::Boolean, "Display item selection for keypad")
        .optional(
            "showCustomAmount",
            T::Boolean,
            "Whether the option to enter a custom amount is shown",
        )
        .optional(
            "showDiscount",
            T::Boolean,
            "Whether the option to enter a discount is shown",
        )
        .optional("showSearch", T::Boolean, "Display the search bar")
        .optional("showCategories", T::Boolean, "Display the list of categories")
        .optional("enableTips", T::Boolean, ENABLE_TIPS)
        .optional("currency", T::String, CURRENCY)
        .optional(
            "fixedAmountPayButtonText",
            T::String,
            "Payment button text template for items with a set price",
        )
        .optional(
            "customAmountPayButtonText",
            T::String,
            "Payment button text which appears for items which allow user to input a custom amount",
        )
        .optional(
            "tipText",
            T::String,
            "Prompt which appears next to the tip amount field if tipping is enabled",
        )
        .optional("customTipPercentages", T::Array, TIP_PERCENTAGES)
        .optional("notificationUrl", T::String, NOTIFICATION_URL)
        .optional(
            "redirectUrl",
            T::String,
            "URL user is redirected to once invoice is paid",
        )
        .with_default(
            "redirectAutomatically",
            T::Boolean,
            "Whether user is redirected to specified redirect URL automatically after the invoice is paid",
            false,
        )
        .optional("htmlLang", T::String, HTML_LANG)
        .optional("htmlMetaTags", T::String, HTML_META)
        .optional("formId", T::String, FORM_ID)
        .with_default("template", T::String, "JSON of item available in the app", "string")
        .optional("archived", T::Boolean, ARCHIVED)
        .example(
            "Create basic POS",
            "Create a simple Point-of-Sale app",
            json!({
                "storeId": "store123",
                "appName": "Coffee Shop POS",
                "id": "coffee-shop-pos",
                "title": "Coffee Shop",
                "description": "Order coffee and pastries",
                "defaultView": "Cart",
                "enableTips": true,
                "currency": "BTC",
                "template": "string",
                "redirectAutomatically": false
            }),
        )
        .example(
            "Create advanced POS",
            "Create a fully configured POS app",
            json!({
                "storeId": "store123",
                "appName": "Restaurant POS",
                "id": "restaurant-pos",
                "title": "Fine Dining Restaurant",
                "description": "Premium dining experience",
                "defaultView": "Cart",
                "showItems": true,
                "showCustomAmount": true,
                "showDiscount": true,
                "enableTips": true,
                "currency": "BTC",
                "customTipPercentages": [15, 18, 20, 25],
                "fixedAmountPayButtonText": "Pay {0}",
                "customAmountPayButtonText": "Pay Amount",
                "tipText": "Service was great?",
                "notificationUrl": "https://myrestaurant.com/webhook",
                "redirectUrl": "https://myrestaurant.com/thankyou",
                "template": "string",
                "redirectAutomatically": false
            }),
        )
}

fn create_crowdfund() -> Op {
    Op::new("createCrowdfund", "Create a new Crowdfund app")
        .required("storeId", T::String, "Store ID")
        .required("appName", T::String, APP_NAME)
        .optional("id", T::String, "Id of the app")
        .optional("title", T::String, TITLE)
        .optional("description", T::String, DESCRIPTION)
        .optional("enabled", T::Boolean, CF_ENABLED)
        .optional(
            "enforceTargetAmount",
            T::Boolean,
            "Whether contributions over the set target amount are allowed",
        )
        .optional("startDate", T::Number, "UNIX timestamp for crowdfund start time")
        .optional("endDate", T::Number, "UNIX timestamp for crowdfund end time")
        .optional("targetCurrency", T::String, TARGET_CURRENCY)
        .optional("targetAmount", T::String, TARGET_AMOUNT)
        .optional(
            "mainImageUrl",
            T::String,
            "URL for image used as a cover image for the app",
        )
        .optional("notificationUrl", T::String, NOTIFICATION_URL)
        .optional("tagline", T::String, TAGLINE)
        .optional("disqusEnabled", T::Boolean, "Whether Disqus is enabled for the app")
        .optional("disqusShortname", T::String, "Disqus shortname to used for the app")
        .optional(
            "soundsEnabled",
            T::Boolean,
            "Whether sounds on new contributions are enabled",
        )
        .optional(
            "animationsEnabled",
            T::Boolean,
            "Whether background animations on new contributions are enabled",
        )
        .optional(
            "resetEveryAmount",
            T::String,
            "Contribution goal reset frequency amount",
        )
        .optional("resetEvery", T::String, "Contribution goal reset frequency")
        .optional("displayPerksValue", T::Boolean, "Whether perk values are displayed")
        .optional(
            "sortPerksByPopularity",
            T::Boolean,
            "Whether perks are sorted by popularity",
        )
        .optional(
            "sounds",
            T::Array,
            "Array of custom sounds which can be used on new contributions",
        )
        .optional(
            "animationColors",
            T::Array,
            "Array of custom HEX colors which can be used for background animations",
        )
        .optional("htmlLang", T::String, HTML_LANG)
        .optional("htmlMetaTags", T::String, HTML_META)
        .optional("formId", T::String, FORM_ID)
        .with_default(
            "perksTemplate",
            T::String,
            "JSON of perks available in the app",
            "string",
        )
        .optional("archived", T::Boolean, ARCHIVED)
        .example(
            "Create project crowdfund",
            "Create a crowdfunding campaign",
            json!({
                "storeId": "store123",
                "appName": "Open Source Project",
                "id": "open-source-project",
                "title": "Fund Our Development",
                "description": "Help us build amazing open source software",
                "targetCurrency": "BTC",
                "targetAmount": "420.69",
                "enabled": true,
                "tagline": "Support innovation",
                "perksTemplate": "string"
            }),
        )
        .example(
            "Create charity crowdfund",
            "Create a charity fundraising campaign",
            json!({
                "storeId": "store123",
                "appName": "Charity Drive",
                "id": "charity-drive",
                "title": "Help Those in Need",
                "description": "Supporting local families during difficult times",
                "targetCurrency": "BTC",
                "targetAmount": "25.0",
                "enabled": true,
                "enforceTargetAmount": false,
                "animationsEnabled": true,
                "soundsEnabled": true,
                "disqusEnabled": true,
                "perksTemplate": "string"
            }),
        )
}
