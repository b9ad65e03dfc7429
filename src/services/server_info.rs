//! Server version and capabilities

use std::sync::Arc;

use serde_json::json;

use crate::capability::{CapabilityGroup, OperationDescriptor as Op, Route};
use crate::remote::{RemoteCollaborator, Shape};

pub fn group(remote: Arc<dyn RemoteCollaborator>) -> CapabilityGroup {
    CapabilityGroup::builder(
        "server-info",
        "system",
        "Get BTCPayServer information - server details",
    )
    .route(
        Op::new("getInfo", "Get general server information").example(
            "Get server info",
            "Retrieve BTCPayServer version and basic information",
            json!({}),
        ),
        Route::get("/server/info").expect(Shape::Object),
    )
    .build(remote)
}
