pub mod countries;
pub mod lookup;

use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Greeting {
    #[serde(rename = "Body")]
    pub body: &'static str,
}

/// `GET /`
pub async fn root() -> Json<Greeting> {
    Json(Greeting {
        body: "Hello, World!",
    })
}
