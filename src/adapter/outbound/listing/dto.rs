//! Wire format of the upstream server listing.

use serde::Deserialize;

use crate::domain::ServerEntry;
use crate::port::outbound::listing::ServerPage;

/// Response body of `GET /v1/games/{id}/servers/Public`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerListResponse {
    #[serde(default)]
    pub data: Vec<ServerEntry>,
    #[serde(default)]
    pub next_page_cursor: Option<String>,
}

impl From<ServerListResponse> for ServerPage {
    fn from(response: ServerListResponse) -> Self {
        Self {
            entries: response.data,
            next_cursor: response.next_page_cursor,
        }
    }
}
