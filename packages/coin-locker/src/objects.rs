//! Owned-objects viewer
//!
//! Reads the objects owned by the connected address from an
//! [`ObjectSource`] and renders them as explorer links, in the order the
//! source returned them. Only the first page is shown.

use async_trait::async_trait;
use eyre::Result;
use suichain_rs::{ObjectId, SuiAddress, SuiRpcClient};
use tracing::{debug, warn};

/// Read-only query for the objects an address owns
#[async_trait]
pub trait ObjectSource: Send + Sync {
    async fn owned_object_ids(&self, owner: SuiAddress) -> Result<Vec<ObjectId>>;
}

#[async_trait]
impl ObjectSource for SuiRpcClient {
    async fn owned_object_ids(&self, owner: SuiAddress) -> Result<Vec<ObjectId>> {
        let page = self.get_owned_objects(owner, None, None).await?;
        Ok(page
            .data
            .into_iter()
            .filter_map(|entry| entry.data.map(|data| data.object_id))
            .collect())
    }
}

/// An object id and where to look at it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectLink {
    pub object_id: ObjectId,
    pub href: String,
}

/// Explorer page for an object
pub fn object_url(explorer_base: &str, object_id: &ObjectId) -> String {
    format!("{}/object/{}", explorer_base.trim_end_matches('/'), object_id)
}

/// State of the owned-objects query
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OwnedObjects {
    /// Not resolved yet; renders nothing
    #[default]
    Pending,
    /// Ids in query order
    Ready(Vec<ObjectId>),
    /// Query failed; renders the reason
    Failed(String),
}

impl OwnedObjects {
    /// Run the query for `owner`
    pub async fn fetch(source: &dyn ObjectSource, owner: SuiAddress) -> Self {
        match source.owned_object_ids(owner).await {
            Ok(ids) => {
                debug!(owner = %owner, count = ids.len(), "Owned objects loaded");
                OwnedObjects::Ready(ids)
            }
            Err(e) => {
                warn!(owner = %owner, error = %e, "Failed to load owned objects");
                OwnedObjects::Failed(format!("{e:#}"))
            }
        }
    }

    /// One link per object; empty unless resolved
    pub fn links(&self, explorer_base: &str) -> Vec<ObjectLink> {
        match self {
            OwnedObjects::Ready(ids) => ids
                .iter()
                .map(|id| ObjectLink {
                    object_id: *id,
                    href: object_url(explorer_base, id),
                })
                .collect(),
            OwnedObjects::Pending | OwnedObjects::Failed(_) => Vec::new(),
        }
    }

    /// Lines for the text screen
    pub fn render(&self, explorer_base: &str) -> Vec<String> {
        match self {
            OwnedObjects::Failed(reason) => vec![format!("Failed to load objects: {}", reason)],
            _ => self
                .links(explorer_base)
                .into_iter()
                .map(|link| format!("  - {}  {}", link.object_id, link.href))
                .collect(),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, OwnedObjects::Pending)
    }
}
