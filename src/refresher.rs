//! Full reload of a result set, used when targeted patching is not
//! possible or has partially failed, and by the polling fallback.

use std::sync::Arc;

use crate::error::QueryError;
use crate::resultset::SharedResultSet;
use crate::store::EntityStore;

pub struct FallbackRefresher {
    store: Arc<dyn EntityStore>,
}

impl FallbackRefresher {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// Re-run the set's defining query (unchanged filters and page
    /// window) and replace its contents wholesale. Rows and total count
    /// reload together.
    ///
    /// Errors are logged and returned; there is no automatic retry. The
    /// next notification, poll tick or manual action tries again.
    pub async fn refresh(&self, set: &SharedResultSet) -> Result<usize, QueryError> {
        let spec = set.read().await.query().clone();

        let (rows, count) = tokio::join!(self.store.query(&spec), self.store.count(&spec));
        let rows = match rows {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!("Reload failed for {}: {}", spec.entity_type, e);
                return Err(e);
            }
        };
        let count = match count {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!("Count reload failed for {}: {}", spec.entity_type, e);
                return Err(e);
            }
        };

        let mut set = set.write().await;
        let loaded = rows.len();
        set.replace_all(rows, count);
        Ok(loaded)
    }
}
