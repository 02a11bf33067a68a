use async_trait::async_trait;

use crate::audit::Entity;
use crate::query::{FieldSet, ListQuery};

/// Storage contract for one aggregate type.
///
/// Soft-deleted records are invisible to `find`, `any` and `list`, and
/// `update` never touches them.
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    type Field: FieldSet;

    async fn find(&self, id: E::Id) -> anyhow::Result<Option<E>>;

    async fn any(&self) -> anyhow::Result<bool>;

    async fn insert(&self, entity: &E) -> anyhow::Result<()>;

    /// Inserts all entities atomically.
    async fn insert_many(&self, entities: &[E]) -> anyhow::Result<()>;

    /// Overwrites a live record; returns `false` when none matched.
    async fn update(&self, entity: &E) -> anyhow::Result<bool>;

    /// Returns one page of matches and the total count before paging.
    async fn list(&self, query: &ListQuery<Self::Field>) -> anyhow::Result<(Vec<E>, u64)>;
}
