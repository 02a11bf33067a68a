//! Generic CRUD application service.
//!
//! A [`CrudPolicy`] names the entity, its DTO and request types and supplies the
//! mapping between them. [`CrudAppService`] combines a policy with a
//! [`Repository`] and implements get/list/create/update/delete once for all
//! entities.

use std::marker::PhantomData;
use std::sync::Arc;

use garde::Validate;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::audit::{AuditInfo, Entity};
use crate::error::{CrudError, CrudResult};
use crate::query::{
    parse_sorting, FieldSet, FilterSpec, ListQuery, PageRequest, PagedAndSortedRequest,
    PagedResult, SortField,
};
use crate::repository::Repository;

/// Entity-specific types and mapping plugged into [`CrudAppService`].
pub trait CrudPolicy: Send + Sync + 'static {
    type Entity: Entity;
    type Field: FieldSet;
    type Dto: Send;
    type ListInput: PagedAndSortedRequest + Send + Sync;
    type CreateInput: Validate<Context = ()> + Send;
    type UpdateInput: Validate<Context = ()> + Send;

    fn to_dto(entity: Self::Entity) -> Self::Dto;

    fn create_entity(
        id: <Self::Entity as Entity>::Id,
        input: Self::CreateInput,
        audit: AuditInfo,
    ) -> Self::Entity;

    fn apply_update(entity: &mut Self::Entity, input: Self::UpdateInput);

    fn new_id() -> <Self::Entity as Entity>::Id;

    /// Restricts the listing according to the request. Unrestricted by default.
    fn filter(_input: &Self::ListInput) -> FilterSpec<Self::Field> {
        FilterSpec::default()
    }

    /// Order used when the request carries no sorting.
    fn default_sorting() -> Vec<SortField<Self::Field>> {
        Vec::new()
    }
}

pub struct CrudAppService<P, R> {
    repository: Arc<R>,
    _policy: PhantomData<fn() -> P>,
}

impl<P, R> Clone for CrudAppService<P, R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            _policy: PhantomData,
        }
    }
}

impl<P, R> CrudAppService<P, R>
where
    P: CrudPolicy,
    R: Repository<P::Entity, Field = P::Field>,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            _policy: PhantomData,
        }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    pub async fn get(&self, id: <P::Entity as Entity>::Id) -> CrudResult<P::Dto> {
        let entity = self.find_live(id).await?;
        Ok(P::to_dto(entity))
    }

    pub async fn get_list(&self, input: &P::ListInput) -> CrudResult<PagedResult<P::Dto>> {
        let query = Self::list_query(input)?;
        let (items, total_count) = self.repository.list(&query).await?;
        Ok(PagedResult { items, total_count }.map(P::to_dto))
    }

    pub async fn create(&self, input: P::CreateInput, actor: Option<Uuid>) -> CrudResult<P::Dto> {
        input.validate()?;

        let audit = AuditInfo::created(actor, OffsetDateTime::now_utc());
        let entity = P::create_entity(P::new_id(), input, audit);
        self.repository.insert(&entity).await?;

        tracing::info!(entity = <P::Entity as Entity>::NAME, id = %entity.id(), "created");
        Ok(P::to_dto(entity))
    }

    pub async fn update(
        &self,
        id: <P::Entity as Entity>::Id,
        input: P::UpdateInput,
        actor: Option<Uuid>,
    ) -> CrudResult<P::Dto> {
        input.validate()?;

        let mut entity = self.find_live(id).await?;
        P::apply_update(&mut entity, input);
        entity.audit_mut().modified(actor, OffsetDateTime::now_utc());

        if !self.repository.update(&entity).await? {
            return Err(CrudError::not_found(<P::Entity as Entity>::NAME, id));
        }

        tracing::info!(entity = <P::Entity as Entity>::NAME, id = %id, "updated");
        Ok(P::to_dto(entity))
    }

    pub async fn delete(&self, id: <P::Entity as Entity>::Id, actor: Option<Uuid>) -> CrudResult<()> {
        let mut entity = self.find_live(id).await?;
        entity.audit_mut().deleted(actor, OffsetDateTime::now_utc());

        if !self.repository.update(&entity).await? {
            return Err(CrudError::not_found(<P::Entity as Entity>::NAME, id));
        }

        tracing::info!(entity = <P::Entity as Entity>::NAME, id = %id, "soft deleted");
        Ok(())
    }

    /// Composes filter, sorting and paging for a list request.
    pub fn list_query(input: &P::ListInput) -> CrudResult<ListQuery<P::Field>> {
        let page = PageRequest::from_raw(input.skip_count(), input.max_result_count())?;
        let mut sorting = parse_sorting(input.sorting().unwrap_or_default())?;
        if sorting.is_empty() {
            sorting = P::default_sorting();
        }

        Ok(ListQuery {
            filter: P::filter(input),
            sorting,
            page,
        })
    }

    async fn find_live(&self, id: <P::Entity as Entity>::Id) -> CrudResult<P::Entity> {
        self.repository
            .find(id)
            .await?
            .filter(|e| !e.audit().is_deleted)
            .ok_or_else(|| CrudError::not_found(<P::Entity as Entity>::NAME, id))
    }
}
