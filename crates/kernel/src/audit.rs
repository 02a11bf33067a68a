//! Full audit metadata carried by every aggregate root.

use time::OffsetDateTime;
use uuid::Uuid;

/// Creation, modification and soft-deletion stamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditInfo {
    pub creation_time: OffsetDateTime,
    pub creator_id: Option<Uuid>,
    pub last_modification_time: Option<OffsetDateTime>,
    pub last_modifier_id: Option<Uuid>,
    pub is_deleted: bool,
    pub deleter_id: Option<Uuid>,
    pub deletion_time: Option<OffsetDateTime>,
}

impl AuditInfo {
    /// Stamps for a record created by `actor` at `now`.
    pub fn created(actor: Option<Uuid>, now: OffsetDateTime) -> Self {
        Self {
            creation_time: now,
            creator_id: actor,
            last_modification_time: None,
            last_modifier_id: None,
            is_deleted: false,
            deleter_id: None,
            deletion_time: None,
        }
    }

    pub fn modified(&mut self, actor: Option<Uuid>, now: OffsetDateTime) {
        self.last_modification_time = Some(now);
        self.last_modifier_id = actor;
    }

    pub fn deleted(&mut self, actor: Option<Uuid>, now: OffsetDateTime) {
        self.is_deleted = true;
        self.deleter_id = actor;
        self.deletion_time = Some(now);
    }
}

/// Aggregate root with a stable identity and full audit metadata.
pub trait Entity: Clone + Send + Sync + 'static {
    type Id: Copy + std::fmt::Display + Send + Sync + 'static;

    /// Human readable name used in errors and logs.
    const NAME: &'static str;

    fn id(&self) -> Self::Id;
    fn audit(&self) -> &AuditInfo;
    fn audit_mut(&mut self) -> &mut AuditInfo;
}
