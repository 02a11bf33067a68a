//! Core traits, settings, module registry and the generic CRUD engine.

pub mod audit;
pub mod crud;
pub mod error;
pub mod localization;
pub mod module;
pub mod query;
pub mod registry;
pub mod repository;
pub mod settings;

pub use audit::{AuditInfo, Entity};
pub use crud::{CrudAppService, CrudPolicy};
pub use error::{CrudError, CrudResult};
pub use module::{InitCtx, Migration, Module};
pub use registry::ModuleRegistry;
pub use repository::Repository;
