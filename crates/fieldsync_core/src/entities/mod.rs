//! Concrete entity types of the field-reporting domain.
//!
//! Each entity implements [`crate::SyncRecord`] and owns its document field
//! keys. Foreign keys are stored as plain id fields, never as owned
//! objects; the live reference is always a lookup by id through the other
//! type's repository.
//!
//! Dependency order for synchronization (a caller contract, see the engine
//! crate): `roles` before `users`; `users`, `companies` before `reports`;
//! `reports`, `progress_statuses` before `report_progress`; `reports`
//! before `report_photos`; `users` before `blocked_users`.

mod blocked_user;
mod company;
mod parameter;
mod photo;
mod progress;
mod progress_status;
mod report;
mod role;
mod user;

pub use blocked_user::BlockedUser;
pub use company::Company;
pub use parameter::Parameter;
pub use photo::Photo;
pub use progress::Progress;
pub use progress_status::ProgressStatus;
pub use report::Report;
pub use role::Role;
pub use user::User;

pub use blocked_user::fields as blocked_user_fields;
pub use company::fields as company_fields;
pub use parameter::fields as parameter_fields;
pub use photo::fields as photo_fields;
pub use progress::fields as progress_fields;
pub use progress_status::fields as progress_status_fields;
pub use report::fields as report_fields;
pub use role::fields as role_fields;
pub use user::fields as user_fields;
