pub mod inquiry_service;
pub mod listing_service;
pub mod offer_service;
pub mod profile_service;
pub mod user_service;

/// Error type for service operations
#[derive(Debug)]
pub enum ServiceError {
    Database(String),
    NotFound,
    /// A field failed form validation; nothing was written.
    Validation {
        field: &'static str,
        message: String,
    },
    /// The operation is not allowed in the entity's current state.
    InvalidState(String),
}

impl ServiceError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        ServiceError::Validation {
            field,
            message: message.into(),
        }
    }
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self {
        ServiceError::Database(e.to_string())
    }
}
