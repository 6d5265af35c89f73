mod user_service;

pub(crate) use user_service::USER_COLUMNS;
pub use user_service::UserService;
