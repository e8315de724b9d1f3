pub mod query_factory;
pub mod redirect;
pub mod sort;
pub mod ui_error;
pub mod validation;
