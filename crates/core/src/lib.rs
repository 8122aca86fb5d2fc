pub mod booking;
pub mod errors;
pub mod locale;
pub mod models;
