pub mod bills;
pub mod db;
pub mod error;
pub mod fmt;
pub mod models;
pub mod new_bill;
pub mod proof;
pub mod review;
pub mod router;
pub mod routes;
pub mod session;
pub mod settings;
pub mod storage;
pub mod store;
pub mod ui;
pub mod views;

pub use error::{BilledError, Result};
pub use router::Router;
