pub mod accounts;
pub mod auth;
pub mod locks;
pub mod stats;
