pub mod auth;
pub mod beneficiaries;
pub mod communities;
pub mod error;
pub mod forms;
pub mod health;
pub mod navigation;
pub mod organizations;
pub mod router;
pub mod session;
pub mod setup;
pub mod state;
pub mod stats;
pub mod users;
pub mod volunteers;

#[cfg(test)]
pub mod test_utils;
