pub mod aggregate;
pub mod dispatch;
pub mod fallback;
pub mod notify;
pub mod opener;
pub mod run_log;
pub mod snapshot;
pub mod strategies;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

#[cfg(test)]
mod boundary_tests;
