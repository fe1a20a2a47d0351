// Application layer - use cases over the device API
pub mod carlos_api;
pub mod dashboard_service;
pub mod device_store;
pub mod request_cache;
pub mod streaming_service;

#[cfg(test)]
pub(crate) mod testing;
