//! Client core of the roadmap site: fetches content from the API, renders it
//! into a headless element tree, and keeps filter and progress state in sync
//! with user events.

pub mod api;
pub mod app;
pub mod browser;
pub mod completion;
pub mod config;
pub mod dom;
pub mod error;
pub mod events;
pub mod render;
pub mod router;

#[cfg(test)]
pub(crate) mod test_support;
