mod fixture_store;
mod auth_session;
mod overlay;
pub mod queries;
pub mod web_session;

pub use fixture_store::FixtureStore;
#[cfg(test)]
pub use fixture_store::FixtureData;
pub use auth_session::AuthSession;
pub use overlay::StatusOverlay;
