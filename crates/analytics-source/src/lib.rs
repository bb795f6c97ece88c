//! Day fetchers: Zendesk REST API and offline fixtures.

mod classify;
mod fixture;
mod zendesk;

pub use classify::CallClassifier;
pub use fixture::FixtureSource;
pub use zendesk::{CallDayFetcher, TicketDayFetcher, ZendeskClient, ZendeskConfig};
