//! Game feed module
//!
//! ```text
//! REST (upcoming | live-feed | finished) ──► FeedSynchronizer::refresh ─┐
//!                                                                       ├──► GameFeedCache ──► broadcast<FeedEvent>
//! WebSocket gameUpdate ──► mpsc<GameEvent> ──► FeedSynchronizer task ───┘
//! ```

mod cache;
mod sync;

pub use cache::{BucketState, FeedEvent, GameFeedCache, RefreshMode};
pub use sync::{dispatch, FeedSyncHandle, FeedSynchronizer, RefreshReport, SharedFeedCache};
