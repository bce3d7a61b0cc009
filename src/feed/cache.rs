//! Bucketed game cache reconciled from REST fetches and push updates

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::common::channels::DEFAULT_BROADCAST_CAPACITY;
use crate::common::traits::GameEventHandler;
use crate::common::types::{Bucket, ConnectionStatus, Game, GameEvent, GameId, GameStatus};

/// What a refresh does to data already on screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RefreshMode {
    /// Blank the bucket while loading and after a failure
    Replace,
    /// Keep the last good games visible until new ones arrive
    #[default]
    KeepPrevious,
}

/// Games and fetch state of one bucket
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BucketState {
    pub games: Vec<Game>,
    pub loading: bool,
    pub error: Option<String>,
}

impl BucketState {
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    fn position(&self, game_id: &str) -> Option<usize> {
        self.games.iter().position(|g| g.id == game_id)
    }
}

/// Change published to feed subscribers
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    BucketLoading(Bucket),
    BucketRefreshed { bucket: Bucket, count: usize },
    BucketFailed { bucket: Bucket, error: String },
    GameMoved {
        game_id: GameId,
        from: Option<Bucket>,
        to: Bucket,
    },
    /// A push update removed the game from every bucket without re-adding it
    GameDropped {
        game_id: GameId,
        status: GameStatus,
    },
}

/// Three disjoint buckets of games: upcoming, live, finished
///
/// A game id is resident in at most one bucket at any time.
pub struct GameFeedCache {
    upcoming: BucketState,
    live: BucketState,
    finished: BucketState,
    events: broadcast::Sender<FeedEvent>,
}

impl Default for GameFeedCache {
    fn default() -> Self {
        Self::new()
    }
}

impl GameFeedCache {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(DEFAULT_BROADCAST_CAPACITY);
        Self {
            upcoming: BucketState::default(),
            live: BucketState::default(),
            finished: BucketState::default(),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FeedEvent> {
        self.events.subscribe()
    }

    pub fn bucket(&self, bucket: Bucket) -> &BucketState {
        match bucket {
            Bucket::Upcoming => &self.upcoming,
            Bucket::Live => &self.live,
            Bucket::Finished => &self.finished,
        }
    }

    fn bucket_mut(&mut self, bucket: Bucket) -> &mut BucketState {
        match bucket {
            Bucket::Upcoming => &mut self.upcoming,
            Bucket::Live => &mut self.live,
            Bucket::Finished => &mut self.finished,
        }
    }

    pub fn games(&self, bucket: Bucket) -> &[Game] {
        &self.bucket(bucket).games
    }

    /// Bucket currently holding a game
    pub fn locate(&self, game_id: &str) -> Option<Bucket> {
        Bucket::ALL
            .into_iter()
            .find(|b| self.bucket(*b).position(game_id).is_some())
    }

    pub fn find(&self, game_id: &str) -> Option<&Game> {
        Bucket::ALL
            .iter()
            .find_map(|b| self.bucket(*b).games.iter().find(|g| g.id == game_id))
    }

    pub fn total_games(&self) -> usize {
        Bucket::ALL.iter().map(|b| self.bucket(*b).games.len()).sum()
    }

    pub fn is_loading(&self) -> bool {
        Bucket::ALL.iter().any(|b| self.bucket(*b).loading)
    }

    /// Mark every bucket as loading ahead of a refresh
    pub fn begin_refresh(&mut self, mode: RefreshMode) {
        for bucket in Bucket::ALL {
            self.begin_bucket_refresh(bucket, mode);
        }
    }

    pub fn begin_bucket_refresh(&mut self, bucket: Bucket, mode: RefreshMode) {
        let state = self.bucket_mut(bucket);
        state.loading = true;
        if mode == RefreshMode::Replace {
            state.games.clear();
        }
        self.publish(FeedEvent::BucketLoading(bucket));
    }

    /// Apply the outcome of one bucket's fetch
    ///
    /// Only `bucket` is touched on failure. On success the fetched games
    /// replace the bucket. A fetched game is accepted only if its own status
    /// belongs in `bucket`, and never pulls a game back from a later bucket
    /// (live or finished) it already occupies; otherwise it is evicted from
    /// the earlier bucket it was in.
    pub fn apply_fetch(
        &mut self,
        bucket: Bucket,
        result: std::result::Result<Vec<Game>, String>,
        mode: RefreshMode,
    ) {
        match result {
            Ok(fetched) => {
                let mut games = Vec::with_capacity(fetched.len());
                for game in fetched {
                    if game.bucket() != Some(bucket) {
                        debug!(game_id = %game.id, status = %game.status, %bucket, "Skipping fetched game with foreign status");
                        continue;
                    }
                    match self.locate(&game.id) {
                        Some(resident) if resident > bucket => {
                            debug!(game_id = %game.id, %resident, %bucket, "Fetched game already moved on");
                            continue;
                        }
                        Some(resident) if resident != bucket => {
                            self.bucket_mut(resident).games.retain(|g| g.id != game.id);
                        }
                        _ => {}
                    }
                    games.push(game);
                }

                let count = games.len();
                let state = self.bucket_mut(bucket);
                state.games = games;
                state.loading = false;
                state.error = None;
                debug!(%bucket, count, "Bucket refreshed");
                self.publish(FeedEvent::BucketRefreshed { bucket, count });
            }
            Err(error) => {
                warn!(%bucket, "Bucket fetch failed: {}", error);
                let state = self.bucket_mut(bucket);
                state.loading = false;
                state.error = Some(error.clone());
                if mode == RefreshMode::Replace {
                    state.games.clear();
                }
                self.publish(FeedEvent::BucketFailed { bucket, error });
            }
        }
    }

    /// Reconcile a push update carrying a game's full current state
    ///
    /// The game leaves whichever bucket held it and is prepended to the live
    /// or finished bucket to match its status. Any other status, upcoming
    /// included, leaves it in no bucket. Returns where the game landed.
    pub fn apply_update(&mut self, game: Game) -> Option<Bucket> {
        let from = self.remove(&game.id);

        match game.status {
            GameStatus::Live | GameStatus::Finished => {
                let to = if game.status == GameStatus::Live {
                    Bucket::Live
                } else {
                    Bucket::Finished
                };
                let game_id = game.id.clone();
                self.bucket_mut(to).games.insert(0, game);
                debug!(%game_id, ?from, %to, "Applied game update");
                self.publish(FeedEvent::GameMoved { game_id, from, to });
                Some(to)
            }
            status => {
                debug!(game_id = %game.id, %status, ?from, "Game update left game outside all buckets");
                self.publish(FeedEvent::GameDropped {
                    game_id: game.id,
                    status,
                });
                None
            }
        }
    }

    /// Remove a game from every bucket, returning the bucket it was in
    pub fn remove(&mut self, game_id: &str) -> Option<Bucket> {
        let mut found = None;
        for bucket in Bucket::ALL {
            let state = self.bucket_mut(bucket);
            let before = state.games.len();
            state.games.retain(|g| g.id != game_id);
            if state.games.len() != before {
                found = Some(bucket);
            }
        }
        found
    }

    fn publish(&self, event: FeedEvent) {
        let _ = self.events.send(event);
    }
}

impl GameEventHandler for GameFeedCache {
    fn handle_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::GameUpdate(game) => {
                self.apply_update(game.clone());
            }
            GameEvent::ConnectionStatus(ConnectionStatus::Reconnecting { attempt }) => {
                debug!(attempt, "Push feed reconnecting");
            }
            GameEvent::Raw(message) => {
                debug!("Ignoring raw push message: {}", message);
            }
            _ => {}
        }
    }

    fn on_connect(&mut self) {
        info!("Push feed connected");
    }

    fn on_disconnect(&mut self, reason: Option<&str>) {
        info!("Push feed disconnected: {}", reason.unwrap_or("no reason given"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::types::{MatchOdds, Team};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn game(id: &str, status: GameStatus) -> Game {
        Game {
            id: id.to_string(),
            home_team: Team::new(format!("{} home", id)),
            away_team: Team::new(format!("{} away", id)),
            league: None,
            match_date: None,
            status,
            odds: MatchOdds::new(dec!(2.0), dec!(3.0), dec!(4.0)),
            scores: None,
        }
    }

    fn ids(cache: &GameFeedCache, bucket: Bucket) -> Vec<String> {
        cache.games(bucket).iter().map(|g| g.id.clone()).collect()
    }

    fn seeded() -> GameFeedCache {
        let mut cache = GameFeedCache::new();
        cache.apply_fetch(
            Bucket::Upcoming,
            Ok(vec![game("u1", GameStatus::Upcoming), game("u2", GameStatus::Upcoming)]),
            RefreshMode::KeepPrevious,
        );
        cache.apply_fetch(
            Bucket::Live,
            Ok(vec![game("l1", GameStatus::Live)]),
            RefreshMode::KeepPrevious,
        );
        cache.apply_fetch(
            Bucket::Finished,
            Ok(vec![game("f1", GameStatus::Finished)]),
            RefreshMode::KeepPrevious,
        );
        cache
    }

    #[test]
    fn test_update_moves_game_to_exactly_one_bucket() {
        let mut cache = seeded();

        let landed = cache.apply_update(game("u1", GameStatus::Live));
        assert_eq!(landed, Some(Bucket::Live));

        assert_eq!(ids(&cache, Bucket::Upcoming), vec!["u2"]);
        assert_eq!(ids(&cache, Bucket::Live), vec!["u1", "l1"]);
        assert_eq!(ids(&cache, Bucket::Finished), vec!["f1"]);
        assert_eq!(cache.locate("u1"), Some(Bucket::Live));
    }

    #[test]
    fn test_updates_prepend_most_recent_first() {
        let mut cache = seeded();
        cache.apply_update(game("l1", GameStatus::Finished));
        cache.apply_update(game("u2", GameStatus::Finished));

        assert_eq!(ids(&cache, Bucket::Finished), vec!["u2", "l1", "f1"]);
        assert!(cache.games(Bucket::Live).is_empty());
    }

    #[test]
    fn test_reapplying_update_is_idempotent() {
        let mut cache = seeded();
        cache.apply_update(game("u1", GameStatus::Live));
        let once = ids(&cache, Bucket::Live);

        cache.apply_update(game("u1", GameStatus::Live));
        assert_eq!(ids(&cache, Bucket::Live), once);
        assert_eq!(cache.total_games(), 4);
    }

    #[test]
    fn test_upcoming_update_drops_game() {
        let mut cache = seeded();
        let mut rx = cache.subscribe();

        let landed = cache.apply_update(game("l1", GameStatus::Upcoming));
        assert_eq!(landed, None);
        assert_eq!(cache.locate("l1"), None);
        assert_eq!(ids(&cache, Bucket::Upcoming), vec!["u1", "u2"]);
        assert_eq!(
            rx.try_recv().unwrap(),
            FeedEvent::GameDropped {
                game_id: "l1".to_string(),
                status: GameStatus::Upcoming
            }
        );
    }

    #[test]
    fn test_cancelled_update_drops_game() {
        let mut cache = seeded();
        assert_eq!(cache.apply_update(game("u2", GameStatus::Cancelled)), None);
        assert!(cache.find("u2").is_none());
    }

    #[test]
    fn test_late_update_wins() {
        let mut cache = seeded();
        cache.apply_update(game("u1", GameStatus::Finished));
        cache.apply_update(game("u1", GameStatus::Live));
        assert_eq!(cache.locate("u1"), Some(Bucket::Live));
        assert!(!ids(&cache, Bucket::Finished).contains(&"u1".to_string()));
    }

    #[test]
    fn test_failed_fetch_only_touches_its_bucket() {
        let mut cache = seeded();
        cache.begin_refresh(RefreshMode::KeepPrevious);
        cache.apply_fetch(Bucket::Finished, Err("boom".to_string()), RefreshMode::KeepPrevious);

        let finished = cache.bucket(Bucket::Finished);
        assert_eq!(finished.error.as_deref(), Some("boom"));
        assert!(!finished.loading);
        assert_eq!(ids(&cache, Bucket::Finished), vec!["f1"]);

        assert!(cache.bucket(Bucket::Upcoming).loading);
        assert_eq!(ids(&cache, Bucket::Upcoming), vec!["u1", "u2"]);
        assert!(!cache.bucket(Bucket::Upcoming).has_error());
    }

    #[test]
    fn test_replace_mode_blanks_failed_bucket() {
        let mut cache = seeded();
        cache.begin_bucket_refresh(Bucket::Live, RefreshMode::Replace);
        assert!(cache.games(Bucket::Live).is_empty());

        cache.apply_fetch(Bucket::Live, Err("timeout".to_string()), RefreshMode::Replace);
        assert!(cache.bucket(Bucket::Live).is_empty());
        assert!(cache.bucket(Bucket::Live).has_error());
    }

    #[test]
    fn test_successful_fetch_clears_error_and_filters_cancelled() {
        let mut cache = GameFeedCache::new();
        cache.apply_fetch(Bucket::Upcoming, Err("down".to_string()), RefreshMode::KeepPrevious);
        cache.apply_fetch(
            Bucket::Upcoming,
            Ok(vec![game("u1", GameStatus::Upcoming), game("c1", GameStatus::Cancelled)]),
            RefreshMode::KeepPrevious,
        );

        assert!(!cache.bucket(Bucket::Upcoming).has_error());
        assert_eq!(ids(&cache, Bucket::Upcoming), vec!["u1"]);
    }

    #[test]
    fn test_fetch_keeps_buckets_disjoint() {
        let mut cache = seeded();
        cache.apply_fetch(
            Bucket::Live,
            Ok(vec![game("u1", GameStatus::Live), game("l1", GameStatus::Live)]),
            RefreshMode::KeepPrevious,
        );

        assert_eq!(ids(&cache, Bucket::Upcoming), vec!["u2"]);
        assert_eq!(ids(&cache, Bucket::Live), vec!["u1", "l1"]);
    }

    #[test]
    fn test_stale_fetch_never_moves_game_backwards() {
        let mut cache = seeded();
        cache.apply_update(game("u1", GameStatus::Live));

        // Upcoming response issued before the kickoff push
        cache.apply_fetch(
            Bucket::Upcoming,
            Ok(vec![game("u1", GameStatus::Upcoming), game("u2", GameStatus::Upcoming)]),
            RefreshMode::KeepPrevious,
        );

        assert_eq!(cache.locate("u1"), Some(Bucket::Live));
        assert_eq!(ids(&cache, Bucket::Upcoming), vec!["u2"]);
    }

    #[test]
    fn test_fetch_order_does_not_decide_bucket() {
        let upcoming = || Ok(vec![game("g1", GameStatus::Upcoming)]);
        let live = || Ok(vec![game("g1", GameStatus::Live)]);

        let mut upcoming_first = GameFeedCache::new();
        upcoming_first.apply_fetch(Bucket::Upcoming, upcoming(), RefreshMode::KeepPrevious);
        upcoming_first.apply_fetch(Bucket::Live, live(), RefreshMode::KeepPrevious);

        let mut live_first = GameFeedCache::new();
        live_first.apply_fetch(Bucket::Live, live(), RefreshMode::KeepPrevious);
        live_first.apply_fetch(Bucket::Upcoming, upcoming(), RefreshMode::KeepPrevious);

        assert_eq!(upcoming_first.locate("g1"), Some(Bucket::Live));
        assert_eq!(live_first.locate("g1"), Some(Bucket::Live));
        assert_eq!(upcoming_first.total_games(), 1);
        assert_eq!(live_first.total_games(), 1);
    }

    #[test]
    fn test_fetch_skips_games_with_foreign_status() {
        let mut cache = GameFeedCache::new();
        cache.apply_fetch(
            Bucket::Live,
            Ok(vec![game("l1", GameStatus::Live), game("f9", GameStatus::Finished)]),
            RefreshMode::KeepPrevious,
        );

        assert_eq!(ids(&cache, Bucket::Live), vec!["l1"]);
        assert_eq!(cache.locate("f9"), None);
    }

    #[test]
    fn test_handle_event_applies_game_updates() {
        let mut cache = seeded();
        cache.handle_event(&GameEvent::GameUpdate(game("u2", GameStatus::Live)));
        cache.handle_event(&GameEvent::Heartbeat);
        assert_eq!(cache.locate("u2"), Some(Bucket::Live));
    }
}
