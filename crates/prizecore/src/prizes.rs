//! Prize lifecycle: registration, claims, and the unused → used transition.
//!
//! `PrizeManager` owns a handle to the connection pool and checks out one
//! connection per operation. Errors are returned, not swallowed; the bot layer
//! decides which of them the user gets to hear about.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::core::error::AppResult;
use crate::storage::db::{self, now_for_claim, ClaimOutcome, DbPool, PoolStats, Prize, User};
use crate::storage::get_connection;

#[derive(Clone)]
pub struct PrizeManager {
    pool: Arc<DbPool>,
}

impl PrizeManager {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &Arc<DbPool> {
        &self.pool
    }

    /// Registers a user. Returns `false` (and changes nothing) if the id is already known.
    pub fn register_user(&self, user_id: i64, user_name: &str) -> AppResult<bool> {
        let conn = get_connection(&self.pool)?;
        let created = db::create_user(&conn, user_id, user_name)?;
        if created {
            log::info!("Registered user {} ({})", user_id, user_name);
        }
        Ok(created)
    }

    pub fn get_user(&self, user_id: i64) -> AppResult<Option<User>> {
        let conn = get_connection(&self.pool)?;
        db::get_user(&conn, user_id)
    }

    pub fn is_registered(&self, user_id: i64) -> AppResult<bool> {
        Ok(self.get_user(user_id)?.is_some())
    }

    /// Tries to make `user_id` the winner of `prize_id`.
    ///
    /// The first caller wins; everyone after them, including the winner
    /// themselves, gets `AlreadyClaimed`.
    pub fn claim_prize(&self, user_id: i64, prize_id: i64) -> AppResult<ClaimOutcome> {
        let mut conn = get_connection(&self.pool)?;
        let outcome = db::insert_winner_if_unclaimed(&mut conn, user_id, prize_id, now_for_claim())?;
        log::info!("Claim of prize {} by user {}: {:?}", prize_id, user_id, outcome);
        Ok(outcome)
    }

    /// A random prize that has not been broadcast yet, or `None` once the pool is exhausted.
    pub fn pick_unclaimed_prize(&self) -> AppResult<Option<Prize>> {
        let conn = get_connection(&self.pool)?;
        db::get_random_unused_prize(&conn)
    }

    pub fn mark_used(&self, prize_id: i64) -> AppResult<()> {
        let conn = get_connection(&self.pool)?;
        db::mark_prize_used(&conn, prize_id)
    }

    /// Image filenames of every prize the user has won.
    pub fn list_user_wins(&self, user_id: i64) -> AppResult<Vec<String>> {
        let conn = get_connection(&self.pool)?;
        db::get_winner_images(&conn, user_id)
    }

    pub fn list_users(&self) -> AppResult<BTreeSet<i64>> {
        let conn = get_connection(&self.pool)?;
        Ok(db::get_all_user_ids(&conn)?.into_iter().collect())
    }

    pub fn prize_image(&self, prize_id: i64) -> AppResult<Option<String>> {
        let conn = get_connection(&self.pool)?;
        Ok(db::get_prize(&conn, prize_id)?.map(|p| p.image))
    }

    pub fn list_prizes(&self) -> AppResult<Vec<Prize>> {
        let conn = get_connection(&self.pool)?;
        db::get_all_prizes(&conn)
    }

    /// Adds prizes for the given image filenames, skipping ones already known.
    pub fn seed_prizes(&self, images: &[String]) -> AppResult<usize> {
        let conn = get_connection(&self.pool)?;
        let inserted = db::insert_prizes(&conn, images)?;
        log::info!("Seeded {} new prize(s) out of {} image(s)", inserted, images.len());
        Ok(inserted)
    }

    pub fn stats(&self) -> AppResult<PoolStats> {
        let conn = get_connection(&self.pool)?;
        db::get_pool_stats(&conn)
    }
}
