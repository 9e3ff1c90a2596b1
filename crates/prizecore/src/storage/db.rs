use chrono::{Local, NaiveDateTime, Timelike};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use serde::Serialize;
use std::time::Duration;

use crate::core::error::AppResult;
use crate::storage::migrations::run_migrations;

/// Format of `winners.win_time`
pub const WIN_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A registered bot user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    /// Telegram chat ID
    pub user_id: i64,
    /// Telegram username, or `user_<id>` when the account has none
    pub user_name: String,
}

/// A distributable image record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prize {
    pub prize_id: i64,
    /// Filename inside the images directory
    pub image: String,
    /// Set once the prize has been broadcast
    pub used: bool,
}

/// Record of a user being the first to claim a prize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WinClaim {
    pub user_id: i64,
    pub prize_id: i64,
    pub win_time: NaiveDateTime,
}

/// Result of a claim attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// The claim was recorded; the caller is the winner
    Granted,
    /// Somebody (possibly the same user) already holds this prize
    AlreadyClaimed,
    /// No prize with that id exists
    UnknownPrize,
}

impl ClaimOutcome {
    pub fn is_granted(self) -> bool {
        self == ClaimOutcome::Granted
    }
}

/// Aggregate numbers about the prize pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    pub users: u64,
    pub prizes: u64,
    pub used: u64,
    pub claimed: u64,
}

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConnection = PooledConnection<SqliteConnectionManager>;

/// Create a new database connection pool
///
/// Initializes a pool with up to 10 connections and applies schema migrations
/// on the first connection.
///
/// # Arguments
///
/// * `database_path` - Path to SQLite database file
///
/// # Example
///
/// ```no_run
/// use prizecore::storage::create_pool;
///
/// let pool = create_pool("database.sqlite")?;
/// # Ok::<(), prizecore::AppError>(())
/// ```
pub fn create_pool(database_path: &str) -> AppResult<DbPool> {
    let manager = SqliteConnectionManager::file(database_path)
        .with_init(|conn| conn.busy_timeout(Duration::from_secs(5)));
    let pool = Pool::builder()
        .max_size(10) // Maximum 10 connections in the pool
        .build(manager)?;

    let mut conn = pool.get()?;
    run_migrations(&mut conn)?;

    Ok(pool)
}

/// Get a connection from the pool
///
/// The connection is returned to the pool when dropped.
pub fn get_connection(pool: &DbPool) -> AppResult<DbConnection> {
    Ok(pool.get()?)
}

fn prize_from_row(row: &Row<'_>) -> rusqlite::Result<Prize> {
    Ok(Prize {
        prize_id: row.get(0)?,
        image: row.get(1)?,
        used: row.get::<_, i64>(2)? != 0,
    })
}

fn win_claim_from_row(row: &Row<'_>) -> rusqlite::Result<WinClaim> {
    let raw: String = row.get(2)?;
    let win_time = NaiveDateTime::parse_from_str(&raw, WIN_TIME_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;
    Ok(WinClaim {
        user_id: row.get(0)?,
        prize_id: row.get(1)?,
        win_time,
    })
}

/// Registers a user unless the id is already known.
///
/// # Returns
///
/// `Ok(true)` if a new row was inserted, `Ok(false)` if the user already existed.
pub fn create_user(conn: &Connection, user_id: i64, user_name: &str) -> AppResult<bool> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO users (user_id, user_name) VALUES (?1, ?2)",
        params![user_id, user_name],
    )?;
    Ok(inserted > 0)
}

/// Looks up a user by chat ID.
pub fn get_user(conn: &Connection, user_id: i64) -> AppResult<Option<User>> {
    let user = conn
        .query_row(
            "SELECT user_id, user_name FROM users WHERE user_id = ?1",
            params![user_id],
            |row| {
                Ok(User {
                    user_id: row.get(0)?,
                    user_name: row.get(1)?,
                })
            },
        )
        .optional()?;
    Ok(user)
}

/// Returns the chat IDs of all registered users, oldest registration first.
pub fn get_all_user_ids(conn: &Connection) -> AppResult<Vec<i64>> {
    let mut stmt = conn.prepare("SELECT user_id FROM users ORDER BY rowid")?;
    let ids = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<i64>, _>>()?;
    Ok(ids)
}

/// Inserts prizes for the given image filenames in one transaction.
///
/// Filenames already present are skipped, so seeding is safe to repeat.
///
/// # Returns
///
/// Number of prizes actually inserted.
pub fn insert_prizes(conn: &Connection, images: &[String]) -> AppResult<usize> {
    let tx = conn.unchecked_transaction()?;
    let mut inserted = 0;
    {
        let mut stmt = tx.prepare("INSERT OR IGNORE INTO prizes (image) VALUES (?1)")?;
        for image in images {
            inserted += stmt.execute(params![image])?;
        }
    }
    tx.commit()?;
    Ok(inserted)
}

/// Looks up a prize by id.
pub fn get_prize(conn: &Connection, prize_id: i64) -> AppResult<Option<Prize>> {
    let prize = conn
        .query_row(
            "SELECT prize_id, image, used FROM prizes WHERE prize_id = ?1",
            params![prize_id],
            prize_from_row,
        )
        .optional()?;
    Ok(prize)
}

/// Returns every prize ordered by id.
pub fn get_all_prizes(conn: &Connection) -> AppResult<Vec<Prize>> {
    let mut stmt = conn.prepare("SELECT prize_id, image, used FROM prizes ORDER BY prize_id")?;
    let prizes = stmt.query_map([], prize_from_row)?.collect::<Result<Vec<_>, _>>()?;
    Ok(prizes)
}

/// Picks one prize uniformly at random among those not yet broadcast.
pub fn get_random_unused_prize(conn: &Connection) -> AppResult<Option<Prize>> {
    let prize = conn
        .query_row(
            "SELECT prize_id, image, used FROM prizes WHERE used = 0 ORDER BY RANDOM() LIMIT 1",
            [],
            prize_from_row,
        )
        .optional()?;
    Ok(prize)
}

/// Flags a prize as broadcast. Marking an already used or unknown prize is a no-op.
pub fn mark_prize_used(conn: &Connection, prize_id: i64) -> AppResult<()> {
    conn.execute("UPDATE prizes SET used = 1 WHERE prize_id = ?1", params![prize_id])?;
    Ok(())
}

/// Records `user_id` as the winner of `prize_id` if nobody holds it yet.
///
/// The existence check and the insert run in one IMMEDIATE transaction, and the
/// insert itself is conditional on the unique index over `winners.prize_id`, so
/// two concurrent claimants can never both be granted.
pub fn insert_winner_if_unclaimed(
    conn: &mut Connection,
    user_id: i64,
    prize_id: i64,
    won_at: NaiveDateTime,
) -> AppResult<ClaimOutcome> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let prize_exists: bool = tx.query_row(
        "SELECT EXISTS(SELECT 1 FROM prizes WHERE prize_id = ?1)",
        params![prize_id],
        |row| row.get(0),
    )?;
    if !prize_exists {
        return Ok(ClaimOutcome::UnknownPrize);
    }

    let inserted = tx.execute(
        "INSERT OR IGNORE INTO winners (user_id, prize_id, win_time) VALUES (?1, ?2, ?3)",
        params![user_id, prize_id, won_at.format(WIN_TIME_FORMAT).to_string()],
    )?;
    tx.commit()?;

    Ok(if inserted == 1 {
        ClaimOutcome::Granted
    } else {
        ClaimOutcome::AlreadyClaimed
    })
}

/// Current local time truncated to the stored precision.
pub fn now_for_claim() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Returns the winner of a prize, if any.
pub fn get_prize_winner(conn: &Connection, prize_id: i64) -> AppResult<Option<WinClaim>> {
    let claim = conn
        .query_row(
            "SELECT user_id, prize_id, win_time FROM winners WHERE prize_id = ?1",
            params![prize_id],
            win_claim_from_row,
        )
        .optional()?;
    Ok(claim)
}

/// Returns every claim a user holds.
pub fn get_user_claims(conn: &Connection, user_id: i64) -> AppResult<Vec<WinClaim>> {
    let mut stmt = conn.prepare("SELECT user_id, prize_id, win_time FROM winners WHERE user_id = ?1 ORDER BY rowid")?;
    let claims = stmt
        .query_map(params![user_id], win_claim_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(claims)
}

/// Returns image filenames of every prize the user has won.
pub fn get_winner_images(conn: &Connection, user_id: i64) -> AppResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT prizes.image FROM winners
         INNER JOIN prizes ON winners.prize_id = prizes.prize_id
         WHERE winners.user_id = ?1
         ORDER BY winners.rowid",
    )?;
    let images = stmt
        .query_map(params![user_id], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;
    Ok(images)
}

/// Counts users, prizes, broadcast prizes and claimed prizes.
pub fn get_pool_stats(conn: &Connection) -> AppResult<PoolStats> {
    let stats = conn.query_row(
        "SELECT
            (SELECT COUNT(*) FROM users),
            (SELECT COUNT(*) FROM prizes),
            (SELECT COUNT(*) FROM prizes WHERE used = 1),
            (SELECT COUNT(*) FROM winners)",
        [],
        |row| {
            Ok(PoolStats {
                users: row.get::<_, i64>(0)?.max(0) as u64,
                prizes: row.get::<_, i64>(1)?.max(0) as u64,
                used: row.get::<_, i64>(2)?.max(0) as u64,
                claimed: row.get::<_, i64>(3)?.max(0) as u64,
            })
        },
    )?;
    Ok(stats)
}
