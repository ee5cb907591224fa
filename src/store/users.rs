//! Player accounts and their progress rows

use rusqlite::{params, Connection, OptionalExtension};

use super::db::GameDb;
use super::{now_ms, ProgressStore, StoreError};
use crate::domain::{Chapter, Progress, ProgressRecord, UserAccount, UserId};

/// Data needed to create an account
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Already normalized (trimmed, lowercased)
    pub username: String,
    pub credential_hash: String,
}

#[derive(Clone)]
pub struct UserStore {
    db: GameDb,
}

impl UserStore {
    pub fn new(db: GameDb) -> Self {
        Self { db }
    }

    pub fn create_user(&self, new_user: &NewUser) -> Result<UserAccount, StoreError> {
        let now = now_ms();
        let conn = self.db.conn()?;
        let inserted = conn.execute(
            r#"INSERT INTO users (username, credential_hash, score, version, created_at, updated_at)
               VALUES (?1, ?2, 0, 0, ?3, ?3)"#,
            params![new_user.username, new_user.credential_hash, now],
        );
        match inserted {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                return Err(StoreError::UsernameTaken(new_user.username.clone()));
            }
            Err(e) => return Err(e.into()),
        }

        Ok(UserAccount {
            id: UserId(conn.last_insert_rowid()),
            username: new_user.username.clone(),
            credential_hash: new_user.credential_hash.clone(),
            score: 0,
            progress: Progress::new(),
            version: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// Case-insensitive lookup
    pub fn find_by_username(&self, username: &str) -> Result<Option<UserAccount>, StoreError> {
        let conn = self.db.conn()?;
        let id: Option<i64> = conn
            .query_row(
                "SELECT id FROM users WHERE username = ?1",
                [username.trim()],
                |r| r.get(0),
            )
            .optional()?;
        match id {
            Some(id) => load_user(&conn, UserId(id)),
            None => Ok(None),
        }
    }

    pub fn count(&self) -> Result<u64, StoreError> {
        let conn = self.db.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |r| r.get(0))?;
        Ok(count as u64)
    }
}

impl ProgressStore for UserStore {
    fn get_user(&self, id: UserId) -> Result<Option<UserAccount>, StoreError> {
        let conn = self.db.conn()?;
        load_user(&conn, id)
    }

    fn save_user(&self, account: &mut UserAccount) -> Result<(), StoreError> {
        let now = now_ms();
        let mut conn = self.db.conn()?;
        // Dropping the transaction without commit rolls everything back
        let tx = conn.transaction()?;

        let updated = tx.execute(
            r#"UPDATE users SET score = ?1, version = version + 1, updated_at = ?2
               WHERE id = ?3 AND version = ?4"#,
            params![
                to_sql_int(account.score)?,
                now,
                account.id.0,
                to_sql_int(account.version)?
            ],
        )?;
        if updated == 0 {
            return Err(StoreError::Conflict {
                user_id: account.id,
            });
        }

        for (mode, difficulty, record) in account.progress.iter() {
            tx.execute(
                r#"INSERT INTO progress (user_id, mode, difficulty, unlocked)
                   VALUES (?1, ?2, ?3, ?4)
                   ON CONFLICT(user_id, mode, difficulty)
                   DO UPDATE SET unlocked = MAX(unlocked, excluded.unlocked)"#,
                params![
                    account.id.0,
                    mode.as_str(),
                    difficulty.as_str(),
                    record.unlocked.get()
                ],
            )?;
        }

        tx.commit()?;
        account.version += 1;
        account.updated_at = now;
        Ok(())
    }
}

fn load_user(conn: &Connection, id: UserId) -> Result<Option<UserAccount>, StoreError> {
    let row = conn
        .query_row(
            r#"SELECT username, credential_hash, score, version, created_at, updated_at
               FROM users WHERE id = ?1"#,
            [id.0],
            |r| {
                Ok((
                    r.get::<_, String>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, i64>(2)?,
                    r.get::<_, i64>(3)?,
                    r.get::<_, i64>(4)?,
                    r.get::<_, i64>(5)?,
                ))
            },
        )
        .optional()?;
    let Some((username, credential_hash, score, version, created_at, updated_at)) = row else {
        return Ok(None);
    };

    Ok(Some(UserAccount {
        id,
        username,
        credential_hash,
        score: from_sql_int(score, "score")?,
        progress: load_progress(conn, id)?,
        version: from_sql_int(version, "version")?,
        created_at,
        updated_at,
    }))
}

fn load_progress(conn: &Connection, id: UserId) -> Result<Progress, StoreError> {
    let mut stmt =
        conn.prepare("SELECT mode, difficulty, unlocked FROM progress WHERE user_id = ?1")?;
    let rows = stmt.query_map([id.0], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, u8>(2)?,
        ))
    })?;

    let mut progress = Progress::new();
    for row in rows {
        let (mode, difficulty, unlocked) = row?;
        let mode = mode.parse().map_err(StoreError::Corrupt)?;
        let difficulty = difficulty.parse().map_err(StoreError::Corrupt)?;
        let unlocked = Chapter::try_from(unlocked).map_err(StoreError::Corrupt)?;
        progress.set(mode, difficulty, ProgressRecord { unlocked });
    }
    Ok(progress)
}

fn to_sql_int(value: u64) -> Result<i64, StoreError> {
    i64::try_from(value).map_err(|_| StoreError::Corrupt(format!("{value} does not fit in i64")))
}

fn from_sql_int(value: i64, column: &str) -> Result<u64, StoreError> {
    u64::try_from(value).map_err(|_| StoreError::Corrupt(format!("negative {column}: {value}")))
}
