use super::PlayerStore;
use crate::{
    error::GameResult,
    types::{Coins, GameState, Player, Registration, ANONYMOUS_USERNAME},
};
use rusqlite::{params, Connection, OptionalExtension};

impl PlayerStore {
    // ── Writes ────────────────────────────────────────────────────

    /// Insert a fresh player (`balance = 0`, `per_click = 1`) unless the chat id
    /// is already registered. Returns whether a row was created.
    pub fn upsert_if_absent(
        &self,
        chat_id: &str,
        username: Option<&str>,
        referrer: Option<&str>,
    ) -> GameResult<bool> {
        let conn = self.conn()?;
        Ok(insert_if_absent(&conn, chat_id, username, referrer)?)
    }

    /// Add `amount` to one player. Unknown chat ids are a no-op; the number of
    /// rows touched (0 or 1) is returned.
    pub fn credit(&self, chat_id: &str, amount: Coins) -> GameResult<usize> {
        let conn = self.conn()?;
        Ok(credit_one(&conn, chat_id, amount)?)
    }

    /// Add `amount` to every player in a single statement.
    pub fn credit_all(&self, amount: Coins) -> GameResult<usize> {
        let conn = self.conn()?;
        Ok(credit_every(&conn, amount)?)
    }

    /// Register a player and pay the referral bonus, as one transaction.
    ///
    /// The bonus is paid whenever `referrer` names an existing player other
    /// than the caller, whether or not this call created the caller's row.
    pub fn register(
        &self,
        chat_id: &str,
        username: Option<&str>,
        referrer: Option<&str>,
        bonus: Coins,
    ) -> GameResult<Registration> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let inserted = insert_if_absent(&tx, chat_id, username, referrer)?;
        let referrer_credited = match referrer {
            Some(r) if r != chat_id => credit_one(&tx, r, bonus)? > 0,
            _ => false,
        };
        tx.commit()?;
        Ok(Registration { inserted, referrer_credited })
    }

    /// One web click: every player gains one coin. Returns the new balance sum.
    pub fn click(&self) -> GameResult<Coins> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        credit_every(&tx, 1.0)?;
        let total = balance_sum(&tx)?;
        tx.commit()?;
        Ok(total)
    }

    // ── Reads ─────────────────────────────────────────────────────

    /// `None` when the chat id has never registered.
    pub fn get_balance(&self, chat_id: &str) -> GameResult<Option<Coins>> {
        let balance = self
            .conn()?
            .query_row(
                "SELECT balance FROM players WHERE chat_id = ?1",
                params![chat_id],
                |row| row.get::<_, Option<Coins>>(0),
            )
            .optional()?;
        Ok(balance.map(|b| b.unwrap_or(0.0)))
    }

    /// Sum of balances and mean per-click value. Defaults to 0 / 1 when empty.
    pub fn aggregate(&self) -> GameResult<GameState> {
        let (balance, per_click) = self.conn()?.query_row(
            "SELECT SUM(balance), AVG(per_click) FROM players",
            [],
            |row| Ok((row.get::<_, Option<Coins>>(0)?, row.get::<_, Option<Coins>>(1)?)),
        )?;
        let defaults = GameState::default();
        Ok(GameState {
            balance:   balance.unwrap_or(defaults.balance),
            per_click: per_click.unwrap_or(defaults.per_click),
        })
    }

    /// Every registered chat id, in registration order.
    pub fn list_chat_ids(&self) -> GameResult<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT chat_id FROM players ORDER BY rowid ASC")?;
        let ids = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids)
    }

    pub fn player(&self, chat_id: &str) -> GameResult<Option<Player>> {
        let player = self
            .conn()?
            .query_row(
                "SELECT chat_id, username, balance, per_click, referrer
                 FROM players WHERE chat_id = ?1",
                params![chat_id],
                |row| {
                    Ok(Player {
                        chat_id:   row.get(0)?,
                        username:  row
                            .get::<_, Option<String>>(1)?
                            .unwrap_or_else(|| ANONYMOUS_USERNAME.to_string()),
                        balance:   row.get::<_, Option<Coins>>(2)?.unwrap_or(0.0),
                        per_click: row.get::<_, Option<Coins>>(3)?.unwrap_or(1.0),
                        referrer:  row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(player)
    }

    pub fn player_count(&self) -> GameResult<i64> {
        let count: i64 = self
            .conn()?
            .query_row("SELECT COUNT(*) FROM players", [], |row| row.get(0))?;
        Ok(count)
    }
}

// Statement helpers shared by the single-statement methods and the
// transactional ones. `Transaction` derefs to `Connection`.

fn insert_if_absent(
    conn: &Connection,
    chat_id: &str,
    username: Option<&str>,
    referrer: Option<&str>,
) -> rusqlite::Result<bool> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO players (chat_id, username, balance, per_click, referrer)
         VALUES (?1, ?2, 0, 1, ?3)",
        params![chat_id, username.unwrap_or(ANONYMOUS_USERNAME), referrer],
    )?;
    Ok(inserted > 0)
}

fn credit_one(conn: &Connection, chat_id: &str, amount: Coins) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE players SET balance = balance + ?1 WHERE chat_id = ?2",
        params![amount, chat_id],
    )
}

fn credit_every(conn: &Connection, amount: Coins) -> rusqlite::Result<usize> {
    conn.execute("UPDATE players SET balance = balance + ?1", params![amount])
}

fn balance_sum(conn: &Connection) -> rusqlite::Result<Coins> {
    let sum: Option<Coins> =
        conn.query_row("SELECT SUM(balance) FROM players", [], |row| row.get(0))?;
    Ok(sum.unwrap_or(0.0))
}
