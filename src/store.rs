use crate::{database, User};

use rusqlite::Connection;
use std::borrow::Cow;

/// The single persisted slot the working list is snapshotted into
///
/// `get` returns the last written list, or None when nothing was written yet.
/// `set` replaces the slot wholesale; last writer wins, no versioning.
pub trait SnapshotStore {
    fn get(&self) -> Option<Vec<User>>;
    fn set(&self, users: &[User]) -> anyhow::Result<()>;
}

const SNAPSHOT_KEY: &str = "users";

pub struct KeyValueStore<'a> {
    table: Cow<'a, str>,
    conn: Connection,
}

impl<'a> std::fmt::Debug for KeyValueStore<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyValueStore")
            .field("table", &self.table)
            .finish()
    }
}

impl<'a> KeyValueStore<'a> {
    fn create_table(name: &str, conn: &Connection) -> anyhow::Result<()> {
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (key TEXT UNIQUE, value BLOB)",
            name
        );

        conn.execute(&sql, []).map(|_| ()).map_err(Into::into)
    }

    pub fn fetch(table: &'a str) -> anyhow::Result<Self> {
        database::global()
            .and_then(|conn| Self::create_table(table, &conn).map(|_| conn))
            .map(|conn| Self {
                conn,
                table: table.into(),
            })
    }

    #[allow(dead_code)]
    pub fn in_memory(table: impl Into<Cow<'a, str>>) -> anyhow::Result<Self> {
        let table = table.into();
        let conn = database::in_memory(&table)?;
        Self::create_table(&table, &conn)?;
        Ok(Self { conn, table })
    }

    pub fn get<V>(&self, key: &str) -> Option<V>
    where
        for<'de> V: serde::Deserialize<'de>,
    {
        self.conn
            .query_row(
                &format!("SELECT value FROM {} WHERE key = :key", &self.table),
                rusqlite::named_params![":key": key],
                |row| row.get::<_, Vec<u8>>("value"),
            )
            .map_err(|err| {
                // an empty slot is the common case, not worth a warning
                if !matches!(err, rusqlite::Error::QueryReturnedNoRows) {
                    log::warn!("cannot get key {:?}: {}", key, err);
                }
                err
            })
            .ok()
            .and_then(|data| {
                serde_json::from_slice(&data)
                    .map_err(|err| log::warn!("value for key {:?} isn't valid json: {}", key, err))
                    .ok()
            })
    }

    pub fn set<V: ?Sized>(&self, key: &str, val: &V) -> anyhow::Result<()>
    where
        V: serde::Serialize,
    {
        let v = serde_json::to_vec(val)?;

        self.conn
            .execute(
                &format!(
                    "REPLACE INTO {} (key, value) values (:key, :value)",
                    &self.table
                ),
                rusqlite::named_params! {
                    ":key": key,
                    ":value": &v,
                },
            )
            .map(|_| ())
            .map_err(|err| {
                log::warn!("cannot set key {:?}: {}", key, err);
                anyhow::Error::from(err)
            })
    }

    #[allow(dead_code)]
    pub fn remove(&self, key: &str) -> bool {
        match self.conn.execute(
            &format!("DELETE FROM {} WHERE key = :key", &self.table),
            rusqlite::named_params! { ":key": key },
        ) {
            Err(..) => {
                log::debug!("error while removing key: {:?}", key);
                false
            }
            Ok(0) => {
                log::debug!("no row was removed for key: {:?}", key);
                false
            }
            Ok(..) => {
                log::trace!("removed key: {:?}", key);
                true
            }
        }
    }
}

impl SnapshotStore for KeyValueStore<'_> {
    fn get(&self) -> Option<Vec<User>> {
        KeyValueStore::get(self, SNAPSHOT_KEY)
    }

    fn set(&self, users: &[User]) -> anyhow::Result<()> {
        KeyValueStore::set(self, SNAPSHOT_KEY, users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::sample;

    #[test]
    fn snapshot_slot() {
        let kv = KeyValueStore::fetch("testing").unwrap();
        assert_eq!(SnapshotStore::get(&kv), None);

        let users = vec![sample(1, "ada"), sample(2, "grace")];
        SnapshotStore::set(&kv, &users).unwrap();
        assert_eq!(SnapshotStore::get(&kv), Some(users.clone()));

        // replaced wholesale, last writer wins
        SnapshotStore::set(&kv, &users[..1]).unwrap();
        assert_eq!(SnapshotStore::get(&kv), Some(users[..1].to_vec()));

        assert!(kv.remove(SNAPSHOT_KEY));
        assert_eq!(SnapshotStore::get(&kv), None);
        assert!(!kv.remove(SNAPSHOT_KEY));
    }
}
