//! `RocksDB` storage implementation.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, IteratorMode, MultiThreaded,
    Options, WriteBatch,
};

use playforge_core::{Game, GameId, LedgerEntry, PlayRecord, Role, TransactionId, User, UserId};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::{PurchaseOutcome, PurchaseReceipt, Store};

/// RocksDB-backed storage implementation.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,

    /// Serializes compound read-check-write mutations (purchases, balance
    /// adjustments, play-time increments, user creation). Individual batch
    /// commits are atomic on their own; this lock closes the window between
    /// the precondition read and the commit.
    mutations: Mutex<()>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self {
            db: Arc::new(db),
            mutations: Mutex::new(()),
        })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Acquire the compound-mutation lock.
    fn mutation_guard(&self) -> Result<MutexGuard<'_, ()>> {
        self.mutations
            .lock()
            .map_err(|_| StoreError::Database("mutation lock poisoned".into()))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn get_raw<T: serde::de::DeserializeOwned>(&self, cf_name: &str, key: &[u8]) -> Result<Option<T>> {
        let cf = self.cf(cf_name)?;
        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn put_raw<T: serde::Serialize>(&self, cf_name: &str, key: &[u8], value: &T) -> Result<()> {
        let cf = self.cf(cf_name)?;
        let data = Self::serialize(value)?;
        self.db
            .put_cf(&cf, key, data)
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    /// Load a user or fail with `NotFound`.
    fn require_user(&self, user_id: UserId) -> Result<User> {
        self.get_user(user_id)?.ok_or(StoreError::NotFound {
            entity: "user",
            id: user_id.to_string(),
        })
    }

    /// Scan an entire column family into deserialized records.
    fn scan_all<T: serde::de::DeserializeOwned>(&self, cf_name: &str) -> Result<Vec<T>> {
        let cf = self.cf(cf_name)?;
        let mut records = Vec::new();
        for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
            let (_, value) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            records.push(Self::deserialize(&value)?);
        }
        Ok(records)
    }

    /// Append the writes of a completed purchase to `batch`.
    fn stage_purchase(
        &self,
        batch: &mut WriteBatch,
        buyer: &User,
        seller: &User,
        entry: &LedgerEntry,
    ) -> Result<()> {
        let cf_users = self.cf(cf::USERS)?;
        let cf_ledger = self.cf(cf::LEDGER)?;
        let cf_by_user = self.cf(cf::LEDGER_BY_USER)?;

        batch.put_cf(&cf_users, keys::user_key(buyer.id), Self::serialize(buyer)?);
        batch.put_cf(&cf_users, keys::user_key(seller.id), Self::serialize(seller)?);
        batch.put_cf(&cf_ledger, keys::ledger_key(entry.id), Self::serialize(entry)?);
        batch.put_cf(&cf_by_user, keys::user_ledger_key(buyer.id, entry.id), b"");
        batch.put_cf(&cf_by_user, keys::user_ledger_key(seller.id, entry.id), b"");
        Ok(())
    }
}

impl Store for RocksStore {
    // =========================================================================
    // User Operations
    // =========================================================================

    fn create_user(&self, user: &User) -> Result<()> {
        let _guard = self.mutation_guard()?;

        let cf_by_name = self.cf(cf::USERS_BY_NAME)?;
        let cf_by_email = self.cf(cf::USERS_BY_EMAIL)?;

        let name_key = keys::username_key(&user.username);
        let email_key = keys::email_key(&user.email);

        if self
            .db
            .get_cf(&cf_by_name, &name_key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .is_some()
        {
            return Err(StoreError::UsernameTaken(user.username.clone()));
        }
        if self
            .db
            .get_cf(&cf_by_email, &email_key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .is_some()
        {
            return Err(StoreError::EmailTaken(user.email.clone()));
        }

        let cf_users = self.cf(cf::USERS)?;
        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_users, keys::user_key(user.id), Self::serialize(user)?);
        batch.put_cf(&cf_by_name, &name_key, user.id.as_bytes());
        batch.put_cf(&cf_by_email, &email_key, user.id.as_bytes());

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn get_user(&self, user_id: UserId) -> Result<Option<User>> {
        self.get_raw(cf::USERS, &keys::user_key(user_id))
    }

    fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let cf = self.cf(cf::USERS_BY_NAME)?;
        let Some(id_bytes) = self
            .db
            .get_cf(&cf, keys::username_key(username))
            .map_err(|e| StoreError::Database(e.to_string()))?
        else {
            return Ok(None);
        };

        let mut bytes = [0u8; 16];
        if id_bytes.len() != 16 {
            return Err(StoreError::Serialization("malformed username index".into()));
        }
        bytes.copy_from_slice(&id_bytes);
        self.get_user(UserId::from_bytes(bytes))
    }

    fn put_user(&self, user: &User) -> Result<()> {
        self.put_raw(cf::USERS, &keys::user_key(user.id), user)
    }

    fn list_users(&self) -> Result<Vec<User>> {
        self.scan_all(cf::USERS)
    }

    fn set_role(&self, user_id: UserId, role: Role) -> Result<User> {
        let _guard = self.mutation_guard()?;

        let mut user = self.require_user(user_id)?;
        user.role = role;
        user.updated_at = chrono::Utc::now();
        self.put_user(&user)?;
        Ok(user)
    }

    fn adjust_balance(&self, user_id: UserId, delta_cents: i64) -> Result<i64> {
        let _guard = self.mutation_guard()?;

        let mut user = self.require_user(user_id)?;
        if user.balance_cents + delta_cents < 0 {
            return Err(StoreError::Overdraw {
                balance_cents: user.balance_cents,
                delta_cents,
            });
        }
        user.balance_cents += delta_cents;
        user.updated_at = chrono::Utc::now();
        self.put_user(&user)?;
        Ok(user.balance_cents)
    }

    // =========================================================================
    // Game Operations
    // =========================================================================

    fn put_game(&self, game: &Game) -> Result<()> {
        self.put_raw(cf::GAMES, &keys::game_key(game.id), game)
    }

    fn get_game(&self, game_id: GameId) -> Result<Option<Game>> {
        self.get_raw(cf::GAMES, &keys::game_key(game_id))
    }

    fn get_games(&self, game_ids: &[GameId]) -> Result<Vec<Game>> {
        let mut games = Vec::with_capacity(game_ids.len());
        for &id in game_ids {
            if let Some(game) = self.get_game(id)? {
                games.push(game);
            }
        }
        Ok(games)
    }

    fn list_games(&self) -> Result<Vec<Game>> {
        self.scan_all(cf::GAMES)
    }

    fn delete_game(&self, game_id: GameId) -> Result<()> {
        let cf = self.cf(cf::GAMES)?;
        if self.get_game(game_id)?.is_none() {
            return Err(StoreError::NotFound {
                entity: "game",
                id: game_id.to_string(),
            });
        }
        self.db
            .delete_cf(&cf, keys::game_key(game_id))
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    // =========================================================================
    // Ledger Operations
    // =========================================================================

    fn get_ledger_entry(&self, transaction_id: TransactionId) -> Result<Option<LedgerEntry>> {
        self.get_raw(cf::LEDGER, &keys::ledger_key(transaction_id))
    }

    fn list_ledger_for_user(&self, user_id: UserId) -> Result<Vec<LedgerEntry>> {
        let cf_by_user = self.cf(cf::LEDGER_BY_USER)?;
        let prefix = keys::user_ledger_prefix(user_id);

        // ULID keys under a fixed prefix are time-ordered; collect forward,
        // then reverse for newest-first.
        let iter = self.db.iterator_cf(
            &cf_by_user,
            IteratorMode::From(&prefix, rocksdb::Direction::Forward),
        );

        let mut tx_ids = Vec::new();
        for item in iter {
            let (key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            if !key.starts_with(&prefix) {
                break;
            }
            tx_ids.push(keys::transaction_id_from_user_ledger_key(&key));
        }
        tx_ids.reverse();

        let mut entries = Vec::with_capacity(tx_ids.len());
        for tx_id in tx_ids {
            if let Some(entry) = self.get_ledger_entry(tx_id)? {
                entries.push(entry);
            }
        }
        Ok(entries)
    }

    fn list_ledger_all(&self) -> Result<Vec<LedgerEntry>> {
        let mut entries: Vec<LedgerEntry> = self.scan_all(cf::LEDGER)?;
        entries.reverse(); // keys ascend chronologically
        Ok(entries)
    }

    // =========================================================================
    // Play-Time Operations
    // =========================================================================

    fn record_play_time(
        &self,
        user_id: UserId,
        game_id: GameId,
        seconds: i64,
    ) -> Result<PlayRecord> {
        let _guard = self.mutation_guard()?;

        let key = keys::play_key(user_id, game_id);
        let record = match self.get_raw::<PlayRecord>(cf::PLAY_RECORDS, &key)? {
            Some(mut existing) => {
                existing.accumulate(seconds);
                existing
            }
            None => PlayRecord::new(user_id, game_id, seconds),
        };
        self.put_raw(cf::PLAY_RECORDS, &key, &record)?;
        Ok(record)
    }

    fn list_play_records(&self, user_id: UserId) -> Result<Vec<PlayRecord>> {
        let cf = self.cf(cf::PLAY_RECORDS)?;
        let prefix = keys::play_prefix(user_id);

        let iter = self.db.iterator_cf(
            &cf,
            IteratorMode::From(&prefix, rocksdb::Direction::Forward),
        );

        let mut records = Vec::new();
        for item in iter {
            let (key, value) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            if !key.starts_with(&prefix) {
                break;
            }
            records.push(Self::deserialize(&value)?);
        }
        Ok(records)
    }

    // =========================================================================
    // Purchase (compound)
    // =========================================================================

    fn purchase_game(&self, buyer_id: UserId, game_id: GameId) -> Result<PurchaseOutcome> {
        let _guard = self.mutation_guard()?;

        let mut buyer = self.require_user(buyer_id)?;

        let game = self.get_game(game_id)?.ok_or(StoreError::NotFound {
            entity: "game",
            id: game_id.to_string(),
        })?;

        if game.created_by == buyer_id {
            return Err(StoreError::SelfPurchase);
        }

        if buyer.owns(game_id) {
            return Ok(PurchaseOutcome::AlreadyOwned);
        }

        if !buyer.can_afford(game.price_cents) {
            return Err(StoreError::InsufficientFunds {
                balance_cents: buyer.balance_cents,
                required_cents: game.price_cents,
            });
        }

        let mut seller = self.require_user(game.created_by)?;

        let now = chrono::Utc::now();
        buyer.balance_cents -= game.price_cents;
        buyer.grant_game(game_id);
        buyer.updated_at = now;
        seller.balance_cents += game.price_cents;
        seller.updated_at = now;

        let entry = LedgerEntry::purchase(&buyer, &seller, &game);

        let mut batch = WriteBatch::default();
        self.stage_purchase(&mut batch, &buyer, &seller, &entry)?;
        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        tracing::debug!(
            buyer = %buyer.id,
            seller = %seller.id,
            game = %game.id,
            amount_cents = entry.amount_cents,
            transaction = %entry.id,
            "purchase committed"
        );

        Ok(PurchaseOutcome::Completed(Box::new(PurchaseReceipt {
            entry,
            buyer_email: buyer.email,
            seller_email: seller.email,
            buyer_balance_cents: buyer.balance_cents,
            seller_balance_cents: seller.balance_cents,
        })))
    }
}
