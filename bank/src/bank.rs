// Copyright 2018 The Grin Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The authoritative ledger: validates and commits checks, detects
//! double-spends, and answers balance queries.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use mr01_util::Mutex;
use serde::{Deserialize, Serialize};

use mr01_core::error::{Error, ErrorKind};
use mr01_core::transaction::Transaction;
use mr01_core::vrf::Vrf;
use mr01_vrf::RistrettoVrf;

use crate::config::BankConfig;
use crate::ledger::UserRecord;

/// Number of independent lock shards the ledger is partitioned into.
/// Two keys hashing to different shards can be touched by concurrent
/// payments without contending on the same mutex.
const NUM_SHARDS: usize = 16;

type Shard = Mutex<HashMap<Vec<u8>, UserRecord>>;

/// The bank: authoritative over every user's balance and `sn` history.
///
/// Sharded behind `NUM_SHARDS` independent locks, one per bucket of
/// `pubkey` hashes. A payment touching both a sender and a receiver
/// shard always acquires them in ascending order of the *raw key
/// bytes* (not the shard index) so two concurrent payments can never
/// deadlock on each other's locks.
pub struct Bank<V: Vrf = RistrettoVrf> {
	vrf: V,
	macropayment_unit: u64,
	shards: Vec<Shard>,
}

impl Bank<RistrettoVrf> {
	/// Builds a bank configured per `config`, using the default
	/// Ristretto255 VRF.
	pub fn new(config: BankConfig) -> Bank<RistrettoVrf> {
		Bank::with_vrf(RistrettoVrf, config)
	}
}

impl<V: Vrf> Bank<V> {
	/// Builds a bank around a specific `Vrf` implementation (mostly
	/// useful for tests that want a stub VRF).
	pub fn with_vrf(vrf: V, config: BankConfig) -> Bank<V> {
		let mut shards = Vec::with_capacity(NUM_SHARDS);
		for _ in 0..NUM_SHARDS {
			shards.push(Mutex::new(HashMap::new()));
		}
		Bank {
			vrf,
			macropayment_unit: config.macropayment_unit,
			shards,
		}
	}

	fn shard_index(&self, key: &[u8]) -> usize {
		let mut hasher = DefaultHasher::new();
		key.hash(&mut hasher);
		(hasher.finish() as usize) % self.shards.len()
	}

	/// Credits `amount` coins to `user_key`, creating its `UserRecord`
	/// on first use. The only way `total_received` grows independently
	/// of a payment.
	pub fn deposit(&self, user_key: &[u8], amount: u64) -> Result<(), Error> {
		if amount < 1 {
			return Err(ErrorKind::AmountTooSmall(amount).into());
		}
		let idx = self.shard_index(user_key);
		let mut shard = self.shards[idx].lock();
		let record = shard.entry(user_key.to_vec()).or_insert_with(UserRecord::new);
		record.balance += amount;
		record.total_received += amount;
		info!("deposit: user={} amount={}", mr01_util::to_hex(user_key), amount);
		Ok(())
	}

	/// Validates and commits a check. Runs the full pipeline: verify
	/// payability, confirm the sender is known, scan for an
	/// overlapping interval, check the coin range, check funds, then
	/// commit atomically. Every failure leaves the ledger untouched.
	pub fn process_payment(
		&self,
		tx: &Transaction,
		sender_sig: &[u8],
		receiver_sig: &[u8],
	) -> Result<(), Error> {
		// Signature verification is the expensive step; it has no
		// dependency on ledger state, so it runs before any lock is
		// taken.
		let payable = tx.evaluate(&self.vrf, sender_sig, receiver_sig, self.macropayment_unit)?;
		if payable == 0 {
			warn!("rejected payment sn={}: not payable", tx.sn);
			return Err(ErrorKind::NotPayable.into());
		}

		let sender_key = tx.sender_key.as_slice();
		let receiver_key = tx.receiver_key.as_slice();
		let (first_key, second_key) = if sender_key <= receiver_key {
			(sender_key, receiver_key)
		} else {
			(receiver_key, sender_key)
		};
		let first_idx = self.shard_index(first_key);
		let second_idx = self.shard_index(second_key);

		let result = if first_idx == second_idx {
			let mut shard = self.shards[first_idx].lock();
			commit_single_shard(&mut shard, tx, sender_sig, receiver_sig, payable)
		} else {
			let mut first_guard = self.shards[first_idx].lock();
			let mut second_guard = self.shards[second_idx].lock();
			if first_key == sender_key {
				commit_cross_shard(&mut first_guard, &mut second_guard, tx, sender_sig, receiver_sig, payable)
			} else {
				commit_cross_shard(&mut second_guard, &mut first_guard, tx, sender_sig, receiver_sig, payable)
			}
		};

		match &result {
			Ok(()) => info!(
				"committed payment sn={} amount={} payable={}",
				tx.sn, tx.amount, payable
			),
			Err(e) => warn!("rejected payment sn={}: {}", tx.sn, e.kind()),
		}
		result
	}

	/// Out-of-band fraud report: evaluates two checks and raises
	/// `DoubleSpend` if they come from the same sender and claim
	/// overlapping intervals. Exists because an unpayable check
	/// (lottery loss) is never stored by `process_payment`, so it can
	/// only be caught this way if a holder surfaces it.
	///
	/// Returning `Ok(())` is not proof the sender is honest, it only
	/// means this particular pair of checks doesn't demonstrate fraud.
	pub fn report_double_spend(
		&self,
		tx1: &Transaction,
		sender_sig1: &[u8],
		receiver_sig1: &[u8],
		tx2: &Transaction,
		sender_sig2: &[u8],
		receiver_sig2: &[u8],
	) -> Result<(), Error> {
		tx1.evaluate(&self.vrf, sender_sig1, receiver_sig1, self.macropayment_unit)?;
		tx2.evaluate(&self.vrf, sender_sig2, receiver_sig2, self.macropayment_unit)?;

		if tx1 != tx2 && tx1.sender_key == tx2.sender_key && intervals_intersect(tx1, tx2) {
			warn!("double spend reported: sn1={} sn2={}", tx1.sn, tx2.sn);
			return Err(ErrorKind::DoubleSpend.into());
		}
		Ok(())
	}

	/// Read-only balance lookup. Returns `0` for a key with no record,
	/// without creating one. Unlike `deposit`/`process_payment`, a
	/// lookup must never have a side effect.
	pub fn user_balance(&self, user_key: &[u8]) -> u64 {
		let idx = self.shard_index(user_key);
		let shard = self.shards[idx].lock();
		shard.get(user_key).map(|r| r.balance).unwrap_or(0)
	}

	/// Read-only `total_received` lookup, `0` if the key is unknown.
	pub fn total_received(&self, user_key: &[u8]) -> u64 {
		let idx = self.shard_index(user_key);
		let shard = self.shards[idx].lock();
		shard.get(user_key).map(|r| r.total_received).unwrap_or(0)
	}

	/// Snapshots the entire ledger into a plain, serializable value.
	pub fn snapshot(&self) -> BankSnapshot {
		let mut users = HashMap::new();
		for shard in &self.shards {
			let shard = shard.lock();
			for (key, record) in shard.iter() {
				users.insert(mr01_util::to_hex(key), record.clone());
			}
		}
		BankSnapshot {
			macropayment_unit: self.macropayment_unit,
			users,
		}
	}
}

/// A plain, serializable copy of a bank's ledger at a point in time.
/// Restoring one does not reconstruct a `Bank` by itself; the caller
/// picks the `Vrf` implementation when rebuilding via
/// `Bank::with_vrf` and repopulating from this snapshot's `users`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankSnapshot {
	/// The macropayment unit the snapshotted bank was configured with.
	pub macropayment_unit: u64,
	/// Every known user's ledger record, keyed by hex-encoded pubkey.
	pub users: HashMap<String, UserRecord>,
}

/// Two checks from the same payer intersect iff their half-open
/// intervals `(lo, hi]` share an integer coin id. Strict `<` on
/// `max(lo) < min(hi)`: adjacent intervals sharing only an endpoint
/// (e.g. `(0,1]` and `(1,2]`) do not overlap.
fn intervals_intersect(a: &Transaction, b: &Transaction) -> bool {
	let (lo1, hi1) = a.interval();
	let (lo2, hi2) = b.interval();
	lo1.max(lo2) < hi1.min(hi2)
}

fn validate_sender(
	sender: Option<&UserRecord>,
	tx: &Transaction,
	payable: u64,
) -> Result<(), Error> {
	let sender = sender.ok_or(ErrorKind::UnknownSender)?;

	for (_, (prev_tx, _, _)) in sender.history.iter() {
		if intervals_intersect(prev_tx, tx) {
			if prev_tx == tx {
				return Err(ErrorKind::AlreadyProcessed.into());
			}
			return Err(ErrorKind::DoubleSpend.into());
		}
	}

	if tx.sn > sender.total_received {
		return Err(ErrorKind::InvalidCoinInterval.into());
	}

	if sender.balance < payable {
		return Err(ErrorKind::NotEnoughFunds {
			required: payable,
			available: sender.balance,
		}
		.into());
	}

	Ok(())
}

fn commit_single_shard(
	shard: &mut HashMap<Vec<u8>, UserRecord>,
	tx: &Transaction,
	sender_sig: &[u8],
	receiver_sig: &[u8],
	payable: u64,
) -> Result<(), Error> {
	validate_sender(shard.get(&tx.sender_key), tx, payable)?;

	{
		let sender = shard
			.get_mut(&tx.sender_key)
			.expect("presence already validated above");
		sender.balance -= payable;
		sender
			.history
			.insert(tx.sn, (tx.clone(), sender_sig.to_vec(), receiver_sig.to_vec()));
	}

	let receiver = shard
		.entry(tx.receiver_key.clone())
		.or_insert_with(UserRecord::new);
	receiver.balance += payable;
	receiver.total_received += payable;

	Ok(())
}

fn commit_cross_shard(
	sender_shard: &mut HashMap<Vec<u8>, UserRecord>,
	receiver_shard: &mut HashMap<Vec<u8>, UserRecord>,
	tx: &Transaction,
	sender_sig: &[u8],
	receiver_sig: &[u8],
	payable: u64,
) -> Result<(), Error> {
	validate_sender(sender_shard.get(&tx.sender_key), tx, payable)?;

	let sender = sender_shard
		.get_mut(&tx.sender_key)
		.expect("presence already validated above");
	sender.balance -= payable;
	sender
		.history
		.insert(tx.sn, (tx.clone(), sender_sig.to_vec(), receiver_sig.to_vec()));

	let receiver = receiver_shard
		.entry(tx.receiver_key.clone())
		.or_insert_with(UserRecord::new);
	receiver.balance += payable;
	receiver.total_received += payable;

	Ok(())
}
