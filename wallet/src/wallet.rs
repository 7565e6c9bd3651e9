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

//! The payer/receiver side of the protocol: one keypair plus the local
//! counters needed to build checks (`sn`) and track an informational
//! running balance.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::OsRng;

use mr01_core::error::{Error, ErrorKind};
use mr01_core::transaction::Transaction;
use mr01_core::vrf::Vrf;
use mr01_vrf::RistrettoVrf;

/// A wallet: one VRF keypair and the payer-side counters that derive a
/// check's serial number.
pub struct Wallet<V: Vrf = RistrettoVrf> {
	vrf: V,
	priv_key: Vec<u8>,
	/// Derived VRF public key.
	pub_key: Vec<u8>,
	/// Monotonically non-decreasing counter; the top of the next coin
	/// interval this wallet will claim is `sn + amount`.
	pub sn: u64,
	/// Locally tracked *estimate* of this wallet's spendable balance.
	/// It diverges from the bank's authoritative balance because
	/// payments pay probabilistically; it averages out over time and
	/// must never be used to decide a bank-side invariant.
	pub amount: u64,
}

impl Wallet<RistrettoVrf> {
	/// Builds a wallet from an existing 32-byte secret key.
	pub fn new(priv_key: Vec<u8>, amount: u64) -> Result<Self, Error> {
		Self::with_vrf(RistrettoVrf, priv_key, amount)
	}

	/// Generates a fresh random keypair.
	pub fn create(amount: u64) -> Result<Self, Error> {
		let mut rng = OsRng;
		let sk = mr01_vrf::random_secret(&mut rng);
		Self::new(sk.to_vec(), amount)
	}
}

impl<V: Vrf> Wallet<V> {
	/// Builds a wallet around a specific `Vrf` implementation (mostly
	/// useful for tests that want a stub VRF).
	pub fn with_vrf(vrf: V, priv_key: Vec<u8>, amount: u64) -> Result<Self, Error> {
		let pub_key = vrf.keygen(&priv_key)?;
		Ok(Wallet {
			vrf,
			priv_key,
			pub_key,
			sn: 0,
			amount,
		})
	}

	/// This wallet's VRF public key.
	pub fn pub_key(&self) -> &[u8] {
		&self.pub_key
	}

	/// Pays `amount` coins to `receiver_key`, returning the check and
	/// the sender's VRF proof over it. Advances `sn` and decrements the
	/// locally tracked `amount` before returning.
	pub fn pay(
		&mut self,
		receiver_key: Vec<u8>,
		amount: u64,
		timestamp: Option<i64>,
	) -> Result<(Transaction, Vec<u8>), Error> {
		if amount < 1 {
			return Err(ErrorKind::AmountTooSmall(amount).into());
		}
		if amount > self.amount {
			return Err(ErrorKind::InsufficientLocalBalance {
				requested: amount,
				available: self.amount,
			}
			.into());
		}

		let timestamp = timestamp.unwrap_or_else(now_seconds);
		let tx = Transaction::new(
			self.sn + amount,
			amount,
			self.pub_key.clone(),
			receiver_key,
			timestamp,
		)?;
		let sender_sig = self.vrf.prove(&self.priv_key, tx.msg().as_bytes())?;

		self.sn += amount;
		self.amount -= amount;

		Ok((tx, sender_sig))
	}

	/// Counter-signs a check as its receiver: verifies the sender's VRF
	/// proof, then produces this wallet's own proof chained on the
	/// sender's output `beta`.
	pub fn sign_receive(
		&self,
		tx: Transaction,
		sender_sig: &[u8],
	) -> Result<(Transaction, Vec<u8>), Error> {
		if tx.receiver_key != self.pub_key {
			return Err(ErrorKind::WrongRecipient.into());
		}
		let beta_sender = self
			.vrf
			.full_verify(&tx.sender_key, sender_sig, tx.msg().as_bytes())?;
		let receiver_sig = self.vrf.prove(&self.priv_key, &beta_sender)?;
		Ok((tx, receiver_sig))
	}
}

fn now_seconds() -> i64 {
	let since_epoch = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.unwrap_or_default();
	since_epoch.as_secs() as i64
}
