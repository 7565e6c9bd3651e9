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

//! A `Transaction` is a check: a proposal to pay `amount` coins,
//! identified by the top `sn` of a coin interval `(sn - amount, sn]`.
//! It is immutable once constructed and carries no notion of whether
//! it has been paid; that's the bank's job.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorKind};
use crate::hash::hash_hex;
use crate::vrf::Vrf;

/// The default macropayment unit (`M` in spec terms): the fixed amount
/// a hit actually settles on the ledger.
pub const DEFAULT_MACROPAYMENT_UNIT: u64 = 10;

/// An immutable payment proposal. Two transactions are equal iff all
/// five fields match componentwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
	/// Top of the claimed coin interval `(sn - amount, sn]`.
	pub sn: u64,
	/// Nominal value of the check; `amount <= sn`.
	pub amount: u64,
	/// Sender's VRF public key, raw bytes.
	pub sender_key: Vec<u8>,
	/// Receiver's VRF public key, raw bytes.
	pub receiver_key: Vec<u8>,
	/// Seconds since epoch, truncated to an integer.
	pub timestamp: i64,
}

impl Transaction {
	/// Builds a new transaction, enforcing `sn >= 1`, `amount >= 1` and
	/// `sn >= amount`.
	pub fn new(
		sn: u64,
		amount: u64,
		sender_key: Vec<u8>,
		receiver_key: Vec<u8>,
		timestamp: i64,
	) -> Result<Transaction, Error> {
		if sn < 1 || amount < 1 || sn < amount {
			return Err(ErrorKind::InvalidTransaction { sn, amount }.into());
		}
		Ok(Transaction {
			sn,
			amount,
			sender_key,
			receiver_key,
			timestamp,
		})
	}

	/// The coin interval this check claims: `(lo, hi]`, cardinality
	/// `amount`.
	pub fn interval(&self) -> (u64, u64) {
		(self.sn - self.amount, self.sn)
	}

	/// The canonical signing message: a hash digest over
	/// `sn=<sn>;amt=<amount>;r=<receiver_key_hex>;t=<timestamp>`.
	/// `sender_key` is deliberately absent; the sender binds to the
	/// message implicitly through the VRF key it signs with.
	pub fn msg(&self) -> String {
		let canonical = format!(
			"sn={};amt={};r={};t={}",
			self.sn,
			self.amount,
			mr01_util::to_hex(&self.receiver_key),
			self.timestamp
		);
		hash_hex(&canonical)
	}

	/// Verifies both VRF proofs and returns how much this check pays
	/// under macropayment unit `m`. Returns `Err(InvalidSignature)` if
	/// either proof fails to verify; returns `Ok(0)` only when both
	/// proofs are valid and the lottery was lost on a sub-`m` residue.
	pub fn evaluate<V: Vrf>(
		&self,
		vrf: &V,
		sender_sig: &[u8],
		receiver_sig: &[u8],
		m: u64,
	) -> Result<u64, Error> {
		let msg = self.msg();
		let beta_sender = vrf.full_verify(&self.sender_key, sender_sig, msg.as_bytes())?;
		let beta_receiver = vrf.full_verify(&self.receiver_key, receiver_sig, &beta_sender)?;
		Ok(Self::calculate_payment(m, self.amount, &beta_receiver))
	}

	/// Given the macropayment unit `m`, the nominal `amount`, and the
	/// receiver's VRF output `beta`, returns the amount actually paid.
	/// Pure and deterministic: identical inputs always produce the
	/// identical result.
	pub fn calculate_payment(m: u64, amount: u64, beta: &[u8]) -> u64 {
		let full = (amount / m) * m;
		let rem = amount % m;
		if rem == 0 {
			return full;
		}

		let l_bits = (beta.len() as u32) * 8;
		let x = BigUint::from_bytes_be(beta);
		// threshold = (rem / m) * 2^L; compare x < threshold without
		// floating point by cross-multiplying: x*m < rem*2^L.
		let lhs = x * BigUint::from(m);
		let rhs = BigUint::from(rem) * BigUint::from(2u32).pow(l_bits);
		if lhs < rhs {
			full + m
		} else {
			full
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rejects_zero_sn() {
		assert!(Transaction::new(0, 1, vec![1], vec![2], 0).is_err());
	}

	#[test]
	fn rejects_zero_amount() {
		assert!(Transaction::new(5, 0, vec![1], vec![2], 0).is_err());
	}

	#[test]
	fn rejects_amount_over_sn() {
		assert!(Transaction::new(3, 5, vec![1], vec![2], 0).is_err());
	}

	#[test]
	fn accepts_boundary_amount_eq_sn() {
		assert!(Transaction::new(5, 5, vec![1], vec![2], 0).is_ok());
	}

	#[test]
	fn interval_has_right_cardinality() {
		let tx = Transaction::new(7, 4, vec![1], vec![2], 0).unwrap();
		let (lo, hi) = tx.interval();
		assert_eq!(hi - lo, 4);
		assert_eq!((lo, hi), (3, 7));
	}

	#[test]
	fn msg_excludes_sender_key() {
		let a = Transaction::new(7, 4, vec![1], vec![9], 1000).unwrap();
		let b = Transaction::new(7, 4, vec![2], vec![9], 1000).unwrap();
		assert_eq!(a.msg(), b.msg());
	}

	#[test]
	fn msg_is_sensitive_to_each_field() {
		let base = Transaction::new(7, 4, vec![1], vec![9], 1000).unwrap();
		let diff_sn = Transaction::new(8, 4, vec![1], vec![9], 1000).unwrap();
		let diff_amt = Transaction::new(7, 3, vec![1], vec![9], 1000).unwrap();
		let diff_recv = Transaction::new(7, 4, vec![1], vec![10], 1000).unwrap();
		let diff_ts = Transaction::new(7, 4, vec![1], vec![9], 1001).unwrap();
		assert_ne!(base.msg(), diff_sn.msg());
		assert_ne!(base.msg(), diff_amt.msg());
		assert_ne!(base.msg(), diff_recv.msg());
		assert_ne!(base.msg(), diff_ts.msg());
	}

	#[test]
	fn calculate_payment_multiples_of_m_never_gamble() {
		// amount is an exact multiple of m: no residue, no lottery.
		assert_eq!(Transaction::calculate_payment(10, 20, &[0xff; 64]), 20);
		assert_eq!(Transaction::calculate_payment(10, 20, &[0x00; 64]), 20);
	}

	#[test]
	fn calculate_payment_all_zero_beta_always_hits() {
		// x=0 is always < any positive threshold.
		assert_eq!(Transaction::calculate_payment(10, 1, &[0x00; 64]), 10);
	}

	#[test]
	fn calculate_payment_max_beta_never_hits_on_partial_residue() {
		// x at the maximum value can only be < threshold when threshold == 2^L,
		// i.e. rem == m, which calculate_payment already special-cases to 0 residue.
		assert_eq!(Transaction::calculate_payment(10, 1, &[0xff; 64]), 0);
	}

	#[test]
	fn calculate_payment_adds_deterministic_chunks() {
		// amount=13, m=10: full=10, rem=3. With beta=0 the lottery always hits.
		assert_eq!(Transaction::calculate_payment(10, 13, &[0x00; 64]), 20);
	}
}
