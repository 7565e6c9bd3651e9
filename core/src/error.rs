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

//! Error types shared by every settlement crate: transaction
//! construction, VRF verification, wallet operations and bank
//! processing all surface through this one `Error`/`ErrorKind` pair.

use failure::{Backtrace, Context, Fail};
use std::env;
use std::fmt::{self, Display};

/// Opaque error type. Callers that need to branch on the failure kind
/// should match on `kind()` rather than on `Error` directly.
#[derive(Debug, Fail)]
pub struct Error {
	inner: Context<ErrorKind>,
}

/// The full error taxonomy for the settlement protocol.
#[derive(Clone, Eq, PartialEq, Debug, Fail)]
pub enum ErrorKind {
	/// Construction violated `sn >= 1 && amount >= 1 && sn >= amount`.
	#[fail(
		display = "Invalid transaction: sn={}, amount={} violates sn >= amount >= 1",
		sn, amount
	)]
	InvalidTransaction {
		/// the offending serial number
		sn: u64,
		/// the offending amount
		amount: u64,
	},

	/// A VRF proof failed verification.
	#[fail(display = "Invalid VRF signature/proof: {}", _0)]
	InvalidSignature(String),

	/// Signatures verified but the lottery did not hit; `payable == 0`.
	#[fail(display = "Transaction is not payable (lottery lost)")]
	NotPayable,

	/// No ledger record exists for the sender's public key.
	#[fail(display = "Unknown sender")]
	UnknownSender,

	/// An identical check has already been committed.
	#[fail(display = "Transaction already processed")]
	AlreadyProcessed,

	/// Two distinct checks from the same payer claim overlapping coin
	/// intervals.
	#[fail(display = "Double spend detected")]
	DoubleSpend,

	/// The coin interval underflows zero or overshoots the sender's
	/// `total_received`.
	#[fail(display = "Invalid coin interval")]
	InvalidCoinInterval,

	/// Sender's balance is below the evaluated payable amount.
	#[fail(
		display = "Not enough funds: required {}, available {}",
		required, available
	)]
	NotEnoughFunds {
		/// amount required to cover the payable check
		required: u64,
		/// sender's current balance
		available: u64,
	},

	/// `sign_receive` was called on a wallet that is not the check's
	/// declared receiver.
	#[fail(display = "Wrong recipient")]
	WrongRecipient,

	/// Payer attempted to pay more than its locally tracked estimate.
	#[fail(
		display = "Insufficient local balance: requested {}, have {}",
		requested, available
	)]
	InsufficientLocalBalance {
		/// requested payment amount
		requested: u64,
		/// wallet's locally tracked estimate
		available: u64,
	},

	/// `pay` was called with `amount < 1`.
	#[fail(display = "Amount too small: {}", _0)]
	AmountTooSmall(u64),

	/// Malformed byte encoding (wrong key/proof length, bad hex, ...).
	#[fail(display = "Encoding error: {}", _0)]
	Encoding(String),
}

impl Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let show_bt = matches!(env::var("RUST_BACKTRACE"), Ok(ref r) if r == "1");
		let backtrace = match self.backtrace() {
			Some(b) => format!("{}", b),
			None => String::from("Unknown"),
		};
		let mut output = format!("{}", self.inner);
		if show_bt {
			output.push_str(&format!("\n Backtrace: {}", backtrace));
		}
		Display::fmt(&output, f)
	}
}

impl Error {
	/// Returns the underlying error kind, for callers that need to
	/// branch on it.
	pub fn kind(&self) -> ErrorKind {
		self.inner.get_context().clone()
	}

	/// Returns the immediate cause, if any.
	pub fn cause(&self) -> Option<&dyn Fail> {
		self.inner.cause()
	}

	/// Returns the captured backtrace, if any.
	pub fn backtrace(&self) -> Option<&Backtrace> {
		self.inner.backtrace()
	}
}

impl From<ErrorKind> for Error {
	fn from(kind: ErrorKind) -> Error {
		Error {
			inner: Context::new(kind),
		}
	}
}

impl From<Context<ErrorKind>> for Error {
	fn from(inner: Context<ErrorKind>) -> Error {
		Error { inner }
	}
}
