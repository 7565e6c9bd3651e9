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

//! End-to-end scenarios exercising the full payer -> receiver -> bank
//! pipeline through the public API only.
//!
//! These mirror the shape of the reference implementation's seeded
//! walkthroughs (happy path / lottery miss / replay / double spend /
//! coin-range and funds failures), but do not assert the reference's
//! literal payable amounts: this crate's VRF is a different concrete
//! construction than the reference's, so the lottery outcome for a
//! given key/timestamp pair is not reproducible bit-for-bit. Where a
//! scenario's outcome depends on which way the lottery happened to
//! land, the test accepts either and asserts the structural invariant
//! instead (e.g. "either it committed and balances moved by the
//! payable amount, or it didn't and nothing moved").

use mr01_bank::{Bank, BankConfig};
use mr01_core::error::ErrorKind;
use mr01_wallet::Wallet;

fn wallet_from_hex_secret(hex_sk: &str, amount: u64) -> Wallet {
	let sk = mr01_util::from_hex(hex_sk).unwrap();
	Wallet::new(sk, amount).unwrap()
}

/// S1/S2: happy path and lottery miss. Whichever way the lottery
/// lands, either the bank commits and moves exactly `payable` coins
/// from payer to receiver, or it rejects with `NotPayable` and moves
/// nothing.
#[test]
fn single_small_payment_either_commits_or_is_not_payable() {
	let payer_sk = "c8574aa78691e450adb1a002e7febc2620100e7bc41891a497b6fff0e7c44445";
	let receiver_sk = "a326d26c5a26279a3126ca6ddb644cf2c91277e76f88268244393cb8aa0436ea";
	let mut payer = wallet_from_hex_secret(payer_sk, 15);
	let receiver = wallet_from_hex_secret(receiver_sk, 0);

	let bank = Bank::new(BankConfig::default());
	bank.deposit(payer.pub_key(), 15).unwrap();

	let (tx, sender_sig) = payer.pay(receiver.pub_key().to_vec(), 1, Some(1700009006)).unwrap();
	let (tx, receiver_sig) = receiver.sign_receive(tx, &sender_sig).unwrap();

	let payer_balance_before = bank.user_balance(payer.pub_key());
	let receiver_balance_before = bank.user_balance(receiver.pub_key());

	match bank.process_payment(&tx, &sender_sig, &receiver_sig) {
		Ok(()) => {
			let moved = payer_balance_before - bank.user_balance(payer.pub_key());
			assert!(moved == 10, "a committed hit on amount=1,M=10 must move exactly M");
			assert_eq!(bank.user_balance(receiver.pub_key()) - receiver_balance_before, moved);
		}
		Err(e) => {
			assert_eq!(e.kind(), ErrorKind::NotPayable);
			assert_eq!(bank.user_balance(payer.pub_key()), payer_balance_before);
			assert_eq!(bank.user_balance(receiver.pub_key()), receiver_balance_before);
		}
	}
}

/// S3: replaying an identical, already-committed check must fail
/// with `AlreadyProcessed`, not `DoubleSpend`.
#[test]
fn replaying_a_committed_check_is_already_processed() {
	let mut payer = wallet_from_hex_secret(
		"c8574aa78691e450adb1a002e7febc2620100e7bc41891a497b6fff0e7c44445",
		15,
	);
	let receiver = wallet_from_hex_secret(
		"a326d26c5a26279a3126ca6ddb644cf2c91277e76f88268244393cb8aa0436ea",
		0,
	);

	let bank = Bank::new(BankConfig::default());
	bank.deposit(payer.pub_key(), 15).unwrap();

	let (tx, sender_sig) = payer.pay(receiver.pub_key().to_vec(), 1, Some(1700009006)).unwrap();
	let (tx, receiver_sig) = receiver.sign_receive(tx, &sender_sig).unwrap();

	if bank.process_payment(&tx, &sender_sig, &receiver_sig).is_ok() {
		let replay = bank.process_payment(&tx, &sender_sig, &receiver_sig);
		assert_eq!(replay.unwrap_err().kind(), ErrorKind::AlreadyProcessed);
	}
}

/// S4/S5, amount above M: the committed (or rejected) transfer is
/// always a multiple of M, and can never exceed `full + M`.
#[test]
fn payment_above_macropayment_unit_settles_in_multiples_of_m() {
	let mut payer = wallet_from_hex_secret(
		"94288b5703a364df7b6a64b9a9a4ef9703a364df7b6a64b9a9a4ef9c8574aa70",
		21,
	);
	let receiver = wallet_from_hex_secret(
		"b230360f1a7c8a867d1a7c8a867d1a7c8a867d1a7c8a867d1a7c8a867d1a7c80",
		0,
	);

	let bank = Bank::new(BankConfig::default());
	bank.deposit(payer.pub_key(), 21).unwrap();

	let (tx, sender_sig) = payer.pay(receiver.pub_key().to_vec(), 13, Some(1700009006)).unwrap();
	let (tx, receiver_sig) = receiver.sign_receive(tx, &sender_sig).unwrap();

	let payer_balance_before = bank.user_balance(payer.pub_key());
	if bank.process_payment(&tx, &sender_sig, &receiver_sig).is_ok() {
		let moved = payer_balance_before - bank.user_balance(payer.pub_key());
		assert!(moved == 10 || moved == 20, "moved={}", moved);
	}
}

/// S6: a reissued check over the same interval to a different
/// receiver is caught by `report_double_spend`; a later, genuinely
/// disjoint check from the same payer is not.
#[test]
fn report_double_spend_distinguishes_overlap_from_a_fresh_interval() {
	let payer_sk_bytes = mr01_vrf::random_secret(&mut rand::thread_rng());
	let receiver1 = wallet_from_hex_secret(
		"a326d26c5a26279a3126ca6ddb644cf2c91277e76f88268244393cb8aa0436ea",
		0,
	);
	let receiver2 = wallet_from_hex_secret(
		"b326d26c5a26279a3126ca6ddb644cf2c91277e76f88268244393cb8aa0436ea",
		0,
	);
	let receiver3 = wallet_from_hex_secret(
		"c326d26c5a26279a3126ca6ddb644cf2c91277e76f88268244393cb8aa0436ea",
		0,
	);

	let mut payer = Wallet::new(payer_sk_bytes.to_vec(), 10).unwrap();
	let (tx1, s1) = payer.pay(receiver1.pub_key().to_vec(), 1, Some(1700009006)).unwrap();
	let (tx1, rsig1) = receiver1.sign_receive(tx1, &s1).unwrap();

	// Reset the payer's local counter and reissue the identical
	// interval to a different receiver: this is only possible because
	// the wallet trusts its own counter, which is exactly the kind of
	// misbehavior report_double_spend exists to catch after the fact.
	payer.sn = 0;
	let (tx2, s2) = payer.pay(receiver2.pub_key().to_vec(), 1, Some(1700009006)).unwrap();
	let (tx2, rsig2) = receiver2.sign_receive(tx2, &s2).unwrap();

	let bank = Bank::new(BankConfig::default());
	let err = bank
		.report_double_spend(&tx1, &s1, &rsig1, &tx2, &s2, &rsig2)
		.unwrap_err();
	assert_eq!(err.kind(), ErrorKind::DoubleSpend);

	// A third, non-overlapping check from the same payer must not be
	// flagged against either prior one.
	let (tx3, s3) = payer.pay(receiver3.pub_key().to_vec(), 1, Some(1700009008)).unwrap();
	let (tx3, rsig3) = receiver3.sign_receive(tx3, &s3).unwrap();
	assert!(bank
		.report_double_spend(&tx1, &s1, &rsig1, &tx3, &s3, &rsig3)
		.is_ok());
}

/// S7: a second, overlapping check submitted to the bank after the
/// first was committed is rejected as `DoubleSpend`, and the ledger is
/// left exactly as the first commit left it.
#[test]
fn process_payment_catches_overlap_against_already_committed_history() {
	let mut payer = Wallet::create(10).unwrap();
	let receiver_a = Wallet::create(0).unwrap();
	let receiver_b = Wallet::create(0).unwrap();

	let bank = Bank::new(BankConfig::default());
	bank.deposit(payer.pub_key(), 10).unwrap();

	let (tx1, s1) = payer.pay(receiver_a.pub_key().to_vec(), 1, Some(1700009006)).unwrap();
	let (tx1, rsig1) = receiver_a.sign_receive(tx1, &s1).unwrap();
	let first_result = bank.process_payment(&tx1, &s1, &rsig1);

	if first_result.is_ok() {
		let balance_after_first = bank.user_balance(payer.pub_key());

		// A distinct check (different receiver) claiming an
		// overlapping interval {1,2,3}.
		payer.sn = 0;
		let (tx2, s2) = payer.pay(receiver_b.pub_key().to_vec(), 3, Some(1700009007)).unwrap();
		let (tx2, rsig2) = receiver_b.sign_receive(tx2, &s2).unwrap();

		let second_result = bank.process_payment(&tx2, &s2, &rsig2);
		assert_eq!(second_result.unwrap_err().kind(), ErrorKind::DoubleSpend);
		assert_eq!(bank.user_balance(payer.pub_key()), balance_after_first);
	}
}

/// S8: a check claiming more coins than the payer has ever received
/// fails with `InvalidCoinInterval`; once the shortfall is deposited,
/// resubmitting the identical check no longer hits that failure mode.
#[test]
fn coin_interval_beyond_total_received_then_resolved_by_deposit() {
	let mut payer = Wallet::create(10).unwrap();
	let receiver = Wallet::create(0).unwrap();

	let bank = Bank::new(BankConfig::default());
	bank.deposit(payer.pub_key(), 9).unwrap();

	let (tx, sender_sig) = payer.pay(receiver.pub_key().to_vec(), 10, Some(1700009006)).unwrap();
	let (tx, receiver_sig) = receiver.sign_receive(tx, &sender_sig).unwrap();

	let err = bank.process_payment(&tx, &sender_sig, &receiver_sig).unwrap_err();
	assert_eq!(err.kind(), ErrorKind::InvalidCoinInterval);

	bank.deposit(payer.pub_key(), 1).unwrap();
	let retried = bank.process_payment(&tx, &sender_sig, &receiver_sig);
	assert!(retried.is_ok() || retried.unwrap_err().kind() != ErrorKind::InvalidCoinInterval);
}
