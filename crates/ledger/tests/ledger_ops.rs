//! End-to-end ledger behaviour over the in-memory store: conservation,
//! single-claim semantics, expiry via the manual clock, and the validation
//! surface of every operation.

use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::Duration;

use lockpay_core::audit::AuditKind;
use lockpay_core::{LedgerError, LockState};
use lockpay_db::MemoryStore;
use lockpay_ledger::{LedgerConfig, LockLedger, ManualClock};

const SENDER: &str = "0821230001";
const RECIPIENT: &str = "0827770002";
const OTHER: &str = "0835550003";
const PIN: &str = "4321";

fn test_ledger() -> (Arc<LockLedger>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::starting_now());
    let ledger = LockLedger::with_parts(
        Arc::new(MemoryStore::new()),
        clock.clone(),
        LedgerConfig::default(),
    );
    (Arc::new(ledger), clock)
}

// ---- Authentication --------------------------------------------------------

#[tokio::test]
async fn authenticate_is_idempotent() {
    let (ledger, _clock) = test_ledger();

    let first = ledger.authenticate(SENDER).await.unwrap();
    assert_eq!(first.balance, 0);

    ledger.deposit(first.id, 2_500).await.unwrap();

    let second = ledger.authenticate(SENDER).await.unwrap();
    assert_eq!(second.id, first.id);
    assert_eq!(second.balance, 2_500);
}

#[tokio::test]
async fn authenticate_normalizes_contact_formatting() {
    let (ledger, _clock) = test_ledger();

    let plain = ledger.authenticate("0821230001").await.unwrap();
    let spaced = ledger.authenticate("  082 123 0001 ").await.unwrap();
    assert_eq!(plain.id, spaced.id);
}

#[tokio::test]
async fn authenticate_rejects_short_contact() {
    let (ledger, _clock) = test_ledger();

    let err = ledger.authenticate("012345").await.unwrap_err();
    assert_matches!(err, LedgerError::InvalidArgument(_));
}

// ---- Deposits --------------------------------------------------------------

#[tokio::test]
async fn deposit_credits_and_records_history() {
    let (ledger, _clock) = test_ledger();
    let account = ledger.authenticate(SENDER).await.unwrap();

    let account = ledger.deposit(account.id, 15_000).await.unwrap();
    assert_eq!(account.balance, 15_000);

    let history = ledger.history(&account.contact_key, None).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].kind, AuditKind::Deposit);
    assert_eq!(history[0].amount, 15_000);
    assert_eq!(history[0].description, "Deposited R150.00 to wallet");
}

#[tokio::test]
async fn deposit_enforces_ceiling() {
    let (ledger, _clock) = test_ledger();
    let account = ledger.authenticate(SENDER).await.unwrap();

    let err = ledger.deposit(account.id, 1_000_001).await.unwrap_err();
    assert_matches!(
        err,
        LedgerError::InvalidArgument(message) if message.contains("R10,000.00")
    );

    // At the ceiling is fine.
    let account = ledger.deposit(account.id, 1_000_000).await.unwrap();
    assert_eq!(account.balance, 1_000_000);
}

#[tokio::test]
async fn deposit_rejects_non_positive_amounts() {
    let (ledger, _clock) = test_ledger();
    let account = ledger.authenticate(SENDER).await.unwrap();

    assert_matches!(
        ledger.deposit(account.id, 0).await.unwrap_err(),
        LedgerError::InvalidArgument(_)
    );
    assert_matches!(
        ledger.deposit(account.id, -50).await.unwrap_err(),
        LedgerError::InvalidArgument(_)
    );
}

#[tokio::test]
async fn deposit_to_unknown_account_is_not_found() {
    let (ledger, _clock) = test_ledger();

    let err = ledger.deposit(999, 1_000).await.unwrap_err();
    assert_matches!(err, LedgerError::NotFound { entity: "account" });
}

// ---- Lock and redeem round trip --------------------------------------------

#[tokio::test]
async fn lock_then_redeem_round_trip() {
    let (ledger, _clock) = test_ledger();
    let sender = ledger.authenticate(SENDER).await.unwrap();
    ledger.deposit(sender.id, 10_000).await.unwrap();

    let lock = ledger
        .lock(sender.id, 4_000, RECIPIENT, PIN, None)
        .await
        .unwrap();
    assert_eq!(lock.state, LockState::Active);
    assert_eq!(lock.amount, 4_000);
    assert!(lock.reference.starts_with("LPT-"));

    // Sender's balance dropped by the locked amount.
    let sender = ledger.account(sender.id).await.unwrap();
    assert_eq!(sender.balance, 6_000);

    // The recipient can see the waiting lock without consuming it.
    let probed = ledger.probe_lock(RECIPIENT, PIN).await.unwrap();
    assert_eq!(probed.id, lock.id);
    assert_eq!(probed.state, LockState::Active);

    let redemption = ledger.redeem(RECIPIENT, PIN, RECIPIENT).await.unwrap();
    assert_eq!(redemption.lock.state, LockState::Claimed);
    assert_eq!(redemption.destination.balance, 4_000);
    assert_eq!(redemption.destination.contact_key, RECIPIENT);

    // A second redeem finds nothing; the lock is consumed.
    let err = ledger.redeem(RECIPIENT, PIN, RECIPIENT).await.unwrap_err();
    assert_matches!(err, LedgerError::NotFound { .. });
}

#[tokio::test]
async fn redeem_can_credit_a_third_account() {
    let (ledger, _clock) = test_ledger();
    let sender = ledger.authenticate(SENDER).await.unwrap();
    ledger.deposit(sender.id, 10_000).await.unwrap();
    ledger
        .lock(sender.id, 2_500, RECIPIENT, PIN, None)
        .await
        .unwrap();

    // Funds land on the destination contact's account, created on the fly.
    let redemption = ledger.redeem(RECIPIENT, PIN, OTHER).await.unwrap();
    assert_eq!(redemption.destination.contact_key, OTHER);
    assert_eq!(redemption.destination.balance, 2_500);
}

#[tokio::test]
async fn redeem_with_wrong_pin_reveals_nothing() {
    let (ledger, _clock) = test_ledger();
    let sender = ledger.authenticate(SENDER).await.unwrap();
    ledger.deposit(sender.id, 10_000).await.unwrap();
    ledger
        .lock(sender.id, 2_000, RECIPIENT, PIN, None)
        .await
        .unwrap();

    let wrong_pin = ledger
        .redeem(RECIPIENT, "9999", RECIPIENT)
        .await
        .unwrap_err();
    let wrong_contact = ledger.redeem(OTHER, PIN, OTHER).await.unwrap_err();

    // Wrong PIN and wrong contact produce the same error shape and text.
    assert_eq!(wrong_pin.to_string(), wrong_contact.to_string());
    assert_matches!(wrong_pin, LedgerError::NotFound { .. });

    // The lock is untouched.
    let probed = ledger.probe_lock(RECIPIENT, PIN).await.unwrap();
    assert_eq!(probed.state, LockState::Active);
}

// ---- Duplicate locks -------------------------------------------------------

#[tokio::test]
async fn duplicate_active_claim_key_is_rejected() {
    let (ledger, _clock) = test_ledger();
    let sender = ledger.authenticate(SENDER).await.unwrap();
    ledger.deposit(sender.id, 10_000).await.unwrap();

    ledger
        .lock(sender.id, 1_000, RECIPIENT, PIN, None)
        .await
        .unwrap();
    let err = ledger
        .lock(sender.id, 2_000, RECIPIENT, PIN, None)
        .await
        .unwrap_err();
    assert_matches!(err, LedgerError::DuplicateLock);

    // Only the first lock debited the sender.
    let sender = ledger.account(sender.id).await.unwrap();
    assert_eq!(sender.balance, 9_000);

    // Same recipient with a different PIN is a different claim key.
    ledger
        .lock(sender.id, 2_000, RECIPIENT, "8642", None)
        .await
        .unwrap();
}

#[tokio::test]
async fn claim_key_frees_up_after_redeem() {
    let (ledger, _clock) = test_ledger();
    let sender = ledger.authenticate(SENDER).await.unwrap();
    ledger.deposit(sender.id, 10_000).await.unwrap();

    ledger
        .lock(sender.id, 1_000, RECIPIENT, PIN, None)
        .await
        .unwrap();
    ledger.redeem(RECIPIENT, PIN, RECIPIENT).await.unwrap();

    // The pair can be reused once the first lock is consumed.
    ledger
        .lock(sender.id, 3_000, RECIPIENT, PIN, None)
        .await
        .unwrap();
}

// ---- Insufficient balance --------------------------------------------------

#[tokio::test]
async fn insufficient_balance_leaves_everything_unchanged() {
    let (ledger, _clock) = test_ledger();
    let sender = ledger.authenticate(SENDER).await.unwrap();
    ledger.deposit(sender.id, 1_000).await.unwrap();

    let before = ledger.totals().await.unwrap();

    let err = ledger
        .lock(sender.id, 5_000, RECIPIENT, PIN, None)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "insufficient balance: R10.00 available");
    assert_matches!(err, LedgerError::InsufficientBalance { available: 1_000 });

    // No debit, no lock, no audit side effects.
    let sender = ledger.account(sender.id).await.unwrap();
    assert_eq!(sender.balance, 1_000);
    let after = ledger.totals().await.unwrap();
    assert_eq!(after.sum_balances, before.sum_balances);
    assert_eq!(after.sum_active_locks, before.sum_active_locks);
    assert_matches!(
        ledger.probe_lock(RECIPIENT, PIN).await.unwrap_err(),
        LedgerError::NotFound { .. }
    );
}

#[tokio::test]
async fn lock_for_unknown_sender_is_not_found() {
    let (ledger, _clock) = test_ledger();

    let err = ledger.lock(42, 1_000, RECIPIENT, PIN, None).await.unwrap_err();
    assert_matches!(err, LedgerError::NotFound { entity: "account" });
}

#[tokio::test]
async fn lock_validates_inputs_before_touching_balances() {
    let (ledger, _clock) = test_ledger();
    let sender = ledger.authenticate(SENDER).await.unwrap();
    ledger.deposit(sender.id, 10_000).await.unwrap();

    assert_matches!(
        ledger.lock(sender.id, 0, RECIPIENT, PIN, None).await.unwrap_err(),
        LedgerError::InvalidArgument(_)
    );
    assert_matches!(
        ledger.lock(sender.id, 1_000, "123", PIN, None).await.unwrap_err(),
        LedgerError::InvalidArgument(_)
    );
    assert_matches!(
        ledger.lock(sender.id, 1_000, RECIPIENT, "12", None).await.unwrap_err(),
        LedgerError::InvalidArgument(_)
    );
    assert_matches!(
        ledger
            .lock(sender.id, 1_000, RECIPIENT, PIN, Some(0))
            .await
            .unwrap_err(),
        LedgerError::InvalidArgument(_)
    );

    let sender = ledger.account(sender.id).await.unwrap();
    assert_eq!(sender.balance, 10_000);
}

// ---- Expiry ----------------------------------------------------------------

#[tokio::test]
async fn expired_lock_cannot_be_redeemed_and_refunds_to_sender() {
    let (ledger, clock) = test_ledger();
    let sender = ledger.authenticate(SENDER).await.unwrap();
    ledger.deposit(sender.id, 10_000).await.unwrap();

    let lock = ledger
        .lock(sender.id, 4_000, RECIPIENT, PIN, Some(3_600))
        .await
        .unwrap();

    // Inside the window the lock is live.
    clock.advance(Duration::minutes(30));
    assert_eq!(
        ledger.probe_lock(RECIPIENT, PIN).await.unwrap().id,
        lock.id
    );

    // Past the deadline the redeem is refused and the lock parks as expired.
    clock.advance(Duration::minutes(45));
    let err = ledger.redeem(RECIPIENT, PIN, RECIPIENT).await.unwrap_err();
    assert_matches!(err, LedgerError::Expired { expired_at } if expired_at == lock.expires_at);

    // Refund returns the funds to the sender.
    let sender = ledger.refund_expired(lock.id).await.unwrap();
    assert_eq!(sender.balance, 10_000);

    // Nothing left to claim or refund.
    assert_matches!(
        ledger.redeem(RECIPIENT, PIN, RECIPIENT).await.unwrap_err(),
        LedgerError::NotFound { .. }
    );
    assert_matches!(
        ledger.refund_expired(lock.id).await.unwrap_err(),
        LedgerError::InvalidState {
            from: LockState::Refunded,
            to: LockState::Refunded,
        }
    );
}

#[tokio::test]
async fn probe_reports_expiry_without_mutating() {
    let (ledger, clock) = test_ledger();
    let sender = ledger.authenticate(SENDER).await.unwrap();
    ledger.deposit(sender.id, 10_000).await.unwrap();
    let lock = ledger
        .lock(sender.id, 1_000, RECIPIENT, PIN, Some(60))
        .await
        .unwrap();

    clock.advance(Duration::seconds(120));

    // The probe reports expiry but leaves the state alone, so a direct
    // refund still sees the active-past-deadline lock and moves it itself.
    assert_matches!(
        ledger.probe_lock(RECIPIENT, PIN).await.unwrap_err(),
        LedgerError::Expired { .. }
    );
    let sender = ledger.refund_expired(lock.id).await.unwrap();
    assert_eq!(sender.balance, 10_000);
}

#[tokio::test]
async fn exactly_at_expiry_counts_as_expired() {
    let (ledger, clock) = test_ledger();
    let sender = ledger.authenticate(SENDER).await.unwrap();
    ledger.deposit(sender.id, 5_000).await.unwrap();
    let lock = ledger
        .lock(sender.id, 1_000, RECIPIENT, PIN, Some(600))
        .await
        .unwrap();

    clock.set(lock.expires_at);
    assert_matches!(
        ledger.redeem(RECIPIENT, PIN, RECIPIENT).await.unwrap_err(),
        LedgerError::Expired { .. }
    );
}

#[tokio::test]
async fn refund_requires_the_expired_state() {
    let (ledger, _clock) = test_ledger();
    let sender = ledger.authenticate(SENDER).await.unwrap();
    ledger.deposit(sender.id, 10_000).await.unwrap();

    // Active and inside its window: refund refused.
    let live = ledger
        .lock(sender.id, 1_000, RECIPIENT, PIN, Some(3_600))
        .await
        .unwrap();
    assert_matches!(
        ledger.refund_expired(live.id).await.unwrap_err(),
        LedgerError::InvalidState {
            from: LockState::Active,
            to: LockState::Refunded,
        }
    );

    // Claimed: refund refused.
    ledger.redeem(RECIPIENT, PIN, RECIPIENT).await.unwrap();
    assert_matches!(
        ledger.refund_expired(live.id).await.unwrap_err(),
        LedgerError::InvalidState {
            from: LockState::Claimed,
            to: LockState::Refunded,
        }
    );

    // Unknown lock id.
    assert_matches!(
        ledger.refund_expired(9_999).await.unwrap_err(),
        LedgerError::NotFound { entity: "lock" }
    );
}

// ---- Conservation ----------------------------------------------------------

#[tokio::test]
async fn conservation_holds_across_lock_redeem_refund() {
    let (ledger, clock) = test_ledger();
    let sender = ledger.authenticate(SENDER).await.unwrap();
    ledger.deposit(sender.id, 10_000).await.unwrap();

    let baseline = ledger.totals().await.unwrap();
    assert_eq!(baseline.sum_balances, 10_000);
    assert_eq!(baseline.sum_active_locks, 0);

    // Locking moves value from balances into active locks.
    ledger
        .lock(sender.id, 4_000, RECIPIENT, PIN, Some(3_600))
        .await
        .unwrap();
    let locked = ledger.totals().await.unwrap();
    assert_eq!(locked.sum_balances, 6_000);
    assert_eq!(locked.sum_active_locks, 4_000);
    assert_eq!(locked.total(), baseline.total());

    // Redeeming moves it into the destination balance.
    ledger.redeem(RECIPIENT, PIN, RECIPIENT).await.unwrap();
    let redeemed = ledger.totals().await.unwrap();
    assert_eq!(redeemed.sum_balances, 10_000);
    assert_eq!(redeemed.sum_active_locks, 0);
    assert_eq!(redeemed.total(), baseline.total());

    // Refunding an expired lock moves it back to the sender.
    let second = ledger
        .lock(sender.id, 2_000, RECIPIENT, "8642", Some(60))
        .await
        .unwrap();
    clock.advance(Duration::seconds(120));
    ledger.refund_expired(second.id).await.unwrap();
    let refunded = ledger.totals().await.unwrap();
    assert_eq!(refunded.total(), baseline.total());
}

// ---- Concurrency -----------------------------------------------------------

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_redeems_pay_out_exactly_once() {
    let (ledger, _clock) = test_ledger();
    let sender = ledger.authenticate(SENDER).await.unwrap();
    ledger.deposit(sender.id, 10_000).await.unwrap();
    ledger
        .lock(sender.id, 4_000, RECIPIENT, PIN, None)
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let ledger = Arc::clone(&ledger);
        handles.push(tokio::spawn(async move {
            ledger.redeem(RECIPIENT, PIN, RECIPIENT).await
        }));
    }

    let mut winners = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(redemption) => {
                winners += 1;
                assert_eq!(redemption.lock.amount, 4_000);
            }
            Err(err) => assert_matches!(err, LedgerError::NotFound { .. }),
        }
    }
    assert_eq!(winners, 1);

    // The payout landed exactly once.
    let recipient = ledger.authenticate(RECIPIENT).await.unwrap();
    assert_eq!(recipient.balance, 4_000);
    let totals = ledger.totals().await.unwrap();
    assert_eq!(totals.sum_balances, 10_000);
    assert_eq!(totals.sum_active_locks, 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_locks_on_one_claim_key_create_exactly_one() {
    let (ledger, _clock) = test_ledger();
    let sender = ledger.authenticate(SENDER).await.unwrap();
    ledger.deposit(sender.id, 100_000).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let ledger = Arc::clone(&ledger);
        handles.push(tokio::spawn(async move {
            ledger.lock(sender.id, 1_000, RECIPIENT, PIN, None).await
        }));
    }

    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(err) => assert_matches!(err, LedgerError::DuplicateLock),
        }
    }
    assert_eq!(created, 1);

    // Exactly one debit happened.
    let sender = ledger.account(sender.id).await.unwrap();
    assert_eq!(sender.balance, 99_000);
}

// ---- History ---------------------------------------------------------------

#[tokio::test]
async fn history_shows_both_sides_newest_first() {
    let (ledger, _clock) = test_ledger();
    let sender = ledger.authenticate(SENDER).await.unwrap();
    ledger.deposit(sender.id, 10_000).await.unwrap();
    ledger
        .lock(sender.id, 4_000, RECIPIENT, PIN, None)
        .await
        .unwrap();
    ledger.redeem(RECIPIENT, PIN, RECIPIENT).await.unwrap();

    // Sender sees the deposit and the outgoing lock.
    let sender_history = ledger.history(SENDER, None).await.unwrap();
    let sender_kinds: Vec<AuditKind> = sender_history.iter().map(|r| r.kind).collect();
    assert_eq!(sender_kinds, vec![AuditKind::Lock, AuditKind::Deposit]);
    assert_eq!(
        sender_history[0].description,
        format!("Locked R40.00 for {RECIPIENT}")
    );

    // Recipient sees the incoming lock and their redeem.
    let recipient_history = ledger.history(RECIPIENT, None).await.unwrap();
    let recipient_kinds: Vec<AuditKind> = recipient_history.iter().map(|r| r.kind).collect();
    assert_eq!(recipient_kinds, vec![AuditKind::Redeem, AuditKind::Lock]);
    assert_eq!(
        recipient_history[0].description,
        "Redeemed R40.00 - sent to bank account"
    );

    // A bystander sees nothing.
    assert!(ledger.history(OTHER, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn history_honours_the_limit() {
    let (ledger, _clock) = test_ledger();
    let account = ledger.authenticate(SENDER).await.unwrap();
    for _ in 0..5 {
        ledger.deposit(account.id, 100).await.unwrap();
    }

    let limited = ledger.history(SENDER, Some(2)).await.unwrap();
    assert_eq!(limited.len(), 2);
}

#[tokio::test]
async fn refund_appears_in_sender_history() {
    let (ledger, clock) = test_ledger();
    let sender = ledger.authenticate(SENDER).await.unwrap();
    ledger.deposit(sender.id, 5_000).await.unwrap();
    let lock = ledger
        .lock(sender.id, 2_000, RECIPIENT, PIN, Some(60))
        .await
        .unwrap();
    clock.advance(Duration::seconds(120));
    ledger.refund_expired(lock.id).await.unwrap();

    let history = ledger.history(SENDER, None).await.unwrap();
    assert_eq!(history[0].kind, AuditKind::Refund);
    assert_eq!(history[0].description, "Refunded R20.00 to sender");
    assert_eq!(history[0].lock_reference.as_deref(), Some(lock.reference.as_str()));
}
