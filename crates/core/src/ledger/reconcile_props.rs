//! Property-based tests for ledger reconciliation.
//!
//! - Property 1: Adjacent windows chain (closing of one is opening of the next)
//! - Property 2: Closing equals opening plus in-window movements on a continuous book
//! - Property 3: Statement closing equals the signed sum of everything through the window end

use chrono::{Days, NaiveDate, NaiveDateTime};
use proptest::prelude::*;
use rostra_shared::types::{CashBookEntryId, ChargeId, PaymentId, StudentId};
use rust_decimal::Decimal;

use super::balance::RunningBalance;
use super::entry::{CashBookEntry, Direction};
use super::reconcile::{reconcile_cash_book, reconcile_statement};
use super::window::DateWindow;
use crate::records::{Charge, Payment};

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn at(offset: u64, hour: u32) -> NaiveDateTime {
    (base_date() + Days::new(offset)).and_hms_opt(hour, 0, 0).unwrap()
}

fn window(from: u64, to: u64) -> DateWindow {
    DateWindow::new(base_date() + Days::new(from), base_date() + Days::new(to)).unwrap()
}

/// Strategy for a (day offset, hour, signed change) movement.
fn movement() -> impl Strategy<Value = (u64, u32, Decimal)> {
    (0u64..60, 0u32..24, -50_000i64..50_000i64).prop_map(|(day, hour, cents)| {
        (day, hour, Decimal::new(cents, 2))
    })
}

/// Builds a book whose stored balances are continuous in chronological order.
fn continuous_book(mut movements: Vec<(u64, u32, Decimal)>) -> Vec<CashBookEntry> {
    movements.sort_by_key(|(day, hour, _)| (*day, *hour));
    let mut running = RunningBalance::opening(Decimal::ZERO);

    movements
        .into_iter()
        .map(|(day, hour, change)| {
            running = running.next_entry(change);
            CashBookEntry {
                id: CashBookEntryId::new(),
                recorded_at: at(day, hour),
                direction: if change.is_sign_negative() {
                    Direction::Debit
                } else {
                    Direction::Credit
                },
                amount: change.abs(),
                category: "general".to_string(),
                description: String::new(),
                running_balance: running.current_balance,
            }
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// **Property 1: Adjacent windows chain**
    ///
    /// For any split day `m`, reconciling [a, m] then [m+1, b] hands the
    /// closing balance of the first straight to the opening of the second.
    #[test]
    fn prop_adjacent_windows_chain(
        movements in prop::collection::vec(movement(), 0..40),
        split in 0u64..59,
    ) {
        let book = continuous_book(movements);

        let first = reconcile_cash_book(&book, &window(0, split));
        let second = reconcile_cash_book(&book, &window(split + 1, 59));

        prop_assert_eq!(first.closing, second.opening);
    }

    /// **Property 2: Closing equals opening plus in-window movements**
    #[test]
    fn prop_closing_is_opening_plus_movements(
        movements in prop::collection::vec(movement(), 0..40),
        from in 0u64..30,
        len in 0u64..30,
    ) {
        let book = continuous_book(movements);
        let result = reconcile_cash_book(&book, &window(from, from + len));

        let moved: Decimal = result.series.iter().map(CashBookEntry::signed_amount).sum();
        prop_assert_eq!(result.closing, result.opening + moved);

        for pair in result.series.windows(2) {
            prop_assert!(pair[0].recorded_at <= pair[1].recorded_at);
        }
    }

    /// **Property 3: Statement closing is a pure fold**
    ///
    /// Closing equals credits minus debits over every movement on or before
    /// the window end, whatever order the sources arrive in.
    #[test]
    fn prop_statement_closing_is_signed_sum(
        charges in prop::collection::vec((0u64..60, 1i64..100_000), 0..15),
        payments in prop::collection::vec((0u64..60, 0u32..24, 1i64..100_000), 0..15),
        from in 0u64..30,
        len in 0u64..30,
    ) {
        let student_id = StudentId::new();
        let charges: Vec<Charge> = charges
            .into_iter()
            .map(|(day, cents)| Charge {
                id: ChargeId::new(),
                student_id,
                issued_on: base_date() + Days::new(day),
                description: "Fee".to_string(),
                amount: Decimal::new(cents, 2),
            })
            .collect();
        let payments: Vec<Payment> = payments
            .into_iter()
            .map(|(day, hour, cents)| Payment {
                id: PaymentId::new(),
                student_id,
                charge_id: None,
                paid_at: at(day, hour),
                amount: Decimal::new(cents, 2),
                note: None,
            })
            .collect();

        let win = window(from, from + len);
        let result = reconcile_statement(&charges, &payments, std::iter::empty(), &win);

        let debits: Decimal = charges
            .iter()
            .filter(|c| c.issued_on <= win.end())
            .map(|c| c.amount)
            .sum();
        let credits: Decimal = payments
            .iter()
            .filter(|p| p.paid_at.date() <= win.end())
            .map(|p| p.amount)
            .sum();

        prop_assert_eq!(result.closing, credits - debits);
        prop_assert_eq!(
            result.closing,
            result.opening + result.total_credit() - result.total_debit()
        );
    }
}
