//! Seeded random ledgers checked against a naive per-lot replay.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::collections::BTreeMap;

use fg_inventory_core::ledger::{
    LedgerSettings, LotSummary, Movement, compute_lot_ledger_with, reconstruct_ledgers,
};
use fg_inventory_core::{AuditStatus, BALANCE_TOLERANCE, MovementKind};
use fg_inventory_integration_tests::{MovementBuilder, date, milli};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;

const LOTS: [&str; 5] = ["A-1", "A-2", "B-1", "C-1", "C-2"];
const PRODUCTS: [&str; 3] = ["FG100", "FG-200", "FG300"];

fn random_movements(rng: &mut StdRng) -> Vec<Movement> {
    let mut builder = MovementBuilder::new();
    for _ in 0..rng.random_range(1..40) {
        let lot = LOTS[rng.random_range(0..LOTS.len())];
        let product = PRODUCTS[rng.random_range(0..PRODUCTS.len())];
        // Thousandths, so some balances land inside the tolerance band.
        let amount = milli(rng.random_range(0..20_000));
        if rng.random_bool(0.2) {
            builder = builder.beginning(product, lot, amount);
        } else {
            let day = date(4, rng.random_range(1..=5));
            builder = if rng.random_bool(0.5) {
                builder.transaction(product, lot, day, amount, Decimal::ZERO)
            } else {
                builder.transaction(product, lot, day, Decimal::ZERO, amount)
            };
        }
    }
    builder.build()
}

/// Replay one lot: beginning rows by id, then transactions by date and id.
fn naive_summary(movements: &[&Movement]) -> (Vec<Decimal>, Decimal, Decimal) {
    let mut beginning: Vec<&Movement> = movements
        .iter()
        .copied()
        .filter(|m| m.kind == MovementKind::BeginningInventory)
        .collect();
    beginning.sort_by_key(|m| m.id);
    let mut transactions: Vec<&Movement> = movements
        .iter()
        .copied()
        .filter(|m| m.kind == MovementKind::Transaction)
        .collect();
    transactions.sort_by_key(|m| (m.occurred_at, m.id));

    let mut running = Decimal::ZERO;
    let mut balances = Vec::new();
    for movement in beginning.into_iter().chain(transactions) {
        running += movement.quantity_in - movement.quantity_out;
        balances.push(running);
    }
    let minimum = balances.iter().copied().min().unwrap();
    (balances, running, minimum)
}

fn check_seed(seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let movements = random_movements(&mut rng);
    let settings = LedgerSettings::default();
    let as_of = date(4, 30);

    let mut by_lot: BTreeMap<&str, Vec<&Movement>> = BTreeMap::new();
    for movement in &movements {
        by_lot
            .entry(movement.lot_number.as_str())
            .or_default()
            .push(movement);
    }

    let ledgers = reconstruct_ledgers(&movements, as_of, &settings);
    assert_eq!(ledgers.len(), by_lot.len(), "seed {seed}");

    let mut expected_reported = Vec::new();
    for (ledger, (lot, lot_movements)) in ledgers.iter().zip(&by_lot) {
        assert_eq!(ledger.summary.lot_number.as_str(), *lot, "seed {seed}");
        let (balances, final_balance, minimum) = naive_summary(lot_movements);
        assert_eq!(ledger.running_balances(), balances, "seed {seed} lot {lot}");
        assert_eq!(ledger.summary.final_balance, final_balance, "seed {seed}");
        assert_eq!(ledger.summary.minimum_running_balance, minimum, "seed {seed}");

        let expected_status = if minimum < -BALANCE_TOLERANCE {
            AuditStatus::Error
        } else {
            AuditStatus::Ok
        };
        assert_eq!(ledger.summary.status, expected_status, "seed {seed} lot {lot}");

        if final_balance.abs() > BALANCE_TOLERANCE || expected_status == AuditStatus::Error {
            expected_reported.push(*lot);
        }
    }

    let summaries = compute_lot_ledger_with(&movements, as_of, &settings);
    let reported: Vec<&str> = summaries.iter().map(|s| s.lot_number.as_str()).collect();
    assert_eq!(reported, expected_reported, "seed {seed}");

    let mut shuffled = movements.clone();
    shuffled.shuffle(&mut rng);
    let reshuffled: Vec<LotSummary> = compute_lot_ledger_with(&shuffled, as_of, &settings);
    assert_eq!(reshuffled, summaries, "seed {seed}");
}

#[test]
fn test_random_ledgers_match_naive_replay() {
    for seed in 0..200 {
        check_seed(seed);
    }
}
