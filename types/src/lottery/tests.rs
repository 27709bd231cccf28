use super::generate::*;
use super::*;
use crate::api::{CheckMultiplyResponse, HuayConfig};
use chrono::{TimeZone, Utc};
use proptest::prelude::*;

fn draft(bet_type: BetType, number: &str) -> LineDraft {
    LineDraft {
        bet_type,
        number: number.to_string(),
        amount: 10,
        multiply: 90.0,
        sale_cap: None,
    }
}

fn is_permutation_of(candidate: &str, reference: &str) -> bool {
    let mut a: Vec<u8> = candidate.bytes().collect();
    let mut b: Vec<u8> = reference.bytes().collect();
    a.sort_unstable();
    b.sort_unstable();
    a == b
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

#[test]
fn test_permutations_four_distinct_multiset() {
    // A repeated digit halves the count: 4!/2! = 12, not 24.
    let perms = permutations_four("1123");
    assert_eq!(perms.len(), 12);
    for p in &perms {
        assert_eq!(p.len(), 4);
        assert!(is_permutation_of(p, "1123"));
    }

    assert_eq!(permutations_four("1234").len(), 24);
    assert_eq!(permutations_four("1111"), vec!["1111".to_string()]);
    assert_eq!(permutations_four("1122").len(), 6);
}

#[test]
fn test_permutations_four_rejects_bad_input() {
    assert!(permutations_four("123").is_empty());
    assert!(permutations_four("12a4").is_empty());
    assert!(permutations_four("").is_empty());
}

#[test]
fn test_permutations_three() {
    assert_eq!(permutations_three("123").len(), 6);
    assert_eq!(permutations_three("112").len(), 3);
    assert_eq!(permutations_three("777"), vec!["777".to_string()]);
    for p in permutations_three("305") {
        assert_eq!(p.len(), 3);
        assert!(is_permutation_of(&p, "305"));
    }
}

#[test]
fn test_swap_pair() {
    assert_eq!(swap_pair("12"), vec!["12".to_string(), "21".to_string()]);
    assert_eq!(swap_pair("33"), vec!["33".to_string()]);
    assert!(swap_pair("123").is_empty());
}

#[test]
fn test_nineteen_gate_covers_both_positions() {
    for d in 0..=9u8 {
        let digit = d.to_string();
        let gates = nineteen_gate(&digit);
        assert_eq!(gates.len(), 19, "digit {d}");

        let mut seen = std::collections::HashSet::new();
        for g in &gates {
            assert_eq!(g.len(), 2);
            assert!(g.contains(&digit), "{g} must contain {digit}");
            assert!(seen.insert(g.clone()), "duplicate entry {g}");
        }
        // The doubled number appears exactly once.
        let doubled = format!("{d}{d}");
        assert_eq!(gates.iter().filter(|g| **g == doubled).count(), 1);
    }
}

#[test]
fn test_sweeps() {
    let front = sweep_front("5");
    assert_eq!(front.len(), 10);
    for (i, n) in front.iter().enumerate() {
        assert_eq!(n, &format!("5{i}"));
    }

    let back = sweep_back("5");
    assert_eq!(back.len(), 10);
    for (i, n) in back.iter().enumerate() {
        assert_eq!(n, &format!("{i}5"));
    }

    assert!(sweep_front("x").is_empty());
    assert!(sweep_back("12").is_empty());
}

#[test]
fn test_two_digit_filters() {
    let low = two_digit_low();
    assert_eq!(low.len(), 50);
    assert_eq!(low.first().unwrap(), "00");
    assert_eq!(low.last().unwrap(), "49");

    let high = two_digit_high();
    assert_eq!(high.len(), 50);
    assert_eq!(high.first().unwrap(), "50");
    assert_eq!(high.last().unwrap(), "99");

    assert_eq!(two_digit_even().len(), 50);
    assert!(two_digit_even().iter().all(|n| n.parse::<u32>().unwrap() % 2 == 0));
    assert_eq!(two_digit_odd().len(), 50);
    assert!(two_digit_odd().iter().all(|n| n.parse::<u32>().unwrap() % 2 == 1));

    let doubles = two_digit_doubles();
    assert_eq!(doubles.len(), 10);
    for (i, n) in doubles.iter().enumerate() {
        assert_eq!(n, &format!("{i}{i}"));
    }
}

#[test]
fn test_number_grid() {
    let grid = number_grid(3);
    assert_eq!(grid.len(), 1000);
    assert_eq!(grid[0], "000");
    assert_eq!(grid[999], "999");
    assert_eq!(grid[7], "007");

    assert_eq!(number_grid(1).len(), 10);
    assert_eq!(number_grid(4).len(), 10_000);
    assert!(number_grid(0).is_empty());
    assert!(number_grid(5).is_empty());
}

#[test]
fn test_shuffle_candidates_per_type() {
    assert_eq!(shuffle_candidates(BetType::TodeFour, "1234").len(), 24);
    assert_eq!(shuffle_candidates(BetType::TopThree, "123").len(), 6);
    assert_eq!(shuffle_candidates(BetType::TodeThree, "112").len(), 3);
    assert_eq!(shuffle_candidates(BetType::TopTwo, "12").len(), 2);
    assert_eq!(shuffle_candidates(BetType::BottomTwo, "44").len(), 1);
    // No shuffle rule: the entry passes through unchanged.
    assert_eq!(
        shuffle_candidates(BetType::TopOne, "7"),
        vec!["7".to_string()]
    );
}

#[test]
fn test_format_amount() {
    assert_eq!(format_amount(0), "0");
    assert_eq!(format_amount(999), "999");
    assert_eq!(format_amount(1_000), "1,000");
    assert_eq!(format_amount(1_234_567), "1,234,567");
}

// ---------------------------------------------------------------------------
// Bet-type catalog
// ---------------------------------------------------------------------------

#[test]
fn test_bet_type_codes_roundtrip() {
    for bet_type in BetType::ALL {
        assert_eq!(BetType::from_code(bet_type.code()), Some(bet_type));
        let json = serde_json::to_string(&bet_type).unwrap();
        assert_eq!(json, format!("\"{}\"", bet_type.code()));
        let back: BetType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, bet_type);
    }
    assert_eq!(BetType::from_code("nonsense"), None);
}

#[test]
fn test_bet_rate_from_config() {
    let config = HuayConfig {
        id: 7,
        huay_id: 1,
        huay_type: "huay".to_string(),
        option_type: "teng_bon_3".to_string(),
        min_price: 1,
        max_price: 5_000,
        multiply: 900.0,
        status: 1,
        is_default: 1,
        max_price_per_num: 10_000,
        max_price_per_user: 0,
        type_config: 1,
    };
    let rate = BetRate::from_config(&config).unwrap();
    assert_eq!(rate.bet_type, BetType::TopThree);
    assert_eq!(rate.multiply, 900.0);
    assert_eq!(rate.min_bet, 1);
    assert!(rate.is_active);

    let unknown = HuayConfig {
        option_type: "mystery".to_string(),
        ..config
    };
    assert!(BetRate::from_config(&unknown).is_none());
}

// ---------------------------------------------------------------------------
// Cart
// ---------------------------------------------------------------------------

#[test]
fn test_cart_duplicate_add_never_creates_second_row() {
    let mut cart = Cart::default();
    assert!(matches!(
        cart.add(draft(BetType::TopThree, "123")),
        AddResult::Added(_)
    ));
    assert_eq!(cart.len(), 1);
    assert!(!cart.items()[0].is_duplicate);

    for _ in 0..3 {
        assert_eq!(cart.add(draft(BetType::TopThree, "123")), AddResult::Duplicate);
        assert_eq!(cart.len(), 1);
        assert!(cart.items()[0].is_duplicate);
    }

    // Same number under another type is a distinct row.
    assert!(matches!(
        cart.add(draft(BetType::TodeThree, "123")),
        AddResult::Added(_)
    ));
    assert_eq!(cart.len(), 2);
}

#[test]
fn test_cart_undo_is_inverse_of_last_batch() {
    let mut cart = Cart::default();
    cart.add(draft(BetType::TopTwo, "11"));
    let snapshot = cart.clone();

    let batch = cart.begin_batch();
    cart.add_in_batch(batch, draft(BetType::TopTwo, "12"));
    cart.add_in_batch(batch, draft(BetType::TopTwo, "21"));
    cart.add_in_batch(batch, draft(BetType::TopTwo, "11")); // duplicate, flags existing
    assert_eq!(cart.len(), 3);
    assert!(cart.items()[0].is_duplicate);

    assert_eq!(cart.undo_last(), 2);
    // Duplicate flags are recomputed as if the batch never happened.
    assert_eq!(cart, snapshot);
}

#[test]
fn test_cart_duplicate_only_action_consumes_no_undo_step() {
    // Enter "123" three times: one real add, two duplicate-only attempts.
    let mut cart = Cart::default();
    cart.add(draft(BetType::TopThree, "123"));
    cart.add(draft(BetType::TopThree, "123"));
    cart.add(draft(BetType::TopThree, "123"));
    assert_eq!(cart.len(), 1);
    assert!(cart.items()[0].is_duplicate);
    assert_eq!(cart.last_batch(), 1);

    // One undo fully clears the cart; a second is a no-op.
    assert_eq!(cart.undo_last(), 1);
    assert!(cart.is_empty());
    assert_eq!(cart.undo_last(), 0);
}

#[test]
fn test_cart_remove_reevaluates_sibling_flags() {
    // Two rows sharing a pair can only come from legacy persisted state; a
    // removal must then clear the survivor's duplicate flag.
    let json = serde_json::json!({
        "items": [
            {"id": 0, "bet_type": "teng_bon_2", "number": "55", "amount": 5,
             "multiply": 90.0, "potential_win": 450.0, "batch": 1,
             "is_duplicate": true, "sale_cap": null},
            {"id": 1, "bet_type": "teng_bon_2", "number": "55", "amount": 5,
             "multiply": 90.0, "potential_win": 450.0, "batch": 2,
             "is_duplicate": true, "sale_cap": null}
        ],
        "next_id": 2,
        "last_batch": 2
    });
    let mut cart: Cart = serde_json::from_value(json).unwrap();
    assert!(cart.remove(1));
    assert_eq!(cart.len(), 1);
    assert!(!cart.items()[0].is_duplicate);
}

#[test]
fn test_cart_totals_recomputed() {
    let mut cart = Cart::default();
    let AddResult::Added(a) = cart.add(draft(BetType::TopThree, "123")) else {
        panic!("expected add");
    };
    let AddResult::Added(b) = cart.add(draft(BetType::TopTwo, "45")) else {
        panic!("expected add");
    };
    assert_eq!(cart.total_amount(), 20);
    assert_eq!(cart.total_potential_win(), 1800.0);

    cart.set_amount(a, 100);
    assert_eq!(cart.total_amount(), 110);
    assert_eq!(cart.get(a).unwrap().potential_win, 9_000.0);

    cart.set_amount_all(5);
    assert_eq!(cart.total_amount(), 10);
    assert_eq!(cart.get(b).unwrap().potential_win, 450.0);
}

#[test]
fn test_cart_blockers_and_missing_stake() {
    let mut cart = Cart::default();
    cart.add(LineDraft {
        sale_cap: Some(SaleCap {
            sold_amount: 10_000,
            remaining_amount: 0,
            max_sale_amount: 10_000,
            outcome: CheckOutcome::CapReached,
        }),
        ..draft(BetType::TopThree, "111")
    });
    cart.add(LineDraft {
        amount: 500,
        sale_cap: Some(SaleCap {
            sold_amount: 9_800,
            remaining_amount: 200,
            max_sale_amount: 10_000,
            outcome: CheckOutcome::Reduced,
        }),
        ..draft(BetType::TopThree, "222")
    });
    cart.add(draft(BetType::TopThree, "333"));

    let blockers = cart.blockers();
    assert_eq!(blockers.len(), 2);
    assert!(blockers[0].is_sold_out());
    assert!(blockers[1].exceeds_limit());
    assert!(!blockers[1].is_sold_out());

    assert!(!cart.missing_stake());
    let id = cart.items()[2].id;
    cart.set_amount(id, 0);
    assert!(cart.missing_stake());
}

#[test]
fn test_cart_grouped_by_digit_category() {
    let mut cart = Cart::default();
    cart.add(draft(BetType::TopTwo, "12"));
    cart.add(draft(BetType::TopFour, "1234"));
    cart.add(draft(BetType::TopOne, "7"));
    cart.add(draft(BetType::BottomThree, "456"));

    let groups = cart.grouped();
    let names: Vec<&str> = groups.iter().map(|(name, _)| *name).collect();
    assert_eq!(names, vec!["four-digit", "three-digit", "two-digit", "running"]);
    for (_, rows) in groups {
        assert_eq!(rows.len(), 1);
    }
}

#[test]
fn test_cart_persistence_roundtrip() {
    let mut cart = Cart::default();
    cart.add(draft(BetType::TopThree, "123"));
    cart.add(draft(BetType::TopThree, "123"));
    let json = serde_json::to_string(&cart).unwrap();
    let back: Cart = serde_json::from_str(&json).unwrap();
    assert_eq!(back, cart);
    assert!(back.items()[0].is_duplicate);
}

#[test]
fn test_check_outcome_codes() {
    assert_eq!(serde_json::to_string(&CheckOutcome::Ok).unwrap(), "1");
    assert_eq!(serde_json::to_string(&CheckOutcome::Reduced).unwrap(), "2");
    assert_eq!(serde_json::to_string(&CheckOutcome::CapReached).unwrap(), "99");
    let back: CheckOutcome = serde_json::from_str("99").unwrap();
    assert_eq!(back, CheckOutcome::CapReached);
    assert!(serde_json::from_str::<CheckOutcome>("3").is_err());
}

#[test]
fn test_check_multiply_response_sale_cap() {
    let response: CheckMultiplyResponse = serde_json::from_str(
        r#"{"multiply": 85.0, "isSpecialNumber": true, "soldAmount": 400,
            "remainingAmount": 600, "maxSaleAmount": 1000, "result": 2,
            "codition": "reduced payout"}"#,
    )
    .unwrap();
    let cap = response.sale_cap().unwrap();
    assert_eq!(cap.remaining_amount, 600);
    assert_eq!(cap.outcome, CheckOutcome::Reduced);
    assert_eq!(response.condition.as_deref(), Some("reduced payout"));

    let plain: CheckMultiplyResponse =
        serde_json::from_str(r#"{"multiply": 90.0, "result": 1}"#).unwrap();
    assert!(plain.sale_cap().is_none());
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[test]
fn test_session_selection_never_empty() {
    let mut session = BetSession::new();
    assert_eq!(session.selected(), &[BetType::TopThree]);

    // Deselecting the only remaining type is a no-op.
    assert!(!session.toggle_bet_type(BetType::TopThree));
    assert_eq!(session.selected(), &[BetType::TopThree]);

    assert!(session.toggle_bet_type(BetType::TopTwo));
    assert!(session.toggle_bet_type(BetType::TopThree));
    assert_eq!(session.selected(), &[BetType::TopTwo]);

    session.set_selected(Vec::new());
    assert_eq!(session.selected(), &[BetType::TopThree]);
}

#[test]
fn test_session_toggle_resets_shuffle() {
    let mut session = BetSession::new();
    session.set_shuffle(true);
    session.toggle_bet_type(BetType::TodeFour);
    assert!(!session.shuffle_enabled());

    session.set_shuffle(true);
    session.set_selected(vec![BetType::TopTwo]);
    assert!(!session.shuffle_enabled());
}

#[test]
fn test_session_mode_switch_clears_buffer() {
    let mut session = BetSession::new();
    session.push_digit('1');
    session.push_digit('2');
    assert_eq!(session.buffer(), "12");

    session.set_input_mode(InputMode::Grid);
    assert_eq!(session.buffer(), "");

    // Clearing applies even when re-selecting the active mode.
    session.set_input_mode(InputMode::Keypad);
    session.push_digit('9');
    session.set_input_mode(InputMode::Keypad);
    assert_eq!(session.buffer(), "");
}

#[test]
fn test_session_buffer_autocompletes_at_digit_count() {
    let mut session = BetSession::new(); // primary teng_bon_3
    assert_eq!(session.push_digit('1'), None);
    assert_eq!(session.push_digit('2'), None);
    assert_eq!(session.push_digit('3'), Some("123".to_string()));
    assert_eq!(session.buffer(), "");

    // Non-digits are ignored.
    assert_eq!(session.push_digit('x'), None);
    assert_eq!(session.buffer(), "");

    session.push_digit('4');
    session.backspace();
    assert_eq!(session.buffer(), "");
    session.backspace();

    // A 2-digit primary completes after two keystrokes.
    session.set_selected(vec![BetType::TopTwo]);
    assert_eq!(session.push_digit('9'), None);
    assert_eq!(session.push_digit('8'), Some("98".to_string()));
}

#[test]
fn test_session_candidates_follow_shuffle_toggle() {
    let mut session = BetSession::new();
    assert_eq!(
        session.candidates(BetType::TodeFour, "1234"),
        vec!["1234".to_string()]
    );
    session.set_shuffle(true);
    assert_eq!(session.candidates(BetType::TodeFour, "1234").len(), 24);
    assert_eq!(session.candidates(BetType::TopOne, "7"), vec!["7".to_string()]);
}

#[test]
fn test_session_hydrate_falls_back_to_defaults() {
    let session = BetSession::hydrate(Vec::new(), InputMode::Grid, Cart::default());
    assert_eq!(session.selected(), &[BetType::TopThree]);
    assert_eq!(session.input_mode(), InputMode::Grid);
    assert!(session.cart().is_empty());
}

// ---------------------------------------------------------------------------
// Period
// ---------------------------------------------------------------------------

fn period(flag_nextday: bool) -> Period {
    Period {
        id: "42".to_string(),
        lottery_id: 1,
        huay_code: "gsb".to_string(),
        huay_name: "Government Savings".to_string(),
        huay_group: 1,
        period_name: "15 Jan 2026".to_string(),
        period_date: "2026-01-15".to_string(),
        open_time: Utc.with_ymd_and_hms(2026, 1, 14, 22, 0, 0).unwrap(),
        close_time: Utc.with_ymd_and_hms(2026, 1, 15, 15, 0, 0).unwrap(),
        result_time: Utc.with_ymd_and_hms(2026, 1, 15, 16, 0, 0).unwrap(),
        draw_time: None,
        status: "OPEN".to_string(),
        total_bet_amount: 0.0,
        total_payout_amount: 0.0,
        total_profit: 0.0,
        flag_nextday,
    }
}

#[test]
fn test_period_close_check() {
    let p = period(false);
    assert!(!p.is_closed(Utc.with_ymd_and_hms(2026, 1, 15, 14, 59, 59).unwrap()));
    assert!(p.is_closed(Utc.with_ymd_and_hms(2026, 1, 15, 15, 0, 1).unwrap()));
}

#[test]
fn test_period_midnight_spanning_close() {
    // Open 22:00, close 01:30 "the next day" relative to the open timestamp.
    let mut p = period(true);
    p.close_time = Utc.with_ymd_and_hms(2026, 1, 14, 1, 30, 0).unwrap();
    assert_eq!(
        p.effective_close(),
        Utc.with_ymd_and_hms(2026, 1, 15, 1, 30, 0).unwrap()
    );
    assert!(!p.is_closed(Utc.with_ymd_and_hms(2026, 1, 14, 23, 0, 0).unwrap()));
    assert!(p.is_closed(Utc.with_ymd_and_hms(2026, 1, 15, 2, 0, 0).unwrap()));

    // Without the flag the raw close timestamp stands.
    p.flag_nextday = false;
    assert!(p.is_closed(Utc.with_ymd_and_hms(2026, 1, 14, 23, 0, 0).unwrap()));
}

#[test]
fn test_period_stock_type_and_result_date() {
    let mut p = period(false);
    assert_eq!(p.stock_type(), "g");
    p.huay_code = "set_th".to_string();
    assert_eq!(p.stock_type(), "s");

    assert_eq!(p.result_date(), "2026-01-15");
    p.period_date.clear();
    assert_eq!(p.result_date(), "2026-01-15"); // falls back to close time
}

#[test]
fn test_period_result_date_tolerates_non_ascii_date() {
    // Byte 10 of a Thai date string is mid-character; truncation must fall
    // back to the close timestamp instead of panicking.
    let mut p = period(false);
    p.period_date = "15 มกราคม 2569".to_string();
    assert_eq!(p.result_date(), "2026-01-15");

    // A well-formed date with a trailing time component still truncates.
    p.period_date = "2026-01-16T00:00:00".to_string();
    assert_eq!(p.result_date(), "2026-01-16");
}

#[test]
fn test_period_wire_shape() {
    let json = r#"{
        "id": "9", "lotteryId": 3, "huayCode": "gsb", "huayName": "GSB",
        "huayGroup": 1, "periodName": "round 9", "periodDate": "2026-02-01",
        "openTime": "2026-01-31T22:00:00Z", "closeTime": "2026-02-01T15:00:00Z",
        "resultTime": "2026-02-01T16:00:00Z", "status": "OPEN",
        "totalBetAmount": 1500.5, "flagNextday": true
    }"#;
    let p: Period = serde_json::from_str(json).unwrap();
    assert_eq!(p.lottery_id, 3);
    assert!(p.flag_nextday);
    assert_eq!(p.total_bet_amount, 1500.5);
    assert_eq!(p.total_profit, 0.0);
}

// ---------------------------------------------------------------------------
// Property tests
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn prop_potential_win_is_product(
        amount in 0u64..1_000_000,
        multiply in 0.0f64..10_000.0,
        next_amount in 0u64..1_000_000,
        next_multiply in 0.0f64..10_000.0,
    ) {
        let mut cart = Cart::default();
        let AddResult::Added(id) = cart.add(LineDraft {
            bet_type: BetType::TopThree,
            number: "123".to_string(),
            amount,
            multiply,
            sale_cap: None,
        }) else {
            panic!("expected add");
        };
        prop_assert_eq!(cart.get(id).unwrap().potential_win, amount as f64 * multiply);

        // Mutating either factor alone keeps the product fresh.
        cart.update(id, LineUpdate { amount: Some(next_amount), ..LineUpdate::default() });
        prop_assert_eq!(cart.get(id).unwrap().potential_win, next_amount as f64 * multiply);
        cart.update(id, LineUpdate { multiply: Some(next_multiply), ..LineUpdate::default() });
        prop_assert_eq!(cart.get(id).unwrap().potential_win, next_amount as f64 * next_multiply);

        // And both together.
        cart.update(id, LineUpdate { amount: Some(amount), multiply: Some(multiply) });
        prop_assert_eq!(cart.get(id).unwrap().potential_win, amount as f64 * multiply);
    }

    #[test]
    fn prop_permutations_four_exactly_distinct_multiset(n in 0u32..10_000) {
        let input = format!("{n:04}");
        let perms = permutations_four(&input);

        // No duplicates, every entry a true permutation, input included.
        let set: std::collections::HashSet<&String> = perms.iter().collect();
        prop_assert_eq!(set.len(), perms.len());
        prop_assert!(perms.iter().all(|p| is_permutation_of(p, &input)));
        prop_assert!(perms.contains(&input));

        // Cardinality matches the multiset permutation count 4!/∏(mᵢ!).
        let mut counts = [0usize; 10];
        for b in input.bytes() {
            counts[(b - b'0') as usize] += 1;
        }
        let factorial = |k: usize| (1..=k).product::<usize>();
        let expected = factorial(4) / counts.iter().map(|c| factorial(*c)).product::<usize>();
        prop_assert_eq!(perms.len(), expected);
    }

    #[test]
    fn prop_undo_restores_cart(numbers in proptest::collection::vec(0u32..1000, 1..8)) {
        let mut cart = Cart::default();
        cart.add(draft(BetType::TopTwo, "55"));
        let snapshot = cart.clone();

        let batch = cart.begin_batch();
        for n in numbers {
            cart.add_in_batch(batch, draft(BetType::TopThree, &format!("{n:03}")));
        }
        cart.undo_last();
        prop_assert_eq!(&cart, &snapshot);
    }
}
