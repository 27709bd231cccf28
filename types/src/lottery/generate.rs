//! Combinatorial number generators.
//!
//! Pure functions over digit strings. Every generator returns zero-padded
//! fixed-width strings in ascending order with no duplicates; inputs that fail
//! the digit/length precondition yield an empty set.

use std::collections::BTreeSet;

use super::BetType;

fn digits_of(input: &str, len: usize) -> Option<Vec<char>> {
    if input.len() != len || !input.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(input.chars().collect())
}

fn permute_into(digits: &mut Vec<char>, current: &mut Vec<char>, out: &mut BTreeSet<String>) {
    if digits.is_empty() {
        out.insert(current.iter().collect());
        return;
    }
    for i in 0..digits.len() {
        let d = digits.remove(i);
        current.push(d);
        permute_into(digits, current, out);
        current.pop();
        digits.insert(i, d);
    }
}

fn distinct_permutations(input: &str, len: usize) -> Vec<String> {
    let Some(mut digits) = digits_of(input, len) else {
        return Vec::new();
    };
    let mut out = BTreeSet::new();
    permute_into(&mut digits, &mut Vec::with_capacity(len), &mut out);
    out.into_iter().collect()
}

/// All distinct orderings of a 4-digit number's digit multiset (1 to 24 results).
pub fn permutations_four(input: &str) -> Vec<String> {
    distinct_permutations(input, 4)
}

/// All distinct orderings of a 3-digit number's digit multiset (1 to 6 results).
pub fn permutations_three(input: &str) -> Vec<String> {
    distinct_permutations(input, 3)
}

/// A 2-digit number and its digit reversal (one result for doubles).
pub fn swap_pair(input: &str) -> Vec<String> {
    distinct_permutations(input, 2)
}

/// The "19 gate" set for a single digit `d`: every 2-digit number with `d` in
/// either position. `dd` counts once, so the set always has 19 entries.
pub fn nineteen_gate(digit: &str) -> Vec<String> {
    let Some(d) = digits_of(digit, 1).map(|ds| ds[0]) else {
        return Vec::new();
    };
    let mut out = BTreeSet::new();
    for other in '0'..='9' {
        out.insert([d, other].iter().collect());
        out.insert([other, d].iter().collect());
    }
    out.into_iter().collect()
}

/// `d0..d9`: the ten 2-digit numbers with `d` fixed in the tens place.
pub fn sweep_front(digit: &str) -> Vec<String> {
    let Some(d) = digits_of(digit, 1).map(|ds| ds[0]) else {
        return Vec::new();
    };
    ('0'..='9').map(|other| [d, other].iter().collect()).collect()
}

/// `0d..9d`: the ten 2-digit numbers with `d` fixed in the units place.
pub fn sweep_back(digit: &str) -> Vec<String> {
    let Some(d) = digits_of(digit, 1).map(|ds| ds[0]) else {
        return Vec::new();
    };
    ('0'..='9').map(|other| [other, d].iter().collect()).collect()
}

fn two_digit_filter(keep: impl Fn(u32) -> bool) -> Vec<String> {
    (0..100).filter(|n| keep(*n)).map(|n| format!("{n:02}")).collect()
}

/// The low half of the 2-digit space: 00..=49.
pub fn two_digit_low() -> Vec<String> {
    two_digit_filter(|n| n < 50)
}

/// The high half of the 2-digit space: 50..=99.
pub fn two_digit_high() -> Vec<String> {
    two_digit_filter(|n| n >= 50)
}

pub fn two_digit_even() -> Vec<String> {
    two_digit_filter(|n| n % 2 == 0)
}

pub fn two_digit_odd() -> Vec<String> {
    two_digit_filter(|n| n % 2 == 1)
}

/// The ten doubles: 00, 11, .., 99.
pub fn two_digit_doubles() -> Vec<String> {
    two_digit_filter(|n| n / 10 == n % 10)
}

/// The full ordered zero-padded range for a digit count, backing the grid picker.
/// Supported digit counts are 1..=4.
pub fn number_grid(digit_count: usize) -> Vec<String> {
    if !(1..=4).contains(&digit_count) {
        return Vec::new();
    }
    let upper = 10u32.pow(digit_count as u32);
    (0..upper)
        .map(|n| format!("{n:0width$}", width = digit_count))
        .collect()
}

/// Candidate numbers one entry expands into when the any-order toggle is on.
/// Types without a shuffle rule pass the entry through unchanged.
pub fn shuffle_candidates(bet_type: BetType, number: &str) -> Vec<String> {
    let expanded = match bet_type {
        BetType::TodeFour => permutations_four(number),
        BetType::TopThree | BetType::TodeThree => permutations_three(number),
        BetType::TopTwo | BetType::BottomTwo => swap_pair(number),
        _ => Vec::new(),
    };
    if expanded.is_empty() {
        vec![number.to_string()]
    } else {
        expanded
    }
}

/// Thousands-grouped display formatting for stake amounts.
pub fn format_amount(value: u64) -> String {
    let raw = value.to_string();
    let mut out = String::with_capacity(raw.len() + raw.len() / 3);
    for (i, c) in raw.chars().enumerate() {
        if i > 0 && (raw.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
