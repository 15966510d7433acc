// crates/boleto-harness/src/document.rs
// ============================================================================
// Module: Tax Document Numbers
// Description: CPF/CNPJ generation and check-digit validation.
// Purpose: Produce payer documents the orchestrator accepts as well-formed.
// Dependencies: rand
// ============================================================================

//! ## Overview
//! CPF (11 digits) and CNPJ (14 digits) carry two mod-11 check digits.
//! Generated numbers are unformatted digit strings, never a single digit
//! repeated, and always pass [`is_valid_cpf`] / [`is_valid_cnpj`].

use rand::Rng;

// ============================================================================
// SECTION: Weights
// ============================================================================

const CPF_FIRST_WEIGHTS: [u32; 9] = [10, 9, 8, 7, 6, 5, 4, 3, 2];
const CPF_SECOND_WEIGHTS: [u32; 10] = [11, 10, 9, 8, 7, 6, 5, 4, 3, 2];
const CNPJ_FIRST_WEIGHTS: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
const CNPJ_SECOND_WEIGHTS: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

// ============================================================================
// SECTION: Generation
// ============================================================================

/// Generates a random valid CPF.
#[must_use]
pub fn generate_cpf() -> String {
    generate_cpf_with(&mut rand::thread_rng())
}

/// Generates a valid CPF from the supplied RNG.
#[must_use]
pub fn generate_cpf_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    generate_with(rng, &CPF_FIRST_WEIGHTS, &CPF_SECOND_WEIGHTS)
}

/// Generates a random valid CNPJ.
#[must_use]
pub fn generate_cnpj() -> String {
    generate_cnpj_with(&mut rand::thread_rng())
}

/// Generates a valid CNPJ from the supplied RNG.
#[must_use]
pub fn generate_cnpj_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    generate_with(rng, &CNPJ_FIRST_WEIGHTS, &CNPJ_SECOND_WEIGHTS)
}

/// Draws random base digits and appends both check digits.
fn generate_with<R: Rng + ?Sized>(rng: &mut R, first: &[u32], second: &[u32]) -> String {
    loop {
        let mut digits: Vec<u32> = (0 .. first.len()).map(|_| rng.gen_range(0 .. 10)).collect();
        if is_repeated(&digits) {
            continue;
        }
        digits.push(check_digit(&digits, first));
        digits.push(check_digit(&digits, second));
        return digits.iter().filter_map(|digit| char::from_digit(*digit, 10)).collect();
    }
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Returns true when `value` is an 11-digit CPF with correct check digits.
#[must_use]
pub fn is_valid_cpf(value: &str) -> bool {
    is_valid(value, &CPF_FIRST_WEIGHTS, &CPF_SECOND_WEIGHTS)
}

/// Returns true when `value` is a 14-digit CNPJ with correct check digits.
#[must_use]
pub fn is_valid_cnpj(value: &str) -> bool {
    is_valid(value, &CNPJ_FIRST_WEIGHTS, &CNPJ_SECOND_WEIGHTS)
}

/// Checks length, digit-only content, repetition and both check digits.
fn is_valid(value: &str, first: &[u32], second: &[u32]) -> bool {
    let Some(digits) = value.chars().map(|ch| ch.to_digit(10)).collect::<Option<Vec<u32>>>() else {
        return false;
    };
    let base = first.len();
    if digits.len() != base + 2 || is_repeated(&digits) {
        return false;
    }
    check_digit(&digits[.. base], first) == digits[base]
        && check_digit(&digits[.. base + 1], second) == digits[base + 1]
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Mod-11 check digit: remainders below 2 map to 0.
fn check_digit(digits: &[u32], weights: &[u32]) -> u32 {
    let sum: u32 = digits.iter().zip(weights).map(|(digit, weight)| digit * weight).sum();
    let remainder = sum % 11;
    if remainder < 2 { 0 } else { 11 - remainder }
}

/// True when every digit is the same.
fn is_repeated(digits: &[u32]) -> bool {
    digits.windows(2).all(|pair| pair[0] == pair[1])
}
