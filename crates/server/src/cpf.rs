//! Brazilian CPF (taxpayer id) check-digit validation.
//!
//! Not applied to customer records; available for business rules that want it.

/// Weights for the first check digit.
const FIRST_WEIGHTS: [u32; 9] = [10, 9, 8, 7, 6, 5, 4, 3, 2];

/// Weights for the second check digit.
const SECOND_WEIGHTS: [u32; 10] = [11, 10, 9, 8, 7, 6, 5, 4, 3, 2];

/// Check whether `cpf` is a well-formed CPF number.
///
/// Surrounding whitespace and the usual `.`/`-` punctuation are ignored.
/// The remaining 11 characters must be digits whose last two match the
/// mod-11 check digits computed from the first nine.
pub fn is_valid_cpf(cpf: &str) -> bool {
    let digits: Option<Vec<u32>> = cpf
        .trim()
        .chars()
        .filter(|c| !matches!(c, '.' | '-'))
        .map(|c| c.to_digit(10))
        .collect();

    let Some(digits) = digits else {
        return false;
    };
    if digits.len() != 11 {
        return false;
    }

    let first = check_digit(&digits[..9], &FIRST_WEIGHTS);
    let second = check_digit(&digits[..10], &SECOND_WEIGHTS);
    digits[9] == first && digits[10] == second
}

fn check_digit(digits: &[u32], weights: &[u32]) -> u32 {
    let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
    match sum % 11 {
        rest if rest < 2 => 0,
        rest => 11 - rest,
    }
}
