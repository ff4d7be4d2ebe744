//! IBAN generation and lexical validation
//!
//! Account identifiers are Romanian-format IBANs built from a fixed bank code
//! and a counter owned by the account store:
//!
//! ```text
//! RO  kk  XXXX  0000000000000042
//! |   |   |     └── 16-digit zero-padded counter value
//! |   |   └── bank code
//! |   └── ISO 13616 mod-97 check digits
//! └── country code
//! ```
//!
//! Generation only depends on an atomic counter, so identifier uniqueness does
//! not rely on whatever lock the ledger holds.

use super::account::AccountId;
use std::sync::atomic::{AtomicU64, Ordering};

const COUNTRY_CODE: &str = "RO";
const BANK_CODE: &str = "XXXX";
const ACCOUNT_NUMBER_WIDTH: usize = 16;

const MIN_IBAN_LEN: usize = 15;
const MAX_IBAN_LEN: usize = 34;

/// Thread-safe generator of unique account identifiers
#[derive(Debug, Default)]
pub struct IbanGenerator {
    counter: AtomicU64,
}

impl IbanGenerator {
    /// Create a generator whose first identifier embeds account number 0
    pub fn new() -> Self {
        Self {
            counter: AtomicU64::new(0),
        }
    }

    /// Issue the next identifier
    ///
    /// Every call returns a distinct value, no matter how many threads call
    /// it concurrently.
    pub fn next_iban(&self) -> AccountId {
        let number = self.counter.fetch_add(1, Ordering::Relaxed);
        build_iban(number)
    }

    /// Number of identifiers issued so far
    pub fn issued(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }
}

/// Build the IBAN for a given account number
pub fn build_iban(account_number: u64) -> AccountId {
    let bban = format!(
        "{BANK_CODE}{account_number:0width$}",
        width = ACCOUNT_NUMBER_WIDTH
    );
    let check = check_digits(COUNTRY_CODE, &bban);
    format!("{COUNTRY_CODE}{check:02}{bban}")
}

/// Compute the two ISO 13616 check digits for a country code and BBAN
fn check_digits(country: &str, bban: &str) -> u32 {
    let rearranged = bban.chars().chain(country.chars()).chain("00".chars());
    98 - mod97(rearranged)
}

/// Remainder modulo 97 of the decimal expansion of an alphanumeric string
///
/// Letters expand to two digits (A = 10 ... Z = 35). Non-alphanumeric input
/// never reaches this function.
fn mod97(chars: impl Iterator<Item = char>) -> u32 {
    chars.fold(0u32, |acc, c| {
        let value = c.to_digit(36).unwrap_or(0);
        if value >= 10 {
            (acc * 100 + value) % 97
        } else {
            (acc * 10 + value) % 97
        }
    })
}

/// Check the lexical form of an IBAN
///
/// Accepts upper-case alphanumeric strings of 15 to 34 characters that start
/// with a two-letter country code followed by two check digits, and whose
/// mod-97 remainder is 1.
pub fn is_valid_iban(candidate: &str) -> bool {
    let len = candidate.len();
    if !(MIN_IBAN_LEN..=MAX_IBAN_LEN).contains(&len) {
        return false;
    }
    if !candidate
        .chars()
        .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
    {
        return false;
    }

    let (head, bban) = candidate.split_at(4);
    let (country, check) = head.split_at(2);
    if !country.chars().all(|c| c.is_ascii_uppercase()) || !check.chars().all(|c| c.is_ascii_digit())
    {
        return false;
    }

    mod97(bban.chars().chain(head.chars())) == 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[rstest]
    #[case(0, "RO54XXXX0000000000000000")]
    #[case(1, "RO27XXXX0000000000000001")]
    #[case(2, "RO97XXXX0000000000000002")]
    #[case(9, "RO05XXXX0000000000000009")]
    #[case(10, "RO75XXXX0000000000000010")]
    #[case(12345, "RO31XXXX0000000000012345")]
    fn test_build_iban(#[case] number: u64, #[case] expected: &str) {
        assert_eq!(build_iban(number), expected);
    }

    #[test]
    fn test_generator_starts_at_zero_and_increments() {
        let generator = IbanGenerator::new();

        assert_eq!(generator.next_iban(), "RO54XXXX0000000000000000");
        assert_eq!(generator.next_iban(), "RO27XXXX0000000000000001");
        assert_eq!(generator.issued(), 2);
    }

    #[rstest]
    #[case::generated("RO54XXXX0000000000000000", true)]
    #[case::foreign("GB82WEST12345698765432", true)]
    #[case::bad_checksum("GB82WEST12345698765433", false)]
    #[case::lower_case("ro54XXXX0000000000000000", false)]
    #[case::too_short("RO54XXXX", false)]
    #[case::empty("", false)]
    #[case::digit_country("1254XXXX0000000000000000", false)]
    #[case::letter_check_digits("ROAAXXXX0000000000000000", false)]
    #[case::punctuation("RO54-XXX0000000000000000", false)]
    fn test_is_valid_iban(#[case] candidate: &str, #[case] expected: bool) {
        assert_eq!(is_valid_iban(candidate), expected);
    }

    #[test]
    fn test_generated_ibans_are_valid() {
        let generator = IbanGenerator::new();
        for _ in 0..1000 {
            let iban = generator.next_iban();
            assert!(is_valid_iban(&iban), "{} should be valid", iban);
        }
    }

    #[test]
    fn test_concurrent_generation_is_unique() {
        let generator = Arc::new(IbanGenerator::new());
        let mut handles = vec![];

        for _ in 0..8 {
            let generator = Arc::clone(&generator);
            handles.push(thread::spawn(move || {
                (0..1000).map(|_| generator.next_iban()).collect::<Vec<_>>()
            }));
        }

        let mut seen = HashSet::new();
        for handle in handles {
            for iban in handle.join().unwrap() {
                assert!(seen.insert(iban), "duplicate IBAN issued");
            }
        }
        assert_eq!(seen.len(), 8000);
        assert_eq!(generator.issued(), 8000);
    }
}
