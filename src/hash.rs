//! Password obfuscation.
//!
//! This is not a password hash in any cryptographic sense. It exists so the
//! account record never holds the plaintext, and it is kept bit-for-bit
//! identical to the tokens already sitting in existing stores:
//!
//! ```text
//! h     = fold(password)           // h = h*31 + code_unit, wrapping i32
//! s     = base36(|h|)
//! s     = base36(|fold(s)|)        // five rounds
//! token = "tf$" + base36(|h|) + "$" + s
//! ```
//!
//! Characters are folded as UTF-16 code units.

const TOKEN_PREFIX: &str = "tf$";
const AVALANCHE_ROUNDS: usize = 5;
const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Compute the stored token for a plaintext password.
pub fn password_token(password: &str) -> String {
    let seed = fold(password).unsigned_abs();
    let mut round = base36(seed);
    for _ in 0..AVALANCHE_ROUNDS {
        round = base36(fold(&round).unsigned_abs());
    }
    format!("{TOKEN_PREFIX}{}${round}", base36(seed))
}

/// Exact comparison of a freshly computed token against a stored one.
pub fn verify_password(password: &str, token: &str) -> bool {
    password_token(password) == token
}

fn fold(input: &str) -> i32 {
    input.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit))
    })
}

fn base36(mut value: u32) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36_DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_wraps_like_32_bit_signed() {
        assert_eq!(fold(""), 0);
        assert_eq!(fold("a"), 97);
        // 31 * 97 + 98
        assert_eq!(fold("ab"), 3105);
        // long inputs overflow and wrap instead of panicking
        let long = "z".repeat(64);
        let _ = fold(&long);
    }

    #[test]
    fn base36_matches_radix_conversion() {
        assert_eq!(base36(0), "0");
        assert_eq!(base36(35), "z");
        assert_eq!(base36(36), "10");
        assert_eq!(base36(u32::MAX), "1z141z3");
        assert_eq!(base36(2_147_483_648), "zik0zk");
    }

    #[test]
    fn known_tokens() {
        assert_eq!(password_token("abcd"), "tf$1s0ua$kw2wpx");
        assert_eq!(password_token(""), "tf$0$26453");
        assert_eq!(password_token("secret"), "tf$ezknyo$k1usla");
        assert_eq!(password_token("password123"), "tf$n7qt9z$j60109");
    }

    #[test]
    fn non_ascii_passwords_fold_utf16_units() {
        assert_eq!(password_token("پسورد"), "tf$q6xlu9$j6fnuf");
    }

    #[test]
    fn verify_is_exact_match() {
        let token = password_token("hunter22");
        assert!(verify_password("hunter22", &token));
        assert!(!verify_password("hunter2", &token));
        assert!(!verify_password("hunter22", &format!("{token} ")));
    }
}
