//! Opaque code generation for referral codes, tracking links, and invites.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::{distributions::Alphanumeric, Rng, RngCore};

/// Alphabet for human-facing codes. Excludes 0/O and 1/I/l to avoid
/// transcription mistakes.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

/// Length of referral codes (e.g. `K4TQ-9WNB`).
const REFERRAL_CODE_LEN: usize = 8;

/// Length of tracking link codes.
const TRACKING_CODE_LEN: usize = 10;

/// Generates a referral code in `XXXX-XXXX` format.
pub fn generate_referral_code() -> String {
    let mut rng = rand::thread_rng();
    let chars: Vec<char> = (0..REFERRAL_CODE_LEN)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect();

    format!(
        "{}-{}",
        chars[..4].iter().collect::<String>(),
        chars[4..].iter().collect::<String>()
    )
}

/// Generates a short lowercase code for tracking link slugs.
pub fn generate_tracking_code() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TRACKING_CODE_LEN)
        .map(|c| (c as char).to_ascii_lowercase())
        .collect()
}

/// Generates a URL-safe invite token (256 bits of entropy).
pub fn generate_invite_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_referral_code_format() {
        let code = generate_referral_code();
        assert_eq!(code.len(), 9);
        assert_eq!(&code[4..5], "-");
        for c in code.chars().filter(|c| *c != '-') {
            assert!(
                CODE_ALPHABET.contains(&(c as u8)),
                "unexpected character {} in {}",
                c,
                code
            );
        }
    }

    #[test]
    fn test_referral_code_excludes_ambiguous_characters() {
        for _ in 0..100 {
            let code = generate_referral_code();
            assert!(!code.contains('0'));
            assert!(!code.contains('O'));
            assert!(!code.contains('1'));
            assert!(!code.contains('I'));
        }
    }

    #[test]
    fn test_tracking_code_length_and_case() {
        let code = generate_tracking_code();
        assert_eq!(code.len(), 10);
        assert_eq!(code, code.to_ascii_lowercase());
    }

    #[test]
    fn test_invite_token_is_url_safe() {
        let token = generate_invite_token();
        assert_eq!(token.len(), 43); // 32 bytes base64url without padding
        assert!(!token.contains('+'));
        assert!(!token.contains('/'));
        assert!(!token.contains('='));
    }

    #[test]
    fn test_codes_are_unique() {
        let a = generate_invite_token();
        let b = generate_invite_token();
        assert_ne!(a, b);

        let c = generate_referral_code();
        let d = generate_referral_code();
        // 31^8 combinations; collision here would indicate a broken RNG
        assert_ne!(c, d);
    }
}
