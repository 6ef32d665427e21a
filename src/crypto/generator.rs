//! Random passwords for new entries.

use rand::Rng;
use zeroize::Zeroizing;

/// Length used when the caller does not ask for one.
pub const DEFAULT_LENGTH: usize = 16;

/// Letters, digits and the printable ASCII symbols that survive copy and
/// paste into most login forms.
pub const CHARSET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*()_+~`|}{[]:;?><,./-=";

/// Draw `length` characters uniformly from `CHARSET` using the
/// thread-local CSPRNG.
pub fn generate_password(length: usize) -> Zeroizing<String> {
    let mut rng = rand::rng();
    let mut password = Zeroizing::new(String::with_capacity(length));
    for _ in 0..length {
        password.push(char::from(CHARSET[rng.random_range(0..CHARSET.len())]));
    }
    password
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_requested_length() {
        assert_eq!(generate_password(DEFAULT_LENGTH).len(), 16);
        assert_eq!(generate_password(64).chars().count(), 64);
        assert!(generate_password(0).is_empty());
    }

    #[test]
    fn only_uses_charset() {
        let pw = generate_password(512);
        assert!(pw.bytes().all(|b| CHARSET.contains(&b)));
    }

    #[test]
    fn consecutive_passwords_differ() {
        assert_ne!(*generate_password(32), *generate_password(32));
    }
}
