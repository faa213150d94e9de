use crate::error::GeneratorError;
use crate::Generator;
use linkmint_core::shortcode::MAX_LENGTH;
use linkmint_core::ShortCode;
use std::iter;

/// The 62 characters a generated code is drawn from.
pub const ALPHABET: &[u8; 62] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Draws `length` characters uniformly at random, with replacement, from
/// [`ALPHABET`].
pub fn generate_code(length: usize) -> Result<String, GeneratorError> {
    check_length(length)?;
    Ok(draw(length))
}

fn check_length(length: usize) -> Result<(), GeneratorError> {
    if length == 0 || length > MAX_LENGTH {
        return Err(GeneratorError::InvalidLength {
            length,
            max: MAX_LENGTH,
        });
    }
    Ok(())
}

fn draw(length: usize) -> String {
    iter::repeat_with(|| ALPHABET[rand::random_range(0..ALPHABET.len())] as char)
        .take(length)
        .collect()
}

/// A generator producing uniformly random fixed-length alphanumeric codes.
///
/// With the default length the code space is 62^6 (about 5.7e10), so
/// collisions stay rare until the link table holds millions of rows.
#[derive(Debug, Clone)]
pub struct RandomGenerator {
    length: usize,
}

impl RandomGenerator {
    /// Creates a generator for codes of `length` characters.
    pub fn new(length: usize) -> Result<Self, GeneratorError> {
        check_length(length)?;
        Ok(Self { length })
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

impl Default for RandomGenerator {
    fn default() -> Self {
        Self {
            length: DEFAULT_CODE_LENGTH,
        }
    }
}

impl Generator for RandomGenerator {
    fn generate(&self) -> ShortCode {
        ShortCode::new_unchecked(draw(self.length))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn default_codes_are_six_alphanumeric_chars() {
        let generator = RandomGenerator::default();

        for _ in 0..1_000 {
            let code = generator.generate();
            assert_eq!(code.as_str().len(), 6);
            assert!(code.as_str().bytes().all(|b| ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn generated_codes_pass_validation() {
        let generator = RandomGenerator::new(12).unwrap();
        let code = generator.generate();
        assert!(ShortCode::new(code.as_str()).is_ok());
    }

    #[test]
    fn zero_length_is_rejected() {
        assert_eq!(
            generate_code(0),
            Err(GeneratorError::InvalidLength {
                length: 0,
                max: MAX_LENGTH
            })
        );
        assert!(RandomGenerator::new(0).is_err());
    }

    #[test]
    fn overlong_length_is_rejected() {
        assert!(generate_code(MAX_LENGTH + 1).is_err());
        assert_eq!(generate_code(MAX_LENGTH).unwrap().len(), MAX_LENGTH);
    }

    #[test]
    fn codes_vary() {
        let codes: HashSet<String> = (0..100).map(|_| generate_code(6).unwrap()).collect();
        // 100 draws from 62^6 colliding more than once would point at a broken rng
        assert!(codes.len() >= 99);
    }

    #[test]
    fn alphabet_has_no_duplicates() {
        let unique: HashSet<u8> = ALPHABET.iter().copied().collect();
        assert_eq!(unique.len(), 62);
    }

    #[test]
    fn generator_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RandomGenerator>();
    }
}
