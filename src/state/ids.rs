//! Random identifier generation.

use rand::Rng;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

pub const FORM_ID_LEN: usize = 10;
pub const FIELD_ID_LEN: usize = 8;
pub const SUBMISSION_ID_LEN: usize = 12;

/// Return a random URL-safe id of `len` characters.
///
pub fn generate<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Return a random id for which `is_taken` answers false.
///
pub fn generate_unique<R, F>(rng: &mut R, len: usize, is_taken: F) -> String
where
    R: Rng + ?Sized,
    F: Fn(&str) -> bool,
{
    loop {
        let id = generate(rng, len);
        if !is_taken(&id) {
            return id;
        }
    }
}

pub fn is_valid(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| ALPHABET.contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn generated_ids_have_requested_length_and_alphabet() {
        let mut rng = StdRng::seed_from_u64(7);
        for len in [FIELD_ID_LEN, FORM_ID_LEN, SUBMISSION_ID_LEN] {
            let id = generate(&mut rng, len);
            assert_eq!(id.len(), len);
            assert!(is_valid(&id));
        }
    }

    #[test]
    fn generate_unique_skips_taken_ids() {
        let mut rng = StdRng::seed_from_u64(1);
        let first = generate(&mut StdRng::seed_from_u64(1), FIELD_ID_LEN);
        let id = generate_unique(&mut rng, FIELD_ID_LEN, |candidate| candidate == first);
        assert_ne!(id, first);
    }

    #[test]
    fn ids_do_not_repeat_in_practice() {
        let mut rng = StdRng::seed_from_u64(99);
        let ids: HashSet<String> = (0..1_000).map(|_| generate(&mut rng, FIELD_ID_LEN)).collect();
        assert_eq!(ids.len(), 1_000);
    }

    #[test]
    fn validity() {
        assert!(is_valid("abc_DEF-09"));
        assert!(!is_valid(""));
        assert!(!is_valid("has space"));
        assert!(!is_valid("slash/id"));
    }
}
