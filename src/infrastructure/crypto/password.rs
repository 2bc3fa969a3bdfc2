//! Password hashing

use bcrypt::{hash, verify};

#[cfg(not(test))]
const COST: u32 = bcrypt::DEFAULT_COST;
#[cfg(test)]
const COST: u32 = 4;

pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    hash(password, COST)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password, hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifies_own_hash_only() {
        let hashed = hash("secret", 4).unwrap();
        assert!(verify_password("secret", &hashed).unwrap());
        assert!(!verify_password("other", &hashed).unwrap());
    }
}
