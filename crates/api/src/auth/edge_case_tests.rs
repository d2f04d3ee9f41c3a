//! Edge case tests for the auth primitives
//!
//! Boundary conditions that cut across the individual modules:
//! token entropy, digest/raw separation, window arithmetic, and
//! claims round-trips.

#[cfg(test)]
mod token_entropy_tests {
    use crate::auth::tokens::*;
    use std::collections::HashSet;

    #[test]
    fn a_thousand_tokens_have_no_collisions() {
        let tokens: HashSet<String> = (0..1000).map(|_| generate_opaque_token()).collect();
        assert_eq!(tokens.len(), 1000);
    }

    #[test]
    fn tokens_are_url_safe() {
        let token = generate_opaque_token();
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn digest_is_fixed_width_regardless_of_input() {
        assert_eq!(hash_token("").len(), 64);
        assert_eq!(hash_token("x").len(), 64);
        assert_eq!(hash_token(&"y".repeat(10_000)).len(), 64);
    }

    #[test]
    fn distinct_tokens_produce_distinct_digests() {
        let a = generate_opaque_token();
        let b = generate_opaque_token();
        assert_ne!(hash_token(&a), hash_token(&b));
    }
}

#[cfg(test)]
mod window_tests {
    use crate::auth::tokens::{RESET_TOKEN_TTL, VERIFICATION_TOKEN_TTL};
    use time::{Duration, OffsetDateTime};

    #[test]
    fn reset_window_is_strictly_shorter_than_verification_window() {
        assert!(RESET_TOKEN_TTL < VERIFICATION_TOKEN_TTL);
    }

    #[test]
    fn expiry_computed_from_ttl_lands_in_the_future() {
        let now = OffsetDateTime::now_utc();
        let reset_expiry = now + RESET_TOKEN_TTL;
        let verification_expiry = now + VERIFICATION_TOKEN_TTL;

        assert_eq!(reset_expiry - now, Duration::minutes(30));
        assert_eq!(verification_expiry - now, Duration::hours(24));
    }
}

#[cfg(test)]
mod password_edge_tests {
    use crate::auth::password::*;

    #[test]
    fn hashes_are_phc_argon2_strings() {
        let hash = hash_password("secret123").unwrap();
        assert!(hash.starts_with("$argon2"));
    }

    #[test]
    fn empty_password_still_round_trips() {
        // Length policy is boundary validation's job; the hasher itself
        // must stay total.
        let hash = hash_password("").unwrap();
        assert!(verify_password("", &hash).unwrap());
        assert!(!verify_password("nonempty", &hash).unwrap());
    }

    #[test]
    fn unicode_passwords_round_trip() {
        let hash = hash_password("pässwörd\u{1F512}").unwrap();
        assert!(verify_password("pässwörd\u{1F512}", &hash).unwrap());
    }
}

#[cfg(test)]
mod claims_tests {
    use crate::accounts::Role;
    use crate::auth::jwt::Claims;
    use uuid::Uuid;

    #[test]
    fn claims_round_trip_through_json() {
        let claims = Claims {
            sub: Uuid::new_v4(),
            role: Role::Lecturer,
            iat: 1_700_000_000,
            exp: 1_700_086_400,
        };
        let json = serde_json::to_string(&claims).unwrap();
        let back: Claims = serde_json::from_str(&json).unwrap();
        assert_eq!(back.sub, claims.sub);
        assert_eq!(back.role, Role::Lecturer);
        assert_eq!(back.exp - back.iat, 86_400);
    }

    #[test]
    fn role_claim_is_lowercase_on_the_wire() {
        let claims = Claims {
            sub: Uuid::new_v4(),
            role: Role::Admin,
            iat: 0,
            exp: 1,
        };
        let json = serde_json::to_string(&claims).unwrap();
        assert!(json.contains("\"role\":\"admin\""));
    }
}
