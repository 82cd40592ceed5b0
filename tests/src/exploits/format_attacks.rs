//! # Format Attacks
//!
//! Attacker re-encodes a signed token into an equivalent-looking but
//! different byte form (whitespace, field order, escapes, padding, alphabet)
//! or inflates it, hoping verifier and signer disagree about what was signed.

#[cfg(test)]
mod tests {
    use crate::fixtures::{Fleet, T};
    use base64::{
        engine::general_purpose::{STANDARD, URL_SAFE, URL_SAFE_NO_PAD},
        Engine,
    };
    use telemetry_token::{RejectionReason, DEFAULT_MAX_TOKEN_LEN};

    /// Split a wire token into its three segments.
    fn segments(wire: &str) -> (String, String, String) {
        let parts: Vec<&str> = wire.split('.').collect();
        (parts[0].into(), parts[1].into(), parts[2].into())
    }

    /// Replace the claims segment with `claims_json`, keep the signature.
    fn with_claims(wire: &str, claims_json: &str) -> String {
        let (header, _, signature) = segments(wire);
        format!(
            "{header}.{}.{signature}",
            URL_SAFE_NO_PAD.encode(claims_json)
        )
    }

    #[test]
    fn test_equivalent_json_is_rejected() {
        let fleet = Fleet::provision(1);
        let wire = fleet.token(0, "temp=65", "n1", T);
        let verifier = fleet.verifier_at(T);

        for claims in [
            // whitespace
            r#"{ "message":"temp=65","device_id":"dev-0","nonce":"n1","issued_at":1700000000}"#,
            "{\"message\":\"temp=65\",\"device_id\":\"dev-0\",\"nonce\":\"n1\",\"issued_at\":1700000000}\n",
            // field order
            r#"{"device_id":"dev-0","message":"temp=65","nonce":"n1","issued_at":1700000000}"#,
            // escaped ASCII
            r#"{"message":"\u0074emp=65","device_id":"dev-0","nonce":"n1","issued_at":1700000000}"#,
            r#"{"message":"temp=65","device_id":"dev\/0","nonce":"n1","issued_at":1700000000}"#,
            // number forms
            r#"{"message":"temp=65","device_id":"dev-0","nonce":"n1","issued_at":1.7e9}"#,
            r#"{"message":"temp=65","device_id":"dev-0","nonce":"n1","issued_at":01700000000}"#,
            // smuggled field
            r#"{"message":"temp=65","device_id":"dev-0","nonce":"n1","issued_at":1700000000,"admin":true}"#,
            // duplicate field, last one wins in lenient parsers
            r#"{"message":"temp=65","device_id":"dev-0","nonce":"n1","issued_at":1700000000,"message":"temp=99"}"#,
        ] {
            assert_eq!(
                verifier.verify(&with_claims(&wire, claims)).reason(),
                Some(RejectionReason::MalformedToken),
                "claims {claims}"
            );
        }
    }

    #[test]
    fn test_canonical_reencoding_is_accepted() {
        let fleet = Fleet::provision(1);
        let wire = fleet.token(0, "temp=65", "n1", T);

        let rebuilt = with_claims(
            &wire,
            r#"{"message":"temp=65","device_id":"dev-0","nonce":"n1","issued_at":1700000000}"#,
        );

        assert_eq!(rebuilt, wire);
        assert!(fleet.verifier_at(T).verify(&rebuilt).is_verified());
    }

    #[test]
    fn test_alternate_base64_forms_rejected() {
        let fleet = Fleet::provision(1);
        let wire = fleet.token(0, "temp=65?>>", "n1", T);
        let (header, claims, signature) = segments(&wire);
        let raw_claims = URL_SAFE_NO_PAD.decode(&claims).unwrap();
        let raw_signature = URL_SAFE_NO_PAD.decode(&signature).unwrap();
        let verifier = fleet.verifier_at(T);

        let padded_claims = URL_SAFE.encode(&raw_claims);
        let std_claims = STANDARD.encode(&raw_claims);
        let padded_signature = URL_SAFE.encode(&raw_signature);

        let mut forged = vec![format!("{header}.{claims}.{padded_signature}")];
        if padded_claims != claims {
            forged.push(format!("{header}.{padded_claims}.{signature}"));
        }
        if std_claims.trim_end_matches('=') != claims {
            forged.push(format!("{header}.{std_claims}.{signature}"));
        }

        for token in forged {
            assert_eq!(
                verifier.verify(&token).reason(),
                Some(RejectionReason::MalformedToken),
                "token {token}"
            );
        }
    }

    #[test]
    fn test_non_canonical_trailing_bits_rejected() {
        let fleet = Fleet::provision(1);
        let wire = fleet.token(0, "temp=65", "n1", T);
        let (header, claims, signature) = segments(&wire);

        // 64 signature bytes leave 4 unused bits in the last character
        let mut chars: Vec<char> = signature.chars().collect();
        let last = chars.pop().unwrap();
        let alphabet = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";
        let index = alphabet.find(last).unwrap();
        chars.push(alphabet.as_bytes()[index | 0b01] as char);
        let tweaked: String = chars.into_iter().collect();

        if tweaked != signature {
            assert_eq!(
                fleet
                    .verifier_at(T)
                    .verify(&format!("{header}.{claims}.{tweaked}"))
                    .reason(),
                Some(RejectionReason::MalformedToken)
            );
        }
    }

    #[test]
    fn test_delimiter_games() {
        let fleet = Fleet::provision(1);
        let wire = fleet.token(0, "temp=65", "n1", T);
        let (header, claims, signature) = segments(&wire);
        let verifier = fleet.verifier_at(T);

        for token in [
            format!("{header}..{claims}.{signature}"),
            format!(".{header}.{claims}.{signature}"),
            format!("{header}.{claims}.{signature}."),
            format!("{header}.{claims}"),
            format!("{header}{claims}{signature}"),
            format!("{header}.{claims}.{signature}.{signature}"),
        ] {
            assert_eq!(
                verifier.verify(&token).reason(),
                Some(RejectionReason::MalformedToken),
                "token {token}"
            );
        }
    }

    #[test]
    fn test_oversized_token_rejected_before_decoding() {
        let fleet = Fleet::provision(1);
        let message = "x".repeat(DEFAULT_MAX_TOKEN_LEN);
        let wire = fleet.token(0, &message, "n1", T);

        assert!(wire.len() > DEFAULT_MAX_TOKEN_LEN);
        assert_eq!(
            fleet.verifier_at(T).verify(&wire).reason(),
            Some(RejectionReason::MalformedToken)
        );
    }

    #[test]
    fn test_truncated_signature() {
        let fleet = Fleet::provision(1);
        let wire = fleet.token(0, "temp=65", "n1", T);
        let (header, claims, signature) = segments(&wire);
        let raw = URL_SAFE_NO_PAD.decode(&signature).unwrap();

        for len in [0usize, 1, 32, 63, 65] {
            let mut bytes = raw.clone();
            bytes.resize(len, 0);
            let token = format!("{header}.{claims}.{}", URL_SAFE_NO_PAD.encode(&bytes));
            assert_eq!(
                fleet.verifier_at(T).verify(&token).reason(),
                Some(RejectionReason::MalformedToken),
                "len {len}"
            );
        }
    }
}
