//! # Algorithm Confusion
//!
//! Attacker rewrites the header to pick a weaker algorithm (`none`, an HMAC
//! keyed with the public key, a near-miss spelling) hoping the verifier
//! follows the header instead of its own pin.

#[cfg(test)]
mod tests {
    use crate::fixtures::{Fleet, T};
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use telemetry_token::{Header, RejectionReason, TokenCodec};

    /// Replace the header segment, keep claims and signature.
    fn with_header(wire: &str, header_json: &str) -> String {
        let mut parts = wire.splitn(2, '.');
        let _ = parts.next();
        format!("{}.{}", URL_SAFE_NO_PAD.encode(header_json), parts.next().unwrap())
    }

    #[test]
    fn test_alg_none_with_empty_signature() {
        let fleet = Fleet::provision(1);
        let wire = fleet.token(0, "temp=65", "n1", T);
        let (unsigned, _) = wire.rsplit_once('.').unwrap();
        let forged = format!("{}.", with_header(unsigned, r#"{"alg":"none"}"#));

        assert_eq!(
            fleet.verifier_at(T).verify(&forged).reason(),
            Some(RejectionReason::MalformedToken)
        );
    }

    #[test]
    fn test_alg_none_with_valid_signature_bytes() {
        let fleet = Fleet::provision(1);
        let wire = fleet.token(0, "temp=65", "n1", T);

        let forged = with_header(&wire, r#"{"alg":"none"}"#);

        assert_eq!(
            fleet.verifier_at(T).verify(&forged).reason(),
            Some(RejectionReason::UnsupportedAlgorithm)
        );
    }

    #[test]
    fn test_near_miss_algorithm_names() {
        let fleet = Fleet::provision(1);
        let wire = fleet.token(0, "temp=65", "n1", T);
        let verifier = fleet.verifier_at(T);

        for alg in ["HS256", "ES256", "es256k", "ES256K ", " ES256K", "ES256K\u{0}", ""] {
            let header = String::from_utf8(
                TokenCodec::default()
                    .encode_header(&Header::with_algorithm(alg))
                    .unwrap(),
            )
            .unwrap();

            assert_eq!(
                verifier.verify(&with_header(&wire, &header)).reason(),
                Some(RejectionReason::UnsupportedAlgorithm),
                "alg {alg:?}"
            );
        }
    }

    #[test]
    fn test_extra_header_fields_rejected() {
        let fleet = Fleet::provision(1);
        let wire = fleet.token(0, "temp=65", "n1", T);
        let verifier = fleet.verifier_at(T);

        for header in [
            r#"{"alg":"ES256K","kid":"attacker"}"#,
            r#"{"alg":"ES256K","alg":"none"}"#,
            r#"{"alg":"none","alg":"ES256K"}"#,
            r#"{"typ":"JWT","alg":"ES256K"}"#,
        ] {
            assert_eq!(
                verifier.verify(&with_header(&wire, header)).reason(),
                Some(RejectionReason::MalformedToken),
                "header {header}"
            );
        }
    }
}
