//! # End-to-End Flows
//!
//! Device constructs claims, signer produces a wire token, the collector
//! verifies it against the registry.

#[cfg(test)]
mod tests {
    use crate::fixtures::{device_id, Fleet, T};
    use telemetry_crypto::DeviceKeyPair;
    use telemetry_token::{
        Claims, InMemoryDeviceRegistry, RegistryEntry, RejectionReason, TokenCodec,
        TokenSigner, TokenVerificationApi, TokenVerificationService, TokenVerifier,
        VerificationResult, VerifierConfig,
    };

    // =============================================================================
    // HAPPY PATH
    // =============================================================================

    #[test]
    fn test_device_to_collector() {
        let fleet = Fleet::provision(1);
        let wire = fleet.token(0, "temp=65", "n1", T);

        let result = fleet.verifier_at(T + 5).verify(&wire);

        let claims = result.into_result().unwrap();
        assert_eq!(claims.message, "temp=65");
        assert_eq!(claims.device_id, device_id(0));
        assert_eq!(claims.nonce, "n1");
        assert_eq!(claims.issued_at, T);
    }

    #[test]
    fn test_decoded_token_matches_issued() {
        let key_pair = DeviceKeyPair::generate();
        let signer = TokenSigner::new(key_pair);
        let claims = Claims::new("temp=65", "dev-1", "n1", T);
        let token = signer.issue(&claims).unwrap();

        let wire = token.to_wire().unwrap();
        let decoded = TokenCodec::default().decode_token(&wire).unwrap();

        assert_eq!(decoded.header, token.header);
        assert_eq!(decoded.claims, token.claims);
        assert_eq!(decoded.signature, token.signature);
    }

    #[test]
    fn test_payload_with_delimiters_and_unicode() {
        let fleet = Fleet::provision(1);
        let message = r#"a.b.c "quoted" \ back/slash 温度=65°C 🚀"#;
        let wire = fleet.token(0, message, "n.1", T);

        assert_eq!(wire.matches('.').count(), 2);
        let result = fleet.verifier_at(T).verify(&wire);
        assert_eq!(result.claims().unwrap().message, message);
    }

    #[test]
    fn test_many_devices_isolated() {
        let fleet = Fleet::provision(5);
        let verifier = fleet.verifier_at(T);

        for i in 0..5 {
            let wire = fleet.token(i, &format!("reading {i}"), "n", T);
            let claims = verifier.verify(&wire).into_result().unwrap();
            assert_eq!(claims.device_id, device_id(i));
        }
    }

    #[test]
    fn test_impersonating_other_device_fails() {
        let fleet = Fleet::provision(2);
        let forged = fleet.signers[1]
            .issue_wire(&Claims::new("temp=65", device_id(0), "n1", T))
            .unwrap();

        assert_eq!(
            fleet.verifier_at(T).verify(&forged).reason(),
            Some(RejectionReason::InvalidSignature)
        );
    }

    #[test]
    fn test_random_nonces_give_distinct_tokens() {
        let fleet = Fleet::provision(1);
        let verifier = fleet.verifier_at(T);

        let wires: Vec<String> = (0..4)
            .map(|_| fleet.token(0, "temp=65", &uuid::Uuid::new_v4().to_string(), T))
            .collect();

        for (i, wire) in wires.iter().enumerate() {
            assert!(verifier.verify(wire).is_verified());
            assert!(wires[i + 1..].iter().all(|other| other != wire));
        }
    }

    // =============================================================================
    // REGISTRY LIFECYCLE
    // =============================================================================

    #[test]
    fn test_registry_from_provisioning_json() {
        let key_pair = DeviceKeyPair::generate();
        let json = format!(
            r#"[{{"device_id":"dev-1","public_key":"{}"}}]"#,
            key_pair.public_key().to_hex()
        );
        let entries: Vec<RegistryEntry> = serde_json::from_str(&json).unwrap();
        let registry = InMemoryDeviceRegistry::from_entries(entries);

        let wire = TokenSigner::new(key_pair)
            .issue_wire(&Claims::new("temp=65", "dev-1", "n1", T))
            .unwrap();
        let verifier = TokenVerifier::new(registry, Default::default());

        assert!(verifier.verify_at(&wire, T).is_verified());
    }

    #[test]
    fn test_key_rotation() {
        let fleet = Fleet::provision(1);
        let old_wire = fleet.token(0, "temp=65", "n1", T);

        let rotated = TokenSigner::new(DeviceKeyPair::generate());
        fleet.registry.register(device_id(0), rotated.public_key());
        let new_wire = rotated
            .issue_wire(&Claims::new("temp=66", device_id(0), "n2", T))
            .unwrap();

        let verifier = fleet.verifier_at(T);
        assert_eq!(
            verifier.verify(&old_wire).reason(),
            Some(RejectionReason::InvalidSignature)
        );
        assert!(verifier.verify(&new_wire).is_verified());
    }

    #[test]
    fn test_revocation_takes_effect_immediately() {
        let fleet = Fleet::provision(1);
        let wire = fleet.token(0, "temp=65", "n1", T);
        let verifier = fleet.verifier_at(T);
        assert!(verifier.verify(&wire).is_verified());

        fleet.registry.revoke(&device_id(0));

        assert_eq!(
            verifier.verify(&wire).reason(),
            Some(RejectionReason::UnknownDevice)
        );
    }

    // =============================================================================
    // SERVICE
    // =============================================================================

    #[test]
    fn test_service_batch_mixed() {
        let fleet = Fleet::provision(3);
        let service = TokenVerificationService::from_verifier(fleet.verifier_at(T + 10));

        let wires = vec![
            fleet.token(0, "a", "n", T),
            fleet.token(1, "b", "n", T - 100),
            "x.y".to_string(),
            fleet.token(2, "c", "n", T + 40),
        ];

        let batch = service.verify_batch(&wires);

        let reasons: Vec<Option<RejectionReason>> =
            batch.results.iter().map(VerificationResult::reason).collect();
        assert_eq!(
            reasons,
            vec![
                None,
                Some(RejectionReason::StaleOrFutureTimestamp),
                Some(RejectionReason::MalformedToken),
                None,
            ]
        );
        assert_eq!(batch.verified_count, 2);
    }

    #[test]
    fn test_configured_window() {
        let fleet = Fleet::provision(1);
        let config = VerifierConfig {
            freshness_window_secs: 300,
            ..Default::default()
        };
        let service = TokenVerificationService::new(fleet.registry.clone(), &config).unwrap();
        let wire = fleet.token(0, "temp=65", "n1", T);

        assert!(service.verify_token_at(&wire, T + 300).is_verified());
        assert!(!service.verify_token_at(&wire, T + 301).is_verified());
    }
}
