//! Key source integration tests.

#[cfg(test)]
mod tests {
    use gcsign_auth::{Outcome, SigningScheme};
    use gcsign_core::{MessageContext, Properties};

    use crate::{
        KEY_PASSWORD, PKCS1_AES_KEY, PKCS8_ENCRYPTED_KEY, PKCS8_KEY, run, service_account_json,
    };

    fn raw_pem_properties(pem: &str) -> Properties {
        Properties::new()
            .with("verb", "GET")
            .with("resource", "/foo/bar")
            .with("expires-in", "10m")
            .with("access-id", "legacy@example.com")
            .with("private-key", pem)
    }

    #[test]
    fn test_should_sign_with_every_encrypted_key_format() {
        for pem in [PKCS1_AES_KEY, PKCS8_ENCRYPTED_KEY] {
            let props = raw_pem_properties(pem).with("private-key-password", KEY_PASSWORD);
            let (outcome, ctx) = run(SigningScheme::V4, props);
            assert_eq!(outcome, Outcome::Success, "{:?}", ctx.get_variable("sign_error"));
            assert!(
                ctx.get_variable("sign_canonical_query_string")
                    .unwrap()
                    .contains("X-Goog-Credential=legacy%40example.com%2F")
            );
        }
    }

    #[test]
    fn test_should_abort_on_wrong_password() {
        let props = raw_pem_properties(PKCS8_ENCRYPTED_KEY).with("private-key-password", "nope");
        let (outcome, ctx) = run(SigningScheme::V4, props);
        assert_eq!(outcome, Outcome::Abort);
        assert_eq!(
            ctx.get_variable("sign_error").as_deref(),
            Some("unknown object type when decoding private key")
        );
        assert!(
            ctx.get_variable("sign_stacktrace")
                .unwrap()
                .contains("Caused by:")
        );
    }

    #[test]
    fn test_should_accept_indented_pem() {
        let indented: String = PKCS8_KEY
            .lines()
            .map(|line| format!("    {line}\n"))
            .collect();
        let (outcome, _) = run(SigningScheme::V4, raw_pem_properties(&indented));
        assert_eq!(outcome, Outcome::Success);
    }

    #[test]
    fn test_should_prefer_service_account_over_raw_pem() {
        let props = raw_pem_properties("garbage")
            .with("service-account-key", service_account_json(PKCS8_KEY));
        let (outcome, ctx) = run(SigningScheme::V4, props);
        assert_eq!(outcome, Outcome::Success);
        assert_eq!(
            ctx.get_variable("sign_accessid").as_deref(),
            Some(crate::CLIENT_EMAIL)
        );
    }

    #[test]
    fn test_should_require_access_id_for_raw_pem() {
        let props = Properties::new()
            .with("verb", "GET")
            .with("resource", "/foo/bar")
            .with("expires-in", "10m")
            .with("private-key", PKCS8_KEY);
        let (outcome, ctx) = run(SigningScheme::V4, props);
        assert_eq!(outcome, Outcome::Abort);
        assert_eq!(
            ctx.get_variable("sign_error").as_deref(),
            Some("access-id resolves to an empty string")
        );
    }
}
