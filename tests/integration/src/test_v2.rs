//! V2 signed URL integration tests.

#[cfg(test)]
mod tests {
    use gcsign_auth::{Outcome, SigningScheme};
    use gcsign_core::{InMemoryContext, MessageContext, Properties};

    use crate::{CLIENT_EMAIL, PKCS8_KEY, fixed_now, run, run_at, service_account_json};

    fn properties() -> Properties {
        Properties::new()
            .with("verb", "GET")
            .with("resource", "/foo/bar/bam")
            .with("expires-in", "1m")
            .with("service-account-key", service_account_json(PKCS8_KEY))
    }

    #[test]
    fn test_should_sign_v2_url_with_service_account() {
        let (outcome, ctx) = run(SigningScheme::V2, properties());
        assert_eq!(outcome, Outcome::Success);

        assert_eq!(ctx.get_variable("sign_duration").as_deref(), Some("60"));
        assert_eq!(ctx.get_variable("sign_accessid").as_deref(), Some(CLIENT_EMAIL));
        assert!(!ctx.get_variable("sign_signature").unwrap().is_empty());

        let url = ctx.get_variable("sign_signedurl").unwrap();
        assert!(url.starts_with("https://storage.googleapis.com/foo/bar/bam?GoogleAccessId="));
        assert!(url.contains("/foo/bar/bam"));
        assert_eq!(ctx.get_variable("sign_error"), None);
    }

    #[test]
    fn test_should_use_access_id_override() {
        let props = properties().with("access-id", "someone-else@example.com");
        let (outcome, ctx) = run(SigningScheme::V2, props);
        assert_eq!(outcome, Outcome::Success);
        assert_eq!(
            ctx.get_variable("sign_accessid").as_deref(),
            Some("someone-else@example.com")
        );
        assert!(
            ctx.get_variable("sign_signedurl")
                .unwrap()
                .contains("GoogleAccessId=someone-else@example.com&")
        );
    }

    #[test]
    fn test_should_expose_signing_string_and_both_signature_forms() {
        let props = properties()
            .with("content-type", "image/png")
            .with("content-md5", "rL0Y20zC+Fzt72VPzMSk2A==");
        let (outcome, ctx) = run_at(SigningScheme::V2, props, InMemoryContext::new(), fixed_now());
        assert_eq!(outcome, Outcome::Success);

        assert_eq!(
            ctx.get_variable("sign_signing_string").as_deref(),
            Some("GET\nrL0Y20zC+Fzt72VPzMSk2A==\nimage/png\n1768472490\n/foo/bar/bam")
        );
        let unencoded = ctx.get_variable("sign_signature_unencoded").unwrap();
        let encoded = ctx.get_variable("sign_signature").unwrap();
        assert_eq!(unencoded.len(), 344);
        assert!(!encoded.contains('+') && !encoded.contains('/') && !encoded.contains('='));
    }

    #[test]
    fn test_should_derive_resource_from_context_bucket_and_object() {
        let props = Properties::new()
            .with("verb", "PUT")
            .with("bucket", "{flow.bucket}")
            .with("object", "{flow.object}")
            .with("expiry", "1768480000")
            .with("service-account-key", service_account_json(PKCS8_KEY));
        let ctx: InMemoryContext = [("flow.bucket", "b"), ("flow.object", "o")]
            .into_iter()
            .collect();
        let (outcome, ctx) = run_at(SigningScheme::V2, props, ctx, fixed_now());
        assert_eq!(outcome, Outcome::Success);
        assert_eq!(ctx.get_variable("sign_resource").as_deref(), Some("/b/o"));
        assert_eq!(ctx.get_variable("sign_expiration").as_deref(), Some("1768480000"));
        assert_eq!(ctx.get_variable("sign_duration").as_deref(), Some("7570"));
    }

    #[test]
    fn test_should_allow_long_lifetimes_for_v2() {
        let props = properties().with("expires-in", "30d");
        let (outcome, _) = run(SigningScheme::V2, props);
        assert_eq!(outcome, Outcome::Success);
    }

    #[test]
    fn test_should_sign_with_raw_pem_and_access_id() {
        let props = Properties::new()
            .with("verb", "GET")
            .with("resource", "/foo/bar/bam")
            .with("expires-in", "1m")
            .with("access-id", "legacy@example.com")
            .with("private-key", PKCS8_KEY);
        let (outcome, ctx) = run(SigningScheme::V2, props);
        assert_eq!(outcome, Outcome::Success);
        assert_eq!(
            ctx.get_variable("sign_accessid").as_deref(),
            Some("legacy@example.com")
        );
    }

    #[test]
    fn test_should_abort_without_expiry() {
        let props = Properties::new()
            .with("verb", "GET")
            .with("resource", "/foo/bar/bam")
            .with("service-account-key", service_account_json(PKCS8_KEY));
        let (outcome, ctx) = run(SigningScheme::V2, props);
        assert_eq!(outcome, Outcome::Abort);
        assert_eq!(
            ctx.get_variable("sign_exception").as_deref(),
            Some("ConfigurationError: the configuration must specify one of expiry or expires-in")
        );
        assert_eq!(ctx.get_variable("sign_stacktrace"), None);
        assert_eq!(ctx.get_variable("sign_signedurl"), None);
    }
}
