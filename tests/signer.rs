use {
    chrono::{DateTime, Duration, Utc},
    hmac_url_signer::{CanonicalUri, Keyring, Signer, SignerConfig, SignerError},
    http::uri::Uri,
    std::{sync::Arc, thread},
};

const API_KEY: &str = "api-key";

// base64("secret")
const SECRET: &str = "c2VjcmV0";

const PRODUCTS_URL: &str = "https://stg.api.ogq.me/cps/products?creatorId=567890";

// 2021-01-01T00:00:00Z
const SIGNED_AT: i64 = 1609459200;

fn signer() -> Signer {
    Signer::new(API_KEY, SECRET).expect("failed to create Signer")
}

fn timestamp(secs: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(secs, 0).expect("timestamp out of range")
}

fn uri(s: &str) -> Uri {
    s.parse().expect("failed to parse test URI")
}

fn signed_products_url() -> String {
    signer().sign_at(&uri(PRODUCTS_URL), timestamp(SIGNED_AT)).expect("failed to sign").to_string()
}

#[test_log::test]
fn round_trip() {
    let s = signer();
    for url in [
        PRODUCTS_URL,
        "https://example.com/",
        "https://example.com/a/b/c",
        "http://localhost:8080/items?page=2&size=20&sort=name",
        "https://example.com/search?q=hello%20world&tag=a&tag=b",
        "/origin/form?x=1",
    ] {
        let signed = s.sign_at(&uri(url), timestamp(SIGNED_AT)).unwrap();
        assert!(s.validate_at(&signed, timestamp(SIGNED_AT)), "round trip failed for {}", url);

        let signed = s.sign(&uri(url)).unwrap();
        assert!(s.validate(&signed), "round trip with current time failed for {}", url);
    }
}

#[test_log::test]
fn known_example() {
    let signed = signed_products_url();
    assert!(signed.starts_with(
        "https://stg.api.ogq.me/cps/products?creatorId=567890&createdAt=1609459200&apiKey=api-key&mac="
    ));
    let mac = signed.rsplit_once("&mac=").unwrap().1;
    assert_eq!(mac.len(), 64);
    assert!(signer().validate_at(&uri(&signed), timestamp(SIGNED_AT + 60)));
}

#[test_log::test]
fn tamper_sensitivity() {
    let s = signer();
    let now = timestamp(SIGNED_AT);
    let signed = signed_products_url();
    assert!(s.validate_at(&uri(&signed), now));

    let tampered = [
        signed.replace("creatorId=567890", "creatorId=567891"),
        signed.replace("creatorId=", "creatorid="),
        signed.replace("/cps/products", "/cps/product"),
        signed.replace("stg.api.ogq.me", "api.ogq.me"),
        signed.replace("https://", "http://"),
        signed.replace("createdAt=1609459200", "createdAt=1609459201"),
        signed.replace("apiKey=api-key", "apiKey=api-kez"),
        signed.replace("?creatorId=567890&", "?"),
        format!("{}&extra=1", signed),
    ];

    for url in tampered.iter() {
        assert_ne!(url, &signed);
        assert!(!s.validate_at(&uri(url), now), "tampered URL validated: {}", url);
    }

    // Flip each character of the MAC in turn.
    let (prefix, mac) = signed.rsplit_once("&mac=").unwrap();
    for i in 0..mac.len() {
        let mut bytes = mac.as_bytes().to_vec();
        bytes[i] = if bytes[i] == b'0' { b'1' } else { b'0' };
        let url = format!("{}&mac={}", prefix, String::from_utf8(bytes).unwrap());
        assert!(!s.validate_at(&uri(&url), now), "tampered MAC validated at position {}", i);
    }

    // Uppercase hex is a different string and is rejected.
    assert!(mac.bytes().any(|c| c.is_ascii_alphabetic()), "MAC has no hex letters: {}", mac);
    let url = format!("{}&mac={}", prefix, mac.to_ascii_uppercase());
    assert_ne!(url, signed);
    assert!(!s.validate_at(&uri(&url), now));
}

#[test_log::test]
fn tamper_sensitivity_of_scheme_case_and_empty_path() {
    let s = signer();
    let now = timestamp(SIGNED_AT);

    let signed = s.sign_str_at("https://example.com/a?x=1", now).unwrap();
    assert!(s.validate_str_at(&signed, now));
    for url in [signed.replacen("https://", "HTTPS://", 1), signed.replacen("https://", "HtTpS://", 1)] {
        assert!(!s.validate_str_at(&url, now), "scheme case change validated: {}", url);
    }

    let signed = s.sign_str_at("https://example.com?x=1", now).unwrap();
    assert!(signed.starts_with("https://example.com?x=1&createdAt="));
    assert!(s.validate_str_at(&signed, now));
    let with_slash = signed.replacen("example.com?", "example.com/?", 1);
    assert!(!s.validate_str_at(&with_slash, now), "added slash validated: {}", with_slash);

    let signed = s.sign_str_at("https://example.com/?x=1", now).unwrap();
    assert!(s.validate_str_at(&signed, now));
    let without_slash = signed.replacen("example.com/?", "example.com?", 1);
    assert!(!s.validate_str_at(&without_slash, now), "removed slash validated: {}", without_slash);

    // A parsed Uri compares the normalized form: lowercase scheme, "/" for an empty path.
    let signed = s.sign_at(&uri("HTTPS://example.com?x=1"), now).unwrap();
    assert!(signed.to_string().starts_with("https://example.com/?x=1&createdAt="));
    assert!(s.validate_at(&uri(&signed.to_string().replacen("https://", "HTTPS://", 1)), now));
}

#[test_log::test]
fn expiry() {
    let s = signer();
    let signed = uri(&signed_products_url());

    assert!(s.validate_at(&signed, timestamp(SIGNED_AT) + Duration::minutes(4)));
    assert!(!s.validate_at(&signed, timestamp(SIGNED_AT) + Duration::minutes(5)));
    assert!(!s.validate_at(&signed, timestamp(SIGNED_AT) + Duration::minutes(5) + Duration::seconds(1)));
    assert!(!s.validate_at(&signed, timestamp(SIGNED_AT) + Duration::hours(24)));
}

#[test_log::test]
fn not_yet_valid() {
    let s = signer();
    let now = timestamp(SIGNED_AT);

    let future = s.sign_at(&uri(PRODUCTS_URL), now + Duration::minutes(6)).unwrap();
    assert!(!s.validate_at(&future, now));

    let near_future = s.sign_at(&uri(PRODUCTS_URL), now + Duration::minutes(4)).unwrap();
    assert!(s.validate_at(&near_future, now));
}

#[test_log::test]
fn missing_parameters() {
    let s = signer();
    let now = timestamp(SIGNED_AT);
    let signed = signed_products_url();
    let (without_mac, _) = signed.rsplit_once("&mac=").unwrap();

    assert!(!s.validate_at(&uri(without_mac), now));
    assert!(!s.validate_at(&uri(PRODUCTS_URL), now));
    assert!(!s.validate_at(&uri("https://example.com/"), now));
    assert!(!s.validate_str("::::"));
}

#[test_log::test]
fn deterministic() {
    let a = signed_products_url();
    let b = signed_products_url();
    assert_eq!(a, b);

    let other_key = Signer::new(API_KEY, "b3RoZXI=").unwrap();
    let c = other_key.sign_at(&uri(PRODUCTS_URL), timestamp(SIGNED_AT)).unwrap().to_string();
    assert_ne!(a, c);
}

#[test_log::test]
fn canonical_form_is_stable() {
    let signed = uri(&signed_products_url());
    let canonical = CanonicalUri::from_uri(&signed);
    assert_eq!(canonical.to_string(), signed.to_string());
    assert_eq!(canonical.first("apiKey"), Some("api-key"));
    assert_eq!(canonical.first("createdAt"), Some("1609459200"));
    assert_eq!(
        canonical.without("mac").to_string(),
        "https://stg.api.ogq.me/cps/products?creatorId=567890&createdAt=1609459200&apiKey=api-key"
    );
}

#[test_log::test]
fn shared_across_threads() {
    let s = Arc::new(signer());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let s = Arc::clone(&s);
            thread::spawn(move || {
                let url = uri(&format!("https://example.com/items/{}", i));
                let signed = s.sign(&url).unwrap();
                s.validate(&signed)
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
}

#[test_log::test]
fn configuration() {
    let config = SignerConfig::builder().api_key(API_KEY).secret(SECRET).build().unwrap();
    let from_config = Signer::from_config(config).unwrap();
    let signed = uri(&signed_products_url());
    assert!(from_config.validate_at(&signed, timestamp(SIGNED_AT)));

    match Signer::new(API_KEY, "this is not base64") {
        Err(e @ SignerError::InvalidSecret(_)) => {
            assert!(e.to_string().starts_with("Secret is not valid base64"));
        }
        other => panic!("Expected InvalidSecret; got {:?}", other),
    }

    match SignerConfig::builder().secret(SECRET).build() {
        Err(SignerError::InvalidConfig(msg)) => {
            assert_eq!(msg, "Signer configuration is missing required field 'api_key'");
        }
        other => panic!("Expected InvalidConfig; got {:?}", other),
    }
}

#[test_log::test]
fn keyring() {
    let keyring: Keyring = vec![signer(), Signer::new("other-key", "b3RoZXI=").unwrap()].into_iter().collect();
    let now = timestamp(SIGNED_AT);

    assert!(keyring.validate_at(&uri(&signed_products_url()), now));

    let other = keyring.get("other-key").unwrap().sign_at(&uri(PRODUCTS_URL), now).unwrap();
    assert!(keyring.validate_at(&other, now));
    assert!(!signer().validate_at(&other, now));

    let relabelled = other.to_string().replace("apiKey=other-key", "apiKey=api-key");
    assert!(!keyring.validate_at(&uri(&relabelled), now));
}
