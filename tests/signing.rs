use spaces::{
    Config, Credentials, EMPTY_PAYLOAD_SHA256, Error, Region, RequestDescriptor, Signable as _,
    SignedHeader, SignedHeaders, SignedRequest, Signer,
};
use time::{OffsetDateTime, macros::datetime};

const NEW_YEAR: OffsetDateTime = datetime!(2024-01-01 00:00:00 UTC);

const GOLDEN_PUT_AUTHORIZATION: &str = "AWS4-HMAC-SHA256 \
    Credential=AKIDEXAMPLE/20240101/nyc3/s3/aws4_request, \
    SignedHeaders=content-length;content-type;host;x-amz-content-sha256;x-amz-date, \
    Signature=b566e7208c19959712a7c0abea1676bfbd07f3f4830bbb5c19414d62684e3da5";

fn signer() -> Result<Signer, Error> {
    let creds = Credentials::new("AKIDEXAMPLE", "secret")?;
    Ok(Signer::new(Config::new().credentials(creds)))
}

fn hello_put() -> Result<RequestDescriptor, Error> {
    Ok(RequestDescriptor::put("mybucket", "/test.txt")?
        .with_payload(&b"hello"[..])
        .with_content_type("text/plain"))
}

fn sign(desc: &RequestDescriptor) -> Result<SignedRequest, Error> {
    signer()?.sign(desc, NEW_YEAR)
}

#[test]
fn golden_put_authorization_is_stable() -> Result<(), Error> {
    let signed = sign(&hello_put()?)?;
    assert_eq!(signed.authorization(), GOLDEN_PUT_AUTHORIZATION);
    assert_eq!(
        signed.get("x-amz-content-sha256"),
        Some("2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824")
    );
    Ok(())
}

#[test]
fn signing_is_deterministic() -> Result<(), Error> {
    let desc = hello_put()?;
    assert_eq!(sign(&desc)?, sign(&desc)?);
    Ok(())
}

#[test]
fn payload_change_moves_hash_and_signature_only() -> Result<(), Error> {
    let original = sign(&hello_put()?)?;
    let changed = sign(&hello_put()?.with_payload(&b"hellp"[..]))?;

    assert_ne!(
        original.get("x-amz-content-sha256"),
        changed.get("x-amz-content-sha256")
    );
    assert_ne!(original.authorization(), changed.authorization());
    assert_eq!(original.get("host"), changed.get("host"));
    assert_eq!(original.get("content-length"), changed.get("content-length"));
    Ok(())
}

#[test]
fn region_change_moves_host_scope_and_signature() -> Result<(), Error> {
    let original = sign(&hello_put()?)?;
    let moved = sign(&hello_put()?.with_region(Region::new("ams3")?))?;

    assert_eq!(moved.get("host"), Some("mybucket.ams3.digitaloceanspaces.com"));
    assert!(
        moved
            .authorization()
            .contains("Credential=AKIDEXAMPLE/20240101/ams3/s3/aws4_request")
    );
    assert!(moved.authorization().ends_with(
        "Signature=c5dff3a09002c2e4454295fe98c16a337c0540dc7a97d47138840b910f13a75a"
    ));
    assert_ne!(original.authorization(), moved.authorization());
    assert_eq!(
        original.get("x-amz-content-sha256"),
        moved.get("x-amz-content-sha256")
    );
    Ok(())
}

#[test]
fn configured_default_region_is_used_when_request_names_none() -> Result<(), Error> {
    let creds = Credentials::new("AKIDEXAMPLE", "secret")?;
    let config = Config::new()
        .credentials(creds)
        .default_region(Region::new("ams3")?);
    let signed = Signer::new(config).sign(&hello_put()?, NEW_YEAR)?;
    assert_eq!(signed.get("host"), Some("mybucket.ams3.digitaloceanspaces.com"));
    Ok(())
}

#[test]
fn host_only_signing_does_not_leak_other_headers() -> Result<(), Error> {
    let desc = hello_put()?.with_headers_to_sign(SignedHeaders::new([SignedHeader::Host]));
    let signed = sign(&desc)?;

    let names = signed.iter().map(|(name, _)| name).collect::<Vec<_>>();
    assert_eq!(names, ["host", "Authorization"]);
    assert_eq!(signed.len(), 2);
    assert_eq!(signed.get("x-amz-date"), None);
    assert_eq!(
        signed.authorization(),
        "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20240101/nyc3/s3/aws4_request, \
         SignedHeaders=host, \
         Signature=ea8fcbae7e8af58e4f376eb8a0f3d7abdb6ad3b1d3fb8b82ca70cccfb6d8f40e"
    );
    Ok(())
}

#[test]
fn leading_slash_is_part_of_the_object_key() -> Result<(), Error> {
    let rooted = hello_put()?;
    let bare = RequestDescriptor::put("mybucket", "test.txt")?
        .with_payload(&b"hello"[..])
        .with_content_type("text/plain");

    assert_eq!(rooted.path(), "/test.txt");
    assert_eq!(bare.path(), "test.txt");
    assert_ne!(sign(&rooted)?.authorization(), sign(&bare)?.authorization());
    Ok(())
}

#[test]
fn dot_segments_are_rejected_before_signing() {
    let err = RequestDescriptor::get("mybucket", "a/../b.txt").unwrap_err();
    assert!(matches!(err, Error::InvalidConfig { .. }), "{err:?}");
}

#[test]
fn empty_payload_uses_empty_string_digest() -> Result<(), Error> {
    let desc = RequestDescriptor::get("mybucket", "test.txt")?;
    let signed = sign(&desc)?;

    assert_eq!(signed.get("x-amz-content-sha256"), Some(EMPTY_PAYLOAD_SHA256));
    assert!(signed.authorization().ends_with(
        "Signature=ac1d465ed9b5dd8d005e207b3627c998694a37ee0db0553848fe753b5be4a661"
    ));
    Ok(())
}

#[test]
fn non_utc_timestamps_are_normalized() -> Result<(), Error> {
    let desc = hello_put()?;
    let shifted = datetime!(2024-01-01 05:30:00 +05:30);
    assert_eq!(signer()?.sign(&desc, shifted)?, sign(&desc)?);
    Ok(())
}

#[test]
fn unset_credentials_are_a_configuration_error() -> Result<(), Error> {
    let err = Signer::new(Config::default())
        .sign(&hello_put()?, NEW_YEAR)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidConfig { .. }));

    let blank = Credentials {
        access_key_id: "AKIDEXAMPLE".to_string(),
        secret_access_key: String::new(),
    };
    let err = Signer::new(Config::new().credentials(blank))
        .sign(&hello_put()?, NEW_YEAR)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidConfig { .. }));
    Ok(())
}

#[test]
fn concurrent_signing_matches_sequential() -> Result<(), Error> {
    let signer = signer()?;
    let desc = hello_put()?;

    let results = std::thread::scope(|s| {
        let handles = (0..8)
            .map(|_| s.spawn(|| signer.sign(&desc, NEW_YEAR)))
            .collect::<Vec<_>>();
        handles
            .into_iter()
            .map(|h| h.join().expect("signing thread panicked"))
            .collect::<Result<Vec<_>, Error>>()
    })?;

    for signed in results {
        assert_eq!(signed.authorization(), GOLDEN_PUT_AUTHORIZATION);
    }
    Ok(())
}
