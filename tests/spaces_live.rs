#![allow(clippy::result_large_err)]

mod common;

use spaces::{BlockingClient, Error};

#[test]
fn live_put_then_get_roundtrip() -> Result<(), Error> {
    let Some(cfg) = common::load_config()? else {
        return Ok(());
    };

    let client = BlockingClient::builder(cfg.config).build()?;
    let key = common::unique_key("spaces-it/put-get-");

    let put = client
        .objects()
        .put(&cfg.bucket, &key)
        .content_type("text/plain")
        .body_bytes(&b"hello from spaces"[..])
        .send()?;
    assert!(put.status.is_success());

    let got = client.objects().get(&cfg.bucket, &key).send()?;
    assert_eq!(got.body.as_ref(), b"hello from spaces");
    assert_eq!(got.disposition, "inline");
    assert_eq!(got.content_type.as_deref(), Some("text/plain"));
    Ok(())
}

#[test]
fn live_base64_upload_is_stored_decoded() -> Result<(), Error> {
    let Some(cfg) = common::load_config()? else {
        return Ok(());
    };

    let client = BlockingClient::builder(cfg.config).build()?;
    let key = common::unique_key("spaces-it/base64-");

    client
        .objects()
        .put(&cfg.bucket, &key)
        .body_base64("aGVsbG8=")
        .send()?;

    let got = client
        .objects()
        .get(&cfg.bucket, &key)
        .disposition("attachment")
        .send()?;
    assert_eq!(got.body.as_ref(), b"hello");
    assert_eq!(got.disposition, "attachment");
    Ok(())
}

#[test]
fn live_missing_object_is_a_rejection() -> Result<(), Error> {
    let Some(cfg) = common::load_config()? else {
        return Ok(());
    };

    let client = BlockingClient::builder(cfg.config).build()?;
    let key = common::unique_key("spaces-it/missing-");

    match client.objects().get(&cfg.bucket, &key).send() {
        Err(err) => {
            assert!(err.is_rejection(), "unexpected error: {err:?}");
            Ok(())
        }
        Ok(out) => panic!("expected a rejection, got {:?}", out.status),
    }
}
