use std::{
    env,
    time::{SystemTime, UNIX_EPOCH},
};

use spaces::{BlockingClient, Config};

#[allow(clippy::result_large_err)]
fn main() -> Result<(), spaces::Error> {
    let bucket = match env::var("SPACES_TEST_BUCKET") {
        Ok(v) => v,
        Err(_) => {
            eprintln!("Set SPACES_TEST_BUCKET to a bucket you can write to.");
            return Ok(());
        }
    };

    let config = match Config::from_env() {
        Ok(v) => v,
        Err(err) => {
            eprintln!("Set SPACES_ACCESS_KEY_ID/SPACES_SECRET_ACCESS_KEY: {err}");
            return Ok(());
        }
    };

    let client = BlockingClient::builder(config).build()?;

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let key = format!("demos/put-get-{now}.txt");

    let put = client
        .objects()
        .put(&bucket, &key)
        .content_type("text/plain")
        .body_bytes(b"hello from spaces\n".to_vec())
        .send()?;
    println!("uploaded {key}: {}", put.status);

    let got = client.objects().get(&bucket, &key).send()?;
    println!(
        "downloaded {} bytes ({}, {})",
        got.body.len(),
        got.content_type.as_deref().unwrap_or("unknown type"),
        got.disposition
    );
    Ok(())
}
