use std::{
    env,
    sync::atomic::{AtomicUsize, Ordering},
    time::{SystemTime, UNIX_EPOCH},
};

use spaces::{Config, Error};

static KEY_COUNTER: AtomicUsize = AtomicUsize::new(0);

pub(crate) struct TestConfig {
    pub(crate) config: Config,
    pub(crate) bucket: String,
}

/// Live tests run only when a bucket and credentials are provided.
pub(crate) fn load_config() -> Result<Option<TestConfig>, Error> {
    let Ok(bucket) = env::var("SPACES_TEST_BUCKET") else {
        return Ok(None);
    };

    let Ok(config) = Config::from_env() else {
        return Ok(None);
    };

    Ok(Some(TestConfig { config, bucket }))
}

pub(crate) fn unique_key(prefix: &str) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let n = KEY_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}{now}-{n}.txt")
}
