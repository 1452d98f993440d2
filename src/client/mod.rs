mod blocking_client;

pub use blocking_client::{BlockingClient, BlockingClientBuilder};
