use aggreport::config::Config;
use mongodb::Client;
use rand::{Rng, distributions::Alphanumeric};

pub const TEST_URI_ENV: &str = "AGGREPORT_TEST_MONGODB_URI";

/// Throwaway database on the deployment named by `AGGREPORT_TEST_MONGODB_URI`.
pub struct TestDb {
    uri: String,
    pub dbname: String,
}

impl TestDb {
    pub fn provision_from_env() -> Option<Self> {
        let uri = std::env::var(TEST_URI_ENV).ok()?;
        // MongoDB creates databases lazily on first insert
        let dbname = format!("aggreport_test_{}", rand_suffix(8));
        Some(Self { uri, dbname })
    }

    pub fn config(&self) -> Config {
        let mut cfg = Config::default();
        cfg.mongodb_uri = self.uri.clone();
        cfg.database = self.dbname.clone();
        cfg.app_name = "aggreport-tests".into();
        cfg
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        // Ensure drop even if test panics. Use a dedicated thread + runtime so
        // we do not depend on any ambient tokio runtime still being alive.
        let uri = self.uri.clone();
        let dbname = self.dbname.clone();
        let _ = std::thread::spawn(move || {
            if let Ok(rt) = tokio::runtime::Builder::new_current_thread().enable_all().build() {
                rt.block_on(async move {
                    if let Ok(client) = Client::with_uri_str(&uri).await {
                        let _ = client.database(&dbname).drop().await;
                        client.shutdown().await;
                    }
                });
            }
        })
        .join();
    }
}

fn rand_suffix(n: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(n)
        .map(char::from)
        .collect::<String>()
        .to_lowercase()
}
