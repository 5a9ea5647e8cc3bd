use anyhow::{Context, Result};
use consent_core::{ConsentConfig, ConsentController, ConsentHandle, Init, TimerToken};
use consent_store::{FileStorage, KeyValueConsentStore};
use std::env;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

const STORE_DIR: &str = ".consent";

pub type Store = KeyValueConsentStore<FileStorage>;
pub type Handle = ConsentHandle<Store, fn(bool)>;

/// Global flags shared by every command.
pub struct Options {
    pub store: Option<PathBuf>,
    pub app_id: Option<String>,
}

impl Options {
    /// Resolve the deployment config from flags, then `CONSENT_APP_ID` and
    /// `CONSENT_BANNER_DELAY_MS`.
    pub fn config(&self) -> Result<ConsentConfig> {
        let mut config = match self.app_id.clone().or_else(|| env::var("CONSENT_APP_ID").ok()) {
            Some(app_id) => ConsentConfig::new(app_id)?,
            None => ConsentConfig::default(),
        };
        if let Ok(raw) = env::var("CONSENT_BANNER_DELAY_MS") {
            let ms: u64 = raw
                .trim()
                .parse()
                .context(format!("invalid CONSENT_BANNER_DELAY_MS '{}'", raw))?;
            config = config.with_banner_delay(Duration::from_millis(ms));
        }
        Ok(config)
    }

    pub fn store_dir(&self) -> Result<PathBuf> {
        match &self.store {
            Some(dir) => Ok(dir.clone()),
            None => Ok(env::current_dir()
                .context("failed to get current directory")?
                .join(STORE_DIR)),
        }
    }

    pub fn open_store(&self) -> Result<Store> {
        let config = self.config()?;
        Ok(KeyValueConsentStore::new(
            FileStorage::new(self.store_dir()?),
            &config,
        ))
    }
}

/// Stand-in for the analytics script loader.
fn analytics_gate(analytics: bool) {
    if analytics {
        tracing::info!("analytics scripts enabled");
    } else {
        tracing::info!("analytics scripts blocked");
    }
}

/// One page visit: a controller loaded from the store, plus the banner
/// timer token when no decision was found.
pub struct Session {
    pub handle: Handle,
    banner_delay: Duration,
    pending: Option<TimerToken>,
}

impl Session {
    pub fn open(opts: &Options) -> Result<Self> {
        let config = opts.config()?;
        let store = opts.open_store()?;
        let controller = ConsentController::new(store, analytics_gate as fn(bool));
        let handle = ConsentHandle::new(controller);
        handle.subscribe(|snapshot| {
            tracing::debug!(
                phase = %snapshot.phase,
                pending_analytics = snapshot.pending_analytics,
                "view updated"
            );
        });

        let pending = match handle.init() {
            Init::BannerPending(token) => Some(token),
            _ => None,
        };
        Ok(Self {
            handle,
            banner_delay: config.banner_delay,
            pending,
        })
    }

    /// Let the banner delay elapse, as a visitor who does nothing would.
    pub fn wait_for_banner(&mut self) {
        if let Some(token) = self.pending.take() {
            thread::sleep(self.banner_delay);
            self.handle.banner_timer_fired(token);
        }
    }
}
