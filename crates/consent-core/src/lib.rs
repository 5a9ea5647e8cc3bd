pub mod config;
pub mod controller;
pub mod decision;
pub mod error;
pub mod gate;
pub mod handle;
pub mod state;
pub mod store;
pub mod timer;

pub use config::ConsentConfig;
pub use controller::{ConsentController, Init, Outcome};
pub use decision::{Category, ConsentDecision};
pub use error::ConsentError;
pub use gate::AnalyticsGate;
pub use handle::{ConsentHandle, SubscriptionId};
pub use state::{ConsentSnapshot, ControllerState, Phase};
pub use store::ConsentStore;
pub use timer::{BannerTimer, TimerToken};
