pub mod client;
pub mod config;
pub mod cooldown;
pub mod hero_list;
pub mod response;
pub mod store;
pub mod transport;
pub mod utils;

pub use client::OpenDota;
pub use config::Config;
pub use opendota_model::{HeroId, MatchId, Mode, RequestError};
