pub mod branding;
pub mod config;
pub mod contract;
pub mod engine;
pub mod error;
pub mod espn_feed;
pub mod extraction;
pub mod generative;
pub mod http_client;
pub mod json_repair;
pub mod league;
pub mod milb_feed;
pub mod model;
pub mod nhl_feed;
pub mod normalize;
pub mod phonetics;
pub mod reconcile;
pub mod registry;
pub mod registry_data;
pub mod resolver;
pub mod roster_feed;
pub mod store;
pub mod tier;
pub mod usage;
