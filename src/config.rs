use std::env;

use crate::geolocation::parse_position;
use crate::map::{TileLayer, DEFAULT_TILE_URL};
use crate::models::Coords;
use crate::tracker::{TrackerSettings, DEFAULT_ZOOM, STORAGE_KEY};

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Position reported by geolocation. `None` means the lookup fails.
    pub home_position: Option<Coords>,
    pub map_zoom: u8,
    pub tile_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:mapty.db?mode=rwc".to_string()),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            home_position: env::var("HOME_POSITION")
                .ok()
                .and_then(|raw| parse_position(&raw)),
            map_zoom: env::var("MAP_ZOOM")
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(DEFAULT_ZOOM),
            tile_url: env::var("TILE_URL").unwrap_or_else(|_| DEFAULT_TILE_URL.to_string()),
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn tracker_settings(&self) -> TrackerSettings {
        TrackerSettings {
            zoom: self.map_zoom,
            tile_layer: TileLayer::new(self.tile_url.clone()),
            storage_key: STORAGE_KEY.to_string(),
        }
    }
}
