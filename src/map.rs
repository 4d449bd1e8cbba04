//! Map capability consumed by the tracker.
//!
//! [`MapScene`] records every call as plain data. The page serializes it to
//! JSON and Leaflet replays it in the browser.

use serde::Serialize;

use crate::models::Coords;

pub const DEFAULT_TILE_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const DEFAULT_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileLayer {
    pub url: String,
    pub attribution: String,
}

impl TileLayer {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            attribution: DEFAULT_ATTRIBUTION.to_string(),
        }
    }
}

impl Default for TileLayer {
    fn default() -> Self {
        Self::new(DEFAULT_TILE_URL)
    }
}

/// Leaflet popup options, serialized with Leaflet's option names.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupOptions {
    pub max_width: u32,
    pub min_width: u32,
    pub auto_close: bool,
    pub close_on_click: bool,
    pub class_name: String,
}

impl PopupOptions {
    /// Sticky popup styled by `class_name`.
    pub fn pinned(class_name: impl Into<String>) -> Self {
        Self {
            max_width: 250,
            min_width: 100,
            auto_close: false,
            close_on_click: false,
            class_name: class_name.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PanOptions {
    pub duration: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewOptions {
    pub animate: bool,
    pub pan: PanOptions,
}

impl ViewOptions {
    pub fn instant() -> Self {
        Self {
            animate: false,
            pan: PanOptions { duration: 0.0 },
        }
    }

    pub fn animated(duration: f64) -> Self {
        Self {
            animate: true,
            pan: PanOptions { duration },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MarkerId(pub usize);

pub trait MapCapability {
    fn initialize(&mut self, center: Coords, zoom: u8);
    fn add_base_layer(&mut self, layer: TileLayer);
    fn add_marker(&mut self, coords: Coords) -> MarkerId;
    fn bind_popup(&mut self, marker: MarkerId, options: PopupOptions, content: String);
    fn set_view(&mut self, center: Coords, zoom: u8, options: ViewOptions);
    /// Drop every layer and return to the uninitialized state.
    fn reset(&mut self);
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Popup {
    pub options: PopupOptions,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub coords: Coords,
    pub popup: Option<Popup>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct View {
    pub center: Coords,
    pub zoom: u8,
    pub options: ViewOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapScene {
    view: Option<View>,
    base_layer: Option<TileLayer>,
    markers: Vec<Marker>,
}

impl MapScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initialized(&self) -> bool {
        self.view.is_some()
    }

    pub fn view(&self) -> Option<&View> {
        self.view.as_ref()
    }

    pub fn base_layer(&self) -> Option<&TileLayer> {
        self.base_layer.as_ref()
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }
}

impl MapCapability for MapScene {
    fn initialize(&mut self, center: Coords, zoom: u8) {
        self.view = Some(View {
            center,
            zoom,
            options: ViewOptions::instant(),
        });
    }

    fn add_base_layer(&mut self, layer: TileLayer) {
        self.base_layer = Some(layer);
    }

    fn add_marker(&mut self, coords: Coords) -> MarkerId {
        self.markers.push(Marker {
            coords,
            popup: None,
        });
        MarkerId(self.markers.len() - 1)
    }

    fn bind_popup(&mut self, marker: MarkerId, options: PopupOptions, content: String) {
        match self.markers.get_mut(marker.0) {
            Some(m) => m.popup = Some(Popup { options, content }),
            None => tracing::warn!("Popup bound to unknown marker {}", marker.0),
        }
    }

    fn set_view(&mut self, center: Coords, zoom: u8, options: ViewOptions) {
        self.view = Some(View {
            center,
            zoom,
            options,
        });
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}
