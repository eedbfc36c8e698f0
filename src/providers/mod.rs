//! External collaborator clients: geocoding, routing, weather, stations.

pub mod geocode;
pub mod routing;
pub mod stations;
pub mod weather;

pub use geocode::{GeocodeError, Geocoder, NominatimGeocoder};
pub use routing::{OsrmRouteProvider, RouteError, RouteProvider};
pub use stations::{DemoStationProvider, NrelStationClient, StationProvider};
pub use weather::{OpenWeatherClient, WeatherProvider};
