pub mod geo;
pub mod station;
pub mod trip;
pub mod vehicle;
pub mod weather;

pub use geo::*;
pub use station::*;
pub use trip::*;
pub use vehicle::*;
pub use weather::*;
