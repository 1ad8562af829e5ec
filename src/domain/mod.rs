pub mod forecast;
pub mod params;
pub mod snapshot;
pub mod terminal;
pub mod truck;
