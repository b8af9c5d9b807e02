pub mod geocode_result;
pub mod lat_lon;
pub mod solar_result;
