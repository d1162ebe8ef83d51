pub mod elevation;
pub mod maps;
pub mod route_generator;
