pub mod error;
pub mod periods;
pub mod prices;
pub mod submissions;
