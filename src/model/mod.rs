pub mod allocation;
pub mod money;
pub mod period;
pub mod role;
pub mod sales;
pub mod settings;
pub mod team;
pub mod user;
