pub mod allocation;
pub mod dashboard;
pub mod sales;
pub mod settings;
