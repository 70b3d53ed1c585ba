pub mod config;
pub mod done;
pub mod material;
pub mod overdue;
pub mod plan;
pub mod slot;
