/// Order service interface
pub mod order;
/// Outlet service interface
pub mod outlet;

pub use order::OrderService;
pub use outlet::OutletService;
