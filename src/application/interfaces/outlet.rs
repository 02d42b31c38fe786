use crate::error::AppError;
use crate::model::requests::Outlet;
use async_trait::async_trait;

#[async_trait]
/// Service for registering and reading merchant outlets
pub trait OutletService: Send + Sync {
    /// Creates the outlet `id`, or replaces it when it already exists
    ///
    /// Returns `None` when the server accepted the outlet with an empty body.
    async fn upsert_outlet(&self, id: &str, outlet: &Outlet)
    -> Result<Option<Outlet>, AppError>;

    /// Gets an outlet by id
    async fn get_outlet(&self, id: &str) -> Result<Outlet, AppError>;
}
