/// Handler state: the database pool, cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub pool: trackstat_db::DbPool,
}
