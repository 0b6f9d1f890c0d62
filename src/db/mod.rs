mod pool;
mod seed;

pub use pool::create_pool;
pub use seed::seed_admin;
