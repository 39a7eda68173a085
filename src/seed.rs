//! Database seeding.
//!
//! Seeds are small units of bootstrap data registered on a [`Seeder`] and
//! run in registration order, typically right after migrations. Unlike
//! migrations, seed runs are not tracked; seeds should be written to be
//! re-runnable.

use crate::error::DbError;
use crate::executor::SqlExecutor;

/// One unit of seed data.
pub trait Seed: Send + Sync {
    /// Name used in progress logging.
    fn name(&self) -> &str;

    /// Insert the seed data.
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the inserts fail.
    fn run(&self, executor: &dyn SqlExecutor) -> Result<(), DbError>;
}

/// Registry of seeds, run in registration order.
///
/// # Example
///
/// ```ignore
/// let mut seeder = Seeder::new();
/// seeder.add(AdminAccount).add(DefaultRoles);
/// seeder.run(&executor)?;
/// ```
#[derive(Default)]
pub struct Seeder {
    seeds: Vec<Box<dyn Seed>>,
}

impl Seeder {
    /// Create an empty seeder.
    pub fn new() -> Self {
        Self { seeds: Vec::new() }
    }

    /// Register a seed.
    pub fn add(&mut self, seed: impl Seed + 'static) -> &mut Self {
        self.seeds.push(Box::new(seed));
        self
    }

    /// Run every registered seed against the executor.
    ///
    /// Stops at the first failure; seeds after it do not run.
    ///
    /// # Errors
    ///
    /// Returns the first seed's error verbatim.
    pub fn run(&self, executor: &dyn SqlExecutor) -> Result<usize, DbError> {
        let mut count = 0;
        for seed in &self.seeds {
            log::info!("Seeding {}", seed.name());
            seed.run(executor)?;
            count += 1;
        }
        Ok(count)
    }
}
