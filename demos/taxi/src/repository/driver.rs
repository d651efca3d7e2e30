use parking_lot::Mutex;
use weave::Component;

use super::{DriverRepository, Table};
use crate::models::Driver;

#[derive(Component, Default)]
#[component(repository(dyn DriverRepository))]
pub struct InMemoryDriverRepository {
    table: Mutex<Table<Driver>>,
}

impl DriverRepository for InMemoryDriverRepository {
    fn create(&self, driver: Driver) -> Driver {
        self.table.lock().insert(driver)
    }

    fn get(&self, id: u64) -> Option<Driver> {
        self.table.lock().get(id)
    }

    fn get_all(&self) -> Vec<Driver> {
        self.table.lock().all()
    }

    fn update(&self, driver: Driver) -> Option<Driver> {
        self.table.lock().update(driver)
    }

    fn delete(&self, id: u64) -> bool {
        self.table.lock().delete(id)
    }

    fn find_by_login(&self, login: &str) -> Option<Driver> {
        self.table
            .lock()
            .iter()
            .find(|v| v.login == login)
            .cloned()
    }
}
