use parking_lot::Mutex;
use weave::Component;

use super::{CarRepository, Table};
use crate::models::Car;

#[derive(Component, Default)]
#[component(repository(dyn CarRepository))]
pub struct InMemoryCarRepository {
    table: Mutex<Table<Car>>,
}

impl CarRepository for InMemoryCarRepository {
    fn create(&self, car: Car) -> Car {
        self.table.lock().insert(car)
    }

    fn get(&self, id: u64) -> Option<Car> {
        self.table.lock().get(id)
    }

    fn get_all(&self) -> Vec<Car> {
        self.table.lock().all()
    }

    fn update(&self, car: Car) -> Option<Car> {
        self.table.lock().update(car)
    }

    fn delete(&self, id: u64) -> bool {
        self.table.lock().delete(id)
    }

    fn get_all_by_driver(&self, driver_id: u64) -> Vec<Car> {
        self.table
            .lock()
            .iter()
            .filter(|v| v.has_driver(driver_id))
            .cloned()
            .collect()
    }
}
