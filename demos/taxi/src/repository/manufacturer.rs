use parking_lot::Mutex;
use weave::Component;

use super::{ManufacturerRepository, Table};
use crate::models::Manufacturer;

#[derive(Component, Default)]
#[component(repository(dyn ManufacturerRepository))]
pub struct InMemoryManufacturerRepository {
    table: Mutex<Table<Manufacturer>>,
}

impl ManufacturerRepository for InMemoryManufacturerRepository {
    fn create(&self, manufacturer: Manufacturer) -> Manufacturer {
        self.table.lock().insert(manufacturer)
    }

    fn get(&self, id: u64) -> Option<Manufacturer> {
        self.table.lock().get(id)
    }

    fn get_all(&self) -> Vec<Manufacturer> {
        self.table.lock().all()
    }

    fn update(&self, manufacturer: Manufacturer) -> Option<Manufacturer> {
        self.table.lock().update(manufacturer)
    }

    fn delete(&self, id: u64) -> bool {
        self.table.lock().delete(id)
    }
}
