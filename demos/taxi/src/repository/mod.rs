//! In-memory storage for the fleet records.
//!
//! Deleted records are kept but hidden, so ids are never reused.

mod car;
mod driver;
mod manufacturer;

pub use car::*;
pub use driver::*;
pub use manufacturer::*;

use std::collections::BTreeMap;

use crate::models::{Car, Driver, Entity, Manufacturer};

pub trait ManufacturerRepository: Send + Sync {
    fn create(&self, manufacturer: Manufacturer) -> Manufacturer;

    fn get(&self, id: u64) -> Option<Manufacturer>;

    fn get_all(&self) -> Vec<Manufacturer>;

    /// Replaces a stored manufacturer; `None` if it is missing or deleted.
    fn update(&self, manufacturer: Manufacturer) -> Option<Manufacturer>;

    fn delete(&self, id: u64) -> bool;
}

pub trait DriverRepository: Send + Sync {
    fn create(&self, driver: Driver) -> Driver;

    fn get(&self, id: u64) -> Option<Driver>;

    fn get_all(&self) -> Vec<Driver>;

    fn update(&self, driver: Driver) -> Option<Driver>;

    fn delete(&self, id: u64) -> bool;

    fn find_by_login(&self, login: &str) -> Option<Driver>;
}

pub trait CarRepository: Send + Sync {
    fn create(&self, car: Car) -> Car;

    fn get(&self, id: u64) -> Option<Car>;

    fn get_all(&self) -> Vec<Car>;

    fn update(&self, car: Car) -> Option<Car>;

    fn delete(&self, id: u64) -> bool;

    fn get_all_by_driver(&self, driver_id: u64) -> Vec<Car>;
}

struct Row<T> {
    value: T,
    deleted: bool,
}

/// Rows keyed by id, with soft deletion.
pub(crate) struct Table<T> {
    next_id: u64,
    rows: BTreeMap<u64, Row<T>>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

impl<T> Table<T>
where
    T: Entity,
{
    pub(crate) fn insert(&mut self, mut value: T) -> T {
        let id = self.next_id;
        self.next_id += 1;
        value.set_id(id);
        self.rows.insert(
            id,
            Row {
                value: value.clone(),
                deleted: false,
            },
        );
        tracing::debug!("Created {} {id}", T::NAME);
        value
    }

    pub(crate) fn get(&self, id: u64) -> Option<T> {
        self.rows
            .get(&id)
            .filter(|v| !v.deleted)
            .map(|v| v.value.clone())
    }

    pub(crate) fn all(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &T> {
        self.rows.values().filter(|v| !v.deleted).map(|v| &v.value)
    }

    pub(crate) fn update(&mut self, value: T) -> Option<T> {
        let row = self
            .rows
            .get_mut(&value.id()?)
            .filter(|v| !v.deleted)?;
        row.value = value.clone();
        Some(value)
    }

    pub(crate) fn delete(&mut self, id: u64) -> bool {
        match self.rows.get_mut(&id) {
            Some(row) if !row.deleted => {
                row.deleted = true;
                tracing::debug!("Deleted {} {id}", T::NAME);
                true
            }
            _ => false,
        }
    }
}
