mod authentication;
mod car;
mod driver;
mod manufacturer;

pub use authentication::*;
pub use car::*;
pub use driver::*;
pub use manufacturer::*;

use crate::TaxiError;
use crate::models::{Car, Driver, Manufacturer};

pub trait ManufacturerService: Send + Sync {
    fn create(&self, manufacturer: Manufacturer) -> Manufacturer;

    fn get(&self, id: u64) -> Result<Manufacturer, TaxiError>;

    fn get_all(&self) -> Vec<Manufacturer>;

    fn update(&self, manufacturer: Manufacturer) -> Result<Manufacturer, TaxiError>;

    fn delete(&self, id: u64) -> bool;
}

pub trait DriverService: Send + Sync {
    fn create(&self, driver: Driver) -> Driver;

    fn get(&self, id: u64) -> Result<Driver, TaxiError>;

    fn get_all(&self) -> Vec<Driver>;

    fn update(&self, driver: Driver) -> Result<Driver, TaxiError>;

    fn delete(&self, id: u64) -> bool;

    fn find_by_login(&self, login: &str) -> Option<Driver>;
}

pub trait CarService: Send + Sync {
    fn create(&self, car: Car) -> Car;

    fn get(&self, id: u64) -> Result<Car, TaxiError>;

    fn get_all(&self) -> Vec<Car>;

    fn update(&self, car: Car) -> Result<Car, TaxiError>;

    fn delete(&self, id: u64) -> bool;

    /// Assigns `driver` to `car` and stores the car.
    fn add_driver_to_car(&self, driver: &Driver, car: &mut Car) -> Result<(), TaxiError>;

    /// Unassigns `driver` from `car` and stores the car.
    fn remove_driver_from_car(&self, driver: &Driver, car: &mut Car) -> Result<(), TaxiError>;

    fn get_all_by_driver(&self, driver_id: u64) -> Vec<Car>;
}

pub trait AuthenticationService: Send + Sync {
    /// Returns the driver with `login` if `password` matches.
    fn login(&self, login: &str, password: &str) -> Result<Driver, TaxiError>;
}

fn stored_id(id: Option<u64>, entity: &'static str) -> Result<u64, TaxiError> {
    id.ok_or(TaxiError::Unsaved { entity })
}
