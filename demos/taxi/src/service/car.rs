use std::sync::Arc;

use tracing::debug;
use weave::Component;

use super::{CarService, stored_id};
use crate::TaxiError;
use crate::models::{Car, Driver, Entity as _};
use crate::repository::CarRepository;

#[derive(Component)]
#[component(service(dyn CarService))]
pub struct CarServiceImpl {
    #[inject]
    cars: Arc<dyn CarRepository>,
}

impl CarService for CarServiceImpl {
    fn create(&self, car: Car) -> Car {
        debug!("Creating car {}", car.model);
        self.cars.create(car)
    }

    fn get(&self, id: u64) -> Result<Car, TaxiError> {
        self.cars.get(id).ok_or(TaxiError::NotFound {
            entity: Car::NAME,
            id,
        })
    }

    fn get_all(&self) -> Vec<Car> {
        self.cars.get_all()
    }

    fn update(&self, car: Car) -> Result<Car, TaxiError> {
        let id = stored_id(car.id, Car::NAME)?;
        self.cars.update(car).ok_or(TaxiError::NotFound {
            entity: Car::NAME,
            id,
        })
    }

    fn delete(&self, id: u64) -> bool {
        self.cars.delete(id)
    }

    fn add_driver_to_car(&self, driver: &Driver, car: &mut Car) -> Result<(), TaxiError> {
        let driver_id = stored_id(driver.id, Driver::NAME)?;
        if !car.has_driver(driver_id) {
            car.drivers.push(driver.clone());
        }
        debug!("Driver {driver_id} assigned to car {:?}", car.id);
        self.update(car.clone()).map(|_| ())
    }

    fn remove_driver_from_car(&self, driver: &Driver, car: &mut Car) -> Result<(), TaxiError> {
        let driver_id = stored_id(driver.id, Driver::NAME)?;
        car.drivers.retain(|v| v.id != Some(driver_id));
        debug!("Driver {driver_id} removed from car {:?}", car.id);
        self.update(car.clone()).map(|_| ())
    }

    fn get_all_by_driver(&self, driver_id: u64) -> Vec<Car> {
        self.cars.get_all_by_driver(driver_id)
    }
}
