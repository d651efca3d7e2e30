use std::sync::Arc;

use tracing::debug;
use weave::Component;

use super::{DriverService, stored_id};
use crate::TaxiError;
use crate::models::{Driver, Entity as _};
use crate::repository::DriverRepository;

#[derive(Component)]
#[component(service(dyn DriverService))]
pub struct DriverServiceImpl {
    #[inject]
    drivers: Arc<dyn DriverRepository>,
}

impl DriverService for DriverServiceImpl {
    fn create(&self, driver: Driver) -> Driver {
        debug!("Creating driver {}", driver.login);
        self.drivers.create(driver)
    }

    fn get(&self, id: u64) -> Result<Driver, TaxiError> {
        self.drivers.get(id).ok_or(TaxiError::NotFound {
            entity: Driver::NAME,
            id,
        })
    }

    fn get_all(&self) -> Vec<Driver> {
        self.drivers.get_all()
    }

    fn update(&self, driver: Driver) -> Result<Driver, TaxiError> {
        let id = stored_id(driver.id, Driver::NAME)?;
        self.drivers.update(driver).ok_or(TaxiError::NotFound {
            entity: Driver::NAME,
            id,
        })
    }

    fn delete(&self, id: u64) -> bool {
        self.drivers.delete(id)
    }

    fn find_by_login(&self, login: &str) -> Option<Driver> {
        self.drivers.find_by_login(login)
    }
}
