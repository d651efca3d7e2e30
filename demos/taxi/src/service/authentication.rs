use std::sync::Arc;

use tracing::{info, warn};
use weave::injectable;

use super::{AuthenticationService, DriverService};
use crate::TaxiError;
use crate::models::Driver;

pub struct AuthenticationServiceImpl {
    drivers: Arc<dyn DriverService>,
}

#[injectable(service(dyn AuthenticationService))]
impl AuthenticationServiceImpl {
    #[factory]
    pub fn new(#[inject] drivers: Arc<dyn DriverService>) -> Self {
        Self { drivers }
    }
}

impl AuthenticationService for AuthenticationServiceImpl {
    fn login(&self, login: &str, password: &str) -> Result<Driver, TaxiError> {
        match self.drivers.find_by_login(login) {
            Some(driver) if driver.password == password => {
                info!("Driver {login} authenticated");
                Ok(driver)
            }
            _ => {
                warn!("Failed login attempt for {login}");
                Err(TaxiError::Authentication)
            }
        }
    }
}
