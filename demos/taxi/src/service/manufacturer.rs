use std::sync::Arc;

use tracing::debug;
use weave::Component;

use super::{ManufacturerService, stored_id};
use crate::TaxiError;
use crate::models::{Entity as _, Manufacturer};
use crate::repository::ManufacturerRepository;

#[derive(Component)]
#[component(service(dyn ManufacturerService))]
pub struct ManufacturerServiceImpl {
    #[inject]
    manufacturers: Arc<dyn ManufacturerRepository>,
}

impl ManufacturerService for ManufacturerServiceImpl {
    fn create(&self, manufacturer: Manufacturer) -> Manufacturer {
        debug!("Creating manufacturer {}", manufacturer.name);
        self.manufacturers.create(manufacturer)
    }

    fn get(&self, id: u64) -> Result<Manufacturer, TaxiError> {
        self.manufacturers.get(id).ok_or(TaxiError::NotFound {
            entity: Manufacturer::NAME,
            id,
        })
    }

    fn get_all(&self) -> Vec<Manufacturer> {
        self.manufacturers.get_all()
    }

    fn update(&self, manufacturer: Manufacturer) -> Result<Manufacturer, TaxiError> {
        let id = stored_id(manufacturer.id, Manufacturer::NAME)?;
        self.manufacturers
            .update(manufacturer)
            .ok_or(TaxiError::NotFound {
                entity: Manufacturer::NAME,
                id,
            })
    }

    fn delete(&self, id: u64) -> bool {
        self.manufacturers.delete(id)
    }
}
