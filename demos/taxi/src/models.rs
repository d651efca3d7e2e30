use serde::Serialize;

/// Records stored by the repositories.
pub trait Entity: Clone {
    const NAME: &'static str;

    fn id(&self) -> Option<u64>;

    fn set_id(&mut self, id: u64);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Manufacturer {
    pub id: Option<u64>,
    pub name: String,
    pub country: String,
}

impl Manufacturer {
    pub fn new(name: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            country: country.into(),
        }
    }
}

impl Entity for Manufacturer {
    const NAME: &'static str = "manufacturer";

    fn id(&self) -> Option<u64> {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = Some(id);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Driver {
    pub id: Option<u64>,
    pub name: String,
    pub license_number: String,
    pub login: String,
    #[serde(skip_serializing)]
    pub password: String,
}

impl Driver {
    pub fn new(
        name: impl Into<String>,
        license_number: impl Into<String>,
        login: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            license_number: license_number.into(),
            login: login.into(),
            password: password.into(),
        }
    }
}

impl Entity for Driver {
    const NAME: &'static str = "driver";

    fn id(&self) -> Option<u64> {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = Some(id);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Car {
    pub id: Option<u64>,
    pub model: String,
    pub manufacturer: Manufacturer,
    pub drivers: Vec<Driver>,
}

impl Car {
    pub fn new(model: impl Into<String>, manufacturer: Manufacturer) -> Self {
        Self {
            id: None,
            model: model.into(),
            manufacturer,
            drivers: Vec::new(),
        }
    }

    pub fn has_driver(&self, driver_id: u64) -> bool {
        self.drivers.iter().any(|v| v.id == Some(driver_id))
    }
}

impl Entity for Car {
    const NAME: &'static str = "car";

    fn id(&self) -> Option<u64> {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = Some(id);
    }
}
