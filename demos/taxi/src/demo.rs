use weave::Injector;

use crate::TaxiError;
use crate::models::{Car, Driver, Manufacturer};
use crate::service::{AuthenticationService, CarService, DriverService, ManufacturerService};

/// Seeds a small fleet and walks through a shift, returning a log of what happened.
pub fn run(injector: &Injector) -> Result<Vec<String>, TaxiError> {
    let manufacturers = injector.get_instance::<dyn ManufacturerService>()?;
    let drivers = injector.get_instance::<dyn DriverService>()?;
    let cars = injector.get_instance::<dyn CarService>()?;
    let auth = injector.get_instance::<dyn AuthenticationService>()?;

    let mut log = Vec::new();

    let skoda = manufacturers.create(Manufacturer::new("Skoda", "Czechia"));
    let mut octavia = cars.create(Car::new("Octavia", skoda.clone()));
    let mut superb = cars.create(Car::new("Superb", skoda));
    let alice = drivers.create(Driver::new("Alice", "AB-1024", "alice", "s3cret"));
    let bob = drivers.create(Driver::new("Bob", "CD-2048", "bob", "hunter2"));
    log.push(format!(
        "Seeded {} cars and {} drivers",
        cars.get_all().len(),
        drivers.get_all().len()
    ));

    cars.add_driver_to_car(&alice, &mut octavia)?;
    cars.add_driver_to_car(&bob, &mut octavia)?;
    cars.add_driver_to_car(&alice, &mut superb)?;

    let driver = auth.login("alice", "s3cret")?;
    let shift = describe_cars(&cars.get_all_by_driver(driver.id.unwrap_or_default()));
    log.push(format!("{} is logged in, cars: {shift}", driver.name));

    cars.remove_driver_from_car(&alice, &mut octavia)?;
    let shift = describe_cars(&cars.get_all_by_driver(driver.id.unwrap_or_default()));
    log.push(format!("{} after reassignment, cars: {shift}", driver.name));

    match auth.login("bob", "wrong") {
        Ok(driver) => log.push(format!("{} is logged in", driver.name)),
        Err(err) => log.push(format!("Login of bob rejected: {err}")),
    }
    Ok(log)
}

/// Lists every stored car with its manufacturer and drivers as JSON.
///
/// Driver passwords are never part of the listing.
pub fn fleet(injector: &Injector) -> Result<String, TaxiError> {
    let cars = injector.get_instance::<dyn CarService>()?;
    Ok(serde_json::to_string_pretty(&cars.get_all())?)
}

fn describe_cars(cars: &[Car]) -> String {
    cars.iter()
        .map(|v| format!("{} {}", v.manufacturer.name, v.model))
        .collect::<Vec<_>>()
        .join(", ")
}
