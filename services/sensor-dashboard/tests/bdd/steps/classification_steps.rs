//! BDD step definitions for the classification feature

use cucumber::{given, then, when};

use sensor_dashboard::classify::{
    classify, display_color, format_temperature, normalize_for_gauge, TemperatureClass,
};

use crate::world::DashboardWorld;

fn parse_class(s: &str) -> TemperatureClass {
    match s {
        "Cold" => TemperatureClass::Cold,
        "Normal" => TemperatureClass::Normal,
        "Warm" => TemperatureClass::Warm,
        "Hot" => TemperatureClass::Hot,
        other => panic!("Unknown class: {}", other),
    }
}

#[given(expr = "a temperature of {float}")]
fn a_temperature(world: &mut DashboardWorld, temperature: f64) {
    world.temperature = Some(temperature);
}

#[when("the temperature is classified")]
fn temperature_classified(world: &mut DashboardWorld) {
    let t = world.temperature.expect("temperature not set");
    world.class = Some(classify(t));
    world.gauge = Some(normalize_for_gauge(t));
}

#[then(expr = "the class should be {string}")]
fn class_should_be(world: &mut DashboardWorld, expected: String) {
    assert_eq!(world.class, Some(parse_class(&expected)));
}

#[then(expr = "the colour should be {string}")]
fn colour_should_be(world: &mut DashboardWorld, expected: String) {
    let class = world.class.expect("not classified");
    assert_eq!(display_color(class).hex(), expected);
}

#[then(expr = "the gauge should read {float}")]
fn gauge_should_read(world: &mut DashboardWorld, expected: f64) {
    let gauge = world.gauge.expect("not classified");
    assert!(
        (gauge - expected).abs() < 1e-9,
        "expected gauge {}, got {}",
        expected,
        gauge
    );
}

#[then(expr = "it should be displayed as {string}")]
fn displayed_as(world: &mut DashboardWorld, expected: String) {
    let t = world.temperature.expect("temperature not set");
    assert_eq!(format_temperature(t), expected);
}
