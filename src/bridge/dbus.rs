//! D-Bus implementation of the gamma bridge
//!
//! Temperature and brightness live as properties on the `rs.wl-gammarelay`
//! service, read and written through the standard
//! `org.freedesktop.DBus.Properties` interface. Tray icon updates go to the
//! Sunshift tray service.
//!
//! A fresh session connection is opened per call so that a backend restart
//! never leaves the applet holding a dead connection; the next action simply
//! reconnects.

use crate::bridge::{GammaBridge, GammaState};
use crate::error::Result;
use zbus::blocking::Connection;
use zbus::zvariant::{OwnedValue, Value};

/// Well-known bus name of the wl-gammarelay backend
pub const GAMMA_RELAY_DEST: &str = "rs.wl-gammarelay";
/// Object path of the gamma relay properties
pub const GAMMA_RELAY_PATH: &str = "/";
/// Interface holding the `Temperature` and `Brightness` properties
pub const GAMMA_RELAY_INTERFACE: &str = "rs.wl.gammarelay";

/// Well-known bus name of the Sunshift tray service
pub const TRAY_DEST: &str = "org.sunshift.Tray";
/// Object path of the tray service
pub const TRAY_PATH: &str = "/org/sunshift/Tray";
/// Interface exposing the tray icon command and tray events
pub const TRAY_INTERFACE: &str = "org.sunshift.Tray1";

/// Bridge implementation backed by the session D-Bus bus
#[derive(Debug, Default)]
pub struct GammaRelayBridge;

impl GammaRelayBridge {
    /// Create a new bridge. Connections are opened lazily, per call.
    pub fn new() -> Self {
        Self
    }

    fn get_property(connection: &Connection, name: &str) -> Result<OwnedValue> {
        let reply = connection.call_method(
            Some(GAMMA_RELAY_DEST),
            GAMMA_RELAY_PATH,
            Some("org.freedesktop.DBus.Properties"),
            "Get",
            &(GAMMA_RELAY_INTERFACE, name),
        )?;
        Ok(reply.body().deserialize()?)
    }

    fn set_property(connection: &Connection, name: &str, value: Value<'_>) -> Result<()> {
        connection.call_method(
            Some(GAMMA_RELAY_DEST),
            GAMMA_RELAY_PATH,
            Some("org.freedesktop.DBus.Properties"),
            "Set",
            &(GAMMA_RELAY_INTERFACE, name, value),
        )?;
        Ok(())
    }

    fn get_temperature(connection: &Connection) -> Result<u16> {
        let value = Self::get_property(connection, "Temperature")?;
        let temperature: u16 = value
            .try_into()
            .map_err(|_| zbus::Error::Failure("Failed to parse temperature".into()))?;
        Ok(temperature)
    }

    fn get_brightness(connection: &Connection) -> Result<f64> {
        let value = Self::get_property(connection, "Brightness")?;
        let brightness: f64 = value
            .try_into()
            .map_err(|_| zbus::Error::Failure("Failed to parse brightness".into()))?;
        Ok(brightness)
    }
}

impl GammaBridge for GammaRelayBridge {
    fn fetch_state(&self) -> Result<GammaState> {
        let connection = Connection::session()?;
        let temperature = Self::get_temperature(&connection)?;
        let brightness = Self::get_brightness(&connection)?;
        Ok(GammaState {
            temperature,
            brightness,
        })
    }

    fn set_temperature(&self, temperature: u16) -> Result<()> {
        let connection = Connection::session()?;
        Self::set_property(&connection, "Temperature", Value::new(temperature))
    }

    fn set_brightness(&self, brightness: f64) -> Result<()> {
        let connection = Connection::session()?;
        Self::set_property(&connection, "Brightness", Value::new(brightness))
    }

    fn set_gamma_state(&self, state: &GammaState) -> Result<()> {
        // The relay has no combined setter; two property writes on one connection.
        let connection = Connection::session()?;
        Self::set_property(&connection, "Temperature", Value::new(state.temperature))?;
        Self::set_property(&connection, "Brightness", Value::new(state.brightness))
    }

    fn update_tray_icon(&self, temperature: u16) -> Result<()> {
        let connection = Connection::session()?;
        connection.call_method(
            Some(TRAY_DEST),
            TRAY_PATH,
            Some(TRAY_INTERFACE),
            "UpdateIcon",
            &(temperature,),
        )?;
        Ok(())
    }
}
