#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::{delay::FreeRtos, peripherals::Peripherals};
use log::info;
#[cfg(target_os = "espidf")]
use soil_irrigation::{
    board::{pump::PumpActuator, Board},
    configuration::nvs_configuration::NvsConfiguration,
    controller::{FreeRtosSleep, IrrigationController},
    display::SerialDisplay,
};

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();

    let peripherals = Peripherals::take()?;
    let nvs_config = NvsConfiguration::new()?;
    let config = nvs_config.load_irrigation_config()?;

    info!("Configuration: {:?}", config);

    let board = Board::new(peripherals.adc2, peripherals.pins, peripherals.ledc)?;
    let pump = PumpActuator::new(board.pump)?;

    FreeRtos::delay_ms(1000);

    let mut controller =
        IrrigationController::new(&config, board.moisture, board.buttons, pump, FreeRtosSleep)
            .with_display(SerialDisplay);

    controller.run()
}

#[cfg(not(target_os = "espidf"))]
fn main() -> anyhow::Result<()> {
    env_logger::init();

    info!(
        "No ESP-IDF target, nothing to drive. Default configuration: {:?}",
        soil_irrigation::configuration::main_configuration::IrrigationConfig::default()
    );

    Ok(())
}
