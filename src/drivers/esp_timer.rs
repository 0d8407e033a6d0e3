// PC Trace — Timer Group Driver (ESP32-C3)
//
// Wraps esp-idf-hal's general-purpose timer.  The prescale maps onto the
// timer group clock divider and the load onto the auto-reloading alarm value.
// ESP-IDF's timer ISR shim acknowledges the alarm interrupt before invoking
// the registered callback.

use anyhow::{bail, Context};
use esp_idf_hal::timer::config::Config as TimerConfig;
use esp_idf_hal::timer::{TimerDriver, TIMER00};

use crate::drivers::timer::{IsrHandler, SampleTimer, TimerPeriod};

pub struct HwSampleTimer {
    peripheral: Option<TIMER00>,
    driver: Option<TimerDriver<'static>>,
}

impl HwSampleTimer {
    pub fn new(timer: TIMER00) -> Self {
        Self {
            peripheral: Some(timer),
            driver: None,
        }
    }

    fn driver(&mut self) -> anyhow::Result<&mut TimerDriver<'static>> {
        self.driver
            .as_mut()
            .context("timer used before configure()")
    }
}

impl SampleTimer for HwSampleTimer {
    fn configure(&mut self, period: TimerPeriod) -> anyhow::Result<()> {
        let Some(timer) = self.peripheral.take() else {
            bail!("timer already configured");
        };

        let config = TimerConfig::new()
            .divider(period.prescale)
            .auto_reload(true);
        let mut driver = TimerDriver::new(timer, &config).context("timer driver init")?;

        driver.set_counter(0)?;
        driver.set_alarm(period.load as u64)?;
        driver.enable_alarm(true)?;

        log::info!(
            "Sample timer configured: divider {} × alarm {} ({} Hz tick)",
            period.prescale,
            period.load,
            driver.tick_hz()
        );

        self.driver = Some(driver);
        Ok(())
    }

    fn on_fire(&mut self, handler: IsrHandler) -> anyhow::Result<()> {
        let driver = self.driver()?;
        // SAFETY: the handler is 'static, and it only touches lock-free state.
        unsafe { driver.subscribe(handler) }.context("timer ISR registration")?;
        Ok(())
    }

    fn enable(&mut self) -> anyhow::Result<()> {
        let driver = self.driver()?;
        driver.enable_interrupt()?;
        driver.enable(true)?;
        Ok(())
    }

    fn disable(&mut self) -> anyhow::Result<()> {
        let driver = self.driver()?;
        driver.enable(false)?;
        driver.disable_interrupt()?;
        Ok(())
    }
}
