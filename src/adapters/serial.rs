//! Serial telemetry sink.
//!
//! Frames each line with a CRLF terminator and pushes it out the UART
//! telemetry port.  The write loop tolerates a momentarily full transmit
//! ring by resubmitting the unwritten tail instead of dropping bytes:
//! downstream parsers rely on never seeing a torn line.
//!
//! On host targets lines go to stdout, which keeps the simulation binary's
//! output identical to the device's serial stream.

use crate::app::ports::TelemetrySink;

pub struct SerialSink;

impl SerialSink {
    pub fn new() -> Self {
        Self
    }

    #[cfg(target_os = "espidf")]
    fn write_all(&mut self, mut bytes: &[u8]) {
        use esp_idf_svc::sys::uart_write_bytes;

        use crate::drivers::hw_init::UART_PORT;

        while !bytes.is_empty() {
            // SAFETY: driver installed by hw_init::init_peripherals();
            // uart_write_bytes copies into the TX ring before returning.
            let written = unsafe {
                uart_write_bytes(
                    UART_PORT,
                    bytes.as_ptr().cast::<core::ffi::c_void>(),
                    bytes.len(),
                )
            };
            if written <= 0 {
                // TX ring full; yield a tick and resubmit.
                unsafe { esp_idf_svc::sys::vTaskDelay(1) };
                continue;
            }
            bytes = &bytes[written as usize..];
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn write_all(&mut self, bytes: &[u8]) {
        use std::io::Write;

        let mut stdout = std::io::stdout().lock();
        let _ = stdout.write_all(bytes);
        let _ = stdout.flush();
    }
}

impl Default for SerialSink {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetrySink for SerialSink {
    fn send_line(&mut self, line: &str) {
        self.write_all(line.as_bytes());
        self.write_all(b"\r\n");
    }
}
