//! `tracing` output for the browser console.

use anyhow::Context;
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

/// Collects one formatted event and emits it as a single console line when dropped.
#[derive(Default)]
pub struct ConsoleWriter {
    buf: Vec<u8>,
}

impl Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let line = String::from_utf8_lossy(&self.buf);
        let line = line.trim_end();
        if line.is_empty() {
            return;
        }
        #[cfg(target_arch = "wasm32")]
        log(line);
        #[cfg(not(target_arch = "wasm32"))]
        eprintln!("{line}");
    }
}

/// Installs the global subscriber. Returns `false` when one was already set.
pub(crate) fn install(level: &str) -> anyhow::Result<bool> {
    let filter = EnvFilter::try_new(level)
        .with_context(|| format!("Invalid log filter '{level}'."))?;
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(ConsoleWriter::default)
        .without_time()
        .with_target(true)
        .try_init()
        .is_ok();
    Ok(installed)
}

/// Routes `tracing` events at or above `level` (an `EnvFilter` directive such as
/// `"debug"` or `"lorenz_core=trace"`) to the console. Later calls are ignored.
#[wasm_bindgen]
pub fn init_logging(level: &str) -> Result<(), JsValue> {
    install(level)
        .map(|_| ())
        .map_err(|e| JsValue::from_str(&format!("{e:#}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writer_buffers_until_dropped() {
        let mut writer = ConsoleWriter::default();
        write!(writer, "solve_lorenz: ").expect("write");
        writeln!(writer, "done").expect("write");
        assert_eq!(writer.buf, b"solve_lorenz: done\n");
    }

    #[test]
    fn second_install_is_a_no_op() {
        assert!(install("lorenz_core=debug").is_ok());
        assert_eq!(install("info").ok(), Some(false));
    }

    #[test]
    fn malformed_filter_is_rejected() {
        assert!(install("lorenz_core=loudest").is_err());
    }
}
