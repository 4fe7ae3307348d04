//! Console input pump
//!
//! Called from the main loop to hand every waiting key to the UI.

use monolink_hal::{Error, SerialPort};

/// Deliver waiting bytes to `handler`, at most `limit` per call
///
/// Stops early when the port reports no more data. Returns how many bytes
/// were delivered. A read error ends the pump and is passed up; bytes
/// delivered before it are not replayed.
pub fn drain<S, F>(port: &mut S, limit: usize, mut handler: F) -> Result<usize, Error>
where
    S: SerialPort + ?Sized,
    F: FnMut(u8),
{
    let mut delivered = 0;
    while delivered < limit && port.has_data() {
        match port.read_char()? {
            Some(byte) => {
                handler(byte);
                delivered += 1;
            }
            None => break,
        }
    }
    if delivered > 0 {
        debug!("Delivered {} input bytes", delivered);
    }
    Ok(delivered)
}
