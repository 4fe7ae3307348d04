//! One-byte peek buffer

/// At most one byte read from a backend but not yet handed to a caller
///
/// Present means the byte is still owed to the next reader. Only the
/// owning transport touches it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lookahead {
    byte: Option<u8>,
}

impl Lookahead {
    pub const fn new() -> Self {
        Self { byte: None }
    }

    pub fn is_present(&self) -> bool {
        self.byte.is_some()
    }

    /// Look at the held byte without releasing it
    pub fn peek(&self) -> Option<u8> {
        self.byte
    }

    /// Release the held byte
    pub fn take(&mut self) -> Option<u8> {
        self.byte.take()
    }

    /// Return the held byte, reading one with `read` if the slot is empty
    ///
    /// A byte produced by `read` stays held until [`take`](Self::take).
    pub fn fill_with<E>(
        &mut self,
        read: impl FnOnce() -> Result<Option<u8>, E>,
    ) -> Result<Option<u8>, E> {
        if self.byte.is_none() {
            self.byte = read()?;
        }
        Ok(self.byte)
    }
}
