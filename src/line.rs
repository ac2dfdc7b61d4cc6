use std::io::Read;

/// Most bytes taken from the input by a single read.
pub const CAPTURE_LEN: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadLine {
    /// A new line replaced the previous one.
    Updated,
    /// The input reached end-of-stream; the previous line is kept.
    EndOfInput,
}

/// The text currently shown by the popup.
///
/// Each read overwrites the whole line. Only bytes before the first `\n` of a
/// read are kept, anything after it is dropped rather than saved for later.
#[derive(Clone)]
pub struct DisplayLine {
    data_array: [u8; CAPTURE_LEN],
    data_len: usize,
}

impl DisplayLine {
    pub fn new() -> Self {
        Self {
            data_array: [0; CAPTURE_LEN],
            data_len: 0,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data_array[..self.data_len]
    }

    pub fn is_empty(&self) -> bool {
        self.data_len == 0
    }

    /// Performs exactly one `read` on `input`.
    pub fn read_from<R: Read>(&mut self, input: &mut R) -> std::io::Result<ReadLine> {
        let len = input.read(&mut self.data_array)?;
        if len == 0 {
            return Ok(ReadLine::EndOfInput);
        }
        let received = &self.data_array[..len];
        self.data_len = received
            .iter()
            .position(|&b| b == b'\n')
            .unwrap_or(len);
        Ok(ReadLine::Updated)
    }
}

impl Default for DisplayLine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DisplayLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("DisplayLine")
            .field(&String::from_utf8_lossy(self.as_bytes()))
            .finish()
    }
}
