use std::ffi::CStr;
use std::fmt;

// Longest tag that is passed through without ellipsizing.
pub(crate) const LOGGING_TAG_MAX_LEN: usize = 127;
// liblog drops everything past roughly 4 KiB of payload.
pub(crate) const LOGGING_MSG_MAX_LEN: usize = 4000;

pub(crate) type TagStorage = [u8; LOGGING_TAG_MAX_LEN + 1];

/// Copies `tag` into `storage` followed by a NUL terminator.
///
/// Tags longer than [`LOGGING_TAG_MAX_LEN`] are cut and end in `..`. Interior
/// NUL bytes become spaces so the result is always a valid [`CStr`].
pub(crate) fn fill_tag_bytes<'a>(storage: &'a mut TagStorage, tag: &[u8]) -> &'a CStr {
    let len = if tag.len() > LOGGING_TAG_MAX_LEN {
        let kept = tag.iter().take(LOGGING_TAG_MAX_LEN - 2).chain(b"..");
        for (output, input) in storage.iter_mut().zip(kept) {
            *output = printable(*input);
        }
        LOGGING_TAG_MAX_LEN
    } else {
        for (output, input) in storage.iter_mut().zip(tag) {
            *output = printable(*input);
        }
        tag.len()
    };
    storage[len] = b'\0';

    CStr::from_bytes_with_nul(&storage[..=len]).expect("Unreachable: we wrote a nul terminator")
}

fn printable(byte: u8) -> u8 {
    if byte == b'\0' {
        b' '
    } else {
        byte
    }
}

/// Buffers one formatted message and hands it to `sink` in chunks that fit
/// into a single liblog record.
///
/// When the buffer fills up the chunk is cut at the last newline seen, so
/// stack traces keep whole frames per record where possible.
pub(crate) struct ChunkWriter<F: FnMut(&CStr)> {
    sink: F,
    len: usize,
    last_newline_index: usize,
    buffer: [u8; LOGGING_MSG_MAX_LEN + 1],
}

impl<F: FnMut(&CStr)> ChunkWriter<F> {
    pub(crate) fn new(sink: F) -> Self {
        ChunkWriter {
            sink,
            len: 0,
            last_newline_index: 0,
            buffer: [0; LOGGING_MSG_MAX_LEN + 1],
        }
    }

    /// Flush up to the last newline, or everything if there was none.
    fn temporal_flush(&mut self) {
        let total_len = self.len;

        if total_len == 0 {
            return;
        }

        if self.last_newline_index > 0 {
            let split = self.last_newline_index;
            self.output(split);
            self.buffer.copy_within(split..total_len, 0);
            self.len = total_len - split;
        } else {
            self.output(total_len);
            self.len = 0;
        }
        self.last_newline_index = 0;
    }

    /// Flush everything remaining.
    pub(crate) fn flush(&mut self) {
        if self.len == 0 {
            return;
        }

        self.output(self.len);
        self.len = 0;
        self.last_newline_index = 0;
    }

    /// Hands the first `len` bytes to the sink, temporarily terminating them
    /// with a NUL in place.
    fn output(&mut self, len: usize) {
        let displaced = std::mem::replace(&mut self.buffer[len], b'\0');
        if let Ok(chunk) = CStr::from_bytes_with_nul(&self.buffer[..=len]) {
            (self.sink)(chunk);
        }
        self.buffer[len] = displaced;
    }
}

impl<F: FnMut(&CStr)> fmt::Write for ChunkWriter<F> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let mut incoming_bytes = s.as_bytes();

        while !incoming_bytes.is_empty() {
            let start = self.len;
            let taken = (LOGGING_MSG_MAX_LEN - start).min(incoming_bytes.len());

            for (i, (output, input)) in self.buffer[start..start + taken]
                .iter_mut()
                .zip(incoming_bytes)
                .enumerate()
            {
                *output = printable(*input);
                if *input == b'\n' {
                    self.last_newline_index = start + i;
                }
            }

            self.len = start + taken;
            incoming_bytes = &incoming_bytes[taken..];

            // buffer is full and more is coming
            if !incoming_bytes.is_empty() {
                self.temporal_flush();
            }
        }

        Ok(())
    }
}
