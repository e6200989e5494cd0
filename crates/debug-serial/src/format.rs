//! Text, Integer and Float Formatters
//!
//! Everything here is built on [`DebugSerial::submit_byte`], so overflow drops
//! apply byte by byte and a long line may be cut short.

use crate::control::{CR, LF, NUL};
use crate::port::DebugSerial;
use crate::sink::ByteSink;
use std::fmt;

/// Digits in `u32::MAX`
const MAX_DIGITS: usize = 10;

impl<S: ByteSink, const C: usize> DebugSerial<S, C> {
    /// Queue a string, stopping at the first NUL byte
    pub fn print_str(&self, s: &str) {
        self.print_bytes(s.as_bytes());
    }

    /// Queue raw bytes, stopping at the first NUL byte
    pub fn print_bytes(&self, bytes: &[u8]) {
        for &byte in bytes.iter().take_while(|&&byte| byte != NUL) {
            self.submit_byte(byte);
        }
    }

    /// Queue a string followed by CR LF
    pub fn print_line(&self, s: &str) {
        self.print_str(s);
        self.newline();
    }

    /// Queue a signed decimal integer
    pub fn print_int(&self, value: i32) {
        write_int(value, |byte| self.submit_byte(byte));
    }

    /// Queue a signed decimal integer followed by CR LF
    pub fn print_int_line(&self, value: i32) {
        self.print_int(value);
        self.newline();
    }

    /// Queue a float with `decimal_places` truncated fractional digits
    pub fn print_float(&self, value: f32, decimal_places: u8) {
        write_float(value, decimal_places, |byte| self.submit_byte(byte));
    }

    /// Queue a float followed by CR LF
    pub fn print_float_line(&self, value: f32, decimal_places: u8) {
        self.print_float(value, decimal_places);
        self.newline();
    }

    /// Queue CR LF
    pub fn newline(&self) {
        self.submit_byte(CR);
        self.submit_byte(LF);
    }

    /// Get a [`fmt::Write`] adapter for `write!`-style output
    pub fn writer(&self) -> SerialWriter<'_, S, C> {
        SerialWriter { port: self }
    }
}

/// [`fmt::Write`] adapter that queues formatted output on a [`DebugSerial`]
pub struct SerialWriter<'a, S, const C: usize> {
    port: &'a DebugSerial<S, C>,
}

impl<S: ByteSink, const C: usize> fmt::Write for SerialWriter<'_, S, C> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for byte in s.bytes() {
            self.port.submit_byte(byte);
        }
        Ok(())
    }
}

/// Emit `value` in decimal, most significant digit first
fn write_int(value: i32, mut emit: impl FnMut(u8)) {
    if value < 0 {
        emit(b'-');
    }

    let mut magnitude = value.unsigned_abs();
    if magnitude == 0 {
        emit(b'0');
        return;
    }

    let mut digits = [0u8; MAX_DIGITS];
    let mut count = 0;
    while magnitude > 0 {
        digits[count] = b'0' + (magnitude % 10) as u8;
        magnitude /= 10;
        count += 1;
    }

    for &digit in digits[..count].iter().rev() {
        emit(digit);
    }
}

/// Emit `value` with `decimal_places` fractional digits
///
/// Each digit is truncated, not rounded, and the repeated multiply-by-ten
/// accumulates single-precision error, so trailing digits drift for many
/// places or large magnitudes.
fn write_float(value: f32, decimal_places: u8, mut emit: impl FnMut(u8)) {
    let mut emit_str = |s: &str| s.bytes().for_each(&mut emit);

    if value.is_nan() {
        emit_str("nan");
        return;
    }

    let mut value = value;
    if value < 0.0 {
        emit_str("-");
        value = -value;
    }

    if value.is_infinite() {
        emit_str("inf");
        return;
    }
    // Integer part must fit an i32
    if value >= i32::MAX as f32 {
        emit_str("ovf");
        return;
    }

    let int_part = value as i32;
    write_int(int_part, &mut emit);

    if decimal_places > 0 {
        emit(b'.');
        let mut fraction = value - int_part as f32;
        for _ in 0..decimal_places {
            fraction *= 10.0;
            let digit = (fraction as i32).clamp(0, 9);
            emit(b'0' + digit as u8);
            fraction -= digit as f32;
        }
    }
}
