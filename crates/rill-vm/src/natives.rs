//! Native functions installed into every VM.

use std::time::{SystemTime, UNIX_EPOCH};

use rill_runtime::Value;

/// `clock()`: seconds since the Unix epoch, as a number. The usual tool
/// for timing scripts from inside the language.
pub(crate) fn clock(_args: &[Value]) -> Value {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    Value::Number(elapsed.as_secs_f64())
}
