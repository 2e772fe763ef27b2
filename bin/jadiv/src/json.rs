use std::path::Path;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::Result;

/// Writes `value` indented with four spaces, the layout of the panel's
/// existing settings and snapshot files.
pub(crate) fn write_pretty<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut buffer = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut serializer)?;

    std::fs::write(path, buffer)?;
    Ok(())
}
