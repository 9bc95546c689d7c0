//! Rendering of a computed restore order

use crate::config::{OutputConfig, OutputFormat, OutputMode};
use crate::services::RestoreOrder;

/// Render `order` according to the output configuration
///
/// `plain` and `flag` print only the list selected by the mode, so the
/// default order appears only with `crdNames`. `json` always carries kinds,
/// resources and failures.
pub fn render(order: &RestoreOrder, output: &OutputConfig) -> Result<String, serde_json::Error> {
    let items = match output.mode {
        OutputMode::CrdNames => &order.resources,
        OutputMode::Kinds => &order.kinds,
    };

    match output.format {
        OutputFormat::Plain => Ok(items.join(", ")),
        OutputFormat::Flag => Ok(format!("--{}={}", output.flag_name, items.join(","))),
        OutputFormat::Json => serde_json::to_string_pretty(order),
    }
}
