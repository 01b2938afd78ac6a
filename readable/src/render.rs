//! Orchestration: filter a result, dump the body, compose the output text.

use anyhow::Result;
use serde_json::Value;
use tracing::debug;

use crate::core::compose::compose;
use crate::core::dump::Dumper;
use crate::core::filter::filter_result;
use crate::core::status::{classify, headline};
use crate::core::types::{FilterOptions, FilteredResult};
use crate::io::config::RenderConfig;
use crate::io::input::TaskEvent;

/// Render one raw task result to display text.
///
/// Censored results render as the compact JSON marker and nothing else.
pub fn render_result(
    result: &Value,
    options: &FilterOptions,
    config: &RenderConfig,
) -> Result<String> {
    match filter_result(result, options, &config.filter)? {
        FilteredResult::Censored(marker) => Ok(marker.to_string()),
        FilteredResult::Visible { flags, body } => {
            debug!(keys = body.len(), "dumping result body");
            let body_text = if body.is_empty() {
                String::new()
            } else {
                Dumper::readable(config.indent).dump(&Value::Object(body))
            };
            Ok(compose(&flags, &body_text, config.body_indent))
        }
    }
}

/// Render a diff value inline, without literal blocks.
pub fn render_diff(diff: &Value, config: &RenderConfig) -> String {
    Dumper::flow(config.indent).dump(diff)
}

/// Render an event, prefixed with a status headline when it names a host.
pub fn render_event(
    event: &TaskEvent,
    options: &FilterOptions,
    config: &RenderConfig,
) -> Result<String> {
    let text = render_result(&event.result, options, config)?;
    let Some(host) = event.host.as_deref() else {
        return Ok(text);
    };
    let head = headline(classify(&event.result), host);
    if text.is_empty() || text.starts_with('\n') {
        Ok(format!("{head}{text}"))
    } else {
        Ok(format!("{head} {text}"))
    }
}
