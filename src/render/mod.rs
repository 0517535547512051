use std::path::Path;

use serde_json::json;

use crate::error::{LockgraphError, Result};
use crate::graph::GraphData;
use crate::util::template::{render_template, render_template_file};

const DEFAULT_TEMPLATE: &str = include_str!("template.html");

pub fn render_page(data: &GraphData, title: &str) -> Result<String> {
    render_template(DEFAULT_TEMPLATE, &page_context(data, title)?)
}

pub fn render_page_with_template(path: &Path, data: &GraphData, title: &str) -> Result<String> {
    render_template_file(path, &page_context(data, title)?)
}

fn page_context(data: &GraphData, title: &str) -> Result<serde_json::Value> {
    let payload = serde_json::to_string(data)
        .map_err(|err| LockgraphError::Other(anyhow::Error::new(err)))?;
    Ok(json!({
        "title": title,
        "graph_json": payload,
    }))
}
