use std::fs;
use std::path::Path;

use crate::error::{LockgraphError, Result};

pub fn render_template(template: &str, context: &serde_json::Value) -> Result<String> {
    let context = tera::Context::from_serialize(context)
        .map_err(|err| LockgraphError::Other(anyhow::Error::new(err)))?;
    tera::Tera::one_off(template, &context, true)
        .map_err(|err| LockgraphError::Other(anyhow::Error::new(err)))
}

pub fn render_template_file(path: &Path, context: &serde_json::Value) -> Result<String> {
    let template = fs::read_to_string(path)?;
    render_template(&template, context)
}
