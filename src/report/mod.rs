//! Markdown rendering of scan results

use once_cell::sync::Lazy;
use tera::{Context, Tera};

use crate::engine::ScanResult;

/// Fixed four-column verdict table.
const TABLE_TEMPLATE: &str = "\
#### Ikarus

| Infected | Result | Engine | Updated |
|:--------:|:------:|:------:|:-------:|
| {{ infected }} | {{ result }} | {{ engine }} | {{ updated }} |
";

static TEMPLATES: Lazy<Option<Tera>> = Lazy::new(|| {
    let mut tera = Tera::default();
    match tera.add_raw_template("ikarus", TABLE_TEMPLATE) {
        Ok(()) => Some(tera),
        Err(e) => {
            log::error!("failed to register markdown template: {}", e);
            None
        }
    }
});

/// Render `result` as the plugin's markdown table.
///
/// Pure: identical results produce identical bytes. Template failures are
/// logged and yield an empty string rather than aborting the scan.
pub fn render_markdown_table(result: &ScanResult) -> String {
    let tera = match TEMPLATES.as_ref() {
        Some(tera) => tera,
        None => return String::new(),
    };

    let mut context = Context::new();
    context.insert("infected", &result.infected);
    context.insert("result", &result.result);
    context.insert("engine", &result.engine);
    context.insert("updated", &result.updated);

    match tera.render("ikarus", &context) {
        Ok(table) => table,
        Err(e) => {
            log::error!("failed to render markdown table: {}", e);
            String::new()
        }
    }
}
