//! Migration helper scripts
//!
//! Project titles become categories in the target system. Two scripts are
//! rendered from the ordered category set: a Python script creating one
//! "Projects" item per category through the eLabFTW API, and SQL linking
//! experiments tagged with a category to the item of the same title.

use crate::domain::Result;
use std::path::{Path, PathBuf};

pub const PROJECTS_SCRIPT_NAME: &str = "create-projects.py";
pub const LINKS_SCRIPT_NAME: &str = "create-links.sql";

const PROJECTS_HEADER: &str = r#"#!/usr/bin/env python
import elabapi_python
API_HOST_URL = 'https://elab.local:3148/api/v2'
API_KEY = 'apiKey4Test'
configuration = elabapi_python.Configuration()
configuration.api_key['api_key'] = API_KEY
configuration.api_key_prefix['api_key'] = 'Authorization'
configuration.host = API_HOST_URL
configuration.debug = False
configuration.verify_ssl = False
api_client = elabapi_python.ApiClient(configuration)
api_client.set_default_header(header_name='Authorization', header_value=API_KEY)
itemsTypesApi = elabapi_python.ItemsTypesApi(api_client)
response = itemsTypesApi.post_items_types_with_http_info(body={'title': "Projects"})
locationHeaderInResponse = response[2].get('Location')
projects_cat_id = int(locationHeaderInResponse.split('=').pop())
itemsApi = elabapi_python.ItemsApi(api_client)
"#;

/// Double-quoted string literal body; valid for both Python and MySQL
fn quote(category: &str) -> String {
    category.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Python script creating one item per category
pub fn render_projects_script(categories: &[String]) -> String {
    let actions: Vec<String> = categories
        .iter()
        .map(|category| {
            format!(
                "\nresponse = itemsApi.post_item_with_http_info(body={{'category_id': projects_cat_id}})\n\
                 locationHeaderInResponse = response[2].get('Location')\n\
                 itemId = int(locationHeaderInResponse.split('/').pop())\n\
                 itemsApi.patch_item(itemId, body={{'title': \"{}\"}})",
                quote(category)
            )
        })
        .collect();

    format!("{PROJECTS_HEADER}{}", actions.join("\n"))
}

/// SQL linking experiments tagged with a category to the matching item
pub fn render_links_script(categories: &[String]) -> String {
    let statements: Vec<String> = categories
        .iter()
        .map(|category| {
            let category = quote(category);
            format!(
                "\nINSERT INTO experiments_links (item_id, link_id)\n\
                 SELECT\n  \
                 experiments.id,\n  \
                 (SELECT items.id FROM items WHERE title = \"{category}\" LIMIT 1)\n\
                 FROM experiments\n\
                 LEFT JOIN tags2entity ON tags2entity.item_id = experiments.id AND tags2entity.item_type = 'experiments'\n\
                 LEFT JOIN tags ON tags2entity.tag_id = tags.id\n\
                 WHERE tags.tag = \"{category}\";"
            )
        })
        .collect();

    statements.join("\n")
}

/// Write both scripts into `dir`, returning their paths
pub async fn write_scripts(dir: &Path, categories: &[String]) -> Result<Vec<PathBuf>> {
    let projects = dir.join(PROJECTS_SCRIPT_NAME);
    tokio::fs::write(&projects, render_projects_script(categories)).await?;

    let links = dir.join(LINKS_SCRIPT_NAME);
    tokio::fs::write(&links, render_links_script(categories)).await?;

    tracing::info!(
        categories = categories.len(),
        dir = %dir.display(),
        "Migration scripts written"
    );
    Ok(vec![projects, links])
}
