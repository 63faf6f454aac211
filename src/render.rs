use std::collections::HashMap;

/// First line of the generated file; Ultrahand reads it as the package
/// section marker.
const FILE_HEADER: &str = ";LANGUAGES";

/// Fixed download location for patched DBI builds.
const DOWNLOAD_BASE: &str = "https://github.com/rashevskyv/DBIPatcher/releases/latest/download";

/// Final artifact text plus the language codes in emitted order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedConfig {
    pub content: String,
    pub languages: Vec<String>,
}

/// Render the Ultrahand config for one release. Codes missing from the map
/// fall back to the code itself as display name. Output order is (lowercased
/// display name, code) ascending regardless of input order; blocks are
/// separated by one blank line and the file ends with exactly one trailing
/// newline. Pure function: the returned code order is what the caller should
/// record in state.
pub fn render_config(
    version: &str,
    languages: &[String],
    lang_map: &HashMap<String, String>,
) -> RenderedConfig {
    let mut rendered: Vec<(String, String, String)> = languages
        .iter()
        .map(|code| {
            let display = lang_map.get(code).cloned().unwrap_or_else(|| code.clone());
            let block = format!(
                "[{display}]\n\
                 catch_errors\n\
                 download {DOWNLOAD_BASE}/DBI.{version}.{code}.nro /switch/DBI/DBI_new.nro\n\
                 mv /switch/DBI/DBI_new.nro /switch/DBI/DBI.nro"
            );
            (display.to_lowercase(), code.clone(), block)
        })
        .collect();
    rendered.sort_by(|a, b| (&a.0, &a.1).cmp(&(&b.0, &b.1)));

    let mut blocks = vec![FILE_HEADER.to_string()];
    let mut ordered = Vec::with_capacity(rendered.len());
    for (_, code, block) in rendered {
        blocks.push(block);
        ordered.push(code);
    }

    let mut content = blocks.join("\n\n");
    if !content.ends_with('\n') {
        content.push('\n');
    }

    RenderedConfig {
        content,
        languages: ordered,
    }
}
