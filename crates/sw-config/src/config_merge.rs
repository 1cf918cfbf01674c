/// Deep merge two TOML values. Overlay wins for non-table values.
/// Tables are merged recursively (project-level keys override user-level keys).
pub(crate) fn merge_toml_values(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_map), toml::Value::Table(overlay_map)) => {
            for (key, overlay_val) in overlay_map {
                let merged_val = match base_map.remove(&key) {
                    Some(base_val) => merge_toml_values(base_val, overlay_val),
                    None => overlay_val,
                };
                base_map.insert(key, merged_val);
            }
            toml::Value::Table(base_map)
        }
        (_, overlay) => overlay,
    }
}

/// Warn about keys that serde silently ignores.
pub(crate) fn warn_unknown_sections(raw: &toml::Value, source: &str) {
    const KNOWN: [&str; 4] = ["schema_version", "rotation", "skew", "team"];
    if let Some(table) = raw.as_table() {
        for key in table.keys() {
            if !KNOWN.contains(&key.as_str()) {
                tracing::warn!(config = source, key = %key, "Unknown config section ignored");
            }
        }
    }
}
