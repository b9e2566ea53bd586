//! Newsletter template lookup.

/// Path of a newsletter template inside `template_dir`.
///
/// `None` when the template has no file name, so callers can fall back to
/// their default template.
pub fn html_template_path(template_dir: &str, file_name: Option<&str>) -> Option<String> {
    let file_name = file_name.map(str::trim).filter(|name| !name.is_empty())?;
    let dir = template_dir.trim_end_matches('/');
    Some(format!("{dir}/{file_name}"))
}
