/// Slugify a string for use as an anchor ID.
/// Converts to lowercase, replaces non-alphanumeric characters with dashes,
/// collapses runs of dashes and trims leading/trailing dashes.
#[must_use]
pub fn slugify(text: &str) -> String {
  let replaced = text
    .trim()
    .to_lowercase()
    .replace(|c: char| !c.is_alphanumeric() && c != '-' && c != '_', "-");
  let mut slug = String::with_capacity(replaced.len());
  for c in replaced.chars() {
    if c == '-' && slug.ends_with('-') {
      continue;
    }
    slug.push(c);
  }
  slug.trim_matches('-').to_string()
}
