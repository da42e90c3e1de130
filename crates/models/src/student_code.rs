//! Student codes have the form `[Initial][YY][NN]`, e.g. `A2501`: the first
//! letter of the full name, the last two digits of the enrollment year, and a
//! sequence number that is unique within that prefix.

/// Builds the `[Initial][YY]` prefix for a new student
///
/// # Arguments
/// * `fullname` - The student's full name
/// * `year` - The enrollment year, e.g. `2025`
///
/// # Returns
/// `None` if `fullname` has no visible characters
pub fn code_prefix(fullname: &str, year: i32) -> Option<String> {
    let initial: String = fullname.trim().chars().next()?.to_uppercase().collect();

    Some(format!("{initial}{:02}", year.rem_euclid(100)))
}

/// Picks the next free code for `prefix`
///
/// The sequence continues after the highest numeric suffix already in use
/// under the same prefix; codes with a non-numeric suffix are ignored.
///
/// # Arguments
/// * `prefix` - The `[Initial][YY]` prefix from [`code_prefix`]
/// * `existing` - Codes already assigned (may include other prefixes)
pub fn next_code<'a, I>(prefix: &str, existing: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let last = existing
        .into_iter()
        .filter_map(|code| code.strip_prefix(prefix))
        .filter_map(|suffix| suffix.parse::<u32>().ok())
        .max()
        .unwrap_or(0);

    format!("{prefix}{:02}", last + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_prefix() {
        assert_eq!(code_prefix("ahmad fajar", 2025), Some("A25".to_string()));
        assert_eq!(code_prefix("  Budi", 2009), Some("B09".to_string()));
        assert_eq!(code_prefix("   ", 2025), None);
    }

    #[test]
    fn test_next_code_starts_at_one() {
        assert_eq!(next_code("A25", []), "A2501");
        assert_eq!(next_code("A25", ["B2507", "A2407"]), "A2501");
    }

    #[test]
    fn test_next_code_continues_sequence() {
        assert_eq!(next_code("A25", ["A2501", "A2502"]), "A2503");
        // Numeric ordering, not lexical
        assert_eq!(next_code("A25", ["A2509", "A2510", "A252"]), "A2511");
        assert_eq!(next_code("A25", ["A25XY", "A2503"]), "A2504");
        assert_eq!(next_code("A25", ["A2599"]), "A25100");
    }
}
