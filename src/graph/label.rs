//! Default labels derived from type names.

/// Returns the default label for `T`: its bare type name with the first
/// character upper-cased.
///
/// Module paths and generic arguments are dropped, the rest of the name is
/// kept as written. Types without a name of their own (references, tuples,
/// slices, arrays, closures, trait objects) produce an empty label.
///
/// ```
/// use cypher_template::graph::default_label;
///
/// struct Person;
/// assert_eq!(default_label::<Person>(), "Person");
/// assert_eq!(default_label::<Vec<Person>>(), "Vec");
/// assert_eq!(default_label::<&Person>(), "");
/// ```
pub fn default_label<T: ?Sized>() -> String {
    title_case(bare_name(std::any::type_name::<T>()))
}

fn bare_name(full: &str) -> &str {
    let path = full.split('<').next().unwrap_or(full);

    // Anything but a plain path (`&T`, `(A, B)`, `[T]`, `{{closure}}`) is unnamed.
    if !path
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == ':')
    {
        return "";
    }
    path.rsplit("::").next().unwrap_or(path)
}

/// Upper-cases the first character only; the remainder is left untouched.
fn title_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(dead_code)]
    struct Person;

    #[allow(non_camel_case_types, dead_code)]
    struct movie;

    #[allow(dead_code)]
    struct Wrapper<T>(T);

    #[test]
    fn test_named_type() {
        assert_eq!(default_label::<Person>(), "Person");
    }

    #[test]
    fn test_lowercase_type_is_capitalized() {
        assert_eq!(default_label::<movie>(), "Movie");
    }

    #[test]
    fn test_primitive() {
        assert_eq!(default_label::<i64>(), "I64");
        assert_eq!(default_label::<str>(), "Str");
    }

    #[test]
    fn test_generic_arguments_are_dropped() {
        assert_eq!(default_label::<Wrapper<Person>>(), "Wrapper");
        assert_eq!(default_label::<Option<Vec<String>>>(), "Option");
    }

    #[test]
    fn test_unnamed_types() {
        assert_eq!(default_label::<&Person>(), "");
        assert_eq!(default_label::<(i64, i64)>(), "");
        assert_eq!(default_label::<[u8]>(), "");
    }

    #[test]
    fn test_title_case_keeps_rest() {
        assert_eq!(title_case("knowsAbout"), "KnowsAbout");
        assert_eq!(title_case("ärger"), "Ärger");
        assert_eq!(title_case(""), "");
    }
}
