//! Utility functions for working with identifiers.

use heck::{ToSnakeCase, ToUpperCamelCase};

/// Converts a `camelCase` or `SCREAMING_SNAKE_CASE` identifier to a
/// `lower_snake` case Rust field identifier.
pub fn to_snake(s: &str) -> String {
    let ident = s.to_snake_case();

    // Use a raw identifier if the identifier matches a Rust keyword
    // (https://doc.rust-lang.org/reference/keywords.html).
    match ident.as_str() {
        "as" | "async" | "await" | "break" | "const" | "continue" | "crate" | "dyn" | "else"
        | "enum" | "extern" | "false" | "fn" | "for" | "if" | "impl" | "in" | "let" | "loop"
        | "match" | "mod" | "move" | "mut" | "pub" | "ref" | "return" | "self" | "static"
        | "struct" | "super" | "trait" | "true" | "type" | "unsafe" | "use" | "where" | "while"
        | "abstract" | "become" | "box" | "do" | "final" | "macro" | "override" | "priv"
        | "try" | "typeof" | "unsized" | "virtual" | "yield" => format!("r#{}", ident),
        _ => ident,
    }
}

/// Converts a `snake_case` identifier to an `UpperCamel` case Rust type
/// identifier.
pub fn to_upper_camel(s: &str) -> String {
    let ident = s.to_upper_camel_case();

    // Uses a raw identifier if the identifier matches a Rust keyword
    // (https://doc.rust-lang.org/reference/keywords.html).
    if ident == "Self" {
        format!("r#{}", ident)
    } else {
        ident
    }
}

/// Strips an enum's name from the prefix of one of its variant names.
///
/// The prefix is only stripped when the remainder is still a valid
/// `UpperCamel` identifier that does not restate the enum name.
pub fn strip_enum_prefix(prefix: &str, name: &str) -> String {
    let stripped = name.strip_prefix(prefix);

    // If the next character after the stripped prefix is lowercase, the
    // strip was in the middle of a word; keep the full name.
    match stripped {
        Some(stripped)
            if stripped
                .chars()
                .next()
                .map_or(false, |ch| ch.is_ascii_uppercase() || ch.is_ascii_digit()) =>
        {
            stripped.to_owned()
        }
        _ => name.to_owned(),
    }
}

/// Matches a 'matcher' against a fully qualified identifier.
///
/// A matcher with a leading dot is a prefix match on the fully qualified
/// name; without one it is a suffix match.
pub fn match_ident(matcher: &str, msg: &str, field: Option<&str>) -> bool {
    debug_assert_eq!(b'.', msg.as_bytes()[0]);

    if matcher.is_empty() {
        return false;
    } else if matcher == "." {
        return true;
    }

    let match_paths = matcher.split('.').collect::<Vec<_>>();
    let field_paths = {
        let mut paths = msg.split('.').collect::<Vec<_>>();
        if let Some(field) = field {
            paths.push(field);
        }
        paths
    };

    if &matcher[..1] == "." {
        // Prefix match.
        if match_paths.len() > field_paths.len() {
            false
        } else {
            match_paths[..] == field_paths[..match_paths.len()]
        }
    // Suffix match.
    } else if match_paths.len() > field_paths.len() {
        false
    } else {
        match_paths[..] == field_paths[field_paths.len() - match_paths.len()..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_snake() {
        assert_eq!("foo_bar", &to_snake("FooBar"));
        assert_eq!("foo_bar_baz", &to_snake("FooBarBAZ"));
        assert_eq!("xml_http_request", &to_snake("XMLHttpRequest"));
        assert_eq!("r#while", &to_snake("While"));
        assert_eq!("fuzz_buster", &to_snake("FUZZ_BUSTER"));
        assert_eq!("foo_bar_baz", &to_snake("foo_bar_baz"));
        assert_eq!("fuzz", &to_snake("_FUZZ"));
        assert_eq!("fuzz", &to_snake("fuzz_"));
        assert_eq!("field_name7", &to_snake("fieldName7"));
        assert_eq!("field_name13", &to_snake("__field_name13"));
        assert_eq!("r#type", &to_snake("type"));
    }

    #[test]
    fn test_to_upper_camel() {
        assert_eq!("", &to_upper_camel(""));
        assert_eq!("F", &to_upper_camel("F"));
        assert_eq!("Foo", &to_upper_camel("FOO"));
        assert_eq!("FooBar", &to_upper_camel("FOO_BAR"));
        assert_eq!("FooBar", &to_upper_camel("_FOO_BAR_"));
        assert_eq!("FuzzBuster", &to_upper_camel("fuzzBuster"));
        assert_eq!("r#Self", &to_upper_camel("self"));
    }

    #[test]
    fn test_strip_enum_prefix() {
        assert_eq!(strip_enum_prefix("Foo", "FooBar"), "Bar");
        assert_eq!(strip_enum_prefix("Foo", "Foobar"), "Foobar");
        assert_eq!(strip_enum_prefix("Foo", "Foo"), "Foo");
        assert_eq!(strip_enum_prefix("Foo", "Bar"), "Bar");
        assert_eq!(strip_enum_prefix("Foo", "Foo1"), "1");
    }

    #[test]
    fn test_match_ident() {
        // Prefix matches.
        assert!(match_ident(".", ".foo.bar.Baz", Some("buzz")));
        assert!(match_ident(".foo", ".foo.bar.Baz", Some("buzz")));
        assert!(match_ident(".foo.bar.Baz", ".foo.bar.Baz", Some("buzz")));
        assert!(!match_ident(".fo", ".foo.bar.Baz", Some("buzz")));
        assert!(!match_ident(".buzz", ".foo.bar.Baz", Some("buzz")));

        // Suffix matches.
        assert!(match_ident("buzz", ".foo.bar.Baz", Some("buzz")));
        assert!(match_ident("Baz.buzz", ".foo.bar.Baz", Some("buzz")));
        assert!(!match_ident("buz", ".foo.bar.Baz", Some("buzz")));

        // Type names.
        assert!(match_ident("Baz", ".foo.bar.Baz", None));
        assert!(match_ident(".foo.bar", ".foo.bar.Baz", None));
        assert!(!match_ident(".buzz.Baz", ".foo.bar.Baz", None));
    }
}
