//! Common assertions for gbkx testing

/// Asserts that each recorded invocation contains the matching fragment, and
/// that there are exactly as many invocations as fragments
pub fn assert_invocations(invocations: &[String], expected: &[&str]) {
    assert_eq!(
        invocations.len(),
        expected.len(),
        "Different number of invocations: {:?} vs {:?}",
        invocations,
        expected
    );

    for (index, (invocation, fragment)) in invocations.iter().zip(expected).enumerate() {
        assert!(
            invocation.contains(fragment),
            "Invocation {} {:?} does not contain {:?}",
            index + 1,
            invocation,
            fragment
        );
    }
}

/// Asserts that an invocation starts with the given leading arguments
pub fn assert_invocation_starts_with(invocation: &str, leading: &[&str]) {
    let args: Vec<&str> = invocation.split(' ').collect();
    assert!(
        args.len() >= leading.len() && args[..leading.len()] == *leading,
        "Invocation {:?} does not start with {:?}",
        invocation,
        leading
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_invocations_passes() {
        let runs = vec!["x a.zip -mcp=936 -oout -y".to_string()];
        assert_invocations(&runs, &["-mcp=936"]);
        assert_invocation_starts_with(&runs[0], &["x", "a.zip"]);
    }

    #[test]
    #[should_panic(expected = "does not contain")]
    fn test_assert_invocations_fails() {
        let runs = vec!["x a.zip -oout -y".to_string()];
        assert_invocations(&runs, &["-mcp="]);
    }
}
