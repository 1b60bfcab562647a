//! Leading action verbs: `tool open -f x` runs action `open` with flags `-f x`.

/// Split a leading non-flag token off the argument list.
///
/// `args[0]` is the program path. When `args[1]` exists and does not start
/// with `-` or `/`, it is removed and returned as the action; otherwise the
/// arguments are returned unchanged.
pub fn extract_action(mut args: Vec<String>) -> (Option<String>, Vec<String>) {
    let has_action = args
        .get(1)
        .is_some_and(|token| !token.starts_with('-') && !token.starts_with('/'));
    if !has_action {
        return (None, args);
    }
    let action = args.remove(1);
    (Some(action), args)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn action_before_flags_is_extracted() {
        let (action, rest) = extract_action(args(&["bin", "open", "-f"]));
        assert_eq!(action.as_deref(), Some("open"));
        assert_eq!(rest, args(&["bin", "-f"]));
    }

    #[test]
    fn action_alone() {
        let (action, rest) = extract_action(args(&["test/test.bin", "open"]));
        assert_eq!(action.as_deref(), Some("open"));
        assert_eq!(rest, args(&["test/test.bin"]));
    }

    #[test]
    fn remaining_tokens_shift_left() {
        let (action, rest) = extract_action(args(&[
            "test/test.bin",
            "put",
            "--file=test.txt",
            "--filter pat:123",
            "-d",
        ]));
        assert_eq!(action.as_deref(), Some("put"));
        assert_eq!(
            rest,
            args(&["test/test.bin", "--file=test.txt", "--filter pat:123", "-d"])
        );
    }

    #[test]
    fn leading_flag_means_no_action() {
        for flag in ["-v", "--help", "/version", "/h"] {
            let input = args(&["bin", flag]);
            let (action, rest) = extract_action(input.clone());
            assert_eq!(action, None, "{flag}");
            assert_eq!(rest, input);
        }
    }

    #[test]
    fn program_only_means_no_action() {
        let (action, rest) = extract_action(args(&["bin"]));
        assert_eq!(action, None);
        assert_eq!(rest, args(&["bin"]));

        let (action, rest) = extract_action(Vec::new());
        assert_eq!(action, None);
        assert!(rest.is_empty());
    }
}
